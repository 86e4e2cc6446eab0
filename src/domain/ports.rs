use crate::domain::model::{BetBounds, ConfirmedTicket, StoredTicket, TicketNumber};
use crate::utils::error::{PersistenceError, ReportError, Result};
use chrono::NaiveDate;

pub trait BoundsSource {
    /// 讀取投注上下限，失敗時必須回傳錯誤而不是預設為 0
    fn bet_bounds(&self) -> Result<BetBounds>;
}

impl BoundsSource for BetBounds {
    fn bet_bounds(&self) -> Result<BetBounds> {
        Ok(*self)
    }
}

pub trait SequenceSource {
    fn next_ticket_sequence(&self) -> std::result::Result<i64, PersistenceError>;
}

/// Writes a ticket header and all of its line items atomically, or nothing.
pub trait TicketRepository {
    fn save_ticket(
        &mut self,
        ticket: &ConfirmedTicket,
    ) -> std::result::Result<(), PersistenceError>;

    fn find_ticket(
        &self,
        ticket_number: &TicketNumber,
        play_date: NaiveDate,
    ) -> std::result::Result<Option<StoredTicket>, PersistenceError>;

    fn void_ticket(
        &mut self,
        ticket_number: &TicketNumber,
        play_date: NaiveDate,
        reason: &str,
    ) -> std::result::Result<StoredTicket, PersistenceError>;
}

pub trait ReportSink {
    fn print_ticket(&mut self, ticket: &ConfirmedTicket) -> std::result::Result<(), ReportError>;
}
