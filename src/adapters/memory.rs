use crate::core::{
    ConfirmedTicket, ReportSink, SequenceSource, StoredTicket, TicketNumber, TicketRepository,
    TicketStatus,
};
use crate::utils::error::{PersistenceError, ReportError};
use chrono::{Local, NaiveDate};

/// In-memory ticket store with save and sequence failure injection.
#[derive(Debug, Default)]
pub struct MemoryTicketStore {
    tickets: Vec<StoredTicket>,
    fail_saves: bool,
    fail_sequence: bool,
}

impl MemoryTicketStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_saves(&mut self, fail: bool) {
        self.fail_saves = fail;
    }

    pub fn set_fail_sequence(&mut self, fail: bool) {
        self.fail_sequence = fail;
    }

    pub fn tickets(&self) -> &[StoredTicket] {
        &self.tickets
    }
}

impl SequenceSource for MemoryTicketStore {
    fn next_ticket_sequence(&self) -> Result<i64, PersistenceError> {
        if self.fail_sequence {
            return Err(PersistenceError::Unavailable {
                message: "sequence failure injected".to_string(),
            });
        }
        let max = self
            .tickets
            .iter()
            .filter_map(|stored| stored.ticket.ticket_number.sequence())
            .max()
            .unwrap_or(0);
        Ok(max + 1)
    }
}

impl TicketRepository for MemoryTicketStore {
    fn save_ticket(&mut self, ticket: &ConfirmedTicket) -> Result<(), PersistenceError> {
        if self.fail_saves {
            return Err(PersistenceError::Unavailable {
                message: "save failure injected".to_string(),
            });
        }
        if self
            .tickets
            .iter()
            .any(|stored| stored.ticket.ticket_number == ticket.ticket_number)
        {
            return Err(PersistenceError::DuplicateTicket {
                ticket_number: ticket.ticket_number.to_string(),
            });
        }

        self.tickets.push(StoredTicket {
            ticket: ticket.clone(),
            status: TicketStatus::Active,
        });
        Ok(())
    }

    fn find_ticket(
        &self,
        ticket_number: &TicketNumber,
        play_date: NaiveDate,
    ) -> Result<Option<StoredTicket>, PersistenceError> {
        Ok(self
            .tickets
            .iter()
            .find(|stored| {
                &stored.ticket.ticket_number == ticket_number
                    && stored.ticket.play_date == play_date
            })
            .cloned())
    }

    fn void_ticket(
        &mut self,
        ticket_number: &TicketNumber,
        play_date: NaiveDate,
        reason: &str,
    ) -> Result<StoredTicket, PersistenceError> {
        let stored = self
            .tickets
            .iter_mut()
            .find(|stored| {
                &stored.ticket.ticket_number == ticket_number
                    && stored.ticket.play_date == play_date
            })
            .ok_or_else(|| PersistenceError::TicketNotFound {
                ticket_number: ticket_number.to_string(),
                play_date,
            })?;

        if !stored.is_active() {
            return Err(PersistenceError::AlreadyVoided {
                ticket_number: ticket_number.to_string(),
            });
        }

        stored.status = TicketStatus::Voided {
            reason: reason.to_string(),
            voided_at: Local::now().naive_local(),
        };
        Ok(stored.clone())
    }
}

/// Printer that only remembers which tickets it printed.
#[derive(Debug, Default)]
pub struct RecordingPrinter {
    printed: Vec<TicketNumber>,
    fail: bool,
}

impl RecordingPrinter {
    pub fn set_fail(&mut self, fail: bool) {
        self.fail = fail;
    }

    pub fn printed(&self) -> &[TicketNumber] {
        &self.printed
    }
}

impl ReportSink for RecordingPrinter {
    fn print_ticket(&mut self, ticket: &ConfirmedTicket) -> Result<(), ReportError> {
        if self.fail {
            return Err(ReportError::Unavailable {
                message: "printer offline".to_string(),
            });
        }
        self.printed.push(ticket.ticket_number.clone());
        Ok(())
    }
}
