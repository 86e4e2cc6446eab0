pub mod catalog;
pub mod kiosk;
pub mod quick_amounts;

pub use crate::domain::model::{
    BetBounds, ConfirmedTicket, LineItem, StoredTicket, TicketNumber, TicketStatus,
};
pub use crate::domain::ports::{BoundsSource, ReportSink, SequenceSource, TicketRepository};
pub use crate::utils::error::Result;
