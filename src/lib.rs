pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::KioskConfig;

pub use adapters::{CsvVoucherPrinter, FileTicketStore};
pub use crate::core::{catalog::Catalog, kiosk::KioskEngine, quick_amounts::QuickAmounts};
pub use domain::model::{BetBounds, ConfirmedTicket, LineItem, TicketNumber};
pub use domain::session::{SessionContext, TicketSession};
pub use utils::error::{KioskError, Result};
