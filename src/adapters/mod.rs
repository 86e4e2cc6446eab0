// Adapters layer: concrete ticket stores and voucher printers behind the
// domain ports.

pub mod file_store;
pub mod memory;
pub mod voucher;

pub use file_store::FileTicketStore;
pub use memory::{MemoryTicketStore, RecordingPrinter};
pub use voucher::CsvVoucherPrinter;
