use rust_decimal::Decimal;
use thiserror::Error;

/// 單筆投注金額驗證錯誤
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Wager must be greater than zero, got {amount}")]
    NonPositiveWager { amount: Decimal },

    #[error("Wager {amount} is below the minimum allowed ({minimum})")]
    BelowMinimum { amount: Decimal, minimum: Decimal },

    #[error("Wager {amount} is above the maximum allowed ({maximum})")]
    AboveMaximum { amount: Decimal, maximum: Decimal },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationError {
    #[error("Ticket has no bets")]
    EmptyTicket,

    #[error("Bet on {game_code} has no draw slot selected")]
    MissingSlot { game_code: String },

    #[error("Ticket session is already closed")]
    SessionClosed,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SequenceError {
    #[error("Ticket sequence must be positive, got {0}")]
    NonPositiveSequence(i64),
}

/// 新增投注時可能發生的錯誤 (金額驗證或狀態錯誤)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Confirmation(#[from] ConfirmationError),
}

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Ticket store IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Ticket store is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("Ticket {ticket_number} already exists")]
    DuplicateTicket { ticket_number: String },

    #[error("Ticket {ticket_number} not found for {play_date}")]
    TicketNotFound {
        ticket_number: String,
        play_date: chrono::NaiveDate,
    },

    #[error("Ticket {ticket_number} is already voided")]
    AlreadyVoided { ticket_number: String },

    #[error("Ticket store unavailable: {message}")]
    Unavailable { message: String },
}

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Voucher IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Voucher CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Printer unavailable: {message}")]
    Unavailable { message: String },
}

#[derive(Error, Debug)]
pub enum KioskError {
    #[error(transparent)]
    Wager(#[from] ValidationError),

    #[error(transparent)]
    Confirmation(#[from] ConfirmationError),

    #[error(transparent)]
    Sequence(#[from] SequenceError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error("Ticket {ticket_number} was saved but printing failed: {source}")]
    PrintFailed {
        ticket_number: String,
        #[source]
        source: ReportError,
    },

    #[error("Unknown animal code: {code}")]
    UnknownAnimal { code: String },

    #[error("Unknown draw slot: {code}")]
    UnknownSlot { code: String },

    #[error("Invalid input for {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration value: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid configuration value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },
}

impl From<SessionError> for KioskError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Validation(e) => KioskError::Wager(e),
            SessionError::Confirmation(e) => KioskError::Confirmation(e),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Operator,
    Configuration,
    Storage,
    Printing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl KioskError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            KioskError::Wager(_)
            | KioskError::Confirmation(_)
            | KioskError::Sequence(_)
            | KioskError::UnknownAnimal { .. }
            | KioskError::UnknownSlot { .. }
            | KioskError::InvalidInput { .. } => ErrorCategory::Operator,
            KioskError::ConfigError { .. }
            | KioskError::MissingConfigError { .. }
            | KioskError::InvalidConfigValueError { .. }
            | KioskError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            KioskError::Persistence(_)
            | KioskError::IoError(_)
            | KioskError::SerializationError(_) => ErrorCategory::Storage,
            KioskError::Report(_) | KioskError::PrintFailed { .. } => ErrorCategory::Printing,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            KioskError::Wager(_)
            | KioskError::UnknownAnimal { .. }
            | KioskError::UnknownSlot { .. }
            | KioskError::InvalidInput { .. } => ErrorSeverity::Low,
            KioskError::Confirmation(_)
            | KioskError::PrintFailed { .. }
            | KioskError::Report(_) => ErrorSeverity::Medium,
            KioskError::Sequence(_)
            | KioskError::ConfigError { .. }
            | KioskError::MissingConfigError { .. }
            | KioskError::InvalidConfigValueError { .. }
            | KioskError::ConfigValidationError { .. } => ErrorSeverity::High,
            KioskError::Persistence(_)
            | KioskError::IoError(_)
            | KioskError::SerializationError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            KioskError::Wager(ValidationError::NonPositiveWager { .. }) => {
                "Enter a wager greater than zero".to_string()
            }
            KioskError::Wager(ValidationError::BelowMinimum { minimum, .. }) => {
                format!("Enter a wager of at least {}", minimum)
            }
            KioskError::Wager(ValidationError::AboveMaximum { maximum, .. }) => {
                format!("Enter a wager of at most {}", maximum)
            }
            KioskError::Confirmation(ConfirmationError::EmptyTicket) => {
                "Add at least one bet before confirming".to_string()
            }
            KioskError::Confirmation(ConfirmationError::MissingSlot { .. }) => {
                "Select a draw slot for every bet".to_string()
            }
            KioskError::Confirmation(ConfirmationError::SessionClosed) => {
                "Start a new ticket".to_string()
            }
            KioskError::PrintFailed { ticket_number, .. } => {
                format!("Check the printer and reprint ticket {}", ticket_number)
            }
            KioskError::Report(_) => "Check the printer or voucher output directory".to_string(),
            KioskError::UnknownAnimal { .. } => "List animals to see the valid codes".to_string(),
            KioskError::UnknownSlot { .. } => "List slots to see the valid codes".to_string(),
            KioskError::InvalidInput { field, .. } => format!("Correct the value of {}", field),
            KioskError::Sequence(_) | KioskError::Persistence(_) => {
                "Check the ticket store in the data directory".to_string()
            }
            KioskError::IoError(_) | KioskError::SerializationError(_) => {
                "Check file permissions and disk space".to_string()
            }
            KioskError::ConfigError { .. }
            | KioskError::MissingConfigError { .. }
            | KioskError::InvalidConfigValueError { .. }
            | KioskError::ConfigValidationError { .. } => {
                "Review the kiosk configuration file".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Operator => format!("Bet rejected: {}", self),
            ErrorCategory::Configuration => format!("Kiosk is misconfigured: {}", self),
            ErrorCategory::Storage => format!("Could not access the ticket store: {}", self),
            ErrorCategory::Printing => format!("Voucher could not be printed: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, KioskError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_error_maps_to_kiosk_error() {
        let err: KioskError = SessionError::Confirmation(ConfirmationError::SessionClosed).into();
        assert!(matches!(
            err,
            KioskError::Confirmation(ConfirmationError::SessionClosed)
        ));
        assert_eq!(err.category(), ErrorCategory::Operator);
    }

    #[test]
    fn test_severity_ordering() {
        let wager = KioskError::Wager(ValidationError::BelowMinimum {
            amount: Decimal::new(500, 0),
            minimum: Decimal::new(1000, 0),
        });
        let storage = KioskError::Persistence(PersistenceError::Unavailable {
            message: "disk".to_string(),
        });

        assert_eq!(wager.severity(), ErrorSeverity::Low);
        assert_eq!(storage.severity(), ErrorSeverity::Critical);
        assert!(wager.severity() < storage.severity());
        assert!(wager.recovery_suggestion().contains("1000"));
    }
}
