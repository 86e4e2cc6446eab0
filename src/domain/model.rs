use crate::utils::error::SequenceError;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 票號固定寬度
pub const TICKET_NUMBER_WIDTH: usize = 8;

/// Fixed-width, zero-padded ticket number drawn from a positive sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketNumber(String);

impl TicketNumber {
    pub fn from_sequence(sequence: i64) -> Result<Self, SequenceError> {
        if sequence <= 0 {
            return Err(SequenceError::NonPositiveSequence(sequence));
        }
        Ok(Self(format!(
            "{:0width$}",
            sequence,
            width = TICKET_NUMBER_WIDTH
        )))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn sequence(&self) -> Option<i64> {
        self.0.parse().ok()
    }
}

impl fmt::Display for TicketNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BetBounds {
    pub minimum: Decimal,
    pub maximum: Decimal,
}

impl BetBounds {
    pub fn new(minimum: Decimal, maximum: Decimal) -> Self {
        Self { minimum, maximum }
    }
}

/// 單筆投注，加入票後不可修改
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub game_code: String,
    pub animal_label: String,
    pub slot_code: String,
    pub slot_description: String,
    pub slot_time: Option<NaiveTime>,
    pub wager_amount: Decimal,
}

impl LineItem {
    pub fn has_slot(&self) -> bool {
        !self.slot_code.trim().is_empty() && self.slot_time.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmedTicket {
    pub ticket_number: TicketNumber,
    pub branch_id: String,
    pub play_date: NaiveDate,
    pub created_at: NaiveTime,
    pub line_items: Vec<LineItem>,
    pub total_amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TicketStatus {
    Active,
    Voided {
        reason: String,
        voided_at: NaiveDateTime,
    },
}

/// A persisted ticket together with its lifecycle status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredTicket {
    pub ticket: ConfirmedTicket,
    pub status: TicketStatus,
}

impl StoredTicket {
    pub fn is_active(&self) -> bool {
        matches!(self.status, TicketStatus::Active)
    }
}
