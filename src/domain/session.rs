use crate::domain::model::{BetBounds, ConfirmedTicket, LineItem, TicketNumber};
use crate::utils::error::{ConfirmationError, SequenceError, SessionError, ValidationError};
use chrono::{Local, NaiveDate, NaiveTime};
use rust_decimal::Decimal;

/// Fixed per-kiosk data every session of a shift shares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub branch_id: String,
    pub play_date: NaiveDate,
    pub bounds: BetBounds,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Open,
    Closed,
}

/// One in-progress ticket. Line items can only be appended, and the total is
/// kept equal to the sum of their wagers.
#[derive(Debug, Clone)]
pub struct TicketSession {
    ticket_number: TicketNumber,
    context: SessionContext,
    created_at: NaiveTime,
    line_items: Vec<LineItem>,
    total_amount: Decimal,
    state: SessionState,
}

impl TicketSession {
    pub fn begin(next_sequence: i64, context: SessionContext) -> Result<Self, SequenceError> {
        Self::begin_at(next_sequence, context, Local::now().time())
    }

    pub fn begin_at(
        next_sequence: i64,
        context: SessionContext,
        created_at: NaiveTime,
    ) -> Result<Self, SequenceError> {
        let ticket_number = TicketNumber::from_sequence(next_sequence)?;
        tracing::debug!("Opened ticket {}", ticket_number);

        Ok(Self {
            ticket_number,
            context,
            created_at,
            line_items: Vec::new(),
            total_amount: Decimal::ZERO,
            state: SessionState::Open,
        })
    }

    pub fn validate_wager(amount: Decimal, bounds: &BetBounds) -> Result<(), ValidationError> {
        if amount < bounds.minimum {
            return Err(ValidationError::BelowMinimum {
                amount,
                minimum: bounds.minimum,
            });
        }
        if amount > bounds.maximum {
            return Err(ValidationError::AboveMaximum {
                amount,
                maximum: bounds.maximum,
            });
        }
        // 上下限本身可能不合理 (例如負數)，金額仍必須大於 0
        if amount <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveWager { amount });
        }
        Ok(())
    }

    pub fn add_line_item(&mut self, item: LineItem) -> Result<(), SessionError> {
        if self.state == SessionState::Closed {
            return Err(ConfirmationError::SessionClosed.into());
        }
        if !item.has_slot() {
            return Err(ConfirmationError::MissingSlot {
                game_code: item.game_code,
            }
            .into());
        }
        Self::validate_wager(item.wager_amount, &self.context.bounds)?;

        self.total_amount += item.wager_amount;
        tracing::debug!(
            "Ticket {}: added {} on {} ({}), total {}",
            self.ticket_number,
            item.wager_amount,
            item.game_code,
            item.slot_code,
            self.total_amount
        );
        self.line_items.push(item);
        Ok(())
    }

    /// 執行所有確認檢查並產生快照，但不關閉 session
    pub fn prepare_confirmation(&self) -> Result<ConfirmedTicket, ConfirmationError> {
        if self.state == SessionState::Closed {
            return Err(ConfirmationError::SessionClosed);
        }
        if self.line_items.is_empty() || self.total_amount.is_zero() {
            return Err(ConfirmationError::EmptyTicket);
        }
        // 與 add_line_item 相同的時段檢查，快照送去存檔前再確認一次
        if let Some(item) = self.line_items.iter().find(|item| !item.has_slot()) {
            return Err(ConfirmationError::MissingSlot {
                game_code: item.game_code.clone(),
            });
        }

        Ok(ConfirmedTicket {
            ticket_number: self.ticket_number.clone(),
            branch_id: self.context.branch_id.clone(),
            play_date: self.context.play_date,
            created_at: self.created_at,
            line_items: self.line_items.clone(),
            total_amount: self.total_amount,
        })
    }

    pub fn confirm(&mut self) -> Result<ConfirmedTicket, ConfirmationError> {
        let ticket = self.prepare_confirmation()?;
        self.state = SessionState::Closed;
        tracing::debug!("Closed ticket {}", self.ticket_number);
        Ok(ticket)
    }

    /// Discards this session and opens a fresh one for the same kiosk.
    pub fn reset(self, next_sequence: i64) -> Result<TicketSession, SequenceError> {
        Self::begin(next_sequence, self.context)
    }

    pub fn ticket_number(&self) -> &TicketNumber {
        &self.ticket_number
    }

    pub fn branch_id(&self) -> &str {
        &self.context.branch_id
    }

    pub fn play_date(&self) -> NaiveDate {
        self.context.play_date
    }

    pub fn created_at(&self) -> NaiveTime {
        self.created_at
    }

    pub fn bounds(&self) -> &BetBounds {
        &self.context.bounds
    }

    pub fn line_items(&self) -> &[LineItem] {
        &self.line_items
    }

    pub fn total_amount(&self) -> Decimal {
        self.total_amount
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == SessionState::Open
    }
}
