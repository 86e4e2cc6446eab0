use crate::core::quick_amounts::QuickAmounts;
use crate::core::{
    BoundsSource, ConfirmedTicket, LineItem, ReportSink, SequenceSource, StoredTicket,
    TicketNumber, TicketRepository,
};
use crate::domain::session::{SessionContext, TicketSession};
use crate::utils::error::{KioskError, PersistenceError, Result};
use crate::utils::validation::{validate_bet_bounds, validate_non_empty_string};
use chrono::{Local, NaiveDate};

/// Drives ticket sessions against the ticket store and the voucher printer.
pub struct KioskEngine<S, P>
where
    S: SequenceSource + TicketRepository,
    P: ReportSink,
{
    store: S,
    printer: P,
    session: TicketSession,
    quick_amounts: QuickAmounts,
}

impl<S, P> KioskEngine<S, P>
where
    S: SequenceSource + TicketRepository,
    P: ReportSink,
{
    /// 讀取一次投注上下限並開啟第一張票
    pub fn open<B>(
        store: S,
        printer: P,
        bounds_source: &B,
        branch_id: impl Into<String>,
        play_date: NaiveDate,
    ) -> Result<Self>
    where
        B: BoundsSource + ?Sized,
    {
        let branch_id = branch_id.into();
        validate_non_empty_string("branch_id", &branch_id)?;

        let bounds = bounds_source.bet_bounds()?;
        validate_bet_bounds("bounds", &bounds)?;

        let sequence = store.next_ticket_sequence()?;
        let session = TicketSession::begin(
            sequence,
            SessionContext {
                branch_id,
                play_date,
                bounds,
            },
        )?;

        tracing::info!(
            "🎟️ Kiosk open for branch {} on {}, ticket {} (bets {}..={})",
            session.branch_id(),
            play_date,
            session.ticket_number(),
            bounds.minimum,
            bounds.maximum
        );

        Ok(Self {
            store,
            printer,
            session,
            quick_amounts: QuickAmounts::default(),
        })
    }

    pub fn with_quick_amounts(mut self, quick_amounts: QuickAmounts) -> Self {
        self.quick_amounts = quick_amounts;
        self
    }

    pub fn add_bet(&mut self, item: LineItem) -> Result<()> {
        self.ensure_open_session()?;
        if let Err(e) = self.session.add_line_item(item) {
            tracing::warn!(
                "Bet rejected on ticket {}: {}",
                self.session.ticket_number(),
                e
            );
            return Err(e.into());
        }
        Ok(())
    }

    /// Saves the open ticket, prints it and moves on to the next ticket.
    ///
    /// A failed save leaves the current ticket open with its number. A failed
    /// print happens after the save, so the ticket is kept and the error names
    /// it for a reprint. Once the save succeeds the sale stands even if the
    /// next number cannot be drawn; the next `add_bet` or `confirm` retries it.
    pub fn confirm(&mut self) -> Result<ConfirmedTicket> {
        self.ensure_open_session()?;
        let ticket = self.session.prepare_confirmation()?;

        if let Err(e) = self.store.save_ticket(&ticket) {
            tracing::error!("❌ Failed to save ticket {}: {}", ticket.ticket_number, e);
            return Err(e.into());
        }
        self.session.confirm()?;
        tracing::info!(
            "✅ Ticket {} saved: {} bets, total {}",
            ticket.ticket_number,
            ticket.line_items.len(),
            ticket.total_amount
        );

        self.quick_amounts.record_all(
            ticket.line_items.iter().map(|item| item.wager_amount),
            Local::now().naive_local(),
        );

        let printed = self.printer.print_ticket(&ticket);
        if let Err(e) = self.start_next_session() {
            tracing::warn!(
                "⚠️ Ticket {} saved, next ticket not opened yet: {}",
                ticket.ticket_number,
                e
            );
        }

        match printed {
            Ok(()) => Ok(ticket),
            Err(source) => {
                tracing::error!(
                    "🖨️ Ticket {} saved but not printed: {}",
                    ticket.ticket_number,
                    source
                );
                Err(KioskError::PrintFailed {
                    ticket_number: ticket.ticket_number.to_string(),
                    source,
                })
            }
        }
    }

    /// 放棄目前的票，重新取號
    pub fn cancel(&mut self) -> Result<()> {
        tracing::info!(
            "Discarding ticket {} with {} bets",
            self.session.ticket_number(),
            self.session.line_items().len()
        );
        self.start_next_session()
    }

    pub fn reprint(
        &mut self,
        ticket_number: &TicketNumber,
        play_date: NaiveDate,
    ) -> Result<StoredTicket> {
        let stored = self
            .store
            .find_ticket(ticket_number, play_date)?
            .ok_or_else(|| PersistenceError::TicketNotFound {
                ticket_number: ticket_number.to_string(),
                play_date,
            })?;

        if !stored.is_active() {
            return Err(KioskError::InvalidInput {
                field: "ticket_number".to_string(),
                reason: format!("ticket {} is voided and cannot be reprinted", ticket_number),
            });
        }

        self.printer.print_ticket(&stored.ticket)?;
        tracing::info!("🖨️ Reprinted ticket {}", ticket_number);
        Ok(stored)
    }

    pub fn void_ticket(
        &mut self,
        ticket_number: &TicketNumber,
        play_date: NaiveDate,
        reason: &str,
    ) -> Result<StoredTicket> {
        if reason.trim().is_empty() {
            return Err(KioskError::InvalidInput {
                field: "reason".to_string(),
                reason: "a reason is required to void a ticket".to_string(),
            });
        }

        let voided = self.store.void_ticket(ticket_number, play_date, reason.trim())?;
        tracing::info!("🚫 Voided ticket {} ({})", ticket_number, reason.trim());
        Ok(voided)
    }

    /// 上一張票已存檔但未能取得新號碼時，在這裡補開新票
    fn ensure_open_session(&mut self) -> Result<()> {
        if self.session.is_open() {
            return Ok(());
        }
        self.start_next_session()
    }

    fn start_next_session(&mut self) -> Result<()> {
        let sequence = self.store.next_ticket_sequence()?;
        let next = self.session.clone().reset(sequence)?;
        tracing::debug!("Next ticket {}", next.ticket_number());
        self.session = next;
        Ok(())
    }

    pub fn session(&self) -> &TicketSession {
        &self.session
    }

    pub fn quick_amounts(&self) -> &QuickAmounts {
        &self.quick_amounts
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn printer(&self) -> &P {
        &self.printer
    }

    pub fn printer_mut(&mut self) -> &mut P {
        &mut self.printer
    }
}
