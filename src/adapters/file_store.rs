use crate::core::{
    ConfirmedTicket, SequenceSource, StoredTicket, TicketNumber, TicketRepository, TicketStatus,
};
use crate::utils::error::PersistenceError;
use chrono::{Local, NaiveDate};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

const LEDGER_FILE: &str = "tickets.json";
const LOCK_FILE: &str = "tickets.lock";

#[derive(Debug, Default, Serialize, Deserialize)]
struct Ledger {
    tickets: Vec<StoredTicket>,
}

/// JSON ticket ledger kept in the kiosk data directory.
///
/// Each write replaces the whole ledger through a temp file and a rename, so
/// a ticket header never lands without its line items. Saves and voids hold an
/// exclusive lock on `tickets.lock` for the whole read-modify-write, so several
/// processes can share one data directory without losing each other's tickets.
/// Reads take no lock and always see a complete ledger.
#[derive(Debug, Clone)]
pub struct FileTicketStore {
    base_path: PathBuf,
}

impl FileTicketStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn ledger_path(&self) -> PathBuf {
        self.base_path.join(LEDGER_FILE)
    }

    /// 列出某一天的所有票 (含已作廢)
    pub fn tickets_for(
        &self,
        play_date: NaiveDate,
    ) -> Result<Vec<StoredTicket>, PersistenceError> {
        let ledger = self.read_ledger()?;
        Ok(ledger
            .tickets
            .into_iter()
            .filter(|stored| stored.ticket.play_date == play_date)
            .collect())
    }

    /// 取得帳本的獨占鎖，File 被 drop 時自動釋放
    fn lock(&self) -> Result<File, PersistenceError> {
        fs::create_dir_all(&self.base_path)?;
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(self.base_path.join(LOCK_FILE))?;
        file.lock_exclusive()?;
        Ok(file)
    }

    fn read_ledger(&self) -> Result<Ledger, PersistenceError> {
        let path = self.ledger_path();
        if !path.exists() {
            return Ok(Ledger::default());
        }

        let data = fs::read(&path)?;
        Ok(serde_json::from_slice(&data)?)
    }

    fn write_ledger(&self, ledger: &Ledger) -> Result<(), PersistenceError> {
        fs::create_dir_all(&self.base_path)?;

        let path = self.ledger_path();
        let temp_path = path.with_extension("json.tmp");
        let mut temp_file = File::create(&temp_path)?;
        temp_file.write_all(&serde_json::to_vec_pretty(ledger)?)?;
        temp_file.sync_all()?;
        fs::rename(&temp_path, &path)?;

        tracing::debug!("Ledger written: {} tickets", ledger.tickets.len());
        Ok(())
    }
}

impl SequenceSource for FileTicketStore {
    fn next_ticket_sequence(&self) -> Result<i64, PersistenceError> {
        let ledger = self.read_ledger()?;
        let max = ledger
            .tickets
            .iter()
            .filter_map(|stored| stored.ticket.ticket_number.sequence())
            .max()
            .unwrap_or(0);
        Ok(max + 1)
    }
}

impl TicketRepository for FileTicketStore {
    fn save_ticket(&mut self, ticket: &ConfirmedTicket) -> Result<(), PersistenceError> {
        let _lock = self.lock()?;
        let mut ledger = self.read_ledger()?;
        if ledger
            .tickets
            .iter()
            .any(|stored| stored.ticket.ticket_number == ticket.ticket_number)
        {
            return Err(PersistenceError::DuplicateTicket {
                ticket_number: ticket.ticket_number.to_string(),
            });
        }

        ledger.tickets.push(StoredTicket {
            ticket: ticket.clone(),
            status: TicketStatus::Active,
        });
        self.write_ledger(&ledger)?;

        tracing::info!(
            "💾 Stored ticket {} ({} bets) in {}",
            ticket.ticket_number,
            ticket.line_items.len(),
            self.ledger_path().display()
        );
        Ok(())
    }

    fn find_ticket(
        &self,
        ticket_number: &TicketNumber,
        play_date: NaiveDate,
    ) -> Result<Option<StoredTicket>, PersistenceError> {
        let ledger = self.read_ledger()?;
        Ok(ledger.tickets.into_iter().find(|stored| {
            &stored.ticket.ticket_number == ticket_number && stored.ticket.play_date == play_date
        }))
    }

    fn void_ticket(
        &mut self,
        ticket_number: &TicketNumber,
        play_date: NaiveDate,
        reason: &str,
    ) -> Result<StoredTicket, PersistenceError> {
        let _lock = self.lock()?;
        let mut ledger = self.read_ledger()?;
        let stored = ledger
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
        let voided = stored.clone();
        self.write_ledger(&ledger)?;
        Ok(voided)
    }
}
