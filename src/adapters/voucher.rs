use crate::core::{ConfirmedTicket, ReportSink, TicketNumber};
use crate::utils::error::ReportError;
use csv::WriterBuilder;
use std::fs;
use std::path::PathBuf;

/// Writes one CSV voucher per confirmed ticket.
#[derive(Debug, Clone)]
pub struct CsvVoucherPrinter {
    output_dir: PathBuf,
    branch_name: Option<String>,
}

impl CsvVoucherPrinter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            branch_name: None,
        }
    }

    pub fn with_branch_name(mut self, branch_name: impl Into<String>) -> Self {
        self.branch_name = Some(branch_name.into());
        self
    }

    pub fn voucher_path(&self, ticket_number: &TicketNumber) -> PathBuf {
        self.output_dir.join(format!("voucher_{}.csv", ticket_number))
    }

    fn render(&self, ticket: &ConfirmedTicket) -> Result<Vec<u8>, ReportError> {
        // 票頭、投注明細、合計三段欄位數不同
        let mut writer = WriterBuilder::new().flexible(true).from_writer(vec![]);

        let branch = match &self.branch_name {
            Some(name) => format!("{} {}", ticket.branch_id, name),
            None => ticket.branch_id.clone(),
        };
        writer.write_record(["ticket_number", "branch", "play_date", "created_at"])?;
        writer.write_record([
            ticket.ticket_number.to_string(),
            branch,
            ticket.play_date.format("%Y-%m-%d").to_string(),
            ticket.created_at.format("%H:%M:%S").to_string(),
        ])?;

        writer.write_record(["game_code", "animal", "slot_code", "slot", "slot_time", "wager"])?;
        for item in &ticket.line_items {
            let slot_time = item
                .slot_time
                .map(|time| time.format("%H:%M:%S").to_string())
                .unwrap_or_default();
            writer.write_record([
                item.game_code.clone(),
                item.animal_label.clone(),
                item.slot_code.clone(),
                item.slot_description.clone(),
                slot_time,
                item.wager_amount.to_string(),
            ])?;
        }

        writer.write_record([
            "total".to_string(),
            ticket.line_items.len().to_string(),
            ticket.total_amount.to_string(),
        ])?;

        writer
            .into_inner()
            .map_err(|e| ReportError::Io(e.into_error()))
    }
}

impl ReportSink for CsvVoucherPrinter {
    fn print_ticket(&mut self, ticket: &ConfirmedTicket) -> Result<(), ReportError> {
        let data = self.render(ticket)?;

        fs::create_dir_all(&self.output_dir)?;
        let path = self.voucher_path(&ticket.ticket_number);
        fs::write(&path, data)?;

        tracing::info!(
            "🖨️ Voucher for ticket {} written to {}",
            ticket.ticket_number,
            path.display()
        );
        Ok(())
    }
}
