use crate::core::TicketNumber;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::str::FromStr;

#[derive(Debug, Parser)]
#[command(name = "lotto-kiosk")]
#[command(about = "Lotto animalito betting kiosk")]
pub struct CliConfig {
    /// Path to the kiosk TOML configuration file
    #[arg(short, long, default_value = "kiosk.toml")]
    pub config: String,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sell one ticket made of one or more bets
    Sell {
        /// Bet as ANIMAL:SLOT:AMOUNT, e.g. 12:1:5000 (repeatable)
        #[arg(long = "bet", required = true, value_parser = parse_bet)]
        bets: Vec<BetArg>,

        /// Play date (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Void a sold ticket
    Void {
        #[arg(long, value_parser = parse_ticket_number)]
        ticket: TicketNumber,

        #[arg(long)]
        date: Option<NaiveDate>,

        #[arg(long)]
        reason: String,
    },

    /// Print the voucher of a sold ticket again
    Reprint {
        #[arg(long, value_parser = parse_ticket_number)]
        ticket: TicketNumber,

        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// List the roulette animals
    Animals,

    /// List the active draw slots
    Slots,

    /// Show the most played wager amounts
    QuickAmounts {
        #[arg(long, help = "Forget all recorded amounts")]
        clear: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BetArg {
    pub animal_code: String,
    pub slot_code: String,
    pub amount: Decimal,
}

pub fn parse_bet(value: &str) -> Result<BetArg, String> {
    let parts: Vec<&str> = value.split(':').map(str::trim).collect();
    let [animal_code, slot_code, amount] = parts.as_slice() else {
        return Err(format!("expected ANIMAL:SLOT:AMOUNT, got '{}'", value));
    };

    if animal_code.is_empty() || slot_code.is_empty() {
        return Err(format!("animal and slot are required in '{}'", value));
    }

    let amount = Decimal::from_str(amount)
        .map_err(|e| format!("invalid amount '{}': {}", amount, e))?;

    Ok(BetArg {
        animal_code: animal_code.to_string(),
        slot_code: slot_code.to_string(),
        amount,
    })
}

/// 接受 "42" 或 "00000042"
pub fn parse_ticket_number(value: &str) -> Result<TicketNumber, String> {
    let sequence: i64 = value
        .trim()
        .parse()
        .map_err(|_| format!("invalid ticket number '{}'", value))?;
    TicketNumber::from_sequence(sequence).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_bet() {
        let bet = parse_bet("00:1:5000").unwrap();
        assert_eq!(bet.animal_code, "00");
        assert_eq!(bet.slot_code, "1");
        assert_eq!(bet.amount, dec!(5000));

        assert_eq!(parse_bet(" 5 : 2 : 1500.50 ").unwrap().amount, dec!(1500.50));
    }

    #[test]
    fn test_parse_bet_rejects_malformed() {
        assert!(parse_bet("5:5000").is_err());
        assert!(parse_bet(":1:5000").is_err());
        assert!(parse_bet("5:1:abc").is_err());
    }

    #[test]
    fn test_parse_ticket_number() {
        assert_eq!(parse_ticket_number("42").unwrap().as_str(), "00000042");
        assert_eq!(parse_ticket_number("00000042").unwrap().as_str(), "00000042");
        assert!(parse_ticket_number("0").is_err());
        assert!(parse_ticket_number("abc").is_err());
    }

    #[test]
    fn test_cli_parses_sell() {
        let cli = CliConfig::try_parse_from([
            "lotto-kiosk",
            "--config",
            "kiosk.toml",
            "sell",
            "--bet",
            "12:1:5000",
            "--bet",
            "0:2:1000",
            "--date",
            "2026-10-17",
        ])
        .unwrap();

        match cli.command {
            Command::Sell { bets, date } => {
                assert_eq!(bets.len(), 2);
                assert_eq!(date, NaiveDate::from_ymd_opt(2026, 10, 17));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
