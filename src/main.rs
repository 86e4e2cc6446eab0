use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::Parser;
use lotto_kiosk::config::Command;
use lotto_kiosk::utils::error::ErrorSeverity;
use lotto_kiosk::utils::{logger, validation::Validate};
use lotto_kiosk::{
    CliConfig, CsvVoucherPrinter, FileTicketStore, KioskConfig, KioskEngine, KioskError,
    QuickAmounts,
};

fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting lotto-kiosk");
    tracing::debug!("CLI config: {:?}", cli);

    let config = KioskConfig::from_file(&cli.config)
        .with_context(|| format!("failed to load config file '{}'", cli.config))?;

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    if let Err(e) = run(cli.command, &config) {
        tracing::error!(
            "❌ {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 2,
            ErrorSeverity::Medium => 3,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 4,
        };
        std::process::exit(exit_code);
    }

    Ok(())
}

fn run(command: Command, config: &KioskConfig) -> lotto_kiosk::Result<()> {
    match command {
        Command::Sell { bets, date } => {
            let catalog = config.catalog();
            let mut engine = open_engine(config, date)?;

            for bet in &bets {
                let item = catalog.line_item(&bet.animal_code, &bet.slot_code, bet.amount)?;
                engine.add_bet(item)?;
            }

            let confirmed = engine.confirm();
            // 即使列印失敗，票已存檔，常用金額仍要保存
            engine.quick_amounts().save(config.quick_amounts_path())?;
            let ticket = confirmed?;

            println!("✅ Ticket {} sold", ticket.ticket_number);
            for item in &ticket.line_items {
                println!(
                    "   {:>2} {:<10} {} {:>12}",
                    item.game_code, item.animal_label, item.slot_description, item.wager_amount
                );
            }
            println!("   Total: {}", ticket.total_amount);
        }
        Command::Void {
            ticket,
            date,
            reason,
        } => {
            let mut engine = open_engine(config, date)?;
            let voided = engine.void_ticket(&ticket, play_date(date), &reason)?;
            println!(
                "🚫 Ticket {} voided (total {})",
                voided.ticket.ticket_number, voided.ticket.total_amount
            );
        }
        Command::Reprint { ticket, date } => {
            let mut engine = open_engine(config, date)?;
            engine.reprint(&ticket, play_date(date))?;
            println!("🖨️ Ticket {} reprinted", ticket);
        }
        Command::Animals => {
            for animal in config.catalog().animals() {
                println!("{:>2}  {}", animal.code, animal.name);
            }
        }
        Command::Slots => {
            let catalog = config.catalog();
            for slot in catalog.active_slots() {
                println!(
                    "{:>3}  {}  {}",
                    slot.code,
                    slot.time.format("%H:%M"),
                    slot.description
                );
            }
        }
        Command::QuickAmounts { clear } => {
            let path = config.quick_amounts_path();
            let mut amounts = QuickAmounts::load(&path, config.max_quick_amounts())?;
            if clear {
                amounts.clear();
                amounts.save(&path)?;
                println!("Quick amounts cleared");
            } else {
                for amount in amounts.top() {
                    println!("{}", amount);
                }
            }
        }
    }

    Ok(())
}

fn play_date(date: Option<NaiveDate>) -> NaiveDate {
    date.unwrap_or_else(|| Local::now().date_naive())
}

fn open_engine(
    config: &KioskConfig,
    date: Option<NaiveDate>,
) -> Result<KioskEngine<FileTicketStore, CsvVoucherPrinter>, KioskError> {
    let store = FileTicketStore::new(config.data_dir());

    let mut printer = CsvVoucherPrinter::new(config.voucher_dir());
    if let Some(name) = config.branch_name() {
        printer = printer.with_branch_name(name);
    }

    let quick_amounts =
        QuickAmounts::load(config.quick_amounts_path(), config.max_quick_amounts())?;

    let engine = KioskEngine::open(store, printer, config, config.branch_id(), play_date(date))?;
    Ok(engine.with_quick_amounts(quick_amounts))
}
