use chrono::NaiveDate;
use lotto_kiosk::core::{SequenceSource, TicketRepository};
use lotto_kiosk::utils::validation::Validate;
use lotto_kiosk::{
    CsvVoucherPrinter, FileTicketStore, KioskConfig, KioskEngine, KioskError, QuickAmounts,
};
use rust_decimal_macros::dec;
use tempfile::TempDir;

fn create_test_config(temp_dir: &str) -> KioskConfig {
    // Windows 路徑的反斜線轉成正斜線，避免 TOML 解析問題
    let normalized_path = temp_dir.replace('\\', "/");
    let config_content = format!(
        r#"
[kiosk]
branch_id = "03"
branch_name = "Sucursal Norte"
data_dir = "{0}/data"

[bounds]
minimum = 1000
maximum = 50000

[report]
output_dir = "{0}/vouchers"

[quick_amounts]
max_values = 3

[[slots]]
code = "1"
description = "Sorteo 9 AM"
time = "09:00:00"

[[slots]]
code = "2"
description = "Sorteo 4 PM"
time = "16:00:00"
"#,
        normalized_path
    );

    let config = KioskConfig::from_toml_str(&config_content).unwrap();
    config.validate().unwrap();
    config
}

fn play_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
}

fn open(config: &KioskConfig) -> KioskEngine<FileTicketStore, CsvVoucherPrinter> {
    let printer = CsvVoucherPrinter::new(config.voucher_dir()).with_branch_name("Sucursal Norte");
    let quick_amounts =
        QuickAmounts::load(config.quick_amounts_path(), config.max_quick_amounts()).unwrap();

    KioskEngine::open(
        FileTicketStore::new(config.data_dir()),
        printer,
        config,
        config.branch_id(),
        play_date(),
    )
    .unwrap()
    .with_quick_amounts(quick_amounts)
}

#[test]
fn test_sell_two_tickets_end_to_end() {
    let temp_dir = TempDir::new().unwrap();
    let config = create_test_config(temp_dir.path().to_str().unwrap());
    let catalog = config.catalog();

    let mut engine = open(&config);
    engine
        .add_bet(catalog.line_item("00", "1", dec!(5000)).unwrap())
        .unwrap();
    engine
        .add_bet(catalog.line_item("31", "2", dec!(2500)).unwrap())
        .unwrap();
    let first = engine.confirm().unwrap();

    assert_eq!(first.ticket_number.as_str(), "00000001");
    assert_eq!(first.branch_id, "03");
    assert_eq!(first.total_amount, dec!(7500));
    assert_eq!(first.line_items[0].animal_label, "Ballena");
    assert_eq!(first.line_items[1].animal_label, "Capibara");
    assert_eq!(engine.session().ticket_number().as_str(), "00000002");

    engine
        .add_bet(catalog.line_item("5", "1", dec!(5000)).unwrap())
        .unwrap();
    let second = engine.confirm().unwrap();
    assert_eq!(second.ticket_number.as_str(), "00000002");

    engine.quick_amounts().save(config.quick_amounts_path()).unwrap();

    // 兩張票都在帳本中，且憑單已輸出
    let store = FileTicketStore::new(config.data_dir());
    assert_eq!(store.tickets_for(play_date()).unwrap().len(), 2);
    assert_eq!(store.next_ticket_sequence().unwrap(), 3);

    let voucher = std::fs::read_to_string(
        temp_dir.path().join("vouchers").join("voucher_00000001.csv"),
    )
    .unwrap();
    assert!(voucher.contains("03 Sucursal Norte"));
    assert!(voucher.contains("00,Ballena,1,Sorteo 9 AM,09:00:00,5000"));
    assert!(voucher.contains("total,2,7500"));

    let reloaded = QuickAmounts::load(config.quick_amounts_path(), 3).unwrap();
    assert_eq!(reloaded.top()[0], dec!(5000));
}

#[test]
fn test_restarted_kiosk_continues_sequence() {
    let temp_dir = TempDir::new().unwrap();
    let config = create_test_config(temp_dir.path().to_str().unwrap());
    let catalog = config.catalog();

    {
        let mut engine = open(&config);
        engine
            .add_bet(catalog.line_item("12", "1", dec!(1000)).unwrap())
            .unwrap();
        engine.confirm().unwrap();
    }

    let engine = open(&config);
    assert_eq!(engine.session().ticket_number().as_str(), "00000002");
}

#[test]
fn test_rejected_bets_do_not_reach_the_ledger() {
    let temp_dir = TempDir::new().unwrap();
    let config = create_test_config(temp_dir.path().to_str().unwrap());
    let catalog = config.catalog();
    let mut engine = open(&config);

    let err = engine
        .add_bet(catalog.line_item("12", "1", dec!(999)).unwrap())
        .unwrap_err();
    assert!(matches!(err, KioskError::Wager(_)));
    assert!(matches!(
        catalog.line_item("12", "7", dec!(1000)),
        Err(KioskError::UnknownSlot { .. })
    ));
    assert!(matches!(
        engine.confirm(),
        Err(KioskError::Confirmation(_))
    ));

    let store = FileTicketStore::new(config.data_dir());
    assert!(store.tickets_for(play_date()).unwrap().is_empty());
    assert_eq!(engine.session().ticket_number().as_str(), "00000001");
}

#[test]
fn test_void_and_reprint_against_file_store() {
    let temp_dir = TempDir::new().unwrap();
    let config = create_test_config(temp_dir.path().to_str().unwrap());
    let catalog = config.catalog();
    let mut engine = open(&config);

    engine
        .add_bet(catalog.line_item("27", "2", dec!(3000)).unwrap())
        .unwrap();
    let ticket = engine.confirm().unwrap();

    let voucher_path = temp_dir.path().join("vouchers").join("voucher_00000001.csv");
    std::fs::remove_file(&voucher_path).unwrap();
    engine.reprint(&ticket.ticket_number, play_date()).unwrap();
    assert!(voucher_path.exists());

    let other_day = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
    assert!(matches!(
        engine.void_ticket(&ticket.ticket_number, other_day, "wrong day"),
        Err(KioskError::Persistence(_))
    ));

    engine
        .void_ticket(&ticket.ticket_number, play_date(), "customer changed mind")
        .unwrap();

    let stored = FileTicketStore::new(config.data_dir())
        .find_ticket(&ticket.ticket_number, play_date())
        .unwrap()
        .unwrap();
    assert!(!stored.is_active());
}
