// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, Utc};
use rusqlite::Connection;
use rust_decimal::Decimal;
use tallybook::commands::{doctor, settings};
use tallybook::icons::{IconRegistry, DEFAULT_ICON};
use tallybook::ledger::Ledger;
use tallybook::models::{Transaction, TransactionType, UserSettings};
use tallybook::store::LedgerStore;
use tallybook::utils::fmt_money;
use tallybook::{cli, db};
use tempfile::tempdir;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn
}

#[test]
fn db_flag_is_global() {
    let matches = cli::build_cli().get_matches_from([
        "tallybook",
        "report",
        "month",
        "--db",
        "/tmp/ledger.sqlite",
        "--month",
        "2025-01",
    ]);
    assert_eq!(
        matches.get_one::<String>("db").map(String::as_str),
        Some("/tmp/ledger.sqlite")
    );
}

#[test]
fn json_and_jsonl_conflict() {
    let res = cli::build_cli().try_get_matches_from([
        "tallybook",
        "budget",
        "status",
        "--json",
        "--jsonl",
    ]);
    assert!(res.is_err());
}

#[test]
fn open_or_init_creates_file_at_override() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("ledger.sqlite");
    let conn = db::open_or_init(Some(path.as_path())).unwrap();
    assert!(path.exists());
    assert!(Ledger::new(&conn).transactions().is_empty());
}

#[test]
fn settings_set_enables_privacy_mask() {
    let conn = setup();
    let matches = cli::build_cli().get_matches_from([
        "tallybook",
        "settings",
        "set",
        "--currency",
        "usd",
        "--privacy",
        "on",
    ]);
    if let Some(("settings", settings_m)) = matches.subcommand() {
        settings::handle(&conn, settings_m).unwrap();
    } else {
        panic!("no settings subcommand");
    }
    let stored = Ledger::new(&conn).settings();
    assert_eq!(stored.currency, "USD");
    assert!(stored.privacy_mode);
    assert_eq!(stored.display_name, "User");
    assert!(!fmt_money(Decimal::from(42), &stored).contains("42"));

    let visible = UserSettings::default();
    assert_eq!(fmt_money("1234.5".parse().unwrap(), &visible), "BRL 1234.50");
}

#[test]
fn unknown_icons_render_as_default() {
    assert_eq!(IconRegistry::normalize("NoSuchIcon"), DEFAULT_ICON);
    assert_eq!(IconRegistry::normalize("PiggyBank"), "PiggyBank");
    assert_eq!(
        IconRegistry::glyph("NoSuchIcon"),
        IconRegistry::glyph(DEFAULT_ICON)
    );
}

#[test]
fn doctor_reports_dangling_and_mismatched_references() {
    let conn = setup();
    let store = LedgerStore::new(&conn);
    let tx = |id: &str, kind: TransactionType, category: &str| Transaction {
        id: id.into(),
        amount: Decimal::from(10),
        kind,
        category_id: category.into(),
        description: String::new(),
        date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        created_at: Utc::now(),
        savings_goal_id: None,
        savings_contribution: None,
    };
    // Raw store writes skip the ledger's checks, as an imported backup would.
    store
        .replace_all(&[
            tx("a", TransactionType::Expense, "vanished"),
            tx("b", TransactionType::Income, "food"),
            tx("c", TransactionType::Expense, "food"),
        ])
        .unwrap();

    let issues = doctor::scan(&Ledger::new(&conn));
    let kinds: Vec<&str> = issues.iter().map(|i| i.kind).collect();
    assert_eq!(kinds, ["tx_unknown_category", "tx_category_type_mismatch"]);
}
