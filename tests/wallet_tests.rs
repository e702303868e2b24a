// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use tallybook::ledger::Ledger;
use tallybook::models::{NewWallet, NewWalletTransaction, WalletMovement, WalletPatch};
use tallybook::{cli, commands::wallets, db};

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn
}

fn run(conn: &Connection, args: &[&str]) {
    let mut argv = vec!["tallybook", "wallet"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("wallet", wallet_m)) = matches.subcommand() {
        wallets::handle(conn, wallet_m).unwrap();
    } else {
        panic!("no wallet subcommand");
    }
}

#[test]
fn credit_and_debit_feed_monthly_status() {
    let conn = setup();
    run(
        &conn,
        &["credit", "Marketing", "--amount", "400", "--date", "2025-05-02"],
    );
    run(
        &conn,
        &["debit", "marketing", "--amount", "100", "--date", "2025-05-20", "--desc", "Ads"],
    );
    run(
        &conn,
        &["debit", "marketing", "--amount", "999", "--date", "2025-06-01"],
    );

    let ledger = Ledger::new(&conn);
    assert_eq!(ledger.wallet_transactions().len(), 3);
    let balances = ledger.wallet_balances("2025-05".parse().unwrap());
    let marketing = balances.iter().find(|b| b.wallet_id == "marketing").unwrap();
    assert_eq!(marketing.credits, Decimal::from(400));
    assert_eq!(marketing.debits, Decimal::from(100));
    assert_eq!(marketing.balance, Decimal::from(300));
    assert_eq!(marketing.usage_percentage, Decimal::from(25));
}

#[test]
fn wallet_movement_needs_positive_amount_and_known_wallet() {
    let conn = setup();
    let ledger = Ledger::new(&conn);
    let movement = |wallet: &str, amount: i64| NewWalletTransaction {
        wallet_id: wallet.into(),
        amount: Decimal::from(amount),
        movement: WalletMovement::Credit,
        description: String::new(),
        date: NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
        linked_transaction_id: None,
    };
    assert!(ledger.record_wallet_transaction(movement("marketing", 0)).is_err());
    assert!(ledger.record_wallet_transaction(movement("nowhere", 10)).is_err());
    assert!(ledger.wallet_transactions().is_empty());
}

#[test]
fn deleting_a_wallet_keeps_its_movements() {
    let conn = setup();
    let ledger = Ledger::new(&conn);
    let wallet = ledger
        .add_wallet(NewWallet {
            name: "Travel".into(),
            icon: "Plane".into(),
            color: "#06B6D4".into(),
        })
        .unwrap();
    let renamed = ledger
        .update_wallet(
            &wallet.id,
            WalletPatch {
                name: Some("Trips".into()),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(renamed.name, "Trips");

    run(&conn, &["credit", "trips", "--amount", "50"]);
    run(&conn, &["rm", "Trips"]);

    assert!(ledger.wallets().iter().all(|w| w.id != wallet.id));
    assert_eq!(ledger.wallet_transactions().len(), 1);
    assert_eq!(ledger.wallet_transactions()[0].wallet_id, wallet.id);
}

#[test]
fn rejected_wallet_edit_leaves_row_untouched() {
    let conn = setup();
    let ledger = Ledger::new(&conn);
    let err = ledger.update_wallet(
        "marketing",
        WalletPatch {
            name: Some("  ".into()),
            color: Some("#000000".into()),
            ..Default::default()
        },
    );
    assert!(err.is_err());
    let stored = ledger.wallets().into_iter().find(|w| w.id == "marketing").unwrap();
    assert_eq!(stored.name, "Marketing");
    assert_eq!(stored.color, "#F97316");

    let recolored = ledger
        .update_wallet(
            "marketing",
            WalletPatch {
                color: Some("#000000".into()),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(recolored.name, "Marketing");
    assert_eq!(ledger.wallets().iter().find(|w| w.id == "marketing").unwrap().color, "#000000");
}
