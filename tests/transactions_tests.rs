// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use tallybook::ledger::Ledger;
use tallybook::models::{NewFinancialGoal, NewTransaction, TransactionPatch, TransactionType};
use tallybook::{
    cli,
    commands::{budgets, reports, transactions},
    db,
};

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    let ledger = Ledger::new(&conn);
    for i in 1..=3 {
        ledger
            .record_transaction(NewTransaction {
                amount: "10".parse().unwrap(),
                kind: TransactionType::Expense,
                category_id: "food".into(),
                description: format!("Lunch {}", i),
                date: NaiveDate::from_ymd_opt(2025, 1, i).unwrap(),
                savings_goal_id: None,
                savings_contribution: None,
            })
            .unwrap();
    }
    ledger
        .record_transaction(NewTransaction {
            amount: "2500".parse().unwrap(),
            kind: TransactionType::Income,
            category_id: "salary".into(),
            description: "January pay".into(),
            date: NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
            savings_goal_id: None,
            savings_contribution: None,
        })
        .unwrap();
    conn
}

fn list_rows(conn: &Connection, args: &[&str]) -> Vec<transactions::TransactionRow> {
    let mut argv = vec!["tallybook", "tx", "list"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        if let Some(("list", list_m)) = tx_m.subcommand() {
            transactions::query_rows(conn, list_m).unwrap()
        } else {
            panic!("no list subcommand");
        }
    } else {
        panic!("no tx subcommand");
    }
}

#[test]
fn list_limit_respected() {
    let conn = setup();
    let rows = list_rows(&conn, &["--month", "2025-01", "--limit", "2"]);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].date, "2025-01-03");
    assert_eq!(rows[0].category, "Food");
}

#[test]
fn list_filters_by_type_and_search() {
    let conn = setup();
    let income = list_rows(&conn, &["--type", "income"]);
    assert_eq!(income.len(), 1);
    assert_eq!(income[0].description, "January pay");

    let lunch = list_rows(&conn, &["--search", "lunch 2"]);
    assert_eq!(lunch.len(), 1);
    assert_eq!(lunch[0].date, "2025-01-02");

    let by_category = list_rows(&conn, &["--search", "SALARY"]);
    assert_eq!(by_category.len(), 1);
}

#[test]
fn cli_add_rejects_category_of_other_type() {
    let conn = setup();
    let matches = cli::build_cli().get_matches_from([
        "tallybook",
        "tx",
        "add",
        "--date",
        "2025-01-09",
        "--type",
        "expense",
        "--category",
        "salary",
        "--amount",
        "10",
    ]);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        assert!(transactions::handle(&conn, tx_m).is_err());
    } else {
        panic!("no tx subcommand");
    }
    assert_eq!(Ledger::new(&conn).transactions().len(), 4);
}

#[test]
fn edit_revalidates_and_rm_deletes() {
    let conn = setup();
    let ledger = Ledger::new(&conn);
    let target = ledger.transactions()[0].clone();

    assert!(ledger
        .update_transaction(
            &target.id,
            TransactionPatch {
                amount: Some("-3".parse().unwrap()),
                ..Default::default()
            },
        )
        .is_err());

    let updated = ledger
        .update_transaction(
            &target.id,
            TransactionPatch {
                amount: Some("3000".parse().unwrap()),
                description: Some("Raise".into()),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(updated.description, "Raise");
    assert_eq!(ledger.transactions()[0].amount, "3000".parse::<Decimal>().unwrap());

    let matches = cli::build_cli().get_matches_from(["tallybook", "tx", "rm", &target.id]);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        transactions::handle(&conn, tx_m).unwrap();
    } else {
        panic!("no tx subcommand");
    }
    assert_eq!(ledger.transactions().len(), 3);
    assert!(ledger.delete_transaction(&target.id).is_err());
}

#[test]
fn huge_amount_keeps_reports_running() {
    let conn = setup();
    Ledger::new(&conn)
        .set_budget(NewFinancialGoal {
            category_id: "food".into(),
            monthly_limit: "0.01".parse().unwrap(),
            month: "2025-01".parse().unwrap(),
        })
        .unwrap();
    let matches = cli::build_cli().get_matches_from([
        "tallybook",
        "tx",
        "add",
        "--date",
        "2025-01-15",
        "--type",
        "expense",
        "--category",
        "food",
        "--amount",
        "1000000000000000000000000000",
    ]);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        transactions::handle(&conn, tx_m).unwrap();
    } else {
        panic!("no tx subcommand");
    }

    let report = cli::build_cli().get_matches_from([
        "tallybook", "report", "month", "--month", "2025-01", "--json",
    ]);
    if let Some(("report", report_m)) = report.subcommand() {
        reports::handle(&conn, report_m).unwrap();
    } else {
        panic!("no report subcommand");
    }

    let year = cli::build_cli().get_matches_from(["tallybook", "report", "year", "--year", "2025"]);
    if let Some(("report", report_m)) = year.subcommand() {
        reports::handle(&conn, report_m).unwrap();
    } else {
        panic!("no report subcommand");
    }

    let status = cli::build_cli().get_matches_from([
        "tallybook", "budget", "status", "--month", "2025-01",
    ]);
    if let Some(("budget", budget_m)) = status.subcommand() {
        budgets::handle(&conn, budget_m).unwrap();
    } else {
        panic!("no budget subcommand");
    }
}
