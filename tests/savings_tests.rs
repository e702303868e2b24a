// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, Utc};
use rusqlite::Connection;
use rust_decimal::Decimal;
use tallybook::errors::{self, FinanceError};
use tallybook::ledger::Ledger;
use tallybook::models::{
    NewSavingsGoal, NewTransaction, SavingsGoal, SavingsGoalPatch, TransactionType,
};
use tallybook::savings::{portfolio_summary, progress};
use tallybook::store::KvBackend;
use tallybook::{cli, commands::transactions, db};

fn d(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn
}

fn income(amount: &str, goal: Option<&str>, contribution: Option<&str>) -> NewTransaction {
    NewTransaction {
        amount: d(amount),
        kind: TransactionType::Income,
        category_id: "salary".into(),
        description: "Paycheck".into(),
        date: NaiveDate::from_ymd_opt(2025, 3, 5).unwrap(),
        savings_goal_id: goal.map(str::to_string),
        savings_contribution: contribution.map(d),
    }
}

fn emergency_fund<B: KvBackend>(ledger: &Ledger<B>) -> SavingsGoal {
    ledger
        .add_savings_goal(NewSavingsGoal {
            name: "Emergency fund".into(),
            target_amount: d("1000"),
            deadline: None,
        })
        .unwrap()
}

#[test]
fn contribution_is_added_and_transaction_keeps_full_amount() {
    let conn = setup();
    let ledger = Ledger::new(&conn);
    let goal = emergency_fund(&ledger);
    ledger
        .deposit_to_savings_goal(&goal.id, d("300"))
        .unwrap();

    let txn = ledger
        .record_transaction(income("500", Some(&goal.id), Some("200")))
        .unwrap();

    assert_eq!(txn.amount, d("500"));
    let stored = ledger.transactions();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].amount, d("500"));
    assert_eq!(stored[0].savings_contribution, Some(d("200")));
    let goal = ledger.store().find::<SavingsGoal>(&goal.id).unwrap();
    assert_eq!(goal.current_amount, d("500"));

    let stats = ledger.monthly_stats("2025-03".parse().unwrap());
    assert_eq!(stats.total_income, d("500"));
}

#[test]
fn contribution_larger_than_amount_is_rejected_before_writing() {
    let conn = setup();
    let ledger = Ledger::new(&conn);
    let goal = emergency_fund(&ledger);
    let err = ledger
        .record_transaction(income("100", Some(&goal.id), Some("150")))
        .unwrap_err();
    assert!(matches!(err, FinanceError::Validation { field: "savingsContribution", .. }));
    assert!(ledger.transactions().is_empty());
    assert_eq!(ledger.savings_goals()[0].current_amount, Decimal::ZERO);
}

#[test]
fn only_income_may_contribute() {
    let conn = setup();
    let ledger = Ledger::new(&conn);
    let goal = emergency_fund(&ledger);
    let mut new = income("100", Some(&goal.id), Some("10"));
    new.kind = TransactionType::Expense;
    new.category_id = "food".into();
    assert!(ledger.record_transaction(new).is_err());
    assert!(ledger.transactions().is_empty());
}

#[test]
fn unknown_goal_is_rejected() {
    let conn = setup();
    let ledger = Ledger::new(&conn);
    let err = ledger
        .record_transaction(income("100", Some("missing"), Some("10")))
        .unwrap_err();
    assert!(matches!(err, FinanceError::NotFound { .. }));
    assert!(ledger.transactions().is_empty());
}

#[test]
fn zero_contribution_leaves_goal_untouched() {
    let conn = setup();
    let ledger = Ledger::new(&conn);
    let goal = emergency_fund(&ledger);
    ledger
        .record_transaction(income("100", Some(&goal.id), Some("0")))
        .unwrap();
    assert_eq!(ledger.savings_goals()[0].current_amount, Decimal::ZERO);
    assert_eq!(ledger.transactions().len(), 1);
}

/// Backend whose savings-goal table rejects writes after the first one.
struct ReadOnlyGoals<'a> {
    conn: &'a Connection,
    writes_allowed: std::cell::Cell<u32>,
}

impl KvBackend for ReadOnlyGoals<'_> {
    fn get_item(&self, key: &str) -> errors::Result<Option<String>> {
        self.conn.get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> errors::Result<()> {
        if key == "savingsGoals" {
            let left = self.writes_allowed.get();
            if left == 0 {
                return Err(FinanceError::Storage(rusqlite::Error::InvalidQuery));
            }
            self.writes_allowed.set(left - 1);
        }
        self.conn.set_item(key, value)
    }
}

#[test]
fn failed_contribution_is_reported_not_dropped() {
    let conn = setup();
    let backend = ReadOnlyGoals {
        conn: &conn,
        writes_allowed: std::cell::Cell::new(1),
    };
    let ledger = Ledger::new(backend);
    let goal = emergency_fund(&ledger);

    let err = ledger
        .record_transaction(income("500", Some(&goal.id), Some("200")))
        .unwrap_err();
    match err {
        FinanceError::ContributionNotApplied { transaction_id, .. } => {
            let stored = ledger.transactions();
            assert_eq!(stored.len(), 1);
            assert_eq!(stored[0].id, transaction_id);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(ledger.savings_goals()[0].current_amount, Decimal::ZERO);
}

#[test]
fn deposit_must_be_positive_and_goal_must_exist() {
    let conn = setup();
    let ledger = Ledger::new(&conn);
    let goal = emergency_fund(&ledger);
    assert!(ledger.deposit_to_savings_goal(&goal.id, Decimal::ZERO).is_err());
    assert!(ledger.deposit_to_savings_goal(&goal.id, d("-5")).is_err());
    assert!(matches!(
        ledger.deposit_to_savings_goal("nope", d("5")),
        Err(FinanceError::NotFound { .. })
    ));
    let goal = ledger.deposit_to_savings_goal(&goal.id, d("5")).unwrap();
    assert_eq!(goal.current_amount, d("5"));
}

#[test]
fn edit_may_set_current_amount_but_not_below_zero() {
    let conn = setup();
    let ledger = Ledger::new(&conn);
    let goal = emergency_fund(&ledger);
    let updated = ledger
        .update_savings_goal(
            &goal.id,
            SavingsGoalPatch {
                current_amount: Some(d("1200")),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(updated.current_amount, d("1200"));

    let p = progress(&updated);
    assert_eq!(p.remaining, Decimal::ZERO);
    assert_eq!(p.percentage, d("100"));

    assert!(ledger
        .update_savings_goal(
            &goal.id,
            SavingsGoalPatch {
                current_amount: Some(d("-1")),
                ..Default::default()
            },
        )
        .is_err());
    assert!(ledger
        .update_savings_goal(
            &goal.id,
            SavingsGoalPatch {
                target_amount: Some(Decimal::ZERO),
                ..Default::default()
            },
        )
        .is_err());
}

#[test]
fn portfolio_summary_totals_every_goal() {
    let now = Utc::now();
    let goal = |current: &str, target: &str| SavingsGoal {
        id: format!("{}/{}", current, target),
        name: "g".into(),
        target_amount: d(target),
        current_amount: d(current),
        deadline: None,
        created_at: now,
    };
    let summary = portfolio_summary(&[goal("250", "1000"), goal("750", "1000")]);
    assert_eq!(summary.total_saved, d("1000"));
    assert_eq!(summary.total_target, d("2000"));
    assert_eq!(summary.percentage, d("50"));
    assert_eq!(portfolio_summary(&[]).percentage, Decimal::ZERO);
}

#[test]
fn cli_tx_add_with_goal_by_name() {
    let conn = setup();
    let ledger = Ledger::new(&conn);
    emergency_fund(&ledger);

    let matches = cli::build_cli().get_matches_from([
        "tallybook",
        "tx",
        "add",
        "--date",
        "2025-03-05",
        "--type",
        "income",
        "--category",
        "Salary",
        "--amount",
        "500",
        "--goal",
        "emergency fund",
        "--contribution",
        "200",
    ]);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        transactions::handle(&conn, tx_m).unwrap();
    } else {
        panic!("no tx subcommand");
    }
    assert_eq!(ledger.savings_goals()[0].current_amount, d("200"));
    assert_eq!(ledger.transactions()[0].amount, d("500"));
}
