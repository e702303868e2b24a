// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, Utc};
use rusqlite::Connection;
use rust_decimal::Decimal;
use tallybook::budget::{classify, evaluate_budget, BudgetStatus};
use tallybook::errors::FinanceError;
use tallybook::ledger::Ledger;
use tallybook::models::{FinancialGoal, NewFinancialGoal, Transaction, TransactionType};
use tallybook::{cli, commands::budgets, db};

fn d(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn
}

fn goal(limit: &str) -> FinancialGoal {
    FinancialGoal {
        id: "g1".into(),
        category_id: "food".into(),
        monthly_limit: d(limit),
        month: "2025-08".parse().unwrap(),
    }
}

fn expense(category: &str, amount: &str, on: &str) -> Transaction {
    Transaction {
        id: format!("{}-{}-{}", category, amount, on),
        amount: d(amount),
        kind: TransactionType::Expense,
        category_id: category.into(),
        description: String::new(),
        date: NaiveDate::parse_from_str(on, "%Y-%m-%d").unwrap(),
        created_at: Utc::now(),
        savings_goal_id: None,
        savings_contribution: None,
    }
}

#[test]
fn spent_equal_to_limit_is_near_limit_not_over() {
    let e = classify(d("500"), d("500"));
    assert_eq!(e.status, BudgetStatus::NearLimit);
    assert_eq!(e.percentage, d("100"));
}

#[test]
fn over_budget_percentage_is_capped() {
    let e = classify(d("600"), d("500"));
    assert_eq!(e.status, BudgetStatus::OverBudget);
    assert_eq!(e.percentage, d("100"));
    assert_eq!(e.spent, d("600"));
}

#[test]
fn eighty_percent_is_the_near_limit_boundary() {
    assert_eq!(classify(d("399.99"), d("500")).status, BudgetStatus::OnTrack);
    assert_eq!(classify(d("400"), d("500")).status, BudgetStatus::NearLimit);
    assert_eq!(classify(Decimal::ZERO, d("500")).status, BudgetStatus::OnTrack);
}

#[test]
fn non_positive_limit_does_not_divide_by_zero() {
    let idle = classify(Decimal::ZERO, Decimal::ZERO);
    assert_eq!(idle.status, BudgetStatus::OnTrack);
    assert_eq!(idle.percentage, Decimal::ZERO);
    let spent = classify(d("1"), Decimal::ZERO);
    assert_eq!(spent.status, BudgetStatus::OverBudget);
    assert_eq!(spent.percentage, d("100"));
}

#[test]
fn tiny_limit_with_huge_spend_stays_capped() {
    let e = classify(d("1000000000000000000000"), d("0.0000001"));
    assert_eq!(e.status, BudgetStatus::OverBudget);
    assert_eq!(e.percentage, d("100"));
}

#[test]
fn evaluation_ignores_other_categories_types_and_months() {
    let mut income = expense("food", "1000", "2025-08-10");
    income.kind = TransactionType::Income;
    let txns = vec![
        expense("food", "120", "2025-08-01"),
        expense("food", "80", "2025-08-31"),
        expense("food", "500", "2025-09-01"),
        expense("bills", "500", "2025-08-15"),
        income,
    ];
    let e = evaluate_budget(&goal("500"), &txns);
    assert_eq!(e.spent, d("200"));
    assert_eq!(e.percentage, d("40"));
    assert_eq!(e.status, BudgetStatus::OnTrack);
}

#[test]
fn budget_requires_positive_limit_and_expense_category() {
    let conn = setup();
    let ledger = Ledger::new(&conn);
    let month = "2025-08".parse().unwrap();
    let err = ledger
        .set_budget(NewFinancialGoal {
            category_id: "food".into(),
            monthly_limit: Decimal::ZERO,
            month,
        })
        .unwrap_err();
    assert!(matches!(err, FinanceError::Validation { field: "monthlyLimit", .. }));

    let err = ledger
        .set_budget(NewFinancialGoal {
            category_id: "salary".into(),
            monthly_limit: d("100"),
            month,
        })
        .unwrap_err();
    assert!(matches!(err, FinanceError::Validation { field: "categoryId", .. }));
    assert!(ledger.financial_goals().is_empty());
}

#[test]
fn cli_budget_set_replaces_existing_limit() {
    let conn = setup();
    for limit in ["300", "450"] {
        let matches = cli::build_cli().get_matches_from([
            "tallybook",
            "budget",
            "set",
            "--category",
            "Food",
            "--limit",
            limit,
            "--month",
            "2025-08",
        ]);
        if let Some(("budget", budget_m)) = matches.subcommand() {
            budgets::handle(&conn, budget_m).unwrap();
        } else {
            panic!("no budget subcommand");
        }
    }

    let goals = Ledger::new(&conn).financial_goals();
    assert_eq!(goals.len(), 1);
    assert_eq!(goals[0].category_id, "food");
    assert_eq!(goals[0].monthly_limit, d("450"));
}

#[test]
fn overview_lists_only_requested_month() {
    let conn = setup();
    let ledger = Ledger::new(&conn);
    for (category, month) in [("food", "2025-08"), ("bills", "2025-08"), ("food", "2025-09")] {
        ledger
            .set_budget(NewFinancialGoal {
                category_id: category.into(),
                monthly_limit: d("100"),
                month: month.parse().unwrap(),
            })
            .unwrap();
    }
    let lines = ledger.budget_overview("2025-08".parse().unwrap());
    let categories: Vec<&str> = lines.iter().map(|l| l.goal.category_id.as_str()).collect();
    assert_eq!(categories, ["food", "bills"]);
}
