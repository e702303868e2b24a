// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::Ledger;
use crate::models::{resolve_category, FinancialGoalPatch, NewFinancialGoal, TransactionType};
use crate::utils::{
    category_ref, fmt_money, fmt_percent, maybe_print_json, month_or_current, parse_decimal,
    parse_month, pretty_table, required,
};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let ledger = Ledger::new(conn);
    match m.subcommand() {
        Some(("set", sub)) => set(&ledger, sub)?,
        Some(("list", sub)) => list(&ledger, sub)?,
        Some(("status", sub)) => status(&ledger, sub)?,
        Some(("rm", sub)) => {
            let id = required(sub, "ID")?;
            ledger.delete_budget(id)?;
            println!("Removed budget {}", id);
        }
        _ => {}
    }
    Ok(())
}

/// One budget per category and month: setting it again replaces the limit.
fn set(ledger: &Ledger<&Connection>, sub: &clap::ArgMatches) -> Result<()> {
    let month = month_or_current(sub)?;
    let limit = parse_decimal(required(sub, "limit")?)?;
    let category = category_ref(
        &ledger.categories(),
        required(sub, "category")?,
        Some(TransactionType::Expense),
    )?;

    let existing = ledger
        .financial_goals()
        .into_iter()
        .find(|g| g.category_id == category.id && g.month == month);
    let goal = match existing {
        Some(goal) => ledger.update_budget(
            &goal.id,
            FinancialGoalPatch {
                monthly_limit: Some(limit),
                ..Default::default()
            },
        )?,
        None => ledger.set_budget(NewFinancialGoal {
            category_id: category.id.clone(),
            monthly_limit: limit,
            month,
        })?,
    };
    println!(
        "Budget set for {} / {} = {}",
        goal.month,
        category.name,
        fmt_money(goal.monthly_limit, &ledger.settings())
    );
    Ok(())
}

fn list(ledger: &Ledger<&Connection>, sub: &clap::ArgMatches) -> Result<()> {
    let month = sub
        .get_one::<String>("month")
        .map(|s| parse_month(s))
        .transpose()?;
    let mut goals = ledger.financial_goals();
    if let Some(month) = month {
        goals.retain(|g| g.month == month);
    }
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &goals)? {
        let categories = ledger.categories();
        let settings = ledger.settings();
        let rows = goals
            .iter()
            .map(|g| {
                vec![
                    g.month.to_string(),
                    resolve_category(&categories, &g.category_id, TransactionType::Expense).name,
                    fmt_money(g.monthly_limit, &settings),
                    g.id.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Month", "Category", "Limit", "Id"], rows)
        );
    }
    Ok(())
}

fn status(ledger: &Ledger<&Connection>, sub: &clap::ArgMatches) -> Result<()> {
    let month = month_or_current(sub)?;
    let lines = ledger.budget_overview(month);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &lines)? {
        let categories = ledger.categories();
        let settings = ledger.settings();
        let rows = lines
            .iter()
            .map(|line| {
                vec![
                    resolve_category(&categories, &line.goal.category_id, TransactionType::Expense)
                        .name,
                    fmt_money(line.goal.monthly_limit, &settings),
                    fmt_money(line.evaluation.spent, &settings),
                    fmt_percent(line.evaluation.percentage),
                    line.evaluation.status.label().to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Category", "Limit", "Spent", "Used", "Status"], rows)
        );
    }
    Ok(())
}
