// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::Ledger;
use crate::models::{NewSavingsGoal, SavingsGoal, SavingsGoalPatch};
use crate::savings::{portfolio_summary, progress};
use crate::utils::{
    fmt_money, fmt_percent, lookup, maybe_print_json, parse_date, parse_decimal, pretty_table,
    required,
};
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let ledger = Ledger::new(conn);
    match m.subcommand() {
        Some(("add", sub)) => {
            let goal = ledger.add_savings_goal(NewSavingsGoal {
                name: required(sub, "name")?.to_string(),
                target_amount: parse_decimal(required(sub, "target")?)?,
                deadline: sub
                    .get_one::<String>("deadline")
                    .map(|s| parse_date(s))
                    .transpose()?,
            })?;
            println!("Added savings goal '{}' (id: {})", goal.name, goal.id);
        }
        Some(("list", sub)) => list(&ledger, sub)?,
        Some(("deposit", sub)) => {
            let goal = find_goal(&ledger, sub)?;
            let amount = parse_decimal(required(sub, "amount")?)?;
            let goal = ledger.deposit_to_savings_goal(&goal.id, amount)?;
            let settings = ledger.settings();
            println!(
                "'{}' now at {} of {}",
                goal.name,
                fmt_money(goal.current_amount, &settings),
                fmt_money(goal.target_amount, &settings)
            );
        }
        Some(("edit", sub)) => {
            let goal = find_goal(&ledger, sub)?;
            let patch = SavingsGoalPatch {
                name: sub.get_one::<String>("name").cloned(),
                target_amount: sub
                    .get_one::<String>("target")
                    .map(|s| parse_decimal(s))
                    .transpose()?,
                current_amount: sub
                    .get_one::<String>("current")
                    .map(|s| parse_decimal(s))
                    .transpose()?,
                deadline: sub
                    .get_one::<String>("deadline")
                    .map(|s| parse_date(s))
                    .transpose()?,
            };
            let goal = ledger.update_savings_goal(&goal.id, patch)?;
            println!("Updated savings goal '{}'", goal.name);
        }
        Some(("rm", sub)) => {
            let goal = find_goal(&ledger, sub)?;
            ledger.delete_savings_goal(&goal.id)?;
            println!("Removed savings goal '{}'", goal.name);
        }
        _ => {}
    }
    Ok(())
}

fn find_goal(ledger: &Ledger<&Connection>, sub: &clap::ArgMatches) -> Result<SavingsGoal> {
    lookup(ledger.savings_goals(), required(sub, "GOAL")?, |g| {
        g.name.as_str()
    })
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GoalRow {
    #[serde(flatten)]
    goal: SavingsGoal,
    remaining: Decimal,
    percentage: Decimal,
}

fn list(ledger: &Ledger<&Connection>, sub: &clap::ArgMatches) -> Result<()> {
    let goals = ledger.savings_goals();
    let summary = portfolio_summary(&goals);
    let data: Vec<GoalRow> = goals
        .into_iter()
        .map(|goal| {
            let p = progress(&goal);
            GoalRow {
                goal,
                remaining: p.remaining,
                percentage: p.percentage,
            }
        })
        .collect();
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        return Ok(());
    }

    let settings = ledger.settings();
    let rows = data
        .iter()
        .map(|r| {
            vec![
                r.goal.name.clone(),
                fmt_money(r.goal.current_amount, &settings),
                fmt_money(r.goal.target_amount, &settings),
                fmt_money(r.remaining, &settings),
                fmt_percent(r.percentage),
                r.goal
                    .deadline
                    .map(|d| d.to_string())
                    .unwrap_or_default(),
                r.goal.id.clone(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Goal", "Saved", "Target", "Remaining", "Progress", "Deadline", "Id"],
            rows
        )
    );
    println!(
        "Total saved {} of {} ({})",
        fmt_money(summary.total_saved, &settings),
        fmt_money(summary.total_target, &settings),
        fmt_percent(summary.percentage)
    );
    Ok(())
}
