// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::Ledger;
use crate::models::{resolve_category, NewTransaction, TransactionPatch};
use crate::stats::filter_transactions;
use crate::utils::{
    category_ref, fmt_money, lookup, maybe_print_json, parse_date, parse_decimal, parse_kind,
    parse_month, pretty_table, required,
};
use anyhow::{bail, Result};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let ledger = Ledger::new(conn);
    match m.subcommand() {
        Some(("add", sub)) => add(&ledger, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("edit", sub)) => edit(&ledger, sub)?,
        Some(("rm", sub)) => {
            let id = required(sub, "ID")?;
            ledger.delete_transaction(id)?;
            println!("Deleted transaction {}", id);
        }
        _ => {}
    }
    Ok(())
}

fn add(ledger: &Ledger<&Connection>, sub: &clap::ArgMatches) -> Result<()> {
    let date = parse_date(required(sub, "date")?)?;
    let kind = parse_kind(required(sub, "type")?)?;
    let amount = parse_decimal(required(sub, "amount")?)?;
    let category = category_ref(&ledger.categories(), required(sub, "category")?, Some(kind))?;
    let description = sub
        .get_one::<String>("desc")
        .cloned()
        .unwrap_or_default();

    let savings_goal_id = match sub.get_one::<String>("goal") {
        Some(key) => Some(lookup(ledger.savings_goals(), key, |g| g.name.as_str())?.id),
        None => None,
    };
    let savings_contribution = match sub.get_one::<String>("contribution") {
        Some(s) => Some(parse_decimal(s)?),
        None => None,
    };
    if savings_goal_id.is_some() != savings_contribution.is_some() {
        bail!("--goal and --contribution must be given together");
    }

    let txn = ledger.record_transaction(NewTransaction {
        amount,
        kind,
        category_id: category.id,
        description,
        date,
        savings_goal_id,
        savings_contribution,
    })?;
    let settings = ledger.settings();
    println!(
        "Recorded {} {} on {} in '{}' (id: {})",
        txn.kind,
        fmt_money(txn.amount, &settings),
        txn.date,
        category.name,
        txn.id
    );
    if let Some((_, part)) = txn.contribution() {
        println!("Set aside {} for savings", fmt_money(part, &settings));
    }
    Ok(())
}

fn edit(ledger: &Ledger<&Connection>, sub: &clap::ArgMatches) -> Result<()> {
    let id = required(sub, "ID")?;
    let kind = match sub.get_one::<String>("type") {
        Some(s) => Some(parse_kind(s)?),
        None => None,
    };
    let category_id = match sub.get_one::<String>("category") {
        Some(key) => Some(category_ref(&ledger.categories(), key, kind)?.id),
        None => None,
    };
    let patch = TransactionPatch {
        amount: sub
            .get_one::<String>("amount")
            .map(|s| parse_decimal(s))
            .transpose()?,
        kind,
        category_id,
        description: sub.get_one::<String>("desc").cloned(),
        date: sub
            .get_one::<String>("date")
            .map(|s| parse_date(s))
            .transpose()?,
    };
    let txn = ledger.update_transaction(id, patch)?;
    println!("Updated transaction {}", txn.id);
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let settings = Ledger::new(conn).settings();
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.date.clone(),
                    r.kind.clone(),
                    r.category.clone(),
                    r.description.clone(),
                    fmt_money(r.amount, &settings),
                    r.savings.clone(),
                    r.id.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Date", "Type", "Category", "Description", "Amount", "Savings", "Id"],
                rows,
            )
        );
    }
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: String,
    pub date: String,
    pub kind: String,
    pub category: String,
    pub description: String,
    pub amount: Decimal,
    pub savings: String,
}

/// Rows for `tx list`, newest date first, after month / type / search filters.
pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let ledger = Ledger::new(conn);
    let month = sub
        .get_one::<String>("month")
        .map(|s| parse_month(s))
        .transpose()?;
    let kind = sub
        .get_one::<String>("type")
        .map(|s| parse_kind(s))
        .transpose()?;
    let search = sub.get_one::<String>("search").map(String::as_str);

    let categories = ledger.categories();
    let goals = ledger.savings_goals();
    let mut txns = filter_transactions(&ledger.transactions(), &categories, month, search);
    if let Some(kind) = kind {
        txns.retain(|t| t.kind == kind);
    }
    if let Some(limit) = sub.get_one::<usize>("limit") {
        txns.truncate(*limit);
    }

    let data = txns
        .into_iter()
        .map(|t| {
            let category = resolve_category(&categories, &t.category_id, t.kind).name;
            let savings = match t.contribution() {
                Some((goal_id, part)) => {
                    let goal = goals
                        .iter()
                        .find(|g| g.id == goal_id)
                        .map_or(goal_id, |g| g.name.as_str());
                    format!("{} -> {}", part, goal)
                }
                None => String::new(),
            };
            TransactionRow {
                id: t.id,
                date: t.date.to_string(),
                kind: t.kind.to_string(),
                category,
                description: t.description,
                amount: t.amount,
                savings,
            }
        })
        .collect();
    Ok(data)
}
