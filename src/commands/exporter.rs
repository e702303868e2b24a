// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::Ledger;
use crate::models::resolve_category;
use crate::stats::filter_transactions;
use crate::utils::{parse_month, required};
use anyhow::{bail, Result};
use rusqlite::Connection;
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(conn, sub),
        _ => Ok(()),
    }
}

fn export_transactions(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = required(sub, "format")?.to_lowercase();
    let out = required(sub, "out")?;
    if fmt != "csv" && fmt != "json" {
        bail!("Unknown format: {} (use csv|json)", fmt);
    }
    let month = sub
        .get_one::<String>("month")
        .map(|s| parse_month(s))
        .transpose()?;

    let ledger = Ledger::new(conn);
    let categories = ledger.categories();
    let mut txns = filter_transactions(&ledger.transactions(), &categories, month, None);
    // Oldest first, like a statement.
    txns.sort_by_key(|t| (t.date, t.created_at));

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "id",
                "date",
                "type",
                "category",
                "amount",
                "description",
                "savings_goal",
                "savings_contribution",
            ])?;
            for t in &txns {
                wtr.write_record([
                    t.id.clone(),
                    t.date.to_string(),
                    t.kind.to_string(),
                    resolve_category(&categories, &t.category_id, t.kind).name,
                    t.amount.to_string(),
                    t.description.clone(),
                    t.savings_goal_id.clone().unwrap_or_default(),
                    t.savings_contribution
                        .map(|c| c.to_string())
                        .unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
        }
        _ => {
            let items: Vec<_> = txns
                .iter()
                .map(|t| {
                    json!({
                        "id": t.id,
                        "date": t.date.to_string(),
                        "type": t.kind,
                        "category": resolve_category(&categories, &t.category_id, t.kind).name,
                        "amount": t.amount.to_string(),
                        "description": t.description,
                        "savingsGoalId": t.savings_goal_id,
                        "savingsContribution": t.savings_contribution.map(|c| c.to_string()),
                    })
                })
                .collect();
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
    }
    println!("Exported {} transactions to {}", txns.len(), out);
    Ok(())
}
