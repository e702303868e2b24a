// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::distribution::split_income;
use crate::ledger::Ledger;
use crate::models::{IncomeDistribution, IncomeSource, IncomeSourcePatch, NewIncomeSource, Wallet};
use crate::utils::{fmt_money, lookup, maybe_print_json, parse_decimal, pretty_table, required};
use anyhow::{Context, Result};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let ledger = Ledger::new(conn);
    match m.subcommand() {
        Some(("add", sub)) => {
            let distributions = parse_splits(&ledger.wallets(), sub)?;
            let source = ledger.add_income_source(NewIncomeSource {
                name: required(sub, "name")?.to_string(),
                distributions,
            })?;
            println!("Added income source '{}' (id: {})", source.name, source.id);
        }
        Some(("list", sub)) => {
            let data = ledger.income_sources();
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
                let wallets = ledger.wallets();
                let rows = data
                    .iter()
                    .map(|s| {
                        let split = s
                            .distributions
                            .iter()
                            .map(|d| format!("{} {}%", wallet_name(&wallets, &d.wallet_id), d.percentage))
                            .collect::<Vec<_>>()
                            .join(", ");
                        vec![s.name.clone(), split, s.id.clone()]
                    })
                    .collect();
                println!("{}", pretty_table(&["Source", "Split", "Id"], rows));
            }
        }
        Some(("edit", sub)) => {
            let source = find_source(&ledger, sub)?;
            let distributions = if sub.contains_id("split") {
                Some(parse_splits(&ledger.wallets(), sub)?)
            } else {
                None
            };
            let source = ledger.update_income_source(
                &source.id,
                IncomeSourcePatch {
                    name: sub.get_one::<String>("name").cloned(),
                    distributions,
                },
            )?;
            println!("Updated income source '{}'", source.name);
        }
        Some(("rm", sub)) => {
            let source = find_source(&ledger, sub)?;
            ledger.delete_income_source(&source.id)?;
            println!("Removed income source '{}'", source.name);
        }
        Some(("split", sub)) => {
            let source = find_source(&ledger, sub)?;
            let amount = parse_decimal(required(sub, "amount")?)?;
            let shares = split_income(amount, &source);
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &shares)? {
                let wallets = ledger.wallets();
                let settings = ledger.settings();
                let rows = shares
                    .iter()
                    .map(|s| {
                        vec![
                            wallet_name(&wallets, &s.wallet_id).to_string(),
                            format!("{}%", s.percentage),
                            fmt_money(s.amount, &settings),
                        ]
                    })
                    .collect();
                println!("{}", pretty_table(&["Wallet", "Share", "Amount"], rows));
            }
        }
        _ => {}
    }
    Ok(())
}

fn find_source(ledger: &Ledger<&Connection>, sub: &clap::ArgMatches) -> Result<IncomeSource> {
    lookup(ledger.income_sources(), required(sub, "SOURCE")?, |s| {
        s.name.as_str()
    })
}

fn wallet_name<'a>(wallets: &'a [Wallet], id: &'a str) -> &'a str {
    wallets
        .iter()
        .find(|w| w.id == id)
        .map_or(id, |w| w.name.as_str())
}

/// Parses repeated `--split WALLET=PCT` values. Wallets resolve by id or name.
fn parse_splits(wallets: &[Wallet], sub: &clap::ArgMatches) -> Result<Vec<IncomeDistribution>> {
    let Some(values) = sub.get_many::<String>("split") else {
        return Ok(Vec::new());
    };
    values
        .map(|raw| {
            let (wallet, pct) = raw
                .rsplit_once('=')
                .with_context(|| format!("Invalid split '{}', expected WALLET=PCT", raw))?;
            let percentage = pct
                .trim()
                .trim_end_matches('%')
                .parse::<u32>()
                .with_context(|| format!("Invalid percentage '{}'", pct))?;
            let wallet = lookup(wallets.to_vec(), wallet, |w| w.name.as_str())?;
            Ok(IncomeDistribution {
                wallet_id: wallet.id,
                percentage,
            })
        })
        .collect()
}
