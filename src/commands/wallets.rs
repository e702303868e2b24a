// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::icons::IconRegistry;
use crate::ledger::Ledger;
use crate::models::{NewWallet, NewWalletTransaction, Wallet, WalletMovement, WalletPatch};
use crate::utils::{
    fmt_money, fmt_percent, icon_label, lookup, maybe_print_json, month_or_current, parse_date,
    parse_decimal, pretty_table, required,
};
use anyhow::Result;
use chrono::Utc;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let ledger = Ledger::new(conn);
    match m.subcommand() {
        Some(("add", sub)) => {
            let wallet = ledger.add_wallet(NewWallet {
                name: required(sub, "name")?.to_string(),
                icon: IconRegistry::normalize(required(sub, "icon")?).to_string(),
                color: required(sub, "color")?.to_string(),
            })?;
            println!("Added wallet '{}' (id: {})", wallet.name, wallet.id);
        }
        Some(("list", sub)) => {
            let data = ledger.wallets();
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
                let rows = data
                    .iter()
                    .map(|w| {
                        vec![
                            w.id.clone(),
                            w.name.clone(),
                            icon_label(&w.icon),
                            w.color.clone(),
                        ]
                    })
                    .collect();
                println!("{}", pretty_table(&["Id", "Name", "Icon", "Color"], rows));
            }
        }
        Some(("edit", sub)) => {
            let wallet = find_wallet(&ledger, sub)?;
            let patch = WalletPatch {
                name: sub.get_one::<String>("name").cloned(),
                icon: sub
                    .get_one::<String>("icon")
                    .map(|s| IconRegistry::normalize(s).to_string()),
                color: sub.get_one::<String>("color").cloned(),
            };
            let wallet = ledger.update_wallet(&wallet.id, patch)?;
            println!("Updated wallet '{}'", wallet.name);
        }
        Some(("rm", sub)) => {
            let wallet = find_wallet(&ledger, sub)?;
            ledger.delete_wallet(&wallet.id)?;
            println!("Removed wallet '{}'", wallet.name);
        }
        Some(("credit", sub)) => movement(&ledger, sub, WalletMovement::Credit)?,
        Some(("debit", sub)) => movement(&ledger, sub, WalletMovement::Debit)?,
        Some(("status", sub)) => status(&ledger, sub)?,
        _ => {}
    }
    Ok(())
}

fn find_wallet(ledger: &Ledger<&Connection>, sub: &clap::ArgMatches) -> Result<Wallet> {
    lookup(ledger.wallets(), required(sub, "WALLET")?, |w| w.name.as_str())
}

fn movement(
    ledger: &Ledger<&Connection>,
    sub: &clap::ArgMatches,
    movement: WalletMovement,
) -> Result<()> {
    let wallet = find_wallet(ledger, sub)?;
    let date = match sub.get_one::<String>("date") {
        Some(s) => parse_date(s)?,
        None => Utc::now().date_naive(),
    };
    let entry = ledger.record_wallet_transaction(NewWalletTransaction {
        wallet_id: wallet.id.clone(),
        amount: parse_decimal(required(sub, "amount")?)?,
        movement,
        description: sub.get_one::<String>("desc").cloned().unwrap_or_default(),
        date,
        linked_transaction_id: sub.get_one::<String>("tx").cloned(),
    })?;
    let verb = match movement {
        WalletMovement::Credit => "Credited",
        WalletMovement::Debit => "Debited",
    };
    println!(
        "{} {} {} '{}' on {}",
        verb,
        fmt_money(entry.amount, &ledger.settings()),
        if movement == WalletMovement::Credit { "to" } else { "from" },
        wallet.name,
        entry.date
    );
    Ok(())
}

fn status(ledger: &Ledger<&Connection>, sub: &clap::ArgMatches) -> Result<()> {
    let month = month_or_current(sub)?;
    let balances = ledger.wallet_balances(month);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &balances)? {
        let settings = ledger.settings();
        let rows = balances
            .iter()
            .map(|b| {
                vec![
                    b.name.clone(),
                    fmt_money(b.credits, &settings),
                    fmt_money(b.debits, &settings),
                    fmt_money(b.balance, &settings),
                    fmt_percent(b.usage_percentage),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Wallet", "In", "Out", "Balance", "Used"], rows)
        );
        let roi = ledger.marketing_roi(month);
        println!(
            "Marketing ROI {}: digital income {} / marketing {} = {}x",
            month,
            fmt_money(roi.digital_income, &settings),
            fmt_money(roi.marketing_expenses, &settings),
            roi.roi.round_dp(2)
        );
    }
    Ok(())
}
