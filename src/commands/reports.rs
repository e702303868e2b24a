// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::Ledger;
use crate::models::{resolve_category, Category, TransactionType, UserSettings, YearMonth};
use crate::stats::{investment_change, total_invested, BreakdownEntry};
use crate::utils::{fmt_money, fmt_percent, maybe_print_json, month_or_current, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let ledger = Ledger::new(conn);
    match m.subcommand() {
        Some(("month", sub)) => month(&ledger, sub)?,
        Some(("year", sub)) => year(&ledger, sub)?,
        Some(("investments", sub)) => investments(&ledger, sub)?,
        _ => {}
    }
    Ok(())
}

fn breakdown_rows(
    entries: &[BreakdownEntry],
    categories: &[Category],
    kind: TransactionType,
    settings: &UserSettings,
) -> Vec<Vec<String>> {
    entries
        .iter()
        .map(|e| {
            vec![
                resolve_category(categories, &e.category_id, kind).name,
                fmt_money(e.amount, settings),
                fmt_percent(e.percentage),
            ]
        })
        .collect()
}

fn month(ledger: &Ledger<&Connection>, sub: &clap::ArgMatches) -> Result<()> {
    let month = month_or_current(sub)?;
    let stats = ledger.monthly_stats(month);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &stats)? {
        return Ok(());
    }

    let settings = ledger.settings();
    let categories = ledger.categories();
    println!(
        "{}",
        pretty_table(
            &["Month", "Income", "Expenses", "Invested", "Net profit"],
            vec![vec![
                stats.month.to_string(),
                fmt_money(stats.total_income, &settings),
                fmt_money(stats.total_expenses, &settings),
                fmt_money(stats.total_investments, &settings),
                fmt_money(stats.net_profit, &settings),
            ]],
        )
    );
    if !stats.category_breakdown.is_empty() {
        println!(
            "{}",
            pretty_table(
                &["Expense category", "Amount", "Share"],
                breakdown_rows(
                    &stats.category_breakdown,
                    &categories,
                    TransactionType::Expense,
                    &settings
                ),
            )
        );
    }
    if !stats.income_breakdown.is_empty() {
        println!(
            "{}",
            pretty_table(
                &["Income category", "Amount", "Share"],
                breakdown_rows(
                    &stats.income_breakdown,
                    &categories,
                    TransactionType::Income,
                    &settings
                ),
            )
        );
    }
    Ok(())
}

fn year(ledger: &Ledger<&Connection>, sub: &clap::ArgMatches) -> Result<()> {
    let year = sub
        .get_one::<i32>("year")
        .copied()
        .unwrap_or_else(|| YearMonth::current().year());
    let stats = ledger.annual_stats(year);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &stats)? {
        return Ok(());
    }

    let settings = ledger.settings();
    let mut rows: Vec<Vec<String>> = stats
        .months
        .iter()
        .map(|m| {
            vec![
                m.month.to_string(),
                fmt_money(m.income, &settings),
                fmt_money(m.expenses, &settings),
                fmt_money(m.investments, &settings),
                fmt_money(m.net_profit, &settings),
            ]
        })
        .collect();
    rows.push(vec![
        format!("{} total", stats.year),
        fmt_money(stats.total_income, &settings),
        fmt_money(stats.total_expenses, &settings),
        fmt_money(stats.total_investments, &settings),
        fmt_money(stats.net_profit, &settings),
    ]);
    println!(
        "{}",
        pretty_table(
            &["Month", "Income", "Expenses", "Invested", "Net profit"],
            rows
        )
    );
    if !stats.category_breakdown.is_empty() {
        println!(
            "{}",
            pretty_table(
                &["Expense category", "Amount", "Share"],
                breakdown_rows(
                    &stats.category_breakdown,
                    &ledger.categories(),
                    TransactionType::Expense,
                    &settings
                ),
            )
        );
    }
    Ok(())
}

fn investments(ledger: &Ledger<&Connection>, sub: &clap::ArgMatches) -> Result<()> {
    let end = month_or_current(sub)?;
    let months = sub.get_one::<usize>("months").copied().unwrap_or(6);
    let trend = ledger.investment_trend(end, months);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &trend)? {
        return Ok(());
    }

    let settings = ledger.settings();
    let transactions = ledger.transactions();
    let rows = trend
        .iter()
        .map(|m| {
            vec![
                m.month.to_string(),
                fmt_money(m.amount, &settings),
                fmt_percent(investment_change(&transactions, m.month)),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Month", "Invested", "Change vs. previous"], rows)
    );
    println!(
        "All-time invested: {}",
        fmt_money(total_invested(&transactions), &settings)
    );
    Ok(())
}
