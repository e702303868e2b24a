// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::{HashMap, HashSet};

use crate::distribution::{distribution_total, validate_distribution};
use crate::ledger::Ledger;
use crate::models::TransactionType;
use crate::store::KvBackend;
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Issue {
    pub kind: &'static str,
    pub detail: String,
}

impl Issue {
    fn new(kind: &'static str, detail: String) -> Self {
        Issue { kind, detail }
    }
}

/// Finds references that no longer resolve and records that break the
/// write-time rules (possible after a lenient backup import).
pub fn scan<B: KvBackend>(ledger: &Ledger<B>) -> Vec<Issue> {
    let mut issues = Vec::new();
    let categories: HashMap<String, TransactionType> = ledger
        .categories()
        .into_iter()
        .map(|c| (c.id, c.kind))
        .collect();
    let goals: HashSet<String> = ledger.savings_goals().into_iter().map(|g| g.id).collect();
    let wallets: HashSet<String> = ledger.wallets().into_iter().map(|w| w.id).collect();
    let transactions = ledger.transactions();
    let tx_ids: HashSet<&str> = transactions.iter().map(|t| t.id.as_str()).collect();

    for t in &transactions {
        match categories.get(&t.category_id) {
            None => issues.push(Issue::new(
                "tx_unknown_category",
                format!("{} {} -> {}", t.date, t.id, t.category_id),
            )),
            Some(kind) if *kind != t.kind => issues.push(Issue::new(
                "tx_category_type_mismatch",
                format!("{} {} is {} in a {} category", t.date, t.id, t.kind, kind),
            )),
            Some(_) => {}
        }
        if let Some(goal) = &t.savings_goal_id {
            if !goals.contains(goal) {
                issues.push(Issue::new(
                    "tx_unknown_savings_goal",
                    format!("{} {} -> {}", t.date, t.id, goal),
                ));
            }
        }
        if let Some(part) = t.savings_contribution {
            if part > t.amount {
                issues.push(Issue::new(
                    "contribution_exceeds_amount",
                    format!("{} {}: {} > {}", t.date, t.id, part, t.amount),
                ));
            }
        }
    }

    for g in ledger.financial_goals() {
        match categories.get(&g.category_id) {
            None => issues.push(Issue::new(
                "budget_unknown_category",
                format!("{} {} -> {}", g.month, g.id, g.category_id),
            )),
            Some(kind) if *kind != TransactionType::Expense => issues.push(Issue::new(
                "budget_not_expense",
                format!("{} {} uses a {} category", g.month, g.id, kind),
            )),
            Some(_) => {}
        }
    }

    for s in ledger.income_sources() {
        if !validate_distribution(&s.distributions) {
            issues.push(Issue::new(
                "source_split_not_100",
                format!("{}: {}%", s.name, distribution_total(&s.distributions)),
            ));
        }
        for d in s.distributions.iter().filter(|d| !wallets.contains(&d.wallet_id)) {
            issues.push(Issue::new(
                "source_unknown_wallet",
                format!("{} -> {}", s.name, d.wallet_id),
            ));
        }
    }

    for m in ledger.wallet_transactions() {
        if !wallets.contains(&m.wallet_id) {
            issues.push(Issue::new(
                "wallet_tx_unknown_wallet",
                format!("{} {} -> {}", m.date, m.id, m.wallet_id),
            ));
        }
        if let Some(linked) = &m.linked_transaction_id {
            if !tx_ids.contains(linked.as_str()) {
                issues.push(Issue::new(
                    "wallet_tx_unknown_transaction",
                    format!("{} {} -> {}", m.date, m.id, linked),
                ));
            }
        }
    }
    issues
}

pub fn handle(conn: &Connection) -> Result<()> {
    let issues = scan(&Ledger::new(conn));
    if issues.is_empty() {
        println!("doctor: no issues found");
    } else {
        let rows = issues
            .into_iter()
            .map(|i| vec![i.kind.to_string(), i.detail])
            .collect();
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
