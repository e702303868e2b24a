// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Period aggregation over a flat transaction list.
//!
//! Everything here is a pure function of its inputs: the list is never
//! mutated and repeated calls with the same input give identical output.

use std::collections::HashMap;

use chrono::Datelike;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{
    Category, Transaction, TransactionType, Wallet, WalletMovement, WalletTransaction, YearMonth,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakdownEntry {
    pub category_id: String,
    pub amount: Decimal,
    pub percentage: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyStats {
    pub month: YearMonth,
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub total_investments: Decimal,
    pub net_profit: Decimal,
    pub category_breakdown: Vec<BreakdownEntry>,
    pub income_breakdown: Vec<BreakdownEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthTotals {
    pub month: YearMonth,
    pub income: Decimal,
    pub expenses: Decimal,
    pub investments: Decimal,
    pub net_profit: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnualStats {
    pub year: i32,
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub total_investments: Decimal,
    pub net_profit: Decimal,
    pub category_breakdown: Vec<BreakdownEntry>,
    pub income_breakdown: Vec<BreakdownEntry>,
    /// January through December, zero-filled.
    pub months: [MonthTotals; 12],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthAmount {
    pub month: YearMonth,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletBalance {
    pub wallet_id: String,
    pub name: String,
    pub credits: Decimal,
    pub debits: Decimal,
    pub balance: Decimal,
    pub usage_percentage: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketingRoi {
    pub digital_income: Decimal,
    pub marketing_expenses: Decimal,
    /// Income per unit of marketing spend, zero when nothing was spent.
    pub roi: Decimal,
}

#[derive(Debug, Default, Clone, Copy)]
struct Totals {
    income: Decimal,
    expenses: Decimal,
    investments: Decimal,
}

impl Totals {
    fn add(&mut self, t: &Transaction) {
        match t.kind {
            TransactionType::Income => self.income = self.income.saturating_add(t.amount),
            TransactionType::Expense => self.expenses = self.expenses.saturating_add(t.amount),
            TransactionType::Investment => {
                self.investments = self.investments.saturating_add(t.amount)
            }
        }
    }

    // Investments count as an outflow.
    fn net_profit(&self) -> Decimal {
        self.income
            .saturating_sub(self.expenses)
            .saturating_sub(self.investments)
    }
}

/// Sum that clamps at the `Decimal` range instead of panicking.
pub fn saturating_sum<I: IntoIterator<Item = Decimal>>(amounts: I) -> Decimal {
    amounts.into_iter().fold(Decimal::ZERO, Decimal::saturating_add)
}

/// `part / whole * 100`, or zero when `whole` is zero.
///
/// Results outside the `Decimal` range clamp to `Decimal::MAX` or `Decimal::MIN`.
pub fn percentage_of(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    part.checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|scaled| scaled.checked_div(whole))
        .or_else(|| {
            part.checked_div(whole)
                .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        })
        .unwrap_or(
            if part.is_sign_negative() == whole.is_sign_negative() {
                Decimal::MAX
            } else {
                Decimal::MIN
            },
        )
}

/// Per-category sums ordered by amount, largest first. Ties keep first-seen order.
fn breakdown<'a, I>(rows: I, total: Decimal) -> Vec<BreakdownEntry>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut entries: Vec<BreakdownEntry> = Vec::new();
    let mut index: HashMap<&'a str, usize> = HashMap::new();
    for t in rows {
        match index.get(t.category_id.as_str()) {
            Some(&i) => entries[i].amount = entries[i].amount.saturating_add(t.amount),
            None => {
                index.insert(t.category_id.as_str(), entries.len());
                entries.push(BreakdownEntry {
                    category_id: t.category_id.clone(),
                    amount: t.amount,
                    percentage: Decimal::ZERO,
                });
            }
        }
    }
    for entry in &mut entries {
        entry.percentage = percentage_of(entry.amount, total);
    }
    // sort_by is stable
    entries.sort_by(|a, b| b.amount.cmp(&a.amount));
    entries
}

fn of_kind<'a>(
    rows: &'a [&'a Transaction],
    kind: TransactionType,
) -> impl Iterator<Item = &'a Transaction> + 'a {
    rows.iter().copied().filter(move |t| t.kind == kind)
}

pub fn monthly_stats(transactions: &[Transaction], month: YearMonth) -> MonthlyStats {
    let in_month: Vec<&Transaction> = transactions
        .iter()
        .filter(|t| month.contains(t.date))
        .collect();

    let mut totals = Totals::default();
    for t in &in_month {
        totals.add(t);
    }

    MonthlyStats {
        month,
        total_income: totals.income,
        total_expenses: totals.expenses,
        total_investments: totals.investments,
        net_profit: totals.net_profit(),
        category_breakdown: breakdown(
            of_kind(&in_month, TransactionType::Expense),
            totals.expenses,
        ),
        income_breakdown: breakdown(of_kind(&in_month, TransactionType::Income), totals.income),
    }
}

pub fn annual_stats(transactions: &[Transaction], year: i32) -> AnnualStats {
    let in_year: Vec<&Transaction> = transactions
        .iter()
        .filter(|t| t.date.year() == year)
        .collect();

    let mut totals = Totals::default();
    let mut per_month = [Totals::default(); 12];
    for t in &in_year {
        totals.add(t);
        per_month[t.date.month0() as usize].add(t);
    }

    let months = std::array::from_fn(|i| {
        let m = per_month[i];
        MonthTotals {
            month: YearMonth::new(year, i as u32 + 1).unwrap_or_else(YearMonth::current),
            income: m.income,
            expenses: m.expenses,
            investments: m.investments,
            net_profit: m.net_profit(),
        }
    });

    AnnualStats {
        year,
        total_income: totals.income,
        total_expenses: totals.expenses,
        total_investments: totals.investments,
        net_profit: totals.net_profit(),
        category_breakdown: breakdown(
            of_kind(&in_year, TransactionType::Expense),
            totals.expenses,
        ),
        income_breakdown: breakdown(of_kind(&in_year, TransactionType::Income), totals.income),
        months,
    }
}

fn investments_in(transactions: &[Transaction], month: YearMonth) -> Decimal {
    saturating_sum(
        transactions
            .iter()
            .filter(|t| t.kind == TransactionType::Investment && month.contains(t.date))
            .map(|t| t.amount),
    )
}

/// Investment totals for the `months` months ending at `end`, oldest first.
pub fn investment_trend(
    transactions: &[Transaction],
    end: YearMonth,
    months: usize,
) -> Vec<MonthAmount> {
    let mut out = Vec::with_capacity(months);
    let mut month = end;
    for _ in 0..months {
        out.push(MonthAmount {
            month,
            amount: investments_in(transactions, month),
        });
        month = month.prev();
    }
    out.reverse();
    out
}

/// Month-over-month change in invested amount, in percent.
pub fn investment_change(transactions: &[Transaction], month: YearMonth) -> Decimal {
    let current = investments_in(transactions, month);
    let previous = investments_in(transactions, month.prev());
    percentage_of(current.saturating_sub(previous), previous)
}

pub fn total_invested(transactions: &[Transaction]) -> Decimal {
    saturating_sum(
        transactions
            .iter()
            .filter(|t| t.kind == TransactionType::Investment)
            .map(|t| t.amount),
    )
}

pub fn wallet_monthly_balances(
    wallets: &[Wallet],
    movements: &[WalletTransaction],
    month: YearMonth,
) -> Vec<WalletBalance> {
    wallets
        .iter()
        .map(|w| {
            let mut credits = Decimal::ZERO;
            let mut debits = Decimal::ZERO;
            for m in movements
                .iter()
                .filter(|m| m.wallet_id == w.id && month.contains(m.date))
            {
                match m.movement {
                    WalletMovement::Credit => credits = credits.saturating_add(m.amount),
                    WalletMovement::Debit => debits = debits.saturating_add(m.amount),
                }
            }
            WalletBalance {
                wallet_id: w.id.clone(),
                name: w.name.clone(),
                credits,
                debits,
                balance: credits.saturating_sub(debits),
                usage_percentage: percentage_of(debits, credits),
            }
        })
        .collect()
}

/// Category id that marketing spend is booked under.
pub const MARKETING_CATEGORY: &str = "marketing";

fn is_digital_income(category: &Category) -> bool {
    category.kind == TransactionType::Income
        && (category.id.contains("digital") || category.id.contains("streaming"))
}

/// Income from digital and streaming categories against marketing expenses
/// for one month.
pub fn marketing_roi(
    transactions: &[Transaction],
    categories: &[Category],
    month: YearMonth,
) -> MarketingRoi {
    let in_month = || transactions.iter().filter(move |t| month.contains(t.date));
    let digital_income = saturating_sum(
        in_month()
            .filter(|t| {
                t.kind == TransactionType::Income
                    && categories
                        .iter()
                        .any(|c| c.id == t.category_id && is_digital_income(c))
            })
            .map(|t| t.amount),
    );
    let marketing_expenses = saturating_sum(
        in_month()
            .filter(|t| t.kind == TransactionType::Expense && t.category_id == MARKETING_CATEGORY)
            .map(|t| t.amount),
    );
    let roi = if marketing_expenses > Decimal::ZERO {
        digital_income
            .checked_div(marketing_expenses)
            .unwrap_or(Decimal::MAX)
    } else {
        Decimal::ZERO
    };
    MarketingRoi {
        digital_income,
        marketing_expenses,
        roi,
    }
}

/// Transactions of one month, optionally narrowed by a case-insensitive search
/// over the description and the category name, newest date first.
pub fn transactions_in_month(
    transactions: &[Transaction],
    categories: &[Category],
    month: YearMonth,
    search: Option<&str>,
) -> Vec<Transaction> {
    filter_transactions(transactions, categories, Some(month), search)
}

/// Same as [`transactions_in_month`], with the month window optional.
pub fn filter_transactions(
    transactions: &[Transaction],
    categories: &[Category],
    month: Option<YearMonth>,
    search: Option<&str>,
) -> Vec<Transaction> {
    let needle = search
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty());
    let mut rows: Vec<Transaction> = transactions
        .iter()
        .filter(|t| month.is_none_or(|m| m.contains(t.date)))
        .filter(|t| match &needle {
            None => true,
            Some(needle) => {
                t.description.to_lowercase().contains(needle.as_str())
                    || categories
                        .iter()
                        .find(|c| c.id == t.category_id)
                        .is_some_and(|c| c.name.to_lowercase().contains(needle.as_str()))
            }
        })
        .cloned()
        .collect();
    rows.sort_by(|a, b| b.date.cmp(&a.date));
    rows
}
