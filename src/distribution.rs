// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Advisory split of income across wallets. Nothing here posts money anywhere.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{IncomeDistribution, IncomeSource};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletShare {
    pub wallet_id: String,
    pub percentage: u32,
    pub amount: Decimal,
}

/// Sum of the entries with a non-zero percentage.
pub fn distribution_total(distributions: &[IncomeDistribution]) -> u64 {
    distributions
        .iter()
        .filter(|d| d.percentage > 0)
        .map(|d| u64::from(d.percentage))
        .sum()
}

/// Exact integer equality with 100, no tolerance.
pub fn validate_distribution(distributions: &[IncomeDistribution]) -> bool {
    distribution_total(distributions) == 100
}

pub fn active_distributions(distributions: Vec<IncomeDistribution>) -> Vec<IncomeDistribution> {
    distributions
        .into_iter()
        .filter(|d| d.percentage > 0)
        .collect()
}

// Divides first only when the product overflows.
fn share_of(amount: Decimal, percentage: u32) -> Decimal {
    let pct = Decimal::from(percentage);
    amount
        .checked_mul(pct)
        .and_then(|scaled| scaled.checked_div(Decimal::ONE_HUNDRED))
        .or_else(|| {
            amount
                .checked_div(Decimal::ONE_HUNDRED)
                .and_then(|unit| unit.checked_mul(pct))
        })
        .unwrap_or(amount)
}

pub fn split_income(amount: Decimal, source: &IncomeSource) -> Vec<WalletShare> {
    source
        .distributions
        .iter()
        .filter(|d| d.percentage > 0)
        .map(|d| WalletShare {
            wallet_id: d.wallet_id.clone(),
            percentage: d.percentage,
            amount: share_of(amount, d.percentage),
        })
        .collect()
}
