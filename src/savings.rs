// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::SavingsGoal;
use crate::stats::{percentage_of, saturating_sum};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsProgress {
    pub remaining: Decimal,
    pub percentage: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsSummary {
    pub total_saved: Decimal,
    pub total_target: Decimal,
    pub percentage: Decimal,
}

pub fn progress(goal: &SavingsGoal) -> SavingsProgress {
    SavingsProgress {
        remaining: goal.target_amount.saturating_sub(goal.current_amount).max(Decimal::ZERO),
        percentage: percentage_of(goal.current_amount, goal.target_amount)
            .min(Decimal::ONE_HUNDRED),
    }
}

/// Totals across every goal. Not capped: overshooting goals count in full.
pub fn portfolio_summary(goals: &[SavingsGoal]) -> SavingsSummary {
    let total_saved = saturating_sum(goals.iter().map(|g| g.current_amount));
    let total_target = saturating_sum(goals.iter().map(|g| g.target_amount));
    SavingsSummary {
        total_saved,
        total_target,
        percentage: percentage_of(total_saved, total_target),
    }
}
