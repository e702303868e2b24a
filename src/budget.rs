// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{FinancialGoal, Transaction, TransactionType, YearMonth};
use crate::stats::{percentage_of, saturating_sum};

/// Spent/limit ratio from which a budget counts as close to its limit.
pub const NEAR_LIMIT_RATIO: Decimal = Decimal::from_parts(80, 0, 0, false, 2);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BudgetStatus {
    OnTrack,
    NearLimit,
    OverBudget,
}

impl BudgetStatus {
    pub fn label(&self) -> &'static str {
        match self {
            BudgetStatus::OnTrack => "on-track",
            BudgetStatus::NearLimit => "near-limit",
            BudgetStatus::OverBudget => "over-budget",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetEvaluation {
    pub spent: Decimal,
    /// Capped at 100 for display.
    pub percentage: Decimal,
    pub status: BudgetStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetLine {
    pub goal: FinancialGoal,
    pub evaluation: BudgetEvaluation,
}

/// Classifies a budget against the expenses of its own category and month.
///
/// Transactions of other categories, types or months are ignored, so the
/// full ledger can be passed in.
pub fn evaluate_budget(goal: &FinancialGoal, transactions: &[Transaction]) -> BudgetEvaluation {
    let spent = saturating_sum(
        transactions
            .iter()
            .filter(|t| {
                t.kind == TransactionType::Expense
                    && t.category_id == goal.category_id
                    && goal.month.contains(t.date)
            })
            .map(|t| t.amount),
    );
    classify(spent, goal.monthly_limit)
}

pub fn classify(spent: Decimal, limit: Decimal) -> BudgetEvaluation {
    let positive_limit = limit > Decimal::ZERO;
    let status = if spent > limit {
        BudgetStatus::OverBudget
    } else if positive_limit && spent.checked_div(limit).is_some_and(|r| r >= NEAR_LIMIT_RATIO) {
        BudgetStatus::NearLimit
    } else {
        BudgetStatus::OnTrack
    };

    let percentage = if positive_limit {
        percentage_of(spent, limit).min(Decimal::ONE_HUNDRED)
    } else if spent > Decimal::ZERO {
        Decimal::ONE_HUNDRED
    } else {
        Decimal::ZERO
    };

    BudgetEvaluation {
        spent,
        percentage,
        status,
    }
}

/// Evaluates every budget that applies to `month`, in stored order.
pub fn budget_overview(
    goals: &[FinancialGoal],
    transactions: &[Transaction],
    month: YearMonth,
) -> Vec<BudgetLine> {
    goals
        .iter()
        .filter(|g| g.month == month)
        .map(|g| BudgetLine {
            goal: g.clone(),
            evaluation: evaluate_budget(g, transactions),
        })
        .collect()
}
