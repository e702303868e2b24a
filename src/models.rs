// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::FinanceError;

pub const NEUTRAL_COLOR: &str = "#94A3B8";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
    Investment,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
            TransactionType::Investment => "investment",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = FinanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            "investment" => Ok(TransactionType::Investment),
            other => Err(FinanceError::invalid(
                "type",
                format!("'{}' (expected income|expense|investment)", other),
            )),
        }
    }
}

/// A calendar month, written `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| YearMonth { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        YearMonth {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn current() -> Self {
        Self::of(Utc::now().date_naive())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn last_day(&self) -> NaiveDate {
        self.next()
            .first_day()
            .pred_opt()
            .unwrap_or(NaiveDate::MAX)
    }

    /// Inclusive on both the first and the last calendar day.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.first_day() && date <= self.last_day()
    }

    pub fn next(&self) -> Self {
        if self.month == 12 {
            YearMonth {
                year: self.year + 1,
                month: 1,
            }
        } else {
            YearMonth {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn prev(&self) -> Self {
        if self.month == 1 {
            YearMonth {
                year: self.year - 1,
                month: 12,
            }
        } else {
            YearMonth {
                year: self.year,
                month: self.month - 1,
            }
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = FinanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d")
            .map(YearMonth::of)
            .map_err(|_| FinanceError::invalid("month", format!("'{}', expected YYYY-MM", s)))
    }
}

impl TryFrom<String> for YearMonth {
    type Error = FinanceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<YearMonth> for String {
    fn from(value: YearMonth) -> Self {
        value.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub category_id: String,
    #[serde(default)]
    pub description: String,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub savings_goal_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub savings_contribution: Option<Decimal>,
}

impl Transaction {
    /// Positive contribution towards a savings goal, if this transaction carries one.
    pub fn contribution(&self) -> Option<(&str, Decimal)> {
        match (&self.savings_goal_id, self.savings_contribution) {
            (Some(goal), Some(amount)) if amount > Decimal::ZERO => Some((goal.as_str(), amount)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub color: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
}

impl Category {
    fn seed(id: &str, name: &str, icon: &str, color: &str, kind: TransactionType) -> Self {
        Category {
            id: id.to_string(),
            name: name.to_string(),
            icon: icon.to_string(),
            color: color.to_string(),
            kind,
        }
    }

    /// Stand-in shown for a category id that no longer resolves.
    pub fn fallback(id: &str, kind: TransactionType) -> Self {
        Category {
            id: id.to_string(),
            name: "Other".to_string(),
            icon: crate::icons::DEFAULT_ICON.to_string(),
            color: NEUTRAL_COLOR.to_string(),
            kind,
        }
    }
}

/// Looks a category up by id, substituting the neutral fallback when it is gone.
pub fn resolve_category(categories: &[Category], id: &str, kind: TransactionType) -> Category {
    categories
        .iter()
        .find(|c| c.id == id)
        .cloned()
        .unwrap_or_else(|| Category::fallback(id, kind))
}

/// Monthly spending ceiling for one expense category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialGoal {
    pub id: String,
    pub category_id: String,
    pub monthly_limit: Decimal,
    pub month: YearMonth,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsGoal {
    pub id: String,
    pub name: String,
    pub target_amount: Decimal,
    pub current_amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeDistribution {
    pub wallet_id: String,
    pub percentage: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeSource {
    pub id: String,
    pub name: String,
    pub distributions: Vec<IncomeDistribution>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub color: String,
    #[serde(default)]
    pub balance: Decimal,
}

impl Wallet {
    fn seed(id: &str, name: &str, icon: &str, color: &str) -> Self {
        Wallet {
            id: id.to_string(),
            name: name.to_string(),
            icon: icon.to_string(),
            color: color.to_string(),
            balance: Decimal::ZERO,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WalletMovement {
    Credit,
    Debit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletTransaction {
    pub id: String,
    pub wallet_id: String,
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub movement: WalletMovement,
    #[serde(default)]
    pub description: String,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_transaction_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    pub display_name: String,
    pub currency: String,
    pub privacy_mode: bool,
}

impl Default for UserSettings {
    fn default() -> Self {
        UserSettings {
            display_name: "User".to_string(),
            currency: "BRL".to_string(),
            privacy_mode: false,
        }
    }
}

// Creation inputs. Ids and timestamps are assigned by the ledger.

#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub amount: Decimal,
    pub kind: TransactionType,
    pub category_id: String,
    pub description: String,
    pub date: NaiveDate,
    pub savings_goal_id: Option<String>,
    pub savings_contribution: Option<Decimal>,
}

#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub icon: String,
    pub color: String,
    pub kind: TransactionType,
}

#[derive(Debug, Clone)]
pub struct NewFinancialGoal {
    pub category_id: String,
    pub monthly_limit: Decimal,
    pub month: YearMonth,
}

#[derive(Debug, Clone)]
pub struct NewSavingsGoal {
    pub name: String,
    pub target_amount: Decimal,
    pub deadline: Option<NaiveDate>,
}

#[derive(Debug, Clone)]
pub struct NewIncomeSource {
    pub name: String,
    pub distributions: Vec<IncomeDistribution>,
}

#[derive(Debug, Clone)]
pub struct NewWallet {
    pub name: String,
    pub icon: String,
    pub color: String,
}

#[derive(Debug, Clone)]
pub struct NewWalletTransaction {
    pub wallet_id: String,
    pub amount: Decimal,
    pub movement: WalletMovement,
    pub description: String,
    pub date: NaiveDate,
    pub linked_transaction_id: Option<String>,
}

// Partial updates: `None` keeps the stored value.

#[derive(Debug, Clone, Default)]
pub struct TransactionPatch {
    pub amount: Option<Decimal>,
    pub kind: Option<TransactionType>,
    pub category_id: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub kind: Option<TransactionType>,
}

#[derive(Debug, Clone, Default)]
pub struct FinancialGoalPatch {
    pub category_id: Option<String>,
    pub monthly_limit: Option<Decimal>,
    pub month: Option<YearMonth>,
}

#[derive(Debug, Clone, Default)]
pub struct SavingsGoalPatch {
    pub name: Option<String>,
    pub target_amount: Option<Decimal>,
    pub current_amount: Option<Decimal>,
    pub deadline: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default)]
pub struct IncomeSourcePatch {
    pub name: Option<String>,
    pub distributions: Option<Vec<IncomeDistribution>>,
}

#[derive(Debug, Clone, Default)]
pub struct WalletPatch {
    pub name: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct SettingsPatch {
    pub display_name: Option<String>,
    pub currency: Option<String>,
    pub privacy_mode: Option<bool>,
}

pub fn default_categories() -> Vec<Category> {
    use TransactionType::*;
    vec![
        Category::seed("salary", "Salary", "Briefcase", "#10B981", Income),
        Category::seed("freelance", "Freelance", "Laptop", "#34D399", Income),
        Category::seed("investments_income", "Returns", "TrendingUp", "#3B82F6", Income),
        Category::seed("digital_income", "Digital Income", "Globe", "#8B5CF6", Income),
        Category::seed("streaming", "Streaming", "Radio", "#EC4899", Income),
        Category::seed("other_income", "Other", "Plus", "#6EE7B7", Income),
        Category::seed("food", "Food", "Utensils", "#EF4444", Expense),
        Category::seed("transport", "Transport", "Car", "#F97316", Expense),
        Category::seed("housing", "Housing", "Home", "#F59E0B", Expense),
        Category::seed("health", "Health", "Heart", "#EC4899", Expense),
        Category::seed("education", "Education", "GraduationCap", "#8B5CF6", Expense),
        Category::seed("entertainment", "Leisure", "Gamepad2", "#06B6D4", Expense),
        Category::seed("shopping", "Shopping", "ShoppingBag", "#D946EF", Expense),
        Category::seed("bills", "Bills", "Receipt", "#64748B", Expense),
        Category::seed("marketing", "Marketing", "Megaphone", "#F97316", Expense),
        Category::seed("equipment", "Equipment", "Cpu", "#3B82F6", Expense),
        Category::seed("other_expense", "Other", "MoreHorizontal", NEUTRAL_COLOR, Expense),
        Category::seed("stocks", "Stocks", "LineChart", "#3B82F6", Investment),
        Category::seed("crypto", "Crypto", "Bitcoin", "#F59E0B", Investment),
        Category::seed("fixed_income", "Fixed Income", "Lock", "#10B981", Investment),
        Category::seed("real_estate", "Real Estate", "Building", "#6366F1", Investment),
    ]
}

pub fn default_wallets() -> Vec<Wallet> {
    vec![
        Wallet::seed("marketing", "Marketing", "Megaphone", "#F97316"),
        Wallet::seed("equipment", "Equipment", "Cpu", "#3B82F6"),
        Wallet::seed("free_profit", "Free Profit", "Wallet", "#10B981"),
    ]
}
