// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The single controller that owns the store.
//!
//! All writes go through [`Ledger`], which validates input before touching
//! storage. Reads hand back owned snapshots; callers never mutate tables
//! directly.

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{debug, info};
use uuid::Uuid;

use crate::budget::{budget_overview, BudgetLine};
use crate::distribution::{active_distributions, distribution_total, validate_distribution};
use crate::errors::{FinanceError, Result};
use crate::models::{
    resolve_category, Category, CategoryPatch, FinancialGoal, FinancialGoalPatch, IncomeSource,
    IncomeSourcePatch, NewCategory, NewFinancialGoal, NewIncomeSource, NewSavingsGoal,
    NewTransaction, NewWallet, NewWalletTransaction, SavingsGoal, SavingsGoalPatch,
    SettingsPatch, Transaction, TransactionPatch, TransactionType, UserSettings, Wallet,
    WalletPatch, WalletTransaction, YearMonth,
};
use crate::stats::{self, AnnualStats, MarketingRoi, MonthAmount, MonthlyStats, WalletBalance};
use crate::store::{Entity, KvBackend, LedgerStore, Patch};

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn ensure_non_negative(field: &'static str, value: Decimal) -> Result<()> {
    if value < Decimal::ZERO {
        return Err(FinanceError::invalid(field, format!("{} is negative", value)));
    }
    Ok(())
}

fn ensure_positive(field: &'static str, value: Decimal) -> Result<()> {
    if value <= Decimal::ZERO {
        return Err(FinanceError::invalid(
            field,
            format!("{} must be greater than zero", value),
        ));
    }
    Ok(())
}

fn ensure_name(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(FinanceError::invalid(field, "must not be empty"));
    }
    Ok(())
}

pub struct Ledger<B> {
    store: LedgerStore<B>,
}

impl<B: KvBackend> Ledger<B> {
    pub fn new(backend: B) -> Self {
        Ledger {
            store: LedgerStore::new(backend),
        }
    }

    pub fn store(&self) -> &LedgerStore<B> {
        &self.store
    }

    fn require<T: Entity>(&self, id: &str) -> Result<T> {
        self.store
            .find::<T>(id)
            .ok_or_else(|| FinanceError::not_found(T::NAME, id))
    }

    /// Validates the patched row, then merges the patch into its table.
    fn merge<T, P>(&self, id: &str, patch: P, check: impl FnOnce(&T) -> Result<()>) -> Result<T>
    where
        T: Entity,
        P: Patch<T> + Clone,
    {
        let mut row = self.require::<T>(id)?;
        patch.clone().apply(&mut row);
        check(&row)?;
        self.store.update::<T, P>(id, patch)?;
        Ok(row)
    }

    /// The category must exist and carry the same type as the record using it.
    fn ensure_category(&self, category_id: &str, kind: TransactionType) -> Result<Category> {
        let category = self.require::<Category>(category_id)?;
        if category.kind != kind {
            return Err(FinanceError::invalid(
                "categoryId",
                format!(
                    "'{}' is an {} category, not {}",
                    category.name, category.kind, kind
                ),
            ));
        }
        Ok(category)
    }

    fn check_contribution(t: &Transaction) -> Result<()> {
        match (&t.savings_goal_id, t.savings_contribution) {
            (None, None) => Ok(()),
            (Some(_), Some(contribution)) => {
                if t.kind != TransactionType::Income {
                    return Err(FinanceError::invalid(
                        "savingsContribution",
                        "only income can contribute to a savings goal",
                    ));
                }
                ensure_non_negative("savingsContribution", contribution)?;
                if contribution > t.amount {
                    return Err(FinanceError::invalid(
                        "savingsContribution",
                        format!("{} exceeds the amount {}", contribution, t.amount),
                    ));
                }
                Ok(())
            }
            _ => Err(FinanceError::invalid(
                "savingsContribution",
                "goal and contribution must be given together",
            )),
        }
    }

    // --- transactions ---

    pub fn transactions(&self) -> Vec<Transaction> {
        self.store.transactions()
    }

    /// Saves an income/expense/investment and, once that write succeeded,
    /// credits its savings contribution to the linked goal.
    pub fn record_transaction(&self, new: NewTransaction) -> Result<Transaction> {
        ensure_non_negative("amount", new.amount)?;
        self.ensure_category(&new.category_id, new.kind)?;

        let txn = Transaction {
            id: new_id(),
            amount: new.amount,
            kind: new.kind,
            category_id: new.category_id,
            description: new.description.trim().to_string(),
            date: new.date,
            created_at: Utc::now(),
            savings_goal_id: new.savings_goal_id,
            savings_contribution: new.savings_contribution,
        };
        Self::check_contribution(&txn)?;
        if let Some(goal_id) = &txn.savings_goal_id {
            self.require::<SavingsGoal>(goal_id)?;
        }

        self.store.insert(txn.clone())?;
        debug!(id = %txn.id, kind = %txn.kind, amount = %txn.amount, "transaction recorded");

        if let Some((goal_id, amount)) = txn.contribution() {
            self.credit_savings_goal(goal_id, amount).map_err(|err| {
                FinanceError::ContributionNotApplied {
                    transaction_id: txn.id.clone(),
                    source: Box::new(err),
                }
            })?;
        }
        Ok(txn)
    }

    /// Edits a stored transaction. Savings balances are not touched.
    pub fn update_transaction(&self, id: &str, patch: TransactionPatch) -> Result<Transaction> {
        self.merge(id, patch, |txn: &Transaction| {
            ensure_non_negative("amount", txn.amount)?;
            self.ensure_category(&txn.category_id, txn.kind)?;
            Self::check_contribution(txn)
        })
    }

    pub fn delete_transaction(&self, id: &str) -> Result<Vec<Transaction>> {
        self.require::<Transaction>(id)?;
        self.store.remove::<Transaction>(id)
    }

    // --- categories ---

    pub fn categories(&self) -> Vec<Category> {
        self.store.categories()
    }

    /// Category for display; unknown ids resolve to the neutral fallback.
    pub fn category(&self, id: &str, kind: TransactionType) -> Category {
        resolve_category(&self.store.categories(), id, kind)
    }

    fn usage_count(&self, category_id: &str) -> usize {
        self.store
            .transactions()
            .iter()
            .filter(|t| t.category_id == category_id)
            .count()
    }

    pub fn add_category(&self, new: NewCategory) -> Result<Category> {
        ensure_name("name", &new.name)?;
        let category = Category {
            id: new_id(),
            name: new.name.trim().to_string(),
            icon: new.icon,
            color: new.color,
            kind: new.kind,
        };
        self.store.insert(category.clone())?;
        Ok(category)
    }

    pub fn update_category(&self, id: &str, patch: CategoryPatch) -> Result<Category> {
        let category = self.require::<Category>(id)?;
        if let Some(kind) = patch.kind.filter(|k| *k != category.kind) {
            let count = self.usage_count(id);
            if count > 0 {
                return Err(FinanceError::invalid(
                    "type",
                    format!(
                        "cannot change to {}: {} transaction(s) use this category",
                        kind, count
                    ),
                ));
            }
        }
        self.merge(id, patch, |c: &Category| ensure_name("name", &c.name))
    }

    pub fn delete_category(&self, id: &str) -> Result<Vec<Category>> {
        self.require::<Category>(id)?;
        let count = self.usage_count(id);
        if count > 0 {
            return Err(FinanceError::CategoryInUse {
                id: id.to_string(),
                count,
            });
        }
        self.store.remove::<Category>(id)
    }

    // --- budgets ---

    pub fn financial_goals(&self) -> Vec<FinancialGoal> {
        self.store.financial_goals()
    }

    pub fn set_budget(&self, new: NewFinancialGoal) -> Result<FinancialGoal> {
        ensure_positive("monthlyLimit", new.monthly_limit)?;
        self.ensure_category(&new.category_id, TransactionType::Expense)?;
        let goal = FinancialGoal {
            id: new_id(),
            category_id: new.category_id,
            monthly_limit: new.monthly_limit,
            month: new.month,
        };
        self.store.insert(goal.clone())?;
        Ok(goal)
    }

    pub fn update_budget(&self, id: &str, patch: FinancialGoalPatch) -> Result<FinancialGoal> {
        self.merge(id, patch, |goal: &FinancialGoal| {
            ensure_positive("monthlyLimit", goal.monthly_limit)?;
            self.ensure_category(&goal.category_id, TransactionType::Expense)
                .map(|_| ())
        })
    }

    pub fn delete_budget(&self, id: &str) -> Result<Vec<FinancialGoal>> {
        self.require::<FinancialGoal>(id)?;
        self.store.remove::<FinancialGoal>(id)
    }

    pub fn budget_overview(&self, month: YearMonth) -> Vec<BudgetLine> {
        budget_overview(
            &self.store.financial_goals(),
            &self.store.transactions(),
            month,
        )
    }

    // --- savings goals ---

    pub fn savings_goals(&self) -> Vec<SavingsGoal> {
        self.store.savings_goals()
    }

    pub fn add_savings_goal(&self, new: NewSavingsGoal) -> Result<SavingsGoal> {
        ensure_name("name", &new.name)?;
        ensure_positive("targetAmount", new.target_amount)?;
        let goal = SavingsGoal {
            id: new_id(),
            name: new.name.trim().to_string(),
            target_amount: new.target_amount,
            current_amount: Decimal::ZERO,
            deadline: new.deadline,
            created_at: Utc::now(),
        };
        self.store.insert(goal.clone())?;
        Ok(goal)
    }

    fn credit_savings_goal(&self, id: &str, amount: Decimal) -> Result<SavingsGoal> {
        let mut goal = self.require::<SavingsGoal>(id)?;
        goal.current_amount = goal
            .current_amount
            .checked_add(amount)
            .ok_or_else(|| FinanceError::invalid("amount", "savings balance would overflow"))?;
        self.store.put(goal.clone())?;
        debug!(goal = %goal.id, %amount, current = %goal.current_amount, "savings goal credited");
        Ok(goal)
    }

    /// Manual deposit, independent of any transaction.
    pub fn deposit_to_savings_goal(&self, id: &str, amount: Decimal) -> Result<SavingsGoal> {
        ensure_positive("amount", amount)?;
        self.credit_savings_goal(id, amount)
    }

    /// The only path that may set `current_amount` directly.
    pub fn update_savings_goal(&self, id: &str, patch: SavingsGoalPatch) -> Result<SavingsGoal> {
        self.merge(id, patch, |goal: &SavingsGoal| {
            ensure_name("name", &goal.name)?;
            ensure_positive("targetAmount", goal.target_amount)?;
            ensure_non_negative("currentAmount", goal.current_amount)
        })
    }

    pub fn delete_savings_goal(&self, id: &str) -> Result<Vec<SavingsGoal>> {
        self.require::<SavingsGoal>(id)?;
        self.store.remove::<SavingsGoal>(id)
    }

    // --- income sources and wallets ---

    pub fn income_sources(&self) -> Vec<IncomeSource> {
        self.store.income_sources()
    }

    pub fn add_income_source(&self, new: NewIncomeSource) -> Result<IncomeSource> {
        ensure_name("name", &new.name)?;
        if !validate_distribution(&new.distributions) {
            return Err(FinanceError::DistributionSum(distribution_total(
                &new.distributions,
            )));
        }
        let source = IncomeSource {
            id: new_id(),
            name: new.name.trim().to_string(),
            distributions: active_distributions(new.distributions),
        };
        self.store.insert(source.clone())?;
        Ok(source)
    }

    pub fn update_income_source(&self, id: &str, patch: IncomeSourcePatch) -> Result<IncomeSource> {
        let IncomeSourcePatch {
            name,
            distributions,
        } = patch;
        let distributions = match distributions {
            Some(d) if !validate_distribution(&d) => {
                return Err(FinanceError::DistributionSum(distribution_total(&d)));
            }
            Some(d) => Some(active_distributions(d)),
            None => None,
        };
        let patch = IncomeSourcePatch {
            name,
            distributions,
        };
        self.merge(id, patch, |source: &IncomeSource| ensure_name("name", &source.name))
    }

    pub fn delete_income_source(&self, id: &str) -> Result<Vec<IncomeSource>> {
        self.require::<IncomeSource>(id)?;
        self.store.remove::<IncomeSource>(id)
    }

    pub fn wallets(&self) -> Vec<Wallet> {
        self.store.wallets()
    }

    pub fn add_wallet(&self, new: NewWallet) -> Result<Wallet> {
        ensure_name("name", &new.name)?;
        let wallet = Wallet {
            id: new_id(),
            name: new.name.trim().to_string(),
            icon: new.icon,
            color: new.color,
            balance: Decimal::ZERO,
        };
        self.store.insert(wallet.clone())?;
        Ok(wallet)
    }

    pub fn update_wallet(&self, id: &str, patch: WalletPatch) -> Result<Wallet> {
        self.merge(id, patch, |w: &Wallet| ensure_name("name", &w.name))
    }

    pub fn delete_wallet(&self, id: &str) -> Result<Vec<Wallet>> {
        self.require::<Wallet>(id)?;
        self.store.remove::<Wallet>(id)
    }

    pub fn wallet_transactions(&self) -> Vec<WalletTransaction> {
        self.store.wallet_transactions()
    }

    pub fn record_wallet_transaction(
        &self,
        new: NewWalletTransaction,
    ) -> Result<WalletTransaction> {
        ensure_positive("amount", new.amount)?;
        self.require::<Wallet>(&new.wallet_id)?;
        let movement = WalletTransaction {
            id: new_id(),
            wallet_id: new.wallet_id,
            amount: new.amount,
            movement: new.movement,
            description: new.description.trim().to_string(),
            date: new.date,
            linked_transaction_id: new.linked_transaction_id,
        };
        self.store.insert(movement.clone())?;
        Ok(movement)
    }

    pub fn wallet_balances(&self, month: YearMonth) -> Vec<WalletBalance> {
        stats::wallet_monthly_balances(
            &self.store.wallets(),
            &self.store.wallet_transactions(),
            month,
        )
    }

    // --- aggregation ---

    pub fn monthly_stats(&self, month: YearMonth) -> MonthlyStats {
        stats::monthly_stats(&self.store.transactions(), month)
    }

    pub fn marketing_roi(&self, month: YearMonth) -> MarketingRoi {
        stats::marketing_roi(&self.store.transactions(), &self.store.categories(), month)
    }

    pub fn annual_stats(&self, year: i32) -> AnnualStats {
        stats::annual_stats(&self.store.transactions(), year)
    }

    pub fn investment_trend(&self, end: YearMonth, months: usize) -> Vec<MonthAmount> {
        stats::investment_trend(&self.store.transactions(), end, months)
    }

    // --- settings and backup ---

    pub fn settings(&self) -> UserSettings {
        self.store.settings()
    }

    pub fn update_settings(&self, patch: SettingsPatch) -> Result<UserSettings> {
        let mut settings = self.store.settings();
        patch.apply(&mut settings);
        ensure_name("displayName", &settings.display_name)?;
        ensure_name("currency", &settings.currency)?;
        settings.currency = settings.currency.trim().to_uppercase();
        self.store.save_settings(&settings)?;
        Ok(settings)
    }

    pub fn export_backup(&self) -> Result<String> {
        self.store.export_json()
    }

    pub fn import_backup(&self, raw: &str) -> Result<Vec<&'static str>> {
        let tables = self.store.import_json(raw)?;
        info!(count = tables.len(), "tables restored from backup");
        Ok(tables)
    }
}
