// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Typed entity tables persisted as JSON blobs in a key-value backend.
//!
//! Every table is read whole, modified in memory and written back whole. A
//! table that cannot be read or decoded is treated as empty (or as its seed
//! data) so a damaged blob never takes the application down.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::errors::{FinanceError, Result};
use crate::models::{
    default_categories, default_wallets, Category, CategoryPatch, FinancialGoal,
    FinancialGoalPatch, IncomeSource, IncomeSourcePatch, SavingsGoal, SavingsGoalPatch,
    SettingsPatch, Transaction, TransactionPatch, UserSettings, Wallet, WalletPatch,
    WalletTransaction,
};

pub const SETTINGS_KEY: &str = "settings";

/// Synchronous string key-value storage.
pub trait KvBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Writes several keys as one unit when the backend supports it.
    fn set_items(&self, items: &[(&str, String)]) -> Result<()> {
        for (key, value) in items {
            self.set_item(key, value)?;
        }
        Ok(())
    }
}

impl<B: KvBackend + ?Sized> KvBackend for &B {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        (**self).set_item(key, value)
    }

    fn set_items(&self, items: &[(&str, String)]) -> Result<()> {
        (**self).set_items(items)
    }
}

/// A record type stored in its own table.
pub trait Entity: Serialize + DeserializeOwned + Clone {
    const KEY: &'static str;
    const NAME: &'static str;
    /// Newest-first tables insert at the front.
    const PREPEND: bool = false;

    fn id(&self) -> &str;

    /// Rows reported when the stored table is empty.
    fn seed() -> Vec<Self> {
        Vec::new()
    }
}

/// Partial-field merge onto an existing record.
pub trait Patch<T> {
    fn apply(self, target: &mut T);
}

impl Entity for Transaction {
    const KEY: &'static str = "transactions";
    const NAME: &'static str = "Transaction";
    const PREPEND: bool = true;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for Category {
    const KEY: &'static str = "categories";
    const NAME: &'static str = "Category";

    fn id(&self) -> &str {
        &self.id
    }

    fn seed() -> Vec<Self> {
        default_categories()
    }
}

impl Entity for FinancialGoal {
    const KEY: &'static str = "goals";
    const NAME: &'static str = "Budget";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for SavingsGoal {
    const KEY: &'static str = "savingsGoals";
    const NAME: &'static str = "Savings goal";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for IncomeSource {
    const KEY: &'static str = "incomeSources";
    const NAME: &'static str = "Income source";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for Wallet {
    const KEY: &'static str = "wallets";
    const NAME: &'static str = "Wallet";

    fn id(&self) -> &str {
        &self.id
    }

    fn seed() -> Vec<Self> {
        default_wallets()
    }
}

impl Entity for WalletTransaction {
    const KEY: &'static str = "walletTransactions";
    const NAME: &'static str = "Wallet transaction";
    const PREPEND: bool = true;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Patch<Transaction> for TransactionPatch {
    fn apply(self, t: &mut Transaction) {
        if let Some(v) = self.amount {
            t.amount = v;
        }
        if let Some(v) = self.kind {
            t.kind = v;
        }
        if let Some(v) = self.category_id {
            t.category_id = v;
        }
        if let Some(v) = self.description {
            t.description = v;
        }
        if let Some(v) = self.date {
            t.date = v;
        }
    }
}

impl Patch<Category> for CategoryPatch {
    fn apply(self, c: &mut Category) {
        if let Some(v) = self.name {
            c.name = v;
        }
        if let Some(v) = self.icon {
            c.icon = v;
        }
        if let Some(v) = self.color {
            c.color = v;
        }
        if let Some(v) = self.kind {
            c.kind = v;
        }
    }
}

impl Patch<FinancialGoal> for FinancialGoalPatch {
    fn apply(self, g: &mut FinancialGoal) {
        if let Some(v) = self.category_id {
            g.category_id = v;
        }
        if let Some(v) = self.monthly_limit {
            g.monthly_limit = v;
        }
        if let Some(v) = self.month {
            g.month = v;
        }
    }
}

impl Patch<SavingsGoal> for SavingsGoalPatch {
    fn apply(self, g: &mut SavingsGoal) {
        if let Some(v) = self.name {
            g.name = v;
        }
        if let Some(v) = self.target_amount {
            g.target_amount = v;
        }
        if let Some(v) = self.current_amount {
            g.current_amount = v;
        }
        if let Some(v) = self.deadline {
            g.deadline = Some(v);
        }
    }
}

impl Patch<IncomeSource> for IncomeSourcePatch {
    fn apply(self, s: &mut IncomeSource) {
        if let Some(v) = self.name {
            s.name = v;
        }
        if let Some(v) = self.distributions {
            s.distributions = v;
        }
    }
}

impl Patch<Wallet> for WalletPatch {
    fn apply(self, w: &mut Wallet) {
        if let Some(v) = self.name {
            w.name = v;
        }
        if let Some(v) = self.icon {
            w.icon = v;
        }
        if let Some(v) = self.color {
            w.color = v;
        }
    }
}

impl Patch<UserSettings> for SettingsPatch {
    fn apply(self, s: &mut UserSettings) {
        if let Some(v) = self.display_name {
            s.display_name = v;
        }
        if let Some(v) = self.currency {
            s.currency = v;
        }
        if let Some(v) = self.privacy_mode {
            s.privacy_mode = v;
        }
    }
}

/// Every table bundled into one document. Absent tables are `None`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transactions: Option<Vec<Transaction>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<Category>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goals: Option<Vec<FinancialGoal>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub savings_goals: Option<Vec<SavingsGoal>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub income_sources: Option<Vec<IncomeSource>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallets: Option<Vec<Wallet>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallet_transactions: Option<Vec<WalletTransaction>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<UserSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exported_at: Option<DateTime<Utc>>,
}

pub struct LedgerStore<B> {
    backend: B,
}

impl<B: KvBackend> LedgerStore<B> {
    pub fn new(backend: B) -> Self {
        LedgerStore { backend }
    }

    fn read<V: DeserializeOwned>(&self, key: &str) -> Option<V> {
        let raw = match self.backend.get_item(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                warn!(key, %err, "failed to read table, falling back to default");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(key, %err, "undecodable table, falling back to default");
                None
            }
        }
    }

    fn write<V: Serialize + ?Sized>(&self, key: &str, value: &V) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.backend.set_item(key, &raw)
    }

    /// All rows of a table, or its seed rows when the table is empty.
    pub fn all<T: Entity>(&self) -> Vec<T> {
        let rows: Vec<T> = self.read(T::KEY).unwrap_or_default();
        if rows.is_empty() {
            T::seed()
        } else {
            rows
        }
    }

    pub fn find<T: Entity>(&self, id: &str) -> Option<T> {
        self.all::<T>().into_iter().find(|row| row.id() == id)
    }

    pub fn replace_all<T: Entity>(&self, rows: &[T]) -> Result<()> {
        self.write(T::KEY, rows)?;
        debug!(table = T::KEY, rows = rows.len(), "table written");
        Ok(())
    }

    pub fn insert<T: Entity>(&self, record: T) -> Result<Vec<T>> {
        let mut rows = self.all::<T>();
        if T::PREPEND {
            rows.insert(0, record);
        } else {
            rows.push(record);
        }
        self.replace_all(&rows)?;
        Ok(rows)
    }

    /// Merges `patch` into the row with `id`. Unknown ids leave the table as is.
    pub fn update<T: Entity, P: Patch<T>>(&self, id: &str, patch: P) -> Result<Vec<T>> {
        let mut rows = self.all::<T>();
        if let Some(row) = rows.iter_mut().find(|row| row.id() == id) {
            patch.apply(row);
            self.replace_all(&rows)?;
        }
        Ok(rows)
    }

    /// Replaces the row carrying the same id as `record`.
    pub fn put<T: Entity>(&self, record: T) -> Result<Vec<T>> {
        let mut rows = self.all::<T>();
        match rows.iter_mut().find(|row| row.id() == record.id()) {
            Some(row) => *row = record,
            None => return Err(FinanceError::not_found(T::NAME, record.id())),
        }
        self.replace_all(&rows)?;
        Ok(rows)
    }

    pub fn remove<T: Entity>(&self, id: &str) -> Result<Vec<T>> {
        let rows: Vec<T> = self
            .all::<T>()
            .into_iter()
            .filter(|row| row.id() != id)
            .collect();
        self.replace_all(&rows)?;
        Ok(rows)
    }

    pub fn transactions(&self) -> Vec<Transaction> {
        self.all()
    }

    pub fn categories(&self) -> Vec<Category> {
        self.all()
    }

    pub fn financial_goals(&self) -> Vec<FinancialGoal> {
        self.all()
    }

    pub fn savings_goals(&self) -> Vec<SavingsGoal> {
        self.all()
    }

    pub fn income_sources(&self) -> Vec<IncomeSource> {
        self.all()
    }

    pub fn wallets(&self) -> Vec<Wallet> {
        self.all()
    }

    pub fn wallet_transactions(&self) -> Vec<WalletTransaction> {
        self.all()
    }

    pub fn settings(&self) -> UserSettings {
        self.read(SETTINGS_KEY).unwrap_or_default()
    }

    pub fn save_settings(&self, settings: &UserSettings) -> Result<()> {
        self.write(SETTINGS_KEY, settings)
    }

    pub fn export_document(&self) -> BackupDocument {
        BackupDocument {
            transactions: Some(self.transactions()),
            categories: Some(self.categories()),
            goals: Some(self.financial_goals()),
            savings_goals: Some(self.savings_goals()),
            income_sources: Some(self.income_sources()),
            wallets: Some(self.wallets()),
            wallet_transactions: Some(self.wallet_transactions()),
            settings: Some(self.settings()),
            exported_at: Some(Utc::now()),
        }
    }

    pub fn export_json(&self) -> Result<String> {
        let doc = self.export_document();
        info!(
            transactions = doc.transactions.as_ref().map_or(0, Vec::len),
            "exporting backup"
        );
        Ok(serde_json::to_string_pretty(&doc)?)
    }

    /// Overwrites every table present in `raw`; absent tables are untouched.
    ///
    /// The document is decoded in full before anything is written, so a
    /// malformed document leaves storage unchanged.
    pub fn import_json(&self, raw: &str) -> Result<Vec<&'static str>> {
        let doc: BackupDocument = serde_json::from_str(raw)
            .map_err(|err| FinanceError::MalformedBackup(err.to_string()))?;

        let mut items: Vec<(&'static str, String)> = Vec::new();
        if let Some(rows) = &doc.transactions {
            items.push((Transaction::KEY, serde_json::to_string(rows)?));
        }
        if let Some(rows) = &doc.categories {
            items.push((Category::KEY, serde_json::to_string(rows)?));
        }
        if let Some(rows) = &doc.goals {
            items.push((FinancialGoal::KEY, serde_json::to_string(rows)?));
        }
        if let Some(rows) = &doc.savings_goals {
            items.push((SavingsGoal::KEY, serde_json::to_string(rows)?));
        }
        if let Some(rows) = &doc.income_sources {
            items.push((IncomeSource::KEY, serde_json::to_string(rows)?));
        }
        if let Some(rows) = &doc.wallets {
            items.push((Wallet::KEY, serde_json::to_string(rows)?));
        }
        if let Some(rows) = &doc.wallet_transactions {
            items.push((WalletTransaction::KEY, serde_json::to_string(rows)?));
        }
        if let Some(settings) = &doc.settings {
            items.push((SETTINGS_KEY, serde_json::to_string(settings)?));
        }

        self.backend.set_items(&items)?;
        let tables: Vec<&'static str> = items.iter().map(|(key, _)| *key).collect();
        info!(?tables, "backup imported");
        Ok(tables)
    }
}
