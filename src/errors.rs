// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Failures raised by the ledger store and the controller on top of it.
#[derive(Debug, Error)]
pub enum FinanceError {
    #[error("Invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },
    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },
    #[error("Category '{id}' is still used by {count} transaction(s)")]
    CategoryInUse { id: String, count: usize },
    #[error("Distribution percentages must add up to 100 (got {0})")]
    DistributionSum(u64),
    #[error("Malformed backup document: {0}")]
    MalformedBackup(String),
    #[error("Transaction '{transaction_id}' was saved but its savings contribution was not applied: {source}")]
    ContributionNotApplied {
        transaction_id: String,
        #[source]
        source: Box<FinanceError>,
    },
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl FinanceError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        FinanceError::Validation {
            field,
            reason: reason.into(),
        }
    }

    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        FinanceError::NotFound {
            entity,
            id: id.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FinanceError>;
