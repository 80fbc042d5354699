// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Error type shared by the stores and the balance ledger.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// A read or write against SQLite failed. Balance fields are written in a
    /// single statement, so a failed write leaves both at their last value.
    #[error("persistence failure: {0}")]
    Persistence(#[from] rusqlite::Error),

    #[error("invalid stored data: {0}")]
    InvalidData(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("cannot delete {entity} '{name}' while it has transactions")]
    HasTransactions { entity: &'static str, name: String },
}

impl LedgerError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        LedgerError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, LedgerError::NotFound { .. })
    }
}

pub type LedgerResult<T> = Result<T, LedgerError>;
