// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Typed SQLite access. Every query that a user can reach is scoped by an
//! explicit `owner_id`; only the balance ledger reads accounts and
//! transactions by bare id.

pub mod accounts;
pub mod categories;
pub mod transactions;
pub mod users;

use rust_decimal::Decimal;

use crate::error::{LedgerError, LedgerResult};

pub(crate) fn parse_stored_decimal(raw: &str, what: &str) -> LedgerResult<Decimal> {
    raw.trim()
        .parse::<Decimal>()
        .map_err(|e| LedgerError::InvalidData(format!("{} '{}': {}", what, raw, e)))
}

pub(crate) fn validate_name(kind: &str, name: &str) -> LedgerResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(LedgerError::Validation(format!("{} name is required", kind)));
    }
    if name.chars().count() > 255 {
        return Err(LedgerError::Validation(format!(
            "{} name is longer than 255 characters",
            kind
        )));
    }
    Ok(name.to_string())
}
