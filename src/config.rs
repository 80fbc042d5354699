// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::db;

/// Runtime settings resolved from global CLI options and their
/// `CASHBOOK_*` environment fallbacks.
#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: PathBuf,
    pub owner_id: i64,
    pub log_filter: String,
}

impl Config {
    pub fn from_matches(m: &clap::ArgMatches) -> Result<Self> {
        let db_path = match m.get_one::<String>("db") {
            Some(p) => PathBuf::from(p.trim()),
            None => db::db_path()?,
        };
        let owner_id = match m.get_one::<String>("user") {
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .with_context(|| format!("Invalid user id '{}'", raw))?,
            None => db::DEFAULT_USER_ID,
        };
        let log_filter = m
            .get_one::<String>("log")
            .map(|s| s.trim().to_string())
            .unwrap_or_else(|| "warn".to_string());
        Ok(Self {
            db_path,
            owner_id,
            log_filter,
        })
    }
}
