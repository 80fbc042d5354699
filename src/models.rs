// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Checking,
    Savings,
    Credit,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Checking => "checking",
            AccountType::Savings => "savings",
            AccountType::Credit => "credit",
        }
    }
}

impl FromStr for AccountType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "checking" => Ok(AccountType::Checking),
            "savings" => Ok(AccountType::Savings),
            "credit" => Ok(AccountType::Credit),
            other => Err(LedgerError::Validation(format!(
                "unknown account type '{}' (use checking|savings|credit)",
                other
            ))),
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    pub r#type: AccountType,
    pub currency: String,
    pub is_active: bool,
    pub balance: Decimal,
    pub cleared_balance: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    pub color: String,
    pub icon: Option<String>,
    pub is_default: bool,
}

/// Clearing state of a transaction. Only `Cleared` counts toward the
/// cleared balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Cleared,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Cleared => "cleared",
        }
    }
}

impl FromStr for TransactionStatus {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(TransactionStatus::Pending),
            "cleared" => Ok(TransactionStatus::Cleared),
            other => Err(LedgerError::Validation(format!(
                "unknown status '{}' (use pending|cleared)",
                other
            ))),
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Expense,
    Income,
    Transfer,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Expense => "expense",
            TransactionType::Income => "income",
            TransactionType::Transfer => "transfer",
        }
    }

    /// Apply the sign convention for this type: expenses are outflows,
    /// income is an inflow, transfers keep the sign they were entered with.
    pub fn signed(&self, amount: Decimal) -> Decimal {
        match self {
            TransactionType::Expense => -amount.abs(),
            TransactionType::Income => amount.abs(),
            TransactionType::Transfer => amount,
        }
    }
}

impl FromStr for TransactionType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "expense" => Ok(TransactionType::Expense),
            "income" => Ok(TransactionType::Income),
            "transfer" => Ok(TransactionType::Transfer),
            other => Err(LedgerError::Validation(format!(
                "unknown transaction type '{}' (use expense|income|transfer)",
                other
            ))),
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurringFrequency {
    Weekly,
    Monthly,
    Yearly,
}

impl RecurringFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecurringFrequency::Weekly => "weekly",
            RecurringFrequency::Monthly => "monthly",
            RecurringFrequency::Yearly => "yearly",
        }
    }
}

impl FromStr for RecurringFrequency {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "weekly" => Ok(RecurringFrequency::Weekly),
            "monthly" => Ok(RecurringFrequency::Monthly),
            "yearly" => Ok(RecurringFrequency::Yearly),
            other => Err(LedgerError::Validation(format!(
                "unknown frequency '{}' (use weekly|monthly|yearly)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub owner_id: i64,
    pub account_id: i64,
    pub category_id: i64,
    pub description: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub status: TransactionStatus,
    pub r#type: TransactionType,
    pub is_recurring: bool,
    pub recurring_frequency: Option<RecurringFrequency>,
    pub recurring_end_date: Option<NaiveDate>,
}

/// Fields for a transaction that does not exist yet.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub account_id: i64,
    pub category_id: i64,
    pub description: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub status: TransactionStatus,
    pub r#type: TransactionType,
    pub recurring_frequency: Option<RecurringFrequency>,
    pub recurring_end_date: Option<NaiveDate>,
}

/// Partial update of a transaction; `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct TransactionPatch {
    pub account_id: Option<i64>,
    pub category_id: Option<i64>,
    pub description: Option<String>,
    pub amount: Option<Decimal>,
    pub date: Option<NaiveDate>,
    pub status: Option<TransactionStatus>,
    pub r#type: Option<TransactionType>,
    pub recurring_frequency: Option<Option<RecurringFrequency>>,
    pub recurring_end_date: Option<Option<NaiveDate>>,
}

impl TransactionPatch {
    pub fn apply(&self, t: &mut Transaction) {
        if let Some(v) = self.account_id {
            t.account_id = v;
        }
        if let Some(v) = self.category_id {
            t.category_id = v;
        }
        if let Some(v) = &self.description {
            t.description = v.clone();
        }
        if let Some(v) = self.amount {
            t.amount = v;
        }
        if let Some(v) = self.date {
            t.date = v;
        }
        if let Some(v) = self.status {
            t.status = v;
        }
        if let Some(v) = self.r#type {
            t.r#type = v;
        }
        if let Some(v) = self.recurring_frequency {
            t.recurring_frequency = v;
            t.is_recurring = v.is_some();
        }
        if let Some(v) = self.recurring_end_date {
            t.recurring_end_date = v;
        }
    }
}
