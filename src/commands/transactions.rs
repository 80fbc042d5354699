// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashMap;

use super::{optional, required};
use crate::config::Config;
use crate::models::{
    NewTransaction, RecurringFrequency, Transaction, TransactionPatch, TransactionStatus,
    TransactionType,
};
use crate::store::transactions::{self, TransactionFilter};
use crate::store::{accounts, categories};
use crate::utils::{maybe_print_json, parse_date, parse_decimal, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;

pub fn handle(conn: &Connection, cfg: &Config, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, cfg, sub)?,
        Some(("list", sub)) => list(conn, cfg, sub)?,
        Some(("show", sub)) => show(conn, cfg, sub)?,
        Some(("edit", sub)) => edit(conn, cfg, sub)?,
        Some(("status", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap_or(&0);
            let status = required(sub, "status")?.parse::<TransactionStatus>()?;
            let t = transactions::set_status(conn, cfg.owner_id, id, status)?;
            println!("Transaction {} is now {}", t.id, t.status);
        }
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap_or(&0);
            transactions::delete(conn, cfg.owner_id, id)?;
            println!("Removed transaction {}", id);
        }
        _ => {}
    }
    Ok(())
}

fn parse_recurring(raw: &str) -> Result<Option<RecurringFrequency>> {
    if raw.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    Ok(Some(raw.parse::<RecurringFrequency>()?))
}

fn add(conn: &Connection, cfg: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let account = accounts::get_by_name(conn, cfg.owner_id, required(sub, "account")?)?;
    let category = categories::get_by_name(conn, cfg.owner_id, required(sub, "category")?)?;
    let ty = required(sub, "type")?.parse::<TransactionType>()?;
    let amount = ty.signed(parse_decimal(required(sub, "amount")?)?);
    let new = NewTransaction {
        account_id: account.id,
        category_id: category.id,
        description: required(sub, "description")?.to_string(),
        amount,
        date: parse_date(required(sub, "date")?)?,
        status: required(sub, "status")?.parse::<TransactionStatus>()?,
        r#type: ty,
        recurring_frequency: optional(sub, "recurring")
            .map(parse_recurring)
            .transpose()?
            .flatten(),
        recurring_end_date: optional(sub, "until").map(parse_date).transpose()?,
    };
    let t = transactions::create(conn, cfg.owner_id, &new)?;
    println!(
        "Recorded #{} {:.2} on {} '{}' (acct: {})",
        t.id, t.amount, t.date, t.description, account.name
    );
    Ok(())
}

fn edit(conn: &Connection, cfg: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap_or(&0);
    let current = transactions::get(conn, cfg.owner_id, id)?;
    let ty = optional(sub, "type")
        .map(str::parse::<TransactionType>)
        .transpose()?;
    let effective_type = ty.unwrap_or(current.r#type);
    let amount = match optional(sub, "amount") {
        Some(raw) => Some(effective_type.signed(parse_decimal(raw)?)),
        None if ty.is_some() => Some(effective_type.signed(current.amount)),
        None => None,
    };
    let patch = TransactionPatch {
        account_id: optional(sub, "account")
            .map(|n| accounts::get_by_name(conn, cfg.owner_id, n).map(|a| a.id))
            .transpose()?,
        category_id: optional(sub, "category")
            .map(|n| categories::get_by_name(conn, cfg.owner_id, n).map(|c| c.id))
            .transpose()?,
        description: optional(sub, "description").map(str::to_string),
        amount,
        date: optional(sub, "date").map(parse_date).transpose()?,
        status: optional(sub, "status")
            .map(str::parse::<TransactionStatus>)
            .transpose()?,
        r#type: ty,
        recurring_frequency: optional(sub, "recurring").map(parse_recurring).transpose()?,
        recurring_end_date: optional(sub, "until")
            .map(|raw| {
                if raw.eq_ignore_ascii_case("none") {
                    Ok(None)
                } else {
                    parse_date(raw).map(Some)
                }
            })
            .transpose()?,
    };
    let t = transactions::update(conn, cfg.owner_id, id, &patch)?;
    println!("Updated transaction #{} ({:.2}, {})", t.id, t.amount, t.status);
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct TransactionRow {
    pub id: i64,
    pub date: String,
    pub account: String,
    pub category: String,
    pub description: String,
    pub amount: String,
    pub status: TransactionStatus,
    pub r#type: TransactionType,
    pub recurring: Option<RecurringFrequency>,
}

impl TransactionRow {
    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.date.clone(),
            self.account.clone(),
            self.category.clone(),
            self.description.clone(),
            self.amount.clone(),
            self.status.to_string(),
            self.r#type.to_string(),
            self.recurring
                .map(|f| f.as_str().to_string())
                .unwrap_or_default(),
        ]
    }
}

const HEADERS: [&str; 9] = [
    "Id",
    "Date",
    "Account",
    "Category",
    "Description",
    "Amount",
    "Status",
    "Type",
    "Recurring",
];

pub struct NameMaps {
    pub accounts: HashMap<i64, String>,
    pub categories: HashMap<i64, String>,
}

impl NameMaps {
    pub fn load(conn: &Connection, owner_id: i64) -> Result<Self> {
        Ok(Self {
            accounts: accounts::list(conn, owner_id)?
                .into_iter()
                .map(|a| (a.id, a.name))
                .collect(),
            categories: categories::list(conn, owner_id)?
                .into_iter()
                .map(|c| (c.id, c.name))
                .collect(),
        })
    }

    pub fn row(&self, t: &Transaction) -> TransactionRow {
        TransactionRow {
            id: t.id,
            date: t.date.to_string(),
            account: self.accounts.get(&t.account_id).cloned().unwrap_or_default(),
            category: self
                .categories
                .get(&t.category_id)
                .cloned()
                .unwrap_or_default(),
            description: t.description.clone(),
            amount: format!("{:.2}", t.amount),
            status: t.status,
            r#type: t.r#type,
            recurring: t.recurring_frequency,
        }
    }
}

pub fn query_rows(
    conn: &Connection,
    owner_id: i64,
    sub: &clap::ArgMatches,
) -> Result<Vec<TransactionRow>> {
    let filter = TransactionFilter {
        account_id: optional(sub, "account")
            .map(|n| accounts::get_by_name(conn, owner_id, n).map(|a| a.id))
            .transpose()?,
        category_id: optional(sub, "category")
            .map(|n| categories::get_by_name(conn, owner_id, n).map(|c| c.id))
            .transpose()?,
        status: optional(sub, "status")
            .map(str::parse::<TransactionStatus>)
            .transpose()?,
        since: None,
        limit: sub.get_one::<usize>("limit").copied(),
    };
    let names = NameMaps::load(conn, owner_id)?;
    Ok(transactions::list(conn, owner_id, &filter)?
        .iter()
        .map(|t| names.row(t))
        .collect())
}

fn list(conn: &Connection, cfg: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let data = query_rows(conn, cfg.owner_id, sub)?;
    if !maybe_print_json(sub.get_flag("json"), &data)? {
        let rows = data.iter().map(TransactionRow::cells).collect();
        println!("{}", pretty_table(&HEADERS, rows));
    }
    Ok(())
}

fn show(conn: &Connection, cfg: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap_or(&0);
    let t = transactions::get(conn, cfg.owner_id, id)?;
    if !maybe_print_json(sub.get_flag("json"), &t)? {
        let names = NameMaps::load(conn, cfg.owner_id)?;
        println!("{}", pretty_table(&HEADERS, vec![names.row(&t).cells()]));
        if let Some(until) = t.recurring_end_date {
            println!("Recurs until {}", until);
        }
    }
    Ok(())
}
