// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{optional, required};
use crate::config::Config;
use crate::models::{Account, AccountType};
use crate::store::accounts::{self, AccountPatch, NewAccount};
use crate::utils::{get_default_currency, maybe_print_json, parse_bool, parse_decimal, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(conn: &Connection, cfg: &Config, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, cfg, sub)?,
        Some(("list", sub)) => list(conn, cfg, sub)?,
        Some(("show", sub)) => show(conn, cfg, sub)?,
        Some(("edit", sub)) => edit(conn, cfg, sub)?,
        Some(("rm", sub)) => {
            let name = required(sub, "name")?;
            let account = accounts::get_by_name(conn, cfg.owner_id, name)?;
            accounts::delete(conn, cfg.owner_id, account.id)?;
            println!("Removed account '{}'", name);
        }
        _ => {}
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct AccountRow {
    pub id: i64,
    pub name: String,
    pub r#type: AccountType,
    pub currency: String,
    pub active: bool,
    pub balance: Decimal,
    pub cleared_balance: Decimal,
    pub pending: i64,
}

impl AccountRow {
    fn cells(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.r#type.to_string(),
            self.currency.clone(),
            format!("{:.2}", self.balance),
            format!("{:.2}", self.cleared_balance),
            self.pending.to_string(),
            if self.active { "yes" } else { "no" }.to_string(),
        ]
    }
}

const HEADERS: [&str; 7] = [
    "Name", "Type", "CCY", "Balance", "Cleared", "Pending", "Active",
];

pub fn account_row(conn: &Connection, a: Account) -> Result<AccountRow> {
    let pending = accounts::pending_count(conn, a.id)?;
    Ok(AccountRow {
        id: a.id,
        name: a.name,
        r#type: a.r#type,
        currency: a.currency,
        active: a.is_active,
        balance: a.balance,
        cleared_balance: a.cleared_balance,
        pending,
    })
}

pub fn account_rows(conn: &Connection, owner_id: i64) -> Result<Vec<AccountRow>> {
    accounts::list(conn, owner_id)?
        .into_iter()
        .map(|a| account_row(conn, a))
        .collect()
}

fn add(conn: &Connection, cfg: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let currency = match optional(sub, "currency") {
        Some(c) => c.to_string(),
        None => get_default_currency(conn)?,
    };
    let new = NewAccount {
        name: required(sub, "name")?.to_string(),
        r#type: required(sub, "type")?.parse::<AccountType>()?,
        currency,
        balance: parse_decimal(required(sub, "balance")?)?,
        cleared_balance: parse_decimal(required(sub, "cleared")?)?,
    };
    let account = accounts::create(conn, cfg.owner_id, &new)?;
    println!(
        "Added account '{}' ({}, {}) with opening balance {:.2}",
        account.name, account.r#type, account.currency, account.balance
    );
    Ok(())
}

fn list(conn: &Connection, cfg: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let rows = account_rows(conn, cfg.owner_id)?;
    if !maybe_print_json(sub.get_flag("json"), &rows)? {
        let data = rows.iter().map(AccountRow::cells).collect();
        println!("{}", pretty_table(&HEADERS, data));
    }
    Ok(())
}

fn show(conn: &Connection, cfg: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let account = accounts::get_by_name(conn, cfg.owner_id, required(sub, "name")?)?;
    let row = account_row(conn, account)?;
    if !maybe_print_json(sub.get_flag("json"), &row)? {
        println!("{}", pretty_table(&HEADERS, vec![row.cells()]));
    }
    Ok(())
}

fn edit(conn: &Connection, cfg: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let account = accounts::get_by_name(conn, cfg.owner_id, required(sub, "name")?)?;
    let patch = AccountPatch {
        name: optional(sub, "rename").map(str::to_string),
        r#type: optional(sub, "type")
            .map(str::parse::<AccountType>)
            .transpose()?,
        currency: optional(sub, "currency").map(str::to_string),
        balance: optional(sub, "balance").map(parse_decimal).transpose()?,
        is_active: optional(sub, "active").map(parse_bool).transpose()?,
    };
    let updated = accounts::update(conn, cfg.owner_id, account.id, &patch)?;
    println!("Updated account '{}'", updated.name);
    Ok(())
}
