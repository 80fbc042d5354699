// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{params, Connection, Row};
use rust_decimal::Decimal;

use super::{parse_stored_decimal, validate_name};
use crate::error::{LedgerError, LedgerResult};
use crate::ledger::Balances;
use crate::models::{Account, AccountType};
use crate::utils::money;

const COLUMNS: &str =
    "id, owner_id, name, type, currency, is_active, balance, cleared_balance";

#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    pub r#type: AccountType,
    pub currency: String,
    /// Opening figures; replaced by derived values on the first
    /// transaction mutation.
    pub balance: Decimal,
    pub cleared_balance: Decimal,
}

#[derive(Debug, Clone, Default)]
pub struct AccountPatch {
    pub name: Option<String>,
    pub r#type: Option<AccountType>,
    pub currency: Option<String>,
    pub balance: Option<Decimal>,
    pub is_active: Option<bool>,
}

fn row_to_account(r: &Row<'_>) -> LedgerResult<Account> {
    let type_raw: String = r.get(3)?;
    let balance_raw: String = r.get(6)?;
    let cleared_raw: String = r.get(7)?;
    Ok(Account {
        id: r.get(0)?,
        owner_id: r.get(1)?,
        name: r.get(2)?,
        r#type: type_raw
            .parse()
            .map_err(|_| LedgerError::InvalidData(format!("account type '{}'", type_raw)))?,
        currency: r.get(4)?,
        is_active: r.get::<_, i64>(5)? != 0,
        balance: parse_stored_decimal(&balance_raw, "balance")?,
        cleared_balance: parse_stored_decimal(&cleared_raw, "cleared balance")?,
    })
}

fn normalize_currency(ccy: &str) -> LedgerResult<String> {
    let ccy = ccy.trim().to_uppercase();
    if ccy.len() != 3 || !ccy.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(LedgerError::Validation(format!(
            "currency '{}' must be a 3-letter code",
            ccy
        )));
    }
    Ok(ccy)
}

pub fn create(conn: &Connection, owner_id: i64, new: &NewAccount) -> LedgerResult<Account> {
    let name = validate_name("account", &new.name)?;
    let currency = normalize_currency(&new.currency)?;
    conn.execute(
        "INSERT INTO accounts(owner_id, name, type, currency, balance, cleared_balance)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            owner_id,
            name,
            new.r#type.as_str(),
            currency,
            money(new.balance).to_string(),
            money(new.cleared_balance).to_string(),
        ],
    )?;
    let id = conn.last_insert_rowid();
    tracing::info!(owner_id, account_id = id, "created account '{}'", name);
    get(conn, owner_id, id)
}

/// Look up an account by id regardless of owner.
pub fn find(conn: &Connection, id: i64) -> LedgerResult<Option<Account>> {
    let sql = format!("SELECT {} FROM accounts WHERE id=?1", COLUMNS);
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(params![id])?;
    match rows.next()? {
        Some(r) => Ok(Some(row_to_account(r)?)),
        None => Ok(None),
    }
}

pub fn get(conn: &Connection, owner_id: i64, id: i64) -> LedgerResult<Account> {
    match find(conn, id)? {
        Some(a) if a.owner_id == owner_id => Ok(a),
        _ => Err(LedgerError::not_found("account", id)),
    }
}

pub fn get_by_name(conn: &Connection, owner_id: i64, name: &str) -> LedgerResult<Account> {
    let sql = format!(
        "SELECT {} FROM accounts WHERE owner_id=?1 AND name=?2",
        COLUMNS
    );
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(params![owner_id, name.trim()])?;
    match rows.next()? {
        Some(r) => row_to_account(r),
        None => Err(LedgerError::not_found("account", name.trim())),
    }
}

pub fn list(conn: &Connection, owner_id: i64) -> LedgerResult<Vec<Account>> {
    let sql = format!(
        "SELECT {} FROM accounts WHERE owner_id=?1 ORDER BY name",
        COLUMNS
    );
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(params![owner_id])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        out.push(row_to_account(r)?);
    }
    Ok(out)
}

/// Every account in the store, across owners.
pub fn list_all(conn: &Connection) -> LedgerResult<Vec<Account>> {
    let sql = format!("SELECT {} FROM accounts ORDER BY id", COLUMNS);
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query([])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        out.push(row_to_account(r)?);
    }
    Ok(out)
}

pub fn update(
    conn: &Connection,
    owner_id: i64,
    id: i64,
    patch: &AccountPatch,
) -> LedgerResult<Account> {
    let mut account = get(conn, owner_id, id)?;
    if let Some(name) = &patch.name {
        account.name = validate_name("account", name)?;
    }
    if let Some(t) = patch.r#type {
        account.r#type = t;
    }
    if let Some(ccy) = &patch.currency {
        account.currency = normalize_currency(ccy)?;
    }
    if let Some(b) = patch.balance {
        account.balance = b;
    }
    if let Some(active) = patch.is_active {
        account.is_active = active;
    }
    conn.execute(
        "UPDATE accounts SET name=?1, type=?2, currency=?3, balance=?4, is_active=?5,
         updated_at=datetime('now') WHERE id=?6",
        params![
            account.name,
            account.r#type.as_str(),
            account.currency,
            money(account.balance).to_string(),
            account.is_active as i64,
            id,
        ],
    )?;
    tracing::info!(owner_id, account_id = id, "updated account '{}'", account.name);
    get(conn, owner_id, id)
}

pub fn delete(conn: &Connection, owner_id: i64, id: i64) -> LedgerResult<()> {
    let account = get(conn, owner_id, id)?;
    if transaction_count(conn, id)? > 0 {
        return Err(LedgerError::HasTransactions {
            entity: "account",
            name: account.name,
        });
    }
    conn.execute("DELETE FROM accounts WHERE id=?1", params![id])?;
    tracing::info!(owner_id, account_id = id, "deleted account '{}'", account.name);
    Ok(())
}

/// Persist both balance fields in a single statement.
pub fn write_balances(conn: &Connection, id: i64, balances: &Balances) -> LedgerResult<()> {
    let changed = conn.execute(
        "UPDATE accounts SET balance=?1, cleared_balance=?2, updated_at=datetime('now')
         WHERE id=?3",
        params![
            money(balances.total).to_string(),
            money(balances.cleared).to_string(),
            id
        ],
    )?;
    if changed == 0 {
        return Err(LedgerError::not_found("account", id));
    }
    Ok(())
}

pub fn transaction_count(conn: &Connection, id: i64) -> LedgerResult<i64> {
    let n: i64 = conn.query_row(
        "SELECT COUNT(*) FROM transactions WHERE account_id=?1",
        params![id],
        |r| r.get(0),
    )?;
    Ok(n)
}

pub fn pending_count(conn: &Connection, id: i64) -> LedgerResult<i64> {
    let n: i64 = conn.query_row(
        "SELECT COUNT(*) FROM transactions WHERE account_id=?1 AND status='pending'",
        params![id],
        |r| r.get(0),
    )?;
    Ok(n)
}
