// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Transaction persistence. `create`, `update`, `delete` and `set_status`
//! are the only write paths for transactions; each one recalculates the
//! balances of every account it touched inside the same SQLite transaction
//! before committing.

use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};

use super::{accounts, categories, parse_stored_decimal};
use crate::error::{LedgerError, LedgerResult};
use crate::ledger::BalanceLedger;
use crate::models::{
    NewTransaction, RecurringFrequency, Transaction, TransactionPatch, TransactionStatus,
};
use crate::utils::money;

const COLUMNS: &str = "id, owner_id, account_id, category_id, description, amount, date, status, \
                       type, is_recurring, recurring_frequency, recurring_end_date";

#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub account_id: Option<i64>,
    pub category_id: Option<i64>,
    pub status: Option<TransactionStatus>,
    pub since: Option<NaiveDate>,
    pub limit: Option<usize>,
}

fn row_to_transaction(r: &Row<'_>) -> LedgerResult<Transaction> {
    let amount_raw: String = r.get(5)?;
    let status_raw: String = r.get(7)?;
    let type_raw: String = r.get(8)?;
    let freq_raw: Option<String> = r.get(10)?;
    Ok(Transaction {
        id: r.get(0)?,
        owner_id: r.get(1)?,
        account_id: r.get(2)?,
        category_id: r.get(3)?,
        description: r.get(4)?,
        amount: parse_stored_decimal(&amount_raw, "amount")?,
        date: r.get(6)?,
        status: status_raw
            .parse()
            .map_err(|_| LedgerError::InvalidData(format!("status '{}'", status_raw)))?,
        r#type: type_raw
            .parse()
            .map_err(|_| LedgerError::InvalidData(format!("type '{}'", type_raw)))?,
        is_recurring: r.get::<_, i64>(9)? != 0,
        recurring_frequency: freq_raw
            .map(|f| {
                f.parse::<RecurringFrequency>()
                    .map_err(|_| LedgerError::InvalidData(format!("frequency '{}'", f)))
            })
            .transpose()?,
        recurring_end_date: r.get(11)?,
    })
}

fn validate_description(d: &str) -> LedgerResult<String> {
    let d = d.trim();
    if d.is_empty() {
        return Err(LedgerError::Validation("description is required".into()));
    }
    if d.chars().count() > 255 {
        return Err(LedgerError::Validation(
            "description is longer than 255 characters".into(),
        ));
    }
    Ok(d.to_string())
}

/// The complete, unordered set of transactions owned by an account.
pub fn for_account(conn: &Connection, account_id: i64) -> LedgerResult<Vec<Transaction>> {
    let sql = format!("SELECT {} FROM transactions WHERE account_id=?1", COLUMNS);
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(params![account_id])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        out.push(row_to_transaction(r)?);
    }
    Ok(out)
}

pub fn get(conn: &Connection, owner_id: i64, id: i64) -> LedgerResult<Transaction> {
    let sql = format!(
        "SELECT {} FROM transactions WHERE owner_id=?1 AND id=?2",
        COLUMNS
    );
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(params![owner_id, id])?;
    match rows.next()? {
        Some(r) => row_to_transaction(r),
        None => Err(LedgerError::not_found("transaction", id)),
    }
}

/// Newest first.
pub fn list(
    conn: &Connection,
    owner_id: i64,
    filter: &TransactionFilter,
) -> LedgerResult<Vec<Transaction>> {
    let mut sql = format!("SELECT {} FROM transactions WHERE owner_id=?", COLUMNS);
    let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(owner_id)];

    if let Some(acct) = filter.account_id {
        sql.push_str(" AND account_id=?");
        params_vec.push(Box::new(acct));
    }
    if let Some(cat) = filter.category_id {
        sql.push_str(" AND category_id=?");
        params_vec.push(Box::new(cat));
    }
    if let Some(status) = filter.status {
        sql.push_str(" AND status=?");
        params_vec.push(Box::new(status.as_str()));
    }
    if let Some(since) = filter.since {
        sql.push_str(" AND date>=?");
        params_vec.push(Box::new(since));
    }
    sql.push_str(" ORDER BY date DESC, id DESC");
    if let Some(limit) = filter.limit {
        sql.push_str(" LIMIT ?");
        params_vec.push(Box::new(limit as i64));
    }

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(rusqlite::params_from_iter(params_vec.iter()))?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        out.push(row_to_transaction(r)?);
    }
    Ok(out)
}

fn ensure_refs(conn: &Connection, owner_id: i64, account_id: i64, category_id: i64) -> LedgerResult<()> {
    accounts::get(conn, owner_id, account_id)?;
    categories::get(conn, owner_id, category_id)?;
    Ok(())
}

pub fn create(conn: &Connection, owner_id: i64, new: &NewTransaction) -> LedgerResult<Transaction> {
    let description = validate_description(&new.description)?;
    ensure_refs(conn, owner_id, new.account_id, new.category_id)?;

    let tx = conn.unchecked_transaction()?;
    tx.execute(
        "INSERT INTO transactions(owner_id, account_id, category_id, description, amount, date,
             status, type, is_recurring, recurring_frequency, recurring_end_date)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            owner_id,
            new.account_id,
            new.category_id,
            description,
            money(new.amount).to_string(),
            new.date,
            new.status.as_str(),
            new.r#type.as_str(),
            new.recurring_frequency.is_some() as i64,
            new.recurring_frequency.map(|f| f.as_str()),
            new.recurring_end_date,
        ],
    )?;
    let id = tx.last_insert_rowid();
    BalanceLedger::new(&tx).recalculate(new.account_id)?;
    tx.commit()?;

    tracing::info!(owner_id, transaction_id = id, account_id = new.account_id, "created transaction");
    get(conn, owner_id, id)
}

/// Apply `patch`; recalculates the resulting account and, when the
/// transaction moved, the account it left.
pub fn update(
    conn: &Connection,
    owner_id: i64,
    id: i64,
    patch: &TransactionPatch,
) -> LedgerResult<Transaction> {
    let mut t = get(conn, owner_id, id)?;
    let old_account_id = t.account_id;
    patch.apply(&mut t);
    t.description = validate_description(&t.description)?;
    ensure_refs(conn, owner_id, t.account_id, t.category_id)?;

    let tx = conn.unchecked_transaction()?;
    tx.execute(
        "UPDATE transactions SET account_id=?1, category_id=?2, description=?3, amount=?4, date=?5,
             status=?6, type=?7, is_recurring=?8, recurring_frequency=?9, recurring_end_date=?10,
             updated_at=datetime('now')
         WHERE id=?11",
        params![
            t.account_id,
            t.category_id,
            t.description,
            money(t.amount).to_string(),
            t.date,
            t.status.as_str(),
            t.r#type.as_str(),
            t.is_recurring as i64,
            t.recurring_frequency.map(|f| f.as_str()),
            t.recurring_end_date,
            id,
        ],
    )?;
    let ledger = BalanceLedger::new(&tx);
    ledger.recalculate_if_exists(old_account_id)?;
    if t.account_id != old_account_id {
        ledger.recalculate(t.account_id)?;
    }
    tx.commit()?;

    tracing::info!(owner_id, transaction_id = id, account_id = t.account_id, "updated transaction");
    get(conn, owner_id, id)
}

pub fn delete(conn: &Connection, owner_id: i64, id: i64) -> LedgerResult<()> {
    let t = get(conn, owner_id, id)?;

    let tx = conn.unchecked_transaction()?;
    tx.execute("DELETE FROM transactions WHERE id=?1", params![id])?;
    BalanceLedger::new(&tx).recalculate_if_exists(t.account_id)?;
    tx.commit()?;

    tracing::info!(owner_id, transaction_id = id, account_id = t.account_id, "deleted transaction");
    Ok(())
}

/// Flip the clearing status. The account is recalculated even when the
/// status is unchanged.
pub fn set_status(
    conn: &Connection,
    owner_id: i64,
    id: i64,
    status: TransactionStatus,
) -> LedgerResult<Transaction> {
    let t = get(conn, owner_id, id)?;

    let tx = conn.unchecked_transaction()?;
    tx.execute(
        "UPDATE transactions SET status=?1, updated_at=datetime('now') WHERE id=?2",
        params![status.as_str(), id],
    )?;
    BalanceLedger::new(&tx).recalculate(t.account_id)?;
    tx.commit()?;

    tracing::info!(
        owner_id,
        transaction_id = id,
        from = %t.status,
        to = %status,
        "changed transaction status"
    );
    get(conn, owner_id, id)
}
