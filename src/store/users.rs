// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{params, Connection, OptionalExtension};

use super::validate_name;
use crate::error::{LedgerError, LedgerResult};
use crate::models::User;

pub fn create(conn: &Connection, name: &str) -> LedgerResult<User> {
    let name = validate_name("user", name)?;
    conn.execute("INSERT INTO users(name) VALUES (?1)", params![name])?;
    let id = conn.last_insert_rowid();
    tracing::info!(user_id = id, "created user '{}'", name);
    Ok(User { id, name })
}

pub fn get(conn: &Connection, id: i64) -> LedgerResult<User> {
    conn.query_row(
        "SELECT id, name FROM users WHERE id=?1",
        params![id],
        |r| {
            Ok(User {
                id: r.get(0)?,
                name: r.get(1)?,
            })
        },
    )
    .optional()?
    .ok_or_else(|| LedgerError::not_found("user", id))
}

pub fn list(conn: &Connection) -> LedgerResult<Vec<User>> {
    let mut stmt = conn.prepare("SELECT id, name FROM users ORDER BY id")?;
    let rows = stmt.query_map([], |r| {
        Ok(User {
            id: r.get(0)?,
            name: r.get(1)?,
        })
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}
