// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{params, Connection, Row};

use super::validate_name;
use crate::error::{LedgerError, LedgerResult};
use crate::models::Category;
use crate::utils::is_hex_color;

pub const DEFAULT_COLOR: &str = "#6B7280";

#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub color: String,
    pub icon: Option<String>,
    pub is_default: bool,
}

#[derive(Debug, Clone, Default)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub color: Option<String>,
    pub icon: Option<Option<String>>,
    pub is_default: Option<bool>,
}

fn row_to_category(r: &Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: r.get(0)?,
        owner_id: r.get(1)?,
        name: r.get(2)?,
        color: r.get(3)?,
        icon: r.get(4)?,
        is_default: r.get::<_, i64>(5)? != 0,
    })
}

fn validate_color(color: &str) -> LedgerResult<String> {
    let color = color.trim();
    if !is_hex_color(color) {
        return Err(LedgerError::Validation(format!(
            "color '{}' must look like #RRGGBB",
            color
        )));
    }
    Ok(color.to_uppercase())
}

pub fn create(conn: &Connection, owner_id: i64, new: &NewCategory) -> LedgerResult<Category> {
    let name = validate_name("category", &new.name)?;
    let color = validate_color(&new.color)?;
    conn.execute(
        "INSERT INTO categories(owner_id, name, color, icon, is_default) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![owner_id, name, color, new.icon, new.is_default as i64],
    )?;
    let id = conn.last_insert_rowid();
    tracing::info!(owner_id, category_id = id, "created category '{}'", name);
    get(conn, owner_id, id)
}

pub fn get(conn: &Connection, owner_id: i64, id: i64) -> LedgerResult<Category> {
    let mut stmt = conn.prepare(
        "SELECT id, owner_id, name, color, icon, is_default FROM categories WHERE owner_id=?1 AND id=?2",
    )?;
    let mut rows = stmt.query(params![owner_id, id])?;
    match rows.next()? {
        Some(r) => Ok(row_to_category(r)?),
        None => Err(LedgerError::not_found("category", id)),
    }
}

pub fn get_by_name(conn: &Connection, owner_id: i64, name: &str) -> LedgerResult<Category> {
    let mut stmt = conn.prepare(
        "SELECT id, owner_id, name, color, icon, is_default FROM categories WHERE owner_id=?1 AND name=?2",
    )?;
    let mut rows = stmt.query(params![owner_id, name.trim()])?;
    match rows.next()? {
        Some(r) => Ok(row_to_category(r)?),
        None => Err(LedgerError::not_found("category", name.trim())),
    }
}

pub fn list(conn: &Connection, owner_id: i64) -> LedgerResult<Vec<Category>> {
    let mut stmt = conn.prepare(
        "SELECT id, owner_id, name, color, icon, is_default FROM categories WHERE owner_id=?1 ORDER BY name",
    )?;
    let rows = stmt.query_map(params![owner_id], row_to_category)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

pub fn update(
    conn: &Connection,
    owner_id: i64,
    id: i64,
    patch: &CategoryPatch,
) -> LedgerResult<Category> {
    let mut cat = get(conn, owner_id, id)?;
    if let Some(name) = &patch.name {
        cat.name = validate_name("category", name)?;
    }
    if let Some(color) = &patch.color {
        cat.color = validate_color(color)?;
    }
    if let Some(icon) = &patch.icon {
        cat.icon = icon.clone();
    }
    if let Some(d) = patch.is_default {
        cat.is_default = d;
    }
    conn.execute(
        "UPDATE categories SET name=?1, color=?2, icon=?3, is_default=?4 WHERE id=?5",
        params![cat.name, cat.color, cat.icon, cat.is_default as i64, id],
    )?;
    tracing::info!(owner_id, category_id = id, "updated category '{}'", cat.name);
    Ok(cat)
}

pub fn delete(conn: &Connection, owner_id: i64, id: i64) -> LedgerResult<()> {
    let cat = get(conn, owner_id, id)?;
    let used: i64 = conn.query_row(
        "SELECT COUNT(*) FROM transactions WHERE category_id=?1",
        params![id],
        |r| r.get(0),
    )?;
    if used > 0 {
        return Err(LedgerError::HasTransactions {
            entity: "category",
            name: cat.name,
        });
    }
    conn.execute("DELETE FROM categories WHERE id=?1", params![id])?;
    tracing::info!(owner_id, category_id = id, "deleted category '{}'", cat.name);
    Ok(())
}
