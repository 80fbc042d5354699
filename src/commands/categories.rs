// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{optional, required};
use crate::config::Config;
use crate::store::categories::{self, CategoryPatch, NewCategory, DEFAULT_COLOR};
use crate::utils::{maybe_print_json, parse_bool, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, cfg: &Config, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let new = NewCategory {
                name: required(sub, "name")?.to_string(),
                color: optional(sub, "color").unwrap_or(DEFAULT_COLOR).to_string(),
                icon: optional(sub, "icon").map(str::to_string),
                is_default: sub.get_flag("default"),
            };
            let cat = categories::create(conn, cfg.owner_id, &new)?;
            println!("Added category '{}' ({})", cat.name, cat.color);
        }
        Some(("list", sub)) => {
            let cats = categories::list(conn, cfg.owner_id)?;
            if !maybe_print_json(sub.get_flag("json"), &cats)? {
                let data = cats
                    .into_iter()
                    .map(|c| {
                        vec![
                            c.name,
                            c.color,
                            c.icon.unwrap_or_default(),
                            if c.is_default { "yes" } else { "" }.to_string(),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["Category", "Color", "Icon", "Default"], data)
                );
            }
        }
        Some(("edit", sub)) => {
            let cat = categories::get_by_name(conn, cfg.owner_id, required(sub, "name")?)?;
            let patch = CategoryPatch {
                name: optional(sub, "rename").map(str::to_string),
                color: optional(sub, "color").map(str::to_string),
                icon: optional(sub, "icon").map(|i| Some(i.to_string()).filter(|s| !s.is_empty())),
                is_default: optional(sub, "default").map(parse_bool).transpose()?,
            };
            let updated = categories::update(conn, cfg.owner_id, cat.id, &patch)?;
            println!("Updated category '{}'", updated.name);
        }
        Some(("rm", sub)) => {
            let name = required(sub, "name")?;
            let cat = categories::get_by_name(conn, cfg.owner_id, name)?;
            categories::delete(conn, cfg.owner_id, cat.id)?;
            println!("Removed category '{}'", name);
        }
        _ => {}
    }
    Ok(())
}
