// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::required;
use crate::store::users;
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let user = users::create(conn, required(sub, "name")?)?;
            println!("Added user '{}' (id {})", user.name, user.id);
        }
        Some(("list", _)) => {
            let data = users::list(conn)?
                .into_iter()
                .map(|u| vec![u.id.to_string(), u.name])
                .collect();
            println!("{}", pretty_table(&["Id", "Name"], data));
        }
        _ => {}
    }
    Ok(())
}
