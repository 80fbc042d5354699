// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::BalanceLedger;
use crate::utils::pretty_table;
use anyhow::{Context, Result};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("recalculate-balances", _)) => recalculate(conn)?,
        Some(("check", _)) => check(conn)?,
        _ => {}
    }
    Ok(())
}

fn recalculate(conn: &Connection) -> Result<()> {
    println!("Recalculating account balances...");
    let report = BalanceLedger::new(conn)
        .recalculate_all()
        .context("Balance recalculation failed")?;
    let rows = report
        .accounts
        .iter()
        .map(|a| {
            vec![
                a.name.clone(),
                format!("{:.2}", a.before.total),
                format!("{:.2}", a.after.total),
                format!("{:.2}", a.before.cleared),
                format!("{:.2}", a.after.cleared),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Account", "Old balance", "New balance", "Old cleared", "New cleared"],
            rows
        )
    );
    println!("Recalculated balances for {} accounts.", report.processed);
    Ok(())
}

fn check(conn: &Connection) -> Result<()> {
    let drift = BalanceLedger::new(conn).check_drift()?;
    if drift.is_empty() {
        println!("check: all account balances match their transactions");
        return Ok(());
    }
    let rows = drift
        .into_iter()
        .map(|d| {
            vec![
                d.name,
                format!("{:.2}", d.stored.total),
                format!("{:.2}", d.derived.total),
                format!("{:.2}", d.stored.cleared),
                format!("{:.2}", d.derived.cleared),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Account", "Stored", "Derived", "Stored cleared", "Derived cleared"],
            rows
        )
    );
    println!("Run `cashbook maintenance recalculate-balances` to repair.");
    Ok(())
}
