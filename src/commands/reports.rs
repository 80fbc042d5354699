// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{accounts::account_rows, optional, required, transactions::NameMaps};
use crate::analytics::{self, Period};
use crate::config::Config;
use crate::models::Transaction;
use crate::store::categories;
use crate::store::transactions::{self, TransactionFilter};
use crate::utils::{maybe_print_json, parse_date, pretty_table};
use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::Connection;
use serde::Serialize;

pub fn handle(conn: &Connection, cfg: &Config, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => summary(conn, cfg, sub)?,
        Some(("spend-by-category", sub)) => spend_by_category(conn, cfg, sub)?,
        Some(("spend-by-account", sub)) => spend_by_account(conn, cfg, sub)?,
        Some(("cashflow", sub)) => cashflow(conn, cfg, sub)?,
        Some(("dashboard", sub)) => dashboard(conn, cfg, sub)?,
        _ => {}
    }
    Ok(())
}

/// Transactions dated on or after the period's cutoff. Entries dated after
/// `as_of` stay in scope.
pub fn period_transactions(
    conn: &Connection,
    owner_id: i64,
    sub: &clap::ArgMatches,
) -> Result<Vec<Transaction>> {
    let period = required(sub, "period")?.parse::<Period>()?;
    let as_of = match optional(sub, "as-of") {
        Some(raw) => parse_date(raw)?,
        None => chrono::Local::now().date_naive(),
    };
    let filter = TransactionFilter {
        since: Some(period.cutoff(as_of)?),
        ..Default::default()
    };
    Ok(transactions::list(conn, owner_id, &filter)?)
}

fn summary(conn: &Connection, cfg: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let txs = period_transactions(conn, cfg.owner_id, sub)?;
    let refs: Vec<&Transaction> = txs.iter().collect();
    let s = analytics::summary(&refs)?;
    if !maybe_print_json(sub.get_flag("json"), &s)? {
        let data = vec![vec![
            format!("{:.2}", s.income),
            format!("{:.2}", s.expenses),
            format!("{:.2}", s.net),
            s.count.to_string(),
        ]];
        println!(
            "{}",
            pretty_table(&["Income", "Expenses", "Net", "Transactions"], data)
        );
    }
    Ok(())
}

fn spend_by_category(conn: &Connection, cfg: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let txs = period_transactions(conn, cfg.owner_id, sub)?;
    let refs: Vec<&Transaction> = txs.iter().collect();
    let names = NameMaps::load(conn, cfg.owner_id)?;
    let totals = analytics::spend_by_category(&refs, &names.categories)?;
    if !maybe_print_json(sub.get_flag("json"), &totals)? {
        let data = totals
            .iter()
            .map(|g| vec![g.name.clone(), format!("{:.2}", g.amount)])
            .collect();
        println!("{}", pretty_table(&["Category", "Spent"], data));
    }
    Ok(())
}

fn spend_by_account(conn: &Connection, cfg: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let txs = period_transactions(conn, cfg.owner_id, sub)?;
    let refs: Vec<&Transaction> = txs.iter().collect();
    let names = NameMaps::load(conn, cfg.owner_id)?;
    let totals = analytics::spend_by_account(&refs, &names.accounts)?;
    if !maybe_print_json(sub.get_flag("json"), &totals)? {
        let data = totals
            .iter()
            .map(|g| vec![g.name.clone(), format!("{:.2}", g.amount)])
            .collect();
        println!("{}", pretty_table(&["Account", "Spent"], data));
    }
    Ok(())
}

fn cashflow(conn: &Connection, cfg: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let txs = period_transactions(conn, cfg.owner_id, sub)?;
    let refs: Vec<&Transaction> = txs.iter().collect();
    let days = analytics::cash_flow(&refs)?;
    if !maybe_print_json(sub.get_flag("json"), &days)? {
        let data = days
            .iter()
            .map(|d| {
                vec![
                    d.date.to_string(),
                    format!("{:.2}", d.income),
                    format!("{:.2}", d.expenses),
                    format!("{:.2}", d.net),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Date", "Income", "Expenses", "Net"], data)
        );
    }
    Ok(())
}

#[derive(Serialize)]
struct Dashboard {
    accounts: Vec<super::accounts::AccountRow>,
    categories: Vec<String>,
    recent: Vec<super::transactions::TransactionRow>,
    as_of: NaiveDate,
}

fn dashboard(conn: &Connection, cfg: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let names = NameMaps::load(conn, cfg.owner_id)?;
    let recent_filter = TransactionFilter {
        limit: Some(10),
        ..Default::default()
    };
    let board = Dashboard {
        accounts: account_rows(conn, cfg.owner_id)?,
        categories: categories::list(conn, cfg.owner_id)?
            .into_iter()
            .map(|c| c.name)
            .collect(),
        recent: transactions::list(conn, cfg.owner_id, &recent_filter)?
            .iter()
            .map(|t| names.row(t))
            .collect(),
        as_of: chrono::Local::now().date_naive(),
    };
    if maybe_print_json(sub.get_flag("json"), &board)? {
        return Ok(());
    }
    let acct_data = board
        .accounts
        .iter()
        .map(|a| {
            vec![
                a.name.clone(),
                format!("{:.2}", a.balance),
                format!("{:.2}", a.cleared_balance),
                a.pending.to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Account", "Balance", "Cleared", "Pending"], acct_data)
    );
    let recent_data = board
        .recent
        .iter()
        .map(|r| {
            vec![
                r.date.clone(),
                r.description.clone(),
                r.amount.clone(),
                r.category.clone(),
                r.account.clone(),
                r.status.to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Date", "Description", "Amount", "Category", "Account", "Status"],
            recent_data
        )
    );
    println!("Categories: {}", board.categories.join(", "));
    Ok(())
}
