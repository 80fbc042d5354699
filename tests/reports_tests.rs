// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use cashbook::analytics::{self, Period};
use cashbook::commands::{reports, transactions::NameMaps};
use cashbook::models::{AccountType, NewTransaction, Transaction, TransactionStatus, TransactionType};
use cashbook::store::accounts::{self, NewAccount};
use cashbook::store::categories::{self, NewCategory};
use cashbook::store::transactions;
use cashbook::{cli, db, LedgerError};
use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::str::FromStr;

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn setup() -> Connection {
    let conn = db::open_in_memory().unwrap();
    for (name, ty) in [("Checking", AccountType::Checking), ("Visa", AccountType::Credit)] {
        accounts::create(
            &conn,
            1,
            &NewAccount {
                name: name.into(),
                r#type: ty,
                currency: "CAD".into(),
                balance: Decimal::ZERO,
                cleared_balance: Decimal::ZERO,
            },
        )
        .unwrap();
    }
    for name in ["Dining", "Groceries", "Salary", "Transfer"] {
        categories::create(
            &conn,
            1,
            &NewCategory {
                name: name.into(),
                color: "#3B82F6".into(),
                icon: None,
                is_default: false,
            },
        )
        .unwrap();
    }
    let rows = [
        ("2025-08-01", "Checking", "Salary", "3200.00", TransactionType::Income),
        ("2025-08-02", "Checking", "Groceries", "-89.43", TransactionType::Expense),
        ("2025-08-02", "Visa", "Dining", "-42.10", TransactionType::Expense),
        ("2025-08-05", "Visa", "Groceries", "-65.20", TransactionType::Expense),
        ("2025-08-05", "Checking", "Transfer", "-500.00", TransactionType::Transfer),
        ("2025-06-15", "Checking", "Dining", "-19.99", TransactionType::Expense),
    ];
    for (date, acct, cat, amount, ty) in rows {
        let account_id = accounts::get_by_name(&conn, 1, acct).unwrap().id;
        let category_id = categories::get_by_name(&conn, 1, cat).unwrap().id;
        transactions::create(
            &conn,
            1,
            &NewTransaction {
                account_id,
                category_id,
                description: format!("{} {}", cat, amount),
                amount: Decimal::from_str(amount).unwrap(),
                date: d(date),
                status: TransactionStatus::Cleared,
                r#type: ty,
                recurring_frequency: None,
                recurring_end_date: None,
            },
        )
        .unwrap();
    }
    conn
}

fn try_period_txs(conn: &Connection, period: &str) -> anyhow::Result<Vec<Transaction>> {
    let matches = cli::build_cli().get_matches_from([
        "cashbook",
        "report",
        "summary",
        "--period",
        period,
        "--as-of",
        "2025-08-10",
    ]);
    let (_, report_m) = matches.subcommand().unwrap();
    let (_, sub) = report_m.subcommand().unwrap();
    reports::period_transactions(conn, 1, sub)
}

fn period_txs(conn: &Connection, period: &str) -> Vec<Transaction> {
    try_period_txs(conn, period).unwrap()
}

#[test]
fn current_month_summary_excludes_transfers_from_expenses() {
    let conn = setup();
    let txs = period_txs(&conn, "current-month");
    assert_eq!(txs.len(), 5);
    let refs: Vec<&Transaction> = txs.iter().collect();
    let s = analytics::summary(&refs).unwrap();
    assert_eq!(s.income.to_string(), "3200.00");
    assert_eq!(s.expenses.to_string(), "196.73");
    assert_eq!(s.net.to_string(), "3003.27");
}

#[test]
fn spend_by_category_sorted_descending() {
    let conn = setup();
    let txs = period_txs(&conn, "ytd");
    let refs: Vec<&Transaction> = txs.iter().collect();
    let names = NameMaps::load(&conn, 1).unwrap();
    let totals = analytics::spend_by_category(&refs, &names.categories).unwrap();
    let flat: Vec<(String, String)> = totals
        .into_iter()
        .map(|g| (g.name, g.amount.to_string()))
        .collect();
    assert_eq!(
        flat,
        vec![
            ("Groceries".to_string(), "154.63".to_string()),
            ("Dining".to_string(), "62.09".to_string()),
        ]
    );
}

#[test]
fn spend_by_account_in_last_week() {
    let conn = setup();
    let txs = period_txs(&conn, "7");
    assert!(txs.iter().all(|t| t.date >= d("2025-08-03")));
    let refs: Vec<&Transaction> = txs.iter().collect();
    let names = NameMaps::load(&conn, 1).unwrap();
    let totals = analytics::spend_by_account(&refs, &names.accounts).unwrap();
    assert_eq!(totals.len(), 1);
    assert_eq!(totals[0].name, "Visa");
    assert_eq!(totals[0].amount.to_string(), "65.20");
}

#[test]
fn cash_flow_groups_by_day() {
    let conn = setup();
    let txs = period_txs(&conn, "30");
    let refs: Vec<&Transaction> = txs.iter().collect();
    let days = analytics::cash_flow(&refs).unwrap();
    let dates: Vec<NaiveDate> = days.iter().map(|x| x.date).collect();
    assert_eq!(dates, vec![d("2025-08-01"), d("2025-08-02"), d("2025-08-05")]);
    assert_eq!(days[1].expenses.to_string(), "131.53");
    assert_eq!(days[2].net.to_string(), "-565.20");
}

#[test]
fn unknown_period_is_an_error() {
    assert!("fortnight".parse::<Period>().is_err());
}

#[test]
fn entries_after_as_of_stay_in_scope() {
    let conn = setup();
    let account_id = accounts::get_by_name(&conn, 1, "Checking").unwrap().id;
    let category_id = categories::get_by_name(&conn, 1, "Dining").unwrap().id;
    transactions::create(
        &conn,
        1,
        &NewTransaction {
            account_id,
            category_id,
            description: "Rent".into(),
            amount: Decimal::from_str("-1000.00").unwrap(),
            date: d("2025-08-20"),
            status: TransactionStatus::Pending,
            r#type: TransactionType::Expense,
            recurring_frequency: None,
            recurring_end_date: None,
        },
    )
    .unwrap();

    let txs = period_txs(&conn, "30");
    assert!(txs.iter().any(|t| t.date == d("2025-08-20")));
    let refs: Vec<&Transaction> = txs.iter().collect();
    let s = analytics::summary(&refs).unwrap();
    assert_eq!(s.expenses.to_string(), "1196.73");
}

#[test]
fn oversized_period_is_rejected() {
    let conn = setup();
    let err = try_period_txs(&conn, "100000000").unwrap_err();
    assert!(matches!(
        err.downcast_ref::<LedgerError>(),
        Some(LedgerError::Validation(_))
    ));
}
