// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::str::FromStr;

use cashbook::models::{
    AccountType, NewTransaction, TransactionPatch, TransactionStatus, TransactionType,
};
use cashbook::store::accounts::{self, NewAccount};
use cashbook::store::categories::{self, NewCategory};
use cashbook::store::transactions;
use cashbook::{db, BalanceLedger, Balances, LedgerError};
use chrono::NaiveDate;
use rusqlite::{params, Connection};
use rust_decimal::Decimal;

const OWNER: i64 = 1;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn setup() -> (Connection, i64, i64) {
    let conn = db::open_in_memory().unwrap();
    let acct = accounts::create(
        &conn,
        OWNER,
        &NewAccount {
            name: "Everyday Checking".into(),
            r#type: AccountType::Checking,
            currency: "usd".into(),
            balance: dec("500.00"),
            cleared_balance: dec("500.00"),
        },
    )
    .unwrap();
    let cat = categories::create(
        &conn,
        OWNER,
        &NewCategory {
            name: "Groceries".into(),
            color: "#10B981".into(),
            icon: None,
            is_default: false,
        },
    )
    .unwrap();
    (conn, acct.id, cat.id)
}

fn add_account(conn: &Connection, name: &str) -> i64 {
    accounts::create(
        conn,
        OWNER,
        &NewAccount {
            name: name.into(),
            r#type: AccountType::Savings,
            currency: "USD".into(),
            balance: Decimal::ZERO,
            cleared_balance: Decimal::ZERO,
        },
    )
    .unwrap()
    .id
}

fn new_tx(account_id: i64, category_id: i64, amount: &str, status: TransactionStatus) -> NewTransaction {
    NewTransaction {
        account_id,
        category_id,
        description: format!("tx {}", amount),
        amount: dec(amount),
        date: NaiveDate::from_ymd_opt(2025, 8, 3).unwrap(),
        status,
        r#type: if amount.starts_with('-') {
            TransactionType::Expense
        } else {
            TransactionType::Income
        },
        recurring_frequency: None,
        recurring_end_date: None,
    }
}

fn stored(conn: &Connection, account_id: i64) -> Balances {
    let a = accounts::get(conn, OWNER, account_id).unwrap();
    Balances {
        total: a.balance,
        cleared: a.cleared_balance,
    }
}

#[test]
fn example_scenario_then_delete_pending() {
    let (conn, acct, cat) = setup();
    transactions::create(&conn, OWNER, &new_tx(acct, cat, "3200.00", TransactionStatus::Cleared)).unwrap();
    transactions::create(&conn, OWNER, &new_tx(acct, cat, "-89.43", TransactionStatus::Cleared)).unwrap();
    let pending =
        transactions::create(&conn, OWNER, &new_tx(acct, cat, "-65.20", TransactionStatus::Pending)).unwrap();

    let b = BalanceLedger::new(&conn).recalculate(acct).unwrap();
    assert_eq!(b.total, dec("3045.37"));
    assert_eq!(b.cleared, dec("3110.57"));
    assert_eq!(stored(&conn, acct), b);

    transactions::delete(&conn, OWNER, pending.id).unwrap();
    let after = stored(&conn, acct);
    assert_eq!(after.total, dec("3110.57"));
    assert_eq!(after.cleared, dec("3110.57"));
}

#[test]
fn first_mutation_overwrites_opening_balance() {
    let (conn, acct, cat) = setup();
    assert_eq!(stored(&conn, acct).total, dec("500.00"));

    transactions::create(&conn, OWNER, &new_tx(acct, cat, "-20.00", TransactionStatus::Pending)).unwrap();
    let b = stored(&conn, acct);
    assert_eq!(b.total, dec("-20.00"));
    assert_eq!(b.cleared, Decimal::ZERO);
}

#[test]
fn balances_are_stored_with_cents() {
    let (conn, acct, cat) = setup();
    transactions::create(&conn, OWNER, &new_tx(acct, cat, "12", TransactionStatus::Cleared)).unwrap();
    let raw: (String, String) = conn
        .query_row(
            "SELECT balance, cleared_balance FROM accounts WHERE id=?1",
            params![acct],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .unwrap();
    assert_eq!(raw, ("12.00".to_string(), "12.00".to_string()));
}

#[test]
fn empty_account_recalculates_to_zero() {
    let (conn, acct, _) = setup();
    let b = BalanceLedger::new(&conn).recalculate(acct).unwrap();
    assert_eq!(b, Balances::ZERO);
    assert_eq!(stored(&conn, acct), Balances::ZERO);
}

#[test]
fn recalculate_is_idempotent() {
    let (conn, acct, cat) = setup();
    transactions::create(&conn, OWNER, &new_tx(acct, cat, "10.10", TransactionStatus::Cleared)).unwrap();
    transactions::create(&conn, OWNER, &new_tx(acct, cat, "-3.03", TransactionStatus::Pending)).unwrap();
    let ledger = BalanceLedger::new(&conn);
    let first = ledger.recalculate(acct).unwrap();
    let first_stored = stored(&conn, acct);
    let second = ledger.recalculate(acct).unwrap();
    assert_eq!(first, second);
    assert_eq!(first_stored, stored(&conn, acct));
}

#[test]
fn status_flip_moves_cleared_balance_only() {
    let (conn, acct, cat) = setup();
    let t = transactions::create(&conn, OWNER, &new_tx(acct, cat, "-40.00", TransactionStatus::Pending)).unwrap();
    assert_eq!(stored(&conn, acct).cleared, Decimal::ZERO);

    transactions::set_status(&conn, OWNER, t.id, TransactionStatus::Cleared).unwrap();
    let b = stored(&conn, acct);
    assert_eq!(b.total, dec("-40.00"));
    assert_eq!(b.cleared, dec("-40.00"));

    transactions::set_status(&conn, OWNER, t.id, TransactionStatus::Pending).unwrap();
    assert_eq!(stored(&conn, acct).cleared, Decimal::ZERO);
}

#[test]
fn same_status_still_repairs_drift() {
    let (conn, acct, cat) = setup();
    let t = transactions::create(&conn, OWNER, &new_tx(acct, cat, "5.00", TransactionStatus::Cleared)).unwrap();
    conn.execute(
        "UPDATE accounts SET balance='999.99' WHERE id=?1",
        params![acct],
    )
    .unwrap();
    transactions::set_status(&conn, OWNER, t.id, TransactionStatus::Cleared).unwrap();
    assert_eq!(stored(&conn, acct).total, dec("5.00"));
}

#[test]
fn reassignment_recalculates_both_accounts() {
    let (conn, a, cat) = setup();
    let b = add_account(&conn, "Rainy Day");
    transactions::create(&conn, OWNER, &new_tx(a, cat, "100.00", TransactionStatus::Cleared)).unwrap();
    let moved = transactions::create(&conn, OWNER, &new_tx(a, cat, "-25.50", TransactionStatus::Cleared)).unwrap();
    transactions::create(&conn, OWNER, &new_tx(b, cat, "7.00", TransactionStatus::Pending)).unwrap();

    let patch = TransactionPatch {
        account_id: Some(b),
        ..Default::default()
    };
    transactions::update(&conn, OWNER, moved.id, &patch).unwrap();

    let sa = stored(&conn, a);
    assert_eq!(sa.total, dec("100.00"));
    assert_eq!(sa.cleared, dec("100.00"));
    let sb = stored(&conn, b);
    assert_eq!(sb.total, dec("-18.50"));
    assert_eq!(sb.cleared, dec("-25.50"));
}

#[test]
fn amount_edit_recalculates() {
    let (conn, acct, cat) = setup();
    let t = transactions::create(&conn, OWNER, &new_tx(acct, cat, "-10.00", TransactionStatus::Cleared)).unwrap();
    let patch = TransactionPatch {
        amount: Some(dec("-12.75")),
        ..Default::default()
    };
    transactions::update(&conn, OWNER, t.id, &patch).unwrap();
    let b = stored(&conn, acct);
    assert_eq!(b.total, dec("-12.75"));
    assert_eq!(b.cleared, dec("-12.75"));
}

#[test]
fn missing_account_is_not_found_and_skippable() {
    let (conn, _, _) = setup();
    let ledger = BalanceLedger::new(&conn);
    let err = ledger.recalculate(4242).unwrap_err();
    assert!(matches!(err, LedgerError::NotFound { .. }));
    assert_eq!(ledger.recalculate_if_exists(4242).unwrap(), None);
}

#[test]
fn failed_balance_write_leaves_account_untouched() {
    let (conn, acct, cat) = setup();
    transactions::create(&conn, OWNER, &new_tx(acct, cat, "50.00", TransactionStatus::Cleared)).unwrap();
    conn.execute_batch(
        "CREATE TRIGGER no_balance_writes BEFORE UPDATE OF balance ON accounts
         BEGIN SELECT RAISE(ABORT, 'read-only balances'); END;",
    )
    .unwrap();

    let err = transactions::create(&conn, OWNER, &new_tx(acct, cat, "-5.00", TransactionStatus::Cleared))
        .unwrap_err();
    assert!(matches!(err, LedgerError::Persistence(_)));

    let b = stored(&conn, acct);
    assert_eq!(b.total, dec("50.00"));
    assert_eq!(b.cleared, dec("50.00"));
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn batch_recalculation_reports_every_account() {
    let (conn, a, cat) = setup();
    let b = add_account(&conn, "Rainy Day");
    transactions::create(&conn, OWNER, &new_tx(a, cat, "-1.00", TransactionStatus::Cleared)).unwrap();
    conn.execute(
        "UPDATE accounts SET balance='77.00', cleared_balance='66.00'",
        [],
    )
    .unwrap();

    let ledger = BalanceLedger::new(&conn);
    let drift = ledger.check_drift().unwrap();
    assert_eq!(drift.len(), 2);
    // check_drift does not write
    assert_eq!(stored(&conn, a).total, dec("77.00"));

    let report = ledger.recalculate_all().unwrap();
    assert_eq!(report.processed, 2);
    let ra = report.accounts.iter().find(|r| r.account_id == a).unwrap();
    assert_eq!(ra.before.total, dec("77.00"));
    assert_eq!(ra.after.total, dec("-1.00"));
    assert_eq!(stored(&conn, b), Balances::ZERO);
    assert!(ledger.check_drift().unwrap().is_empty());
}
