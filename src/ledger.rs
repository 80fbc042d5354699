// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Account balance derivation.
//!
//! An account's stored `balance` is the sum of all its transaction amounts
//! and `cleared_balance` the sum over its cleared transactions. Both are
//! recomputed in full from the transaction set and written together.

use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Transaction, TransactionStatus};
use crate::store::{accounts, transactions};
use crate::utils::money;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Balances {
    pub total: Decimal,
    pub cleared: Decimal,
}

impl Balances {
    pub const ZERO: Balances = Balances {
        total: Decimal::ZERO,
        cleared: Decimal::ZERO,
    };
}

/// Exact sum of `amounts`; overflowing the decimal range is an error
/// rather than a panic.
pub(crate) fn checked_sum<I>(amounts: I, what: &str) -> LedgerResult<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    amounts.into_iter().try_fold(Decimal::ZERO, |acc, a| {
        acc.checked_add(a)
            .ok_or_else(|| LedgerError::InvalidData(format!("{} exceeds the decimal range", what)))
    })
}

/// Sum all amounts, and separately the cleared ones. Exact decimal
/// arithmetic, so the input order does not matter.
pub fn derive_balances(transactions: &[Transaction]) -> LedgerResult<Balances> {
    let total = checked_sum(transactions.iter().map(|t| t.amount), "balance")?;
    let cleared = checked_sum(
        transactions
            .iter()
            .filter(|t| t.status == TransactionStatus::Cleared)
            .map(|t| t.amount),
        "cleared balance",
    )?;
    Ok(Balances {
        total: money(total),
        cleared: money(cleared),
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct AccountRecalc {
    pub account_id: i64,
    pub name: String,
    pub before: Balances,
    pub after: Balances,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecalcReport {
    pub processed: usize,
    pub accounts: Vec<AccountRecalc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BalanceDrift {
    pub account_id: i64,
    pub name: String,
    pub stored: Balances,
    pub derived: Balances,
}

pub struct BalanceLedger<'c> {
    conn: &'c Connection,
}

impl<'c> BalanceLedger<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// Recompute and persist both balance fields of one account.
    pub fn recalculate(&self, account_id: i64) -> LedgerResult<Balances> {
        if accounts::find(self.conn, account_id)?.is_none() {
            return Err(LedgerError::not_found("account", account_id));
        }
        let txs = transactions::for_account(self.conn, account_id)?;
        let balances = derive_balances(&txs)?;
        accounts::write_balances(self.conn, account_id, &balances)?;
        tracing::debug!(
            account_id,
            transactions = txs.len(),
            total = %balances.total,
            cleared = %balances.cleared,
            "recalculated balances"
        );
        Ok(balances)
    }

    /// Like [`recalculate`](Self::recalculate), but a missing account is a
    /// no-op.
    pub fn recalculate_if_exists(&self, account_id: i64) -> LedgerResult<Option<Balances>> {
        match self.recalculate(account_id) {
            Ok(b) => Ok(Some(b)),
            Err(e) if e.is_not_found() => {
                tracing::warn!(account_id, "skipping recalculation of missing account");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Recompute every account in the store. Runs in one SQLite transaction:
    /// a failure leaves every account at its previous values.
    pub fn recalculate_all(&self) -> LedgerResult<RecalcReport> {
        let tx = self.conn.unchecked_transaction()?;
        let mut report = RecalcReport {
            processed: 0,
            accounts: Vec::new(),
        };
        for account in accounts::list_all(&tx)? {
            let txs = transactions::for_account(&tx, account.id)?;
            let after = derive_balances(&txs)?;
            accounts::write_balances(&tx, account.id, &after)?;
            report.accounts.push(AccountRecalc {
                account_id: account.id,
                name: account.name,
                before: Balances {
                    total: account.balance,
                    cleared: account.cleared_balance,
                },
                after,
            });
            report.processed += 1;
        }
        tx.commit()?;
        tracing::info!(processed = report.processed, "recalculated all account balances");
        Ok(report)
    }

    /// Accounts whose stored figures disagree with their transactions.
    /// Read-only.
    pub fn check_drift(&self) -> LedgerResult<Vec<BalanceDrift>> {
        let mut out = Vec::new();
        for account in accounts::list_all(self.conn)? {
            let derived = derive_balances(&transactions::for_account(self.conn, account.id)?)?;
            let stored = Balances {
                total: account.balance,
                cleared: account.cleared_balance,
            };
            if stored != derived {
                out.push(BalanceDrift {
                    account_id: account.id,
                    name: account.name,
                    stored,
                    derived,
                });
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransactionType;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn tx(amount: &str, status: TransactionStatus) -> Transaction {
        Transaction {
            id: 0,
            owner_id: 1,
            account_id: 1,
            category_id: 1,
            description: "t".into(),
            amount: Decimal::from_str(amount).unwrap(),
            date: NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(),
            status,
            r#type: TransactionType::Expense,
            is_recurring: false,
            recurring_frequency: None,
            recurring_end_date: None,
        }
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn empty_set_is_zero() {
        let b = derive_balances(&[]).unwrap();
        assert_eq!(b, Balances::ZERO);
        assert_eq!(b.total.to_string(), "0.00");
    }

    #[test]
    fn sums_all_and_cleared() {
        let txs = vec![
            tx("3200.00", TransactionStatus::Cleared),
            tx("-89.43", TransactionStatus::Cleared),
            tx("-65.20", TransactionStatus::Pending),
        ];
        let b = derive_balances(&txs).unwrap();
        assert_eq!(b.total, dec("3045.37"));
        assert_eq!(b.cleared, dec("3110.57"));
    }

    #[test]
    fn order_does_not_matter() {
        let mut txs = vec![
            tx("0.10", TransactionStatus::Cleared),
            tx("0.20", TransactionStatus::Pending),
            tx("-0.30", TransactionStatus::Cleared),
            tx("1234.56", TransactionStatus::Pending),
        ];
        let forward = derive_balances(&txs).unwrap();
        txs.reverse();
        assert_eq!(derive_balances(&txs).unwrap(), forward);
        txs.rotate_left(1);
        assert_eq!(derive_balances(&txs).unwrap(), forward);
        assert_eq!(forward.total, dec("1234.56"));
        assert_eq!(forward.cleared, dec("-0.20"));
    }

    #[test]
    fn no_float_drift_over_many_cents() {
        let txs: Vec<_> = (0..1000)
            .map(|_| tx("0.01", TransactionStatus::Cleared))
            .collect();
        let b = derive_balances(&txs).unwrap();
        assert_eq!(b.total, dec("10.00"));
        assert_eq!(b.cleared, dec("10.00"));
    }

    #[test]
    fn overflowing_sum_is_an_error() {
        let mut big = tx("0", TransactionStatus::Cleared);
        big.amount = Decimal::MAX;
        let txs = vec![big.clone(), big];
        let err = derive_balances(&txs).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidData(_)));
        assert!(err.to_string().contains("exceeds the decimal range"));
    }
}
