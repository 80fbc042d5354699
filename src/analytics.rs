// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Spending and cash-flow aggregation over a reporting period.

use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::{LedgerError, LedgerResult};
use crate::ledger::checked_sum;
use crate::models::{Transaction, TransactionType};
use crate::utils::money;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    LastDays(u32),
    CurrentMonth,
    YearToDate,
}

impl Period {
    /// First date (inclusive) covered by the period when viewed on `as_of`.
    /// Everything dated on or after it is in scope, later dates included.
    pub fn cutoff(&self, as_of: NaiveDate) -> LedgerResult<NaiveDate> {
        match self {
            Period::LastDays(n) => as_of
                .checked_sub_signed(Duration::days(i64::from(*n)))
                .ok_or_else(|| {
                    LedgerError::Validation(format!(
                        "period of {} days reaches before the earliest supported date",
                        n
                    ))
                }),
            Period::CurrentMonth => Ok(as_of.with_day(1).unwrap_or(as_of)),
            Period::YearToDate => {
                Ok(NaiveDate::from_ymd_opt(as_of.year(), 1, 1).unwrap_or(as_of))
            }
        }
    }
}

impl FromStr for Period {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "current-month" => Ok(Period::CurrentMonth),
            "ytd" => Ok(Period::YearToDate),
            other => other.parse::<u32>().map(Period::LastDays).map_err(|_| {
                LedgerError::Validation(format!(
                    "unknown period '{}' (use a number of days, current-month or ytd)",
                    other
                ))
            }),
        }
    }
}

fn is_spending(t: &Transaction) -> bool {
    t.amount < Decimal::ZERO && t.r#type != TransactionType::Transfer
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub income: Decimal,
    pub expenses: Decimal,
    pub net: Decimal,
    pub count: usize,
}

/// Income counts every inflow; expenses leave out transfers.
pub fn summary(txs: &[&Transaction]) -> LedgerResult<Summary> {
    let income = checked_sum(
        txs.iter().filter(|t| t.amount > Decimal::ZERO).map(|t| t.amount),
        "income",
    )?;
    let expenses = checked_sum(
        txs.iter().filter(|t| is_spending(t)).map(|t| t.amount.abs()),
        "expenses",
    )?;
    Ok(Summary {
        income: money(income),
        expenses: money(expenses),
        net: money(net(income, expenses)?),
        count: txs.len(),
    })
}

fn net(income: Decimal, expenses: Decimal) -> LedgerResult<Decimal> {
    income
        .checked_sub(expenses)
        .ok_or_else(|| LedgerError::InvalidData("net exceeds the decimal range".into()))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupTotal {
    pub name: String,
    pub amount: Decimal,
}

fn spend_by<F>(txs: &[&Transaction], key: F) -> LedgerResult<Vec<GroupTotal>>
where
    F: Fn(&Transaction) -> String,
{
    let mut agg: HashMap<String, Vec<Decimal>> = HashMap::new();
    for t in txs.iter().filter(|t| is_spending(t)) {
        agg.entry(key(t)).or_default().push(t.amount.abs());
    }
    let mut items = agg
        .into_iter()
        .map(|(name, amounts)| {
            let amount = checked_sum(amounts, &name)?;
            Ok(GroupTotal {
                name,
                amount: money(amount),
            })
        })
        .collect::<LedgerResult<Vec<GroupTotal>>>()?;
    items.sort_by(|a, b| b.amount.cmp(&a.amount).then_with(|| a.name.cmp(&b.name)));
    Ok(items)
}

pub fn spend_by_category(
    txs: &[&Transaction],
    category_names: &HashMap<i64, String>,
) -> LedgerResult<Vec<GroupTotal>> {
    spend_by(txs, |t| {
        category_names
            .get(&t.category_id)
            .cloned()
            .unwrap_or_else(|| "(uncategorized)".into())
    })
}

pub fn spend_by_account(
    txs: &[&Transaction],
    account_names: &HashMap<i64, String>,
) -> LedgerResult<Vec<GroupTotal>> {
    spend_by(txs, |t| {
        account_names
            .get(&t.account_id)
            .cloned()
            .unwrap_or_else(|| format!("account #{}", t.account_id))
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CashFlowDay {
    pub date: NaiveDate,
    pub income: Decimal,
    pub expenses: Decimal,
    pub net: Decimal,
}

/// Daily income and outflow, oldest day first. Transfers count on both
/// sides here, matching what actually moved through the accounts.
pub fn cash_flow(txs: &[&Transaction]) -> LedgerResult<Vec<CashFlowDay>> {
    let mut map: BTreeMap<NaiveDate, (Vec<Decimal>, Vec<Decimal>)> = BTreeMap::new();
    for t in txs {
        let entry = map.entry(t.date).or_default();
        if t.amount > Decimal::ZERO {
            entry.0.push(t.amount);
        } else {
            entry.1.push(t.amount.abs());
        }
    }
    map.into_iter()
        .map(|(date, (ins, outs))| {
            let income = checked_sum(ins, "income")?;
            let expenses = checked_sum(outs, "expenses")?;
            Ok(CashFlowDay {
                date,
                income: money(income),
                expenses: money(expenses),
                net: money(net(income, expenses)?),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransactionStatus;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn period_parsing_and_cutoffs() {
        let as_of = d(2025, 8, 20);
        assert_eq!("30".parse::<Period>().unwrap().cutoff(as_of).unwrap(), d(2025, 7, 21));
        assert_eq!(
            "current-month".parse::<Period>().unwrap().cutoff(as_of).unwrap(),
            d(2025, 8, 1)
        );
        assert_eq!("ytd".parse::<Period>().unwrap().cutoff(as_of).unwrap(), d(2025, 1, 1));
        assert!("fortnight".parse::<Period>().is_err());
    }

    #[test]
    fn oversized_day_count_is_rejected() {
        let err = Period::LastDays(100_000_000).cutoff(d(2025, 8, 10)).unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)));
    }

    #[test]
    fn transfers_do_not_count_as_spending() {
        let mk = |amount: i64, ty: TransactionType| Transaction {
            id: 0,
            owner_id: 1,
            account_id: 1,
            category_id: 1,
            description: "x".into(),
            amount: Decimal::from(amount),
            date: d(2025, 8, 1),
            status: TransactionStatus::Cleared,
            r#type: ty,
            is_recurring: false,
            recurring_frequency: None,
            recurring_end_date: None,
        };
        let txs = [
            mk(-40, TransactionType::Expense),
            mk(-100, TransactionType::Transfer),
            mk(500, TransactionType::Income),
        ];
        let refs: Vec<&Transaction> = txs.iter().collect();
        let s = summary(&refs).unwrap();
        assert_eq!(s.expenses, Decimal::from(40));
        assert_eq!(s.income, Decimal::from(500));
        assert_eq!(s.net, Decimal::from(460));

        let flow = cash_flow(&refs).unwrap();
        assert_eq!(flow.len(), 1);
        assert_eq!(flow[0].expenses, Decimal::from(140));
    }

    #[test]
    fn overflowing_totals_are_errors_not_panics() {
        let mk = |amount: Decimal| Transaction {
            id: 0,
            owner_id: 1,
            account_id: 1,
            category_id: 1,
            description: "x".into(),
            amount,
            date: d(2025, 8, 1),
            status: TransactionStatus::Cleared,
            r#type: TransactionType::Expense,
            is_recurring: false,
            recurring_frequency: None,
            recurring_end_date: None,
        };
        let txs = [mk(Decimal::MIN), mk(Decimal::MIN)];
        let refs: Vec<&Transaction> = txs.iter().collect();
        assert!(summary(&refs).is_err());
        assert!(cash_flow(&refs).is_err());
        assert!(spend_by_account(&refs, &HashMap::new()).is_err());
    }
}
