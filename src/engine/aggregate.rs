// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Read-side rollups. Every function here is total: empty input gives
//! zero-valued results.

use chrono::{Datelike, Days, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use crate::models::{Category, Transaction, TransactionId, TransactionType};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub income: Decimal,
    pub expense: Decimal,
    pub net: Decimal,
}

impl Totals {
    fn add(&mut self, t: &Transaction) {
        match t.kind {
            TransactionType::Income => self.income += t.amount,
            TransactionType::Expense => self.expense += t.amount,
        }
        self.net = self.income - self.expense;
    }
}

pub fn totals<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Totals {
    let mut out = Totals::default();
    for t in transactions {
        out.add(t);
    }
    out
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayGroup<'a> {
    pub day: NaiveDate,
    pub transactions: Vec<&'a Transaction>,
    pub income: Decimal,
    pub expense: Decimal,
    pub net: Decimal,
}

/// Partitions by calendar day, newest day first. Members keep input order.
pub fn group_by_day<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Vec<DayGroup<'a>> {
    let mut days: BTreeMap<NaiveDate, (Vec<&'a Transaction>, Totals)> = BTreeMap::new();
    for t in transactions {
        let entry = days.entry(t.day()).or_default();
        entry.0.push(t);
        entry.1.add(t);
    }
    days.into_iter()
        .rev()
        .map(|(day, (txs, sums))| DayGroup {
            day,
            transactions: txs,
            income: sums.income,
            expense: sums.expense,
            net: sums.net,
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    Day,
    Month,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodBucket {
    pub label: String,
    pub start: NaiveDate,
    /// Inclusive.
    pub end: NaiveDate,
    pub income: Decimal,
    pub expense: Decimal,
    pub net: Decimal,
}

fn month_index(d: NaiveDate) -> i64 {
    i64::from(d.year()) * 12 + i64::from(d.month0())
}

fn period_bounds(granularity: Granularity, start: NaiveDate) -> Option<(NaiveDate, String)> {
    match granularity {
        Granularity::Day => Some((start, start.format("%Y-%m-%d").to_string())),
        Granularity::Month => {
            let end = start
                .checked_add_months(Months::new(1))?
                .checked_sub_days(Days::new(1))?;
            Some((end, start.format("%Y-%m").to_string()))
        }
    }
}

/// Exactly `count` consecutive periods ending with the one containing `now`,
/// oldest first. Periods without transactions appear with zero sums.
pub fn bucket_periods<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
    granularity: Granularity,
    count: usize,
    now: NaiveDate,
) -> Vec<PeriodBucket> {
    if count == 0 {
        return Vec::new();
    }
    let back = (count - 1) as u64;
    let first = match granularity {
        Granularity::Day => now.checked_sub_days(Days::new(back)),
        Granularity::Month => now
            .with_day(1)
            .and_then(|d| d.checked_sub_months(Months::new(back as u32))),
    };
    let Some(first) = first else {
        return Vec::new();
    };

    let mut buckets: Vec<PeriodBucket> = Vec::with_capacity(count);
    for i in 0..count as u64 {
        let start = match granularity {
            Granularity::Day => first.checked_add_days(Days::new(i)),
            Granularity::Month => first.checked_add_months(Months::new(i as u32)),
        };
        let Some((start, (end, label))) =
            start.and_then(|s| period_bounds(granularity, s).map(|b| (s, b)))
        else {
            break;
        };
        buckets.push(PeriodBucket {
            label,
            start,
            end,
            income: Decimal::ZERO,
            expense: Decimal::ZERO,
            net: Decimal::ZERO,
        });
    }

    for t in transactions {
        let day = t.day();
        let offset = match granularity {
            Granularity::Day => (day - first).num_days(),
            Granularity::Month => month_index(day) - month_index(first),
        };
        if offset < 0 {
            continue;
        }
        if let Some(bucket) = buckets.get_mut(offset as usize) {
            match t.kind {
                TransactionType::Income => bucket.income += t.amount,
                TransactionType::Expense => bucket.expense += t.amount,
            }
            bucket.net = bucket.income - bucket.expense;
        }
    }
    buckets
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayComparison {
    pub day: NaiveDate,
    pub today: Totals,
    pub yesterday: Totals,
    /// Percent change of expense against yesterday; `None` when yesterday had none.
    pub expense_change: Option<Decimal>,
}

pub fn today_vs_yesterday<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
    today: NaiveDate,
) -> DayComparison {
    let yesterday = today.pred_opt();
    let mut t_sum = Totals::default();
    let mut y_sum = Totals::default();
    for t in transactions {
        let day = t.day();
        if day == today {
            t_sum.add(t);
        } else if Some(day) == yesterday {
            y_sum.add(t);
        }
    }
    let expense_change = (y_sum.expense > Decimal::ZERO).then(|| {
        ((t_sum.expense - y_sum.expense) * Decimal::ONE_HUNDRED / y_sum.expense).round_dp(2)
    });
    DayComparison {
        day: today,
        today: t_sum,
        yesterday: y_sum,
        expense_change,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Decimal,
    pub count: usize,
    /// Percent of the type's grand total.
    pub share: Decimal,
}

/// Per-category sums for one transaction type, largest first. Ties keep the
/// order in which categories first appear.
pub fn category_totals<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
    kind: TransactionType,
) -> Vec<CategoryTotal> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut out: Vec<CategoryTotal> = Vec::new();
    for t in transactions.into_iter().filter(|t| t.kind == kind) {
        let i = *index.entry(t.category.as_str()).or_insert_with(|| {
            out.push(CategoryTotal {
                category: t.category.clone(),
                total: Decimal::ZERO,
                count: 0,
                share: Decimal::ZERO,
            });
            out.len() - 1
        });
        out[i].total += t.amount;
        out[i].count += 1;
    }
    let grand: Decimal = out.iter().map(|c| c.total).sum();
    if grand > Decimal::ZERO {
        for c in &mut out {
            c.share = (c.total * Decimal::ONE_HUNDRED / grand).round_dp(2);
        }
    }
    out.sort_by(|a, b| b.total.cmp(&a.total));
    out
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BusinessSummary {
    pub revenue: Decimal,
    pub cost: Decimal,
    pub profit: Decimal,
    /// Profit as a percent of revenue, 0 when there is no revenue.
    pub margin: Decimal,
}

/// Profit and loss over `SELLING` and `BUSINESS_COST`, wallet or not.
pub fn business_summary<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> BusinessSummary {
    let mut revenue = Decimal::ZERO;
    let mut cost = Decimal::ZERO;
    for t in transactions {
        match t.category.as_str() {
            Category::SELLING => revenue += t.amount,
            Category::BUSINESS_COST => cost += t.amount,
            _ => {}
        }
    }
    let profit = revenue - cost;
    let margin = if revenue.is_zero() {
        Decimal::ZERO
    } else {
        (profit * Decimal::ONE_HUNDRED / revenue).round_dp(2)
    };
    BusinessSummary {
        revenue,
        cost,
        profit,
        margin,
    }
}

/// Floor used when the caller has no preference (0.1).
pub fn default_min_intensity() -> Decimal {
    Decimal::new(1, 1)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Intensity {
    pub transaction_id: TransactionId,
    pub amount: Decimal,
    pub kind: TransactionType,
    /// In `[min_weight, 1]`.
    pub weight: Decimal,
}

/// The `n` most recent transactions with amounts scaled against the largest
/// one in the window and floored at `min_weight`.
pub fn intensity_window<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
    n: usize,
    min_weight: Decimal,
) -> Vec<Intensity> {
    let mut recent: Vec<&Transaction> = transactions.into_iter().collect();
    recent.sort_by(|a, b| b.date.cmp(&a.date));
    recent.truncate(n);
    let max = recent
        .iter()
        .map(|t| t.amount)
        .max()
        .unwrap_or(Decimal::ZERO);
    recent
        .into_iter()
        .map(|t| {
            let ratio = if max > Decimal::ZERO {
                (t.amount / max).round_dp(2)
            } else {
                Decimal::ZERO
            };
            Intensity {
                transaction_id: t.id,
                amount: t.amount,
                kind: t.kind,
                weight: ratio.max(min_weight),
            }
        })
        .collect()
}
