// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

use crate::error::LedgerError;
use crate::models::{Category, Transaction, TransactionType, WalletId};

/// Conjunction of optional predicates. The default filter matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    /// Case-insensitive substring of the note, or digits of the amount.
    pub text: Option<String>,
    pub kind: Option<TransactionType>,
    pub category: Option<String>,
    /// Inclusive, compared by calendar day.
    pub from: Option<NaiveDate>,
    /// Inclusive, compared by calendar day.
    pub to: Option<NaiveDate>,
    pub wallet_id: Option<WalletId>,
    pub exclude_transfers: bool,
}

impl TransactionFilter {
    pub fn matches(&self, t: &Transaction) -> bool {
        if let Some(q) = self.text.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            let in_note = t.note.to_lowercase().contains(&q.to_lowercase());
            if !in_note && !amount_matches(t.amount, q) {
                return false;
            }
        }
        if let Some(kind) = self.kind {
            if t.kind != kind {
                return false;
            }
        }
        if let Some(cat) = self.category.as_deref().filter(|c| !c.is_empty()) {
            if t.category != cat {
                return false;
            }
        }
        let day = t.day();
        if self.from.is_some_and(|from| day < from) {
            return false;
        }
        if self.to.is_some_and(|to| day > to) {
            return false;
        }
        if let Some(w) = self.wallet_id {
            if t.wallet_id != Some(w) {
                return false;
            }
        }
        if self.exclude_transfers && Category::is_transfer_leg(&t.category) {
            return false;
        }
        true
    }
}

// "200.000", "200,000" and "200000" all look for the digits 200000.
fn amount_matches(amount: Decimal, query: &str) -> bool {
    if !query
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | ' '))
    {
        return false;
    }
    let digits: String = query.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return false;
    }
    let amount_digits: String = amount
        .normalize()
        .to_string()
        .chars()
        .filter(char::is_ascii_digit)
        .collect();
    amount_digits.contains(&digits)
}

pub fn filter<'a>(transactions: &'a [Transaction], f: &TransactionFilter) -> Vec<&'a Transaction> {
    transactions.iter().filter(|t| f.matches(t)).collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    DateDesc,
    DateAsc,
    AmountDesc,
    AmountAsc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::DateDesc => "date-desc",
            SortOrder::DateAsc => "date-asc",
            SortOrder::AmountDesc => "amount-desc",
            SortOrder::AmountAsc => "amount-asc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "date-desc" | "newest" => Ok(SortOrder::DateDesc),
            "date-asc" | "oldest" => Ok(SortOrder::DateAsc),
            "amount-desc" | "highest" => Ok(SortOrder::AmountDesc),
            "amount-asc" | "lowest" => Ok(SortOrder::AmountAsc),
            other => Err(LedgerError::InvalidTransaction(format!(
                "unknown sort order '{}' (use date-desc|date-asc|amount-desc|amount-asc)",
                other
            ))),
        }
    }
}

/// Stable sort: equal keys keep their input order.
pub fn sort(transactions: &mut [&Transaction], order: SortOrder) {
    match order {
        SortOrder::DateDesc => transactions.sort_by(|a, b| b.date.cmp(&a.date)),
        SortOrder::DateAsc => transactions.sort_by(|a, b| a.date.cmp(&b.date)),
        SortOrder::AmountDesc => transactions.sort_by(|a, b| b.amount.cmp(&a.amount)),
        SortOrder::AmountAsc => transactions.sort_by(|a, b| a.amount.cmp(&b.amount)),
    }
}
