// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::{load_transactions, load_wallets, orphaned_transactions};
use crate::models::{Category, Transaction, TransactionType};
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Consistency findings as (issue, detail) pairs, in a stable order.
pub fn diagnose(conn: &Connection) -> Result<Vec<(String, String)>> {
    let mut issues = Vec::new();

    for t in orphaned_transactions(conn)? {
        let wallet = t.wallet_id.unwrap_or_default();
        issues.push((
            "orphaned_transaction".to_string(),
            format!("#{} references missing wallet {}", t.id, wallet),
        ));
    }

    let txs = load_transactions(conn)?;
    for t in txs.iter().filter(|t| t.amount < Decimal::ZERO) {
        issues.push((
            "negative_amount".to_string(),
            format!("#{} {} {}", t.id, t.kind, t.amount),
        ));
    }

    // transfer legs share a timestamp; an outgoing leg without a matching
    // incoming leg means one side was edited or removed
    let mut legs: BTreeMap<_, (Vec<&Transaction>, Vec<&Transaction>)> = BTreeMap::new();
    for t in &txs {
        let entry = legs.entry(t.date);
        match (t.category.as_str(), t.kind) {
            (Category::TRANSFER_OUT, TransactionType::Expense) => {
                entry.or_default().0.push(t);
            }
            (Category::TRANSFER_IN, TransactionType::Income) => {
                entry.or_default().1.push(t);
            }
            _ => {}
        }
    }
    for (at, (outs, ins)) in &legs {
        let out_total: Decimal = outs.iter().map(|t| t.amount).sum();
        let in_total: Decimal = ins.iter().map(|t| t.amount).sum();
        if out_total != in_total {
            issues.push((
                "unbalanced_transfer".to_string(),
                format!("{}: sent {} received {}", at, out_total, in_total),
            ));
        }
    }

    let wallets = load_wallets(conn)?;
    for w in wallets.iter().filter(|w| w.is_credit() && w.credit_limit.is_zero()) {
        issues.push((
            "credit_without_limit".to_string(),
            format!("wallet '{}' has no credit limit", w.name),
        ));
    }

    Ok(issues)
}

pub fn handle(conn: &Connection) -> Result<()> {
    let issues = diagnose(conn)?;
    if issues.is_empty() {
        println!("doctor: no issues found");
    } else {
        let rows = issues.into_iter().map(|(k, v)| vec![k, v]).collect();
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
