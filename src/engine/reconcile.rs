// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use tracing::debug;

use super::{balance_of, find_wallet};
use crate::error::ReconcileError;
use crate::models::{
    Category, NewTransaction, Transaction, TransactionType, Wallet, WalletId, within_bounds,
};

/// Produces the single adjustment that brings the wallet's derived balance to
/// `actual`, or `None` when it already matches.
pub fn reconcile(
    wallets: &[Wallet],
    transactions: &[Transaction],
    wallet_id: WalletId,
    actual: Decimal,
    at: NaiveDateTime,
) -> Result<Option<NewTransaction>, ReconcileError> {
    let wallet = find_wallet(wallets, wallet_id).ok_or(ReconcileError::UnknownWallet(wallet_id))?;
    if !within_bounds(actual) {
        return Err(ReconcileError::OutOfRange(actual));
    }
    let current = balance_of(wallet, transactions);
    let diff = actual - current;
    if !within_bounds(diff) {
        return Err(ReconcileError::OutOfRange(diff));
    }
    debug!(wallet = %wallet.name, %current, %actual, %diff, "reconcile");
    if diff.is_zero() {
        return Ok(None);
    }
    let kind = if diff > Decimal::ZERO {
        TransactionType::Income
    } else {
        TransactionType::Expense
    };
    Ok(Some(NewTransaction {
        amount: diff.abs(),
        kind,
        category: Category::ADJUSTMENT.to_string(),
        note: format!("{} → {}", current.normalize(), actual.normalize()),
        date: at,
        wallet_id: Some(wallet.id),
    }))
}
