// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{Transaction, Wallet, WalletId};

/// Derived balance of a wallet: initial balance plus income minus expense
/// over every transaction tagged with the wallet's id.
pub fn balance_of(wallet: &Wallet, transactions: &[Transaction]) -> Decimal {
    transactions
        .iter()
        .filter(|t| t.wallet_id == Some(wallet.id))
        .fold(wallet.initial_balance, |acc, t| acc + t.signed_amount())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WalletBalance {
    pub wallet_id: WalletId,
    pub name: String,
    pub balance: Decimal,
}

pub fn wallet_balances(wallets: &[Wallet], transactions: &[Transaction]) -> Vec<WalletBalance> {
    wallets
        .iter()
        .map(|w| WalletBalance {
            wallet_id: w.id,
            name: w.name.clone(),
            balance: balance_of(w, transactions),
        })
        .collect()
}

/// Sum of every wallet's derived balance. Unassigned transactions do not count.
pub fn total_balance(wallets: &[Wallet], transactions: &[Transaction]) -> Decimal {
    wallets
        .iter()
        .map(|w| balance_of(w, transactions))
        .sum()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreditStatus {
    pub limit: Decimal,
    pub balance: Decimal,
    pub available: Decimal,
    /// Percent of the limit in use, 0 when the limit is 0.
    pub utilization: Decimal,
}

/// Returns `None` for wallets that are not credit wallets.
pub fn credit_status(wallet: &Wallet, transactions: &[Transaction]) -> Option<CreditStatus> {
    if !wallet.is_credit() {
        return None;
    }
    let balance = balance_of(wallet, transactions);
    let limit = wallet.credit_limit;
    let utilization = if limit > Decimal::ZERO {
        (balance.abs() * Decimal::ONE_HUNDRED / limit).round_dp(2)
    } else {
        Decimal::ZERO
    };
    Some(CreditStatus {
        limit,
        balance,
        available: limit + balance,
        utilization,
    })
}
