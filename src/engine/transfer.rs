// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::{balance_of, find_wallet};
use crate::error::TransferError;
use crate::models::{
    Category, NewTransaction, Transaction, TransactionType, Wallet, WalletId, within_bounds,
};

#[derive(Debug, Clone, PartialEq)]
pub struct TransferRequest {
    pub from: WalletId,
    pub to: WalletId,
    pub amount: Decimal,
    pub fee: Decimal,
    pub note: String,
    /// Logical instant shared by every leg.
    pub at: NaiveDateTime,
}

impl TransferRequest {
    pub fn new(from: WalletId, to: WalletId, amount: Decimal, at: NaiveDateTime) -> Self {
        Self {
            from,
            to,
            amount,
            fee: Decimal::ZERO,
            note: String::new(),
            at,
        }
    }

    pub fn with_fee(mut self, fee: Decimal) -> Self {
        self.fee = fee;
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }
}

fn leg_note(prefix: String, note: &str) -> String {
    let note = note.trim();
    if note.is_empty() {
        prefix
    } else {
        format!("{}: {}", prefix, note)
    }
}

/// Builds the legs of a transfer in their fixed order: outgoing amount,
/// optional fee, incoming amount. The batch must be appended as a unit.
pub fn transfer(
    wallets: &[Wallet],
    transactions: &[Transaction],
    req: &TransferRequest,
) -> Result<Vec<NewTransaction>, TransferError> {
    if req.from == req.to {
        return Err(TransferError::SameWallet(req.from));
    }
    if req.amount <= Decimal::ZERO {
        return Err(TransferError::NonPositiveAmount(req.amount));
    }
    if req.fee < Decimal::ZERO {
        return Err(TransferError::NegativeFee(req.fee));
    }
    for v in [req.amount, req.fee] {
        if !within_bounds(v) {
            return Err(TransferError::OutOfRange(v));
        }
    }
    let source = find_wallet(wallets, req.from).ok_or(TransferError::UnknownWallet(req.from))?;
    let dest = find_wallet(wallets, req.to).ok_or(TransferError::UnknownWallet(req.to))?;

    let after = balance_of(source, transactions) - req.amount - req.fee;
    if source.is_credit() {
        if after + source.credit_limit < Decimal::ZERO {
            warn!(
                wallet = %source.name,
                balance_after = %after,
                limit = %source.credit_limit,
                "transfer exceeds credit limit"
            );
        }
    } else if after < Decimal::ZERO {
        warn!(wallet = %source.name, balance_after = %after, "transfer overdraws wallet");
    }

    let mut legs = Vec::with_capacity(3);
    legs.push(NewTransaction {
        amount: req.amount,
        kind: TransactionType::Expense,
        category: Category::TRANSFER_OUT.to_string(),
        note: leg_note(format!("Chuyển đến {}", dest.name), &req.note),
        date: req.at,
        wallet_id: Some(source.id),
    });
    if req.fee > Decimal::ZERO {
        legs.push(NewTransaction {
            amount: req.fee,
            kind: TransactionType::Expense,
            category: Category::TRANSFER_FEE.to_string(),
            note: format!("Phí chuyển đến {}", dest.name),
            date: req.at,
            wallet_id: Some(source.id),
        });
    }
    legs.push(NewTransaction {
        amount: req.amount,
        kind: TransactionType::Income,
        category: Category::TRANSFER_IN.to_string(),
        note: leg_note(format!("Nhận từ {}", source.name), &req.note),
        date: req.at,
        wallet_id: Some(dest.id),
    });

    debug!(
        from = %source.name,
        to = %dest.name,
        amount = %req.amount,
        fee = %req.fee,
        legs = legs.len(),
        "built transfer batch"
    );
    Ok(legs)
}
