// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::WalletId;

/// Rejected transfer. Nothing is emitted when this is returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransferError {
    #[error("Invalid transfer: source and destination are the same wallet ({0})")]
    SameWallet(WalletId),
    #[error("Invalid transfer: amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),
    #[error("Invalid transfer: fee must not be negative, got {0}")]
    NegativeFee(Decimal),
    #[error("Invalid transfer: {0} is out of range")]
    OutOfRange(Decimal),
    #[error("Invalid transfer: unknown wallet {0}")]
    UnknownWallet(WalletId),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReconcileError {
    #[error("Invalid reconciliation: unknown wallet {0}")]
    UnknownWallet(WalletId),
    #[error("Invalid reconciliation: {0} is out of range")]
    OutOfRange(Decimal),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LedgerError {
    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),
    #[error("Invalid wallet: {0}")]
    InvalidWallet(String),
}
