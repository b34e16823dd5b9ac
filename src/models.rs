// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::LedgerError;

pub type WalletId = i64;
pub type TransactionId = i64;

/// Largest magnitude accepted for any amount, balance or limit (10^15).
/// Sums over any realistic history stay far inside `Decimal`'s range.
pub fn max_amount() -> Decimal {
    Decimal::from(1_000_000_000_000_000_i64)
}

/// True when `|d|` is within [`max_amount`].
pub fn within_bounds(d: Decimal) -> bool {
    d.abs() <= max_amount()
}

/// Reserved category labels that carry meaning inside the engine.
pub struct Category;

impl Category {
    pub const TRANSFER_OUT: &'static str = "Chuyển đi";
    pub const TRANSFER_FEE: &'static str = "Phí giao dịch";
    pub const TRANSFER_IN: &'static str = "Nhận tiền";
    pub const ADJUSTMENT: &'static str = "Điều chỉnh số dư";
    pub const SELLING: &'static str = "SELLING";
    pub const BUSINESS_COST: &'static str = "BUSINESS_COST";

    /// Legs that only move money between wallets.
    pub fn is_transfer_leg(category: &str) -> bool {
        category == Self::TRANSFER_OUT || category == Self::TRANSFER_IN
    }

    /// Categories the transfer and reconciliation engines write themselves.
    pub fn is_engine_generated(category: &str) -> bool {
        matches!(
            category,
            Self::TRANSFER_OUT | Self::TRANSFER_FEE | Self::TRANSFER_IN | Self::ADJUSTMENT
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WalletType {
    #[serde(rename = "CASH")]
    Cash,
    #[serde(rename = "BANK")]
    Bank,
    #[serde(rename = "E-WALLET")]
    EWallet,
    #[serde(rename = "CREDIT")]
    Credit,
}

impl WalletType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WalletType::Cash => "CASH",
            WalletType::Bank => "BANK",
            WalletType::EWallet => "E-WALLET",
            WalletType::Credit => "CREDIT",
        }
    }
}

impl fmt::Display for WalletType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WalletType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "CASH" => Ok(WalletType::Cash),
            "BANK" => Ok(WalletType::Bank),
            "E-WALLET" | "EWALLET" | "E_WALLET" => Ok(WalletType::EWallet),
            "CREDIT" => Ok(WalletType::Credit),
            other => Err(LedgerError::InvalidWallet(format!(
                "unknown wallet type '{}' (use CASH|BANK|E-WALLET|CREDIT)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "INCOME",
            TransactionType::Expense => "EXPENSE",
        }
    }

    /// Human label used in exports.
    pub fn label(&self) -> &'static str {
        match self {
            TransactionType::Income => "Thu nhập",
            TransactionType::Expense => "Chi tiêu",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "INCOME" | "IN" => Ok(TransactionType::Income),
            "EXPENSE" | "OUT" => Ok(TransactionType::Expense),
            other => Err(LedgerError::InvalidTransaction(format!(
                "unknown transaction type '{}' (use INCOME|EXPENSE)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wallet {
    pub id: WalletId,
    pub name: String,
    pub wallet_type: WalletType,
    pub initial_balance: Decimal,
    pub credit_limit: Decimal,
    pub bank_name: Option<String>,
    pub account_number: Option<String>,
    pub description: Option<String>,
}

impl Wallet {
    pub fn is_credit(&self) -> bool {
        self.wallet_type == WalletType::Credit
    }
}

/// A wallet before the store has assigned it an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewWallet {
    pub name: String,
    pub wallet_type: WalletType,
    pub initial_balance: Decimal,
    pub credit_limit: Decimal,
    pub bank_name: Option<String>,
    pub account_number: Option<String>,
    pub description: Option<String>,
}

impl NewWallet {
    pub fn new(
        name: impl Into<String>,
        wallet_type: WalletType,
        initial_balance: Decimal,
    ) -> Result<Self, LedgerError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(LedgerError::InvalidWallet("wallet name is empty".into()));
        }
        if !within_bounds(initial_balance) {
            return Err(LedgerError::InvalidWallet(format!(
                "initial balance {} exceeds {}",
                initial_balance,
                max_amount()
            )));
        }
        Ok(Self {
            name,
            wallet_type,
            initial_balance,
            credit_limit: Decimal::ZERO,
            bank_name: None,
            account_number: None,
            description: None,
        })
    }

    /// Sets the credit limit. Ignored for non-credit wallets.
    pub fn with_credit_limit(mut self, limit: Decimal) -> Result<Self, LedgerError> {
        if limit < Decimal::ZERO {
            return Err(LedgerError::InvalidWallet(format!(
                "credit limit must be non-negative, got {}",
                limit
            )));
        }
        if !within_bounds(limit) {
            return Err(LedgerError::InvalidWallet(format!(
                "credit limit {} exceeds {}",
                limit,
                max_amount()
            )));
        }
        if self.wallet_type == WalletType::Credit {
            self.credit_limit = limit;
        }
        Ok(self)
    }

    pub fn with_id(self, id: WalletId) -> Wallet {
        Wallet {
            id,
            name: self.name,
            wallet_type: self.wallet_type,
            initial_balance: self.initial_balance,
            credit_limit: self.credit_limit,
            bank_name: self.bank_name,
            account_number: self.account_number,
            description: self.description,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub amount: Decimal,
    pub kind: TransactionType,
    pub category: String,
    pub note: String,
    pub date: NaiveDateTime,
    pub wallet_id: Option<WalletId>,
}

impl Transaction {
    /// Amount with the sign implied by the transaction type.
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            TransactionType::Income => self.amount,
            TransactionType::Expense => -self.amount,
        }
    }

    pub fn day(&self) -> chrono::NaiveDate {
        self.date.date()
    }
}

/// A transaction draft. Engines emit these; the store assigns ids on append.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub amount: Decimal,
    pub kind: TransactionType,
    pub category: String,
    pub note: String,
    pub date: NaiveDateTime,
    pub wallet_id: Option<WalletId>,
}

impl NewTransaction {
    pub fn new(
        kind: TransactionType,
        amount: Decimal,
        category: impl Into<String>,
        date: NaiveDateTime,
    ) -> Result<Self, LedgerError> {
        let draft = Self {
            amount,
            kind,
            category: category.into(),
            note: String::new(),
            date,
            wallet_id: None,
        };
        draft.validate()?;
        Ok(draft)
    }

    /// Amount is a bounded magnitude and the category is not blank.
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.amount < Decimal::ZERO {
            return Err(LedgerError::InvalidTransaction(format!(
                "amount must be a non-negative magnitude, got {}",
                self.amount
            )));
        }
        if !within_bounds(self.amount) {
            return Err(LedgerError::InvalidTransaction(format!(
                "amount {} exceeds {}",
                self.amount,
                max_amount()
            )));
        }
        if self.category.trim().is_empty() {
            return Err(LedgerError::InvalidTransaction("category is empty".into()));
        }
        Ok(())
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    pub fn in_wallet(mut self, wallet_id: WalletId) -> Self {
        self.wallet_id = Some(wallet_id);
        self
    }

    pub fn with_id(self, id: TransactionId) -> Transaction {
        Transaction {
            id,
            amount: self.amount,
            kind: self.kind,
            category: self.category,
            note: self.note,
            date: self.date,
            wallet_id: self.wallet_id,
        }
    }
}

impl From<Transaction> for NewTransaction {
    fn from(t: Transaction) -> Self {
        Self {
            amount: t.amount,
            kind: t.kind,
            category: t.category,
            note: t.note,
            date: t.date,
            wallet_id: t.wallet_id,
        }
    }
}
