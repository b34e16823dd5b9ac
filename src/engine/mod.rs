// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Ledger engine: pure functions over caller-owned wallet and transaction
//! lists. Nothing here touches storage or the wall clock.

pub mod aggregate;
pub mod balance;
pub mod filter;
pub mod reconcile;
pub mod transfer;

pub use aggregate::{
    BusinessSummary, CategoryTotal, DayComparison, DayGroup, Granularity, Intensity,
    PeriodBucket, Totals, bucket_periods, business_summary, category_totals,
    default_min_intensity, group_by_day, intensity_window, today_vs_yesterday, totals,
};
pub use balance::{
    CreditStatus, WalletBalance, balance_of, credit_status, total_balance, wallet_balances,
};
pub use filter::{SortOrder, TransactionFilter, filter, sort};
pub use reconcile::reconcile;
pub use transfer::{TransferRequest, transfer};

use crate::models::{Wallet, WalletId};

pub(crate) fn find_wallet(wallets: &[Wallet], id: WalletId) -> Option<&Wallet> {
    wallets.iter().find(|w| w.id == id)
}
