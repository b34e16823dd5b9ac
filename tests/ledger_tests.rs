// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use walletbook::engine::{
    TransferRequest, balance_of, credit_status, reconcile, total_balance, transfer,
    wallet_balances,
};
use walletbook::error::{ReconcileError, TransferError};
use walletbook::models::{
    Category, NewTransaction, NewWallet, Transaction, TransactionType, Wallet, WalletType,
    max_amount,
};

fn at(day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 3, day)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

fn wallet(id: i64, name: &str, typ: WalletType, initial: i64) -> Wallet {
    NewWallet::new(name, typ, Decimal::from(initial))
        .unwrap()
        .with_id(id)
}

fn tx(id: i64, kind: TransactionType, amount: i64, wallet_id: Option<i64>) -> Transaction {
    Transaction {
        id,
        amount: Decimal::from(amount),
        kind,
        category: "Food".into(),
        note: String::new(),
        date: at(1, 9),
        wallet_id,
    }
}

/// Stores drafts the way the database does: ids continue after the last one.
fn commit(txs: &mut Vec<Transaction>, drafts: Vec<NewTransaction>) {
    for d in drafts {
        let id = txs.last().map(|t| t.id + 1).unwrap_or(1);
        txs.push(d.with_id(id));
    }
}

#[test]
fn balance_is_initial_plus_income_minus_expense() {
    let w = wallet(1, "Cash", WalletType::Cash, 100_000);
    let txs = vec![
        tx(1, TransactionType::Income, 50_000, Some(1)),
        tx(2, TransactionType::Expense, 30_000, Some(1)),
        tx(3, TransactionType::Expense, 999_999, Some(2)),
        tx(4, TransactionType::Income, 777, None),
    ];
    assert_eq!(balance_of(&w, &txs), Decimal::from(120_000));
    assert_eq!(balance_of(&w, &[]), Decimal::from(100_000));
}

#[test]
fn balance_is_exact_over_long_histories() {
    let w = wallet(1, "Bank", WalletType::Bank, 0);
    let cent = Decimal::new(1, 2);
    let txs: Vec<Transaction> = (1..=10_000)
        .map(|i| Transaction {
            amount: cent,
            ..tx(i, TransactionType::Income, 0, Some(1))
        })
        .collect();
    assert_eq!(balance_of(&w, &txs), Decimal::from(100));
}

#[test]
fn total_ignores_unassigned_transactions() {
    let wallets = vec![
        wallet(1, "Cash", WalletType::Cash, 10),
        wallet(2, "Bank", WalletType::Bank, 20),
    ];
    let txs = vec![
        tx(1, TransactionType::Income, 5, Some(2)),
        tx(2, TransactionType::Income, 1_000, None),
    ];
    assert_eq!(total_balance(&wallets, &txs), Decimal::from(35));
    let per_wallet = wallet_balances(&wallets, &txs);
    assert_eq!(per_wallet.len(), 2);
    assert_eq!(per_wallet[1].name, "Bank");
    assert_eq!(per_wallet[1].balance, Decimal::from(25));
}

#[test]
fn credit_status_reports_available_and_utilization() {
    let card = NewWallet::new("Card", WalletType::Credit, Decimal::ZERO)
        .unwrap()
        .with_credit_limit(Decimal::from(10_000_000))
        .unwrap()
        .with_id(3);
    let txs = vec![tx(1, TransactionType::Expense, 2_500_000, Some(3))];
    let s = credit_status(&card, &txs).unwrap();
    assert_eq!(s.balance, Decimal::from(-2_500_000));
    assert_eq!(s.available, Decimal::from(7_500_000));
    assert_eq!(s.utilization, Decimal::from(25));

    let cash = wallet(1, "Cash", WalletType::Cash, 0);
    assert!(credit_status(&cash, &txs).is_none());

    let no_limit = wallet(4, "Card2", WalletType::Credit, 0);
    assert_eq!(
        credit_status(&no_limit, &txs).unwrap().utilization,
        Decimal::ZERO
    );
}

#[test]
fn credit_limit_is_ignored_outside_credit_wallets() {
    let w = NewWallet::new("Cash", WalletType::Cash, Decimal::ZERO)
        .unwrap()
        .with_credit_limit(Decimal::from(500))
        .unwrap();
    assert_eq!(w.credit_limit, Decimal::ZERO);
    assert!(
        NewWallet::new("Card", WalletType::Credit, Decimal::ZERO)
            .unwrap()
            .with_credit_limit(Decimal::from(-1))
            .is_err()
    );
    assert!(NewWallet::new("  ", WalletType::Cash, Decimal::ZERO).is_err());
}

#[test]
fn transfer_with_fee_emits_three_legs() {
    let wallets = vec![
        wallet(1, "A", WalletType::Bank, 1_000_000),
        wallet(2, "B", WalletType::Cash, 0),
    ];
    let mut txs = Vec::new();
    let req = TransferRequest::new(1, 2, Decimal::from(200_000), at(5, 10))
        .with_fee(Decimal::from(5_000))
        .with_note("rent");
    let legs = transfer(&wallets, &txs, &req).unwrap();

    let categories: Vec<&str> = legs.iter().map(|l| l.category.as_str()).collect();
    assert_eq!(
        categories,
        [
            Category::TRANSFER_OUT,
            Category::TRANSFER_FEE,
            Category::TRANSFER_IN
        ]
    );
    assert!(legs.iter().all(|l| l.date == at(5, 10)));
    assert_eq!(legs[0].note, "Chuyển đến B: rent");
    assert_eq!(legs[1].note, "Phí chuyển đến B");
    assert_eq!(legs[2].note, "Nhận từ A: rent");

    commit(&mut txs, legs);
    assert_eq!(balance_of(&wallets[0], &txs), Decimal::from(795_000));
    assert_eq!(balance_of(&wallets[1], &txs), Decimal::from(200_000));
    assert_eq!(
        total_balance(&wallets, &txs),
        Decimal::from(1_000_000 - 5_000)
    );
}

#[test]
fn transfer_without_fee_emits_two_legs() {
    let wallets = vec![
        wallet(1, "A", WalletType::Bank, 0),
        wallet(2, "B", WalletType::Cash, 0),
    ];
    let req = TransferRequest::new(1, 2, Decimal::from(50), at(5, 10));
    let legs = transfer(&wallets, &[], &req).unwrap();
    assert_eq!(legs.len(), 2);
    assert_eq!(legs[0].kind, TransactionType::Expense);
    assert_eq!(legs[0].wallet_id, Some(1));
    assert_eq!(legs[1].kind, TransactionType::Income);
    assert_eq!(legs[1].wallet_id, Some(2));
    assert_eq!(legs[0].note, "Chuyển đến B");
}

#[test]
fn transfer_may_overdraw_the_source() {
    let wallets = vec![
        wallet(1, "A", WalletType::Cash, 10),
        wallet(2, "B", WalletType::Cash, 0),
    ];
    let req = TransferRequest::new(1, 2, Decimal::from(100), at(5, 10));
    let mut txs = Vec::new();
    commit(&mut txs, transfer(&wallets, &[], &req).unwrap());
    assert_eq!(balance_of(&wallets[0], &txs), Decimal::from(-90));
}

#[test]
fn invalid_transfers_emit_nothing() {
    let wallets = vec![
        wallet(1, "A", WalletType::Bank, 100),
        wallet(2, "B", WalletType::Cash, 0),
    ];
    let base = TransferRequest::new(1, 2, Decimal::from(10), at(5, 10));

    let same = TransferRequest { to: 1, ..base.clone() };
    assert_eq!(
        transfer(&wallets, &[], &same),
        Err(TransferError::SameWallet(1))
    );

    let zero = TransferRequest {
        amount: Decimal::ZERO,
        ..base.clone()
    };
    assert_eq!(
        transfer(&wallets, &[], &zero),
        Err(TransferError::NonPositiveAmount(Decimal::ZERO))
    );

    let negative_fee = base.clone().with_fee(Decimal::from(-1));
    assert_eq!(
        transfer(&wallets, &[], &negative_fee),
        Err(TransferError::NegativeFee(Decimal::from(-1)))
    );

    let unknown = TransferRequest { to: 9, ..base };
    assert_eq!(
        transfer(&wallets, &[], &unknown),
        Err(TransferError::UnknownWallet(9))
    );
}

#[test]
fn reconcile_adds_income_when_actual_is_higher() {
    let wallets = vec![wallet(1, "Cash", WalletType::Cash, 50_000)];
    let mut txs = Vec::new();
    let adj = reconcile(&wallets, &txs, 1, Decimal::from(80_000), at(7, 8))
        .unwrap()
        .unwrap();
    assert_eq!(adj.kind, TransactionType::Income);
    assert_eq!(adj.amount, Decimal::from(30_000));
    assert_eq!(adj.category, Category::ADJUSTMENT);
    assert_eq!(adj.note, "50000 → 80000");
    assert_eq!(adj.wallet_id, Some(1));

    commit(&mut txs, vec![adj]);
    assert_eq!(balance_of(&wallets[0], &txs), Decimal::from(80_000));
}

#[test]
fn reconcile_adds_expense_when_actual_is_lower() {
    let wallets = vec![wallet(1, "Cash", WalletType::Cash, 50_000)];
    let adj = reconcile(&wallets, &[], 1, Decimal::from(-20_000), at(7, 8))
        .unwrap()
        .unwrap();
    assert_eq!(adj.kind, TransactionType::Expense);
    assert_eq!(adj.amount, Decimal::from(70_000));

    let mut txs = vec![tx(1, TransactionType::Income, 5, Some(2))];
    commit(&mut txs, vec![adj]);
    assert_eq!(balance_of(&wallets[0], &txs), Decimal::from(-20_000));
}

#[test]
fn reconcile_is_noop_when_balances_match() {
    let wallets = vec![wallet(1, "Cash", WalletType::Cash, 50_000)];
    let txs = vec![tx(1, TransactionType::Expense, 10_000, Some(1))];
    assert_eq!(
        reconcile(&wallets, &txs, 1, Decimal::from(40_000), at(7, 8)),
        Ok(None)
    );
    assert_eq!(
        reconcile(&wallets, &txs, 2, Decimal::ZERO, at(7, 8)),
        Err(ReconcileError::UnknownWallet(2))
    );
}

#[test]
fn drafts_reject_negative_amounts_and_blank_categories() {
    assert!(NewTransaction::new(TransactionType::Expense, Decimal::from(-5), "Food", at(1, 1)).is_err());
    assert!(NewTransaction::new(TransactionType::Expense, Decimal::from(5), " ", at(1, 1)).is_err());
    let ok = NewTransaction::new(TransactionType::Income, Decimal::ZERO, "Gift", at(1, 1)).unwrap();
    assert_eq!(ok.with_id(4).signed_amount(), Decimal::ZERO);
}

#[test]
fn balance_derivation_does_not_mutate_or_drift() {
    let wallets = vec![
        wallet(1, "Cash", WalletType::Cash, 300),
        wallet(2, "Bank", WalletType::Bank, 0),
    ];
    let txs = vec![
        tx(1, TransactionType::Income, 40, Some(1)),
        tx(2, TransactionType::Expense, 15, Some(2)),
    ];
    let before = txs.clone();
    let first = wallet_balances(&wallets, &txs);
    let second = wallet_balances(&wallets, &txs);
    assert_eq!(first, second);
    assert_eq!(balance_of(&wallets[0], &txs), balance_of(&wallets[0], &txs));
    assert_eq!(txs, before);

    let req = TransferRequest::new(1, 2, Decimal::from(10), at(2, 9));
    assert_eq!(
        transfer(&wallets, &txs, &req),
        transfer(&wallets, &txs, &req)
    );
    assert_eq!(txs, before);
}

#[test]
fn amounts_beyond_the_bound_are_rejected() {
    let over = max_amount() + Decimal::ONE;
    assert!(NewTransaction::new(TransactionType::Income, over, "Gift", at(1, 1)).is_err());
    assert!(NewTransaction::new(TransactionType::Income, max_amount(), "Gift", at(1, 1)).is_ok());
    assert!(NewWallet::new("Cash", WalletType::Cash, -over).is_err());
    assert!(
        NewWallet::new("Card", WalletType::Credit, Decimal::ZERO)
            .unwrap()
            .with_credit_limit(over)
            .is_err()
    );
    assert!(
        NewTransaction::new(TransactionType::Income, Decimal::MAX, "Gift", at(1, 1)).is_err()
    );

    let wallets = vec![
        wallet(1, "A", WalletType::Bank, 0),
        wallet(2, "B", WalletType::Cash, 0),
    ];
    let req = TransferRequest::new(1, 2, over, at(5, 10));
    assert_eq!(
        transfer(&wallets, &[], &req),
        Err(TransferError::OutOfRange(over))
    );
    assert_eq!(
        reconcile(&wallets, &[], 1, Decimal::MAX, at(7, 8)),
        Err(ReconcileError::OutOfRange(Decimal::MAX))
    );
}

#[test]
fn balance_of_many_maximal_amounts_does_not_overflow() {
    let w = wallet(1, "Vault", WalletType::Bank, 0);
    let big = NewTransaction::new(TransactionType::Income, max_amount(), "Gift", at(1, 1))
        .unwrap()
        .in_wallet(1);
    let mut txs = Vec::new();
    commit(&mut txs, vec![big; 1_000]);
    assert_eq!(
        balance_of(&w, &txs),
        max_amount() * Decimal::from(1_000)
    );
}
