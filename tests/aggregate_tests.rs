// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use walletbook::engine::{
    Granularity, SortOrder, TransactionFilter, bucket_periods, business_summary,
    category_totals, default_min_intensity, filter, group_by_day, intensity_window, sort,
    today_vs_yesterday, totals,
};
use walletbook::models::{Category, Transaction, TransactionType};

fn dt(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, 0, 0)
        .unwrap()
}

fn tx(
    id: i64,
    kind: TransactionType,
    amount: i64,
    category: &str,
    date: NaiveDateTime,
) -> Transaction {
    Transaction {
        id,
        amount: Decimal::from(amount),
        kind,
        category: category.into(),
        note: String::new(),
        date,
        wallet_id: Some(1),
    }
}

fn sample() -> Vec<Transaction> {
    use TransactionType::*;
    vec![
        tx(1, Income, 1_000, "Salary", dt(2025, 1, 5, 9)),
        tx(2, Expense, 200, "Food", dt(2025, 1, 5, 12)),
        tx(3, Expense, 300, "Rent", dt(2025, 2, 1, 8)),
        tx(4, Expense, 200, "Food", dt(2025, 2, 3, 19)),
        tx(5, Income, 50, "Gift", dt(2025, 3, 10, 10)),
    ]
}

#[test]
fn date_sorts_are_reverses_of_each_other() {
    let txs = sample();
    let mut desc: Vec<&Transaction> = txs.iter().collect();
    let mut asc = desc.clone();
    sort(&mut desc, SortOrder::DateDesc);
    sort(&mut asc, SortOrder::DateAsc);
    let desc_ids: Vec<i64> = desc.iter().map(|t| t.id).collect();
    let mut asc_ids: Vec<i64> = asc.iter().map(|t| t.id).collect();
    asc_ids.reverse();
    assert_eq!(desc_ids, asc_ids);
    assert_eq!(desc_ids, [5, 4, 3, 2, 1]);
}

#[test]
fn amount_sort_keeps_ties_in_input_order() {
    let txs = sample();
    let mut view: Vec<&Transaction> = txs.iter().collect();
    sort(&mut view, SortOrder::AmountDesc);
    let ids: Vec<i64> = view.iter().map(|t| t.id).collect();
    assert_eq!(ids, [1, 3, 2, 4, 5]);

    sort(&mut view, SortOrder::AmountAsc);
    let ids: Vec<i64> = view.iter().map(|t| t.id).collect();
    assert_eq!(ids, [5, 2, 4, 3, 1]);
}

#[test]
fn sort_order_parses_cli_spellings() {
    assert_eq!("date_asc".parse::<SortOrder>().unwrap(), SortOrder::DateAsc);
    assert_eq!("Amount-Desc".parse::<SortOrder>().unwrap(), SortOrder::AmountDesc);
    assert!("sideways".parse::<SortOrder>().is_err());
}

#[test]
fn type_filters_partition_the_input() {
    let txs = sample();
    let income = filter(
        &txs,
        &TransactionFilter {
            kind: Some(TransactionType::Income),
            ..Default::default()
        },
    );
    let expense = filter(
        &txs,
        &TransactionFilter {
            kind: Some(TransactionType::Expense),
            ..Default::default()
        },
    );
    assert_eq!(income.len() + expense.len(), txs.len());
    assert!(income.iter().all(|t| !expense.iter().any(|e| e.id == t.id)));
}

#[test]
fn filter_combines_predicates() {
    let mut txs = sample();
    txs[1].note = "Lunch with Team".into();
    let by_note = filter(
        &txs,
        &TransactionFilter {
            text: Some("team".into()),
            ..Default::default()
        },
    );
    assert_eq!(by_note.len(), 1);
    assert_eq!(by_note[0].id, 2);

    let by_digits = filter(
        &txs,
        &TransactionFilter {
            text: Some("1.000".into()),
            ..Default::default()
        },
    );
    assert_eq!(by_digits.iter().map(|t| t.id).collect::<Vec<_>>(), [1]);

    let ranged = filter(
        &txs,
        &TransactionFilter {
            category: Some("Food".into()),
            from: NaiveDate::from_ymd_opt(2025, 2, 1),
            to: NaiveDate::from_ymd_opt(2025, 2, 3),
            ..Default::default()
        },
    );
    assert_eq!(ranged.iter().map(|t| t.id).collect::<Vec<_>>(), [4]);

    assert!(
        filter(
            &txs,
            &TransactionFilter {
                wallet_id: Some(2),
                ..Default::default()
            }
        )
        .is_empty()
    );
}

#[test]
fn exclude_transfers_keeps_fees() {
    use TransactionType::*;
    let at = dt(2025, 4, 1, 10);
    let txs = vec![
        tx(1, Expense, 100, Category::TRANSFER_OUT, at),
        tx(2, Expense, 5, Category::TRANSFER_FEE, at),
        tx(3, Income, 100, Category::TRANSFER_IN, at),
        tx(4, Expense, 40, "Food", at),
    ];
    let f = TransactionFilter {
        exclude_transfers: true,
        ..Default::default()
    };
    let ids: Vec<i64> = filter(&txs, &f).iter().map(|t| t.id).collect();
    assert_eq!(ids, [2, 4]);
}

#[test]
fn day_groups_are_newest_first_with_daily_net() {
    let txs = sample();
    let groups = group_by_day(&txs);
    let days: Vec<NaiveDate> = groups.iter().map(|g| g.day).collect();
    assert_eq!(
        days,
        [
            NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            NaiveDate::from_ymd_opt(2025, 2, 3).unwrap(),
            NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 5).unwrap(),
        ]
    );
    let jan = &groups[3];
    assert_eq!(jan.transactions.len(), 2);
    assert_eq!(jan.transactions[0].id, 1);
    assert_eq!(jan.net, Decimal::from(800));
    assert!(group_by_day(&Vec::<Transaction>::new()).is_empty());
}

#[test]
fn monthly_buckets_cover_every_period() {
    let txs = sample();
    let now = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
    let buckets = bucket_periods(&txs, Granularity::Month, 4, now);
    let labels: Vec<&str> = buckets.iter().map(|b| b.label.as_str()).collect();
    assert_eq!(labels, ["2024-12", "2025-01", "2025-02", "2025-03"]);
    assert_eq!(buckets[0].net, Decimal::ZERO);
    assert_eq!(buckets[1].income, Decimal::from(1_000));
    assert_eq!(buckets[1].expense, Decimal::from(200));
    assert_eq!(buckets[2].expense, Decimal::from(500));
    assert_eq!(buckets[2].end, NaiveDate::from_ymd_opt(2025, 2, 28).unwrap());

    let sum: Decimal = buckets.iter().map(|b| b.net).sum();
    assert_eq!(sum, totals(&txs).net);
}

#[test]
fn daily_buckets_include_empty_days() {
    let txs = sample();
    let now = NaiveDate::from_ymd_opt(2025, 2, 3).unwrap();
    let buckets = bucket_periods(&txs, Granularity::Day, 3, now);
    assert_eq!(buckets.len(), 3);
    assert_eq!(buckets[0].label, "2025-02-01");
    assert_eq!(buckets[0].expense, Decimal::from(300));
    assert_eq!(buckets[1].expense, Decimal::ZERO);
    assert_eq!(buckets[2].expense, Decimal::from(200));
    assert!(bucket_periods(&txs, Granularity::Day, 0, now).is_empty());
}

#[test]
fn today_compares_spending_with_yesterday() {
    use TransactionType::*;
    let txs = vec![
        tx(1, Expense, 100, "Food", dt(2025, 5, 1, 9)),
        tx(2, Expense, 150, "Food", dt(2025, 5, 2, 9)),
        tx(3, Income, 70, "Gift", dt(2025, 5, 2, 10)),
    ];
    let cmp = today_vs_yesterday(&txs, NaiveDate::from_ymd_opt(2025, 5, 2).unwrap());
    assert_eq!(cmp.today.expense, Decimal::from(150));
    assert_eq!(cmp.today.income, Decimal::from(70));
    assert_eq!(cmp.yesterday.expense, Decimal::from(100));
    assert_eq!(cmp.expense_change, Some(Decimal::from(50)));

    let none = today_vs_yesterday(&txs, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
    assert_eq!(none.expense_change, None);
}

#[test]
fn category_totals_rank_by_amount() {
    let txs = sample();
    let cats = category_totals(&txs, TransactionType::Expense);
    let names: Vec<&str> = cats.iter().map(|c| c.category.as_str()).collect();
    assert_eq!(names, ["Food", "Rent"]);
    assert_eq!(cats[0].total, Decimal::from(400));
    assert_eq!(cats[0].count, 2);
    assert_eq!(cats[0].share, Decimal::new(5714, 2));
    assert!(category_totals(&Vec::<Transaction>::new(), TransactionType::Income).is_empty());
}

#[test]
fn business_summary_reports_profit_and_margin() {
    use TransactionType::*;
    let at = dt(2025, 6, 1, 9);
    let mut txs = vec![
        tx(1, Income, 500_000, Category::SELLING, at),
        tx(2, Expense, 300_000, Category::BUSINESS_COST, at),
        tx(3, Expense, 99, "Food", at),
    ];
    txs[1].wallet_id = None;
    let s = business_summary(&txs);
    assert_eq!(s.revenue, Decimal::from(500_000));
    assert_eq!(s.cost, Decimal::from(300_000));
    assert_eq!(s.profit, Decimal::from(200_000));
    assert_eq!(s.margin, Decimal::from(40));

    let empty = business_summary(&Vec::<Transaction>::new());
    assert_eq!(empty.profit, Decimal::ZERO);
    assert_eq!(empty.margin, Decimal::ZERO);
}

#[test]
fn intensity_scales_recent_amounts_with_a_floor() {
    use TransactionType::*;
    let txs = vec![
        tx(1, Expense, 1_000, "Old", dt(2025, 1, 1, 9)),
        tx(2, Expense, 10, "Small", dt(2025, 1, 2, 9)),
        tx(3, Income, 200, "Mid", dt(2025, 1, 3, 9)),
        tx(4, Expense, 400, "Big", dt(2025, 1, 4, 9)),
    ];
    let window = intensity_window(&txs, 3, default_min_intensity());
    let ids: Vec<i64> = window.iter().map(|i| i.transaction_id).collect();
    assert_eq!(ids, [4, 3, 2]);
    assert_eq!(window[0].weight, Decimal::ONE);
    assert_eq!(window[1].weight, Decimal::new(5, 1));
    assert_eq!(window[2].weight, Decimal::new(1, 1));

    let zeros = vec![tx(1, Expense, 0, "Zero", dt(2025, 1, 1, 9))];
    assert_eq!(
        intensity_window(&zeros, 5, default_min_intensity())[0].weight,
        default_min_intensity()
    );
    assert!(intensity_window(&txs, 0, default_min_intensity()).is_empty());
}

#[test]
fn amount_sorts_are_reverses_without_ties() {
    use TransactionType::*;
    let txs = vec![
        tx(1, Expense, 30, "A", dt(2025, 1, 1, 9)),
        tx(2, Income, 10, "B", dt(2025, 1, 2, 9)),
        tx(3, Expense, 50, "C", dt(2025, 1, 3, 9)),
        tx(4, Income, 20, "D", dt(2025, 1, 4, 9)),
    ];
    let mut desc: Vec<&Transaction> = txs.iter().collect();
    let mut asc = desc.clone();
    sort(&mut desc, SortOrder::AmountDesc);
    sort(&mut asc, SortOrder::AmountAsc);
    let desc_ids: Vec<i64> = desc.iter().map(|t| t.id).collect();
    let mut asc_ids: Vec<i64> = asc.iter().map(|t| t.id).collect();
    asc_ids.reverse();
    assert_eq!(desc_ids, [3, 1, 4, 2]);
    assert_eq!(desc_ids, asc_ids);
}

#[test]
fn buckets_over_no_transactions_are_zero() {
    let now = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
    let none: Vec<Transaction> = Vec::new();
    for granularity in [Granularity::Day, Granularity::Month] {
        let buckets = bucket_periods(&none, granularity, 6, now);
        assert_eq!(buckets.len(), 6);
        assert!(buckets.iter().all(|b| b.income.is_zero()
            && b.expense.is_zero()
            && b.net.is_zero()));
    }
}

#[test]
fn aggregations_are_repeatable_and_leave_input_untouched() {
    let txs = sample();
    let before = txs.clone();
    let now = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
    assert_eq!(totals(&txs), totals(&txs));
    assert_eq!(group_by_day(&txs), group_by_day(&txs));
    assert_eq!(
        bucket_periods(&txs, Granularity::Month, 3, now),
        bucket_periods(&txs, Granularity::Month, 3, now)
    );
    assert_eq!(
        category_totals(&txs, TransactionType::Expense),
        category_totals(&txs, TransactionType::Expense)
    );
    assert_eq!(business_summary(&txs), business_summary(&txs));
    assert_eq!(txs, before);
}

#[test]
fn intensity_never_drops_below_a_fine_grained_floor() {
    use TransactionType::*;
    let floor = Decimal::new(105, 3);
    let txs = vec![
        tx(1, Expense, 1, "Tiny", dt(2025, 1, 1, 9)),
        tx(2, Expense, 1_000, "Big", dt(2025, 1, 2, 9)),
    ];
    let window = intensity_window(&txs, 2, floor);
    assert_eq!(window[0].weight, Decimal::ONE);
    assert_eq!(window[1].weight, floor);
    assert!(window.iter().all(|i| i.weight >= floor));

    let zeros = vec![tx(1, Expense, 0, "Zero", dt(2025, 1, 1, 9))];
    assert_eq!(intensity_window(&zeros, 1, floor)[0].weight, floor);
}
