// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Settings;
use crate::db::{load_transactions, load_wallets, wallet_by_name};
use crate::engine::{
    Granularity, PeriodBucket, TransactionFilter, bucket_periods, business_summary,
    category_totals, credit_status, filter, intensity_window, today_vs_yesterday, total_balance,
    wallet_balances,
};
use crate::models::TransactionType;
use crate::utils::{fmt_money, maybe_print_json, now, parse_date, pretty_table};
use anyhow::{Result, anyhow};
use rusqlite::Connection;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("balances", sub)) => balances(conn, sub)?,
        Some(("cashflow", sub)) => periods(conn, sub, Granularity::Month)?,
        Some(("daily", sub)) => periods(conn, sub, Granularity::Day)?,
        Some(("categories", sub)) => categories(conn, sub)?,
        Some(("business", sub)) => business(conn, sub)?,
        Some(("credit", sub)) => credit(conn, sub)?,
        Some(("intensity", sub)) => intensity(conn, sub)?,
        Some(("today", sub)) => today(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn json_flags(sub: &clap::ArgMatches) -> (bool, bool) {
    (sub.get_flag("json"), sub.get_flag("jsonl"))
}

fn date_range(sub: &clap::ArgMatches) -> Result<TransactionFilter> {
    let mut f = TransactionFilter::default();
    if let Some(s) = sub.get_one::<String>("from") {
        f.from = Some(parse_date(s)?);
    }
    if let Some(s) = sub.get_one::<String>("to") {
        f.to = Some(parse_date(s)?);
    }
    Ok(f)
}

fn balances(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = json_flags(sub);
    let wallets = load_wallets(conn)?;
    let txs = load_transactions(conn)?;
    let data = wallet_balances(&wallets, &txs);
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let ccy = Settings::load(conn)?.currency;
        let mut rows: Vec<Vec<String>> = data
            .iter()
            .map(|b| vec![b.name.clone(), fmt_money(&b.balance, &ccy)])
            .collect();
        rows.push(vec![
            "Total".into(),
            fmt_money(&total_balance(&wallets, &txs), &ccy),
        ]);
        println!("{}", pretty_table(&["Wallet", "Balance"], rows));
    }
    Ok(())
}

pub fn period_report(
    conn: &Connection,
    sub: &clap::ArgMatches,
    granularity: Granularity,
) -> Result<Vec<PeriodBucket>> {
    let settings = Settings::load(conn)?;
    let count = match granularity {
        Granularity::Month => sub
            .get_one::<usize>("months")
            .copied()
            .unwrap_or(settings.cashflow_months),
        Granularity::Day => *sub
            .get_one::<usize>("days")
            .ok_or_else(|| anyhow!("Missing argument 'days'"))?,
    };
    let mut f = TransactionFilter {
        exclude_transfers: sub.get_flag("exclude_transfers"),
        ..Default::default()
    };
    if let Some(name) = sub.get_one::<String>("wallet") {
        f.wallet_id = Some(wallet_by_name(conn, name)?.id);
    }
    let txs = load_transactions(conn)?;
    Ok(bucket_periods(
        filter(&txs, &f),
        granularity,
        count,
        now().date(),
    ))
}

fn periods(conn: &Connection, sub: &clap::ArgMatches, granularity: Granularity) -> Result<()> {
    let (json_flag, jsonl_flag) = json_flags(sub);
    let data = period_report(conn, sub, granularity)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let ccy = Settings::load(conn)?.currency;
        let rows = data
            .iter()
            .map(|b| {
                vec![
                    b.label.clone(),
                    fmt_money(&b.income, &ccy),
                    fmt_money(&b.expense, &ccy),
                    fmt_money(&b.net, &ccy),
                ]
            })
            .collect();
        let first = match granularity {
            Granularity::Month => "Month",
            Granularity::Day => "Day",
        };
        println!(
            "{}",
            pretty_table(&[first, "Income", "Expense", "Net"], rows)
        );
    }
    Ok(())
}

fn categories(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = json_flags(sub);
    let kind = sub
        .get_one::<String>("type")
        .map(|s| s.parse::<TransactionType>())
        .transpose()?
        .unwrap_or(TransactionType::Expense);
    let f = date_range(sub)?;
    let txs = load_transactions(conn)?;
    let data = category_totals(filter(&txs, &f), kind);
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let ccy = Settings::load(conn)?.currency;
        let rows = data
            .iter()
            .map(|c| {
                vec![
                    c.category.clone(),
                    c.count.to_string(),
                    fmt_money(&c.total, &ccy),
                    format!("{}%", c.share),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Category", "Count", kind.as_str(), "Share"], rows)
        );
    }
    Ok(())
}

fn business(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = json_flags(sub);
    let f = date_range(sub)?;
    let txs = load_transactions(conn)?;
    let s = business_summary(filter(&txs, &f));
    if !maybe_print_json(json_flag, jsonl_flag, &s)? {
        let ccy = Settings::load(conn)?.currency;
        let rows = vec![
            vec!["Revenue".into(), fmt_money(&s.revenue, &ccy)],
            vec!["Cost".into(), fmt_money(&s.cost, &ccy)],
            vec!["Profit".into(), fmt_money(&s.profit, &ccy)],
            vec!["Margin".into(), format!("{}%", s.margin)],
        ];
        println!("{}", pretty_table(&["Business", "Value"], rows));
    }
    Ok(())
}

#[derive(Serialize)]
struct CreditRow {
    wallet: String,
    #[serde(flatten)]
    status: crate::engine::CreditStatus,
}

fn credit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = json_flags(sub);
    let wallets = load_wallets(conn)?;
    let txs = load_transactions(conn)?;
    let data: Vec<CreditRow> = wallets
        .iter()
        .filter_map(|w| {
            credit_status(w, &txs).map(|status| CreditRow {
                wallet: w.name.clone(),
                status,
            })
        })
        .collect();
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let ccy = Settings::load(conn)?.currency;
        let rows = data
            .iter()
            .map(|r| {
                vec![
                    r.wallet.clone(),
                    fmt_money(&r.status.limit, &ccy),
                    fmt_money(&r.status.balance, &ccy),
                    fmt_money(&r.status.available, &ccy),
                    format!("{}%", r.status.utilization),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Wallet", "Limit", "Balance", "Available", "Utilization"],
                rows
            )
        );
    }
    Ok(())
}

fn intensity(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = json_flags(sub);
    let settings = Settings::load(conn)?;
    let n = sub.get_one::<usize>("count").copied().unwrap_or(10);
    let txs = load_transactions(conn)?;
    let data = intensity_window(&txs, n, settings.min_intensity);
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows = data
            .iter()
            .map(|i| {
                let width = (i.weight * Decimal::from(20))
                    .round()
                    .to_usize()
                    .unwrap_or(1);
                vec![
                    format!("#{}", i.transaction_id),
                    i.kind.to_string(),
                    fmt_money(&i.amount, &settings.currency),
                    "█".repeat(width),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["ID", "Type", "Amount", ""], rows));
    }
    Ok(())
}

fn today(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = json_flags(sub);
    let txs = load_transactions(conn)?;
    let cmp = today_vs_yesterday(&txs, now().date());
    if !maybe_print_json(json_flag, jsonl_flag, &cmp)? {
        let ccy = Settings::load(conn)?.currency;
        let rows = vec![
            vec![
                "Today".into(),
                fmt_money(&cmp.today.income, &ccy),
                fmt_money(&cmp.today.expense, &ccy),
                fmt_money(&cmp.today.net, &ccy),
            ],
            vec![
                "Yesterday".into(),
                fmt_money(&cmp.yesterday.income, &ccy),
                fmt_money(&cmp.yesterday.expense, &ccy),
                fmt_money(&cmp.yesterday.net, &ccy),
            ],
        ];
        println!(
            "{}",
            pretty_table(&["Day", "Income", "Expense", "Net"], rows)
        );
        if let Some(change) = cmp.expense_change {
            let sign = if change > Decimal::ZERO { "+" } else { "" };
            println!("Spending vs yesterday: {}{}%", sign, change);
        }
    }
    Ok(())
}
