// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Settings;
use crate::db::{
    append_transactions, delete_transaction, load_transactions, load_wallets, replace_transaction,
    transaction_by_id, wallet_by_name,
};
use crate::engine::{SortOrder, TransactionFilter, filter, group_by_day, sort};
use crate::models::{Category, NewTransaction, Transaction, TransactionType, Wallet};
use crate::utils::{
    fmt_money, maybe_print_json, now, parse_date, parse_datetime, parse_decimal, pretty_table,
    required_arg,
};
use anyhow::{Result, anyhow};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::warn;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("by-day", sub)) => by_day(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let kind = required_arg(sub, "type")?.parse::<TransactionType>()?;
    let amount = parse_decimal(required_arg(sub, "amount")?)?;
    let category = required_arg(sub, "category")?;
    let date = match sub.get_one::<String>("date") {
        Some(s) => parse_datetime(s)?,
        None => now(),
    };
    if Category::is_engine_generated(category) {
        warn!(category, "recording an engine category by hand");
    }

    let mut draft = NewTransaction::new(kind, amount, category, date)?;
    if let Some(note) = sub.get_one::<String>("note") {
        draft = draft.with_note(note.trim());
    }
    let wallet_name = match sub.get_one::<String>("wallet") {
        Some(name) => {
            let w = wallet_by_name(conn, name)?;
            draft = draft.in_wallet(w.id);
            w.name
        }
        None => "unassigned".to_string(),
    };

    let stored = append_transactions(conn, &[draft])?;
    let t = stored
        .first()
        .ok_or_else(|| anyhow!("Transaction was not stored"))?;
    println!(
        "Recorded #{} {} {} ({}) on {} [{}]",
        t.id, t.kind, t.amount, t.category, t.date, wallet_name
    );
    Ok(())
}

/// Builds the engine filter and sort order from the shared filter flags.
pub fn filter_from_args(
    conn: &Connection,
    sub: &clap::ArgMatches,
) -> Result<(TransactionFilter, SortOrder, Option<usize>)> {
    let wallet_id = match sub.get_one::<String>("wallet") {
        Some(name) => Some(wallet_by_name(conn, name)?.id),
        None => None,
    };
    let kind = match sub.get_one::<String>("type") {
        Some(s) => Some(s.parse::<TransactionType>()?),
        None => None,
    };
    let from = match sub.get_one::<String>("from") {
        Some(s) => Some(parse_date(s)?),
        None => None,
    };
    let to = match sub.get_one::<String>("to") {
        Some(s) => Some(parse_date(s)?),
        None => None,
    };
    let order = match sub.get_one::<String>("sort") {
        Some(s) => s.parse::<SortOrder>()?,
        None => SortOrder::default(),
    };
    let f = TransactionFilter {
        text: sub.get_one::<String>("search").cloned(),
        kind,
        category: sub.get_one::<String>("category").map(|s| s.trim().to_string()),
        from,
        to,
        wallet_id,
        exclude_transfers: sub.get_flag("exclude_transfers"),
    };
    Ok((f, order, sub.get_one::<usize>("limit").copied()))
}

/// Filtered and sorted view over every stored transaction.
pub fn select<'a>(
    transactions: &'a [Transaction],
    f: &TransactionFilter,
    order: SortOrder,
    limit: Option<usize>,
) -> Vec<&'a Transaction> {
    let mut view = filter(transactions, f);
    sort(&mut view, order);
    if let Some(n) = limit {
        view.truncate(n);
    }
    view
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: i64,
    pub date: String,
    pub wallet: String,
    pub r#type: String,
    pub category: String,
    pub amount: Decimal,
    pub note: String,
}

fn wallet_label(wallets: &[Wallet], t: &Transaction) -> String {
    match t.wallet_id {
        None => String::new(),
        Some(id) => wallets
            .iter()
            .find(|w| w.id == id)
            .map(|w| w.name.clone())
            .unwrap_or_else(|| format!("#{} (missing)", id)),
    }
}

fn to_row(wallets: &[Wallet], t: &Transaction) -> TransactionRow {
    TransactionRow {
        id: t.id,
        date: t.date.format("%Y-%m-%d %H:%M").to_string(),
        wallet: wallet_label(wallets, t),
        r#type: t.kind.to_string(),
        category: t.category.clone(),
        amount: t.amount,
        note: t.note.clone(),
    }
}

pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let (f, order, limit) = filter_from_args(conn, sub)?;
    let wallets = load_wallets(conn)?;
    let txs = load_transactions(conn)?;
    Ok(select(&txs, &f, order, limit)
        .into_iter()
        .map(|t| to_row(&wallets, t))
        .collect())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let ccy = Settings::load(conn)?.currency;
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.date.clone(),
                    r.wallet.clone(),
                    r.r#type.clone(),
                    r.category.clone(),
                    fmt_money(&r.amount, &ccy),
                    r.note.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Date", "Wallet", "Type", "Category", "Amount", "Note"],
                rows,
            )
        );
    }
    Ok(())
}

#[derive(Serialize)]
struct DayRow {
    day: String,
    income: Decimal,
    expense: Decimal,
    net: Decimal,
    transactions: Vec<TransactionRow>,
}

fn by_day(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let (f, order, limit) = filter_from_args(conn, sub)?;
    let wallets = load_wallets(conn)?;
    let txs = load_transactions(conn)?;
    let view = select(&txs, &f, order, limit);
    let groups = group_by_day(view);

    let data: Vec<DayRow> = groups
        .iter()
        .map(|g| DayRow {
            day: g.day.to_string(),
            income: g.income,
            expense: g.expense,
            net: g.net,
            transactions: g.transactions.iter().map(|t| to_row(&wallets, t)).collect(),
        })
        .collect();
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        return Ok(());
    }
    let ccy = Settings::load(conn)?.currency;
    for d in &data {
        println!("{}  net {}", d.day, fmt_money(&d.net, &ccy));
        let rows = d
            .transactions
            .iter()
            .map(|r| {
                vec![
                    r.date.clone(),
                    r.wallet.clone(),
                    r.r#type.clone(),
                    r.category.clone(),
                    fmt_money(&r.amount, &ccy),
                    r.note.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Time", "Wallet", "Type", "Category", "Amount", "Note"], rows)
        );
    }
    Ok(())
}

fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub
        .get_one::<i64>("id")
        .ok_or_else(|| anyhow!("Missing required argument 'id'"))?;
    let current = transaction_by_id(conn, id)?;

    let mut draft = NewTransaction::from(current);
    if let Some(s) = sub.get_one::<String>("type") {
        draft.kind = s.parse::<TransactionType>()?;
    }
    if let Some(s) = sub.get_one::<String>("amount") {
        draft.amount = parse_decimal(s)?;
    }
    if let Some(s) = sub.get_one::<String>("category") {
        draft.category = s.trim().to_string();
    }
    if let Some(s) = sub.get_one::<String>("note") {
        draft.note = s.trim().to_string();
    }
    if let Some(s) = sub.get_one::<String>("date") {
        draft.date = parse_datetime(s)?;
    }
    if let Some(name) = sub.get_one::<String>("wallet") {
        draft.wallet_id = Some(wallet_by_name(conn, name)?.id);
    }
    if sub.get_flag("unassign") {
        draft.wallet_id = None;
    }

    draft.validate()?;
    replace_transaction(conn, &draft.with_id(id))?;
    println!("Updated transaction #{}", id);
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub
        .get_one::<i64>("id")
        .ok_or_else(|| anyhow!("Missing required argument 'id'"))?;
    let t = transaction_by_id(conn, id)?;
    if Category::is_engine_generated(&t.category) && t.category != Category::ADJUSTMENT {
        warn!(id, "removing one leg of a transfer; the other legs stay");
    }
    delete_transaction(conn, id)?;
    println!("Removed transaction #{}", id);
    Ok(())
}
