// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::transactions::{filter_from_args, select};
use crate::db::{load_transactions, load_wallets};
use crate::models::{Transaction, Wallet};
use crate::utils::required_arg;
use anyhow::{Result, bail};
use csv::{QuoteStyle, WriterBuilder};
use rusqlite::Connection;
use serde_json::json;
use std::fs::File;
use std::io::{BufWriter, Write};

const BOM: &[u8] = "\u{feff}".as_bytes();

pub const CSV_HEADER: [&str; 5] = ["Ngày", "Loại", "Danh mục", "Số tiền", "Ghi chú"];

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(conn, sub),
        _ => Ok(()),
    }
}

/// UTF-8 with BOM so spreadsheet tools pick the right encoding. Columns are
/// date, type label, category, amount, note; text cells are always quoted.
pub fn write_csv<'a, W: Write>(
    mut w: W,
    transactions: impl IntoIterator<Item = &'a Transaction>,
) -> Result<()> {
    w.write_all(BOM)?;
    let mut wtr = WriterBuilder::new()
        .quote_style(QuoteStyle::NonNumeric)
        .from_writer(w);
    wtr.write_record(CSV_HEADER)?;
    for t in transactions {
        wtr.write_record([
            t.date.format("%Y-%m-%d %H:%M:%S").to_string(),
            t.kind.label().to_string(),
            t.category.clone(),
            t.amount.to_string(),
            t.note.clone(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<'a, W: Write>(
    mut w: W,
    wallets: &[Wallet],
    transactions: impl IntoIterator<Item = &'a Transaction>,
) -> Result<()> {
    let items: Vec<_> = transactions
        .into_iter()
        .map(|t| {
            let wallet = t
                .wallet_id
                .and_then(|id| wallets.iter().find(|w| w.id == id))
                .map(|w| w.name.as_str());
            json!({
                "id": t.id,
                "date": t.date.format("%Y-%m-%d %H:%M:%S").to_string(),
                "type": t.kind.as_str(),
                "category": t.category,
                "amount": t.amount.to_string(),
                "note": t.note,
                "wallet": wallet,
            })
        })
        .collect();
    serde_json::to_writer_pretty(&mut w, &items)?;
    w.flush()?;
    Ok(())
}

fn export_transactions(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = required_arg(sub, "format")?.to_lowercase();
    let out = required_arg(sub, "out")?;
    if fmt != "csv" && fmt != "json" {
        bail!("Unknown format: {} (use csv|json)", fmt);
    }

    let (f, order, limit) = filter_from_args(conn, sub)?;
    let wallets = load_wallets(conn)?;
    let txs = load_transactions(conn)?;
    let view = select(&txs, &f, order, limit);

    let file = BufWriter::new(File::create(out)?);
    match fmt.as_str() {
        "csv" => write_csv(file, view.iter().copied())?,
        _ => write_json(file, &wallets, view.iter().copied())?,
    }
    println!("Exported {} transaction(s) to {}", view.len(), out);
    Ok(())
}
