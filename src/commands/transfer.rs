// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Settings;
use crate::db::{append_transactions, load_transactions, load_wallets, wallet_by_name};
use crate::engine::{TransferRequest, balance_of, transfer};
use crate::utils::{fmt_money, now, parse_datetime, parse_decimal, required_arg};
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;

pub fn handle(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let from = wallet_by_name(conn, required_arg(sub, "from")?)?;
    let to = wallet_by_name(conn, required_arg(sub, "to")?)?;
    let amount = parse_decimal(required_arg(sub, "amount")?)?;
    let fee = match sub.get_one::<String>("fee") {
        Some(s) => parse_decimal(s)?,
        None => Decimal::ZERO,
    };
    let at = match sub.get_one::<String>("date") {
        Some(s) => parse_datetime(s)?,
        None => now(),
    };
    let mut req = TransferRequest::new(from.id, to.id, amount, at).with_fee(fee);
    if let Some(note) = sub.get_one::<String>("note") {
        req = req.with_note(note.trim());
    }

    let wallets = load_wallets(conn)?;
    let mut txs = load_transactions(conn)?;
    let legs = transfer(&wallets, &txs, &req)?;
    let stored = append_transactions(conn, &legs)?;
    txs.extend(stored);

    let ccy = Settings::load(conn)?.currency;
    println!(
        "Transferred {} from '{}' to '{}'{}",
        fmt_money(&amount, &ccy),
        from.name,
        to.name,
        if fee > Decimal::ZERO {
            format!(" (fee {})", fmt_money(&fee, &ccy))
        } else {
            String::new()
        }
    );
    println!(
        "  {}: {}   {}: {}",
        from.name,
        fmt_money(&balance_of(&from, &txs), &ccy),
        to.name,
        fmt_money(&balance_of(&to, &txs), &ccy)
    );
    Ok(())
}
