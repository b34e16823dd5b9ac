// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Settings;
use crate::db::{append_transactions, load_transactions, load_wallets, wallet_by_name};
use crate::engine::reconcile;
use crate::utils::{fmt_money, now, parse_decimal, required_arg};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let wallet = wallet_by_name(conn, required_arg(sub, "wallet")?)?;
    let actual = parse_decimal(required_arg(sub, "actual")?)?;
    let wallets = load_wallets(conn)?;
    let txs = load_transactions(conn)?;
    let ccy = Settings::load(conn)?.currency;

    match reconcile(&wallets, &txs, wallet.id, actual, now())? {
        None => println!(
            "'{}' already at {}; nothing to adjust",
            wallet.name,
            fmt_money(&actual, &ccy)
        ),
        Some(adj) => {
            let stored = append_transactions(conn, std::slice::from_ref(&adj))?;
            let id = stored.first().map(|t| t.id).unwrap_or_default();
            println!(
                "Adjusted '{}' by {} {} (#{}); balance is now {}",
                wallet.name,
                adj.kind,
                fmt_money(&adj.amount, &ccy),
                id,
                fmt_money(&actual, &ccy)
            );
        }
    }
    Ok(())
}
