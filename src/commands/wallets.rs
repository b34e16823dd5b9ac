// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Settings;
use crate::db::{
    DeletePolicy, WalletMetadata, delete_wallet, insert_wallet, load_transactions, load_wallets,
    update_wallet_metadata, wallet_by_name,
};
use crate::engine::{balance_of, credit_status};
use crate::models::{NewWallet, WalletType};
use crate::utils::{fmt_money, maybe_print_json, parse_decimal, pretty_table, required_arg};
use anyhow::{Result, bail};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("show", sub)) => show(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn opt_trimmed(sub: &clap::ArgMatches, id: &str) -> Option<String> {
    sub.get_one::<String>(id)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = required_arg(sub, "name")?;
    let typ = required_arg(sub, "type")?.parse::<WalletType>()?;
    let initial = match sub.get_one::<String>("initial") {
        Some(s) => parse_decimal(s)?,
        None => Decimal::ZERO,
    };
    let limit = match sub.get_one::<String>("limit") {
        Some(s) => Some(parse_decimal(s)?),
        None => None,
    };
    if limit.is_some() && typ != WalletType::Credit {
        bail!("--limit only applies to CREDIT wallets");
    }

    let mut w = NewWallet::new(name, typ, initial)?;
    if let Some(l) = limit {
        w = w.with_credit_limit(l)?;
    }
    w.bank_name = opt_trimmed(sub, "bank");
    w.account_number = opt_trimmed(sub, "account_number");
    w.description = opt_trimmed(sub, "description");

    let wallet = insert_wallet(conn, &w)?;
    println!(
        "Added wallet '{}' ({}, starting at {})",
        wallet.name, wallet.wallet_type, wallet.initial_balance
    );
    Ok(())
}

#[derive(Serialize)]
pub struct WalletRow {
    pub id: i64,
    pub name: String,
    pub r#type: String,
    pub balance: Decimal,
    pub credit_limit: Option<Decimal>,
    pub available: Option<Decimal>,
    pub bank_name: Option<String>,
}

pub fn wallet_rows(conn: &Connection) -> Result<Vec<WalletRow>> {
    let wallets = load_wallets(conn)?;
    let txs = load_transactions(conn)?;
    Ok(wallets
        .iter()
        .map(|w| {
            let credit = credit_status(w, &txs);
            WalletRow {
                id: w.id,
                name: w.name.clone(),
                r#type: w.wallet_type.to_string(),
                balance: balance_of(w, &txs),
                credit_limit: credit.as_ref().map(|c| c.limit),
                available: credit.map(|c| c.available),
                bank_name: w.bank_name.clone(),
            }
        })
        .collect())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let data = wallet_rows(conn)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let ccy = Settings::load(conn)?.currency;
        let rows = data
            .iter()
            .map(|r| {
                vec![
                    r.name.clone(),
                    r.r#type.clone(),
                    fmt_money(&r.balance, &ccy),
                    r.available
                        .map(|a| fmt_money(&a, &ccy))
                        .unwrap_or_default(),
                    r.bank_name.clone().unwrap_or_default(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Name", "Type", "Balance", "Available credit", "Bank"], rows)
        );
    }
    Ok(())
}

fn show(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = required_arg(sub, "name")?;
    let w = wallet_by_name(conn, name)?;
    let txs = load_transactions(conn)?;
    let balance = balance_of(&w, &txs);
    let credit = credit_status(&w, &txs);

    #[derive(Serialize)]
    struct Detail<'a> {
        wallet: &'a crate::models::Wallet,
        balance: Decimal,
        credit: Option<crate::engine::CreditStatus>,
    }
    let detail = Detail {
        wallet: &w,
        balance,
        credit,
    };
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &detail)? {
        return Ok(());
    }
    let ccy = Settings::load(conn)?.currency;
    let mut rows = vec![
        vec!["Name".into(), w.name.clone()],
        vec!["Type".into(), w.wallet_type.to_string()],
        vec!["Initial balance".into(), fmt_money(&w.initial_balance, &ccy)],
        vec!["Balance".into(), fmt_money(&balance, &ccy)],
    ];
    if let Some(c) = &detail.credit {
        rows.push(vec!["Credit limit".into(), fmt_money(&c.limit, &ccy)]);
        rows.push(vec!["Available".into(), fmt_money(&c.available, &ccy)]);
        rows.push(vec!["Utilization".into(), format!("{}%", c.utilization)]);
    }
    for (label, v) in [
        ("Bank", &w.bank_name),
        ("Account number", &w.account_number),
        ("Description", &w.description),
    ] {
        if let Some(v) = v {
            rows.push(vec![label.into(), v.clone()]);
        }
    }
    println!("{}", pretty_table(&["Field", "Value"], rows));
    Ok(())
}

fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = required_arg(sub, "name")?;
    let w = wallet_by_name(conn, name)?;
    let meta = WalletMetadata {
        name: opt_trimmed(sub, "rename"),
        bank_name: opt_trimmed(sub, "bank"),
        account_number: opt_trimmed(sub, "account_number"),
        description: opt_trimmed(sub, "description"),
    };
    update_wallet_metadata(conn, w.id, &meta)?;
    println!("Updated wallet '{}'", meta.name.as_deref().unwrap_or(&w.name));
    Ok(())
}

fn rm(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = required_arg(sub, "name")?;
    let w = wallet_by_name(conn, name)?;
    let policy = if sub.get_flag("cascade") {
        DeletePolicy::Cascade
    } else if sub.get_flag("orphan") {
        DeletePolicy::Orphan
    } else {
        DeletePolicy::Block
    };
    let affected = delete_wallet(conn, w.id, policy)?;
    match policy {
        DeletePolicy::Cascade if affected > 0 => println!(
            "Removed wallet '{}' and {} transaction(s)",
            w.name, affected
        ),
        DeletePolicy::Orphan if affected > 0 => println!(
            "Removed wallet '{}'; {} transaction(s) are now unassigned",
            w.name, affected
        ),
        _ => println!("Removed wallet '{}'", w.name),
    }
    Ok(())
}
