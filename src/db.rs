// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, anyhow, bail};
use chrono::NaiveDateTime;
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::models::{
    NewTransaction, NewWallet, Transaction, TransactionId, TransactionType, Wallet, WalletId,
    WalletType, within_bounds,
};

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Walletbook", "walletbook"));

pub const DB_ENV: &str = "WALLETBOOK_DB";
pub const DATE_FMT: &str = "%Y-%m-%d %H:%M:%S";

pub fn db_path() -> Result<PathBuf> {
    if let Some(p) = std::env::var_os(DB_ENV).filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(p));
    }
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("walletbook.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    let mut conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&mut conn)?;
    debug!(path = %path.display(), "database ready");
    Ok(conn)
}

pub fn init_schema(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS wallets(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        type TEXT NOT NULL CHECK(type IN ('CASH','BANK','E-WALLET','CREDIT')),
        initial_balance TEXT NOT NULL,
        credit_limit TEXT NOT NULL DEFAULT '0',
        bank_name TEXT,
        account_number TEXT,
        description TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    -- no FOREIGN KEY on wallet_id, see DeletePolicy
    CREATE TABLE IF NOT EXISTS transactions(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        date TEXT NOT NULL,
        type TEXT NOT NULL CHECK(type IN ('INCOME','EXPENSE')),
        amount TEXT NOT NULL,
        category TEXT NOT NULL,
        note TEXT NOT NULL DEFAULT '',
        wallet_id INTEGER,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date);
    CREATE INDEX IF NOT EXISTS idx_transactions_wallet ON transactions(wallet_id);
    "#,
    )?;
    Ok(())
}

fn parse_amount(s: &str, what: &str) -> Result<Decimal> {
    let d = s
        .parse::<Decimal>()
        .with_context(|| format!("Invalid {} '{}' in database", what, s))?;
    if !within_bounds(d) {
        bail!("{} '{}' in database is out of range", what, s);
    }
    Ok(d)
}

fn wallet_from_row(r: &Row<'_>) -> Result<Wallet> {
    let typ: String = r.get(2)?;
    let initial: String = r.get(3)?;
    let limit: String = r.get(4)?;
    Ok(Wallet {
        id: r.get(0)?,
        name: r.get(1)?,
        wallet_type: typ.parse::<WalletType>()?,
        initial_balance: parse_amount(&initial, "initial balance")?,
        credit_limit: parse_amount(&limit, "credit limit")?,
        bank_name: r.get(5)?,
        account_number: r.get(6)?,
        description: r.get(7)?,
    })
}

fn transaction_from_row(r: &Row<'_>) -> Result<Transaction> {
    let date: String = r.get(1)?;
    let typ: String = r.get(2)?;
    let amount: String = r.get(3)?;
    Ok(Transaction {
        id: r.get(0)?,
        date: NaiveDateTime::parse_from_str(&date, DATE_FMT)
            .with_context(|| format!("Invalid transaction date '{}' in database", date))?,
        kind: typ.parse::<TransactionType>()?,
        amount: parse_amount(&amount, "amount")?,
        category: r.get(4)?,
        note: r.get(5)?,
        wallet_id: r.get(6)?,
    })
}

const WALLET_COLS: &str =
    "id, name, type, initial_balance, credit_limit, bank_name, account_number, description";
const TX_COLS: &str = "id, date, type, amount, category, note, wallet_id";

pub fn load_wallets(conn: &Connection) -> Result<Vec<Wallet>> {
    let mut stmt = conn.prepare(&format!("SELECT {} FROM wallets ORDER BY id", WALLET_COLS))?;
    let mut rows = stmt.query([])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        out.push(wallet_from_row(r)?);
    }
    Ok(out)
}

/// Every transaction in insertion order.
pub fn load_transactions(conn: &Connection) -> Result<Vec<Transaction>> {
    let mut stmt = conn.prepare(&format!("SELECT {} FROM transactions ORDER BY id", TX_COLS))?;
    let mut rows = stmt.query([])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        out.push(transaction_from_row(r)?);
    }
    Ok(out)
}

pub fn wallet_by_name(conn: &Connection, name: &str) -> Result<Wallet> {
    let sql = format!("SELECT {} FROM wallets WHERE name=?1", WALLET_COLS);
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(params![name.trim()])?;
    match rows.next()? {
        Some(r) => wallet_from_row(r),
        None => Err(anyhow!("Wallet '{}' not found", name.trim())),
    }
}

pub fn transaction_by_id(conn: &Connection, id: TransactionId) -> Result<Transaction> {
    let sql = format!("SELECT {} FROM transactions WHERE id=?1", TX_COLS);
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(params![id])?;
    match rows.next()? {
        Some(r) => transaction_from_row(r),
        None => Err(anyhow!("Transaction {} not found", id)),
    }
}

pub fn insert_wallet(conn: &Connection, w: &NewWallet) -> Result<Wallet> {
    conn.execute(
        "INSERT INTO wallets(name, type, initial_balance, credit_limit, bank_name, account_number, description)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            w.name,
            w.wallet_type.as_str(),
            w.initial_balance.to_string(),
            w.credit_limit.to_string(),
            w.bank_name,
            w.account_number,
            w.description
        ],
    )
    .with_context(|| format!("Add wallet '{}'", w.name))?;
    let id = conn.last_insert_rowid();
    info!(wallet = %w.name, id, "wallet created");
    Ok(w.clone().with_id(id))
}

/// Display metadata only; balances and type never change here.
#[derive(Debug, Clone, Default)]
pub struct WalletMetadata {
    pub name: Option<String>,
    pub bank_name: Option<String>,
    pub account_number: Option<String>,
    pub description: Option<String>,
}

pub fn update_wallet_metadata(conn: &Connection, id: WalletId, m: &WalletMetadata) -> Result<()> {
    let n = conn.execute(
        "UPDATE wallets SET
            name = COALESCE(?2, name),
            bank_name = COALESCE(?3, bank_name),
            account_number = COALESCE(?4, account_number),
            description = COALESCE(?5, description)
         WHERE id=?1",
        params![id, m.name, m.bank_name, m.account_number, m.description],
    )?;
    if n == 0 {
        bail!("Wallet {} not found", id);
    }
    Ok(())
}

/// Appends a batch inside one SQLite transaction: either every row lands or
/// none does. Returns the stored transactions with their new ids.
pub fn append_transactions(
    conn: &mut Connection,
    batch: &[NewTransaction],
) -> Result<Vec<Transaction>> {
    let tx = conn.transaction()?;
    let mut out = Vec::with_capacity(batch.len());
    {
        let mut stmt = tx.prepare(
            "INSERT INTO transactions(date, type, amount, category, note, wallet_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )?;
        for t in batch {
            stmt.execute(params![
                t.date.format(DATE_FMT).to_string(),
                t.kind.as_str(),
                t.amount.to_string(),
                t.category,
                t.note,
                t.wallet_id
            ])?;
            out.push(t.clone().with_id(tx.last_insert_rowid()));
        }
    }
    tx.commit()?;
    info!(count = out.len(), "appended transactions");
    Ok(out)
}

/// Overwrites every field of an existing transaction, keeping its id.
pub fn replace_transaction(conn: &Connection, t: &Transaction) -> Result<()> {
    let n = conn.execute(
        "UPDATE transactions SET date=?2, type=?3, amount=?4, category=?5, note=?6, wallet_id=?7
         WHERE id=?1",
        params![
            t.id,
            t.date.format(DATE_FMT).to_string(),
            t.kind.as_str(),
            t.amount.to_string(),
            t.category,
            t.note,
            t.wallet_id
        ],
    )?;
    if n == 0 {
        bail!("Transaction {} not found", t.id);
    }
    info!(id = t.id, "transaction replaced");
    Ok(())
}

pub fn delete_transaction(conn: &Connection, id: TransactionId) -> Result<()> {
    let n = conn.execute("DELETE FROM transactions WHERE id=?1", params![id])?;
    if n == 0 {
        bail!("Transaction {} not found", id);
    }
    info!(id, "transaction deleted");
    Ok(())
}

/// What happens to transactions that still reference a wallet being deleted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeletePolicy {
    /// Refuse while any transaction references the wallet.
    #[default]
    Block,
    /// Delete those transactions too.
    Cascade,
    /// Keep them as unassigned transactions.
    Orphan,
}

/// Deletes a wallet and returns how many referencing transactions were
/// affected under `policy`.
pub fn delete_wallet(conn: &mut Connection, id: WalletId, policy: DeletePolicy) -> Result<usize> {
    let tx = conn.transaction()?;
    let referencing: i64 = tx.query_row(
        "SELECT COUNT(*) FROM transactions WHERE wallet_id=?1",
        params![id],
        |r| r.get(0),
    )?;
    let affected = match policy {
        DeletePolicy::Block if referencing > 0 => bail!(
            "Wallet {} still has {} transaction(s); use --cascade or --orphan",
            id,
            referencing
        ),
        DeletePolicy::Block => 0,
        DeletePolicy::Cascade => {
            tx.execute("DELETE FROM transactions WHERE wallet_id=?1", params![id])?
        }
        DeletePolicy::Orphan => tx.execute(
            "UPDATE transactions SET wallet_id=NULL WHERE wallet_id=?1",
            params![id],
        )?,
    };
    let n = tx.execute("DELETE FROM wallets WHERE id=?1", params![id])?;
    if n == 0 {
        bail!("Wallet {} not found", id);
    }
    tx.commit()?;
    info!(id, ?policy, affected, "wallet deleted");
    Ok(affected)
}

/// Transactions whose wallet id points at no wallet.
pub fn orphaned_transactions(conn: &Connection) -> Result<Vec<Transaction>> {
    let sql = format!(
        "SELECT {} FROM transactions WHERE wallet_id IS NOT NULL
         AND wallet_id NOT IN (SELECT id FROM wallets) ORDER BY id",
        TX_COLS
    );
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query([])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        out.push(transaction_from_row(r)?);
    }
    Ok(out)
}

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    Ok(conn
        .query_row(
            "SELECT value FROM settings WHERE key=?1",
            params![key],
            |r| r.get(0),
        )
        .optional()?)
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}

pub fn list_settings(conn: &Connection) -> Result<Vec<(String, String)>> {
    let mut stmt = conn.prepare("SELECT key, value FROM settings ORDER BY key")?;
    let rows = stmt.query_map([], |r| Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?)))?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}
