// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::db::{get_setting, set_setting};
use crate::engine::default_min_intensity;
use crate::utils::parse_decimal;

pub const KEY_CURRENCY: &str = "currency";
pub const KEY_CASHFLOW_MONTHS: &str = "cashflow_months";
pub const KEY_MIN_INTENSITY: &str = "min_intensity";

/// Upper bound on report periods: ten years of daily buckets.
pub const MAX_PERIODS: usize = 3660;

pub const KNOWN_KEYS: [&str; 3] = [KEY_CURRENCY, KEY_CASHFLOW_MONTHS, KEY_MIN_INTENSITY];

/// User preferences kept in the `settings` table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settings {
    /// Display code only; amounts are never converted.
    pub currency: String,
    pub cashflow_months: usize,
    pub min_intensity: Decimal,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            currency: "VND".to_string(),
            cashflow_months: 6,
            min_intensity: default_min_intensity(),
        }
    }
}

impl Settings {
    /// Missing keys fall back to defaults; malformed stored values are errors.
    pub fn load(conn: &Connection) -> Result<Self> {
        let mut s = Settings::default();
        if let Some(v) = get_setting(conn, KEY_CURRENCY)? {
            s.currency = v;
        }
        if let Some(v) = get_setting(conn, KEY_CASHFLOW_MONTHS)? {
            s.cashflow_months = parse_months(&v)?;
        }
        if let Some(v) = get_setting(conn, KEY_MIN_INTENSITY)? {
            s.min_intensity = parse_weight(&v)?;
        }
        Ok(s)
    }
}

fn parse_months(v: &str) -> Result<usize> {
    match v.trim().parse::<usize>() {
        Ok(n) if (1..=MAX_PERIODS).contains(&n) => Ok(n),
        _ => bail!(
            "Invalid {} '{}', expected an integer from 1 to {}",
            KEY_CASHFLOW_MONTHS,
            v,
            MAX_PERIODS
        ),
    }
}

fn parse_weight(v: &str) -> Result<Decimal> {
    let d = parse_decimal(v)?;
    if d < Decimal::ZERO || d > Decimal::ONE {
        bail!("Invalid {} '{}', expected a value between 0 and 1", KEY_MIN_INTENSITY, v);
    }
    Ok(d)
}

/// Validates and stores one setting, returning the normalized value.
pub fn set(conn: &Connection, key: &str, value: &str) -> Result<String> {
    let key = key.trim();
    let normalized = match key {
        KEY_CURRENCY => {
            let c = value.trim().to_uppercase();
            if c.is_empty() {
                bail!("Currency code must not be empty");
            }
            c
        }
        KEY_CASHFLOW_MONTHS => parse_months(value)?.to_string(),
        KEY_MIN_INTENSITY => parse_weight(value)?.to_string(),
        other => bail!("Unknown setting '{}' (known: {})", other, KNOWN_KEYS.join(", ")),
    };
    set_setting(conn, key, &normalized)?;
    Ok(normalized)
}
