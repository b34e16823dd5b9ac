// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::{self, KNOWN_KEYS, Settings};
use crate::utils::{maybe_print_json, pretty_table, required_arg};
use anyhow::{Result, bail};
use rusqlite::Connection;
use serde_json::Value;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("get", sub)) => {
            let key = required_arg(sub, "key")?;
            if !KNOWN_KEYS.contains(&key) {
                bail!("Unknown setting '{}' (known: {})", key, KNOWN_KEYS.join(", "));
            }
            let all = serde_json::to_value(Settings::load(conn)?)?;
            match all.get(key) {
                Some(Value::String(s)) => println!("{}", s),
                Some(v) => println!("{}", v),
                None => bail!("Setting '{}' has no value", key),
            }
        }
        Some(("set", sub)) => {
            let key = required_arg(sub, "key")?;
            let value = required_arg(sub, "value")?;
            let stored = config::set(conn, key, value)?;
            println!("{} = {}", key, stored);
        }
        Some(("list", sub)) => {
            let s = Settings::load(conn)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &s)? {
                let rows = vec![
                    vec![config::KEY_CURRENCY.to_string(), s.currency.clone()],
                    vec![
                        config::KEY_CASHFLOW_MONTHS.to_string(),
                        s.cashflow_months.to_string(),
                    ],
                    vec![
                        config::KEY_MIN_INTENSITY.to_string(),
                        s.min_intensity.to_string(),
                    ],
                ];
                println!("{}", pretty_table(&["Key", "Value"], rows));
            }
        }
        _ => {}
    }
    Ok(())
}
