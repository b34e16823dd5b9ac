// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::builder::RangedU64ValueParser;
use clap::{Arg, ArgAction, Command, value_parser};

use crate::config::MAX_PERIODS;

fn period_count() -> RangedU64ValueParser<usize> {
    RangedU64ValueParser::<usize>::new().range(1..=MAX_PERIODS as u64)
}

fn json_args() -> [Arg; 2] {
    [
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print JSON"),
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print JSON lines"),
    ]
}

fn filter_args() -> Vec<Arg> {
    vec![
        Arg::new("search")
            .long("search")
            .short('q')
            .help("Match note text (case-insensitive) or amount digits"),
        Arg::new("type")
            .long("type")
            .help("INCOME or EXPENSE"),
        Arg::new("category").long("category"),
        Arg::new("wallet").long("wallet").help("Wallet name"),
        Arg::new("from").long("from").help("First day, YYYY-MM-DD"),
        Arg::new("to").long("to").help("Last day, YYYY-MM-DD"),
        Arg::new("exclude_transfers")
            .long("exclude-transfers")
            .action(ArgAction::SetTrue)
            .help("Skip transfer legs between wallets"),
        Arg::new("sort")
            .long("sort")
            .default_value("date-desc")
            .help("date-desc | date-asc | amount-desc | amount-asc"),
        Arg::new("limit")
            .long("limit")
            .value_parser(value_parser!(usize)),
    ]
}

pub fn build_cli() -> Command {
    Command::new("walletbook")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Wallet ledger with derived balances, transfers and cash-flow reports")
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(
            Command::new("wallet")
                .about("Manage wallets")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .required(true)
                                .help("CASH | BANK | E-WALLET | CREDIT"),
                        )
                        .arg(
                            Arg::new("initial")
                                .long("initial")
                                .default_value("0")
                                .allow_hyphen_values(true)
                                .help("Balance when tracking starts"),
                        )
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .help("Credit limit (CREDIT wallets only)"),
                        )
                        .arg(Arg::new("bank").long("bank"))
                        .arg(Arg::new("account_number").long("account-number"))
                        .arg(Arg::new("description").long("description")),
                )
                .subcommand(Command::new("list").args(json_args()))
                .subcommand(
                    Command::new("show")
                        .arg(Arg::new("name").long("name").required(true))
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("edit")
                        .about("Change display metadata")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("rename").long("rename"))
                        .arg(Arg::new("bank").long("bank"))
                        .arg(Arg::new("account_number").long("account-number"))
                        .arg(Arg::new("description").long("description")),
                )
                .subcommand(
                    Command::new("rm")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(
                            Arg::new("cascade")
                                .long("cascade")
                                .action(ArgAction::SetTrue)
                                .help("Also delete the wallet's transactions"),
                        )
                        .arg(
                            Arg::new("orphan")
                                .long("orphan")
                                .action(ArgAction::SetTrue)
                                .conflicts_with("cascade")
                                .help("Keep the wallet's transactions as unassigned"),
                        ),
                ),
        )
        .subcommand(
            Command::new("tx")
                .about("Record and list transactions")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("type").long("type").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(Arg::new("wallet").long("wallet"))
                        .arg(Arg::new("note").long("note"))
                        .arg(
                            Arg::new("date")
                                .long("date")
                                .help("YYYY-MM-DD or YYYY-MM-DD HH:MM[:SS]; defaults to now"),
                        ),
                )
                .subcommand(Command::new("list").args(filter_args()).args(json_args()))
                .subcommand(
                    Command::new("by-day")
                        .about("Transactions grouped by day with daily net")
                        .args(filter_args())
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("edit")
                        .arg(
                            Arg::new("id")
                                .long("id")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(Arg::new("type").long("type"))
                        .arg(Arg::new("amount").long("amount"))
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("wallet").long("wallet"))
                        .arg(
                            Arg::new("unassign")
                                .long("unassign")
                                .action(ArgAction::SetTrue)
                                .conflicts_with("wallet"),
                        )
                        .arg(Arg::new("note").long("note"))
                        .arg(Arg::new("date").long("date")),
                )
                .subcommand(
                    Command::new("rm").arg(
                        Arg::new("id")
                            .long("id")
                            .required(true)
                            .value_parser(value_parser!(i64)),
                    ),
                ),
        )
        .subcommand(
            Command::new("transfer")
                .about("Move money between two wallets")
                .arg(Arg::new("from").long("from").required(true))
                .arg(Arg::new("to").long("to").required(true))
                .arg(Arg::new("amount").long("amount").required(true))
                .arg(Arg::new("fee").long("fee").default_value("0"))
                .arg(Arg::new("note").long("note"))
                .arg(Arg::new("date").long("date")),
        )
        .subcommand(
            Command::new("reconcile")
                .about("Adjust a wallet so its balance matches the actual amount")
                .arg(Arg::new("wallet").long("wallet").required(true))
                .arg(
                    Arg::new("actual")
                        .long("actual")
                        .required(true)
                        .allow_hyphen_values(true),
                ),
        )
        .subcommand(
            Command::new("report")
                .about("Balances and rollups")
                .subcommand(Command::new("balances").args(json_args()))
                .subcommand(
                    Command::new("cashflow")
                        .about("Monthly income and expense")
                        .arg(
                            Arg::new("months")
                                .long("months")
                                .value_parser(period_count()),
                        )
                        .arg(Arg::new("wallet").long("wallet"))
                        .arg(
                            Arg::new("exclude_transfers")
                                .long("exclude-transfers")
                                .action(ArgAction::SetTrue),
                        )
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("daily")
                        .about("Daily income and expense")
                        .arg(
                            Arg::new("days")
                                .long("days")
                                .default_value("7")
                                .value_parser(period_count()),
                        )
                        .arg(Arg::new("wallet").long("wallet"))
                        .arg(
                            Arg::new("exclude_transfers")
                                .long("exclude-transfers")
                                .action(ArgAction::SetTrue),
                        )
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("categories")
                        .about("Totals per category")
                        .arg(Arg::new("type").long("type").default_value("EXPENSE"))
                        .arg(Arg::new("from").long("from"))
                        .arg(Arg::new("to").long("to"))
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("business")
                        .about("Revenue, cost, profit and margin")
                        .arg(Arg::new("from").long("from"))
                        .arg(Arg::new("to").long("to"))
                        .args(json_args()),
                )
                .subcommand(Command::new("credit").about("Credit wallet utilization").args(json_args()))
                .subcommand(
                    Command::new("intensity")
                        .about("Recent transactions scaled against the largest")
                        .arg(
                            Arg::new("count")
                                .long("count")
                                .default_value("10")
                                .value_parser(value_parser!(usize)),
                        )
                        .args(json_args()),
                )
                .subcommand(Command::new("today").about("Today against yesterday").args(json_args())),
        )
        .subcommand(
            Command::new("export")
                .about("Export data")
                .subcommand(
                    Command::new("transactions")
                        .arg(Arg::new("format").long("format").default_value("csv"))
                        .arg(Arg::new("out").long("out").required(true))
                        .args(filter_args()),
                ),
        )
        .subcommand(
            Command::new("config")
                .about("Read and change settings")
                .subcommand(Command::new("get").arg(Arg::new("key").required(true)))
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("key").required(true))
                        .arg(Arg::new("value").required(true)),
                )
                .subcommand(Command::new("list").args(json_args())),
        )
        .subcommand(Command::new("doctor").about("Check the data for integrity problems"))
}
