// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{value_parser, Arg, ArgAction, Command};

fn json_flag() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Print JSON instead of a table")
}

fn period_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("period")
            .long("period")
            .default_value("30")
            .help("Days back, 'current-month' or 'ytd'"),
    )
    .arg(
        Arg::new("as-of")
            .long("as-of")
            .help("Reference date YYYY-MM-DD (default: today)"),
    )
    .arg(json_flag())
}

pub fn build_cli() -> Command {
    Command::new("cashbook")
        .about("Personal finance tracker with derived account balances")
        .version(clap::crate_version!())
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .env("CASHBOOK_DB")
                .help("Path to the SQLite database"),
        )
        .arg(
            Arg::new("user")
                .long("user")
                .global(true)
                .env("CASHBOOK_USER")
                .help("Acting user id (default 1)"),
        )
        .arg(
            Arg::new("log")
                .long("log")
                .global(true)
                .env("CASHBOOK_LOG")
                .help("Log filter, e.g. 'info' or 'cashbook=debug'"),
        )
        .subcommand(
            Command::new("init")
                .about("Create the database")
                .arg(
                    Arg::new("currency")
                        .long("currency")
                        .help("Default currency for new accounts"),
                ),
        )
        .subcommand(
            Command::new("user")
                .about("Manage users")
                .subcommand(Command::new("add").arg(Arg::new("name").required(true)))
                .subcommand(Command::new("list")),
        )
        .subcommand(
            Command::new("account")
                .about("Manage accounts")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .required(true)
                                .help("checking|savings|credit"),
                        )
                        .arg(
                            Arg::new("balance")
                                .long("balance")
                                .default_value("0")
                                .allow_hyphen_values(true),
                        )
                        .arg(
                            Arg::new("cleared")
                                .long("cleared")
                                .default_value("0")
                                .allow_hyphen_values(true),
                        )
                        .arg(Arg::new("currency").long("currency")),
                )
                .subcommand(Command::new("list").arg(json_flag()))
                .subcommand(
                    Command::new("show")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(json_flag()),
                )
                .subcommand(
                    Command::new("edit")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("rename").long("rename"))
                        .arg(Arg::new("type").long("type"))
                        .arg(Arg::new("currency").long("currency"))
                        .arg(
                            Arg::new("balance")
                                .long("balance")
                                .allow_hyphen_values(true),
                        )
                        .arg(Arg::new("active").long("active")),
                )
                .subcommand(
                    Command::new("rm").arg(Arg::new("name").long("name").required(true)),
                ),
        )
        .subcommand(
            Command::new("category")
                .about("Manage categories")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("color").long("color"))
                        .arg(Arg::new("icon").long("icon"))
                        .arg(
                            Arg::new("default")
                                .long("default")
                                .action(ArgAction::SetTrue),
                        ),
                )
                .subcommand(Command::new("list").arg(json_flag()))
                .subcommand(
                    Command::new("edit")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("rename").long("rename"))
                        .arg(Arg::new("color").long("color"))
                        .arg(Arg::new("icon").long("icon"))
                        .arg(Arg::new("default").long("default")),
                )
                .subcommand(
                    Command::new("rm").arg(Arg::new("name").long("name").required(true)),
                ),
        )
        .subcommand(
            Command::new("tx")
                .about("Record and edit transactions")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("date").long("date").required(true))
                        .arg(Arg::new("account").long("account").required(true))
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .required(true)
                                .allow_hyphen_values(true),
                        )
                        .arg(Arg::new("description").long("description").required(true))
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .default_value("expense")
                                .help("expense|income|transfer"),
                        )
                        .arg(
                            Arg::new("status")
                                .long("status")
                                .default_value("pending")
                                .help("pending|cleared"),
                        )
                        .arg(
                            Arg::new("recurring")
                                .long("recurring")
                                .help("weekly|monthly|yearly"),
                        )
                        .arg(Arg::new("until").long("until")),
                )
                .subcommand(
                    Command::new("list")
                        .arg(Arg::new("account").long("account"))
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("status").long("status"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        )
                        .arg(json_flag()),
                )
                .subcommand(
                    Command::new("show")
                        .arg(
                            Arg::new("id")
                                .long("id")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(json_flag()),
                )
                .subcommand(
                    Command::new("edit")
                        .arg(
                            Arg::new("id")
                                .long("id")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(Arg::new("date").long("date"))
                        .arg(Arg::new("account").long("account"))
                        .arg(Arg::new("category").long("category"))
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .allow_hyphen_values(true),
                        )
                        .arg(Arg::new("description").long("description"))
                        .arg(Arg::new("type").long("type"))
                        .arg(Arg::new("status").long("status"))
                        .arg(
                            Arg::new("recurring")
                                .long("recurring")
                                .help("weekly|monthly|yearly|none"),
                        )
                        .arg(Arg::new("until").long("until")),
                )
                .subcommand(
                    Command::new("status")
                        .arg(
                            Arg::new("id")
                                .long("id")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(Arg::new("status").long("status").required(true)),
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
            Command::new("report")
                .about("Balances and spending analytics")
                .subcommand(period_args(Command::new("summary")))
                .subcommand(period_args(Command::new("spend-by-category")))
                .subcommand(period_args(Command::new("spend-by-account")))
                .subcommand(period_args(Command::new("cashflow")))
                .subcommand(Command::new("dashboard").arg(json_flag())),
        )
        .subcommand(
            Command::new("maintenance")
                .about("Balance maintenance")
                .subcommand(
                    Command::new("recalculate-balances")
                        .about("Recompute balances of every account from its transactions"),
                )
                .subcommand(
                    Command::new("check").about("List accounts whose stored balances drifted"),
                ),
        )
}
