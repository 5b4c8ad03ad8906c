// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

fn period_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("month")
            .long("month")
            .help("Month filter: 1-12, YYYY-MM or 'all'"),
    )
    .arg(Arg::new("year").long("year").help("Year filter or 'all'"))
}

pub fn build_cli() -> Command {
    Command::new("bareminimum")
        .about("BareMinimum: expense profiles, UPI alerts, investments and cloud sync")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("profile")
                .long("profile")
                .short('p')
                .global(true)
                .help("Use this local profile instead of the signed-in user's records"),
        )
        .subcommand(Command::new("init").about("Create the local store"))
        .subcommand(
            Command::new("profile")
                .about("Local profiles")
                .subcommand(Command::new("new").arg(Arg::new("name").required(true)))
                .subcommand(Command::new("list"))
                .subcommand(Command::new("use").arg(Arg::new("name").required(true)))
                .subcommand(
                    Command::new("rm")
                        .arg(Arg::new("name").required(true))
                        .arg(
                            Arg::new("yes")
                                .long("yes")
                                .action(ArgAction::SetTrue)
                                .help("Confirm deleting the profile and all its data"),
                        ),
                ),
        )
        .subcommand(
            Command::new("expense")
                .visible_alias("tx")
                .about("Record and manage expenses")
                .subcommand(
                    Command::new("add")
                        .allow_negative_numbers(true)
                        .arg(Arg::new("amount").required(true).help("Amount in ₹"))
                        .arg(
                            Arg::new("mode")
                                .long("mode")
                                .short('m')
                                .help("UPI|Cash|Card|Netbanking (default UPI)"),
                        )
                        .arg(Arg::new("merchant").long("merchant"))
                        .arg(Arg::new("category").long("category").short('c'))
                        .arg(Arg::new("note").long("note")),
                )
                .subcommand(json_flags(period_args(
                    Command::new("list")
                        .arg(
                            Arg::new("sort")
                                .long("sort")
                                .default_value("newest")
                                .help("newest|oldest"),
                        )
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                )))
                .subcommand(Command::new("rm").arg(Arg::new("id").required(true)))
                .subcommand(
                    Command::new("mode")
                        .arg(Arg::new("id").required(true))
                        .arg(Arg::new("mode").required(true)),
                )
                .subcommand(Command::new("cash").arg(Arg::new("id").required(true)))
                .subcommand(Command::new("undo").about("Remove the most recently added expense"))
                .subcommand(json_flags(
                    Command::new("merchants")
                        .about("Merchants seen so far, most recent first")
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                )),
        )
        .subcommand(json_flags(period_args(
            Command::new("summary").about("Totals, UPI alert and category breakdown"),
        )))
        .subcommand(json_flags(
            Command::new("analytics")
                .about("Category shares, monthly trend and portfolio")
                .arg(Arg::new("month").long("month").help("YYYY-MM (default: current)"))
                .arg(
                    Arg::new("months")
                        .long("months")
                        .value_parser(value_parser!(u16).range(1..=120))
                        .default_value("6"),
                ),
        ))
        .subcommand(
            Command::new("invest")
                .about("Investments (stored remotely)")
                .subcommand(
                    Command::new("add")
                        .allow_negative_numbers(true)
                        .arg(Arg::new("type").long("type").short('t').required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("current").long("current").required(true))
                        .arg(Arg::new("return").long("return").default_value("12"))
                        .arg(Arg::new("date").long("date").help("YYYY-MM-DD (default: today)"))
                        .arg(Arg::new("name").long("name"))
                        .arg(Arg::new("notes").long("notes")),
                )
                .subcommand(json_flags(Command::new("list")))
                .subcommand(json_flags(Command::new("summary")))
                .subcommand(Command::new("types")),
        )
        .subcommand(
            Command::new("auth")
                .about("Sign in to the hosted backend")
                .subcommand(
                    Command::new("login")
                        .arg(Arg::new("email").long("email").required(true))
                        .arg(Arg::new("password").long("password").required(true)),
                )
                .subcommand(Command::new("logout"))
                .subcommand(Command::new("whoami")),
        )
        .subcommand(
            Command::new("sync")
                .about("Reconcile local and remote expenses")
                .subcommand(Command::new("pull").about("Merge remote records into the local list"))
                .subcommand(Command::new("push").about("Upload unsynced records, then pull")),
        )
        .subcommand(
            Command::new("config")
                .subcommand(
                    Command::new("set-remote")
                        .arg(Arg::new("url").long("url").required(true))
                        .arg(Arg::new("key").long("key").required(true)),
                )
                .subcommand(Command::new("show"))
                .subcommand(Command::new("upi-limit").arg(Arg::new("amount").required(true))),
        )
        .subcommand(
            Command::new("export").subcommand(
                Command::new("expenses")
                    .arg(
                        Arg::new("format")
                            .long("format")
                            .default_value("csv")
                            .help("csv|json"),
                    )
                    .arg(Arg::new("out").long("out").required(true)),
            ),
        )
        .subcommand(Command::new("categories").about("Category catalog and keyword lists"))
}
