// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::builder::BoolishValueParser;
use clap::{Arg, ArgAction, Command};

fn json_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

fn yes_arg() -> Arg {
    Arg::new("yes")
        .long("yes")
        .action(ArgAction::SetTrue)
        .help("Confirm a destructive action")
}

fn kind_arg() -> Arg {
    Arg::new("kind")
        .long("kind")
        .required(true)
        .value_parser(["grower", "customer"])
        .help("Account kind")
}

fn account_cmd(name: &'static str, about: &'static str) -> Command {
    Command::new(name)
        .about(about)
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .about("Add an account")
                .arg(Arg::new("name").long("name").required(true))
                .arg(Arg::new("contact").long("contact").default_value(""))
                .arg(Arg::new("address").long("address").default_value("")),
        )
        .subcommand(json_args(
            Command::new("list")
                .about("List accounts with totals and pending balance")
                .arg(Arg::new("search").long("search").help("Filter by name")),
        ))
        .subcommand(json_args(
            Command::new("show")
                .about("Show one account and its transactions")
                .arg(Arg::new("id").long("id").required(true)),
        ))
        .subcommand(
            Command::new("rm")
                .about("Delete an account and all of its transactions")
                .arg(Arg::new("id").long("id").required(true))
                .arg(yes_arg()),
        )
        .subcommand(
            Command::new("settle")
                .about("Settle every open transaction of one account")
                .arg(Arg::new("id").long("id").required(true)),
        )
        .subcommand(
            Command::new("settle-all")
                .about("Settle every open transaction of every account")
                .arg(yes_arg()),
        )
}

fn tx_fields(cmd: Command) -> Command {
    cmd.arg(Arg::new("date").long("date").help("YYYY-MM-DD, defaults to today"))
        .arg(Arg::new("variety").long("variety").required(true))
        .arg(Arg::new("boxes").long("boxes").required(true))
        .arg(
            Arg::new("rate")
                .long("rate")
                .help("Rate per box; defaults to the variety's default rate"),
        )
        .arg(Arg::new("commission").long("commission").default_value("0"))
        .arg(Arg::new("transport").long("transport").default_value("0"))
        .arg(
            Arg::new("status")
                .long("status")
                .value_parser(["due", "paid", "pending", "received"]),
        )
        .arg(Arg::new("box_type").long("box-type").default_value(""))
        .arg(Arg::new("notes").long("notes").default_value(""))
}

fn tx_scope(cmd: Command) -> Command {
    cmd.arg(kind_arg())
        .arg(Arg::new("account").long("account").required(true))
}

pub fn build_cli() -> Command {
    Command::new("mandi")
        .version(clap::crate_version!())
        .about("Mandi Khata: grower and customer ledger for produce traders")
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .help("Path to config.yaml"),
        )
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(account_cmd("grower", "Growers we buy from"))
        .subcommand(account_cmd("customer", "Customers we sell to"))
        .subcommand(
            Command::new("tx")
                .about("Purchases and sales")
                .subcommand_required(true)
                .subcommand(tx_fields(tx_scope(
                    Command::new("add").about("Record a transaction"),
                )))
                .subcommand(tx_fields(tx_scope(
                    Command::new("edit")
                        .about("Replace a transaction, keeping its id")
                        .arg(Arg::new("id").long("id").required(true)),
                )))
                .subcommand(tx_scope(
                    Command::new("status")
                        .about("Set the payment status of one transaction")
                        .arg(Arg::new("id").long("id").required(true))
                        .arg(
                            Arg::new("status")
                                .long("status")
                                .required(true)
                                .value_parser(["due", "paid", "pending", "received"]),
                        ),
                ))
                .subcommand(tx_scope(
                    Command::new("rm")
                        .about("Delete a transaction")
                        .arg(Arg::new("id").long("id").required(true)),
                )),
        )
        .subcommand(
            Command::new("expense")
                .about("Business expenses")
                .subcommand_required(true)
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("date").long("date"))
                        .arg(Arg::new("desc").long("desc").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("category").long("category").default_value("")),
                )
                .subcommand(json_args(Command::new("list")))
                .subcommand(Command::new("rm").arg(Arg::new("id").long("id").required(true))),
        )
        .subcommand(
            Command::new("variety")
                .about("Produce varieties and default rates")
                .subcommand_required(true)
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("rate").long("rate").default_value("0")),
                )
                .subcommand(json_args(Command::new("list")))
                .subcommand(
                    Command::new("rate")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("rate").long("rate").required(true)),
                )
                .subcommand(Command::new("rm").arg(Arg::new("name").long("name").required(true))),
        )
        .subcommand(json_args(
            Command::new("dashboard")
                .about("Boxes, amounts and profit for a date window")
                .arg(
                    Arg::new("range")
                        .long("range")
                        .default_value("all")
                        .value_parser(["all", "today", "week", "month"]),
                )
                .arg(Arg::new("from").long("from").requires("to"))
                .arg(Arg::new("to").long("to").requires("from"))
                .arg(Arg::new("variety").long("variety").default_value("all")),
        ))
        .subcommand(json_args(
            Command::new("stock").about("Boxes in stock per variety"),
        ))
        .subcommand(json_args(
            Command::new("profit")
                .about("Daily profit for the last 7 days")
                .arg(Arg::new("variety").long("variety").default_value("all")),
        ))
        .subcommand(
            Command::new("khata")
                .about("Pending balances")
                .subcommand_required(true)
                .subcommand(json_args(
                    Command::new("list").arg(Arg::new("search").long("search")),
                ))
                .subcommand(
                    Command::new("csv")
                        .about("Export pending balances as CSV")
                        .arg(Arg::new("out").long("out").required(true)),
                ),
        )
        .subcommand(json_args(tx_scope(
            Command::new("bill")
                .about("Show the pending bill for one account")
                .arg(
                    Arg::new("mark_printed")
                        .long("mark-printed")
                        .action(ArgAction::SetTrue)
                        .help("Settle the billed transactions"),
                ),
        )))
        .subcommand(
            Command::new("data")
                .about("Export, import and backups")
                .subcommand_required(true)
                .subcommand(Command::new("export").arg(Arg::new("out").long("out").required(true)))
                .subcommand(
                    Command::new("import").arg(Arg::new("path").long("path").required(true)),
                )
                .subcommand(Command::new("backup").about("Take a snapshot now"))
                .subcommand(
                    Command::new("restore")
                        .about("Replace all data with the last snapshot")
                        .arg(yes_arg()),
                ),
        )
        .subcommand(
            Command::new("prefs")
                .about("Business profile and display preferences")
                .subcommand_required(true)
                .subcommand(json_args(Command::new("show")))
                .subcommand(
                    Command::new("profile")
                        .arg(Arg::new("name").long("name"))
                        .arg(Arg::new("mandi").long("mandi"))
                        .arg(Arg::new("phone").long("phone"))
                        .arg(Arg::new("gst").long("gst"))
                        .arg(Arg::new("address").long("address")),
                )
                .subcommand(
                    Command::new("dark-mode").arg(
                        Arg::new("state")
                            .required(true)
                            .value_parser(BoolishValueParser::new())
                            .help("on or off"),
                    ),
                ),
        )
        .subcommand(Command::new("doctor").about("Check transactions against the variety list"))
}
