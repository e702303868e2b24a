// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{arg, value_parser, Arg, ArgAction, Command};

fn output_flags(cmd: Command) -> Command {
    cmd.arg(arg!(--json "Print as pretty JSON"))
        .arg(arg!(--jsonl "Print as JSON lines").conflicts_with("json"))
}

fn kind_arg() -> Arg {
    Arg::new("type")
        .long("type")
        .value_name("TYPE")
        .help("income|expense|investment")
}

fn split_arg() -> Arg {
    Arg::new("split")
        .long("split")
        .value_name("WALLET=PCT")
        .help("Wallet share as an integer percentage; repeat per wallet")
        .action(ArgAction::Append)
}

fn tx_command() -> Command {
    Command::new("tx")
        .about("Record and browse transactions")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .about("Record an income, expense or investment")
                .arg(arg!(--date <DATE> "YYYY-MM-DD").required(true))
                .arg(kind_arg().required(true))
                .arg(arg!(--category <CATEGORY> "Category id or name").required(true))
                .arg(arg!(--amount <AMOUNT>).required(true))
                .arg(arg!(--desc <TEXT> "Description"))
                .arg(arg!(--goal <GOAL> "Savings goal receiving part of this income"))
                .arg(arg!(--contribution <AMOUNT> "Part of the amount set aside for --goal")),
        )
        .subcommand(output_flags(
            Command::new("list")
                .about("List transactions, newest first")
                .arg(arg!(--month <MONTH> "YYYY-MM"))
                .arg(kind_arg())
                .arg(arg!(--search <TEXT> "Match description or category name"))
                .arg(arg!(--limit <N>).value_parser(value_parser!(usize))),
        ))
        .subcommand(
            Command::new("edit")
                .about("Change fields of a transaction")
                .arg(arg!(<ID>))
                .arg(arg!(--date <DATE>))
                .arg(kind_arg())
                .arg(arg!(--category <CATEGORY>))
                .arg(arg!(--amount <AMOUNT>))
                .arg(arg!(--desc <TEXT>)),
        )
        .subcommand(Command::new("rm").about("Delete a transaction").arg(arg!(<ID>)))
}

fn category_command() -> Command {
    Command::new("category")
        .about("Manage categories")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .arg(arg!(--name <NAME>).required(true))
                .arg(kind_arg().required(true))
                .arg(arg!(--icon <ICON>).default_value(crate::icons::DEFAULT_ICON))
                .arg(arg!(--color <HEX>).default_value(crate::models::NEUTRAL_COLOR)),
        )
        .subcommand(output_flags(
            Command::new("list").arg(kind_arg()),
        ))
        .subcommand(
            Command::new("edit")
                .arg(arg!(<CATEGORY> "Category id or name"))
                .arg(arg!(--name <NAME>))
                .arg(arg!(--icon <ICON>))
                .arg(arg!(--color <HEX>))
                .arg(kind_arg()),
        )
        .subcommand(Command::new("rm").arg(arg!(<CATEGORY> "Category id or name")))
}

fn budget_command() -> Command {
    Command::new("budget")
        .about("Monthly spending limits per expense category")
        .subcommand_required(true)
        .subcommand(
            Command::new("set")
                .about("Create or replace the limit of a category for a month")
                .arg(arg!(--category <CATEGORY>).required(true))
                .arg(arg!(--limit <AMOUNT>).required(true))
                .arg(arg!(--month <MONTH> "YYYY-MM, defaults to the current month")),
        )
        .subcommand(output_flags(
            Command::new("list").arg(arg!(--month <MONTH>)),
        ))
        .subcommand(output_flags(
            Command::new("status")
                .about("Spent vs. limit for every budget of a month")
                .arg(arg!(--month <MONTH>)),
        ))
        .subcommand(Command::new("rm").arg(arg!(<ID>)))
}

fn savings_command() -> Command {
    Command::new("savings")
        .about("Savings goals")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .arg(arg!(--name <NAME>).required(true))
                .arg(arg!(--target <AMOUNT>).required(true))
                .arg(arg!(--deadline <DATE>)),
        )
        .subcommand(output_flags(Command::new("list")))
        .subcommand(
            Command::new("deposit")
                .arg(arg!(<GOAL> "Goal id or name"))
                .arg(arg!(--amount <AMOUNT>).required(true)),
        )
        .subcommand(
            Command::new("edit")
                .arg(arg!(<GOAL>))
                .arg(arg!(--name <NAME>))
                .arg(arg!(--target <AMOUNT>))
                .arg(arg!(--current <AMOUNT> "Overwrite the saved amount"))
                .arg(arg!(--deadline <DATE>)),
        )
        .subcommand(Command::new("rm").arg(arg!(<GOAL>)))
}

fn report_command() -> Command {
    Command::new("report")
        .about("Aggregated figures")
        .subcommand_required(true)
        .subcommand(output_flags(
            Command::new("month")
                .about("Totals and category breakdowns of one month")
                .arg(arg!(--month <MONTH>)),
        ))
        .subcommand(output_flags(
            Command::new("year")
                .about("Month-by-month totals of one year")
                .arg(arg!(--year <YEAR>).value_parser(value_parser!(i32))),
        ))
        .subcommand(output_flags(
            Command::new("investments")
                .about("Invested amount per month")
                .arg(arg!(--month <MONTH> "Last month shown"))
                .arg(
                    arg!(--months <N>)
                        .value_parser(value_parser!(usize))
                        .default_value("6"),
                ),
        ))
}

fn wallet_movement(name: &'static str, about: &'static str) -> Command {
    Command::new(name)
        .about(about)
        .arg(arg!(<WALLET> "Wallet id or name"))
        .arg(arg!(--amount <AMOUNT>).required(true))
        .arg(arg!(--date <DATE> "Defaults to today"))
        .arg(arg!(--desc <TEXT>))
        .arg(arg!(--tx <ID> "Linked transaction id"))
}

fn wallet_command() -> Command {
    Command::new("wallet")
        .about("Wallets and their movements")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .arg(arg!(--name <NAME>).required(true))
                .arg(arg!(--icon <ICON>).default_value("Wallet"))
                .arg(arg!(--color <HEX>).default_value(crate::models::NEUTRAL_COLOR)),
        )
        .subcommand(output_flags(Command::new("list")))
        .subcommand(
            Command::new("edit")
                .arg(arg!(<WALLET>))
                .arg(arg!(--name <NAME>))
                .arg(arg!(--icon <ICON>))
                .arg(arg!(--color <HEX>)),
        )
        .subcommand(Command::new("rm").arg(arg!(<WALLET>)))
        .subcommand(wallet_movement("credit", "Money into a wallet"))
        .subcommand(wallet_movement("debit", "Money out of a wallet"))
        .subcommand(output_flags(
            Command::new("status")
                .about("Credits, debits and usage per wallet for a month")
                .arg(arg!(--month <MONTH>)),
        ))
}

fn source_command() -> Command {
    Command::new("source")
        .about("Income sources and their wallet split")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .arg(arg!(--name <NAME>).required(true))
                .arg(split_arg().required(true)),
        )
        .subcommand(output_flags(Command::new("list")))
        .subcommand(
            Command::new("edit")
                .arg(arg!(<SOURCE>))
                .arg(arg!(--name <NAME>))
                .arg(split_arg()),
        )
        .subcommand(Command::new("rm").arg(arg!(<SOURCE>)))
        .subcommand(output_flags(
            Command::new("split")
                .about("Preview how an amount would be divided")
                .arg(arg!(<SOURCE>))
                .arg(arg!(--amount <AMOUNT>).required(true)),
        ))
}

pub fn build_cli() -> Command {
    Command::new("tallybook")
        .about("Personal finance tracker: transactions, budgets, savings goals and wallets")
        .version(clap::crate_version!())
        .arg(
            Arg::new("db")
                .long("db")
                .value_name("PATH")
                .env("TALLYBOOK_DB")
                .global(true)
                .help("Database file (defaults to the platform data dir)"),
        )
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(tx_command())
        .subcommand(category_command())
        .subcommand(budget_command())
        .subcommand(savings_command())
        .subcommand(report_command())
        .subcommand(wallet_command())
        .subcommand(source_command())
        .subcommand(
            Command::new("backup")
                .about("Whole-ledger JSON backup")
                .subcommand_required(true)
                .subcommand(Command::new("export").arg(arg!(--out <FILE>).required(true)))
                .subcommand(Command::new("import").arg(arg!(--file <FILE>).required(true))),
        )
        .subcommand(
            Command::new("export")
                .about("Export data")
                .subcommand_required(true)
                .subcommand(
                    Command::new("transactions")
                        .arg(arg!(--format <FMT> "csv|json").required(true))
                        .arg(arg!(--out <FILE>).required(true))
                        .arg(arg!(--month <MONTH> "Only this month")),
                ),
        )
        .subcommand(
            Command::new("settings")
                .about("User preferences")
                .subcommand_required(true)
                .subcommand(output_flags(Command::new("show")))
                .subcommand(
                    Command::new("set")
                        .arg(arg!(--name <NAME> "Display name"))
                        .arg(arg!(--currency <CCY>))
                        .arg(
                            arg!(--privacy <MODE> "Mask amounts: on|off")
                                .value_parser(["on", "off"]),
                        ),
                ),
        )
        .subcommand(Command::new("doctor").about("Scan for dangling or inconsistent references"))
}
