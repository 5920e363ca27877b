// Copyright (c) 2025 Atelier Patrimoine.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{arg, crate_version, value_parser, ArgAction, Command};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(arg!(--json "Print as pretty JSON").action(ArgAction::SetTrue))
        .arg(arg!(--jsonl "Print as JSON lines").action(ArgAction::SetTrue))
}

pub fn build_cli() -> Command {
    Command::new("patrimoine")
        .version(crate_version!())
        .about("Financial-advisory back office: client holdings and net-worth aggregation")
        .subcommand(Command::new("init").about("Initialise the local database and print its path"))
        .subcommand(
            Command::new("user")
                .about("Manage clients")
                .subcommand(
                    Command::new("add")
                        .about("Add a client")
                        .arg(arg!(--name <NAME> "Client name").required(true))
                        .arg(arg!(--email <EMAIL> "Contact email")),
                )
                .subcommand(Command::new("list").about("List clients"))
                .subcommand(
                    Command::new("rm")
                        .about("Remove a client and all their holdings")
                        .arg(arg!(--name <NAME> "Client name").required(true)),
                ),
        )
        .subcommand(
            Command::new("asset")
                .about("Manage holdings in any category")
                .subcommand(
                    Command::new("add")
                        .about("Record a holding")
                        .arg(arg!(--user <USER> "Owning client").required(true))
                        .arg(
                            arg!(--category <CATEGORY> "immobilier|bancaire|assurance-vie|entreprise|autres|credit")
                                .required(true),
                        )
                        .arg(arg!(--label <LABEL> "Description of the holding").required(true))
                        .arg(
                            arg!(--value <VALUE> "Current value (outstanding principal for credits)")
                                .allow_negative_numbers(true),
                        )
                        .arg(arg!(--acquired <DATE> "Acquisition date YYYY-MM-DD").required(true)),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .about("List holdings")
                        .arg(arg!(--user <USER> "Filter by client"))
                        .arg(arg!(--category <CATEGORY> "Filter by category")),
                ))
                .subcommand(
                    Command::new("set-value")
                        .about("Update a holding's value")
                        .arg(arg!(--category <CATEGORY> "Holding category").required(true))
                        .arg(
                            arg!(--id <ID> "Holding id")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(
                            arg!(--value <VALUE> "New value")
                                .required(true)
                                .allow_negative_numbers(true),
                        ),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Delete a holding")
                        .arg(arg!(--category <CATEGORY> "Holding category").required(true))
                        .arg(
                            arg!(--id <ID> "Holding id")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        ),
                ),
        )
        .subcommand(
            Command::new("patrimoine")
                .about("Net-worth aggregation")
                .subcommand(json_flags(
                    Command::new("show")
                        .about("Breakdown for one client")
                        .arg(arg!(--user <USER> "Client name").required(true)),
                ))
                .subcommand(json_flags(
                    Command::new("all").about("Net worth per client across the whole book"),
                )),
        )
        .subcommand(
            Command::new("dashboard")
                .about("Book-level statistics")
                .subcommand(json_flags(
                    Command::new("stats").about("Record counts and totals per category"),
                ))
                .subcommand(
                    Command::new("acquisitions")
                        .about("Acquired value bucketed by year")
                        .arg(arg!(--user <USER> "Filter by client")),
                ),
        )
        .subcommand(
            Command::new("tax").about("Tax estimates").subcommand(json_flags(
                Command::new("ifi")
                    .about("Estimate IFI from the property base")
                    .arg(arg!(--user <USER> "Client name").required(true)),
            )),
        )
        .subcommand(
            Command::new("export").about("Export records").subcommand(
                Command::new("records")
                    .about("Dump holdings to CSV or JSON")
                    .arg(arg!(--format <FORMAT> "csv|json").required(true))
                    .arg(arg!(--out <OUT> "Output file path").required(true))
                    .arg(arg!(--user <USER> "Filter by client")),
            ),
        )
        .subcommand(Command::new("doctor").about("Check stored data for inconsistencies"))
}
