// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::Ledger;
use crate::models::SettingsPatch;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let ledger = Ledger::new(conn);
    match m.subcommand() {
        Some(("show", sub)) => {
            let settings = ledger.settings();
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &settings)? {
                println!(
                    "{}",
                    pretty_table(
                        &["Name", "Currency", "Privacy"],
                        vec![vec![
                            settings.display_name.clone(),
                            settings.currency.clone(),
                            if settings.privacy_mode { "on" } else { "off" }.to_string(),
                        ]],
                    )
                );
            }
        }
        Some(("set", sub)) => {
            let patch = SettingsPatch {
                display_name: sub.get_one::<String>("name").cloned(),
                currency: sub.get_one::<String>("currency").cloned(),
                privacy_mode: sub.get_one::<String>("privacy").map(|s| s == "on"),
            };
            let settings = ledger.update_settings(patch)?;
            println!(
                "Settings saved: {} / {} / privacy {}",
                settings.display_name,
                settings.currency,
                if settings.privacy_mode { "on" } else { "off" }
            );
        }
        _ => {}
    }
    Ok(())
}
