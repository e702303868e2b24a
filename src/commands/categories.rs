// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::icons::IconRegistry;
use crate::ledger::Ledger;
use crate::models::{CategoryPatch, NewCategory};
use crate::utils::{
    category_ref, icon_label, maybe_print_json, parse_kind, pretty_table, required,
};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let ledger = Ledger::new(conn);
    match m.subcommand() {
        Some(("add", sub)) => {
            let icon = required(sub, "icon")?;
            let category = ledger.add_category(NewCategory {
                name: required(sub, "name")?.to_string(),
                icon: IconRegistry::normalize(icon).to_string(),
                color: required(sub, "color")?.to_string(),
                kind: parse_kind(required(sub, "type")?)?,
            })?;
            println!(
                "Added {} category '{}' (id: {})",
                category.kind, category.name, category.id
            );
        }
        Some(("list", sub)) => {
            let kind = sub
                .get_one::<String>("type")
                .map(|s| parse_kind(s))
                .transpose()?;
            let mut data = ledger.categories();
            if let Some(kind) = kind {
                data.retain(|c| c.kind == kind);
            }
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
                let rows = data
                    .iter()
                    .map(|c| {
                        vec![
                            c.id.clone(),
                            c.name.clone(),
                            c.kind.to_string(),
                            icon_label(&c.icon),
                            c.color.clone(),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["Id", "Name", "Type", "Icon", "Color"], rows)
                );
            }
        }
        Some(("edit", sub)) => {
            let target = category_ref(&ledger.categories(), required(sub, "CATEGORY")?, None)?;
            let patch = CategoryPatch {
                name: sub.get_one::<String>("name").cloned(),
                icon: sub
                    .get_one::<String>("icon")
                    .map(|s| IconRegistry::normalize(s).to_string()),
                color: sub.get_one::<String>("color").cloned(),
                kind: sub
                    .get_one::<String>("type")
                    .map(|s| parse_kind(s))
                    .transpose()?,
            };
            let category = ledger.update_category(&target.id, patch)?;
            println!("Updated category '{}'", category.name);
        }
        Some(("rm", sub)) => {
            let target = category_ref(&ledger.categories(), required(sub, "CATEGORY")?, None)?;
            ledger.delete_category(&target.id)?;
            println!("Removed category '{}'", target.name);
        }
        _ => {}
    }
    Ok(())
}
