// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::Ledger;
use crate::utils::required;
use anyhow::{Context, Result};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let ledger = Ledger::new(conn);
    match m.subcommand() {
        Some(("export", sub)) => {
            let out = required(sub, "out")?;
            let doc = ledger.export_backup()?;
            std::fs::write(out, doc).with_context(|| format!("Write backup {}", out))?;
            println!("Backup written to {}", out);
        }
        Some(("import", sub)) => {
            let path = required(sub, "file")?;
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Open backup {}", path))?;
            let tables = ledger
                .import_backup(&raw)
                .with_context(|| format!("Import backup {}", path))?;
            if tables.is_empty() {
                println!("Nothing to restore in {}", path);
            } else {
                println!("Restored {} from {}", tables.join(", "), path);
            }
        }
        _ => {}
    }
    Ok(())
}
