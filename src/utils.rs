// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::sync::Once;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use rust_decimal::Decimal;

use crate::icons::IconRegistry;
use crate::models::{Category, TransactionType, UserSettings, YearMonth};
use crate::store::Entity;

static TRACING_INIT: Once = Once::new();

const PRIVACY_MASK: &str = "••••••";

/// Installs the stderr subscriber. `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("tallybook=warn"));

        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    });
}

/// Fetches an argument clap has already marked as required.
pub fn required<'a>(m: &'a clap::ArgMatches, name: &str) -> Result<&'a str> {
    m.get_one::<String>(name)
        .map(|s| s.trim())
        .with_context(|| format!("Missing argument '{}'", name))
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_month(s: &str) -> Result<YearMonth> {
    Ok(s.parse::<YearMonth>()?)
}

/// `--month` when given, the current month otherwise.
pub fn month_or_current(m: &clap::ArgMatches) -> Result<YearMonth> {
    match m.get_one::<String>("month") {
        Some(s) => parse_month(s),
        None => Ok(YearMonth::current()),
    }
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

pub fn parse_kind(s: &str) -> Result<TransactionType> {
    Ok(s.parse::<TransactionType>()?)
}

pub fn fmt_money(d: Decimal, settings: &UserSettings) -> String {
    if settings.privacy_mode {
        format!("{} {}", settings.currency, PRIVACY_MASK)
    } else {
        format!("{} {:.2}", settings.currency, d.round_dp(2))
    }
}

pub fn fmt_percent(d: Decimal) -> String {
    format!("{:.1}%", d.round_dp(1))
}

/// Glyph followed by the icon name, e.g. `🍴 Utensils`.
pub fn icon_label(icon: &str) -> String {
    format!("{} {}", IconRegistry::glyph(icon), icon)
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // Arrays stream one element per line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

/// Finds a record by exact id, falling back to a case-insensitive name match.
pub fn lookup<T: Entity>(rows: Vec<T>, key: &str, name: impl Fn(&T) -> &str) -> Result<T> {
    let key = key.trim();
    let mut by_name = None;
    for row in rows {
        if row.id() == key {
            return Ok(row);
        }
        if by_name.is_none() && name(&row).eq_ignore_ascii_case(key) {
            by_name = Some(row);
        }
    }
    by_name.with_context(|| format!("{} '{}' not found", T::NAME, key))
}

/// Category by id, or by name among categories of `kind`. Names repeat
/// across types ("Other"), so the type narrows the name match only.
pub fn category_ref(
    categories: &[Category],
    key: &str,
    kind: Option<TransactionType>,
) -> Result<Category> {
    let key = key.trim();
    categories
        .iter()
        .find(|c| c.id == key)
        .or_else(|| {
            categories.iter().find(|c| {
                kind.is_none_or(|k| c.kind == k) && c.name.eq_ignore_ascii_case(key)
            })
        })
        .cloned()
        .with_context(|| format!("Category '{}' not found", key))
}
