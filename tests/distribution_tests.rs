// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;
use rust_decimal::Decimal;
use tallybook::distribution::{split_income, validate_distribution};
use tallybook::errors::FinanceError;
use tallybook::ledger::Ledger;
use tallybook::models::{IncomeDistribution, IncomeSourcePatch, NewIncomeSource};
use tallybook::{cli, commands::sources, db};

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn
}

fn split(parts: &[(&str, u32)]) -> Vec<IncomeDistribution> {
    parts
        .iter()
        .map(|(wallet, pct)| IncomeDistribution {
            wallet_id: wallet.to_string(),
            percentage: *pct,
        })
        .collect()
}

#[test]
fn distribution_must_sum_to_exactly_one_hundred() {
    assert!(validate_distribution(&split(&[
        ("marketing", 30),
        ("equipment", 20),
        ("free_profit", 50)
    ])));
    assert!(!validate_distribution(&split(&[
        ("marketing", 30),
        ("equipment", 20),
        ("free_profit", 40)
    ])));
    assert!(!validate_distribution(&split(&[("marketing", 101)])));
    assert!(!validate_distribution(&[]));
}

#[test]
fn zero_entries_do_not_count() {
    assert!(validate_distribution(&split(&[
        ("marketing", 0),
        ("free_profit", 100)
    ])));
}

#[test]
fn invalid_source_is_rejected_and_valid_one_drops_zero_entries() {
    let conn = setup();
    let ledger = Ledger::new(&conn);
    let err = ledger
        .add_income_source(NewIncomeSource {
            name: "Shop".into(),
            distributions: split(&[("marketing", 30), ("equipment", 20), ("free_profit", 40)]),
        })
        .unwrap_err();
    assert!(matches!(err, FinanceError::DistributionSum(90)));
    assert!(ledger.income_sources().is_empty());

    let source = ledger
        .add_income_source(NewIncomeSource {
            name: "Shop".into(),
            distributions: split(&[("marketing", 0), ("equipment", 40), ("free_profit", 60)]),
        })
        .unwrap();
    assert_eq!(source.distributions.len(), 2);
    assert_eq!(ledger.income_sources()[0].distributions, source.distributions);

    let err = ledger
        .update_income_source(
            &source.id,
            IncomeSourcePatch {
                distributions: Some(split(&[("equipment", 50)])),
                ..Default::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, FinanceError::DistributionSum(50)));
    assert_eq!(ledger.income_sources()[0].distributions.len(), 2);
}

#[test]
fn split_preview_divides_amount() {
    let conn = setup();
    let ledger = Ledger::new(&conn);
    let source = ledger
        .add_income_source(NewIncomeSource {
            name: "Channel".into(),
            distributions: split(&[("marketing", 25), ("free_profit", 75)]),
        })
        .unwrap();
    let shares = split_income("1000".parse().unwrap(), &source);
    assert_eq!(shares.len(), 2);
    assert_eq!(shares[0].amount, Decimal::from(250));
    assert_eq!(shares[1].amount, Decimal::from(750));
    // Preview only: nothing was posted to the wallets.
    assert!(ledger.wallet_transactions().is_empty());
}

#[test]
fn cli_source_add_resolves_wallet_names() {
    let conn = setup();
    let matches = cli::build_cli().get_matches_from([
        "tallybook",
        "source",
        "add",
        "--name",
        "Consulting",
        "--split",
        "Marketing=30",
        "--split",
        "equipment=20%",
        "--split",
        "Free Profit=50",
    ]);
    if let Some(("source", source_m)) = matches.subcommand() {
        sources::handle(&conn, source_m).unwrap();
    } else {
        panic!("no source subcommand");
    }
    let stored = Ledger::new(&conn).income_sources();
    assert_eq!(stored.len(), 1);
    let wallets: Vec<&str> = stored[0]
        .distributions
        .iter()
        .map(|d| d.wallet_id.as_str())
        .collect();
    assert_eq!(wallets, ["marketing", "equipment", "free_profit"]);
}

#[test]
fn cli_source_add_rejects_bad_total() {
    let conn = setup();
    let matches = cli::build_cli().get_matches_from([
        "tallybook",
        "source",
        "add",
        "--name",
        "Consulting",
        "--split",
        "marketing=30",
        "--split",
        "equipment=20",
    ]);
    if let Some(("source", source_m)) = matches.subcommand() {
        assert!(sources::handle(&conn, source_m).is_err());
    } else {
        panic!("no source subcommand");
    }
    assert!(Ledger::new(&conn).income_sources().is_empty());
}
