// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use bareminimum::aggregates::PeriodFilter;
use bareminimum::cli;
use bareminimum::commands::analytics::build_report;
use bareminimum::commands::investments;
use bareminimum::models::{Expense, InvestmentType, PaymentMode};
use bareminimum::remote::{InvestmentRepository, MemoryRepository};
use chrono::{NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;

fn add_matches(args: &[&str]) -> clap::ArgMatches {
    let mut argv = vec!["bareminimum", "invest", "add"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    let (_, inv_m) = matches.subcommand().unwrap();
    let (_, add_m) = inv_m.subcommand().unwrap();
    add_m.clone()
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 8, 20).unwrap()
}

#[test]
fn add_uses_defaults_and_stores_remotely() {
    let repo = MemoryRepository::new();
    let m = add_matches(&["--type", "mf", "--amount", "5000", "--current", "5600"]);
    let inv = investments::add(&repo, "u1", &m, today()).unwrap();

    assert_eq!(inv.kind, InvestmentType::MutualFund);
    assert_eq!(inv.name, "Mutual Funds & SIP Investment");
    assert_eq!(inv.expected_return, Decimal::from(12));
    assert_eq!(inv.date, today());
    assert_eq!(inv.gain(), Decimal::from(600));

    let listed = repo.list_investments("u1").unwrap();
    assert_eq!(listed.len(), 1);
    assert!(repo.list_investments("u2").unwrap().is_empty());
}

#[test]
fn add_parses_explicit_fields() {
    let repo = MemoryRepository::new();
    let m = add_matches(&[
        "-t",
        "Fixed Deposit",
        "--amount",
        "₹1,00,000",
        "--current",
        "100000",
        "--return",
        "7.1%",
        "--date",
        "2024-04-01",
        "--name",
        " SBI FD ",
        "--notes",
        "",
    ]);
    let inv = investments::add(&repo, "u1", &m, today()).unwrap();
    assert_eq!(inv.kind, InvestmentType::FixedDeposit);
    assert_eq!(inv.name, "SBI FD");
    assert_eq!(inv.amount, Decimal::from(100000));
    assert_eq!(inv.expected_return, Decimal::new(71, 1));
    assert_eq!(inv.date, NaiveDate::from_ymd_opt(2024, 4, 1).unwrap());
    assert_eq!(inv.notes, None);
}

#[test]
fn invalid_investments_are_rejected_before_the_remote_call() {
    let repo = MemoryRepository::new();
    for args in [
        ["--type", "equity", "--amount", "0", "--current", "10"],
        ["--type", "equity", "--amount", "10", "--current", "-1"],
    ] {
        let m = add_matches(&args);
        assert!(investments::add(&repo, "u1", &m, today()).is_err());
    }
    let m = add_matches(&["--type", "bonds", "--amount", "1", "--current", "1"]);
    assert!(investments::add(&repo, "u1", &m, today()).is_err());
    assert!(repo.list_investments("u1").unwrap().is_empty());

    repo.set_offline(true);
    let m = add_matches(&["--type", "gold", "--amount", "1", "--current", "1"]);
    assert!(investments::add(&repo, "u1", &m, today()).is_err());
}

#[test]
fn type_names_parse_by_slug_label_and_alias() {
    assert_eq!("nps1".parse::<InvestmentType>().unwrap(), InvestmentType::NpsTier1);
    assert_eq!(
        "Gold/Commodities".parse::<InvestmentType>().unwrap(),
        InvestmentType::Gold
    );
    assert_eq!("SIP".parse::<InvestmentType>().unwrap(), InvestmentType::MutualFund);
    assert_eq!(
        serde_json::to_string(&InvestmentType::NpsTier2).unwrap(),
        "\"NPS (Tier 2)\""
    );
}

#[test]
fn analytics_report_combines_spend_and_portfolio() {
    let repo = MemoryRepository::new();
    let m = add_matches(&["--type", "equity", "--amount", "1000", "--current", "1500"]);
    investments::add(&repo, "u1", &m, today()).unwrap();
    let portfolio = repo.list_investments("u1").unwrap();

    let expense = Expense {
        id: "e1".into(),
        amount: Decimal::from(200),
        mode: PaymentMode::Upi,
        merchant: "Zomato".into(),
        category: "Food Delivery".into(),
        note: None,
        timestamp: Utc.with_ymd_and_hms(2025, 8, 3, 12, 0, 0).unwrap(),
        quick: false,
        synced: true,
    };
    let now = Utc.with_ymd_and_hms(2025, 8, 20, 12, 0, 0).unwrap();
    let expenses = vec![expense];

    let report = build_report(
        &expenses,
        Some(portfolio.as_slice()),
        PeriodFilter::month_of(2025, 8),
        6,
        &now,
    );
    assert_eq!(report.month_spend, Decimal::from(200));
    assert_eq!(report.categories.len(), 1);
    assert_eq!(report.categories[0].percent, Decimal::ONE_HUNDRED);
    assert_eq!(report.trend.len(), 6);
    assert_eq!(report.trend[5].total, Decimal::from(200));
    assert_eq!(report.net_worth_impact, Decimal::from(300));

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["month"], "2025-08");

    let offline = build_report(&expenses, None, PeriodFilter::month_of(2025, 7), 3, &now);
    assert_eq!(offline.month_spend, Decimal::ZERO);
    assert!(offline.portfolio.is_none());
    assert_eq!(offline.net_worth_impact, Decimal::ZERO);
}

#[test]
fn analytics_months_is_bounded() {
    let parse = |v: &str| {
        cli::build_cli().try_get_matches_from(["bareminimum", "analytics", "--months", v])
    };
    assert!(parse("100000").is_err());
    assert!(parse("0").is_err());
    assert!(parse("121").is_err());

    let m = parse("120").unwrap();
    let (_, an_m) = m.subcommand().unwrap();
    assert_eq!(an_m.get_one::<u16>("months"), Some(&120));

    let m = cli::build_cli().get_matches_from(["bareminimum", "analytics"]);
    let (_, an_m) = m.subcommand().unwrap();
    assert_eq!(an_m.get_one::<u16>("months"), Some(&6));
}
