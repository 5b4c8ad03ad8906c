// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregates::portfolio_summary;
use crate::commands::connect;
use crate::error::{TrackerError, TrackerResult};
use crate::models::{Investment, InvestmentDraft, InvestmentType};
use crate::remote::InvestmentRepository;
use crate::store::KvStore;
use crate::utils::{fmt_inr, fmt_pct, maybe_print_json, parse_date, parse_decimal, pretty_table};
use anyhow::{Result, anyhow};
use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;

pub fn handle<S: KvStore>(store: &S, m: &clap::ArgMatches) -> Result<()> {
    if let Some(("types", _)) = m.subcommand() {
        let rows = InvestmentType::ALL
            .iter()
            .map(|t| vec![t.slug().to_string(), format!("{} {}", t.emoji(), t.label())])
            .collect();
        println!("{}", pretty_table(&["Slug", "Type"], rows));
        return Ok(());
    }

    let remote = connect(store)?;
    let user_id = remote.session.user_id.as_str();
    match m.subcommand() {
        Some(("add", sub)) => {
            let inv = add(&remote.client, user_id, sub, Local::now().date_naive())?;
            println!(
                "Investment added successfully! {} {} · {} (now {})",
                inv.kind.emoji(),
                inv.name,
                fmt_inr(&inv.amount),
                fmt_inr(&inv.current_value)
            );
        }
        Some(("list", sub)) => {
            let items = remote.client.list_investments(user_id)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &items)? {
                print_list(&items);
            }
        }
        Some(("summary", sub)) => {
            let items = remote.client.list_investments(user_id)?;
            let summary = portfolio_summary(&items);
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &summary)? {
                println!("Total invested: {}", fmt_inr(&summary.total_invested));
                println!("Current value: {}", fmt_inr(&summary.current_value));
                println!(
                    "Total return: {} ({})",
                    fmt_inr(&summary.total_return),
                    fmt_pct(&summary.return_pct)
                );
                let rows = summary
                    .allocation
                    .iter()
                    .map(|(kind, amt)| vec![kind.to_string(), fmt_inr(amt)])
                    .collect();
                println!("{}", pretty_table(&["Type", "Invested"], rows));
            }
        }
        _ => {}
    }
    Ok(())
}

/// Required: type, invested amount and current value. The invested amount
/// must be positive and the current value non-negative.
pub fn validate_draft(draft: &InvestmentDraft) -> TrackerResult<()> {
    if draft.amount <= Decimal::ZERO {
        return Err(TrackerError::InvalidInvestment(format!(
            "invested amount must be greater than zero (got {})",
            draft.amount
        )));
    }
    if draft.current_value < Decimal::ZERO {
        return Err(TrackerError::InvalidInvestment(format!(
            "current value cannot be negative (got {})",
            draft.current_value
        )));
    }
    Ok(())
}

pub fn draft_from_args(sub: &clap::ArgMatches, today: NaiveDate) -> Result<InvestmentDraft> {
    let kind = sub
        .get_one::<String>("type")
        .unwrap()
        .parse::<InvestmentType>()
        .map_err(|e| anyhow!(e))?;
    let date = match sub.get_one::<String>("date") {
        Some(d) => parse_date(d)?,
        None => today,
    };
    let expected_return = match sub.get_one::<String>("return") {
        Some(r) => parse_decimal(r.trim_end_matches('%'))?,
        None => Decimal::from(12),
    };
    let trimmed = |key: &str| {
        sub.get_one::<String>(key)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    };
    Ok(InvestmentDraft {
        kind,
        name: trimmed("name"),
        amount: parse_decimal(sub.get_one::<String>("amount").unwrap())?,
        current_value: parse_decimal(sub.get_one::<String>("current").unwrap())?,
        expected_return,
        date,
        notes: trimmed("notes"),
    })
}

pub fn add<R: InvestmentRepository + ?Sized>(
    repo: &R,
    user_id: &str,
    sub: &clap::ArgMatches,
    today: NaiveDate,
) -> Result<Investment> {
    let draft = draft_from_args(sub, today)?;
    validate_draft(&draft)?;
    match repo.create_investment(user_id, &draft) {
        Ok(inv) => Ok(inv),
        Err(e) => {
            log::error!("adding investment failed: {}", e);
            Err(anyhow!("Failed to add investment: {}", e))
        }
    }
}

fn print_list(items: &[Investment]) {
    if items.is_empty() {
        println!("No investment data yet");
        return;
    }
    let rows = items
        .iter()
        .map(|i| {
            vec![
                i.date.to_string(),
                format!("{} {}", i.kind.emoji(), i.kind),
                i.name.clone(),
                fmt_inr(&i.amount),
                fmt_inr(&i.current_value),
                fmt_pct(&i.gain_pct()),
                fmt_pct(&i.expected_return),
                i.notes.clone().unwrap_or_default(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Date", "Type", "Name", "Invested", "Current", "Gain", "Expected", "Notes"],
            rows,
        )
    );
}
