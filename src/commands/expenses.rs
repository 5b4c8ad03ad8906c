// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregates::{
    SortOrder, filter_by_period, group_by_date, merchant_suggestions, sort_expenses,
    upi_limit_exceeded, upi_today,
};
use crate::commands::{connect, open_state};
use crate::error::TrackerResult;
use crate::models::{Expense, ExpenseDraft, PaymentMode};
use crate::remote::{ExpenseRepository, SupabaseClient};
use crate::state::{AppState, Slot};
use crate::store::KvStore;
use crate::utils::{fmt_inr, maybe_print_json, parse_decimal, period_from_args, pretty_table};
use anyhow::{Result, anyhow};
use chrono::{Local, TimeZone, Utc};
use serde::Serialize;
use std::fmt::Display;

pub fn handle<S: KvStore>(store: &S, m: &clap::ArgMatches) -> Result<()> {
    let mut state = open_state(store, m)?;
    match m.subcommand() {
        Some(("add", sub)) => add(&mut state, sub)?,
        Some(("list", sub)) => list(&state, sub)?,
        Some(("rm", sub)) => {
            let id = resolve_id(state.expenses(), sub.get_one::<String>("id").unwrap())?;
            let removed = state.delete_expense(&id)?;
            println!(
                "Deleted {} at '{}' ({})",
                fmt_inr(&removed.amount),
                removed.merchant,
                short_id(&removed.id)
            );
            mirror_remote(store, &state, &removed, |c| c.delete_by_id(&removed.id));
        }
        Some(("mode", sub)) => {
            let id = resolve_id(state.expenses(), sub.get_one::<String>("id").unwrap())?;
            let mode = sub
                .get_one::<String>("mode")
                .unwrap()
                .parse::<PaymentMode>()
                .map_err(|e| anyhow!(e))?;
            change_mode(store, &mut state, &id, mode)?;
        }
        Some(("cash", sub)) => {
            let id = resolve_id(state.expenses(), sub.get_one::<String>("id").unwrap())?;
            change_mode(store, &mut state, &id, PaymentMode::Cash)?;
        }
        Some(("merchants", sub)) => {
            let names = merchants(state.expenses(), sub.get_one::<usize>("limit").copied());
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &names)? {
                if names.is_empty() {
                    println!("No merchants yet.");
                }
                for name in &names {
                    println!("{}", name);
                }
            }
        }
        Some(("undo", _)) => {
            let removed = state.undo_last()?;
            println!(
                "Undid {} at '{}'",
                fmt_inr(&removed.amount),
                removed.merchant
            );
        }
        _ => {}
    }
    Ok(())
}

pub fn draft_from_args(sub: &clap::ArgMatches) -> Result<ExpenseDraft> {
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let mode = match sub.get_one::<String>("mode") {
        Some(raw) => Some(raw.parse::<PaymentMode>().map_err(|e| anyhow!(e))?),
        None => None,
    };
    Ok(ExpenseDraft {
        amount,
        mode,
        merchant: sub.get_one::<String>("merchant").cloned(),
        category: sub.get_one::<String>("category").cloned(),
        note: sub.get_one::<String>("note").cloned(),
    })
}

fn add<S: KvStore>(state: &mut AppState<'_, S>, sub: &clap::ArgMatches) -> Result<()> {
    let draft = draft_from_args(sub)?;
    let item = state.add_expense(draft, Utc::now())?;
    println!(
        "Expense added ✓ {} · {} · {} ({}) [{}]",
        fmt_inr(&item.amount),
        item.merchant,
        item.category,
        item.mode,
        short_id(&item.id)
    );
    if item.quick {
        println!("Quick-commerce flagged");
    }
    let upi = upi_today(state.expenses(), &Local::now());
    let limit = state.data().settings.upi_daily_limit;
    if upi_limit_exceeded(upi, limit) {
        println!("⚠ UPI today {}: limit {} exceeded", fmt_inr(&upi), fmt_inr(&limit));
    }
    println!("Run `bareminimum expense undo` to take it back.");
    Ok(())
}

fn change_mode<S: KvStore>(
    store: &S,
    state: &mut AppState<'_, S>,
    id: &str,
    mode: PaymentMode,
) -> Result<()> {
    let updated = state.set_mode(id, mode)?;
    println!(
        "{} at '{}' is now {}",
        fmt_inr(&updated.amount),
        updated.merchant,
        updated.mode
    );
    mirror_remote(store, state, &updated, |c| c.update_mode(&updated.id, mode));
    Ok(())
}

/// Applies a change to the remote copy of a synced record. Failures are
/// logged; the local change stands.
fn mirror_remote<S, F>(store: &S, state: &AppState<'_, S>, e: &Expense, op: F)
where
    S: KvStore,
    F: FnOnce(&SupabaseClient) -> TrackerResult<()>,
{
    if !e.synced || !matches!(state.slot(), Some(Slot::User(_))) {
        return;
    }
    let outcome = connect(store).and_then(|remote| op(&remote.client).map_err(Into::into));
    if let Err(err) = outcome {
        log::warn!("remote update of {} failed: {:#}", e.id, err);
        println!("Remote copy not updated; run `bareminimum sync pull` to see the server state.");
    }
}

/// Distinct merchants, newest record first, for `expense merchants`.
pub fn merchants(expenses: &[Expense], limit: Option<usize>) -> Vec<String> {
    let mut items: Vec<&Expense> = expenses.iter().collect();
    sort_expenses(&mut items, SortOrder::Newest);
    let ordered: Vec<Expense> = items.into_iter().cloned().collect();
    let mut names = merchant_suggestions(&ordered);
    if let Some(n) = limit {
        names.truncate(n);
    }
    names
}

pub fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

/// Exact id, or a prefix matching exactly one record.
pub fn resolve_id(expenses: &[Expense], needle: &str) -> Result<String> {
    let needle = needle.trim();
    if let Some(e) = expenses.iter().find(|e| e.id == needle) {
        return Ok(e.id.clone());
    }
    let hits: Vec<&Expense> = expenses
        .iter()
        .filter(|e| !needle.is_empty() && e.id.starts_with(needle))
        .collect();
    match hits.as_slice() {
        [one] => Ok(one.id.clone()),
        [] => Err(anyhow!("Expense '{}' not found", needle)),
        _ => Err(anyhow!("Id prefix '{}' is ambiguous ({} matches)", needle, hits.len())),
    }
}

#[derive(Debug, Serialize)]
pub struct ExpenseRow {
    pub id: String,
    pub date: String,
    pub time: String,
    pub amount: String,
    pub mode: String,
    pub merchant: String,
    pub category: String,
    pub note: String,
    pub quick: bool,
    pub synced: bool,
}

/// Filtered, sorted and limited rows for `expense list`, dated in `tz`.
pub fn query_rows<Tz>(expenses: &[Expense], sub: &clap::ArgMatches, tz: &Tz) -> Result<Vec<ExpenseRow>>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let filter = period_from_args(
        sub.get_one::<String>("month").map(String::as_str),
        sub.get_one::<String>("year").map(String::as_str),
    )?;
    let order = match sub.get_one::<String>("sort") {
        Some(s) => s.parse::<SortOrder>().map_err(|e| anyhow!(e))?,
        None => SortOrder::Newest,
    };
    let mut items = filter_by_period(expenses, &filter, tz);
    sort_expenses(&mut items, order);
    if let Some(limit) = sub.get_one::<usize>("limit") {
        items.truncate(*limit);
    }

    let mut rows = Vec::with_capacity(items.len());
    for (date, group) in group_by_date(&items, tz) {
        for e in group {
            let local = e.timestamp.with_timezone(tz);
            rows.push(ExpenseRow {
                id: e.id.clone(),
                date: date.to_string(),
                time: local.format("%H:%M").to_string(),
                amount: e.amount.round_dp(2).to_string(),
                mode: e.mode.to_string(),
                merchant: e.merchant.clone(),
                category: e.category.clone(),
                note: e.note.clone().unwrap_or_default(),
                quick: e.quick,
                synced: e.synced,
            });
        }
    }
    Ok(rows)
}

fn list<S: KvStore>(state: &AppState<'_, S>, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(state.expenses(), sub, &Local)?;
    if maybe_print_json(json_flag, jsonl_flag, &data)? {
        return Ok(());
    }
    if data.is_empty() {
        println!("No expenses for selected filters.");
        return Ok(());
    }
    println!("Expenses ({})", data.len());
    let mut last_date = String::new();
    let rows: Vec<Vec<String>> = data
        .iter()
        .map(|r| {
            let date = if r.date == last_date {
                String::new()
            } else {
                last_date = r.date.clone();
                r.date.clone()
            };
            let mut flags = Vec::new();
            if r.quick {
                flags.push("quick");
            }
            if !r.synced {
                flags.push("local");
            }
            vec![
                date,
                r.time.clone(),
                short_id(&r.id).to_string(),
                r.amount.clone(),
                r.mode.clone(),
                r.merchant.clone(),
                r.category.clone(),
                r.note.clone(),
                flags.join(","),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Date", "Time", "ID", "Amount", "Mode", "Merchant", "Category", "Note", "Flags"],
            rows,
        )
    );
    Ok(())
}
