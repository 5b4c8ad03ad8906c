// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::open_state;
use crate::models::Expense;
use crate::store::KvStore;
use anyhow::{Result, bail};
use std::path::Path;

pub fn handle<S: KvStore>(store: &S, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("expenses", sub)) => {
            let state = open_state(store, sub)?;
            let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
            let out = sub.get_one::<String>("out").unwrap().trim();
            let n = export_expenses(state.expenses(), &fmt, Path::new(out))?;
            println!("Exported {} expense(s) to {}", n, out);
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Oldest first. Returns the number of records written.
pub fn export_expenses(expenses: &[Expense], fmt: &str, out: &Path) -> Result<usize> {
    let mut items: Vec<&Expense> = expenses.iter().collect();
    items.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));

    match fmt {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "id", "timestamp", "amount", "mode", "merchant", "category", "note", "quick",
                "synced",
            ])?;
            for e in &items {
                wtr.write_record([
                    e.id.clone(),
                    e.timestamp.to_rfc3339(),
                    e.amount.to_string(),
                    e.mode.to_string(),
                    e.merchant.clone(),
                    e.category.clone(),
                    e.note.clone().unwrap_or_default(),
                    e.quick.to_string(),
                    e.synced.to_string(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        other => bail!("Unknown format: {} (use csv|json)", other),
    }
    Ok(items.len())
}
