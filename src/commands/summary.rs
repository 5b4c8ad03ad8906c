// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregates::{DashboardSummary, summarize};
use crate::catalog::category_emoji;
use crate::commands::open_state;
use crate::store::KvStore;
use crate::utils::{fmt_inr, maybe_print_json, period_from_args, pretty_table};
use anyhow::Result;
use chrono::Local;

pub fn handle<S: KvStore>(store: &S, m: &clap::ArgMatches) -> Result<()> {
    let state = open_state(store, m)?;
    let filter = period_from_args(
        m.get_one::<String>("month").map(String::as_str),
        m.get_one::<String>("year").map(String::as_str),
    )?;
    let summary = summarize(state.data(), &filter, &Local::now());
    if !maybe_print_json(m.get_flag("json"), m.get_flag("jsonl"), &summary)? {
        print_summary(&summary);
    }
    Ok(())
}

fn print_summary(s: &DashboardSummary) {
    println!("{} Expenses • {} ({} records)", s.label, fmt_inr(&s.filtered_total), s.count);
    println!("Today: {}", fmt_inr(&s.today_total));
    let years: Vec<String> = s.years.iter().map(i32::to_string).collect();
    println!("Years: {}", years.join(", "));
    if s.upi_limit_exceeded {
        println!(
            "UPI today: {}  ⚠ Limit exceeded ({})",
            fmt_inr(&s.upi_today),
            fmt_inr(&s.upi_limit)
        );
    } else {
        println!("UPI today: {}", fmt_inr(&s.upi_today));
    }

    if s.categories.is_empty() {
        println!("No categories yet.");
        return;
    }
    let rows = s
        .categories
        .iter()
        .map(|c| {
            vec![
                format!("{} {}", category_emoji(&c.category), c.category),
                fmt_inr(&c.amount),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Category", "Spent"], rows));
}
