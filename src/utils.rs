// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, anyhow};
use chrono::{Datelike, NaiveDate};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rust_decimal::Decimal;

use crate::aggregates::PeriodFilter;

const UA: &str = concat!(
    "bareminimum/",
    env!("CARGO_PKG_VERSION"),
    " (+https://github.com/alphavelocity/bareminimum)"
);

pub fn http_client() -> Result<reqwest::blocking::Client> {
    let c = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(15))
        .user_agent(UA)
        .build()?;
    Ok(c)
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

/// `YYYY-MM` into a month filter.
pub fn parse_month(s: &str) -> Result<PeriodFilter> {
    let d = NaiveDate::parse_from_str(&format!("{}-01", s.trim()), "%Y-%m-%d")
        .with_context(|| format!("Invalid month '{}', expected YYYY-MM", s))?;
    Ok(PeriodFilter::month_of(d.year(), d.month()))
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .trim_start_matches('₹')
        .replace(',', "")
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

/// Month filter from the `--month` (1-12 or YYYY-MM) and `--year` flags; the
/// word "all" or a missing flag leaves that part open.
pub fn period_from_args(month: Option<&str>, year: Option<&str>) -> Result<PeriodFilter> {
    let mut filter = PeriodFilter::all();
    if let Some(m) = month.map(str::trim).filter(|m| !m.eq_ignore_ascii_case("all")) {
        if m.contains('-') {
            filter = parse_month(m)?;
        } else {
            let n: u32 = m
                .parse()
                .with_context(|| format!("Invalid month '{}', expected 1-12", m))?;
            if !(1..=12).contains(&n) {
                return Err(anyhow!("Invalid month {}, expected 1-12", n));
            }
            filter.month = Some(n);
        }
    }
    if let Some(y) = year.map(str::trim).filter(|y| !y.eq_ignore_ascii_case("all")) {
        let n: i32 = y
            .parse()
            .with_context(|| format!("Invalid year '{}'", y))?;
        filter.year = Some(n);
    }
    Ok(filter)
}

/// Rupee amount with Indian digit grouping, e.g. `₹1,23,456.50`.
pub fn fmt_inr(d: &Decimal) -> String {
    let rounded = d.round_dp(2);
    let neg = rounded.is_sign_negative() && !rounded.is_zero();
    let s = format!("{:.2}", rounded.abs());
    let (int_part, frac) = s.split_once('.').unwrap_or((s.as_str(), "00"));

    let grouped = if int_part.len() <= 3 {
        int_part.to_string()
    } else {
        let (head, tail) = int_part.split_at(int_part.len() - 3);
        let mut parts: Vec<&str> = Vec::new();
        let mut rest = head;
        while rest.len() > 2 {
            let (l, r) = rest.split_at(rest.len() - 2);
            parts.push(r);
            rest = l;
        }
        if !rest.is_empty() {
            parts.push(rest);
        }
        parts.reverse();
        format!("{},{}", parts.join(","), tail)
    };
    format!("{}₹{}.{}", if neg { "-" } else { "" }, grouped, frac)
}

pub fn fmt_pct(d: &Decimal) -> String {
    format!("{:.1}%", d.round_dp(1))
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
        // If v is an array, stream each element; else stream single line
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
