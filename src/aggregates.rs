// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Derived views over a record list. Nothing here holds state or fails; "local"
//! calendar boundaries are taken from the time zone of the `now` (or `tz`)
//! argument.

use crate::models::{Expense, Investment, InvestmentType, PaymentMode, SlotData};
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::str::FromStr;

/// Calendar filter; `None` means "all".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PeriodFilter {
    /// 1-12
    pub month: Option<u32>,
    pub year: Option<i32>,
}

impl PeriodFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn month_of(year: i32, month: u32) -> Self {
        Self {
            month: Some(month),
            year: Some(year),
        }
    }

    pub fn matches<Tz: TimeZone>(&self, ts: &DateTime<Utc>, tz: &Tz) -> bool {
        let local = ts.with_timezone(tz);
        if let Some(m) = self.month {
            if local.month() != m {
                return false;
            }
        }
        if let Some(y) = self.year {
            if local.year() != y {
                return false;
            }
        }
        true
    }
}

impl Serialize for PeriodFilter {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        match (self.year, self.month) {
            (Some(y), Some(m)) => s.serialize_str(&format!("{:04}-{:02}", y, m)),
            _ => s.serialize_str(&period_label(self)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "newest" | "desc" => Ok(SortOrder::Newest),
            "oldest" | "asc" => Ok(SortOrder::Oldest),
            other => Err(format!("Unknown sort order '{}', expected newest|oldest", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryShare {
    pub category: String,
    pub amount: Decimal,
    pub percent: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthTotal {
    /// YYYY-MM
    pub month: String,
    pub label: String,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub label: String,
    pub count: usize,
    pub filtered_total: Decimal,
    pub today_total: Decimal,
    pub upi_today: Decimal,
    pub upi_limit: Decimal,
    pub upi_limit_exceeded: bool,
    pub categories: Vec<CategoryTotal>,
    /// Years with records, for picking a `--year` filter.
    pub years: Vec<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortfolioSummary {
    pub total_invested: Decimal,
    pub current_value: Decimal,
    pub total_return: Decimal,
    pub return_pct: Decimal,
    pub allocation: Vec<(InvestmentType, Decimal)>,
}

pub fn filter_by_period<'a, Tz: TimeZone>(
    expenses: &'a [Expense],
    filter: &PeriodFilter,
    tz: &Tz,
) -> Vec<&'a Expense> {
    expenses
        .iter()
        .filter(|e| filter.matches(&e.timestamp, tz))
        .collect()
}

pub fn total<'a, I>(expenses: I) -> Decimal
where
    I: IntoIterator<Item = &'a Expense>,
{
    expenses.into_iter().map(|e| e.amount).sum()
}

/// Local midnight of `now`'s day, in UTC. When the zone skips midnight the
/// day starts at the first local time that exists.
pub fn start_of_day<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Utc> {
    let tz = now.timezone();
    first_local_instant(now.date_naive(), |t| {
        tz.from_local_datetime(&t)
            .earliest()
            .map(|d| d.with_timezone(&Utc))
    })
    .unwrap_or_else(|| now.with_timezone(&Utc))
}

/// Earliest minute of `day` that `resolve` maps to an instant.
pub fn first_local_instant<F>(day: NaiveDate, resolve: F) -> Option<DateTime<Utc>>
where
    F: Fn(NaiveDateTime) -> Option<DateTime<Utc>>,
{
    let midnight = day.and_hms_opt(0, 0, 0)?;
    (0..24 * 60)
        .map(|m| midnight + Duration::minutes(m))
        .find_map(resolve)
}

/// Records stamped between local midnight and `now`, both inclusive.
pub fn today_expenses<'a, Tz: TimeZone>(
    expenses: &'a [Expense],
    now: &DateTime<Tz>,
) -> Vec<&'a Expense> {
    let start = start_of_day(now);
    let end = now.with_timezone(&Utc);
    expenses
        .iter()
        .filter(|e| e.timestamp >= start && e.timestamp <= end)
        .collect()
}

pub fn today_total<Tz: TimeZone>(expenses: &[Expense], now: &DateTime<Tz>) -> Decimal {
    total(today_expenses(expenses, now))
}

pub fn upi_today<Tz: TimeZone>(expenses: &[Expense], now: &DateTime<Tz>) -> Decimal {
    total(
        today_expenses(expenses, now)
            .into_iter()
            .filter(|e| e.mode == PaymentMode::Upi),
    )
}

/// Strictly above the limit; spending exactly the limit is fine.
pub fn upi_limit_exceeded(upi_today: Decimal, limit: Decimal) -> bool {
    upi_today > limit
}

/// Sum per category, largest first; equal sums are ordered by name.
pub fn category_breakdown<'a, I>(expenses: I) -> Vec<CategoryTotal>
where
    I: IntoIterator<Item = &'a Expense>,
{
    let mut agg: HashMap<&str, Decimal> = HashMap::new();
    for e in expenses {
        *agg.entry(e.category.as_str()).or_insert(Decimal::ZERO) += e.amount;
    }
    let mut items: Vec<CategoryTotal> = agg
        .into_iter()
        .map(|(category, amount)| CategoryTotal {
            category: category.to_string(),
            amount,
        })
        .collect();
    items.sort_by(|a, b| b.amount.cmp(&a.amount).then_with(|| a.category.cmp(&b.category)));
    items
}

pub fn category_shares(breakdown: &[CategoryTotal]) -> Vec<CategoryShare> {
    let sum: Decimal = breakdown.iter().map(|c| c.amount).sum();
    breakdown
        .iter()
        .map(|c| CategoryShare {
            category: c.category.clone(),
            amount: c.amount,
            percent: if sum.is_zero() {
                Decimal::ZERO
            } else {
                c.amount / sum * Decimal::ONE_HUNDRED
            },
        })
        .collect()
}

pub fn sort_expenses(expenses: &mut [&Expense], order: SortOrder) {
    match order {
        SortOrder::Newest => expenses.sort_by(|a, b| b.timestamp.cmp(&a.timestamp)),
        SortOrder::Oldest => expenses.sort_by(|a, b| a.timestamp.cmp(&b.timestamp)),
    }
}

/// Buckets already-sorted records by local calendar date, keeping the order
/// in which dates first appear.
pub fn group_by_date<'a, Tz: TimeZone>(
    sorted: &[&'a Expense],
    tz: &Tz,
) -> Vec<(NaiveDate, Vec<&'a Expense>)> {
    let mut groups: Vec<(NaiveDate, Vec<&'a Expense>)> = Vec::new();
    let mut index: HashMap<NaiveDate, usize> = HashMap::new();
    for &e in sorted {
        let d = e.timestamp.with_timezone(tz).date_naive();
        match index.get(&d) {
            Some(&i) => groups[i].1.push(e),
            None => {
                index.insert(d, groups.len());
                groups.push((d, vec![e]));
            }
        }
    }
    groups
}

/// Years present in the records, newest first, always including the current one.
pub fn year_options<Tz: TimeZone>(expenses: &[Expense], now: &DateTime<Tz>) -> Vec<i32> {
    let tz = now.timezone();
    let mut years: Vec<i32> = expenses
        .iter()
        .map(|e| e.timestamp.with_timezone(&tz).year())
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    let current = now.year();
    if !years.contains(&current) {
        years.push(current);
    }
    years.sort_by(|a, b| b.cmp(a));
    years
}

pub fn merchant_suggestions(expenses: &[Expense]) -> Vec<String> {
    let mut seen = HashSet::new();
    expenses
        .iter()
        .map(|e| e.merchant.trim())
        .filter(|m| !m.is_empty() && seen.insert(m.to_lowercase()))
        .map(str::to_string)
        .collect()
}

pub fn period_label(filter: &PeriodFilter) -> String {
    match (filter.month, filter.year) {
        (None, None) => "All time".to_string(),
        (None, Some(y)) => y.to_string(),
        (Some(m), year) => {
            let name = NaiveDate::from_ymd_opt(2020, m, 1)
                .map(|d| d.format("%b").to_string())
                .unwrap_or_else(|| format!("M{}", m));
            match year {
                Some(y) => format!("{} {}", name, y),
                None => name,
            }
        }
    }
}

/// Totals for the last `months` calendar months ending with `now`'s month,
/// oldest first.
pub fn monthly_trend<Tz: TimeZone>(
    expenses: &[Expense],
    now: &DateTime<Tz>,
    months: usize,
) -> Vec<MonthTotal> {
    let tz = now.timezone();
    let mut by_month: BTreeMap<(i32, u32), Decimal> = BTreeMap::new();
    for e in expenses {
        let local = e.timestamp.with_timezone(&tz);
        *by_month
            .entry((local.year(), local.month()))
            .or_insert(Decimal::ZERO) += e.amount;
    }

    let (mut y, mut m) = (now.year(), now.month());
    let mut out = Vec::new();
    for _ in 0..months {
        let label = NaiveDate::from_ymd_opt(y, m, 1)
            .map(|d| d.format("%b %y").to_string())
            .unwrap_or_default();
        out.push(MonthTotal {
            month: format!("{:04}-{:02}", y, m),
            label,
            total: by_month.get(&(y, m)).copied().unwrap_or(Decimal::ZERO),
        });
        if m == 1 {
            y -= 1;
            m = 12;
        } else {
            m -= 1;
        }
    }
    out.reverse();
    out
}

pub fn portfolio_summary(investments: &[Investment]) -> PortfolioSummary {
    let total_invested: Decimal = investments.iter().map(|i| i.amount).sum();
    let current_value: Decimal = investments.iter().map(|i| i.current_value).sum();
    let total_return = current_value - total_invested;
    let return_pct = if total_invested.is_zero() {
        Decimal::ZERO
    } else {
        total_return / total_invested * Decimal::ONE_HUNDRED
    };

    let mut alloc: BTreeMap<InvestmentType, Decimal> = BTreeMap::new();
    for i in investments {
        *alloc.entry(i.kind).or_insert(Decimal::ZERO) += i.amount;
    }
    let mut allocation: Vec<(InvestmentType, Decimal)> =
        alloc.into_iter().filter(|(_, v)| *v > Decimal::ZERO).collect();
    allocation.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    PortfolioSummary {
        total_invested,
        current_value,
        total_return,
        return_pct,
        allocation,
    }
}

/// Portfolio gain minus what was spent in the period.
pub fn net_worth_impact(portfolio: Option<&PortfolioSummary>, spent: Decimal) -> Decimal {
    portfolio.map(|p| p.total_return).unwrap_or(Decimal::ZERO) - spent
}

pub fn summarize<Tz: TimeZone>(
    data: &SlotData,
    filter: &PeriodFilter,
    now: &DateTime<Tz>,
) -> DashboardSummary {
    let tz = now.timezone();
    let filtered = filter_by_period(&data.expenses, filter, &tz);
    let upi = upi_today(&data.expenses, now);
    let limit = data.settings.upi_daily_limit;
    DashboardSummary {
        label: period_label(filter),
        count: filtered.len(),
        filtered_total: total(filtered.iter().copied()),
        today_total: today_total(&data.expenses, now),
        upi_today: upi,
        upi_limit: limit,
        upi_limit_exceeded: upi_limit_exceeded(upi, limit),
        categories: category_breakdown(filtered.iter().copied()),
        years: year_options(&data.expenses, now),
    }
}
