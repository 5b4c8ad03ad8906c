// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregates::{
    CategoryShare, MonthTotal, PeriodFilter, PortfolioSummary, category_breakdown,
    category_shares, filter_by_period, monthly_trend, net_worth_impact, period_label,
    portfolio_summary, total,
};
use crate::catalog::strip_emoji;
use crate::commands::{connect, open_state};
use crate::config::load_session;
use crate::models::{Expense, Investment};
use crate::remote::InvestmentRepository;
use crate::store::KvStore;
use crate::utils::{fmt_inr, fmt_pct, maybe_print_json, parse_month, pretty_table};
use anyhow::Result;
use chrono::{DateTime, Datelike, Local, TimeZone};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct AnalyticsReport {
    pub month: PeriodFilter,
    pub month_spend: Decimal,
    pub categories: Vec<CategoryShare>,
    pub trend: Vec<MonthTotal>,
    pub portfolio: Option<PortfolioSummary>,
    pub net_worth_impact: Decimal,
}

pub fn build_report<Tz: TimeZone>(
    expenses: &[Expense],
    investments: Option<&[Investment]>,
    month: PeriodFilter,
    months: usize,
    now: &DateTime<Tz>,
) -> AnalyticsReport {
    let tz = now.timezone();
    let in_month = filter_by_period(expenses, &month, &tz);
    let month_spend = total(in_month.iter().copied());
    let categories = category_shares(&category_breakdown(in_month.iter().copied()));
    let portfolio = investments.map(portfolio_summary);
    AnalyticsReport {
        month,
        month_spend,
        categories,
        trend: monthly_trend(expenses, now, months),
        net_worth_impact: net_worth_impact(portfolio.as_ref(), month_spend),
        portfolio,
    }
}

pub fn handle<S: KvStore>(store: &S, m: &clap::ArgMatches) -> Result<()> {
    let state = open_state(store, m)?;
    let now = Local::now();
    let month = match m.get_one::<String>("month") {
        Some(s) => parse_month(s)?,
        None => PeriodFilter::month_of(now.year(), now.month()),
    };
    let months = usize::from(*m.get_one::<u16>("months").unwrap_or(&6));

    // Portfolio data only exists remotely; without a session the report is
    // expenses-only, and a failed fetch is logged rather than fatal.
    let investments = if load_session(store)?.is_some() {
        match connect(store).and_then(|r| {
            r.client
                .list_investments(&r.session.user_id)
                .map_err(Into::into)
        }) {
            Ok(rows) => Some(rows),
            Err(e) => {
                log::error!("analytics: fetching investments failed: {:#}", e);
                None
            }
        }
    } else {
        None
    };

    let report = build_report(state.expenses(), investments.as_deref(), month, months, &now);
    if !maybe_print_json(m.get_flag("json"), m.get_flag("jsonl"), &report)? {
        print_report(&report);
    }
    Ok(())
}

fn print_report(r: &AnalyticsReport) {
    println!(
        "Monthly spending ({}): {}",
        period_label(&r.month),
        fmt_inr(&r.month_spend)
    );
    match &r.portfolio {
        Some(p) => {
            println!("Total invested: {}", fmt_inr(&p.total_invested));
            println!("Portfolio return: {}", fmt_pct(&p.return_pct));
        }
        None => println!("No investment data yet"),
    }
    println!("Net worth impact: {}", fmt_inr(&r.net_worth_impact));

    if !r.categories.is_empty() {
        let rows = r
            .categories
            .iter()
            .map(|c| vec![strip_emoji(&c.category), fmt_inr(&c.amount), fmt_pct(&c.percent)])
            .collect();
        println!("{}", pretty_table(&["Category", "Spent", "Share"], rows));
    }

    if let Some(p) = &r.portfolio {
        let rows = p
            .allocation
            .iter()
            .map(|(kind, amt)| {
                let share = if p.total_invested.is_zero() {
                    Decimal::ZERO
                } else {
                    *amt / p.total_invested * Decimal::ONE_HUNDRED
                };
                vec![kind.to_string(), fmt_inr(amt), fmt_pct(&share)]
            })
            .collect();
        println!("{}", pretty_table(&["Investment", "Invested", "Share"], rows));
    }

    let rows = r
        .trend
        .iter()
        .map(|t| vec![t.label.clone(), fmt_inr(&t.total)])
        .collect();
    println!("{}", pretty_table(&["Month", "Expenses"], rows));
}
