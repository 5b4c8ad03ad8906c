// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMode {
    #[serde(rename = "UPI")]
    Upi,
    Cash,
    Card,
    Netbanking,
}

impl PaymentMode {
    pub const ALL: [PaymentMode; 4] = [
        PaymentMode::Upi,
        PaymentMode::Cash,
        PaymentMode::Card,
        PaymentMode::Netbanking,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMode::Upi => "UPI",
            PaymentMode::Cash => "Cash",
            PaymentMode::Card => "Card",
            PaymentMode::Netbanking => "Netbanking",
        }
    }
}

impl fmt::Display for PaymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "upi" => Ok(PaymentMode::Upi),
            "cash" => Ok(PaymentMode::Cash),
            "card" => Ok(PaymentMode::Card),
            "netbanking" | "net-banking" | "net banking" => Ok(PaymentMode::Netbanking),
            other => Err(format!(
                "Unknown payment mode '{}', expected UPI|Cash|Card|Netbanking",
                other
            )),
        }
    }
}

/// A single spend record. `quick` is derived from the merchant at capture time;
/// `synced` is only ever set by reconciliation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: String,
    pub amount: Decimal,
    pub mode: PaymentMode,
    pub merchant: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub quick: bool,
    #[serde(default)]
    pub synced: bool,
}

/// Raw form input for a new expense, before validation.
#[derive(Debug, Clone, Default)]
pub struct ExpenseDraft {
    pub amount: Decimal,
    pub mode: Option<PaymentMode>,
    pub merchant: Option<String>,
    pub category: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub upi_daily_limit: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_added_id: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            upi_daily_limit: Decimal::from(400),
            last_added_id: None,
        }
    }
}

/// Everything stored under one profile or user key.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SlotData {
    #[serde(default)]
    pub expenses: Vec<Expense>,
    #[serde(default)]
    pub settings: Settings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum InvestmentType {
    #[serde(rename = "Equity Stocks")]
    Equity,
    #[serde(rename = "Mutual Funds & SIP")]
    MutualFund,
    #[serde(rename = "NPS (Tier 1)")]
    NpsTier1,
    #[serde(rename = "NPS (Tier 2)")]
    NpsTier2,
    #[serde(rename = "EPF")]
    Epf,
    #[serde(rename = "PPF")]
    Ppf,
    #[serde(rename = "Fixed Deposit")]
    FixedDeposit,
    #[serde(rename = "Recurring Deposit")]
    RecurringDeposit,
    #[serde(rename = "Gold/Commodities")]
    Gold,
    #[serde(rename = "Crypto/Digital")]
    Crypto,
}

impl InvestmentType {
    pub const ALL: [InvestmentType; 10] = [
        InvestmentType::Equity,
        InvestmentType::MutualFund,
        InvestmentType::NpsTier1,
        InvestmentType::NpsTier2,
        InvestmentType::Epf,
        InvestmentType::Ppf,
        InvestmentType::FixedDeposit,
        InvestmentType::RecurringDeposit,
        InvestmentType::Gold,
        InvestmentType::Crypto,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            InvestmentType::Equity => "Equity Stocks",
            InvestmentType::MutualFund => "Mutual Funds & SIP",
            InvestmentType::NpsTier1 => "NPS (Tier 1)",
            InvestmentType::NpsTier2 => "NPS (Tier 2)",
            InvestmentType::Epf => "EPF",
            InvestmentType::Ppf => "PPF",
            InvestmentType::FixedDeposit => "Fixed Deposit",
            InvestmentType::RecurringDeposit => "Recurring Deposit",
            InvestmentType::Gold => "Gold/Commodities",
            InvestmentType::Crypto => "Crypto/Digital",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            InvestmentType::Equity => "equity",
            InvestmentType::MutualFund => "mf",
            InvestmentType::NpsTier1 => "nps1",
            InvestmentType::NpsTier2 => "nps2",
            InvestmentType::Epf => "epf",
            InvestmentType::Ppf => "ppf",
            InvestmentType::FixedDeposit => "fd",
            InvestmentType::RecurringDeposit => "rd",
            InvestmentType::Gold => "gold",
            InvestmentType::Crypto => "crypto",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            InvestmentType::Equity => "📈",
            InvestmentType::MutualFund => "💰",
            InvestmentType::NpsTier1 => "🏦",
            InvestmentType::NpsTier2 => "💳",
            InvestmentType::Epf => "👨‍💼",
            InvestmentType::Ppf => "👨‍🌾",
            InvestmentType::FixedDeposit => "🏛️",
            InvestmentType::RecurringDeposit => "🔄",
            InvestmentType::Gold => "🥇",
            InvestmentType::Crypto => "₿",
        }
    }
}

impl fmt::Display for InvestmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for InvestmentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        let alias = match needle.as_str() {
            "stocks" | "stock" => Some(InvestmentType::Equity),
            "sip" | "mutual-fund" | "mutual fund" => Some(InvestmentType::MutualFund),
            "gold/commodities" | "commodities" => Some(InvestmentType::Gold),
            _ => None,
        };
        if let Some(t) = alias {
            return Ok(t);
        }
        InvestmentType::ALL
            .into_iter()
            .find(|t| t.slug() == needle || t.label().to_lowercase() == needle)
            .ok_or_else(|| {
                let slugs: Vec<&str> = InvestmentType::ALL.iter().map(|t| t.slug()).collect();
                format!("Unknown investment type '{}', expected one of {}", s, slugs.join("|"))
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Investment {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: InvestmentType,
    pub name: String,
    pub amount: Decimal,
    pub current_value: Decimal,
    pub expected_return: Decimal,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Investment {
    pub fn gain(&self) -> Decimal {
        self.current_value - self.amount
    }

    pub fn gain_pct(&self) -> Decimal {
        if self.amount.is_zero() {
            Decimal::ZERO
        } else {
            self.gain() / self.amount * Decimal::ONE_HUNDRED
        }
    }
}

#[derive(Debug, Clone)]
pub struct InvestmentDraft {
    pub kind: InvestmentType,
    pub name: Option<String>,
    pub amount: Decimal,
    pub current_value: Decimal,
    pub expected_return: Decimal,
    pub date: NaiveDate,
    pub notes: Option<String>,
}

/// Identity handed back by the hosted auth service. Only the id and email are
/// read; the token is replayed as a bearer credential.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub email: Option<String>,
    pub access_token: String,
}
