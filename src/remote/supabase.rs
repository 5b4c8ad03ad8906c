// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{ExpenseRepository, InvestmentRepository};
use crate::catalog::{is_quick_commerce, normalize_category};
use crate::config::RemoteConfig;
use crate::error::{TrackerError, TrackerResult};
use crate::models::{Expense, Investment, InvestmentDraft, InvestmentType, PaymentMode, Session};
use crate::utils::http_client;
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::blocking::{RequestBuilder, Response};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;

const EXPENSES_TABLE: &str = "transactions";
const INVESTMENTS_TABLE: &str = "investments";

/// PostgREST + GoTrue client for a hosted Supabase project.
pub struct SupabaseClient {
    http: reqwest::blocking::Client,
    config: RemoteConfig,
    access_token: Option<String>,
}

// Server ids may be integers or uuids depending on the table definition.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RowId {
    Text(String),
    Number(i64),
}

impl RowId {
    fn into_string(self) -> String {
        match self {
            RowId::Text(s) => s,
            RowId::Number(n) => n.to_string(),
        }
    }
}

#[derive(Serialize)]
struct NewTransactionRow<'a> {
    user_id: &'a str,
    amount: Decimal,
    category: &'a str,
    payment_method: PaymentMode,
    merchant: &'a str,
    description: Option<&'a str>,
    date: DateTime<Utc>,
}

#[derive(Deserialize)]
struct TransactionRow {
    id: RowId,
    amount: Decimal,
    category: String,
    payment_method: String,
    #[serde(default)]
    merchant: Option<String>,
    #[serde(default)]
    description: Option<String>,
    date: DateTime<Utc>,
}

impl TransactionRow {
    fn into_expense(self) -> Expense {
        let id = self.id.into_string();
        let mode = self.payment_method.parse::<PaymentMode>().unwrap_or_else(|e| {
            log::warn!("row {}: {}; treating as UPI", id, e);
            PaymentMode::Upi
        });
        let merchant = self
            .merchant
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| "Unknown".to_string());
        let category = normalize_category(&self.category).unwrap_or(self.category);
        Expense {
            quick: is_quick_commerce(&merchant),
            id,
            amount: self.amount,
            mode,
            merchant,
            category,
            note: self.description.filter(|d| !d.is_empty()),
            timestamp: self.date,
            synced: true,
        }
    }
}

#[derive(Serialize)]
struct NewInvestmentRow<'a> {
    user_id: &'a str,
    #[serde(rename = "type")]
    kind: InvestmentType,
    name: String,
    amount: Decimal,
    current_value: Decimal,
    expected_return: Decimal,
    date: NaiveDate,
    notes: Option<&'a str>,
}

#[derive(Deserialize)]
struct InvestmentRow {
    id: RowId,
    #[serde(rename = "type")]
    kind: InvestmentType,
    #[serde(default)]
    name: Option<String>,
    amount: Decimal,
    current_value: Decimal,
    #[serde(default)]
    expected_return: Option<Decimal>,
    date: NaiveDate,
    #[serde(default)]
    notes: Option<String>,
}

impl InvestmentRow {
    fn into_investment(self) -> Investment {
        Investment {
            id: self.id.into_string(),
            name: self
                .name
                .unwrap_or_else(|| format!("{} Investment", self.kind)),
            kind: self.kind,
            amount: self.amount,
            current_value: self.current_value,
            expected_return: self.expected_return.unwrap_or(Decimal::ZERO),
            date: self.date,
            notes: self.notes,
        }
    }
}

#[derive(Deserialize)]
struct AuthUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

#[derive(Deserialize)]
struct AuthResponse {
    access_token: String,
    user: AuthUser,
}

fn check(resp: Response) -> TrackerResult<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().unwrap_or_default();
    Err(TrackerError::Remote(format!("{} {}", status, body.trim())))
}

impl SupabaseClient {
    pub fn new(config: RemoteConfig, session: Option<&Session>) -> anyhow::Result<Self> {
        Ok(Self {
            http: http_client()?,
            config,
            access_token: session.map(|s| s.access_token.clone()),
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.config.url, table)
    }

    fn authed(&self, rb: RequestBuilder) -> RequestBuilder {
        let bearer = self
            .access_token
            .as_deref()
            .unwrap_or(&self.config.anon_key);
        rb.header("apikey", &self.config.anon_key)
            .bearer_auth(bearer)
    }

    /// Email/password grant. The password is sent once and never stored.
    pub fn sign_in_with_password(&self, email: &str, password: &str) -> TrackerResult<Session> {
        let url = format!("{}/auth/v1/token", self.config.url);
        let resp = self
            .http
            .post(url)
            .query(&[("grant_type", "password")])
            .header("apikey", &self.config.anon_key)
            .json(&json!({ "email": email, "password": password }))
            .send()?;
        let auth: AuthResponse = check(resp)?.json()?;
        Ok(Session {
            user_id: auth.user.id,
            email: auth.user.email,
            access_token: auth.access_token,
        })
    }

    pub fn sign_out(&self) -> TrackerResult<()> {
        let url = format!("{}/auth/v1/logout", self.config.url);
        check(self.authed(self.http.post(url)).send()?)?;
        Ok(())
    }
}

impl ExpenseRepository for SupabaseClient {
    fn create(&self, user_id: &str, expense: &Expense) -> TrackerResult<Expense> {
        let row = NewTransactionRow {
            user_id,
            amount: expense.amount,
            category: &expense.category,
            payment_method: expense.mode,
            merchant: &expense.merchant,
            description: expense.note.as_deref(),
            date: expense.timestamp,
        };
        let resp = self
            .authed(self.http.post(self.table_url(EXPENSES_TABLE)))
            .header("Prefer", "return=representation")
            .json(&[row])
            .send()?;
        let mut rows: Vec<TransactionRow> = check(resp)?.json()?;
        if rows.is_empty() {
            return Err(TrackerError::Remote("insert returned no rows".into()));
        }
        Ok(rows.swap_remove(0).into_expense())
    }

    fn list_by_user(&self, user_id: &str) -> TrackerResult<Vec<Expense>> {
        let resp = self
            .authed(self.http.get(self.table_url(EXPENSES_TABLE)))
            .query(&[
                ("select", "*".to_string()),
                ("user_id", format!("eq.{}", user_id)),
                ("order", "date.desc".to_string()),
            ])
            .send()?;
        let rows: Vec<TransactionRow> = check(resp)?.json()?;
        Ok(rows.into_iter().map(TransactionRow::into_expense).collect())
    }

    fn delete_by_id(&self, id: &str) -> TrackerResult<()> {
        let resp = self
            .authed(self.http.delete(self.table_url(EXPENSES_TABLE)))
            .query(&[("id", format!("eq.{}", id))])
            .send()?;
        check(resp)?;
        Ok(())
    }

    fn update_mode(&self, id: &str, mode: PaymentMode) -> TrackerResult<()> {
        let resp = self
            .authed(self.http.patch(self.table_url(EXPENSES_TABLE)))
            .query(&[("id", format!("eq.{}", id))])
            .json(&json!({ "payment_method": mode }))
            .send()?;
        check(resp)?;
        Ok(())
    }
}

impl InvestmentRepository for SupabaseClient {
    fn create_investment(
        &self,
        user_id: &str,
        draft: &InvestmentDraft,
    ) -> TrackerResult<Investment> {
        let row = NewInvestmentRow {
            user_id,
            kind: draft.kind,
            name: draft
                .name
                .clone()
                .unwrap_or_else(|| format!("{} Investment", draft.kind)),
            amount: draft.amount,
            current_value: draft.current_value,
            expected_return: draft.expected_return,
            date: draft.date,
            notes: draft.notes.as_deref(),
        };
        let resp = self
            .authed(self.http.post(self.table_url(INVESTMENTS_TABLE)))
            .header("Prefer", "return=representation")
            .json(&[row])
            .send()?;
        let mut rows: Vec<InvestmentRow> = check(resp)?.json()?;
        if rows.is_empty() {
            return Err(TrackerError::Remote("insert returned no rows".into()));
        }
        Ok(rows.swap_remove(0).into_investment())
    }

    fn list_investments(&self, user_id: &str) -> TrackerResult<Vec<Investment>> {
        let resp = self
            .authed(self.http.get(self.table_url(INVESTMENTS_TABLE)))
            .query(&[
                ("select", "*".to_string()),
                ("user_id", format!("eq.{}", user_id)),
                ("order", "date.desc".to_string()),
            ])
            .send()?;
        let rows: Vec<InvestmentRow> = check(resp)?.json()?;
        Ok(rows.into_iter().map(InvestmentRow::into_investment).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregates::category_breakdown;
    use crate::catalog::category_emoji;

    #[test]
    fn transaction_rows_map_to_synced_expenses() {
        let raw = r#"[
            {"id": 17, "amount": 249.5, "category": "🥦 Groceries", "payment_method": "UPI",
             "merchant": "Zepto", "description": "", "date": "2025-05-02T10:15:00Z"},
            {"id": "9b2c", "amount": "80", "category": "Misc", "payment_method": "cheque",
             "merchant": null, "date": "2025-05-01T08:00:00+05:30"}
        ]"#;
        let rows: Vec<TransactionRow> = serde_json::from_str(raw).unwrap();
        let list: Vec<Expense> = rows.into_iter().map(TransactionRow::into_expense).collect();

        assert_eq!(list[0].id, "17");
        assert_eq!(list[0].amount, Decimal::new(2495, 1));
        assert!(list[0].quick);
        assert!(list[0].synced);
        assert_eq!(list[0].note, None);
        assert_eq!(list[0].category, "Groceries");
        assert_eq!(category_emoji(&list[0].category), "🥦");

        assert_eq!(list[1].id, "9b2c");
        assert_eq!(list[1].mode, PaymentMode::Upi);
        assert_eq!(list[1].merchant, "Unknown");
        assert_eq!(list[1].timestamp.to_rfc3339(), "2025-05-01T02:30:00+00:00");
    }

    #[test]
    fn emoji_labels_share_a_breakdown_row_with_local_records() {
        let raw = r#"{"id": 3, "amount": 100, "category": "🥦 Groceries",
            "payment_method": "UPI", "merchant": "Store", "date": "2025-05-02T10:15:00Z"}"#;
        let remote = serde_json::from_str::<TransactionRow>(raw)
            .unwrap()
            .into_expense();
        let mut local = remote.clone();
        local.id = "local".into();
        local.category = "Groceries".into();

        let breakdown = category_breakdown([&local, &remote]);
        assert_eq!(breakdown.len(), 1);
        assert_eq!(breakdown[0].amount, Decimal::from(200));
    }

    #[test]
    fn new_rows_use_wire_names() {
        let row = NewInvestmentRow {
            user_id: "u1",
            kind: InvestmentType::Ppf,
            name: "PPF".into(),
            amount: Decimal::from(500),
            current_value: Decimal::from(520),
            expected_return: Decimal::new(71, 1),
            date: NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
            notes: None,
        };
        let v = serde_json::to_value(&row).unwrap();
        assert_eq!(v["type"], "PPF");
        assert_eq!(v["date"], "2025-04-01");
        assert!(v.get("kind").is_none());
    }
}
