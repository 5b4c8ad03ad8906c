// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{ExpenseRepository, InvestmentRepository};
use crate::error::{TrackerError, TrackerResult};
use crate::models::{Expense, Investment, InvestmentDraft, PaymentMode};
use std::cell::{Cell, RefCell};

/// Stand-in for the hosted tables. Like the real service it assigns its own
/// ids on insert and does not deduplicate.
#[derive(Default)]
pub struct MemoryRepository {
    expenses: RefCell<Vec<(String, Expense)>>,
    investments: RefCell<Vec<(String, Investment)>>,
    next_id: Cell<u64>,
    offline: Cell<bool>,
    rejected_merchants: RefCell<Vec<String>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call fails while offline.
    pub fn set_offline(&self, offline: bool) {
        self.offline.set(offline);
    }

    /// Inserts for this merchant fail, everything else succeeds.
    pub fn reject_merchant(&self, merchant: &str) {
        self.rejected_merchants
            .borrow_mut()
            .push(merchant.to_string());
    }

    /// Stores a row as-is, keeping its id.
    pub fn seed(&self, user_id: &str, expense: Expense) {
        let mut e = expense;
        e.synced = true;
        self.expenses.borrow_mut().push((user_id.to_string(), e));
    }

    pub fn rows(&self, user_id: &str) -> Vec<Expense> {
        self.expenses
            .borrow()
            .iter()
            .filter(|(u, _)| u == user_id)
            .map(|(_, e)| e.clone())
            .collect()
    }

    fn online(&self) -> TrackerResult<()> {
        if self.offline.get() {
            return Err(TrackerError::Remote("network unreachable".into()));
        }
        Ok(())
    }

    fn assign_id(&self) -> String {
        let n = self.next_id.get() + 1;
        self.next_id.set(n);
        format!("srv-{}", n)
    }
}

impl ExpenseRepository for MemoryRepository {
    fn create(&self, user_id: &str, expense: &Expense) -> TrackerResult<Expense> {
        self.online()?;
        if self
            .rejected_merchants
            .borrow()
            .iter()
            .any(|m| m == &expense.merchant)
        {
            return Err(TrackerError::Remote(format!(
                "insert rejected for merchant '{}'",
                expense.merchant
            )));
        }
        let mut row = expense.clone();
        row.id = self.assign_id();
        row.synced = true;
        self.expenses
            .borrow_mut()
            .push((user_id.to_string(), row.clone()));
        Ok(row)
    }

    fn list_by_user(&self, user_id: &str) -> TrackerResult<Vec<Expense>> {
        self.online()?;
        let mut rows = self.rows(user_id);
        rows.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(rows)
    }

    fn delete_by_id(&self, id: &str) -> TrackerResult<()> {
        self.online()?;
        self.expenses.borrow_mut().retain(|(_, e)| e.id != id);
        Ok(())
    }

    fn update_mode(&self, id: &str, mode: PaymentMode) -> TrackerResult<()> {
        self.online()?;
        for (_, e) in self.expenses.borrow_mut().iter_mut() {
            if e.id == id {
                e.mode = mode;
            }
        }
        Ok(())
    }
}

impl InvestmentRepository for MemoryRepository {
    fn create_investment(
        &self,
        user_id: &str,
        draft: &InvestmentDraft,
    ) -> TrackerResult<Investment> {
        self.online()?;
        let inv = Investment {
            id: self.assign_id(),
            kind: draft.kind,
            name: draft
                .name
                .clone()
                .unwrap_or_else(|| format!("{} Investment", draft.kind)),
            amount: draft.amount,
            current_value: draft.current_value,
            expected_return: draft.expected_return,
            date: draft.date,
            notes: draft.notes.clone(),
        };
        self.investments
            .borrow_mut()
            .push((user_id.to_string(), inv.clone()));
        Ok(inv)
    }

    fn list_investments(&self, user_id: &str) -> TrackerResult<Vec<Investment>> {
        self.online()?;
        let mut rows: Vec<Investment> = self
            .investments
            .borrow()
            .iter()
            .filter(|(u, _)| u == user_id)
            .map(|(_, i)| i.clone())
            .collect();
        rows.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(rows)
    }
}
