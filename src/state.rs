// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Application state: which slot is active, its records, and the store they
//! are written through. Every mutation persists the whole slot.

use crate::catalog::{is_quick_commerce, normalize_category, suggest_category};
use crate::error::{TrackerError, TrackerResult};
use crate::models::{Expense, ExpenseDraft, PaymentMode, SlotData};
use crate::store::{ACTIVE_PROFILE_KEY, KvStore, PROFILES_KEY, profile_key, user_key};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot {
    Profile(String),
    User(String),
}

impl Slot {
    pub fn key(&self) -> String {
        match self {
            Slot::Profile(name) => profile_key(name),
            Slot::User(id) => user_key(id),
        }
    }

    pub fn label(&self) -> String {
        match self {
            Slot::Profile(name) => format!("profile '{}'", name),
            Slot::User(id) => format!("user {}", id),
        }
    }
}

pub struct AppState<'s, S: KvStore> {
    store: &'s S,
    slot: Option<Slot>,
    data: SlotData,
}

impl<'s, S: KvStore> AppState<'s, S> {
    /// Opens the requested profile, or the last active one, or the first known
    /// one. With no profiles at all the state has no slot.
    pub fn open_profile(store: &'s S, requested: Option<&str>) -> TrackerResult<Self> {
        let profiles = read_profiles(store)?;
        let name = match requested.map(str::trim) {
            Some(n) => {
                if !profiles.iter().any(|p| p == n) {
                    return Err(TrackerError::ProfileNotFound(n.to_string()));
                }
                Some(n.to_string())
            }
            None => {
                let last: Option<String> = store.get_json(ACTIVE_PROFILE_KEY)?;
                last.filter(|p| profiles.contains(p))
                    .or_else(|| profiles.first().cloned())
            }
        };
        let mut state = Self {
            store,
            slot: None,
            data: SlotData::default(),
        };
        if let Some(n) = name {
            state.load_slot(Slot::Profile(n))?;
        }
        Ok(state)
    }

    pub fn for_user(store: &'s S, user_id: &str) -> TrackerResult<Self> {
        let mut state = Self {
            store,
            slot: None,
            data: SlotData::default(),
        };
        state.load_slot(Slot::User(user_id.to_string()))?;
        Ok(state)
    }

    fn load_slot(&mut self, slot: Slot) -> TrackerResult<()> {
        self.data = self.store.get_json(&slot.key())?.unwrap_or_default();
        self.slot = Some(slot);
        Ok(())
    }

    /// Writes `next` to the active slot, then adopts it. On a failed write the
    /// in-memory data is left as it was.
    fn commit(&mut self, next: SlotData) -> TrackerResult<()> {
        let slot = self.slot.as_ref().ok_or(TrackerError::NoActiveSlot)?;
        self.store.set_json(&slot.key(), &next)?;
        self.data = next;
        Ok(())
    }

    pub fn slot(&self) -> Option<&Slot> {
        self.slot.as_ref()
    }

    pub fn data(&self) -> &SlotData {
        &self.data
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.data.expenses
    }

    pub fn unsynced(&self) -> Vec<Expense> {
        self.data
            .expenses
            .iter()
            .filter(|e| !e.synced)
            .cloned()
            .collect()
    }

    pub fn profiles(&self) -> TrackerResult<Vec<String>> {
        read_profiles(self.store)
    }

    /// Returns `true` when a new profile was created, `false` when an existing
    /// one was just selected.
    pub fn create_profile(&mut self, name: &str) -> TrackerResult<bool> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TrackerError::EmptyProfileName);
        }
        let mut profiles = read_profiles(self.store)?;
        if profiles.iter().any(|p| p == name) {
            self.select_profile(name)?;
            return Ok(false);
        }
        profiles.push(name.to_string());
        self.store.set_json(PROFILES_KEY, &profiles)?;
        self.store
            .set_json(&profile_key(name), &SlotData::default())?;
        self.select_profile(name)?;
        log::info!("created profile {}", name);
        Ok(true)
    }

    pub fn select_profile(&mut self, name: &str) -> TrackerResult<()> {
        let profiles = read_profiles(self.store)?;
        if !profiles.iter().any(|p| p == name) {
            return Err(TrackerError::ProfileNotFound(name.to_string()));
        }
        self.load_slot(Slot::Profile(name.to_string()))?;
        self.store.set_json(ACTIVE_PROFILE_KEY, &name)?;
        Ok(())
    }

    /// Removes the profile and all of its records.
    pub fn delete_profile(&mut self, name: &str) -> TrackerResult<()> {
        let mut profiles = read_profiles(self.store)?;
        let before = profiles.len();
        profiles.retain(|p| p != name);
        if profiles.len() == before {
            return Err(TrackerError::ProfileNotFound(name.to_string()));
        }
        self.store.set_json(PROFILES_KEY, &profiles)?;
        self.store.remove(&profile_key(name))?;
        if self.slot == Some(Slot::Profile(name.to_string())) {
            self.slot = None;
            self.data = SlotData::default();
            self.store.remove(ACTIVE_PROFILE_KEY)?;
        }
        log::info!("deleted profile {}", name);
        Ok(())
    }

    pub fn add_expense(&mut self, draft: ExpenseDraft, now: DateTime<Utc>) -> TrackerResult<Expense> {
        if draft.amount <= Decimal::ZERO {
            return Err(TrackerError::InvalidAmount(draft.amount));
        }
        if self.slot.is_none() {
            return Err(TrackerError::NoActiveSlot);
        }
        let merchant = draft
            .merchant
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or("Unknown")
            .to_string();
        let category = draft
            .category
            .as_deref()
            .and_then(normalize_category)
            .or_else(|| suggest_category(&merchant).map(str::to_string))
            .ok_or(TrackerError::MissingCategory)?;
        let note = draft
            .note
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());

        let item = Expense {
            id: Uuid::new_v4().to_string(),
            amount: draft.amount,
            mode: draft.mode.unwrap_or(PaymentMode::Upi),
            quick: is_quick_commerce(&merchant),
            merchant,
            category,
            note,
            timestamp: now,
            synced: false,
        };
        let mut next = self.data.clone();
        next.expenses.insert(0, item.clone());
        next.settings.last_added_id = Some(item.id.clone());
        self.commit(next)?;
        Ok(item)
    }

    pub fn delete_expense(&mut self, id: &str) -> TrackerResult<Expense> {
        let idx = self
            .data
            .expenses
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| TrackerError::ExpenseNotFound(id.to_string()))?;
        let mut next = self.data.clone();
        let removed = next.expenses.remove(idx);
        if next.settings.last_added_id.as_deref() == Some(id) {
            next.settings.last_added_id = None;
        }
        self.commit(next)?;
        Ok(removed)
    }

    /// Changes the payment mode in place, e.g. "mark as cash".
    pub fn set_mode(&mut self, id: &str, mode: PaymentMode) -> TrackerResult<Expense> {
        let mut next = self.data.clone();
        let item = next
            .expenses
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| TrackerError::ExpenseNotFound(id.to_string()))?;
        item.mode = mode;
        let updated = item.clone();
        self.commit(next)?;
        Ok(updated)
    }

    pub fn undo_last(&mut self) -> TrackerResult<Expense> {
        let id = self
            .data
            .settings
            .last_added_id
            .clone()
            .ok_or(TrackerError::NothingToUndo)?;
        match self.delete_expense(&id) {
            Err(TrackerError::ExpenseNotFound(_)) => {
                let mut next = self.data.clone();
                next.settings.last_added_id = None;
                self.commit(next)?;
                Err(TrackerError::NothingToUndo)
            }
            other => other,
        }
    }

    pub fn set_upi_limit(&mut self, limit: Decimal) -> TrackerResult<()> {
        if limit <= Decimal::ZERO {
            return Err(TrackerError::InvalidAmount(limit));
        }
        let mut next = self.data.clone();
        next.settings.upi_daily_limit = limit;
        self.commit(next)
    }

    /// Overwrites the slot's record list; used by reconciliation.
    pub fn replace_expenses(&mut self, expenses: Vec<Expense>) -> TrackerResult<()> {
        let next = SlotData {
            expenses,
            ..self.data.clone()
        };
        self.commit(next)
    }
}

fn read_profiles<S: KvStore>(store: &S) -> TrackerResult<Vec<String>> {
    Ok(store.get_json(PROFILES_KEY)?.unwrap_or_default())
}
