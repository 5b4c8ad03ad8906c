// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Hosted backend seam. Sync and the investment commands only talk to these
//! traits; `SupabaseClient` is the HTTP adapter and `MemoryRepository` the
//! in-process one.

mod memory;
mod supabase;

pub use memory::MemoryRepository;
pub use supabase::SupabaseClient;

use crate::error::TrackerResult;
use crate::models::{Expense, Investment, InvestmentDraft, PaymentMode};

pub trait ExpenseRepository {
    /// Inserts the record without its client id; the returned copy carries the
    /// server-assigned one.
    fn create(&self, user_id: &str, expense: &Expense) -> TrackerResult<Expense>;
    /// All records owned by the user, newest first.
    fn list_by_user(&self, user_id: &str) -> TrackerResult<Vec<Expense>>;
    fn delete_by_id(&self, id: &str) -> TrackerResult<()>;
    fn update_mode(&self, id: &str, mode: PaymentMode) -> TrackerResult<()>;
}

pub trait InvestmentRepository {
    fn create_investment(&self, user_id: &str, draft: &InvestmentDraft)
    -> TrackerResult<Investment>;
    fn list_investments(&self, user_id: &str) -> TrackerResult<Vec<Investment>>;
}
