// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("Enter a valid amount (got {0}); amounts must be greater than zero")]
    InvalidAmount(Decimal),

    #[error("Pick a category before saving the expense")]
    MissingCategory,

    #[error("Create or select a profile to start")]
    NoActiveSlot,

    #[error("Profile name must not be empty")]
    EmptyProfileName,

    #[error("Profile '{0}' not found")]
    ProfileNotFound(String),

    #[error("Expense '{0}' not found")]
    ExpenseNotFound(String),

    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("Not signed in; run `bareminimum auth login` first")]
    NotSignedIn,

    #[error("Remote store not configured; set BAREMIN_SUPABASE_URL and BAREMIN_SUPABASE_ANON_KEY or run `config set-remote`")]
    RemoteNotConfigured,

    #[error("Invalid investment: {0}")]
    InvalidInvestment(String),

    #[error("Remote request failed: {0}")]
    Remote(String),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Could not (de)serialize stored value: {0}")]
    Serde(#[from] serde_json::Error),
}

impl From<reqwest::Error> for TrackerError {
    fn from(e: reqwest::Error) -> Self {
        TrackerError::Remote(e.to_string())
    }
}

pub type TrackerResult<T> = std::result::Result<T, TrackerError>;
