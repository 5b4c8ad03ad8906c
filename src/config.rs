// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{TrackerError, TrackerResult};
use crate::models::Session;
use crate::store::{KvStore, REMOTE_CONFIG_KEY, SESSION_KEY};
use serde::{Deserialize, Serialize};

pub const URL_ENV: &str = "BAREMIN_SUPABASE_URL";
pub const ANON_KEY_ENV: &str = "BAREMIN_SUPABASE_ANON_KEY";
pub const LOG_ENV: &str = "BAREMIN_LOG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteConfig {
    pub url: String,
    pub anon_key: String,
}

impl RemoteConfig {
    pub fn new(url: &str, anon_key: &str) -> Self {
        Self {
            url: url.trim().trim_end_matches('/').to_string(),
            anon_key: anon_key.trim().to_string(),
        }
    }

    pub fn from_env() -> Option<Self> {
        let url = std::env::var(URL_ENV).ok()?;
        let key = std::env::var(ANON_KEY_ENV).ok()?;
        if url.trim().is_empty() || key.trim().is_empty() {
            return None;
        }
        Some(Self::new(&url, &key))
    }

    /// Environment wins over the stored value.
    pub fn resolve<S: KvStore>(store: &S) -> TrackerResult<Self> {
        if let Some(c) = Self::from_env() {
            return Ok(c);
        }
        store
            .get_json::<RemoteConfig>(REMOTE_CONFIG_KEY)?
            .ok_or(TrackerError::RemoteNotConfigured)
    }

    pub fn save<S: KvStore>(&self, store: &S) -> TrackerResult<()> {
        store.set_json(REMOTE_CONFIG_KEY, self)
    }
}

pub fn load_session<S: KvStore>(store: &S) -> TrackerResult<Option<Session>> {
    store.get_json(SESSION_KEY)
}

pub fn require_session<S: KvStore>(store: &S) -> TrackerResult<Session> {
    load_session(store)?.ok_or(TrackerError::NotSignedIn)
}

pub fn save_session<S: KvStore>(store: &S, session: &Session) -> TrackerResult<()> {
    store.set_json(SESSION_KEY, session)
}

pub fn clear_session<S: KvStore>(store: &S) -> TrackerResult<()> {
    store.remove(SESSION_KEY)
}

/// Hides all but the last four characters of a key for display.
pub fn mask_key(key: &str) -> String {
    let n = key.chars().count();
    if n <= 4 {
        return "*".repeat(n);
    }
    let tail: String = key.chars().skip(n - 4).collect();
    format!("{}{}", "*".repeat(n - 4), tail)
}
