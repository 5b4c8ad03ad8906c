// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Local persistence port. Values are JSON strings keyed by versioned names,
//! one key per profile or signed-in user plus a few bookkeeping keys.

use crate::error::TrackerResult;
use rusqlite::{Connection, OptionalExtension, params};
use serde::{Serialize, de::DeserializeOwned};
use std::cell::RefCell;
use std::collections::BTreeMap;

pub const PROFILES_KEY: &str = "baremin_profiles_v3";
pub const ACTIVE_PROFILE_KEY: &str = "baremin_active_profile_v3";
pub const SESSION_KEY: &str = "baremin_session_v4";
pub const REMOTE_CONFIG_KEY: &str = "baremin_remote_v4";

pub fn profile_key(profile: &str) -> String {
    format!("baremin_v3_{}", profile)
}

pub fn user_key(user_id: &str) -> String {
    format!("baremin_v4_user_{}", user_id)
}

pub trait KvStore {
    fn get(&self, key: &str) -> TrackerResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> TrackerResult<()>;
    fn remove(&self, key: &str) -> TrackerResult<()>;

    fn get_json<T: DeserializeOwned>(&self, key: &str) -> TrackerResult<Option<T>>
    where
        Self: Sized,
    {
        match self.get(key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn set_json<T: Serialize>(&self, key: &str, value: &T) -> TrackerResult<()>
    where
        Self: Sized,
    {
        let raw = serde_json::to_string(value)?;
        self.set(key, &raw)
    }
}

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Wraps a connection whose schema is already initialised.
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn open_in_memory() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory()?;
        crate::db::init_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn open(path: &std::path::Path) -> anyhow::Result<Self> {
        let conn = Connection::open(path)?;
        crate::db::init_schema(&conn)?;
        Ok(Self { conn })
    }
}

impl KvStore for SqliteStore {
    fn get(&self, key: &str) -> TrackerResult<Option<String>> {
        let v: Option<String> = self
            .conn
            .query_row("SELECT value FROM kv WHERE key=?1", params![key], |r| {
                r.get(0)
            })
            .optional()?;
        Ok(v)
    }

    fn set(&self, key: &str, value: &str) -> TrackerResult<()> {
        self.conn.execute(
            "INSERT INTO kv(key, value) VALUES(?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value=excluded.value, updated_at=datetime('now')",
            params![key, value],
        )?;
        log::debug!("kv set {} ({} bytes)", key, value.len());
        Ok(())
    }

    fn remove(&self, key: &str) -> TrackerResult<()> {
        self.conn
            .execute("DELETE FROM kv WHERE key=?1", params![key])?;
        Ok(())
    }
}

/// In-process store for tests and dry runs.
#[derive(Default)]
pub struct MemoryStore {
    map: RefCell<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.map.borrow().clone()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> TrackerResult<Option<String>> {
        Ok(self.map.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> TrackerResult<()> {
        self.map
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> TrackerResult<()> {
        self.map.borrow_mut().remove(key);
        Ok(())
    }
}
