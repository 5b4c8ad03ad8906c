// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Local/remote reconciliation and push.
//!
//! The merge is last-writer-wins with the remote side always winning: a local
//! edit to a record that already exists remotely is discarded on the next
//! pull. There is no per-field timestamp or conflict log.

use crate::error::TrackerResult;
use crate::models::Expense;
use crate::remote::ExpenseRepository;
use crate::state::AppState;
use crate::store::KvStore;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Remote records first (synced), then local records with unseen ids
/// (unsynced), newest first. Duplicate ids keep their first occurrence.
pub fn reconcile(local: &[Expense], remote: Vec<Expense>) -> Vec<Expense> {
    let mut seen: HashSet<String> = HashSet::with_capacity(remote.len() + local.len());
    let mut merged = Vec::with_capacity(remote.len() + local.len());

    for mut r in remote {
        if !seen.insert(r.id.clone()) {
            continue;
        }
        r.synced = true;
        merged.push(r);
    }
    for l in local {
        if !seen.insert(l.id.clone()) {
            continue;
        }
        let mut l = l.clone();
        l.synced = false;
        merged.push(l);
    }

    merged.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    merged
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct PullReport {
    pub remote: usize,
    pub local_only: usize,
    pub total: usize,
}

/// Fetches the user's remote records and merges them into the state, then
/// overwrites the slot. A failed fetch leaves the state and the store as they
/// were.
pub fn reconcile_with_remote<S, R>(
    state: &mut AppState<'_, S>,
    repo: &R,
    user_id: &str,
) -> TrackerResult<PullReport>
where
    S: KvStore,
    R: ExpenseRepository + ?Sized,
{
    let remote = match repo.list_by_user(user_id) {
        Ok(rows) => rows,
        Err(e) => {
            log::error!("sync: fetching remote records for {} failed: {}", user_id, e);
            return Err(e);
        }
    };
    let remote_count = remote.len();
    let merged = reconcile(state.expenses(), remote);
    let local_only = merged.iter().filter(|e| !e.synced).count();
    let report = PullReport {
        remote: merged.len() - local_only,
        local_only,
        total: merged.len(),
    };
    state.replace_expenses(merged)?;
    log::info!(
        "sync: merged {} remote row(s) with {} local-only record(s)",
        remote_count,
        local_only
    );
    Ok(report)
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PushReport {
    pub attempted: usize,
    pub pushed: usize,
    pub failed: Vec<String>,
    /// Set when the follow-up reconciliation could not run.
    pub reconcile_error: Option<String>,
    pub pull: Option<PullReport>,
}

/// Inserts every unsynced record, one at a time. A failed insert is logged and
/// skipped; inserts that went through stay committed. Each pushed draft is
/// replaced in place by the server's copy and saved before the follow-up pull,
/// so a failed pull still leaves every record in the local list.
pub fn push_unsynced<S, R>(
    state: &mut AppState<'_, S>,
    repo: &R,
    user_id: &str,
) -> TrackerResult<PushReport>
where
    S: KvStore,
    R: ExpenseRepository + ?Sized,
{
    let pending = state.unsynced();
    let mut report = PushReport {
        attempted: pending.len(),
        ..Default::default()
    };
    let mut confirmed: HashMap<String, Expense> = HashMap::new();

    for draft in &pending {
        match repo.create(user_id, draft) {
            Ok(mut row) => {
                log::debug!("sync: pushed {} as {}", draft.id, row.id);
                row.synced = true;
                confirmed.insert(draft.id.clone(), row);
                report.pushed += 1;
            }
            Err(e) => {
                log::warn!("sync: push of {} failed: {}", draft.id, e);
                report.failed.push(draft.id.clone());
            }
        }
    }

    if !confirmed.is_empty() {
        let updated: Vec<Expense> = state
            .expenses()
            .iter()
            .map(|e| confirmed.remove(&e.id).unwrap_or_else(|| e.clone()))
            .collect();
        state.replace_expenses(updated)?;
    }

    match reconcile_with_remote(state, repo, user_id) {
        Ok(pull) => report.pull = Some(pull),
        Err(e) => report.reconcile_error = Some(e.to_string()),
    }
    Ok(report)
}
