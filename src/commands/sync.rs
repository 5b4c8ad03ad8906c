// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::connect;
use crate::remote::ExpenseRepository;
use crate::state::AppState;
use crate::store::KvStore;
use crate::sync::{PullReport, PushReport, push_unsynced, reconcile_with_remote};
use anyhow::Result;

pub fn handle<S: KvStore>(store: &S, m: &clap::ArgMatches) -> Result<()> {
    let remote = connect(store)?;
    let user_id = remote.session.user_id.clone();
    match m.subcommand() {
        Some(("pull", _)) => {
            pull(store, &remote.client, &user_id)?;
        }
        Some(("push", _)) => {
            push(store, &remote.client, &user_id)?;
        }
        _ => {}
    }
    Ok(())
}

/// A failed fetch is reported, not retried; the local list stays as it was.
pub fn pull<S, R>(store: &S, repo: &R, user_id: &str) -> Result<Option<PullReport>>
where
    S: KvStore,
    R: ExpenseRepository + ?Sized,
{
    let mut state = AppState::for_user(store, user_id)?;
    match reconcile_with_remote(&mut state, repo, user_id) {
        Ok(r) => {
            println!(
                "Synced: {} record(s) ({} from cloud, {} local only)",
                r.total, r.remote, r.local_only
            );
            Ok(Some(r))
        }
        Err(e) => {
            println!("Sync failed: {}. Local records unchanged.", e);
            Ok(None)
        }
    }
}

pub fn push<S, R>(store: &S, repo: &R, user_id: &str) -> Result<PushReport>
where
    S: KvStore,
    R: ExpenseRepository + ?Sized,
{
    let mut state = AppState::for_user(store, user_id)?;
    let report = push_unsynced(&mut state, repo, user_id)?;
    if report.attempted == 0 {
        println!("Nothing to push");
    } else {
        println!(
            "Pushed {}/{} record(s)",
            report.pushed, report.attempted
        );
    }
    if !report.failed.is_empty() {
        println!(
            "{} record(s) stay local; run `bareminimum sync push` again later",
            report.failed.len()
        );
    }
    if let Some(e) = &report.reconcile_error {
        println!("Follow-up sync failed: {}", e);
    }
    Ok(report)
}
