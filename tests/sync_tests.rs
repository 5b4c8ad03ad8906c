// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use bareminimum::commands::sync as sync_cmd;
use bareminimum::error::{TrackerError, TrackerResult};
use bareminimum::models::{Expense, ExpenseDraft, PaymentMode};
use bareminimum::remote::{ExpenseRepository, MemoryRepository};
use bareminimum::state::AppState;
use bareminimum::store::MemoryStore;
use bareminimum::sync::{push_unsynced, reconcile, reconcile_with_remote};
use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;

const USER: &str = "user-1";

fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, day, hour, 0, 0).unwrap()
}

fn exp(id: &str, amount: i64, ts: DateTime<Utc>) -> Expense {
    Expense {
        id: id.to_string(),
        amount: Decimal::from(amount),
        mode: PaymentMode::Upi,
        merchant: format!("m-{}", id),
        category: "Misc".to_string(),
        note: None,
        timestamp: ts,
        quick: false,
        synced: false,
    }
}

fn ids(list: &[Expense]) -> Vec<&str> {
    list.iter().map(|e| e.id.as_str()).collect()
}

#[test]
fn remote_wins_on_id_collision() {
    let local = vec![exp("a", 100, at(1, 10)), exp("b", 50, at(2, 10))];
    let remote = vec![exp("a", 150, at(1, 10))];
    let merged = reconcile(&local, remote);

    assert_eq!(ids(&merged), vec!["b", "a"]);
    let a = merged.iter().find(|e| e.id == "a").unwrap();
    assert_eq!(a.amount, Decimal::from(150));
    assert!(a.synced);
    let b = merged.iter().find(|e| e.id == "b").unwrap();
    assert!(!b.synced);
}

#[test]
fn empty_remote_keeps_local_as_unsynced() {
    let mut l = exp("a", 10, at(1, 9));
    l.synced = true;
    let local = vec![l, exp("b", 20, at(3, 9))];
    let merged = reconcile(&local, Vec::new());
    assert_eq!(ids(&merged), vec!["b", "a"]);
    assert!(merged.iter().all(|e| !e.synced));
}

#[test]
fn full_overlap_yields_remote_set() {
    let local = vec![exp("a", 1, at(1, 1)), exp("b", 2, at(2, 1))];
    let remote = vec![exp("b", 20, at(2, 1)), exp("a", 10, at(1, 1))];
    let merged = reconcile(&local, remote.clone());
    assert_eq!(merged.len(), 2);
    for r in &remote {
        let m = merged.iter().find(|e| e.id == r.id).unwrap();
        assert_eq!(m.amount, r.amount);
        assert!(m.synced);
    }
}

#[test]
fn merge_has_unique_ids_sorted_newest_first() {
    let local = vec![
        exp("x", 1, at(5, 1)),
        exp("y", 1, at(1, 1)),
        exp("x", 2, at(9, 1)),
    ];
    let remote = vec![
        exp("r1", 1, at(3, 1)),
        exp("r1", 99, at(8, 1)),
        exp("y", 7, at(1, 1)),
    ];
    let merged = reconcile(&local, remote);

    assert_eq!(ids(&merged), vec!["x", "r1", "y"]);
    assert_eq!(merged[0].amount, Decimal::from(1));
    assert_eq!(merged[1].amount, Decimal::from(1));
    assert_eq!(merged[2].amount, Decimal::from(7));
    for w in merged.windows(2) {
        assert!(w[0].timestamp >= w[1].timestamp);
    }
}

#[test]
fn failed_fetch_leaves_local_state_untouched() {
    let store = MemoryStore::new();
    let repo = MemoryRepository::new();
    let mut state = AppState::for_user(&store, USER).unwrap();
    state
        .add_expense(
            ExpenseDraft {
                amount: Decimal::from(42),
                category: Some("Misc".into()),
                ..Default::default()
            },
            at(1, 12),
        )
        .unwrap();
    let before_store = store.snapshot();
    let before_list = state.expenses().to_vec();

    repo.set_offline(true);
    assert!(reconcile_with_remote(&mut state, &repo, USER).is_err());
    assert_eq!(state.expenses(), before_list.as_slice());
    assert_eq!(store.snapshot(), before_store);

    // the command reports the failure instead of propagating it
    assert!(sync_cmd::pull(&store, &repo, USER).unwrap().is_none());
    assert_eq!(store.snapshot(), before_store);
}

#[test]
fn pull_merges_and_persists() {
    let store = MemoryStore::new();
    let repo = MemoryRepository::new();
    repo.seed(USER, exp("srv-a", 300, at(4, 8)));
    repo.seed("someone-else", exp("srv-z", 1, at(4, 8)));

    let mut state = AppState::for_user(&store, USER).unwrap();
    state.replace_expenses(vec![exp("local-1", 5, at(2, 8))]).unwrap();

    let report = sync_cmd::pull(&store, &repo, USER).unwrap().unwrap();
    assert_eq!(report.remote, 1);
    assert_eq!(report.local_only, 1);
    assert_eq!(report.total, 2);

    let reloaded = AppState::for_user(&store, USER).unwrap();
    assert_eq!(ids(reloaded.expenses()), vec!["srv-a", "local-1"]);
}

#[test]
fn push_replaces_drafts_with_server_rows() {
    let store = MemoryStore::new();
    let repo = MemoryRepository::new();
    let mut state = AppState::for_user(&store, USER).unwrap();
    state
        .replace_expenses(vec![exp("d1", 10, at(1, 8)), exp("d2", 20, at(2, 8))])
        .unwrap();

    let report = push_unsynced(&mut state, &repo, USER).unwrap();
    assert_eq!(report.attempted, 2);
    assert_eq!(report.pushed, 2);
    assert!(report.failed.is_empty());
    assert!(report.reconcile_error.is_none());

    assert_eq!(state.expenses().len(), 2);
    assert!(state.expenses().iter().all(|e| e.synced));
    assert!(state.expenses().iter().all(|e| e.id.starts_with("srv-")));
    assert_eq!(repo.rows(USER).len(), 2);

    // a second push has nothing left to send and creates no duplicates
    let again = push_unsynced(&mut state, &repo, USER).unwrap();
    assert_eq!(again.attempted, 0);
    assert_eq!(repo.rows(USER).len(), 2);
}

#[test]
fn push_failure_is_skipped_and_kept_local() {
    let store = MemoryStore::new();
    let repo = MemoryRepository::new();
    repo.reject_merchant("m-bad");
    let mut state = AppState::for_user(&store, USER).unwrap();
    state
        .replace_expenses(vec![
            exp("ok1", 10, at(1, 8)),
            exp("bad", 20, at(2, 8)),
            exp("ok2", 30, at(3, 8)),
        ])
        .unwrap();

    let report = sync_cmd::push(&store, &repo, USER).unwrap();
    assert_eq!(report.attempted, 3);
    assert_eq!(report.pushed, 2);
    assert_eq!(report.failed, vec!["bad".to_string()]);

    let reloaded = AppState::for_user(&store, USER).unwrap();
    let list = reloaded.expenses();
    assert_eq!(list.len(), 3);
    let bad = list.iter().find(|e| e.id == "bad").unwrap();
    assert!(!bad.synced);
    assert_eq!(list.iter().filter(|e| e.synced).count(), 2);
    assert_eq!(repo.rows(USER).len(), 2);
}

#[test]
fn push_then_failed_pull_reports_error() {
    let store = MemoryStore::new();
    let repo = MemoryRepository::new();
    let mut state = AppState::for_user(&store, USER).unwrap();
    state.replace_expenses(vec![exp("d1", 10, at(1, 8))]).unwrap();

    // offline from the start: nothing goes through and the draft stays
    repo.set_offline(true);
    let report = push_unsynced(&mut state, &repo, USER).unwrap();
    assert_eq!(report.pushed, 0);
    assert_eq!(report.failed, vec!["d1".to_string()]);
    assert!(report.reconcile_error.is_some());
    assert_eq!(ids(state.expenses()), vec!["d1"]);
}

/// Accepts inserts but cannot list them back.
struct ListingDown {
    inner: MemoryRepository,
}

impl ExpenseRepository for ListingDown {
    fn create(&self, user_id: &str, expense: &Expense) -> TrackerResult<Expense> {
        self.inner.create(user_id, expense)
    }

    fn list_by_user(&self, _user_id: &str) -> TrackerResult<Vec<Expense>> {
        Err(TrackerError::Remote("timeout".into()))
    }

    fn delete_by_id(&self, id: &str) -> TrackerResult<()> {
        self.inner.delete_by_id(id)
    }

    fn update_mode(&self, id: &str, mode: PaymentMode) -> TrackerResult<()> {
        self.inner.update_mode(id, mode)
    }
}

#[test]
fn pushed_records_survive_a_failed_follow_up_pull() {
    let store = MemoryStore::new();
    let repo = ListingDown {
        inner: MemoryRepository::new(),
    };
    let mut state = AppState::for_user(&store, USER).unwrap();
    state
        .replace_expenses(vec![exp("d2", 20, at(2, 8)), exp("d1", 10, at(1, 8))])
        .unwrap();

    let report = push_unsynced(&mut state, &repo, USER).unwrap();
    assert_eq!(report.pushed, 2);
    assert!(report.reconcile_error.is_some());

    assert_eq!(state.expenses().len(), 2);
    assert!(state.expenses().iter().all(|e| e.synced));
    assert!(state.expenses().iter().all(|e| e.id.starts_with("srv-")));
    assert_eq!(state.expenses()[0].amount, Decimal::from(20));

    let reloaded = AppState::for_user(&store, USER).unwrap();
    assert_eq!(reloaded.expenses(), state.expenses());
    assert!(reloaded.unsynced().is_empty());
}

#[test]
fn remote_mode_update_and_delete() {
    let repo = MemoryRepository::new();
    repo.seed(USER, exp("srv-1", 10, at(1, 8)));
    repo.update_mode("srv-1", PaymentMode::Cash).unwrap();
    assert_eq!(repo.rows(USER)[0].mode, PaymentMode::Cash);
    repo.delete_by_id("srv-1").unwrap();
    assert!(repo.list_by_user(USER).unwrap().is_empty());
}
