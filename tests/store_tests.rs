// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use bareminimum::catalog::{
    category_emoji, is_quick_commerce, normalize_category, strip_emoji, suggest_category,
};
use bareminimum::config::{
    RemoteConfig, clear_session, load_session, mask_key, require_session, save_session,
};
use bareminimum::error::TrackerError;
use bareminimum::models::{ExpenseDraft, Session};
use bareminimum::state::AppState;
use bareminimum::store::{KvStore, REMOTE_CONFIG_KEY, SqliteStore};
use chrono::Utc;
use rust_decimal::Decimal;
use tempfile::tempdir;

#[test]
fn sqlite_store_persists_across_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("baremin.sqlite");

    {
        let store = SqliteStore::open(&path).unwrap();
        let mut state = AppState::open_profile(&store, None).unwrap();
        state.create_profile("home").unwrap();
        state
            .add_expense(
                ExpenseDraft {
                    amount: Decimal::from(99),
                    merchant: Some("Zepto".into()),
                    ..Default::default()
                },
                Utc::now(),
            )
            .unwrap();
    }

    let store = SqliteStore::open(&path).unwrap();
    let state = AppState::open_profile(&store, None).unwrap();
    assert_eq!(state.expenses().len(), 1);
    assert_eq!(state.expenses()[0].category, "Groceries");
    assert!(state.expenses()[0].quick);
}

#[test]
fn sqlite_kv_upserts_and_removes() {
    let store = SqliteStore::open_in_memory().unwrap();
    assert_eq!(store.get("k").unwrap(), None);
    store.set("k", "1").unwrap();
    store.set("k", "2").unwrap();
    assert_eq!(store.get("k").unwrap().as_deref(), Some("2"));
    store.remove("k").unwrap();
    assert_eq!(store.get("k").unwrap(), None);

    store.set("bad", "{not json").unwrap();
    let err = store.get_json::<Vec<String>>("bad").unwrap_err();
    assert!(matches!(err, TrackerError::Serde(_)));
}

#[test]
fn session_and_remote_config_round_trip() {
    let store = SqliteStore::open_in_memory().unwrap();
    assert!(load_session(&store).unwrap().is_none());
    assert!(matches!(
        require_session(&store).unwrap_err(),
        TrackerError::NotSignedIn
    ));

    let session = Session {
        user_id: "u-9".into(),
        email: Some("me@example.com".into()),
        access_token: "tok".into(),
    };
    save_session(&store, &session).unwrap();
    assert_eq!(require_session(&store).unwrap(), session);
    clear_session(&store).unwrap();
    assert!(load_session(&store).unwrap().is_none());

    let cfg = RemoteConfig::new(" https://abc.supabase.co/ ", " anon ");
    assert_eq!(cfg.url, "https://abc.supabase.co");
    assert_eq!(cfg.anon_key, "anon");
    cfg.save(&store).unwrap();
    let stored: RemoteConfig = store.get_json(REMOTE_CONFIG_KEY).unwrap().unwrap();
    assert_eq!(stored, cfg);

    assert_eq!(mask_key("abcdefgh"), "****efgh");
    assert_eq!(mask_key("abc"), "***");
}

#[test]
fn catalog_lookups() {
    assert!(is_quick_commerce("BLINKIT order"));
    assert!(is_quick_commerce("Quick Mart"));
    assert!(!is_quick_commerce("Swiggy"));

    assert_eq!(suggest_category("Swiggy Instamart"), Some("Food Delivery"));
    assert_eq!(suggest_category("BigBasket"), Some("Groceries"));
    assert_eq!(suggest_category("Rapido bike"), Some("Transportation"));
    assert_eq!(suggest_category("Landlord"), None);

    assert_eq!(strip_emoji("🥦 Groceries"), "Groceries");
    assert_eq!(normalize_category("🏠 rent").as_deref(), Some("Rent"));
    assert_eq!(normalize_category(" Books ").as_deref(), Some("Books"));
    assert_eq!(normalize_category("🎮"), None);

    assert_eq!(category_emoji("Rent"), "🏠");
    assert_eq!(category_emoji("Books"), "🔖");
}
