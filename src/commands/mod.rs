// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod analytics;
pub mod auth;
pub mod categories;
pub mod config;
pub mod expenses;
pub mod exporter;
pub mod investments;
pub mod profiles;
pub mod summary;
pub mod sync;

use crate::config::{RemoteConfig, load_session, require_session};
use crate::models::Session;
use crate::remote::SupabaseClient;
use crate::state::AppState;
use crate::store::KvStore;
use anyhow::Result;

/// `--profile` picks a local profile; otherwise a signed-in user gets their
/// own slot and everyone else the last used profile.
pub fn open_state<'s, S: KvStore>(store: &'s S, m: &clap::ArgMatches) -> Result<AppState<'s, S>> {
    let requested = m.get_one::<String>("profile").map(String::as_str);
    if requested.is_none() {
        if let Some(session) = load_session(store)? {
            return Ok(AppState::for_user(store, &session.user_id)?);
        }
    }
    Ok(AppState::open_profile(store, requested)?)
}

pub struct Remote {
    pub client: SupabaseClient,
    pub session: Session,
}

pub fn connect<S: KvStore>(store: &S) -> Result<Remote> {
    let session = require_session(store)?;
    let cfg = RemoteConfig::resolve(store)?;
    let client = SupabaseClient::new(cfg, Some(&session))?;
    Ok(Remote { client, session })
}
