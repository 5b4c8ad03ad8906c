// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::{RemoteConfig, clear_session, load_session, save_session};
use crate::remote::SupabaseClient;
use crate::state::AppState;
use crate::store::KvStore;
use crate::sync::reconcile_with_remote;
use anyhow::{Result, anyhow};

pub fn handle<S: KvStore>(store: &S, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("login", sub)) => {
            let email = sub.get_one::<String>("email").unwrap().trim();
            let password = sub.get_one::<String>("password").unwrap();
            let cfg = RemoteConfig::resolve(store)?;
            let client = SupabaseClient::new(cfg.clone(), None)?;
            let session = client
                .sign_in_with_password(email, password)
                .map_err(|e| anyhow!("Sign-in failed: {}", e))?;
            save_session(store, &session)?;
            println!("Signed in as {}", session.email.as_deref().unwrap_or(email));

            let client = SupabaseClient::new(cfg, Some(&session))?;
            let mut state = AppState::for_user(store, &session.user_id)?;
            match reconcile_with_remote(&mut state, &client, &session.user_id) {
                Ok(r) => println!(
                    "Loaded {} record(s) ({} from cloud, {} local only)",
                    r.total, r.remote, r.local_only
                ),
                Err(_) => println!("Could not load cloud records; run `bareminimum sync pull` later."),
            }
        }
        Some(("logout", _)) => {
            if let Some(session) = load_session(store)? {
                match RemoteConfig::resolve(store)
                    .map_err(anyhow::Error::from)
                    .and_then(|cfg| SupabaseClient::new(cfg, Some(&session)))
                {
                    Ok(client) => {
                        if let Err(e) = client.sign_out() {
                            log::warn!("remote sign-out failed: {}", e);
                        }
                    }
                    Err(e) => log::warn!("remote sign-out skipped: {:#}", e),
                }
                clear_session(store)?;
                println!("Signed out");
            } else {
                println!("Not signed in");
            }
        }
        Some(("whoami", _)) => match load_session(store)? {
            Some(s) => println!(
                "{} ({})",
                s.email.as_deref().unwrap_or("(no email)"),
                s.user_id
            ),
            None => println!("Not signed in; using local profiles"),
        },
        _ => {}
    }
    Ok(())
}
