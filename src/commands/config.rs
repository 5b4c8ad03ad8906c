// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::open_state;
use crate::config::{RemoteConfig, load_session, mask_key};
use crate::db::db_path;
use crate::store::KvStore;
use crate::utils::{fmt_inr, parse_decimal, pretty_table};
use anyhow::Result;

pub fn handle<S: KvStore>(store: &S, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set-remote", sub)) => {
            let cfg = RemoteConfig::new(
                sub.get_one::<String>("url").unwrap(),
                sub.get_one::<String>("key").unwrap(),
            );
            cfg.save(store)?;
            println!("Remote set to {}", cfg.url);
        }
        Some(("show", sub)) => {
            let mut rows = vec![vec!["store".to_string(), db_path()?.display().to_string()]];
            match RemoteConfig::resolve(store) {
                Ok(cfg) => {
                    rows.push(vec!["remote url".into(), cfg.url]);
                    rows.push(vec!["anon key".into(), mask_key(&cfg.anon_key)]);
                }
                Err(_) => rows.push(vec!["remote".into(), "(not configured)".into()]),
            }
            let who = load_session(store)?
                .map(|s| s.email.unwrap_or(s.user_id))
                .unwrap_or_else(|| "(signed out)".into());
            rows.push(vec!["session".into(), who]);
            let state = open_state(store, sub)?;
            if let Some(slot) = state.slot() {
                rows.push(vec!["active".into(), slot.label()]);
                rows.push(vec![
                    "upi daily limit".into(),
                    fmt_inr(&state.data().settings.upi_daily_limit),
                ]);
            }
            println!("{}", pretty_table(&["Setting", "Value"], rows));
        }
        Some(("upi-limit", sub)) => {
            let limit = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
            let mut state = open_state(store, sub)?;
            state.set_upi_limit(limit)?;
            println!("UPI daily limit set to {}", fmt_inr(&limit));
        }
        _ => {}
    }
    Ok(())
}
