// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::state::{AppState, Slot};
use crate::store::KvStore;
use crate::utils::pretty_table;
use anyhow::{Result, bail};

pub fn handle<S: KvStore>(store: &S, m: &clap::ArgMatches) -> Result<()> {
    let mut state = AppState::open_profile(store, None)?;
    match m.subcommand() {
        Some(("new", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            if state.create_profile(name)? {
                println!("Created profile '{}'", name.trim());
            } else {
                println!("Profile '{}' already exists; switched to it", name.trim());
            }
        }
        Some(("list", _)) => {
            let active = match state.slot() {
                Some(Slot::Profile(p)) => Some(p.clone()),
                _ => None,
            };
            let mut data = Vec::new();
            for p in state.profiles()? {
                let mark = if active.as_deref() == Some(p.as_str()) { "*" } else { "" };
                data.push(vec![mark.to_string(), p]);
            }
            if data.is_empty() {
                println!("No profiles yet. Create one with `bareminimum profile new <name>`.");
            } else {
                println!("{}", pretty_table(&["", "Profile"], data));
            }
        }
        Some(("use", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim();
            state.select_profile(name)?;
            println!("Switched to profile '{}'", name);
        }
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim();
            if !sub.get_flag("yes") {
                bail!("Deleting profile '{}' removes all its data; re-run with --yes", name);
            }
            state.delete_profile(name)?;
            println!("Removed profile '{}'", name);
        }
        _ => {}
    }
    Ok(())
}
