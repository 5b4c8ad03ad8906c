// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use bareminimum::config::LOG_ENV;
use bareminimum::store::SqliteStore;
use bareminimum::{cli, commands, db};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().filter_or(LOG_ENV, "warn")).init();

    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let conn = db::open_or_init()?;
    let store = SqliteStore::new(conn);

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Store initialized at {}", db::db_path()?.display());
        }
        Some(("profile", sub)) => commands::profiles::handle(&store, sub)?,
        Some(("expense", sub)) => commands::expenses::handle(&store, sub)?,
        Some(("summary", sub)) => commands::summary::handle(&store, sub)?,
        Some(("analytics", sub)) => commands::analytics::handle(&store, sub)?,
        Some(("invest", sub)) => commands::investments::handle(&store, sub)?,
        Some(("auth", sub)) => commands::auth::handle(&store, sub)?,
        Some(("sync", sub)) => commands::sync::handle(&store, sub)?,
        Some(("config", sub)) => commands::config::handle(&store, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&store, sub)?,
        Some(("categories", _)) => commands::categories::handle()?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
