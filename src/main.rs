// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::Utc;
use std::path::Path;

use mandi_khata::config::Config;
use mandi_khata::db::{self, SqliteStore};
use mandi_khata::store::{Collection, Khata};
use mandi_khata::{cli, commands};

fn main() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let cfg = Config::load(matches.get_one::<String>("config").map(Path::new))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cfg.log_level.as_str()))
        .init();

    let path = db::db_path(cfg.data_dir.as_deref())?;
    let store = SqliteStore::open(&path)?;
    let mut khata = Khata::open(store)?.with_backup_interval(cfg.backup_interval());

    let restoring = matches!(
        matches.subcommand(),
        Some(("data", sub)) if matches!(sub.subcommand(), Some(("restore", _)))
    );
    if !restoring {
        khata.tick(Utc::now())?;
    }

    match matches.subcommand() {
        Some(("init", _)) => {
            for c in Collection::ALL {
                khata.save(c)?;
            }
            println!("Database initialized at {}", path.display());
        }
        Some(_) => commands::run(&mut khata, &matches, &cfg)?,
        None => {
            cli::build_cli().print_help()?;
            println!();
        }
    }

    khata.tick(Utc::now())?;
    Ok(())
}
