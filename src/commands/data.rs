// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::BlobStore;
use crate::store::Khata;
use anyhow::{Context, Result, bail};
use chrono::Utc;
use std::fs;

pub fn handle<B: BlobStore>(k: &mut Khata<B>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("export", sub)) => {
            let out = sub.get_one::<String>("out").unwrap().trim();
            let json = k.export_json()?;
            fs::write(out, json).with_context(|| format!("Write {}", out))?;
            println!("Exported all data to {}", out);
        }
        Some(("import", sub)) => {
            let path = sub.get_one::<String>("path").unwrap().trim();
            let content = fs::read_to_string(path).with_context(|| format!("Read {}", path))?;
            k.import_all(&content)?;
            println!(
                "Imported {} growers, {} customers, {} expenses from {}",
                k.book().growers.len(),
                k.book().customers.len(),
                k.book().expenses.len(),
                path
            );
        }
        Some(("backup", _)) => {
            k.create_backup(Utc::now())?;
            println!("Backup written");
        }
        Some(("restore", sub)) => {
            if !sub.get_flag("yes") {
                bail!("Restoring replaces all current data with the last backup; re-run with --yes");
            }
            k.restore_backup()?;
            match k.last_backup() {
                Some(ts) => println!("Restored backup taken at {}", ts.format("%Y-%m-%d %H:%M UTC")),
                None => println!("Restored backup"),
            }
        }
        _ => {}
    }
    Ok(())
}
