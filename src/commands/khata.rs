// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::khata;
use crate::config::Config;
use crate::db::BlobStore;
use crate::exchange::khata_csv;
use crate::store::Khata;
use crate::utils::{fmt_money, maybe_print_json, pretty_table};
use anyhow::{Context, Result};

pub fn handle<B: BlobStore>(k: &Khata<B>, m: &clap::ArgMatches, cfg: &Config) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(k, sub, cfg),
        Some(("csv", sub)) => export_csv(k, sub),
        _ => Ok(()),
    }
}

fn list<B: BlobStore>(k: &Khata<B>, sub: &clap::ArgMatches, cfg: &Config) -> Result<()> {
    let mut view = khata(k.book());
    if let Some(q) = sub.get_one::<String>("search") {
        view = view.search(q);
    }
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &view)? {
        return Ok(());
    }
    let sym = &cfg.currency_symbol;
    let mut rows = Vec::new();
    for e in &view.growers {
        rows.push(vec!["Grower".to_string(), e.name.clone(), e.id.clone(), fmt_money(&e.amount, sym)]);
    }
    for e in &view.customers {
        rows.push(vec!["Customer".to_string(), e.name.clone(), e.id.clone(), fmt_money(&e.amount, sym)]);
    }
    println!("{}", pretty_table(&["Type", "Name", "ID", "Pending"], rows));
    println!(
        "Total Due to Growers: {} | Pending from Customers: {} | Net Balance: {}",
        fmt_money(&view.total_due_to_growers, sym),
        fmt_money(&view.total_pending_from_customers, sym),
        fmt_money(&view.net_balance, sym)
    );
    Ok(())
}

fn export_csv<B: BlobStore>(k: &Khata<B>, sub: &clap::ArgMatches) -> Result<()> {
    let out = sub.get_one::<String>("out").unwrap().trim();
    let bytes = khata_csv(k.book())?;
    std::fs::write(out, bytes).with_context(|| format!("Write {}", out))?;
    println!("Exported khata to {}", out);
    Ok(())
}
