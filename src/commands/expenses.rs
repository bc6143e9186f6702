// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::BlobStore;
use crate::store::Khata;
use crate::utils::{maybe_print_json, parse_date, parse_decimal, pretty_table, today};
use anyhow::Result;

pub fn handle<B: BlobStore>(k: &mut Khata<B>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let date = match sub.get_one::<String>("date") {
                Some(d) => parse_date(d)?,
                None => today(),
            };
            let desc = sub.get_one::<String>("desc").unwrap();
            let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
            let category = sub.get_one::<String>("category").unwrap();
            let id = k.add_expense(date, desc, amount, category)?;
            println!("Added expense '{}' of {} on {} ({})", desc.trim(), amount, date, id);
        }
        Some(("list", sub)) => {
            let items = k.expenses_newest_first();
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &items)? {
                let rows = items
                    .iter()
                    .map(|e| {
                        vec![
                            e.id.clone(),
                            e.date.to_string(),
                            e.desc.clone(),
                            e.category.clone(),
                            format!("{:.2}", e.amount),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["ID", "Date", "Description", "Category", "Amount"], rows)
                );
            }
        }
        Some(("rm", sub)) => {
            let id = sub.get_one::<String>("id").unwrap().trim();
            k.delete_expense(id)?;
            println!("Removed expense {}", id);
        }
        _ => {}
    }
    Ok(())
}
