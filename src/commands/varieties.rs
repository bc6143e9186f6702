// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::BlobStore;
use crate::store::Khata;
use crate::utils::{maybe_print_json, parse_decimal, pretty_table};
use anyhow::Result;

pub fn handle<B: BlobStore>(k: &mut Khata<B>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let rate = parse_decimal(sub.get_one::<String>("rate").unwrap())?;
            k.add_variety(name, rate)?;
            println!("Added variety '{}' (default rate {})", name.trim(), rate);
        }
        Some(("list", sub)) => {
            let items = k.varieties();
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &items)? {
                let data = items
                    .iter()
                    .map(|v| vec![v.name.clone(), v.default_rate.to_string()])
                    .collect();
                println!("{}", pretty_table(&["Variety", "Default Rate"], data));
            }
        }
        Some(("rate", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let rate = parse_decimal(sub.get_one::<String>("rate").unwrap())?;
            k.set_variety_rate(name, rate)?;
            println!("Default rate for '{}' set to {}", name.trim(), rate);
        }
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            k.delete_variety(name)?;
            println!("Removed variety '{}'", name.trim());
        }
        _ => {}
    }
    Ok(())
}
