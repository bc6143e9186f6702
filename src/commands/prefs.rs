// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::BlobStore;
use crate::models::Profile;
use crate::store::Khata;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;

/// Overlays the fields given on the command line onto `current`.
pub fn merge_profile(current: &Profile, sub: &clap::ArgMatches) -> Profile {
    let pick = |key: &str, old: &String| {
        sub.get_one::<String>(key)
            .cloned()
            .unwrap_or_else(|| old.clone())
    };
    Profile {
        name: pick("name", &current.name),
        mandi: pick("mandi", &current.mandi),
        phone: pick("phone", &current.phone),
        gst: pick("gst", &current.gst),
        address: pick("address", &current.address),
    }
}

pub fn handle<B: BlobStore>(k: &mut Khata<B>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => {
            let prefs = k.prefs();
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), prefs)? {
                let p = &prefs.profile;
                let rows = vec![
                    vec!["Name".to_string(), p.name.clone()],
                    vec!["Mandi".to_string(), p.mandi.clone()],
                    vec!["Phone".to_string(), p.phone.clone()],
                    vec!["GST".to_string(), p.gst.clone()],
                    vec!["Address".to_string(), p.address.clone()],
                    vec![
                        "Dark mode".to_string(),
                        if prefs.dark_mode { "on" } else { "off" }.to_string(),
                    ],
                ];
                println!("{}", pretty_table(&["Setting", "Value"], rows));
            }
        }
        Some(("profile", sub)) => {
            let profile = merge_profile(&k.prefs().profile, sub);
            k.set_profile(profile)?;
            println!("Profile saved");
        }
        Some(("dark-mode", sub)) => {
            let on = *sub.get_one::<bool>("state").unwrap();
            k.set_dark_mode(on)?;
            println!("Dark mode {}", if on { "on" } else { "off" });
        }
        _ => {}
    }
    Ok(())
}
