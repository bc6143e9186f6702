// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::bill::{Bill, build_bill_data};
use crate::config::Config;
use crate::db::BlobStore;
use crate::store::Khata;
use crate::utils::{fmt_money, maybe_print_json, parse_kind, pretty_table, today};
use anyhow::Result;

pub fn handle<B: BlobStore>(k: &mut Khata<B>, sub: &clap::ArgMatches, cfg: &Config) -> Result<()> {
    let kind = parse_kind(sub.get_one::<String>("kind").unwrap())?;
    let id = sub.get_one::<String>("account").unwrap().trim();
    let account = k.account(kind, id)?;
    let bill = build_bill_data(kind, account, &k.prefs().profile, today());

    let data = match bill {
        Bill::Empty => {
            println!("No pending transactions for {}", account.name);
            return Ok(());
        }
        Bill::Ready(data) => data,
    };

    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let sym = &cfg.currency_symbol;
        let p = &data.issuer;
        println!("{}", data.title);
        println!("{}: {}", kind.label(), data.account_name);
        println!(
            "Contact: {}",
            if data.contact.is_empty() { "N/A" } else { &data.contact }
        );
        if !p.name.is_empty() || !p.mandi.is_empty() {
            println!("Buyer: {} {}", p.name, p.mandi);
        }
        if !p.phone.is_empty() || !p.gst.is_empty() {
            println!("Phone / GST: {} {}", p.phone, p.gst);
        }
        println!("Date: {}", data.date);
        let rows = data
            .line_items
            .iter()
            .map(|t| {
                vec![
                    t.date.to_string(),
                    t.variety.clone(),
                    t.boxes.to_string(),
                    fmt_money(&t.rate, sym),
                    fmt_money(&t.commission, sym),
                    fmt_money(&t.transport, sym),
                    fmt_money(&t.total, sym),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Date", "Variety", "Boxes", "Rate", "Commission", "Transport", "Total"],
                rows
            )
        );
        println!("Total Pending Amount: {}", fmt_money(&data.total_pending, sym));
    }

    if sub.get_flag("mark_printed") {
        let n = k.settle_items(kind, &data.account_id, &data.item_ids())?;
        println!("Marked {} transactions {}", n, kind.settled());
    }
    Ok(())
}
