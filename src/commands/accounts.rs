// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::calc::account_stats;
use crate::config::Config;
use crate::db::BlobStore;
use crate::models::AccountKind;
use crate::store::Khata;
use crate::utils::{fmt_money, maybe_print_json, pretty_table};
use anyhow::{Result, bail};
use serde::Serialize;

#[derive(Serialize)]
pub struct AccountRow {
    pub id: String,
    pub name: String,
    pub contact: String,
    pub total_boxes: u64,
    pub total_amount: String,
    pub pending: String,
}

pub fn handle<B: BlobStore>(
    k: &mut Khata<B>,
    kind: AccountKind,
    m: &clap::ArgMatches,
    cfg: &Config,
) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let contact = sub.get_one::<String>("contact").unwrap();
            let address = sub.get_one::<String>("address").unwrap();
            let id = k.add_account(kind, name, contact, address)?;
            println!("Added {} '{}' ({})", kind, name.trim(), id);
        }
        Some(("list", sub)) => {
            let search = sub.get_one::<String>("search").map(|s| s.as_str()).unwrap_or("");
            let data = list_rows(k, kind, search);
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
                let rows = data
                    .into_iter()
                    .map(|r| {
                        vec![
                            r.id,
                            r.name,
                            r.contact,
                            r.total_boxes.to_string(),
                            r.total_amount,
                            r.pending,
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["ID", "Name", "Contact", "Boxes", "Amount", "Pending"], rows)
                );
            }
        }
        Some(("show", sub)) => show(k, kind, sub, cfg)?,
        Some(("rm", sub)) => {
            let id = sub.get_one::<String>("id").unwrap().trim();
            if !sub.get_flag("yes") {
                bail!(
                    "Deleting {} '{}' removes all of its transactions; re-run with --yes",
                    kind,
                    id
                );
            }
            let removed = k.delete_account(kind, id)?;
            println!(
                "Removed {} '{}' and {} transactions",
                kind,
                removed.name,
                removed.transactions.len()
            );
        }
        Some(("settle", sub)) => {
            let id = sub.get_one::<String>("id").unwrap().trim();
            let n = k.settle_account(kind, id)?;
            println!("Marked {} transactions {}", n, kind.settled());
        }
        Some(("settle-all", sub)) => {
            if !sub.get_flag("yes") {
                bail!("This settles every open {} transaction; re-run with --yes", kind);
            }
            let n = k.settle_all(kind)?;
            println!("Marked {} transactions {}", n, kind.settled());
        }
        _ => {}
    }
    Ok(())
}

pub fn list_rows<B: BlobStore>(k: &Khata<B>, kind: AccountKind, search: &str) -> Vec<AccountRow> {
    k.search_accounts(kind, search)
        .into_iter()
        .map(|a| {
            let stats = account_stats(kind, a);
            AccountRow {
                id: a.id.clone(),
                name: a.name.clone(),
                contact: a.contact.clone(),
                total_boxes: stats.total_boxes,
                total_amount: format!("{:.2}", stats.total_amount),
                pending: format!("{:.2}", stats.pending),
            }
        })
        .collect()
}

fn show<B: BlobStore>(
    k: &Khata<B>,
    kind: AccountKind,
    sub: &clap::ArgMatches,
    cfg: &Config,
) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap().trim();
    let account = k.account(kind, id)?;
    let stats = account_stats(kind, account);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), account)? {
        return Ok(());
    }
    println!("{} {} ({})", kind.label(), account.name, account.id);
    if !account.contact.is_empty() {
        println!("Contact: {}", account.contact);
    }
    if !account.address.is_empty() {
        println!("Address: {}", account.address);
    }
    let sym = &cfg.currency_symbol;
    println!(
        "Boxes: {} | Total: {} | Pending: {}",
        stats.total_boxes,
        fmt_money(&stats.total_amount, sym),
        fmt_money(&stats.pending, sym)
    );
    let rows = account
        .transactions
        .iter()
        .map(|t| {
            vec![
                t.id.clone(),
                t.date.to_string(),
                t.variety.clone(),
                t.boxes.to_string(),
                t.rate.to_string(),
                t.commission.to_string(),
                t.transport.to_string(),
                format!("{:.2}", t.total),
                t.payment_status.to_string(),
                t.notes.clone(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &[
                "ID",
                "Date",
                "Variety",
                "Boxes",
                "Rate",
                "Commission",
                "Transport",
                "Total",
                "Status",
                "Notes"
            ],
            rows
        )
    );
    Ok(())
}
