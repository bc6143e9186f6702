// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::calc::{TransactionInput, parse_boxes};
use crate::db::BlobStore;
use crate::models::{AccountKind, PaymentStatus};
use crate::store::Khata;
use crate::utils::{parse_date, parse_decimal, parse_kind, today};
use anyhow::{Result, anyhow};

pub fn handle<B: BlobStore>(k: &mut Khata<B>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(k, sub)?,
        Some(("edit", sub)) => edit(k, sub)?,
        Some(("status", sub)) => {
            let (kind, account) = scope(sub)?;
            let id = sub.get_one::<String>("id").unwrap().trim();
            let status = parse_status(sub.get_one::<String>("status").unwrap())?;
            k.set_status(kind, &account, id, status)?;
            println!("Transaction {} is now {}", id, status);
        }
        Some(("rm", sub)) => {
            let (kind, account) = scope(sub)?;
            let id = sub.get_one::<String>("id").unwrap().trim();
            k.delete_transaction(kind, &account, id)?;
            println!("Removed transaction {}", id);
        }
        _ => {}
    }
    Ok(())
}

fn scope(sub: &clap::ArgMatches) -> Result<(AccountKind, String)> {
    let kind = parse_kind(sub.get_one::<String>("kind").unwrap())?;
    let account = sub.get_one::<String>("account").unwrap().trim().to_string();
    Ok((kind, account))
}

fn parse_status(s: &str) -> Result<PaymentStatus> {
    s.parse::<PaymentStatus>().map_err(|e| anyhow!(e))
}

/// Builds the form input; an omitted rate falls back to the variety's default.
pub fn read_input<B: BlobStore>(k: &Khata<B>, sub: &clap::ArgMatches) -> Result<TransactionInput> {
    let date = match sub.get_one::<String>("date") {
        Some(d) => parse_date(d)?,
        None => today(),
    };
    let variety = sub.get_one::<String>("variety").unwrap().trim().to_string();
    let boxes = parse_boxes(sub.get_one::<String>("boxes").unwrap())?;
    let rate = match sub.get_one::<String>("rate") {
        Some(r) => parse_decimal(r)?,
        None => k.default_rate_for(&variety),
    };
    let commission = parse_decimal(sub.get_one::<String>("commission").unwrap())?;
    let transport = parse_decimal(sub.get_one::<String>("transport").unwrap())?;
    let payment_status = sub
        .get_one::<String>("status")
        .map(|s| parse_status(s))
        .transpose()?;
    Ok(TransactionInput {
        date,
        variety,
        boxes,
        box_type: sub.get_one::<String>("box_type").unwrap().clone(),
        rate,
        commission,
        transport,
        payment_status,
        notes: sub.get_one::<String>("notes").unwrap().clone(),
    })
}

fn add<B: BlobStore>(k: &mut Khata<B>, sub: &clap::ArgMatches) -> Result<()> {
    let (kind, account) = scope(sub)?;
    let input = read_input(k, sub)?;
    let tx = k.add_transaction(kind, &account, input)?;
    println!(
        "Recorded {} boxes of {} on {} for {} (total {:.2}, id {})",
        tx.boxes, tx.variety, tx.date, account, tx.total, tx.id
    );
    Ok(())
}

fn edit<B: BlobStore>(k: &mut Khata<B>, sub: &clap::ArgMatches) -> Result<()> {
    let (kind, account) = scope(sub)?;
    let id = sub.get_one::<String>("id").unwrap().trim().to_string();
    let input = read_input(k, sub)?;
    k.edit_transaction(kind, &account, &id, input)?;
    println!("Updated transaction {}", id);
    Ok(())
}
