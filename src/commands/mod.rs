// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod accounts;
pub mod transactions;
pub mod expenses;
pub mod varieties;
pub mod reports;
pub mod khata;
pub mod bill;
pub mod data;
pub mod prefs;
pub mod doctor;

use crate::config::Config;
use crate::db::BlobStore;
use crate::models::AccountKind;
use crate::store::Khata;
use anyhow::Result;

/// Routes a parsed `mandi` command line to its handler.
pub fn run<B: BlobStore>(k: &mut Khata<B>, matches: &clap::ArgMatches, cfg: &Config) -> Result<()> {
    match matches.subcommand() {
        Some(("grower", sub)) => accounts::handle(k, AccountKind::Grower, sub, cfg)?,
        Some(("customer", sub)) => accounts::handle(k, AccountKind::Customer, sub, cfg)?,
        Some(("tx", sub)) => transactions::handle(k, sub)?,
        Some(("expense", sub)) => expenses::handle(k, sub)?,
        Some(("variety", sub)) => varieties::handle(k, sub)?,
        Some(("dashboard", sub)) => reports::dashboard_cmd(k, sub, cfg)?,
        Some(("stock", sub)) => reports::stock_cmd(k, sub)?,
        Some(("profit", sub)) => reports::profit_cmd(k, sub, cfg)?,
        Some(("khata", sub)) => khata::handle(k, sub, cfg)?,
        Some(("bill", sub)) => bill::handle(k, sub, cfg)?,
        Some(("data", sub)) => data::handle(k, sub)?,
        Some(("prefs", sub)) => prefs::handle(k, sub)?,
        Some(("doctor", _)) => doctor::handle(k)?,
        _ => {}
    }
    Ok(())
}
