// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Account, AccountKind, Profile, Transaction};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

/// Everything a renderer needs to print one account's pending bill.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BillData {
    pub kind: AccountKind,
    pub title: &'static str,
    pub account_id: String,
    pub account_name: String,
    pub contact: String,
    pub issuer: Profile,
    pub date: NaiveDate,
    pub line_items: Vec<Transaction>,
    pub total_pending: Decimal,
}

impl BillData {
    /// Ids to hand to `settle_items` once the bill is printed.
    pub fn item_ids(&self) -> Vec<String> {
        self.line_items.iter().map(|t| t.id.clone()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "bill", rename_all = "lowercase")]
pub enum Bill {
    /// No unsettled transactions; nothing to print.
    Empty,
    Ready(BillData),
}

pub fn bill_title(kind: AccountKind) -> &'static str {
    match kind {
        AccountKind::Grower => "PURCHASE RECEIPT",
        AccountKind::Customer => "SALES INVOICE",
    }
}

/// Unsettled transactions of `account` in store order.
pub fn build_bill_data(
    kind: AccountKind,
    account: &Account,
    issuer: &Profile,
    today: NaiveDate,
) -> Bill {
    let unsettled = kind.unsettled();
    let line_items: Vec<Transaction> = account
        .transactions
        .iter()
        .filter(|t| t.payment_status == unsettled)
        .cloned()
        .collect();
    if line_items.is_empty() {
        return Bill::Empty;
    }
    let total_pending = line_items.iter().map(|t| t.total).sum();
    Bill::Ready(BillData {
        kind,
        title: bill_title(kind),
        account_id: account.id.clone(),
        account_name: account.name.clone(),
        contact: account.contact.clone(),
        issuer: issuer.clone(),
        date: today,
        line_items,
        total_pending,
    })
}
