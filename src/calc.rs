// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Transaction totals and per-account statistics.
//!
//! Everything here is a pure function of its arguments.

use crate::error::{KhataError, KhataResult};
use crate::models::{Account, AccountKind, PaymentStatus, Transaction};
use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

/// Currency amounts are kept to paise.
pub fn round_money(d: Decimal) -> Decimal {
    d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Upper bound for any single rate, charge, total or expense. Keeps every sum
/// over the book far inside `Decimal`'s range.
pub fn max_amount() -> Decimal {
    Decimal::from(1_000_000_000_000_000i64)
}

fn too_large(field: &str) -> KhataError {
    KhataError::validation(format!("{} is too large (limit {})", field, max_amount()))
}

/// Rejects negative values and values above [`max_amount`].
pub fn check_amount(field: &str, v: Decimal) -> KhataResult<Decimal> {
    if v.is_sign_negative() && !v.is_zero() {
        return Err(KhataError::validation(format!(
            "{} must not be negative (got {})",
            field, v
        )));
    }
    if v > max_amount() {
        return Err(too_large(field));
    }
    Ok(v)
}

/// Purchases add commission and transport to what the grower is owed; sales
/// deduct them from what the customer pays.
pub fn compute_total(
    kind: AccountKind,
    boxes: u32,
    rate: Decimal,
    commission: Decimal,
    transport: Decimal,
) -> KhataResult<Decimal> {
    let rate = check_amount("rate", rate)?;
    let commission = check_amount("commission", commission)?;
    let transport = check_amount("transport", transport)?;
    let gross = Decimal::from(boxes)
        .checked_mul(rate)
        .ok_or_else(|| too_large("amount"))?;
    let total = match kind {
        AccountKind::Grower => gross
            .checked_add(commission)
            .and_then(|t| t.checked_add(transport)),
        AccountKind::Customer => gross
            .checked_sub(commission)
            .and_then(|t| t.checked_sub(transport)),
    }
    .ok_or_else(|| too_large("amount"))?;
    if total.abs() > max_amount() {
        return Err(too_large("total"));
    }
    Ok(round_money(total))
}

/// Accepts only a whole, non-negative number of boxes.
pub fn parse_boxes(s: &str) -> KhataResult<u32> {
    let t = s.trim();
    if t.is_empty() {
        return Err(KhataError::validation("boxes is required"));
    }
    t.parse::<u32>().map_err(|_| {
        KhataError::validation(format!(
            "boxes must be a non-negative whole number (got '{}')",
            t
        ))
    })
}

/// Form fields for creating or editing a transaction.
#[derive(Debug, Clone)]
pub struct TransactionInput {
    pub date: NaiveDate,
    pub variety: String,
    pub boxes: u32,
    pub box_type: String,
    pub rate: Decimal,
    pub commission: Decimal,
    pub transport: Decimal,
    /// `None` means the kind's unsettled status.
    pub payment_status: Option<PaymentStatus>,
    pub notes: String,
}

impl TransactionInput {
    pub fn new(date: NaiveDate, variety: &str, boxes: u32, rate: Decimal) -> Self {
        Self {
            date,
            variety: variety.to_string(),
            boxes,
            box_type: String::new(),
            rate,
            commission: Decimal::ZERO,
            transport: Decimal::ZERO,
            payment_status: None,
            notes: String::new(),
        }
    }

    pub fn commission(mut self, c: Decimal) -> Self {
        self.commission = c;
        self
    }

    pub fn transport(mut self, t: Decimal) -> Self {
        self.transport = t;
        self
    }

    pub fn status(mut self, s: PaymentStatus) -> Self {
        self.payment_status = Some(s);
        self
    }

    /// Validates the input and produces the stored record with its total.
    pub fn into_transaction(self, kind: AccountKind, id: String) -> KhataResult<Transaction> {
        let variety = self.variety.trim().to_string();
        if variety.is_empty() {
            return Err(KhataError::validation("variety is required"));
        }
        let status = self.payment_status.unwrap_or_else(|| kind.unsettled());
        check_status(kind, status)?;
        let total = compute_total(kind, self.boxes, self.rate, self.commission, self.transport)?;
        Ok(Transaction {
            id,
            date: self.date,
            variety,
            boxes: self.boxes,
            box_type: self.box_type.trim().to_string(),
            rate: self.rate,
            commission: self.commission,
            transport: self.transport,
            payment_status: status,
            notes: self.notes,
            total,
        })
    }
}

pub fn check_status(kind: AccountKind, status: PaymentStatus) -> KhataResult<()> {
    if kind.accepts(status) {
        Ok(())
    } else {
        Err(KhataError::validation(format!(
            "status '{}' is not valid for a {} (use '{}' or '{}')",
            status,
            kind,
            kind.unsettled(),
            kind.settled()
        )))
    }
}

/// Re-derives a stored transaction's total and checks its fields. Used when
/// records arrive from an import or a backup.
pub fn revalidate(kind: AccountKind, tx: &mut Transaction) -> KhataResult<()> {
    check_status(kind, tx.payment_status)?;
    tx.total = compute_total(kind, tx.boxes, tx.rate, tx.commission, tx.transport)
        .map_err(|e| KhataError::validation(format!("transaction {}: {}", tx.id, e)))?;
    Ok(())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AccountStats {
    pub total_boxes: u64,
    pub total_amount: Decimal,
    pub pending: Decimal,
}

pub fn account_stats(kind: AccountKind, account: &Account) -> AccountStats {
    let unsettled = kind.unsettled();
    let mut stats = AccountStats::default();
    for tx in &account.transactions {
        stats.total_boxes += u64::from(tx.boxes);
        stats.total_amount += tx.total;
        if tx.payment_status == unsettled {
            stats.pending += tx.total;
        }
    }
    stats
}
