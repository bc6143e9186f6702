// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Payment-status transitions.
//!
//! Grower transactions move `due -> paid`, customer transactions
//! `pending -> received`. Bulk operations only move forward and are no-ops
//! (no write) when nothing is left to settle. A single transaction can be set
//! to either state by hand.

use crate::calc::check_status;
use crate::db::BlobStore;
use crate::error::{KhataError, KhataResult};
use crate::models::{Account, AccountKind, PaymentStatus};
use crate::store::{Collection, Khata};
use log::info;

fn settle_in(kind: AccountKind, account: &mut Account, only: Option<&[String]>) -> usize {
    let (from, to) = (kind.unsettled(), kind.settled());
    let mut changed = 0;
    for tx in account.transactions.iter_mut() {
        if tx.payment_status != from {
            continue;
        }
        if only.is_some_and(|ids| !ids.iter().any(|id| *id == tx.id)) {
            continue;
        }
        tx.payment_status = to;
        changed += 1;
    }
    changed
}

fn unsettled_count(kind: AccountKind, account: &Account, only: Option<&[String]>) -> usize {
    let from = kind.unsettled();
    account
        .transactions
        .iter()
        .filter(|t| t.payment_status == from)
        .filter(|t| only.is_none_or(|ids| ids.iter().any(|id| *id == t.id)))
        .count()
}

impl<B: BlobStore> Khata<B> {
    /// Manual override on one record. Moving a settled transaction back to
    /// unsettled is allowed.
    pub fn set_status(
        &mut self,
        kind: AccountKind,
        account_id: &str,
        tx_id: &str,
        status: PaymentStatus,
    ) -> KhataResult<()> {
        check_status(kind, status)?;
        self.commit(&[Collection::for_kind(kind)], |book| {
            let tx = book
                .account_mut(kind, account_id)?
                .transactions
                .iter_mut()
                .find(|t| t.id == tx_id)
                .ok_or_else(|| KhataError::not_found("transaction", tx_id))?;
            tx.payment_status = status;
            Ok(())
        })?;
        info!("set {} on transaction {} to {}", kind, tx_id, status);
        Ok(())
    }

    /// "Mark paid" / "mark received" for one account. Returns how many
    /// transactions changed.
    pub fn settle_account(&mut self, kind: AccountKind, account_id: &str) -> KhataResult<usize> {
        self.settle_scoped(kind, account_id, None)
    }

    /// "Mark as printed": settles exactly the given transactions of one account.
    pub fn settle_items(
        &mut self,
        kind: AccountKind,
        account_id: &str,
        tx_ids: &[String],
    ) -> KhataResult<usize> {
        self.settle_scoped(kind, account_id, Some(tx_ids))
    }

    fn settle_scoped(
        &mut self,
        kind: AccountKind,
        account_id: &str,
        only: Option<&[String]>,
    ) -> KhataResult<usize> {
        let account = self
            .book
            .account(kind, account_id)
            .ok_or_else(|| KhataError::not_found(kind.id_prefix(), account_id))?;
        if unsettled_count(kind, account, only) == 0 {
            return Ok(0);
        }
        let changed = self.commit(&[Collection::for_kind(kind)], |book| {
            Ok(settle_in(kind, book.account_mut(kind, account_id)?, only))
        })?;
        info!(
            "settled {} transactions on {} {} as {}",
            changed,
            kind,
            account_id,
            kind.settled()
        );
        Ok(changed)
    }

    /// "Mark all paid" / "mark all received" across every account of `kind`.
    pub fn settle_all(&mut self, kind: AccountKind) -> KhataResult<usize> {
        let pending: usize = self
            .book
            .accounts(kind)
            .iter()
            .map(|a| unsettled_count(kind, a, None))
            .sum();
        if pending == 0 {
            return Ok(0);
        }
        let changed: usize = self.commit(&[Collection::for_kind(kind)], |book| {
            Ok(book
                .accounts_mut(kind)
                .iter_mut()
                .map(|a| settle_in(kind, a, None))
                .sum::<usize>())
        })?;
        info!("settled {} {} transactions as {}", changed, kind, kind.settled());
        Ok(changed)
    }
}
