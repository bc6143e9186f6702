// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Rolling full-state snapshot kept under the `auto_backup` key.

use crate::db::BlobStore;
use crate::error::{KhataError, KhataResult};
use crate::exchange::{
    unique_transaction_ids, validated_accounts, validated_expenses, validated_varieties,
};
use crate::models::{Account, AccountKind, Expense, Preferences, Variety};
use crate::store::{Collection, Khata};
use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};

pub const BACKUP_KEY: &str = "auto_backup";

#[derive(Debug, Clone, Serialize)]
pub struct Backup<'a> {
    pub timestamp: DateTime<Utc>,
    pub growers: &'a [Account],
    pub customers: &'a [Account],
    pub expenses: &'a [Expense],
    pub varieties: &'a [Variety],
    pub prefs: &'a Preferences,
}

#[derive(Debug, Deserialize)]
struct StoredBackup {
    growers: Option<Vec<Account>>,
    customers: Option<Vec<Account>>,
    expenses: Option<Vec<Expense>>,
    varieties: Option<Vec<Variety>>,
    prefs: Option<Preferences>,
}

#[derive(Debug, Deserialize)]
struct Stamp {
    timestamp: DateTime<Utc>,
}

/// When the last snapshot was taken, if there is a readable one.
pub fn stored_timestamp<B: BlobStore>(backend: &B) -> KhataResult<Option<DateTime<Utc>>> {
    let Some(raw) = backend.get(BACKUP_KEY)? else {
        return Ok(None);
    };
    match serde_json::from_str::<Stamp>(&raw) {
        Ok(s) => Ok(Some(s.timestamp)),
        Err(e) => {
            warn!("ignoring unreadable backup timestamp: {}", e);
            Ok(None)
        }
    }
}

impl<B: BlobStore> Khata<B> {
    /// Writes a snapshot of all five collections.
    pub fn create_backup(&mut self, now: DateTime<Utc>) -> KhataResult<()> {
        let snapshot = Backup {
            timestamp: now,
            growers: &self.book.growers,
            customers: &self.book.customers,
            expenses: &self.book.expenses,
            varieties: &self.book.varieties,
            prefs: &self.book.prefs,
        };
        let raw = serde_json::to_string(&snapshot)
            .map_err(|e| KhataError::Persistence(format!("serialize backup: {}", e)))?;
        self.backend.put(BACKUP_KEY, raw)?;
        self.last_backup = Some(now);
        info!("auto-backup created at {}", now.to_rfc3339());
        Ok(())
    }

    pub fn backup_due(&self, now: DateTime<Utc>) -> bool {
        match self.last_backup {
            Some(last) => now - last >= self.backup_interval,
            None => true,
        }
    }

    /// Timer boundary. Call between operations; takes a snapshot only when the
    /// interval has elapsed. Returns whether one was written.
    pub fn tick(&mut self, now: DateTime<Utc>) -> KhataResult<bool> {
        if !self.backup_due(now) {
            return Ok(false);
        }
        self.create_backup(now)?;
        Ok(true)
    }

    pub fn last_backup(&self) -> Option<DateTime<Utc>> {
        self.last_backup
    }

    /// Replaces every collection with the snapshot. Missing lists restore as
    /// empty; missing preferences keep the current ones.
    pub fn restore_backup(&mut self) -> KhataResult<()> {
        let raw = self
            .backend
            .get(BACKUP_KEY)?
            .ok_or_else(|| KhataError::not_found("backup", BACKUP_KEY))?;
        let stored: StoredBackup = serde_json::from_str(&raw)
            .map_err(|e| KhataError::Import(format!("backup is unreadable: {}", e)))?;
        let growers = validated_accounts(AccountKind::Grower, stored.growers.unwrap_or_default())?;
        let customers =
            validated_accounts(AccountKind::Customer, stored.customers.unwrap_or_default())?;
        unique_transaction_ids(&growers, &customers)?;
        let expenses = stored.expenses.unwrap_or_default();
        validated_expenses(&expenses)?;
        let varieties = validated_varieties(stored.varieties.unwrap_or_default())?;
        let prefs = stored.prefs;
        self.commit(&Collection::ALL, move |book| {
            book.growers = growers;
            book.customers = customers;
            book.expenses = expenses;
            book.varieties = varieties;
            if let Some(p) = prefs {
                book.prefs = p;
            }
            Ok(())
        })?;
        info!("restored state from auto-backup");
        Ok(())
    }
}
