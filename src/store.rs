// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The entity store and the coordinator that owns it.
//!
//! All mutations go through [`Khata`]. Each one is applied to a staged copy of
//! the [`Book`], the touched collections are written in a single atomic
//! `put_many`, and only then does the staged copy replace the live book. A
//! failed write leaves memory and storage as they were.

use crate::calc::{self, TransactionInput};
use crate::db::BlobStore;
use crate::error::{KhataError, KhataResult};
use crate::models::{
    Account, AccountKind, Document, Expense, Preferences, Profile, Transaction, Variety,
    seed_varieties,
};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use log::{debug, info, warn};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Growers,
    Customers,
    Varieties,
    Prefs,
    Expenses,
}

impl Collection {
    pub const ALL: [Collection; 5] = [
        Collection::Growers,
        Collection::Customers,
        Collection::Varieties,
        Collection::Prefs,
        Collection::Expenses,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Collection::Growers => "growers",
            Collection::Customers => "customers",
            Collection::Varieties => "varieties",
            Collection::Prefs => "prefs",
            Collection::Expenses => "expenses",
        }
    }

    pub fn for_kind(kind: AccountKind) -> Self {
        match kind {
            AccountKind::Grower => Collection::Growers,
            AccountKind::Customer => Collection::Customers,
        }
    }
}

/// In-memory collections.
#[derive(Debug, Clone, PartialEq)]
pub struct Book {
    pub growers: Vec<Account>,
    pub customers: Vec<Account>,
    pub varieties: Vec<Variety>,
    pub prefs: Preferences,
    pub expenses: Vec<Expense>,
}

impl Default for Book {
    fn default() -> Self {
        Self {
            growers: Vec::new(),
            customers: Vec::new(),
            varieties: seed_varieties(),
            prefs: Preferences::default(),
            expenses: Vec::new(),
        }
    }
}

fn read_key<B: BlobStore, T: DeserializeOwned>(backend: &B, key: &str) -> KhataResult<Option<T>> {
    match backend.get(key)? {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| KhataError::Persistence(format!("stored '{}' is unreadable: {}", key, e))),
        None => Ok(None),
    }
}

impl Book {
    /// Reads every collection; missing keys fall back to empty lists, default
    /// preferences and the seed varieties.
    pub fn load<B: BlobStore>(backend: &B) -> KhataResult<Self> {
        let defaults = Book::default();
        let book = Book {
            growers: read_key(backend, "growers")?.unwrap_or(defaults.growers),
            customers: read_key(backend, "customers")?.unwrap_or(defaults.customers),
            varieties: read_key(backend, "varieties")?.unwrap_or(defaults.varieties),
            prefs: read_key(backend, "prefs")?.unwrap_or(defaults.prefs),
            expenses: read_key(backend, "expenses")?.unwrap_or(defaults.expenses),
        };
        debug!(
            "loaded {} growers, {} customers, {} varieties, {} expenses",
            book.growers.len(),
            book.customers.len(),
            book.varieties.len(),
            book.expenses.len()
        );
        Ok(book)
    }

    pub fn serialize(&self, c: Collection) -> KhataResult<String> {
        let res = match c {
            Collection::Growers => serde_json::to_string(&self.growers),
            Collection::Customers => serde_json::to_string(&self.customers),
            Collection::Varieties => serde_json::to_string(&self.varieties),
            Collection::Prefs => serde_json::to_string(&self.prefs),
            Collection::Expenses => serde_json::to_string(&self.expenses),
        };
        res.map_err(|e| KhataError::Persistence(format!("serialize {}: {}", c.key(), e)))
    }

    pub fn accounts(&self, kind: AccountKind) -> &[Account] {
        match kind {
            AccountKind::Grower => &self.growers,
            AccountKind::Customer => &self.customers,
        }
    }

    pub fn accounts_mut(&mut self, kind: AccountKind) -> &mut Vec<Account> {
        match kind {
            AccountKind::Grower => &mut self.growers,
            AccountKind::Customer => &mut self.customers,
        }
    }

    pub fn account(&self, kind: AccountKind, id: &str) -> Option<&Account> {
        self.accounts(kind).iter().find(|a| a.id == id)
    }

    pub(crate) fn account_mut(&mut self, kind: AccountKind, id: &str) -> KhataResult<&mut Account> {
        self.accounts_mut(kind)
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| KhataError::not_found(kind.id_prefix(), id))
    }

    pub fn variety(&self, name: &str) -> Option<&Variety> {
        self.varieties
            .iter()
            .find(|v| v.name.eq_ignore_ascii_case(name.trim()))
    }

    fn has_transaction_id(&self, id: &str) -> bool {
        self.growers
            .iter()
            .chain(self.customers.iter())
            .any(|a| a.transaction(id).is_some())
    }

    pub fn document(&self) -> Document {
        Document {
            growers: self.growers.clone(),
            customers: self.customers.clone(),
            varieties: self.varieties.clone(),
            prefs: self.prefs.clone(),
            expenses: self.expenses.clone(),
        }
    }
}

/// Time-based id `<prefix>_<millis>`, bumped until it is free.
fn next_id(prefix: &str, taken: impl Fn(&str) -> bool) -> String {
    let mut millis = Utc::now().timestamp_millis();
    loop {
        let id = format!("{}_{}", prefix, millis);
        if !taken(&id) {
            return id;
        }
        millis += 1;
    }
}

fn required(field: &str, v: &str) -> KhataResult<String> {
    let t = v.trim();
    if t.is_empty() {
        return Err(KhataError::validation(format!("{} is required", field)));
    }
    Ok(t.to_string())
}

/// Single owner of the book and its storage backend.
pub struct Khata<B: BlobStore> {
    pub(crate) book: Book,
    pub(crate) backend: B,
    pub(crate) backup_interval: Duration,
    pub(crate) last_backup: Option<DateTime<Utc>>,
}

impl<B: BlobStore> Khata<B> {
    pub fn open(backend: B) -> KhataResult<Self> {
        let book = Book::load(&backend)?;
        let last_backup = crate::backup::stored_timestamp(&backend)?;
        Ok(Self {
            book,
            backend,
            backup_interval: Duration::hours(24),
            last_backup,
        })
    }

    pub fn with_backup_interval(mut self, interval: Duration) -> Self {
        self.backup_interval = interval;
        self
    }

    pub fn book(&self) -> &Book {
        &self.book
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Applies `f` to a staged copy and persists `touched` before swapping it in.
    pub(crate) fn commit<T>(
        &mut self,
        touched: &[Collection],
        f: impl FnOnce(&mut Book) -> KhataResult<T>,
    ) -> KhataResult<T> {
        let mut staged = self.book.clone();
        let out = f(&mut staged)?;
        let mut entries = Vec::with_capacity(touched.len());
        for c in touched {
            entries.push((c.key(), staged.serialize(*c)?));
        }
        if let Err(e) = self.backend.put_many(&entries) {
            warn!("write of {:?} failed, keeping previous state: {}", touched, e);
            return Err(e);
        }
        self.book = staged;
        Ok(out)
    }

    /// Persists the current state of one collection.
    pub fn save(&mut self, c: Collection) -> KhataResult<()> {
        let raw = self.book.serialize(c)?;
        self.backend.put(c.key(), raw)
    }

    // ---- accounts ----

    pub fn accounts(&self, kind: AccountKind) -> &[Account] {
        self.book.accounts(kind)
    }

    pub fn account(&self, kind: AccountKind, id: &str) -> KhataResult<&Account> {
        self.book
            .account(kind, id)
            .ok_or_else(|| KhataError::not_found(kind.id_prefix(), id))
    }

    /// Case-insensitive substring match on the account name.
    pub fn search_accounts(&self, kind: AccountKind, query: &str) -> Vec<&Account> {
        let q = query.trim().to_lowercase();
        self.book
            .accounts(kind)
            .iter()
            .filter(|a| a.name.to_lowercase().contains(&q))
            .collect()
    }

    pub fn add_account(
        &mut self,
        kind: AccountKind,
        name: &str,
        contact: &str,
        address: &str,
    ) -> KhataResult<String> {
        let name = required("name", name)?;
        let contact = contact.trim().to_string();
        let address = address.trim().to_string();
        let id = self.commit(&[Collection::for_kind(kind)], |book| {
            let id = next_id(kind.id_prefix(), |c| {
                book.accounts(kind).iter().any(|a| a.id == c)
            });
            book.accounts_mut(kind).push(Account {
                id: id.clone(),
                name,
                contact,
                address,
                transactions: Vec::new(),
            });
            Ok(id)
        })?;
        info!("added {} {}", kind, id);
        Ok(id)
    }

    /// Removes the account and every transaction it owns.
    pub fn delete_account(&mut self, kind: AccountKind, id: &str) -> KhataResult<Account> {
        let removed = self.commit(&[Collection::for_kind(kind)], |book| {
            let list = book.accounts_mut(kind);
            let pos = list
                .iter()
                .position(|a| a.id == id)
                .ok_or_else(|| KhataError::not_found(kind.id_prefix(), id))?;
            Ok(list.remove(pos))
        })?;
        info!(
            "deleted {} {} with {} transactions",
            kind,
            id,
            removed.transactions.len()
        );
        Ok(removed)
    }

    // ---- transactions ----

    pub fn add_transaction(
        &mut self,
        kind: AccountKind,
        account_id: &str,
        input: TransactionInput,
    ) -> KhataResult<Transaction> {
        let tx = self.commit(&[Collection::for_kind(kind)], |book| {
            let id = next_id("tx", |c| book.has_transaction_id(c));
            let tx = input.into_transaction(kind, id)?;
            book.account_mut(kind, account_id)?.transactions.push(tx.clone());
            Ok(tx)
        })?;
        info!("recorded transaction {} on {} {}", tx.id, kind, account_id);
        Ok(tx)
    }

    /// Replaces the transaction in place; the id and position are kept and the
    /// total is recomputed. An input without a status keeps the current one.
    pub fn edit_transaction(
        &mut self,
        kind: AccountKind,
        account_id: &str,
        tx_id: &str,
        mut input: TransactionInput,
    ) -> KhataResult<()> {
        self.commit(&[Collection::for_kind(kind)], |book| {
            let account = book.account_mut(kind, account_id)?;
            let slot = account
                .transactions
                .iter_mut()
                .find(|t| t.id == tx_id)
                .ok_or_else(|| KhataError::not_found("transaction", tx_id))?;
            input.payment_status.get_or_insert(slot.payment_status);
            *slot = input.into_transaction(kind, tx_id.to_string())?;
            Ok(())
        })?;
        info!("edited transaction {} on {} {}", tx_id, kind, account_id);
        Ok(())
    }

    pub fn delete_transaction(
        &mut self,
        kind: AccountKind,
        account_id: &str,
        tx_id: &str,
    ) -> KhataResult<()> {
        self.commit(&[Collection::for_kind(kind)], |book| {
            let account = book.account_mut(kind, account_id)?;
            let before = account.transactions.len();
            account.transactions.retain(|t| t.id != tx_id);
            if account.transactions.len() == before {
                return Err(KhataError::not_found("transaction", tx_id));
            }
            Ok(())
        })?;
        info!("deleted transaction {} from {} {}", tx_id, kind, account_id);
        Ok(())
    }

    // ---- varieties ----

    pub fn varieties(&self) -> &[Variety] {
        &self.book.varieties
    }

    pub fn add_variety(&mut self, name: &str, default_rate: Decimal) -> KhataResult<()> {
        let name = required("variety name", name)?;
        calc::check_amount("default rate", default_rate)?;
        if self.book.variety(&name).is_some() {
            return Err(KhataError::validation(format!(
                "variety '{}' already exists",
                name
            )));
        }
        self.commit(&[Collection::Varieties], |book| {
            book.varieties.push(Variety::new(&name, default_rate));
            Ok(())
        })?;
        info!("added variety {}", name);
        Ok(())
    }

    pub fn set_variety_rate(&mut self, name: &str, default_rate: Decimal) -> KhataResult<()> {
        calc::check_amount("default rate", default_rate)?;
        self.commit(&[Collection::Varieties], |book| {
            let v = book
                .varieties
                .iter_mut()
                .find(|v| v.name.eq_ignore_ascii_case(name.trim()))
                .ok_or_else(|| KhataError::not_found("variety", name))?;
            v.default_rate = default_rate;
            Ok(())
        })
    }

    /// Transactions keep the name string; nothing cascades.
    pub fn delete_variety(&mut self, name: &str) -> KhataResult<()> {
        self.commit(&[Collection::Varieties], |book| {
            let pos = book
                .varieties
                .iter()
                .position(|v| v.name.eq_ignore_ascii_case(name.trim()))
                .ok_or_else(|| KhataError::not_found("variety", name))?;
            book.varieties.remove(pos);
            Ok(())
        })?;
        info!("deleted variety {}", name);
        Ok(())
    }

    /// Rate to pre-fill when a transaction is entered without one.
    pub fn default_rate_for(&self, variety: &str) -> Decimal {
        self.book
            .variety(variety)
            .map(|v| v.default_rate)
            .unwrap_or(Decimal::ZERO)
    }

    // ---- expenses ----

    pub fn add_expense(
        &mut self,
        date: NaiveDate,
        desc: &str,
        amount: Decimal,
        category: &str,
    ) -> KhataResult<String> {
        let desc = required("description", desc)?;
        calc::check_amount("expense amount", amount)?;
        let category = category.trim().to_string();
        let id = self.commit(&[Collection::Expenses], |book| {
            let id = next_id("exp", |c| book.expenses.iter().any(|e| e.id == c));
            book.expenses.push(Expense {
                id: id.clone(),
                date,
                desc,
                amount: calc::round_money(amount),
                category,
            });
            Ok(id)
        })?;
        info!("added expense {}", id);
        Ok(id)
    }

    pub fn delete_expense(&mut self, id: &str) -> KhataResult<()> {
        self.commit(&[Collection::Expenses], |book| {
            let pos = book
                .expenses
                .iter()
                .position(|e| e.id == id)
                .ok_or_else(|| KhataError::not_found("expense", id))?;
            book.expenses.remove(pos);
            Ok(())
        })?;
        info!("deleted expense {}", id);
        Ok(())
    }

    pub fn expenses_newest_first(&self) -> Vec<&Expense> {
        let mut items: Vec<&Expense> = self.book.expenses.iter().collect();
        items.sort_by(|a, b| b.date.cmp(&a.date));
        items
    }

    // ---- preferences ----

    pub fn prefs(&self) -> &Preferences {
        &self.book.prefs
    }

    pub fn set_profile(&mut self, profile: Profile) -> KhataResult<()> {
        self.commit(&[Collection::Prefs], |book| {
            book.prefs.profile = Profile {
                name: profile.name.trim().to_string(),
                mandi: profile.mandi.trim().to_string(),
                phone: profile.phone.trim().to_string(),
                gst: profile.gst.trim().to_string(),
                address: profile.address.trim().to_string(),
            };
            Ok(())
        })
    }

    pub fn set_dark_mode(&mut self, on: bool) -> KhataResult<()> {
        self.commit(&[Collection::Prefs], |book| {
            book.prefs.dark_mode = on;
            Ok(())
        })
    }
}
