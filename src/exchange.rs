// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Full-document JSON export/import and the khata CSV.

use crate::aggregate::khata;
use crate::calc;
use crate::db::BlobStore;
use crate::error::{KhataError, KhataResult};
use crate::models::{Account, AccountKind, Document, Expense, Preferences, Variety};
use crate::store::{Book, Collection, Khata};
use log::info;
use serde::Deserialize;
use std::collections::HashSet;

/// Import shape: every key optional, absent keys keep the current value.
#[derive(Debug, Deserialize)]
struct ImportDocument {
    growers: Option<Vec<Account>>,
    customers: Option<Vec<Account>>,
    varieties: Option<Vec<Variety>>,
    prefs: Option<Preferences>,
    expenses: Option<Vec<Expense>>,
}

/// Checks statuses against the account kind and recomputes every total.
pub(crate) fn validated_accounts(
    kind: AccountKind,
    mut accounts: Vec<Account>,
) -> KhataResult<Vec<Account>> {
    let mut seen = HashSet::new();
    for account in accounts.iter_mut() {
        if account.name.trim().is_empty() {
            return Err(KhataError::Import(format!(
                "{} '{}' has no name",
                kind, account.id
            )));
        }
        if !seen.insert(account.id.clone()) {
            return Err(KhataError::Import(format!(
                "duplicate {} id '{}'",
                kind, account.id
            )));
        }
        for tx in account.transactions.iter_mut() {
            calc::revalidate(kind, tx).map_err(|e| {
                KhataError::Import(format!("{} '{}': {}", kind, account.name, e))
            })?;
        }
    }
    Ok(accounts)
}

/// Names must be present and unique ignoring case; rates follow the same
/// bounds as `add_variety`.
pub(crate) fn validated_varieties(mut varieties: Vec<Variety>) -> KhataResult<Vec<Variety>> {
    let mut seen = HashSet::new();
    for v in varieties.iter_mut() {
        v.name = v.name.trim().to_string();
        if v.name.is_empty() {
            return Err(KhataError::Import("variety with an empty name".into()));
        }
        if !seen.insert(v.name.to_lowercase()) {
            return Err(KhataError::Import(format!("duplicate variety '{}'", v.name)));
        }
        calc::check_amount("default rate", v.default_rate)
            .map_err(|e| KhataError::Import(format!("variety '{}': {}", v.name, e)))?;
    }
    Ok(varieties)
}

pub(crate) fn validated_expenses(expenses: &[Expense]) -> KhataResult<()> {
    let mut seen = HashSet::new();
    for e in expenses {
        if e.desc.trim().is_empty() {
            return Err(KhataError::Import(format!("expense '{}' has no description", e.id)));
        }
        if !seen.insert(e.id.as_str()) {
            return Err(KhataError::Import(format!("duplicate expense id '{}'", e.id)));
        }
        calc::check_amount("expense amount", e.amount)
            .map_err(|e2| KhataError::Import(format!("expense '{}': {}", e.id, e2)))?;
    }
    Ok(())
}

/// Transaction ids are unique across growers and customers together.
pub(crate) fn unique_transaction_ids(growers: &[Account], customers: &[Account]) -> KhataResult<()> {
    let mut seen = HashSet::new();
    for tx in growers
        .iter()
        .chain(customers)
        .flat_map(|a| a.transactions.iter())
    {
        if !seen.insert(tx.id.as_str()) {
            return Err(KhataError::Import(format!("duplicate transaction id '{}'", tx.id)));
        }
    }
    Ok(())
}

impl<B: BlobStore> Khata<B> {
    pub fn export_all(&self) -> Document {
        self.book.document()
    }

    pub fn export_json(&self) -> KhataResult<String> {
        serde_json::to_string_pretty(&self.export_all())
            .map_err(|e| KhataError::Persistence(format!("serialize export: {}", e)))
    }

    /// Replaces the collections present in `json` and persists all five in one
    /// write. Nothing changes unless the whole document is usable.
    pub fn import_all(&mut self, json: &str) -> KhataResult<()> {
        let value: serde_json::Value = serde_json::from_str(json)
            .map_err(|e| KhataError::Import(format!("malformed JSON: {}", e)))?;
        if !value.is_object() {
            return Err(KhataError::Import(
                "expected a JSON object with growers/customers/varieties/prefs/expenses".into(),
            ));
        }
        let doc: ImportDocument = serde_json::from_value(value)
            .map_err(|e| KhataError::Import(format!("unexpected document shape: {}", e)))?;

        let growers = doc
            .growers
            .map(|g| validated_accounts(AccountKind::Grower, g))
            .transpose()?;
        let customers = doc
            .customers
            .map(|c| validated_accounts(AccountKind::Customer, c))
            .transpose()?;
        unique_transaction_ids(
            growers.as_deref().unwrap_or(&self.book.growers),
            customers.as_deref().unwrap_or(&self.book.customers),
        )?;
        if let Some(ref e) = doc.expenses {
            validated_expenses(e)?;
        }
        let varieties = doc.varieties.map(validated_varieties).transpose()?;
        let prefs = doc.prefs;
        let expenses = doc.expenses;

        self.commit(&Collection::ALL, move |book| {
            if let Some(g) = growers {
                book.growers = g;
            }
            if let Some(c) = customers {
                book.customers = c;
            }
            if let Some(v) = varieties {
                book.varieties = v;
            }
            if let Some(p) = prefs {
                book.prefs = p;
            }
            if let Some(e) = expenses {
                book.expenses = e;
            }
            Ok(())
        })?;
        info!("imported document");
        Ok(())
    }
}

/// `Type,Name,Pending Amount` rows for every account with a positive pending
/// balance, growers first. Starts with a UTF-8 BOM so spreadsheet apps pick
/// the right encoding.
pub fn khata_csv(book: &Book) -> KhataResult<Vec<u8>> {
    let view = khata(book);
    let mut buf = Vec::new();
    buf.extend_from_slice("\u{feff}".as_bytes());
    let mut wtr = csv::Writer::from_writer(buf);
    let csv_err = |e: csv::Error| KhataError::Persistence(format!("write csv: {}", e));
    wtr.write_record(["Type", "Name", "Pending Amount"])
        .map_err(csv_err)?;
    for (label, entries) in [("Grower", &view.growers), ("Customer", &view.customers)] {
        for entry in entries {
            let amount = format!("{:.2}", entry.amount);
            wtr.write_record([label, entry.name.as_str(), amount.as_str()])
                .map_err(csv_err)?;
        }
    }
    wtr.into_inner()
        .map_err(|e| KhataError::Persistence(format!("write csv: {}", e)))
}
