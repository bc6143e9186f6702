// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use mandi_khata::calc::TransactionInput;
use mandi_khata::db::{BlobStore, MemoryStore, SqliteStore};
use mandi_khata::error::KhataError;
use mandi_khata::models::{AccountKind, PaymentStatus, Profile};
use mandi_khata::store::{Collection, Khata};
use rust_decimal::Decimal;

fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn khata() -> Khata<MemoryStore> {
    Khata::open(MemoryStore::new()).unwrap()
}

#[test]
fn fresh_book_has_seed_varieties() {
    let k = khata();
    let names: Vec<&str> = k.varieties().iter().map(|v| v.name.as_str()).collect();
    assert_eq!(names, ["Delicious", "American", "Gala", "Red Chief"]);
    assert!(k.accounts(AccountKind::Grower).is_empty());
    assert!(!k.prefs().dark_mode);
}

#[test]
fn add_account_trims_and_persists() {
    let mut k = khata();
    let id = k
        .add_account(AccountKind::Grower, "  Ramesh ", " 98765 ", "")
        .unwrap();
    assert!(id.starts_with("grower_"));
    let a = k.account(AccountKind::Grower, &id).unwrap();
    assert_eq!(a.name, "Ramesh");
    assert_eq!(a.contact, "98765");
    let raw = k.backend().raw("growers").unwrap();
    assert!(raw.contains("Ramesh"));
    assert!(k.backend().raw("customers").is_none());
}

#[test]
fn account_name_is_required() {
    let mut k = khata();
    let err = k.add_account(AccountKind::Customer, "   ", "", "").unwrap_err();
    assert_eq!(err.code(), "VALIDATION_ERROR");
    assert!(k.accounts(AccountKind::Customer).is_empty());
}

#[test]
fn ids_are_unique_within_a_burst() {
    let mut k = khata();
    let a = k.add_account(AccountKind::Grower, "A", "", "").unwrap();
    let b = k.add_account(AccountKind::Grower, "B", "", "").unwrap();
    let c = k.add_account(AccountKind::Grower, "C", "", "").unwrap();
    assert_ne!(a, b);
    assert_ne!(b, c);
    assert_ne!(a, c);
}

#[test]
fn transaction_lifecycle() {
    let mut k = khata();
    let g = k.add_account(AccountKind::Grower, "G1", "", "").unwrap();
    let input = TransactionInput::new(day("2025-03-01"), "Gala", 10, Decimal::from(100))
        .commission(Decimal::from(20))
        .transport(Decimal::from(10));
    let added = k.add_transaction(AccountKind::Grower, &g, input).unwrap();
    assert!(added.id.starts_with("tx_"));
    assert_eq!(added.total, Decimal::from(1030));
    let tx = added.id.clone();
    let stored = k.account(AccountKind::Grower, &g).unwrap().transaction(&tx).unwrap().clone();
    assert_eq!(stored, added);
    assert_eq!(stored.payment_status, PaymentStatus::Due);

    k.set_status(AccountKind::Grower, &g, &tx, PaymentStatus::Paid).unwrap();
    let edit = TransactionInput::new(day("2025-03-02"), "Gala", 12, Decimal::from(100));
    k.edit_transaction(AccountKind::Grower, &g, &tx, edit).unwrap();
    let edited = k.account(AccountKind::Grower, &g).unwrap().transaction(&tx).unwrap();
    assert_eq!(edited.total, Decimal::from(1200));
    assert_eq!(edited.date, day("2025-03-02"));
    assert_eq!(edited.payment_status, PaymentStatus::Paid);

    k.delete_transaction(AccountKind::Grower, &g, &tx).unwrap();
    assert!(k.account(AccountKind::Grower, &g).unwrap().transactions.is_empty());
    let err = k.delete_transaction(AccountKind::Grower, &g, &tx).unwrap_err();
    assert!(matches!(err, KhataError::NotFound { .. }));
}

#[test]
fn transaction_on_missing_account_is_not_found() {
    let mut k = khata();
    let input = TransactionInput::new(day("2025-03-01"), "Gala", 1, Decimal::ONE);
    let err = k
        .add_transaction(AccountKind::Customer, "customer_404", input)
        .unwrap_err();
    assert_eq!(err.code(), "NOT_FOUND");
    assert_eq!(err.to_string(), "customer 'customer_404' not found");
}

#[test]
fn invalid_transaction_leaves_account_untouched() {
    let mut k = khata();
    let g = k.add_account(AccountKind::Grower, "G1", "", "").unwrap();
    let before = k.book().clone();
    let input = TransactionInput::new(day("2025-03-01"), "Gala", 1, Decimal::from(-5));
    assert!(k.add_transaction(AccountKind::Grower, &g, input).is_err());
    assert_eq!(k.book(), &before);
}

#[test]
fn failed_write_rolls_back_memory() {
    let mut k = khata();
    let g = k.add_account(AccountKind::Grower, "G1", "", "").unwrap();
    let before = k.book().clone();
    k.backend_mut().set_failing(true);
    let err = k.add_account(AccountKind::Grower, "G2", "", "").unwrap_err();
    assert_eq!(err.code(), "PERSISTENCE_ERROR");
    assert_eq!(k.book(), &before);
    assert!(k.delete_account(AccountKind::Grower, &g).is_err());
    assert_eq!(k.accounts(AccountKind::Grower).len(), 1);
}

#[test]
fn delete_account_drops_its_transactions() {
    let mut k = khata();
    let g = k.add_account(AccountKind::Grower, "G1", "", "").unwrap();
    let input = TransactionInput::new(day("2025-03-01"), "Gala", 3, Decimal::from(10));
    k.add_transaction(AccountKind::Grower, &g, input).unwrap();
    let removed = k.delete_account(AccountKind::Grower, &g).unwrap();
    assert_eq!(removed.transactions.len(), 1);
    assert!(k.account(AccountKind::Grower, &g).is_err());
}

#[test]
fn search_is_case_insensitive_substring() {
    let mut k = khata();
    k.add_account(AccountKind::Customer, "Sharma Traders", "", "").unwrap();
    k.add_account(AccountKind::Customer, "Gupta Fruits", "", "").unwrap();
    let hits = k.search_accounts(AccountKind::Customer, "SHARMA");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "Sharma Traders");
    assert_eq!(k.search_accounts(AccountKind::Customer, "").len(), 2);
}

#[test]
fn varieties_reject_duplicates_and_keep_transactions_on_delete() {
    let mut k = khata();
    let err = k.add_variety("gala", Decimal::ZERO).unwrap_err();
    assert_eq!(err.code(), "VALIDATION_ERROR");
    k.add_variety("Kinnaur", Decimal::from(1200)).unwrap();
    assert_eq!(k.default_rate_for("kinnaur"), Decimal::from(1200));
    k.set_variety_rate("Kinnaur", Decimal::from(1300)).unwrap();
    assert_eq!(k.default_rate_for("Kinnaur"), Decimal::from(1300));
    assert_eq!(k.default_rate_for("Unknown"), Decimal::ZERO);

    let g = k.add_account(AccountKind::Grower, "G1", "", "").unwrap();
    let input = TransactionInput::new(day("2025-03-01"), "Kinnaur", 1, Decimal::ONE);
    k.add_transaction(AccountKind::Grower, &g, input).unwrap();
    k.delete_variety("Kinnaur").unwrap();
    let tx = &k.account(AccountKind::Grower, &g).unwrap().transactions[0];
    assert_eq!(tx.variety, "Kinnaur");
    assert!(k.delete_variety("Kinnaur").is_err());
}

#[test]
fn expenses_validate_and_sort_newest_first() {
    let mut k = khata();
    assert!(k.add_expense(day("2025-03-01"), "", Decimal::ONE, "").is_err());
    assert!(k.add_expense(day("2025-03-01"), "Labour", Decimal::from(-1), "").is_err());
    k.add_expense(day("2025-03-01"), "Labour", Decimal::from(500), "wages").unwrap();
    let id = k.add_expense(day("2025-03-05"), "Diesel", Decimal::from(300), "").unwrap();
    let list = k.expenses_newest_first();
    assert_eq!(list[0].desc, "Diesel");
    assert_eq!(list[1].desc, "Labour");
    k.delete_expense(&id).unwrap();
    assert_eq!(k.expenses_newest_first().len(), 1);
    assert!(k.delete_expense(&id).is_err());
}

#[test]
fn preferences_round_trip() {
    let mut k = khata();
    k.set_profile(Profile {
        name: " Ali ".into(),
        mandi: "Sopore".into(),
        ..Profile::default()
    })
    .unwrap();
    k.set_dark_mode(true).unwrap();
    let reopened = Khata::open(std::mem::take(k.backend_mut())).unwrap();
    assert_eq!(reopened.prefs().profile.name, "Ali");
    assert_eq!(reopened.prefs().profile.mandi, "Sopore");
    assert!(reopened.prefs().dark_mode);
}

#[test]
fn unreadable_collection_is_a_persistence_error() {
    let mut store = MemoryStore::new();
    store.insert_raw("growers", "{not json");
    let err = Khata::open(store).err().unwrap();
    assert_eq!(err.code(), "PERSISTENCE_ERROR");
}

#[test]
fn sqlite_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mandi.sqlite");
    let id = {
        let mut k = Khata::open(SqliteStore::open(&path).unwrap()).unwrap();
        let id = k.add_account(AccountKind::Customer, "C1", "", "").unwrap();
        let input = TransactionInput::new(day("2025-03-01"), "Gala", 5, Decimal::from(200));
        k.add_transaction(AccountKind::Customer, &id, input).unwrap();
        id
    };
    let k = Khata::open(SqliteStore::open(&path).unwrap()).unwrap();
    let a = k.account(AccountKind::Customer, &id).unwrap();
    assert_eq!(a.transactions.len(), 1);
    assert_eq!(a.transactions[0].total, Decimal::from(1000));
    assert_eq!(a.transactions[0].payment_status, PaymentStatus::Pending);
}

#[test]
fn sqlite_put_many_writes_every_key() {
    let mut s = SqliteStore::open_in_memory().unwrap();
    s.put_many(&[("growers", "[]".to_string()), ("customers", "[]".to_string())])
        .unwrap();
    assert_eq!(s.get("growers").unwrap().as_deref(), Some("[]"));
    assert_eq!(s.get("customers").unwrap().as_deref(), Some("[]"));
    assert_eq!(s.get("expenses").unwrap(), None);
}

#[test]
fn save_writes_a_single_collection() {
    let mut k = khata();
    k.save(Collection::Varieties).unwrap();
    let raw = k.backend().raw("varieties").unwrap();
    assert!(raw.contains("\"defaultRate\""));
    assert!(raw.contains("Red Chief"));
    assert!(k.backend().raw("growers").is_none());
}
