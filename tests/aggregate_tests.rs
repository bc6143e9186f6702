// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use mandi_khata::aggregate::{
    DateWindow, Filter, daily_profit_series, dashboard, khata, stock_by_variety,
    unknown_varieties,
};
use mandi_khata::calc::{TransactionInput, account_stats, max_amount};
use mandi_khata::db::MemoryStore;
use mandi_khata::models::AccountKind;
use mandi_khata::store::Khata;
use rust_decimal::Decimal;

fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn today() -> NaiveDate {
    day("2025-03-15")
}

fn dec(n: i64) -> Decimal {
    Decimal::from(n)
}

fn purchase(k: &mut Khata<MemoryStore>, grower: &str, date: &str, variety: &str, boxes: u32, rate: i64) -> String {
    let input = TransactionInput::new(day(date), variety, boxes, dec(rate));
    k.add_transaction(AccountKind::Grower, grower, input).unwrap().id
}

fn sale(k: &mut Khata<MemoryStore>, customer: &str, date: &str, variety: &str, boxes: u32, rate: i64) -> String {
    let input = TransactionInput::new(day(date), variety, boxes, dec(rate));
    k.add_transaction(AccountKind::Customer, customer, input).unwrap().id
}

/// G1 bought 10 Gala for 1030, C1 bought 5 Gala for 985, both today.
fn scenario() -> (Khata<MemoryStore>, String, String) {
    let mut k = Khata::open(MemoryStore::new()).unwrap();
    let g = k.add_account(AccountKind::Grower, "G1", "", "").unwrap();
    let c = k.add_account(AccountKind::Customer, "C1", "", "").unwrap();
    let buy = TransactionInput::new(today(), "Gala", 10, dec(100))
        .commission(dec(20))
        .transport(dec(10));
    k.add_transaction(AccountKind::Grower, &g, buy).unwrap();
    let sell = TransactionInput::new(today(), "Gala", 5, dec(200))
        .commission(dec(10))
        .transport(dec(5));
    k.add_transaction(AccountKind::Customer, &c, sell).unwrap();
    (k, g, c)
}

#[test]
fn profit_for_the_day_is_sales_minus_purchases() {
    let (k, _, _) = scenario();
    let view = dashboard(k.book(), &Filter::window(DateWindow::Today), today());
    assert_eq!(view.window.amount_bought, dec(1030));
    assert_eq!(view.window.amount_sold, dec(985));
    assert_eq!(view.window.expenses, Decimal::ZERO);
    assert_eq!(view.window.profit, dec(-45));
    assert_eq!(view.today, view.window);
}

#[test]
fn expenses_reduce_profit_in_window() {
    let (mut k, _, _) = scenario();
    k.add_expense(today(), "Labour", dec(100), "").unwrap();
    k.add_expense(day("2025-01-01"), "Old rent", dec(999), "").unwrap();
    let view = dashboard(k.book(), &Filter::window(DateWindow::Week), today());
    assert_eq!(view.window.expenses, dec(100));
    assert_eq!(view.window.gross, dec(-45));
    assert_eq!(view.window.profit, dec(-145));
    let all = dashboard(k.book(), &Filter::default(), today());
    assert_eq!(all.window.expenses, dec(1099));
}

#[test]
fn week_and_month_windows_are_inclusive() {
    let mut k = Khata::open(MemoryStore::new()).unwrap();
    let g = k.add_account(AccountKind::Grower, "G", "", "").unwrap();
    purchase(&mut k, &g, "2025-03-09", "Gala", 1, 10); // today - 6
    purchase(&mut k, &g, "2025-03-08", "Gala", 2, 10); // today - 7
    purchase(&mut k, &g, "2025-02-15", "Gala", 4, 10); // one month back
    purchase(&mut k, &g, "2025-02-14", "Gala", 8, 10);
    purchase(&mut k, &g, "2025-03-16", "Gala", 16, 10); // tomorrow

    let week = dashboard(k.book(), &Filter::window(DateWindow::Week), today());
    assert_eq!(week.window.boxes_bought, 1);
    let month = dashboard(k.book(), &Filter::window(DateWindow::Month), today());
    assert_eq!(month.window.boxes_bought, 1 + 2 + 4);
    let all = dashboard(k.book(), &Filter::window(DateWindow::All), today());
    assert_eq!(all.window.boxes_bought, 31);
}

#[test]
fn explicit_range_overrides_window() {
    let mut k = Khata::open(MemoryStore::new()).unwrap();
    let g = k.add_account(AccountKind::Grower, "G", "", "").unwrap();
    purchase(&mut k, &g, "2025-01-10", "Gala", 3, 10);
    purchase(&mut k, &g, "2025-03-15", "Gala", 5, 10);
    let filter = Filter::window(DateWindow::Today).with_range(day("2025-01-01"), day("2025-01-31"));
    let view = dashboard(k.book(), &filter, today());
    assert_eq!(view.window.boxes_bought, 3);
    assert_eq!(view.today.boxes_bought, 5);
}

#[test]
fn variety_filter_is_exact_and_all_clears_it() {
    let mut k = Khata::open(MemoryStore::new()).unwrap();
    let g = k.add_account(AccountKind::Grower, "G", "", "").unwrap();
    purchase(&mut k, &g, "2025-03-15", "Gala", 3, 10);
    purchase(&mut k, &g, "2025-03-15", "Delicious", 7, 10);
    let gala = dashboard(k.book(), &Filter::default().with_variety("Gala"), today());
    assert_eq!(gala.window.boxes_bought, 3);
    let all = dashboard(k.book(), &Filter::default().with_variety("ALL"), today());
    assert_eq!(all.window.boxes_bought, 10);
    assert_eq!(all.today.boxes_bought, 10);
}

#[test]
fn stock_is_purchased_minus_sold() {
    let mut k = Khata::open(MemoryStore::new()).unwrap();
    let g = k.add_account(AccountKind::Grower, "G", "", "").unwrap();
    let c = k.add_account(AccountKind::Customer, "C", "", "").unwrap();
    purchase(&mut k, &g, "2025-03-01", "Gala", 100, 10);
    sale(&mut k, &c, "2025-03-02", "Gala", 40, 20);
    sale(&mut k, &c, "2025-03-02", "American", 5, 20);
    let lines = stock_by_variety(k.book());
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].variety, "Gala");
    assert_eq!((lines[0].purchased, lines[0].sold, lines[0].stock), (100, 40, 60));
    assert_eq!(lines[1].variety, "American");
    assert_eq!(lines[1].stock, -5);
}

#[test]
fn daily_series_covers_last_seven_days_oldest_first() {
    let (mut k, g, c) = scenario();
    purchase(&mut k, &g, "2025-03-10", "Delicious", 2, 50);
    sale(&mut k, &c, "2025-03-09", "Gala", 1, 300);
    sale(&mut k, &c, "2025-03-08", "Gala", 1, 999);
    k.add_expense(day("2025-03-10"), "Labour", dec(25), "").unwrap();

    let series = daily_profit_series(k.book(), None, today());
    assert_eq!(series.len(), 7);
    assert_eq!(series[0].date, day("2025-03-09"));
    assert_eq!(series[6].date, today());
    assert_eq!(series[0].profit, dec(300));
    assert_eq!(series[1].profit, dec(-125));
    assert_eq!(series[6].profit, dec(-45));

    let gala = daily_profit_series(k.book(), Some("Gala"), today());
    assert_eq!(gala[1].profit, dec(-25));
}

#[test]
fn khata_lists_only_positive_pending() {
    let (mut k, g, c) = scenario();
    let view = khata(k.book());
    assert_eq!(view.growers.len(), 1);
    assert_eq!(view.total_due_to_growers, dec(1030));
    assert_eq!(view.total_pending_from_customers, dec(985));
    assert_eq!(view.net_balance, dec(-45));

    k.settle_account(AccountKind::Grower, &g).unwrap();
    let view = khata(k.book());
    assert!(view.growers.is_empty());
    assert_eq!(view.customers[0].id, c);
    assert_eq!(view.net_balance, dec(985));
}

#[test]
fn khata_search_keeps_totals() {
    let (mut k, _, _) = scenario();
    let other = k.add_account(AccountKind::Grower, "Bashir", "", "").unwrap();
    purchase(&mut k, &other, "2025-03-14", "Gala", 1, 70);
    let view = khata(k.book()).search("bash");
    assert_eq!(view.growers.len(), 1);
    assert_eq!(view.growers[0].name, "Bashir");
    assert!(view.customers.is_empty());
    assert_eq!(view.total_due_to_growers, dec(1100));
}

#[test]
fn deleted_account_disappears_from_every_view() {
    let (mut k, g, _) = scenario();
    k.delete_account(AccountKind::Grower, &g).unwrap();
    let view = khata(k.book());
    assert!(view.growers.is_empty());
    let lines = stock_by_variety(k.book());
    assert_eq!(lines[0].stock, -5);
    let d = dashboard(k.book(), &Filter::default(), today());
    assert_eq!(d.window.profit, dec(985));
}

#[test]
fn unknown_varieties_are_flagged() {
    let mut k = Khata::open(MemoryStore::new()).unwrap();
    let g = k.add_account(AccountKind::Grower, "G", "", "").unwrap();
    purchase(&mut k, &g, "2025-03-01", "Gala", 1, 1);
    let tx = purchase(&mut k, &g, "2025-03-01", "Ambri", 1, 1);
    purchase(&mut k, &g, "2025-03-01", "gala", 1, 1);
    let warnings = unknown_varieties(k.book());
    assert_eq!(warnings.len(), 2);
    assert_eq!(warnings[0].tx_id, tx);
    assert_eq!(warnings[0].variety, "Ambri");
    assert_eq!(warnings[1].variety, "gala");
}

#[test]
fn largest_allowed_totals_still_aggregate() {
    let mut k = Khata::open(MemoryStore::new()).unwrap();
    let g = k.add_account(AccountKind::Grower, "G", "", "").unwrap();
    for _ in 0..3 {
        let input = TransactionInput::new(today(), "Gala", 1, max_amount());
        k.add_transaction(AccountKind::Grower, &g, input).unwrap();
    }
    let huge = TransactionInput::new(today(), "Gala", 2, dec(5) * max_amount());
    assert!(k.add_transaction(AccountKind::Grower, &g, huge).is_err());

    let expected = max_amount() * dec(3);
    let view = khata(k.book());
    assert_eq!(view.total_due_to_growers, expected);
    let stats = account_stats(AccountKind::Grower, k.account(AccountKind::Grower, &g).unwrap());
    assert_eq!(stats.pending, expected);
    let d = dashboard(k.book(), &Filter::window(DateWindow::Today), today());
    assert_eq!(d.window.profit, -expected);
}
