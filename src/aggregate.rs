// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Cross-account views: dashboard KPIs, stock, profit series and the khata.
//!
//! Nothing here mutates the book; every view is recomputed from scratch.

use crate::calc::account_stats;
use crate::models::{AccountKind, Expense, Transaction};
use crate::store::Book;
use chrono::{Days, Months, NaiveDate};
use log::warn;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Named dashboard windows, all anchored on `today`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateWindow {
    #[default]
    All,
    Today,
    /// The last 7 calendar days including today.
    Week,
    /// From the same day one calendar month ago through today.
    Month,
}

impl FromStr for DateWindow {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(DateWindow::All),
            "today" => Ok(DateWindow::Today),
            "week" => Ok(DateWindow::Week),
            "month" => Ok(DateWindow::Month),
            other => Err(format!("Invalid date range: {}", other)),
        }
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateWindow::All => write!(f, "all"),
            DateWindow::Today => write!(f, "today"),
            DateWindow::Week => write!(f, "week"),
            DateWindow::Month => write!(f, "month"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    pub window: DateWindow,
    /// Inclusive; overrides `window` when set.
    pub range: Option<(NaiveDate, NaiveDate)>,
    /// Exact variety name; `None` means every variety.
    pub variety: Option<String>,
}

impl Filter {
    pub fn window(window: DateWindow) -> Self {
        Self {
            window,
            ..Self::default()
        }
    }

    pub fn with_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.range = Some((start, end));
        self
    }

    /// `"all"` (any case) clears the variety filter.
    pub fn with_variety(mut self, variety: &str) -> Self {
        let v = variety.trim();
        self.variety = if v.is_empty() || v.eq_ignore_ascii_case("all") {
            None
        } else {
            Some(v.to_string())
        };
        self
    }

    /// Inclusive lower and upper date bounds, `None` where unbounded.
    pub fn date_bounds(&self, today: NaiveDate) -> (Option<NaiveDate>, Option<NaiveDate>) {
        if let Some((start, end)) = self.range {
            return (Some(start), Some(end));
        }
        match self.window {
            DateWindow::All => (None, None),
            DateWindow::Today => (Some(today), Some(today)),
            DateWindow::Week => (today.checked_sub_days(Days::new(6)), Some(today)),
            DateWindow::Month => (today.checked_sub_months(Months::new(1)), Some(today)),
        }
    }

    pub fn matches_date(&self, date: NaiveDate, today: NaiveDate) -> bool {
        let (lo, hi) = self.date_bounds(today);
        lo.is_none_or(|lo| date >= lo) && hi.is_none_or(|hi| date <= hi)
    }

    pub fn matches_variety(&self, variety: &str) -> bool {
        self.variety.as_deref().is_none_or(|v| v == variety)
    }

    pub fn matches(&self, tx: &Transaction, today: NaiveDate) -> bool {
        self.matches_date(tx.date, today) && self.matches_variety(&tx.variety)
    }
}

pub fn filter_by_date_and_variety<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
    filter: &Filter,
    today: NaiveDate,
) -> Vec<&'a Transaction> {
    transactions
        .into_iter()
        .filter(|tx| filter.matches(tx, today))
        .collect()
}

/// Expenses carry no variety, so only the date part of the filter applies.
pub fn filter_expenses<'a>(
    expenses: &'a [Expense],
    filter: &Filter,
    today: NaiveDate,
) -> Vec<&'a Expense> {
    expenses
        .iter()
        .filter(|e| filter.matches_date(e.date, today))
        .collect()
}

fn all_transactions(book: &Book, kind: AccountKind) -> impl Iterator<Item = &Transaction> {
    book.accounts(kind)
        .iter()
        .flat_map(|a| a.transactions.iter())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Kpis {
    pub boxes_bought: u64,
    pub boxes_sold: u64,
    pub amount_bought: Decimal,
    pub amount_sold: Decimal,
    /// Sold minus bought, before expenses.
    pub gross: Decimal,
    pub expenses: Decimal,
    pub profit: Decimal,
}

impl Kpis {
    pub fn compute(purchases: &[&Transaction], sales: &[&Transaction], expenses: &[&Expense]) -> Self {
        let boxes_bought = purchases.iter().map(|t| u64::from(t.boxes)).sum();
        let boxes_sold = sales.iter().map(|t| u64::from(t.boxes)).sum();
        let amount_bought: Decimal = purchases.iter().map(|t| t.total).sum();
        let amount_sold: Decimal = sales.iter().map(|t| t.total).sum();
        let spent: Decimal = expenses.iter().map(|e| e.amount).sum();
        let gross = amount_sold - amount_bought;
        Kpis {
            boxes_bought,
            boxes_sold,
            amount_bought,
            amount_sold,
            gross,
            expenses: spent,
            profit: gross - spent,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dashboard {
    /// KPIs for the active filter.
    pub window: Kpis,
    /// Fixed "today" panel: today's date, every variety.
    pub today: Kpis,
}

fn kpis_for(book: &Book, filter: &Filter, today: NaiveDate) -> Kpis {
    let purchases = filter_by_date_and_variety(all_transactions(book, AccountKind::Grower), filter, today);
    let sales = filter_by_date_and_variety(all_transactions(book, AccountKind::Customer), filter, today);
    let expenses = filter_expenses(&book.expenses, filter, today);
    Kpis::compute(&purchases, &sales, &expenses)
}

pub fn dashboard(book: &Book, filter: &Filter, today: NaiveDate) -> Dashboard {
    Dashboard {
        window: kpis_for(book, filter, today),
        today: kpis_for(book, &Filter::window(DateWindow::Today), today),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockLine {
    pub variety: String,
    pub purchased: u64,
    pub sold: u64,
    /// Purchased minus sold; negative when more was sold than recorded bought.
    pub stock: i64,
}

/// Every variety that appears in any purchase or sale, in order of first
/// appearance (purchases scanned before sales).
pub fn stock_by_variety(book: &Book) -> Vec<StockLine> {
    let mut lines: Vec<StockLine> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut slot = |lines: &mut Vec<StockLine>, variety: &str| -> usize {
        *index.entry(variety.to_string()).or_insert_with(|| {
            lines.push(StockLine {
                variety: variety.to_string(),
                purchased: 0,
                sold: 0,
                stock: 0,
            });
            lines.len() - 1
        })
    };
    for tx in all_transactions(book, AccountKind::Grower) {
        let i = slot(&mut lines, &tx.variety);
        lines[i].purchased += u64::from(tx.boxes);
    }
    for tx in all_transactions(book, AccountKind::Customer) {
        let i = slot(&mut lines, &tx.variety);
        lines[i].sold += u64::from(tx.boxes);
    }
    for line in lines.iter_mut() {
        line.stock = line.purchased as i64 - line.sold as i64;
    }
    lines
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyProfit {
    pub date: NaiveDate,
    pub profit: Decimal,
}

/// Sold minus bought minus expenses for each of the last 7 days, oldest
/// first. Ignores any date range; only the variety filter applies.
pub fn daily_profit_series(book: &Book, variety: Option<&str>, today: NaiveDate) -> Vec<DailyProfit> {
    (0..7u64)
        .rev()
        .filter_map(|back| today.checked_sub_days(Days::new(back)))
        .map(|day| {
            let mut filter = Filter::default().with_range(day, day);
            if let Some(v) = variety {
                filter = filter.with_variety(v);
            }
            DailyProfit {
                date: day,
                profit: kpis_for(book, &filter, today).profit,
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KhataEntry {
    pub name: String,
    pub id: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KhataView {
    pub growers: Vec<KhataEntry>,
    pub customers: Vec<KhataEntry>,
    pub total_due_to_growers: Decimal,
    pub total_pending_from_customers: Decimal,
    /// Receivable minus payable.
    pub net_balance: Decimal,
}

impl KhataView {
    /// Narrows the entry lists by name; the totals still cover everyone.
    pub fn search(mut self, query: &str) -> Self {
        let q = query.trim().to_lowercase();
        if !q.is_empty() {
            self.growers.retain(|e| e.name.to_lowercase().contains(&q));
            self.customers.retain(|e| e.name.to_lowercase().contains(&q));
        }
        self
    }
}

fn pending_entries(book: &Book, kind: AccountKind) -> Vec<KhataEntry> {
    book.accounts(kind)
        .iter()
        .filter_map(|a| {
            let pending = account_stats(kind, a).pending;
            (pending > Decimal::ZERO).then(|| KhataEntry {
                name: a.name.clone(),
                id: a.id.clone(),
                amount: pending,
            })
        })
        .collect()
}

/// Accounts with a positive pending balance; settled accounts are left out.
pub fn khata(book: &Book) -> KhataView {
    let growers = pending_entries(book, AccountKind::Grower);
    let customers = pending_entries(book, AccountKind::Customer);
    let total_due_to_growers: Decimal = growers.iter().map(|e| e.amount).sum();
    let total_pending_from_customers: Decimal = customers.iter().map(|e| e.amount).sum();
    KhataView {
        growers,
        customers,
        total_due_to_growers,
        total_pending_from_customers,
        net_balance: total_pending_from_customers - total_due_to_growers,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VarietyWarning {
    pub kind: AccountKind,
    pub account_id: String,
    pub account_name: String,
    pub tx_id: String,
    pub variety: String,
}

/// Transactions whose variety name is not in the variety list.
pub fn unknown_varieties(book: &Book) -> Vec<VarietyWarning> {
    let mut out = Vec::new();
    for kind in [AccountKind::Grower, AccountKind::Customer] {
        for account in book.accounts(kind) {
            for tx in &account.transactions {
                if !book.varieties.iter().any(|v| v.name == tx.variety) {
                    warn!(
                        "{} {} transaction {} uses unknown variety '{}'",
                        kind, account.id, tx.id, tx.variety
                    );
                    out.push(VarietyWarning {
                        kind,
                        account_id: account.id.clone(),
                        account_name: account.name.clone(),
                        tx_id: tx.id.clone(),
                        variety: tx.variety.clone(),
                    });
                }
            }
        }
    }
    out
}
