// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which side of the trade an account sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    /// Supplier we buy produce from.
    Grower,
    /// Buyer we sell produce to.
    Customer,
}

impl AccountKind {
    /// Status a fresh transaction of this kind starts in.
    pub fn unsettled(self) -> PaymentStatus {
        match self {
            AccountKind::Grower => PaymentStatus::Due,
            AccountKind::Customer => PaymentStatus::Pending,
        }
    }

    pub fn settled(self) -> PaymentStatus {
        match self {
            AccountKind::Grower => PaymentStatus::Paid,
            AccountKind::Customer => PaymentStatus::Received,
        }
    }

    /// Whether `status` is part of this kind's two-state machine.
    pub fn accepts(self, status: PaymentStatus) -> bool {
        status == self.unsettled() || status == self.settled()
    }

    pub fn label(self) -> &'static str {
        match self {
            AccountKind::Grower => "Grower",
            AccountKind::Customer => "Customer",
        }
    }

    pub fn id_prefix(self) -> &'static str {
        match self {
            AccountKind::Grower => "grower",
            AccountKind::Customer => "customer",
        }
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id_prefix())
    }
}

impl FromStr for AccountKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "grower" => Ok(AccountKind::Grower),
            "customer" => Ok(AccountKind::Customer),
            other => Err(format!("Invalid account kind: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Due,
    Paid,
    Pending,
    Received,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PaymentStatus::Due => "due",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Pending => "pending",
            PaymentStatus::Received => "received",
        };
        f.write_str(s)
    }
}

impl FromStr for PaymentStatus {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "due" => Ok(PaymentStatus::Due),
            "paid" => Ok(PaymentStatus::Paid),
            "pending" => Ok(PaymentStatus::Pending),
            "received" => Ok(PaymentStatus::Received),
            other => Err(format!("Invalid payment status: {}", other)),
        }
    }
}

/// Stored documents may carry `null` for numbers; read those as zero.
fn zero_if_null<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variety {
    pub name: String,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub default_rate: Decimal,
}

impl Variety {
    pub fn new(name: &str, default_rate: Decimal) -> Self {
        Self {
            name: name.to_string(),
            default_rate,
        }
    }
}

/// The list a fresh install starts with.
pub fn seed_varieties() -> Vec<Variety> {
    ["Delicious", "American", "Gala", "Red Chief"]
        .into_iter()
        .map(|n| Variety::new(n, Decimal::ZERO))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub variety: String,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub boxes: u32,
    #[serde(default)]
    pub box_type: String,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub rate: Decimal,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub commission: Decimal,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub transport: Decimal,
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub notes: String,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub address: String,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub transactions: Vec<Transaction>,
}

impl Account {
    pub fn transaction(&self, tx_id: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == tx_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub desc: String,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub amount: Decimal,
    #[serde(default)]
    pub category: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub mandi: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub gst: String,
    #[serde(default)]
    pub address: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default)]
    pub dark_mode: bool,
    #[serde(default)]
    pub profile: Profile,
}

/// Full snapshot used for export and import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub growers: Vec<Account>,
    pub customers: Vec<Account>,
    pub varieties: Vec<Variety>,
    pub prefs: Preferences,
    pub expenses: Vec<Expense>,
}
