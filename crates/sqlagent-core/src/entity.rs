//! Entity types — one per table in the demo database.
//!
//! Each entity struct carries only its data columns. The integer identity is
//! assigned by the storage layer at insertion time and travels alongside the
//! data in a [`Record`].

use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::Error;

// ─── Tables ──────────────────────────────────────────────────────────────────

/// The five tables of the demo schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Table {
  Customers,
  Products,
  Suppliers,
  Orders,
  Shipments,
}

impl Table {
  /// All tables, parents before children.
  pub const ALL: [Table; 5] = [
    Table::Customers,
    Table::Products,
    Table::Suppliers,
    Table::Orders,
    Table::Shipments,
  ];

  /// The SQL table name.
  pub fn name(self) -> &'static str {
    match self {
      Table::Customers => "customers",
      Table::Products => "products",
      Table::Suppliers => "suppliers",
      Table::Orders => "orders",
      Table::Shipments => "shipments",
    }
  }
}

impl fmt::Display for Table {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

impl FromStr for Table {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Table::ALL
      .into_iter()
      .find(|t| t.name() == s)
      .ok_or_else(|| Error::UnknownTable(s.to_owned()))
  }
}

// ─── Records ─────────────────────────────────────────────────────────────────

/// A row as read back from storage: the assigned id plus its data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record<T> {
  pub id:    i64,
  #[serde(flatten)]
  pub value: T,
}

// ─── Entities ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
  pub name:  String,
  /// Unique across the `customers` table.
  pub email: String,
  /// Always greater than zero.
  pub age:   u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
  /// Unique across the `products` table.
  pub name:  String,
  pub price: f64,
  pub stock: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
  pub name:          String,
  pub contact_name:  String,
  /// Unique across the `suppliers` table.
  pub contact_email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
  pub customer_id: i64,
  pub product_id:  i64,
  /// Always greater than zero.
  pub quantity:    u32,
  pub order_date:  NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shipment {
  pub order_id:      i64,
  pub shipment_date: NaiveDate,
  /// Never earlier than `shipment_date`.
  pub delivery_date: NaiveDate,
  pub supplier_id:   i64,
}
