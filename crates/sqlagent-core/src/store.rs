//! The `RecordStore` trait.
//!
//! Implemented by storage backends (e.g. `sqlagent-store-sqlite`). The
//! generator in `sqlagent-populate` writes through this abstraction, not
//! through any concrete backend.

use crate::entity::{Customer, Order, Product, Record, Shipment, Supplier, Table};

/// Abstraction over the demo database.
///
/// Writes are append-only and batched: each `insert_*` call is one commit
/// boundary. Rows are never updated or deleted. Identities are assigned by
/// the store and must be read back with [`RecordStore::ids`].
pub trait RecordStore {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Writes ────────────────────────────────────────────────────────────

  /// Insert all parent rows (customers, products, suppliers) in a single
  /// transaction and commit it.
  fn insert_parents(
    &mut self,
    customers: &[Customer],
    products: &[Product],
    suppliers: &[Supplier],
  ) -> Result<(), Self::Error>;

  /// Insert a batch of orders in a single transaction and commit it.
  fn insert_orders(&mut self, orders: &[Order]) -> Result<(), Self::Error>;

  /// Insert a batch of shipments in a single transaction and commit it.
  fn insert_shipments(&mut self, shipments: &[Shipment]) -> Result<(), Self::Error>;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Every id currently committed in `table`, ascending.
  fn ids(&self, table: Table) -> Result<Vec<i64>, Self::Error>;

  /// Number of rows in `table`.
  fn count(&self, table: Table) -> Result<usize, Self::Error>;

  /// `true` when none of the five tables holds a row.
  fn is_empty(&self) -> Result<bool, Self::Error> {
    for table in Table::ALL {
      if self.count(table)? > 0 {
        return Ok(false);
      }
    }
    Ok(true)
  }

  fn customers(&self) -> Result<Vec<Record<Customer>>, Self::Error>;
  fn products(&self) -> Result<Vec<Record<Product>>, Self::Error>;
  fn suppliers(&self) -> Result<Vec<Record<Supplier>>, Self::Error>;
  fn orders(&self) -> Result<Vec<Record<Order>>, Self::Error>;
  fn shipments(&self) -> Result<Vec<Record<Shipment>>, Self::Error>;
}
