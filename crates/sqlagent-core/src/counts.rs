//! How many rows to generate per table, and what was actually written.

use serde::{Deserialize, Serialize};

use crate::{Error, Result, entity::Table};

/// Target row counts for one population pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationCounts {
  pub customers: usize,
  pub products:  usize,
  pub suppliers: usize,
  pub orders:    usize,
  pub shipments: usize,
}

impl Default for PopulationCounts {
  fn default() -> Self {
    Self {
      customers: 100,
      products:  50,
      suppliers: 20,
      orders:    500,
      shipments: 400,
    }
  }
}

impl PopulationCounts {
  /// Requested row count for `table`.
  pub fn get(&self, table: Table) -> usize {
    match table {
      Table::Customers => self.customers,
      Table::Products => self.products,
      Table::Suppliers => self.suppliers,
      Table::Orders => self.orders,
      Table::Shipments => self.shipments,
    }
  }

  /// Reject counts that would ask for child rows with no parent rows to
  /// reference.
  pub fn validate(&self) -> Result<()> {
    let edges = [
      (Table::Orders, Table::Customers),
      (Table::Orders, Table::Products),
      (Table::Shipments, Table::Orders),
      (Table::Shipments, Table::Suppliers),
    ];
    for (child, parent) in edges {
      if self.get(child) > 0 && self.get(parent) == 0 {
        return Err(Error::MissingParents { child, parent });
      }
    }
    Ok(())
  }
}

/// Rows inserted per table by a completed population pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationReport {
  pub customers: usize,
  pub products:  usize,
  pub suppliers: usize,
  pub orders:    usize,
  pub shipments: usize,
}

impl PopulationReport {
  pub fn total(&self) -> usize {
    self.customers + self.products + self.suppliers + self.orders + self.shipments
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults_match_demo_sizes() {
    let c = PopulationCounts::default();
    assert_eq!(
      (c.customers, c.products, c.suppliers, c.orders, c.shipments),
      (100, 50, 20, 500, 400)
    );
    assert!(c.validate().is_ok());
  }

  #[test]
  fn orders_without_customers_rejected() {
    let c = PopulationCounts { customers: 0, ..Default::default() };
    assert!(matches!(
      c.validate(),
      Err(Error::MissingParents { child: Table::Orders, parent: Table::Customers })
    ));
  }

  #[test]
  fn shipments_without_suppliers_rejected() {
    let c = PopulationCounts { suppliers: 0, ..Default::default() };
    assert!(matches!(
      c.validate(),
      Err(Error::MissingParents { child: Table::Shipments, parent: Table::Suppliers })
    ));
  }

  #[test]
  fn empty_children_need_no_parents() {
    let c = PopulationCounts {
      customers: 0,
      products:  0,
      suppliers: 0,
      orders:    0,
      shipments: 0,
    };
    assert!(c.validate().is_ok());
  }

  #[test]
  fn shipments_without_orders_rejected() {
    let c = PopulationCounts { orders: 0, ..Default::default() };
    assert!(matches!(
      c.validate(),
      Err(Error::MissingParents { child: Table::Shipments, parent: Table::Orders })
    ));
  }
}
