//! Row builders for each demo table.
//!
//! Parent builders need only an RNG. Child builders also take the ids read
//! back from committed parent tables and sample them uniformly with
//! replacement, so the same customer may place many orders and the same
//! order may ship many times.

use std::collections::HashSet;

use chrono::{Duration, NaiveDateTime};
use rand::{Rng, seq::SliceRandom};
use sqlagent_core::entity::{Customer, Order, Product, Shipment, Supplier, Table};

use crate::{
  Error, Result,
  random::{random_date, random_email, random_string},
};

pub const FIRST_NAMES: [&str; 10] = [
  "John", "Jane", "Mike", "Alice", "Bob", "Eve", "Charlie", "David", "Emily", "Frank",
];

pub const LAST_NAMES: [&str; 10] = [
  "Smith", "Johnson", "Williams", "Jones", "Brown", "Davis", "Miller", "Wilson", "Moore",
  "Taylor",
];

pub const COMPANY_SUFFIXES: [&str; 5] = ["Inc", "Corp", "LLC", "Ltd", "Co"];

/// Draws allowed per row before a unique column is declared exhausted.
pub const MAX_UNIQUE_ATTEMPTS: usize = 64;

/// Half-open range `[start, end)` that generated dates fall into.
#[derive(Debug, Clone, Copy)]
pub struct DateWindow {
  pub start: NaiveDateTime,
  pub end:   NaiveDateTime,
}

impl DateWindow {
  /// The `days`-long window ending at `now`.
  pub fn trailing(now: NaiveDateTime, days: i64) -> Self {
    Self { start: now - Duration::days(days), end: now }
  }
}

// ─── Unique draws ────────────────────────────────────────────────────────────

/// Tracks the values already issued for one unique column.
struct Issued {
  table:  Table,
  column: &'static str,
  seen:   HashSet<String>,
}

impl Issued {
  fn new(table: Table, column: &'static str) -> Self {
    Self { table, column, seen: HashSet::new() }
  }

  /// Call `draw` until it yields an unseen value, and record it.
  fn fresh<T>(&mut self, mut draw: impl FnMut() -> (T, String)) -> Result<(T, String)> {
    for attempt in 1..=MAX_UNIQUE_ATTEMPTS {
      let (extra, value) = draw();
      if self.seen.insert(value.clone()) {
        return Ok((extra, value));
      }
      tracing::warn!(
        table = %self.table,
        column = self.column,
        %value,
        attempt,
        "duplicate value drawn, retrying"
      );
    }
    Err(Error::UniqueExhausted {
      table:    self.table,
      column:   self.column,
      attempts: MAX_UNIQUE_ATTEMPTS,
    })
  }
}

fn person_name<R: Rng + ?Sized>(rng: &mut R) -> String {
  let first = FIRST_NAMES.choose(rng).copied().unwrap_or(FIRST_NAMES[0]);
  let last = LAST_NAMES.choose(rng).copied().unwrap_or(LAST_NAMES[0]);
  format!("{first} {last}")
}

// ─── Parents ─────────────────────────────────────────────────────────────────

/// `n` customers with distinct emails; ages in `18..=80`.
pub fn customers<R: Rng + ?Sized>(rng: &mut R, n: usize) -> Result<Vec<Customer>> {
  let mut emails = Issued::new(Table::Customers, "email");
  (0..n)
    .map(|_| {
      let (name, email) = emails.fresh(|| {
        let name = person_name(rng);
        let email = random_email(rng, &name);
        (name, email)
      })?;
      Ok(Customer { name, email, age: rng.gen_range(18..=80) })
    })
    .collect()
}

/// `Product_1` … `Product_n`; prices in `[10, 1000)` to the cent, stock in
/// `0..=100`.
pub fn products<R: Rng + ?Sized>(rng: &mut R, n: usize) -> Vec<Product> {
  (1..=n)
    .map(|i| {
      let price: f64 = rng.gen_range(10.0..1000.0);
      Product {
        name:  format!("Product_{i}"),
        price: (price * 100.0).round() / 100.0,
        stock: rng.gen_range(0..=100),
      }
    })
    .collect()
}

/// `n` suppliers named like `"xKqPa Corp"` with distinct contact emails.
pub fn suppliers<R: Rng + ?Sized>(rng: &mut R, n: usize) -> Result<Vec<Supplier>> {
  let mut emails = Issued::new(Table::Suppliers, "contact_email");
  (0..n)
    .map(|_| {
      let suffix = COMPANY_SUFFIXES.choose(rng).copied().unwrap_or(COMPANY_SUFFIXES[0]);
      let name = format!("{} {suffix}", random_string(rng, 5));
      let (contact_name, contact_email) = emails.fresh(|| {
        let name = person_name(rng);
        let email = random_email(rng, &name);
        (name, email)
      })?;
      Ok(Supplier { name, contact_name, contact_email })
    })
    .collect()
}

// ─── Children ────────────────────────────────────────────────────────────────

fn pick<R: Rng + ?Sized>(
  rng: &mut R,
  ids: &[i64],
  child: Table,
  parent: Table,
) -> Result<i64> {
  ids
    .choose(rng)
    .copied()
    .ok_or(Error::Counts(sqlagent_core::Error::MissingParents { child, parent }))
}

/// `n` orders over committed customer and product ids; quantity in `1..=10`.
pub fn orders<R: Rng + ?Sized>(
  rng: &mut R,
  n: usize,
  customer_ids: &[i64],
  product_ids: &[i64],
  window: DateWindow,
) -> Result<Vec<Order>> {
  (0..n)
    .map(|_| {
      Ok(Order {
        customer_id: pick(rng, customer_ids, Table::Orders, Table::Customers)?,
        product_id:  pick(rng, product_ids, Table::Orders, Table::Products)?,
        quantity:    rng.gen_range(1..=10),
        order_date:  random_date(rng, window.start, window.end).date(),
      })
    })
    .collect()
}

/// `n` shipments over committed order and supplier ids; delivery follows
/// shipment by `1..=30` days.
pub fn shipments<R: Rng + ?Sized>(
  rng: &mut R,
  n: usize,
  order_ids: &[i64],
  supplier_ids: &[i64],
  window: DateWindow,
) -> Result<Vec<Shipment>> {
  (0..n)
    .map(|_| {
      let order_id = pick(rng, order_ids, Table::Shipments, Table::Orders)?;
      let shipped = random_date(rng, window.start, window.end);
      let delivered = shipped + Duration::days(rng.gen_range(1..=30));
      Ok(Shipment {
        order_id,
        shipment_date: shipped.date(),
        delivery_date: delivered.date(),
        supplier_id: pick(rng, supplier_ids, Table::Shipments, Table::Suppliers)?,
      })
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;
  use rand::{SeedableRng, rngs::StdRng};

  use super::*;

  fn rng() -> StdRng { StdRng::seed_from_u64(42) }

  fn window() -> DateWindow {
    let now = NaiveDate::from_ymd_opt(2025, 3, 15)
      .unwrap()
      .and_hms_opt(9, 0, 0)
      .unwrap();
    DateWindow::trailing(now, 365)
  }

  #[test]
  fn customers_have_distinct_emails_and_adult_ages() {
    let customers = customers(&mut rng(), 500).unwrap();
    assert_eq!(customers.len(), 500);

    let emails: HashSet<_> = customers.iter().map(|c| c.email.as_str()).collect();
    assert_eq!(emails.len(), 500);

    for c in &customers {
      assert!((18..=80).contains(&c.age));
      let (first, last) = c.name.split_once(' ').unwrap();
      assert!(FIRST_NAMES.contains(&first) && LAST_NAMES.contains(&last));
      let local = c.name.to_lowercase().replace(' ', ".");
      assert!(c.email.starts_with(&local), "{} / {}", c.name, c.email);
    }
  }

  #[test]
  fn products_are_numbered_and_priced_to_the_cent() {
    let products = products(&mut rng(), 50);
    assert_eq!(products.len(), 50);
    assert_eq!(products[0].name, "Product_1");
    assert_eq!(products[49].name, "Product_50");

    for p in &products {
      assert!((10.0..=1000.0).contains(&p.price), "{}", p.price);
      assert!(((p.price * 100.0).round() - p.price * 100.0).abs() < 1e-6);
      assert!(p.stock <= 100);
    }
  }

  #[test]
  fn suppliers_have_padded_names_and_distinct_emails() {
    let suppliers = suppliers(&mut rng(), 40).unwrap();
    let emails: HashSet<_> = suppliers.iter().map(|s| s.contact_email.as_str()).collect();
    assert_eq!(emails.len(), 40);

    for s in &suppliers {
      let (token, suffix) = s.name.split_once(' ').unwrap();
      assert_eq!(token.len(), 5);
      assert!(token.chars().all(|c| c.is_ascii_alphabetic()));
      assert!(COMPANY_SUFFIXES.contains(&suffix));
    }
  }

  #[test]
  fn exhausted_unique_column_is_reported() {
    let mut issued = Issued::new(Table::Customers, "email");
    issued.fresh(|| ((), "same@example.com".to_owned())).unwrap();
    let err = issued
      .fresh(|| ((), "same@example.com".to_owned()))
      .unwrap_err();
    assert!(matches!(
      err,
      Error::UniqueExhausted { table: Table::Customers, column: "email", attempts: MAX_UNIQUE_ATTEMPTS }
    ));
  }

  #[test]
  fn orders_reference_only_given_ids() {
    let w = window();
    let orders = orders(&mut rng(), 300, &[3, 5, 8], &[10, 11], w).unwrap();
    assert_eq!(orders.len(), 300);

    for o in &orders {
      assert!([3, 5, 8].contains(&o.customer_id));
      assert!([10, 11].contains(&o.product_id));
      assert!((1..=10).contains(&o.quantity));
      assert!(o.order_date >= w.start.date() && o.order_date < w.end.date());
    }
  }

  #[test]
  fn orders_sample_with_replacement() {
    let orders = orders(&mut rng(), 50, &[1], &[2], window()).unwrap();
    assert!(orders.iter().all(|o| o.customer_id == 1 && o.product_id == 2));
  }

  #[test]
  fn orders_without_parents_fail() {
    let err = orders(&mut rng(), 1, &[], &[1], window()).unwrap_err();
    assert!(matches!(
      err,
      Error::Counts(sqlagent_core::Error::MissingParents {
        child:  Table::Orders,
        parent: Table::Customers,
      })
    ));
  }

  #[test]
  fn zero_orders_need_no_parents() {
    assert!(orders(&mut rng(), 0, &[], &[], window()).unwrap().is_empty());
  }

  #[test]
  fn deliveries_follow_shipments() {
    let w = window();
    let shipments = shipments(&mut rng(), 400, &[1, 2, 3], &[7], w).unwrap();

    for s in &shipments {
      assert!([1, 2, 3].contains(&s.order_id));
      assert_eq!(s.supplier_id, 7);
      let lag = (s.delivery_date - s.shipment_date).num_days();
      assert!((1..=30).contains(&lag), "{lag}");
      assert!(s.shipment_date >= w.start.date() && s.shipment_date < w.end.date());
    }
  }
}
