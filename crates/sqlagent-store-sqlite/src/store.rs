//! [`SqliteStore`] — the SQLite implementation of [`RecordStore`].

use std::path::Path;

use rusqlite::{Connection, params};
use sqlagent_core::{
  entity::{Customer, Order, Product, Record, Shipment, Supplier, Table},
  store::RecordStore,
};

use crate::{
  Result,
  encode::{decode_date, decode_u32, encode_date},
  schema::{PRAGMAS, SCHEMA},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// The demo database backed by a single SQLite file.
///
/// Owns its connection for the lifetime of the value; dropping the store
/// closes it on every exit path.
pub struct SqliteStore {
  conn: Connection,
}

impl SqliteStore {
  /// Open (or create) a database at `path` and run schema initialisation.
  ///
  /// The parent directory must already exist.
  pub fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = Connection::open(path.as_ref())?;
    let store = Self::from_connection(conn)?;
    tracing::debug!(path = %path.as_ref().display(), "opened sqlite store");
    Ok(store)
  }

  /// Open an in-memory database — useful for testing.
  pub fn open_in_memory() -> Result<Self> { Self::from_connection(Connection::open_in_memory()?) }

  fn from_connection(conn: Connection) -> Result<Self> {
    conn.execute_batch(PRAGMAS)?;
    let store = Self { conn };
    store.init_schema()?;
    Ok(store)
  }

  /// Create the five tables if they do not exist yet.
  ///
  /// Idempotent: running it against an initialised file leaves both the
  /// schema and the rows untouched.
  pub fn init_schema(&self) -> Result<()> {
    self.conn.execute_batch(SCHEMA)?;
    Ok(())
  }

  /// Schema version recorded in the file header.
  pub fn schema_version(&self) -> Result<i64> {
    Ok(self.conn.query_row("PRAGMA user_version", [], |r| r.get(0))?)
  }

  #[cfg(test)]
  pub(crate) fn connection(&self) -> &Connection { &self.conn }
}

// ─── RecordStore impl ────────────────────────────────────────────────────────

impl RecordStore for SqliteStore {
  type Error = crate::Error;

  // ── Writes ──────────────────────────────────────────────────────────────

  fn insert_parents(
    &mut self,
    customers: &[Customer],
    products: &[Product],
    suppliers: &[Supplier],
  ) -> Result<()> {
    let tx = self.conn.transaction()?;
    {
      let mut stmt =
        tx.prepare("INSERT INTO customers (name, email, age) VALUES (?1, ?2, ?3)")?;
      for c in customers {
        stmt.execute(params![c.name, c.email, c.age])?;
      }

      let mut stmt =
        tx.prepare("INSERT INTO products (name, price, stock) VALUES (?1, ?2, ?3)")?;
      for p in products {
        stmt.execute(params![p.name, p.price, p.stock])?;
      }

      let mut stmt = tx.prepare(
        "INSERT INTO suppliers (name, contact_name, contact_email) VALUES (?1, ?2, ?3)",
      )?;
      for s in suppliers {
        stmt.execute(params![s.name, s.contact_name, s.contact_email])?;
      }
    }
    tx.commit()?;

    tracing::info!(
      customers = customers.len(),
      products = products.len(),
      suppliers = suppliers.len(),
      "committed parent rows"
    );
    Ok(())
  }

  fn insert_orders(&mut self, orders: &[Order]) -> Result<()> {
    let tx = self.conn.transaction()?;
    {
      let mut stmt = tx.prepare(
        "INSERT INTO orders (customer_id, product_id, quantity, order_date)
         VALUES (?1, ?2, ?3, ?4)",
      )?;
      for o in orders {
        stmt.execute(params![
          o.customer_id,
          o.product_id,
          o.quantity,
          encode_date(o.order_date),
        ])?;
      }
    }
    tx.commit()?;

    tracing::info!(orders = orders.len(), "committed orders");
    Ok(())
  }

  fn insert_shipments(&mut self, shipments: &[Shipment]) -> Result<()> {
    let tx = self.conn.transaction()?;
    {
      let mut stmt = tx.prepare(
        "INSERT INTO shipments (order_id, shipment_date, delivery_date, supplier_id)
         VALUES (?1, ?2, ?3, ?4)",
      )?;
      for s in shipments {
        stmt.execute(params![
          s.order_id,
          encode_date(s.shipment_date),
          encode_date(s.delivery_date),
          s.supplier_id,
        ])?;
      }
    }
    tx.commit()?;

    tracing::info!(shipments = shipments.len(), "committed shipments");
    Ok(())
  }

  // ── Reads ───────────────────────────────────────────────────────────────

  fn ids(&self, table: Table) -> Result<Vec<i64>> {
    let mut stmt = self
      .conn
      .prepare(&format!("SELECT id FROM {} ORDER BY id", table.name()))?;
    let ids = stmt
      .query_map([], |r| r.get(0))?
      .collect::<rusqlite::Result<Vec<i64>>>()?;
    tracing::debug!(%table, count = ids.len(), "read back ids");
    Ok(ids)
  }

  fn count(&self, table: Table) -> Result<usize> {
    let n: i64 = self.conn.query_row(
      &format!("SELECT COUNT(*) FROM {}", table.name()),
      [],
      |r| r.get(0),
    )?;
    Ok(n as usize)
  }

  fn customers(&self) -> Result<Vec<Record<Customer>>> {
    let mut stmt = self
      .conn
      .prepare("SELECT id, name, email, age FROM customers ORDER BY id")?;
    let raws = stmt
      .query_map([], |r| {
        Ok((r.get::<_, i64>(0)?, r.get(1)?, r.get(2)?, r.get::<_, i64>(3)?))
      })?
      .collect::<rusqlite::Result<Vec<(i64, String, String, i64)>>>()?;

    raws
      .into_iter()
      .map(|(id, name, email, age)| {
        Ok(Record {
          id,
          value: Customer { name, email, age: decode_u32("customers", "age", age)? },
        })
      })
      .collect()
  }

  fn products(&self) -> Result<Vec<Record<Product>>> {
    let mut stmt = self
      .conn
      .prepare("SELECT id, name, price, stock FROM products ORDER BY id")?;
    let raws = stmt
      .query_map([], |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?)))?
      .collect::<rusqlite::Result<Vec<(i64, String, f64, i64)>>>()?;

    raws
      .into_iter()
      .map(|(id, name, price, stock)| {
        Ok(Record {
          id,
          value: Product { name, price, stock: decode_u32("products", "stock", stock)? },
        })
      })
      .collect()
  }

  fn suppliers(&self) -> Result<Vec<Record<Supplier>>> {
    let mut stmt = self.conn.prepare(
      "SELECT id, name, contact_name, contact_email FROM suppliers ORDER BY id",
    )?;
    let rows = stmt
      .query_map([], |r| {
        Ok(Record {
          id:    r.get(0)?,
          value: Supplier {
            name:          r.get(1)?,
            contact_name:  r.get(2)?,
            contact_email: r.get(3)?,
          },
        })
      })?
      .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
  }

  fn orders(&self) -> Result<Vec<Record<Order>>> {
    let mut stmt = self.conn.prepare(
      "SELECT id, customer_id, product_id, quantity, order_date FROM orders ORDER BY id",
    )?;
    let raws = stmt
      .query_map([], |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?, r.get(4)?)))?
      .collect::<rusqlite::Result<Vec<(i64, i64, i64, i64, String)>>>()?;

    raws
      .into_iter()
      .map(|(id, customer_id, product_id, quantity, order_date)| {
        Ok(Record {
          id,
          value: Order {
            customer_id,
            product_id,
            quantity: decode_u32("orders", "quantity", quantity)?,
            order_date: decode_date(&order_date)?,
          },
        })
      })
      .collect()
  }

  fn shipments(&self) -> Result<Vec<Record<Shipment>>> {
    let mut stmt = self.conn.prepare(
      "SELECT id, order_id, shipment_date, delivery_date, supplier_id
       FROM shipments ORDER BY id",
    )?;
    let raws = stmt
      .query_map([], |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?, r.get(4)?)))?
      .collect::<rusqlite::Result<Vec<(i64, i64, String, String, i64)>>>()?;

    raws
      .into_iter()
      .map(|(id, order_id, shipment_date, delivery_date, supplier_id)| {
        Ok(Record {
          id,
          value: Shipment {
            order_id,
            shipment_date: decode_date(&shipment_date)?,
            delivery_date: decode_date(&delivery_date)?,
            supplier_id,
          },
        })
      })
      .collect()
  }
}
