//! The population pass: parents, then orders, then shipments.
//!
//! Each stage commits before the next one reads ids back, so every foreign
//! key written points at a row that is already durable. A failure between
//! stages leaves a partially filled but consistent database.

use chrono::{Local, NaiveDateTime};
use rand::{Rng, SeedableRng, rngs::StdRng};
use sqlagent_core::{
  counts::{PopulationCounts, PopulationReport},
  entity::Table,
  store::RecordStore,
};
use sqlagent_store_sqlite::SqliteStore;

use crate::{
  Error, PopulateConfig, Result,
  generate::{self, DateWindow},
};

/// Length of the trailing window that order and shipment dates fall into.
pub const WINDOW_DAYS: i64 = 365;

fn store_err<E: std::error::Error + Send + Sync + 'static>(e: E) -> Error {
  Error::Store(Box::new(e))
}

/// Fill `store` with `counts` rows, dating orders and shipments in the year
/// before `now`.
///
/// Counts are validated before anything is written.
pub fn populate<S, R>(
  store: &mut S,
  counts: &PopulationCounts,
  rng: &mut R,
  now: NaiveDateTime,
) -> Result<PopulationReport>
where
  S: RecordStore,
  R: Rng + ?Sized,
{
  counts.validate()?;
  let window = DateWindow::trailing(now, WINDOW_DAYS);

  // Stage 1: parents.
  let customers = generate::customers(rng, counts.customers)?;
  let products = generate::products(rng, counts.products);
  let suppliers = generate::suppliers(rng, counts.suppliers)?;
  store
    .insert_parents(&customers, &products, &suppliers)
    .map_err(store_err)?;

  let customer_ids = store.ids(Table::Customers).map_err(store_err)?;
  let product_ids = store.ids(Table::Products).map_err(store_err)?;
  let supplier_ids = store.ids(Table::Suppliers).map_err(store_err)?;

  // Stage 2: orders.
  let orders = generate::orders(rng, counts.orders, &customer_ids, &product_ids, window)?;
  store.insert_orders(&orders).map_err(store_err)?;

  let order_ids = store.ids(Table::Orders).map_err(store_err)?;

  // Stage 3: shipments.
  let shipments =
    generate::shipments(rng, counts.shipments, &order_ids, &supplier_ids, window)?;
  store.insert_shipments(&shipments).map_err(store_err)?;

  Ok(PopulationReport {
    customers: customers.len(),
    products:  products.len(),
    suppliers: suppliers.len(),
    orders:    orders.len(),
    shipments: shipments.len(),
  })
}

/// Create (if needed) and populate the database described by `config`.
///
/// The containing directory is created when missing. The database must hold
/// no rows yet; the schema itself may already exist.
pub fn populate_database(config: &PopulateConfig) -> Result<PopulationReport> {
  config.counts.validate()?;

  let path = &config.database_path;
  if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
    std::fs::create_dir_all(dir).map_err(|source| Error::CreateDir {
      path: dir.to_path_buf(),
      source,
    })?;
  }

  let mut store = SqliteStore::open(path)?;
  if !store.is_empty()? {
    return Err(Error::NotEmpty(path.clone()));
  }

  let mut rng = match config.seed {
    Some(seed) => StdRng::seed_from_u64(seed),
    None => StdRng::from_entropy(),
  };

  tracing::info!(
    path = %path.display(),
    seed = ?config.seed,
    counts = ?config.counts,
    "populating database"
  );

  populate(&mut store, &config.counts, &mut rng, Local::now().naive_local())
}
