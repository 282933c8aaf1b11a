//! `populate` — create and fill the sqlagent demo database.
//!
//! # Usage
//!
//! ```
//! populate
//! populate --database /tmp/demo.db --orders 50 --shipments 20 --seed 7
//! populate --config populate.toml
//! ```

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use sqlagent_core::counts::PopulationReport;
use sqlagent_populate::{PopulateConfig, config::Overrides, populate_database};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Seed a SQLite database with synthetic demo data")]
struct Cli {
  /// Path to an optional TOML configuration file.
  #[arg(short, long, default_value = "populate.toml")]
  config: PathBuf,

  /// Output database file (default: data/database.db).
  #[arg(short, long)]
  database: Option<PathBuf>,

  #[arg(long)]
  customers: Option<usize>,

  #[arg(long)]
  products: Option<usize>,

  #[arg(long)]
  suppliers: Option<usize>,

  #[arg(long)]
  orders: Option<usize>,

  #[arg(long)]
  shipments: Option<usize>,

  /// Seed the random generator for reproducible output.
  #[arg(long)]
  seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  run(Cli::parse())?;
  Ok(())
}

/// Load configuration and populate. Failures are returned, not logged;
/// anyhow prints them once on exit.
fn run(cli: Cli) -> anyhow::Result<PopulationReport> {
  let overrides = Overrides {
    database_path: cli.database,
    customers:     cli.customers,
    products:      cli.products,
    suppliers:     cli.suppliers,
    orders:        cli.orders,
    shipments:     cli.shipments,
    seed:          cli.seed,
  };
  let cfg = PopulateConfig::load(&cli.config, &overrides)
    .with_context(|| format!("failed to load configuration from {:?}", cli.config))?;

  let report = populate_database(&cfg)
    .with_context(|| format!("population of {} failed", cfg.database_path.display()))?;

  tracing::info!(
    path = %cfg.database_path.display(),
    customers = report.customers,
    products = report.products,
    suppliers = report.suppliers,
    orders = report.orders,
    shipments = report.shipments,
    "database populated successfully"
  );
  Ok(report)
}
