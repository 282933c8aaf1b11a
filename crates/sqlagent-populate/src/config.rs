//! Generator configuration.
//!
//! Layered lowest to highest: built-in defaults, an optional TOML file,
//! `SQLAGENT_*` environment variables, then explicit command-line flags.
//! The result is an immutable [`PopulateConfig`] passed by reference.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use sqlagent_core::counts::PopulationCounts;

pub const DEFAULT_DATABASE_PATH: &str = "data/database.db";

const ENV_PREFIX: &str = "SQLAGENT";

/// Everything one population run needs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PopulateConfig {
  pub database_path: PathBuf,
  pub counts:        PopulationCounts,
  /// Fixed RNG seed for reproducible output; entropy when absent.
  pub seed:          Option<u64>,
}

impl Default for PopulateConfig {
  fn default() -> Self {
    Self {
      database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
      counts:        PopulationCounts::default(),
      seed:          None,
    }
  }
}

/// Values given explicitly on the command line; each one wins over every
/// other source.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
  pub database_path: Option<PathBuf>,
  pub customers:     Option<usize>,
  pub products:      Option<usize>,
  pub suppliers:     Option<usize>,
  pub orders:        Option<usize>,
  pub shipments:     Option<usize>,
  pub seed:          Option<u64>,
}

impl Overrides {
  fn apply(&self, cfg: &mut PopulateConfig) {
    if let Some(p) = &self.database_path {
      cfg.database_path = p.clone();
    }
    let counts = &mut cfg.counts;
    for (slot, value) in [
      (&mut counts.customers, self.customers),
      (&mut counts.products, self.products),
      (&mut counts.suppliers, self.suppliers),
      (&mut counts.orders, self.orders),
      (&mut counts.shipments, self.shipments),
    ] {
      if let Some(v) = value {
        *slot = v;
      }
    }
    if self.seed.is_some() {
      cfg.seed = self.seed;
    }
  }
}

impl PopulateConfig {
  /// Build the configuration from `file` (skipped when missing), the
  /// environment, and `overrides`.
  ///
  /// Environment keys use `SQLAGENT_` as prefix and `__` for nesting, e.g.
  /// `SQLAGENT_DATABASE_PATH` or `SQLAGENT_COUNTS__ORDERS`.
  ///
  /// `SQLAGENT_DATABASE_PATH` is shared with the chat shell, so one variable
  /// points both programs at the same file.
  pub fn load(file: &Path, overrides: &Overrides) -> Result<Self, config::ConfigError> {
    Self::load_with_env(file, overrides, None)
  }

  /// As [`PopulateConfig::load`], reading variables from `env` instead of
  /// the process environment when given.
  fn load_with_env(
    file: &Path,
    overrides: &Overrides,
    env: Option<config::Map<String, String>>,
  ) -> Result<Self, config::ConfigError> {
    let settings = config::Config::builder()
      .add_source(config::File::from(file).required(false))
      .add_source(
        config::Environment::with_prefix(ENV_PREFIX)
          .prefix_separator("_")
          .separator("__")
          .try_parsing(true)
          .source(env),
      )
      .build()?;

    let mut cfg: PopulateConfig = settings.try_deserialize()?;
    overrides.apply(&mut cfg);
    Ok(cfg)
  }
}
