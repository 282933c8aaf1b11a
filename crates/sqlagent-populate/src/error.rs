//! Error type for `sqlagent-populate`.

use std::path::PathBuf;

use sqlagent_core::entity::Table;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Misconfigured counts (e.g. orders requested without customers).
  #[error("invalid population counts: {0}")]
  Counts(#[from] sqlagent_core::Error),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("cannot create directory {path:?}: {source}")]
  CreateDir {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// The generator only writes into a database with no rows.
  #[error("database {0:?} already contains rows")]
  NotEmpty(PathBuf),

  /// No fresh value for a unique column was found after repeated draws.
  #[error("no unused {column} value for {table} after {attempts} attempts")]
  UniqueExhausted {
    table:    Table,
    column:   &'static str,
    attempts: usize,
  },
}

impl From<sqlagent_store_sqlite::Error> for Error {
  fn from(e: sqlagent_store_sqlite::Error) -> Self { Error::Store(Box::new(e)) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
