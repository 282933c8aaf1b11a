//! Error types for `sqlagent-core`.

use thiserror::Error;

use crate::entity::Table;

#[derive(Debug, Error)]
pub enum Error {
  /// Rows were requested for a child table whose parent table will be empty,
  /// so there is nothing to sample foreign keys from.
  #[error("cannot generate {child} without any {parent}")]
  MissingParents { child: Table, parent: Table },

  #[error("unknown table: {0:?}")]
  UnknownTable(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
