//! Error type for `sqlagent-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] rusqlite::Error),

  #[error("date parse error: {0}")]
  DateParse(String),

  /// A stored integer did not fit the column's domain type.
  #[error("value out of range in {table}.{column}: {value}")]
  OutOfRange {
    table:  &'static str,
    column: &'static str,
    value:  i64,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
