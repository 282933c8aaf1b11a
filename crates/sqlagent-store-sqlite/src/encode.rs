//! Encoding and decoding helpers between domain types and the plain values
//! stored in SQLite columns.
//!
//! Dates are stored as `YYYY-MM-DD` text. Unsigned domain integers are stored
//! as SQLite `INTEGER` and range-checked on the way back out.

use chrono::NaiveDate;

use crate::{Error, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Unsigned integers ───────────────────────────────────────────────────────

pub fn decode_u32(table: &'static str, column: &'static str, value: i64) -> Result<u32> {
  u32::try_from(value).map_err(|_| Error::OutOfRange { table, column, value })
}
