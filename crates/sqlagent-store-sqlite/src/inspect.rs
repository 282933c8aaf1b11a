//! [`SqlDatabase`] — a read-only view over any SQLite file.
//!
//! Used by the chat agent's tools: it lists tables, describes them with their
//! DDL and a few sample rows, and runs arbitrary queries, rendering results as
//! plain text for a language model to read.

use std::path::Path;

use rusqlite::{Connection, OpenFlags, types::ValueRef};

use crate::Result;

/// Sample rows appended to each table description.
const SAMPLE_ROWS: usize = 3;

/// Rows beyond this are dropped from query output.
const MAX_RESULT_ROWS: usize = 200;

/// A read-only handle on a SQLite database file.
///
/// Every write attempted through [`SqlDatabase::run`] fails at the SQLite
/// level because the connection is opened with `SQLITE_OPEN_READ_ONLY`.
pub struct SqlDatabase {
  conn: Connection,
}

impl SqlDatabase {
  /// Open `path` read-only. The file must already exist.
  pub fn open_read_only(path: impl AsRef<Path>) -> Result<Self> {
    let conn = Connection::open_with_flags(
      path,
      OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    Ok(Self { conn })
  }

  /// User tables, sorted by name. SQLite's internal tables are skipped.
  pub fn table_names(&self) -> Result<Vec<String>> {
    let mut stmt = self.conn.prepare(
      "SELECT name FROM sqlite_master
       WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
       ORDER BY name",
    )?;
    let names = stmt
      .query_map([], |r| r.get(0))?
      .collect::<rusqlite::Result<Vec<String>>>()?;
    Ok(names)
  }

  /// `CREATE TABLE` statements for `tables`, each followed by a few sample
  /// rows. Unknown table names are reported inline rather than failing the
  /// whole description.
  pub fn table_info(&self, tables: &[String]) -> Result<String> {
    let known = self.table_names()?;
    let mut out = Vec::with_capacity(tables.len());

    for table in tables {
      let table = table.trim();
      if !known.iter().any(|k| k == table) {
        out.push(format!("Error: table {table:?} does not exist."));
        continue;
      }

      let ddl: String = self.conn.query_row(
        "SELECT sql FROM sqlite_master WHERE type = 'table' AND name = ?1",
        [table],
        |r| r.get(0),
      )?;
      let sample = self.render_query(
        &format!("SELECT * FROM \"{table}\" LIMIT {SAMPLE_ROWS}"),
        SAMPLE_ROWS,
      )?;

      out.push(format!(
        "{ddl}\n\n/*\n{SAMPLE_ROWS} rows from {table} table:\n{sample}\n*/"
      ));
    }

    Ok(out.join("\n\n"))
  }

  /// Execute `sql` and render the result set as text.
  ///
  /// Statements that return no rows render as an empty string.
  pub fn run(&self, sql: &str) -> Result<String> { self.render_query(sql, MAX_RESULT_ROWS) }

  fn render_query(&self, sql: &str, limit: usize) -> Result<String> {
    let mut stmt = self.conn.prepare(sql)?;
    let columns: Vec<String> = stmt.column_names().into_iter().map(str::to_owned).collect();

    let mut rows = stmt.query([])?;
    let mut lines = Vec::new();
    let mut truncated = false;

    while let Some(row) = rows.next()? {
      if lines.len() == limit {
        truncated = true;
        break;
      }
      let cells = (0..columns.len())
        .map(|i| row.get_ref(i).map(render_value))
        .collect::<rusqlite::Result<Vec<_>>>()?;
      lines.push(cells.join("\t"));
    }

    if columns.is_empty() || lines.is_empty() {
      return Ok(String::new());
    }

    let mut out = columns.join("\t");
    for line in lines {
      out.push('\n');
      out.push_str(&line);
    }
    if truncated {
      out.push_str(&format!("\n... (truncated to {limit} rows)"));
    }
    Ok(out)
  }
}

fn render_value(v: ValueRef<'_>) -> String {
  match v {
    ValueRef::Null => "NULL".to_owned(),
    ValueRef::Integer(i) => i.to_string(),
    ValueRef::Real(f) => f.to_string(),
    ValueRef::Text(t) => String::from_utf8_lossy(t).into_owned(),
    ValueRef::Blob(b) => format!("<blob {} bytes>", b.len()),
  }
}
