//! Database tools offered to the model.
//!
//! Every tool opens its own read-only connection on a blocking thread, so a
//! tool call can never modify the database or stall the UI's runtime. Tool
//! failures become text for the model to read; they never abort the agent.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::{Value, json};
use sqlagent_store_sqlite::SqlDatabase;
use thiserror::Error;

use crate::error::Result;

pub const LIST_TABLES: &str = "sql_db_list_tables";
pub const SCHEMA: &str = "sql_db_schema";
pub const QUERY: &str = "sql_db_query";

#[derive(Debug, Error)]
enum ToolError {
  #[error("unknown tool {0:?}, valid tools are sql_db_list_tables, sql_db_schema, sql_db_query")]
  Unknown(String),

  #[error("invalid arguments: {0}")]
  Arguments(#[from] serde_json::Error),

  #[error("{0}")]
  Database(#[from] sqlagent_store_sqlite::Error),
}

#[derive(Deserialize)]
struct SchemaArgs {
  table_names: String,
}

#[derive(Deserialize)]
struct QueryArgs {
  query: String,
}

/// JSON tool definitions for the chat-completions `tools` field.
pub fn definitions() -> Vec<Value> {
  vec![
    json!({
      "type": "function",
      "function": {
        "name": LIST_TABLES,
        "description": "List the tables in the database.",
        "parameters": { "type": "object", "properties": {} }
      }
    }),
    json!({
      "type": "function",
      "function": {
        "name": SCHEMA,
        "description": "Show the CREATE TABLE statement and three sample rows for each \
                        table. Call sql_db_list_tables first to be sure the tables exist.",
        "parameters": {
          "type": "object",
          "properties": {
            "table_names": {
              "type": "string",
              "description": "Comma-separated table names, e.g. \"customers, orders\"."
            }
          },
          "required": ["table_names"]
        }
      }
    }),
    json!({
      "type": "function",
      "function": {
        "name": QUERY,
        "description": "Run one read-only SQLite query and return the rows as \
                        tab-separated text. On error, rewrite the query and retry.",
        "parameters": {
          "type": "object",
          "properties": {
            "query": { "type": "string", "description": "A single SQLite statement." }
          },
          "required": ["query"]
        }
      }
    }),
  ]
}

/// Run tool `name` with JSON `arguments` against the database at `db`.
pub async fn run(db: PathBuf, name: String, arguments: String) -> Result<String> {
  Ok(tokio::task::spawn_blocking(move || run_blocking(&db, &name, &arguments)).await?)
}

pub fn run_blocking(db: &Path, name: &str, arguments: &str) -> String {
  match execute(db, name, arguments) {
    Ok(out) => out,
    Err(e) => format!("Error: {e}"),
  }
}

fn execute(db: &Path, name: &str, arguments: &str) -> Result<String, ToolError> {
  // Reject unknown tools before touching the file.
  if ![LIST_TABLES, SCHEMA, QUERY].contains(&name) {
    return Err(ToolError::Unknown(name.to_owned()));
  }
  let database = SqlDatabase::open_read_only(db)?;

  match name {
    LIST_TABLES => Ok(database.table_names()?.join(", ")),
    SCHEMA => {
      let args: SchemaArgs = serde_json::from_str(arguments)?;
      let tables: Vec<String> = args
        .table_names
        .split(',')
        .map(|t| t.trim().to_owned())
        .filter(|t| !t.is_empty())
        .collect();
      Ok(database.table_info(&tables)?)
    }
    _ => {
      let args: QueryArgs = serde_json::from_str(arguments)?;
      let out = database.run(&args.query)?;
      Ok(if out.is_empty() { "(no rows)".to_owned() } else { out })
    }
  }
}

/// Human-readable form of a tool's input for the trace view.
pub fn describe_input(name: &str, arguments: &str) -> String {
  let parsed: Option<Value> = serde_json::from_str(arguments).ok();
  let field = match name {
    QUERY => "query",
    SCHEMA => "table_names",
    _ => return String::new(),
  };
  parsed
    .as_ref()
    .and_then(|v| v.get(field))
    .and_then(Value::as_str)
    .map(str::to_owned)
    .unwrap_or_else(|| arguments.to_owned())
}
