//! SQLite backend for the sqlagent demo database.
//!
//! [`SqliteStore`] is the write side used by the generator: one owned
//! connection, closed when the store is dropped. [`SqlDatabase`] is the
//! read-only view the chat agent's tools query through.

mod encode;
mod inspect;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use inspect::SqlDatabase;
pub use store::SqliteStore;
