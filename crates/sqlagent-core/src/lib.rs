//! Core types for the sqlagent demo database.
//!
//! This crate holds the five demo entities, the population counts, and the
//! [`RecordStore`](store::RecordStore) abstraction the generator writes
//! through. It has no database dependency of its own.

pub mod counts;
pub mod entity;
pub mod error;
pub mod store;

pub use error::{Error, Result};
