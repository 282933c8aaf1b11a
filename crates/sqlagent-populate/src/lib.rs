//! Synthetic data generator for the sqlagent demo database.
//!
//! [`populate_database`] creates the schema in a SQLite file and fills it with
//! random but referentially consistent customers, products, suppliers,
//! orders, and shipments.
//!
//! ```rust,ignore
//! let report = sqlagent_populate::populate_database(&PopulateConfig::default())?;
//! ```

pub mod config;
pub mod error;
pub mod generate;
pub mod populate;
pub mod random;

pub use config::PopulateConfig;
pub use error::{Error, Result};
pub use populate::{populate, populate_database};
