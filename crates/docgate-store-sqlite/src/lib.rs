//! # docgate-store-sqlite
//!
//! SQLite adapter for the docgate store port.
//! Keeps every document of an instance in a single file (or in memory),
//! which makes it the backend of choice for local runs and tests.

mod collection;
pub mod migrations;
mod row_mapping;
pub mod store;

pub use collection::SqliteCollection;
pub use store::{SqliteConnector, SqliteDocumentStore};
