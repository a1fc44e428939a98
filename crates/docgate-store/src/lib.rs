//! # docgate-store
//!
//! Port definitions (abstract traits) for document stores.
//! Adapter crates implement these traits for a concrete driver.

pub mod error;
pub mod namespace;
pub mod store;

pub use error::StoreError;
pub use namespace::{is_valid_collection_name, is_valid_database_name};
pub use store::{CollectionHandle, DocumentStore, StoreConnector};
