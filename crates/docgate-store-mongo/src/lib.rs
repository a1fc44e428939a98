//! # docgate-store-mongo
//!
//! MongoDB adapter for the docgate store port.
//! One `MongoDocumentStore` wraps one driver `Client`, which pools its own
//! connections and is safe to share across requests.

mod codec;
mod collection;
pub mod connector;
pub mod uri;

pub use collection::MongoCollection;
pub use connector::{MongoConnector, MongoDocumentStore};
pub use uri::connection_uri;
