//! # docgate-runtime
//!
//! Instance lifecycle and document operations for docgate.
//! Builds the `InstanceRegistry` at startup and exposes a
//! `DocumentRepository` per logical instance type.
//!
//! Use `AppContext` to hand store access to the transport layer.

pub mod context;
pub mod error;
pub mod instance;
pub mod registry;
pub mod repository;

pub use context::AppContext;
pub use error::{InstanceError, RegistryError, RepositoryError};
pub use instance::StoreInstance;
pub use registry::{InstanceRegistry, RegistryBuilder};
pub use repository::DocumentRepository;
