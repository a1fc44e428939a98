//! # docgate-types
//!
//! Domain types for the docgate document gateway.
//! This crate contains pure data types with no I/O
//! (serde for serialization, thiserror for error enums).

pub mod credentials;
pub mod document;
pub mod error;
pub mod filter;
pub mod instance;
pub mod outcome;

// Re-exports for convenience.
pub use credentials::{CredentialsError, InstanceCredentials, MIN_PASSWORD_LEN};
pub use document::{Document, ID_FIELD};
pub use error::DiagnosticError;
pub use filter::Filter;
pub use instance::InstanceType;
pub use outcome::Outcome;
