//! Errors surfaced by store adapters.

use thiserror::Error;

/// Errors returned by store implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The cluster could not be reached or the client could not be built.
    #[error("connection failed: {message}")]
    Connect { message: String },
    /// A driver or I/O error occurred during an operation.
    #[error("storage error: {message}")]
    Storage { message: String },
    /// The store rejected an insert because the identifier is taken.
    #[error("duplicate key: {id}")]
    DuplicateKey { id: String },
    /// The document cannot be represented by the store.
    #[error("invalid document: {message}")]
    InvalidDocument { message: String },
}

impl StoreError {
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn connect(message: impl Into<String>) -> Self {
        Self::Connect {
            message: message.into(),
        }
    }
}
