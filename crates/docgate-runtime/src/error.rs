//! Runtime-specific error types.

use docgate_store::StoreError;
use docgate_types::{CredentialsError, DiagnosticError, InstanceType};
use thiserror::Error;

/// A single instance could not be brought up. The registry skips it.
#[derive(Debug, Error)]
pub enum InstanceError {
    /// Credentials failed validation; no connection was attempted.
    #[error("{instance} instance '{identifier}' has invalid credentials: {source}")]
    InvalidCredentials {
        instance: InstanceType,
        identifier: String,
        #[source]
        source: CredentialsError,
    },
    /// The store driver could not connect.
    #[error("{instance} instance '{identifier}' is unreachable: {source}")]
    Connect {
        instance: InstanceType,
        identifier: String,
        #[source]
        source: StoreError,
    },
}

impl DiagnosticError for InstanceError {
    fn hint(&self) -> Option<String> {
        match self {
            Self::InvalidCredentials { source, .. } => Some(match source {
                CredentialsError::WeakPassword => {
                    "Cluster passwords must be at least 21 characters long.".into()
                }
                other => format!("The configured credentials are incomplete: {other}."),
            }),
            Self::Connect { .. } => {
                Some("The cluster did not answer within the connect timeout.".into())
            }
        }
    }

    fn fix(&self) -> Option<String> {
        let instance = match self {
            Self::InvalidCredentials { instance, .. } | Self::Connect { instance, .. } => instance,
        };
        Some(format!(
            "Check [instances.{key}] in the config file or DOCGATE_INSTANCES__{upper}__* variables.",
            key = instance.config_key(),
            upper = instance.config_key().to_uppercase(),
        ))
    }
}

/// Errors from registry lookups and shutdown.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// No live instance is registered for this type.
    #[error("no {0} instance is available")]
    InstanceUnavailable(InstanceType),
    /// Some instances were absent when shutting down.
    #[error("shutdown skipped absent instances: {missing:?}")]
    ShutdownIncomplete { missing: Vec<InstanceType> },
}

/// Errors from `DocumentRepository` operations.
///
/// Input-validation variants are raised before any store access;
/// expected results such as "already exists" are `Outcome`s, not errors.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("The identifier is empty.")]
    EmptyIdentifier,
    #[error("No '_id' field could be found in the JSON document.")]
    MissingIdentifierField,
    #[error("The '_id' field in the JSON document is not equal to the provided 'identifier' request parameter.")]
    IdentifierMismatch,
    #[error("You cannot modify the identifier ('_id') value.")]
    IdentifierImmutable,
    /// The store driver failed mid-operation.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl RepositoryError {
    /// Whether the caller sent bad input (as opposed to a store failure).
    pub fn is_validation(&self) -> bool {
        !matches!(self, Self::Store(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_are_flagged() {
        assert!(RepositoryError::EmptyIdentifier.is_validation());
        assert!(RepositoryError::IdentifierImmutable.is_validation());
        assert!(!RepositoryError::Store(StoreError::storage("boom")).is_validation());
    }

    #[test]
    fn weak_password_hint_mentions_length() {
        let e = InstanceError::InvalidCredentials {
            instance: InstanceType::Game,
            identifier: "g".into(),
            source: CredentialsError::WeakPassword,
        };
        assert!(e.hint().expect("hint").contains("21"));
        assert!(e.fix().expect("fix").contains("instances.game"));
    }

    #[test]
    fn unavailable_names_instance() {
        let e = RegistryError::InstanceUnavailable(InstanceType::Network);
        assert_eq!(e.to_string(), "no Network instance is available");
    }
}
