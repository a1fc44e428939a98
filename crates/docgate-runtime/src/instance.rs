//! A single live connection to one cluster.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use docgate_store::{CollectionHandle, DocumentStore, StoreConnector};
use docgate_types::{InstanceCredentials, InstanceType};
use tracing::{debug, info};

use crate::error::InstanceError;

/// Owns the connection for one `InstanceType`.
pub struct StoreInstance {
    instance_type: InstanceType,
    identifier: String,
    store: Arc<dyn DocumentStore>,
    shut_down: AtomicBool,
}

impl StoreInstance {
    /// Validates `credentials` and connects through `connector`.
    ///
    /// # Errors
    ///
    /// Returns `InstanceError::InvalidCredentials` without touching the
    /// network if validation fails, or `InstanceError::Connect` if the
    /// driver cannot reach the cluster.
    pub async fn connect(
        instance_type: InstanceType,
        credentials: &InstanceCredentials,
        connector: &dyn StoreConnector,
    ) -> Result<Self, InstanceError> {
        let started = Instant::now();
        info!(
            instance = %instance_type,
            identifier = %credentials.identifier,
            backend = connector.backend(),
            "hooking into store instance"
        );

        credentials
            .validate()
            .map_err(|source| InstanceError::InvalidCredentials {
                instance: instance_type,
                identifier: credentials.identifier.clone(),
                source,
            })?;

        let store = connector
            .connect(credentials)
            .await
            .map_err(|source| InstanceError::Connect {
                instance: instance_type,
                identifier: credentials.identifier.clone(),
                source,
            })?;

        info!(
            instance = %instance_type,
            identifier = %credentials.identifier,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "store instance ready"
        );
        Ok(Self::from_store(instance_type, &credentials.identifier, store))
    }

    /// Wraps an already-open store.
    pub fn from_store(
        instance_type: InstanceType,
        identifier: impl Into<String>,
        store: Arc<dyn DocumentStore>,
    ) -> Self {
        Self {
            instance_type,
            identifier: identifier.into(),
            store,
            shut_down: AtomicBool::new(false),
        }
    }

    /// Resolves a collection handle, or `None` if the database cannot be
    /// resolved or the instance has been shut down.
    pub fn collection(&self, database: &str, collection: &str) -> Option<Arc<dyn CollectionHandle>> {
        if self.is_shut_down() {
            return None;
        }
        self.store.collection(database, collection)
    }

    /// Closes the underlying connection. Later calls are no-ops.
    pub async fn shutdown(&self) {
        if self.shut_down.swap(true, Ordering::AcqRel) {
            debug!(instance = %self.instance_type, "instance already shut down");
            return;
        }
        self.store.shutdown().await;
        info!(instance = %self.instance_type, identifier = %self.identifier, "instance shut down");
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::Acquire)
    }

    pub fn instance_type(&self) -> InstanceType {
        self.instance_type
    }

    /// The configured identifier of the cluster.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }
}

impl std::fmt::Debug for StoreInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreInstance")
            .field("instance_type", &self.instance_type)
            .field("identifier", &self.identifier)
            .field("shut_down", &self.is_shut_down())
            .finish_non_exhaustive()
    }
}
