//! Driver client lifecycle: connect, resolve collections, shut down.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use docgate_store::{
    is_valid_collection_name, is_valid_database_name, CollectionHandle, DocumentStore,
    StoreConnector, StoreError,
};
use docgate_types::InstanceCredentials;
use mongodb::bson::doc;
use mongodb::options::ClientOptions;
use mongodb::Client;

use crate::collection::MongoCollection;
use crate::uri::{connection_uri, AUTH_DATABASE};

/// Application name reported to the cluster.
const APP_NAME: &str = "docgate";

/// A live driver client for one cluster.
pub struct MongoDocumentStore {
    client: Client,
    closed: AtomicBool,
}

impl MongoDocumentStore {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            closed: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl DocumentStore for MongoDocumentStore {
    fn collection(&self, database: &str, collection: &str) -> Option<Arc<dyn CollectionHandle>> {
        if self.closed.load(Ordering::Acquire) {
            return None;
        }
        if !is_valid_database_name(database) || !is_valid_collection_name(collection) {
            return None;
        }
        let handle = self
            .client
            .database(database)
            .collection::<mongodb::bson::Document>(collection);
        Some(Arc::new(MongoCollection::new(handle)))
    }

    async fn shutdown(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        self.client.clone().shutdown().await;
    }
}

/// Connects to clusters with the official driver.
#[derive(Debug, Clone)]
pub struct MongoConnector {
    connect_timeout: Duration,
}

impl MongoConnector {
    /// `connect_timeout` bounds both socket connect and server selection.
    pub fn new(connect_timeout: Duration) -> Self {
        Self { connect_timeout }
    }
}

impl Default for MongoConnector {
    fn default() -> Self {
        Self::new(Duration::from_secs(10))
    }
}

#[async_trait]
impl StoreConnector for MongoConnector {
    fn backend(&self) -> &'static str {
        "mongo"
    }

    async fn connect(
        &self,
        credentials: &InstanceCredentials,
    ) -> Result<Arc<dyn DocumentStore>, StoreError> {
        let mut options = ClientOptions::parse(connection_uri(credentials))
            .await
            .map_err(|e| StoreError::connect(format!("invalid connection string: {e}")))?;
        options.app_name = Some(APP_NAME.to_string());
        options.connect_timeout = Some(self.connect_timeout);
        options.server_selection_timeout = Some(self.connect_timeout);

        let client = Client::with_options(options).map_err(|e| StoreError::connect(e.to_string()))?;

        // The driver connects lazily; ping so an unreachable cluster fails here.
        client
            .database(AUTH_DATABASE)
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| StoreError::connect(e.to_string()))?;

        tracing::debug!(host = %credentials.host, port = credentials.port, "mongo ping succeeded");
        Ok(Arc::new(MongoDocumentStore::new(client)))
    }
}
