//! Shared helpers used across CLI commands.
//!
//! Picks the store connector for the configured backend and
//! provides the Ctrl-C shutdown future used by `serve`.

use std::sync::Arc;

use docgate_config::{StoreBackend, StoreConfig};
use docgate_store::StoreConnector;
use docgate_store_mongo::MongoConnector;
use docgate_store_sqlite::SqliteConnector;

/// Builds the connector for the configured backend.
pub fn connector(store: &StoreConfig) -> Arc<dyn StoreConnector> {
    match store.backend {
        StoreBackend::Mongo => Arc::new(MongoConnector::new(store.connect_timeout())),
        StoreBackend::Sqlite => Arc::new(SqliteConnector::new(store.data_dir.clone())),
    }
}

/// Resolves on Ctrl-C.
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "cannot listen for Ctrl-C; stopping now");
        return;
    }
    tracing::info!("shutdown signal received");
}
