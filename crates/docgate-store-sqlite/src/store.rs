//! SQLite-backed `DocumentStore` and its connector.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use docgate_store::{
    is_valid_collection_name, is_valid_database_name, CollectionHandle, DocumentStore,
    StoreConnector, StoreError,
};
use docgate_types::InstanceCredentials;

use crate::collection::SqliteCollection;
use crate::migrations::run_migrations;

/// Shared connection slot; `None` once the store has been shut down.
pub(crate) type SharedConn = Arc<Mutex<Option<rusqlite::Connection>>>;

/// Locks the shared connection, failing if it has been closed.
pub(crate) fn lock_open(
    conn: &SharedConn,
) -> Result<MutexGuard<'_, Option<rusqlite::Connection>>, StoreError> {
    let guard = conn.lock().map_err(|e| StoreError::storage(e.to_string()))?;
    if guard.is_none() {
        return Err(StoreError::storage("connection is closed"));
    }
    Ok(guard)
}

/// One SQLite database holding every collection of an instance.
pub struct SqliteDocumentStore {
    conn: SharedConn,
}

impl SqliteDocumentStore {
    /// Opens or creates a SQLite database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let conn = rusqlite::Connection::open(path.as_ref()).map_err(|e| StoreError::Connect {
            message: format!("{}: {e}", path.as_ref().display()),
        })?;
        Self::from_connection(conn)
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = rusqlite::Connection::open_in_memory()
            .map_err(|e| StoreError::connect(e.to_string()))?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: rusqlite::Connection) -> Result<Self, StoreError> {
        run_migrations(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(Some(conn))),
        })
    }

    /// Whether `shutdown` has already closed the connection.
    pub fn is_closed(&self) -> bool {
        self.conn.lock().map(|g| g.is_none()).unwrap_or(true)
    }
}

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
    fn collection(&self, database: &str, collection: &str) -> Option<Arc<dyn CollectionHandle>> {
        if !is_valid_database_name(database) || !is_valid_collection_name(collection) {
            return None;
        }
        if self.is_closed() {
            return None;
        }
        Some(Arc::new(SqliteCollection::new(
            self.conn.clone(),
            database,
            collection,
        )))
    }

    async fn shutdown(&self) {
        let taken = match self.conn.lock() {
            Ok(mut guard) => guard.take(),
            Err(_) => None,
        };
        if let Some(conn) = taken {
            if let Err((_, e)) = conn.close() {
                tracing::warn!(error = %e, "sqlite connection did not close cleanly");
            }
        }
    }
}

/// Opens one SQLite file per instance identifier.
///
/// With no data directory every instance gets its own in-memory database.
#[derive(Debug, Clone, Default)]
pub struct SqliteConnector {
    data_dir: Option<PathBuf>,
}

impl SqliteConnector {
    /// Stores instance files as `<data_dir>/<identifier>.db`.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: Some(data_dir.into()),
        }
    }

    pub fn in_memory() -> Self {
        Self { data_dir: None }
    }

    /// Path of the database file for `identifier`, if file-backed.
    pub fn database_path(&self, identifier: &str) -> Option<PathBuf> {
        self.data_dir
            .as_ref()
            .map(|dir| dir.join(format!("{identifier}.db")))
    }
}

#[async_trait]
impl StoreConnector for SqliteConnector {
    fn backend(&self) -> &'static str {
        "sqlite"
    }

    async fn connect(
        &self,
        credentials: &InstanceCredentials,
    ) -> Result<Arc<dyn DocumentStore>, StoreError> {
        let identifier = &credentials.identifier;
        if identifier.contains(['/', '\\']) || identifier.starts_with('.') {
            return Err(StoreError::connect(format!(
                "identifier '{identifier}' cannot be used as a file name"
            )));
        }

        let store = match self.database_path(identifier) {
            Some(path) => {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent).map_err(|e| StoreError::Connect {
                        message: format!("{}: {e}", parent.display()),
                    })?;
                }
                SqliteDocumentStore::open(&path)?
            }
            None => SqliteDocumentStore::open_in_memory()?,
        };
        Ok(Arc::new(store))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds(identifier: &str) -> InstanceCredentials {
        InstanceCredentials::new(identifier, "localhost", 27017, "dev", "a".repeat(24))
    }

    #[test]
    fn invalid_namespace_resolves_to_none() {
        let store = SqliteDocumentStore::open_in_memory().expect("open");
        assert!(store.collection("", "users").is_none());
        assert!(store.collection("user", "").is_none());
        assert!(store.collection("bad.db", "users").is_none());
        assert!(store.collection("user", "users").is_some());
    }

    #[tokio::test]
    async fn shutdown_is_idempotent_and_hides_collections() {
        let store = SqliteDocumentStore::open_in_memory().expect("open");
        store.shutdown().await;
        store.shutdown().await;
        assert!(store.is_closed());
        assert!(store.collection("user", "users").is_none());
    }

    #[tokio::test]
    async fn connector_writes_one_file_per_identifier() {
        let dir = tempfile::tempdir().expect("tempdir");
        let connector = SqliteConnector::new(dir.path().join("data"));
        let store = connector.connect(&creds("game-eu")).await.expect("connect");
        store.shutdown().await;
        assert!(dir.path().join("data").join("game-eu.db").exists());
    }

    #[tokio::test]
    async fn connector_rejects_path_like_identifiers() {
        let connector = SqliteConnector::new(std::env::temp_dir());
        assert!(connector.connect(&creds("../escape")).await.is_err());
    }
}
