//! Abstract document-store traits (ports).

use std::sync::Arc;

use async_trait::async_trait;

use docgate_types::{Document, Filter, InstanceCredentials};

use crate::error::StoreError;

/// One collection inside one database of a live store connection.
///
/// Handles are cheap to obtain and are not validated to exist: stores
/// create collections on first write.
#[async_trait]
pub trait CollectionHandle: Send + Sync {
    /// Returns the first document matching `filter`, in natural order.
    async fn find_one(&self, filter: &Filter) -> Result<Option<Document>, StoreError>;

    /// Returns every document of the collection in natural store order.
    async fn find_all(&self) -> Result<Vec<Document>, StoreError>;

    /// Inserts a new document. Fails with `DuplicateKey` if its `_id`
    /// is already present.
    async fn insert_one(&self, document: &Document) -> Result<(), StoreError>;

    /// Replaces the first document matching `filter`. Returns false when
    /// nothing matched.
    async fn replace_one(&self, filter: &Filter, document: &Document) -> Result<bool, StoreError>;

    /// Deletes the first document matching `filter`. Returns false when
    /// nothing matched.
    async fn delete_one(&self, filter: &Filter) -> Result<bool, StoreError>;
}

/// A live connection to one cluster.
///
/// Implementations must be safe to share across concurrent requests;
/// pooling is the driver's concern.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Resolves a collection handle, or `None` if the database or
    /// collection cannot be resolved. Never raises.
    fn collection(&self, database: &str, collection: &str) -> Option<Arc<dyn CollectionHandle>>;

    /// Closes the connection. Safe to call more than once.
    async fn shutdown(&self);
}

/// Opens store connections from validated credentials.
#[async_trait]
pub trait StoreConnector: Send + Sync {
    /// Short backend name for log lines.
    fn backend(&self) -> &'static str;

    /// Connects to the cluster described by `credentials`.
    async fn connect(
        &self,
        credentials: &InstanceCredentials,
    ) -> Result<Arc<dyn DocumentStore>, StoreError>;
}
