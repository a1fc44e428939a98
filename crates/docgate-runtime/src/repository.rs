//! Generic CRUD over one logical instance.
//!
//! Every operation first resolves `(database, collection)` through the
//! registry. An absent instance or an unresolvable collection yields
//! `Outcome::NoSuchCollection` with no further side effect.
//!
//! Existence checks and writes are separate round-trips with no
//! compare-and-swap. Two concurrent updates may interleave; two concurrent
//! creates of the same `_id` are caught by the store's unique key and the
//! loser sees `Outcome::AlreadyExists`.

use std::sync::Arc;

use docgate_store::{CollectionHandle, StoreError};
use docgate_types::{Document, Filter, InstanceType, Outcome};
use tracing::{debug, warn};

use crate::error::RepositoryError;
use crate::registry::InstanceRegistry;

/// Stateless document operations bound to one `InstanceType`.
#[derive(Debug, Clone)]
pub struct DocumentRepository {
    instance_type: InstanceType,
    registry: Arc<InstanceRegistry>,
}

impl DocumentRepository {
    pub fn new(instance_type: InstanceType, registry: Arc<InstanceRegistry>) -> Self {
        Self {
            instance_type,
            registry,
        }
    }

    pub fn instance_type(&self) -> InstanceType {
        self.instance_type
    }

    fn resolve(&self, database: &str, collection: &str) -> Option<Arc<dyn CollectionHandle>> {
        let Some(instance) = self.registry.get(self.instance_type) else {
            warn!(instance = %self.instance_type, "no live instance for repository");
            return None;
        };
        let handle = instance.collection(database, collection);
        if handle.is_none() {
            debug!(database, collection, "collection could not be resolved");
        }
        handle
    }

    /// Inserts `payload` under `identifier`.
    ///
    /// `payload` must carry an `_id` equal to `identifier`. On success the
    /// stored document is returned.
    ///
    /// # Errors
    ///
    /// Input-validation variants of `RepositoryError` are returned before
    /// any store access; `RepositoryError::Store` if the driver fails.
    #[tracing::instrument(skip(self, payload), fields(instance = %self.instance_type))]
    pub async fn create(
        &self,
        database: &str,
        collection: &str,
        identifier: &str,
        payload: &Document,
    ) -> Result<Outcome<Document>, RepositoryError> {
        if identifier.is_empty() {
            return Err(RepositoryError::EmptyIdentifier);
        }
        if !payload.contains_id() {
            return Err(RepositoryError::MissingIdentifierField);
        }
        if payload.id() != Some(identifier) {
            return Err(RepositoryError::IdentifierMismatch);
        }

        let Some(handle) = self.resolve(database, collection) else {
            return Ok(Outcome::NoSuchCollection);
        };

        if handle.find_one(&Filter::by_id(identifier)).await?.is_some() {
            return Ok(Outcome::AlreadyExists);
        }

        let document = Document::with_id(identifier, payload);
        match handle.insert_one(&document).await {
            Ok(()) => {
                debug!("document created");
                Ok(Outcome::Success(document))
            }
            Err(StoreError::DuplicateKey { .. }) => Ok(Outcome::AlreadyExists),
            Err(e) => Err(e.into()),
        }
    }

    /// Merges `changes` into the document matching `filter` and replaces it.
    ///
    /// Returns the merged document.
    ///
    /// # Errors
    ///
    /// `RepositoryError::IdentifierImmutable` if `changes` contains `_id`;
    /// `RepositoryError::Store` if the driver fails.
    #[tracing::instrument(skip(self, changes), fields(instance = %self.instance_type, filter = %filter))]
    pub async fn update(
        &self,
        database: &str,
        collection: &str,
        filter: &Filter,
        changes: &Document,
    ) -> Result<Outcome<Document>, RepositoryError> {
        if changes.contains_id() {
            return Err(RepositoryError::IdentifierImmutable);
        }

        let Some(handle) = self.resolve(database, collection) else {
            return Ok(Outcome::NoSuchCollection);
        };

        let Some(mut current) = handle.find_one(filter).await? else {
            return Ok(Outcome::NoSuchDocument);
        };
        current.merge(changes);

        if !handle.replace_one(filter, &current).await? {
            // Deleted between the read and the replace.
            return Ok(Outcome::NoSuchDocument);
        }
        debug!("document updated");
        Ok(Outcome::Success(current))
    }

    /// Deletes the document matching `filter`, returning its last state.
    ///
    /// # Errors
    ///
    /// `RepositoryError::Store` if the driver fails.
    #[tracing::instrument(skip(self), fields(instance = %self.instance_type, filter = %filter))]
    pub async fn delete(
        &self,
        database: &str,
        collection: &str,
        filter: &Filter,
    ) -> Result<Outcome<Document>, RepositoryError> {
        let Some(handle) = self.resolve(database, collection) else {
            return Ok(Outcome::NoSuchCollection);
        };

        let Some(previous) = handle.find_one(filter).await? else {
            return Ok(Outcome::NoSuchDocument);
        };
        if !handle.delete_one(filter).await? {
            return Ok(Outcome::NoSuchDocument);
        }
        debug!("document deleted");
        Ok(Outcome::Success(previous))
    }

    /// Reads the first document matching `filter`.
    ///
    /// `None` covers both an unresolvable collection and no match.
    ///
    /// # Errors
    ///
    /// `RepositoryError::Store` if the driver fails.
    #[tracing::instrument(skip(self), fields(instance = %self.instance_type, filter = %filter))]
    pub async fn get(
        &self,
        database: &str,
        collection: &str,
        filter: &Filter,
    ) -> Result<Option<Document>, RepositoryError> {
        let Some(handle) = self.resolve(database, collection) else {
            return Ok(None);
        };
        Ok(handle.find_one(filter).await?)
    }

    /// Reads every document of the collection in natural store order.
    ///
    /// `None` if the collection cannot be resolved.
    ///
    /// # Errors
    ///
    /// `RepositoryError::Store` if the driver fails.
    #[tracing::instrument(skip(self), fields(instance = %self.instance_type))]
    pub async fn get_all(
        &self,
        database: &str,
        collection: &str,
    ) -> Result<Option<Vec<Document>>, RepositoryError> {
        let Some(handle) = self.resolve(database, collection) else {
            return Ok(None);
        };
        Ok(Some(handle.find_all().await?))
    }
}
