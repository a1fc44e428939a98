//! `CollectionHandle` implementation over a driver collection.

use async_trait::async_trait;
use docgate_store::{CollectionHandle, StoreError};
use docgate_types::{Document, Filter};
use futures::TryStreamExt;
use mongodb::bson::{self, doc};
use mongodb::error::{ErrorKind, WriteFailure};

use crate::codec::{filter_to_bson, from_bson, to_bson};

/// Server error code for a unique index violation.
const DUPLICATE_KEY_CODE: i32 = 11000;

fn map_driver_err(e: mongodb::error::Error) -> StoreError {
    StoreError::storage(e.to_string())
}

fn is_duplicate_key(e: &mongodb::error::Error) -> bool {
    matches!(
        *e.kind,
        ErrorKind::Write(WriteFailure::WriteError(ref we)) if we.code == DUPLICATE_KEY_CODE
    )
}

/// A driver collection of raw BSON documents.
pub struct MongoCollection {
    inner: mongodb::Collection<bson::Document>,
}

impl MongoCollection {
    pub(crate) fn new(inner: mongodb::Collection<bson::Document>) -> Self {
        Self { inner }
    }

    /// Fully qualified `database.collection` name.
    pub fn namespace(&self) -> String {
        self.inner.namespace().to_string()
    }
}

#[async_trait]
impl CollectionHandle for MongoCollection {
    async fn find_one(&self, filter: &Filter) -> Result<Option<Document>, StoreError> {
        let found = self
            .inner
            .find_one(filter_to_bson(filter)?)
            .await
            .map_err(map_driver_err)?;
        found.map(from_bson).transpose()
    }

    async fn find_all(&self) -> Result<Vec<Document>, StoreError> {
        let cursor = self.inner.find(doc! {}).await.map_err(map_driver_err)?;
        let raw: Vec<bson::Document> = cursor.try_collect().await.map_err(map_driver_err)?;
        raw.into_iter().map(from_bson).collect()
    }

    async fn insert_one(&self, document: &Document) -> Result<(), StoreError> {
        let encoded = to_bson(document)?;
        self.inner.insert_one(encoded).await.map_err(|e| {
            if is_duplicate_key(&e) {
                StoreError::DuplicateKey {
                    id: document.id().unwrap_or_default().to_string(),
                }
            } else {
                map_driver_err(e)
            }
        })?;
        Ok(())
    }

    async fn replace_one(&self, filter: &Filter, document: &Document) -> Result<bool, StoreError> {
        let result = self
            .inner
            .replace_one(filter_to_bson(filter)?, to_bson(document)?)
            .await
            .map_err(map_driver_err)?;
        Ok(result.matched_count > 0)
    }

    async fn delete_one(&self, filter: &Filter) -> Result<bool, StoreError> {
        let result = self
            .inner
            .delete_one(filter_to_bson(filter)?)
            .await
            .map_err(map_driver_err)?;
        Ok(result.deleted_count > 0)
    }
}
