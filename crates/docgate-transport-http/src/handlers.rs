//! Turns repository results into envelopes.

use docgate_runtime::{DocumentRepository, RepositoryError};
use docgate_types::{Document, Filter, Outcome};
use serde_json::Value;
use tracing::{debug, error};

use crate::envelope::{Envelope, FetchedFrom};

/// Cause used when a request body is not a JSON object.
pub const BODY_NOT_OBJECT_CAUSE: &str = "The request body must be a JSON object.";

fn collection_missing(collection: &str) -> Envelope {
    Envelope::not_found(format!("The collection '{collection}' does not exist."))
}

fn document_missing(filter: &Filter) -> Envelope {
    Envelope::not_found(format!(
        "A document with identification '{filter}' does not exist."
    ))
}

fn already_exists(identifier: &str) -> Envelope {
    Envelope::bad_request(format!(
        "A document with identifier '{identifier}' already exist."
    ))
}

fn repository_failure(e: RepositoryError) -> Envelope {
    if e.is_validation() {
        Envelope::bad_request(e.to_string())
    } else {
        error!(error = %e, "document store failure");
        Envelope::internal()
    }
}

fn traced<T>(operation: &'static str, outcome: Outcome<T>) -> Outcome<T> {
    debug!(operation, outcome = outcome.label(), "repository outcome");
    outcome
}

/// Parses a request body into a document.
///
/// # Errors
///
/// Returns a 400 envelope if `body` is not a JSON object.
pub fn body_document(body: Value) -> Result<Document, Envelope> {
    Document::try_from(body).map_err(|_| Envelope::bad_request(BODY_NOT_OBJECT_CAUSE))
}

/// Envelope mapping for one repository.
#[derive(Debug, Clone)]
pub struct DocumentHandlers {
    repository: DocumentRepository,
}

impl DocumentHandlers {
    pub fn new(repository: DocumentRepository) -> Self {
        Self { repository }
    }

    /// 201 with the stored document, or 400/404.
    pub async fn create(
        &self,
        database: &str,
        collection: &str,
        identifier: &str,
        payload: &Document,
    ) -> Envelope {
        match self
            .repository
            .create(database, collection, identifier, payload)
            .await
            .map(|o| traced("create", o))
        {
            Ok(Outcome::Success(document)) => Envelope::created(document),
            Ok(Outcome::AlreadyExists) => already_exists(identifier),
            Ok(Outcome::NoSuchCollection) => collection_missing(collection),
            Ok(Outcome::NoSuchDocument) => Envelope::not_found(format!(
                "A document with identifier '{identifier}' does not exist."
            )),
            Err(e) => repository_failure(e),
        }
    }

    /// 200 with the merged document, or 400/404.
    pub async fn update(
        &self,
        database: &str,
        collection: &str,
        filter: &Filter,
        changes: &Document,
    ) -> Envelope {
        match self
            .repository
            .update(database, collection, filter, changes)
            .await
            .map(|o| traced("update", o))
        {
            Ok(Outcome::Success(document)) => Envelope::ok(document),
            Ok(Outcome::NoSuchDocument) => document_missing(filter),
            Ok(Outcome::NoSuchCollection) => collection_missing(collection),
            Ok(Outcome::AlreadyExists) => already_exists(&filter.to_string()),
            Err(e) => repository_failure(e),
        }
    }

    /// 202 with the deleted document, or 404.
    pub async fn delete(&self, database: &str, collection: &str, filter: &Filter) -> Envelope {
        match self
            .repository
            .delete(database, collection, filter)
            .await
            .map(|o| traced("delete", o))
        {
            Ok(Outcome::Success(previous)) => Envelope::accepted(previous),
            Ok(Outcome::NoSuchDocument) => document_missing(filter),
            Ok(Outcome::NoSuchCollection) => collection_missing(collection),
            Ok(Outcome::AlreadyExists) => already_exists(&filter.to_string()),
            Err(e) => repository_failure(e),
        }
    }

    /// 200 with the document and its origin, or 404.
    pub async fn get(&self, database: &str, collection: &str, filter: &Filter) -> Envelope {
        match self.repository.get(database, collection, filter).await {
            Ok(Some(document)) => {
                Envelope::fetched(document, FetchedFrom::new(database, collection))
            }
            Ok(None) => {
                let identifier = filter
                    .as_id()
                    .map(str::to_string)
                    .unwrap_or_else(|| filter.to_string());
                Envelope::not_found(format!(
                    "The JSON data document with identifier '{identifier}' was not found in the collection '{collection}'."
                ))
            }
            Err(e) => repository_failure(e),
        }
    }

    /// 200 with every document, or 404 when the collection is empty or
    /// cannot be resolved.
    pub async fn get_all(&self, database: &str, collection: &str) -> Envelope {
        match self.repository.get_all(database, collection).await {
            Ok(Some(documents)) if !documents.is_empty() => {
                let list: Vec<Value> = documents.into_iter().map(Value::from).collect();
                Envelope::fetched(list, FetchedFrom::new(database, collection))
            }
            Ok(_) => Envelope::not_found(format!(
                "The collection with identifier '{collection}' was not found."
            )),
            Err(e) => repository_failure(e),
        }
    }
}
