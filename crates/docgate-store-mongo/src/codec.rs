//! JSON <-> BSON conversion for documents and filters.

use docgate_store::StoreError;
use docgate_types::{Document, Filter};
use mongodb::bson::{self, Bson};

pub(crate) fn to_bson(document: &Document) -> Result<bson::Document, StoreError> {
    bson::to_document(document.as_map()).map_err(|e| StoreError::InvalidDocument {
        message: format!("encode document: {e}"),
    })
}

pub(crate) fn filter_to_bson(filter: &Filter) -> Result<bson::Document, StoreError> {
    bson::to_document(filter.as_map()).map_err(|e| StoreError::InvalidDocument {
        message: format!("encode filter: {e}"),
    })
}

/// Decodes a stored document as relaxed extended JSON.
pub(crate) fn from_bson(document: bson::Document) -> Result<Document, StoreError> {
    let value = Bson::Document(document).into_relaxed_extjson();
    Document::try_from(value).map_err(|other| StoreError::InvalidDocument {
        message: format!("stored value is not an object: {other}"),
    })
}
