//! Row-to-domain mapping for stored documents.

use docgate_types::Document;

/// Maps a `(seq, body)` row to its sequence number and parsed document.
pub(crate) fn row_to_document(row: &rusqlite::Row<'_>) -> rusqlite::Result<(i64, Document)> {
    let seq: i64 = row.get(0)?;
    let body: String = row.get(1)?;

    // A corrupt body should surface as a store error, not a silent skip.
    let document: Document = serde_json::from_str(&body).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok((seq, document))
}

/// Extension trait to convert `QueryReturnedNoRows` into `Ok(None)`.
pub(crate) trait OptionalExt<T> {
    fn optional(self) -> rusqlite::Result<Option<T>>;
}

impl<T> OptionalExt<T> for rusqlite::Result<T> {
    fn optional(self) -> rusqlite::Result<Option<T>> {
        match self {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
