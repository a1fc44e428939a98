//! `CollectionHandle` implementation over the shared documents table.

use async_trait::async_trait;
use docgate_store::{CollectionHandle, StoreError};
use docgate_types::{Document, Filter};
use rusqlite::{params, Connection};

use crate::row_mapping::{row_to_document, OptionalExt};
use crate::store::{lock_open, SharedConn};

/// Maps a `rusqlite::Error` to a `StoreError::Storage`.
fn map_sqlite_err(e: rusqlite::Error) -> StoreError {
    StoreError::storage(e.to_string())
}

/// A `(database, collection)` namespace inside a SQLite store.
pub struct SqliteCollection {
    conn: SharedConn,
    database: String,
    collection: String,
}

impl SqliteCollection {
    pub(crate) fn new(conn: SharedConn, database: &str, collection: &str) -> Self {
        Self {
            conn,
            database: database.to_string(),
            collection: collection.to_string(),
        }
    }

    /// Finds the first `(seq, document)` matching `filter`.
    ///
    /// Pure `_id` filters use the unique index; anything else scans the
    /// collection in insertion order.
    fn find_first(
        &self,
        conn: &Connection,
        filter: &Filter,
    ) -> Result<Option<(i64, Document)>, StoreError> {
        if let Some(id) = filter.as_id() {
            let mut stmt = conn
                .prepare(
                    "SELECT seq, body FROM documents \
                     WHERE database = ?1 AND collection = ?2 AND doc_id = ?3",
                )
                .map_err(map_sqlite_err)?;
            return stmt
                .query_row(params![self.database, self.collection, id], row_to_document)
                .optional()
                .map_err(map_sqlite_err);
        }

        Ok(self
            .scan(conn)?
            .into_iter()
            .find(|(_, doc)| filter.matches(doc)))
    }

    fn scan(&self, conn: &Connection) -> Result<Vec<(i64, Document)>, StoreError> {
        let mut stmt = conn
            .prepare(
                "SELECT seq, body FROM documents \
                 WHERE database = ?1 AND collection = ?2 ORDER BY seq",
            )
            .map_err(map_sqlite_err)?;
        let rows = stmt
            .query_map(params![self.database, self.collection], row_to_document)
            .map_err(map_sqlite_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(map_sqlite_err)?;
        Ok(rows)
    }
}

fn document_id(document: &Document) -> Result<&str, StoreError> {
    document.id().ok_or_else(|| StoreError::InvalidDocument {
        message: "document has no string '_id' field".into(),
    })
}

fn encode(document: &Document) -> Result<String, StoreError> {
    serde_json::to_string(document).map_err(|e| StoreError::InvalidDocument {
        message: format!("serialize document: {e}"),
    })
}

#[async_trait]
impl CollectionHandle for SqliteCollection {
    async fn find_one(&self, filter: &Filter) -> Result<Option<Document>, StoreError> {
        let guard = lock_open(&self.conn)?;
        let conn = guard.as_ref().ok_or_else(|| StoreError::storage("connection is closed"))?;
        Ok(self.find_first(conn, filter)?.map(|(_, doc)| doc))
    }

    async fn find_all(&self) -> Result<Vec<Document>, StoreError> {
        let guard = lock_open(&self.conn)?;
        let conn = guard.as_ref().ok_or_else(|| StoreError::storage("connection is closed"))?;
        Ok(self.scan(conn)?.into_iter().map(|(_, doc)| doc).collect())
    }

    async fn insert_one(&self, document: &Document) -> Result<(), StoreError> {
        let id = document_id(document)?;
        let body = encode(document)?;
        let guard = lock_open(&self.conn)?;
        let conn = guard.as_ref().ok_or_else(|| StoreError::storage("connection is closed"))?;
        conn.execute(
            "INSERT INTO documents (database, collection, doc_id, body) VALUES (?1, ?2, ?3, ?4)",
            params![self.database, self.collection, id, body],
        )
        .map_err(|e| {
            if let rusqlite::Error::SqliteFailure(ref err, _) = e {
                if err.code == rusqlite::ErrorCode::ConstraintViolation {
                    return StoreError::DuplicateKey { id: id.to_string() };
                }
            }
            map_sqlite_err(e)
        })?;
        Ok(())
    }

    async fn replace_one(&self, filter: &Filter, document: &Document) -> Result<bool, StoreError> {
        let id = document_id(document)?;
        let body = encode(document)?;
        let guard = lock_open(&self.conn)?;
        let conn = guard.as_ref().ok_or_else(|| StoreError::storage("connection is closed"))?;
        let Some((seq, _)) = self.find_first(conn, filter)? else {
            return Ok(false);
        };
        let affected = conn
            .execute(
                "UPDATE documents SET doc_id = ?2, body = ?3 WHERE seq = ?1",
                params![seq, id, body],
            )
            .map_err(map_sqlite_err)?;
        Ok(affected > 0)
    }

    async fn delete_one(&self, filter: &Filter) -> Result<bool, StoreError> {
        let guard = lock_open(&self.conn)?;
        let conn = guard.as_ref().ok_or_else(|| StoreError::storage("connection is closed"))?;
        let Some((seq, _)) = self.find_first(conn, filter)? else {
            return Ok(false);
        };
        let affected = conn
            .execute("DELETE FROM documents WHERE seq = ?1", params![seq])
            .map_err(map_sqlite_err)?;
        Ok(affected > 0)
    }
}
