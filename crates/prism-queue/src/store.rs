//! Durable storage for drained records.
//!
//! Writes go through [`insert_records`], which stores a whole batch in one
//! transaction. The event name, creation time and attribution are lifted
//! into indexed columns; the full document is kept as JSON.

use prism_db::DbPool;
use prism_types::{keys, Document, Value};
use rusqlite::{params, Connection};

use crate::error::QueueError;

/// Blocking batch writer used by the drain worker.
///
/// Called from `spawn_blocking`, never from an async context directly.
pub trait RecordStore: Send + Sync + 'static {
    /// Persists `documents`, returning how many were written.
    ///
    /// # Errors
    ///
    /// An error means nothing from the batch was committed.
    fn insert_batch(&self, documents: &[Document]) -> Result<usize, QueueError>;
}

/// [`RecordStore`] backed by the `records` table.
#[derive(Debug, Clone)]
pub struct SqliteRecordStore {
    pool: DbPool,
}

impl SqliteRecordStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl RecordStore for SqliteRecordStore {
    fn insert_batch(&self, documents: &[Document]) -> Result<usize, QueueError> {
        let conn = self.pool.get()?;
        insert_records(&conn, documents)
    }
}

/// A persisted record as read back from the `records` table.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRecord {
    pub id: i64,
    pub event_name: String,
    /// RFC 3339 creation time.
    pub created: String,
    pub player: Option<String>,
    pub cause: Option<String>,
    pub document: Document,
}

/// Writes a batch of records in a single transaction.
///
/// Documents without an `event-name` are skipped with a warning.
///
/// # Errors
///
/// Returns `QueueError::Database` on SQL failure or
/// `QueueError::Serialization` if a document cannot be serialised; the
/// transaction is rolled back in either case.
pub fn insert_records(conn: &Connection, documents: &[Document]) -> Result<usize, QueueError> {
    let tx = conn.unchecked_transaction()?;
    let mut written = 0;
    {
        let mut stmt = tx.prepare_cached(
            "INSERT INTO records (event_name, created, player, cause, document_json)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;

        for document in documents {
            let Some(event_name) = document.get_str(keys::EVENT_NAME) else {
                tracing::warn!("skipping record without event name");
                continue;
            };
            let created = created_text(document.get(keys::CREATED));
            let document_json = serde_json::to_string(document)?;

            stmt.execute(params![
                event_name,
                created,
                document.get_str(keys::PLAYER),
                document.get_str(keys::CAUSE),
                document_json,
            ])?;
            written += 1;
        }
    }
    tx.commit()?;
    Ok(written)
}

fn created_text(value: Option<&Value>) -> String {
    let Some(value) = value else {
        return String::new();
    };
    match value.as_timestamp() {
        Some(t) => t.to_rfc3339(),
        None => value.as_str().unwrap_or_default().to_string(),
    }
}

/// Returns the number of persisted records.
///
/// # Errors
///
/// Returns `QueueError::Database` on SQL failure.
pub fn count_records(conn: &Connection) -> Result<i64, QueueError> {
    Ok(conn.query_row("SELECT COUNT(*) FROM records", [], |row| row.get(0))?)
}

/// Returns up to `limit` records, newest first.
///
/// # Errors
///
/// Returns `QueueError::Database` on SQL failure or
/// `QueueError::Serialization` if a stored document is not valid JSON.
pub fn recent_records(conn: &Connection, limit: i64) -> Result<Vec<StoredRecord>, QueueError> {
    let mut stmt = conn.prepare(
        "SELECT id, event_name, created, player, cause, document_json
         FROM records
         ORDER BY id DESC
         LIMIT ?1",
    )?;
    let rows = stmt.query_map([limit], |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, Option<String>>(3)?,
            row.get::<_, Option<String>>(4)?,
            row.get::<_, String>(5)?,
        ))
    })?;

    let mut records = Vec::new();
    for row in rows {
        let (id, event_name, created, player, cause, document_json) = row?;
        records.push(StoredRecord {
            id,
            event_name,
            created,
            player,
            cause,
            document: serde_json::from_str(&document_json)?,
        });
    }
    Ok(records)
}
