//! Error types for record persistence.

/// Errors that can occur while persisting a batch of records.
#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    /// A database operation failed.
    #[error("record store database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// No pooled connection was available.
    #[error("record store pool error: {0}")]
    Pool(#[from] r2d2::Error),

    /// A document could not be serialised to JSON.
    #[error("record serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
