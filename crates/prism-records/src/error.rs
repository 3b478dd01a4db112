//! Error types for record construction.

/// Errors raised while building a record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    /// A required input was missing or unusable.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
