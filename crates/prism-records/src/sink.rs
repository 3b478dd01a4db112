//! The hand-off point between finished records and persistence.

use std::sync::Arc;

use prism_types::Document;

/// Accepts finished record documents for eventual persistence.
///
/// Implementations must not block and must not fail back to the caller:
/// the thread delivering game events never waits on storage.
pub trait RecordSink: Send + Sync {
    fn add(&self, document: Document);
}

impl<T: RecordSink + ?Sized> RecordSink for Arc<T> {
    fn add(&self, document: Document) {
        (**self).add(document);
    }
}

impl<T: RecordSink + ?Sized> RecordSink for &T {
    fn add(&self, document: Document) {
        (**self).add(document);
    }
}
