//! Shared document types for the Prism recording pipeline.
//!
//! Every recorded game event is represented as a [`Document`]: an
//! insertion-ordered container mapping keys to scalar values or nested
//! documents. Nested values are addressed with a [`DataQuery`], a path of
//! key segments such as `original-block.block-state.block-type`.
//!
//! The canonical key names written by the record builder and read by the
//! filter gate and the persistence layer live in [`keys`], so the whole
//! workspace agrees on one document shape.
//!
//! No crate in the workspace defines its own document representation; the
//! builder, the queue and the store all pass [`Document`] values around.

mod clock;
mod document;
pub mod keys;
mod query;

pub use clock::created_timestamp;
pub use document::{Document, Value};
pub use query::DataQuery;

#[cfg(test)]
mod tests;
