//! The recording queue: asynchronous hand-off from event handlers to storage.
//!
//! Event handlers run on the game's own threads and must never wait for the
//! database. Finished records are therefore pushed onto an unbounded
//! in-memory queue ([`RecordingQueue`], a [`RecordSink`](prism_records::RecordSink))
//! and a single background worker ([`run_drain_task`]) drains them in
//! batches into a [`RecordStore`].
//!
//! # Flow
//!
//! ```text
//! handler ─add─▶ RecordingQueue ──mpsc──▶ drain task ─batch─▶ RecordStore
//!   (sync, never blocks)                  (tokio)         (spawn_blocking)
//! ```
//!
//! # Failure policy
//!
//! - Overload: past `max_pending` undrained records, new records are dropped
//!   and a warning is logged once per overload episode.
//! - Storage errors: a batch is retried `max_retries` times with linear
//!   back-off, then dropped with an error log. Nothing is reported back to
//!   producers.
//!
//! # Usage
//!
//! ```rust,ignore
//! let (queue, receiver) = RecordingQueue::new(&settings);
//! let store = Arc::new(SqliteRecordStore::new(pool));
//! let drain = tokio::spawn(run_drain_task(receiver, store, settings));
//!
//! record.save(&filters, &queue);
//!
//! drop(queue);
//! let report = drain.await?;
//! ```

mod error;
mod queue;
mod store;
mod worker;

pub use error::QueueError;
pub use queue::{QueueReceiver, QueueSettings, QueueStats, RecordingQueue};
pub use store::{
    count_records, insert_records, recent_records, RecordStore, SqliteRecordStore, StoredRecord,
};
pub use worker::{run_drain_task, DrainReport};
