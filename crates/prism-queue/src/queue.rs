//! Non-blocking intake for finished records.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use prism_records::RecordSink;
use prism_types::Document;
use tokio::sync::mpsc;

/// Tunables for the queue and its drain worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueSettings {
    /// Largest number of records written in one batch.
    pub batch_size: usize,

    /// Partial batches are flushed at least this often.
    pub flush_interval: Duration,

    /// Undrained records allowed before new ones are dropped (0 = unlimited).
    pub max_pending: usize,

    /// Extra attempts for a batch whose write failed.
    pub max_retries: u32,

    /// Base delay between write attempts; multiplied by the attempt number.
    pub retry_backoff: Duration,
}

impl Default for QueueSettings {
    fn default() -> Self {
        Self {
            batch_size: 500,
            flush_interval: Duration::from_secs(1),
            max_pending: 100_000,
            max_retries: 3,
            retry_backoff: Duration::from_millis(250),
        }
    }
}

/// Point-in-time queue counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueStats {
    /// Accepted but not yet taken by the drain worker.
    pub pending: usize,
    /// Accepted since creation.
    pub accepted: u64,
    /// Refused since creation (overload or closed queue).
    pub dropped: u64,
}

#[derive(Debug)]
struct Counters {
    max_pending: usize,
    pending: AtomicUsize,
    accepted: AtomicU64,
    dropped: AtomicU64,
    overloaded: AtomicBool,
}

impl Counters {
    fn drop_one(&self) {
        self.dropped.fetch_add(1, Ordering::Relaxed);
    }

    fn drained(&self, count: usize) {
        let before = self.pending.fetch_sub(count, Ordering::AcqRel);
        let now = before.saturating_sub(count);
        if now < self.max_pending && self.overloaded.swap(false, Ordering::AcqRel) {
            tracing::info!(pending = now, "recording queue recovered from overload");
        }
    }
}

/// Producer handle. Cheap to clone; every clone feeds the same worker.
///
/// The drain worker stops once every handle has been dropped.
#[derive(Debug, Clone)]
pub struct RecordingQueue {
    tx: mpsc::UnboundedSender<Document>,
    counters: Arc<Counters>,
}

/// Consumer half, owned by the drain worker.
#[derive(Debug)]
pub struct QueueReceiver {
    rx: mpsc::UnboundedReceiver<Document>,
    counters: Arc<Counters>,
}

impl RecordingQueue {
    pub fn new(settings: &QueueSettings) -> (Self, QueueReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        let counters = Arc::new(Counters {
            max_pending: settings.max_pending,
            pending: AtomicUsize::new(0),
            accepted: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
            overloaded: AtomicBool::new(false),
        });
        let receiver = QueueReceiver {
            rx,
            counters: Arc::clone(&counters),
        };
        (Self { tx, counters }, receiver)
    }

    /// Appends a record without blocking. Returns `false` if it was dropped.
    pub fn push(&self, document: Document) -> bool {
        let counters = &self.counters;
        let pending = counters.pending.fetch_add(1, Ordering::AcqRel);

        if counters.max_pending > 0 && pending >= counters.max_pending {
            counters.pending.fetch_sub(1, Ordering::AcqRel);
            counters.drop_one();
            if !counters.overloaded.swap(true, Ordering::AcqRel) {
                tracing::warn!(
                    max_pending = counters.max_pending,
                    "recording queue full, dropping records until it drains"
                );
            }
            return false;
        }

        if self.tx.send(document).is_err() {
            counters.pending.fetch_sub(1, Ordering::AcqRel);
            counters.drop_one();
            tracing::warn!("recording queue closed, dropping record");
            return false;
        }

        counters.accepted.fetch_add(1, Ordering::Relaxed);
        true
    }

    pub fn stats(&self) -> QueueStats {
        QueueStats {
            pending: self.counters.pending.load(Ordering::Acquire),
            accepted: self.counters.accepted.load(Ordering::Relaxed),
            dropped: self.counters.dropped.load(Ordering::Relaxed),
        }
    }
}

impl RecordSink for RecordingQueue {
    fn add(&self, document: Document) {
        self.push(document);
    }
}

impl QueueReceiver {
    /// Waits for at least one record and moves up to `limit` into `buffer`.
    ///
    /// Returns 0 once every producer handle is gone and the queue is empty.
    pub async fn recv_many(&mut self, buffer: &mut Vec<Document>, limit: usize) -> usize {
        let received = self.rx.recv_many(buffer, limit.max(1)).await;
        if received > 0 {
            self.counters.drained(received);
        }
        received
    }
}
