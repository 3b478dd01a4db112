//! The background task that drains the queue into storage.

use std::sync::Arc;
use std::time::Duration;

use prism_types::Document;
use tokio::time::{interval, sleep, MissedTickBehavior};

use crate::queue::{QueueReceiver, QueueSettings};
use crate::store::RecordStore;

/// Totals for one run of the drain task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainReport {
    /// Batches committed.
    pub batches: u64,
    /// Records committed.
    pub persisted: u64,
    /// Records abandoned after exhausting retries.
    pub dropped: u64,
}

/// Drains `receiver` into `store` until every producer handle is dropped.
///
/// A batch is written when it reaches `batch_size` records or when the
/// flush interval ticks with records waiting. Whatever is left when the
/// queue closes is flushed before returning.
pub async fn run_drain_task<S: RecordStore>(
    mut receiver: QueueReceiver,
    store: Arc<S>,
    settings: QueueSettings,
) -> DrainReport {
    let batch_size = settings.batch_size.max(1);
    let mut report = DrainReport::default();
    let mut batch: Vec<Document> = Vec::with_capacity(batch_size);

    let mut ticker = interval(settings.flush_interval.max(Duration::from_millis(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    tracing::info!(
        batch_size,
        flush_interval_ms = settings.flush_interval.as_millis() as u64,
        "starting recording queue drain task"
    );

    loop {
        let room = batch_size - batch.len();
        tokio::select! {
            received = receiver.recv_many(&mut batch, room) => {
                if received == 0 {
                    break;
                }
                if batch.len() >= batch_size {
                    flush(&store, &mut batch, &settings, &mut report).await;
                }
            }
            _ = ticker.tick() => {
                if !batch.is_empty() {
                    flush(&store, &mut batch, &settings, &mut report).await;
                }
            }
        }
    }

    if !batch.is_empty() {
        flush(&store, &mut batch, &settings, &mut report).await;
    }

    tracing::info!(
        batches = report.batches,
        persisted = report.persisted,
        dropped = report.dropped,
        "recording queue drained, drain task stopping"
    );
    report
}

async fn flush<S: RecordStore>(
    store: &Arc<S>,
    batch: &mut Vec<Document>,
    settings: &QueueSettings,
    report: &mut DrainReport,
) {
    let documents = Arc::new(std::mem::take(batch));
    let count = documents.len();
    let mut attempt: u32 = 0;

    loop {
        attempt += 1;
        let writer = Arc::clone(store);
        let pending = Arc::clone(&documents);
        let result = tokio::task::spawn_blocking(move || writer.insert_batch(&pending)).await;

        match result {
            Ok(Ok(written)) => {
                tracing::debug!(count, written, attempt, "persisted record batch");
                report.batches += 1;
                report.persisted += written as u64;
                return;
            }
            Ok(Err(e)) => {
                tracing::warn!(error = %e, count, attempt, "failed to persist record batch");
            }
            Err(e) => {
                tracing::error!(error = %e, count, attempt, "record batch writer panicked or was cancelled");
            }
        }

        if attempt > settings.max_retries {
            tracing::error!(
                count,
                attempts = attempt,
                "dropping record batch after exhausting retries"
            );
            report.dropped += count as u64;
            return;
        }

        sleep(retry_delay(settings.retry_backoff, attempt)).await;
    }
}

/// Longest pause between two write attempts.
const MAX_RETRY_DELAY: Duration = Duration::from_secs(60);

/// Linear back-off, capped at [`MAX_RETRY_DELAY`].
pub(crate) fn retry_delay(base: Duration, attempt: u32) -> Duration {
    base.checked_mul(attempt)
        .map_or(MAX_RETRY_DELAY, |delay| delay.min(MAX_RETRY_DELAY))
}
