//! JSON-lines event feed.
//!
//! Each line is one [`FeedEvent`], tagged by `event`:
//!
//! ```json
//! {"event":"block-break","cause":[{"kind":"entity","type":"Zombie"}],"transaction":{...}}
//! {"event":"entity-death","cause":[{"kind":"player","uuid":"...","name":"Alex"}],"victim":{"type":"Pig"}}
//! {"event":"player-join","player":{"uuid":"...","name":"Alex"}}
//! ```
//!
//! Lines are built into records, run through the current filter snapshot
//! and handed to the sink. Bad lines are logged and skipped.

use prism_filter::{FilterHandle, FilterList};
use prism_records::{
    BlockTransaction, Cause, Entity, EventKind, Player, PrismRecord, RecordError, RecordSink,
    SaveOutcome,
};
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::mpsc;

/// One engine event as it arrives on the feed.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum FeedEvent {
    BlockBreak(BlockChange),
    BlockDecay(BlockChange),
    BlockGrow(BlockChange),
    BlockPlace(BlockChange),
    EntityDeath {
        cause: Cause,
        victim: Entity,
    },
    PlayerJoin {
        player: Player,
    },
    PlayerQuit {
        player: Player,
    },
}

/// Payload shared by the block events.
#[derive(Debug, Clone, Deserialize)]
pub struct BlockChange {
    pub cause: Cause,
    #[serde(default)]
    pub transaction: Option<BlockTransaction>,
}

impl FeedEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::BlockBreak(_) => EventKind::BlockBreak,
            Self::BlockDecay(_) => EventKind::BlockDecay,
            Self::BlockGrow(_) => EventKind::BlockGrow,
            Self::BlockPlace(_) => EventKind::BlockPlace,
            Self::EntityDeath { .. } => EventKind::EntityDeath,
            Self::PlayerJoin { .. } => EventKind::PlayerJoin,
            Self::PlayerQuit { .. } => EventKind::PlayerQuit,
        }
    }

    /// Builds the record this event describes.
    ///
    /// # Errors
    ///
    /// Returns `RecordError::InvalidArgument` for an empty cause chain, a
    /// block event without a transaction, or a transaction whose original
    /// block has no location.
    pub fn build(&self) -> Result<PrismRecord, RecordError> {
        match self {
            Self::BlockBreak(change) => {
                let builder = PrismRecord::create().source(&change.cause)?;
                builder.broke_block(change.transaction.as_ref())
            }
            Self::BlockDecay(change) => {
                let builder = PrismRecord::create().source(&change.cause)?;
                builder.decayed_block(change.transaction.as_ref())
            }
            Self::BlockGrow(change) => {
                let builder = PrismRecord::create().source(&change.cause)?;
                builder.grew_block(change.transaction.as_ref())
            }
            Self::BlockPlace(change) => {
                let builder = PrismRecord::create().source(&change.cause)?;
                builder.placed_block(change.transaction.as_ref())
            }
            Self::EntityDeath { cause, victim } => {
                Ok(PrismRecord::create().source(cause)?.killed(victim))
            }
            Self::PlayerJoin { player } => Ok(PrismRecord::create().player(player).joined()),
            Self::PlayerQuit { player } => Ok(PrismRecord::create().player(player).quit()),
        }
    }
}

/// Why a feed line produced no record.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("malformed feed line: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Record(#[from] RecordError),
}

/// Parses, builds and saves one feed line.
///
/// # Errors
///
/// Returns `FeedError` if the line is not a valid event or the record
/// cannot be built. Filtering is not an error.
pub fn ingest_line(
    line: &str,
    filters: &FilterList,
    sink: &(impl RecordSink + ?Sized),
) -> Result<SaveOutcome, FeedError> {
    let event: FeedEvent = serde_json::from_str(line)?;
    let record = event.build()?;
    Ok(record.save(filters, sink))
}

/// Totals for one run of [`ingest_lines`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedStats {
    pub queued: u64,
    pub filtered: u64,
    pub rejected: u64,
}

/// Ingests lines until the channel closes.
///
/// Blank lines are ignored. Each line is filtered against the snapshot
/// current when it arrives, so a reload takes effect on the next line.
pub async fn ingest_lines(
    mut lines: mpsc::Receiver<String>,
    filters: &FilterHandle,
    sink: &(impl RecordSink + ?Sized),
) -> FeedStats {
    let mut stats = FeedStats::default();
    let mut line_number: u64 = 0;

    while let Some(line) = lines.recv().await {
        line_number += 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match ingest_line(line, &filters.snapshot(), sink) {
            Ok(SaveOutcome::Queued) => stats.queued += 1,
            Ok(SaveOutcome::Filtered(_)) => stats.filtered += 1,
            Err(e) => {
                stats.rejected += 1;
                tracing::warn!(line = line_number, error = %e, "skipping feed line");
            }
        }
    }

    tracing::info!(
        queued = stats.queued,
        filtered = stats.filtered,
        rejected = stats.rejected,
        "event feed closed"
    );
    stats
}
