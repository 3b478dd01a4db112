//! Staged construction of event records.
//!
//! A record is built in three steps, each a distinct type:
//!
//! 1. [`RecordBuilder`] binds the source (`source`, `player` or `entity`).
//! 2. [`EventBuilder`] picks what happened and normalises its payload.
//! 3. [`PrismRecord`] is stamped, filtered and handed to a [`RecordSink`]
//!    by [`PrismRecord::save`], which consumes it.
//!
//! ```ignore
//! PrismRecord::create()
//!     .player(&player)
//!     .broke_block(Some(&transaction))?
//!     .save(&filters, &queue);
//! ```
//!
//! Player-only events are offered only when the source is known to be a
//! player:
//!
//! ```compile_fail
//! use prism_records::{Entity, PrismRecord};
//! let entity = Entity { entity_type: "Zombie".to_string() };
//! let _ = PrismRecord::create().entity(&entity).joined();
//! ```
//!
//! A source without an event cannot be saved:
//!
//! ```compile_fail
//! use prism_filter::FilterList;
//! use prism_records::{Entity, PrismRecord, RecordSink};
//! use prism_types::Document;
//! struct Discard;
//! impl RecordSink for Discard { fn add(&self, _: Document) {} }
//! let entity = Entity { entity_type: "Zombie".to_string() };
//! PrismRecord::create().entity(&entity).save(&FilterList::permissive(), &Discard);
//! ```
//!
//! A record can be saved only once:
//!
//! ```compile_fail
//! use prism_filter::FilterList;
//! use prism_records::{Entity, PrismRecord, RecordSink};
//! use prism_types::Document;
//! struct Discard;
//! impl RecordSink for Discard { fn add(&self, _: Document) {} }
//! let zombie = Entity { entity_type: "Zombie".to_string() };
//! let cow = Entity { entity_type: "Cow".to_string() };
//! let record = PrismRecord::create().entity(&zombie).killed(&cow);
//! record.save(&FilterList::permissive(), &Discard);
//! record.save(&FilterList::permissive(), &Discard);
//! ```

use std::fmt;
use std::marker::PhantomData;

use prism_filter::FilterList;
use prism_types::{created_timestamp, keys, DataQuery, Document};

use crate::engine::{BlockSnapshot, BlockTransaction, Cause, Entity, Player};
use crate::error::RecordError;
use crate::event::EventKind;
use crate::sink::RecordSink;
use crate::source::Source;

/// Stage marker: the source may be anything.
#[derive(Debug)]
pub struct AnySource;

/// Stage marker: the source is a player, so player-only events are offered.
#[derive(Debug)]
pub struct PlayerSource;

/// Entry point: binds who or what caused the event.
#[derive(Debug, Default)]
pub struct RecordBuilder {
    _private: (),
}

impl RecordBuilder {
    /// Binds the source resolved from a cause chain.
    ///
    /// # Errors
    ///
    /// Returns `RecordError::InvalidArgument` if the chain is empty.
    pub fn source(self, cause: &Cause) -> Result<EventBuilder<AnySource>, RecordError> {
        Ok(EventBuilder::new(Source::resolve(cause)?))
    }

    /// Binds a player directly.
    pub fn player(self, player: &Player) -> EventBuilder<PlayerSource> {
        EventBuilder::new(Source::from(player))
    }

    /// Binds a non-player entity directly.
    pub fn entity(self, entity: &Entity) -> EventBuilder<AnySource> {
        EventBuilder::new(Source::from(entity))
    }
}

/// Second stage: chooses the event kind and writes its payload.
#[derive(Debug)]
pub struct EventBuilder<S = AnySource> {
    source: Source,
    data: Document,
    _stage: PhantomData<S>,
}

impl<S> EventBuilder<S> {
    fn new(source: Source) -> Self {
        Self {
            source,
            data: Document::new(),
            _stage: PhantomData,
        }
    }

    /// A block was broken.
    ///
    /// # Errors
    ///
    /// Returns `RecordError::InvalidArgument` if `transaction` is `None` or
    /// its original block has no resolved location.
    pub fn broke_block(
        self,
        transaction: Option<&BlockTransaction>,
    ) -> Result<PrismRecord, RecordError> {
        self.block_change(EventKind::BlockBreak, transaction)
    }

    /// A block decayed (leaves, for instance).
    ///
    /// # Errors
    ///
    /// See [`EventBuilder::broke_block`].
    pub fn decayed_block(
        self,
        transaction: Option<&BlockTransaction>,
    ) -> Result<PrismRecord, RecordError> {
        self.block_change(EventKind::BlockDecay, transaction)
    }

    /// A block grew (crops, saplings).
    ///
    /// # Errors
    ///
    /// See [`EventBuilder::broke_block`].
    pub fn grew_block(
        self,
        transaction: Option<&BlockTransaction>,
    ) -> Result<PrismRecord, RecordError> {
        self.block_change(EventKind::BlockGrow, transaction)
    }

    /// A block was placed.
    ///
    /// # Errors
    ///
    /// See [`EventBuilder::broke_block`].
    pub fn placed_block(
        self,
        transaction: Option<&BlockTransaction>,
    ) -> Result<PrismRecord, RecordError> {
        self.block_change(EventKind::BlockPlace, transaction)
    }

    /// The source killed `victim`. The victim's type is kept under `target`.
    pub fn killed(mut self, victim: &Entity) -> PrismRecord {
        self.data.set(keys::TARGET, victim.entity_type.as_str());
        self.finish(EventKind::EntityDeath)
    }

    fn block_change(
        mut self,
        kind: EventKind,
        transaction: Option<&BlockTransaction>,
    ) -> Result<PrismRecord, RecordError> {
        let transaction = transaction.ok_or_else(|| {
            RecordError::InvalidArgument(format!("{kind} requires a block transaction"))
        })?;
        write_block_transaction(&mut self.data, transaction)?;
        Ok(self.finish(kind))
    }

    fn finish(self, event: EventKind) -> PrismRecord {
        PrismRecord {
            source: self.source,
            event,
            data: self.data,
        }
    }
}

impl EventBuilder<PlayerSource> {
    /// The player joined the server.
    pub fn joined(self) -> PrismRecord {
        self.finish(EventKind::PlayerJoin)
    }

    /// The player left the server.
    pub fn quit(self) -> PrismRecord {
        self.finish(EventKind::PlayerQuit)
    }
}

/// Writes location and both block snapshots, dropping fields that the
/// shared `location` entry already carries.
fn write_block_transaction(
    data: &mut Document,
    transaction: &BlockTransaction,
) -> Result<(), RecordError> {
    let location = transaction.original.location().ok_or_else(|| {
        RecordError::InvalidArgument("original block has no resolved location".to_string())
    })?;

    let mut location = location.to_document();
    location.remove(keys::BLOCK_TYPE);
    location.remove(keys::WORLD_NAME);
    location.remove(keys::CONTENT_VERSION);
    data.set(keys::LOCATION, location);

    data.set(keys::ORIGINAL_BLOCK, format_block(&transaction.original));
    data.set(keys::REPLACEMENT_BLOCK, format_block(&transaction.replacement));
    Ok(())
}

fn format_block(snapshot: &BlockSnapshot) -> Document {
    let mut block = snapshot.to_document();
    block.remove(keys::WORLD_UUID);
    block.remove(keys::POSITION);

    let unsafe_data = DataQuery::of([keys::UNSAFE_DATA]);
    block.remove(unsafe_data.then(keys::X));
    block.remove(unsafe_data.then(keys::Y));
    block.remove(unsafe_data.then(keys::Z));
    block
}

/// Why a record was dropped by the filter gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterReason {
    Source,
    OriginalBlock(String),
    ReplacementBlock(String),
}

impl fmt::Display for FilterReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source => f.write_str("source"),
            Self::OriginalBlock(t) => write!(f, "original block {t}"),
            Self::ReplacementBlock(t) => write!(f, "replacement block {t}"),
        }
    }
}

/// What [`PrismRecord::save`] did with the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Handed to the sink.
    Queued,
    /// Silently dropped by the filter gate.
    Filtered(FilterReason),
}

/// A finished, save-ready record.
#[derive(Debug)]
pub struct PrismRecord {
    source: Source,
    event: EventKind,
    data: Document,
}

impl PrismRecord {
    /// Starts a new record.
    pub fn create() -> RecordBuilder {
        RecordBuilder::default()
    }

    pub fn event(&self) -> EventKind {
        self.event
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    /// The payload written so far, before stamping.
    pub fn data(&self) -> &Document {
        &self.data
    }

    /// Stamps the record, runs it through `filters` and, unless rejected,
    /// hands it to `sink`.
    ///
    /// Rejection is not an error: the record is dropped and the outcome
    /// says why.
    pub fn save(self, filters: &FilterList, sink: &(impl RecordSink + ?Sized)) -> SaveOutcome {
        let Self {
            source,
            event,
            mut data,
        } = self;

        data.set(keys::EVENT_NAME, event.as_str());
        data.set(keys::CREATED, created_timestamp());
        data.set(source.stamp_key(), source.identifier());

        if let Some(reason) = rejection(filters, &source, &data) {
            tracing::trace!(event = event.as_str(), %reason, "record filtered");
            return SaveOutcome::Filtered(reason);
        }

        sink.add(data);
        SaveOutcome::Queued
    }
}

fn rejection(filters: &FilterList, source: &Source, data: &Document) -> Option<FilterReason> {
    if !filters.allows_source(source) {
        return Some(FilterReason::Source);
    }

    let original = data.get_str(keys::original_block_type());
    if !filters.allows_block(original) {
        return original.map(|t| FilterReason::OriginalBlock(t.to_string()));
    }

    let replacement = data.get_str(keys::replacement_block_type());
    if !filters.allows_block(replacement) {
        return replacement.map(|t| FilterReason::ReplacementBlock(t.to_string()));
    }

    None
}
