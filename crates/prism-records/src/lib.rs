//! Record construction for observed game events.
//!
//! Event handlers describe what happened with a staged builder:
//!
//! ```ignore
//! PrismRecord::create()
//!     .source(&cause)?
//!     .placed_block(Some(&transaction))?
//!     .save(&filters, &queue);
//! ```
//!
//! The builder resolves the cause into a single [`Source`], normalises the
//! event payload into a [`Document`](prism_types::Document), stamps the
//! event name, creation time and source identity, consults the filter gate
//! and hands accepted records to a [`RecordSink`].
//!
//! # Finished document shape
//!
//! | Key | Present for |
//! |-----|-------------|
//! | `event-name`, `created` | every record |
//! | `player` | records caused by a player (unique id) |
//! | `cause` | every other record (entity type, world name or `environment`) |
//! | `target` | `entity-death` (victim type) |
//! | `location` | block changes (world uuid and coordinates) |
//! | `original-block`, `replacement-block` | block changes |

mod builder;
mod engine;
mod error;
mod event;
mod sink;
mod source;

pub use builder::{
    AnySource, EventBuilder, FilterReason, PlayerSource, PrismRecord, RecordBuilder, SaveOutcome,
};
pub use engine::{
    BlockLocation, BlockSnapshot, BlockTransaction, Cause, CauseObject, Entity, Player, Position,
    World, CONTENT_VERSION,
};
pub use error::RecordError;
pub use event::EventKind;
pub use sink::RecordSink;
pub use source::Source;
