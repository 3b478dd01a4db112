//! Allow/deny filtering for recorded events.
//!
//! A [`FilterList`] holds two independent rule sets: one keyed by the
//! identity of whatever caused an event, one keyed by block type. Rules are
//! compiled once from a [`FilterConfig`] and are read-only afterwards, so a
//! single list can be shared by every producer thread without locking.
//!
//! Reloading swaps in a freshly compiled list through a [`FilterHandle`];
//! records already being finalised keep the snapshot they started with.
//!
//! # Evaluation
//!
//! A value is permitted when it matches an `allow` entry, or when it matches
//! no `deny` entry. Entries compare case-insensitively and a trailing `*`
//! matches any suffix (`minecraft:*`).

mod config;
mod handle;
mod rules;

pub use config::{FilterConfig, FilterConfigError, RuleConfig};
pub use handle::FilterHandle;
pub use rules::{FilterList, FilterRules, SourceIdentity};
