//! Canonical document keys.
//!
//! Top-level keys of a finished record, followed by the keys found inside
//! engine-shaped location and block snapshot documents.

use crate::DataQuery;

pub const EVENT_NAME: &str = "event-name";
pub const CREATED: &str = "created";
pub const PLAYER: &str = "player";
pub const CAUSE: &str = "cause";
pub const TARGET: &str = "target";
pub const LOCATION: &str = "location";
pub const ORIGINAL_BLOCK: &str = "original-block";
pub const REPLACEMENT_BLOCK: &str = "replacement-block";

pub const BLOCK_STATE: &str = "block-state";
pub const BLOCK_TYPE: &str = "block-type";
pub const WORLD_UUID: &str = "world-uuid";
pub const WORLD_NAME: &str = "world-name";
pub const CONTENT_VERSION: &str = "content-version";
pub const POSITION: &str = "position";
pub const UNSAFE_DATA: &str = "unsafe-data";
pub const X: &str = "x";
pub const Y: &str = "y";
pub const Z: &str = "z";

/// Value stamped under [`CAUSE`] when no stronger identity exists.
pub const ENVIRONMENT: &str = "environment";

/// `original-block.block-state.block-type`
pub fn original_block_type() -> DataQuery {
    DataQuery::of([ORIGINAL_BLOCK, BLOCK_STATE, BLOCK_TYPE])
}

/// `replacement-block.block-state.block-type`
pub fn replacement_block_type() -> DataQuery {
    DataQuery::of([REPLACEMENT_BLOCK, BLOCK_STATE, BLOCK_TYPE])
}
