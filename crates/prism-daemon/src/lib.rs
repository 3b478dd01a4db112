//! Prism daemon library logic.
//!
//! The binary wires these together: configuration, the queue's drain task,
//! filter reloads and the JSON-lines event feed.

pub mod background;
pub mod config;
pub mod feed;
