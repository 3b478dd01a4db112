//! Background tasks for the Prism daemon.
//!
//! Includes:
//! - Draining the recording queue into the database.
//! - Reloading filters when the config file changes.

use std::sync::Arc;

use prism_db::DbPool;
use prism_filter::FilterHandle;
use prism_queue::{run_drain_task, DrainReport, QueueSettings, RecordingQueue, SqliteRecordStore};
use tokio::task::JoinHandle;

use crate::config::{load_config, ConfigError};

/// Creates the recording queue and spawns its drain task.
///
/// The task runs until every clone of the returned queue is dropped, then
/// flushes what is left and resolves to its report.
pub fn start_recording(
    pool: DbPool,
    settings: QueueSettings,
) -> (RecordingQueue, JoinHandle<DrainReport>) {
    let (queue, receiver) = RecordingQueue::new(&settings);
    let store = Arc::new(SqliteRecordStore::new(pool));
    let task = tokio::spawn(run_drain_task(receiver, store, settings));
    (queue, task)
}

/// Re-reads `path` and installs its `[filters]` table.
///
/// The current list stays in effect if the file cannot be loaded.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read or parsed, or the
/// filter table does not compile.
pub fn reload_filters(path: Option<&str>, filters: &FilterHandle) -> Result<(), ConfigError> {
    let config = load_config(path)?;
    let list = config.filters.compile()?;
    filters.replace(list);
    Ok(())
}

/// Reloads filters on every SIGHUP. Runs until the process exits.
#[cfg(unix)]
pub async fn start_reload_task(path: Option<String>, filters: FilterHandle) {
    use tokio::signal::unix::{signal, SignalKind};

    let mut hangup = match signal(SignalKind::hangup()) {
        Ok(stream) => stream,
        Err(e) => {
            tracing::warn!(error = %e, "failed to install SIGHUP handler, filter reload disabled");
            return;
        }
    };

    tracing::info!("filter reload armed on SIGHUP");

    while hangup.recv().await.is_some() {
        match reload_filters(path.as_deref(), &filters) {
            Ok(()) => tracing::info!("reloaded filters after SIGHUP"),
            Err(e) => tracing::error!(error = %e, "failed to reload filters, keeping current list"),
        }
    }
}

#[cfg(not(unix))]
pub async fn start_reload_task(_path: Option<String>, _filters: FilterHandle) {
    tracing::debug!("filter reload on SIGHUP is unavailable on this platform");
}
