//! Shared, reloadable access to the active filter list.

use std::sync::{Arc, RwLock};

use crate::rules::FilterList;

/// Holds the active [`FilterList`] and lets configuration reloads replace it.
///
/// Readers take an `Arc` snapshot and filter without holding the lock.
#[derive(Debug, Clone, Default)]
pub struct FilterHandle {
    current: Arc<RwLock<Arc<FilterList>>>,
}

impl FilterHandle {
    pub fn new(list: FilterList) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(list))),
        }
    }

    /// Returns the list in effect right now.
    pub fn snapshot(&self) -> Arc<FilterList> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Installs a reloaded list for all subsequent snapshots.
    pub fn replace(&self, list: FilterList) {
        let list = Arc::new(list);
        match self.current.write() {
            Ok(mut guard) => *guard = list,
            Err(poisoned) => *poisoned.into_inner() = list,
        }
        tracing::info!("filter list replaced");
    }
}
