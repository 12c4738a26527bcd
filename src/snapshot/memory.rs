//! In-memory snapshot persistence for tests and ephemeral use.
//!
//! Keeps the latest snapshot behind a mutex. Data is lost when the
//! backend is dropped.

use parking_lot::Mutex;

use crate::error::Result;

use super::{Persistence, Snapshot};

/// Holds the most recent snapshot in memory
#[derive(Debug, Default)]
pub struct MemoryPersistence {
    latest: Mutex<Option<Snapshot>>,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing snapshot, as if it had been persisted earlier
    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            latest: Mutex::new(Some(snapshot)),
        }
    }

    /// The most recently persisted snapshot
    pub fn latest(&self) -> Option<Snapshot> {
        self.latest.lock().clone()
    }
}

impl Persistence for MemoryPersistence {
    fn load(&self) -> Result<Option<Snapshot>> {
        Ok(self.latest())
    }

    fn persist(&self, snapshot: &Snapshot) -> Result<()> {
        *self.latest.lock() = Some(snapshot.clone());
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
