//! Snapshot (Durability) Module
//!
//! Keeps a persisted copy of the whole list consistent with the in-memory
//! [`ListState`].
//!
//! ## Responsibilities
//! - Define the snapshot layout (both collections + both id counters)
//! - Load the snapshot on startup, falling back to seed data
//! - Rewrite the full snapshot after every mutation
//!
//! ## File Format (JSON)
//! ```text
//! {
//!   "categories": [ {id, name, isExpanded, order}, ... ],
//!   "items": [ {id, categoryId, name, quantity, unit,
//!               referencePrice, colorState, checked, order}, ... ],
//!   "currentCategoryId": <next category id>,
//!   "currentItemId": <next item id>
//! }
//! ```
//!
//! ## Backends
//! [`Persistence`] is implemented by [`FilePersistence`] (atomic
//! write-then-rename) and [`MemoryPersistence`] (process lifetime only).
//! The engine picks one from `Config::backend` at startup.

mod file;
mod memory;
mod seed;

pub use file::FilePersistence;
pub use memory::MemoryPersistence;
pub use seed::seed_state;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{Category, Id, Item};
use crate::store::ListState;

/// Full serialized state of the list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub categories: Vec<Category>,
    pub items: Vec<Item>,

    /// Next category id to allocate
    pub current_category_id: Id,

    /// Next item id to allocate
    pub current_item_id: Id,
}

impl Snapshot {
    /// Copy the current state into a snapshot
    pub fn capture(state: &ListState) -> Self {
        Self {
            categories: state.categories().to_vec(),
            items: state.items().to_vec(),
            current_category_id: state.next_category_id(),
            current_item_id: state.next_item_id(),
        }
    }

    /// Rebuild an in-memory state from this snapshot
    ///
    /// Fails with `SnapshotCorrupt` when the ids cannot be trusted.
    pub fn into_state(self) -> Result<ListState> {
        ListState::from_parts(
            self.categories,
            self.items,
            self.current_category_id,
            self.current_item_id,
        )
    }
}

/// Storage backend for snapshots
///
/// Implementations must be thread-safe; the engine calls them while
/// holding its write lock, so they never see concurrent persists.
pub trait Persistence: Send + Sync {
    /// Read the stored snapshot
    ///
    /// Returns `Ok(None)` if nothing has been stored yet, and an error if
    /// something was stored but cannot be read or decoded.
    fn load(&self) -> Result<Option<Snapshot>>;

    /// Replace the stored snapshot
    fn persist(&self, snapshot: &Snapshot) -> Result<()>;

    /// Short human-readable location for logs
    fn location(&self) -> String;
}

/// Where the startup state came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateSource {
    /// A valid snapshot was loaded
    Snapshot,

    /// No snapshot existed
    Missing,

    /// A snapshot existed but could not be read or decoded
    Corrupt(String),
}

/// Result of a startup recovery
#[derive(Debug)]
pub struct RecoveryResult {
    pub source: StateSource,

    /// Whether seed data was used instead of a snapshot
    pub seeded: bool,

    pub categories_loaded: usize,
    pub items_loaded: usize,
}

/// Load startup state from `backend`, never failing
///
/// Missing, unreadable or inconsistent snapshots fall back to [`seed_state`] (or an
/// empty list when `seed_on_fallback` is false). The fault is logged.
pub fn recover(backend: &dyn Persistence, seed_on_fallback: bool) -> (ListState, RecoveryResult) {
    let loaded = backend
        .load()
        .and_then(|snapshot| snapshot.map(Snapshot::into_state).transpose());
    let (loaded, source) = match loaded {
        Ok(Some(state)) => (Some(state), StateSource::Snapshot),
        Ok(None) => {
            tracing::info!(location = %backend.location(), "No snapshot found");
            (None, StateSource::Missing)
        }
        Err(e) => {
            tracing::warn!(
                location = %backend.location(),
                error = %e,
                "Snapshot unreadable, falling back"
            );
            (None, StateSource::Corrupt(e.to_string()))
        }
    };

    let seeded = loaded.is_none() && seed_on_fallback;
    let state = match loaded {
        Some(state) => state,
        None if seed_on_fallback => seed_state(),
        None => ListState::new(),
    };

    let result = RecoveryResult {
        source,
        seeded,
        categories_loaded: state.categories().len(),
        items_loaded: state.items().len(),
    };

    (state, result)
}
