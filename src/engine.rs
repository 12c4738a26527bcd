//! Engine Module
//!
//! The process-lifetime store object that coordinates all components.
//!
//! ## Responsibilities
//! - Recover list state from the configured backend on startup
//! - Serialize mutations and persist a snapshot after each one
//! - Serve the read models (sorted listings, categories with items)
//! - Dispatch protocol commands

use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use parking_lot::RwLock;
use serde::Serialize;
use serde_json::json;

use crate::config::{Config, StorageBackend};
use crate::error::{GroceryError, Result};
use crate::model::{Category, CategoryPatch, Id, Item, ItemPatch, NewCategory, NewItem};
use crate::protocol::{Command, Response};
use crate::query::{self, CategoryWithItems};
use crate::snapshot::{
    self, FilePersistence, MemoryPersistence, Persistence, RecoveryResult, Snapshot,
};
use crate::store::{ListState, ListStats};

/// The grocery list store
///
/// ## Concurrency Model: Single-Writer / Multiple-Reader
///
/// - **Writes** (create/update/delete): take the `state` write lock and
///   keep it through the snapshot persist, so mutate-then-persist is one
///   unit and no reader sees a half-applied cascade.
/// - **Reads** (get/list/query): take the read lock; many at once.
///
/// ## Durability
/// A failed persist is logged and counted but not returned to the caller.
/// The in-memory state stays authoritative and `is_diverged()` reports
/// true until a later persist succeeds.
pub struct Engine {
    /// Both collections and id counters
    state: RwLock<ListState>,

    /// Where snapshots go (chosen from `config.backend`)
    backend: Box<dyn Persistence>,

    /// How the startup state was obtained
    recovery: RecoveryResult,

    /// Total number of failed persists
    persist_failures: AtomicU64,

    /// Whether the most recent persist failed
    diverged: AtomicBool,
}

impl Engine {
    // =========================================================================
    // Internal Path Constants
    // =========================================================================
    const SNAPSHOT_FILENAME: &'static str = "groceries.json";

    /// Open an engine with the given config
    ///
    /// On startup:
    /// 1. Build the backend selected by `config.backend`
    /// 2. Load the snapshot, or fall back to seed data
    /// 3. Ready to serve requests
    ///
    /// Missing or corrupt snapshots never fail startup.
    pub fn open(config: Config) -> Result<Self> {
        let backend: Box<dyn Persistence> = match config.backend {
            StorageBackend::Memory => Box::new(MemoryPersistence::new()),
            StorageBackend::File => {
                if config.data_dir.as_os_str().is_empty() {
                    return Err(GroceryError::Config(
                        "data_dir must be set for the file backend".to_string(),
                    ));
                }
                Box::new(FilePersistence::new(
                    config.data_dir.join(Self::SNAPSHOT_FILENAME),
                    config.sync_strategy,
                ))
            }
        };

        Ok(Self::with_persistence(config, backend))
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified data directory
    pub fn open_path(path: &Path) -> Result<Self> {
        let config = Config::builder().data_dir(path).build();
        Self::open(config)
    }

    /// Open on top of a caller-supplied backend
    ///
    /// `config.backend` is ignored; `seed_on_fallback` still applies.
    pub fn with_persistence(config: Config, backend: Box<dyn Persistence>) -> Self {
        let (state, recovery) = snapshot::recover(backend.as_ref(), config.seed_on_fallback);

        tracing::info!(
            location = %backend.location(),
            source = ?recovery.source,
            seeded = recovery.seeded,
            categories = recovery.categories_loaded,
            items = recovery.items_loaded,
            "Grocery list loaded"
        );

        Self {
            state: RwLock::new(state),
            backend,
            recovery,
            persist_failures: AtomicU64::new(0),
            diverged: AtomicBool::new(false),
        }
    }

    /// Execute a command
    ///
    /// Validates the request, then routes it to the matching operation.
    pub fn execute(&self, command: Command) -> Response {
        if let Err(e) = command.validate() {
            return Response::invalid(e.to_string());
        }

        tracing::debug!(
            op = command.name(),
            mutation = command.is_mutation(),
            "Executing command"
        );

        match command {
            Command::ListCategories => payload(&self.categories_with_items()),
            Command::ListItems { category_id } => match category_id {
                Some(cid) => payload(&self.list_items_by_category(cid)),
                None => payload(&self.list_items()),
            },
            Command::GetCategory { id } => match self.get_category(id) {
                Some(category) => payload(&category),
                None => Response::not_found(format!("category {}", id)),
            },
            Command::CreateCategory(insert) => payload(&self.create_category(insert)),
            Command::UpdateCategory { id, patch } => match self.update_category(id, &patch) {
                Some(category) => payload(&category),
                None => Response::not_found(format!("category {}", id)),
            },
            Command::DeleteCategory { id } => {
                if self.delete_category(id) {
                    Response::ok(json!({ "deleted": true }))
                } else {
                    Response::not_found(format!("category {}", id))
                }
            }
            Command::GetItem { id } => match self.get_item(id) {
                Some(item) => payload(&item),
                None => Response::not_found(format!("item {}", id)),
            },
            Command::CreateItem(insert) => payload(&self.create_item(insert)),
            Command::UpdateItem { id, patch } => match self.update_item(id, &patch) {
                Some(item) => payload(&item),
                None => Response::not_found(format!("item {}", id)),
            },
            Command::DeleteItem { id } => {
                if self.delete_item(id) {
                    Response::ok(json!({ "deleted": true }))
                } else {
                    Response::not_found(format!("item {}", id))
                }
            }
            Command::Stats => payload(&self.stats()),
        }
    }

    // =========================================================================
    // Categories
    // =========================================================================

    /// All categories sorted by `order` (stable)
    pub fn list_categories(&self) -> Vec<Category> {
        self.state.read().list_categories()
    }

    pub fn get_category(&self, id: Id) -> Option<Category> {
        self.state.read().get_category(id)
    }

    pub fn create_category(&self, insert: NewCategory) -> Category {
        let mut state = self.state.write();
        let category = state.create_category(insert);
        self.commit(&state);
        category
    }

    /// Merge `patch` over the category; `None` if the id is unknown
    pub fn update_category(&self, id: Id, patch: &CategoryPatch) -> Option<Category> {
        let mut state = self.state.write();
        if patch.is_empty() {
            return state.get_category(id);
        }
        let category = state.update_category(id, patch)?;
        self.commit(&state);
        Some(category)
    }

    /// Delete a category and cascade to its items; `false` if unknown
    pub fn delete_category(&self, id: Id) -> bool {
        let mut state = self.state.write();
        if !state.delete_category(id) {
            return false;
        }
        self.commit(&state);
        true
    }

    // =========================================================================
    // Items
    // =========================================================================

    /// All items sorted by `order` (stable)
    pub fn list_items(&self) -> Vec<Item> {
        self.state.read().list_items()
    }

    pub fn list_items_by_category(&self, category_id: Id) -> Vec<Item> {
        self.state.read().list_items_by_category(category_id)
    }

    pub fn get_item(&self, id: Id) -> Option<Item> {
        self.state.read().get_item(id)
    }

    pub fn create_item(&self, insert: NewItem) -> Item {
        let mut state = self.state.write();
        let item = state.create_item(insert);
        self.commit(&state);
        item
    }

    /// Merge `patch` over the item; `None` if the id is unknown
    pub fn update_item(&self, id: Id, patch: &ItemPatch) -> Option<Item> {
        let mut state = self.state.write();
        if patch.is_empty() {
            return state.get_item(id);
        }
        let item = state.update_item(id, patch)?;
        self.commit(&state);
        Some(item)
    }

    pub fn delete_item(&self, id: Id) -> bool {
        let mut state = self.state.write();
        if !state.delete_item(id) {
            return false;
        }
        self.commit(&state);
        true
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Categories in display order, each with its items
    pub fn categories_with_items(&self) -> Vec<CategoryWithItems> {
        query::categories_with_items(&self.state.read())
    }

    pub fn stats(&self) -> ListStats {
        self.state.read().stats()
    }

    // =========================================================================
    // Durability
    // =========================================================================

    /// Persist the current state now, returning any failure
    pub fn flush(&self) -> Result<()> {
        let state = self.state.write();
        let snapshot = Snapshot::capture(&state);
        match self.backend.persist(&snapshot) {
            Ok(()) => {
                self.diverged.store(false, Ordering::SeqCst);
                Ok(())
            }
            Err(e) => {
                self.persist_failures.fetch_add(1, Ordering::SeqCst);
                self.diverged.store(true, Ordering::SeqCst);
                Err(e)
            }
        }
    }

    /// Close the engine
    ///
    /// Retries the persist if the last one failed, so a caller shutting
    /// down learns whether disk and memory still differ.
    pub fn close(self) -> Result<()> {
        if self.is_diverged() {
            self.flush()?;
        }
        Ok(())
    }

    /// Persist after a mutation (called with the write lock held)
    fn commit(&self, state: &ListState) {
        let snapshot = Snapshot::capture(state);
        match self.backend.persist(&snapshot) {
            Ok(()) => {
                self.diverged.store(false, Ordering::SeqCst);
                tracing::debug!(
                    categories = snapshot.categories.len(),
                    items = snapshot.items.len(),
                    "Snapshot persisted"
                );
            }
            Err(e) => {
                let failures = self.persist_failures.fetch_add(1, Ordering::SeqCst) + 1;
                self.diverged.store(true, Ordering::SeqCst);
                tracing::warn!(
                    location = %self.backend.location(),
                    error = %e,
                    failures,
                    "Snapshot persist failed, keeping in-memory state"
                );
            }
        }
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Snapshot of the current in-memory state
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.state.read())
    }

    /// How startup state was obtained
    pub fn recovery(&self) -> &RecoveryResult {
        &self.recovery
    }

    /// Number of persists that have failed since open
    pub fn persist_failures(&self) -> u64 {
        self.persist_failures.load(Ordering::SeqCst)
    }

    /// True while the most recent persist failed
    pub fn is_diverged(&self) -> bool {
        self.diverged.load(Ordering::SeqCst)
    }

    /// Where snapshots are written
    pub fn location(&self) -> String {
        self.backend.location()
    }
}

fn payload<T: Serialize>(value: &T) -> Response {
    match serde_json::to_value(value) {
        Ok(value) => Response::ok(value),
        Err(e) => Response::error(e.to_string()),
    }
}
