//! # Groceries
//!
//! A persistent grocery-list store with:
//! - Ordered categories and items (stable sort by `order`)
//! - Monotonic, never-reused ids per entity type
//! - Patch-style partial updates
//! - Cascading category deletes
//! - Atomic JSON snapshots rewritten after every mutation
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Caller (CLI / request handler)               │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ Command
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                         Engine                               │
//! │            (Single Writer / Multi Reader)                    │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │  ListState  │─capture─▶│  Snapshot   │
//!   │  (RwLock)   │          │ (file/mem)  │
//!   └──────┬──────┘          └─────────────┘
//!          │
//!          ▼
//!   ┌─────────────┐
//!   │    Query    │
//!   │ (read model)│
//!   └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod model;
pub mod store;
pub mod snapshot;
pub mod query;
pub mod protocol;
pub mod engine;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{GroceryError, Result};
pub use config::{Config, StorageBackend, SyncStrategy};
pub use engine::Engine;
pub use model::{Category, CategoryPatch, Item, ItemPatch, NewCategory, NewItem, Unit};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
