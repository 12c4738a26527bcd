//! Ordered Store Module
//!
//! In-memory representation of the two linked collections.
//!
//! ## Responsibilities
//! - Hold categories and items in insertion order
//! - Allocate ids from two monotonic counters (never reused)
//! - Create / patch / delete entities, cascading category deletes to items
//! - Return stable `order`-sorted views without re-sorting in place
//!
//! ## Data Structure Choice
//! Plain `Vec`s in insertion order:
//! - Insertion order is the tie-break for equal `order` values
//! - `sort_by_key` on a cloned view is stable, so ties keep that order
//! - Lists are small (one household), linear scans are fine

mod state;

pub use state::{ListState, ListStats};
