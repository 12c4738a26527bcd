//! Entity Model
//!
//! Value shapes for categories and items, plus the rules that fill in
//! defaults for omitted insert fields and merge partial updates.
//!
//! ## Wire/Snapshot Shape
//! All entities serialize with camelCase keys (`isExpanded`, `categoryId`,
//! `referencePrice`, `colorState`), which is also the snapshot file layout.
//!
//! ## Lifecycle
//! ```text
//!   NewCategory ──into_category(id)──▶ Category ◀──apply_to── CategoryPatch
//!   NewItem     ──into_item(id)──────▶ Item     ◀──apply_to── ItemPatch
//! ```

mod category;
mod item;

pub use category::{Category, CategoryPatch, NewCategory};
pub use item::{Item, ItemPatch, NewItem, Unit, COLOR_STATES, DEFAULT_QUANTITY};

use serde::{Deserialize, Deserializer};

/// Entity identifier, assigned by the store and never reused
pub type Id = u64;

/// Largest id accepted from a snapshot (`i64::MAX`)
pub const MAX_ID: Id = i64::MAX as Id;

/// Distinguishes an absent patch key (`None`) from an explicit `null`
/// (`Some(None)`).
pub(crate) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
