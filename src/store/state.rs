//! ListState implementation
//!
//! Vec-backed collections plus id counters. Pure in-memory logic; the
//! engine wraps this in a lock and persists after each mutation.

use std::collections::HashSet;

use crate::error::{GroceryError, Result};
use crate::model::{
    Category, CategoryPatch, Id, Item, ItemPatch, NewCategory, NewItem, MAX_ID,
};

/// Counts reported by [`ListState::stats`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListStats {
    pub categories: usize,
    pub items: usize,
    pub checked_items: usize,

    /// Items whose `categoryId` is null or points at a missing category
    pub orphaned_items: usize,
}

/// Both collections and their id counters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListState {
    /// Categories in insertion order
    categories: Vec<Category>,

    /// Items in insertion order
    items: Vec<Item>,

    /// Next id handed to `create_category`
    next_category_id: Id,

    /// Next id handed to `create_item`
    next_item_id: Id,
}

impl ListState {
    /// Create an empty state; the first ids allocated are 1
    pub fn new() -> Self {
        Self {
            categories: Vec::new(),
            items: Vec::new(),
            next_category_id: 1,
            next_item_id: 1,
        }
    }

    /// Rebuild a state from persisted parts
    ///
    /// Counters that would hand out an id already in use are raised to
    /// `max_id + 1`, so identity stays monotonic even for edited files.
    ///
    /// # Errors
    /// `SnapshotCorrupt` if an id is outside `1..=MAX_ID`, a counter is
    /// above `MAX_ID`, or two categories (or two items) share an id.
    pub fn from_parts(
        categories: Vec<Category>,
        items: Vec<Item>,
        next_category_id: Id,
        next_item_id: Id,
    ) -> Result<Self> {
        let next_category_id = checked_counter(
            "category",
            categories.iter().map(|c| c.id),
            next_category_id,
        )?;
        let next_item_id = checked_counter("item", items.iter().map(|i| i.id), next_item_id)?;

        Ok(Self {
            categories,
            items,
            next_category_id,
            next_item_id,
        })
    }

    // =========================================================================
    // Categories
    // =========================================================================

    /// All categories sorted by `order`, ties in insertion order
    pub fn list_categories(&self) -> Vec<Category> {
        let mut sorted = self.categories.clone();
        sorted.sort_by_key(|c| c.order);
        sorted
    }

    pub fn get_category(&self, id: Id) -> Option<Category> {
        self.categories.iter().find(|c| c.id == id).cloned()
    }

    pub fn create_category(&mut self, insert: NewCategory) -> Category {
        // Loaded counters are at most MAX_ID + 1, far from wrapping
        let id = self.next_category_id;
        self.next_category_id += 1;

        let category = insert.into_category(id);
        self.categories.push(category.clone());
        category
    }

    pub fn update_category(&mut self, id: Id, patch: &CategoryPatch) -> Option<Category> {
        let category = self.categories.iter_mut().find(|c| c.id == id)?;
        patch.apply_to(category);
        Some(category.clone())
    }

    /// Remove a category and every item that references it
    ///
    /// Both removals happen under the same `&mut self` borrow, so no
    /// reader can observe one without the other.
    pub fn delete_category(&mut self, id: Id) -> bool {
        let Some(position) = self.categories.iter().position(|c| c.id == id) else {
            return false;
        };

        self.items.retain(|item| item.category_id != Some(id));
        self.categories.remove(position);
        true
    }

    // =========================================================================
    // Items
    // =========================================================================

    /// All items across categories sorted by `order`, ties in insertion order
    pub fn list_items(&self) -> Vec<Item> {
        let mut sorted = self.items.clone();
        sorted.sort_by_key(|i| i.order);
        sorted
    }

    pub fn list_items_by_category(&self, category_id: Id) -> Vec<Item> {
        let mut matching: Vec<Item> = self
            .items
            .iter()
            .filter(|i| i.category_id == Some(category_id))
            .cloned()
            .collect();
        matching.sort_by_key(|i| i.order);
        matching
    }

    pub fn get_item(&self, id: Id) -> Option<Item> {
        self.items.iter().find(|i| i.id == id).cloned()
    }

    /// Append a new item. `categoryId` is not checked against categories.
    pub fn create_item(&mut self, insert: NewItem) -> Item {
        let id = self.next_item_id;
        self.next_item_id += 1;

        let item = insert.into_item(id);
        self.items.push(item.clone());
        item
    }

    pub fn update_item(&mut self, id: Id, patch: &ItemPatch) -> Option<Item> {
        let item = self.items.iter_mut().find(|i| i.id == id)?;
        patch.apply_to(item);
        Some(item.clone())
    }

    pub fn delete_item(&mut self, id: Id) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.id != id);
        self.items.len() != before
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Categories in insertion order (snapshot layout)
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Items in insertion order (snapshot layout)
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn next_category_id(&self) -> Id {
        self.next_category_id
    }

    pub fn next_item_id(&self) -> Id {
        self.next_item_id
    }

    pub fn stats(&self) -> ListStats {
        let orphaned_items = self
            .items
            .iter()
            .filter(|item| match item.category_id {
                Some(cid) => !self.categories.iter().any(|c| c.id == cid),
                None => true,
            })
            .count();

        ListStats {
            categories: self.categories.len(),
            items: self.items.len(),
            checked_items: self.items.iter().filter(|i| i.checked).count(),
            orphaned_items,
        }
    }
}

impl Default for ListState {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate one collection's ids and return the counter to resume from
fn checked_counter(kind: &str, ids: impl Iterator<Item = Id>, stored: Id) -> Result<Id> {
    if stored > MAX_ID {
        return Err(GroceryError::SnapshotCorrupt(format!(
            "{} id counter {} exceeds {}",
            kind, stored, MAX_ID
        )));
    }

    let mut seen = HashSet::new();
    let mut max_id = 0;
    for id in ids {
        if id == 0 || id > MAX_ID {
            return Err(GroceryError::SnapshotCorrupt(format!(
                "{} id {} outside 1..={}",
                kind, id, MAX_ID
            )));
        }
        if !seen.insert(id) {
            return Err(GroceryError::SnapshotCorrupt(format!(
                "duplicate {} id {}",
                kind, id
            )));
        }
        max_id = max_id.max(id);
    }

    let min_counter = max_id.checked_add(1).ok_or_else(|| {
        GroceryError::SnapshotCorrupt(format!("{} id counter cannot advance past {}", kind, max_id))
    })?;
    if stored < min_counter {
        tracing::warn!(
            kind,
            stored,
            repaired = min_counter,
            "Id counter behind stored ids, repairing"
        );
    }

    Ok(stored.max(min_counter))
}
