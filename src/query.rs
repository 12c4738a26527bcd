//! Query Façade
//!
//! Read models built directly from the current [`ListState`]. Nothing here
//! is cached, so every call reflects the latest mutation.

use serde::Serialize;

use crate::model::{Category, Item};
use crate::store::ListState;

/// A category together with its items, in display order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryWithItems {
    #[serde(flatten)]
    pub category: Category,
    pub items: Vec<Item>,
}

/// Categories in `order` rank, each with its `order`-sorted items
///
/// Orphaned items (null or dangling `categoryId`) do not appear here.
pub fn categories_with_items(state: &ListState) -> Vec<CategoryWithItems> {
    state
        .list_categories()
        .into_iter()
        .map(|category| {
            let items = state.list_items_by_category(category.id);
            CategoryWithItems { category, items }
        })
        .collect()
}
