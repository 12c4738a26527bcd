//! Command definitions
//!
//! Represents requests from callers, plus the request validation that
//! runs before a command reaches the store.

use serde::{Deserialize, Serialize};

use crate::error::{GroceryError, Result};
use crate::model::{CategoryPatch, Id, ItemPatch, NewCategory, NewItem, COLOR_STATES};

/// A parsed command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    /// Categories in display order with their items nested
    ListCategories,

    /// Flat item listing, optionally narrowed to one category
    ListItems {
        #[serde(default, rename = "categoryId", skip_serializing_if = "Option::is_none")]
        category_id: Option<Id>,
    },

    GetCategory { id: Id },
    CreateCategory(NewCategory),
    UpdateCategory { id: Id, patch: CategoryPatch },
    DeleteCategory { id: Id },

    GetItem { id: Id },
    CreateItem(NewItem),
    UpdateItem { id: Id, patch: ItemPatch },
    DeleteItem { id: Id },

    /// Category / item / checked / orphan counts
    Stats,
}

impl Command {
    /// Operation name as it appears on the wire
    pub fn name(&self) -> &'static str {
        match self {
            Command::ListCategories => "list_categories",
            Command::ListItems { .. } => "list_items",
            Command::GetCategory { .. } => "get_category",
            Command::CreateCategory(_) => "create_category",
            Command::UpdateCategory { .. } => "update_category",
            Command::DeleteCategory { .. } => "delete_category",
            Command::GetItem { .. } => "get_item",
            Command::CreateItem(_) => "create_item",
            Command::UpdateItem { .. } => "update_item",
            Command::DeleteItem { .. } => "delete_item",
            Command::Stats => "stats",
        }
    }

    /// Whether executing this command persists a new snapshot
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Command::CreateCategory(_)
                | Command::UpdateCategory { .. }
                | Command::DeleteCategory { .. }
                | Command::CreateItem(_)
                | Command::UpdateItem { .. }
                | Command::DeleteItem { .. }
        )
    }

    /// Reject malformed payloads before they reach the store
    pub fn validate(&self) -> Result<()> {
        match self {
            Command::CreateCategory(insert) => check_name(&insert.name),
            Command::UpdateCategory { patch, .. } => match &patch.name {
                Some(name) => check_name(name),
                None => Ok(()),
            },
            Command::CreateItem(insert) => {
                check_name(&insert.name)?;
                check_quantity(insert.quantity)?;
                check_color_state(insert.color_state)
            }
            Command::UpdateItem { patch, .. } => {
                if let Some(name) = &patch.name {
                    check_name(name)?;
                }
                check_quantity(patch.quantity)?;
                check_color_state(patch.color_state)
            }
            _ => Ok(()),
        }
    }
}

fn check_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(GroceryError::Validation("name must not be empty".to_string()));
    }
    Ok(())
}

fn check_quantity(quantity: Option<u32>) -> Result<()> {
    if quantity == Some(0) {
        return Err(GroceryError::Validation("quantity must be at least 1".to_string()));
    }
    Ok(())
}

fn check_color_state(color_state: Option<u8>) -> Result<()> {
    match color_state {
        Some(state) if state >= COLOR_STATES => Err(GroceryError::Validation(format!(
            "colorState must be below {}, got {}",
            COLOR_STATES, state
        ))),
        _ => Ok(()),
    }
}
