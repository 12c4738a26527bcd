//! Category entity

use serde::{Deserialize, Serialize};

use super::Id;

/// A named, collapsible grouping of items
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Id,
    pub name: String,

    /// Presentation hint only
    pub is_expanded: bool,

    /// Display rank among categories (ascending, ties by insertion)
    pub order: i64,
}

/// Insert payload: every field except the id
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCategory {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_expanded: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
}

impl NewCategory {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_order(mut self, order: i64) -> Self {
        self.order = Some(order);
        self
    }

    pub fn with_expanded(mut self, expanded: bool) -> Self {
        self.is_expanded = Some(expanded);
        self
    }

    /// Build the stored entity, filling omitted fields with defaults
    pub fn into_category(self, id: Id) -> Category {
        Category {
            id,
            name: self.name,
            is_expanded: self.is_expanded.unwrap_or(true),
            order: self.order.unwrap_or(0),
        }
    }
}

/// Partial update: only keys present in the payload are applied
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_expanded: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
}

impl CategoryPatch {
    /// True when the patch carries no fields
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.is_expanded.is_none() && self.order.is_none()
    }

    /// Merge onto `target`, patch values win. `id` is never touched.
    pub fn apply_to(&self, target: &mut Category) {
        if let Some(name) = &self.name {
            target.name = name.clone();
        }
        if let Some(expanded) = self.is_expanded {
            target.is_expanded = expanded;
        }
        if let Some(order) = self.order {
            target.order = order;
        }
    }
}
