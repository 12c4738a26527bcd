//! Item entity

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{double_option, Id};
use crate::error::GroceryError;

/// Quantity assigned when an insert omits it
pub const DEFAULT_QUANTITY: u32 = 1;

/// Number of color tags; `colorState` cycles through `0..COLOR_STATES`
pub const COLOR_STATES: u8 = 4;

/// Unit of measure for an item's quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Unit {
    /// Count of pieces
    #[default]
    #[serde(rename = "Nos.")]
    Nos,

    #[serde(rename = "Gms.")]
    Gms,

    #[serde(rename = "Kgs.")]
    Kgs,
}

impl Unit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Nos => "Nos.",
            Unit::Gms => "Gms.",
            Unit::Kgs => "Kgs.",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Unit {
    type Err = GroceryError;

    /// Accepts the canonical labels ("Kgs.") and bare lowercase forms ("kgs")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_end_matches('.').to_ascii_lowercase().as_str() {
            "nos" => Ok(Unit::Nos),
            "gms" => Ok(Unit::Gms),
            "kgs" => Ok(Unit::Kgs),
            other => Err(GroceryError::Validation(format!(
                "unknown unit '{}', expected one of Nos., Gms., Kgs.",
                other
            ))),
        }
    }
}

/// A purchasable entry, optionally grouped under a category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: Id,

    /// Owning category; `None` for an orphaned item
    pub category_id: Option<Id>,

    pub name: String,
    pub quantity: u32,
    pub unit: Unit,

    /// Currency-formatted text, not parsed
    pub reference_price: String,

    pub color_state: u8,
    pub checked: bool,

    /// Rank within the owning category
    pub order: i64,
}

impl Item {
    /// The color tag that follows this one in the cycle
    pub fn next_color_state(&self) -> u8 {
        (self.color_state % COLOR_STATES + 1) % COLOR_STATES
    }
}

/// Insert payload: every field except the id
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewItem {
    #[serde(default)]
    pub category_id: Option<Id>,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<Unit>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_price: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_state: Option<u8>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
}

impl NewItem {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn in_category(mut self, category_id: Id) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn with_quantity(mut self, quantity: u32, unit: Unit) -> Self {
        self.quantity = Some(quantity);
        self.unit = Some(unit);
        self
    }

    pub fn with_price(mut self, price: impl Into<String>) -> Self {
        self.reference_price = Some(price.into());
        self
    }

    pub fn with_order(mut self, order: i64) -> Self {
        self.order = Some(order);
        self
    }

    /// Build the stored entity, filling omitted fields with defaults
    pub fn into_item(self, id: Id) -> Item {
        Item {
            id,
            category_id: self.category_id,
            name: self.name,
            quantity: self.quantity.unwrap_or(DEFAULT_QUANTITY),
            unit: self.unit.unwrap_or_default(),
            reference_price: self.reference_price.unwrap_or_default(),
            color_state: self.color_state.unwrap_or(0),
            checked: self.checked.unwrap_or(false),
            order: self.order.unwrap_or(0),
        }
    }
}

/// Partial update: only keys present in the payload are applied.
///
/// `categoryId` distinguishes "absent" (`None`) from an explicit
/// `null` (`Some(None)`), which orphans the item.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPatch {
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub category_id: Option<Option<Id>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<Unit>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_price: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_state: Option<u8>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
}

impl ItemPatch {
    pub fn checked(checked: bool) -> Self {
        Self {
            checked: Some(checked),
            ..Self::default()
        }
    }

    pub fn color_state(color_state: u8) -> Self {
        Self {
            color_state: Some(color_state),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merge onto `target`, patch values win. `id` is never touched.
    pub fn apply_to(&self, target: &mut Item) {
        if let Some(category_id) = self.category_id {
            target.category_id = category_id;
        }
        if let Some(name) = &self.name {
            target.name = name.clone();
        }
        if let Some(quantity) = self.quantity {
            target.quantity = quantity;
        }
        if let Some(unit) = self.unit {
            target.unit = unit;
        }
        if let Some(price) = &self.reference_price {
            target.reference_price = price.clone();
        }
        if let Some(color_state) = self.color_state {
            target.color_state = color_state;
        }
        if let Some(checked) = self.checked {
            target.checked = checked;
        }
        if let Some(order) = self.order {
            target.order = order;
        }
    }
}
