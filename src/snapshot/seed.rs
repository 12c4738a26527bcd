//! Seed dataset used when no valid snapshot exists

use crate::model::{NewCategory, NewItem, Unit};
use crate::store::ListState;

/// Deterministic sample list: 3 categories and 8 items
///
/// Categories get ids 1..=3 and items ids 1..=8, so the next category
/// created after seeding is id 4 and the next item id 9.
pub fn seed_state() -> ListState {
    let mut state = ListState::new();

    let produce = state.create_category(NewCategory::new("Fruits & Vegetables").with_order(0));
    let dairy = state.create_category(NewCategory::new("Dairy & Eggs").with_order(1));
    let household = state.create_category(NewCategory::new("Household").with_order(2));

    let items = [
        NewItem::new("Tomatoes")
            .in_category(produce.id)
            .with_quantity(500, Unit::Gms)
            .with_price("₹30")
            .with_order(0),
        NewItem::new("Onions")
            .in_category(produce.id)
            .with_quantity(1, Unit::Kgs)
            .with_price("₹40")
            .with_order(1),
        NewItem::new("Bananas")
            .in_category(produce.id)
            .with_quantity(6, Unit::Nos)
            .with_price("₹36")
            .with_order(2),
        NewItem::new("Milk")
            .in_category(dairy.id)
            .with_quantity(2, Unit::Nos)
            .with_price("₹54")
            .with_order(0),
        NewItem::new("Eggs")
            .in_category(dairy.id)
            .with_quantity(12, Unit::Nos)
            .with_price("₹84")
            .with_order(1),
        NewItem::new("Paneer")
            .in_category(dairy.id)
            .with_quantity(200, Unit::Gms)
            .with_price("₹90")
            .with_order(2),
        NewItem::new("Dish Soap")
            .in_category(household.id)
            .with_quantity(1, Unit::Nos)
            .with_price("₹99")
            .with_order(0),
        NewItem::new("Paper Towels")
            .in_category(household.id)
            .with_quantity(2, Unit::Nos)
            .with_price("₹120")
            .with_order(1),
    ];

    for item in items {
        state.create_item(item);
    }

    state
}
