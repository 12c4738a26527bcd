//! Tests for the Entity Model
//!
//! These tests verify:
//! - Default filling for omitted insert fields
//! - Field-by-field patch merging (absent keys untouched, id untouched)
//! - camelCase JSON shape of entities and payloads

use groceries::model::{Category, CategoryPatch, Item, ItemPatch, NewCategory, NewItem, Unit};

// =============================================================================
// Helper Functions
// =============================================================================

fn full_item() -> Item {
    NewItem {
        category_id: Some(2),
        name: "Basmati Rice".to_string(),
        quantity: Some(5),
        unit: Some(Unit::Kgs),
        reference_price: Some("₹450".to_string()),
        color_state: Some(2),
        checked: Some(false),
        order: Some(3),
    }
    .into_item(11)
}

// =============================================================================
// Insert Default Tests
// =============================================================================

#[test]
fn test_new_category_from_json_applies_defaults() {
    let insert: NewCategory = serde_json::from_str(r#"{"name":"Snacks","order":5}"#).unwrap();
    let category = insert.into_category(4);

    assert_eq!(
        category,
        Category {
            id: 4,
            name: "Snacks".to_string(),
            is_expanded: true,
            order: 5,
        }
    );
}

#[test]
fn test_new_item_from_json_applies_defaults() {
    let insert: NewItem = serde_json::from_str(r#"{"categoryId":4,"name":"Chips"}"#).unwrap();
    let item = insert.into_item(1);

    assert_eq!(item.category_id, Some(4));
    assert_eq!(item.quantity, 1);
    assert_eq!(item.unit, Unit::Nos);
    assert_eq!(item.reference_price, "");
    assert_eq!(item.color_state, 0);
    assert!(!item.checked);
    assert_eq!(item.order, 0);
}

#[test]
fn test_new_item_null_category_is_orphan() {
    let insert: NewItem = serde_json::from_str(r#"{"categoryId":null,"name":"Stamps"}"#).unwrap();
    assert_eq!(insert.into_item(1).category_id, None);
}

#[test]
fn test_new_item_explicit_fields_kept() {
    let item = full_item();

    assert_eq!(item.id, 11);
    assert_eq!(item.quantity, 5);
    assert_eq!(item.unit, Unit::Kgs);
    assert_eq!(item.reference_price, "₹450");
    assert_eq!(item.color_state, 2);
    assert_eq!(item.order, 3);
}

// =============================================================================
// Patch Merge Tests
// =============================================================================

#[test]
fn test_item_checked_patch_changes_only_checked() {
    let before = full_item();
    let mut after = before.clone();

    ItemPatch::checked(true).apply_to(&mut after);

    assert!(after.checked);
    after.checked = before.checked;
    assert_eq!(after, before);
}

#[test]
fn test_item_patch_from_json_multiple_fields() {
    let mut item = full_item();
    let patch: ItemPatch =
        serde_json::from_str(r#"{"quantity":2,"unit":"Gms.","referencePrice":"₹90"}"#).unwrap();

    patch.apply_to(&mut item);

    assert_eq!(item.id, 11);
    assert_eq!(item.name, "Basmati Rice");
    assert_eq!(item.quantity, 2);
    assert_eq!(item.unit, Unit::Gms);
    assert_eq!(item.reference_price, "₹90");
    assert_eq!(item.category_id, Some(2));
}

#[test]
fn test_empty_patches_are_noops() {
    let mut item = full_item();
    let before = item.clone();
    let patch: ItemPatch = serde_json::from_str("{}").unwrap();
    assert!(patch.is_empty());
    patch.apply_to(&mut item);
    assert_eq!(item, before);

    let mut category = NewCategory::new("Dairy").into_category(1);
    let before = category.clone();
    let patch = CategoryPatch::default();
    assert!(patch.is_empty());
    patch.apply_to(&mut category);
    assert_eq!(category, before);
}

#[test]
fn test_category_patch_rename_and_collapse() {
    let mut category = NewCategory::new("Diary").with_order(2).into_category(3);
    let patch: CategoryPatch =
        serde_json::from_str(r#"{"name":"Dairy","isExpanded":false}"#).unwrap();

    patch.apply_to(&mut category);

    assert_eq!(category.id, 3);
    assert_eq!(category.name, "Dairy");
    assert!(!category.is_expanded);
    assert_eq!(category.order, 2);
}

#[test]
fn test_patch_serialization_skips_absent_keys() {
    let json = serde_json::to_string(&ItemPatch::checked(true)).unwrap();
    assert_eq!(json, r#"{"checked":true}"#);

    let orphan = ItemPatch {
        category_id: Some(None),
        ..ItemPatch::default()
    };
    assert_eq!(serde_json::to_string(&orphan).unwrap(), r#"{"categoryId":null}"#);
}

// =============================================================================
// JSON Shape Tests
// =============================================================================

#[test]
fn test_item_json_uses_camel_case_keys() {
    let json = serde_json::to_value(full_item()).unwrap();

    assert_eq!(json["categoryId"], 2);
    assert_eq!(json["referencePrice"], "₹450");
    assert_eq!(json["colorState"], 2);
    assert_eq!(json["unit"], "Kgs.");
    assert_eq!(json["checked"], false);
}

#[test]
fn test_unknown_unit_rejected() {
    let result = serde_json::from_str::<NewItem>(r#"{"name":"Milk","unit":"Litres"}"#);
    assert!(result.is_err());
}
