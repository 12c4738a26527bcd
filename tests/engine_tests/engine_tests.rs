//! Tests for Engine
//!
//! These tests verify:
//! - Startup on missing / corrupt / valid snapshots
//! - Every mutation persists before returning
//! - Cascade delete through the engine
//! - Write faults are swallowed, logged and tracked
//! - Command execution and validation
//! - Concurrent access keeps ids unique

use std::fs;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use groceries::config::{Config, StorageBackend, SyncStrategy};
use groceries::engine::Engine;
use groceries::error::{GroceryError, Result};
use groceries::model::{CategoryPatch, ItemPatch, NewCategory, NewItem, Unit};
use groceries::protocol::{Command, Status};
use groceries::snapshot::{Persistence, Snapshot, StateSource};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_engine() -> (TempDir, Engine) {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder()
        .data_dir(temp_dir.path())
        .sync_strategy(SyncStrategy::EveryWrite)
        .build();
    let engine = Engine::open(config).unwrap();
    (temp_dir, engine)
}

fn read_snapshot(temp_dir: &TempDir) -> Snapshot {
    let bytes = fs::read(temp_dir.path().join("groceries.json")).unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Backend whose writes fail while `broken` is set
#[derive(Default)]
struct FlakyPersistence {
    broken: Arc<AtomicBool>,
}

impl Persistence for FlakyPersistence {
    fn load(&self) -> Result<Option<Snapshot>> {
        Ok(None)
    }

    fn persist(&self, _snapshot: &Snapshot) -> Result<()> {
        if self.broken.load(Ordering::SeqCst) {
            return Err(GroceryError::Persistence("disk unplugged".to_string()));
        }
        Ok(())
    }

    fn location(&self) -> String {
        "flaky".to_string()
    }
}

fn setup_flaky_engine() -> (Arc<AtomicBool>, Engine) {
    let broken = Arc::new(AtomicBool::new(false));
    let backend = FlakyPersistence {
        broken: Arc::clone(&broken),
    };
    let engine = Engine::with_persistence(Config::default(), Box::new(backend));
    (broken, engine)
}

// =============================================================================
// Startup Tests
// =============================================================================

#[test]
fn test_engine_open_missing_snapshot_seeds() {
    let (temp, engine) = setup_temp_engine();

    assert_eq!(engine.recovery().source, StateSource::Missing);
    assert_eq!(engine.list_categories().len(), 3);
    assert_eq!(engine.list_items().len(), 8);
    // Nothing is written until the first mutation
    assert!(!temp.path().join("groceries.json").exists());
}

#[test]
fn test_engine_open_corrupt_snapshot_seeds() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("groceries.json"), "{{{{").unwrap();

    let engine = Engine::open_path(temp_dir.path()).unwrap();

    assert!(matches!(engine.recovery().source, StateSource::Corrupt(_)));
    assert_eq!(engine.stats().categories, 3);
    assert_eq!(engine.stats().items, 8);
}

#[test]
fn test_engine_open_creates_data_dir_on_first_write() {
    let temp_dir = TempDir::new().unwrap();
    let data_dir = temp_dir.path().join("mylist");
    let engine = Engine::open_path(&data_dir).unwrap();
    assert!(!data_dir.exists());

    engine.create_category(NewCategory::new("Bakery"));

    assert!(data_dir.join("groceries.json").exists());
}

#[test]
fn test_engine_empty_data_dir_rejected_for_file_backend() {
    let config = Config::builder().data_dir("").build();

    assert!(matches!(Engine::open(config), Err(GroceryError::Config(_))));
}

#[test]
fn test_engine_seed_disabled_starts_empty() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder()
        .data_dir(temp_dir.path())
        .seed_on_fallback(false)
        .build();
    let engine = Engine::open(config).unwrap();

    assert!(engine.list_categories().is_empty());
    assert_eq!(engine.create_category(NewCategory::new("First")).id, 1);
}

// =============================================================================
// Persist-After-Mutation Tests
// =============================================================================

#[test]
fn test_engine_each_mutation_is_on_disk_before_return() {
    let (temp, engine) = setup_temp_engine();

    let category = engine.create_category(NewCategory::new("Snacks").with_order(5));
    assert_eq!(read_snapshot(&temp).current_category_id, 5);

    let item = engine.create_item(NewItem::new("Chips").in_category(category.id));
    assert_eq!(read_snapshot(&temp).items.len(), 9);

    engine.update_item(item.id, &ItemPatch::checked(true)).unwrap();
    let on_disk = read_snapshot(&temp);
    assert!(on_disk.items.iter().any(|i| i.id == item.id && i.checked));

    engine.delete_item(item.id);
    assert_eq!(read_snapshot(&temp).items.len(), 8);

    engine
        .update_category(
            category.id,
            &CategoryPatch {
                name: Some("Munchies".to_string()),
                ..CategoryPatch::default()
            },
        )
        .unwrap();
    assert!(read_snapshot(&temp)
        .categories
        .iter()
        .any(|c| c.name == "Munchies"));

    engine.delete_category(category.id);
    assert_eq!(read_snapshot(&temp).categories.len(), 3);
}

#[test]
fn test_engine_reopen_is_observationally_equal() {
    let temp_dir = TempDir::new().unwrap();
    let data_dir = temp_dir.path().to_path_buf();

    let before = {
        let engine = Engine::open_path(&data_dir).unwrap();
        let frozen = engine.create_category(NewCategory::new("Frozen").with_expanded(false));
        engine.create_item(
            NewItem::new("Peas")
                .in_category(frozen.id)
                .with_quantity(500, Unit::Gms),
        );
        engine.delete_item(1);
        engine.snapshot()
    };

    let engine = Engine::open_path(&data_dir).unwrap();

    assert_eq!(engine.recovery().source, StateSource::Snapshot);
    assert_eq!(engine.snapshot(), before);
    assert_eq!(engine.create_category(NewCategory::new("Next")).id, 5);
    assert_eq!(engine.create_item(NewItem::new("Next")).id, 10);
}

#[test]
fn test_engine_noop_mutations_do_not_write() {
    let (temp, engine) = setup_temp_engine();

    assert!(engine.update_item(999, &ItemPatch::checked(true)).is_none());
    assert!(!engine.delete_category(999));
    assert!(!engine.delete_item(999));

    assert!(!temp.path().join("groceries.json").exists());
}

#[test]
fn test_engine_empty_patch_returns_current_without_write() {
    let (temp, engine) = setup_temp_engine();

    let category = engine.update_category(2, &CategoryPatch::default()).unwrap();
    assert_eq!(category.name, "Dairy & Eggs");
    let item = engine.update_item(4, &ItemPatch::default()).unwrap();
    assert_eq!(item.name, "Milk");
    assert!(engine.update_item(999, &ItemPatch::default()).is_none());

    assert!(!temp.path().join("groceries.json").exists());
}

#[test]
fn test_engine_memory_backend_never_touches_disk() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder()
        .data_dir(temp_dir.path())
        .backend(StorageBackend::Memory)
        .build();
    let engine = Engine::open(config).unwrap();

    engine.create_category(NewCategory::new("Ephemeral"));

    assert_eq!(engine.location(), "memory");
    assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 0);
}

// =============================================================================
// Cascade Tests
// =============================================================================

#[test]
fn test_engine_delete_category_cascades() {
    let (_temp, engine) = setup_temp_engine();
    let dairy = engine
        .list_categories()
        .into_iter()
        .find(|c| c.name == "Dairy & Eggs")
        .unwrap();
    let dairy_items = engine.list_items_by_category(dairy.id);
    assert_eq!(dairy_items.len(), 3);

    assert!(engine.delete_category(dairy.id));

    assert!(engine.get_category(dairy.id).is_none());
    assert!(engine.list_items_by_category(dairy.id).is_empty());
    for item in dairy_items {
        assert!(engine.get_item(item.id).is_none());
    }
    assert_eq!(engine.list_items().len(), 5);
}

// =============================================================================
// Write Fault Tests
// =============================================================================

#[test]
fn test_engine_write_fault_keeps_memory_state() {
    let (broken, engine) = setup_flaky_engine();
    broken.store(true, Ordering::SeqCst);

    let category = engine.create_category(NewCategory::new("Offline"));

    assert_eq!(engine.get_category(category.id), Some(category));
    assert_eq!(engine.persist_failures(), 1);
    assert!(engine.is_diverged());
}

#[test]
fn test_engine_next_successful_write_clears_divergence() {
    let (broken, engine) = setup_flaky_engine();
    broken.store(true, Ordering::SeqCst);
    engine.create_item(NewItem::new("a"));
    engine.create_item(NewItem::new("b"));
    assert_eq!(engine.persist_failures(), 2);

    broken.store(false, Ordering::SeqCst);
    engine.create_item(NewItem::new("c"));

    assert!(!engine.is_diverged());
    assert_eq!(engine.persist_failures(), 2);
}

#[test]
fn test_engine_flush_and_close_surface_faults() {
    let (broken, engine) = setup_flaky_engine();
    broken.store(true, Ordering::SeqCst);
    engine.create_item(NewItem::new("a"));

    assert!(engine.flush().is_err());
    assert!(engine.close().is_err());
}

#[test]
fn test_engine_close_retries_after_recovery() {
    let (broken, engine) = setup_flaky_engine();
    broken.store(true, Ordering::SeqCst);
    engine.create_item(NewItem::new("a"));

    broken.store(false, Ordering::SeqCst);
    assert!(engine.close().is_ok());
}

// =============================================================================
// Command Execution Tests
// =============================================================================

#[test]
fn test_engine_execute_create_and_list() {
    let (_temp, engine) = setup_temp_engine();

    let created = engine.execute(Command::CreateCategory(NewCategory::new("Snacks").with_order(5)));
    assert_eq!(created.status, Status::Ok);
    assert_eq!(created.payload.unwrap()["id"], 4);

    let listed = engine.execute(Command::ListCategories);
    let payload = listed.payload.unwrap();
    let categories = payload.as_array().unwrap();
    assert_eq!(categories.len(), 4);
    assert_eq!(categories[3]["name"], "Snacks");
    assert_eq!(categories[0]["items"].as_array().unwrap().len(), 3);
}

#[test]
fn test_engine_execute_not_found() {
    let (_temp, engine) = setup_temp_engine();

    let responses = [
        engine.execute(Command::GetItem { id: 77 }),
        engine.execute(Command::UpdateItem {
            id: 77,
            patch: ItemPatch::checked(true),
        }),
        engine.execute(Command::DeleteItem { id: 77 }),
        engine.execute(Command::UpdateCategory {
            id: 77,
            patch: CategoryPatch::default(),
        }),
        engine.execute(Command::DeleteCategory { id: 77 }),
    ];

    for response in responses {
        assert_eq!(response.status, Status::NotFound);
    }
}

#[test]
fn test_engine_execute_rejects_invalid_before_store() {
    let (temp, engine) = setup_temp_engine();

    let response = engine.execute(Command::CreateCategory(NewCategory::new("   ")));
    assert_eq!(response.status, Status::Invalid);

    let mut bad_item = NewItem::new("Milk");
    bad_item.quantity = Some(0);
    assert_eq!(engine.execute(Command::CreateItem(bad_item)).status, Status::Invalid);

    let response = engine.execute(Command::UpdateItem {
        id: 1,
        patch: ItemPatch::color_state(4),
    });
    assert_eq!(response.status, Status::Invalid);

    // Nothing reached the store
    assert_eq!(engine.stats().categories, 3);
    assert_eq!(engine.get_item(1).unwrap().color_state, 0);
    assert!(!temp.path().join("groceries.json").exists());
}

#[test]
fn test_engine_execute_delete_returns_flag() {
    let (_temp, engine) = setup_temp_engine();

    let response = engine.execute(Command::DeleteCategory { id: 1 });

    assert!(response.is_ok());
    assert_eq!(response.payload.unwrap()["deleted"], true);
}

// =============================================================================
// Concurrent Access Tests
// =============================================================================

#[test]
fn test_engine_concurrent_creates_get_unique_ids() {
    let (_temp, engine) = setup_temp_engine();
    let engine = Arc::new(engine);

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                (0..10)
                    .map(|i| engine.create_item(NewItem::new(format!("t{}-{}", t, i))).id)
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut ids: Vec<u64> = handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .collect();
    ids.sort_unstable();
    ids.dedup();

    assert_eq!(ids.len(), 40);
    assert_eq!(ids.first(), Some(&9));
    assert_eq!(ids.last(), Some(&48));
}
