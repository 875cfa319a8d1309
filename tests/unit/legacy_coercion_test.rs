//! Unit tests for legacy storage-shape coercion.
//!
//! Three pre-registry layouts must normalize into a v1 registry on
//! initialization, deleting the legacy keys they consumed.

use std::sync::Arc;

use markdock::registry::{
    RegistryStore, DEFAULT_WORKSPACE_NAME, LEGACY_ACTIVE_KEY, LEGACY_ITEMS_KEY, REGISTRY_KEY,
};
use markdock::store::{Entries, KvFacade, MemoryArea, StorageArea};
use rstest::rstest;
use serde_json::{json, Value};

fn setup() -> (Arc<MemoryArea>, RegistryStore) {
    let durable = Arc::new(MemoryArea::new());
    let kv = KvFacade::new(durable.clone(), Arc::new(MemoryArea::new()));
    (durable, RegistryStore::new(Arc::new(kv)))
}

async fn seed(durable: &MemoryArea, key: &str, value: Value) {
    let mut entries = Entries::new();
    entries.insert(key.to_string(), value);
    durable.set(entries).await.unwrap();
}

fn legacy_workspace(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "storageBackend": "LOCAL",
        "createdAt": 1000,
        "updatedAt": 1000,
    })
}

/// Shape (a): separate items map and active-id string.
#[tokio::test]
async fn test_split_legacy_keys_migrate_to_v1() {
    let (durable, store) = setup();
    seed(
        &durable,
        LEGACY_ITEMS_KEY,
        json!({
            "ws-a": legacy_workspace("ws-a", "Alpha"),
            "ws-b": legacy_workspace("ws-b", "Beta"),
        }),
    )
    .await;
    seed(&durable, LEGACY_ACTIVE_KEY, json!("ws-b")).await;

    let registry = store.initialize_registry().await.unwrap();

    assert_eq!(registry.version, 1);
    assert_eq!(registry.active_id, "ws-b");
    assert_eq!(registry.items.len(), 2);
    assert_eq!(registry.items["ws-a"].name, "Alpha");

    // Consumed legacy keys are gone
    let all = durable.get_all().await.unwrap();
    assert!(!all.contains_key(LEGACY_ITEMS_KEY));
    assert!(!all.contains_key(LEGACY_ACTIVE_KEY));
    assert!(all.contains_key(REGISTRY_KEY));
}

/// Shape (b): bare active-id string at the registry key, no legacy items;
/// a default workspace is fabricated for it.
#[tokio::test]
async fn test_bare_string_becomes_active_id_with_fabricated_workspace() {
    let (durable, store) = setup();
    seed(&durable, REGISTRY_KEY, json!("ws-9")).await;

    let registry = store.initialize_registry().await.unwrap();

    assert_eq!(registry.active_id, "ws-9");
    let ws = &registry.items["ws-9"];
    assert_eq!(ws.name, DEFAULT_WORKSPACE_NAME);
}

/// Shape (b) variant: bare string plus surviving legacy items; the items
/// are reused and their key deleted.
#[tokio::test]
async fn test_bare_string_reuses_legacy_items_when_present() {
    let (durable, store) = setup();
    seed(&durable, REGISTRY_KEY, json!("ws-a")).await;
    seed(
        &durable,
        LEGACY_ITEMS_KEY,
        json!({ "ws-a": legacy_workspace("ws-a", "Kept") }),
    )
    .await;

    let registry = store.initialize_registry().await.unwrap();

    assert_eq!(registry.active_id, "ws-a");
    assert_eq!(registry.items["ws-a"].name, "Kept");
    let all = durable.get_all().await.unwrap();
    assert!(!all.contains_key(LEGACY_ITEMS_KEY));
}

/// Shape (c): raw items map with no version wrapper, wrapped as v1 with
/// the first key active.
#[tokio::test]
async fn test_raw_items_map_is_wrapped_with_first_key_active() {
    let (durable, store) = setup();
    seed(
        &durable,
        REGISTRY_KEY,
        json!({
            "alpha": legacy_workspace("alpha", "First"),
            "beta": legacy_workspace("beta", "Second"),
        }),
    )
    .await;

    let registry = store.initialize_registry().await.unwrap();

    assert_eq!(registry.version, 1);
    assert_eq!(registry.active_id, "alpha");
    assert_eq!(registry.items.len(), 2);
}

/// Coercion always ends in the same normalized v1 state: version 1, a live
/// active workspace, and the migration flag set.
#[rstest]
#[case::split_keys(None, Some(json!({"ws-x": {"id": "ws-x", "name": "X"}})), Some(json!("ws-x")))]
#[case::bare_string(Some(json!("ws-x")), None, None)]
#[case::raw_map(Some(json!({"ws-x": {"id": "ws-x", "name": "X"}})), None, None)]
#[tokio::test]
async fn test_every_legacy_shape_normalizes_to_v1(
    #[case] registry_raw: Option<Value>,
    #[case] items_raw: Option<Value>,
    #[case] active_raw: Option<Value>,
) {
    let (durable, store) = setup();
    if let Some(value) = registry_raw {
        seed(&durable, REGISTRY_KEY, value).await;
    }
    if let Some(value) = items_raw {
        seed(&durable, LEGACY_ITEMS_KEY, value).await;
    }
    if let Some(value) = active_raw {
        seed(&durable, LEGACY_ACTIVE_KEY, value).await;
    }

    let registry = store.initialize_registry().await.unwrap();

    assert_eq!(registry.version, 1);
    assert_eq!(registry.active_id, "ws-x");
    assert!(registry.items.contains_key("ws-x"));
    assert!(registry.migrated_legacy);
}

/// Legacy entries that no longer parse as a full workspace are rebuilt from
/// their key and surviving name.
#[tokio::test]
async fn test_partial_legacy_entries_are_rebuilt() {
    let (durable, store) = setup();
    seed(
        &durable,
        REGISTRY_KEY,
        json!({ "ws-p": {"name": "Partial"} }),
    )
    .await;

    let registry = store.initialize_registry().await.unwrap();

    let ws = &registry.items["ws-p"];
    assert_eq!(ws.id, "ws-p");
    assert_eq!(ws.name, "Partial");
}
