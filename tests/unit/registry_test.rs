//! Unit tests for the workspace registry public API.
//!
//! Exercises bootstrap, the one-time unscoped-key migration, activation,
//! listing, renaming, and the archive invariants through `RegistryStore`
//! backed by in-memory areas.

use std::collections::BTreeMap;
use std::sync::Arc;

use markdock::registry::{
    scoped_key, RegistryStore, DEFAULT_WORKSPACE_ID, DEFAULT_WORKSPACE_NAME, REGISTRY_KEY,
};
use markdock::store::{KvFacade, MemoryArea, StorageArea};
use markdock::types::errors::RegistryError;
use markdock::types::workspace::{Workspace, WorkspaceRegistry};
use serde_json::json;

fn setup() -> (Arc<MemoryArea>, RegistryStore) {
    let durable = Arc::new(MemoryArea::new());
    let kv = KvFacade::new(durable.clone(), Arc::new(MemoryArea::new()));
    (durable, RegistryStore::new(Arc::new(kv)))
}

/// Builds a registry with the given (id, created_at) pairs, first id active.
fn registry_of(entries: &[(&str, i64)]) -> WorkspaceRegistry {
    let mut items = BTreeMap::new();
    for (id, created_at) in entries {
        let mut ws = Workspace::new_local(*id, format!("ws {}", id));
        ws.created_at = *created_at;
        items.insert(id.to_string(), ws);
    }
    let mut reg = WorkspaceRegistry::with_items(entries[0].0, items);
    reg.migrated_legacy = true;
    reg
}

#[tokio::test]
async fn test_initialize_creates_default_workspace() {
    let (_durable, store) = setup();

    let registry = store.initialize_registry().await.unwrap();

    assert_eq!(registry.version, 1);
    assert_eq!(registry.active_id, DEFAULT_WORKSPACE_ID);
    assert!(registry.migrated_legacy);
    let ws = &registry.items[DEFAULT_WORKSPACE_ID];
    assert_eq!(ws.name, DEFAULT_WORKSPACE_NAME);
    assert!(!ws.archived);
}

#[tokio::test]
async fn test_initialize_is_idempotent() {
    let (durable, store) = setup();

    // A pre-scoped key must never be migrated again
    let mut entries = markdock::store::Entries::new();
    entries.insert(scoped_key("default", "settings"), json!({"theme": "dark"}));
    durable.set(entries).await.unwrap();

    let first = store.initialize_registry().await.unwrap();
    let raw_first = durable.get(&[REGISTRY_KEY]).await.unwrap()[REGISTRY_KEY].clone();

    let second = store.initialize_registry().await.unwrap();
    let raw_second = durable.get(&[REGISTRY_KEY]).await.unwrap()[REGISTRY_KEY].clone();

    assert_eq!(first, second);
    assert_eq!(raw_first, raw_second);

    // Exactly one copy of the scoped key, no double prefix
    let all = durable.get_all().await.unwrap();
    let scoped: Vec<&String> = all.keys().filter(|k| k.contains("settings")).collect();
    assert_eq!(scoped, vec![&scoped_key("default", "settings")]);
}

#[tokio::test]
async fn test_migration_moves_unscoped_keys_and_deletes_originals() {
    let (durable, store) = setup();

    let mut entries = markdock::store::Entries::new();
    entries.insert("pinnedGroups".to_string(), json!(["g1"]));
    entries.insert("viewMode".to_string(), json!("grid"));
    durable.set(entries).await.unwrap();

    let registry = store.initialize_registry().await.unwrap();
    assert!(registry.migrated_legacy);

    let all = durable.get_all().await.unwrap();
    assert!(!all.contains_key("pinnedGroups"));
    assert!(!all.contains_key("viewMode"));
    assert_eq!(
        all[&scoped_key(&registry.active_id, "pinnedGroups")],
        json!(["g1"])
    );
    assert_eq!(
        all[&scoped_key(&registry.active_id, "viewMode")],
        json!("grid")
    );
    // The registry key itself is never moved
    assert!(all.contains_key(REGISTRY_KEY));
}

#[tokio::test]
async fn test_save_load_roundtrip() {
    let (_durable, store) = setup();
    let registry = registry_of(&[("a", 10), ("b", 20)]);

    store.save(&registry).await.unwrap();
    let loaded = store.load().await.unwrap().unwrap();

    assert_eq!(loaded, registry);
}

#[tokio::test]
async fn test_set_active_unknown_id_fails() {
    let (_durable, store) = setup();
    store.initialize_registry().await.unwrap();

    let err = store.set_active_workspace("no-such-id").await.unwrap_err();
    assert!(matches!(err, RegistryError::NotFound(_)));
}

#[tokio::test]
async fn test_set_active_bumps_updated_at() {
    let (_durable, store) = setup();
    let mut registry = registry_of(&[("a", 10), ("b", 20)]);
    registry.items.get_mut("b").unwrap().updated_at = 0;
    store.save(&registry).await.unwrap();

    store.set_active_workspace("b").await.unwrap();

    let loaded = store.load().await.unwrap().unwrap();
    assert_eq!(loaded.active_id, "b");
    assert!(loaded.items["b"].updated_at > 0);
}

#[tokio::test]
async fn test_create_workspace_becomes_active() {
    let (_durable, store) = setup();
    store.initialize_registry().await.unwrap();

    let created = store.create_local_workspace("Research").await.unwrap();

    assert_eq!(store.get_active_workspace_id().await.unwrap(), created.id);
    let listed = store.list_local_workspaces(false).await.unwrap();
    assert!(listed.iter().any(|w| w.id == created.id && w.name == "Research"));
}

#[tokio::test]
async fn test_list_sorts_by_created_at_and_hides_archived() {
    let (_durable, store) = setup();
    let mut registry = registry_of(&[("old", 100), ("new", 300), ("mid", 200)]);
    registry.items.get_mut("mid").unwrap().archived = true;
    store.save(&registry).await.unwrap();

    let visible = store.list_local_workspaces(false).await.unwrap();
    let ids: Vec<&str> = visible.iter().map(|w| w.id.as_str()).collect();
    assert_eq!(ids, vec!["old", "new"]);

    let all = store.list_local_workspaces(true).await.unwrap();
    let ids: Vec<&str> = all.iter().map(|w| w.id.as_str()).collect();
    assert_eq!(ids, vec!["old", "mid", "new"]);
}

#[tokio::test]
async fn test_rename_unknown_workspace_is_noop() {
    let (_durable, store) = setup();
    store.initialize_registry().await.unwrap();

    store.rename_workspace("ghost", "Phantom").await.unwrap();

    let registry = store.load().await.unwrap().unwrap();
    assert!(!registry.items.contains_key("ghost"));
}

#[tokio::test]
async fn test_rename_updates_name_and_timestamp() {
    let (_durable, store) = setup();
    let mut registry = registry_of(&[("a", 10)]);
    registry.items.get_mut("a").unwrap().updated_at = 0;
    store.save(&registry).await.unwrap();

    store.rename_workspace("a", "Renamed").await.unwrap();

    let loaded = store.load().await.unwrap().unwrap();
    assert_eq!(loaded.items["a"].name, "Renamed");
    assert!(loaded.items["a"].updated_at > 0);
}

#[tokio::test]
async fn test_archive_refuses_to_orphan_last_live_workspace() {
    let (_durable, store) = setup();
    let registry = registry_of(&[("only", 1)]);
    store.save(&registry).await.unwrap();

    store.archive_workspace("only").await.unwrap();

    let loaded = store.load().await.unwrap().unwrap();
    assert!(!loaded.items["only"].archived);
    assert_eq!(store.get_active_workspace_id().await.unwrap(), "only");
}

#[tokio::test]
async fn test_archive_active_falls_back_to_default_when_live() {
    let (_durable, store) = setup();
    let mut registry = registry_of(&[("current", 50), (DEFAULT_WORKSPACE_ID, 10)]);
    registry.active_id = "current".to_string();
    store.save(&registry).await.unwrap();

    store.archive_workspace("current").await.unwrap();

    let loaded = store.load().await.unwrap().unwrap();
    assert!(loaded.items["current"].archived);
    assert_eq!(loaded.active_id, DEFAULT_WORKSPACE_ID);
}

#[tokio::test]
async fn test_archive_active_falls_back_to_oldest_live_without_default() {
    let (_durable, store) = setup();
    let mut registry = registry_of(&[("current", 50), ("older", 20), ("newer", 90)]);
    registry.active_id = "current".to_string();
    store.save(&registry).await.unwrap();

    store.archive_workspace("current").await.unwrap();

    let loaded = store.load().await.unwrap().unwrap();
    assert_eq!(loaded.active_id, "older");
    assert!(!loaded.items[&loaded.active_id].archived);
}

#[tokio::test]
async fn test_active_id_never_resolves_to_archived_workspace() {
    let (_durable, store) = setup();
    let mut registry = registry_of(&[("a", 1), ("b", 2)]);
    registry.active_id = "a".to_string();
    store.save(&registry).await.unwrap();

    store.archive_workspace("a").await.unwrap();

    let active = store.get_active_workspace().await.unwrap();
    assert_ne!(active.id, "a");
    assert!(!active.archived);
}
