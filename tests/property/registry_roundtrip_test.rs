//! Property-based tests for registry persistence.
//!
//! For any valid registry object, `save` followed by `load` is the
//! identity.

use std::collections::BTreeMap;
use std::sync::Arc;

use markdock::registry::RegistryStore;
use markdock::store::{KvFacade, MemoryArea};
use markdock::types::workspace::{StorageBackend, Workspace, WorkspaceRegistry};
use proptest::prelude::*;

fn arb_id() -> impl Strategy<Value = String> {
    "[a-z0-9-]{4,12}"
}

fn arb_name() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z0-9 ]{0,24}"
}

fn arb_workspace(id: String) -> impl Strategy<Value = Workspace> {
    (
        arb_name(),
        prop_oneof![Just(StorageBackend::Local), Just(StorageBackend::Remote)],
        0i64..2_000_000_000_000,
        0i64..2_000_000_000_000,
        any::<bool>(),
    )
        .prop_map(
            move |(name, storage_backend, created_at, updated_at, archived)| Workspace {
                id: id.clone(),
                name,
                storage_backend,
                created_at,
                updated_at,
                archived,
            },
        )
}

fn arb_registry() -> impl Strategy<Value = WorkspaceRegistry> {
    proptest::collection::btree_set(arb_id(), 1..6)
        .prop_flat_map(|ids| {
            let ids: Vec<String> = ids.into_iter().collect();
            let workspaces: Vec<_> = ids.iter().cloned().map(arb_workspace).collect();
            let active_index = 0..ids.len();
            (workspaces, active_index, any::<bool>()).prop_map(
                move |(workspaces, active_index, migrated_legacy)| {
                    let mut items = BTreeMap::new();
                    for ws in workspaces {
                        items.insert(ws.id.clone(), ws);
                    }
                    let active_id = items.keys().nth(active_index).cloned().unwrap_or_default();
                    let mut registry = WorkspaceRegistry::with_items(active_id, items);
                    registry.migrated_legacy = migrated_legacy;
                    registry
                },
            )
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn registry_save_load_is_identity(registry in arb_registry()) {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("failed to build runtime");

        let loaded = rt.block_on(async {
            let kv = KvFacade::new(Arc::new(MemoryArea::new()), Arc::new(MemoryArea::new()));
            let store = RegistryStore::new(Arc::new(kv));

            store.save(&registry).await.expect("save should succeed");
            store
                .load()
                .await
                .expect("load should succeed")
                .expect("saved registry should be present")
        });

        prop_assert_eq!(loaded, registry);
    }
}
