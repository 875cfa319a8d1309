//! Derived first-paint caches.
//!
//! Two projections are kept warm per workspace: a full snapshot blob for the
//! synchronous first paint and a tiny groups index for list UIs. Both are
//! disposable, always rebuildable from the storage adapter, so
//! they carry only a staleness contract, never a correctness one.

use crate::types::bookmark::{BookmarkGroup, GroupsIndexEntry};

/// Versioned key of the full first-paint snapshot for a workspace.
pub fn blob_key(workspace_id: &str) -> String {
    format!("WS_{}::groups_blob_v1", workspace_id)
}

/// Versioned key of the tiny groups index for a workspace.
pub fn index_key(workspace_id: &str) -> String {
    format!("WS_{}::groups_index_v1", workspace_id)
}

/// Projects a collection down to its index entries.
pub fn derive_index(groups: &[BookmarkGroup]) -> Vec<GroupsIndexEntry> {
    groups
        .iter()
        .map(|g| GroupsIndexEntry {
            id: g.id.clone(),
            group_name: g.group_name.clone(),
        })
        .collect()
}
