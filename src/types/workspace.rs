use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Registry format version written by this build.
pub const REGISTRY_VERSION: u32 = 1;

/// Which physical backend holds a workspace's bookmark data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StorageBackend {
    Local,
    Remote,
}

impl Default for StorageBackend {
    fn default() -> Self {
        StorageBackend::Local
    }
}

/// A single isolated bookmark workspace.
///
/// Workspaces are never deleted, only archived (soft-hide), so ancillary
/// scoped keys stay recoverable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub storage_backend: StorageBackend,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
    #[serde(default)]
    pub archived: bool,
}

impl Workspace {
    /// Builds a fresh local workspace with both timestamps set to now.
    pub fn new_local(id: impl Into<String>, name: impl Into<String>) -> Self {
        let now = now_ms();
        Self {
            id: id.into(),
            name: name.into(),
            storage_backend: StorageBackend::Local,
            created_at: now,
            updated_at: now,
            archived: false,
        }
    }

    /// Bumps `updated_at` to the current time.
    pub fn touch(&mut self) {
        self.updated_at = now_ms();
    }
}

/// Durable record of all workspaces and which one is active.
///
/// Single instance per installation, stored under one well-known unscoped
/// key. All mutation paths read-modify-write the whole record; last writer
/// wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceRegistry {
    pub version: u32,
    pub active_id: String,
    pub items: BTreeMap<String, Workspace>,
    /// Once true, legacy-format migration never runs again.
    #[serde(rename = "migratedLegacyFlag", default)]
    pub migrated_legacy: bool,
}

impl WorkspaceRegistry {
    /// Builds a v1 registry containing the given workspaces with `active_id`
    /// marked active.
    pub fn with_items(active_id: impl Into<String>, items: BTreeMap<String, Workspace>) -> Self {
        Self {
            version: REGISTRY_VERSION,
            active_id: active_id.into(),
            items,
            migrated_legacy: false,
        }
    }

    /// Workspaces that are not archived.
    pub fn live_workspaces(&self) -> impl Iterator<Item = &Workspace> {
        self.items.values().filter(|w| !w.archived)
    }
}

/// Current UNIX timestamp in milliseconds.
pub fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}
