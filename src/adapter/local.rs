//! Local storage adapter.
//!
//! Reads and writes the authoritative collection for `(workspace, key)`
//! pairs through the key-value facade, and keeps the derived caches warm on
//! every write: the session index mirror immediately, the first-paint
//! snapshot via [`persist_caches_if_non_empty`](LocalAdapter::persist_caches_if_non_empty).

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::BookmarkStore;
use crate::cache::{blob_key, derive_index, index_key};
use crate::registry::scoped_key;
use crate::store::{KvFacade, SyncMirror};
use crate::types::bookmark::{BookmarkGroup, CacheSnapshot, GroupsIndexEntry};
use crate::types::errors::StoreError;
use crate::types::workspace::now_ms;

pub struct LocalAdapter {
    kv: Arc<KvFacade>,
    mirror: Arc<SyncMirror>,
}

impl LocalAdapter {
    pub fn new(kv: Arc<KvFacade>, mirror: Arc<SyncMirror>) -> Self {
        Self { kv, mirror }
    }

    /// Synchronous best-effort read of the first-paint snapshot.
    ///
    /// `None` means "nothing to show yet": the cache is absent or not an
    /// array. An empty painted collection is a valid state and comes back as
    /// `Some(vec![])`, distinct from `None`.
    pub fn read_phase1a_snapshot(&self, workspace_id: &str) -> Option<Vec<BookmarkGroup>> {
        let value = self.mirror.get(&blob_key(workspace_id))?;
        parse_groups_strict(&value)
    }

    /// The first-paint data wrapped as a timestamped snapshot, for the
    /// cross-tab session phase. Same emptiness rule as phase 1a.
    pub async fn read_phase1b_session_snapshot(
        &self,
        workspace_id: &str,
    ) -> Option<CacheSnapshot> {
        let data = self.read_phase1a_snapshot(workspace_id)?;
        Some(CacheSnapshot {
            data,
            at: now_ms(),
            etag: None,
        })
    }

    /// Fast groups index: session mirror first, with an unconditional
    /// fallback to the durable first-paint index on absence or failure.
    pub async fn read_groups_index_fast(&self, workspace_id: &str) -> Vec<GroupsIndexEntry> {
        let key = index_key(workspace_id);
        if let Some(value) = self.kv.session_get(&key).await {
            if let Ok(index) = serde_json::from_value::<Vec<GroupsIndexEntry>>(value) {
                return index;
            }
        }
        self.mirror
            .get(&key)
            .and_then(|value| serde_json::from_value(value).ok())
            .unwrap_or_default()
    }

    /// Re-warms both first-paint caches, but only with real data.
    ///
    /// Writing an empty collection would corrupt the "nothing loaded yet"
    /// signal phase 1a depends on, so empty input is ignored.
    pub async fn persist_caches_if_non_empty(&self, workspace_id: &str, groups: &[BookmarkGroup]) {
        if groups.is_empty() {
            return;
        }
        let index = derive_index(groups);
        let index_value = match serde_json::to_value(&index) {
            Ok(value) => value,
            Err(_) => return,
        };
        if let Ok(blob) = serde_json::to_value(groups) {
            self.mirror.set(blob_key(workspace_id), blob);
        }
        let key = index_key(workspace_id);
        self.mirror.set(key.clone(), index_value.clone());
        self.kv.session_set(key, index_value).await;
    }

    /// Generic namespaced read of workspace-scoped ancillary state.
    pub async fn get(&self, workspace_id: &str, key: &str) -> Result<Option<Value>, StoreError> {
        self.kv.get(&scoped_key(workspace_id, key)).await
    }

    /// Generic namespaced write of workspace-scoped ancillary state.
    pub async fn set(
        &self,
        workspace_id: &str,
        key: &str,
        value: Value,
    ) -> Result<(), StoreError> {
        self.kv.set(scoped_key(workspace_id, key), value).await
    }

    /// Generic namespaced remove of workspace-scoped ancillary state.
    pub async fn remove(&self, workspace_id: &str, key: &str) -> Result<(), StoreError> {
        self.kv.remove(&[scoped_key(workspace_id, key).as_str()]).await
    }
}

#[async_trait]
impl BookmarkStore for LocalAdapter {
    /// Returns `[]` when the scoped key is absent or holds malformed data.
    async fn read_all_groups(
        &self,
        workspace_id: &str,
        key: &str,
    ) -> Result<Vec<BookmarkGroup>, StoreError> {
        let raw = self.kv.get(&scoped_key(workspace_id, key)).await?;
        Ok(raw
            .and_then(|value| serde_json::from_value(value).ok())
            .unwrap_or_default())
    }

    /// Persists the full collection, then unconditionally refreshes the
    /// session index mirror.
    async fn write_all_groups(
        &self,
        workspace_id: &str,
        key: &str,
        groups: &[BookmarkGroup],
    ) -> Result<(), StoreError> {
        let value =
            serde_json::to_value(groups).map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.kv.set(scoped_key(workspace_id, key), value).await?;

        if let Ok(index) = serde_json::to_value(derive_index(groups)) {
            self.kv.session_set(index_key(workspace_id), index).await;
        }
        Ok(())
    }

    async fn clear_all_groups(&self, workspace_id: &str, key: &str) -> Result<(), StoreError> {
        self.kv
            .remove(&[scoped_key(workspace_id, key).as_str()])
            .await?;
        self.kv
            .session_remove(&[index_key(workspace_id).as_str()])
            .await;
        Ok(())
    }
}

/// Array values parse to a collection; anything else is "nothing yet".
fn parse_groups_strict(value: &Value) -> Option<Vec<BookmarkGroup>> {
    if !value.is_array() {
        return None;
    }
    serde_json::from_value(value.clone()).ok()
}
