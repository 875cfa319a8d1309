//! Storage adapters: authoritative reads/writes of a workspace's bookmark
//! collection, behind one backend-agnostic contract.

pub mod local;
pub mod remote;

use async_trait::async_trait;

use crate::types::bookmark::BookmarkGroup;
use crate::types::errors::StoreError;

/// Default logical key under which a workspace's collection is stored.
pub const GROUPS_STORAGE_KEY: &str = "bookmarkGroups";

/// Backend-agnostic access to one workspace's bookmark collection.
///
/// Reads are lenient: absent or malformed data is "no data yet" and comes
/// back as `[]`, never an error. Writes are authoritative and surface their
/// failures.
#[async_trait]
pub trait BookmarkStore: Send + Sync {
    async fn read_all_groups(
        &self,
        workspace_id: &str,
        key: &str,
    ) -> Result<Vec<BookmarkGroup>, StoreError>;

    async fn write_all_groups(
        &self,
        workspace_id: &str,
        key: &str,
        groups: &[BookmarkGroup],
    ) -> Result<(), StoreError>;

    async fn clear_all_groups(&self, workspace_id: &str, key: &str) -> Result<(), StoreError>;
}
