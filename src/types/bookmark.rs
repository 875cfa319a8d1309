use serde::{Deserialize, Serialize};

/// Group name used by the UI for an empty/unnamed placeholder group.
///
/// The storage layer treats groups carrying this name as ordinary data.
pub const EMPTY_GROUP_NAME: &str = "Unnamed";

/// Represents a saved bookmark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    pub id: String,
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub created_at: i64,
}

/// A named collection of bookmarks, the unit the grid UI renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkGroup {
    pub id: String,
    pub group_name: String,
    #[serde(default)]
    pub bookmarks: Vec<Bookmark>,
}

/// Minimal projection of a group, used by list UIs before full hydration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupsIndexEntry {
    pub id: String,
    pub group_name: String,
}

/// Timestamped copy of a workspace's full bookmark collection.
///
/// Snapshots are derived, disposable state: they can always be rebuilt from
/// the authoritative adapter and carry only a staleness contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheSnapshot {
    pub data: Vec<BookmarkGroup>,
    pub at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
}
