use serde::{Deserialize, Serialize};

/// Reference to a bookmark group that may not have a resolved id yet.
///
/// A group created in one surface is broadcast to others before its id is
/// known; consumers upgrade the name-based reference to an id-based one once
/// creation resolves (see [`crate::broadcast::resolve_group_ref`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SelectedGroupRef {
    Id(String),
    Name(String),
}

/// Payload of the copy-to bridge. It decouples "initiate a copy" UI triggers
/// from the copy/move engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum CopyRequest {
    Group {
        from_workspace_id: String,
        group_id: String,
    },
    Bookmark {
        from_workspace_id: String,
        bookmark_ids: Vec<String>,
    },
    Workspace {
        workspace_id: String,
    },
}

/// Cross-surface notifications. Delivery is best-effort and at-least-once;
/// surfaces reconcile by re-reading the stores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum SurfaceEvent {
    /// Bookmark data changed somewhere; other surfaces should re-read.
    DataChanged { workspace_id: String },
    /// A group became the "last selected" one in some surface.
    GroupSelected {
        workspace_id: String,
        group: SelectedGroupRef,
    },
    /// A copy was initiated from a UI trigger.
    CopyRequested(CopyRequest),
}
