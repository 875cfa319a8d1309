//! Per-surface session context.
//!
//! Each surface (popup, dashboard tab) constructs one `SurfaceContext` at
//! startup and threads it through explicitly; there is no ambient global
//! carrying the storage mode or active workspace.

use crate::types::workspace::StorageBackend;

/// Everything a surface needs to address its data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceContext {
    /// Signed-in user, when the remote backend is in play.
    pub user_id: Option<String>,
    pub storage_backend: StorageBackend,
    pub workspace_id: String,
}

/// Identity of one authoritative-load configuration. Hydration resolves the
/// backend once per key, so unrelated state changes never trigger redundant
/// fetches.
pub type AuthKey = (Option<String>, StorageBackend, String);

impl SurfaceContext {
    pub fn new(
        user_id: Option<String>,
        storage_backend: StorageBackend,
        workspace_id: impl Into<String>,
    ) -> Self {
        Self {
            user_id,
            storage_backend,
            workspace_id: workspace_id.into(),
        }
    }

    pub fn auth_key(&self) -> AuthKey {
        (
            self.user_id.clone(),
            self.storage_backend,
            self.workspace_id.clone(),
        )
    }
}
