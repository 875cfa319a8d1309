//! Workspace registry: the single source of truth for which workspaces
//! exist and which one is active.
//!
//! The registry is one JSON document under a well-known unscoped key. All
//! mutation paths read-modify-write the whole document through
//! [`RegistryStore::ensure_registry`]; concurrent surfaces race with
//! last-write-wins semantics, accepted because the contention window of
//! interactive edits is narrow and recoverable by reload.

pub mod legacy;

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;
use uuid::Uuid;

use crate::store::KvFacade;
use crate::types::errors::{RegistryError, StoreError};
use crate::types::workspace::{Workspace, WorkspaceRegistry, REGISTRY_VERSION};

/// Well-known unscoped key holding the registry document.
pub const REGISTRY_KEY: &str = "workspaceRegistry";
/// Pre-registry key holding the raw items map.
pub const LEGACY_ITEMS_KEY: &str = "workspacesById";
/// Pre-registry key holding the active workspace id.
pub const LEGACY_ACTIVE_KEY: &str = "activeWorkspaceId";

/// Id and name of the workspace created on first run.
pub const DEFAULT_WORKSPACE_ID: &str = "default";
pub const DEFAULT_WORKSPACE_NAME: &str = "My Bookmarks";

/// Prefix of every workspace-scoped durable key.
pub const WORKSPACE_KEY_PREFIX: &str = "WS_";

/// Physical key for a workspace-scoped logical key.
pub fn scoped_key(workspace_id: &str, key: &str) -> String {
    format!("{}{}__{}", WORKSPACE_KEY_PREFIX, workspace_id, key)
}

/// Registry operations over the key-value facade.
pub struct RegistryStore {
    kv: Arc<KvFacade>,
}

impl RegistryStore {
    pub fn new(kv: Arc<KvFacade>) -> Self {
        Self { kv }
    }

    /// Loads the registry, or `None` when no v1 registry exists yet.
    ///
    /// A value in any legacy shape also yields `None` here; only
    /// [`initialize_registry`](Self::initialize_registry) interprets those.
    pub async fn load(&self) -> Result<Option<WorkspaceRegistry>, RegistryError> {
        let raw = self.kv.get(REGISTRY_KEY).await.map_err(store_err)?;
        Ok(raw.as_ref().and_then(parse_v1))
    }

    /// Persists the registry verbatim. No merge logic; last writer wins.
    pub async fn save(&self, registry: &WorkspaceRegistry) -> Result<(), RegistryError> {
        let value = serde_json::to_value(registry)
            .map_err(|e| RegistryError::Store(e.to_string()))?;
        self.kv.set(REGISTRY_KEY, value).await.map_err(store_err)
    }

    /// Loads the registry, bootstrapping it when absent.
    pub async fn ensure_registry(&self) -> Result<WorkspaceRegistry, RegistryError> {
        match self.load().await? {
            Some(registry) if registry.migrated_legacy => Ok(registry),
            _ => self.initialize_registry().await,
        }
    }

    /// Idempotent bootstrap.
    ///
    /// In order: an existing v1 registry is kept as-is; else any legacy
    /// shape is coerced to v1 and its consumed keys deleted; else a default
    /// workspace is created. Finally the one-time migration of unscoped
    /// durable keys into the active workspace's namespace runs, guarded by
    /// the `migratedLegacyFlag`.
    pub async fn initialize_registry(&self) -> Result<WorkspaceRegistry, RegistryError> {
        let raw = self
            .kv
            .get_many(&[REGISTRY_KEY, LEGACY_ITEMS_KEY, LEGACY_ACTIVE_KEY])
            .await
            .map_err(store_err)?;

        let mut registry = if let Some(registry) = raw.get(REGISTRY_KEY).and_then(parse_v1) {
            registry
        } else if let Some(shape) = legacy::detect(
            raw.get(REGISTRY_KEY),
            raw.get(LEGACY_ITEMS_KEY),
            raw.get(LEGACY_ACTIVE_KEY),
        ) {
            let coerced = shape.coerce();
            if !coerced.consumed_keys.is_empty() {
                self.kv
                    .remove(&coerced.consumed_keys)
                    .await
                    .map_err(store_err)?;
            }
            self.save(&coerced.registry).await?;
            coerced.registry
        } else {
            let workspace = Workspace::new_local(DEFAULT_WORKSPACE_ID, DEFAULT_WORKSPACE_NAME);
            let mut items = BTreeMap::new();
            items.insert(workspace.id.clone(), workspace);
            let registry = WorkspaceRegistry::with_items(DEFAULT_WORKSPACE_ID, items);
            self.save(&registry).await?;
            registry
        };

        if !registry.migrated_legacy {
            self.migrate_unscoped_keys(&mut registry).await?;
        }
        Ok(registry)
    }

    /// Moves every unscoped durable key under the active workspace's
    /// namespace, then sets the one-time flag so this never runs again.
    async fn migrate_unscoped_keys(
        &self,
        registry: &mut WorkspaceRegistry,
    ) -> Result<(), RegistryError> {
        let all = self.kv.get_all().await.map_err(store_err)?;
        for (key, value) in all {
            if key == REGISTRY_KEY || key.starts_with(WORKSPACE_KEY_PREFIX) {
                continue;
            }
            self.kv
                .set(scoped_key(&registry.active_id, &key), value)
                .await
                .map_err(store_err)?;
            self.kv.remove(&[key.as_str()]).await.map_err(store_err)?;
        }
        registry.migrated_legacy = true;
        self.save(registry).await
    }

    /// Resolves the active workspace, lazily initializing the registry.
    ///
    /// When `active_id` points at a missing entry the registry picks the
    /// first live workspace and persists the repair.
    pub async fn get_active_workspace(&self) -> Result<Workspace, RegistryError> {
        let mut registry = self.ensure_registry().await?;
        if let Some(workspace) = registry.items.get(&registry.active_id) {
            return Ok(workspace.clone());
        }
        let fallback = registry.live_workspaces().next().map(|w| w.id.clone());
        match fallback {
            Some(id) => {
                registry.active_id = id.clone();
                self.save(&registry).await?;
                Ok(registry.items[&id].clone())
            }
            None => Err(RegistryError::NotFound(registry.active_id)),
        }
    }

    pub async fn get_active_workspace_id(&self) -> Result<String, RegistryError> {
        Ok(self.get_active_workspace().await?.id)
    }

    /// Makes the given workspace active, bumping its `updated_at`.
    pub async fn set_active_workspace(&self, id: &str) -> Result<(), RegistryError> {
        let mut registry = self.ensure_registry().await?;
        let workspace = registry
            .items
            .get_mut(id)
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))?;
        workspace.touch();
        registry.active_id = id.to_string();
        self.save(&registry).await
    }

    /// Workspaces sorted by `created_at` ascending; archived ones excluded
    /// unless requested.
    pub async fn list_local_workspaces(
        &self,
        include_archived: bool,
    ) -> Result<Vec<Workspace>, RegistryError> {
        let registry = self.ensure_registry().await?;
        let mut workspaces: Vec<Workspace> = registry
            .items
            .values()
            .filter(|w| include_archived || !w.archived)
            .cloned()
            .collect();
        workspaces.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(workspaces)
    }

    /// Creates a fresh local workspace, makes it active, and returns it.
    pub async fn create_local_workspace(&self, name: &str) -> Result<Workspace, RegistryError> {
        let mut registry = self.ensure_registry().await?;
        let workspace = Workspace::new_local(Uuid::new_v4().to_string(), name);
        registry.active_id = workspace.id.clone();
        registry
            .items
            .insert(workspace.id.clone(), workspace.clone());
        self.save(&registry).await?;
        Ok(workspace)
    }

    /// Renames a workspace. Unknown ids are a no-op.
    pub async fn rename_workspace(&self, id: &str, name: &str) -> Result<(), RegistryError> {
        let mut registry = self.ensure_registry().await?;
        match registry.items.get_mut(id) {
            Some(workspace) => {
                workspace.name = name.to_string();
                workspace.touch();
                self.save(&registry).await
            }
            None => Ok(()),
        }
    }

    /// Archives a workspace (soft-hide; never deleted).
    ///
    /// Silently no-ops when archiving would leave zero live workspaces. If
    /// the archived workspace was active, the default workspace takes over
    /// when it is live, else the oldest remaining live one.
    pub async fn archive_workspace(&self, id: &str) -> Result<(), RegistryError> {
        let mut registry = self.ensure_registry().await?;
        let Some(target) = registry.items.get(id) else {
            return Ok(());
        };
        if target.archived {
            return Ok(());
        }
        let has_other_live = registry.live_workspaces().any(|w| w.id != id);
        if !has_other_live {
            return Ok(());
        }

        if let Some(workspace) = registry.items.get_mut(id) {
            workspace.archived = true;
            workspace.touch();
        }

        if registry.active_id == id {
            let default_live = registry
                .items
                .get(DEFAULT_WORKSPACE_ID)
                .map(|w| !w.archived)
                .unwrap_or(false);
            registry.active_id = if default_live {
                DEFAULT_WORKSPACE_ID.to_string()
            } else {
                let mut live: Vec<&Workspace> = registry.live_workspaces().collect();
                live.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
                live.first()
                    .map(|w| w.id.clone())
                    .unwrap_or_else(|| registry.active_id.clone())
            };
        }
        self.save(&registry).await
    }
}

/// Parses a stored value as a v1 registry; anything else is "not created
/// yet" (legacy shapes included).
fn parse_v1(value: &Value) -> Option<WorkspaceRegistry> {
    let version = value.get("version")?.as_u64()?;
    if version != u64::from(REGISTRY_VERSION) {
        return None;
    }
    serde_json::from_value(value.clone()).ok()
}

fn store_err(e: StoreError) -> RegistryError {
    RegistryError::Store(e.to_string())
}
