//! Multi-phase hydration pipeline.
//!
//! Delivers a three-stage progressive load per surface mount: a synchronous
//! best-effort snapshot for the very first render, a cross-tab session
//! snapshot shortly after, then the authoritative background load that
//! reconciles and re-warms the caches. Transitions are one-directional and
//! a later phase never paints strictly-worse data over an earlier one.

use std::sync::Arc;
use std::sync::Mutex;

use tracing::warn;

use crate::adapter::local::LocalAdapter;
use crate::adapter::remote::RemoteAdapter;
use crate::adapter::BookmarkStore;
use crate::cache::derive_index;
use crate::context::{AuthKey, SurfaceContext};
use crate::types::bookmark::{BookmarkGroup, GroupsIndexEntry};
use crate::types::workspace::StorageBackend;

/// Pipeline progress. Ordered; the pipeline only ever advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum HydrationPhase {
    Cold,
    SeededSync,
    SeededSession,
    Hydrated,
}

type PaintListener = Box<dyn Fn(&[BookmarkGroup]) + Send + Sync>;

struct PipelineState {
    phase: HydrationPhase,
    painted: Vec<BookmarkGroup>,
    index: Vec<GroupsIndexEntry>,
    /// Auth key the last authoritative load ran for; repeat hydration
    /// attempts under the same key are deduplicated.
    hydrated_for: Option<AuthKey>,
}

pub struct HydrationPipeline {
    ctx: SurfaceContext,
    storage_key: String,
    local: Arc<LocalAdapter>,
    remote: Option<Arc<RemoteAdapter>>,
    /// When the authoritative backend is Remote, whether a remote failure
    /// may fall back to local data instead of showing an empty result.
    allow_local_fallback: bool,
    state: Mutex<PipelineState>,
    /// Serializes authoritative loads and their cache writes; re-entrant
    /// hydration attempts queue here instead of racing.
    gate: tokio::sync::Mutex<()>,
    listener: Option<PaintListener>,
}

impl HydrationPipeline {
    pub fn new(
        ctx: SurfaceContext,
        storage_key: impl Into<String>,
        local: Arc<LocalAdapter>,
        remote: Option<Arc<RemoteAdapter>>,
    ) -> Self {
        Self {
            ctx,
            storage_key: storage_key.into(),
            local,
            remote,
            allow_local_fallback: false,
            state: Mutex::new(PipelineState {
                phase: HydrationPhase::Cold,
                painted: Vec::new(),
                index: Vec::new(),
                hydrated_for: None,
            }),
            gate: tokio::sync::Mutex::new(()),
            listener: None,
        }
    }

    /// Permits stale local data when the remote backend fails.
    pub fn allow_local_fallback(mut self, allow: bool) -> Self {
        self.allow_local_fallback = allow;
        self
    }

    /// Registers a repaint callback, invoked on every applied paint.
    pub fn with_listener(mut self, listener: impl Fn(&[BookmarkGroup]) + Send + Sync + 'static) -> Self {
        self.listener = Some(Box::new(listener));
        self
    }

    fn state_guard(&self) -> std::sync::MutexGuard<'_, PipelineState> {
        // a poisoned paint state is still safe to reuse
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn phase(&self) -> HydrationPhase {
        self.state_guard().phase
    }

    /// The currently painted collection.
    pub fn painted(&self) -> Vec<BookmarkGroup> {
        self.state_guard().painted.clone()
    }

    /// Lightweight index for list UIs, available before full hydration.
    pub fn groups_index(&self) -> Vec<GroupsIndexEntry> {
        self.state_guard().index.clone()
    }

    /// Full three-phase load. Phase 1a completes synchronously inside this
    /// call before any async work starts.
    pub async fn hydrate(&self) {
        self.seed_sync();
        self.seed_session().await;
        self.run_authoritative(false).await;
    }

    /// Phase 1a: synchronous first-paint seed.
    pub fn seed_sync(&self) {
        if self.phase() != HydrationPhase::Cold {
            return;
        }
        if let Some(groups) = self.local.read_phase1a_snapshot(&self.ctx.workspace_id) {
            self.apply_paint(groups);
        }
        self.advance(HydrationPhase::SeededSync);
    }

    /// Phase 1b: session snapshot plus the fast groups index.
    pub async fn seed_session(&self) {
        if let Some(snapshot) = self
            .local
            .read_phase1b_session_snapshot(&self.ctx.workspace_id)
            .await
        {
            if !snapshot.data.is_empty() {
                self.apply_paint(snapshot.data);
            }
        }
        let index = self
            .local
            .read_groups_index_fast(&self.ctx.workspace_id)
            .await;
        {
            let mut state = self.state_guard();
            if !index.is_empty() || state.index.is_empty() {
                state.index = index;
            }
        }
        self.advance(HydrationPhase::SeededSession);
    }

    /// Silent re-run of the authoritative load. The painted state is never
    /// reset first, so the UI cannot flash blank during a refresh.
    pub async fn refresh(&self) {
        self.run_authoritative(true).await;
    }

    /// Phase 2: authoritative background load, gated and deduplicated per
    /// auth key. Terminal regardless of load success; not retried.
    async fn run_authoritative(&self, force: bool) {
        let auth_key = self.ctx.auth_key();
        let _guard = self.gate.lock().await;

        if !force {
            let state = self.state_guard();
            if state.hydrated_for.as_ref() == Some(&auth_key) {
                return;
            }
        }

        let groups = self.load_authoritative().await;
        if !groups.is_empty() {
            self.local
                .persist_caches_if_non_empty(&self.ctx.workspace_id, &groups)
                .await;
        }
        if self.apply_paint(groups) {
            let mut state = self.state_guard();
            state.index = derive_index(&state.painted);
        }

        let mut state = self.state_guard();
        state.hydrated_for = Some(auth_key);
        drop(state);
        self.advance(HydrationPhase::Hydrated);
    }

    /// Fans out to the backend the surface context names.
    async fn load_authoritative(&self) -> Vec<BookmarkGroup> {
        match self.ctx.storage_backend {
            StorageBackend::Local => self
                .local
                .read_all_groups(&self.ctx.workspace_id, &self.storage_key)
                .await
                .unwrap_or_else(|e| {
                    warn!(workspace_id = %self.ctx.workspace_id, error = %e, "local load failed");
                    Vec::new()
                }),
            StorageBackend::Remote => self.load_remote().await,
        }
    }

    async fn load_remote(&self) -> Vec<BookmarkGroup> {
        let failed = match &self.remote {
            Some(remote) => {
                match remote
                    .try_load_groups(&self.ctx.workspace_id, &self.storage_key)
                    .await
                {
                    Ok(groups) => return groups,
                    Err(e) => {
                        warn!(workspace_id = %self.ctx.workspace_id, error = %e, "remote load failed");
                        true
                    }
                }
            }
            None => {
                warn!("remote backend selected but no remote adapter configured");
                true
            }
        };

        if failed && self.allow_local_fallback {
            return self
                .local
                .read_all_groups(&self.ctx.workspace_id, &self.storage_key)
                .await
                .unwrap_or_default();
        }
        Vec::new()
    }

    /// Applies a candidate paint under the non-regression rule: equal data
    /// is not re-applied, and empty never replaces non-empty.
    fn apply_paint(&self, groups: Vec<BookmarkGroup>) -> bool {
        {
            let mut state = self.state_guard();
            if groups == state.painted {
                return false;
            }
            if groups.is_empty() && !state.painted.is_empty() {
                return false;
            }
            state.painted = groups;
        }
        if let Some(listener) = &self.listener {
            let painted = self.painted();
            listener(&painted);
        }
        true
    }

    fn advance(&self, phase: HydrationPhase) {
        let mut state = self.state_guard();
        if phase > state.phase {
            state.phase = phase;
        }
    }
}
