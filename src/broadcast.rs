//! Cross-surface notifications.
//!
//! Surfaces do not share process memory, so coordination is explicit
//! message-passing over a broadcast channel plus re-reads of the stores.
//! Delivery is best-effort: a failed or unobserved broadcast is recovered by
//! the next re-read, never by retrying here.

use std::time::Duration;

use tokio::sync::broadcast;
use tracing::debug;

use crate::adapter::BookmarkStore;
use crate::types::events::{SelectedGroupRef, SurfaceEvent};

const EVENT_CAPACITY: usize = 64;

/// Broadcast bus connecting every open surface on the device.
pub struct ChangeBus {
    tx: broadcast::Sender<SurfaceEvent>,
}

impl ChangeBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(EVENT_CAPACITY);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SurfaceEvent> {
        self.tx.subscribe()
    }

    /// Best-effort publish. Having no listeners is not an error.
    pub fn publish(&self, event: SurfaceEvent) {
        if self.tx.send(event).is_err() {
            debug!("broadcast dropped, no surfaces listening");
        }
    }
}

impl Default for ChangeBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Bounded retry policy for upgrading a name-based group reference to an
/// id-based one while the group's creation is still in flight.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub interval: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 10,
            interval: Duration::from_millis(200),
        }
    }
}

/// Resolves a [`SelectedGroupRef`] to a group id.
///
/// Id references resolve immediately. Name references poll the store until a
/// group with that name appears or the policy's attempts run out, in which
/// case `None` is returned and the caller keeps the provisional name.
pub async fn resolve_group_ref(
    store: &dyn BookmarkStore,
    workspace_id: &str,
    storage_key: &str,
    group: &SelectedGroupRef,
    policy: RetryPolicy,
) -> Option<String> {
    let name = match group {
        SelectedGroupRef::Id(id) => return Some(id.clone()),
        SelectedGroupRef::Name(name) => name,
    };

    for attempt in 0..policy.attempts {
        if attempt > 0 {
            tokio::time::sleep(policy.interval).await;
        }
        let groups = store
            .read_all_groups(workspace_id, storage_key)
            .await
            .unwrap_or_default();
        if let Some(found) = groups.iter().find(|g| &g.group_name == name) {
            return Some(found.id.clone());
        }
    }
    debug!(name, "group reference never resolved, giving up");
    None
}
