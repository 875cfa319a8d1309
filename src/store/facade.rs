use std::sync::Arc;

use serde_json::Value;
use tracing::warn;

use super::area::{Entries, StorageArea};
use crate::types::errors::StoreError;

/// Uniform async facade over the durable and session storage areas.
///
/// Durable-area errors propagate to the caller. Every session operation is
/// best-effort: failures are swallowed and logged, because the session
/// mirror always has a more authoritative fallback (the durable store or the
/// next re-read).
pub struct KvFacade {
    durable: Arc<dyn StorageArea>,
    session: Arc<dyn StorageArea>,
}

impl KvFacade {
    pub fn new(durable: Arc<dyn StorageArea>, session: Arc<dyn StorageArea>) -> Self {
        Self { durable, session }
    }

    /// Reads one durable key.
    pub async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let mut entries = self.durable.get(&[key]).await?;
        Ok(entries.remove(key))
    }

    /// Reads several durable keys at once.
    pub async fn get_many(&self, keys: &[&str]) -> Result<Entries, StoreError> {
        self.durable.get(keys).await
    }

    /// Returns the durable area's entire contents. Migration only.
    pub async fn get_all(&self) -> Result<Entries, StoreError> {
        self.durable.get_all().await
    }

    /// Writes one durable key.
    pub async fn set(&self, key: impl Into<String>, value: Value) -> Result<(), StoreError> {
        let mut entries = Entries::new();
        entries.insert(key.into(), value);
        self.durable.set(entries).await
    }

    /// Removes durable keys.
    pub async fn remove(&self, keys: &[&str]) -> Result<(), StoreError> {
        self.durable.remove(keys).await
    }

    /// Best-effort session read. `None` covers both "absent" and "failed".
    pub async fn session_get(&self, key: &str) -> Option<Value> {
        match self.session.get(&[key]).await {
            Ok(mut entries) => entries.remove(key),
            Err(e) => {
                warn!(key, error = %e, "session read failed, treating as absent");
                None
            }
        }
    }

    /// Best-effort session write.
    pub async fn session_set(&self, key: impl Into<String>, value: Value) {
        let key = key.into();
        let mut entries = Entries::new();
        entries.insert(key.clone(), value);
        if let Err(e) = self.session.set(entries).await {
            warn!(key, error = %e, "session write failed, dropping");
        }
    }

    /// Best-effort session remove.
    pub async fn session_remove(&self, keys: &[&str]) {
        if let Err(e) = self.session.remove(keys).await {
            warn!(?keys, error = %e, "session remove failed, dropping");
        }
    }
}
