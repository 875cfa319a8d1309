use std::collections::HashMap;
use std::sync::RwLock;

use serde_json::Value;

/// Synchronous first-paint mirror.
///
/// Models the surface's synchronously readable local store: a small warm
/// cache consulted before any async call resolves, so the very first render
/// never waits on I/O. It is derived state only; the authoritative data
/// always lives behind the async areas.
#[derive(Default)]
pub struct SyncMirror {
    entries: RwLock<HashMap<String, Value>>,
}

impl SyncMirror {
    pub fn new() -> Self {
        Self::default()
    }

    /// Synchronous read. Returns `None` when the key is absent or the lock
    /// is poisoned (a poisoned mirror is just a cold cache).
    pub fn get(&self, key: &str) -> Option<Value> {
        self.entries.read().ok()?.get(key).cloned()
    }

    pub fn set(&self, key: impl Into<String>, value: Value) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(key.into(), value);
        }
    }

    pub fn remove(&self, key: &str) {
        if let Ok(mut entries) = self.entries.write() {
            entries.remove(key);
        }
    }
}
