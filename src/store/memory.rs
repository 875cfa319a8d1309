use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use super::area::{Entries, StorageArea};
use crate::types::errors::StoreError;

/// In-memory storage area.
///
/// Backs the ephemeral/session area in production surfaces and stands in for
/// the durable area in tests. Contents are lost when the process exits,
/// which is exactly the session area's contract.
#[derive(Default)]
pub struct MemoryArea {
    entries: RwLock<HashMap<String, Value>>,
}

impl MemoryArea {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StorageArea for MemoryArea {
    async fn get(&self, keys: &[&str]) -> Result<Entries, StoreError> {
        let entries = self.entries.read().await;
        let mut out = Entries::new();
        for key in keys {
            if let Some(value) = entries.get(*key) {
                out.insert((*key).to_string(), value.clone());
            }
        }
        Ok(out)
    }

    async fn get_all(&self) -> Result<Entries, StoreError> {
        Ok(self.entries.read().await.clone())
    }

    async fn set(&self, new_entries: Entries) -> Result<(), StoreError> {
        let mut entries = self.entries.write().await;
        entries.extend(new_entries);
        Ok(())
    }

    async fn remove(&self, keys: &[&str]) -> Result<(), StoreError> {
        let mut entries = self.entries.write().await;
        for key in keys {
            entries.remove(*key);
        }
        Ok(())
    }
}
