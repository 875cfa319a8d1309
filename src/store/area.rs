use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;

use crate::types::errors::StoreError;

/// A batch of stored entries, keyed by physical key.
pub type Entries = HashMap<String, Value>;

/// One logical storage area exposing an async get/set/remove contract.
///
/// The platform's areas differ in durability (durable "local" vs ephemeral
/// "session") and in completion convention (a blocking SQLite-backed area vs
/// an in-memory async one); this trait normalizes all of them into a single
/// promise-like contract. Nothing above this layer branches on the backing
/// medium.
#[async_trait]
pub trait StorageArea: Send + Sync {
    /// Fetches the given keys. Absent keys are simply missing from the map.
    async fn get(&self, keys: &[&str]) -> Result<Entries, StoreError>;

    /// Returns the entire area's contents. Used only by one-time migration.
    async fn get_all(&self) -> Result<Entries, StoreError>;

    /// Stores every entry in the map, overwriting existing values.
    async fn set(&self, entries: Entries) -> Result<(), StoreError>;

    /// Removes the given keys. Removing an absent key is not an error.
    async fn remove(&self, keys: &[&str]) -> Result<(), StoreError>;
}
