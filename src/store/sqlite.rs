//! SQLite-backed durable storage area.
//!
//! A single `kv` table holds every durable key; values are stored as JSON
//! text. The schema is created idempotently on open, so opening is always
//! safe on every startup.

use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use rusqlite::{params, Connection};
use serde_json::Value;

use super::area::{Entries, StorageArea};
use crate::types::errors::StoreError;

/// Durable storage area backed by a SQLite database.
pub struct SqliteArea {
    conn: Mutex<Connection>,
}

impl SqliteArea {
    /// Opens (or creates) the database at the given path and runs migrations.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|e| StoreError::Io(e.to_string()))?;
        let area = Self {
            conn: Mutex::new(conn),
        };
        area.run_migrations()?;
        Ok(area)
    }

    /// Opens an in-memory database. The contents are discarded on drop,
    /// which makes this the durable stand-in for tests.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(|e| StoreError::Io(e.to_string()))?;
        let area = Self {
            conn: Mutex::new(conn),
        };
        area.run_migrations()?;
        Ok(area)
    }

    fn run_migrations(&self) -> Result<(), StoreError> {
        self.lock()?
            .execute(
                "CREATE TABLE IF NOT EXISTS kv (
                    key TEXT PRIMARY KEY,
                    value TEXT NOT NULL
                )",
                [],
            )
            .map_err(|e| StoreError::Io(e.to_string()))?;
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Io("kv connection poisoned".to_string()))
    }
}

#[async_trait]
impl StorageArea for SqliteArea {
    async fn get(&self, keys: &[&str]) -> Result<Entries, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare("SELECT value FROM kv WHERE key = ?1")
            .map_err(|e| StoreError::Io(e.to_string()))?;

        let mut out = Entries::new();
        for key in keys {
            let row: Option<String> = stmt
                .query_row(params![key], |row| row.get(0))
                .map(Some)
                .or_else(|e| match e {
                    rusqlite::Error::QueryReturnedNoRows => Ok(None),
                    other => Err(StoreError::Io(other.to_string())),
                })?;
            if let Some(text) = row {
                let value: Value = serde_json::from_str(&text)
                    .map_err(|e| StoreError::Serialization(e.to_string()))?;
                out.insert((*key).to_string(), value);
            }
        }
        Ok(out)
    }

    async fn get_all(&self) -> Result<Entries, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare("SELECT key, value FROM kv")
            .map_err(|e| StoreError::Io(e.to_string()))?;

        let rows = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })
            .map_err(|e| StoreError::Io(e.to_string()))?;

        let mut out = Entries::new();
        for row in rows {
            let (key, text) = row.map_err(|e| StoreError::Io(e.to_string()))?;
            let value: Value = serde_json::from_str(&text)
                .map_err(|e| StoreError::Serialization(e.to_string()))?;
            out.insert(key, value);
        }
        Ok(out)
    }

    async fn set(&self, entries: Entries) -> Result<(), StoreError> {
        let conn = self.lock()?;
        for (key, value) in entries {
            let text = serde_json::to_string(&value)
                .map_err(|e| StoreError::Serialization(e.to_string()))?;
            conn.execute(
                "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
                params![key, text],
            )
            .map_err(|e| StoreError::Io(e.to_string()))?;
        }
        Ok(())
    }

    async fn remove(&self, keys: &[&str]) -> Result<(), StoreError> {
        let conn = self.lock()?;
        for key in keys {
            conn.execute("DELETE FROM kv WHERE key = ?1", params![key])
                .map_err(|e| StoreError::Io(e.to_string()))?;
        }
        Ok(())
    }
}
