//! Markdock persistence primitives.
//!
//! Two async storage areas (durable and ephemeral/session) are normalized
//! behind the [`StorageArea`] trait and combined by [`KvFacade`]; the
//! [`SyncMirror`] is the synchronous first-paint cache consulted before any
//! async call resolves.

pub mod area;
pub mod facade;
pub mod memory;
pub mod mirror;
pub mod sqlite;

pub use area::{Entries, StorageArea};
pub use facade::KvFacade;
pub use memory::MemoryArea;
pub use mirror::SyncMirror;
pub use sqlite::SqliteArea;
