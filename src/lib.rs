//! Workspace-scoped storage and caching core for the Markdock bookmark
//! organizer.
//!
//! This library crate is the data-consistency layer the UI surfaces (popup,
//! dashboard tabs) depend on: workspace registry and migration, the
//! key-value store facade, local/remote storage adapters with derived
//! first-paint caches, the multi-phase hydration pipeline, and the
//! copy/move engine.

pub mod adapter;
pub mod broadcast;
pub mod cache;
pub mod context;
pub mod hydration;
pub mod registry;
pub mod store;
pub mod transfer;
pub mod types;
pub mod urlnorm;
