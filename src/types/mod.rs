//! Shared data types for Markdock's storage core.

pub mod bookmark;
pub mod errors;
pub mod events;
pub mod workspace;
