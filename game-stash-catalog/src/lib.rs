//! Domain data model for the game-stash cache.
//!
//! This crate defines the record types served by the remote catalog API
//! without any storage dependencies. Consumers can use these types directly
//! for serialization or display, or pass them to `game-stash-db` for local
//! persistence.

pub mod types;

pub use types::*;
