//! Asynchronous local cache for fetched game-catalog records.
//!
//! Provides schema creation behind a persisted creation gate, per-record
//! CRUD, full-store scans, and a dedup-aware bulk insert, all backed by
//! SQLite (rusqlite with the bundled feature). Every operation opens its
//! own connection and transaction; rusqlite work runs on the blocking
//! thread pool, never on the async executor.

pub mod bulk;
pub mod error;
pub mod gate;
pub mod operations;
pub mod schema;
pub mod store;

pub use error::StoreError;
pub use gate::CreationGate;
pub use schema::{catalog, open_database, StoreDescriptor, STORE_NAMES};
pub use store::{AccessMode, LocalDb, StoreHandle};
