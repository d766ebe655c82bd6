//! Object-store schema: descriptors, the deployed catalog, and database
//! creation.

use std::collections::HashSet;
use std::path::Path;

use rusqlite::Connection;

use crate::error::StoreError;

/// Names of the canonical stores, one per catalog entity kind. These match
/// `CatalogRecord::store_name` in `game-stash-catalog`.
pub const STORE_NAMES: [&str; 5] = ["games", "genres", "platforms", "publishers", "tags"];

/// Describes one named object store: its key field and whether the engine
/// assigns keys itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreDescriptor {
    pub name: String,
    pub key_field: String,
    pub auto_increment: bool,
}

impl StoreDescriptor {
    /// Descriptor for a store with caller-assigned integer keys.
    pub fn new(name: &str, key_field: &str) -> Self {
        Self {
            name: name.to_string(),
            key_field: key_field.to_string(),
            auto_increment: false,
        }
    }

    /// Descriptor for a store whose keys are assigned by the engine.
    pub fn auto_increment(name: &str, key_field: &str) -> Self {
        Self {
            auto_increment: true,
            ..Self::new(name, key_field)
        }
    }

    /// DDL for this store: an integer key column named after the key field
    /// plus a JSON payload column.
    fn create_sql(&self) -> String {
        let key_type = if self.auto_increment {
            "INTEGER PRIMARY KEY AUTOINCREMENT"
        } else {
            "INTEGER PRIMARY KEY"
        };
        format!(
            "CREATE TABLE IF NOT EXISTS \"{}\" (\"{}\" {}, payload TEXT NOT NULL);",
            self.name, self.key_field, key_type
        )
    }
}

/// The deployed schema: one store per entity kind, keyed by the
/// API-assigned `id`.
pub fn catalog() -> Vec<StoreDescriptor> {
    STORE_NAMES
        .iter()
        .map(|name| StoreDescriptor::new(name, "id"))
        .collect()
}

/// Store and key-field names are spliced into SQL, so they must be plain
/// identifiers.
fn valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Open the database at `path`, materializing `schema` first when the
/// on-disk version is older than `version`.
///
/// The upgrade runs inside a single transaction together with the version
/// stamp, so a failed creation leaves no stores behind.
pub fn open_database(
    path: &Path,
    version: i32,
    schema: &[StoreDescriptor],
) -> Result<Connection, StoreError> {
    let conn = Connection::open(path).map_err(StoreError::Connection)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA busy_timeout=5000;")
        .map_err(StoreError::Connection)?;

    let on_disk: i32 = conn
        .query_row("PRAGMA user_version", [], |row| row.get(0))
        .map_err(StoreError::Connection)?;
    if on_disk < version {
        let tx = conn
            .unchecked_transaction()
            .map_err(StoreError::Transaction)?;
        create_stores(&tx, schema)?;
        tx.pragma_update(None, "user_version", version)
            .map_err(StoreError::Transaction)?;
        tx.commit().map_err(StoreError::Transaction)?;
    }

    Ok(conn)
}

/// Create one physical store per descriptor.
///
/// Descriptor validation happens up front: a duplicate, empty, or
/// non-identifier store name fails the whole creation before any DDL runs.
pub fn create_stores(conn: &Connection, schema: &[StoreDescriptor]) -> Result<(), StoreError> {
    let mut seen = HashSet::new();
    for store in schema {
        if !valid_identifier(&store.name) || !valid_identifier(&store.key_field) {
            return Err(StoreError::SchemaCreationFailed(format!(
                "store '{}' has a non-identifier name or key field",
                store.name
            )));
        }
        if !seen.insert(store.name.as_str()) {
            return Err(StoreError::SchemaCreationFailed(format!(
                "duplicate store name '{}'",
                store.name
            )));
        }
    }

    for store in schema {
        conn.execute_batch(&store.create_sql()).map_err(|e| {
            StoreError::SchemaCreationFailed(format!("store '{}': {e}", store.name))
        })?;
    }
    Ok(())
}
