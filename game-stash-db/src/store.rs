//! The local database handle and the per-operation store accessor.

use std::path::PathBuf;
use std::sync::Arc;

use rusqlite::{params, Connection, OptionalExtension};
use tokio::task;

use crate::error::StoreError;
use crate::gate::CreationGate;
use crate::schema::{self, StoreDescriptor};

/// Transaction mode requested from the accessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    ReadOnly,
    ReadWrite,
}

/// Handle to one local database: its name, expected schema version, root
/// directory, and store catalog.
///
/// Cheap to clone and holds no connection — every operation opens its own
/// connection and transaction and drops them on completion.
#[derive(Debug, Clone)]
pub struct LocalDb {
    name: String,
    version: i32,
    root: PathBuf,
    schema: Arc<Vec<StoreDescriptor>>,
    gate: CreationGate,
}

impl LocalDb {
    /// Database rooted at the platform data directory
    /// (`<data_dir>/game-stash/<name>.sqlite`).
    pub fn new(name: &str, version: i32) -> Result<Self, StoreError> {
        let root = dirs::data_dir()
            .ok_or(StoreError::NoDataDir)?
            .join("game-stash");
        Ok(Self::with_root(root, name, version))
    }

    /// Database rooted at an explicit directory, with the default catalog.
    pub fn with_root(root: impl Into<PathBuf>, name: &str, version: i32) -> Self {
        Self::with_schema(root, name, version, schema::catalog())
    }

    /// Database with a bespoke store catalog instead of the default one.
    pub fn with_schema(
        root: impl Into<PathBuf>,
        name: &str,
        version: i32,
        stores: Vec<StoreDescriptor>,
    ) -> Self {
        let root = root.into();
        let gate = CreationGate::new(&root, name);
        Self {
            name: name.to_string(),
            version,
            root,
            schema: Arc::new(stores),
            gate,
        }
    }

    /// Name of this database.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path of the SQLite file backing this database.
    pub fn db_path(&self) -> PathBuf {
        self.root.join(format!("{}.sqlite", self.name))
    }

    /// Whether `create` has succeeded for this database name.
    pub fn is_created(&self) -> bool {
        self.gate.is_set()
    }

    pub(crate) fn gate(&self) -> &CreationGate {
        &self.gate
    }

    /// Create the object stores described by `stores` and set the creation
    /// flag.
    ///
    /// Fails fast with [`StoreError::AlreadyCreated`] when the flag is
    /// already set; on any materialization failure the flag stays unset so
    /// the call can be retried.
    pub async fn create(&self, stores: &[StoreDescriptor]) -> Result<(), StoreError> {
        if self.is_created() {
            return Err(StoreError::AlreadyCreated(self.name.clone()));
        }

        let path = self.db_path();
        let version = self.version;
        let stores = stores.to_vec();
        task::spawn_blocking(move || -> Result<(), StoreError> {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    StoreError::SchemaCreationFailed(format!(
                        "cannot create '{}': {e}",
                        parent.display()
                    ))
                })?;
            }
            schema::open_database(&path, version, &stores)?;
            Ok(())
        })
        .await??;

        self.gate.set();
        Ok(())
    }

    /// Look up a store's descriptor in the catalog.
    fn descriptor(&self, store: &str) -> Result<StoreDescriptor, StoreError> {
        self.schema
            .iter()
            .find(|d| d.name == store)
            .cloned()
            .ok_or_else(|| StoreError::UnknownStore(store.to_string()))
    }

    /// Open a connection and bind a handle to `store` in the requested
    /// mode.
    ///
    /// Every call gets a fresh connection (running the version upgrade
    /// against this database's catalog if needed); handles are not reused
    /// across operations.
    pub async fn open_store(
        &self,
        store: &str,
        mode: AccessMode,
    ) -> Result<StoreHandle, StoreError> {
        let descriptor = self.descriptor(store)?;
        let path = self.db_path();
        let version = self.version;
        let catalog = Arc::clone(&self.schema);

        task::spawn_blocking(move || -> Result<StoreHandle, StoreError> {
            let conn = schema::open_database(&path, version, &catalog)?;
            if mode == AccessMode::ReadOnly {
                conn.execute_batch("PRAGMA query_only=ON;")
                    .map_err(StoreError::Connection)?;
            }
            Ok(StoreHandle {
                conn,
                store: descriptor,
                mode,
            })
        })
        .await?
    }
}

/// A store bound to one freshly opened connection, used for a single
/// operation.
///
/// Write methods run inside their own transaction on that connection.
pub struct StoreHandle {
    conn: Connection,
    store: StoreDescriptor,
    mode: AccessMode,
}

impl StoreHandle {
    /// Name of the store this handle is bound to.
    pub fn store_name(&self) -> &str {
        &self.store.name
    }

    /// Mode the handle was opened with.
    pub fn mode(&self) -> AccessMode {
        self.mode
    }

    /// Point get: the payload at `key`, or `None` on a logical miss.
    pub fn get(&self, key: i64) -> Result<Option<String>, StoreError> {
        let sql = format!(
            "SELECT payload FROM \"{}\" WHERE \"{}\" = ?1",
            self.store.name, self.store.key_field
        );
        self.conn
            .query_row(&sql, params![key], |row| row.get(0))
            .optional()
            .map_err(StoreError::Record)
    }

    /// Insert a new record. Fails when `key` is already present.
    pub fn add(&mut self, key: i64, payload: &str) -> Result<(), StoreError> {
        let sql = format!(
            "INSERT INTO \"{}\" (\"{}\", payload) VALUES (?1, ?2)",
            self.store.name, self.store.key_field
        );
        let tx = self.conn.transaction().map_err(StoreError::Transaction)?;
        tx.execute(&sql, params![key, payload])
            .map_err(StoreError::Record)?;
        tx.commit().map_err(StoreError::Transaction)
    }

    /// Insert or replace the record at `key`.
    pub fn put(&mut self, key: i64, payload: &str) -> Result<(), StoreError> {
        let sql = format!(
            "INSERT INTO \"{0}\" (\"{1}\", payload) VALUES (?1, ?2)
             ON CONFLICT(\"{1}\") DO UPDATE SET payload = excluded.payload",
            self.store.name, self.store.key_field
        );
        let tx = self.conn.transaction().map_err(StoreError::Transaction)?;
        tx.execute(&sql, params![key, payload])
            .map_err(StoreError::Record)?;
        tx.commit().map_err(StoreError::Transaction)
    }

    /// Delete the record at `key`, if any.
    pub fn delete(&mut self, key: i64) -> Result<(), StoreError> {
        let sql = format!(
            "DELETE FROM \"{}\" WHERE \"{}\" = ?1",
            self.store.name, self.store.key_field
        );
        let tx = self.conn.transaction().map_err(StoreError::Transaction)?;
        tx.execute(&sql, params![key]).map_err(StoreError::Record)?;
        tx.commit().map_err(StoreError::Transaction)
    }

    /// Forward cursor over the whole store in ascending key order,
    /// accumulating every payload.
    pub fn scan_all(&self) -> Result<Vec<String>, StoreError> {
        let sql = format!(
            "SELECT payload FROM \"{}\" ORDER BY \"{}\" ASC",
            self.store.name, self.store.key_field
        );
        let mut stmt = self.conn.prepare(&sql).map_err(StoreError::Record)?;
        let mut rows = stmt.query([]).map_err(StoreError::Record)?;

        let mut payloads = Vec::new();
        while let Some(row) = rows.next().map_err(StoreError::Record)? {
            payloads.push(row.get(0).map_err(StoreError::Record)?);
        }
        Ok(payloads)
    }
}
