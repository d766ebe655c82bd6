//! Record operations: point CRUD, full-store scan, and reset.

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use game_stash_catalog::CatalogRecord;
use tokio::task;

use crate::error::StoreError;
use crate::store::{AccessMode, LocalDb};

impl LocalDb {
    /// Fetch a single record by key.
    ///
    /// A missing record is `Ok(None)`; errors are reserved for engine
    /// failures, never logical misses.
    pub async fn get_by_id(
        &self,
        store: &str,
        key: i64,
    ) -> Result<Option<CatalogRecord>, StoreError> {
        let handle = self.open_store(store, AccessMode::ReadOnly).await?;
        let payload = task::spawn_blocking(move || handle.get(key)).await??;
        match payload {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    /// Fetch every record in `store`, in ascending key order.
    ///
    /// All-or-nothing: a cursor or decode failure fails the whole call.
    pub async fn get_all(&self, store: &str) -> Result<Vec<CatalogRecord>, StoreError> {
        let handle = self.open_store(store, AccessMode::ReadOnly).await?;
        let payloads = task::spawn_blocking(move || handle.scan_all()).await??;
        payloads
            .iter()
            .map(|text| serde_json::from_str(text).map_err(StoreError::from))
            .collect()
    }

    /// Insert a new record. Fails when the key is already present.
    pub async fn add(&self, store: &str, record: &CatalogRecord) -> Result<bool, StoreError> {
        self.check_writable(record.key())?;

        let key = record.key();
        let payload = serde_json::to_string(record)?;
        let mut handle = self.open_store(store, AccessMode::ReadWrite).await?;
        task::spawn_blocking(move || handle.add(key, &payload)).await??;
        Ok(true)
    }

    /// Insert or replace a record, resolving with the stored value.
    pub async fn update(
        &self,
        store: &str,
        record: CatalogRecord,
    ) -> Result<CatalogRecord, StoreError> {
        self.check_writable(record.key())?;

        let key = record.key();
        let payload = serde_json::to_string(&record)?;
        let mut handle = self.open_store(store, AccessMode::ReadWrite).await?;
        task::spawn_blocking(move || handle.put(key, &payload)).await??;
        Ok(record)
    }

    /// Delete the record at `key`.
    pub async fn remove(&self, store: &str, key: i64) -> Result<bool, StoreError> {
        if !self.is_created() {
            return Err(StoreError::NotInitialized);
        }

        let mut handle = self.open_store(store, AccessMode::ReadWrite).await?;
        task::spawn_blocking(move || handle.delete(key)).await??;
        Ok(true)
    }

    /// Destroy the database file and clear the creation flag.
    ///
    /// Fire-and-forget: failures to remove files are logged, not surfaced.
    /// Afterwards `is_created` is false and `create` succeeds again.
    pub async fn reset(&self) {
        let path = self.db_path();
        let result = task::spawn_blocking(move || {
            for suffix in ["", "-wal", "-shm"] {
                remove_quietly(&path, suffix);
            }
        })
        .await;
        if let Err(e) = result {
            log::warn!("reset task for '{}' failed: {e}", self.name());
        }

        self.gate().clear();
    }

    /// Guard shared by the mutating single-record operations.
    fn check_writable(&self, key: i64) -> Result<(), StoreError> {
        if !self.is_created() {
            return Err(StoreError::NotInitialized);
        }
        if key <= 0 {
            return Err(StoreError::InvalidArgument(
                "record has no usable id".to_string(),
            ));
        }
        Ok(())
    }
}

fn remove_quietly(path: &Path, suffix: &str) {
    let mut target = OsString::from(path.as_os_str());
    target.push(suffix);
    let target = PathBuf::from(target);

    match std::fs::remove_file(&target) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => log::warn!("failed to remove {}: {e}", target.display()),
    }
}
