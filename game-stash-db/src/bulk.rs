//! Batched insert-if-absent across many records.

use futures::stream::{self, StreamExt};
use game_stash_catalog::CatalogRecord;
use tokio::task;

use crate::error::StoreError;
use crate::store::{AccessMode, LocalDb};

/// Upper bound on concurrently running insert chains. Each chain occupies a
/// blocking-pool thread while it talks to SQLite.
const MAX_CONCURRENT_INSERTS: usize = 8;

/// Terminal outcome of one record's chain.
enum InsertOutcome {
    /// The key was already in the store; the record was not re-added.
    Present(CatalogRecord),
    /// The record was inserted.
    Added(CatalogRecord),
    /// The chain failed; logged and excluded from the result.
    Failed,
}

impl LocalDb {
    /// Insert every record whose key is not already present.
    ///
    /// Per record, one independent chain runs: an existence check, then an
    /// insert when the key is absent. Chains interleave freely and their
    /// engine failures never abort the batch — a record whose check or
    /// insert fails is logged and left out of the result. The returned
    /// records (pre-existing or newly added) are in completion order, not
    /// input order.
    pub async fn add_bulk(
        &self,
        store: &str,
        records: Vec<CatalogRecord>,
    ) -> Result<Vec<CatalogRecord>, StoreError> {
        if !self.is_created() {
            return Err(StoreError::NotInitialized);
        }
        if records.is_empty() {
            return Err(StoreError::InvalidArgument("empty batch".to_string()));
        }

        let total = records.len();
        let mut chains = stream::iter(records)
            .map(|record| self.insert_if_absent(store, record))
            .buffer_unordered(MAX_CONCURRENT_INSERTS);

        let mut present = Vec::with_capacity(total);
        let mut completed = 0usize;
        let mut added = 0usize;
        while let Some(outcome) = chains.next().await {
            completed += 1;
            match outcome {
                InsertOutcome::Present(record) => present.push(record),
                InsertOutcome::Added(record) => {
                    added += 1;
                    present.push(record);
                }
                InsertOutcome::Failed => {}
            }
        }
        debug_assert_eq!(completed, total);

        log::debug!(
            "bulk insert into '{store}': {added} added, {} present, {completed}/{total} chains completed",
            present.len(),
        );
        Ok(present)
    }

    /// One record's chain: check for the key, then add when absent.
    ///
    /// The check and the add each use their own store handle. Every failure
    /// is a terminal outcome for this record, never an early return for the
    /// batch.
    async fn insert_if_absent(&self, store: &str, record: CatalogRecord) -> InsertOutcome {
        let key = record.key();
        if key <= 0 {
            log::warn!("skipping entry without a usable id for '{store}'");
            return InsertOutcome::Failed;
        }

        let handle = match self.open_store(store, AccessMode::ReadWrite).await {
            Ok(handle) => handle,
            Err(e) => {
                log::warn!("failed to open store '{store}': {e}");
                return InsertOutcome::Failed;
            }
        };
        match task::spawn_blocking(move || handle.get(key)).await {
            Ok(Ok(Some(_))) => return InsertOutcome::Present(record),
            Ok(Ok(None)) => {}
            Ok(Err(e)) => {
                log::warn!("failed to check entry {key} in '{store}': {e}");
                return InsertOutcome::Failed;
            }
            Err(e) => {
                log::warn!("existence check for entry {key} in '{store}' died: {e}");
                return InsertOutcome::Failed;
            }
        }

        let payload = match serde_json::to_string(&record) {
            Ok(payload) => payload,
            Err(e) => {
                log::warn!("failed to encode entry {key} for '{store}': {e}");
                return InsertOutcome::Failed;
            }
        };
        let mut handle = match self.open_store(store, AccessMode::ReadWrite).await {
            Ok(handle) => handle,
            Err(e) => {
                log::warn!("failed to open store '{store}': {e}");
                return InsertOutcome::Failed;
            }
        };
        match task::spawn_blocking(move || handle.add(key, &payload)).await {
            Ok(Ok(())) => InsertOutcome::Added(record),
            Ok(Err(e)) => {
                log::warn!("failed to add entry {key} to '{store}': {e}");
                InsertOutcome::Failed
            }
            Err(e) => {
                log::warn!("insert for entry {key} in '{store}' died: {e}");
                InsertOutcome::Failed
            }
        }
    }
}
