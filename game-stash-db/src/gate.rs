//! Persisted creation flag, kept apart from the database file itself.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// The created-flag for one database: a marker file named
/// `<databaseName>_db_created` in the database's root directory.
///
/// Present if and only if every store in the schema has been materialized
/// at least once. Consulted before mutating operations, removed on reset.
#[derive(Debug, Clone)]
pub struct CreationGate {
    path: PathBuf,
}

impl CreationGate {
    /// Gate for the database `name` rooted at `root`.
    pub fn new(root: &Path, name: &str) -> Self {
        Self {
            path: root.join(format!("{name}_db_created")),
        }
    }

    /// Whether the schema has been materialized at least once.
    pub fn is_set(&self) -> bool {
        self.path.exists()
    }

    /// Record a successful creation.
    pub fn set(&self) {
        if let Some(parent) = self.path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        if let Err(e) = fs::write(&self.path, b"true") {
            log::warn!(
                "failed to write creation flag {}: {e}",
                self.path.display()
            );
        }
    }

    /// Clear the flag, returning the database to its pre-creation state.
    pub fn clear(&self) {
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => log::warn!(
                "failed to remove creation flag {}: {e}",
                self.path.display()
            ),
        }
    }
}
