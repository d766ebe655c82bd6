use thiserror::Error;

/// Errors surfaced by [`LocalDb`](crate::LocalDb) operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// `create` was called after the database had already been created.
    #[error("database '{0}' already created")]
    AlreadyCreated(String),

    /// One or more object stores failed to materialize during creation.
    #[error("failed to create object stores: {0}")]
    SchemaCreationFailed(String),

    /// A mutating operation ran before `create` succeeded.
    #[error("database has not been created")]
    NotInitialized,

    /// Missing/empty record or empty batch input.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The named store is not part of the schema.
    #[error("unknown object store '{0}'")]
    UnknownStore(String),

    /// Opening the database failed.
    #[error("failed to open database: {0}")]
    Connection(#[source] rusqlite::Error),

    /// Beginning or committing a transaction failed.
    #[error("transaction failed: {0}")]
    Transaction(#[source] rusqlite::Error),

    /// A point get/add/put/delete or cursor step failed.
    #[error("record operation failed: {0}")]
    Record(#[source] rusqlite::Error),

    /// A record payload could not be encoded or decoded.
    #[error("bad record payload: {0}")]
    Payload(#[from] serde_json::Error),

    /// A blocking storage task was cancelled or panicked.
    #[error("storage task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// The platform data directory could not be determined.
    #[error("could not determine local data directory")]
    NoDataDir,
}
