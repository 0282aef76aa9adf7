use thiserror::Error;

/// Errors emitted by the storage layer.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Caller supplied input that violates a quote or tag invariant.
    #[error("{0}")]
    Validation(String),
    /// SQLite rejected a statement or could not open the database.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    /// The database was written by a schema version this build cannot migrate.
    #[error("Migration from schema v{from} to v{to} is not supported")]
    UnsupportedMigration {
        /// Version found on disk.
        from: i64,
        /// Version this build expects.
        to: i64,
    },
    /// Filesystem failure while preparing the database location.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// A previous operation panicked while holding the connection.
    #[error("Database connection lock poisoned")]
    LockPoisoned,
}

impl StorageError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Whether the error was caused by caller input rather than the storage engine.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
