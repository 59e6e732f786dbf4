//! Database error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from database operations.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// SQLite error from rusqlite.
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// IO error when creating the database directory.
    #[error("IO error for path '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A migration failed to apply.
    #[error("Migration failed at version {version}: {reason}")]
    Migration { version: u32, reason: String },

    /// A stored timestamp is not RFC 3339.
    #[error("Invalid timestamp '{value}' in column '{column}': {reason}")]
    InvalidTimestamp {
        column: &'static str,
        value: String,
        reason: String,
    },

    /// A party with this name already exists.
    #[error("Party '{0}' already exists")]
    DuplicateParty(String),

    /// The blocking database task panicked or was cancelled.
    #[error("Database task failed: {0}")]
    Task(String),

    /// The database lock was poisoned.
    #[error("Database lock poisoned")]
    LockPoisoned,
}
