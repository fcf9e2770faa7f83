//! Error types for the SQLite storage driver.
//!
//! Provides a unified error type covering database access, DDL generation,
//! value conversion, and connection setup failures.

use seedbed_engine::StorageError;
use thiserror::Error;

/// Errors that can occur in the SQLite driver.
#[derive(Debug, Error)]
pub enum SqliteError {
    /// SQLite database operation failure.
    #[error("database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),

    /// Table or column name that cannot be used as an SQL identifier.
    #[error("invalid identifier '{0}': must match [A-Za-z_][A-Za-z0-9_]*")]
    InvalidIdentifier(String),

    /// JSON value or field default that has no SQL representation.
    #[error("conversion error: {0}")]
    ConversionError(String),

    /// Connection configured for a different storage driver.
    #[error("unsupported adapter '{adapter}' for connection '{connection}'")]
    UnsupportedAdapter { connection: String, adapter: String },

    /// Connection name missing from the active environment.
    #[error("unknown connection: {0}")]
    UnknownConnection(String),
}

impl From<SqliteError> for StorageError {
    fn from(err: SqliteError) -> Self {
        StorageError::from_source(err)
    }
}

/// Convenience alias for results with [`SqliteError`].
pub type Result<T> = std::result::Result<T, SqliteError>;
