//! Error types for the SQLite adapter.
//!
//! [`SqliteStoreError`] stays inside this crate's blocking helpers; the
//! adapter converts it into [`StoreError`] before returning through the
//! [`TaskStore`](taskflow_core::TaskStore) port.

use taskflow_core::StoreError;
use thiserror::Error;

/// Errors from SQLite-backed storage operations.
#[derive(Debug, Error)]
pub enum SqliteStoreError {
    /// `SQLite` database error.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Connection pool error.
    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    /// Schema migration failed.
    #[error("migration error: {message}")]
    Migration {
        /// Describes which migration failed and why.
        message: String,
    },
}

/// Convenience type alias for adapter results.
pub type Result<T> = std::result::Result<T, SqliteStoreError>;

impl From<SqliteStoreError> for StoreError {
    fn from(err: SqliteStoreError) -> Self {
        StoreError::backend(err)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
