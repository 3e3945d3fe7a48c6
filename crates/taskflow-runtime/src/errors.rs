//! Runtime bootstrap errors.

use taskflow_settings::SettingsError;
use taskflow_store::SqliteStoreError;

/// Failure while assembling a [`Runtime`](crate::Runtime).
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// Settings could not be loaded or failed validation.
    #[error(transparent)]
    Settings(#[from] SettingsError),

    /// The database could not be opened or migrated.
    #[error("failed to open task store: {0}")]
    Storage(#[from] SqliteStoreError),

    /// The database directory could not be created.
    #[error("failed to prepare data directory: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, RuntimeError>;
