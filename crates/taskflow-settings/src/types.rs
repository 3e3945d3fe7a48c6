//! Settings type definitions.
//!
//! All types use `#[serde(rename_all = "camelCase")]` and `#[serde(default)]`
//! so a partial JSON file only overrides the keys it names.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use taskflow_core::SortOption;

use crate::errors::{Result, SettingsError};

/// Database path that selects a private in-memory database.
pub const IN_MEMORY_PATH: &str = ":memory:";

/// Root settings type.
///
/// ```json
/// {
///   "storage": { "databasePath": "~/.taskflow/tasks.db", "poolSize": 4 },
///   "logging": { "level": "info" },
///   "list": { "defaultSort": "DUE_DATE_ASC", "seedSampleData": false }
/// }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskFlowSettings {
    /// Database location and pool tuning.
    pub storage: StorageSettings,
    /// Log filter.
    pub logging: LoggingSettings,
    /// Task list behavior.
    pub list: ListSettings,
}

impl TaskFlowSettings {
    /// Reject values the store cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.storage.pool_size == 0 {
            return Err(SettingsError::InvalidValue(
                "storage.poolSize must be at least 1".to_string(),
            ));
        }
        if self.storage.database_path.trim().is_empty() {
            return Err(SettingsError::InvalidValue(
                "storage.databasePath must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// SQLite storage settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StorageSettings {
    /// Database file. A leading `~/` expands to `$HOME`; `:memory:` keeps
    /// everything in memory.
    pub database_path: String,
    /// Maximum pooled connections.
    pub pool_size: u32,
    /// How long a connection waits on a locked database.
    pub busy_timeout_ms: u64,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            database_path: "~/.taskflow/tasks.db".to_string(),
            pool_size: 4,
            busy_timeout_ms: 5_000,
        }
    }
}

impl StorageSettings {
    /// Whether the configured database lives in memory.
    pub fn is_in_memory(&self) -> bool {
        self.database_path == IN_MEMORY_PATH
    }

    /// Database path with `~/` expanded.
    pub fn resolved_database_path(&self) -> PathBuf {
        match self.database_path.strip_prefix("~/") {
            Some(rest) => {
                let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
                PathBuf::from(home).join(rest)
            }
            None => PathBuf::from(&self.database_path),
        }
    }
}

/// Logging settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// Default `EnvFilter` directive; `RUST_LOG` takes precedence.
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Task list behavior.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListSettings {
    /// Sort applied by `clear_filters` and at startup.
    pub default_sort: SortOption,
    /// Insert the demo tasks into an empty store at startup.
    pub seed_sample_data: bool,
}
