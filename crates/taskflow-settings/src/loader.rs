//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`TaskFlowSettings::default()`]
//! 2. If `~/.taskflow/settings.json` exists, deep-merge user values over defaults
//! 3. Apply `TASKFLOW_*` environment overrides (highest priority)
//! 4. Validate the result
//!
//! Deep merge rules:
//! - Objects are merged recursively (source overrides target per-key)
//! - Arrays and primitives are replaced entirely by source
//! - Null values in source are skipped (preserving target)

use std::path::{Path, PathBuf};

use serde_json::Value;
use taskflow_core::SortOption;
use tracing::debug;

use crate::errors::Result;
use crate::types::TaskFlowSettings;

/// Resolve the path to the settings file (`~/.taskflow/settings.json`).
pub fn settings_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".taskflow").join("settings.json")
}

/// Load settings from the default path with env var overrides.
pub fn load_settings() -> Result<TaskFlowSettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from a specific path with env var overrides.
///
/// A missing file yields defaults. Invalid JSON or an invalid merged value
/// is an error.
pub fn load_settings_from_path(path: &Path) -> Result<TaskFlowSettings> {
    let defaults = serde_json::to_value(TaskFlowSettings::default())?;

    let merged = if path.exists() {
        debug!(?path, "loading settings from file");
        let content = std::fs::read_to_string(path)?;
        let user: Value = serde_json::from_str(&content)?;
        deep_merge(defaults, user)
    } else {
        debug!(?path, "settings file not found, using defaults");
        defaults
    };

    let mut settings: TaskFlowSettings = serde_json::from_value(merged)?;
    apply_env_overrides(&mut settings);
    settings.validate()?;
    Ok(settings)
}

/// Recursive deep merge of two JSON values.
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = if let Some(target_val) = target_map.remove(&key) {
                    deep_merge(target_val, source_val)
                } else {
                    source_val
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Apply `TASKFLOW_*` environment variable overrides.
pub fn apply_env_overrides(settings: &mut TaskFlowSettings) {
    apply_overrides(settings, |name| std::env::var(name).ok());
}

/// Apply overrides from an arbitrary variable lookup.
///
/// Invalid values are ignored with a warning, leaving the file/default value.
pub fn apply_overrides<F>(settings: &mut TaskFlowSettings, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let read = |name: &str| lookup(name).filter(|v| !v.is_empty());

    // ── Storage ─────────────────────────────────────────────────────
    if let Some(v) = read("TASKFLOW_DB_PATH") {
        settings.storage.database_path = v;
    }
    if let Some(v) = read("TASKFLOW_POOL_SIZE") {
        match parse_u32_range(&v, 1, 64) {
            Some(n) => settings.storage.pool_size = n,
            None => warn_invalid("TASKFLOW_POOL_SIZE", &v),
        }
    }
    if let Some(v) = read("TASKFLOW_BUSY_TIMEOUT_MS") {
        match parse_u64_range(&v, 0, 600_000) {
            Some(n) => settings.storage.busy_timeout_ms = n,
            None => warn_invalid("TASKFLOW_BUSY_TIMEOUT_MS", &v),
        }
    }

    // ── Logging ─────────────────────────────────────────────────────
    if let Some(v) = read("TASKFLOW_LOG_LEVEL") {
        settings.logging.level = v;
    }

    // ── List ────────────────────────────────────────────────────────
    if let Some(v) = read("TASKFLOW_DEFAULT_SORT") {
        match parse_sort_option(&v) {
            Some(sort) => settings.list.default_sort = sort,
            None => warn_invalid("TASKFLOW_DEFAULT_SORT", &v),
        }
    }
    if let Some(v) = read("TASKFLOW_SEED_SAMPLE_DATA") {
        match parse_bool(&v) {
            Some(b) => settings.list.seed_sample_data = b,
            None => warn_invalid("TASKFLOW_SEED_SAMPLE_DATA", &v),
        }
    }
}

fn warn_invalid(key: &str, value: &str) {
    tracing::warn!(key, value, "invalid env var, ignoring");
}

// ── Pure parsing functions ──────────────────────────────────────────────────

/// Parse a string as a boolean.
///
/// Accepts (case-insensitive): `true`/`1`/`yes`/`on` or `false`/`0`/`no`/`off`.
pub fn parse_bool(val: &str) -> Option<bool> {
    match val.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Parse a string as a `u32` within a range.
pub fn parse_u32_range(val: &str, min: u32, max: u32) -> Option<u32> {
    let n: u32 = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

/// Parse a string as a `u64` within a range.
pub fn parse_u64_range(val: &str, min: u64, max: u64) -> Option<u64> {
    let n: u64 = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

/// Parse a sort identifier such as `DUE_DATE_ASC` (case-insensitive).
pub fn parse_sort_option(val: &str) -> Option<SortOption> {
    let upper = val.trim().to_uppercase();
    SortOption::ALL.into_iter().find(|o| o.as_str() == upper)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
