//! # taskflow-settings
//!
//! Layered configuration for TaskFlow.
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults**: [`TaskFlowSettings::default()`]
//! 2. **User file**: `~/.taskflow/settings.json` (deep-merged over defaults)
//! 3. **Environment variables**: `TASKFLOW_*` overrides (highest priority)
//!
//! There is no global instance: load once at startup and hand the value to
//! whatever needs it.

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{deep_merge, load_settings, load_settings_from_path, settings_path};
pub use types::*;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn re_exports_work() {
        let _settings = TaskFlowSettings::default();
        assert!(settings_path().ends_with(".taskflow/settings.json"));
    }
}
