//! Observable state shapes for UI surfaces.

use taskflow_core::{ErrorKind, Task, TaskError};

/// Task list screen state.
#[derive(Debug, Clone, PartialEq)]
pub enum ListState {
    /// A query or the first emission is pending.
    Loading,
    /// Tasks in the order they should be shown.
    Success(Vec<Task>),
    /// The last list-affecting operation failed.
    Error {
        /// Failure family.
        kind: ErrorKind,
        /// Display message.
        message: String,
    },
}

impl ListState {
    /// Error state for a task error.
    pub fn from_error(err: &TaskError) -> Self {
        Self::Error {
            kind: err.kind(),
            message: err.to_string(),
        }
    }

    /// Tasks, if loaded.
    pub fn tasks(&self) -> Option<&[Task]> {
        match self {
            Self::Success(tasks) => Some(tasks),
            _ => None,
        }
    }

    /// Whether a load is pending.
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// Task detail screen state.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailState {
    /// Load pending.
    Loading,
    /// The requested task.
    Success(Task),
    /// Lookup failed or the task does not exist.
    Error {
        /// Failure family.
        kind: ErrorKind,
        /// Display message.
        message: String,
    },
}

impl DetailState {
    /// Error state for a task error.
    pub fn from_error(err: &TaskError) -> Self {
        Self::Error {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// Where the list state currently comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewMode {
    /// Live subscription to the full collection.
    #[default]
    Observing,
    /// One-shot search or filter result; writes do not refresh it.
    QueryResult,
}
