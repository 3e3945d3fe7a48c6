//! Task error types.
//!
//! Three failure families reach the state controller: validation of user
//! input, missing tasks, and persistence failures. Each carries its own
//! variant so the UI can tell them apart by [`ErrorKind`] rather than by
//! parsing messages.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Title validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Title is empty or whitespace only.
    #[error("Title cannot be empty")]
    BlankTitle,

    /// Title exceeds the character limit.
    #[error("Title too long (max 200 chars)")]
    TitleTooLong {
        /// Character count of the rejected title.
        len: usize,
    },
}

/// Persistence port failure.
///
/// Adapters convert their backend errors into this type at the port
/// boundary so callers never depend on a specific database crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The storage backend reported an error.
    #[error("Storage error: {0}")]
    Backend(String),

    /// The worker running a blocking storage call failed or was cancelled.
    #[error("Storage worker failed: {0}")]
    Worker(String),
}

impl StoreError {
    /// Create a backend error from any displayable value.
    pub fn backend(err: impl std::fmt::Display) -> Self {
        Self::Backend(err.to_string())
    }
}

/// Errors from task operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskError {
    /// Input failed validation; the store was not touched.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No task exists with the given id.
    #[error("Task not found: {id}")]
    NotFound {
        /// The id that was looked up.
        id: String,
    },

    /// The persistence port failed.
    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl TaskError {
    /// Create a not-found error for a task.
    pub fn task_not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Classify the error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Storage(_) => ErrorKind::Storage,
        }
    }
}

/// Coarse error classification surfaced in UI state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Bad user input.
    Validation,
    /// Referenced task does not exist.
    NotFound,
    /// Persistence failure.
    Storage,
}
