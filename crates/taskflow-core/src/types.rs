//! Core types for the task domain.
//!
//! All serializable types use `camelCase` field names. Enum variants
//! serialize in `SCREAMING_SNAKE_CASE` so persisted settings and exported
//! task lists read the same as the sort and status identifiers users see in
//! configuration files.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

/// Maximum number of characters allowed in a task title.
pub const MAX_TITLE_CHARS: usize = 200;

// ─────────────────────────────────────────────────────────────────────────────
// Enums
// ─────────────────────────────────────────────────────────────────────────────

/// Task priority level. Ordering follows the ordinal (`Low < Medium < High`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    /// Ordinal 0.
    Low,
    /// Ordinal 1.
    Medium,
    /// Ordinal 2.
    High,
}

impl Priority {
    /// All priorities in ordinal order.
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];

    /// Numeric ordinal as persisted.
    #[must_use]
    pub fn value(self) -> i64 {
        match self {
            Self::Low => 0,
            Self::Medium => 1,
            Self::High => 2,
        }
    }

    /// Decode a persisted ordinal. Unknown values fall back to [`Priority::Low`].
    #[must_use]
    pub fn from_value(value: i64) -> Self {
        match value {
            1 => Self::Medium,
            2 => Self::High,
            _ => Self::Low,
        }
    }
}

/// Task status in the workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Not started.
    Todo,
    /// Being worked on.
    InProgress,
    /// Completed.
    Done,
}

impl TaskStatus {
    /// All statuses in ordinal order.
    pub const ALL: [Self; 3] = [Self::Todo, Self::InProgress, Self::Done];

    /// Numeric ordinal as persisted.
    #[must_use]
    pub fn value(self) -> i64 {
        match self {
            Self::Todo => 0,
            Self::InProgress => 1,
            Self::Done => 2,
        }
    }

    /// Decode a persisted ordinal. Unknown values fall back to [`TaskStatus::Todo`].
    #[must_use]
    pub fn from_value(value: i64) -> Self {
        match value {
            1 => Self::InProgress,
            2 => Self::Done,
            _ => Self::Todo,
        }
    }
}

/// The single active ordering of a task list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortOption {
    /// Newest first.
    #[default]
    DateCreatedDesc,
    /// Oldest first.
    DateCreatedAsc,
    /// Nearest due date first; undated tasks last.
    DueDateAsc,
    /// Farthest due date first; undated tasks last.
    DueDateDesc,
    /// High → Medium → Low.
    PriorityHighToLow,
    /// Low → Medium → High.
    PriorityLowToHigh,
    /// Ordinal title order.
    TitleAToZ,
    /// Reverse ordinal title order.
    TitleZToA,
}

impl SortOption {
    /// Every sort option, in menu order.
    pub const ALL: [Self; 8] = [
        Self::DateCreatedDesc,
        Self::DateCreatedAsc,
        Self::DueDateAsc,
        Self::DueDateDesc,
        Self::PriorityHighToLow,
        Self::PriorityLowToHigh,
        Self::TitleAToZ,
        Self::TitleZToA,
    ];

    /// Stable identifier, as used in settings files.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DateCreatedDesc => "DATE_CREATED_DESC",
            Self::DateCreatedAsc => "DATE_CREATED_ASC",
            Self::DueDateAsc => "DUE_DATE_ASC",
            Self::DueDateDesc => "DUE_DATE_DESC",
            Self::PriorityHighToLow => "PRIORITY_HIGH_TO_LOW",
            Self::PriorityLowToHigh => "PRIORITY_LOW_TO_HIGH",
            Self::TitleAToZ => "TITLE_A_TO_Z",
            Self::TitleZToA => "TITLE_Z_TO_A",
        }
    }
}

impl std::fmt::Display for SortOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Filter
// ─────────────────────────────────────────────────────────────────────────────

/// Filter criteria for a task list. Empty sets match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterOptions {
    /// Statuses to keep.
    pub statuses: BTreeSet<TaskStatus>,
    /// Priorities to keep.
    pub priorities: BTreeSet<Priority>,
    /// Keep only overdue tasks.
    pub show_overdue_only: bool,
}

impl FilterOptions {
    /// Whether no criterion is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty() && self.priorities.is_empty() && !self.show_overdue_only
    }

    /// Status and priority membership (the overdue flag is not consulted).
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        (self.statuses.is_empty() || self.statuses.contains(&task.status))
            && (self.priorities.is_empty() || self.priorities.contains(&task.priority))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Task
// ─────────────────────────────────────────────────────────────────────────────

/// A to-do item.
///
/// Equality and hashing use `id` only. `id` and `created_at` never change
/// after creation; edits go through [`Task::with_edits`] and
/// [`Task::with_status`], which return a new value.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique, stable identifier.
    pub id: String,
    /// Non-blank title, at most [`MAX_TITLE_CHARS`] characters.
    pub title: String,
    /// Optional free-form description.
    pub description: Option<String>,
    /// Priority level.
    pub priority: Priority,
    /// Workflow status.
    pub status: TaskStatus,
    /// Optional due date.
    pub due_date: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl PartialEq for Task {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Task {}

impl std::hash::Hash for Task {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Task {
    /// Build a task from validated edit fields.
    #[must_use]
    pub fn create(id: String, created_at: DateTime<Utc>, edit: TaskEdit) -> Self {
        let edit = edit.normalized();
        Self {
            id,
            title: edit.title,
            description: edit.description,
            priority: edit.priority,
            status: edit.status,
            due_date: edit.due_date,
            created_at,
        }
    }

    /// True iff a due date is set, it lies before `now`, and the task is not done.
    #[must_use]
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.due_date
            .is_some_and(|due| due < now && self.status != TaskStatus::Done)
    }

    /// True iff the status is [`TaskStatus::Done`].
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Done
    }

    /// Copy with every editable field replaced. `id` and `created_at` are kept.
    #[must_use]
    pub fn with_edits(&self, edit: TaskEdit) -> Self {
        Self::create(self.id.clone(), self.created_at, edit)
    }

    /// Copy with only the status changed.
    #[must_use]
    pub fn with_status(&self, status: TaskStatus) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }

    /// Field-by-field comparison, unlike `==` which compares ids.
    #[must_use]
    pub fn same_content(&self, other: &Self) -> bool {
        self.id == other.id
            && self.title == other.title
            && self.description == other.description
            && self.priority == other.priority
            && self.status == other.status
            && self.due_date == other.due_date
            && self.created_at == other.created_at
    }
}

/// Editable task fields, used for both creation and full updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskEdit {
    /// Title (trimmed on apply).
    pub title: String,
    /// Description (trimmed on apply; blank becomes `None`).
    pub description: Option<String>,
    /// Priority level.
    pub priority: Priority,
    /// Workflow status.
    pub status: TaskStatus,
    /// Optional due date.
    pub due_date: Option<DateTime<Utc>>,
}

impl TaskEdit {
    /// Edit with the given title and defaults elsewhere (`Low`, `Todo`, no dates).
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            priority: Priority::Low,
            status: TaskStatus::Todo,
            due_date: None,
        }
    }

    /// Validate the title.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_title(&self.title)
    }

    /// Trim the title and description; drop a blank description.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            description: self
                .description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
            ..self
        }
    }
}

/// Reject blank titles and titles longer than [`MAX_TITLE_CHARS`] characters.
pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::BlankTitle);
    }
    let len = title.chars().count();
    if len > MAX_TITLE_CHARS {
        return Err(ValidationError::TitleTooLong { len });
    }
    Ok(())
}
