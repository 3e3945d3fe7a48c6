//! Persisted row shape and its mapping to the domain [`Task`].

use chrono::{DateTime, Utc};
use rusqlite::Row;
use taskflow_core::{Priority, Task, TaskStatus};

/// One row of the `tasks` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskEntity {
    /// Primary key.
    pub id: String,
    /// Trimmed title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// [`Priority`] ordinal.
    pub priority: i64,
    /// [`TaskStatus`] ordinal.
    pub status: i64,
    /// Due date in epoch milliseconds.
    pub due_date: Option<i64>,
    /// Creation time in epoch milliseconds.
    pub created_at: i64,
}

/// Column list matching [`TaskEntity::from_row`].
pub const TASK_COLUMNS: &str = "id, title, description, priority, status, due_date, created_at";

impl TaskEntity {
    /// Read a row selected with [`TASK_COLUMNS`].
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            title: row.get("title")?,
            description: row.get("description")?,
            priority: row.get("priority")?,
            status: row.get("status")?,
            due_date: row.get("due_date")?,
            created_at: row.get("created_at")?,
        })
    }

    /// Convert a domain task into its row.
    pub fn from_domain(task: &Task) -> Self {
        Self {
            id: task.id.clone(),
            title: task.title.clone(),
            description: task.description.clone(),
            priority: task.priority.value(),
            status: task.status.value(),
            due_date: task.due_date.map(|d| d.timestamp_millis()),
            created_at: task.created_at.timestamp_millis(),
        }
    }

    /// Convert into a domain task. The schema's `CHECK` constraints keep
    /// ordinals in range; out-of-range timestamps clamp to the epoch.
    pub fn into_domain(self) -> Task {
        Task {
            id: self.id,
            title: self.title,
            description: self.description,
            priority: Priority::from_value(self.priority),
            status: TaskStatus::from_value(self.status),
            due_date: self.due_date.map(millis_to_utc),
            created_at: millis_to_utc(self.created_at),
        }
    }
}

fn millis_to_utc(ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms).unwrap_or(DateTime::UNIX_EPOCH)
}
