//! Task counts by status.

use serde::{Deserialize, Serialize};

use crate::types::{Task, TaskStatus};

/// Aggregate counts for the statistics panel.
///
/// `total` is stored rather than derived so store-side counts, which run as
/// separate queries, are reported as-is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStatistics {
    /// All tasks.
    pub total: u64,
    /// Tasks in [`TaskStatus::Todo`].
    pub todo: u64,
    /// Tasks in [`TaskStatus::InProgress`].
    pub in_progress: u64,
    /// Tasks in [`TaskStatus::Done`].
    pub done: u64,
}

impl TaskStatistics {
    /// Count a task slice.
    #[must_use]
    pub fn from_tasks(tasks: &[Task]) -> Self {
        tasks.iter().fold(Self::default(), |mut stats, task| {
            stats.total += 1;
            match task.status {
                TaskStatus::Todo => stats.todo += 1,
                TaskStatus::InProgress => stats.in_progress += 1,
                TaskStatus::Done => stats.done += 1,
            }
            stats
        })
    }

    /// Assemble from separately queried counts.
    #[must_use]
    pub fn from_counts(total: u64, todo: u64, in_progress: u64, done: u64) -> Self {
        Self {
            total,
            todo,
            in_progress,
            done,
        }
    }

    /// Count for one status.
    #[must_use]
    pub fn count(&self, status: TaskStatus) -> u64 {
        match status {
            TaskStatus::Todo => self.todo,
            TaskStatus::InProgress => self.in_progress,
            TaskStatus::Done => self.done,
        }
    }

    /// Fraction of tasks done, in `[0, 1]`. Zero when there are no tasks.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn completion_rate(&self) -> f32 {
        if self.total == 0 {
            return 0.0;
        }
        (self.done as f64 / self.total as f64) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TaskEdit;
    use chrono::DateTime;

    fn task(id: &str, status: TaskStatus) -> Task {
        Task::create(
            id.to_string(),
            DateTime::from_timestamp(0, 0).unwrap(),
            TaskEdit {
                status,
                ..TaskEdit::titled(id)
            },
        )
    }

    #[test]
    fn test_empty_statistics() {
        let stats = TaskStatistics::from_tasks(&[]);
        assert_eq!(stats, TaskStatistics::default());
        assert!(stats.completion_rate().abs() < f32::EPSILON);
    }

    #[test]
    fn test_counts_by_status() {
        let tasks = [
            task("a", TaskStatus::Todo),
            task("b", TaskStatus::Done),
            task("c", TaskStatus::Done),
            task("d", TaskStatus::InProgress),
        ];
        let stats = TaskStatistics::from_tasks(&tasks);
        assert_eq!(stats, TaskStatistics::from_counts(4, 1, 1, 2));
        assert_eq!(stats.count(TaskStatus::Done), 2);
        assert!((stats.completion_rate() - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_all_done_rate_is_one() {
        let stats = TaskStatistics::from_counts(3, 0, 0, 3);
        assert!((stats.completion_rate() - 1.0).abs() < f32::EPSILON);
    }
}
