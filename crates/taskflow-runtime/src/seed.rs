//! Sample data for first launch.

use chrono::{DateTime, Duration, Utc};
use taskflow_core::{Priority, TaskEdit, TaskError, TaskStatus};
use tracing::info;

use crate::service::TaskService;

/// The ten sample tasks, with due dates relative to `now`.
pub fn sample_tasks(now: DateTime<Utc>) -> Vec<TaskEdit> {
    let days = |n: i64| Some(now + Duration::days(n));
    let rows: [(&str, &str, Priority, TaskStatus, Option<DateTime<Utc>>); 10] = [
        (
            "Fix critical bug in production",
            "Users are reporting app crashes on Android 14. Needs immediate attention.",
            Priority::High,
            TaskStatus::InProgress,
            days(-2),
        ),
        (
            "Review pull requests",
            "Review and merge pending PRs from team members.",
            Priority::Medium,
            TaskStatus::Todo,
            Some(now),
        ),
        (
            "Update project documentation",
            "Add API documentation and code examples for new features.",
            Priority::Low,
            TaskStatus::Todo,
            days(7),
        ),
        (
            "Prepare presentation for stakeholders",
            "Create slides showcasing Q4 progress and goals.",
            Priority::High,
            TaskStatus::Todo,
            days(1),
        ),
        (
            "Setup CI/CD pipeline",
            "Configure GitHub Actions for automated testing and deployment.",
            Priority::High,
            TaskStatus::Done,
            days(-5),
        ),
        (
            "Optimize database queries",
            "Improve performance of slow queries in the dashboard.",
            Priority::Medium,
            TaskStatus::InProgress,
            days(3),
        ),
        (
            "Refactor legacy code",
            "Clean up old authentication module.",
            Priority::Low,
            TaskStatus::Todo,
            None,
        ),
        (
            "Security audit",
            "Conduct security review of API endpoints and implement fixes.",
            Priority::High,
            TaskStatus::Todo,
            days(5),
        ),
        (
            "Design new onboarding flow",
            "Create wireframes and user flow for improved user onboarding.",
            Priority::Medium,
            TaskStatus::Done,
            days(-10),
        ),
        (
            "Research new libraries",
            "Evaluate potential libraries for state management and networking.",
            Priority::Low,
            TaskStatus::Todo,
            days(14),
        ),
    ];

    rows.into_iter()
        .map(|(title, description, priority, status, due_date)| TaskEdit {
            title: title.to_string(),
            description: Some(description.to_string()),
            priority,
            status,
            due_date,
        })
        .collect()
}

/// Insert the sample tasks if the store is empty. Returns how many were added.
pub async fn seed_if_empty(service: &TaskService) -> Result<usize, TaskError> {
    if service.count().await? > 0 {
        return Ok(0);
    }
    let samples = sample_tasks(service.now());
    let total = samples.len();
    for edit in samples {
        let _ = service.add(edit).await?;
    }
    info!(count = total, "seeded sample tasks");
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use taskflow_core::FixedClock;
    use taskflow_store::MemoryTaskStore;

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn samples_are_valid() {
        let samples = sample_tasks(now());
        assert_eq!(samples.len(), 10);
        assert!(samples.iter().all(|s| s.validate().is_ok()));
        assert_eq!(samples.iter().filter(|s| s.due_date.is_none()).count(), 1);
        assert_eq!(
            samples.iter().filter(|s| s.status == TaskStatus::Done).count(),
            2
        );
    }

    #[tokio::test]
    async fn seeds_only_empty_store() {
        let svc = TaskService::new(Arc::new(MemoryTaskStore::new()), Arc::new(FixedClock(now())));
        assert_eq!(seed_if_empty(&svc).await.unwrap(), 10);
        assert_eq!(seed_if_empty(&svc).await.unwrap(), 0);
        assert_eq!(svc.count().await.unwrap(), 10);

        let stats = svc.statistics().await.unwrap();
        assert_eq!((stats.todo, stats.in_progress, stats.done), (6, 2, 2));
    }
}
