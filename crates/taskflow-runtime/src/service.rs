//! Use-case layer over the persistence port.
//!
//! [`TaskService`] owns validation, id and timestamp assignment, and the
//! overdue post-filter. Controllers call it; it never touches UI state.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use taskflow_core::query::retain_overdue;
use taskflow_core::{
    Clock, FilterOptions, SortOption, Task, TaskEdit, TaskError, TaskStatistics, TaskStatus,
    TaskStore, TaskStream, generate_task_id,
};
use tracing::{debug, instrument};

/// Task use cases, constructed with an explicit store and clock.
#[derive(Clone)]
pub struct TaskService {
    store: Arc<dyn TaskStore>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for TaskService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskService").finish_non_exhaustive()
    }
}

impl TaskService {
    /// Create a service.
    pub fn new(store: Arc<dyn TaskStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// The underlying store.
    pub fn store(&self) -> &Arc<dyn TaskStore> {
        &self.store
    }

    /// Current time from the injected clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Live collection, newest first.
    pub fn observe_all(&self) -> TaskStream {
        self.store.subscribe_all()
    }

    /// Every task, newest first.
    pub async fn all(&self) -> Result<Vec<Task>, TaskError> {
        Ok(self.store.select_all().await?)
    }

    /// One task by id.
    pub async fn get(&self, id: &str) -> Result<Task, TaskError> {
        self.store
            .select_by_id(id)
            .await?
            .ok_or_else(|| TaskError::task_not_found(id))
    }

    /// Title search. The query is trimmed; a blank query lists everything.
    pub async fn search(&self, query: &str) -> Result<Vec<Task>, TaskError> {
        let query = query.trim();
        if query.is_empty() {
            return self.all().await;
        }
        let tasks = self.store.search_by_title(query).await?;
        debug!(query, matches = tasks.len(), "search");
        Ok(tasks)
    }

    /// Status/priority filtering and ordering run in the store; the overdue
    /// flag is applied afterwards against a single captured `now`.
    pub async fn filter(
        &self,
        filter: &FilterOptions,
        sort: SortOption,
    ) -> Result<Vec<Task>, TaskError> {
        let mut tasks = self
            .store
            .select_filtered(&filter.statuses, &filter.priorities, sort)
            .await?;
        if filter.show_overdue_only {
            retain_overdue(&mut tasks, self.clock.now());
        }
        debug!(%sort, matches = tasks.len(), "filter");
        Ok(tasks)
    }

    /// Validate and insert a new task.
    #[instrument(skip_all)]
    pub async fn add(&self, edit: TaskEdit) -> Result<Task, TaskError> {
        edit.validate()?;
        let task = Task::create(generate_task_id(), self.clock.now(), edit);
        self.store.insert(&task).await?;
        debug!(task_id = %task.id, "task added");
        Ok(task)
    }

    /// Validate and replace every editable field of an existing task.
    #[instrument(skip(self, edit))]
    pub async fn update(&self, id: &str, edit: TaskEdit) -> Result<Task, TaskError> {
        edit.validate()?;
        let updated = self.get(id).await?.with_edits(edit);
        self.write_existing(updated).await
    }

    /// Change only the status of an existing task.
    #[instrument(skip(self))]
    pub async fn update_status(&self, id: &str, status: TaskStatus) -> Result<Task, TaskError> {
        let updated = self.get(id).await?.with_status(status);
        self.write_existing(updated).await
    }

    async fn write_existing(&self, task: Task) -> Result<Task, TaskError> {
        if self.store.update(&task).await? {
            Ok(task)
        } else {
            // deleted between read and write
            Err(TaskError::task_not_found(task.id))
        }
    }

    /// Delete by id. Deleting a missing id succeeds and returns `false`.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<bool, TaskError> {
        let removed = self.store.delete(id).await?;
        if !removed {
            debug!(task_id = id, "delete of missing task ignored");
        }
        Ok(removed)
    }

    /// Delete every task.
    pub async fn delete_all(&self) -> Result<u64, TaskError> {
        Ok(self.store.delete_all().await?)
    }

    /// Number of tasks.
    pub async fn count(&self) -> Result<u64, TaskError> {
        Ok(self.store.count().await?)
    }

    /// Counts by status, from store count queries.
    pub async fn statistics(&self) -> Result<TaskStatistics, TaskError> {
        let (total, todo, in_progress, done) = tokio::try_join!(
            self.store.count(),
            self.store.count_by_status(TaskStatus::Todo),
            self.store.count_by_status(TaskStatus::InProgress),
            self.store.count_by_status(TaskStatus::Done),
        )?;
        Ok(TaskStatistics::from_counts(total, todo, in_progress, done))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
