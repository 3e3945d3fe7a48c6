//! Persistence port.
//!
//! [`TaskStore`] is the only way the runtime touches stored tasks. Adapters
//! live in `taskflow-store`; every method reports failures as [`StoreError`]
//! and never drops a write silently.
//!
//! Ordering contract shared by every list-returning method: the sort key
//! first, then `created_at` descending, then most recently inserted first.

use std::collections::BTreeSet;

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::errors::StoreError;
use crate::types::{Priority, SortOption, Task, TaskStatus};

/// Live task collection: the current snapshot, then a fresh snapshot after
/// every committed write.
pub type TaskStream = BoxStream<'static, Result<Vec<Task>, StoreError>>;

/// Asynchronous task persistence.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Subscribe to the full collection, newest first.
    fn subscribe_all(&self) -> TaskStream;

    /// Every task, newest first.
    async fn select_all(&self) -> Result<Vec<Task>, StoreError>;

    /// One task by id.
    async fn select_by_id(&self, id: &str) -> Result<Option<Task>, StoreError>;

    /// Tasks whose title contains `query`, case-insensitively. Newest first.
    ///
    /// `query` is used as given; callers trim and handle blank queries.
    async fn search_by_title(&self, query: &str) -> Result<Vec<Task>, StoreError>;

    /// Tasks matching the status and priority sets (empty set = any), ordered
    /// by `sort`.
    async fn select_filtered(
        &self,
        statuses: &BTreeSet<TaskStatus>,
        priorities: &BTreeSet<Priority>,
        sort: SortOption,
    ) -> Result<Vec<Task>, StoreError>;

    /// Tasks with the given status, newest first.
    async fn select_by_status(&self, status: TaskStatus) -> Result<Vec<Task>, StoreError>;

    /// Tasks with the given priority, newest first.
    async fn select_by_priority(&self, priority: Priority) -> Result<Vec<Task>, StoreError>;

    /// Insert, or replace the task with the same id.
    async fn insert(&self, task: &Task) -> Result<(), StoreError>;

    /// Replace an existing task. Returns `false` if no row had that id.
    async fn update(&self, task: &Task) -> Result<bool, StoreError>;

    /// Delete by id. Returns `false` if no row had that id.
    async fn delete(&self, id: &str) -> Result<bool, StoreError>;

    /// Delete everything. Returns the number of rows removed.
    async fn delete_all(&self) -> Result<u64, StoreError>;

    /// Number of tasks.
    async fn count(&self) -> Result<u64, StoreError>;

    /// Number of tasks with the given status.
    async fn count_by_status(&self, status: TaskStatus) -> Result<u64, StoreError>;
}
