//! In-memory [`TaskStore`].
//!
//! Keeps rows in insertion order behind a `parking_lot` lock and answers
//! list queries with the core query engine, so it orders results exactly
//! like the SQLite adapter. Used by tests and by embedders that do not want
//! a database file.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use taskflow_core::query::{filter_and_sort, title_matches};
use taskflow_core::{
    FilterOptions, Priority, SortOption, StoreError, Task, TaskStatus, TaskStore, TaskStream,
};

use crate::notify::{ChangeNotifier, watch_collection};

#[derive(Debug, Default)]
struct Rows {
    /// `(insertion sequence, task)`; upserts keep their sequence.
    tasks: Vec<(u64, Task)>,
    next_seq: u64,
}

impl Rows {
    fn newest_first(&self) -> Vec<Task> {
        let mut rows: Vec<&(u64, Task)> = self.tasks.iter().collect();
        rows.sort_by(|(seq_a, a), (seq_b, b)| {
            b.created_at.cmp(&a.created_at).then(seq_b.cmp(seq_a))
        });
        rows.into_iter().map(|(_, t)| t.clone()).collect()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.tasks.iter().position(|(_, t)| t.id == id)
    }
}

/// Task store held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryTaskStore {
    rows: Arc<RwLock<Rows>>,
    notifier: ChangeNotifier,
}

impl MemoryTaskStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn select(&self, keep: impl Fn(&Task) -> bool) -> Vec<Task> {
        self.rows
            .read()
            .newest_first()
            .into_iter()
            .filter(|t| keep(t))
            .collect()
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    fn subscribe_all(&self) -> TaskStream {
        watch_collection(self.clone(), &self.notifier)
    }

    async fn select_all(&self) -> Result<Vec<Task>, StoreError> {
        Ok(self.rows.read().newest_first())
    }

    async fn select_by_id(&self, id: &str) -> Result<Option<Task>, StoreError> {
        let rows = self.rows.read();
        Ok(rows.position(id).map(|i| rows.tasks[i].1.clone()))
    }

    async fn search_by_title(&self, query: &str) -> Result<Vec<Task>, StoreError> {
        Ok(self.select(|t| title_matches(&t.title, query)))
    }

    async fn select_filtered(
        &self,
        statuses: &BTreeSet<TaskStatus>,
        priorities: &BTreeSet<Priority>,
        sort: SortOption,
    ) -> Result<Vec<Task>, StoreError> {
        let filter = FilterOptions {
            statuses: statuses.clone(),
            priorities: priorities.clone(),
            show_overdue_only: false,
        };
        let all = self.rows.read().newest_first();
        // overdue is off, so `now` is never consulted
        Ok(filter_and_sort(&all, &filter, sort, chrono::DateTime::UNIX_EPOCH))
    }

    async fn select_by_status(&self, status: TaskStatus) -> Result<Vec<Task>, StoreError> {
        Ok(self.select(|t| t.status == status))
    }

    async fn select_by_priority(&self, priority: Priority) -> Result<Vec<Task>, StoreError> {
        Ok(self.select(|t| t.priority == priority))
    }

    async fn insert(&self, task: &Task) -> Result<(), StoreError> {
        {
            let mut rows = self.rows.write();
            match rows.position(&task.id) {
                Some(i) => rows.tasks[i].1 = task.clone(),
                None => {
                    let seq = rows.next_seq;
                    rows.next_seq += 1;
                    rows.tasks.push((seq, task.clone()));
                }
            }
        }
        self.notifier.notify();
        Ok(())
    }

    async fn update(&self, task: &Task) -> Result<bool, StoreError> {
        let changed = {
            let mut rows = self.rows.write();
            match rows.position(&task.id) {
                Some(i) => {
                    rows.tasks[i].1 = task.clone();
                    true
                }
                None => false,
            }
        };
        if changed {
            self.notifier.notify();
        }
        Ok(changed)
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let removed = {
            let mut rows = self.rows.write();
            rows.position(id).map(|i| rows.tasks.remove(i)).is_some()
        };
        if removed {
            self.notifier.notify();
        }
        Ok(removed)
    }

    async fn delete_all(&self) -> Result<u64, StoreError> {
        let removed = {
            let mut rows = self.rows.write();
            let n = rows.tasks.len();
            rows.tasks.clear();
            n
        };
        if removed > 0 {
            self.notifier.notify();
        }
        Ok(removed as u64)
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.rows.read().tasks.len() as u64)
    }

    async fn count_by_status(&self, status: TaskStatus) -> Result<u64, StoreError> {
        let rows = self.rows.read();
        Ok(rows.tasks.iter().filter(|(_, t)| t.status == status).count() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use futures::StreamExt;
    use taskflow_core::TaskEdit;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    fn task(id: &str, title: &str, status: TaskStatus, created: i64) -> Task {
        Task::create(
            id.to_string(),
            at(created),
            TaskEdit {
                status,
                ..TaskEdit::titled(title)
            },
        )
    }

    fn ids(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.id.as_str()).collect()
    }

    #[tokio::test]
    async fn ties_break_on_latest_insert() {
        let store = MemoryTaskStore::new();
        store.insert(&task("a", "first", TaskStatus::Todo, 10)).await.unwrap();
        store.insert(&task("b", "second", TaskStatus::Todo, 10)).await.unwrap();
        store.insert(&task("c", "older", TaskStatus::Todo, 5)).await.unwrap();
        assert_eq!(ids(&store.select_all().await.unwrap()), ["b", "a", "c"]);

        // upsert keeps rank
        store.insert(&task("a", "renamed", TaskStatus::Done, 10)).await.unwrap();
        assert_eq!(ids(&store.select_all().await.unwrap()), ["b", "a", "c"]);
        assert_eq!(store.count_by_status(TaskStatus::Done).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn update_missing_is_false() {
        let store = MemoryTaskStore::new();
        assert!(!store.update(&task("x", "x", TaskStatus::Todo, 1)).await.unwrap());
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn search_and_delete() {
        let store = MemoryTaskStore::new();
        store.insert(&task("m", "Buy Milk", TaskStatus::Todo, 1)).await.unwrap();
        store.insert(&task("w", "Walk dog", TaskStatus::Todo, 2)).await.unwrap();
        assert_eq!(ids(&store.search_by_title("milk").await.unwrap()), ["m"]);
        assert!(store.delete("m").await.unwrap());
        assert!(!store.delete("m").await.unwrap());
        assert_eq!(store.delete_all().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn subscription_sees_writes() {
        let store = MemoryTaskStore::new();
        let mut stream = store.subscribe_all();
        assert!(stream.next().await.unwrap().unwrap().is_empty());
        store.insert(&task("a", "a", TaskStatus::Todo, 1)).await.unwrap();
        assert_eq!(ids(&stream.next().await.unwrap().unwrap()), ["a"]);
    }
}
