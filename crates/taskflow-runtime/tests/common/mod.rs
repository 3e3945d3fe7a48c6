//! Shared fixtures for controller integration tests.

#![allow(dead_code)]

use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::{StreamExt, stream};
use taskflow_core::{
    FixedClock, Priority, SortOption, StoreError, Task, TaskStatus, TaskStore, TaskStream,
};
use taskflow_runtime::TaskService;
use taskflow_store::MemoryTaskStore;
use tokio::sync::{Notify, watch};

pub fn now() -> DateTime<Utc> {
    DateTime::from_timestamp_millis(1_700_000_000_000).unwrap()
}

/// Memory store with injectable faults and a gate for slow searches.
#[derive(Default)]
pub struct FaultyStore {
    inner: MemoryTaskStore,
    /// Title searches containing this text wait for `gate`.
    pub slow_query: parking_lot::Mutex<Option<String>>,
    pub gate: Notify,
    pub fail_counts: AtomicBool,
    pub fail_writes: AtomicBool,
    /// One-shot reads (search and filter) fail.
    pub fail_queries: AtomicBool,
    /// New subscriptions emit a single error.
    pub fail_subscription: AtomicBool,
}

impl FaultyStore {
    fn check_writes(&self) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::backend("disk full"));
        }
        Ok(())
    }

    fn check_queries(&self) -> Result<(), StoreError> {
        if self.fail_queries.load(Ordering::SeqCst) {
            return Err(StoreError::backend("query failed"));
        }
        Ok(())
    }
}

#[async_trait]
impl TaskStore for FaultyStore {
    fn subscribe_all(&self) -> TaskStream {
        if self.fail_subscription.load(Ordering::SeqCst) {
            let failure = StoreError::backend("subscription lost");
            return stream::once(async move { Err::<Vec<Task>, _>(failure) }).boxed();
        }
        self.inner.subscribe_all()
    }

    async fn select_all(&self) -> Result<Vec<Task>, StoreError> {
        self.inner.select_all().await
    }

    async fn select_by_id(&self, id: &str) -> Result<Option<Task>, StoreError> {
        self.inner.select_by_id(id).await
    }

    async fn search_by_title(&self, query: &str) -> Result<Vec<Task>, StoreError> {
        let slow = self.slow_query.lock().as_deref() == Some(query);
        if slow {
            self.gate.notified().await;
        }
        self.check_queries()?;
        self.inner.search_by_title(query).await
    }

    async fn select_filtered(
        &self,
        statuses: &BTreeSet<TaskStatus>,
        priorities: &BTreeSet<Priority>,
        sort: SortOption,
    ) -> Result<Vec<Task>, StoreError> {
        self.check_queries()?;
        self.inner.select_filtered(statuses, priorities, sort).await
    }

    async fn select_by_status(&self, status: TaskStatus) -> Result<Vec<Task>, StoreError> {
        self.inner.select_by_status(status).await
    }

    async fn select_by_priority(&self, priority: Priority) -> Result<Vec<Task>, StoreError> {
        self.inner.select_by_priority(priority).await
    }

    async fn insert(&self, task: &Task) -> Result<(), StoreError> {
        self.check_writes()?;
        self.inner.insert(task).await
    }

    async fn update(&self, task: &Task) -> Result<bool, StoreError> {
        self.check_writes()?;
        self.inner.update(task).await
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        self.check_writes()?;
        self.inner.delete(id).await
    }

    async fn delete_all(&self) -> Result<u64, StoreError> {
        self.check_writes()?;
        self.inner.delete_all().await
    }

    async fn count(&self) -> Result<u64, StoreError> {
        if self.fail_counts.load(Ordering::SeqCst) {
            return Err(StoreError::backend("count unavailable"));
        }
        self.inner.count().await
    }

    async fn count_by_status(&self, status: TaskStatus) -> Result<u64, StoreError> {
        if self.fail_counts.load(Ordering::SeqCst) {
            return Err(StoreError::backend("count unavailable"));
        }
        self.inner.count_by_status(status).await
    }
}

pub fn service_with(store: Arc<FaultyStore>) -> Arc<TaskService> {
    Arc::new(TaskService::new(store, Arc::new(FixedClock(now()))))
}

/// Wait until `pred` holds, failing the test after five seconds.
pub async fn wait_for<T, F>(rx: &mut watch::Receiver<T>, pred: F) -> T
where
    T: Clone,
    F: FnMut(&T) -> bool,
{
    tokio::time::timeout(Duration::from_secs(5), rx.wait_for(pred))
        .await
        .expect("timed out waiting for state")
        .expect("sender dropped")
        .clone()
}

pub fn titles(tasks: &[Task]) -> Vec<String> {
    tasks.iter().map(|t| t.title.clone()).collect()
}
