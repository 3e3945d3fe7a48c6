//! Single-task detail controller.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, instrument};

use crate::service::TaskService;
use crate::state::DetailState;

struct Inner {
    service: Arc<TaskService>,
    state: watch::Sender<DetailState>,
    generation: Mutex<(u64, CancellationToken)>,
    root: CancellationToken,
}

/// Loads one task for a detail view. Only the most recent
/// [`load_task`](Self::load_task) may publish.
pub struct TaskDetailController {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for TaskDetailController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskDetailController")
            .field("state", &*self.inner.state.borrow())
            .finish_non_exhaustive()
    }
}

impl TaskDetailController {
    /// Create a controller in the `Loading` state.
    pub fn new(service: Arc<TaskService>) -> Self {
        let root = CancellationToken::new();
        Self {
            inner: Arc::new(Inner {
                service,
                state: watch::channel(DetailState::Loading).0,
                generation: Mutex::new((0, root.child_token())),
                root,
            }),
        }
    }

    /// State receiver.
    pub fn state(&self) -> watch::Receiver<DetailState> {
        self.inner.state.subscribe()
    }

    /// Snapshot of the state.
    pub fn current_state(&self) -> DetailState {
        self.inner.state.borrow().clone()
    }

    /// Look up `id`, superseding any load still in flight.
    #[instrument(skip(self))]
    pub fn load_task(&self, id: &str) -> JoinHandle<()> {
        if self.inner.root.is_cancelled() {
            return tokio::spawn(async {});
        }
        let (generation, token) = {
            let mut current = self.inner.generation.lock();
            current.0 += 1;
            current.1.cancel();
            current.1 = self.inner.root.child_token();
            let _ = self.inner.state.send_replace(DetailState::Loading);
            (current.0, current.1.clone())
        };

        let inner = Arc::clone(&self.inner);
        let id = id.to_string();
        tokio::spawn(
            async move {
                let result = tokio::select! {
                    () = token.cancelled() => return,
                    result = inner.service.get(&id) => result,
                };
                let state = match result {
                    Ok(task) => DetailState::Success(task),
                    Err(error) => DetailState::from_error(&error),
                };
                let current = inner.generation.lock();
                if current.0 == generation {
                    let _ = inner.state.send_replace(state);
                } else {
                    debug!(task_id = %id, "discarding stale detail load");
                }
            }
            .in_current_span(),
        )
    }

    /// Cancel any in-flight load; later loads are ignored.
    pub fn dispose(&self) {
        self.inner.root.cancel();
    }
}

impl Drop for TaskDetailController {
    fn drop(&mut self) {
        self.inner.root.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use taskflow_core::{ErrorKind, FixedClock, TaskEdit};
    use taskflow_store::MemoryTaskStore;

    fn service() -> Arc<TaskService> {
        Arc::new(TaskService::new(
            Arc::new(MemoryTaskStore::new()),
            Arc::new(FixedClock(DateTime::from_timestamp(1_700_000_000, 0).unwrap())),
        ))
    }

    #[tokio::test]
    async fn loads_existing_task() {
        let svc = service();
        let task = svc.add(TaskEdit::titled("Read")).await.unwrap();
        let detail = TaskDetailController::new(svc);
        assert_eq!(detail.current_state(), DetailState::Loading);

        detail.load_task(&task.id).await.unwrap();
        assert_eq!(detail.current_state(), DetailState::Success(task));
    }

    #[tokio::test]
    async fn missing_task_is_not_found() {
        let detail = TaskDetailController::new(service());
        detail.load_task("task-missing").await.unwrap();
        assert_eq!(
            detail.current_state(),
            DetailState::Error {
                kind: ErrorKind::NotFound,
                message: "Task not found: task-missing".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn later_load_wins() {
        let svc = service();
        let first = svc.add(TaskEdit::titled("first")).await.unwrap();
        let second = svc.add(TaskEdit::titled("second")).await.unwrap();
        let detail = TaskDetailController::new(svc);

        let stale = detail.load_task(&first.id);
        let fresh = detail.load_task(&second.id);
        stale.await.unwrap();
        fresh.await.unwrap();
        assert_eq!(detail.current_state(), DetailState::Success(second));
    }
}
