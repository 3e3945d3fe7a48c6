//! Task list state controller.
//!
//! [`TaskListController`] mediates between the [`TaskService`] and UI
//! observers. State lives in `watch` channels; UI surfaces hold receivers and
//! call the action methods, each of which spawns its work on Tokio and
//! returns the `JoinHandle`.
//!
//! The list has two sources that never run at the same time:
//!
//! - **Observing**: a live subscription to the whole collection, shown in the
//!   controller's default sort order. Entered at construction and by
//!   [`TaskListController::clear_filters`].
//! - **Query result**: a one-shot search or filter. Entered by `search`,
//!   `apply_filters`, and `set_sort_option`. Writes in this mode do not re-run
//!   the query; call [`TaskListController::refresh`] to do so.
//!
//! Every list-affecting action bumps a generation counter under the
//! operations lock and cancels its predecessor's token. Results carry the
//! generation they were issued under and are dropped if it is no longer
//! current, so a slow response can never overwrite a newer one. Statistics
//! refreshes use a separate counter and never touch the list state.

use std::collections::BTreeSet;
use std::future::Future;
use std::sync::Arc;

use futures::StreamExt;
use parking_lot::Mutex;
use taskflow_core::query::sort_tasks;
use taskflow_core::{
    FilterOptions, Priority, SortOption, TaskEdit, TaskError, TaskStatistics, TaskStatus,
};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info, instrument, warn};

use crate::service::TaskService;
use crate::state::{ListState, ViewMode};

/// The one-shot query behind the current list, re-issued by `refresh`.
#[derive(Debug, Clone)]
enum ActiveQuery {
    Search(String),
    Filter {
        filter: FilterOptions,
        sort: SortOption,
    },
}

#[derive(Debug)]
struct Operations {
    list_generation: u64,
    stats_generation: u64,
    list_token: CancellationToken,
    /// `None` while observing.
    active: Option<ActiveQuery>,
}

struct Shared {
    service: Arc<TaskService>,
    default_sort: SortOption,
    list_state: watch::Sender<ListState>,
    filter: watch::Sender<FilterOptions>,
    sort: watch::Sender<SortOption>,
    search_query: watch::Sender<String>,
    statistics: watch::Sender<Option<TaskStatistics>>,
    mode: watch::Sender<ViewMode>,
    ops: Mutex<Operations>,
    root: CancellationToken,
}

impl Shared {
    /// Supersede the current list operation and show `Loading`.
    fn begin_list_op(&self, active: Option<ActiveQuery>) -> (u64, CancellationToken) {
        let mut ops = self.ops.lock();
        ops.list_generation += 1;
        ops.list_token.cancel();
        ops.list_token = self.root.child_token();

        let mode = if active.is_some() {
            ViewMode::QueryResult
        } else {
            ViewMode::Observing
        };
        ops.active = active;
        let _ = self.mode.send_replace(mode);
        let _ = self.list_state.send_replace(ListState::Loading);
        (ops.list_generation, ops.list_token.clone())
    }

    /// Publish `state` if `generation` is still current.
    fn apply_list(&self, generation: u64, state: ListState) -> bool {
        let ops = self.ops.lock();
        if ops.list_generation != generation || self.root.is_cancelled() {
            debug!(
                generation,
                current = ops.list_generation,
                "discarding stale list result"
            );
            return false;
        }
        let _ = self.list_state.send_replace(state);
        true
    }

    fn observe(self: &Arc<Self>) -> JoinHandle<()> {
        let (generation, token) = self.begin_list_op(None);
        let mut stream = self.service.observe_all();
        let shared = Arc::clone(self);

        tokio::spawn(
            async move {
                loop {
                    let next = tokio::select! {
                        () = token.cancelled() => break,
                        next = stream.next() => next,
                    };
                    match next {
                        Some(Ok(mut tasks)) => {
                            debug!(count = tasks.len(), "collection emitted");
                            // the store emits newest first; show the default order
                            sort_tasks(&mut tasks, shared.default_sort);
                            if !shared.apply_list(generation, ListState::Success(tasks)) {
                                break;
                            }
                            let _ = shared.refresh_statistics();
                        }
                        Some(Err(error)) => {
                            warn!(%error, "task subscription failed");
                            let error = TaskError::from(error);
                            let _ = shared.apply_list(generation, ListState::from_error(&error));
                            break;
                        }
                        None => break,
                    }
                }
                debug!("subscription ended");
            }
            .instrument(tracing::debug_span!("observe", generation)),
        )
    }

    fn run_query(self: &Arc<Self>, query: ActiveQuery) -> JoinHandle<()> {
        let (generation, token) = self.begin_list_op(Some(query.clone()));
        let shared = Arc::clone(self);

        tokio::spawn(
            async move {
                let fetch = async {
                    match &query {
                        ActiveQuery::Search(text) => shared.service.search(text).await,
                        ActiveQuery::Filter { filter, sort } => {
                            shared.service.filter(filter, *sort).await
                        }
                    }
                };
                let result = tokio::select! {
                    () = token.cancelled() => return,
                    result = fetch => result,
                };
                let state = match result {
                    Ok(tasks) => ListState::Success(tasks),
                    Err(error) => {
                        warn!(%error, "list query failed");
                        ListState::from_error(&error)
                    }
                };
                let _ = shared.apply_list(generation, state);
            }
            .instrument(tracing::debug_span!("query", generation)),
        )
    }

    fn refresh_statistics(self: &Arc<Self>) -> JoinHandle<()> {
        let generation = {
            let mut ops = self.ops.lock();
            ops.stats_generation += 1;
            ops.stats_generation
        };
        let token = self.root.child_token();
        let shared = Arc::clone(self);

        tokio::spawn(
            async move {
                let result = tokio::select! {
                    () = token.cancelled() => return,
                    result = shared.service.statistics() => result,
                };
                match result {
                    Ok(stats) => shared.apply_statistics(generation, stats),
                    Err(error) => warn!(%error, "failed to load statistics"),
                }
            }
            .in_current_span(),
        )
    }

    fn apply_statistics(&self, generation: u64, stats: TaskStatistics) {
        let ops = self.ops.lock();
        if ops.stats_generation == generation && !self.root.is_cancelled() {
            let _ = self.statistics.send_replace(Some(stats));
        }
    }

    /// Run a write. Success refreshes statistics; failure is shown only if
    /// no list operation was issued after the write.
    fn run_write<Fut>(self: &Arc<Self>, op: &'static str, write: Fut) -> JoinHandle<()>
    where
        Fut: Future<Output = Result<(), TaskError>> + Send + 'static,
    {
        let issued_at = self.ops.lock().list_generation;
        let token = self.root.child_token();
        let shared = Arc::clone(self);

        tokio::spawn(
            async move {
                let result = tokio::select! {
                    () = token.cancelled() => return,
                    result = write => result,
                };
                match result {
                    Ok(()) => {
                        debug!(op, "write committed");
                        let _ = shared.refresh_statistics();
                    }
                    Err(error) => {
                        warn!(op, %error, "write failed");
                        let _ = shared.apply_list(issued_at, ListState::from_error(&error));
                    }
                }
            }
            .in_current_span(),
        )
    }
}

/// Reactive state holder for the task list screen.
///
/// Must be created inside a Tokio runtime. Dropping the controller has the
/// same effect as [`dispose`](Self::dispose).
pub struct TaskListController {
    shared: Arc<Shared>,
}

impl std::fmt::Debug for TaskListController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskListController")
            .field("mode", &*self.shared.mode.borrow())
            .field("disposed", &self.shared.root.is_cancelled())
            .finish_non_exhaustive()
    }
}

impl TaskListController {
    /// Start observing the collection with the default sort slot.
    pub fn new(service: Arc<TaskService>) -> Self {
        Self::with_default_sort(service, SortOption::default())
    }

    /// Start observing; `default_sort` seeds the sort slot and is restored by
    /// [`clear_filters`](Self::clear_filters).
    pub fn with_default_sort(service: Arc<TaskService>, default_sort: SortOption) -> Self {
        let shared = Arc::new(Shared {
            service,
            default_sort,
            list_state: watch::channel(ListState::Loading).0,
            filter: watch::channel(FilterOptions::default()).0,
            sort: watch::channel(default_sort).0,
            search_query: watch::channel(String::new()).0,
            statistics: watch::channel(None).0,
            mode: watch::channel(ViewMode::Observing).0,
            ops: Mutex::new(Operations {
                list_generation: 0,
                stats_generation: 0,
                list_token: CancellationToken::new(),
                active: None,
            }),
            root: CancellationToken::new(),
        });

        let _ = shared.observe();
        let _ = shared.refresh_statistics();
        info!(%default_sort, "task list controller started");
        Self { shared }
    }

    // ── Slots ───────────────────────────────────────────────────────────

    /// List state receiver.
    pub fn list_state(&self) -> watch::Receiver<ListState> {
        self.shared.list_state.subscribe()
    }

    /// Active filter receiver.
    pub fn filter_options(&self) -> watch::Receiver<FilterOptions> {
        self.shared.filter.subscribe()
    }

    /// Active sort receiver.
    pub fn sort_option(&self) -> watch::Receiver<SortOption> {
        self.shared.sort.subscribe()
    }

    /// Last search query receiver (as typed, untrimmed).
    pub fn search_query(&self) -> watch::Receiver<String> {
        self.shared.search_query.subscribe()
    }

    /// Statistics receiver; `None` until the first successful load.
    pub fn statistics(&self) -> watch::Receiver<Option<TaskStatistics>> {
        self.shared.statistics.subscribe()
    }

    /// Mode receiver.
    pub fn view_mode(&self) -> watch::Receiver<ViewMode> {
        self.shared.mode.subscribe()
    }

    /// Snapshot of the list state.
    pub fn current_state(&self) -> ListState {
        self.shared.list_state.borrow().clone()
    }

    // ── Queries ─────────────────────────────────────────────────────────

    /// One-shot title search; a blank query lists every task.
    #[instrument(skip(self))]
    pub fn search(&self, query: &str) -> JoinHandle<()> {
        if self.is_disposed() {
            return finished();
        }
        let _ = self.shared.search_query.send_replace(query.to_string());
        self.shared.run_query(ActiveQuery::Search(query.to_string()))
    }

    /// Replace the filter and run it with the current sort.
    #[instrument(skip(self))]
    pub fn apply_filters(
        &self,
        statuses: BTreeSet<TaskStatus>,
        priorities: BTreeSet<Priority>,
        show_overdue_only: bool,
    ) -> JoinHandle<()> {
        if self.is_disposed() {
            return finished();
        }
        let filter = FilterOptions {
            statuses,
            priorities,
            show_overdue_only,
        };
        let _ = self.shared.filter.send_replace(filter.clone());
        let sort = *self.shared.sort.borrow();
        self.shared.run_query(ActiveQuery::Filter { filter, sort })
    }

    /// Replace the sort and run it with the current filter.
    #[instrument(skip(self))]
    pub fn set_sort_option(&self, sort: SortOption) -> JoinHandle<()> {
        if self.is_disposed() {
            return finished();
        }
        let _ = self.shared.sort.send_replace(sort);
        let filter = self.shared.filter.borrow().clone();
        self.shared.run_query(ActiveQuery::Filter { filter, sort })
    }

    /// Reset filter, sort, and search, then resume live observation.
    ///
    /// The returned handle finishes when that subscription ends.
    #[instrument(skip(self))]
    pub fn clear_filters(&self) -> JoinHandle<()> {
        if self.is_disposed() {
            return finished();
        }
        let _ = self.shared.filter.send_replace(FilterOptions::default());
        let _ = self.shared.sort.send_replace(self.shared.default_sort);
        let _ = self.shared.search_query.send_replace(String::new());
        self.shared.observe()
    }

    /// Re-run whatever feeds the list and reload statistics.
    ///
    /// In observing mode this re-subscribes; in query mode it re-issues the
    /// last search or filter.
    #[instrument(skip(self))]
    pub fn refresh(&self) -> JoinHandle<()> {
        if self.is_disposed() {
            return finished();
        }
        let active = self.shared.ops.lock().active.clone();
        let _ = self.shared.refresh_statistics();
        match active {
            None => self.shared.observe(),
            Some(query) => self.shared.run_query(query),
        }
    }

    /// Reload statistics.
    pub fn load_statistics(&self) -> JoinHandle<()> {
        if self.is_disposed() {
            return finished();
        }
        self.shared.refresh_statistics()
    }

    // ── Writes ──────────────────────────────────────────────────────────

    /// Create a task.
    #[instrument(skip(self, edit))]
    pub fn add_task(&self, edit: TaskEdit) -> JoinHandle<()> {
        if self.is_disposed() {
            return finished();
        }
        let service = Arc::clone(&self.shared.service);
        self.shared.run_write("add", async move {
            service.add(edit).await.map(drop)
        })
    }

    /// Replace every editable field of a task.
    #[instrument(skip(self, edit))]
    pub fn update_task(&self, id: &str, edit: TaskEdit) -> JoinHandle<()> {
        if self.is_disposed() {
            return finished();
        }
        let service = Arc::clone(&self.shared.service);
        let id = id.to_string();
        self.shared.run_write("update", async move {
            service.update(&id, edit).await.map(drop)
        })
    }

    /// Change a task's status.
    #[instrument(skip(self))]
    pub fn update_task_status(&self, id: &str, status: TaskStatus) -> JoinHandle<()> {
        if self.is_disposed() {
            return finished();
        }
        let service = Arc::clone(&self.shared.service);
        let id = id.to_string();
        self.shared.run_write("update_status", async move {
            service.update_status(&id, status).await.map(drop)
        })
    }

    /// Delete a task. Deleting a missing id is not an error.
    #[instrument(skip(self))]
    pub fn delete_task(&self, id: &str) -> JoinHandle<()> {
        if self.is_disposed() {
            return finished();
        }
        let service = Arc::clone(&self.shared.service);
        let id = id.to_string();
        self.shared.run_write("delete", async move {
            service.delete(&id).await.map(drop)
        })
    }

    // ── Lifecycle ───────────────────────────────────────────────────────

    /// Cancel the subscription and all in-flight work. Later actions are
    /// no-ops and slots keep their last values.
    pub fn dispose(&self) {
        if !self.shared.root.is_cancelled() {
            info!("task list controller disposed");
            self.shared.root.cancel();
        }
    }

    /// Whether [`dispose`](Self::dispose) has run.
    pub fn is_disposed(&self) -> bool {
        self.shared.root.is_cancelled()
    }
}

impl Drop for TaskListController {
    fn drop(&mut self) {
        self.shared.root.cancel();
    }
}

fn finished() -> JoinHandle<()> {
    tokio::spawn(async {})
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
