//! SQLite-backed [`TaskStore`].
//!
//! Every port call borrows a pooled connection on Tokio's blocking pool.
//! List queries push filtering and ordering down into SQL with the same
//! rules as [`taskflow_core::query`]: the sort key, then `created_at DESC`,
//! then `rowid DESC`. Titles use the default `BINARY` collation, so ordinal
//! title order matches the in-memory engine.

use std::collections::BTreeSet;
use std::path::Path;

use async_trait::async_trait;
use rusqlite::types::ToSql;
use rusqlite::{Connection, OptionalExtension, params};
use taskflow_core::{Priority, SortOption, StoreError, Task, TaskStatus, TaskStore, TaskStream};
use tracing::debug;

use crate::connection::{self, ConnectionConfig, ConnectionPool, TITLE_MATCHES_FN};
use crate::entity::{TASK_COLUMNS, TaskEntity};
use crate::errors::Result;
use crate::migrations::run_migrations;
use crate::notify::{ChangeNotifier, watch_collection};

/// Default ordering: newest first, most recently inserted first on ties.
const NEWEST_FIRST: &str = "created_at DESC, rowid DESC";

/// Task store backed by a pooled `SQLite` database.
#[derive(Clone)]
pub struct SqliteTaskStore {
    pool: ConnectionPool,
    notifier: ChangeNotifier,
}

impl std::fmt::Debug for SqliteTaskStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteTaskStore")
            .field("pool_size", &self.pool.max_size())
            .field("version", &self.notifier.version())
            .finish()
    }
}

impl SqliteTaskStore {
    /// Open (or create) a database file and run migrations.
    pub fn open(path: &Path, config: &ConnectionConfig) -> Result<Self> {
        debug!(?path, pool_size = config.pool_size, "opening task database");
        Self::from_pool(connection::new_file(path, config)?)
    }

    /// Private in-memory database.
    pub fn in_memory() -> Result<Self> {
        Self::from_pool(connection::new_in_memory(&ConnectionConfig::default())?)
    }

    /// Wrap an existing pool. Migrations run immediately.
    pub fn from_pool(pool: ConnectionPool) -> Result<Self> {
        let conn = pool.get()?;
        run_migrations(&conn)?;
        drop(conn);
        Ok(Self {
            pool,
            notifier: ChangeNotifier::default(),
        })
    }

    /// The underlying pool.
    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    /// Run `f` with a pooled connection on the blocking pool.
    async fn with_conn<T, F>(&self, f: F) -> std::result::Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            f(&conn)
        })
        .await
        .map_err(|e| StoreError::Worker(e.to_string()))?
        .map_err(StoreError::from)
    }

    fn notify_if(&self, changed: bool) {
        if changed {
            self.notifier.notify();
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Blocking queries
// ─────────────────────────────────────────────────────────────────────────────

fn order_by(sort: SortOption) -> &'static str {
    match sort {
        SortOption::DateCreatedDesc => NEWEST_FIRST,
        SortOption::DateCreatedAsc => "created_at ASC, rowid DESC",
        SortOption::DueDateAsc => {
            "due_date IS NULL, due_date ASC, created_at DESC, rowid DESC"
        }
        SortOption::DueDateDesc => {
            "due_date IS NULL, due_date DESC, created_at DESC, rowid DESC"
        }
        SortOption::PriorityHighToLow => "priority DESC, created_at DESC, rowid DESC",
        SortOption::PriorityLowToHigh => "priority ASC, created_at DESC, rowid DESC",
        SortOption::TitleAToZ => "title ASC, created_at DESC, rowid DESC",
        SortOption::TitleZToA => "title DESC, created_at DESC, rowid DESC",
    }
}

fn query_tasks(
    conn: &Connection,
    conditions: &[String],
    values: &[Box<dyn ToSql + Send>],
    order: &str,
) -> Result<Vec<Task>> {
    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };
    let sql = format!("SELECT {TASK_COLUMNS} FROM tasks {where_clause} ORDER BY {order}");
    let params: Vec<&dyn ToSql> = values.iter().map(|v| v.as_ref() as &dyn ToSql).collect();

    let mut stmt = conn.prepare(&sql)?;
    let tasks = stmt
        .query_map(params.as_slice(), TaskEntity::from_row)?
        .map(|row| row.map(TaskEntity::into_domain))
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(tasks)
}

fn in_clause(column: &str, len: usize) -> String {
    let placeholders = vec!["?"; len].join(", ");
    format!("{column} IN ({placeholders})")
}

fn count_where(conn: &Connection, condition: &str, value: Option<i64>) -> Result<u64> {
    let sql = format!("SELECT COUNT(*) FROM tasks {condition}");
    let n: i64 = match value {
        Some(v) => conn.query_row(&sql, params![v], |row| row.get(0))?,
        None => conn.query_row(&sql, [], |row| row.get(0))?,
    };
    Ok(u64::try_from(n).unwrap_or_default())
}

fn upsert(conn: &Connection, entity: &TaskEntity) -> Result<()> {
    let _ = conn.execute(
        "INSERT INTO tasks (id, title, description, priority, status, due_date, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
         ON CONFLICT(id) DO UPDATE SET
             title = excluded.title,
             description = excluded.description,
             priority = excluded.priority,
             status = excluded.status,
             due_date = excluded.due_date,
             created_at = excluded.created_at",
        params![
            entity.id,
            entity.title,
            entity.description,
            entity.priority,
            entity.status,
            entity.due_date,
            entity.created_at,
        ],
    )?;
    Ok(())
}

fn update_row(conn: &Connection, entity: &TaskEntity) -> Result<bool> {
    let changed = conn.execute(
        "UPDATE tasks SET title = ?2, description = ?3, priority = ?4, status = ?5,
             due_date = ?6, created_at = ?7
         WHERE id = ?1",
        params![
            entity.id,
            entity.title,
            entity.description,
            entity.priority,
            entity.status,
            entity.due_date,
            entity.created_at,
        ],
    )?;
    Ok(changed > 0)
}

// ─────────────────────────────────────────────────────────────────────────────
// Port implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl TaskStore for SqliteTaskStore {
    fn subscribe_all(&self) -> TaskStream {
        watch_collection(self.clone(), &self.notifier)
    }

    async fn select_all(&self) -> std::result::Result<Vec<Task>, StoreError> {
        self.with_conn(|conn| query_tasks(conn, &[], &[], NEWEST_FIRST))
            .await
    }

    async fn select_by_id(&self, id: &str) -> std::result::Result<Option<Task>, StoreError> {
        let id = id.to_string();
        self.with_conn(move |conn| {
            let entity = conn
                .query_row(
                    &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"),
                    params![id],
                    TaskEntity::from_row,
                )
                .optional()?;
            Ok(entity.map(TaskEntity::into_domain))
        })
        .await
    }

    async fn search_by_title(&self, query: &str) -> std::result::Result<Vec<Task>, StoreError> {
        let query = query.to_string();
        let tasks = self
            .with_conn(move |conn| {
                let values: Vec<Box<dyn ToSql + Send>> = vec![Box::new(query)];
                query_tasks(
                    conn,
                    &[format!("{TITLE_MATCHES_FN}(title, ?)")],
                    &values,
                    NEWEST_FIRST,
                )
            })
            .await?;
        debug!(matches = tasks.len(), "title search");
        Ok(tasks)
    }

    async fn select_filtered(
        &self,
        statuses: &BTreeSet<TaskStatus>,
        priorities: &BTreeSet<Priority>,
        sort: SortOption,
    ) -> std::result::Result<Vec<Task>, StoreError> {
        let mut conditions = Vec::new();
        let mut values: Vec<Box<dyn ToSql + Send>> = Vec::new();

        if !statuses.is_empty() {
            conditions.push(in_clause("status", statuses.len()));
            values.extend(statuses.iter().map(|s| Box::new(s.value()) as Box<dyn ToSql + Send>));
        }
        if !priorities.is_empty() {
            conditions.push(in_clause("priority", priorities.len()));
            values.extend(
                priorities
                    .iter()
                    .map(|p| Box::new(p.value()) as Box<dyn ToSql + Send>),
            );
        }

        let tasks = self
            .with_conn(move |conn| query_tasks(conn, &conditions, &values, order_by(sort)))
            .await?;
        debug!(%sort, matches = tasks.len(), "filtered select");
        Ok(tasks)
    }

    async fn select_by_status(
        &self,
        status: TaskStatus,
    ) -> std::result::Result<Vec<Task>, StoreError> {
        self.with_conn(move |conn| {
            let values: Vec<Box<dyn ToSql + Send>> = vec![Box::new(status.value())];
            query_tasks(conn, &["status = ?".to_string()], &values, NEWEST_FIRST)
        })
        .await
    }

    async fn select_by_priority(
        &self,
        priority: Priority,
    ) -> std::result::Result<Vec<Task>, StoreError> {
        self.with_conn(move |conn| {
            let values: Vec<Box<dyn ToSql + Send>> = vec![Box::new(priority.value())];
            query_tasks(conn, &["priority = ?".to_string()], &values, NEWEST_FIRST)
        })
        .await
    }

    async fn insert(&self, task: &Task) -> std::result::Result<(), StoreError> {
        let entity = TaskEntity::from_domain(task);
        self.with_conn(move |conn| upsert(conn, &entity)).await?;
        self.notify_if(true);
        Ok(())
    }

    async fn update(&self, task: &Task) -> std::result::Result<bool, StoreError> {
        let entity = TaskEntity::from_domain(task);
        let changed = self.with_conn(move |conn| update_row(conn, &entity)).await?;
        self.notify_if(changed);
        Ok(changed)
    }

    async fn delete(&self, id: &str) -> std::result::Result<bool, StoreError> {
        let id = id.to_string();
        let removed = self
            .with_conn(move |conn| {
                let n = conn.execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
                Ok(n > 0)
            })
            .await?;
        self.notify_if(removed);
        Ok(removed)
    }

    async fn delete_all(&self) -> std::result::Result<u64, StoreError> {
        let removed = self
            .with_conn(|conn| Ok(conn.execute("DELETE FROM tasks", [])?))
            .await?;
        self.notify_if(removed > 0);
        Ok(u64::try_from(removed).unwrap_or_default())
    }

    async fn count(&self) -> std::result::Result<u64, StoreError> {
        self.with_conn(|conn| count_where(conn, "", None)).await
    }

    async fn count_by_status(&self, status: TaskStatus) -> std::result::Result<u64, StoreError> {
        self.with_conn(move |conn| count_where(conn, "WHERE status = ?1", Some(status.value())))
            .await
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use futures::StreamExt;
    use taskflow_core::query::filter_and_sort;
    use taskflow_core::{FilterOptions, TaskEdit};

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    fn make(
        id: &str,
        title: &str,
        priority: Priority,
        status: TaskStatus,
        due: Option<i64>,
        created: i64,
    ) -> Task {
        Task::create(
            id.to_string(),
            at(created),
            TaskEdit {
                title: title.to_string(),
                description: None,
                priority,
                status,
                due_date: due.map(at),
            },
        )
    }

    fn ids(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.id.as_str()).collect()
    }

    /// Tasks with deliberate ties on every sort key.
    fn dataset() -> Vec<Task> {
        vec![
            make("t1", "banana", Priority::Low, TaskStatus::Todo, Some(300), 100),
            make("t2", "Apple", Priority::High, TaskStatus::Done, None, 100),
            make("t3", "apple", Priority::High, TaskStatus::InProgress, Some(300), 200),
            make("t4", "Éclair", Priority::Medium, TaskStatus::Todo, Some(50), 200),
            make("t5", "banana", Priority::Low, TaskStatus::Done, None, 50),
            make("t6", "zest", Priority::Medium, TaskStatus::InProgress, Some(900), 100),
        ]
    }

    async fn seeded() -> SqliteTaskStore {
        let store = SqliteTaskStore::in_memory().unwrap();
        for task in dataset() {
            store.insert(&task).await.unwrap();
        }
        store
    }

    #[tokio::test]
    async fn insert_and_select_by_id() {
        let store = SqliteTaskStore::in_memory().unwrap();
        let mut task = make("task-1", "Buy milk", Priority::High, TaskStatus::Todo, Some(500), 10);
        task.description = Some("semi-skimmed".to_string());
        store.insert(&task).await.unwrap();

        let loaded = store.select_by_id("task-1").await.unwrap().unwrap();
        assert!(loaded.same_content(&task));
        assert!(store.select_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn select_all_newest_first_then_latest_insert() {
        let store = seeded().await;
        let all = store.select_all().await.unwrap();
        // t3/t4 share created_at 200; t4 was inserted later
        assert_eq!(ids(&all), ["t4", "t3", "t6", "t2", "t1", "t5"]);
    }

    #[tokio::test]
    async fn upsert_keeps_insertion_rank() {
        let store = seeded().await;
        let renamed = dataset()[2].with_status(TaskStatus::Done);
        store.insert(&renamed).await.unwrap();

        let all = store.select_all().await.unwrap();
        assert_eq!(ids(&all), ["t4", "t3", "t6", "t2", "t1", "t5"]);
        assert_eq!(store.count().await.unwrap(), 6);
        let t3 = store.select_by_id("t3").await.unwrap().unwrap();
        assert_eq!(t3.status, TaskStatus::Done);
    }

    #[tokio::test]
    async fn update_and_delete_report_missing_rows() {
        let store = seeded().await;
        let ghost = make("ghost", "nothing", Priority::Low, TaskStatus::Todo, None, 1);
        assert!(!store.update(&ghost).await.unwrap());
        assert!(!store.delete("ghost").await.unwrap());
        assert_eq!(store.count().await.unwrap(), 6);

        let edited = dataset()[0].with_edits(TaskEdit::titled("plantain"));
        assert!(store.update(&edited).await.unwrap());
        assert_eq!(
            store.select_by_id("t1").await.unwrap().unwrap().title,
            "plantain"
        );
        assert!(store.delete("t1").await.unwrap());
        assert_eq!(store.count().await.unwrap(), 5);
    }

    #[tokio::test]
    async fn delete_all_returns_count() {
        let store = seeded().await;
        assert_eq!(store.delete_all().await.unwrap(), 6);
        assert_eq!(store.count().await.unwrap(), 0);
        assert_eq!(store.delete_all().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn counts_by_status() {
        let store = seeded().await;
        assert_eq!(store.count_by_status(TaskStatus::Todo).await.unwrap(), 2);
        assert_eq!(store.count_by_status(TaskStatus::InProgress).await.unwrap(), 2);
        assert_eq!(store.count_by_status(TaskStatus::Done).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn select_by_status_and_priority() {
        let store = seeded().await;
        let done = store.select_by_status(TaskStatus::Done).await.unwrap();
        assert_eq!(ids(&done), ["t2", "t5"]);
        let medium = store.select_by_priority(Priority::Medium).await.unwrap();
        assert_eq!(ids(&medium), ["t4", "t6"]);
    }

    #[tokio::test]
    async fn search_is_case_insensitive_on_title() {
        let store = seeded().await;
        let hits = store.search_by_title("APPLE").await.unwrap();
        assert_eq!(ids(&hits), ["t3", "t2"]);
        let accented = store.search_by_title("éCLAIR").await.unwrap();
        assert_eq!(ids(&accented), ["t4"]);
        assert!(store.search_by_title("kiwi").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn filtered_select_matches_engine_for_every_sort() {
        let store = seeded().await;
        let all = store.select_all().await.unwrap();
        let filters = [
            FilterOptions::default(),
            FilterOptions {
                statuses: [TaskStatus::Todo, TaskStatus::Done].into(),
                ..Default::default()
            },
            FilterOptions {
                priorities: [Priority::Low, Priority::High].into(),
                ..Default::default()
            },
            FilterOptions {
                statuses: [TaskStatus::InProgress].into(),
                priorities: [Priority::Medium].into(),
                show_overdue_only: false,
            },
        ];

        for filter in &filters {
            for sort in SortOption::ALL {
                let expected = filter_and_sort(&all, filter, sort, at(0));
                let got = store
                    .select_filtered(&filter.statuses, &filter.priorities, sort)
                    .await
                    .unwrap();
                assert_eq!(ids(&got), ids(&expected), "sort {sort}, filter {filter:?}");
            }
        }
    }

    #[tokio::test]
    async fn subscription_emits_snapshot_then_changes() {
        let store = SqliteTaskStore::in_memory().unwrap();
        let mut stream = store.subscribe_all();

        let first = stream.next().await.unwrap().unwrap();
        assert!(first.is_empty());

        store.insert(&dataset()[0]).await.unwrap();
        let second = stream.next().await.unwrap().unwrap();
        assert_eq!(ids(&second), ["t1"]);

        assert!(store.delete("t1").await.unwrap());
        let third = stream.next().await.unwrap().unwrap();
        assert!(third.is_empty());
    }

    #[tokio::test]
    async fn file_database_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.db");
        {
            let store = SqliteTaskStore::open(&path, &ConnectionConfig::default()).unwrap();
            store.insert(&dataset()[3]).await.unwrap();
        }
        let store = SqliteTaskStore::open(&path, &ConnectionConfig::default()).unwrap();
        let loaded = store.select_by_id("t4").await.unwrap().unwrap();
        assert!(loaded.same_content(&dataset()[3]));
    }
}
