//! SQL DDL for the `tasks` table.
//!
//! The schema stores enums as ordinals and timestamps as epoch milliseconds.
//! `id` is a `TEXT` primary key, so the table keeps an implicit `rowid` that
//! records insertion order; list queries use it as the final tie-break.

use rusqlite::Connection;

use crate::errors::{Result, SqliteStoreError};

/// Current schema version, stored in `PRAGMA user_version`.
pub const SCHEMA_VERSION: i64 = 1;

/// Run all migrations.
///
/// Idempotent; every statement uses `IF NOT EXISTS`.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(TASKS_SCHEMA)
        .map_err(|e| SqliteStoreError::Migration {
            message: format!("tasks schema: {e}"),
        })?;
    conn.pragma_update(None, "user_version", SCHEMA_VERSION)
        .map_err(|e| SqliteStoreError::Migration {
            message: format!("user_version: {e}"),
        })?;
    Ok(())
}

const TASKS_SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS tasks (
    id TEXT PRIMARY KEY NOT NULL,
    title TEXT NOT NULL,
    description TEXT,
    priority INTEGER NOT NULL DEFAULT 0 CHECK (priority BETWEEN 0 AND 2),
    status INTEGER NOT NULL DEFAULT 0 CHECK (status BETWEEN 0 AND 2),
    due_date INTEGER,
    created_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_tasks_created_at ON tasks(created_at);
CREATE INDEX IF NOT EXISTS idx_tasks_status ON tasks(status);
CREATE INDEX IF NOT EXISTS idx_tasks_priority ON tasks(priority);
CREATE INDEX IF NOT EXISTS idx_tasks_due_date ON tasks(due_date);
";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'tasks'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn records_schema_version() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        let version: i64 = conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(version, SCHEMA_VERSION);
    }

    #[test]
    fn rejects_out_of_range_ordinals() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        let insert = |priority: i64, status: i64| {
            conn.execute(
                "INSERT INTO tasks (id, title, priority, status, created_at) VALUES (?1, 't', ?2, ?3, 0)",
                rusqlite::params![format!("task-{priority}-{status}"), priority, status],
            )
        };

        assert!(insert(2, 2).is_ok());
        assert!(insert(3, 0).is_err());
        assert!(insert(0, -1).is_err());
        assert!(insert(-1, 0).is_err());
        assert!(insert(0, 3).is_err());
    }
}
