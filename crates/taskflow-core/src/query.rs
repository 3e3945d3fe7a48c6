//! Query engine: filtering, ordering, and title search over task lists.
//!
//! Pure functions; nothing here touches storage or reads the clock. Callers
//! capture `now` once per query so every task is judged against the same
//! instant.
//!
//! Ordering rules, shared with the SQLite adapter's `ORDER BY` clauses:
//!
//! - Sorting is stable: ties keep input order.
//! - Undated tasks sort last under both due-date orders.
//! - Titles compare by UTF-8 bytes, which is what `SQLite`'s default `BINARY`
//!   collation does, so in-memory and pushed-down results agree.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::types::{FilterOptions, SortOption, Task};

/// Filter by status/priority, optionally keep only overdue tasks, then sort.
#[must_use]
pub fn filter_and_sort(
    tasks: &[Task],
    filter: &FilterOptions,
    sort: SortOption,
    now: DateTime<Utc>,
) -> Vec<Task> {
    let mut kept: Vec<Task> = tasks.iter().filter(|t| filter.matches(t)).cloned().collect();
    if filter.show_overdue_only {
        retain_overdue(&mut kept, now);
    }
    sort_tasks(&mut kept, sort);
    kept
}

/// Drop every task that is not overdue at `now`.
pub fn retain_overdue(tasks: &mut Vec<Task>, now: DateTime<Utc>) {
    tasks.retain(|t| t.is_overdue(now));
}

/// Stable in-place sort by a single key.
pub fn sort_tasks(tasks: &mut [Task], sort: SortOption) {
    tasks.sort_by(|a, b| compare(a, b, sort));
}

/// Compare two tasks under `sort`.
#[must_use]
pub fn compare(a: &Task, b: &Task, sort: SortOption) -> Ordering {
    match sort {
        SortOption::DateCreatedDesc => b.created_at.cmp(&a.created_at),
        SortOption::DateCreatedAsc => a.created_at.cmp(&b.created_at),
        SortOption::DueDateAsc => compare_due(a.due_date, b.due_date, false),
        SortOption::DueDateDesc => compare_due(a.due_date, b.due_date, true),
        SortOption::PriorityHighToLow => b.priority.cmp(&a.priority),
        SortOption::PriorityLowToHigh => a.priority.cmp(&b.priority),
        SortOption::TitleAToZ => a.title.as_bytes().cmp(b.title.as_bytes()),
        SortOption::TitleZToA => b.title.as_bytes().cmp(a.title.as_bytes()),
    }
}

fn compare_due(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>, descending: bool) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) if descending => y.cmp(&x),
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Case-insensitive substring test on a title.
///
/// The SQLite adapter registers this same predicate as a SQL function so
/// store-side search matches in-memory search exactly.
#[must_use]
pub fn title_matches(title: &str, query: &str) -> bool {
    title.to_lowercase().contains(&query.to_lowercase())
}

/// Title search. A blank query returns the input unchanged (not an empty list).
#[must_use]
pub fn search(tasks: &[Task], query: &str) -> Vec<Task> {
    let query = query.trim();
    if query.is_empty() {
        return tasks.to_vec();
    }
    tasks
        .iter()
        .filter(|t| title_matches(&t.title, query))
        .cloned()
        .collect()
}
