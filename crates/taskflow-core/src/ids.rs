//! Task id generation.
//!
//! Ids are UUID v7 (time-ordered) with a `task-` prefix.

use uuid::Uuid;

/// Generate a new task id.
#[must_use]
pub fn generate_task_id() -> String {
    format!("task-{}", Uuid::now_v7())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_prefixed_and_unique() {
        let a = generate_task_id();
        let b = generate_task_id();
        assert!(a.starts_with("task-"));
        assert_ne!(a, b);
    }
}
