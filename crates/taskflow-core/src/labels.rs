//! Display names for domain enums.
//!
//! The enums in [`crate::types`] carry no presentation data; UI surfaces
//! look labels up here instead.

use crate::types::{Priority, SortOption, TaskStatus};

/// Human-readable priority label.
#[must_use]
pub fn priority_label(priority: Priority) -> &'static str {
    match priority {
        Priority::Low => "Low",
        Priority::Medium => "Medium",
        Priority::High => "High",
    }
}

/// Human-readable status label.
#[must_use]
pub fn status_label(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Todo => "To Do",
        TaskStatus::InProgress => "In Progress",
        TaskStatus::Done => "Done",
    }
}

/// Human-readable sort option label.
#[must_use]
pub fn sort_label(option: SortOption) -> &'static str {
    match option {
        SortOption::DateCreatedDesc => "Date Created (Newest First)",
        SortOption::DateCreatedAsc => "Date Created (Oldest First)",
        SortOption::DueDateAsc => "Due Date (Nearest First)",
        SortOption::DueDateDesc => "Due Date (Farthest First)",
        SortOption::PriorityHighToLow => "Priority (High to Low)",
        SortOption::PriorityLowToHigh => "Priority (Low to High)",
        SortOption::TitleAToZ => "Title (A to Z)",
        SortOption::TitleZToA => "Title (Z to A)",
    }
}
