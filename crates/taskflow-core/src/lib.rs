//! # taskflow-core
//!
//! Domain vocabulary shared by every TaskFlow crate:
//!
//! - **Model**: [`Task`], [`Priority`], [`TaskStatus`], [`FilterOptions`], [`SortOption`]
//! - **Query engine**: [`query::filter_and_sort`] and [`query::search`]
//! - **Statistics**: [`TaskStatistics`] derived from tasks or from store counts
//! - **Persistence port**: the [`TaskStore`] trait implemented by `taskflow-store`
//! - **Errors**: [`TaskError`] taxonomy via `thiserror`
//! - **Labels**: display names kept out of the domain enums ([`labels`])

#![deny(unsafe_code)]

pub mod clock;
pub mod errors;
pub mod ids;
pub mod labels;
pub mod logging;
pub mod query;
pub mod statistics;
pub mod store;
pub mod types;

pub use clock::{Clock, FixedClock, SystemClock};
pub use errors::{ErrorKind, StoreError, TaskError, ValidationError};
pub use ids::generate_task_id;
pub use statistics::TaskStatistics;
pub use store::{TaskStore, TaskStream};
pub use types::{
    FilterOptions, MAX_TITLE_CHARS, Priority, SortOption, Task, TaskEdit, TaskStatus,
    validate_title,
};
