//! # taskflow-runtime
//!
//! Everything above the persistence port:
//!
//! - [`TaskService`]: validation, id and timestamp assignment, queries
//! - [`TaskListController`]: reactive list, filter, sort, search, and statistics state
//! - [`TaskDetailController`]: single-task lookup
//! - [`Runtime`]: settings-driven wiring of store, service, and controllers
//! - [`seed`]: sample data for first launch

#![deny(unsafe_code)]

pub mod bootstrap;
pub mod controller;
pub mod detail;
pub mod errors;
pub mod seed;
pub mod service;
pub mod state;

pub use bootstrap::Runtime;
pub use controller::TaskListController;
pub use detail::TaskDetailController;
pub use errors::RuntimeError;
pub use service::TaskService;
pub use state::{DetailState, ListState, ViewMode};
