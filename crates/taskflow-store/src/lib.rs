//! # taskflow-store
//!
//! Persistence adapters implementing [`taskflow_core::TaskStore`]:
//!
//! - [`SqliteTaskStore`]: `rusqlite` over an `r2d2` pool, with schema
//!   migrations, ordinal/epoch-millisecond row mapping, SQL push-down for
//!   filters and ordering, and change-notified subscriptions
//! - [`MemoryTaskStore`]: a lock-protected vector ordered by the core engine

#![deny(unsafe_code)]

pub mod connection;
pub mod entity;
pub mod errors;
pub mod memory;
pub mod migrations;
pub mod notify;
pub mod sqlite;

pub use connection::ConnectionConfig;
pub use entity::TaskEntity;
pub use errors::SqliteStoreError;
pub use memory::MemoryTaskStore;
pub use sqlite::SqliteTaskStore;
