//! Wiring: settings, logging, store, service, and controllers.

use std::sync::Arc;

use taskflow_core::logging::init_subscriber;
use taskflow_core::{SystemClock, TaskError, TaskStore};
use taskflow_settings::TaskFlowSettings;
use taskflow_store::{ConnectionConfig, SqliteTaskStore};
use tracing::info;

use crate::controller::TaskListController;
use crate::detail::TaskDetailController;
use crate::errors::Result;
use crate::seed::seed_if_empty;
use crate::service::TaskService;

/// An assembled application: one store, one service, controllers on demand.
#[derive(Debug, Clone)]
pub struct Runtime {
    settings: TaskFlowSettings,
    service: Arc<TaskService>,
}

impl Runtime {
    /// Open the configured store and build the service.
    ///
    /// Installs the tracing subscriber (a no-op if one is already set) and
    /// creates the database's parent directory if needed.
    pub fn open(settings: TaskFlowSettings) -> Result<Self> {
        settings.validate()?;
        init_subscriber(&settings.logging.level);

        let store = if settings.storage.is_in_memory() {
            SqliteTaskStore::in_memory()?
        } else {
            let path = settings.storage.resolved_database_path();
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let config = ConnectionConfig {
                pool_size: settings.storage.pool_size,
                busy_timeout_ms: settings.storage.busy_timeout_ms,
            };
            SqliteTaskStore::open(&path, &config)?
        };
        info!(
            database = %settings.storage.database_path,
            pool_size = settings.storage.pool_size,
            "task store opened"
        );

        let store: Arc<dyn TaskStore> = Arc::new(store);
        let service = Arc::new(TaskService::new(store, Arc::new(SystemClock)));
        Ok(Self { settings, service })
    }

    /// Load settings from `~/.taskflow/settings.json` and the environment,
    /// then [`open`](Self::open).
    pub fn from_default_settings() -> Result<Self> {
        Self::open(taskflow_settings::load_settings()?)
    }

    /// Seed sample tasks when `list.seed_sample_data` is set and the store is
    /// empty. Returns how many were added.
    pub async fn seed_if_configured(&self) -> std::result::Result<usize, TaskError> {
        if !self.settings.list.seed_sample_data {
            return Ok(0);
        }
        seed_if_empty(&self.service).await
    }

    /// A list controller using the configured default sort.
    pub fn list_controller(&self) -> TaskListController {
        TaskListController::with_default_sort(
            Arc::clone(&self.service),
            self.settings.list.default_sort,
        )
    }

    /// A detail controller.
    pub fn detail_controller(&self) -> TaskDetailController {
        TaskDetailController::new(Arc::clone(&self.service))
    }

    /// The shared service.
    pub fn service(&self) -> &Arc<TaskService> {
        &self.service
    }

    /// Effective settings.
    pub fn settings(&self) -> &TaskFlowSettings {
        &self.settings
    }
}
