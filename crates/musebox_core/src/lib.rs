//! Core domain logic for Musebox, a personal inspiration-capture and task
//! organization app.
//! This crate is the single source of truth for business invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod reminder;
pub mod repo;
pub mod scrape;
pub mod service;
pub mod stats;

pub use config::{AppSettings, ConfigError, SettingsStore};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::inspiration::{Inspiration, InspirationId, InspirationKind, InspirationRecord};
pub use model::tag::{Tag, TagId};
pub use model::task::{TaskId, TaskItem, TaskStatus};
pub use model::ValidationError;
pub use reminder::{
    needs_reminder, AuthorizationStatus, NotificationContent, NotificationGateway, RecordedOp,
    RecordingGateway, ReminderFrequency, ReminderScheduler, ReminderSettings, ReminderTrigger,
};
pub use repo::inspiration_repo::{
    InspirationListQuery, InspirationRepository, SqliteInspirationRepository,
};
pub use repo::tag_repo::{SqliteTagRepository, TagRepository};
pub use repo::task_repo::{SqliteTaskRepository, TaskListQuery, TaskRepository};
pub use repo::{RepoError, RepoResult};
pub use service::inspiration_service::{
    InspirationListResult, InspirationService, InspirationServiceError,
};
pub use service::tag_service::{TagService, TagServiceError};
pub use service::task_service::{CreateTaskRequest, TaskService, TaskServiceError};
pub use stats::{dashboard_snapshot, snapshot_for_day, DashboardSnapshot};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
