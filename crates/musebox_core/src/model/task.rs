//! Task domain model.
//!
//! # Responsibility
//! - Define the actionable-task record, optionally derived from an
//!   inspiration.
//!
//! # Invariants
//! - `status` is one of exactly three values.
//! - `inspiration_uuid` is a nullable back-reference, not ownership:
//!   deleting the inspiration leaves the task alive and unassociated.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::inspiration::InspirationId;
use super::{now_epoch_ms, ValidationError};

/// Stable identifier for a task.
pub type TaskId = Uuid;

/// Task lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Created but not started.
    Pending,
    /// Work is in progress.
    InProgress,
    /// Completed successfully.
    Completed,
}

impl TaskStatus {
    /// All status values, in lifecycle order.
    pub const ALL: [TaskStatus; 3] = [
        TaskStatus::Pending,
        TaskStatus::InProgress,
        TaskStatus::Completed,
    ];
}

/// Canonical record for one task item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskItem {
    /// Stable global ID.
    pub uuid: TaskId,
    /// Short user-facing title.
    pub title: String,
    /// Optional free-form details.
    pub details: Option<String>,
    pub status: TaskStatus,
    /// Optional due time, unix epoch milliseconds.
    pub due_at: Option<i64>,
    /// Optional per-task reminder time, unix epoch milliseconds.
    pub remind_at: Option<i64>,
    /// Back-reference to the inspiration this task was derived from.
    pub inspiration_uuid: Option<InspirationId>,
    /// Creation time, unix epoch milliseconds.
    pub created_at: i64,
    /// Last mutation time, unix epoch milliseconds.
    pub updated_at: i64,
}

impl TaskItem {
    /// Creates a new pending task with a generated stable ID.
    pub fn new(title: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), title)
    }

    /// Creates a task with a caller-provided stable ID.
    pub fn with_id(uuid: TaskId, title: impl Into<String>) -> Self {
        let now = now_epoch_ms();
        Self {
            uuid,
            title: title.into(),
            details: None,
            status: TaskStatus::Pending,
            due_at: None,
            remind_at: None,
            inspiration_uuid: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Validates this record for persistence.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle { entity: "task" });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{TaskItem, TaskStatus};

    #[test]
    fn new_task_is_pending_and_unlinked() {
        let task = TaskItem::new("follow up");
        assert_eq!(task.status, TaskStatus::Pending);
        assert!(task.inspiration_uuid.is_none());
    }

    #[test]
    fn status_all_covers_three_values() {
        assert_eq!(TaskStatus::ALL.len(), 3);
    }
}
