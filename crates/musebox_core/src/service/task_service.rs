//! Task use-case service.
//!
//! # Responsibility
//! - Provide create/convert/status-transition entry points for tasks.
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - Every mutation returns the freshly read-back record.
//! - Converting an inspiration never mutates the inspiration row.

use std::error::Error;
use std::fmt::{Display, Formatter};

use crate::model::inspiration::InspirationId;
use crate::model::task::{TaskId, TaskItem, TaskStatus};
use crate::repo::task_repo::{TaskListQuery, TaskRepository};
use crate::repo::{RepoError, RepoResult};

/// Service error for task use-cases.
#[derive(Debug)]
pub enum TaskServiceError {
    /// Target task does not exist.
    NotFound(TaskId),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for TaskServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "task not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent task state: {details}"),
        }
    }
}

impl Error for TaskServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for TaskServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Request model for creating a task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateTaskRequest {
    pub title: String,
    pub details: Option<String>,
    /// When set, the task is recorded as derived from this inspiration.
    pub inspiration: Option<InspirationId>,
    pub due_at: Option<i64>,
    pub remind_at: Option<i64>,
}

/// Task service facade over repository implementations.
pub struct TaskService<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> TaskService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a pending task, optionally derived from an inspiration.
    pub fn create(&self, request: CreateTaskRequest) -> Result<TaskItem, TaskServiceError> {
        let mut task = TaskItem::new(request.title);
        task.details = request.details;
        task.inspiration_uuid = request.inspiration;
        task.due_at = request.due_at;
        task.remind_at = request.remind_at;

        let id = self.repo.create(&task)?;
        self.read_back(id, "created task not found in read-back")
    }

    /// Replaces all mutable fields of an existing task.
    pub fn update(&self, task: &TaskItem) -> Result<TaskItem, TaskServiceError> {
        self.repo.update(task)?;
        self.read_back(task.uuid, "updated task not found in read-back")
    }

    /// Moves a task to the given lifecycle state.
    pub fn set_status(
        &self,
        id: TaskId,
        status: TaskStatus,
    ) -> Result<TaskItem, TaskServiceError> {
        self.repo.set_status(id, status)?;
        self.read_back(id, "task missing after status change")
    }

    /// Associates the task with an inspiration.
    pub fn link_inspiration(
        &self,
        id: TaskId,
        inspiration: InspirationId,
    ) -> Result<TaskItem, TaskServiceError> {
        self.repo.set_inspiration(id, Some(inspiration))?;
        self.read_back(id, "task missing after link")
    }

    /// Clears the inspiration back-reference.
    pub fn unlink_inspiration(&self, id: TaskId) -> Result<TaskItem, TaskServiceError> {
        self.repo.set_inspiration(id, None)?;
        self.read_back(id, "task missing after unlink")
    }

    /// Gets one task by stable ID.
    pub fn get(&self, id: TaskId) -> RepoResult<Option<TaskItem>> {
        self.repo.get(id)
    }

    /// Lists tasks using optional status/inspiration filters.
    pub fn list(&self, query: &TaskListQuery) -> RepoResult<Vec<TaskItem>> {
        self.repo.list(query)
    }

    /// Hard-deletes a task.
    pub fn delete(&self, id: TaskId) -> Result<(), TaskServiceError> {
        self.repo.delete(id)?;
        Ok(())
    }

    fn read_back(
        &self,
        id: TaskId,
        details: &'static str,
    ) -> Result<TaskItem, TaskServiceError> {
        self.repo
            .get(id)?
            .ok_or(TaskServiceError::InconsistentState(details))
    }
}
