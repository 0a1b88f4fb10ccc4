//! Task repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD and status/aggregate counts over `tasks`.
//!
//! # Invariants
//! - Persisted status values decode to exactly three states; anything else
//!   is rejected as invalid data.
//! - `inspiration_uuid` is kept nullable; clearing it never touches the
//!   inspiration row.

use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

use crate::model::inspiration::InspirationId;
use crate::model::now_epoch_ms;
use crate::model::task::{TaskId, TaskItem, TaskStatus};
use crate::repo::{ensure_tables, parse_uuid, RepoError, RepoResult};

const LIST_DEFAULT_LIMIT: u32 = 50;
const LIST_LIMIT_MAX: u32 = 200;

const TASK_SELECT_SQL: &str = "SELECT
    uuid,
    title,
    details,
    status,
    due_at,
    remind_at,
    inspiration_uuid,
    created_at,
    updated_at
FROM tasks";

/// Query options for task list use-cases.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskListQuery {
    /// Optional status filter.
    pub status: Option<TaskStatus>,
    /// Optional filter to tasks derived from one inspiration.
    pub inspiration: Option<InspirationId>,
    /// Maximum rows to return. Defaults to 50 and clamps to 200.
    pub limit: Option<u32>,
    /// Number of rows to skip.
    pub offset: u32,
}

/// Repository interface for task persistence.
pub trait TaskRepository {
    /// Creates one task and returns its stable id.
    fn create(&self, task: &TaskItem) -> RepoResult<TaskId>;
    /// Replaces all mutable fields of an existing task.
    fn update(&self, task: &TaskItem) -> RepoResult<()>;
    /// Gets one task by id.
    fn get(&self, id: TaskId) -> RepoResult<Option<TaskItem>>;
    /// Lists tasks using status/inspiration filters and pagination.
    fn list(&self, query: &TaskListQuery) -> RepoResult<Vec<TaskItem>>;
    /// Hard-deletes a task.
    fn delete(&self, id: TaskId) -> RepoResult<()>;
    /// Updates only the status field.
    fn set_status(&self, id: TaskId, status: TaskStatus) -> RepoResult<()>;
    /// Sets or clears the inspiration back-reference.
    fn set_inspiration(&self, id: TaskId, inspiration: Option<InspirationId>) -> RepoResult<()>;
    /// Unconditional row count.
    fn count_all(&self) -> RepoResult<u32>;
    /// Rows with the given status.
    fn count_by_status(&self, status: TaskStatus) -> RepoResult<u32>;
    /// Rows with `created_at` in `[start_ms, end_ms)`.
    fn count_created_between(&self, start_ms: i64, end_ms: i64) -> RepoResult<u32>;
    /// All creation timestamps, for calendar bucketing.
    fn created_timestamps(&self) -> RepoResult<Vec<i64>>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(
            conn,
            &[(
                "tasks",
                &[
                    "uuid",
                    "title",
                    "status",
                    "inspiration_uuid",
                    "created_at",
                    "updated_at",
                ],
            )],
        )?;
        Ok(Self { conn })
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn create(&self, task: &TaskItem) -> RepoResult<TaskId> {
        task.validate()?;

        self.conn.execute(
            "INSERT INTO tasks (
                uuid,
                title,
                details,
                status,
                due_at,
                remind_at,
                inspiration_uuid,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
            params![
                task.uuid.to_string(),
                task.title.as_str(),
                task.details.as_deref(),
                status_to_db(task.status),
                task.due_at,
                task.remind_at,
                task.inspiration_uuid.map(|id| id.to_string()),
                task.created_at,
                task.updated_at,
            ],
        )?;

        Ok(task.uuid)
    }

    fn update(&self, task: &TaskItem) -> RepoResult<()> {
        task.validate()?;

        let changed = self.conn.execute(
            "UPDATE tasks
             SET
                title = ?1,
                details = ?2,
                status = ?3,
                due_at = ?4,
                remind_at = ?5,
                inspiration_uuid = ?6,
                updated_at = ?7
             WHERE uuid = ?8;",
            params![
                task.title.as_str(),
                task.details.as_deref(),
                status_to_db(task.status),
                task.due_at,
                task.remind_at,
                task.inspiration_uuid.map(|id| id.to_string()),
                now_epoch_ms(),
                task.uuid.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(task.uuid));
        }

        Ok(())
    }

    fn get(&self, id: TaskId) -> RepoResult<Option<TaskItem>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} WHERE uuid = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_task_row(row)?));
        }

        Ok(None)
    }

    fn list(&self, query: &TaskListQuery) -> RepoResult<Vec<TaskItem>> {
        let mut sql = format!("{TASK_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(status) = query.status {
            sql.push_str(" AND status = ?");
            bind_values.push(Value::Text(status_to_db(status).to_string()));
        }

        if let Some(inspiration) = query.inspiration {
            sql.push_str(" AND inspiration_uuid = ?");
            bind_values.push(Value::Text(inspiration.to_string()));
        }

        sql.push_str(" ORDER BY created_at DESC, uuid ASC");
        let limit = match query.limit {
            Some(0) | None => LIST_DEFAULT_LIMIT,
            Some(value) if value > LIST_LIMIT_MAX => LIST_LIMIT_MAX,
            Some(value) => value,
        };
        sql.push_str(" LIMIT ?");
        bind_values.push(Value::Integer(i64::from(limit)));
        if query.offset > 0 {
            sql.push_str(" OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut tasks = Vec::new();

        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }

        Ok(tasks)
    }

    fn delete(&self, id: TaskId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM tasks WHERE uuid = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn set_status(&self, id: TaskId, status: TaskStatus) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE tasks SET status = ?1, updated_at = ?2 WHERE uuid = ?3;",
            params![status_to_db(status), now_epoch_ms(), id.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn set_inspiration(&self, id: TaskId, inspiration: Option<InspirationId>) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE tasks SET inspiration_uuid = ?1, updated_at = ?2 WHERE uuid = ?3;",
            params![
                inspiration.map(|value| value.to_string()),
                now_epoch_ms(),
                id.to_string()
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn count_all(&self) -> RepoResult<u32> {
        let count: u32 = self
            .conn
            .query_row("SELECT COUNT(*) FROM tasks;", [], |row| row.get(0))?;
        Ok(count)
    }

    fn count_by_status(&self, status: TaskStatus) -> RepoResult<u32> {
        let count: u32 = self.conn.query_row(
            "SELECT COUNT(*) FROM tasks WHERE status = ?1;",
            [status_to_db(status)],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    fn count_created_between(&self, start_ms: i64, end_ms: i64) -> RepoResult<u32> {
        let count: u32 = self.conn.query_row(
            "SELECT COUNT(*) FROM tasks WHERE created_at >= ?1 AND created_at < ?2;",
            params![start_ms, end_ms],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    fn created_timestamps(&self) -> RepoResult<Vec<i64>> {
        let mut stmt = self
            .conn
            .prepare("SELECT created_at FROM tasks ORDER BY created_at ASC;")?;
        let mut rows = stmt.query([])?;
        let mut timestamps = Vec::new();
        while let Some(row) = rows.next()? {
            timestamps.push(row.get(0)?);
        }
        Ok(timestamps)
    }
}

pub(crate) fn status_to_db(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Pending => "pending",
        TaskStatus::InProgress => "in_progress",
        TaskStatus::Completed => "completed",
    }
}

pub(crate) fn parse_status(value: &str) -> Option<TaskStatus> {
    match value {
        "pending" => Some(TaskStatus::Pending),
        "in_progress" => Some(TaskStatus::InProgress),
        "completed" => Some(TaskStatus::Completed),
        _ => None,
    }
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<TaskItem> {
    let uuid_text: String = row.get("uuid")?;
    let uuid = parse_uuid(&uuid_text, "tasks.uuid")?;

    let status_text: String = row.get("status")?;
    let status = parse_status(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid status `{status_text}` in tasks.status"))
    })?;

    let inspiration_uuid = match row.get::<_, Option<String>>("inspiration_uuid")? {
        Some(value) => Some(parse_uuid(&value, "tasks.inspiration_uuid")?),
        None => None,
    };

    Ok(TaskItem {
        uuid,
        title: row.get("title")?,
        details: row.get("details")?,
        status,
        due_at: row.get("due_at")?,
        remind_at: row.get("remind_at")?,
        inspiration_uuid,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
