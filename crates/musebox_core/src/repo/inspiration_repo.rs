//! Inspiration repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD, tag-link replacement and aggregate counts over
//!   `inspirations`.
//! - Own the derived "organized" classification (has at least one linked
//!   task) so callers never re-implement it.
//!
//! # Invariants
//! - `set_tags` replaces the whole tag set in a single immediate
//!   transaction.
//! - Deleting an inspiration leaves its tasks alive with a NULL
//!   back-reference (enforced by the schema's `ON DELETE SET NULL`).
//! - Tag names are normalized to lowercase before persistence.

use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row, Transaction, TransactionBehavior};
use uuid::Uuid;

use crate::model::inspiration::{Inspiration, InspirationId, InspirationKind, InspirationRecord};
use crate::model::now_epoch_ms;
use crate::model::tag::DEFAULT_TAG_COLOR;
use crate::repo::{ensure_tables, parse_uuid, RepoError, RepoResult};

const LIST_DEFAULT_LIMIT: u32 = 20;
const LIST_LIMIT_MAX: u32 = 100;

const INSPIRATION_SELECT_SQL: &str = "SELECT
    uuid,
    kind,
    title,
    content,
    url,
    image_data,
    created_at,
    updated_at,
    (SELECT COUNT(*) FROM tasks WHERE tasks.inspiration_uuid = inspirations.uuid) AS task_count
FROM inspirations";

/// Query options for inspiration list use-cases.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InspirationListQuery {
    /// Optional capture-kind filter.
    pub kind: Option<InspirationKind>,
    /// Optional single-tag exact match filter (case-insensitive).
    pub tag: Option<String>,
    /// Maximum rows to return. Defaults to 20 and clamps to 100.
    pub limit: Option<u32>,
    /// Number of rows to skip.
    pub offset: u32,
}

/// Repository interface for inspiration persistence.
pub trait InspirationRepository {
    /// Creates one inspiration and returns its stable id.
    fn create(&self, inspiration: &Inspiration) -> RepoResult<InspirationId>;
    /// Replaces all mutable fields of an existing inspiration.
    fn update(&self, inspiration: &Inspiration) -> RepoResult<()>;
    /// Gets one inspiration by id, with tags and task count.
    fn get(&self, id: InspirationId) -> RepoResult<Option<InspirationRecord>>;
    /// Lists inspirations using kind/tag filters and pagination.
    fn list(&self, query: &InspirationListQuery) -> RepoResult<Vec<InspirationRecord>>;
    /// Hard-deletes an inspiration. Linked tasks become unassociated.
    fn delete(&self, id: InspirationId) -> RepoResult<()>;
    /// Replaces the full tag set for one inspiration in one transaction.
    fn set_tags(&mut self, id: InspirationId, tags: &[String]) -> RepoResult<()>;
    /// Unconditional row count.
    fn count_all(&self) -> RepoResult<u32>;
    /// Rows with `created_at` in `[start_ms, end_ms)`.
    fn count_created_between(&self, start_ms: i64, end_ms: i64) -> RepoResult<u32>;
    /// Rows with at least one linked task.
    fn count_organized(&self) -> RepoResult<u32>;
    /// Rows with zero linked tasks.
    fn count_unorganized(&self) -> RepoResult<u32>;
    /// All creation timestamps, for calendar bucketing.
    fn created_timestamps(&self) -> RepoResult<Vec<i64>>;
}

/// SQLite-backed inspiration repository.
pub struct SqliteInspirationRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteInspirationRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_tables(
            conn,
            &[
                (
                    "inspirations",
                    &["uuid", "kind", "title", "created_at", "updated_at"],
                ),
                ("tasks", &["uuid", "inspiration_uuid"]),
                ("tags", &["uuid", "name", "color"]),
                ("inspiration_tags", &["inspiration_uuid", "tag_uuid"]),
            ],
        )?;
        Ok(Self { conn })
    }
}

impl InspirationRepository for SqliteInspirationRepository<'_> {
    fn create(&self, inspiration: &Inspiration) -> RepoResult<InspirationId> {
        inspiration.validate()?;

        self.conn.execute(
            "INSERT INTO inspirations (
                uuid,
                kind,
                title,
                content,
                url,
                image_data,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                inspiration.uuid.to_string(),
                kind_to_db(inspiration.kind),
                inspiration.title.as_str(),
                inspiration.content.as_deref(),
                inspiration.url.as_deref(),
                inspiration.image_data.as_deref(),
                inspiration.created_at,
                inspiration.updated_at,
            ],
        )?;

        Ok(inspiration.uuid)
    }

    fn update(&self, inspiration: &Inspiration) -> RepoResult<()> {
        inspiration.validate()?;

        let changed = self.conn.execute(
            "UPDATE inspirations
             SET
                kind = ?1,
                title = ?2,
                content = ?3,
                url = ?4,
                image_data = ?5,
                updated_at = ?6
             WHERE uuid = ?7;",
            params![
                kind_to_db(inspiration.kind),
                inspiration.title.as_str(),
                inspiration.content.as_deref(),
                inspiration.url.as_deref(),
                inspiration.image_data.as_deref(),
                now_epoch_ms(),
                inspiration.uuid.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(inspiration.uuid));
        }

        Ok(())
    }

    fn get(&self, id: InspirationId) -> RepoResult<Option<InspirationRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{INSPIRATION_SELECT_SQL} WHERE uuid = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            let record = parse_inspiration_row(self.conn, row)?;
            return Ok(Some(record));
        }

        Ok(None)
    }

    fn list(&self, query: &InspirationListQuery) -> RepoResult<Vec<InspirationRecord>> {
        let mut sql = format!("{INSPIRATION_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(kind) = query.kind {
            sql.push_str(" AND kind = ?");
            bind_values.push(Value::Text(kind_to_db(kind).to_string()));
        }

        if let Some(tag) = query.tag.as_ref() {
            sql.push_str(
                " AND EXISTS (
                    SELECT 1
                    FROM inspiration_tags it
                    INNER JOIN tags t ON t.uuid = it.tag_uuid
                    WHERE it.inspiration_uuid = inspirations.uuid
                      AND t.name = ? COLLATE NOCASE
                )",
            );
            bind_values.push(Value::Text(tag.clone()));
        }

        sql.push_str(" ORDER BY created_at DESC, uuid ASC");
        let limit = normalize_list_limit(query.limit);
        sql.push_str(" LIMIT ?");
        bind_values.push(Value::Integer(i64::from(limit)));
        if query.offset > 0 {
            sql.push_str(" OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut records = Vec::new();

        while let Some(row) = rows.next()? {
            records.push(parse_inspiration_row(self.conn, row)?);
        }

        Ok(records)
    }

    fn delete(&self, id: InspirationId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM inspirations WHERE uuid = ?1;",
            [id.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn set_tags(&mut self, id: InspirationId, tags: &[String]) -> RepoResult<()> {
        let id_text = id.to_string();
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        if !inspiration_exists_in_tx(&tx, id_text.as_str())? {
            return Err(RepoError::NotFound(id));
        }

        tx.execute(
            "DELETE FROM inspiration_tags WHERE inspiration_uuid = ?1;",
            [id_text.as_str()],
        )?;

        for tag in tags {
            let tag_uuid = find_or_create_tag_in_tx(&tx, tag)?;
            tx.execute(
                "INSERT OR IGNORE INTO inspiration_tags (inspiration_uuid, tag_uuid)
                 VALUES (?1, ?2);",
                params![id_text.as_str(), tag_uuid],
            )?;
        }

        tx.execute(
            "UPDATE inspirations SET updated_at = ?1 WHERE uuid = ?2;",
            params![now_epoch_ms(), id_text.as_str()],
        )?;

        tx.commit()?;
        Ok(())
    }

    fn count_all(&self) -> RepoResult<u32> {
        let count: u32 = self
            .conn
            .query_row("SELECT COUNT(*) FROM inspirations;", [], |row| row.get(0))?;
        Ok(count)
    }

    fn count_created_between(&self, start_ms: i64, end_ms: i64) -> RepoResult<u32> {
        let count: u32 = self.conn.query_row(
            "SELECT COUNT(*) FROM inspirations WHERE created_at >= ?1 AND created_at < ?2;",
            params![start_ms, end_ms],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    fn count_organized(&self) -> RepoResult<u32> {
        let count: u32 = self.conn.query_row(
            "SELECT COUNT(*) FROM inspirations
             WHERE EXISTS (
                SELECT 1 FROM tasks WHERE tasks.inspiration_uuid = inspirations.uuid
             );",
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    fn count_unorganized(&self) -> RepoResult<u32> {
        let count: u32 = self.conn.query_row(
            "SELECT COUNT(*) FROM inspirations
             WHERE NOT EXISTS (
                SELECT 1 FROM tasks WHERE tasks.inspiration_uuid = inspirations.uuid
             );",
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    fn created_timestamps(&self) -> RepoResult<Vec<i64>> {
        let mut stmt = self
            .conn
            .prepare("SELECT created_at FROM inspirations ORDER BY created_at ASC;")?;
        let mut rows = stmt.query([])?;
        let mut timestamps = Vec::new();
        while let Some(row) = rows.next()? {
            timestamps.push(row.get(0)?);
        }
        Ok(timestamps)
    }
}

/// Normalizes list limit according to the listing contract.
pub fn normalize_list_limit(limit: Option<u32>) -> u32 {
    match limit {
        Some(0) => LIST_DEFAULT_LIMIT,
        Some(value) if value > LIST_LIMIT_MAX => LIST_LIMIT_MAX,
        Some(value) => value,
        None => LIST_DEFAULT_LIMIT,
    }
}

pub(crate) fn kind_to_db(kind: InspirationKind) -> &'static str {
    match kind {
        InspirationKind::Note => "note",
        InspirationKind::Image => "image",
        InspirationKind::Url => "url",
        InspirationKind::Video => "video",
    }
}

pub(crate) fn parse_kind(value: &str) -> Option<InspirationKind> {
    match value {
        "note" => Some(InspirationKind::Note),
        "image" => Some(InspirationKind::Image),
        "url" => Some(InspirationKind::Url),
        "video" => Some(InspirationKind::Video),
        _ => None,
    }
}

fn parse_inspiration_row(conn: &Connection, row: &Row<'_>) -> RepoResult<InspirationRecord> {
    let uuid_text: String = row.get("uuid")?;
    let uuid = parse_uuid(&uuid_text, "inspirations.uuid")?;

    let kind_text: String = row.get("kind")?;
    let kind = parse_kind(&kind_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid kind `{kind_text}` in inspirations.kind"))
    })?;

    let tags = load_tags_for_inspiration(conn, &uuid_text)?;

    Ok(InspirationRecord {
        uuid,
        kind,
        title: row.get("title")?,
        content: row.get("content")?,
        url: row.get("url")?,
        image_data: row.get("image_data")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
        tags,
        task_count: row.get("task_count")?,
    })
}

fn load_tags_for_inspiration(conn: &Connection, inspiration_uuid: &str) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT t.name
         FROM inspiration_tags it
         INNER JOIN tags t ON t.uuid = it.tag_uuid
         WHERE it.inspiration_uuid = ?1
         ORDER BY t.name COLLATE NOCASE ASC;",
    )?;
    let mut rows = stmt.query([inspiration_uuid])?;
    let mut tags = Vec::new();
    while let Some(row) = rows.next()? {
        let value: String = row.get(0)?;
        tags.push(value.to_lowercase());
    }
    Ok(tags)
}

fn inspiration_exists_in_tx(tx: &Transaction<'_>, uuid: &str) -> RepoResult<bool> {
    let exists: i64 = tx.query_row(
        "SELECT EXISTS(SELECT 1 FROM inspirations WHERE uuid = ?1);",
        [uuid],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

/// Resolves a tag by normalized name, creating it when absent.
///
/// Names are matched case-insensitively; the oldest tag wins when
/// duplicates exist (duplicates are legal at the storage level).
fn find_or_create_tag_in_tx(tx: &Transaction<'_>, name: &str) -> RepoResult<String> {
    let existing: Option<String> = tx
        .query_row(
            "SELECT uuid FROM tags
             WHERE name = ?1 COLLATE NOCASE
             ORDER BY created_at ASC, uuid ASC
             LIMIT 1;",
            [name],
            |row| row.get(0),
        )
        .map(Some)
        .or_else(|err| match err {
            rusqlite::Error::QueryReturnedNoRows => Ok(None),
            other => Err(other),
        })?;

    if let Some(uuid) = existing {
        return Ok(uuid);
    }

    let uuid = Uuid::new_v4().to_string();
    tx.execute(
        "INSERT INTO tags (uuid, name, color, created_at) VALUES (?1, ?2, ?3, ?4);",
        params![uuid, name, DEFAULT_TAG_COLOR, now_epoch_ms()],
    )?;
    Ok(uuid)
}
