//! Tag repository contract and SQLite implementation.
//!
//! Tag rows are deliberately permissive: name uniqueness is a write-path
//! convention, so lookups by name pick the oldest match.

use rusqlite::{params, Connection, Row};

use crate::model::tag::{Tag, TagId};
use crate::repo::{ensure_tables, parse_uuid, RepoError, RepoResult};

/// Repository interface for tag persistence.
pub trait TagRepository {
    /// Creates one tag and returns its stable id.
    fn create(&self, tag: &Tag) -> RepoResult<TagId>;
    /// Lists all tags sorted by name.
    fn list(&self) -> RepoResult<Vec<Tag>>;
    /// Finds the oldest tag with the given name (case-insensitive).
    fn find_by_name(&self, name: &str) -> RepoResult<Option<Tag>>;
    /// Hard-deletes a tag and (via schema cascade) its inspiration links.
    fn delete(&self, id: TagId) -> RepoResult<()>;
}

/// SQLite-backed tag repository.
pub struct SqliteTagRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTagRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &[("tags", &["uuid", "name", "color", "created_at"])])?;
        Ok(Self { conn })
    }
}

impl TagRepository for SqliteTagRepository<'_> {
    fn create(&self, tag: &Tag) -> RepoResult<TagId> {
        tag.validate()?;

        self.conn.execute(
            "INSERT INTO tags (uuid, name, color, created_at) VALUES (?1, ?2, ?3, ?4);",
            params![
                tag.uuid.to_string(),
                tag.name.as_str(),
                tag.color.as_str(),
                tag.created_at,
            ],
        )?;

        Ok(tag.uuid)
    }

    fn list(&self) -> RepoResult<Vec<Tag>> {
        let mut stmt = self.conn.prepare(
            "SELECT uuid, name, color, created_at
             FROM tags
             ORDER BY name COLLATE NOCASE ASC, created_at ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut tags = Vec::new();
        while let Some(row) = rows.next()? {
            tags.push(parse_tag_row(row)?);
        }
        Ok(tags)
    }

    fn find_by_name(&self, name: &str) -> RepoResult<Option<Tag>> {
        let mut stmt = self.conn.prepare(
            "SELECT uuid, name, color, created_at
             FROM tags
             WHERE name = ?1 COLLATE NOCASE
             ORDER BY created_at ASC, uuid ASC
             LIMIT 1;",
        )?;
        let mut rows = stmt.query([name])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_tag_row(row)?));
        }
        Ok(None)
    }

    fn delete(&self, id: TagId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM tags WHERE uuid = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

fn parse_tag_row(row: &Row<'_>) -> RepoResult<Tag> {
    let uuid_text: String = row.get("uuid")?;
    let uuid = parse_uuid(&uuid_text, "tags.uuid")?;

    Ok(Tag {
        uuid,
        name: row.get::<_, String>("name")?.to_lowercase(),
        color: row.get("color")?,
        created_at: row.get("created_at")?,
    })
}
