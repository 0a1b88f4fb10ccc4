//! Inspiration domain model.
//!
//! # Responsibility
//! - Define the captured-inspiration record shared by all capture flows.
//! - Keep kind-specific payload fields optional so one storage shape covers
//!   note, image, url and video captures.
//!
//! # Invariants
//! - `uuid` is stable and never reused for another inspiration.
//! - `Url` and `Video` kinds carry a non-empty `url`.
//! - Whether an inspiration is "organized" is never stored here; it is
//!   derived from task links at query time.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{now_epoch_ms, ValidationError};

/// Stable identifier for an inspiration.
pub type InspirationId = Uuid;

/// Capture kind for an inspiration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InspirationKind {
    /// Free-form text note.
    Note,
    /// Picture captured from camera or library.
    Image,
    /// Saved web link.
    Url,
    /// Saved video link.
    Video,
}

/// Canonical record for one captured inspiration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inspiration {
    /// Stable global ID used for linking and auditing.
    pub uuid: InspirationId,
    /// Serialized as `kind` (`note|image|url|video`).
    pub kind: InspirationKind,
    /// Short user-facing title.
    pub title: String,
    /// Free-form body text. Meaningful mostly for `Note`.
    pub content: Option<String>,
    /// Source link for `Url`/`Video` captures.
    pub url: Option<String>,
    /// Raw image bytes for `Image` captures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_data: Option<Vec<u8>>,
    /// Creation time, unix epoch milliseconds.
    pub created_at: i64,
    /// Last mutation time, unix epoch milliseconds.
    pub updated_at: i64,
}

impl Inspiration {
    /// Creates a new inspiration with a generated stable ID and current
    /// timestamps. Optional payload fields start as `None`.
    pub fn new(kind: InspirationKind, title: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), kind, title)
    }

    /// Creates an inspiration with a caller-provided stable ID.
    ///
    /// Used by import paths where identity already exists externally.
    pub fn with_id(uuid: InspirationId, kind: InspirationKind, title: impl Into<String>) -> Self {
        let now = now_epoch_ms();
        Self {
            uuid,
            kind,
            title: title.into(),
            content: None,
            url: None,
            image_data: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Validates this record for persistence.
    ///
    /// # Errors
    /// - `EmptyTitle` when the title is blank.
    /// - `MissingUrl` when a `Url`/`Video` capture has no usable url.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle {
                entity: "inspiration",
            });
        }

        if matches!(self.kind, InspirationKind::Url | InspirationKind::Video)
            && self.url.as_deref().map_or(true, |url| url.trim().is_empty())
        {
            return Err(ValidationError::MissingUrl { kind: self.kind });
        }

        Ok(())
    }
}

/// Read model for inspiration list/detail use-cases.
///
/// Carries the derived fields the dashboard and list screens need without
/// loading task rows themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InspirationRecord {
    /// Stable inspiration id.
    pub uuid: InspirationId,
    pub kind: InspirationKind,
    pub title: String,
    pub content: Option<String>,
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_data: Option<Vec<u8>>,
    pub created_at: i64,
    pub updated_at: i64,
    /// Tag names, normalized to lowercase and sorted.
    pub tags: Vec<String>,
    /// Number of linked tasks.
    pub task_count: u32,
}

impl InspirationRecord {
    /// An inspiration is organized once at least one task is linked to it.
    pub fn is_organized(&self) -> bool {
        self.task_count > 0
    }
}

#[cfg(test)]
mod tests {
    use super::{Inspiration, InspirationKind};
    use crate::model::ValidationError;

    #[test]
    fn new_inspiration_starts_with_empty_payload() {
        let inspiration = Inspiration::new(InspirationKind::Note, "idea");
        assert!(inspiration.content.is_none());
        assert!(inspiration.url.is_none());
        assert!(inspiration.image_data.is_none());
        assert_eq!(inspiration.created_at, inspiration.updated_at);
    }

    #[test]
    fn validate_rejects_blank_title() {
        let inspiration = Inspiration::new(InspirationKind::Note, "   ");
        assert!(matches!(
            inspiration.validate(),
            Err(ValidationError::EmptyTitle { .. })
        ));
    }

    #[test]
    fn validate_requires_url_for_link_kinds() {
        let mut inspiration = Inspiration::new(InspirationKind::Video, "talk");
        assert!(matches!(
            inspiration.validate(),
            Err(ValidationError::MissingUrl { .. })
        ));

        inspiration.url = Some("https://example.com/talk".to_string());
        assert!(inspiration.validate().is_ok());
    }
}
