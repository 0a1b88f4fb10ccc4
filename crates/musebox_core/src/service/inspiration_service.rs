//! Inspiration use-case service.
//!
//! # Responsibility
//! - Provide kind-specific capture entry points (note/image/url/video).
//! - Normalize and atomically replace inspiration tags.
//!
//! # Invariants
//! - Every mutation returns the freshly read-back record.
//! - List results are sorted by `created_at DESC, uuid ASC`.
//! - Tag names are normalized to lowercase and deduplicated.

use std::error::Error;
use std::fmt::{Display, Formatter};

use crate::model::inspiration::{Inspiration, InspirationId, InspirationKind, InspirationRecord};
use crate::model::tag::{normalize_tag_name, normalize_tag_names};
use crate::repo::inspiration_repo::{
    normalize_list_limit, InspirationListQuery, InspirationRepository,
};
use crate::repo::{RepoError, RepoResult};

/// Service error for inspiration use-cases.
#[derive(Debug)]
pub enum InspirationServiceError {
    /// Tag input contains blank values.
    InvalidTag(String),
    /// Target inspiration does not exist.
    NotFound(InspirationId),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for InspirationServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTag(value) => write!(f, "invalid tag: `{value}`"),
            Self::NotFound(id) => write!(f, "inspiration not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => {
                write!(f, "inconsistent inspiration state: {details}")
            }
        }
    }
}

impl Error for InspirationServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for InspirationServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// List result envelope used by service callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspirationListResult {
    /// Items sorted by `created_at DESC, uuid ASC`.
    pub items: Vec<InspirationRecord>,
    /// Effective normalized limit used by the query.
    pub applied_limit: u32,
}

/// Inspiration service facade over repository implementations.
pub struct InspirationService<R: InspirationRepository> {
    repo: R,
}

impl<R: InspirationRepository> InspirationService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Captures a free-form note.
    pub fn capture_note(
        &self,
        title: impl Into<String>,
        content: Option<String>,
    ) -> Result<InspirationRecord, InspirationServiceError> {
        let mut inspiration = Inspiration::new(InspirationKind::Note, title);
        inspiration.content = content;
        self.create_and_read_back(&inspiration)
    }

    /// Captures an image with raw bytes.
    pub fn capture_image(
        &self,
        title: impl Into<String>,
        image_data: Vec<u8>,
    ) -> Result<InspirationRecord, InspirationServiceError> {
        let mut inspiration = Inspiration::new(InspirationKind::Image, title);
        inspiration.image_data = Some(image_data);
        self.create_and_read_back(&inspiration)
    }

    /// Captures a web link.
    pub fn capture_url(
        &self,
        title: impl Into<String>,
        url: impl Into<String>,
    ) -> Result<InspirationRecord, InspirationServiceError> {
        let mut inspiration = Inspiration::new(InspirationKind::Url, title);
        inspiration.url = Some(url.into());
        self.create_and_read_back(&inspiration)
    }

    /// Captures a video link.
    pub fn capture_video(
        &self,
        title: impl Into<String>,
        url: impl Into<String>,
    ) -> Result<InspirationRecord, InspirationServiceError> {
        let mut inspiration = Inspiration::new(InspirationKind::Video, title);
        inspiration.url = Some(url.into());
        self.create_and_read_back(&inspiration)
    }

    /// Replaces all mutable fields of an existing inspiration.
    pub fn update(
        &self,
        inspiration: &Inspiration,
    ) -> Result<InspirationRecord, InspirationServiceError> {
        self.repo.update(inspiration)?;
        self.repo
            .get(inspiration.uuid)?
            .ok_or(InspirationServiceError::InconsistentState(
                "updated inspiration not found in read-back",
            ))
    }

    /// Gets one inspiration by stable ID.
    pub fn get(&self, id: InspirationId) -> RepoResult<Option<InspirationRecord>> {
        self.repo.get(id)
    }

    /// Lists inspirations using optional kind/tag filters and pagination.
    pub fn list(
        &self,
        kind: Option<InspirationKind>,
        tag: Option<String>,
        limit: Option<u32>,
        offset: u32,
    ) -> Result<InspirationListResult, InspirationServiceError> {
        let normalized_tag = tag.and_then(|value| normalize_tag_name(value.as_str()));
        let applied_limit = normalize_list_limit(limit);
        let query = InspirationListQuery {
            kind,
            tag: normalized_tag,
            limit: Some(applied_limit),
            offset,
        };
        let items = self.repo.list(&query)?;
        Ok(InspirationListResult {
            items,
            applied_limit,
        })
    }

    /// Hard-deletes an inspiration. Its tasks become unassociated.
    pub fn delete(&self, id: InspirationId) -> Result<(), InspirationServiceError> {
        self.repo.delete(id)?;
        Ok(())
    }

    /// Atomically replaces the full tag set for one inspiration.
    pub fn set_tags(
        &mut self,
        id: InspirationId,
        tags: Vec<String>,
    ) -> Result<InspirationRecord, InspirationServiceError> {
        for tag in &tags {
            if tag.trim().is_empty() {
                return Err(InspirationServiceError::InvalidTag(tag.clone()));
            }
        }

        let normalized = normalize_tag_names(&tags);
        self.repo.set_tags(id, &normalized)?;
        self.repo
            .get(id)?
            .ok_or(InspirationServiceError::InconsistentState(
                "inspiration missing after tag replacement",
            ))
    }

    fn create_and_read_back(
        &self,
        inspiration: &Inspiration,
    ) -> Result<InspirationRecord, InspirationServiceError> {
        let id = self.repo.create(inspiration)?;
        self.repo
            .get(id)?
            .ok_or(InspirationServiceError::InconsistentState(
                "created inspiration not found in read-back",
            ))
    }
}
