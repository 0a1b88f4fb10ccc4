//! Tag use-case service.

use std::error::Error;
use std::fmt::{Display, Formatter};

use crate::model::tag::{normalize_tag_name, Tag, TagId};
use crate::repo::tag_repo::TagRepository;
use crate::repo::{RepoError, RepoResult};

/// Service error for tag use-cases.
#[derive(Debug)]
pub enum TagServiceError {
    /// Name is blank after normalization.
    InvalidName(String),
    /// Target tag does not exist.
    NotFound(TagId),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for TagServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidName(value) => write!(f, "invalid tag name: `{value}`"),
            Self::NotFound(id) => write!(f, "tag not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TagServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for TagServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Tag service facade over repository implementations.
pub struct TagService<R: TagRepository> {
    repo: R,
}

impl<R: TagRepository> TagService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a tag with a normalized name and optional display color.
    pub fn create(
        &self,
        name: impl Into<String>,
        color: Option<String>,
    ) -> Result<Tag, TagServiceError> {
        let raw: String = name.into();
        if normalize_tag_name(&raw).is_none() {
            return Err(TagServiceError::InvalidName(raw));
        }

        let tag = Tag::new(raw, color);
        self.repo.create(&tag)?;
        Ok(tag)
    }

    /// Lists all tags sorted by name.
    pub fn list(&self) -> RepoResult<Vec<Tag>> {
        self.repo.list()
    }

    /// Finds the oldest tag with the given name.
    pub fn find_by_name(&self, name: &str) -> RepoResult<Option<Tag>> {
        self.repo.find_by_name(name)
    }

    /// Hard-deletes a tag and its inspiration links.
    pub fn delete(&self, id: TagId) -> Result<(), TagServiceError> {
        self.repo.delete(id)?;
        Ok(())
    }
}
