//! Tag domain model and name normalization.
//!
//! # Invariants
//! - Tag names are normalized to lowercase before persistence.
//! - Name uniqueness is a convention, not a storage constraint: two tags
//!   with the same name may coexist.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{now_epoch_ms, ValidationError};

/// Stable identifier for a tag.
pub type TagId = Uuid;

/// Display color applied when the user does not pick one.
pub const DEFAULT_TAG_COLOR: &str = "#8E8E93";

/// Canonical record for one tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Stable global ID.
    pub uuid: TagId,
    /// Display name, normalized to lowercase.
    pub name: String,
    /// Display color as a hex string.
    pub color: String,
    /// Creation time, unix epoch milliseconds.
    pub created_at: i64,
}

impl Tag {
    /// Creates a tag with a generated ID and normalized name.
    pub fn new(name: impl Into<String>, color: Option<String>) -> Self {
        let raw: String = name.into();
        Self {
            uuid: Uuid::new_v4(),
            name: normalize_tag_name(&raw).unwrap_or(raw),
            color: color.unwrap_or_else(|| DEFAULT_TAG_COLOR.to_string()),
            created_at: now_epoch_ms(),
        }
    }

    /// Validates this record for persistence.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyTagName);
        }
        Ok(())
    }
}

/// Normalizes one tag name: trimmed and lowercased, `None` when blank.
pub fn normalize_tag_name(name: &str) -> Option<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Normalizes and deduplicates a tag name set, dropping blank entries.
pub fn normalize_tag_names(names: &[String]) -> Vec<String> {
    let mut unique = BTreeSet::new();
    for name in names {
        if let Some(value) = normalize_tag_name(name) {
            unique.insert(value);
        }
    }
    unique.into_iter().collect()
}
