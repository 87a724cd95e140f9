//! Change record model.
//!
//! ## Key Types
//!
//! - [`ChangeId`] - Unique identifier for a change record
//! - [`ChangeType`] - What happened to the file
//! - [`ChangeOrigin`] - Whether docsmith or a person proposed the change
//! - [`ChangeStatus`] - Position in the apply/revert state machine
//! - [`ChangeRecord`] - Full record, persisted as camelCase JSON

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::diff::generate_diff;

// ============================================================================
// ChangeId
// ============================================================================

/// Unique identifier for a change record (UUID v4).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangeId(pub String);

impl ChangeId {
    /// Generate a new unique change ID.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create a ChangeId from a string without validation.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First eight characters, for compact display.
    pub fn short(&self) -> &str {
        self.0.get(..8).unwrap_or(&self.0)
    }
}

impl fmt::Display for ChangeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ChangeId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

// ============================================================================
// Enums
// ============================================================================

/// What happened to the target file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChangeType {
    /// A new file was written.
    Created,
    /// An existing file was edited.
    Modified,
    /// A file was removed.
    Deleted,
    /// A new file was written from generated content.
    ContentGenerated,
    /// An existing file was overwritten with generated content.
    ContentUpdated,
}

impl ChangeType {
    /// Whether reverting this change means deleting the file.
    pub fn is_creation(&self) -> bool {
        matches!(self, ChangeType::Created | ChangeType::ContentGenerated)
    }

    /// Past-tense label for activity listings.
    pub fn label(&self) -> &'static str {
        match self {
            ChangeType::Created => "Created",
            ChangeType::Modified => "Modified",
            ChangeType::Deleted => "Deleted",
            ChangeType::ContentGenerated => "Generated",
            ChangeType::ContentUpdated => "Updated",
        }
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => write!(f, "created"),
            Self::Modified => write!(f, "modified"),
            Self::Deleted => write!(f, "deleted"),
            Self::ContentGenerated => write!(f, "content-generated"),
            Self::ContentUpdated => write!(f, "content-updated"),
        }
    }
}

/// Who proposed the change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChangeOrigin {
    /// Recorded as docsmith wrote the file.
    Automatic,
    /// Proposed by a person, not yet on disk.
    Manual,
}

impl fmt::Display for ChangeOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Automatic => write!(f, "automatic"),
            Self::Manual => write!(f, "manual"),
        }
    }
}

/// Position in the apply/revert state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChangeStatus {
    /// Proposed, not on disk.
    Pending,
    /// On disk.
    Applied,
    /// Undone.
    Reverted,
}

impl ChangeStatus {
    /// Capitalized label for activity listings.
    pub fn label(&self) -> &'static str {
        match self {
            ChangeStatus::Pending => "Pending",
            ChangeStatus::Applied => "Applied",
            ChangeStatus::Reverted => "Reverted",
        }
    }
}

impl fmt::Display for ChangeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Applied => write!(f, "applied"),
            Self::Reverted => write!(f, "reverted"),
        }
    }
}

impl FromStr for ChangeStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "applied" => Ok(Self::Applied),
            "reverted" => Ok(Self::Reverted),
            other => Err(format!(
                "unknown status `{}` (expected pending, applied, or reverted)",
                other
            )),
        }
    }
}

// ============================================================================
// ChangeMetadata
// ============================================================================

/// Free-form context attached to a change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeMetadata {
    /// Who or what produced the content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated_by: Option<String>,

    /// Why the change was made.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// Kind of document (`readme`, `api`, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<String>,

    /// Anything else the caller wants to keep.
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub extra: serde_json::Value,
}

impl ChangeMetadata {
    /// Set the generator.
    pub fn with_generated_by(mut self, generated_by: impl Into<String>) -> Self {
        self.generated_by = Some(generated_by.into());
        self
    }

    /// Set the reason.
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Set the document kind.
    pub fn with_doc_type(mut self, doc_type: impl Into<String>) -> Self {
        self.doc_type = Some(doc_type.into());
        self
    }
}

// ============================================================================
// ChangeRecord
// ============================================================================

/// A reversible change to one documentation file.
///
/// `diff` is present exactly when both `original_content` and `new_content`
/// are; [`ChangeRecord::new`] maintains that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRecord {
    /// Unique identifier.
    pub id: ChangeId,

    /// What happened.
    #[serde(rename = "type")]
    pub change_type: ChangeType,

    /// Who proposed it.
    pub origin: ChangeOrigin,

    /// State machine position.
    pub status: ChangeStatus,

    /// Short title.
    pub title: String,

    /// Longer description.
    pub description: String,

    /// Target file path (workspace-relative when inside the workspace).
    pub file_path: String,

    /// When the record was created.
    pub timestamp: DateTime<Utc>,

    /// Content before the change.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_content: Option<String>,

    /// Content after the change.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_content: Option<String>,

    /// Positional diff of original against new content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff: Option<String>,

    /// Free-form context.
    #[serde(default)]
    pub metadata: ChangeMetadata,
}

impl ChangeRecord {
    /// Build a record with a fresh id and the current time, computing the diff
    /// when both contents are present.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        change_type: ChangeType,
        origin: ChangeOrigin,
        status: ChangeStatus,
        title: impl Into<String>,
        description: impl Into<String>,
        file_path: impl Into<String>,
        original_content: Option<String>,
        new_content: Option<String>,
    ) -> Self {
        let diff = match (&original_content, &new_content) {
            (Some(old), Some(new)) => Some(generate_diff(old, new)),
            _ => None,
        };
        Self {
            id: ChangeId::generate(),
            change_type,
            origin,
            status,
            title: title.into(),
            description: description.into(),
            file_path: file_path.into(),
            timestamp: Utc::now(),
            original_content,
            new_content,
            diff,
            metadata: ChangeMetadata::default(),
        }
    }

    /// Attach metadata.
    pub fn with_metadata(mut self, metadata: ChangeMetadata) -> Self {
        self.metadata = metadata;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diff_present_iff_both_contents() {
        let both = ChangeRecord::new(
            ChangeType::Modified,
            ChangeOrigin::Automatic,
            ChangeStatus::Applied,
            "t",
            "d",
            "a.md",
            Some("a".into()),
            Some("b".into()),
        );
        assert_eq!(both.diff.as_deref(), Some("- a\n+ b"));

        let only_new = ChangeRecord::new(
            ChangeType::Created,
            ChangeOrigin::Automatic,
            ChangeStatus::Applied,
            "t",
            "d",
            "a.md",
            None,
            Some("b".into()),
        );
        assert!(only_new.diff.is_none());
    }

    #[test]
    fn test_serialized_shape() {
        let record = ChangeRecord::new(
            ChangeType::ContentGenerated,
            ChangeOrigin::Automatic,
            ChangeStatus::Applied,
            "Generate API.md",
            "d",
            "docs/API.md",
            None,
            Some("# API".into()),
        )
        .with_metadata(ChangeMetadata::default().with_doc_type("api"));

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], "content-generated");
        assert_eq!(json["origin"], "automatic");
        assert_eq!(json["status"], "applied");
        assert_eq!(json["filePath"], "docs/API.md");
        assert_eq!(json["newContent"], "# API");
        assert_eq!(json["metadata"]["docType"], "api");
        assert!(json.get("diff").is_none());
        assert!(json.get("originalContent").is_none());

        let back: ChangeRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_ids_are_unique() {
        assert_ne!(ChangeId::generate(), ChangeId::generate());
        assert_eq!(ChangeId::new("0123456789").short(), "01234567");
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!("Applied".parse::<ChangeStatus>(), Ok(ChangeStatus::Applied));
        assert!("done".parse::<ChangeStatus>().is_err());
    }
}
