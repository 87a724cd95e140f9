//! Change tracking engine.
//!
//! Records documentation file events as [`ChangeRecord`]s and drives the
//! apply/revert state machine:
//!
//! ```text
//! pending ──apply──▶ applied ──revert──▶ reverted
//!                       ▲                   │
//!                       └──────apply────────┘
//! ```
//!
//! Automatic events (creation, modification, generation) start `applied`
//! because the file is already on disk; manual proposals start `pending`.
//! Invalid transitions are reported as an unsuccessful [`ChangeOutcome`] and
//! never touch the filesystem.

use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::changes::record::{
    ChangeId, ChangeMetadata, ChangeOrigin, ChangeRecord, ChangeStatus, ChangeType,
};
use crate::changes::store::{ChangeRecordStore, StateStore};
use crate::diff::generate_diff;
use crate::errors::DocsmithError;

// ============================================================================
// Result types
// ============================================================================

/// Result of an apply or revert request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeOutcome {
    /// Whether the transition happened.
    pub success: bool,
    /// What happened, naming the record or file.
    pub message: String,
}

impl ChangeOutcome {
    fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Record counts by status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeStats {
    /// All records.
    pub total: usize,
    /// Records on disk.
    pub applied: usize,
    /// Proposals not yet applied.
    pub pending: usize,
    /// Undone records.
    pub reverted: usize,
}

/// Display projection of a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    /// Record id.
    pub id: ChangeId,
    /// Record title.
    pub title: String,
    /// Record description.
    pub description: String,
    /// Target file.
    pub file_path: String,
    /// Change type.
    #[serde(rename = "type")]
    pub change_type: ChangeType,
    /// `Created`, `Generated`, ...
    pub type_label: String,
    /// Status.
    pub status: ChangeStatus,
    /// `Pending`, `Applied`, `Reverted`.
    pub status_label: String,
    /// Who proposed it.
    pub origin: ChangeOrigin,
    /// Absolute time.
    pub timestamp: DateTime<Utc>,
    /// `just now`, `5 mins ago`, `3h ago`, `2d ago`, or a date.
    pub relative_time: String,
}

/// Human-friendly age of `timestamp` relative to `now`.
pub fn relative_time(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let duration = now.signed_duration_since(timestamp);

    if duration.num_seconds() < 0 {
        return timestamp.format("%Y-%m-%d").to_string();
    }

    if duration.num_minutes() < 1 {
        "just now".to_string()
    } else if duration.num_hours() < 1 {
        match duration.num_minutes() {
            1 => "1 min ago".to_string(),
            m => format!("{} mins ago", m),
        }
    } else if duration.num_hours() < 24 {
        format!("{}h ago", duration.num_hours())
    } else if duration.num_days() < 7 {
        format!("{}d ago", duration.num_days())
    } else {
        timestamp.format("%Y-%m-%d").to_string()
    }
}

// ============================================================================
// ChangeTracker
// ============================================================================

/// Inputs for a manually proposed change.
#[derive(Debug, Clone, Default)]
pub struct ManualAction {
    /// Target file.
    pub file_path: String,
    /// Short title.
    pub title: String,
    /// Longer description.
    pub description: String,
    /// Current content, when the file exists.
    pub original_content: Option<String>,
    /// Proposed content, unless the proposal is a deletion.
    pub new_content: Option<String>,
    /// Free-form context.
    pub metadata: ChangeMetadata,
}

/// Records changes and applies or reverts them against the workspace.
#[derive(Debug)]
pub struct ChangeTracker {
    root: Option<PathBuf>,
    store: ChangeRecordStore,
}

impl ChangeTracker {
    /// Create a tracker over `state`, resolving relative paths against `root`.
    pub fn new(root: Option<PathBuf>, state: Box<dyn StateStore>) -> Self {
        Self {
            root,
            store: ChangeRecordStore::load(state),
        }
    }

    /// The workspace root, if one is open.
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    // ------------------------------------------------------------------------
    // Tracking
    // ------------------------------------------------------------------------

    /// Record that a new file was written.
    pub fn track_file_creation(
        &mut self,
        file_path: &str,
        content: impl Into<String>,
        metadata: ChangeMetadata,
    ) -> Result<ChangeRecord, DocsmithError> {
        let file_path = self.normalize(file_path);
        let record = ChangeRecord::new(
            ChangeType::Created,
            ChangeOrigin::Automatic,
            ChangeStatus::Applied,
            format!("Created {}", display_name(&file_path)),
            format!("Created {}", file_path),
            file_path,
            None,
            Some(content.into()),
        )
        .with_metadata(metadata);
        self.commit(record)
    }

    /// Record that an existing file was edited.
    pub fn track_file_modification(
        &mut self,
        file_path: &str,
        original_content: impl Into<String>,
        new_content: impl Into<String>,
        metadata: ChangeMetadata,
    ) -> Result<ChangeRecord, DocsmithError> {
        let file_path = self.normalize(file_path);
        let record = ChangeRecord::new(
            ChangeType::Modified,
            ChangeOrigin::Automatic,
            ChangeStatus::Applied,
            format!("Modified {}", display_name(&file_path)),
            format!("Modified {}", file_path),
            file_path,
            Some(original_content.into()),
            Some(new_content.into()),
        )
        .with_metadata(metadata);
        self.commit(record)
    }

    /// Record that generated content was written.
    ///
    /// With `original_content` the record is `content-updated`, otherwise
    /// `content-generated`.
    pub fn track_content_generation(
        &mut self,
        file_path: &str,
        content: impl Into<String>,
        original_content: Option<String>,
        metadata: ChangeMetadata,
    ) -> Result<ChangeRecord, DocsmithError> {
        let file_path = self.normalize(file_path);
        let (change_type, verb) = if original_content.is_some() {
            (ChangeType::ContentUpdated, "Updated")
        } else {
            (ChangeType::ContentGenerated, "Generated")
        };
        let record = ChangeRecord::new(
            change_type,
            ChangeOrigin::Automatic,
            ChangeStatus::Applied,
            format!("{} {}", verb, display_name(&file_path)),
            format!("{} documentation in {}", verb, file_path),
            file_path,
            original_content,
            Some(content.into()),
        )
        .with_metadata(metadata);
        self.commit(record)
    }

    /// Record a manually proposed change, left `pending` until applied.
    ///
    /// # Errors
    ///
    /// Returns [`DocsmithError::InvalidArgument`] when neither content is given,
    /// and [`DocsmithError::InvalidPath`] when the target leaves the workspace.
    pub fn track_manual_action(
        &mut self,
        action: ManualAction,
    ) -> Result<ChangeRecord, DocsmithError> {
        let change_type = match (&action.original_content, &action.new_content) {
            (Some(_), Some(_)) => ChangeType::Modified,
            (None, Some(_)) => ChangeType::Created,
            (Some(_), None) => ChangeType::Deleted,
            (None, None) => {
                return Err(DocsmithError::InvalidArgument(format!(
                    "Manual change to `{}` needs original content, new content, or both",
                    action.file_path
                )))
            }
        };
        let file_path = self.normalize(&action.file_path);
        if self.root.is_some() {
            self.resolve(&file_path)?;
        }
        let title = if action.title.trim().is_empty() {
            format!("{} {}", change_type.label(), display_name(&file_path))
        } else {
            action.title
        };
        let record = ChangeRecord::new(
            change_type,
            ChangeOrigin::Manual,
            ChangeStatus::Pending,
            title,
            action.description,
            file_path,
            action.original_content,
            action.new_content,
        )
        .with_metadata(action.metadata);
        self.commit(record)
    }

    fn commit(&mut self, record: ChangeRecord) -> Result<ChangeRecord, DocsmithError> {
        tracing::debug!(
            "Tracking {} change {} for {}",
            record.change_type,
            record.id,
            record.file_path
        );
        self.store.prepend(record.clone())?;
        Ok(record)
    }

    // ------------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------------

    /// Materialize a pending or reverted change on disk.
    pub fn apply(&mut self, id: &ChangeId) -> ChangeOutcome {
        let Some(record) = self.store.get(id).cloned() else {
            return ChangeOutcome::failed(DocsmithError::RecordNotFound(id.to_string()).to_string());
        };

        if record.status == ChangeStatus::Applied {
            return ChangeOutcome::failed(format!(
                "Change `{}` ({}) is already applied.",
                record.title, id
            ));
        }

        let path = match self.resolve(&record.file_path) {
            Ok(p) => p,
            Err(e) => return ChangeOutcome::failed(e.to_string()),
        };

        let before = snapshot(&path);
        let result = if record.change_type == ChangeType::Deleted {
            remove_file_if_exists(&path)
        } else {
            match &record.new_content {
                Some(content) => write_file(&path, content),
                None => {
                    return ChangeOutcome::failed(format!(
                        "Change `{}` has no new content to apply to {}.",
                        id, record.file_path
                    ))
                }
            }
        };
        if let Err(e) = result {
            tracing::warn!("Apply of {} failed: {}", id, e);
            return ChangeOutcome::failed(e.to_string());
        }

        if let Err(e) = self.store.set_status(id, ChangeStatus::Applied) {
            restore(&path, before);
            return ChangeOutcome::failed(e.to_string());
        }
        ChangeOutcome::ok(format!("Applied `{}` to {}.", record.title, record.file_path))
    }

    /// Undo an applied change.
    pub fn revert(&mut self, id: &ChangeId) -> ChangeOutcome {
        let Some(record) = self.store.get(id).cloned() else {
            return ChangeOutcome::failed(DocsmithError::RecordNotFound(id.to_string()).to_string());
        };

        if record.status != ChangeStatus::Applied {
            return ChangeOutcome::failed(format!(
                "Change `{}` ({}) is {}; only applied changes can be reverted.",
                record.title, id, record.status
            ));
        }

        let path = match self.resolve(&record.file_path) {
            Ok(p) => p,
            Err(e) => return ChangeOutcome::failed(e.to_string()),
        };

        let before = snapshot(&path);
        let result = if record.change_type.is_creation() {
            remove_file_if_exists(&path)
        } else {
            match &record.original_content {
                Some(content) => write_file(&path, content),
                None => {
                    return ChangeOutcome::failed(format!(
                        "Change `{}` has no original content to restore {}.",
                        id, record.file_path
                    ))
                }
            }
        };
        if let Err(e) = result {
            tracing::warn!("Revert of {} failed: {}", id, e);
            return ChangeOutcome::failed(e.to_string());
        }

        if let Err(e) = self.store.set_status(id, ChangeStatus::Reverted) {
            restore(&path, before);
            return ChangeOutcome::failed(e.to_string());
        }
        ChangeOutcome::ok(format!("Reverted `{}` in {}.", record.title, record.file_path))
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    /// All records, newest first.
    pub fn changes(&self) -> &[ChangeRecord] {
        self.store.records()
    }

    /// Fetch one record.
    pub fn change(&self, id: &ChangeId) -> Option<&ChangeRecord> {
        self.store.get(id)
    }

    /// Records in the given status, newest first.
    pub fn changes_with_status(&self, status: ChangeStatus) -> Vec<&ChangeRecord> {
        self.store
            .records()
            .iter()
            .filter(|r| r.status == status)
            .collect()
    }

    /// Counts by status.
    pub fn stats(&self) -> ChangeStats {
        self.store
            .records()
            .iter()
            .fold(ChangeStats::default(), |mut stats, r| {
                stats.total += 1;
                match r.status {
                    ChangeStatus::Applied => stats.applied += 1,
                    ChangeStatus::Pending => stats.pending += 1,
                    ChangeStatus::Reverted => stats.reverted += 1,
                }
                stats
            })
    }

    /// Display projection of every record, newest first.
    pub fn activities(&self) -> Vec<ActivityEntry> {
        let now = Utc::now();
        self.store
            .records()
            .iter()
            .map(|r| ActivityEntry {
                id: r.id.clone(),
                title: r.title.clone(),
                description: r.description.clone(),
                file_path: r.file_path.clone(),
                change_type: r.change_type,
                type_label: r.change_type.label().to_string(),
                status: r.status,
                status_label: r.status.label().to_string(),
                origin: r.origin,
                timestamp: r.timestamp,
                relative_time: relative_time(r.timestamp, now),
            })
            .collect()
    }

    /// Render a record's diff as a Markdown document.
    ///
    /// Records without both contents diff against the empty text, so a
    /// creation renders as all additions and a deletion as all removals.
    pub fn view_diff(&self, id: &ChangeId) -> Result<String, DocsmithError> {
        let record = self
            .store
            .get(id)
            .ok_or_else(|| DocsmithError::RecordNotFound(id.to_string()))?;

        let diff = match (&record.diff, &record.original_content, &record.new_content) {
            (Some(diff), _, _) => diff.clone(),
            (None, None, Some(new)) => generate_diff("", new),
            (None, Some(old), None) => generate_diff(old, ""),
            (None, Some(old), Some(new)) => generate_diff(old, new),
            (None, None, None) => String::new(),
        };

        let mut doc = String::new();
        doc.push_str(&format!("# {}\n\n", record.title));
        doc.push_str(&format!("- **File:** `{}`\n", record.file_path));
        doc.push_str(&format!("- **Type:** {}\n", record.change_type));
        doc.push_str(&format!("- **Status:** {}\n", record.status));
        doc.push_str(&format!("- **Origin:** {}\n", record.origin));
        doc.push_str(&format!("- **Recorded:** {}\n", record.timestamp.to_rfc3339()));
        doc.push_str(&format!("- **Id:** `{}`\n", record.id));
        if !record.description.is_empty() {
            doc.push_str(&format!("\n{}\n", record.description));
        }
        doc.push_str("\n```diff\n");
        if diff.is_empty() {
            doc.push_str("(no content recorded)\n");
        } else {
            doc.push_str(&diff);
            doc.push('\n');
        }
        doc.push_str("```\n");
        Ok(doc)
    }

    /// Remove every record.
    pub fn clear(&mut self) -> Result<(), DocsmithError> {
        self.store.clear()
    }

    /// Resolve a user-supplied reference to a record id.
    ///
    /// Accepts a full id, a unique prefix of at least six characters, or
    /// `latest` / `@` for the newest record.
    pub fn resolve_id(&self, reference: &str) -> Result<ChangeId, DocsmithError> {
        let reference = reference.trim();
        let records = self.store.records();

        if reference.eq_ignore_ascii_case("latest") || reference == "@" {
            return records
                .first()
                .map(|r| r.id.clone())
                .ok_or_else(|| DocsmithError::RecordNotFound(reference.to_string()));
        }

        if let Some(r) = records.iter().find(|r| r.id.as_str() == reference) {
            return Ok(r.id.clone());
        }

        if reference.len() >= 6 {
            let matches: Vec<_> = records
                .iter()
                .filter(|r| r.id.as_str().starts_with(reference))
                .collect();
            match matches.len() {
                0 => {}
                1 => return Ok(matches[0].id.clone()),
                n => {
                    return Err(DocsmithError::InvalidArgument(format!(
                        "Ambiguous change prefix `{}`: matches {} records",
                        reference, n
                    )))
                }
            }
        }

        Err(DocsmithError::RecordNotFound(reference.to_string()))
    }

    // ------------------------------------------------------------------------
    // Paths
    // ------------------------------------------------------------------------

    /// Store paths inside the workspace relative to its root.
    fn normalize(&self, file_path: &str) -> String {
        let path = Path::new(file_path);
        match &self.root {
            Some(root) if path.is_absolute() => path
                .strip_prefix(root)
                .map(|p| p.to_string_lossy().replace('\\', "/"))
                .unwrap_or_else(|_| file_path.to_string()),
            _ => file_path.replace('\\', "/"),
        }
    }

    /// Join a record path onto the root; anything that leaves the root is
    /// rejected with [`DocsmithError::InvalidPath`].
    fn resolve(&self, file_path: &str) -> Result<PathBuf, DocsmithError> {
        let root = self.root.as_ref().ok_or(DocsmithError::NoWorkspace)?;
        let outside = || {
            DocsmithError::InvalidPath(format!(
                "`{}` is outside the workspace {}",
                file_path,
                root.display()
            ))
        };

        let path = Path::new(file_path);
        let relative = if path.is_absolute() {
            path.strip_prefix(root).map_err(|_| outside())?
        } else {
            path
        };

        let mut resolved = root.clone();
        for component in relative.components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::CurDir => {}
                Component::ParentDir => {
                    if !resolved.pop() || !resolved.starts_with(root) {
                        return Err(outside());
                    }
                }
                Component::RootDir | Component::Prefix(_) => return Err(outside()),
            }
        }
        if &resolved == root {
            return Err(outside());
        }
        Ok(resolved)
    }
}

fn display_name(file_path: &str) -> &str {
    file_path.rsplit('/').next().unwrap_or(file_path)
}

fn write_file(path: &Path, content: &str) -> Result<(), DocsmithError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| DocsmithError::file_system(parent, e))?;
    }
    fs::write(path, content).map_err(|e| DocsmithError::file_system(path, e))
}

/// Current content of `path`, `None` when absent or unreadable.
fn snapshot(path: &Path) -> Option<String> {
    fs::read_to_string(path).ok()
}

/// Put `path` back the way [`snapshot`] saw it after the new status could
/// not be persisted.
fn restore(path: &Path, before: Option<String>) {
    let result = match before {
        Some(content) => write_file(path, &content),
        None => remove_file_if_exists(path),
    };
    if let Err(e) = result {
        tracing::warn!("Could not restore {}: {}", path.display(), e);
    }
}

fn remove_file_if_exists(path: &Path) -> Result<(), DocsmithError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!("{} already absent", path.display());
            Ok(())
        }
        Err(e) => Err(DocsmithError::file_system(path, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::changes::store::MemoryStateStore;
    use chrono::Duration;
    use tempfile::TempDir;

    fn tracker(root: &Path) -> ChangeTracker {
        ChangeTracker::new(Some(root.to_path_buf()), Box::new(MemoryStateStore::new()))
    }

    #[test]
    fn test_creation_defaults_to_applied() {
        let temp = TempDir::new().unwrap();
        let mut t = tracker(temp.path());
        t.track_file_creation("docs/API.md", "# API\n...", ChangeMetadata::default())
            .unwrap();

        assert_eq!(
            t.stats(),
            ChangeStats {
                total: 1,
                applied: 1,
                pending: 0,
                reverted: 0
            }
        );
    }

    #[test]
    fn test_records_are_newest_first() {
        let temp = TempDir::new().unwrap();
        let mut t = tracker(temp.path());
        let a = t.track_file_creation("a.md", "a", ChangeMetadata::default()).unwrap();
        let b = t.track_file_creation("b.md", "b", ChangeMetadata::default()).unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(t.changes()[0].id, b.id);
        assert_eq!(t.changes()[1].id, a.id);
    }

    #[test]
    fn test_absolute_paths_inside_root_become_relative() {
        let temp = TempDir::new().unwrap();
        let mut t = tracker(temp.path());
        let abs = temp.path().join("docs").join("SETUP.md");
        let record = t
            .track_file_creation(&abs.to_string_lossy(), "x", ChangeMetadata::default())
            .unwrap();
        assert_eq!(record.file_path, "docs/SETUP.md");
    }

    #[test]
    fn test_apply_then_revert_restores_original() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("README.md");
        fs::write(&target, "original").unwrap();

        let mut t = tracker(temp.path());
        let record = t
            .track_manual_action(ManualAction {
                file_path: "README.md".into(),
                title: "Rewrite README".into(),
                original_content: Some("original".into()),
                new_content: Some("rewritten".into()),
                ..ManualAction::default()
            })
            .unwrap();
        assert_eq!(record.change_type, ChangeType::Modified);
        assert_eq!(record.status, ChangeStatus::Pending);

        let applied = t.apply(&record.id);
        assert!(applied.success, "{}", applied.message);
        assert_eq!(fs::read_to_string(&target).unwrap(), "rewritten");

        let reverted = t.revert(&record.id);
        assert!(reverted.success, "{}", reverted.message);
        assert_eq!(fs::read_to_string(&target).unwrap(), "original");
        assert_eq!(t.change(&record.id).unwrap().status, ChangeStatus::Reverted);

        // Reverted changes can be applied again.
        assert!(t.apply(&record.id).success);
        assert_eq!(fs::read_to_string(&target).unwrap(), "rewritten");
    }

    #[test]
    fn test_tracked_modification_round_trip() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("notes.md");
        fs::write(&target, "N").unwrap();

        let mut t = tracker(temp.path());
        let record = t
            .track_file_modification("notes.md", "O", "N", ChangeMetadata::default())
            .unwrap();
        assert!(record.diff.is_some());

        assert!(!t.apply(&record.id).success);
        assert!(t.revert(&record.id).success);
        assert_eq!(fs::read_to_string(&target).unwrap(), "O");
        assert_eq!(t.change(&record.id).unwrap().status, ChangeStatus::Reverted);
    }

    #[test]
    fn test_apply_twice_writes_once() {
        let temp = TempDir::new().unwrap();
        let mut t = tracker(temp.path());
        let record = t
            .track_manual_action(ManualAction {
                file_path: "docs/SETUP.md".into(),
                new_content: Some("# Setup".into()),
                ..ManualAction::default()
            })
            .unwrap();
        assert_eq!(record.title, "Created SETUP.md");

        assert!(t.apply(&record.id).success);
        let target = temp.path().join("docs/SETUP.md");
        fs::write(&target, "edited by hand").unwrap();

        let second = t.apply(&record.id);
        assert!(!second.success);
        assert!(second.message.contains("already applied"));
        assert_eq!(fs::read_to_string(&target).unwrap(), "edited by hand");
    }

    #[test]
    fn test_revert_is_noop_unless_applied() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("a.md");
        fs::write(&target, "keep").unwrap();

        let mut t = tracker(temp.path());
        let pending = t
            .track_manual_action(ManualAction {
                file_path: "a.md".into(),
                original_content: Some("keep".into()),
                new_content: Some("new".into()),
                ..ManualAction::default()
            })
            .unwrap();

        let outcome = t.revert(&pending.id);
        assert!(!outcome.success);
        assert_eq!(fs::read_to_string(&target).unwrap(), "keep");
        assert_eq!(t.change(&pending.id).unwrap().status, ChangeStatus::Pending);
    }

    #[test]
    fn test_revert_creation_tolerates_missing_file() {
        let temp = TempDir::new().unwrap();
        let mut t = tracker(temp.path());
        let record = t
            .track_content_generation("docs/API.md", "# API", None, ChangeMetadata::default())
            .unwrap();
        assert_eq!(record.change_type, ChangeType::ContentGenerated);

        let outcome = t.revert(&record.id);
        assert!(outcome.success, "{}", outcome.message);
    }

    #[test]
    fn test_manual_deletion_apply_and_revert() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("OLD.md");
        fs::write(&target, "old").unwrap();

        let mut t = tracker(temp.path());
        let record = t
            .track_manual_action(ManualAction {
                file_path: "OLD.md".into(),
                original_content: Some("old".into()),
                ..ManualAction::default()
            })
            .unwrap();
        assert_eq!(record.change_type, ChangeType::Deleted);

        assert!(t.apply(&record.id).success);
        assert!(!target.exists());
        assert!(t.revert(&record.id).success);
        assert_eq!(fs::read_to_string(&target).unwrap(), "old");
    }

    #[test]
    fn test_manual_action_without_content_is_rejected() {
        let temp = TempDir::new().unwrap();
        let mut t = tracker(temp.path());
        let result = t.track_manual_action(ManualAction {
            file_path: "x.md".into(),
            ..ManualAction::default()
        });
        assert!(matches!(result, Err(DocsmithError::InvalidArgument(_))));
        assert_eq!(t.stats().total, 0);
    }

    #[test]
    fn test_unknown_id_and_missing_root() {
        let temp = TempDir::new().unwrap();
        let mut t = tracker(temp.path());
        let outcome = t.apply(&ChangeId::new("missing"));
        assert!(!outcome.success);
        assert!(outcome.message.contains("missing"));

        let mut rootless = ChangeTracker::new(None, Box::new(MemoryStateStore::new()));
        let record = rootless
            .track_manual_action(ManualAction {
                file_path: "docs/A.md".into(),
                new_content: Some("a".into()),
                ..ManualAction::default()
            })
            .unwrap();
        let outcome = rootless.apply(&record.id);
        assert!(!outcome.success);
        assert!(outcome.message.contains("No workspace"));
        // Still usable afterwards.
        assert_eq!(rootless.stats().pending, 1);
    }

    #[test]
    fn test_view_diff_for_creation_is_all_added() {
        let temp = TempDir::new().unwrap();
        let mut t = tracker(temp.path());
        let record = t
            .track_file_creation("docs/API.md", "# API\nline", ChangeMetadata::default())
            .unwrap();

        let doc = t.view_diff(&record.id).unwrap();
        assert!(doc.starts_with("# Created API.md"));
        assert!(doc.contains("```diff\n+ # API\n+ line\n```"));
        assert!(matches!(
            t.view_diff(&ChangeId::new("nope")),
            Err(DocsmithError::RecordNotFound(_))
        ));
    }

    #[test]
    fn test_activities_and_clear() {
        let temp = TempDir::new().unwrap();
        let mut t = tracker(temp.path());
        t.track_content_generation(
            "README.md",
            "new",
            Some("old".into()),
            ChangeMetadata::default(),
        )
        .unwrap();

        let activities = t.activities();
        assert_eq!(activities.len(), 1);
        assert_eq!(activities[0].type_label, "Updated");
        assert_eq!(activities[0].status_label, "Applied");
        assert_eq!(activities[0].relative_time, "just now");

        t.clear().unwrap();
        assert!(t.activities().is_empty());
        assert_eq!(t.stats(), ChangeStats::default());
    }

    #[test]
    fn test_changes_with_status() {
        let temp = TempDir::new().unwrap();
        let mut t = tracker(temp.path());
        t.track_file_creation("a.md", "a", ChangeMetadata::default()).unwrap();
        t.track_manual_action(ManualAction {
            file_path: "b.md".into(),
            new_content: Some("b".into()),
            ..ManualAction::default()
        })
        .unwrap();

        assert_eq!(t.changes_with_status(ChangeStatus::Applied).len(), 1);
        assert_eq!(t.changes_with_status(ChangeStatus::Pending).len(), 1);
        assert!(t.changes_with_status(ChangeStatus::Reverted).is_empty());
    }

    #[test]
    fn test_resolve_id() {
        let temp = TempDir::new().unwrap();
        let mut t = tracker(temp.path());
        assert!(matches!(
            t.resolve_id("latest"),
            Err(DocsmithError::RecordNotFound(_))
        ));

        let first = t.track_file_creation("a.md", "a", ChangeMetadata::default()).unwrap();
        let second = t.track_file_creation("b.md", "b", ChangeMetadata::default()).unwrap();

        assert_eq!(t.resolve_id("latest").unwrap(), second.id);
        assert_eq!(t.resolve_id(first.id.as_str()).unwrap(), first.id);
        assert_eq!(t.resolve_id(&first.id.as_str()[..8]).unwrap(), first.id);
        assert!(t.resolve_id("abc").is_err());
    }

    #[test]
    fn test_relative_time() {
        let now = Utc::now();
        assert_eq!(relative_time(now - Duration::seconds(10), now), "just now");
        assert_eq!(relative_time(now - Duration::minutes(1), now), "1 min ago");
        assert_eq!(relative_time(now - Duration::minutes(5), now), "5 mins ago");
        assert_eq!(relative_time(now - Duration::hours(3), now), "3h ago");
        assert_eq!(relative_time(now - Duration::days(2), now), "2d ago");
        let old = now - Duration::days(30);
        assert_eq!(relative_time(old, now), old.format("%Y-%m-%d").to_string());
    }
    #[test]
    fn test_paths_outside_workspace_are_refused() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("project");
        fs::create_dir_all(&root).unwrap();
        let mut t = tracker(&root);

        for escaping in ["../escaped.md", "docs/../../escaped.md"] {
            let result = t.track_manual_action(ManualAction {
                file_path: escaping.into(),
                new_content: Some("x".into()),
                ..ManualAction::default()
            });
            assert!(matches!(result, Err(DocsmithError::InvalidPath(_))), "{}", escaping);
        }
        let outside_abs = temp.path().join("elsewhere.md");
        assert!(matches!(
            t.track_manual_action(ManualAction {
                file_path: outside_abs.to_string_lossy().into_owned(),
                new_content: Some("x".into()),
                ..ManualAction::default()
            }),
            Err(DocsmithError::InvalidPath(_))
        ));

        // A stored record with an escaping path never touches the filesystem.
        fs::write(temp.path().join("escaped.md"), "keep").unwrap();
        let record = t
            .track_file_modification("../escaped.md", "keep", "changed", ChangeMetadata::default())
            .unwrap();
        let outcome = t.revert(&record.id);
        assert!(!outcome.success);
        assert!(outcome.message.contains("outside the workspace"));
        assert_eq!(fs::read_to_string(temp.path().join("escaped.md")).unwrap(), "keep");
        assert_eq!(t.change(&record.id).unwrap().status, ChangeStatus::Applied);

        // Dot segments that stay inside are fine.
        let inside = t
            .track_manual_action(ManualAction {
                file_path: "docs/./guides/../FAQ.md".into(),
                new_content: Some("faq".into()),
                ..ManualAction::default()
            })
            .unwrap();
        assert!(t.apply(&inside.id).success);
        assert_eq!(fs::read_to_string(root.join("docs/FAQ.md")).unwrap(), "faq");
    }

    /// Accepts writes until `fail` is set.
    struct SwitchableStore {
        inner: MemoryStateStore,
        fail: std::sync::Arc<std::sync::atomic::AtomicBool>,
    }

    impl StateStore for SwitchableStore {
        fn get(&self, key: &str) -> Result<Option<serde_json::Value>, DocsmithError> {
            self.inner.get(key)
        }
        fn set(&mut self, key: &str, value: serde_json::Value) -> Result<(), DocsmithError> {
            if self.fail.load(std::sync::atomic::Ordering::SeqCst) {
                return Err(DocsmithError::Persistence("disk full".into()));
            }
            self.inner.set(key, value)
        }
    }

    #[test]
    fn test_unsaved_status_change_is_undone() {
        use std::sync::atomic::{AtomicBool, Ordering};
        use std::sync::Arc;

        let temp = TempDir::new().unwrap();
        let fail = Arc::new(AtomicBool::new(false));
        let mut t = ChangeTracker::new(
            Some(temp.path().to_path_buf()),
            Box::new(SwitchableStore {
                inner: MemoryStateStore::new(),
                fail: fail.clone(),
            }),
        );
        let applied = t
            .track_manual_action(ManualAction {
                file_path: "a.md".into(),
                new_content: Some("a".into()),
                ..ManualAction::default()
            })
            .unwrap();
        let pending = t
            .track_manual_action(ManualAction {
                file_path: "b.md".into(),
                new_content: Some("b".into()),
                ..ManualAction::default()
            })
            .unwrap();
        assert!(t.apply(&applied.id).success);

        fail.store(true, Ordering::SeqCst);

        let outcome = t.revert(&applied.id);
        assert!(!outcome.success);
        assert!(outcome.message.contains("disk full"));
        assert_eq!(fs::read_to_string(temp.path().join("a.md")).unwrap(), "a");
        assert_eq!(t.change(&applied.id).unwrap().status, ChangeStatus::Applied);

        let outcome = t.apply(&pending.id);
        assert!(!outcome.success);
        assert!(!temp.path().join("b.md").exists());
        assert_eq!(t.change(&pending.id).unwrap().status, ChangeStatus::Pending);
    }
}
