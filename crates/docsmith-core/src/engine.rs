//! docsmith engine – the session context for all operations.
//!
//! A [`DocsmithEngine`] owns the resolved configuration, the open workspace
//! (if any), the change tracker, and the documentation generator. Callers
//! construct one per session and pass it around; there is no global state.

use std::fmt;
use std::path::Path;

use crate::analysis::{self, WorkspaceAnalysis};
use crate::changes::{
    ActivityEntry, ChangeId, ChangeMetadata, ChangeOutcome, ChangeRecord, ChangeStats,
    ChangeStatus, ChangeTracker, FileStateStore, ManualAction, MemoryStateStore, StateStore,
};
use crate::config::{GlobalConfig, ProjectConfig, ResolvedConfig};
use crate::errors::DocsmithError;
use crate::generate::{
    self, DocumentationGenerator, GenerationControl, GenerationOptions, GenerationProgress,
    GenerationReport, TemplateGenerator,
};
use crate::protocol::{Request, Response};
use crate::workspace::Workspace;

// ============================================================================
// DocsmithEngine
// ============================================================================

/// The main engine for docsmith operations.
///
/// # Construction
///
/// Use [`DocsmithEngine::open`] for typical usage, or
/// [`DocsmithEngine::with_store`] to supply the state store directly (tests,
/// embedding in another host).
///
/// # Example
///
/// ```ignore
/// use docsmith_core::{DocsmithEngine, GlobalConfig};
/// use std::path::Path;
///
/// let mut engine = DocsmithEngine::open(Some(Path::new(".")), GlobalConfig::load_default()?)?;
/// let analysis = engine.analyze_workspace()?;
/// println!("coverage: {}%", analysis.structure.coverage);
/// ```
pub struct DocsmithEngine {
    config: ResolvedConfig,
    workspace: Option<Workspace>,
    tracker: ChangeTracker,
    generator: Box<dyn DocumentationGenerator>,
}

impl fmt::Debug for DocsmithEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocsmithEngine")
            .field("config", &self.config)
            .field("workspace", &self.workspace)
            .field("tracker", &self.tracker)
            .field("generator", &self.generator.name())
            .finish()
    }
}

impl DocsmithEngine {
    // -------------------------------------------------------------------------
    // Construction
    // -------------------------------------------------------------------------

    /// Open a session rooted at `dir`, or a workspace-less session when `None`.
    ///
    /// The workspace is resolved by walking up from `dir`. Project config at
    /// `<root>/.docsmith/config.yaml` is merged over `global`, and change
    /// records persist under `<root>/.docsmith/state/`. Without a workspace,
    /// records live in memory for the session.
    ///
    /// # Errors
    ///
    /// Returns an error if `dir` does not resolve to a workspace or a config
    /// file cannot be parsed or fails validation.
    pub fn open(dir: Option<&Path>, global: GlobalConfig) -> Result<Self, DocsmithError> {
        let Some(dir) = dir else {
            let config = global.resolve(&ProjectConfig::default());
            for warning in config.validate()? {
                tracing::warn!("Config warning: {}", warning);
            }
            return Ok(Self::with_store(
                None,
                config,
                Box::new(MemoryStateStore::new()),
            ));
        };

        let workspace = Workspace::resolve(dir)?;
        let project = ProjectConfig::load_from_workspace(workspace.root())?;
        let config = global.resolve(&project);
        for warning in config.validate()? {
            tracing::warn!("Config warning: {}", warning);
        }
        tracing::debug!("Opened workspace {}", workspace.root().display());

        let state = FileStateStore::new(workspace.state_dir());
        Ok(Self::with_store(Some(workspace), config, Box::new(state)))
    }

    /// Build an engine over an explicit state store.
    pub fn with_store(
        workspace: Option<Workspace>,
        config: ResolvedConfig,
        state: Box<dyn StateStore>,
    ) -> Self {
        let root = workspace.as_ref().map(|w| w.root().to_path_buf());
        let generator = TemplateGenerator::new(config.generation.author.clone());
        Self {
            tracker: ChangeTracker::new(root, state),
            generator: Box::new(generator),
            config,
            workspace,
        }
    }

    /// Replace the documentation generator.
    pub fn with_generator(mut self, generator: Box<dyn DocumentationGenerator>) -> Self {
        self.generator = generator;
        self
    }

    /// The effective configuration.
    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    /// The open workspace, if any.
    pub fn workspace(&self) -> Option<&Workspace> {
        self.workspace.as_ref()
    }

    fn require_workspace(&self) -> Result<&Workspace, DocsmithError> {
        self.workspace.as_ref().ok_or(DocsmithError::NoWorkspace)
    }

    // -------------------------------------------------------------------------
    // Analysis
    // -------------------------------------------------------------------------

    /// Scan the workspace.
    ///
    /// # Errors
    ///
    /// Returns [`DocsmithError::NoWorkspace`] when no workspace is open.
    pub fn analyze_workspace(&self) -> Result<WorkspaceAnalysis, DocsmithError> {
        let workspace = self.require_workspace()?;
        analysis::analyze_workspace(workspace, &self.config.analysis)
    }

    /// Analyze, then generate every missing document (and outdated ones
    /// when `options.include_outdated`).
    pub fn generate_missing_docs(
        &mut self,
        options: GenerationOptions,
        control: &GenerationControl,
        progress: &mut dyn FnMut(GenerationProgress<'_>),
    ) -> Result<GenerationReport, DocsmithError> {
        let analysis = self.analyze_workspace()?;
        let report = generate::generate_missing_docs(
            &analysis,
            self.config.analysis.effective_docs_dir(),
            &mut self.tracker,
            self.generator.as_ref(),
            control,
            options,
            progress,
        );
        tracing::debug!(
            "Generation finished: {} written, {} failed, cancelled={}",
            report.written.len(),
            report.failed.len(),
            report.cancelled
        );
        Ok(report)
    }

    // -------------------------------------------------------------------------
    // Change tracking
    // -------------------------------------------------------------------------

    /// Record a new file as a pending change.
    pub fn track_file_creation(
        &mut self,
        file_path: &str,
        content: impl Into<String>,
        metadata: ChangeMetadata,
    ) -> Result<ChangeRecord, DocsmithError> {
        self.tracker.track_file_creation(file_path, content, metadata)
    }

    /// Record an edit to an existing file as a pending change.
    pub fn track_file_modification(
        &mut self,
        file_path: &str,
        original_content: impl Into<String>,
        new_content: impl Into<String>,
        metadata: ChangeMetadata,
    ) -> Result<ChangeRecord, DocsmithError> {
        self.tracker
            .track_file_modification(file_path, original_content, new_content, metadata)
    }

    /// Record generated content. A creation when `original_content` is `None`.
    pub fn track_content_generation(
        &mut self,
        file_path: &str,
        content: impl Into<String>,
        original_content: Option<String>,
        metadata: ChangeMetadata,
    ) -> Result<ChangeRecord, DocsmithError> {
        self.tracker
            .track_content_generation(file_path, content, original_content, metadata)
    }

    /// Record a user-authored change described by `action`.
    pub fn track_manual_action(
        &mut self,
        action: ManualAction,
    ) -> Result<ChangeRecord, DocsmithError> {
        self.tracker.track_manual_action(action)
    }

    /// Apply a pending or reverted change.
    pub fn apply_change(&mut self, id: &ChangeId) -> ChangeOutcome {
        self.tracker.apply(id)
    }

    /// Revert an applied change.
    pub fn revert_change(&mut self, id: &ChangeId) -> ChangeOutcome {
        self.tracker.revert(id)
    }

    /// Markdown rendering of a record's diff.
    pub fn view_diff(&self, id: &ChangeId) -> Result<String, DocsmithError> {
        self.tracker.view_diff(id)
    }

    /// Activity feed, newest first.
    pub fn activities(&self) -> Vec<ActivityEntry> {
        self.tracker.activities()
    }

    /// Look up a record by id.
    pub fn change(&self, id: &ChangeId) -> Option<&ChangeRecord> {
        self.tracker.change(id)
    }

    /// Every record, newest first.
    pub fn changes(&self) -> &[ChangeRecord] {
        self.tracker.changes()
    }

    /// Records currently in `status`.
    pub fn changes_with_status(&self, status: ChangeStatus) -> Vec<&ChangeRecord> {
        self.tracker.changes_with_status(status)
    }

    /// Record counts by status.
    pub fn change_stats(&self) -> ChangeStats {
        self.tracker.stats()
    }

    /// Resolve a full id, unique prefix, or `latest` to a record id.
    pub fn resolve_change_id(&self, reference: &str) -> Result<ChangeId, DocsmithError> {
        self.tracker.resolve_id(reference)
    }

    /// Drop every change record. Files on disk are left as they are.
    pub fn clear_all_changes(&mut self) -> Result<(), DocsmithError> {
        self.tracker.clear()
    }

    // -------------------------------------------------------------------------
    // Message boundary
    // -------------------------------------------------------------------------

    /// Execute one request. Failures become [`Response::Error`].
    pub fn handle(&mut self, request: Request) -> Response {
        match self.dispatch(request) {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!("Request failed: {}", e);
                Response::error(e)
            }
        }
    }

    fn dispatch(&mut self, request: Request) -> Result<Response, DocsmithError> {
        let response = match request {
            Request::AnalyzeWorkspace => Response::Analysis {
                analysis: Box::new(self.analyze_workspace()?),
            },
            Request::TrackFileCreation {
                file_path,
                content,
                metadata,
            } => Response::ChangeRecorded {
                record: self.track_file_creation(&file_path, content, metadata)?,
            },
            Request::TrackFileModification {
                file_path,
                original_content,
                new_content,
                metadata,
            } => Response::ChangeRecorded {
                record: self.track_file_modification(
                    &file_path,
                    original_content,
                    new_content,
                    metadata,
                )?,
            },
            Request::TrackContentGeneration {
                file_path,
                content,
                original_content,
                metadata,
            } => Response::ChangeRecorded {
                record: self.track_content_generation(
                    &file_path,
                    content,
                    original_content,
                    metadata,
                )?,
            },
            Request::TrackManualAction {
                file_path,
                title,
                description,
                original_content,
                new_content,
                metadata,
            } => Response::ChangeRecorded {
                record: self.track_manual_action(ManualAction {
                    file_path,
                    title,
                    description,
                    original_content,
                    new_content,
                    metadata,
                })?,
            },
            Request::ApplyChange { id } => Response::Outcome {
                outcome: self.apply_change(&id),
            },
            Request::RevertChange { id } => Response::Outcome {
                outcome: self.revert_change(&id),
            },
            Request::ViewDiff { id } => Response::Diff {
                markdown: self.view_diff(&id)?,
                id,
            },
            Request::GetChange { id } => Response::Change {
                record: self
                    .change(&id)
                    .cloned()
                    .ok_or_else(|| DocsmithError::RecordNotFound(id.to_string()))?,
            },
            Request::GetActivities { status } => Response::Activities {
                activities: self
                    .activities()
                    .into_iter()
                    .filter(|a| status.is_none_or(|s| a.status == s))
                    .collect(),
            },
            Request::GetChangeStats => Response::Stats {
                stats: self.change_stats(),
            },
            Request::ClearAllChanges => {
                self.clear_all_changes()?;
                Response::Cleared
            }
            Request::GenerateMissingDocs { include_outdated } => {
                let options = GenerationOptions {
                    include_outdated: include_outdated
                        .unwrap_or(self.config.generation.include_outdated),
                };
                Response::Generation {
                    report: self.generate_missing_docs(
                        options,
                        &GenerationControl::new(),
                        &mut |_| {},
                    )?,
                }
            }
        };
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::parse_request;
    use std::fs;
    use tempfile::TempDir;

    fn engine(temp: &TempDir) -> DocsmithEngine {
        let ws = Workspace::from_root(temp.path()).unwrap();
        DocsmithEngine::with_store(
            Some(ws),
            ResolvedConfig::default(),
            Box::new(MemoryStateStore::new()),
        )
    }

    #[test]
    fn test_analyze_without_workspace() {
        let engine = DocsmithEngine::open(None, GlobalConfig::default()).unwrap();
        assert!(matches!(
            engine.analyze_workspace(),
            Err(DocsmithError::NoWorkspace)
        ));
    }

    #[test]
    fn test_open_persists_records_in_workspace() {
        let temp = TempDir::new().unwrap();
        {
            let mut engine =
                DocsmithEngine::open(Some(temp.path()), GlobalConfig::default()).unwrap();
            engine
                .track_file_creation("docs/API.md", "# API", ChangeMetadata::default())
                .unwrap();
        }
        assert!(temp.path().join(".docsmith/state").is_dir());

        let engine = DocsmithEngine::open(Some(temp.path()), GlobalConfig::default()).unwrap();
        assert_eq!(engine.change_stats().total, 1);
        assert_eq!(engine.changes()[0].file_path, "docs/API.md");
    }

    #[test]
    fn test_open_applies_project_config() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join(".docsmith")).unwrap();
        fs::write(
            temp.path().join(".docsmith/config.yaml"),
            "analysis:\n  docsDir: documentation\n",
        )
        .unwrap();

        let engine = DocsmithEngine::open(Some(temp.path()), GlobalConfig::default()).unwrap();
        assert_eq!(engine.config().analysis.docs_dir, "documentation");
        let analysis = engine.analyze_workspace().unwrap();
        assert!(analysis
            .tasks
            .iter()
            .any(|t| t.target == "documentation/API.md"));
    }

    #[test]
    fn test_handle_round_trip() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("README.md"), "old").unwrap();
        let mut engine = engine(&temp);

        let request = parse_request(
            r#"{"command":"trackManualAction","filePath":"README.md",
                "originalContent":"old","newContent":"new"}"#,
        )
        .unwrap();
        let Response::ChangeRecorded { record } = engine.handle(request) else {
            panic!("expected a recorded change");
        };
        assert_eq!(record.status, ChangeStatus::Pending);

        let response = engine.handle(Request::ApplyChange {
            id: record.id.clone(),
        });
        assert!(!response.is_error());
        assert_eq!(fs::read_to_string(temp.path().join("README.md")).unwrap(), "new");

        let again = engine.handle(Request::ApplyChange {
            id: record.id.clone(),
        });
        assert!(again.is_error());

        let Response::Activities { activities } = engine.handle(Request::GetActivities {
            status: Some(ChangeStatus::Applied),
        }) else {
            panic!("expected activities");
        };
        assert_eq!(activities.len(), 1);

        assert!(matches!(
            engine.handle(Request::ClearAllChanges),
            Response::Cleared
        ));
        assert_eq!(engine.change_stats(), ChangeStats::default());
    }

    #[test]
    fn test_handle_errors_keep_engine_usable() {
        let temp = TempDir::new().unwrap();
        let mut engine = engine(&temp);

        let response = engine.handle(Request::ViewDiff {
            id: ChangeId::new("missing"),
        });
        let Response::Error { message } = response else {
            panic!("expected an error");
        };
        assert!(message.contains("missing"));

        let response = engine.handle(Request::TrackManualAction {
            file_path: "x.md".into(),
            title: String::new(),
            description: String::new(),
            original_content: None,
            new_content: None,
            metadata: ChangeMetadata::default(),
        });
        assert!(response.is_error());

        assert!(matches!(
            engine.handle(Request::GetChangeStats),
            Response::Stats { .. }
        ));
    }

    #[test]
    fn test_handle_generate_missing_docs() {
        let temp = TempDir::new().unwrap();
        let mut engine = engine(&temp);

        let Response::Generation { report } =
            engine.handle(Request::GenerateMissingDocs {
                include_outdated: None,
            })
        else {
            panic!("expected a generation report");
        };
        assert!(report.planned > 0);
        assert_eq!(report.written.len(), report.planned);
        assert!(temp.path().join("README.md").is_file());
        assert_eq!(engine.change_stats().applied, report.written.len());
    }
}
