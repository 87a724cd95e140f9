//! Batch documentation generation.
//!
//! [`generate_missing_docs`] walks the analysis task list, asks a
//! [`DocumentationGenerator`] for each document, writes it, and records a
//! change for every file written. The run can be paused or cancelled between
//! steps through a [`GenerationControl`] token.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::analysis::WorkspaceAnalysis;
use crate::changes::{ChangeId, ChangeMetadata, ChangeTracker, ChangeType};
use crate::detect::CodeItemKind;
use crate::errors::DocsmithError;
use crate::tasks::{doc_kind_for_target, DocKind, DocTask, TaskType};

/// How long a paused run sleeps between checks.
const PAUSE_POLL_INTERVAL: Duration = Duration::from_millis(50);

// ============================================================================
// Generator seam
// ============================================================================

/// Everything a generator gets to see for one document.
#[derive(Debug, Clone, Copy)]
pub struct GenerationRequest<'a> {
    /// The task being materialized.
    pub task: &'a DocTask,
    /// Kind of document.
    pub kind: DocKind,
    /// The analysis the task came from.
    pub analysis: &'a WorkspaceAnalysis,
    /// Current content when the document already exists.
    pub existing_content: Option<&'a str>,
}

/// Produces the text of one documentation file.
pub trait DocumentationGenerator {
    /// Name recorded as `generatedBy` in change metadata.
    fn name(&self) -> &str;

    /// Generate the full document for `request`.
    fn generate(&self, request: &GenerationRequest<'_>) -> Result<String, DocsmithError>;
}

/// Canned Markdown built from the analysis.
#[derive(Debug, Clone)]
pub struct TemplateGenerator {
    author: String,
}

impl TemplateGenerator {
    /// Create a generator that signs documents as `author`.
    pub fn new(author: impl Into<String>) -> Self {
        Self {
            author: author.into(),
        }
    }
}

impl Default for TemplateGenerator {
    fn default() -> Self {
        Self::new("docsmith")
    }
}

impl DocumentationGenerator for TemplateGenerator {
    fn name(&self) -> &str {
        &self.author
    }

    fn generate(&self, request: &GenerationRequest<'_>) -> Result<String, DocsmithError> {
        let a = request.analysis;
        let s = &a.structure;
        let mut doc = String::new();

        if request.kind == DocKind::Domain {
            write_domain(&mut doc, request)?;
        }

        // Writing to a String cannot fail.
        let _ = match request.kind {
            DocKind::Readme => write_readme(&mut doc, a),
            DocKind::Api => write_api(&mut doc, a),
            DocKind::Architecture => write_architecture(&mut doc, a),
            DocKind::Setup => write_setup(&mut doc, a),
            DocKind::Changelog => writeln!(
                doc,
                "# Changelog\n\nAll notable changes to {} are documented here.\n\n\
                 ## [Unreleased]\n\n- Initial documentation generated for version tracking.",
                a.project_name
            ),
            DocKind::Contributing => writeln!(
                doc,
                "# Contributing to {}\n\n1. Fork the repository and create a branch.\n\
                 2. Keep changes focused and add tests where it makes sense.\n\
                 3. Open a pull request describing what changed and why.\n\n\
                 The project uses {} with a {} layout.",
                a.project_name, s.framework, s.architecture
            ),
            DocKind::Domain => Ok(()),
        };

        let _ = writeln!(doc, "\n---\n_Generated by {}._", self.author);
        Ok(doc)
    }
}

fn write_readme(doc: &mut String, a: &WorkspaceAnalysis) -> std::fmt::Result {
    let s = &a.structure;
    writeln!(doc, "# {}\n", a.project_name)?;
    writeln!(
        doc,
        "A {} project built with {}.\n",
        s.architecture.to_lowercase(),
        s.framework
    )?;
    writeln!(doc, "## Overview\n")?;
    writeln!(doc, "- Files: {}", s.total_files)?;
    writeln!(doc, "- Code files: {}", s.code_files)?;
    writeln!(doc, "- Documentation coverage: {}%", s.coverage)?;
    if !s.domains.is_empty() {
        writeln!(doc, "\n## Domains\n")?;
        for d in &s.domains {
            writeln!(doc, "- **{}** ({} files)", d.name, d.files.len())?;
        }
    }
    Ok(())
}

fn write_api(doc: &mut String, a: &WorkspaceAnalysis) -> std::fmt::Result {
    writeln!(doc, "# API Reference\n")?;
    let endpoints: Vec<_> = a.endpoints().collect();
    if endpoints.is_empty() {
        return writeln!(doc, "No API endpoint was detected in {}.", a.project_name);
    }
    writeln!(doc, "| Endpoint | Source |\n|---|---|")?;
    for e in endpoints {
        writeln!(doc, "| `{}` | `{}:{}` |", e.name, e.file_path, e.line)?;
    }
    Ok(())
}

fn write_architecture(doc: &mut String, a: &WorkspaceAnalysis) -> std::fmt::Result {
    let s = &a.structure;
    writeln!(doc, "# Architecture\n")?;
    writeln!(doc, "- Framework: {}", s.framework)?;
    writeln!(doc, "- Architecture: {}", s.architecture)?;
    writeln!(
        doc,
        "- Layers: frontend={}, backend={}, database={}, tests={}",
        s.has_frontend, s.has_backend, s.has_database, s.has_tests
    )?;
    writeln!(doc, "\n## Components\n")?;
    for d in &s.domains {
        writeln!(
            doc,
            "### {}\n\n{}\n\n- Module type: {}\n- Constructs: {}\n",
            d.name,
            d.description,
            d.domain_type.as_str(),
            d.item_count()
        )?;
    }
    Ok(())
}

fn write_setup(doc: &mut String, a: &WorkspaceAnalysis) -> std::fmt::Result {
    writeln!(doc, "# Setup\n")?;
    writeln!(doc, "## Install\n")?;
    writeln!(
        doc,
        "Install the toolchain for {} and fetch the project dependencies.",
        a.structure.framework
    )?;
    if !a.dependencies.is_empty() {
        writeln!(doc, "\n## Dependencies\n")?;
        for dep in a.dependencies.iter().take(20) {
            writeln!(doc, "- {}", dep)?;
        }
    }
    Ok(())
}

fn write_domain(doc: &mut String, request: &GenerationRequest<'_>) -> Result<(), DocsmithError> {
    let target = &request.task.target;
    let stem = Path::new(target)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let domain = request
        .analysis
        .structure
        .domains
        .iter()
        .find(|d| d.slug() == stem)
        .ok_or_else(|| DocsmithError::Generation {
            target: target.clone(),
            message: format!("no domain matches `{}`", stem),
        })?;

    let _ = writeln!(doc, "# {}\n\n{}\n", domain.name, domain.description);
    let _ = writeln!(doc, "## Files\n");
    for f in &domain.files {
        let _ = writeln!(doc, "- `{}`", f);
    }
    for item in domain
        .endpoints
        .iter()
        .chain(&domain.classes)
        .chain(&domain.functions)
    {
        let heading = match item.kind {
            CodeItemKind::ApiRoute => "Endpoint",
            CodeItemKind::Class | CodeItemKind::Interface => "Type",
            CodeItemKind::Component => "Component",
            CodeItemKind::Function | CodeItemKind::Config => "Function",
        };
        let _ = writeln!(
            doc,
            "\n### {}: `{}`\n\n`{}` ({}:{})",
            heading, item.name, item.signature, item.file_path, item.line
        );
    }
    Ok(())
}

// ============================================================================
// GenerationControl
// ============================================================================

/// Cooperative pause/cancel token shared between a run and its caller.
#[derive(Debug, Clone, Default)]
pub struct GenerationControl {
    cancelled: Arc<AtomicBool>,
    paused: Arc<AtomicBool>,
}

impl GenerationControl {
    /// A token that is neither paused nor cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop before the next document.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Hold before the next document until resumed or cancelled.
    pub fn pause(&self) {
        self.paused.store(true, Ordering::Relaxed);
    }

    /// Continue a paused run.
    pub fn resume(&self) {
        self.paused.store(false, Ordering::Relaxed);
    }

    /// Whether [`cancel`](Self::cancel) has been called.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Whether the run is currently paused.
    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Relaxed)
    }

    /// Block while paused. Returns `false` if cancelled.
    fn wait_if_paused(&self) -> bool {
        while self.is_paused() {
            if self.is_cancelled() {
                return false;
            }
            thread::sleep(PAUSE_POLL_INTERVAL);
        }
        !self.is_cancelled()
    }
}

// ============================================================================
// Batch run
// ============================================================================

/// Which tasks a run materializes.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenerationOptions {
    /// Also regenerate outdated documents.
    pub include_outdated: bool,
}

/// A document written and tracked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedDoc {
    /// Workspace-relative path.
    pub target: String,
    /// The record tracking the write.
    pub change_id: ChangeId,
    /// `content-generated` or `content-updated`.
    pub change_type: ChangeType,
}

/// A document that could not be produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationFailure {
    /// Workspace-relative path.
    pub target: String,
    /// Why it failed.
    pub message: String,
}

/// Outcome of a batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationReport {
    /// Number of tasks selected for the run.
    pub planned: usize,
    /// Documents written, in order.
    pub written: Vec<GeneratedDoc>,
    /// Documents that failed.
    pub failed: Vec<GenerationFailure>,
    /// Whether the run stopped early.
    pub cancelled: bool,
}

/// Progress event after each document.
#[derive(Debug, Clone, Copy)]
pub struct GenerationProgress<'a> {
    /// 1-based position of this document.
    pub index: usize,
    /// Number of selected tasks.
    pub total: usize,
    /// Target just processed.
    pub target: &'a str,
    /// Whether it was written.
    pub succeeded: bool,
}

/// Tasks a run with `options` would materialize, in task order.
pub fn select_tasks(analysis: &WorkspaceAnalysis, options: GenerationOptions) -> Vec<&DocTask> {
    analysis
        .tasks
        .iter()
        .filter(|t| {
            t.task_type == TaskType::Missing
                || (options.include_outdated && t.task_type == TaskType::Outdated)
        })
        .collect()
}

/// Generate, write, and track every selected document.
///
/// Each step checks for cancellation first, then waits out a pause. A failed
/// document is recorded in the report and the run moves on. Every file left
/// on disk by the run has a change record.
pub fn generate_missing_docs(
    analysis: &WorkspaceAnalysis,
    docs_dir: &str,
    tracker: &mut ChangeTracker,
    generator: &dyn DocumentationGenerator,
    control: &GenerationControl,
    options: GenerationOptions,
    progress: &mut dyn FnMut(GenerationProgress<'_>),
) -> GenerationReport {
    let tasks = select_tasks(analysis, options);
    let mut report = GenerationReport {
        planned: tasks.len(),
        ..GenerationReport::default()
    };

    for (i, task) in tasks.iter().enumerate() {
        if !control.wait_if_paused() {
            tracing::debug!("Generation cancelled after {} documents", i);
            report.cancelled = true;
            break;
        }

        let succeeded = match generate_one(analysis, docs_dir, tracker, generator, task) {
            Ok(doc) => {
                tracing::debug!("Generated {} ({})", doc.target, doc.change_id);
                report.written.push(doc);
                true
            }
            Err(e) => {
                tracing::warn!("{}", e);
                report.failed.push(GenerationFailure {
                    target: task.target.clone(),
                    message: e.to_string(),
                });
                false
            }
        };

        progress(GenerationProgress {
            index: i + 1,
            total: tasks.len(),
            target: &task.target,
            succeeded,
        });
    }

    report
}

fn generate_one(
    analysis: &WorkspaceAnalysis,
    docs_dir: &str,
    tracker: &mut ChangeTracker,
    generator: &dyn DocumentationGenerator,
    task: &DocTask,
) -> Result<GeneratedDoc, DocsmithError> {
    let path = analysis.root.join(&task.target);
    let fail = |message: String| DocsmithError::Generation {
        target: task.target.clone(),
        message,
    };

    let original = if path.is_file() {
        let bytes = fs::read(&path).map_err(|e| fail(e.to_string()))?;
        Some(String::from_utf8_lossy(&bytes).into_owned())
    } else {
        None
    };

    let kind = doc_kind_for_target(&task.target, docs_dir);
    let content = generator.generate(&GenerationRequest {
        task,
        kind,
        analysis,
        existing_content: original.as_deref(),
    })?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| fail(e.to_string()))?;
    }
    fs::write(&path, &content).map_err(|e| fail(e.to_string()))?;

    let metadata = ChangeMetadata::default()
        .with_generated_by(generator.name())
        .with_reason(task.description.clone())
        .with_doc_type(kind.as_str());

    match tracker.track_content_generation(&task.target, content, original.clone(), metadata) {
        Ok(record) => Ok(GeneratedDoc {
            target: task.target.clone(),
            change_id: record.id,
            change_type: record.change_type,
        }),
        Err(e) => {
            // Leave no untracked write behind.
            let undo = match &original {
                Some(text) => fs::write(&path, text),
                None => fs::remove_file(&path),
            };
            if let Err(undo_err) = undo {
                tracing::warn!("Could not undo write of {}: {}", path.display(), undo_err);
            }
            Err(fail(format!("tracking failed: {}", e)))
        }
    }
}
