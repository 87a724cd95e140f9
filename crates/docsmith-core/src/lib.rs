//! # docsmith-core
//!
//! Workspace documentation analysis and change tracking.
//!
//! This crate scans a source tree, infers its structure, decides which
//! documentation is missing or stale, and records every documentation file it
//! writes as a reversible, diffable change. It is consumed by the `docsmith`
//! CLI and can be embedded in other hosts through [`protocol`].
//!
//! ## Main Types
//!
//! - [`DocsmithEngine`] – the session context for all operations
//! - [`WorkspaceAnalysis`] – result of scanning a workspace
//! - [`ChangeTracker`] – track, apply, and revert documentation changes
//! - [`DocsmithError`] – domain-specific error type
//!
//! ## Modules
//!
//! - [`analysis`] – workspace scan pipeline
//! - [`classify`], [`detect`], [`domains`], [`profile`], [`tasks`] – pipeline stages
//! - [`changes`] – change records, persistence, and the tracker
//! - [`diff`] – positional line diff
//! - [`generate`] – batch documentation generation
//! - [`protocol`] – tagged request/response messages
//! - [`config`] – configuration types (GlobalConfig, ProjectConfig)
//!
//! ## Example
//!
//! ```ignore
//! use docsmith_core::{DocsmithEngine, GlobalConfig};
//! use std::path::Path;
//!
//! let engine = DocsmithEngine::open(Some(Path::new(".")), GlobalConfig::load_default()?)?;
//! for task in &engine.analyze_workspace()?.tasks {
//!     println!("[{}] {}", task.priority, task.title);
//! }
//! ```

// Modules
pub mod analysis;
pub mod changes;
pub mod classify;
pub mod config;
pub mod constants;
pub mod detect;
pub mod diff;
pub mod domains;
pub mod engine;
pub mod errors;
pub mod generate;
pub mod profile;
pub mod protocol;
pub mod tasks;
pub mod workspace;

// Re-exports for convenience
pub use analysis::{
    analyze_workspace, coverage_percent, list_workspace_files, FileTypeCounts, ProjectStructure,
    SkippedFile, WorkspaceAnalysis,
};
pub use changes::{
    relative_time, ActivityEntry, ChangeId, ChangeMetadata, ChangeOrigin, ChangeOutcome,
    ChangeRecord, ChangeRecordStore, ChangeStats, ChangeStatus, ChangeTracker, ChangeType,
    FileStateStore, ManualAction, MemoryStateStore, StateStore,
};
pub use classify::{classify_path, language_from_path, FileCategory, LanguageHint};
pub use config::{
    AnalysisConfig, AnalysisOverride, GenerationConfig, GenerationOverride, GlobalConfig,
    ProjectConfig, ResolvedConfig,
};
pub use constants::{
    should_ignore_dir, ALWAYS_IGNORED_DIRS, CHANGE_RECORDS_KEY, DEFAULT_DOCS_DIR, DOCSMITH_DIR,
    DOCSMITH_IGNORE_FILENAME,
};
pub use detect::{detect_constructs, CodeItem, CodeItemKind, Priority};
pub use diff::{diff_stats, generate_diff};
pub use domains::{cluster_domains, DomainType, ProjectDomain};
pub use engine::DocsmithEngine;
pub use errors::DocsmithError;
pub use generate::{
    select_tasks, DocumentationGenerator, GeneratedDoc, GenerationControl, GenerationFailure,
    GenerationOptions, GenerationProgress, GenerationReport, GenerationRequest, TemplateGenerator,
};
pub use profile::{profile_project, ProjectProfile};
pub use protocol::{encode_response, parse_request, Request, Response};
pub use tasks::{generate_tasks, DocKind, DocTask, TaskType};
pub use workspace::Workspace;
