//! Workspace analysis.
//!
//! Walks the workspace once, classifies every file, runs construct detection
//! on code files, and assembles domains, the project profile, coverage, and
//! the documentation task list into a single [`WorkspaceAnalysis`].

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use ignore::WalkBuilder;
use serde::{Deserialize, Serialize};

use crate::classify::{classify_path, language_from_path, FileCategory};
use crate::config::AnalysisConfig;
use crate::constants::{should_ignore_dir, DOCSMITH_IGNORE_FILENAME};
use crate::detect::{detect_constructs, CodeItem};
use crate::domains::{cluster_domains, ProjectDomain};
use crate::errors::DocsmithError;
use crate::profile::{collect_dependencies, profile_project};
use crate::tasks::{generate_tasks, DocTask, TaskType};
use crate::workspace::Workspace;

// ============================================================================
// Types
// ============================================================================

/// Per-category file counts. The five counts always sum to the total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileTypeCounts {
    /// Source code files.
    pub code: usize,
    /// Documentation files.
    pub documentation: usize,
    /// Configuration files.
    pub configuration: usize,
    /// Asset files.
    pub assets: usize,
    /// Everything else.
    pub other: usize,
}

impl FileTypeCounts {
    /// Tally one file.
    pub fn record(&mut self, category: FileCategory) {
        match category {
            FileCategory::Code => self.code += 1,
            FileCategory::Documentation => self.documentation += 1,
            FileCategory::Configuration => self.configuration += 1,
            FileCategory::Asset => self.assets += 1,
            FileCategory::Other => self.other += 1,
        }
    }

    /// Sum of all categories.
    pub fn total(&self) -> usize {
        self.code + self.documentation + self.configuration + self.assets + self.other
    }
}

/// Aggregate profile of the project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectStructure {
    /// Primary framework, or `"Unknown"`.
    pub framework: String,
    /// Architecture label.
    pub architecture: String,
    /// UI code present.
    pub has_frontend: bool,
    /// Server code present.
    pub has_backend: bool,
    /// Persistence layer present.
    pub has_database: bool,
    /// Tests present.
    pub has_tests: bool,
    /// Logical areas, in rule order.
    pub domains: Vec<ProjectDomain>,
    /// Every scanned file.
    pub total_files: usize,
    /// Documentation files.
    pub doc_files: usize,
    /// Code files.
    pub code_files: usize,
    /// `round(100 * doc_files / total_files)`, 0 for an empty workspace.
    pub coverage: u8,
}

/// A file the analysis did not read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedFile {
    /// Workspace-relative path.
    pub path: String,
    /// Why it was skipped.
    pub reason: String,
}

/// Result of analyzing a workspace.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceAnalysis {
    /// Absolute workspace root.
    pub root: PathBuf,
    /// Display name of the project.
    pub project_name: String,
    /// Project profile, domains, and coverage.
    pub structure: ProjectStructure,
    /// Per-category file counts.
    pub file_types: FileTypeCounts,
    /// Prioritized documentation tasks.
    pub tasks: Vec<DocTask>,
    /// Every detected construct, in file then line order.
    pub code_items: Vec<CodeItem>,
    /// Documentation files found (workspace-relative).
    pub existing_docs: Vec<String>,
    /// Dependency names read from manifests.
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Files not read for construct detection.
    #[serde(default)]
    pub skipped_files: Vec<SkippedFile>,
    /// When the analysis ran.
    pub analyzed_at: DateTime<Utc>,
}

impl WorkspaceAnalysis {
    /// Tasks of the given type, in priority order.
    pub fn tasks_of_type(&self, task_type: TaskType) -> impl Iterator<Item = &DocTask> {
        self.tasks.iter().filter(move |t| t.task_type == task_type)
    }

    /// Detected route constructs.
    pub fn endpoints(&self) -> impl Iterator<Item = &CodeItem> {
        self.structure.domains.iter().flat_map(|d| d.endpoints.iter())
    }

    /// Number of constructs without a preceding doc comment.
    pub fn undocumented_items(&self) -> usize {
        self.code_items
            .iter()
            .filter(|i| !i.has_documentation)
            .count()
    }
}

/// Integer coverage percentage.
pub fn coverage_percent(doc_files: usize, total_files: usize) -> u8 {
    if total_files == 0 {
        return 0;
    }
    ((doc_files as f64 * 100.0) / total_files as f64).round() as u8
}

// ============================================================================
// File enumeration
// ============================================================================

/// List every analyzable file under `root`, relative and sorted.
///
/// Honors `.gitignore` (inside git repositories), `.docsmithignore`, the
/// built-in ignored directory list, and `extra_ignored_dirs`. Hidden entries
/// are skipped and symlinks are not followed.
pub fn list_workspace_files(root: &Path, extra_ignored_dirs: &[String]) -> Vec<String> {
    let extra: Vec<String> = extra_ignored_dirs.to_vec();

    let walker = WalkBuilder::new(root)
        .hidden(true)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .add_custom_ignore_filename(DOCSMITH_IGNORE_FILENAME)
        .follow_links(false)
        .filter_entry(move |entry| {
            let is_dir = entry.file_type().map_or(false, |t| t.is_dir());
            if !is_dir || entry.depth() == 0 {
                return true;
            }
            let name = entry.file_name().to_string_lossy();
            !should_ignore_dir(&name) && !extra.iter().any(|d| d.as_str() == &*name)
        })
        .build();

    let mut files = Vec::new();
    for result in walker {
        let entry = match result {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Error walking directory: {}", e);
                continue;
            }
        };
        if !entry.file_type().map_or(false, |t| t.is_file()) {
            continue;
        }
        let Ok(rel) = entry.path().strip_prefix(root) else {
            continue;
        };
        files.push(rel.to_string_lossy().replace('\\', "/"));
    }

    files.sort();
    files
}

// ============================================================================
// Analysis
// ============================================================================

/// Analyze the workspace.
///
/// Individual files that cannot be read are skipped with a warning and
/// listed in [`WorkspaceAnalysis::skipped_files`]; they never fail the run.
pub fn analyze_workspace(
    workspace: &Workspace,
    config: &AnalysisConfig,
) -> Result<WorkspaceAnalysis, DocsmithError> {
    let root = workspace.root();
    let docs_dir = config.effective_docs_dir();
    let files = list_workspace_files(root, &config.ignore_dirs);
    tracing::debug!("Scanning {} files under {}", files.len(), root.display());

    let mut file_types = FileTypeCounts::default();
    let mut code_files = Vec::new();
    let mut existing_docs = Vec::new();
    let mut code_items = Vec::new();
    let mut skipped_files = Vec::new();

    for rel in &files {
        let path = root.join(rel);
        let category = classify_path(&path);
        file_types.record(category);

        match category {
            FileCategory::Documentation => existing_docs.push(rel.clone()),
            FileCategory::Code => {
                code_files.push(rel.clone());
                let Some(lang) = language_from_path(&path) else {
                    continue;
                };
                match read_source(rel, &path, config.max_file_size_bytes) {
                    Ok(content) => {
                        code_items.extend(detect_constructs(rel, &content, lang, docs_dir));
                    }
                    Err(DocsmithError::UnreadableSourceFile { message, .. }) => {
                        tracing::warn!("Skipping {}: {}", rel, message);
                        skipped_files.push(SkippedFile {
                            path: rel.clone(),
                            reason: message,
                        });
                    }
                    Err(e) => return Err(e),
                }
            }
            _ => {}
        }
    }

    let domains = cluster_domains(&code_files, &code_items);
    let dependencies = collect_dependencies(root, &files);
    let profile = profile_project(&files, &dependencies, &code_items);
    let tasks = generate_tasks(root, docs_dir, &domains, config.min_doc_length);

    let total_files = file_types.total();
    let structure = ProjectStructure {
        framework: profile.framework,
        architecture: profile.architecture,
        has_frontend: profile.has_frontend,
        has_backend: profile.has_backend,
        has_database: profile.has_database,
        has_tests: profile.has_tests,
        domains,
        total_files,
        doc_files: file_types.documentation,
        code_files: file_types.code,
        coverage: coverage_percent(file_types.documentation, total_files),
    };

    tracing::debug!(
        "Analysis complete: {} files, {} constructs, {} tasks",
        total_files,
        code_items.len(),
        tasks.len()
    );

    Ok(WorkspaceAnalysis {
        root: root.to_path_buf(),
        project_name: workspace.name(),
        structure,
        file_types,
        tasks,
        code_items,
        existing_docs,
        dependencies: profile.dependencies,
        skipped_files,
        analyzed_at: Utc::now(),
    })
}

/// Read a source file as UTF-8, refusing files over `max_bytes`.
/// Read a code file for detection.
///
/// Oversized, unreadable, and non-UTF-8 files yield
/// [`DocsmithError::UnreadableSourceFile`].
fn read_source(rel: &str, path: &Path, max_bytes: u64) -> Result<String, DocsmithError> {
    let unreadable = |message: String| DocsmithError::UnreadableSourceFile {
        path: PathBuf::from(rel),
        message,
    };
    let size = fs::metadata(path)
        .map_err(|e| unreadable(e.to_string()))?
        .len();
    if size > max_bytes {
        return Err(unreadable(format!(
            "{} bytes exceeds limit of {} bytes",
            size, max_bytes
        )));
    }
    let bytes = fs::read(path).map_err(|e| unreadable(e.to_string()))?;
    String::from_utf8(bytes).map_err(|_| unreadable("not valid UTF-8".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::{CodeItemKind, Priority};
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn analyze(root: &Path) -> WorkspaceAnalysis {
        let workspace = Workspace::from_root(root).unwrap();
        analyze_workspace(&workspace, &AnalysisConfig::default()).unwrap()
    }

    #[test]
    fn test_empty_workspace_is_all_zero() {
        let temp = TempDir::new().unwrap();
        let analysis = analyze(temp.path());

        assert_eq!(analysis.structure.total_files, 0);
        assert_eq!(analysis.structure.doc_files, 0);
        assert_eq!(analysis.structure.code_files, 0);
        assert_eq!(analysis.structure.coverage, 0);
        assert!(analysis.structure.domains.is_empty());
        assert_eq!(analysis.file_types, FileTypeCounts::default());
    }

    #[test]
    fn test_file_types_sum_to_total() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "src/main.rs", "fn main() {}\n");
        write(temp.path(), "README.md", "# Demo\n");
        write(temp.path(), "Cargo.toml", "[package]\nname = \"demo\"\n");
        write(temp.path(), "assets/logo.png", "png");
        write(temp.path(), "data.bin", "bin");

        let analysis = analyze(temp.path());
        assert_eq!(analysis.file_types.total(), analysis.structure.total_files);
        assert_eq!(analysis.structure.total_files, 5);
        assert_eq!(analysis.file_types.code, 1);
        assert_eq!(analysis.file_types.documentation, 1);
        assert_eq!(analysis.file_types.configuration, 1);
        assert_eq!(analysis.file_types.assets, 1);
        assert_eq!(analysis.file_types.other, 1);
        assert_eq!(analysis.structure.coverage, 20);
        assert!(analysis.structure.coverage <= 100);
        assert_eq!(analysis.existing_docs, vec!["README.md".to_string()]);
    }

    #[test]
    fn test_ignored_directories_are_skipped() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "src/app.js", "function main() {}\n");
        write(temp.path(), "node_modules/lib/index.js", "function x() {}\n");
        write(temp.path(), "target/debug/out.rs", "fn x() {}\n");
        write(temp.path(), "fixtures/a.js", "function y() {}\n");
        write(temp.path(), ".docsmithignore", "generated/\n");
        write(temp.path(), "generated/api.js", "function z() {}\n");

        let workspace = Workspace::from_root(temp.path()).unwrap();
        let config = AnalysisConfig {
            ignore_dirs: vec!["fixtures".to_string()],
            ..AnalysisConfig::default()
        };
        let analysis = analyze_workspace(&workspace, &config).unwrap();
        assert_eq!(analysis.structure.total_files, 1);
        assert_eq!(analysis.code_items.len(), 1);
        assert_eq!(analysis.code_items[0].file_path, "src/app.js");
    }

    #[test]
    fn test_route_detection_and_domains() {
        let temp = TempDir::new().unwrap();
        let mut routes = String::new();
        for _ in 0..11 {
            routes.push_str("const x = 1;\n");
        }
        routes.push_str("router.get(\"/users\", handler)\n");
        write(temp.path(), "src/routes/users.js", &routes);

        let analysis = analyze(temp.path());
        let route = analysis
            .code_items
            .iter()
            .find(|i| i.kind == CodeItemKind::ApiRoute)
            .unwrap();
        assert_eq!(route.line, 12);
        assert_eq!(route.priority, Priority::High);
        assert!(analysis.structure.has_backend);
        assert_eq!(analysis.endpoints().count(), 1);

        // The owning domain is promoted and gets its own document task.
        let domain = &analysis.structure.domains[0];
        assert_eq!(domain.priority, Priority::High);
        assert!(analysis
            .tasks
            .iter()
            .any(|t| t.target == format!("docs/domains/{}.md", domain.slug())));
    }

    #[test]
    fn test_read_source_names_the_file() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "src/big.rs", &"x".repeat(64));

        let err = read_source("src/big.rs", &temp.path().join("src/big.rs"), 16).unwrap_err();
        match &err {
            DocsmithError::UnreadableSourceFile { path, message } => {
                assert_eq!(path, &PathBuf::from("src/big.rs"));
                assert_eq!(message, "64 bytes exceeds limit of 16 bytes");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("src/big.rs"));

        assert!(matches!(
            read_source("src/gone.rs", &temp.path().join("src/gone.rs"), 16),
            Err(DocsmithError::UnreadableSourceFile { .. })
        ));
    }

    #[test]
    fn test_unreadable_source_is_skipped() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("src")).unwrap();
        fs::write(temp.path().join("src/bad.py"), [0xff, 0xfe, 0x00, 0x81]).unwrap();
        write(temp.path(), "src/good.py", "def run():\n    pass\n");

        let analysis = analyze(temp.path());
        assert_eq!(analysis.structure.code_files, 2);
        assert_eq!(analysis.skipped_files.len(), 1);
        assert_eq!(analysis.skipped_files[0].path, "src/bad.py");
        assert_eq!(analysis.skipped_files[0].reason, "not valid UTF-8");
        assert_eq!(analysis.code_items.len(), 1);
    }

    #[test]
    fn test_readme_todo_yields_outdated_task() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "README.md", "TODO: finish this");

        let analysis = analyze(temp.path());
        let task = analysis
            .tasks
            .iter()
            .find(|t| t.title == "Update README.md")
            .unwrap();
        assert_eq!(task.task_type, TaskType::Outdated);
        assert_eq!(task.priority, Priority::High);
    }

    #[test]
    fn test_coverage_percent() {
        assert_eq!(coverage_percent(0, 0), 0);
        assert_eq!(coverage_percent(1, 3), 33);
        assert_eq!(coverage_percent(2, 3), 67);
        assert_eq!(coverage_percent(4, 4), 100);
    }
}
