//! Documentation task generation.
//!
//! Compares a fixed catalog of expected documents (plus one document per
//! high-priority domain) against what exists on disk and emits a prioritized
//! list of [`DocTask`]s.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::SUBSTANTIAL_DOC_LENGTH;
use crate::detect::Priority;
use crate::domains::ProjectDomain;

// ============================================================================
// Types
// ============================================================================

/// Whether a document is absent or present but stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskType {
    /// The document does not exist.
    Missing,
    /// The document exists but looks stale.
    Outdated,
}

impl std::fmt::Display for TaskType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskType::Missing => write!(f, "missing"),
            TaskType::Outdated => write!(f, "outdated"),
        }
    }
}

/// A suggested documentation task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocTask {
    /// Missing or outdated.
    #[serde(rename = "type")]
    pub task_type: TaskType,
    /// `Create <file>` or `Update <file>`.
    pub title: String,
    /// What is wrong.
    pub description: String,
    /// Task priority.
    pub priority: Priority,
    /// Suggested next step.
    pub action: String,
    /// Workspace-relative path of the document.
    pub target: String,
}

// ============================================================================
// Catalog
// ============================================================================

/// What kind of document a target is, which drives staleness keywords and
/// the content a generator produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DocKind {
    /// Project overview.
    Readme,
    /// API reference.
    Api,
    /// Architecture overview.
    Architecture,
    /// Setup guide.
    Setup,
    /// Release history.
    Changelog,
    /// Contribution guide.
    Contributing,
    /// Per-domain document.
    Domain,
}

impl DocKind {
    /// Short label used in change metadata.
    pub fn as_str(&self) -> &'static str {
        match self {
            DocKind::Readme => "readme",
            DocKind::Api => "api",
            DocKind::Architecture => "architecture",
            DocKind::Setup => "setup",
            DocKind::Changelog => "changelog",
            DocKind::Contributing => "contributing",
            DocKind::Domain => "domain",
        }
    }
}

struct CatalogEntry {
    kind: DocKind,
    file_name: &'static str,
    description: &'static str,
    priority: Priority,
    /// Created under the documentation directory rather than the root.
    in_docs_dir: bool,
    keywords: &'static [&'static str],
}

const CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        kind: DocKind::Readme,
        file_name: "README.md",
        description: "Project overview",
        priority: Priority::High,
        in_docs_dir: false,
        keywords: &["#"],
    },
    CatalogEntry {
        kind: DocKind::Api,
        file_name: "API.md",
        description: "API reference",
        priority: Priority::High,
        in_docs_dir: true,
        keywords: &["endpoint", "api"],
    },
    CatalogEntry {
        kind: DocKind::Architecture,
        file_name: "ARCHITECTURE.md",
        description: "Architecture overview",
        priority: Priority::Medium,
        in_docs_dir: true,
        keywords: &["component", "architecture", "module"],
    },
    CatalogEntry {
        kind: DocKind::Setup,
        file_name: "SETUP.md",
        description: "Setup and installation guide",
        priority: Priority::Medium,
        in_docs_dir: true,
        keywords: &["install"],
    },
    CatalogEntry {
        kind: DocKind::Changelog,
        file_name: "CHANGELOG.md",
        description: "Release history",
        priority: Priority::Low,
        in_docs_dir: false,
        keywords: &["version", "##"],
    },
    CatalogEntry {
        kind: DocKind::Contributing,
        file_name: "CONTRIBUTING.md",
        description: "Contribution guidelines",
        priority: Priority::Low,
        in_docs_dir: false,
        keywords: &["pull request", "contribut"],
    },
];

const PLACEHOLDER_PHRASES: &[&str] = &["placeholder", "coming soon", "lorem ipsum", "tbd", "[insert"];

/// The document kind a workspace-relative target refers to.
pub fn doc_kind_for_target(target: &str, docs_dir: &str) -> DocKind {
    if target.starts_with(&format!("{}/domains/", docs_dir)) {
        return DocKind::Domain;
    }
    let name = target.rsplit('/').next().unwrap_or(target);
    CATALOG
        .iter()
        .find(|e| e.file_name.eq_ignore_ascii_case(name))
        .map(|e| e.kind)
        .unwrap_or(DocKind::Domain)
}

// ============================================================================
// Staleness
// ============================================================================

/// Decide whether document `content` is stale, returning the reason if so.
///
/// Checks run in a fixed order and the first decisive one wins: too short,
/// TODO/FIXME markers, placeholder phrases, long enough to trust, and finally
/// the per-document keyword check.
pub fn staleness_reason(content: &str, keywords: &[&str], min_doc_length: usize) -> Option<String> {
    let trimmed = content.trim();
    let len = trimmed.chars().count();

    if len < min_doc_length {
        return Some(format!(
            "only {} characters (minimum {})",
            len, min_doc_length
        ));
    }

    if trimmed.contains("TODO") || trimmed.contains("FIXME") {
        return Some("contains TODO/FIXME markers".to_string());
    }

    let lower = trimmed.to_lowercase();
    if let Some(phrase) = PLACEHOLDER_PHRASES.iter().find(|p| lower.contains(*p)) {
        return Some(format!("contains placeholder text (`{}`)", phrase));
    }

    if len > SUBSTANTIAL_DOC_LENGTH {
        return None;
    }

    if keywords.iter().any(|k| lower.contains(&k.to_lowercase())) {
        None
    } else {
        Some(format!("does not mention {}", keywords.join(" or ")))
    }
}

// ============================================================================
// Task generation
// ============================================================================

struct Expected<'a> {
    kind: DocKind,
    label: String,
    description: String,
    priority: Priority,
    candidates: Vec<String>,
    keywords: Vec<&'a str>,
}

fn expected_documents<'a>(docs_dir: &str, domains: &'a [ProjectDomain], domain_keywords: &'a [String]) -> Vec<Expected<'a>> {
    let mut expected: Vec<Expected<'a>> = CATALOG
        .iter()
        .map(|entry| {
            let at_root = entry.file_name.to_string();
            let in_docs = format!("{}/{}", docs_dir, entry.file_name);
            // The preferred location comes first; it is also the creation target.
            let candidates = if entry.in_docs_dir {
                vec![in_docs, at_root]
            } else {
                vec![at_root, in_docs]
            };
            Expected {
                kind: entry.kind,
                label: entry.file_name.to_string(),
                description: entry.description.to_string(),
                priority: entry.priority,
                candidates,
                keywords: entry.keywords.to_vec(),
            }
        })
        .collect();

    for (domain, keyword) in domains.iter().zip(domain_keywords) {
        if domain.priority != Priority::High {
            continue;
        }
        let file = format!("{}.md", domain.slug());
        expected.push(Expected {
            kind: DocKind::Domain,
            label: file.clone(),
            description: format!("{} domain documentation", domain.name),
            priority: Priority::High,
            candidates: vec![format!("{}/domains/{}", docs_dir, file)],
            keywords: vec![keyword.as_str()],
        });
    }

    expected
}

/// Generate documentation tasks for the workspace at `root`.
pub fn generate_tasks(
    root: &Path,
    docs_dir: &str,
    domains: &[ProjectDomain],
    min_doc_length: usize,
) -> Vec<DocTask> {
    let domain_keywords: Vec<String> = domains.iter().map(ProjectDomain::keyword).collect();
    let mut tasks = Vec::new();

    for doc in expected_documents(docs_dir, domains, &domain_keywords) {
        let existing = doc
            .candidates
            .iter()
            .find(|c| root.join(c.as_str()).is_file());

        let Some(existing) = existing else {
            let target = doc.candidates[0].clone();
            tasks.push(DocTask {
                task_type: TaskType::Missing,
                title: format!("Create {}", doc.label),
                description: format!("{} is missing ({}).", target, doc.description),
                priority: doc.priority,
                action: format!("Generate {} and review it", target),
                target,
            });
            continue;
        };

        let content = match fs::read(root.join(existing)) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => {
                tracing::warn!("Skipping staleness check for {}: {}", existing, e);
                continue;
            }
        };

        if let Some(reason) = staleness_reason(&content, &doc.keywords, min_doc_length) {
            tracing::debug!("{} ({:?}) is outdated: {}", existing, doc.kind, reason);
            tasks.push(DocTask {
                task_type: TaskType::Outdated,
                title: format!("Update {}", doc.label),
                description: format!("{} looks outdated: {}.", existing, reason),
                priority: doc.priority,
                action: format!("Review and update {}", existing),
                target: existing.clone(),
            });
        }
    }

    tasks.sort_by_key(|t| t.priority);
    tasks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::DomainType;
    use tempfile::TempDir;

    fn domain(name: &str, priority: Priority) -> ProjectDomain {
        ProjectDomain {
            name: name.to_string(),
            domain_type: DomainType::Service,
            files: vec![],
            endpoints: vec![],
            classes: vec![],
            functions: vec![],
            description: String::new(),
            priority,
        }
    }

    #[test]
    fn test_empty_workspace_reports_every_catalog_entry_missing() {
        let temp = TempDir::new().unwrap();
        let tasks = generate_tasks(temp.path(), "docs", &[], 50);

        assert_eq!(tasks.len(), CATALOG.len());
        assert!(tasks.iter().all(|t| t.task_type == TaskType::Missing));
        assert_eq!(tasks[0].title, "Create README.md");
        assert_eq!(tasks[0].target, "README.md");
        assert_eq!(tasks[1].target, "docs/API.md");
        // Sorted by priority, high first.
        let priorities: Vec<Priority> = tasks.iter().map(|t| t.priority).collect();
        let mut sorted = priorities.clone();
        sorted.sort();
        assert_eq!(priorities, sorted);
    }

    #[test]
    fn test_readme_with_todo_is_outdated() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("README.md"), "TODO: finish this").unwrap();

        let tasks = generate_tasks(temp.path(), "docs", &[], 50);
        let readme = tasks.iter().find(|t| t.target == "README.md").unwrap();
        assert_eq!(readme.task_type, TaskType::Outdated);
        assert_eq!(readme.title, "Update README.md");
        assert_eq!(readme.priority, Priority::High);
    }

    #[test]
    fn test_docs_dir_location_is_found() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("docs")).unwrap();
        let body = "# API\n\nEvery endpoint is listed below with its parameters and responses.\n".repeat(3);
        fs::write(temp.path().join("docs/API.md"), body).unwrap();

        let tasks = generate_tasks(temp.path(), "docs", &[], 50);
        assert!(tasks.iter().all(|t| !t.target.ends_with("API.md")));
    }

    #[test]
    fn test_domain_documents_only_for_high_priority() {
        let temp = TempDir::new().unwrap();
        let domains = vec![
            domain("Authentication", Priority::High),
            domain("Utilities", Priority::Low),
        ];
        let tasks = generate_tasks(temp.path(), "docs", &domains, 50);
        let domain_tasks: Vec<&DocTask> = tasks
            .iter()
            .filter(|t| t.target.starts_with("docs/domains/"))
            .collect();
        assert_eq!(domain_tasks.len(), 1);
        assert_eq!(domain_tasks[0].target, "docs/domains/authentication.md");
        assert_eq!(domain_tasks[0].priority, Priority::High);
    }

    #[test]
    fn test_staleness_heuristic_order() {
        let keywords = ["install"];
        // Too short.
        assert!(staleness_reason("Install it.", &keywords, 50).is_some());
        // Markers win over length.
        let long_todo = format!("{} FIXME", "x".repeat(200));
        assert!(staleness_reason(&long_todo, &keywords, 50).is_some());
        // Placeholder text, case-insensitive.
        let placeholder = format!("Section Coming Soon. {}", "y".repeat(60));
        assert!(staleness_reason(&placeholder, &keywords, 50).is_some());
        // Long documents pass without the keyword check.
        assert!(staleness_reason(&"z ".repeat(60), &keywords, 50).is_none());
        // Mid-length documents need the keyword.
        let mid = "Run the build script, then start the server with the default port.";
        assert!(staleness_reason(mid, &keywords, 50).is_some());
        let mid_ok = "Install the toolchain, then start the server with the default port.";
        assert!(staleness_reason(mid_ok, &keywords, 50).is_none());
    }

    #[test]
    fn test_doc_kind_for_target() {
        assert_eq!(doc_kind_for_target("README.md", "docs"), DocKind::Readme);
        assert_eq!(doc_kind_for_target("docs/API.md", "docs"), DocKind::Api);
        assert_eq!(
            doc_kind_for_target("docs/domains/payments.md", "docs"),
            DocKind::Domain
        );
    }
}
