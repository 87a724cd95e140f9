//! Common constants used throughout docsmith-core.
//!
//! This module centralizes paths, directory names, and heuristic limits
//! to avoid duplication and ensure consistency across the codebase.

// ============================================================================
// Directory Names
// ============================================================================

/// The name of the docsmith metadata directory within a workspace.
///
/// Project config and persisted state live under `.docsmith/` at the workspace root.
pub const DOCSMITH_DIR: &str = ".docsmith";

/// The subdirectory within `.docsmith` that holds key/value state files.
pub const STATE_DIR: &str = "state";

/// The name of the global docsmith configuration directory (`~/.docsmith`).
pub const DOCSMITH_HOME_DIR: &str = ".docsmith";

/// The name of the custom ignore file, read like `.gitignore` during scans.
pub const DOCSMITH_IGNORE_FILENAME: &str = ".docsmithignore";

/// Default directory for secondary documentation files.
pub const DEFAULT_DOCS_DIR: &str = "docs";

// ============================================================================
// Ignored Directories
// ============================================================================

/// Dependency, vendor, and build directories that are never scanned.
pub const ALWAYS_IGNORED_DIRS: &[&str] = &[
    ".git",
    ".docsmith",
    "node_modules",
    "bower_components",
    "vendor",
    "target",
    ".next",
    ".nuxt",
    "dist",
    "build",
    "out",
    "coverage",
    "__pycache__",
    ".venv",
    "venv",
    ".tox",
    ".mypy_cache",
    ".pytest_cache",
    ".gradle",
    "Pods",
];

/// Check if a directory name should always be ignored.
#[inline]
pub fn should_ignore_dir(name: &str) -> bool {
    ALWAYS_IGNORED_DIRS.contains(&name)
}

// ============================================================================
// Heuristic limits
// ============================================================================

/// How many preceding lines are searched for a doc-comment marker.
pub const DOC_COMMENT_LOOKBACK: usize = 10;

/// Documentation shorter than this (trimmed, in characters) is considered stale.
pub const DEFAULT_MIN_DOC_LENGTH: usize = 50;

/// Documentation longer than this that passed the marker checks is considered current.
pub const SUBSTANTIAL_DOC_LENGTH: usize = 100;

/// Default maximum size of a source file read for construct detection (1 MB).
pub const DEFAULT_MAX_FILE_SIZE_BYTES: u64 = 1_000_000;

// ============================================================================
// Configuration and state
// ============================================================================

/// The name of the global and project configuration files.
pub const CONFIG_FILENAME: &str = "config.yaml";

/// The fixed state key under which change records are persisted.
pub const CHANGE_RECORDS_KEY: &str = "docsmith.changeRecords";

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_ignore_dir() {
        assert!(should_ignore_dir(".git"));
        assert!(should_ignore_dir("node_modules"));
        assert!(should_ignore_dir("vendor"));
        assert!(should_ignore_dir(".docsmith"));
        assert!(!should_ignore_dir("src"));
        assert!(!should_ignore_dir("docs"));
    }
}
