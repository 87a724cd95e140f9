//! Workspace detection and management.
//!
//! This module provides the [`Workspace`] type which represents the project
//! directory docsmith analyzes, including the `.docsmith` metadata directory
//! where project config and persisted change state live.

use std::path::{Path, PathBuf};

use crate::constants::{DOCSMITH_DIR, STATE_DIR};
use crate::errors::DocsmithError;

// ============================================================================
// Helper Functions
// ============================================================================

/// Check if a path is a disk root (e.g., `C:\` on Windows, `/` on Unix).
///
/// ```ignore
/// assert!(is_disk_root(Path::new("/")));
/// assert!(!is_disk_root(Path::new("/home/user")));
/// ```
fn is_disk_root(path: &Path) -> bool {
    if path.parent().is_some() {
        return false;
    }

    #[cfg(windows)]
    {
        if let Some(s) = path.to_str() {
            if s.len() >= 2 && s.chars().nth(1) == Some(':') {
                return true;
            }
        }
    }

    #[cfg(not(windows))]
    {
        if path == Path::new("/") {
            return true;
        }
    }

    path.canonicalize().map_or(false, |p| p.parent().is_none())
}

// ============================================================================
// Workspace
// ============================================================================

/// A resolved project directory.
///
/// # Example
///
/// ```ignore
/// use docsmith_core::Workspace;
/// use std::path::Path;
///
/// let workspace = Workspace::from_root(Path::new("/path/to/project"))?;
/// println!("State lives in {:?}", workspace.state_dir());
/// ```
#[derive(Debug, Clone)]
pub struct Workspace {
    /// Absolute path to the workspace root directory.
    root: PathBuf,

    /// Whether a `.git` directory exists at the workspace root.
    has_git: bool,
}

impl Workspace {
    /// Create a `Workspace` from a root directory path.
    ///
    /// # Errors
    ///
    /// Returns [`DocsmithError::PathNotFound`] if the path does not exist or is not
    /// a directory, and [`DocsmithError::InvalidPath`] for filesystem roots.
    pub fn from_root(root: &Path) -> Result<Self, DocsmithError> {
        let root = root
            .canonicalize()
            .map_err(|_| DocsmithError::PathNotFound(root.display().to_string()))?;

        if !root.is_dir() {
            return Err(DocsmithError::PathNotFound(root.display().to_string()));
        }

        if is_disk_root(&root) {
            return Err(DocsmithError::InvalidPath(format!(
                "Refusing to analyze disk root: {}. \
                 Run docsmith from a project directory instead.",
                root.display()
            )));
        }

        let has_git = root.join(".git").is_dir();

        Ok(Self { root, has_git })
    }

    /// Resolve a workspace by walking up from the given directory.
    ///
    /// Stops at the first directory containing `.docsmith` or `.git`; when
    /// neither is found, the starting directory itself becomes the root.
    pub fn resolve(start_dir: &Path) -> Result<Self, DocsmithError> {
        let start = start_dir
            .canonicalize()
            .map_err(|_| DocsmithError::PathNotFound(start_dir.display().to_string()))?;

        let mut current = start.as_path();
        loop {
            if is_disk_root(current) {
                break;
            }
            if current.join(DOCSMITH_DIR).is_dir() || current.join(".git").is_dir() {
                return Self::from_root(current);
            }
            match current.parent() {
                Some(parent) => current = parent,
                None => break,
            }
        }

        Self::from_root(&start)
    }

    /// Get the absolute path to the workspace root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Check if this workspace has a `.git` directory.
    pub fn has_git(&self) -> bool {
        self.has_git
    }

    /// A display name for the project (the root directory's name).
    pub fn name(&self) -> String {
        self.root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "project".to_string())
    }

    /// Get the path to the `.docsmith` directory.
    pub fn docsmith_dir(&self) -> PathBuf {
        self.root.join(DOCSMITH_DIR)
    }

    /// Get the path to the key/value state directory (`.docsmith/state`).
    pub fn state_dir(&self) -> PathBuf {
        self.docsmith_dir().join(STATE_DIR)
    }

    /// Resolve a workspace-relative path against the root.
    ///
    /// Absolute paths are returned unchanged.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        let p = Path::new(path);
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.root.join(p)
        }
    }

    /// Express `path` relative to the root, using forward slashes.
    ///
    /// Returns `None` when the path lies outside the workspace.
    pub fn relative_path(&self, path: &Path) -> Option<String> {
        path.strip_prefix(&self.root)
            .ok()
            .map(|p| p.to_string_lossy().replace('\\', "/"))
    }
}

// ============================================================================
// Tests
// ============================================================================
