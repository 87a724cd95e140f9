//! Error types for docsmith-core.

use std::path::PathBuf;

use thiserror::Error;

/// Domain-specific errors for docsmith operations.
#[derive(Error, Debug)]
pub enum DocsmithError {
    /// No workspace root is open.
    #[error("No workspace is open. Run docsmith from a project directory or pass `--root`.")]
    NoWorkspace,

    /// A change record id did not resolve.
    #[error("Change record `{0}` not found.")]
    RecordNotFound(String),

    /// A filesystem operation on a single file failed.
    #[error("File system error at `{path}`: {message}")]
    FileSystem {
        /// The affected file.
        path: PathBuf,
        /// The underlying error message.
        message: String,
    },

    /// The change record list could not be serialized or deserialized.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// A single source file could not be read during a scan.
    #[error("Cannot read source file `{path}`: {message}")]
    UnreadableSourceFile {
        /// The file that was skipped.
        path: PathBuf,
        /// The underlying error message.
        message: String,
    },

    /// A path was not found.
    #[error("Path not found: {0}")]
    PathNotFound(String),

    /// An invalid path was provided (e.g., disk root).
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Invalid argument provided to an operation.
    #[error("{0}")]
    InvalidArgument(String),

    /// An inbound message could not be decoded into a known command.
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    /// A configuration file exists but could not be read or parsed.
    #[error("Config invalid: {0}")]
    InvalidConfig(String),

    /// A configuration value is invalid.
    #[error("Invalid configuration: {message}. {hint}")]
    InvalidConfiguration {
        /// Description of the invalid configuration.
        message: String,
        /// Actionable hint on how to fix it.
        hint: String,
    },

    /// The documentation generator failed for one target.
    #[error("Failed to generate `{target}`: {message}")]
    Generation {
        /// Workspace-relative target path.
        target: String,
        /// Description of the failure.
        message: String,
    },

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization/deserialization error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A wrapped generic error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DocsmithError {
    /// Build a [`DocsmithError::FileSystem`] from an I/O error on `path`.
    pub fn file_system(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::FileSystem {
            path: path.into(),
            message: err.to_string(),
        }
    }
}
