//! Configuration types for docsmith.
//!
//! This module provides the configuration structures used by the engine:
//! - [`GlobalConfig`]: User-level configuration stored in `~/.docsmith/config.yaml`
//! - [`ProjectConfig`]: Project-level overrides stored in `.docsmith/config.yaml`
//! - [`ResolvedConfig`]: The merged view the engine actually runs with
//!
//! # Example YAML
//!
//! ```yaml
//! analysis:
//!   maxFileSizeBytes: 1000000
//!   minDocLength: 50
//!   docsDir: docs
//!   ignoreDirs: [generated, fixtures]
//! generation:
//!   author: docsmith
//!   includeOutdated: false
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::{
    CONFIG_FILENAME, DEFAULT_DOCS_DIR, DEFAULT_MAX_FILE_SIZE_BYTES, DEFAULT_MIN_DOC_LENGTH,
    DOCSMITH_DIR, DOCSMITH_HOME_DIR,
};
use crate::errors::DocsmithError;

// ============================================================================
// AnalysisConfig
// ============================================================================

/// Settings for the workspace analysis pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisConfig {
    /// Source files larger than this are counted but not read for constructs.
    #[serde(default = "default_max_file_size_bytes")]
    pub max_file_size_bytes: u64,

    /// Documentation shorter than this (trimmed) is reported as outdated.
    #[serde(default = "default_min_doc_length")]
    pub min_doc_length: usize,

    /// Directory (relative to the root) for secondary documentation files.
    #[serde(default = "default_docs_dir")]
    pub docs_dir: String,

    /// Extra directory names to skip during scans, on top of the built-in list.
    #[serde(default)]
    pub ignore_dirs: Vec<String>,
}

fn default_max_file_size_bytes() -> u64 {
    DEFAULT_MAX_FILE_SIZE_BYTES
}
fn default_min_doc_length() -> usize {
    DEFAULT_MIN_DOC_LENGTH
}
fn default_docs_dir() -> String {
    DEFAULT_DOCS_DIR.to_string()
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_file_size_bytes: DEFAULT_MAX_FILE_SIZE_BYTES,
            min_doc_length: DEFAULT_MIN_DOC_LENGTH,
            docs_dir: DEFAULT_DOCS_DIR.to_string(),
            ignore_dirs: Vec::new(),
        }
    }
}

impl AnalysisConfig {
    /// Validates the analysis configuration, returning warnings for questionable values.
    ///
    /// # Errors
    ///
    /// Returns an error if `max_file_size_bytes` is 0 (no source file would ever be read).
    pub fn validate(&self) -> Result<Vec<String>, DocsmithError> {
        let mut warnings = Vec::new();

        if self.max_file_size_bytes == 0 {
            return Err(DocsmithError::InvalidConfiguration {
                message: "analysis.maxFileSizeBytes cannot be 0".to_string(),
                hint: "Set maxFileSizeBytes to at least 1024 (default: 1000000)".to_string(),
            });
        }

        if self.max_file_size_bytes < 1024 {
            warnings.push(format!(
                "analysis.maxFileSizeBytes={} bytes is very restrictive; most source files will be skipped",
                self.max_file_size_bytes
            ));
        }

        if self.docs_dir.trim().is_empty() || Path::new(&self.docs_dir).is_absolute() {
            warnings.push(format!(
                "analysis.docsDir=`{}` should be a relative directory; falling back to `{}`",
                self.docs_dir, DEFAULT_DOCS_DIR
            ));
        }

        Ok(warnings)
    }

    /// The documentation directory, falling back to the default when misconfigured.
    pub fn effective_docs_dir(&self) -> &str {
        let dir = self.docs_dir.trim();
        if dir.is_empty() || Path::new(dir).is_absolute() {
            DEFAULT_DOCS_DIR
        } else {
            dir.trim_end_matches('/')
        }
    }
}

// ============================================================================
// GenerationConfig
// ============================================================================

/// Settings for batch documentation generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Recorded as `generatedBy` in change record metadata.
    #[serde(default = "default_author")]
    pub author: String,

    /// Whether batch generation also rewrites outdated documents.
    #[serde(default)]
    pub include_outdated: bool,
}

fn default_author() -> String {
    "docsmith".to_string()
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            author: default_author(),
            include_outdated: false,
        }
    }
}

// ============================================================================
// GlobalConfig
// ============================================================================

/// Global (user-level) configuration for docsmith.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalConfig {
    /// Analysis settings.
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Generation settings.
    #[serde(default)]
    pub generation: GenerationConfig,
}

impl GlobalConfig {
    /// Load the global configuration from `~/.docsmith/config.yaml`.
    ///
    /// If the file does not exist, returns a default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`DocsmithError::InvalidConfig`] if the file exists but cannot be parsed.
    pub fn load_default() -> Result<Self, DocsmithError> {
        match Self::default_path() {
            Some(path) => Self::from_path(&path),
            None => {
                tracing::debug!("Could not determine home directory, using default config");
                Ok(Self::default())
            }
        }
    }

    /// Load the global configuration from a specific path.
    ///
    /// If the file does not exist, returns a default configuration.
    pub fn from_path(path: &Path) -> Result<Self, DocsmithError> {
        if !path.exists() {
            tracing::debug!(
                "Global config not found at {}, using defaults",
                path.display()
            );
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            DocsmithError::InvalidConfig(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let config: Self = serde_yaml::from_str(&content).map_err(|e| {
            DocsmithError::InvalidConfig(format!("Failed to parse {}: {}", path.display(), e))
        })?;

        for warning in config.analysis.validate()? {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok(config)
    }

    /// Get the default global config directory (`~/.docsmith`).
    pub fn default_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(DOCSMITH_HOME_DIR))
    }

    /// Get the default global config file path (`~/.docsmith/config.yaml`).
    pub fn default_path() -> Option<PathBuf> {
        Self::default_dir().map(|d| d.join(CONFIG_FILENAME))
    }

    /// Merge project-level overrides on top of this configuration.
    pub fn resolve(&self, project: &ProjectConfig) -> ResolvedConfig {
        let mut analysis = self.analysis.clone();
        let mut generation = self.generation.clone();

        if let Some(over) = &project.analysis {
            if let Some(v) = over.max_file_size_bytes {
                analysis.max_file_size_bytes = v;
            }
            if let Some(v) = over.min_doc_length {
                analysis.min_doc_length = v;
            }
            if let Some(v) = &over.docs_dir {
                analysis.docs_dir = v.clone();
            }
            // Project ignore lists extend, never replace, the global list.
            for dir in &over.ignore_dirs {
                if !analysis.ignore_dirs.contains(dir) {
                    analysis.ignore_dirs.push(dir.clone());
                }
            }
        }

        if let Some(over) = &project.generation {
            if let Some(v) = &over.author {
                generation.author = v.clone();
            }
            if let Some(v) = over.include_outdated {
                generation.include_outdated = v;
            }
        }

        ResolvedConfig {
            analysis,
            generation,
        }
    }
}

// ============================================================================
// ProjectConfig
// ============================================================================

/// Per-project overrides for the analysis section. Unset fields inherit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisOverride {
    /// Override for `analysis.maxFileSizeBytes`.
    #[serde(default)]
    pub max_file_size_bytes: Option<u64>,
    /// Override for `analysis.minDocLength`.
    #[serde(default)]
    pub min_doc_length: Option<usize>,
    /// Override for `analysis.docsDir`.
    #[serde(default)]
    pub docs_dir: Option<String>,
    /// Additional ignored directory names.
    #[serde(default)]
    pub ignore_dirs: Vec<String>,
}

/// Per-project overrides for the generation section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationOverride {
    /// Override for `generation.author`.
    #[serde(default)]
    pub author: Option<String>,
    /// Override for `generation.includeOutdated`.
    #[serde(default)]
    pub include_outdated: Option<bool>,
}

/// Project-level configuration, stored in `<root>/.docsmith/config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    /// Analysis overrides.
    #[serde(default)]
    pub analysis: Option<AnalysisOverride>,

    /// Generation overrides.
    #[serde(default)]
    pub generation: Option<GenerationOverride>,
}

impl ProjectConfig {
    /// Load the project configuration from a workspace root.
    ///
    /// If the file does not exist, returns an empty configuration.
    pub fn load_from_workspace(workspace_root: &Path) -> Result<Self, DocsmithError> {
        Self::from_path(&Self::config_path_for_workspace(workspace_root))
    }

    /// Load the project configuration from a specific path.
    pub fn from_path(path: &Path) -> Result<Self, DocsmithError> {
        if !path.exists() {
            tracing::debug!(
                "Project config not found at {}, using defaults",
                path.display()
            );
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            DocsmithError::InvalidConfig(format!("Failed to read {}: {}", path.display(), e))
        })?;

        serde_yaml::from_str(&content).map_err(|e| {
            DocsmithError::InvalidConfig(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    /// Get the config file path for a given workspace root.
    pub fn config_path_for_workspace(workspace_root: &Path) -> PathBuf {
        workspace_root.join(DOCSMITH_DIR).join(CONFIG_FILENAME)
    }
}

// ============================================================================
// ResolvedConfig
// ============================================================================

/// Effective configuration after merging global and project sources.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedConfig {
    /// Effective analysis settings.
    pub analysis: AnalysisConfig,
    /// Effective generation settings.
    pub generation: GenerationConfig,
}

impl ResolvedConfig {
    /// Validate the merged configuration, returning warnings.
    pub fn validate(&self) -> Result<Vec<String>, DocsmithError> {
        self.analysis.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_global_config_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let config = GlobalConfig::from_path(&temp.path().join("nope.yaml")).unwrap();
        assert_eq!(config, GlobalConfig::default());
        assert_eq!(config.analysis.min_doc_length, DEFAULT_MIN_DOC_LENGTH);
    }

    #[test]
    fn test_parse_global_config_camel_case() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        fs::write(
            &path,
            "analysis:\n  maxFileSizeBytes: 2048\n  docsDir: documentation\n  ignoreDirs: [fixtures]\ngeneration:\n  author: alice\n",
        )
        .unwrap();

        let config = GlobalConfig::from_path(&path).unwrap();
        assert_eq!(config.analysis.max_file_size_bytes, 2048);
        assert_eq!(config.analysis.docs_dir, "documentation");
        assert_eq!(config.analysis.ignore_dirs, vec!["fixtures".to_string()]);
        assert_eq!(config.analysis.min_doc_length, DEFAULT_MIN_DOC_LENGTH);
        assert_eq!(config.generation.author, "alice");
        assert!(!config.generation.include_outdated);
    }

    #[test]
    fn test_invalid_yaml_is_reported() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        fs::write(&path, "analysis: [not, a, map").unwrap();

        let err = GlobalConfig::from_path(&path).unwrap_err();
        assert!(matches!(err, DocsmithError::InvalidConfig(_)));
    }

    #[test]
    fn test_zero_file_size_is_rejected() {
        let config = AnalysisConfig {
            max_file_size_bytes: 0,
            ..AnalysisConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(DocsmithError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_project_overrides_merge() {
        let global = GlobalConfig {
            analysis: AnalysisConfig {
                ignore_dirs: vec!["fixtures".to_string()],
                ..AnalysisConfig::default()
            },
            generation: GenerationConfig::default(),
        };
        let project = ProjectConfig {
            analysis: Some(AnalysisOverride {
                min_doc_length: Some(10),
                ignore_dirs: vec!["generated".to_string(), "fixtures".to_string()],
                ..AnalysisOverride::default()
            }),
            generation: Some(GenerationOverride {
                author: None,
                include_outdated: Some(true),
            }),
        };

        let resolved = global.resolve(&project);
        assert_eq!(resolved.analysis.min_doc_length, 10);
        assert_eq!(resolved.analysis.docs_dir, DEFAULT_DOCS_DIR);
        assert_eq!(
            resolved.analysis.ignore_dirs,
            vec!["fixtures".to_string(), "generated".to_string()]
        );
        assert_eq!(resolved.generation.author, "docsmith");
        assert!(resolved.generation.include_outdated);
    }

    #[test]
    fn test_effective_docs_dir_falls_back() {
        let mut config = AnalysisConfig::default();
        config.docs_dir = "  ".to_string();
        assert_eq!(config.effective_docs_dir(), DEFAULT_DOCS_DIR);
        config.docs_dir = "handbook/".to_string();
        assert_eq!(config.effective_docs_dir(), "handbook");
    }
}
