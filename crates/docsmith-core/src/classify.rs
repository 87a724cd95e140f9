//! File classification.
//!
//! Maps a file path to a [`FileCategory`] (by extension or well-known file
//! name) and, for code files, to a [`LanguageHint`] that selects the
//! construct rules used by [`crate::detect`].

use std::path::Path;

use serde::{Deserialize, Serialize};

// ============================================================================
// FileCategory
// ============================================================================

/// Coarse category of a workspace file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FileCategory {
    /// Source code.
    Code,
    /// Prose documentation.
    Documentation,
    /// Configuration and manifests.
    Configuration,
    /// Images, styles, fonts, media.
    Asset,
    /// Anything else.
    Other,
}

impl FileCategory {
    /// Lowercase label used in CLI output.
    pub fn as_str(&self) -> &'static str {
        match self {
            FileCategory::Code => "code",
            FileCategory::Documentation => "documentation",
            FileCategory::Configuration => "configuration",
            FileCategory::Asset => "asset",
            FileCategory::Other => "other",
        }
    }
}

impl std::fmt::Display for FileCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// LanguageHint
// ============================================================================

/// Source language inferred from a file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LanguageHint {
    /// JavaScript (`.js`, `.mjs`, `.cjs`, `.jsx`)
    JavaScript,
    /// TypeScript (`.ts`, `.tsx`)
    TypeScript,
    /// Python
    Python,
    /// Rust
    Rust,
    /// Go
    Go,
    /// Java
    Java,
    /// Kotlin
    Kotlin,
    /// C#
    CSharp,
    /// Ruby
    Ruby,
    /// PHP
    Php,
    /// Swift
    Swift,
    /// C / C++
    CFamily,
    /// Vue / Svelte single-file components
    Component,
    /// Any other code language
    Other,
}

impl LanguageHint {
    /// Get a human-readable name for the language.
    pub fn name(&self) -> &'static str {
        match self {
            LanguageHint::JavaScript => "JavaScript",
            LanguageHint::TypeScript => "TypeScript",
            LanguageHint::Python => "Python",
            LanguageHint::Rust => "Rust",
            LanguageHint::Go => "Go",
            LanguageHint::Java => "Java",
            LanguageHint::Kotlin => "Kotlin",
            LanguageHint::CSharp => "C#",
            LanguageHint::Ruby => "Ruby",
            LanguageHint::Php => "PHP",
            LanguageHint::Swift => "Swift",
            LanguageHint::CFamily => "C/C++",
            LanguageHint::Component => "Vue/Svelte",
            LanguageHint::Other => "Other",
        }
    }

    /// Whether `#` starts a line comment in this language.
    pub fn uses_hash_comments(&self) -> bool {
        matches!(self, LanguageHint::Python | LanguageHint::Ruby)
    }
}

// ============================================================================
// Extension tables
// ============================================================================

const CODE_EXTENSIONS: &[&str] = &[
    "rs", "js", "jsx", "mjs", "cjs", "ts", "tsx", "py", "go", "java", "kt", "kts", "cs", "rb",
    "php", "swift", "c", "cc", "cpp", "cxx", "h", "hpp", "scala", "vue", "svelte", "dart", "sh",
    "sql",
];

const DOC_EXTENSIONS: &[&str] = &["md", "mdx", "markdown", "rst", "adoc"];

const CONFIG_EXTENSIONS: &[&str] = &[
    "json",
    "yaml",
    "yml",
    "toml",
    "ini",
    "cfg",
    "conf",
    "env",
    "xml",
    "properties",
    "lock",
];

const ASSET_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "svg", "ico", "webp", "bmp", "css", "scss", "sass", "less",
    "woff", "woff2", "ttf", "otf", "eot", "mp3", "mp4", "wav", "webm", "pdf", "zip",
];

/// Documentation files without an extension, or as `.txt`.
const DOC_FILE_NAMES: &[&str] = &["README", "LICENSE", "CHANGELOG", "CONTRIBUTING", "AUTHORS"];

/// Well-known configuration files without a telling extension.
const CONFIG_FILE_NAMES: &[&str] = &[
    "Dockerfile",
    "Makefile",
    "Procfile",
    "Gemfile",
    "Rakefile",
];

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// Classify a file by its extension, falling back to its file name.
pub fn classify_path(path: &Path) -> FileCategory {
    let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");

    if CONFIG_FILE_NAMES.contains(&file_name) {
        return FileCategory::Configuration;
    }

    if let Some(ext) = extension_of(path) {
        let ext = ext.as_str();
        if CODE_EXTENSIONS.contains(&ext) {
            return FileCategory::Code;
        }
        if DOC_EXTENSIONS.contains(&ext) {
            return FileCategory::Documentation;
        }
        if CONFIG_EXTENSIONS.contains(&ext) {
            return FileCategory::Configuration;
        }
        if ASSET_EXTENSIONS.contains(&ext) {
            return FileCategory::Asset;
        }
        if ext == "txt" {
            return classify_text_file(path);
        }
        return FileCategory::Other;
    }

    if is_doc_file_name(file_name) {
        return FileCategory::Documentation;
    }

    FileCategory::Other
}

/// Infer the source language from a file's extension.
///
/// Returns `None` for paths that are not code files.
pub fn language_from_path(path: &Path) -> Option<LanguageHint> {
    let ext = extension_of(path)?;
    let hint = match ext.as_str() {
        "js" | "jsx" | "mjs" | "cjs" => LanguageHint::JavaScript,
        "ts" | "tsx" => LanguageHint::TypeScript,
        "py" => LanguageHint::Python,
        "rs" => LanguageHint::Rust,
        "go" => LanguageHint::Go,
        "java" => LanguageHint::Java,
        "kt" | "kts" => LanguageHint::Kotlin,
        "cs" => LanguageHint::CSharp,
        "rb" => LanguageHint::Ruby,
        "php" => LanguageHint::Php,
        "swift" => LanguageHint::Swift,
        "c" | "cc" | "cpp" | "cxx" | "h" | "hpp" => LanguageHint::CFamily,
        "vue" | "svelte" => LanguageHint::Component,
        other if CODE_EXTENSIONS.contains(&other) => LanguageHint::Other,
        _ => return None,
    };
    Some(hint)
}
fn is_doc_file_name(stem: &str) -> bool {
    DOC_FILE_NAMES.contains(&stem.to_ascii_uppercase().as_str())
}

/// Plain text is only documentation under a well-known name (`LICENSE.txt`);
/// `requirements*.txt` is a dependency manifest.
fn classify_text_file(path: &Path) -> FileCategory {
    let stem = path.file_stem().and_then(|n| n.to_str()).unwrap_or("");
    if is_doc_file_name(stem) {
        FileCategory::Documentation
    } else if stem.to_ascii_lowercase().starts_with("requirements") {
        FileCategory::Configuration
    } else {
        FileCategory::Other
    }
}

/// Whether the file uses JSX syntax (where PascalCase functions are components).
pub fn is_jsx_path(path: &Path) -> bool {
    matches!(extension_of(path).as_deref(), Some("jsx") | Some("tsx"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_by_extension() {
        assert_eq!(classify_path(Path::new("src/main.rs")), FileCategory::Code);
        assert_eq!(classify_path(Path::new("web/App.TSX")), FileCategory::Code);
        assert_eq!(
            classify_path(Path::new("docs/API.md")),
            FileCategory::Documentation
        );
        assert_eq!(
            classify_path(Path::new("Cargo.toml")),
            FileCategory::Configuration
        );
        assert_eq!(classify_path(Path::new("logo.svg")), FileCategory::Asset);
        assert_eq!(classify_path(Path::new("data.bin")), FileCategory::Other);
    }

    #[test]
    fn test_classify_by_file_name() {
        assert_eq!(
            classify_path(Path::new("Dockerfile")),
            FileCategory::Configuration
        );
        assert_eq!(
            classify_path(Path::new("Makefile")),
            FileCategory::Configuration
        );
        assert_eq!(
            classify_path(Path::new("LICENSE")),
            FileCategory::Documentation
        );
        assert_eq!(classify_path(Path::new("random")), FileCategory::Other);
    }

    #[test]
    fn test_text_files_need_a_doc_name() {
        assert_eq!(
            classify_path(Path::new("LICENSE.txt")),
            FileCategory::Documentation
        );
        assert_eq!(
            classify_path(Path::new("docs/readme.txt")),
            FileCategory::Documentation
        );
        assert_eq!(
            classify_path(Path::new("requirements.txt")),
            FileCategory::Configuration
        );
        assert_eq!(
            classify_path(Path::new("requirements-dev.txt")),
            FileCategory::Configuration
        );
        assert_eq!(
            classify_path(Path::new("fixtures/words.txt")),
            FileCategory::Other
        );
    }

    #[test]
    fn test_language_from_path() {
        assert_eq!(
            language_from_path(Path::new("a.mjs")),
            Some(LanguageHint::JavaScript)
        );
        assert_eq!(
            language_from_path(Path::new("a.tsx")),
            Some(LanguageHint::TypeScript)
        );
        assert_eq!(
            language_from_path(Path::new("a.py")),
            Some(LanguageHint::Python)
        );
        assert_eq!(
            language_from_path(Path::new("a.sql")),
            Some(LanguageHint::Other)
        );
        assert_eq!(language_from_path(Path::new("README.md")), None);
        assert!(is_jsx_path(Path::new("Button.jsx")));
        assert!(!is_jsx_path(Path::new("button.ts")));
    }
}
