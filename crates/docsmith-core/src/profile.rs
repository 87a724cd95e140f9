//! Project profiling.
//!
//! Infers the primary framework, an architecture label, and four layer flags
//! from path signals, manifest dependencies, and detected route constructs.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::detect::{CodeItem, CodeItemKind};

/// Framework label when nothing matched.
pub const UNKNOWN_FRAMEWORK: &str = "Unknown";

/// Architecture label when no style matched.
pub const DEFAULT_ARCHITECTURE: &str = "Monolithic";

// ============================================================================
// ProjectProfile
// ============================================================================

/// The inferred shape of a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectProfile {
    /// Primary framework, or `"Unknown"`.
    pub framework: String,
    /// Architecture label, or `"Monolithic"`.
    pub architecture: String,
    /// UI code present.
    pub has_frontend: bool,
    /// Server code present.
    pub has_backend: bool,
    /// Persistence layer present.
    pub has_database: bool,
    /// Test files present.
    pub has_tests: bool,
    /// Dependency names read from manifests (lowercase, sorted).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,
}

impl Default for ProjectProfile {
    fn default() -> Self {
        Self {
            framework: UNKNOWN_FRAMEWORK.to_string(),
            architecture: DEFAULT_ARCHITECTURE.to_string(),
            has_frontend: false,
            has_backend: false,
            has_database: false,
            has_tests: false,
            dependencies: Vec::new(),
        }
    }
}

// ============================================================================
// Framework signatures
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq)]
enum Side {
    Frontend,
    Backend,
}

struct FrameworkSignature {
    name: &'static str,
    side: Side,
    /// Dependency names (exact, lowercase) or, when containing `/`, a
    /// substring of a module path such as `github.com/gin-gonic/gin`.
    deps: &'static [&'static str],
    /// Files whose presence (by file name) identifies the framework.
    files: &'static [&'static str],
}

const FRAMEWORKS: &[FrameworkSignature] = &[
    FrameworkSignature {
        name: "Next.js",
        side: Side::Frontend,
        deps: &["next"],
        files: &["next.config.js", "next.config.mjs", "next.config.ts"],
    },
    FrameworkSignature {
        name: "Nuxt",
        side: Side::Frontend,
        deps: &["nuxt", "nuxt3"],
        files: &["nuxt.config.js", "nuxt.config.ts"],
    },
    FrameworkSignature {
        name: "Angular",
        side: Side::Frontend,
        deps: &["@angular/core"],
        files: &["angular.json"],
    },
    FrameworkSignature {
        name: "Vue",
        side: Side::Frontend,
        deps: &["vue"],
        files: &["vue.config.js"],
    },
    FrameworkSignature {
        name: "Svelte",
        side: Side::Frontend,
        deps: &["svelte", "@sveltejs/kit"],
        files: &["svelte.config.js"],
    },
    FrameworkSignature {
        name: "React",
        side: Side::Frontend,
        deps: &["react", "react-dom"],
        files: &[],
    },
    FrameworkSignature {
        name: "NestJS",
        side: Side::Backend,
        deps: &["@nestjs/core"],
        files: &["nest-cli.json"],
    },
    FrameworkSignature {
        name: "Express",
        side: Side::Backend,
        deps: &["express"],
        files: &[],
    },
    FrameworkSignature {
        name: "Fastify",
        side: Side::Backend,
        deps: &["fastify"],
        files: &[],
    },
    FrameworkSignature {
        name: "Django",
        side: Side::Backend,
        deps: &["django"],
        files: &["manage.py"],
    },
    FrameworkSignature {
        name: "FastAPI",
        side: Side::Backend,
        deps: &["fastapi"],
        files: &[],
    },
    FrameworkSignature {
        name: "Flask",
        side: Side::Backend,
        deps: &["flask"],
        files: &[],
    },
    FrameworkSignature {
        name: "Rails",
        side: Side::Backend,
        deps: &["rails"],
        files: &["config.ru"],
    },
    FrameworkSignature {
        name: "Laravel",
        side: Side::Backend,
        deps: &["laravel/framework"],
        files: &["artisan"],
    },
    FrameworkSignature {
        name: "Spring",
        side: Side::Backend,
        deps: &["spring-boot-starter-web", "spring-boot-starter", "spring-webmvc", "spring-boot"],
        files: &[],
    },
    FrameworkSignature {
        name: "Axum",
        side: Side::Backend,
        deps: &["axum"],
        files: &[],
    },
    FrameworkSignature {
        name: "Actix",
        side: Side::Backend,
        deps: &["actix-web"],
        files: &[],
    },
    FrameworkSignature {
        name: "Gin",
        side: Side::Backend,
        deps: &["github.com/gin-gonic/gin"],
        files: &[],
    },
];

/// Dependencies that imply a persistence layer.
const DATABASE_DEPS: &[&str] = &[
    "prisma", "@prisma/client", "typeorm", "sequelize", "mongoose", "mongodb", "pg", "mysql",
    "mysql2", "sqlite3", "better-sqlite3", "knex", "drizzle-orm", "redis", "ioredis",
    "sqlalchemy", "psycopg2", "psycopg2-binary", "pymongo", "peewee", "diesel", "sqlx",
    "sea-orm", "rusqlite", "tokio-postgres", "gorm.io/gorm", "activerecord", "pg_query",
    "doctrine/orm", "spring-boot-starter-data-jpa", "hibernate-core",
];

const FRONTEND_EXTENSIONS: &[&str] = &["tsx", "jsx", "vue", "svelte", "html"];
const BACKEND_DIRS: &[&str] = &["server", "api", "routes", "controllers", "handlers", "backend"];
const DATABASE_DIRS: &[&str] = &["migrations", "models", "schema", "prisma", "db", "database"];
const TEST_DIRS: &[&str] = &["test", "tests", "__tests__", "spec", "specs", "e2e"];

// ============================================================================
// Manifest parsing
// ============================================================================

/// Read dependency names from every manifest in `files` (relative to `root`).
pub fn collect_dependencies(root: &Path, files: &[String]) -> BTreeSet<String> {
    let mut deps = BTreeSet::new();
    for rel in files {
        let file_name = rel.rsplit('/').next().unwrap_or(rel);
        let path = root.join(rel);
        let found = match file_name {
            "package.json" => parse_package_json(&path),
            "composer.json" => parse_composer_json(&path),
            "Cargo.toml" => parse_cargo_toml(&path),
            "pyproject.toml" => parse_pyproject_toml(&path),
            "go.mod" => parse_go_mod(&path),
            "Gemfile" => parse_gemfile(&path),
            "pom.xml" => parse_pom_xml(&path),
            "build.gradle" | "build.gradle.kts" => parse_gradle(&path),
            name if name.starts_with("requirements") && name.ends_with(".txt") => {
                parse_requirements_txt(&path)
            }
            _ => continue,
        };
        tracing::debug!("{}: {} dependencies", rel, found.len());
        deps.extend(found.into_iter().map(|d| d.to_lowercase()));
    }
    deps
}

fn read_manifest(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(c) => Some(c),
        Err(e) => {
            tracing::debug!("Failed to read manifest at {}: {}", path.display(), e);
            None
        }
    }
}

fn parse_package_json(path: &Path) -> Vec<String> {
    json_object_keys(path, &["dependencies", "devDependencies", "peerDependencies"])
}

fn parse_composer_json(path: &Path) -> Vec<String> {
    json_object_keys(path, &["require", "require-dev"])
}

fn json_object_keys(path: &Path, sections: &[&str]) -> Vec<String> {
    let Some(content) = read_manifest(path) else {
        return Vec::new();
    };
    let json: serde_json::Value = match serde_json::from_str(&content) {
        Ok(v) => v,
        Err(e) => {
            tracing::debug!("Failed to parse {}: {}", path.display(), e);
            return Vec::new();
        }
    };

    sections
        .iter()
        .filter_map(|s| json.get(*s).and_then(|v| v.as_object()))
        .flat_map(|obj| obj.keys().cloned())
        .collect()
}

fn parse_toml(path: &Path) -> Option<toml::Value> {
    let content = read_manifest(path)?;
    match toml::from_str(&content) {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::debug!("Failed to parse {}: {}", path.display(), e);
            None
        }
    }
}

fn table_keys(value: Option<&toml::Value>) -> Vec<String> {
    value
        .and_then(|v| v.as_table())
        .map(|t| t.keys().cloned().collect())
        .unwrap_or_default()
}

fn parse_cargo_toml(path: &Path) -> Vec<String> {
    let Some(parsed) = parse_toml(path) else {
        return Vec::new();
    };
    let mut deps = Vec::new();
    for section in ["dependencies", "dev-dependencies", "build-dependencies"] {
        deps.extend(table_keys(parsed.get(section)));
    }
    deps.extend(table_keys(
        parsed.get("workspace").and_then(|w| w.get("dependencies")),
    ));
    deps
}

fn parse_pyproject_toml(path: &Path) -> Vec<String> {
    let Some(parsed) = parse_toml(path) else {
        return Vec::new();
    };
    let mut deps: Vec<String> = parsed
        .get("project")
        .and_then(|p| p.get("dependencies"))
        .and_then(|d| d.as_array())
        .map(|specs| {
            specs
                .iter()
                .filter_map(|s| s.as_str())
                .filter_map(requirement_name)
                .collect()
        })
        .unwrap_or_default();

    let poetry = parsed.get("tool").and_then(|t| t.get("poetry"));
    deps.extend(
        table_keys(poetry.and_then(|p| p.get("dependencies")))
            .into_iter()
            .filter(|name| name != "python"),
    );
    deps
}

/// Package name of a PEP 508 / requirements.txt line.
fn requirement_name(spec: &str) -> Option<String> {
    let spec = spec.split(['#', ';']).next()?.trim();
    if spec.is_empty() || spec.starts_with('-') || spec.contains("://") {
        return None;
    }
    let end = spec
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.'))
        .unwrap_or(spec.len());
    let name = &spec[..end];
    (!name.is_empty()).then(|| name.to_string())
}

fn parse_requirements_txt(path: &Path) -> Vec<String> {
    read_manifest(path)
        .map(|c| c.lines().filter_map(requirement_name).collect())
        .unwrap_or_default()
}

fn parse_go_mod(path: &Path) -> Vec<String> {
    let Some(content) = read_manifest(path) else {
        return Vec::new();
    };
    let mut deps = Vec::new();
    let mut in_require_block = false;

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with("//") {
            continue;
        }
        if line == "require (" {
            in_require_block = true;
            continue;
        }
        if line == ")" {
            in_require_block = false;
            continue;
        }
        let spec = if in_require_block {
            Some(line)
        } else {
            line.strip_prefix("require ")
        };
        if let Some(module) = spec.and_then(|s| s.split_whitespace().next()) {
            deps.push(module.to_string());
        }
    }
    deps
}

fn parse_gemfile(path: &Path) -> Vec<String> {
    let Some(content) = read_manifest(path) else {
        return Vec::new();
    };
    static GEM_RE: OnceLock<Regex> = OnceLock::new();
    let gem_re = GEM_RE
        .get_or_init(|| Regex::new(r#"^\s*gem\s+['"]([^'"]+)['"]"#).expect("Invalid regex"));
    content
        .lines()
        .filter_map(|l| gem_re.captures(l))
        .filter_map(|c| c.get(1).map(|m| m.as_str().to_string()))
        .collect()
}

fn parse_pom_xml(path: &Path) -> Vec<String> {
    let Some(content) = read_manifest(path) else {
        return Vec::new();
    };
    static ARTIFACT_RE: OnceLock<Regex> = OnceLock::new();
    let artifact_re = ARTIFACT_RE.get_or_init(|| {
        Regex::new(r"<artifactId>\s*([^<\s]+)\s*</artifactId>").expect("Invalid regex")
    });
    artifact_re
        .captures_iter(&content)
        .filter_map(|c| c.get(1).map(|m| m.as_str().to_string()))
        .collect()
}

fn parse_gradle(path: &Path) -> Vec<String> {
    let Some(content) = read_manifest(path) else {
        return Vec::new();
    };
    // implementation("group:artifact:version") or implementation 'group:artifact'
    static COORD_RE: OnceLock<Regex> = OnceLock::new();
    let coord_re = COORD_RE.get_or_init(|| {
        Regex::new(r#"['"]([\w.\-]+):([\w.\-]+)(?::[^'"]*)?['"]"#).expect("Invalid regex")
    });
    coord_re
        .captures_iter(&content)
        .filter_map(|c| c.get(2).map(|m| m.as_str().to_string()))
        .collect()
}

// ============================================================================
// Profiling
// ============================================================================

fn dep_matches(signature_dep: &str, deps: &BTreeSet<String>) -> bool {
    if signature_dep.contains('/') && signature_dep.contains('.') {
        deps.iter().any(|d| d.contains(signature_dep))
    } else {
        deps.contains(signature_dep)
    }
}

fn dir_segments(path: &str) -> impl Iterator<Item = &str> {
    let mut parts: Vec<&str> = path.split('/').collect();
    parts.pop();
    parts.into_iter()
}

fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

fn extension(path: &str) -> &str {
    let name = file_name(path);
    name.rsplit_once('.').map(|(_, e)| e).unwrap_or("")
}

fn has_dir(files: &[String], names: &[&str]) -> bool {
    files
        .iter()
        .any(|f| dir_segments(f).any(|seg| names.contains(&seg)))
}

fn is_test_file(path: &str) -> bool {
    let name = file_name(path);
    name.contains(".test.")
        || name.contains(".spec.")
        || name.ends_with("_test.go")
        || name.ends_with("_test.py")
        || (name.starts_with("test_") && name.ends_with(".py"))
        || name.ends_with("Test.java")
        || name.ends_with("_spec.rb")
}

/// Profile a project from its file list, dependency set, and constructs.
pub fn profile_project(
    files: &[String],
    dependencies: &BTreeSet<String>,
    items: &[CodeItem],
) -> ProjectProfile {
    let framework = FRAMEWORKS.iter().find(|sig| {
        sig.deps.iter().any(|d| dep_matches(d, dependencies))
            || files.iter().any(|f| sig.files.contains(&file_name(f)))
    });

    let any_framework_on = |side: Side| {
        FRAMEWORKS.iter().any(|sig| {
            sig.side == side
                && (sig.deps.iter().any(|d| dep_matches(d, dependencies))
                    || files.iter().any(|f| sig.files.contains(&file_name(f))))
        })
    };

    let has_routes = items.iter().any(|i| i.kind == CodeItemKind::ApiRoute);

    let has_frontend = any_framework_on(Side::Frontend)
        || files
            .iter()
            .any(|f| FRONTEND_EXTENSIONS.contains(&extension(f)));

    let has_backend =
        any_framework_on(Side::Backend) || has_routes || has_dir(files, BACKEND_DIRS);

    let has_database = files
        .iter()
        .any(|f| matches!(extension(f), "sql" | "prisma"))
        || has_dir(files, DATABASE_DIRS)
        || DATABASE_DEPS.iter().any(|d| dep_matches(d, dependencies));

    let has_tests = has_dir(files, TEST_DIRS) || files.iter().any(|f| is_test_file(f));

    let architecture = infer_architecture(files, has_frontend, has_backend, has_routes);

    if let Some(sig) = framework {
        tracing::debug!("Detected framework {}", sig.name);
    }

    ProjectProfile {
        framework: framework
            .map(|s| s.name)
            .unwrap_or(UNKNOWN_FRAMEWORK)
            .to_string(),
        architecture: architecture.to_string(),
        has_frontend,
        has_backend,
        has_database,
        has_tests,
        dependencies: dependencies.iter().cloned().collect(),
    }
}

const SERVICE_MANIFESTS: &[&str] = &[
    "package.json",
    "Cargo.toml",
    "go.mod",
    "pom.xml",
    "pyproject.toml",
    "requirements.txt",
    "Dockerfile",
];

fn infer_architecture(
    files: &[String],
    has_frontend: bool,
    has_backend: bool,
    has_routes: bool,
) -> &'static str {
    let top_dirs: BTreeSet<&str> = files
        .iter()
        .filter_map(|f| f.split_once('/').map(|(d, _)| d))
        .collect();
    let root_files: BTreeSet<&str> = files.iter().filter(|f| !f.contains('/')).map(String::as_str).collect();

    let monorepo_markers = ["pnpm-workspace.yaml", "lerna.json", "turbo.json", "nx.json"];
    if monorepo_markers.iter().any(|m| root_files.contains(m))
        || ((top_dirs.contains("packages") || top_dirs.contains("apps"))
            && files.iter().any(|f| {
                let depth = f.matches('/').count();
                depth == 2 && SERVICE_MANIFESTS.contains(&file_name(f))
            }))
    {
        return "Monorepo";
    }

    let service_manifest_dirs: BTreeSet<&str> = files
        .iter()
        .filter(|f| f.starts_with("services/") && SERVICE_MANIFESTS.contains(&file_name(f)))
        .filter_map(|f| f.split('/').nth(1))
        .collect();
    let has_compose = root_files
        .iter()
        .any(|f| f.starts_with("docker-compose") || f.starts_with("compose."));
    if service_manifest_dirs.len() >= 2 || (top_dirs.contains("services") && has_compose) {
        return "Microservices";
    }

    let has_any = |names: &[&str]| has_dir(files, names);
    if has_any(&["controllers"]) && has_any(&["models"]) && has_any(&["views", "templates"]) {
        return "MVC";
    }

    if has_any(&["domain"]) && has_any(&["infrastructure", "infra"]) {
        return "Layered";
    }

    if has_frontend && has_backend {
        return "Full-Stack";
    }

    if has_backend && has_routes {
        return "API Service";
    }

    DEFAULT_ARCHITECTURE
}
