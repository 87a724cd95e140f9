//! Domain clustering.
//!
//! Groups code files into logical areas ("Authentication", "API Routes", ...)
//! by matching path tokens against an ordered keyword rule list. Each file
//! lands in the first rule that matches any of its tokens, or in `Core`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::detect::{CodeItem, CodeItemKind, Priority};

// ============================================================================
// Types
// ============================================================================

/// The inferred role of a domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DomainType {
    /// HTTP surface.
    Api,
    /// Business logic.
    Service,
    /// UI building blocks.
    Component,
    /// Shared helpers.
    Utility,
    /// Settings and environment.
    Config,
}

impl DomainType {
    /// Lowercase label.
    pub fn as_str(&self) -> &'static str {
        match self {
            DomainType::Api => "api",
            DomainType::Service => "service",
            DomainType::Component => "component",
            DomainType::Utility => "utility",
            DomainType::Config => "config",
        }
    }
}

impl std::fmt::Display for DomainType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A logical area of the project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDomain {
    /// Display name, e.g. `"User Management"`.
    pub name: String,

    /// Inferred role.
    #[serde(rename = "type")]
    pub domain_type: DomainType,

    /// Member code files (workspace-relative, sorted).
    pub files: Vec<String>,

    /// Route registrations found in member files.
    pub endpoints: Vec<CodeItem>,

    /// Classes, interfaces, and components found in member files.
    pub classes: Vec<CodeItem>,

    /// Functions and configuration constants found in member files.
    pub functions: Vec<CodeItem>,

    /// One-line description.
    pub description: String,

    /// Documentation priority.
    pub priority: Priority,
}

impl ProjectDomain {
    /// File-name slug, e.g. `"user-management"`.
    pub fn slug(&self) -> String {
        slugify(&self.name)
    }

    /// The word a document about this domain is expected to mention.
    pub fn keyword(&self) -> String {
        self.name
            .split_whitespace()
            .next()
            .unwrap_or(&self.name)
            .to_lowercase()
    }

    /// Total number of detected constructs.
    pub fn item_count(&self) -> usize {
        self.endpoints.len() + self.classes.len() + self.functions.len()
    }
}

// ============================================================================
// Rules
// ============================================================================

struct DomainRule {
    name: &'static str,
    /// A trailing `*` marks a prefix keyword; otherwise the token must equal
    /// the keyword or its plural.
    keywords: &'static [&'static str],
    domain_type: DomainType,
    priority: Priority,
    description: &'static str,
}

const DEFAULT_DOMAIN: DomainRule = DomainRule {
    name: "Core",
    keywords: &[],
    domain_type: DomainType::Service,
    priority: Priority::Medium,
    description: "Core application logic",
};

const DOMAIN_RULES: &[DomainRule] = &[
    DomainRule {
        name: "Authentication",
        keywords: &["auth*", "login", "logout", "session*", "jwt", "oauth*", "signin", "signup", "password*"],
        domain_type: DomainType::Service,
        priority: Priority::High,
        description: "Sign-in, sessions, and access control",
    },
    DomainRule {
        name: "User Management",
        keywords: &["user*", "account*", "profile*", "member*"],
        domain_type: DomainType::Service,
        priority: Priority::High,
        description: "User accounts and profiles",
    },
    DomainRule {
        name: "Product Management",
        keywords: &["product*", "catalog*", "inventory", "item"],
        domain_type: DomainType::Service,
        priority: Priority::Medium,
        description: "Products and catalog data",
    },
    DomainRule {
        name: "Order Management",
        keywords: &["order*", "cart*", "checkout*", "shipping"],
        domain_type: DomainType::Service,
        priority: Priority::Medium,
        description: "Orders and checkout flow",
    },
    DomainRule {
        name: "Payments",
        keywords: &["payment*", "billing", "invoice*", "stripe", "subscription*"],
        domain_type: DomainType::Service,
        priority: Priority::High,
        description: "Payment processing and billing",
    },
    DomainRule {
        name: "API Routes",
        keywords: &["api", "route*", "router*", "controller*", "endpoint*", "handler*"],
        domain_type: DomainType::Api,
        priority: Priority::High,
        description: "HTTP routes and request handlers",
    },
    DomainRule {
        name: "UI Components",
        keywords: &["component*", "view*", "page*", "ui", "widget*", "layout*", "screen*"],
        domain_type: DomainType::Component,
        priority: Priority::Medium,
        description: "User interface components and pages",
    },
    DomainRule {
        name: "Data Layer",
        keywords: &["model*", "schema*", "entity", "entities", "db", "database*", "migration*", "repository", "repositories", "dao"],
        domain_type: DomainType::Service,
        priority: Priority::Medium,
        description: "Data models and persistence",
    },
    DomainRule {
        name: "Configuration",
        keywords: &["config*", "setting*", "env", "environment*"],
        domain_type: DomainType::Config,
        priority: Priority::Low,
        description: "Application configuration",
    },
    DomainRule {
        name: "Utilities",
        keywords: &["util*", "helper*", "lib", "common", "shared"],
        domain_type: DomainType::Utility,
        priority: Priority::Low,
        description: "Shared helpers and utilities",
    },
    DomainRule {
        name: "Tests",
        keywords: &["test*", "spec", "specs", "e2e", "fixture*"],
        domain_type: DomainType::Service,
        priority: Priority::Low,
        description: "Automated tests",
    },
];

fn keyword_matches(keyword: &str, token: &str) -> bool {
    match keyword.strip_suffix('*') {
        Some(prefix) => token.starts_with(prefix),
        None => token == keyword || token.strip_suffix('s') == Some(keyword),
    }
}

/// Split a path into lowercase tokens on separators and camelCase boundaries.
///
/// `src/userController.ts` becomes `["src", "user", "controller", "ts"]`.
pub fn path_tokens(path: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    for segment in path.split(|c: char| !c.is_ascii_alphanumeric()) {
        if segment.is_empty() {
            continue;
        }
        let mut current = String::new();
        let mut prev_lower = false;
        for c in segment.chars() {
            if c.is_ascii_uppercase() && prev_lower && !current.is_empty() {
                tokens.push(current.to_lowercase());
                current.clear();
            }
            prev_lower = c.is_ascii_lowercase() || c.is_ascii_digit();
            current.push(c);
        }
        if !current.is_empty() {
            tokens.push(current.to_lowercase());
        }
    }
    tokens
}

fn rule_for_path(path: &str) -> &'static DomainRule {
    let tokens = path_tokens(path);
    DOMAIN_RULES
        .iter()
        .find(|rule| {
            rule.keywords
                .iter()
                .any(|kw| tokens.iter().any(|t| keyword_matches(kw, t)))
        })
        .unwrap_or(&DEFAULT_DOMAIN)
}

/// Name of the domain a file belongs to.
pub fn domain_name_for(path: &str) -> &'static str {
    rule_for_path(path).name
}

// ============================================================================
// Clustering
// ============================================================================

/// Cluster code files and their constructs into domains.
///
/// Output follows rule order (with `Core` last) and omits empty domains.
pub fn cluster_domains(code_files: &[String], items: &[CodeItem]) -> Vec<ProjectDomain> {
    let mut by_name: HashMap<&'static str, ProjectDomain> = HashMap::new();
    let mut file_domain: HashMap<&str, &'static str> = HashMap::new();

    for file in code_files {
        let rule = rule_for_path(file);
        file_domain.insert(file.as_str(), rule.name);
        by_name
            .entry(rule.name)
            .or_insert_with(|| ProjectDomain {
                name: rule.name.to_string(),
                domain_type: rule.domain_type,
                files: Vec::new(),
                endpoints: Vec::new(),
                classes: Vec::new(),
                functions: Vec::new(),
                description: rule.description.to_string(),
                priority: rule.priority,
            })
            .files
            .push(file.clone());
    }

    for item in items {
        let Some(name) = file_domain.get(item.file_path.as_str()) else {
            tracing::debug!("Construct {} has no owning file in scan", item.name);
            continue;
        };
        let Some(domain) = by_name.get_mut(name) else {
            continue;
        };
        match item.kind {
            CodeItemKind::ApiRoute => domain.endpoints.push(item.clone()),
            CodeItemKind::Class | CodeItemKind::Interface | CodeItemKind::Component => {
                domain.classes.push(item.clone())
            }
            CodeItemKind::Function | CodeItemKind::Config => domain.functions.push(item.clone()),
        }
    }

    DOMAIN_RULES
        .iter()
        .chain(std::iter::once(&DEFAULT_DOMAIN))
        .filter_map(|rule| by_name.remove(rule.name))
        .map(|mut domain| {
            domain.files.sort();
            if !domain.endpoints.is_empty() {
                domain.priority = Priority::High;
            }
            domain
        })
        .collect()
}

/// Lowercase, dash-separated slug.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}
