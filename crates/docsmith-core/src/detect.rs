//! Line-level construct detection.
//!
//! Each supported language has an ordered list of regex rules. Every line of a
//! source file is tested against the list and the first matching rule wins, so
//! route registrations are listed before the generic function forms they would
//! otherwise also match.
//!
//! Detection is advisory. It is pattern matching on single lines, not parsing:
//! multi-line signatures fall back to name-only rules and constructs inside
//! string literals may be reported.

use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::classify::{is_jsx_path, LanguageHint};
use crate::constants::DOC_COMMENT_LOOKBACK;

/// Lines longer than this (minified bundles, data blobs) are not inspected.
const MAX_LINE_LEN: usize = 500;

/// Signatures are truncated to this many characters.
const MAX_SIGNATURE_CHARS: usize = 160;

// ============================================================================
// Types
// ============================================================================

/// The kind of construct a rule detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CodeItemKind {
    /// A function, method, or closure binding.
    Function,
    /// A class, struct, or enum.
    Class,
    /// An interface, trait, or protocol.
    Interface,
    /// An HTTP route registration.
    ApiRoute,
    /// A top-level configuration constant.
    Config,
    /// A UI component.
    Component,
}

impl CodeItemKind {
    /// Kebab-case label, as serialized.
    pub fn as_str(&self) -> &'static str {
        match self {
            CodeItemKind::Function => "function",
            CodeItemKind::Class => "class",
            CodeItemKind::Interface => "interface",
            CodeItemKind::ApiRoute => "api-route",
            CodeItemKind::Config => "config",
            CodeItemKind::Component => "component",
        }
    }
}

impl std::fmt::Display for CodeItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Priority shared by constructs, domains, and documentation tasks.
///
/// Ordered so that sorting ascending puts `High` first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Must be documented first.
    High,
    /// Worth documenting.
    Medium,
    /// Nice to have.
    Low,
}

impl Priority {
    /// Lowercase label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A construct detected in a source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeItem {
    /// What was detected.
    #[serde(rename = "type")]
    pub kind: CodeItemKind,

    /// Construct name. Routes are named `"<VERB> <path>"`.
    pub name: String,

    /// Workspace-relative path of the originating file.
    pub file_path: String,

    /// 1-based line number.
    pub line: usize,

    /// The matched line, trimmed.
    pub signature: String,

    /// Parameter list, when the rule captured one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<String>>,

    /// Return type, when the rule captured one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_type: Option<String>,

    /// Documentation priority.
    pub priority: Priority,

    /// Whether a doc-comment marker precedes the construct.
    pub has_documentation: bool,

    /// Where documentation for this construct should live.
    pub suggested_doc_path: String,
}

// ============================================================================
// Rule tables
// ============================================================================

struct Rule {
    kind: CodeItemKind,
    regex: Regex,
    /// Only applies to `.jsx`/`.tsx` files.
    jsx_only: bool,
}

fn rule(kind: CodeItemKind, pattern: &str) -> Rule {
    Rule {
        kind,
        regex: Regex::new(pattern).expect("Invalid regex"),
        jsx_only: false,
    }
}

fn jsx_rule(kind: CodeItemKind, pattern: &str) -> Rule {
    Rule {
        jsx_only: true,
        ..rule(kind, pattern)
    }
}

use CodeItemKind::{ApiRoute, Class, Component, Config, Function, Interface};

fn js_rules() -> Vec<Rule> {
    vec![
        rule(
            ApiRoute,
            r#"\b(?:app|router|server|api|routes|fastify)\.(?P<verb>get|post|put|patch|delete|head|options|all)\(\s*['"`](?P<path>[^'"`]+)['"`]"#,
        ),
        rule(
            ApiRoute,
            r#"^@(?P<verb>Get|Post|Put|Patch|Delete|Head|Options|All)\((?:\s*['"](?P<path>[^'"]*)['"])?"#,
        ),
        rule(
            Component,
            r"^(?:export\s+(?:default\s+)?)?class\s+(?P<name>[A-Z][\w$]*)\s+extends\s+(?:React\.)?(?:Pure)?Component\b",
        ),
        jsx_rule(
            Component,
            r"^(?:export\s+(?:default\s+)?)?(?:function\s+(?P<name>[A-Z][\w$]*)\s*\((?P<params>[^)]*)\)|const\s+(?P<name2>[A-Z][\w$]*)\s*(?::\s*[^=]+)?=\s*(?:\([^)]*\)|[A-Za-z_$][\w$]*)\s*=>)",
        ),
        rule(
            Interface,
            r"^(?:export\s+)?(?:declare\s+)?interface\s+(?P<name>[A-Za-z_$][\w$]*)",
        ),
        rule(
            Class,
            r"^(?:export\s+(?:default\s+)?)?(?:abstract\s+)?class\s+(?P<name>[A-Za-z_$][\w$]*)",
        ),
        rule(
            Function,
            r"^(?:export\s+(?:default\s+)?)?(?:async\s+)?function\s*\*?\s*(?P<name>[A-Za-z_$][\w$]*)\s*(?:<[^>]*>)?\s*\((?P<params>[^)]*)\)(?:\s*:\s*(?P<ret>[^{]+?))?\s*(?:\{.*)?$",
        ),
        rule(
            Function,
            r"^(?:export\s+(?:default\s+)?)?(?:async\s+)?function\s*\*?\s*(?P<name>[A-Za-z_$][\w$]*)",
        ),
        rule(
            Config,
            r"^(?:export\s+)?const\s+(?P<name>[A-Z][A-Z0-9_]{2,})\s*(?::\s*[^=]+)?=",
        ),
        rule(
            Function,
            r"^(?:export\s+)?(?:const|let|var)\s+(?P<name>[A-Za-z_$][\w$]*)\s*(?::\s*[^=]+)?=\s*(?:async\s+)?(?:\((?P<params>[^)]*)\)|(?P<param>[A-Za-z_$][\w$]*))\s*(?::\s*(?P<ret>[^=]+?))?\s*=>",
        ),
        rule(
            Function,
            r"^(?:(?:public|private|protected|static|async|readonly|override)\s+)*(?P<name>[A-Za-z_$][\w$]*)\s*\((?P<params>[^)]*)\)\s*(?::\s*(?P<ret>[^{]+?))?\s*\{\s*$",
        ),
    ]
}

fn component_rules() -> Vec<Rule> {
    let mut rules = vec![rule(
        Component,
        r"^export\s+default\s+(?:defineComponent\(\s*)?\{",
    )];
    rules.extend(js_rules());
    rules
}

fn python_rules() -> Vec<Rule> {
    vec![
        rule(
            ApiRoute,
            r#"^@\w+\.(?P<verb>get|post|put|patch|delete|route|api_route)\(\s*['"](?P<path>[^'"]+)['"]"#,
        ),
        rule(
            ApiRoute,
            r#"^(?:re_)?path\(\s*r?['"](?P<path>[^'"]*)['"]"#,
        ),
        rule(Class, r"^class\s+(?P<name>[A-Za-z_]\w*)"),
        rule(
            Function,
            r"^(?:async\s+)?def\s+(?P<name>[A-Za-z_]\w*)\s*\((?P<params>[^)]*)\)(?:\s*->\s*(?P<ret>[^:]+?))?\s*:",
        ),
        rule(Function, r"^(?:async\s+)?def\s+(?P<name>[A-Za-z_]\w*)\s*\("),
        rule(Config, r"^(?P<name>[A-Z][A-Z0-9_]{2,})\s*(?::\s*[^=]+)?="),
    ]
}

fn rust_rules() -> Vec<Rule> {
    vec![
        rule(
            ApiRoute,
            r#"^#\[(?:actix_web::)?(?P<verb>get|post|put|patch|delete|head)\(\s*"(?P<path>[^"]+)""#,
        ),
        rule(
            ApiRoute,
            r#"\.route\(\s*"(?P<path>[^"]+)"\s*,\s*(?:[\w:]+::)?(?P<verb>get|post|put|patch|delete|head|any)\b"#,
        ),
        rule(
            Interface,
            r"^(?:pub(?:\([^)]*\))?\s+)?(?:unsafe\s+)?trait\s+(?P<name>[A-Za-z_]\w*)",
        ),
        rule(
            Class,
            r"^(?:pub(?:\([^)]*\))?\s+)?(?:struct|enum|union)\s+(?P<name>[A-Za-z_]\w*)",
        ),
        rule(
            Config,
            r"^(?:pub(?:\([^)]*\))?\s+)?(?:const|static)\s+(?P<name>[A-Z][A-Z0-9_]*)\s*:",
        ),
        rule(
            Function,
            r#"^(?:pub(?:\([^)]*\))?\s+)?(?:const\s+)?(?:async\s+)?(?:unsafe\s+)?(?:extern\s+"[^"]*"\s+)?fn\s+(?P<name>[A-Za-z_]\w*)\s*(?:<[^(]*>)?\s*\((?P<params>[^)]*)\)(?:\s*->\s*(?P<ret>[^{;]+?))?\s*(?:where\b.*|\{.*|;)?$"#,
        ),
        rule(
            Function,
            r#"^(?:pub(?:\([^)]*\))?\s+)?(?:const\s+)?(?:async\s+)?(?:unsafe\s+)?(?:extern\s+"[^"]*"\s+)?fn\s+(?P<name>[A-Za-z_]\w*)"#,
        ),
    ]
}

fn go_rules() -> Vec<Rule> {
    vec![
        rule(
            ApiRoute,
            r#"\.(?P<verb>GET|POST|PUT|PATCH|DELETE|HEAD|Get|Post|Put|Patch|Delete|Head)\(\s*"(?P<path>[^"]+)""#,
        ),
        rule(ApiRoute, r#"\.(?:HandleFunc|Handle)\(\s*"(?P<path>[^"]+)""#),
        rule(Interface, r"^type\s+(?P<name>\w+)\s+interface\b"),
        rule(Class, r"^type\s+(?P<name>\w+)\s+struct\b"),
        rule(
            Function,
            r"^func\s+(?:\([^)]*\)\s*)?(?P<name>\w+)\s*(?:\[[^\]]*\])?\s*\((?P<params>[^)]*)\)\s*(?P<ret>[^{]*?)\s*\{?\s*$",
        ),
        rule(Function, r"^func\s+(?:\([^)]*\)\s*)?(?P<name>\w+)"),
    ]
}

fn jvm_rules() -> Vec<Rule> {
    vec![
        rule(
            ApiRoute,
            r#"^@(?P<verb>Get|Post|Put|Patch|Delete|Request)Mapping(?:\(\s*(?:(?:value|path)\s*=\s*)?"(?P<path>[^"]*)")?"#,
        ),
        rule(
            ApiRoute,
            r#"^\[Http(?P<verb>Get|Post|Put|Patch|Delete)(?:\(\s*"(?P<path>[^"]*)"\s*\))?\]"#,
        ),
        rule(
            Interface,
            r"^(?:(?:public|private|protected|internal|sealed|abstract|static|fun)\s+)*interface\s+(?P<name>\w+)",
        ),
        rule(
            Class,
            r"^(?:(?:public|private|protected|internal|abstract|final|static|sealed|data|open|partial|enum)\s+)*(?:class|record|object|enum|struct)\s+(?P<name>\w+)",
        ),
        rule(
            Function,
            r"^(?:(?:public|private|protected|internal|override|suspend|open|inline|operator)\s+)*fun\s+(?:<[^>]*>\s*)?(?:[\w.]+\.)?(?P<name>\w+)\s*\((?P<params>[^)]*)\)(?:\s*:\s*(?P<ret>[^={]+?))?\s*(?:[={].*)?$",
        ),
        rule(
            Function,
            r"^(?:(?:public|private|protected|internal|static|final|abstract|synchronized|async|override|virtual)\s+)+(?P<ret>[\w<>\[\],.?]+)\s+(?P<name>\w+)\s*\((?P<params>[^)]*)\)",
        ),
    ]
}

fn ruby_rules() -> Vec<Rule> {
    vec![
        rule(
            ApiRoute,
            r#"^(?P<verb>get|post|put|patch|delete)\s+['"](?P<path>[^'"]+)['"]"#,
        ),
        rule(Class, r"^(?:class|module)\s+(?P<name>[A-Z][\w:]*)"),
        rule(
            Function,
            r"^def\s+(?:self\.)?(?P<name>\w+[!?=]?)(?:\s*\((?P<params>[^)]*)\))?",
        ),
    ]
}

fn php_rules() -> Vec<Rule> {
    vec![
        rule(
            ApiRoute,
            r#"Route::(?P<verb>get|post|put|patch|delete|any)\(\s*['"](?P<path>[^'"]+)['"]"#,
        ),
        rule(Interface, r"^(?:interface|trait)\s+(?P<name>\w+)"),
        rule(
            Class,
            r"^(?:(?:abstract|final|readonly)\s+)*class\s+(?P<name>\w+)",
        ),
        rule(
            Function,
            r"^(?:(?:public|private|protected|static|abstract|final)\s+)*function\s+(?P<name>\w+)\s*\((?P<params>[^)]*)\)(?:\s*:\s*(?P<ret>[?\w\\]+))?",
        ),
    ]
}

fn swift_rules() -> Vec<Rule> {
    vec![
        rule(
            Interface,
            r"^(?:(?:public|private|internal|open|fileprivate)\s+)*protocol\s+(?P<name>\w+)",
        ),
        rule(
            Class,
            r"^(?:(?:public|private|internal|open|final|fileprivate)\s+)*(?:class|struct|enum|actor)\s+(?P<name>\w+)",
        ),
        rule(
            Function,
            r"^(?:(?:public|private|internal|open|static|override|final|fileprivate|mutating|@\w+)\s+)*func\s+(?P<name>\w+)\s*(?:<[^>]*>)?\((?P<params>[^)]*)\)(?:\s*(?:async\s+)?(?:throws\s+)?->\s*(?P<ret>[^{]+?))?\s*\{?\s*$",
        ),
    ]
}

fn c_family_rules() -> Vec<Rule> {
    vec![
        rule(
            Class,
            r"^(?:class|struct)\s+(?P<name>\w+)\s*(?::[^;]*)?\{?\s*$",
        ),
        rule(
            Function,
            r"^(?:(?:static|inline|extern|virtual|const|unsigned|signed)\s+)*(?P<ret>[\w:<>]+(?:\s*[*&]+)?)\s+[*&]*(?P<name>[\w:~]+)\s*\((?P<params>[^)]*)\)\s*(?:const\s*)?\{?\s*$",
        ),
    ]
}

fn other_rules() -> Vec<Rule> {
    vec![
        rule(
            Function,
            r"(?i)^create\s+(?:or\s+replace\s+)?(?:function|procedure)\s+(?P<name>[\w.]+)",
        ),
        rule(
            Class,
            r"(?i)^create\s+table\s+(?:if\s+not\s+exists\s+)?(?P<name>[\w.]+)",
        ),
        rule(
            Function,
            r"^(?:function\s+)?(?P<name>[A-Za-z_][\w-]*)\s*\(\)\s*\{",
        ),
        rule(
            Function,
            r"^(?:def|fun|func|fn|sub)\s+(?P<name>[A-Za-z_]\w*)",
        ),
        rule(
            Class,
            r"^(?:(?:abstract|final|sealed|case)\s+)*class\s+(?P<name>[A-Za-z_]\w*)",
        ),
    ]
}

static RULES: OnceLock<HashMap<LanguageHint, Vec<Rule>>> = OnceLock::new();

fn rules_for(lang: LanguageHint) -> &'static [Rule] {
    let table = RULES.get_or_init(|| {
        let js = js_rules;
        HashMap::from([
            (LanguageHint::JavaScript, js()),
            (LanguageHint::TypeScript, js()),
            (LanguageHint::Component, component_rules()),
            (LanguageHint::Python, python_rules()),
            (LanguageHint::Rust, rust_rules()),
            (LanguageHint::Go, go_rules()),
            (LanguageHint::Java, jvm_rules()),
            (LanguageHint::Kotlin, jvm_rules()),
            (LanguageHint::CSharp, jvm_rules()),
            (LanguageHint::Ruby, ruby_rules()),
            (LanguageHint::Php, php_rules()),
            (LanguageHint::Swift, swift_rules()),
            (LanguageHint::CFamily, c_family_rules()),
            (LanguageHint::Other, other_rules()),
        ])
    });
    table.get(&lang).map(Vec::as_slice).unwrap_or(&[])
}

/// Control-flow words that the method-shaped patterns would otherwise pick up.
const RESERVED_NAMES: &[&str] = &[
    "if", "for", "while", "switch", "catch", "return", "else", "do", "try", "new", "typeof",
    "sizeof", "function", "await", "with", "elif", "until", "unless", "super", "this",
];

// ============================================================================
// Detection
// ============================================================================

/// Detect constructs in one source file.
///
/// `file_path` is the workspace-relative path recorded on each item and
/// `docs_dir` the documentation directory used for suggested doc paths.
pub fn detect_constructs(
    file_path: &str,
    content: &str,
    lang: LanguageHint,
    docs_dir: &str,
) -> Vec<CodeItem> {
    let rules = rules_for(lang);
    let jsx = is_jsx_path(Path::new(file_path));
    let lines: Vec<&str> = content.lines().collect();
    let mut items = Vec::new();

    for (idx, raw) in lines.iter().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.len() > MAX_LINE_LEN || is_comment_line(line, lang) {
            continue;
        }

        for rule in rules.iter().filter(|r| jsx || !r.jsx_only) {
            let Some(caps) = rule.regex.captures(line) else {
                continue;
            };
            let Some(item) = build_item(rule.kind, &caps, file_path, idx, line, docs_dir) else {
                continue;
            };
            let has_documentation = has_doc_comment(&lines, idx, lang);
            items.push(CodeItem {
                has_documentation,
                ..item
            });
            break;
        }
    }

    items
}

fn is_comment_line(line: &str, lang: LanguageHint) -> bool {
    if line.starts_with("//") || line.starts_with("/*") || line.starts_with('*') {
        return true;
    }
    line.starts_with('#') && !line.starts_with("#[") && lang != LanguageHint::CFamily
}

fn build_item(
    kind: CodeItemKind,
    caps: &Captures<'_>,
    file_path: &str,
    idx: usize,
    line: &str,
    docs_dir: &str,
) -> Option<CodeItem> {
    let group = |name: &str| caps.name(name).map(|m| m.as_str().trim());

    let name = if kind == ApiRoute {
        route_name(group("verb"), group("path").unwrap_or(""))
    } else {
        let name = group("name")
            .or_else(|| group("name2"))
            .map(str::to_string)
            .or_else(|| file_stem(file_path))?;
        if RESERVED_NAMES.contains(&name.as_str()) {
            return None;
        }
        name
    };

    let parameters = group("params")
        .map(split_parameters)
        .or_else(|| group("param").map(|p| vec![p.to_string()]));
    let return_type = group("ret")
        .map(|r| r.trim_end_matches('{').trim().to_string())
        .filter(|r| !r.is_empty());

    let priority = priority_for(kind, &name);
    let suggested_doc_path = suggested_doc_path(kind, file_path, docs_dir);

    Some(CodeItem {
        kind,
        name,
        file_path: file_path.to_string(),
        line: idx + 1,
        signature: line.chars().take(MAX_SIGNATURE_CHARS).collect(),
        parameters,
        return_type,
        priority,
        has_documentation: false,
        suggested_doc_path,
    })
}

/// Build a route name such as `GET /users`.
fn route_name(verb: Option<&str>, path: &str) -> String {
    // Go 1.22 patterns carry the method inside the path string: "GET /users".
    let (verb, path) = match path.split_once(' ') {
        Some((v, p)) if verb.is_none() && v.chars().all(|c| c.is_ascii_uppercase()) => {
            (Some(v), p.trim())
        }
        _ => (verb, path),
    };

    let verb = match verb.map(str::to_ascii_lowercase).as_deref() {
        None | Some("route") | Some("api_route") | Some("all") | Some("any") | Some("request") => {
            "ANY".to_string()
        }
        Some(v) => v.to_ascii_uppercase(),
    };

    let path = if path.is_empty() {
        "/".to_string()
    } else if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    };

    format!("{} {}", verb, path)
}

/// Split a raw parameter list on top-level commas, dropping receivers.
fn split_parameters(raw: &str) -> Vec<String> {
    let mut params = Vec::new();
    let mut depth = 0i32;
    let mut current = String::new();

    for c in raw.chars() {
        match c {
            '(' | '<' | '[' | '{' => depth += 1,
            ')' | '>' | ']' | '}' => depth -= 1,
            ',' if depth <= 0 => {
                params.push(std::mem::take(&mut current));
                continue;
            }
            _ => {}
        }
        current.push(c);
    }
    params.push(current);

    params
        .into_iter()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .filter(|p| !matches!(p.as_str(), "self" | "&self" | "&mut self" | "mut self" | "cls"))
        .collect()
}

fn file_stem(file_path: &str) -> Option<String> {
    Path::new(file_path)
        .file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
}

/// Whether a doc-comment marker appears in the lines preceding `idx`.
fn has_doc_comment(lines: &[&str], idx: usize, lang: LanguageHint) -> bool {
    let start = idx.saturating_sub(DOC_COMMENT_LOOKBACK);
    lines[start..idx].iter().any(|l| {
        let l = l.trim_start();
        l.starts_with("///")
            || l.starts_with("/**")
            || l.starts_with("//!")
            || l.starts_with("\"\"\"")
            || l.starts_with("'''")
            || (lang.uses_hash_comments() && l.starts_with("# "))
            || (lang == LanguageHint::Go && l.starts_with("// "))
    })
}

/// Priority of a construct: routes are always high, otherwise decided by name keywords.
pub fn priority_for(kind: CodeItemKind, name: &str) -> Priority {
    if kind == ApiRoute {
        return Priority::High;
    }
    let lower = name.to_lowercase();
    if ["auth", "user", "main", "core"]
        .iter()
        .any(|k| lower.contains(k))
    {
        Priority::High
    } else if ["util", "helper", "service", "manager"]
        .iter()
        .any(|k| lower.contains(k))
    {
        Priority::Medium
    } else {
        Priority::Low
    }
}

/// Where documentation for a construct of `kind` in `file_path` belongs.
pub fn suggested_doc_path(kind: CodeItemKind, file_path: &str, docs_dir: &str) -> String {
    match kind {
        ApiRoute => format!("{}/API.md", docs_dir),
        Class | Interface => format!("{}/ARCHITECTURE.md", docs_dir),
        Component => format!(
            "{}/components/{}.md",
            docs_dir,
            file_stem(file_path).unwrap_or_else(|| "index".to_string())
        ),
        Function | Config => format!(
            "{}/reference/{}.md",
            docs_dir,
            file_stem(file_path).unwrap_or_else(|| "index".to_string())
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detect(path: &str, content: &str, lang: LanguageHint) -> Vec<CodeItem> {
        detect_constructs(path, content, lang, "docs")
    }

    #[test]
    fn test_express_route_on_line_twelve() {
        let mut content = String::new();
        for i in 1..12 {
            content.push_str(&format!("// line {}\n", i));
        }
        content.push_str("router.get(\"/users\", handler)\n");

        let items = detect("src/routes.js", &content, LanguageHint::JavaScript);
        assert_eq!(items.len(), 1);
        let item = &items[0];
        assert_eq!(item.kind, CodeItemKind::ApiRoute);
        assert_eq!(item.name, "GET /users");
        assert_eq!(item.priority, Priority::High);
        assert_eq!(item.line, 12);
        assert_eq!(item.suggested_doc_path, "docs/API.md");
    }

    #[test]
    fn test_first_matching_rule_wins() {
        // A route registration whose handler is an arrow function must not
        // also be reported as a function.
        let items = detect(
            "server.ts",
            "app.post('/login', async (req, res) => {\n",
            LanguageHint::TypeScript,
        );
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "POST /login");
    }

    #[test]
    fn test_js_function_forms() {
        let content = "export async function loadUser(id: string, opts?: Options): Promise<User> {\n\
                       const formatDate = (d, fmt) => d.toString();\n\
                       if (ready) {\n\
                       class Store {\n\
                       export interface Props {\n";
        let items = detect("src/user.ts", content, LanguageHint::TypeScript);
        let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["loadUser", "formatDate", "Store", "Props"]);

        let load = &items[0];
        assert_eq!(
            load.parameters.as_deref(),
            Some(&["id: string".to_string(), "opts?: Options".to_string()][..])
        );
        assert_eq!(load.return_type.as_deref(), Some("Promise<User>"));
        assert_eq!(load.priority, Priority::High);
        assert_eq!(items[2].kind, CodeItemKind::Class);
        assert_eq!(items[3].kind, CodeItemKind::Interface);
    }

    #[test]
    fn test_jsx_components_only_in_jsx_files() {
        let content = "export default function UserCard({ user }) {\n";
        let tsx = detect("src/UserCard.tsx", content, LanguageHint::TypeScript);
        assert_eq!(tsx[0].kind, CodeItemKind::Component);
        assert_eq!(tsx[0].suggested_doc_path, "docs/components/UserCard.md");

        let ts = detect("src/UserCard.ts", content, LanguageHint::TypeScript);
        assert_eq!(ts[0].kind, CodeItemKind::Function);
    }

    #[test]
    fn test_python_routes_and_docs() {
        let content = "# Authenticates the caller.\n\
                       @app.post(\"/auth/login\")\n\
                       def login(request, payload: dict) -> Response:\n\
                       \n\
                       class UserService:\n";
        let items = detect("api/auth.py", content, LanguageHint::Python);
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].name, "POST /auth/login");
        assert!(items[0].has_documentation);
        assert_eq!(items[1].name, "login");
        assert_eq!(items[1].return_type.as_deref(), Some("Response"));
        assert_eq!(items[2].kind, CodeItemKind::Class);
        assert_eq!(items[2].suggested_doc_path, "docs/ARCHITECTURE.md");
    }

    #[test]
    fn test_rust_constructs() {
        let content = "/// Loads the config.\n\
                       pub fn load_config(&self, path: &Path) -> Result<Config, Error> {\n\
                       #[get(\"/health\")]\n\
                       pub struct Engine {\n\
                       pub trait Store {\n\
                       const MAX_ITEMS: usize = 10;\n\
                       .route(\"/users\", get(list_users))\n";
        let items = detect("src/lib.rs", content, LanguageHint::Rust);
        let kinds: Vec<CodeItemKind> = items.iter().map(|i| i.kind).collect();
        assert_eq!(
            kinds,
            vec![Function, ApiRoute, Class, Interface, Config, ApiRoute]
        );
        assert!(items[0].has_documentation);
        assert_eq!(
            items[0].parameters.as_deref(),
            Some(&["path: &Path".to_string()][..])
        );
        assert_eq!(items[0].return_type.as_deref(), Some("Result<Config, Error>"));
        assert_eq!(items[1].name, "GET /health");
        assert_eq!(items[5].name, "GET /users");
    }

    #[test]
    fn test_go_and_java_routes() {
        let go = detect(
            "main.go",
            "r.GET(\"/items\", list)\nmux.HandleFunc(\"POST /items\", create)\nfunc main() {\n",
            LanguageHint::Go,
        );
        assert_eq!(go[0].name, "GET /items");
        assert_eq!(go[1].name, "POST /items");
        assert_eq!(go[2].name, "main");
        assert_eq!(go[2].priority, Priority::High);

        let java = detect(
            "UserController.java",
            "@GetMapping(\"/users/{id}\")\npublic User findUser(Long id) {\n",
            LanguageHint::Java,
        );
        assert_eq!(java[0].name, "GET /users/{id}");
        assert_eq!(java[1].name, "findUser");
        assert_eq!(java[1].return_type.as_deref(), Some("User"));
    }

    #[test]
    fn test_doc_comment_lookback_window() {
        let mut content = String::from("/** Far away. */\n");
        for _ in 0..10 {
            content.push('\n');
        }
        content.push_str("function far() {\n");
        let items = detect("a.js", &content, LanguageHint::JavaScript);
        assert_eq!(items.len(), 1);
        assert!(!items[0].has_documentation);
    }

    #[test]
    fn test_priority_keywords() {
        assert_eq!(priority_for(Function, "checkAuthToken"), Priority::High);
        assert_eq!(priority_for(Function, "StringUtils"), Priority::Medium);
        assert_eq!(priority_for(Function, "render"), Priority::Low);
        assert_eq!(priority_for(ApiRoute, "GET /x"), Priority::High);
    }

    #[test]
    fn test_priority_ordering() {
        let mut ps = vec![Priority::Low, Priority::High, Priority::Medium];
        ps.sort();
        assert_eq!(ps, vec![Priority::High, Priority::Medium, Priority::Low]);
    }
}
