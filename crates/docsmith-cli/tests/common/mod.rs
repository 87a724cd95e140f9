//! Shared test utilities for docsmith-cli integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::Path;

use assert_cmd::Command;

/// Get a Command for the docsmith binary.
///
/// Colors are off and the global config points at a file that does not
/// exist, so the user's `~/.docsmith/config.yaml` never leaks into a test.
///
/// # Panics
///
/// Panics if the docsmith binary cannot be found.
#[allow(deprecated)]
pub fn docsmith_cmd() -> Command {
    let mut cmd = Command::cargo_bin("docsmith").expect("docsmith binary should exist");
    cmd.env("NO_COLOR", "1")
        .env("DOCSMITH_CONFIG", "/nonexistent/docsmith/config.yaml")
        .env_remove("DOCSMITH_ROOT")
        .env_remove("DOCSMITH_VERBOSE")
        .env_remove("DOCSMITH_QUIET");
    cmd
}

/// Write a file relative to the workspace, creating parent directories.
pub fn write_file(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dirs");
    }
    fs::write(path, content).expect("write file");
}

/// A small Express-style project with no documentation.
pub fn setup_node_project(root: &Path) {
    fs::create_dir_all(root.join(".git")).expect("create .git");
    write_file(
        root,
        "package.json",
        r#"{"name":"shop","dependencies":{"express":"^4.18.0"}}"#,
    );
    write_file(
        root,
        "src/routes/users.js",
        "const router = require('express').Router();\nrouter.get('/users', listUsers);\nmodule.exports = router;\n",
    );
    write_file(
        root,
        "src/services/user.js",
        "class UserService {\n  find(id) { return id; }\n}\nmodule.exports = UserService;\n",
    );
}
