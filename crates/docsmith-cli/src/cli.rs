//! CLI definition and command dispatch for docsmith.
//!
//! This module defines the command-line interface using `clap` and provides
//! the `run()` function that dispatches commands to the engine.
//!
//! ## Configuration Precedence
//!
//! Configuration is resolved with the following precedence (highest to lowest):
//! 1. CLI flags (e.g., `--config`, `--root`)
//! 2. Environment variables (`DOCSMITH_CONFIG`, `DOCSMITH_ROOT`, ...)
//! 3. Project config (`<root>/.docsmith/config.yaml`) over the global config
//!    (`~/.docsmith/config.yaml` or the path from `--config`)
//! 4. Built-in defaults

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};

use crate::ui::color::terminal_width;
use crate::ui::{format, table, ColorMode, MessageType, Progress, ProgressMode, Style};

use docsmith_core::{
    diff_stats, encode_response, parse_request, select_tasks, ChangeMetadata, ChangeStatus,
    DocsmithEngine, DocsmithError, GenerationControl, GenerationOptions, GlobalConfig,
    ManualAction, ProjectConfig, Response, TaskType, Workspace,
};

// ============================================================================
// CLI Definition
// ============================================================================

/// Version string including git commit hash
const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_HASH"), ")");

/// docsmith – find missing documentation and track every doc change
#[derive(Parser, Debug)]
#[command(name = "docsmith")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true, env = "DOCSMITH_VERBOSE")]
    pub verbose: bool,

    /// Suppress progress and informational messages
    #[arg(short, long, global = true, env = "DOCSMITH_QUIET")]
    pub quiet: bool,

    /// Path to configuration file (default: ~/.docsmith/config.yaml)
    #[arg(long, global = true, env = "DOCSMITH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Color output mode: always, never, or auto (default: auto)
    #[arg(long, global = true, env = "DOCSMITH_COLOR", default_value = "auto")]
    pub color: String,

    /// Workspace directory (default: current directory)
    #[arg(long, global = true, env = "DOCSMITH_ROOT")]
    pub root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyze the workspace: structure, domains, coverage, and tasks
    #[command(after_help = r#"EXAMPLES:
    # Analyze the current directory
    docsmith analyze

    # Analyze another project as JSON
    docsmith analyze --root ../api --json | jq '.structure.coverage'
"#)]
    Analyze {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// List documentation tasks (missing and outdated docs)
    Tasks {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Generate every missing document and track each write
    #[command(after_help = r#"EXAMPLES:
    # See what would be generated
    docsmith generate --dry-run

    # Generate missing docs and refresh outdated ones
    docsmith generate --include-outdated

    # Undo one generated file
    docsmith revert <id>
"#)]
    Generate {
        /// Also regenerate outdated documents
        #[arg(long)]
        include_outdated: bool,

        /// List the documents without writing anything
        #[arg(long)]
        dry_run: bool,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// List tracked changes, newest first
    Changes {
        /// Only show changes in this status (pending, applied, reverted)
        #[arg(long, value_parser = parse_status)]
        status: Option<ChangeStatus>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Show one change record
    Show {
        /// Change id, unique prefix (6+ chars), or `latest`
        id: String,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Print a change's diff as Markdown
    Diff {
        /// Change id, unique prefix (6+ chars), or `latest`
        id: String,
    },

    /// Write a pending or reverted change to disk
    Apply {
        /// Change id, unique prefix (6+ chars), or `latest`
        id: String,
    },

    /// Undo an applied change
    Revert {
        /// Change id, unique prefix (6+ chars), or `latest`
        id: String,
    },

    /// Propose a change without touching the file
    #[command(after_help = r#"EXAMPLES:
    # Propose a rewrite of the README
    docsmith track --file README.md --original README.md --new /tmp/README.new.md

    # Propose a new file, then apply it
    docsmith track --file docs/FAQ.md --new faq-draft.md --title "Add FAQ"
    docsmith apply latest
"#)]
    Track {
        /// Target file (workspace-relative)
        #[arg(long)]
        file: String,

        /// Short title
        #[arg(long, default_value = "")]
        title: String,

        /// Longer description
        #[arg(long, default_value = "")]
        description: String,

        /// File holding the current content
        #[arg(long, value_name = "FILE")]
        original: Option<PathBuf>,

        /// File holding the proposed content
        #[arg(long = "new", value_name = "FILE")]
        new_content: Option<PathBuf>,
    },

    /// Show change counts by status
    Stats {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Delete every change record (files are left as they are)
    Clear,

    /// Answer JSON-lines requests on stdin, one reply per line on stdout
    #[command(after_help = r#"EXAMPLES:
    echo '{"command":"getChangeStats"}' | docsmith serve
"#)]
    Serve,

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate configuration files and report errors/warnings
    Check {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Show resolved configuration (global merged with project)
    Show {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
}

fn parse_status(s: &str) -> Result<ChangeStatus, String> {
    s.parse()
}

// ============================================================================
// Run function
// ============================================================================

/// Run the CLI application.
///
/// Returns `ExitCode::SUCCESS` on success, or `ExitCode::FAILURE` on error.
pub fn run() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr so `serve` keeps stdout for replies.
    let log_level = if cli.verbose { "debug" } else { "warn" };
    let filter = format!("docsmith_core={},docsmith_cli={}", log_level, log_level);
    tracing_subscriber::fmt()
        .with_env_filter(&filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let color_mode = ColorMode::parse(&cli.color).unwrap_or_default();
    let style = Style::new(color_mode);
    let root = cli.root.clone().unwrap_or_else(|| PathBuf::from("."));

    if let Command::Config { action } = &cli.command {
        return finish(&style, handle_config(&style, cli.config.as_deref(), &root, action));
    }

    let global = match load_global_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            let hint = match &cli.config {
                Some(path) => format!("Check your config at {}", path.display()),
                None => "Check your global config at ~/.docsmith/config.yaml".to_string(),
            };
            eprintln!(
                "{}",
                style.error_with_context("Failed to load configuration", Some(&e.to_string()), Some(&hint))
            );
            return ExitCode::FAILURE;
        }
    };

    tracing::debug!(root = %root.display(), "opening workspace");
    let mut engine = match DocsmithEngine::open(Some(&root), global) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!(
                "{}",
                style.error_with_context(
                    "Failed to open workspace",
                    Some(&e.to_string()),
                    Some("Run docsmith inside a project directory or pass --root"),
                )
            );
            return ExitCode::FAILURE;
        }
    };

    let quiet = cli.quiet;
    let result = match cli.command {
        Command::Analyze { json } => handle_analyze(&style, &engine, quiet, json),
        Command::Tasks { json } => handle_tasks(&style, &engine, quiet, json),
        Command::Generate {
            include_outdated,
            dry_run,
            json,
        } => handle_generate(&style, &mut engine, include_outdated, dry_run, quiet, json),
        Command::Changes { status, json } => handle_changes(&style, &engine, status, json),
        Command::Show { id, json } => handle_show(&style, &engine, &id, json),
        Command::Diff { id } => handle_diff(&style, &engine, &id),
        Command::Apply { id } => handle_apply(&style, &mut engine, &id),
        Command::Revert { id } => handle_revert(&style, &mut engine, &id),
        Command::Track {
            file,
            title,
            description,
            original,
            new_content,
        } => handle_track(&style, &mut engine, file, title, description, original, new_content),
        Command::Stats { json } => handle_stats(&style, &engine, json),
        Command::Clear => handle_clear(&style, &mut engine),
        Command::Serve => handle_serve(&mut engine),
        Command::Config { action } => handle_config(&style, cli.config.as_deref(), &root, &action),
    };

    finish(&style, result)
}

fn finish(style: &Style, result: anyhow::Result<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", style.message(MessageType::Err, &format!("{:#}", e)));
            ExitCode::FAILURE
        }
    }
}

fn load_global_config(path: Option<&Path>) -> Result<GlobalConfig, DocsmithError> {
    match path {
        Some(path) => GlobalConfig::from_path(path),
        None => GlobalConfig::load_default(),
    }
}

// ============================================================================
// Analysis commands
// ============================================================================

fn handle_analyze(style: &Style, engine: &DocsmithEngine, quiet: bool, json: bool) -> anyhow::Result<()> {
    let progress = Progress::scanning(ProgressMode::detect(quiet, json));
    let analysis = engine.analyze_workspace()?;
    progress.clear();

    if json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
        return Ok(());
    }

    let s = &analysis.structure;
    println!(
        "{}",
        style.message(
            MessageType::Ok,
            &format!(
                "Analyzed {} ({} files)",
                analysis.project_name,
                format::format_thousands(s.total_files as u64)
            )
        )
    );
    println!("{}", style.message_detail("Framework", &s.framework));
    println!("{}", style.message_detail("Architecture", &s.architecture));
    let layers: Vec<&str> = [
        (s.has_frontend, "frontend"),
        (s.has_backend, "backend"),
        (s.has_database, "database"),
        (s.has_tests, "tests"),
    ]
    .iter()
    .filter(|(present, _)| *present)
    .map(|(_, name)| *name)
    .collect();
    if !layers.is_empty() {
        println!("{}", style.message_detail("Layers", &layers.join(", ")));
    }
    println!(
        "{}",
        style.message_detail(
            "Coverage",
            &format!("{}% ({} docs / {} files)", s.coverage, s.doc_files, s.total_files)
        )
    );
    println!(
        "{}",
        style.message_detail(
            "Constructs",
            &format!(
                "{} ({} endpoints, {} undocumented)",
                analysis.code_items.len(),
                analysis.endpoints().count(),
                analysis.undocumented_items()
            )
        )
    );

    println!();
    println!("{}", style.section("FILES"));
    println!("{}", table::render_file_types_table(&analysis.file_types));

    if !s.domains.is_empty() {
        println!();
        println!("{}", style.section("DOMAINS"));
        println!("{}", table::render_domains_table(&s.domains));
    }

    for skipped in &analysis.skipped_files {
        println!(
            "{}",
            style.message(
                MessageType::Skip,
                &format!("{}: {}", style.file_path(&skipped.path), skipped.reason)
            )
        );
    }

    if !quiet && !analysis.tasks.is_empty() {
        println!();
        println!(
            "{}",
            style.message(
                MessageType::Hint,
                &format!(
                    "{} documentation task(s). Run `docsmith tasks` to list them.",
                    analysis.tasks.len()
                )
            )
        );
    }
    Ok(())
}

fn handle_tasks(style: &Style, engine: &DocsmithEngine, quiet: bool, json: bool) -> anyhow::Result<()> {
    let analysis = engine.analyze_workspace()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&analysis.tasks)?);
        return Ok(());
    }

    if analysis.tasks.is_empty() {
        println!("{}", style.message(MessageType::Ok, "Documentation is up to date"));
        return Ok(());
    }

    println!("{}", table::render_tasks_table(&analysis.tasks, terminal_width()));

    let missing = analysis.tasks_of_type(TaskType::Missing).count();
    if !quiet && missing > 0 {
        println!();
        println!(
            "{}",
            style.message(
                MessageType::Hint,
                &format!("Run `docsmith generate` to create {} missing document(s).", missing)
            )
        );
    }
    Ok(())
}

fn handle_generate(
    style: &Style,
    engine: &mut DocsmithEngine,
    include_outdated: bool,
    dry_run: bool,
    quiet: bool,
    json: bool,
) -> anyhow::Result<()> {
    let options = GenerationOptions {
        include_outdated: include_outdated || engine.config().generation.include_outdated,
    };

    if dry_run {
        let analysis = engine.analyze_workspace()?;
        let planned = select_tasks(&analysis, options);
        if json {
            println!("{}", serde_json::to_string_pretty(&planned)?);
            return Ok(());
        }
        if planned.is_empty() {
            println!("{}", style.message(MessageType::Info, "Nothing to generate"));
        }
        for task in planned {
            println!(
                "{}",
                style.message(
                    MessageType::Info,
                    &format!(
                        "Would write {} ({}, {})",
                        style.file_path(&task.target),
                        task.task_type,
                        style.priority(task.priority)
                    )
                )
            );
        }
        return Ok(());
    }

    let mode = ProgressMode::detect(quiet, json);
    let mut bar: Option<Progress> = None;
    let report = engine.generate_missing_docs(options, &GenerationControl::new(), &mut |p| {
        bar.get_or_insert_with(|| Progress::generating(p.total, mode))
            .document_done(p.index, p.target);
    })?;
    if let Some(bar) = bar {
        bar.clear();
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if report.planned == 0 {
        println!("{}", style.message(MessageType::Ok, "Nothing to generate"));
    } else {
        println!(
            "{}",
            style.message(
                MessageType::Ok,
                &format!("Generated {} of {} document(s)", report.written.len(), report.planned)
            )
        );
        for doc in &report.written {
            println!(
                "     {} {} ({})",
                style.change_id(doc.change_id.as_str()),
                style.file_path(&doc.target),
                doc.change_type
            );
        }
        for failure in &report.failed {
            println!(
                "{}",
                style.message(
                    MessageType::Warn,
                    &format!("{}: {}", failure.target, failure.message)
                )
            );
        }
        if !quiet && !report.written.is_empty() {
            println!();
            println!(
                "{}",
                style.message(
                    MessageType::Hint,
                    "Review with `docsmith diff <id>`; undo with `docsmith revert <id>`."
                )
            );
        }
    }

    if report.written.is_empty() && !report.failed.is_empty() {
        return Err(anyhow!("{} document(s) failed to generate", report.failed.len()));
    }
    Ok(())
}

// ============================================================================
// Change commands
// ============================================================================

fn handle_changes(
    style: &Style,
    engine: &DocsmithEngine,
    status: Option<ChangeStatus>,
    json: bool,
) -> anyhow::Result<()> {
    let entries: Vec<_> = engine
        .activities()
        .into_iter()
        .filter(|e| status.is_none_or(|s| e.status == s))
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("{}", style.message(MessageType::Info, "No changes recorded"));
        return Ok(());
    }

    println!("{}", table::render_activity_table(&entries, terminal_width()));
    Ok(())
}

fn handle_show(style: &Style, engine: &DocsmithEngine, id: &str, json: bool) -> anyhow::Result<()> {
    let id = engine.resolve_change_id(id)?;
    let record = engine
        .change(&id)
        .ok_or_else(|| DocsmithError::RecordNotFound(id.to_string()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(record)?);
        return Ok(());
    }

    println!("{}", style.section(&record.title));
    println!("{}", style.key_value("Id", record.id.as_str()));
    println!("{}", style.key_value("File", &style.file_path(&record.file_path)));
    println!("{}", style.key_value("Type", &record.change_type.to_string()));
    println!("{}", style.key_value("Status", &style.status(record.status)));
    println!("{}", style.key_value("Origin", &record.origin.to_string()));
    println!(
        "{}",
        style.key_value(
            "Recorded",
            &format!(
                "{} ({})",
                record.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
                format::format_relative_time(record.timestamp)
            )
        )
    );
    if let Some(diff) = &record.diff {
        let (added, removed) = diff_stats(diff);
        println!("{}", style.key_value("Diff", &format!("+{} -{}", added, removed)));
    }
    if let Some(by) = &record.metadata.generated_by {
        println!("{}", style.key_value("Generated by", by));
    }
    if let Some(reason) = &record.metadata.reason {
        println!("{}", style.key_value("Reason", reason));
    }
    if !record.description.is_empty() {
        println!();
        println!("{}", record.description);
    }
    Ok(())
}

fn handle_diff(style: &Style, engine: &DocsmithEngine, id: &str) -> anyhow::Result<()> {
    let id = engine.resolve_change_id(id)?;
    let markdown = engine.view_diff(&id)?;

    let mut in_fence = false;
    for line in markdown.lines() {
        if line.starts_with("```") {
            in_fence = !in_fence;
            println!("{}", line);
        } else if in_fence {
            println!("{}", style.diff_line(line));
        } else {
            println!("{}", line);
        }
    }
    Ok(())
}

fn handle_apply(style: &Style, engine: &mut DocsmithEngine, id: &str) -> anyhow::Result<()> {
    let id = engine.resolve_change_id(id)?;
    let outcome = engine.apply_change(&id);
    if !outcome.success {
        return Err(anyhow!(outcome.message));
    }
    println!("{}", style.message(MessageType::Ok, &outcome.message));
    Ok(())
}

fn handle_revert(style: &Style, engine: &mut DocsmithEngine, id: &str) -> anyhow::Result<()> {
    let id = engine.resolve_change_id(id)?;
    let outcome = engine.revert_change(&id);
    if !outcome.success {
        return Err(anyhow!(outcome.message));
    }
    println!("{}", style.message(MessageType::Ok, &outcome.message));
    Ok(())
}

fn handle_track(
    style: &Style,
    engine: &mut DocsmithEngine,
    file: String,
    title: String,
    description: String,
    original: Option<PathBuf>,
    new_content: Option<PathBuf>,
) -> anyhow::Result<()> {
    let read = |path: Option<PathBuf>| -> anyhow::Result<Option<String>> {
        path.map(|p| {
            fs::read_to_string(&p).with_context(|| format!("Failed to read {}", p.display()))
        })
        .transpose()
    };

    let record = engine.track_manual_action(ManualAction {
        file_path: file,
        title,
        description,
        original_content: read(original)?,
        new_content: read(new_content)?,
        metadata: ChangeMetadata::default().with_generated_by("manual"),
    })?;

    println!(
        "{}",
        style.message(
            MessageType::Ok,
            &format!(
                "Recorded {} change {} for {}",
                record.status,
                style.change_id(record.id.as_str()),
                style.file_path(&record.file_path)
            )
        )
    );
    println!(
        "{}",
        style.message(
            MessageType::Hint,
            &format!("Apply it with `docsmith apply {}`", record.id.short())
        )
    );
    Ok(())
}

fn handle_stats(style: &Style, engine: &DocsmithEngine, json: bool) -> anyhow::Result<()> {
    let stats = engine.change_stats();

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("{}", style.section("CHANGES"));
    println!("{}", style.message_detail("Total", &stats.total.to_string()));
    println!("{}", style.message_detail("Applied", &stats.applied.to_string()));
    println!("{}", style.message_detail("Pending", &stats.pending.to_string()));
    println!("{}", style.message_detail("Reverted", &stats.reverted.to_string()));
    Ok(())
}

fn handle_clear(style: &Style, engine: &mut DocsmithEngine) -> anyhow::Result<()> {
    let count = engine.change_stats().total;
    engine.clear_all_changes()?;
    println!(
        "{}",
        style.message(MessageType::Ok, &format!("Cleared {} change record(s)", count))
    );
    Ok(())
}

fn handle_serve(engine: &mut DocsmithEngine) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();

    for line in stdin.lock().lines() {
        let line = line.context("Failed to read request")?;
        if line.trim().is_empty() {
            continue;
        }
        let response = match parse_request(&line) {
            Ok(request) => engine.handle(request),
            Err(e) => Response::error(e),
        };
        writeln!(stdout, "{}", encode_response(&response)?)?;
        stdout.flush()?;
    }
    Ok(())
}

// ============================================================================
// Config command handler
// ============================================================================

fn handle_config(
    style: &Style,
    config_path: Option<&Path>,
    root: &Path,
    action: &ConfigAction,
) -> anyhow::Result<()> {
    match action {
        ConfigAction::Check { json } => handle_config_check(style, config_path, root, *json),
        ConfigAction::Show { json } => handle_config_show(style, config_path, root, *json),
    }
}

/// Validate configuration files and report errors/warnings.
fn handle_config_check(
    style: &Style,
    config_path: Option<&Path>,
    root: &Path,
    json: bool,
) -> anyhow::Result<()> {
    let global_path = config_path
        .map(Path::to_path_buf)
        .or_else(GlobalConfig::default_path);
    let workspace = Workspace::resolve(root)?;
    let project_path = ProjectConfig::config_path_for_workspace(workspace.root());

    let mut sources = Vec::new();
    let mut warnings = Vec::new();
    let mut errors = Vec::new();

    let global = match &global_path {
        Some(path) => {
            let result = GlobalConfig::from_path(path);
            sources.push((
                "global",
                path.clone(),
                path.exists(),
                result.is_ok(),
            ));
            result.unwrap_or_else(|e| {
                errors.push(e.to_string());
                GlobalConfig::default()
            })
        }
        None => GlobalConfig::default(),
    };

    let project = {
        let result = ProjectConfig::from_path(&project_path);
        sources.push((
            "project",
            project_path.clone(),
            project_path.exists(),
            result.is_ok(),
        ));
        result.unwrap_or_else(|e| {
            errors.push(e.to_string());
            ProjectConfig::default()
        })
    };

    match global.resolve(&project).validate() {
        Ok(w) => warnings.extend(w),
        Err(e) => errors.push(e.to_string()),
    }

    if json {
        let value = serde_json::json!({
            "sources": sources
                .iter()
                .map(|(name, path, exists, valid)| serde_json::json!({
                    "name": name,
                    "path": path,
                    "exists": exists,
                    "valid": valid,
                }))
                .collect::<Vec<_>>(),
            "warnings": warnings,
            "errors": errors,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!(
            "{}",
            style.message(
                MessageType::Info,
                &format!("Checked {} configuration source(s)", sources.len())
            )
        );
        for (name, path, exists, valid) in &sources {
            let mark = match (exists, valid) {
                (false, _) => "-",
                (true, true) => "✓",
                (true, false) => "✗",
            };
            println!("  {} {} ({})", mark, name, path.display());
        }
        println!();

        for warning in &warnings {
            println!("{}", style.message(MessageType::Warn, warning));
        }
        for error in &errors {
            println!("{}", style.message(MessageType::Err, error));
        }

        if errors.is_empty() && warnings.is_empty() {
            println!("{}", style.message(MessageType::Ok, "Configuration is valid"));
        } else if errors.is_empty() {
            println!(
                "{}",
                style.message(MessageType::Ok, "Configuration is valid with warnings")
            );
        }
    }

    if !errors.is_empty() {
        return Err(DocsmithError::InvalidConfiguration {
            message: format!("{} configuration error(s) found", errors.len()),
            hint: "Fix the files listed above and run `docsmith config check` again".to_string(),
        }
        .into());
    }
    Ok(())
}

/// Show resolved configuration (global merged with project).
fn handle_config_show(
    style: &Style,
    config_path: Option<&Path>,
    root: &Path,
    json: bool,
) -> anyhow::Result<()> {
    let global = load_global_config(config_path)?;
    let workspace = Workspace::resolve(root)?;
    let project = ProjectConfig::load_from_workspace(workspace.root())?;
    let resolved = global.resolve(&project);

    if json {
        println!("{}", serde_json::to_string_pretty(&resolved)?);
        return Ok(());
    }

    let a = &resolved.analysis;
    println!("{}", style.message(MessageType::Info, "Resolved configuration:"));
    println!("{}", style.section("analysis"));
    println!(
        "{}",
        style.message_detail("maxFileSizeBytes", &format::format_bytes(a.max_file_size_bytes))
    );
    println!("{}", style.message_detail("minDocLength", &a.min_doc_length.to_string()));
    println!("{}", style.message_detail("docsDir", &a.docs_dir));
    println!(
        "{}",
        style.message_detail(
            "ignoreDirs",
            &if a.ignore_dirs.is_empty() {
                "-".to_string()
            } else {
                a.ignore_dirs.join(", ")
            }
        )
    );
    println!("{}", style.section("generation"));
    println!("{}", style.message_detail("author", &resolved.generation.author));
    println!(
        "{}",
        style.message_detail(
            "includeOutdated",
            &resolved.generation.include_outdated.to_string()
        )
    );
    Ok(())
}
