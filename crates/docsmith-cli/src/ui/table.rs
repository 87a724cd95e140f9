//! Table rendering for CLI output using comfy-table.
//!
//! | Command | Table Function |
//! |---------|----------------|
//! | `docsmith analyze` | `render_domains_table()`, `render_file_types_table()` |
//! | `docsmith tasks` | `render_tasks_table()` |
//! | `docsmith changes` | `render_activity_table()` |

use comfy_table::presets::NOTHING;
use comfy_table::{Cell, CellAlignment, ColumnConstraint, Table, Width};

use docsmith_core::{ActivityEntry, DocTask, FileTypeCounts, ProjectDomain};

use super::format::{format_thousands, truncate_str};

/// Render the documentation task list.
///
/// ```text
/// PRIORITY  TYPE      TITLE                 TARGET
/// high      missing   Create API.md         docs/API.md
/// high      outdated  Update README.md      README.md
/// ```
pub fn render_tasks_table(tasks: &[DocTask], width: usize) -> String {
    if tasks.is_empty() {
        return String::new();
    }

    let mut table = Table::new();
    table.load_preset(NOTHING);
    table.set_header(vec![
        Cell::new("PRIORITY"),
        Cell::new("TYPE"),
        Cell::new("TITLE"),
        Cell::new("TARGET"),
    ]);
    table.set_constraints(vec![
        ColumnConstraint::LowerBoundary(Width::Fixed(8)), // PRIORITY
        ColumnConstraint::LowerBoundary(Width::Fixed(8)), // TYPE
        ColumnConstraint::LowerBoundary(Width::Fixed(16)), // TITLE
        ColumnConstraint::LowerBoundary(Width::Fixed(12)), // TARGET
    ]);

    let target_width = width.saturating_sub(50).max(20);
    for task in tasks {
        table.add_row(vec![
            Cell::new(task.priority.as_str()),
            Cell::new(task.task_type.to_string()),
            Cell::new(truncate_str(&task.title, 36)),
            Cell::new(truncate_str(&task.target, target_width)),
        ]);
    }

    table.trim_fmt().to_string()
}

/// Render detected domains with their member and construct counts.
///
/// ```text
/// DOMAIN           TYPE       FILES  ENDPOINTS  CLASSES  FUNCTIONS  PRIORITY
/// User Management  service        3          2        1          4  high
/// ```
pub fn render_domains_table(domains: &[ProjectDomain]) -> String {
    if domains.is_empty() {
        return String::new();
    }

    let mut table = Table::new();
    table.load_preset(NOTHING);
    table.set_header(vec![
        Cell::new("DOMAIN"),
        Cell::new("TYPE"),
        Cell::new("FILES").set_alignment(CellAlignment::Right),
        Cell::new("ENDPOINTS").set_alignment(CellAlignment::Right),
        Cell::new("CLASSES").set_alignment(CellAlignment::Right),
        Cell::new("FUNCTIONS").set_alignment(CellAlignment::Right),
        Cell::new("PRIORITY"),
    ]);

    for d in domains {
        table.add_row(vec![
            Cell::new(truncate_str(&d.name, 24)),
            Cell::new(d.domain_type.as_str()),
            Cell::new(d.files.len()).set_alignment(CellAlignment::Right),
            Cell::new(d.endpoints.len()).set_alignment(CellAlignment::Right),
            Cell::new(d.classes.len()).set_alignment(CellAlignment::Right),
            Cell::new(d.functions.len()).set_alignment(CellAlignment::Right),
            Cell::new(d.priority.as_str()),
        ]);
    }

    table.trim_fmt().to_string()
}

/// Render per-category file counts with a total row.
pub fn render_file_types_table(counts: &FileTypeCounts) -> String {
    let mut table = Table::new();
    table.load_preset(NOTHING);
    table.set_header(vec![
        Cell::new("CATEGORY"),
        Cell::new("FILES").set_alignment(CellAlignment::Right),
    ]);

    let rows = [
        ("code", counts.code),
        ("documentation", counts.documentation),
        ("configuration", counts.configuration),
        ("assets", counts.assets),
        ("other", counts.other),
        ("total", counts.total()),
    ];
    for (label, n) in rows {
        table.add_row(vec![
            Cell::new(label),
            Cell::new(format_thousands(n as u64)).set_alignment(CellAlignment::Right),
        ]);
    }

    table.trim_fmt().to_string()
}

/// Render the change activity feed, newest first.
///
/// ```text
/// ID        TYPE       STATUS    FILE           WHEN
/// 4f1c2d3e  Generated  Applied   docs/API.md    just now
/// ```
pub fn render_activity_table(entries: &[ActivityEntry], width: usize) -> String {
    if entries.is_empty() {
        return String::new();
    }

    let mut table = Table::new();
    table.load_preset(NOTHING);
    table.set_header(vec![
        Cell::new("ID"),
        Cell::new("TYPE"),
        Cell::new("STATUS"),
        Cell::new("FILE"),
        Cell::new("WHEN"),
    ]);
    table.set_constraints(vec![
        ColumnConstraint::LowerBoundary(Width::Fixed(8)),  // ID
        ColumnConstraint::LowerBoundary(Width::Fixed(9)),  // TYPE
        ColumnConstraint::LowerBoundary(Width::Fixed(8)),  // STATUS
        ColumnConstraint::LowerBoundary(Width::Fixed(12)), // FILE
        ColumnConstraint::LowerBoundary(Width::Fixed(10)), // WHEN
    ]);

    let file_width = width.saturating_sub(48).max(20);
    for e in entries {
        table.add_row(vec![
            Cell::new(e.id.short()),
            Cell::new(&e.type_label),
            Cell::new(&e.status_label),
            Cell::new(truncate_str(&e.file_path, file_width)),
            Cell::new(&e.relative_time),
        ]);
    }

    table.trim_fmt().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use docsmith_core::{Priority, TaskType};

    #[test]
    fn test_empty_tables_render_nothing() {
        assert!(render_tasks_table(&[], 80).is_empty());
        assert!(render_domains_table(&[]).is_empty());
        assert!(render_activity_table(&[], 80).is_empty());
    }

    #[test]
    fn test_tasks_table_rows() {
        let tasks = vec![DocTask {
            task_type: TaskType::Outdated,
            title: "Update README.md".into(),
            description: "README.md looks outdated".into(),
            priority: Priority::High,
            action: "Review".into(),
            target: "README.md".into(),
        }];
        let out = render_tasks_table(&tasks, 80);
        assert!(out.contains("PRIORITY"));
        assert!(out.contains("outdated"));
        assert!(out.contains("Update README.md"));
    }

    #[test]
    fn test_file_types_total_row() {
        let counts = FileTypeCounts {
            code: 1200,
            documentation: 3,
            ..FileTypeCounts::default()
        };
        let out = render_file_types_table(&counts);
        assert!(out.contains("1,200"));
        assert!(out.contains("1,203"));
    }
}
