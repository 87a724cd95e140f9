//! Positional line diff.
//!
//! Lines are compared index by index; there is no alignment, so an inserted
//! line shows every following line as changed. Output lines are prefixed with
//! two spaces (unchanged), `- ` (only in old), or `+ ` (only in new).

/// Diff `old` against `new`, one output line per compared position.
pub fn generate_diff(old: &str, new: &str) -> String {
    let old_lines: Vec<&str> = old.lines().collect();
    let new_lines: Vec<&str> = new.lines().collect();
    let max = old_lines.len().max(new_lines.len());

    let mut out = Vec::with_capacity(max);
    for i in 0..max {
        match (old_lines.get(i), new_lines.get(i)) {
            (Some(o), Some(n)) if o == n => out.push(format!("  {}", o)),
            (Some(o), Some(n)) => {
                out.push(format!("- {}", o));
                out.push(format!("+ {}", n));
            }
            (Some(o), None) => out.push(format!("- {}", o)),
            (None, Some(n)) => out.push(format!("+ {}", n)),
            (None, None) => {}
        }
    }

    out.join("\n")
}

/// Count `(added, removed)` lines in a diff produced by [`generate_diff`].
pub fn diff_stats(diff: &str) -> (usize, usize) {
    diff.lines().fold((0, 0), |(added, removed), line| {
        if line.starts_with("+ ") {
            (added + 1, removed)
        } else if line.starts_with("- ") {
            (added, removed + 1)
        } else {
            (added, removed)
        }
    })
}
