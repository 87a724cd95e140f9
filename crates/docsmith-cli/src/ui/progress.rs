//! Progress feedback for workspace scans and batch generation.
//!
//! Drawn with `indicatif`, only when stdout is an interactive terminal and
//! neither `--quiet` nor `--json` was given.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use super::color::stdout_is_terminal;

/// Whether progress is drawn at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressMode {
    /// Animated spinner and bar on a TTY.
    Interactive,
    /// Nothing is drawn; only final results are printed.
    Hidden,
}

impl ProgressMode {
    /// Hidden for `--quiet`, `--json`, or when stdout is not a terminal.
    pub fn detect(quiet: bool, json: bool) -> Self {
        if json || quiet || !stdout_is_terminal() {
            Self::Hidden
        } else {
            Self::Interactive
        }
    }
}

const SPINNER_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// A spinner (scan) or a bar with one step per document (generation).
pub struct Progress {
    bar: ProgressBar,
}

impl Progress {
    /// Spinner shown while the workspace is walked.
    pub fn scanning(mode: ProgressMode) -> Self {
        if mode == ProgressMode::Hidden {
            return Self::hidden();
        }
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .tick_chars(SPINNER_CHARS)
                .template("{spinner:.cyan} Analyzing workspace... ({elapsed})")
                .expect("valid template"),
        );
        bar.enable_steady_tick(Duration::from_millis(80));
        Self { bar }
    }

    /// Bar over `total` documents; the message shows the current target.
    pub fn generating(total: usize, mode: ProgressMode) -> Self {
        if mode == ProgressMode::Hidden {
            return Self::hidden();
        }
        let bar = ProgressBar::new(total as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("[{bar:20.cyan/dim}] {pos}/{len} {wide_msg}")
                .expect("valid template")
                .progress_chars("█░"),
        );
        Self { bar }
    }

    fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    /// Mark document `index` (1-based) as processed.
    pub fn document_done(&self, index: usize, target: &str) {
        self.bar.set_position(index as u64);
        self.bar.set_message(target.to_string());
    }

    /// Remove the progress line before results are printed.
    pub fn clear(&self) {
        self.bar.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_and_quiet_hide_progress() {
        assert_eq!(ProgressMode::detect(false, true), ProgressMode::Hidden);
        assert_eq!(ProgressMode::detect(true, false), ProgressMode::Hidden);
    }

    #[test]
    fn test_hidden_progress_is_inert() {
        let p = Progress::generating(3, ProgressMode::Hidden);
        p.document_done(2, "docs/API.md");
        p.clear();
        Progress::scanning(ProgressMode::Hidden).clear();
    }
}
