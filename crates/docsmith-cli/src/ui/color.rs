//! Color mode detection for CLI output.
//!
//! Respects the `NO_COLOR` environment variable and TTY detection.
//! See https://no-color.org/ for the NO_COLOR standard.

use std::io::IsTerminal;

/// Color output mode for the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    /// Always use colors, even when output is not a TTY.
    Always,
    /// Never use colors.
    Never,
    /// Automatically detect based on TTY and NO_COLOR env var.
    #[default]
    Auto,
}

impl ColorMode {
    /// Parse a `--color` / `DOCSMITH_COLOR` value: `always`, `never`, or `auto`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "always" => Some(Self::Always),
            "never" => Some(Self::Never),
            "auto" => Some(Self::Auto),
            _ => None,
        }
    }

    /// Check if colors should be used based on current mode.
    pub fn is_enabled(&self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => Self::should_auto_colorize(),
        }
    }

    /// Auto mode: off when `NO_COLOR` is set (any value) or stdout is not a TTY.
    fn should_auto_colorize() -> bool {
        if std::env::var_os("NO_COLOR").is_some() {
            return false;
        }
        stdout_is_terminal()
    }
}

/// Whether stdout is attached to a terminal.
pub fn stdout_is_terminal() -> bool {
    std::io::stdout().is_terminal()
}

/// Get the current terminal width, or 80 if it cannot be determined.
pub fn terminal_width() -> usize {
    terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(80)
}
