//! Message styling for CLI output.
//!
//! | Prefix | Meaning | Color |
//! |--------|---------|-------|
//! | `[ok]` | Success | Green |
//! | `[err]` | Error | Red |
//! | `[warn]` | Warning | Yellow |
//! | `[info]` | Information | Blue |
//! | `[hint]` | Suggestion | Cyan |
//! | `[skip]` | Skipped | Dim |

use owo_colors::OwoColorize;

use docsmith_core::{ChangeStatus, Priority};

use super::color::ColorMode;

/// Message severity/type for CLI output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    /// Operation completed successfully
    Ok,
    /// Operation failed
    Err,
    /// Operation succeeded with caveats
    Warn,
    /// Neutral status
    Info,
    /// Actionable next step
    Hint,
    /// Item was intentionally not processed
    Skip,
}

impl MessageType {
    /// Returns the prefix text for this message type.
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Ok => "[ok]",
            Self::Err => "[err]",
            Self::Warn => "[warn]",
            Self::Info => "[info]",
            Self::Hint => "[hint]",
            Self::Skip => "[skip]",
        }
    }
}

/// Main styling interface for CLI output.
#[derive(Debug, Clone)]
pub struct Style {
    color_mode: ColorMode,
}

impl Style {
    /// Create a Style instance with an explicit color mode.
    pub fn new(color_mode: ColorMode) -> Self {
        Self { color_mode }
    }

    /// Check if colors are enabled.
    pub fn colors_enabled(&self) -> bool {
        self.color_mode.is_enabled()
    }

    /// Format a simple message with a type prefix, e.g. `[ok] Done`.
    pub fn message(&self, msg_type: MessageType, text: &str) -> String {
        let prefix = msg_type.prefix();
        if self.colors_enabled() {
            let colored_prefix = match msg_type {
                MessageType::Ok => prefix.green().to_string(),
                MessageType::Err => prefix.red().to_string(),
                MessageType::Warn => prefix.yellow().to_string(),
                MessageType::Info => prefix.blue().to_string(),
                MessageType::Hint => prefix.cyan().to_string(),
                MessageType::Skip => prefix.dimmed().to_string(),
            };
            format!("{} {}", colored_prefix, text)
        } else {
            format!("{} {}", prefix, text)
        }
    }

    /// Format a detail line with 5-space indentation.
    pub fn message_detail(&self, label: &str, value: &str) -> String {
        format!("     {}: {}", label, value)
    }

    /// Format a section header.
    pub fn section(&self, title: &str) -> String {
        if self.colors_enabled() {
            title.bold().to_string()
        } else {
            title.to_string()
        }
    }

    /// Format an error with optional cause and hint lines.
    pub fn error_with_context(&self, msg: &str, cause: Option<&str>, hint: Option<&str>) -> String {
        let mut output = self.message(MessageType::Err, msg);

        if let Some(cause_text) = cause {
            output.push('\n');
            output.push_str(&format!("      Cause: {}", cause_text));
        }

        if let Some(hint_text) = hint {
            output.push('\n');
            output.push_str(&format!("      Hint: {}", hint_text));
        }

        output
    }

    /// Format a key-value pair.
    pub fn key_value(&self, key: &str, value: &str) -> String {
        if self.colors_enabled() {
            format!("{}: {}", key.dimmed(), value)
        } else {
            format!("{}: {}", key, value)
        }
    }

    /// Format a change id (first 8 chars, yellow).
    pub fn change_id(&self, id: &str) -> String {
        let short = id.get(..8).unwrap_or(id);
        if self.colors_enabled() {
            short.yellow().to_string()
        } else {
            short.to_string()
        }
    }

    /// Format a file path (cyan).
    pub fn file_path(&self, path: &str) -> String {
        if self.colors_enabled() {
            path.cyan().to_string()
        } else {
            path.to_string()
        }
    }

    /// Format a priority: high red, medium yellow, low dim.
    pub fn priority(&self, priority: Priority) -> String {
        let text = priority.as_str();
        if !self.colors_enabled() {
            return text.to_string();
        }
        match priority {
            Priority::High => text.red().to_string(),
            Priority::Medium => text.yellow().to_string(),
            Priority::Low => text.dimmed().to_string(),
        }
    }

    /// Format a change status: applied green, pending yellow, reverted dim.
    pub fn status(&self, status: ChangeStatus) -> String {
        let text = status.label();
        if !self.colors_enabled() {
            return text.to_string();
        }
        match status {
            ChangeStatus::Applied => text.green().to_string(),
            ChangeStatus::Pending => text.yellow().to_string(),
            ChangeStatus::Reverted => text.dimmed().to_string(),
        }
    }

    /// Color one line of a positional diff by its `+ ` / `- ` prefix.
    pub fn diff_line(&self, line: &str) -> String {
        if !self.colors_enabled() {
            return line.to_string();
        }
        if line.starts_with("+ ") {
            line.green().to_string()
        } else if line.starts_with("- ") {
            line.red().to_string()
        } else {
            line.to_string()
        }
    }
}
