//! Formatting utilities for CLI output.

use chrono::{DateTime, Utc};

/// Format a byte size for `config show` (`512 B`, `976.6 KB`).
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Truncate a string to at most `max_len` characters, ending in `...` when cut.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    let count = s.chars().count();
    if count <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        ".".repeat(max_len)
    } else {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    }
}

/// Format a timestamp relative to now ("just now", "5 mins ago", "3h ago").
pub fn format_relative_time(timestamp: DateTime<Utc>) -> String {
    docsmith_core::relative_time(timestamp, Utc::now())
}

/// Format a number with thousands separators.
pub fn format_thousands(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    let len = s.len();

    for (i, c) in s.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(1_048_576), "1.0 MB");
    }

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("README.md", 20), "README.md");
        assert_eq!(truncate_str("docs/domains/user-management.md", 12), "docs/doma...");
        assert_eq!(truncate_str("héllo wörld", 8), "héllo...");
        assert_eq!(truncate_str("hello", 3), "...");
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1234567), "1,234,567");
    }
}
