//! Formatted output helpers for CLI commands.

/// Shortens `s` to at most `width` characters, marking the cut with `…`.
#[must_use]
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let kept: String = s.chars().take(width.saturating_sub(1)).collect();
    format!("{kept}…")
}

/// Returns `-` in place of an empty value.
#[must_use]
pub fn or_dash(s: &str) -> &str {
    if s.is_empty() { "-" } else { s }
}

/// Formats a host PID, showing `-` when unknown.
#[must_use]
pub fn format_pid(pid: u32) -> String {
    if pid == 0 {
        "-".to_string()
    } else {
        pid.to_string()
    }
}
