//! Shared utility functions.

/// Shorten a string to at most `max_chars` characters for display.
///
/// Counts characters rather than bytes so multi-byte text never gets cut
/// mid-character. A shortened string ends in `...`.
pub fn truncate_str(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let cut: String = s.chars().take(max_chars).collect();
    format!("{cut}...")
}
