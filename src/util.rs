// src/util.rs — Shared utility functions

/// Truncate a string for display (UTF-8 safe), appending `...` when cut.
///
/// The cut point is backed up to a valid character boundary, so multibyte
/// characters are never split.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    let mut end = max_len.saturating_sub(3);
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &s[..end])
}
