/// Find the largest valid UTF-8 boundary at or before the given byte index.
#[inline]
fn floor_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    (0..=index).rev().find(|&i| s.is_char_boundary(i)).unwrap_or(0)
}

/// Truncate a string with a marker if it exceeds the maximum length (UTF-8 safe).
///
/// The max_len is in bytes, but truncation respects character boundaries.
#[inline]
pub fn truncate_with_marker(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        let boundary = floor_boundary(s, max_len);
        format!("{}...[truncated]", &s[..boundary])
    }
}

/// Truncate a string to maximum character count (UTF-8 safe).
///
/// Adds "..." suffix if truncated.
#[inline]
pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_chars {
        return s.to_string();
    }
    let truncated: String = s.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", truncated)
}

/// Slice of roughly `radius` bytes on each side of `offset`.
///
/// Used to show where a parser gave up. Never splits a character.
pub fn context_window(s: &str, offset: usize, radius: usize) -> &str {
    let start = floor_boundary(s, offset.saturating_sub(radius));
    let mut end = floor_boundary(s, offset.saturating_add(radius));
    if end < start {
        end = start;
    }
    &s[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_with_marker() {
        assert_eq!(truncate_with_marker("short", 10), "short");
        assert_eq!(truncate_with_marker("hello world", 5), "hello...[truncated]");
        // 'ñ' is two bytes; cutting inside it backs off to the boundary
        assert_eq!(truncate_with_marker("añb", 2), "a...[truncated]");
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello world", 8), "hello...");
        assert_eq!(truncate_chars("日本語テキスト", 5), "日本...");
    }

    #[test]
    fn test_context_window() {
        let text = "0123456789";
        assert_eq!(context_window(text, 5, 2), "3456");
        assert_eq!(context_window(text, 0, 3), "012");
        assert_eq!(context_window(text, 9, 50), "0123456789");
    }

    #[test]
    fn test_context_window_respects_char_boundaries() {
        let text = "ññññ";
        let window = context_window(text, 3, 1);
        assert!(text.contains(window));
    }
}
