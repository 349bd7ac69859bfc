//! Unicode-aware text helpers for terminal rendering.

use unicode_width::UnicodeWidthStr;

/// Display width of a string in terminal columns (wide characters count
/// as two).
pub fn display_width(s: &str) -> usize {
    s.width()
}

/// Truncate a string to at most `max_width` terminal columns, appending an
/// ellipsis when anything was cut. Splits on character boundaries, never
/// mid-codepoint, and accounts for wide characters.
pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    if display_width(s) <= max_width {
        return s.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    // Reserve one column for the ellipsis.
    let budget = max_width.saturating_sub(1);
    let mut width = 0;
    let mut out = String::new();
    for ch in s.chars() {
        let ch_width = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if width + ch_width > budget {
            break;
        }
        width += ch_width;
        out.push(ch);
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_width_ascii() {
        assert_eq!(display_width("hello"), 5);
    }

    #[test]
    fn test_display_width_wide_chars() {
        assert_eq!(display_width("日本語"), 6);
    }

    #[test]
    fn test_truncate_short_string_unchanged() {
        assert_eq!(truncate_to_width("short", 10), "short");
    }

    #[test]
    fn test_truncate_exact_fit_unchanged() {
        assert_eq!(truncate_to_width("exact", 5), "exact");
    }

    #[test]
    fn test_truncate_adds_ellipsis() {
        assert_eq!(truncate_to_width("a long title here", 8), "a long …");
    }

    #[test]
    fn test_truncate_wide_chars_no_split() {
        // 3 columns: one wide char (2) + ellipsis (1)
        assert_eq!(truncate_to_width("日本語テスト", 3), "日…");
    }

    #[test]
    fn test_truncate_zero_width() {
        assert_eq!(truncate_to_width("anything", 0), "");
    }
}
