//! Display-width text helpers shared by the slip and the TUI

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Byte index of the longest prefix of `s` that fits in `max_width` columns.
/// Always lands on a char boundary.
pub fn char_boundary_at_width(s: &str, max_width: usize) -> usize {
    let mut width = 0;
    for (idx, c) in s.char_indices() {
        let w = c.width().unwrap_or(0);
        if width + w > max_width {
            return idx;
        }
        width += w;
    }
    s.len()
}

/// Longest prefix of `s` that fits in `max_width` columns
pub fn truncate_to_width(s: &str, max_width: usize) -> &str {
    &s[..char_boundary_at_width(s, max_width)]
}

/// Word-wrap `text` to `max_width` display columns.
///
/// Existing line breaks are kept. Lines break at the last space that fits,
/// or mid-word when there is none (Hangul runs, long paths).
pub fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    let max_width = max_width.max(1);
    let mut result = Vec::new();
    for paragraph in text.lines() {
        wrap_line(paragraph.trim_end(), max_width, &mut result);
    }
    if result.is_empty() {
        result.push(String::new());
    }
    result
}

fn wrap_line(line: &str, max_width: usize, out: &mut Vec<String>) {
    if line.width() <= max_width {
        out.push(line.to_string());
        return;
    }
    let mut remaining = line;
    while !remaining.is_empty() {
        if remaining.width() <= max_width {
            out.push(remaining.to_string());
            break;
        }
        let byte_limit = char_boundary_at_width(remaining, max_width);
        let break_at = match remaining[..byte_limit].rfind(' ') {
            Some(idx) if idx > 0 => idx,
            _ => byte_limit,
        };
        // A single char wider than the line still has to go somewhere
        let break_at = if break_at == 0 {
            remaining.chars().next().map_or(remaining.len(), char::len_utf8)
        } else {
            break_at
        };
        out.push(remaining[..break_at].to_string());
        remaining = remaining[break_at..].trim_start();
    }
}

/// Left-pad `s` so it sits centered in `width` columns
pub fn center(s: &str, width: usize) -> String {
    let w = s.width();
    if w >= width {
        return s.to_string();
    }
    format!("{}{}", " ".repeat((width - w) / 2), s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_boundary_at_width_ascii() {
        assert_eq!(char_boundary_at_width("hello world", 5), 5);
        assert_eq!(char_boundary_at_width("hi", 10), 2);
        assert_eq!(char_boundary_at_width("hello", 0), 0);
    }

    #[test]
    fn test_char_boundary_at_width_wide_chars() {
        // Each Hangul syllable is 3 bytes and 2 columns
        let s = "감정분석";
        assert_eq!(char_boundary_at_width(s, 4), 6);
        assert_eq!(char_boundary_at_width(s, 5), 6);
        assert_eq!(char_boundary_at_width(s, 1), 0);
    }

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("abc█def", 3), "abc");
        assert_eq!(truncate_to_width("홍길동", 5), "홍길");
        assert_eq!(truncate_to_width("", 3), "");
    }

    #[test]
    fn test_wrap_text_breaks_at_spaces() {
        let lines = wrap_text("the quick brown fox", 10);
        assert_eq!(lines, vec!["the quick", "brown fox"]);
        assert!(lines.iter().all(|l| l.width() <= 10));
    }

    #[test]
    fn test_wrap_text_keeps_newlines() {
        let lines = wrap_text("첫 줄\n둘째 줄", 40);
        assert_eq!(lines, vec!["첫 줄", "둘째 줄"]);
    }

    #[test]
    fn test_wrap_text_hangul_without_spaces() {
        let lines = wrap_text("가나다라마바사", 6);
        assert_eq!(lines, vec!["가나다", "라마바", "사"]);
    }

    #[test]
    fn test_wrap_text_wide_char_in_narrow_width() {
        let lines = wrap_text("가나", 1);
        assert_eq!(lines, vec!["가", "나"]);
    }

    #[test]
    fn test_wrap_text_empty() {
        assert_eq!(wrap_text("", 10), vec![String::new()]);
    }

    #[test]
    fn test_center() {
        assert_eq!(center("ab", 6), "  ab");
        assert_eq!(center("abcdef", 4), "abcdef");
    }
}
