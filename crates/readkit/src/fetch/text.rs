//! Text shaping for upstream bodies
//!
//! Deterministic: the same body and cap always give the same output.

use std::borrow::Cow;

use crate::config::TRUNCATION_MARKER;

/// Normalize line endings to `\n`.
///
/// `\r\n` becomes `\n`, and so does a lone `\r`, which keeps the operation
/// idempotent (`\r\r\n` would otherwise turn into a fresh `\r\n`).
pub fn normalize_line_endings(text: &str) -> Cow<'_, str> {
    if !text.contains('\r') {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\r' {
            if chars.peek() == Some(&'\n') {
                chars.next();
            }
            out.push('\n');
        } else {
            out.push(c);
        }
    }
    Cow::Owned(out)
}

/// Normalize line endings, then trim surrounding whitespace.
pub fn clean(text: &str) -> String {
    normalize_line_endings(text).trim().to_string()
}

/// Cut `text` to at most `max_chars` characters.
///
/// Returns the text and whether it was cut. A cut text ends with
/// [`TRUNCATION_MARKER`]; text at or under the cap is returned unchanged.
/// Counts Unicode scalar values, so multi-byte characters are never split.
pub fn truncate_chars(mut text: String, max_chars: usize) -> (String, bool) {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => {
            text.truncate(cut);
            text.push_str(TRUNCATION_MARKER);
            (text, true)
        }
        None => (text, false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_crlf_normalized() {
        assert_eq!(normalize_line_endings("a\r\nb\r\nc"), "a\nb\nc");
        assert_eq!(normalize_line_endings("a\nb\r\nc\rd"), "a\nb\nc\nd");
        assert_eq!(normalize_line_endings("a\r\r\nb"), "a\n\nb");
    }

    #[test]
    fn test_no_cr_borrows() {
        assert!(matches!(
            normalize_line_endings("plain\ntext"),
            Cow::Borrowed(_)
        ));
    }

    #[test]
    fn test_normalization_idempotent() {
        let once = normalize_line_endings("x\r\r\n\r\ny\n\rz").into_owned();
        let twice = normalize_line_endings(&once).into_owned();
        assert_eq!(once, twice);
        assert!(!once.contains('\r'));
    }

    #[test]
    fn test_clean_trims() {
        assert_eq!(clean("\r\n  Title\r\n\r\nBody  \r\n"), "Title\n\nBody");
        assert_eq!(clean(" \t\r\n "), "");
    }

    #[test]
    fn test_truncate_over_cap() {
        let (text, truncated) = truncate_chars("abcdef".to_string(), 4);
        assert!(truncated);
        assert_eq!(text, format!("abcd{TRUNCATION_MARKER}"));
    }

    #[test]
    fn test_truncate_at_cap_unchanged() {
        let (text, truncated) = truncate_chars("abcd".to_string(), 4);
        assert!(!truncated);
        assert_eq!(text, "abcd");
    }

    #[test]
    fn test_truncate_counts_chars_not_bytes() {
        // 4 chars, 12 bytes
        let (text, truncated) = truncate_chars("日本語字".to_string(), 4);
        assert!(!truncated);
        assert_eq!(text, "日本語字");

        let (text, truncated) = truncate_chars("日本語字".to_string(), 2);
        assert!(truncated);
        assert_eq!(text, format!("日本{TRUNCATION_MARKER}"));
    }

    #[test]
    fn test_truncate_zero_cap() {
        let (text, truncated) = truncate_chars("a".to_string(), 0);
        assert!(truncated);
        assert_eq!(text, TRUNCATION_MARKER);

        let (text, truncated) = truncate_chars(String::new(), 0);
        assert!(!truncated);
        assert_eq!(text, "");
    }
}
