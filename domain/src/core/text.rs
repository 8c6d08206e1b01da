//! Text helpers for prompt construction.

/// Cut `s` down to at most `max_chars` characters.
///
/// Counts `char`s rather than bytes so a multi-byte response is never split
/// in the middle of a code point. The returned slice borrows from `s`.
pub fn excerpt(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((end, _)) => &s[..end],
        None => s,
    }
}

/// Like [`excerpt`], but appends `...` when anything was cut.
pub fn excerpt_with_ellipsis(s: &str, max_chars: usize) -> String {
    let cut = excerpt(s, max_chars);
    if cut.len() < s.len() {
        format!("{}...", cut)
    } else {
        cut.to_string()
    }
}

/// Case-insensitive, whitespace-trimmed comparison key for a candidate name.
pub fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excerpt_short_input_unchanged() {
        assert_eq!(excerpt("hello", 10), "hello");
        assert_eq!(excerpt("", 3), "");
    }

    #[test]
    fn excerpt_counts_chars() {
        assert_eq!(excerpt("hello world", 5), "hello");
        // 3 chars, 9 bytes
        assert_eq!(excerpt("あのね", 2), "あの");
    }

    #[test]
    fn ellipsis_only_when_cut() {
        assert_eq!(excerpt_with_ellipsis("abc", 3), "abc");
        assert_eq!(excerpt_with_ellipsis("abcdef", 3), "abc...");
    }

    #[test]
    fn name_key_normalizes() {
        assert_eq!(name_key("  Athena "), "athena");
        assert_eq!(name_key("ODIN"), name_key("odin"));
    }
}
