use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref HTML_TAG_RE: Regex = Regex::new(r"<[^>]*>").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SanitizeOptions {
    /// Maximum number of characters kept inside a single `{...}` comment.
    /// Guards against one pathologically long comment block.
    pub max_comment_len: usize,
}

impl Default for SanitizeOptions {
    fn default() -> SanitizeOptions {
        SanitizeOptions {
            max_comment_len: 2048,
        }
    }
}

/// Strips disallowed content from raw PGN text before any parsing happens:
/// HTML-like tags, control characters outside tab/newline/carriage return,
/// and the tail of comment bodies that exceed `max_comment_len`. All other
/// bytes pass through unchanged. Never fails.
pub fn sanitize(input: &str, opts: &SanitizeOptions) -> String {
    let stripped = HTML_TAG_RE.replace_all(input, "");

    let mut out = String::with_capacity(stripped.len());
    // Some(n) while inside a comment body, n characters kept so far.
    let mut comment_len: Option<usize> = None;
    for c in stripped.chars() {
        if c.is_control() && !matches!(c, '\t' | '\n' | '\r') {
            continue;
        }
        match comment_len {
            None => {
                if c == '{' {
                    comment_len = Some(0);
                }
                out.push(c);
            }
            Some(kept) => {
                if c == '}' {
                    comment_len = None;
                    out.push(c);
                } else if kept < opts.max_comment_len {
                    comment_len = Some(kept + 1);
                    out.push(c);
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_html_like_tags() {
        let out = sanitize("1. e4 <b>e5</b> 2. Nf3", &SanitizeOptions::default());
        assert_eq!(out, "1. e4 e5 2. Nf3");
    }

    #[test]
    fn drops_control_characters_but_keeps_whitespace() {
        let out = sanitize("1. e4\u{0000}\u{0007} e5\r\n2.\tNf3", &SanitizeOptions::default());
        assert_eq!(out, "1. e4 e5\r\n2.\tNf3");
    }

    #[test]
    fn truncates_overlong_comments() {
        let opts = SanitizeOptions { max_comment_len: 4 };
        let out = sanitize("1. e4 {abcdefgh} e5", &opts);
        assert_eq!(out, "1. e4 {abcd} e5");
    }

    #[test]
    fn short_comments_pass_unchanged() {
        let input = "1. e4 {fine} e5";
        assert_eq!(sanitize(input, &SanitizeOptions::default()), input);
    }

    #[test]
    fn unterminated_comment_does_not_panic() {
        let opts = SanitizeOptions { max_comment_len: 2 };
        let out = sanitize("1. e4 {never ends", &opts);
        assert_eq!(out, "1. e4 {ne");
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(sanitize("", &SanitizeOptions::default()), "");
    }
}
