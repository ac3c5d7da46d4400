/// Partitions a blob of concatenated PGN text into per-game fragments,
/// order preserved.
///
/// A line beginning with `[Event` opens a new fragment, but only when a
/// non-empty fragment is already open and the scanner is not inside a
/// `{...}` comment. The brace depth is carried across lines so a comment
/// body containing the literal text `[Event` never creates a false
/// boundary. Input with no header lines at all comes back as a single
/// fragment, so move-only snippets still parse.
pub fn split_games(text: &str) -> Vec<String> {
    let mut fragments: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut brace_depth: u32 = 0;

    for line in text.lines() {
        if line.starts_with("[Event") && brace_depth == 0 && !current.trim().is_empty() {
            fragments.push(std::mem::take(&mut current));
        }
        current.push_str(line);
        current.push('\n');
        for c in line.chars() {
            match c {
                '{' => brace_depth += 1,
                '}' => brace_depth = brace_depth.saturating_sub(1),
                _ => {}
            }
        }
    }
    if !current.trim().is_empty() {
        fragments.push(current);
    }
    fragments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_no_fragments() {
        assert!(split_games("").is_empty());
        assert!(split_games("  \n\n ").is_empty());
    }

    #[test]
    fn single_game_is_one_fragment() {
        let pgn = "[Event \"One\"]\n[Result \"*\"]\n\n1. e4 e5 *\n";
        assert_eq!(split_games(pgn), [pgn]);
    }

    #[test]
    fn two_games_split_on_event_header() {
        let a = "[Event \"A\"]\n\n1. e4 e5 1-0\n";
        let b = "[Event \"B\"]\n\n1. d4 d5 0-1\n";
        let fragments = split_games(&format!("{}\n{}", a, b));
        assert_eq!(fragments.len(), 2);
        assert!(fragments[0].contains("\"A\""));
        assert!(fragments[1].contains("\"B\""));
    }

    #[test]
    fn event_text_inside_comment_is_not_a_boundary() {
        let pgn = "[Event \"A\"]\n\n1. e4 {seen in\n[Event \"B\"]\nonce} e5 *\n";
        assert_eq!(split_games(pgn).len(), 1);
    }

    #[test]
    fn headerless_movetext_is_a_single_fragment() {
        let fragments = split_games("1. e4 e5 2. Nf3");
        assert_eq!(fragments.len(), 1);
        assert!(fragments[0].contains("Nf3"));
    }

    #[test]
    fn leading_blank_lines_do_not_create_an_empty_fragment() {
        let pgn = "\n\n[Event \"A\"]\n\n1. e4 *\n";
        assert_eq!(split_games(pgn).len(), 1);
    }
}
