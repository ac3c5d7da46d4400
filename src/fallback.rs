use crate::game::GameResult;
use crate::node::{Color, MoveNode};
use crate::parse::is_san_shaped;

/// Best-effort flat recovery for a fragment whose move tree could not be
/// built.
///
/// Comments and variation bodies are stripped first, then the remainder is
/// scanned permissively: SAN-shaped words become moves (colors simply
/// alternate from the starting side), everything else is dropped. The
/// result is a flat list: comments, variations and NAGs are lost, which
/// is why callers tag the record with `fallback = true`. Never fails; an
/// empty result means nothing could be recovered.
pub fn recover_moves(
    movetext: &str,
    start_ply: u32,
    start_side: Color,
) -> (Vec<MoveNode>, Option<GameResult>) {
    let stripped = strip_comments_and_variations(movetext);

    let mut moves = Vec::new();
    let mut ply = start_ply;
    let mut side = start_side;
    let mut trailing_result = None;
    for word in stripped.split_whitespace() {
        if let Some(result) = GameResult::from_token(word) {
            trailing_result = Some(result);
            continue;
        }
        let san = clean_word(word);
        if san.is_empty() || !is_san_shaped(san) {
            continue;
        }
        moves.push(MoveNode::new(ply, side, san.to_string()));
        ply += 1;
        side = side.opposite();
    }
    (moves, trailing_result)
}

/// Drops `{...}` bodies and everything inside parentheses. Comments win
/// over parentheses: a paren inside a comment body is plain text, and the
/// first `}` always ends the comment.
fn strip_comments_and_variations(movetext: &str) -> String {
    let mut out = String::with_capacity(movetext.len());
    let mut in_comment = false;
    let mut paren_depth: u32 = 0;
    for c in movetext.chars() {
        if in_comment {
            if c == '}' {
                in_comment = false;
            }
            continue;
        }
        match c {
            '{' => in_comment = true,
            '(' => paren_depth += 1,
            ')' => paren_depth = paren_depth.saturating_sub(1),
            _ if paren_depth == 0 => out.push(c),
            _ => {}
        }
    }
    out
}

/// Removes move-number prefixes ("12.", "12...") and trailing glyphs or
/// NAG leftovers from a whitespace-separated word.
fn clean_word(word: &str) -> &str {
    let word = match word.rfind('.') {
        Some(idx) if word[..idx + 1].chars().all(|c| c.is_ascii_digit() || c == '.') => {
            &word[idx + 1..]
        }
        _ => word,
    };
    word.trim_end_matches(['!', '?'])
}
