use crate::game::GameRecord;
use crate::header::escape_value;
use crate::node::{Color, MoveNode};

/// Deterministic inverse of the move-tree builder: tag block, blank line,
/// movetext, trailing result token.
///
/// Move numbers precede White's moves only, except that a line opening on a
/// Black move (the game itself or a variation) gets the `N...` form so the
/// output re-parses unambiguously. Variations come back in stored order,
/// comments in braces, NAGs as canonical `$n` tokens (shorthand glyphs do
/// not round-trip back to glyph form).
pub fn game_to_pgn(game: &GameRecord) -> String {
    let mut out = String::new();
    for (key, value) in &game.headers {
        out.push_str(&format!("[{} \"{}\"]\n", key, escape_value(value)));
    }
    if !game.headers.is_empty() {
        out.push('\n');
    }
    let movetext = render_line(&game.moves);
    if !movetext.is_empty() {
        out.push_str(&movetext);
        out.push(' ');
    }
    out.push_str(game.result.as_str());
    out.push('\n');
    out
}

fn render_line(moves: &[MoveNode]) -> String {
    let mut parts: Vec<String> = Vec::new();
    let mut line_start = true;
    for node in moves {
        if let Some(comment) = &node.comment_before {
            parts.push(format!("{{{}}}", comment));
        }
        match node.side {
            Color::White => parts.push(format!("{}.", fullmove(node.ply))),
            Color::Black if line_start => parts.push(format!("{}...", fullmove(node.ply))),
            Color::Black => {}
        }
        parts.push(node.san.clone());
        for nag in &node.nags {
            parts.push(nag.clone());
        }
        if let Some(comment) = &node.comment_after {
            parts.push(format!("{{{}}}", comment));
        }
        for variation in &node.variations {
            parts.push(format!("({})", render_line(&variation.moves)));
        }
        line_start = false;
    }
    parts.join(" ")
}

fn fullmove(ply: u32) -> u32 {
    (ply + 1) / 2
}
