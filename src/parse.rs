use lazy_static::lazy_static;
use regex::Regex;

use crate::error::PgnParseError;
use crate::game::GameResult;
use crate::node::{Color, MoveNode, Variation};
use crate::tokenize::{Token, TokenKind};

lazy_static! {
    // Minimal SAN shape: piece moves, pawn moves with optional promotion,
    // castling with either letter O or zero. Purely syntactic, no legality.
    static ref SAN_SHAPE_RE: Regex = Regex::new(
        r"^(?:[KQRBN]?[a-h]?[1-8]?x?[a-h][1-8](?:=[QRBN])?|O-O(?:-O)?|0-0(?:-0)?)[+#]?$"
    )
    .unwrap();
}

pub(crate) fn is_san_shaped(san: &str) -> bool {
    SAN_SHAPE_RE.is_match(san)
}

/// One open line of play: the mainline at depth zero, or the body of a
/// not-yet-closed variation.
struct LineContext {
    moves: Vec<MoveNode>,
    next_ply: u32,
    side_to_move: Color,
    pending_comment: Option<String>,
    after_move: bool,
    /// `(branch_ply, branch_san, opening line)`; None for the mainline.
    branch: Option<(u32, String, usize)>,
}

impl LineContext {
    fn new(next_ply: u32, side_to_move: Color, branch: Option<(u32, String, usize)>) -> LineContext {
        LineContext {
            moves: Vec::new(),
            next_ply,
            side_to_move,
            pending_comment: None,
            after_move: false,
            branch,
        }
    }
}

#[derive(Debug)]
pub(crate) struct ParsedMovetext {
    pub moves: Vec<MoveNode>,
    pub trailing_result: Option<GameResult>,
}

/// Builds the move tree in a single left-to-right pass over the token
/// stream, with an explicit stack of open variation contexts.
///
/// `(` branches off the most recently emitted move at the current depth;
/// `)` pops the context and attaches the completed variation, so variations
/// end up in close order. Side and ply simply alternate per consumed SAN
/// token starting from `start_ply`/`start_side`; move-number tokens are
/// ignored. A comment seen before any move at a depth becomes the next
/// move's `comment_before`; a comment right after a move becomes that
/// move's `comment_after`.
///
/// A token that fails the SAN shape check halts consumption at that point
/// and keeps everything parsed so far (partial success). A variation left
/// open at the end of the fragment is a hard failure for the whole
/// fragment.
pub(crate) fn build_move_tree(
    tokens: &[Token],
    start_ply: u32,
    start_side: Color,
) -> Result<ParsedMovetext, PgnParseError> {
    let mut stack: Vec<LineContext> = Vec::new();
    let mut ctx = LineContext::new(start_ply, start_side, None);
    let mut trailing_result = None;
    let mut halted = false;

    for token in tokens {
        match &token.kind {
            // Move numbers are inert: alternation is ply-driven, and a
            // number does not end the preceding move unit, so a comment
            // following "2." still attaches to the move before it.
            TokenKind::MoveNumber(_) => {}
            TokenKind::San(san) => {
                if !is_san_shaped(san) {
                    halted = true;
                    break;
                }
                let mut node = MoveNode::new(ctx.next_ply, ctx.side_to_move, san.clone());
                node.comment_before = ctx.pending_comment.take();
                ctx.moves.push(node);
                ctx.next_ply += 1;
                ctx.side_to_move = ctx.side_to_move.opposite();
                ctx.after_move = true;
            }
            TokenKind::Nag(code) => {
                // NAGs belong to the move unit; all are kept, written order.
                if let Some(last) = ctx.moves.last_mut() {
                    last.nags.push(code.clone());
                }
            }
            TokenKind::Comment(text) => {
                if ctx.after_move {
                    if let Some(last) = ctx.moves.last_mut() {
                        append_comment(&mut last.comment_after, text);
                    }
                    ctx.after_move = false;
                } else {
                    append_comment(&mut ctx.pending_comment, text);
                }
            }
            TokenKind::OpenVariation => {
                let (branch_ply, branch_san, branch_side) = match ctx.moves.last() {
                    Some(m) => (m.ply, m.san.clone(), m.side),
                    None => {
                        return Err(PgnParseError::VariationWithoutMove { line: token.line })
                    }
                };
                ctx.after_move = false;
                let child = LineContext::new(
                    branch_ply,
                    branch_side,
                    Some((branch_ply, branch_san, token.line)),
                );
                stack.push(std::mem::replace(&mut ctx, child));
            }
            TokenKind::CloseVariation => {
                let parent = stack
                    .pop()
                    .ok_or(PgnParseError::UnbalancedVariation { line: token.line })?;
                let closed = std::mem::replace(&mut ctx, parent);
                attach_variation(&mut ctx, closed);
                ctx.after_move = false;
            }
            TokenKind::GameEnd(token_text) => {
                trailing_result = GameResult::from_token(token_text);
            }
        }
    }

    if halted {
        // Keep the partial tree: open contexts are unwound and attached
        // with whatever moves they collected before the bad token.
        while let Some(parent) = stack.pop() {
            let closed = std::mem::replace(&mut ctx, parent);
            attach_variation(&mut ctx, closed);
        }
    } else if !stack.is_empty() {
        let line = match &ctx.branch {
            Some((_, _, line)) => *line,
            None => 1,
        };
        return Err(PgnParseError::UnbalancedVariation { line });
    }

    Ok(ParsedMovetext {
        moves: ctx.moves,
        trailing_result,
    })
}

fn attach_variation(parent: &mut LineContext, closed: LineContext) {
    if closed.moves.is_empty() {
        return;
    }
    if let (Some((branch_ply, branch_san, _)), Some(owner)) =
        (closed.branch, parent.moves.last_mut())
    {
        owner.variations.push(Variation {
            branch_ply,
            branch_san,
            moves: closed.moves,
        });
    }
}

fn append_comment(slot: &mut Option<String>, text: &str) {
    if text.is_empty() {
        return;
    }
    match slot {
        Some(existing) => {
            existing.push(' ');
            existing.push_str(text);
        }
        None => *slot = Some(text.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenize::tokenize_movetext;

    fn build(text: &str) -> ParsedMovetext {
        let tokens = tokenize_movetext(text).unwrap();
        build_move_tree(&tokens, 1, Color::White).unwrap()
    }

    fn sans(moves: &[MoveNode]) -> Vec<&str> {
        moves.iter().map(|m| m.san.as_str()).collect()
    }

    #[test]
    fn mainline_move_count_matches_tokens() {
        let parsed = build("1. e4 e5 2. Nf3 Nc6 3. Bb5 a6");
        assert_eq!(sans(&parsed.moves), ["e4", "e5", "Nf3", "Nc6", "Bb5", "a6"]);
    }

    #[test]
    fn variation_attaches_to_branch_move() {
        let parsed = build("1. e4 (1. d4 d5) e5");
        assert_eq!(sans(&parsed.moves), ["e4", "e5"]);
        let e4 = &parsed.moves[0];
        assert_eq!(e4.variations.len(), 1);
        let variation = &e4.variations[0];
        assert_eq!(variation.branch_san, "e4");
        assert_eq!(variation.branch_ply, 1);
        assert_eq!(sans(&variation.moves), ["d4", "d5"]);
        // The alternative replaces the branch move, so it shares its ply.
        assert_eq!(variation.moves[0].ply, 1);
        assert_eq!(variation.moves[0].side, Color::White);
        assert_eq!(variation.moves[1].side, Color::Black);
    }

    #[test]
    fn nested_variations_stay_a_tree() {
        let parsed = build("1. e4 e5 2. Nf3 (2. f4 exf4 (2... d6)) Nc6");
        let nf3 = &parsed.moves[2];
        assert_eq!(nf3.variations.len(), 1);
        let f4_line = &nf3.variations[0];
        assert_eq!(sans(&f4_line.moves), ["f4", "exf4"]);
        let exf4 = &f4_line.moves[1];
        assert_eq!(exf4.variations.len(), 1);
        assert_eq!(sans(&exf4.variations[0].moves), ["d6"]);
        assert_eq!(exf4.variations[0].moves[0].ply, 4);
    }

    #[test]
    fn sibling_variations_keep_close_order() {
        let parsed = build("1. e4 (1. d4) (1. c4) e5");
        let vars = &parsed.moves[0].variations;
        assert_eq!(vars.len(), 2);
        assert_eq!(vars[0].moves[0].san, "d4");
        assert_eq!(vars[1].moves[0].san, "c4");
    }

    #[test]
    fn comment_after_move_attaches_to_that_move() {
        let parsed = build("1. e4 {good} e5");
        assert_eq!(parsed.moves[0].comment_after.as_deref(), Some("good"));
        assert_eq!(parsed.moves[1].comment_after, None);
        assert_eq!(parsed.moves[1].comment_before, None);
    }

    #[test]
    fn leading_comment_attaches_before_next_move() {
        let parsed = build("{the open games} 1. e4 e5");
        assert_eq!(
            parsed.moves[0].comment_before.as_deref(),
            Some("the open games")
        );
    }

    #[test]
    fn comment_after_a_move_number_still_belongs_to_the_previous_move() {
        // A bare move number does not end the move unit before it.
        let parsed = build("1. e4 2. {x} Nf3");
        assert_eq!(parsed.moves[0].comment_after.as_deref(), Some("x"));
        assert_eq!(parsed.moves[1].comment_before, None);
    }

    #[test]
    fn second_comment_moves_to_the_next_move() {
        let parsed = build("1. e4 {first} {second} e5");
        assert_eq!(parsed.moves[0].comment_after.as_deref(), Some("first"));
        assert_eq!(parsed.moves[1].comment_before.as_deref(), Some("second"));
    }

    #[test]
    fn comment_after_variation_leads_the_next_move() {
        let parsed = build("1. e4 (1. d4) {still theory} e5");
        assert_eq!(parsed.moves[0].comment_after, None);
        assert_eq!(
            parsed.moves[1].comment_before.as_deref(),
            Some("still theory")
        );
    }

    #[test]
    fn multiple_nags_keep_written_order() {
        let parsed = build("1. e4!? $14 $22 e5");
        assert_eq!(parsed.moves[0].nags, ["$5", "$14", "$22"]);
    }

    #[test]
    fn bad_san_shape_halts_with_partial_success() {
        let tokens = tokenize_movetext("1. e4 e5 2. zz9 Nc6").unwrap();
        let parsed = build_move_tree(&tokens, 1, Color::White).unwrap();
        assert_eq!(sans(&parsed.moves), ["e4", "e5"]);
    }

    #[test]
    fn unbalanced_open_variation_is_a_hard_failure() {
        let tokens = tokenize_movetext("1. e4 e5 (2. Nf3 Nc6").unwrap();
        let err = build_move_tree(&tokens, 1, Color::White).unwrap_err();
        assert_eq!(err, PgnParseError::UnbalancedVariation { line: 1 });
    }

    #[test]
    fn close_without_open_is_a_hard_failure() {
        let tokens = tokenize_movetext("1. e4 e5 )").unwrap();
        let err = build_move_tree(&tokens, 1, Color::White).unwrap_err();
        assert_eq!(err, PgnParseError::UnbalancedVariation { line: 1 });
    }

    #[test]
    fn variation_before_any_move_is_rejected() {
        let tokens = tokenize_movetext("(1. d4)").unwrap();
        let err = build_move_tree(&tokens, 1, Color::White).unwrap_err();
        assert_eq!(err, PgnParseError::VariationWithoutMove { line: 1 });
    }

    #[test]
    fn trailing_result_token_is_captured() {
        let parsed = build("1. e4 e5 1-0");
        assert_eq!(parsed.trailing_result, Some(GameResult::WhiteWins));
    }

    #[test]
    fn black_start_side_alternates_from_black() {
        let tokens = tokenize_movetext("3... Nc6 4. Bb5").unwrap();
        let parsed = build_move_tree(&tokens, 6, Color::Black).unwrap();
        assert_eq!(parsed.moves[0].side, Color::Black);
        assert_eq!(parsed.moves[0].ply, 6);
        assert_eq!(parsed.moves[1].side, Color::White);
        assert_eq!(parsed.moves[1].ply, 7);
    }
}
