use std::fmt::{Display, Formatter};
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::complexity::ComplexityReport;
use crate::error::PgnParseError;
use crate::header::{parse_fragment, start_position};
use crate::node::MoveNode;
use crate::parse::build_move_tree;
use crate::render::game_to_pgn;
use crate::tokenize::tokenize_movetext;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    #[serde(rename = "1-0")]
    WhiteWins,
    #[serde(rename = "0-1")]
    BlackWins,
    #[serde(rename = "1/2-1/2")]
    Draw,
    #[serde(rename = "*")]
    Ongoing,
}

impl GameResult {
    pub fn from_token(token: &str) -> Option<GameResult> {
        match token {
            "1-0" => Some(GameResult::WhiteWins),
            "0-1" => Some(GameResult::BlackWins),
            "1/2-1/2" => Some(GameResult::Draw),
            "*" => Some(GameResult::Ongoing),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameResult::WhiteWins => "1-0",
            GameResult::BlackWins => "0-1",
            GameResult::Draw => "1/2-1/2",
            GameResult::Ongoing => "*",
        }
    }
}

impl Default for GameResult {
    fn default() -> GameResult {
        GameResult::Ongoing
    }
}

impl Display for GameResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A fully parsed game: tag pairs, the move tree and the game result.
///
/// Records are produced once by a parse call and treated as immutable
/// afterwards; any playback cursor over the tree is state owned by the
/// caller. `fallback` marks records rebuilt by the flat recovery scan,
/// which loses comments, variations and NAGs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    pub headers: IndexMap<String, String>,
    pub result: GameResult,
    pub moves: Vec<MoveNode>,
    pub fallback: bool,
    pub complexity: Option<ComplexityReport>,
}

impl GameRecord {
    /// SAN texts of the mainline, in order. Convenience for navigation UIs.
    pub fn main_line_sans(&self) -> Vec<&str> {
        self.moves.iter().map(|m| m.san.as_str()).collect()
    }

    /// Resolves the game result: the `Result` header is authoritative over
    /// any trailing result token found in the movetext.
    pub(crate) fn resolve_result(
        headers: &IndexMap<String, String>,
        trailing: Option<GameResult>,
    ) -> GameResult {
        headers
            .get("Result")
            .and_then(|value| GameResult::from_token(value))
            .or(trailing)
            .unwrap_or_default()
    }
}

impl FromStr for GameRecord {
    type Err = PgnParseError;

    /// Strict single-fragment parse: headers plus full move tree, no
    /// fallback recovery. Batch callers go through `parse_study` instead.
    fn from_str(fragment: &str) -> Result<GameRecord, PgnParseError> {
        let (headers, movetext) = parse_fragment(fragment);
        if headers.is_empty() && movetext.trim().is_empty() {
            return Err(PgnParseError::EmptyFragment);
        }
        let (start_ply, start_side) = start_position(&headers);
        let tokens = tokenize_movetext(&movetext)?;
        let parsed = build_move_tree(&tokens, start_ply, start_side)?;
        let result = GameRecord::resolve_result(&headers, parsed.trailing_result);
        Ok(GameRecord {
            headers,
            result,
            moves: parsed.moves,
            fallback: false,
            complexity: None,
        })
    }
}

impl Display for GameRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", game_to_pgn(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Color;

    #[test]
    fn result_header_beats_trailing_token() {
        let game = GameRecord::from_str("[Result \"1-0\"]\n\n1. e4 e5 1/2-1/2").unwrap();
        assert_eq!(game.result, GameResult::WhiteWins);
    }

    #[test]
    fn trailing_token_used_when_header_absent() {
        let game = GameRecord::from_str("1. e4 e5 1-0").unwrap();
        assert_eq!(game.result, GameResult::WhiteWins);
    }

    #[test]
    fn result_defaults_to_ongoing() {
        let game = GameRecord::from_str("1. e4 e5").unwrap();
        assert_eq!(game.result, GameResult::Ongoing);
    }

    #[test]
    fn empty_fragment_is_an_error() {
        assert_eq!(
            GameRecord::from_str("   \n  "),
            Err(PgnParseError::EmptyFragment)
        );
    }

    #[test]
    fn sides_alternate_from_white() {
        let game = GameRecord::from_str("1. e4 e5 2. Nf3 Nc6").unwrap();
        let sides: Vec<Color> = game.moves.iter().map(|m| m.side).collect();
        assert_eq!(
            sides,
            [Color::White, Color::Black, Color::White, Color::Black]
        );
        let plies: Vec<u32> = game.moves.iter().map(|m| m.ply).collect();
        assert_eq!(plies, [1, 2, 3, 4]);
    }
}
