use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opposite(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

/// One half-move in a line, together with everything written around it.
///
/// A node belongs to exactly one parent sequence (the mainline or a single
/// [`Variation`]); ply numbers never decrease along a line. NAGs are stored
/// as canonical `$n` codes in the order they were written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveNode {
    pub ply: u32,
    pub side: Color,
    pub san: String,
    pub nags: Vec<String>,
    pub comment_before: Option<String>,
    pub comment_after: Option<String>,
    pub variations: Vec<Variation>,
}

impl MoveNode {
    pub(crate) fn new(ply: u32, side: Color, san: String) -> MoveNode {
        MoveNode {
            ply,
            side,
            san,
            nags: Vec::new(),
            comment_before: None,
            comment_after: None,
            variations: Vec::new(),
        }
    }

    pub fn has_variations(&self) -> bool {
        !self.variations.is_empty()
    }
}

/// An alternate continuation branching off a specific move.
///
/// Ownership runs strictly parent to child: the branch-point move owns its
/// variations, and `branch_ply`/`branch_san` are a lookup-only record of
/// where the line forks, never a traversable parent link. The first move of
/// a variation replaces the branch-point move, so it carries the same ply
/// and side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variation {
    pub branch_ply: u32,
    pub branch_san: String,
    pub moves: Vec<MoveNode>,
}
