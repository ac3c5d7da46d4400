use serde::{Deserialize, Serialize};

use crate::game::GameRecord;
use crate::node::MoveNode;

/// Structural metrics over one parsed game. Advisory only: used for
/// collection-level warnings, never to steer parsing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplexityReport {
    pub total_moves: usize,
    pub variation_count: usize,
    pub comment_count: usize,
    pub nag_count: usize,
    pub has_variations: bool,
    pub complexity: f64,
}

/// Pure metric computation over a parsed game, counting across all nesting
/// depths.
pub fn analyze(game: &GameRecord) -> ComplexityReport {
    let mut report = ComplexityReport {
        total_moves: 0,
        variation_count: 0,
        comment_count: 0,
        nag_count: 0,
        has_variations: false,
        complexity: 0.0,
    };
    walk(&game.moves, &mut report);
    report.has_variations = report.variation_count > 0;
    report.complexity = round1(
        report.total_moves as f64 * 0.1
            + report.variation_count as f64 * 2.0
            + report.comment_count as f64 * 0.5
            + report.nag_count as f64 * 0.3,
    );
    report
}

fn walk(moves: &[MoveNode], report: &mut ComplexityReport) {
    for node in moves {
        report.total_moves += 1;
        report.comment_count +=
            node.comment_before.is_some() as usize + node.comment_after.is_some() as usize;
        report.nag_count += node.nags.len();
        for variation in &node.variations {
            report.variation_count += 1;
            walk(&variation.moves, report);
        }
    }
}

pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
