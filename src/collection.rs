use serde::{Deserialize, Serialize};

use crate::complexity::analyze;
use crate::error::PgnParseError;
use crate::fallback::recover_moves;
use crate::game::GameRecord;
use crate::header::{parse_fragment, start_position};
use crate::parse::build_move_tree;
use crate::sanitize::{sanitize, SanitizeOptions};
use crate::split::split_games;
use crate::tokenize::tokenize_movetext;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParseOptions {
    pub sanitize: SanitizeOptions,
}

/// The parse failure record for one study in a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyError {
    pub study_index: usize,
    pub message: String,
    pub line: Option<usize>,
}

/// The result of a batch parse: every recoverable study, every failure,
/// and the total fragment count. A bad study never removes its siblings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub studies: Vec<GameRecord>,
    pub errors: Vec<StudyError>,
    pub total_studies: usize,
}

impl Collection {
    pub fn parse(input: &str) -> Collection {
        Collection::parse_with(input, &ParseOptions::default())
    }

    /// Sanitizes, splits and parses every fragment, attaching a complexity
    /// report to each successful study. Failures are isolated per fragment.
    pub fn parse_with(input: &str, opts: &ParseOptions) -> Collection {
        let mut result = Collection {
            studies: Vec::new(),
            errors: Vec::new(),
            total_studies: 0,
        };
        for (study_index, outcome) in studies_with(input, opts).enumerate() {
            result.total_studies += 1;
            match outcome {
                Ok(mut game) => {
                    game.complexity = Some(analyze(&game));
                    result.studies.push(game);
                }
                Err(err) => {
                    log::warn!("study {} dropped: {}", study_index + 1, err);
                    result.errors.push(StudyError {
                        study_index,
                        message: err.to_string(),
                        line: err.line(),
                    });
                }
            }
        }
        result
    }
}

/// Parses one already-split fragment end to end.
///
/// The full move-tree parse is attempted first; on a grammar failure the
/// flat recovery scan runs instead and the record is tagged `fallback`.
/// Only when even recovery finds no moves does the fragment fail, with the
/// original grammar error.
pub fn parse_study(fragment: &str) -> Result<GameRecord, PgnParseError> {
    let (headers, movetext) = parse_fragment(fragment);
    if headers.is_empty() && movetext.trim().is_empty() {
        return Err(PgnParseError::EmptyFragment);
    }
    let (start_ply, start_side) = start_position(&headers);
    let strict = tokenize_movetext(&movetext)
        .and_then(|tokens| build_move_tree(&tokens, start_ply, start_side));
    match strict {
        Ok(parsed) => {
            let result = GameRecord::resolve_result(&headers, parsed.trailing_result);
            Ok(GameRecord {
                headers,
                result,
                moves: parsed.moves,
                fallback: false,
                complexity: None,
            })
        }
        Err(err) => {
            log::warn!(
                "move tree parse failed ({}), attempting flat recovery",
                err
            );
            let (moves, trailing) = recover_moves(&movetext, start_ply, start_side);
            if moves.is_empty() {
                return Err(err);
            }
            let result = GameRecord::resolve_result(&headers, trailing);
            Ok(GameRecord {
                headers,
                result,
                moves,
                fallback: true,
                complexity: None,
            })
        }
    }
}

/// Lazy per-fragment parsing over a multi-game blob.
///
/// Each `next()` call parses exactly one fragment, which gives host UIs a
/// cooperative yield point between studies. `Collection::parse` drains the
/// same iterator in one go.
pub struct Studies {
    fragments: std::vec::IntoIter<String>,
}

impl Iterator for Studies {
    type Item = Result<GameRecord, PgnParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.fragments.next().map(|fragment| parse_study(&fragment))
    }
}

pub fn studies(input: &str) -> Studies {
    studies_with(input, &ParseOptions::default())
}

pub fn studies_with(input: &str, opts: &ParseOptions) -> Studies {
    let clean = sanitize(input, &opts.sanitize);
    Studies {
        fragments: split_games(&clean).into_iter(),
    }
}
