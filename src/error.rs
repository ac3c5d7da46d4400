use thiserror::Error;

/// Errors that can abort parsing of a single PGN fragment.
///
/// These are fragment-scoped: a failing fragment is routed to the flat
/// recovery scan, and a batch call over many fragments never aborts early
/// because one of them failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PgnParseError {
    #[error("unterminated comment starting on line {line}")]
    UnterminatedComment { line: usize },
    #[error("variation opened on line {line} is never closed")]
    UnbalancedVariation { line: usize },
    #[error("variation on line {line} does not follow a move")]
    VariationWithoutMove { line: usize },
    #[error("unexpected token '{token}' on line {line}")]
    InvalidToken { token: String, line: usize },
    #[error("fragment contains no headers and no movetext")]
    EmptyFragment,
}

impl PgnParseError {
    /// The source line the error points at, where one is known.
    pub fn line(&self) -> Option<usize> {
        match self {
            PgnParseError::UnterminatedComment { line }
            | PgnParseError::UnbalancedVariation { line }
            | PgnParseError::VariationWithoutMove { line }
            | PgnParseError::InvalidToken { line, .. } => Some(*line),
            PgnParseError::EmptyFragment => None,
        }
    }
}
