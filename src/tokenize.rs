use std::iter::Peekable;
use std::str::Chars;

use crate::error::PgnParseError;
use crate::game::GameResult;

/// The closed set of movetext token kinds.
#[derive(Debug, PartialEq, Clone)]
pub enum TokenKind {
    San(String),       // a move, glyph suffix already split off (e.g. "Nf3")
    Nag(String),       // canonical annotation code (e.g. "$1")
    Comment(String),   // body of a "{...}" block, trimmed
    OpenVariation,     // '('
    CloseVariation,    // ')'
    MoveNumber(u32),   // "12." / "12..." (periods consumed)
    GameEnd(String),   // "1-0", "0-1", "1/2-1/2", "*"
}

#[derive(Debug, PartialEq, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
}

struct Scanner<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
}

impl<'a> Scanner<'a> {
    fn new(text: &'a str) -> Scanner<'a> {
        Scanner {
            chars: text.chars().peekable(),
            line: 1,
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next();
        if c == Some('\n') {
            self.line += 1;
        }
        c
    }

    /// Collects characters until a condition is met or the input ends.
    fn collect_until(&mut self, until_condition: impl Fn(char) -> bool) -> String {
        let mut content = String::new();
        while let Some(c) = self.peek() {
            if until_condition(c) {
                break;
            }
            content.push(c);
            self.bump();
        }
        content
    }
}

fn is_word_boundary(c: char) -> bool {
    c.is_ascii_whitespace() || matches!(c, '(' | ')' | '{' | '}' | '$')
}

/// Shorthand move-quality glyphs map to their canonical NAG codes.
fn glyph_nag(glyph: &str) -> Option<&'static str> {
    match glyph {
        "!" => Some("$1"),
        "?" => Some("$2"),
        "!!" => Some("$3"),
        "??" => Some("$4"),
        "!?" => Some("$5"),
        "?!" => Some("$6"),
        _ => None,
    }
}

/// Tokenizes movetext into a flat token list with line numbers.
///
/// Comments run from `{` to the first `}` (PGN permits no nesting inside
/// comments). A glyph fused onto a move, like `Nf3!`, becomes a San token
/// followed by its Nag token, so annotations stay separate from the SAN
/// text while keeping encounter order.
pub fn tokenize_movetext(text: &str) -> Result<Vec<Token>, PgnParseError> {
    let mut tokens = Vec::new();
    let mut scanner = Scanner::new(text);

    while let Some(c) = scanner.peek() {
        let line = scanner.line;
        match c {
            _ if c.is_ascii_whitespace() => {
                scanner.bump();
            }
            '{' => {
                scanner.bump();
                let body = scanner.collect_until(|c| c == '}');
                if scanner.bump().is_none() {
                    return Err(PgnParseError::UnterminatedComment { line });
                }
                tokens.push(Token {
                    kind: TokenKind::Comment(body.trim().to_string()),
                    line,
                });
            }
            '(' => {
                scanner.bump();
                tokens.push(Token {
                    kind: TokenKind::OpenVariation,
                    line,
                });
            }
            ')' => {
                scanner.bump();
                tokens.push(Token {
                    kind: TokenKind::CloseVariation,
                    line,
                });
            }
            '}' => {
                return Err(PgnParseError::InvalidToken {
                    token: "}".to_string(),
                    line,
                });
            }
            '$' => {
                scanner.bump();
                let digits = scanner.collect_until(|c| !c.is_ascii_digit());
                if digits.is_empty() {
                    return Err(PgnParseError::InvalidToken {
                        token: "$".to_string(),
                        line,
                    });
                }
                tokens.push(Token {
                    kind: TokenKind::Nag(format!("${}", digits)),
                    line,
                });
            }
            '!' | '?' => {
                let glyph = scanner.collect_until(|c| c != '!' && c != '?');
                match glyph_nag(&glyph) {
                    Some(code) => tokens.push(Token {
                        kind: TokenKind::Nag(code.to_string()),
                        line,
                    }),
                    None => {
                        return Err(PgnParseError::InvalidToken { token: glyph, line });
                    }
                }
            }
            '*' => {
                scanner.bump();
                tokens.push(Token {
                    kind: TokenKind::GameEnd("*".to_string()),
                    line,
                });
            }
            _ if c.is_ascii_digit() => {
                let word = scanner.collect_until(|c| is_word_boundary(c) || c == '.');
                if GameResult::from_token(&word).is_some() {
                    tokens.push(Token {
                        kind: TokenKind::GameEnd(word),
                        line,
                    });
                } else if let Ok(number) = word.parse::<u32>() {
                    scanner.collect_until(|c| c != '.');
                    tokens.push(Token {
                        kind: TokenKind::MoveNumber(number),
                        line,
                    });
                } else if word.starts_with("0-0") {
                    // Castling written with zeros instead of letter O.
                    push_move(&mut tokens, word, line)?;
                } else {
                    // A digit-led word that is neither a result, a move
                    // number nor zero-castling is not move-shaped at all,
                    // so it fails the fragment here. Letter-led words
                    // always tokenize as San and get the softer
                    // partial-success halt in the tree builder.
                    return Err(PgnParseError::InvalidToken { token: word, line });
                }
            }
            _ if c.is_alphabetic() => {
                let word = scanner.collect_until(is_word_boundary);
                push_move(&mut tokens, word, line)?;
            }
            _ => {
                let word = scanner.collect_until(|c| c.is_ascii_whitespace());
                return Err(PgnParseError::InvalidToken { token: word, line });
            }
        }
    }

    Ok(tokens)
}

/// Pushes a move word, splitting any trailing `!`/`?` glyph into its own
/// Nag token after the San token.
fn push_move(tokens: &mut Vec<Token>, word: String, line: usize) -> Result<(), PgnParseError> {
    let base_len = word.trim_end_matches(['!', '?']).len();
    let (san, glyph) = word.split_at(base_len);
    if san.is_empty() {
        return Err(PgnParseError::InvalidToken { token: word, line });
    }
    let nag = if glyph.is_empty() {
        None
    } else {
        match glyph_nag(glyph) {
            Some(code) => Some(code.to_string()),
            None => return Err(PgnParseError::InvalidToken { token: word, line }),
        }
    };
    tokens.push(Token {
        kind: TokenKind::San(san.to_string()),
        line,
    });
    if let Some(code) = nag {
        tokens.push(Token {
            kind: TokenKind::Nag(code),
            line,
        });
    }
    Ok(())
}
