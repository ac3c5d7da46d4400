use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;

use crate::node::Color;

lazy_static! {
    static ref TAG_RE: Regex = Regex::new(r#"^\[(\w+)\s+"(.*)"\]$"#).unwrap();
}

/// Splits a fragment into its tag pairs and the remaining movetext.
///
/// The header section is the leading run of `[Key "Value"]` lines; the first
/// line that is neither blank nor a tag starts the movetext. Malformed tag
/// lines are skipped, the rest of the headers are kept. A repeated key
/// overwrites the previous value (last occurrence wins), keeping its original
/// position in the map.
pub fn parse_fragment(fragment: &str) -> (IndexMap<String, String>, String) {
    let mut headers = IndexMap::new();
    let mut movetext = String::new();
    let mut in_headers = true;

    for line in fragment.lines() {
        if in_headers {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if trimmed.starts_with('[') {
                match TAG_RE.captures(trimmed) {
                    Some(caps) => {
                        headers.insert(caps[1].to_string(), unescape_value(&caps[2]));
                    }
                    None => {
                        log::debug!("skipping malformed tag line: {}", trimmed);
                    }
                }
                continue;
            }
            in_headers = false;
        }
        movetext.push_str(line);
        movetext.push('\n');
    }
    (headers, movetext)
}

/// Starting ply and side to move, derived from a `FEN` header when one is
/// present (fields 2 and 6 only, no position validation), else the standard
/// initial position.
pub(crate) fn start_position(headers: &IndexMap<String, String>) -> (u32, Color) {
    if let Some(fen) = headers.get("FEN") {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        let side = match fields.get(1) {
            Some(&"b") => Color::Black,
            _ => Color::White,
        };
        let fullmove: u32 = fields
            .get(5)
            .and_then(|f| f.parse().ok())
            .filter(|&n| n >= 1)
            .unwrap_or(1);
        let ply = (fullmove - 1) * 2 + if side == Color::Black { 2 } else { 1 };
        return (ply, side);
    }
    (1, Color::White)
}

fn unescape_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('"') => out.push('"'),
                Some('\\') => out.push('\\'),
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

pub(crate) fn escape_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            _ => out.push(c),
        }
    }
    out
}
