//! Token grammar
//!
//! Two token families are recognized inside a line of free text:
//!
//! ```text
//! airport   := "#" IATA | "##" ICAO | "*#" IATA | "*##" ICAO
//! IATA      := UPPER UPPER UPPER
//! ICAO      := UPPER UPPER UPPER UPPER
//!
//! datetime  := ("D" | "T12" | "T24") "(" payload ")"
//! payload   := one or more characters other than ")"
//! ```
//!
//! Scanning runs left to right and never overlaps matches. At each position
//! the alternatives are tried in the order listed and the first one that
//! matches wins, so `##JFK` (three letters) is not an ICAO token; the scan
//! moves on and finds `#JFK` one character later.

use std::ops::Range;

/// Which airport code a token carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodeKind {
    /// 3-letter IATA code
    Iata,
    /// 4-letter ICAO code
    Icao,
}

/// What a token resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// `#XXX` / `##XXXX`
    AirportName(CodeKind),
    /// `*#XXX` / `*##XXXX`
    AirportMunicipality(CodeKind),
    /// `D(...)`
    Date,
    /// `T12(...)`
    Time12,
    /// `T24(...)`
    Time24,
}

/// A recognized token within one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    /// The code, or the raw date/time text between the parentheses
    pub payload: &'a str,
    /// The full token text as written
    pub literal: &'a str,
    /// Byte range of `literal` within the line
    pub span: Range<usize>,
}

struct Shape {
    prefix: &'static str,
    letters: usize,
    kind: TokenKind,
}

const AIRPORT_SHAPES: [Shape; 4] = [
    Shape { prefix: "#", letters: 3, kind: TokenKind::AirportName(CodeKind::Iata) },
    Shape { prefix: "##", letters: 4, kind: TokenKind::AirportName(CodeKind::Icao) },
    Shape { prefix: "*#", letters: 3, kind: TokenKind::AirportMunicipality(CodeKind::Iata) },
    Shape { prefix: "*##", letters: 4, kind: TokenKind::AirportMunicipality(CodeKind::Icao) },
];

const DATE_TIME_PREFIXES: [(&str, TokenKind); 3] = [
    ("D", TokenKind::Date),
    ("T12", TokenKind::Time12),
    ("T24", TokenKind::Time24),
];

/// Find every airport token in a line
pub fn scan_airport_tokens(line: &str) -> Vec<Token<'_>> {
    scan(line, match_airport)
}

/// Find every date/time token in a line
pub fn scan_date_time_tokens(line: &str) -> Vec<Token<'_>> {
    scan(line, match_date_time)
}

fn scan<'a>(line: &'a str, matcher: fn(&'a str, usize) -> Option<Token<'a>>) -> Vec<Token<'a>> {
    let mut tokens = Vec::new();
    let mut at = 0;

    while at < line.len() {
        match matcher(line, at) {
            Some(token) => {
                at = token.span.end;
                tokens.push(token);
            }
            None => at += 1,
        }
    }

    tokens
}

fn match_airport(line: &str, at: usize) -> Option<Token<'_>> {
    let rest = &line.as_bytes()[at..];

    AIRPORT_SHAPES.iter().find_map(|shape| {
        let code = rest.strip_prefix(shape.prefix.as_bytes())?.get(..shape.letters)?;
        if !code.iter().all(u8::is_ascii_uppercase) {
            return None;
        }

        let start = at + shape.prefix.len();
        let end = start + shape.letters;
        Some(Token {
            kind: shape.kind,
            payload: &line[start..end],
            literal: &line[at..end],
            span: at..end,
        })
    })
}

fn match_date_time(line: &str, at: usize) -> Option<Token<'_>> {
    let rest = &line.as_bytes()[at..];

    DATE_TIME_PREFIXES.iter().find_map(|&(prefix, kind)| {
        let after = rest.strip_prefix(prefix.as_bytes())?.strip_prefix(b"(")?;
        let len = after.iter().position(|&b| b == b')')?;
        if len == 0 {
            return None;
        }

        let start = at + prefix.len() + 1;
        let end = start + len + 1;
        Some(Token {
            kind,
            payload: &line[start..start + len],
            literal: &line[at..end],
            span: at..end,
        })
    })
}

/// Rebuild a line, swapping each token for its replacement.
///
/// Tokens must come from a scan of `line`. A `None` replacement keeps the
/// token text as written.
pub fn replace_tokens<'a, F>(line: &'a str, tokens: &[Token<'a>], mut replacement: F) -> String
where
    F: FnMut(&Token<'a>) -> Option<String>,
{
    let mut out = String::with_capacity(line.len());
    let mut cursor = 0;

    for token in tokens {
        out.push_str(&line[cursor..token.span.start]);
        match replacement(token) {
            Some(text) => out.push_str(&text),
            None => out.push_str(token.literal),
        }
        cursor = token.span.end;
    }

    out.push_str(&line[cursor..]);
    out
}
