//! Token resolution
//!
//! Turns recognized tokens into replacement text. Unresolvable tokens are
//! left in place and reported once per run through the
//! [`DiagnosticCollector`].

use crate::datetime::{DateTimeError, Timestamp};
use crate::token::{self, CodeKind, Token, TokenKind};
use itinerary_core::{
    Diagnostic, DiagnosticCode, DiagnosticCollector, Location, OutputMode, Severity,
};
use itinerary_lookup::style;
use itinerary_lookup::{AirportRecord, ReferenceTable, StyleStore};

/// Resolves tokens against the reference table and style settings
#[derive(Debug, Clone, Copy)]
pub struct TokenResolver<'a> {
    table: &'a ReferenceTable,
    styles: &'a StyleStore,
    mode: OutputMode,
}

impl<'a> TokenResolver<'a> {
    pub fn new(table: &'a ReferenceTable, styles: &'a StyleStore, mode: OutputMode) -> Self {
        Self { table, styles, mode }
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    /// First record matching an airport token's code
    pub fn lookup(&self, kind: TokenKind, code: &str) -> Option<&'a AirportRecord> {
        match kind {
            TokenKind::AirportName(CodeKind::Iata)
            | TokenKind::AirportMunicipality(CodeKind::Iata) => self.table.by_iata(code),
            TokenKind::AirportName(CodeKind::Icao)
            | TokenKind::AirportMunicipality(CodeKind::Icao) => self.table.by_icao(code),
            TokenKind::Date | TokenKind::Time12 | TokenKind::Time24 => None,
        }
    }

    /// Replacement text for an airport token, or `None` when the code is unknown
    pub fn resolve_airport(&self, token: &Token<'_>) -> Option<String> {
        let record = self.lookup(token.kind, token.payload)?;

        let (text, category) = match token.kind {
            TokenKind::AirportMunicipality(_) => (record.municipality.as_str(), style::CITY),
            _ => (record.name.as_str(), style::AIRPORT),
        };

        tracing::debug!(token = token.literal, replacement = text, "resolved airport code");
        Some(self.styles.render(text, category, self.mode))
    }

    /// Replacement text for a date/time token
    pub fn resolve_date_time(&self, token: &Token<'_>) -> Result<String, DateTimeError> {
        let timestamp = Timestamp::parse(token.payload)?;

        let rendered = match token.kind {
            TokenKind::Date => self.styles.render(&timestamp.date_text(), style::DATE, self.mode),
            TokenKind::Time12 => self.render_time(&timestamp.clock12_text(), &timestamp),
            _ => self.render_time(&timestamp.clock24_text(), &timestamp),
        };

        Ok(rendered)
    }

    /// `clock (offset)`; styled output appends the offset again in its own category
    fn render_time(&self, clock: &str, timestamp: &Timestamp) -> String {
        let offset = timestamp.offset_text();
        let time = format!("{} {}", clock, offset);

        match self.mode {
            OutputMode::Plain => time,
            OutputMode::Styled => {
                let offset_category = if offset.starts_with("(-") {
                    style::OFFSET_NEG
                } else {
                    style::OFFSET_POS
                };
                format!(
                    "{}{}",
                    self.styles.render(&time, style::TIME, self.mode),
                    self.styles.render(&offset, offset_category, self.mode)
                )
            }
        }
    }

    /// Replace every airport token in a line
    pub fn substitute_airports(
        &self,
        line: &str,
        line_no: usize,
        diagnostics: &mut DiagnosticCollector,
    ) -> Substitution {
        let tokens = token::scan_airport_tokens(line);
        let mut replaced = 0;

        let text = token::replace_tokens(line, &tokens, |token| match self.resolve_airport(token) {
            Some(text) => {
                replaced += 1;
                Some(text)
            }
            None => {
                let diag = Diagnostic::new(
                    DiagnosticCode::AirportCodeUnresolved,
                    Severity::Warn,
                    format!("airport code not found: {}", token.literal),
                )
                .with_literal(token.literal)
                .with_location(Location::line(line_no));
                diagnostics.record(diag, token.literal);
                None
            }
        });

        Substitution { text, replaced }
    }

    /// Replace every date/time token in a line
    pub fn substitute_date_times(
        &self,
        line: &str,
        line_no: usize,
        diagnostics: &mut DiagnosticCollector,
    ) -> Substitution {
        let tokens = token::scan_date_time_tokens(line);
        let mut replaced = 0;

        let text = token::replace_tokens(line, &tokens, |token| {
            match self.resolve_date_time(token) {
                Ok(text) => {
                    replaced += 1;
                    Some(text)
                }
                Err(err) => {
                    let reason = err.to_string();
                    let diag = Diagnostic::new(
                        DiagnosticCode::DatetimeParseError,
                        Severity::Warn,
                        format!("failed to parse time string: {}", reason),
                    )
                    .with_literal(token.literal)
                    .with_location(Location::line(line_no));
                    diagnostics.record(diag, format!("{}: {}", token.literal, reason));
                    None
                }
            }
        });

        Substitution { text, replaced }
    }
}

/// A line after one substitution pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    pub text: String,
    /// Number of tokens that were replaced
    pub replaced: usize,
}
