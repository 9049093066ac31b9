//! Diagnostic codes and error reporting
//!
//! Diagnostic codes are stable identifiers that show up in logs and in
//! `report.json`. Add new codes with new names only.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Diagnostic code registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiagnosticCode {
    /// An airport token names a code that is not in the reference table
    AirportCodeUnresolved,

    /// A date/time token payload is not a valid ISO-8601 minute timestamp
    DatetimeParseError,

    /// The style settings file could not be read, so no styling was applied
    StyleSettingsUnavailable,

    /// The reference table failed to load
    ReferenceTableMalformed,
}

impl DiagnosticCode {
    /// Get the diagnostic code as a stable string identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AirportCodeUnresolved => "AIRPORT_CODE_UNRESOLVED",
            Self::DatetimeParseError => "DATETIME_PARSE_ERROR",
            Self::StyleSettingsUnavailable => "STYLE_SETTINGS_UNAVAILABLE",
            Self::ReferenceTableMalformed => "REFERENCE_TABLE_MALFORMED",
        }
    }
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message
    Info,

    /// Warning - output was produced but a token was passed through unchanged
    Warn,

    /// Error - the run could not produce output
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Source location in an input artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Path of the input artifact, when known
    pub file: Option<String>,

    /// Line number (1-indexed)
    pub line: usize,
}

impl Location {
    /// Location of a line in the document being processed
    pub fn line(line: usize) -> Self {
        Self { file: None, line }
    }

    /// Location of a line in a named file
    pub fn in_file(file: impl Into<String>, line: usize) -> Self {
        Self {
            file: Some(file.into()),
            line,
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.file {
            Some(file) => write!(f, "{}:{}", file, self.line),
            None => write!(f, "line {}", self.line),
        }
    }
}

/// A diagnostic message with structured metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Stable diagnostic code
    pub code: DiagnosticCode,

    /// Severity level
    pub severity: Severity,

    /// Human-readable message
    pub message: String,

    /// Offending literal text, exactly as it appeared in the input
    pub literal: Option<String>,

    /// First place the literal was seen
    pub location: Option<Location>,

    /// How many times the same diagnostic was raised during the run
    pub occurrences: usize,
}

impl Diagnostic {
    /// Create a new diagnostic with minimal fields
    pub fn new(code: DiagnosticCode, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            code,
            severity,
            message: message.into(),
            literal: None,
            location: None,
            occurrences: 1,
        }
    }

    /// Set the offending literal
    pub fn with_literal(mut self, literal: impl Into<String>) -> Self {
        self.literal = Some(literal.into());
        self
    }

    /// Set the location
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.code, self.message)?;
        if let Some(location) = &self.location {
            write!(f, " ({})", location)?;
        }
        Ok(())
    }
}

/// Run-wide diagnostic accumulator.
///
/// Each `(code, key)` pair is kept once, in the order it was first seen.
/// Repeats only bump the stored diagnostic's occurrence count.
#[derive(Debug, Default, Clone)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
    seen: HashMap<(DiagnosticCode, String), usize>,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic under a deduplication key.
    ///
    /// Returns `true` when this is the first diagnostic for the key.
    pub fn record(&mut self, diagnostic: Diagnostic, key: impl Into<String>) -> bool {
        let slot = (diagnostic.code, key.into());
        if let Some(&index) = self.seen.get(&slot) {
            self.diagnostics[index].occurrences += 1;
            return false;
        }

        self.seen.insert(slot, self.diagnostics.len());
        self.diagnostics.push(diagnostic);
        true
    }

    /// Diagnostics recorded so far, in first-seen order
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Distinct literals recorded under a code, in first-seen order
    pub fn literals(&self, code: DiagnosticCode) -> Vec<&str> {
        self.diagnostics
            .iter()
            .filter(|d| d.code == code)
            .filter_map(|d| d.literal.as_deref())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Consume the collector, yielding the deduplicated diagnostics
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}
