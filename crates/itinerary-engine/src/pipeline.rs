//! Document pipeline
//!
//! For each input line, in order: airport tokens, date/time tokens,
//! normalization, blank-run collapsing. The accumulated text then goes
//! through document-wide blank line reduction.

use crate::normalize::{self, BlankRuns};
use crate::resolver::TokenResolver;
use itinerary_core::{Diagnostic, DiagnosticCode, DiagnosticCollector, OutputMode, Report};
use itinerary_lookup::{ReferenceTable, StyleStore};
use std::io::Read;

/// Owns the reference data for a run and renders documents with it
#[derive(Debug, Clone)]
pub struct Pipeline {
    table: ReferenceTable,
    styles: StyleStore,
    mode: OutputMode,
}

/// Result of processing one document
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    /// Final document text
    pub text: String,

    /// Deduplicated diagnostics, in first-seen order
    pub diagnostics: Vec<Diagnostic>,

    /// Number of input lines read
    pub lines_processed: usize,

    /// Number of tokens replaced with resolved text
    pub tokens_replaced: usize,
}

impl PipelineOutput {
    /// Build a run report from this output
    pub fn to_report(&self) -> Report {
        Report::from_diagnostics(self.diagnostics.clone())
            .with_counts(self.lines_processed, self.tokens_replaced)
    }
}

impl Pipeline {
    pub fn new(table: ReferenceTable, styles: StyleStore, mode: OutputMode) -> Self {
        Self { table, styles, mode }
    }

    pub fn table(&self) -> &ReferenceTable {
        &self.table
    }

    pub fn styles(&self) -> &StyleStore {
        &self.styles
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    /// Process a whole document held in memory
    pub fn run(&self, document: &str) -> PipelineOutput {
        let resolver = TokenResolver::new(&self.table, &self.styles, self.mode);
        let mut diagnostics = DiagnosticCollector::new();
        let mut blank_runs = BlankRuns::new();
        let mut accumulated = String::with_capacity(document.len());
        let mut lines_processed = 0;
        let mut tokens_replaced = 0;

        for (index, line) in document.lines().enumerate() {
            let line_no = index + 1;
            lines_processed += 1;

            let airports = resolver.substitute_airports(line, line_no, &mut diagnostics);
            let date_times =
                resolver.substitute_date_times(&airports.text, line_no, &mut diagnostics);
            tokens_replaced += airports.replaced + date_times.replaced;

            let line = normalize::normalize(&date_times.text);
            if !blank_runs.admit(&line) {
                continue;
            }

            accumulated.push_str(&line);
            accumulated.push('\n');
        }

        log_unresolved(&diagnostics);
        tracing::info!(
            lines = lines_processed,
            tokens = tokens_replaced,
            "processing of input completed"
        );

        PipelineOutput {
            text: normalize::reduce_empty_lines(&accumulated),
            diagnostics: diagnostics.into_diagnostics(),
            lines_processed,
            tokens_replaced,
        }
    }

    /// Read a whole document from `reader` and process it
    pub fn run_reader<R: Read>(&self, mut reader: R) -> std::io::Result<PipelineOutput> {
        let mut document = String::new();
        reader.read_to_string(&mut document)?;
        Ok(self.run(&document))
    }
}

/// One aggregated log line per diagnostic kind
fn log_unresolved(diagnostics: &DiagnosticCollector) {
    let codes = diagnostics.literals(DiagnosticCode::AirportCodeUnresolved);
    if !codes.is_empty() {
        tracing::warn!("airport code not found: {}", codes.join(", "));
    }

    let failures: Vec<&str> = diagnostics
        .diagnostics()
        .iter()
        .filter(|d| d.code == DiagnosticCode::DatetimeParseError)
        .map(|d| d.message.as_str())
        .collect();
    if !failures.is_empty() {
        tracing::warn!("{}", failures.join("; "));
    }
}
