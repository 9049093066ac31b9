//! Itinerary Core
//!
//! Shared domain types: diagnostics, the run report and tool configuration.
//! Never rename diagnostic codes - they appear in saved reports.

pub mod config;
pub mod diagnostic;
pub mod report;

pub use config::{Config, ConfigError, OutputMode, DEFAULT_SETTINGS_PATH};
pub use diagnostic::{Diagnostic, DiagnosticCode, DiagnosticCollector, Location, Severity};
pub use report::{Report, ReportSummary, ReportVersion};
