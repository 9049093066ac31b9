//! Itinerary rendering engine
//!
//! This crate handles:
//! - Scanning lines for airport and date/time tokens
//! - Parsing ISO-8601 timestamps
//! - Resolving tokens to plain or styled replacement text
//! - Line normalization and blank-line reduction
//! - Driving a whole document through those passes

pub mod datetime;
pub mod normalize;
pub mod pipeline;
pub mod resolver;
pub mod token;

pub use datetime::{DateTimeError, Offset, Timestamp};
pub use normalize::{collapse_blank_runs, normalize, reduce_empty_lines, BlankRuns};
pub use pipeline::{Pipeline, PipelineOutput};
pub use resolver::{Substitution, TokenResolver};
pub use token::{scan_airport_tokens, scan_date_time_tokens, CodeKind, Token, TokenKind};
