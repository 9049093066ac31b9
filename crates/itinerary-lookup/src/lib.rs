//! Reference data for itinerary rendering
//!
//! This crate handles:
//! - Loading the airport reference table (CSV)
//! - Loading the style settings used for terminal output

pub mod airport;
pub mod style;

pub use airport::{AirportRecord, LookupError, ReferenceTable, REQUIRED_COLUMNS};
pub use style::{StyleDirective, StyleStore, RESET};
