//! Style settings
//!
//! Parses `user_settings.txt`, a sectioned key/value file:
//!
//! ```text
//! [Airport]
//! Color = 32
//! Bold = true
//! ```
//!
//! Each section names a category. Unknown categories resolve to a directive
//! with no effects, so a missing settings file simply means no styling.

use itinerary_core::OutputMode;
use std::collections::HashMap;
use std::path::Path;

/// Escape sequence that clears every attribute
pub const RESET: &str = "\x1b[0m";

/// Category used for airport names
pub const AIRPORT: &str = "Airport";
/// Category used for municipalities
pub const CITY: &str = "City";
/// Category used for formatted dates
pub const DATE: &str = "Date";
/// Category used for formatted clock times
pub const TIME: &str = "Time";
/// Category used for offsets that do not start with a minus sign
pub const OFFSET_POS: &str = "OffsetPos";
/// Category used for offsets that start with a minus sign
pub const OFFSET_NEG: &str = "OffsetNeg";

/// Text attributes applied to one category of replacement text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleDirective {
    /// Raw SGR color parameter, inserted verbatim (e.g. `31` or `38;5;208`)
    pub color: Option<String>,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
}

impl StyleDirective {
    /// True when the directive carries no effect at all
    pub fn is_plain(&self) -> bool {
        self.color.is_none() && !self.bold && !self.italic && !self.underline && !self.strikethrough
    }

    /// Opening escape sequence, fragments in color/bold/italic/underline/strikethrough order
    pub fn opening(&self) -> String {
        let mut opening = String::new();

        if let Some(color) = &self.color {
            opening.push_str("\x1b[");
            opening.push_str(color);
            opening.push('m');
        }
        if self.bold {
            opening.push_str("\x1b[1m");
        }
        if self.italic {
            opening.push_str("\x1b[3m");
        }
        if self.underline {
            opening.push_str("\x1b[4m");
        }
        if self.strikethrough {
            opening.push_str("\x1b[9m");
        }

        opening
    }

    /// Wrap text in this directive's escape sequences.
    ///
    /// Plain mode returns the text untouched. Styled mode always closes with
    /// [`RESET`], even for a directive without effects.
    pub fn render(&self, text: &str, mode: OutputMode) -> String {
        match mode {
            OutputMode::Plain => text.to_string(),
            OutputMode::Styled => format!("{}{}{}", self.opening(), text, RESET),
        }
    }

    fn apply(&mut self, key: &str, value: &str) {
        match key {
            // An empty value means no color, not an empty SGR sequence
            "Color" => self.color = (!value.is_empty()).then(|| value.to_string()),
            "Bold" => self.bold = value == "true",
            "Italic" => self.italic = value == "true",
            "Underline" => self.underline = value == "true",
            "Strikethrough" => self.strikethrough = value == "true",
            _ => {}
        }
    }
}

/// Category name -> style directive
#[derive(Debug, Clone, Default)]
pub struct StyleStore {
    directives: HashMap<String, StyleDirective>,
    none: StyleDirective,
}

impl StyleStore {
    /// Store with no categories; every lookup is the no-op directive
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load settings from a file.
    ///
    /// Never fails: an unreadable file yields an empty store. Use
    /// [`StyleStore::try_from_file`] to find out whether the file was read.
    pub fn from_file(path: &Path) -> Self {
        Self::try_from_file(path).unwrap_or_else(|err| {
            tracing::warn!(
                path = %path.display(),
                error = %err,
                "settings not found, styling disabled"
            );
            Self::empty()
        })
    }

    /// Load settings from a file, reporting read failures
    pub fn try_from_file(path: &Path) -> Result<Self, std::io::Error> {
        let contents = std::fs::read_to_string(path)?;
        let store = Self::parse(&contents);
        tracing::debug!(path = %path.display(), categories = store.len(), "loaded style settings");
        Ok(store)
    }

    /// Parse settings text
    pub fn parse(text: &str) -> Self {
        let mut store = Self::empty();
        let mut current = String::new();

        for line in text.lines() {
            if let Some(name) = line.strip_prefix('[').and_then(|rest| rest.strip_suffix(']')) {
                current = name.to_string();
                continue;
            }

            // Exactly one '=' per setting; anything else is ignored
            let mut parts = line.split('=');
            let (Some(key), Some(value), None) = (parts.next(), parts.next(), parts.next()) else {
                continue;
            };

            store
                .directives
                .entry(current.clone())
                .or_default()
                .apply(key.trim(), value.trim());
        }

        store
    }

    /// Directive for a category, or the no-op directive
    pub fn lookup(&self, category: &str) -> &StyleDirective {
        self.directives.get(category).unwrap_or(&self.none)
    }

    /// Render text with a category's directive
    pub fn render(&self, text: &str, category: &str, mode: OutputMode) -> String {
        self.lookup(category).render(text, mode)
    }

    /// Number of categories defined
    pub fn len(&self) -> usize {
        self.directives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }
}
