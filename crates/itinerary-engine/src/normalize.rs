//! Line normalization
//!
//! Whitespace cleanup, line-break mapping, ASCII filtering and blank-line
//! collapsing. Nothing here knows about tokens.

/// Control characters, and their backslash spellings, that become line breaks
const LINE_BREAK_SPELLINGS: [&str; 6] = ["\u{0B}", "\\v", "\u{0C}", "\\f", "\r", "\\r"];

/// Normalize one line of output.
///
/// Trims surrounding whitespace, turns vertical-tab, form-feed and
/// carriage-return (raw or written as `\v`, `\f`, `\r`) into `\n`, then drops
/// every non-ASCII character.
pub fn normalize(line: &str) -> String {
    let mut line = line.trim().to_string();

    for spelling in LINE_BREAK_SPELLINGS {
        if line.contains(spelling) {
            line = line.replace(spelling, "\n");
        }
    }

    strip_non_ascii(&line)
}

/// Drop characters outside 0-127
pub fn strip_non_ascii(line: &str) -> String {
    line.chars().filter(char::is_ascii).collect()
}

/// Streaming filter that lets through at most one blank line per run
#[derive(Debug, Default, Clone)]
pub struct BlankRuns {
    consecutive: usize,
}

impl BlankRuns {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `line` should be written
    pub fn admit(&mut self, line: &str) -> bool {
        if line.is_empty() {
            self.consecutive += 1;
            self.consecutive == 1
        } else {
            self.consecutive = 0;
            true
        }
    }
}

/// Keep only the first blank line of every run of blank lines
pub fn collapse_blank_runs<I, S>(lines: I) -> Vec<S>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut runs = BlankRuns::new();
    lines.into_iter().filter(|line| runs.admit(line.as_ref())).collect()
}

/// Document-wide blank line reduction.
///
/// At most one blank line separates two non-blank lines, a leading run of
/// blank lines becomes a single one, and trailing blank lines (including the
/// final newline) are removed. Applying it twice gives the same result as
/// applying it once.
///
/// A one-line document without a newline comes back unchanged rather than
/// gaining a trailing `\n`; appending one would break idempotence. The
/// pipeline always feeds newline-terminated text, so its output is the same
/// either way.
pub fn reduce_empty_lines(text: &str) -> String {
    let mut kept: Vec<&str> = Vec::new();
    let mut pending_blank = false;

    for line in text.split('\n') {
        if line.is_empty() {
            pending_blank = true;
            continue;
        }

        if pending_blank {
            kept.push("");
            pending_blank = false;
        }
        kept.push(line);
    }

    kept.join("\n")
}
