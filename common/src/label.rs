//! Multi-line labels.
//!
//! Route numbers have up to three stacked parts and destinations up to two.
//! A [`Label`] keeps those parts as separate lines so nothing downstream has
//! to split on a marker. [`Label::parse_marked`] accepts the legacy
//! `<br>`-joined form for config-supplied text.

use std::fmt;

use heapless::Vec;

/// Most lines any label can stack.
pub const MAX_LABEL_LINES: usize = 3;

/// Line break marker used by legacy joined strings.
pub const LINE_BREAK_MARKER: &str = "<br>";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Label {
    lines: Vec<String, MAX_LABEL_LINES>,
}

impl Label {
    /// Build a label from ordered parts. Empty parts are skipped;
    /// whitespace-only parts count as content. Parts past
    /// [`MAX_LABEL_LINES`] are dropped.
    pub fn from_parts<S: AsRef<str>>(parts: &[S]) -> Self {
        let mut lines = Vec::new();
        for part in parts {
            let part: &str = part.as_ref();
            if part.is_empty() {
                continue;
            }
            if lines.push(part.to_owned()).is_err() {
                break;
            }
        }
        Self { lines }
    }

    /// Split a `<br>`-joined string. A marker with one side empty yields a
    /// single-line label of the present side.
    pub fn parse_marked(text: &str) -> Self {
        let parts: std::vec::Vec<&str> = text.split(LINE_BREAK_MARKER).collect();
        Self::from_parts(&parts)
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Lines joined with the break marker.
    pub fn joined(&self) -> String {
        self.lines.join(LINE_BREAK_MARKER)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.joined())
    }
}
