//! Source location model and helpers.
//!
//! `Span` stores *both* line and byte ranges. Lines are 1-based (as commonly
//! reported to users), while bytes are 0-based offsets into the original text.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Inclusive start line (1-based).
    pub start_line: usize,
    /// Inclusive end line (1-based).
    pub end_line: usize,
    /// Inclusive start byte (0-based).
    pub start_byte: usize,
    /// Exclusive end byte (0-based).
    pub end_byte: usize,
}

impl Span {
    /// Build a span from line and byte ranges.
    pub fn new(start_line: usize, end_line: usize, start_byte: usize, end_byte: usize) -> Self {
        Self {
            start_line,
            end_line,
            start_byte,
            end_byte,
        }
    }

    /// Merge two spans (assuming they belong to the same file).
    pub fn merge(a: &Span, b: &Span) -> Span {
        Span {
            start_line: a.start_line.min(b.start_line),
            end_line: a.end_line.max(b.end_line),
            start_byte: a.start_byte.min(b.start_byte),
            end_byte: a.end_byte.max(b.end_byte),
        }
    }

    /// `true` if `other` lies fully inside `self` (byte-wise).
    pub fn contains(&self, other: &Span) -> bool {
        self.start_byte <= other.start_byte && other.end_byte <= self.end_byte
    }

    /// `true` if the byte ranges share at least one byte.
    pub fn overlaps(&self, other: &Span) -> bool {
        self.start_byte < other.end_byte && other.start_byte < self.end_byte
    }

    /// Extract a snippet from `text` by byte offsets, with *safe* bounds.
    ///
    /// Offsets that fall inside a multi-byte character are clamped outward to
    /// the nearest boundary.
    pub fn slice_text<'a>(&self, text: &'a str) -> &'a str {
        let len = text.len();
        let mut start = self.start_byte.min(len);
        while !text.is_char_boundary(start) {
            start -= 1;
        }
        let mut end = self.end_byte.min(len).max(start);
        while !text.is_char_boundary(end) {
            end += 1;
        }
        &text[start..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn containment_and_overlap() {
        let outer = Span::new(1, 10, 0, 100);
        let inner = Span::new(2, 3, 10, 40);
        let sibling = Span::new(11, 12, 100, 120);

        assert!(outer.contains(&inner));
        assert!(!inner.contains(&outer));
        assert!(outer.overlaps(&inner));
        assert!(!outer.overlaps(&sibling));
        assert_eq!(Span::merge(&outer, &sibling), Span::new(1, 12, 0, 120));
    }

    #[test]
    fn slice_clamps_to_char_boundaries() {
        let text = "aé b";
        // byte 2 is inside `é`
        let span = Span::new(1, 1, 2, 4);
        assert_eq!(span.slice_text(text), "é ");
        assert_eq!(Span::new(1, 1, 0, 999).slice_text(text), text);
    }
}
