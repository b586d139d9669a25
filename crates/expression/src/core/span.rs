//! Byte ranges into rule text
//!
//! Every token and every syntax error points back into the rule string it
//! came from through a [`Span`].

use std::fmt;

/// A half-open byte range in a rule string.
///
/// Uses `u32` offsets; rule text embedded in field annotations is short.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Start byte offset
    pub start: u32,
    /// End byte offset (exclusive)
    pub end: u32,
}

impl Span {
    /// Create a new span
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start: start as u32,
            end: end as u32,
        }
    }

    /// An empty span positioned at `offset`
    pub fn at(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    /// Byte offset where the span begins
    pub fn offset(&self) -> usize {
        self.start as usize
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start) as usize
    }

    /// True for zero-width spans such as end-of-input
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// The text this span covers in `source`, or `""` when out of range
    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        source
            .get(self.start as usize..self.end as usize)
            .unwrap_or("")
    }

    /// 1-based column of the span start, counted in characters
    ///
    /// Rule text is a single line, so the column is all a diagnostic needs.
    pub fn column(&self, source: &str) -> usize {
        let start = self.start as usize;
        source
            .char_indices()
            .take_while(|(i, _)| *i < start)
            .count()
            + 1
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_len_and_empty() {
        let span = Span::new(4, 9);
        assert_eq!(span.len(), 5);
        assert!(!span.is_empty());
        assert!(Span::at(3).is_empty());
    }

    #[test]
    fn test_span_slice() {
        let source = "required & email";
        assert_eq!(Span::new(0, 8).slice(source), "required");
        assert_eq!(Span::new(11, 16).slice(source), "email");
        assert_eq!(Span::new(11, 99).slice(source), "");
    }

    #[test]
    fn test_column_counts_chars_not_bytes() {
        let source = "eq:'ü' & x";
        // 'ü' is two bytes, so `&` sits at byte 8 but column 8
        assert_eq!(Span::at(8).column(source), 8);
        assert_eq!(Span::at(0).column(source), 1);
    }
}
