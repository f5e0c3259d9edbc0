//! Text utilities for offset conversion.
//!
//! Documents are addressed in character offsets (Unicode scalar values) while
//! `regex` reports byte offsets. `CharOffsets` bridges the two, and `LineIndex`
//! maps character offsets to line/column positions for caret bounds.

use std::fmt;
use std::ops::Range;

use serde::Serialize;

/// A half-open `[start, end)` range of character offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "span start {} > end {}", start, end);
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.start && offset < self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Byte offset <-> character offset conversion for a single text snapshot.
#[derive(Debug, Clone)]
pub struct CharOffsets {
    /// Byte offset where each character starts, plus a final entry for the text length.
    char_starts: Vec<usize>,
}

impl CharOffsets {
    pub fn new(text: &str) -> Self {
        let mut char_starts: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
        char_starts.push(text.len());
        Self { char_starts }
    }

    /// Number of characters in the text.
    pub fn char_len(&self) -> usize {
        self.char_starts.len() - 1
    }

    /// Convert a byte offset (on a char boundary) to a character offset.
    ///
    /// Offsets inside a multi-byte character round down to that character.
    pub fn to_char(&self, byte: usize) -> usize {
        match self.char_starts.binary_search(&byte) {
            Ok(idx) => idx,
            Err(idx) => idx.saturating_sub(1),
        }
    }

    /// Convert a character offset to a byte offset, clamped to the text length.
    pub fn to_byte(&self, char_offset: usize) -> usize {
        let last = self.char_starts.len() - 1;
        self.char_starts[char_offset.min(last)]
    }

    /// Convert a byte range reported by `regex` to a character span.
    pub fn span(&self, bytes: Range<usize>) -> Span {
        Span::new(self.to_char(bytes.start), self.to_char(bytes.end))
    }
}

/// A line/column position. Both are zero-based; columns count characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

/// Pre-computed line index for position lookups.
///
/// Stores the character offset where every line starts so lookups are a
/// binary search.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Character offset where each line starts.
    line_starts: Vec<usize>,
    /// Total number of characters.
    len: usize,
}

impl LineIndex {
    /// Build a line index from text.
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        let mut len = 0;

        for (i, c) in text.chars().enumerate() {
            if c == '\n' {
                line_starts.push(i + 1);
            }
            len = i + 1;
        }

        Self { line_starts, len }
    }

    /// Convert a character offset to a position. Returns `None` past the end.
    pub fn offset_to_position(&self, offset: usize) -> Option<Position> {
        if offset > self.len {
            return None;
        }

        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(line) => line.saturating_sub(1),
        };

        let column = offset - self.line_starts[line];
        Some(Position::new(line as u32, column as u32))
    }
}
