//! Live highlighting of complete `trigger…closing` templates.
//!
//! A repaint clears the variable style over the whole document and re-applies
//! it to every non-overlapping leftmost match, so the painted spans always equal
//! a fresh scan of the current text.

use regex::Regex;
use tracing::{debug, warn};

use crate::document::{CharOffsets, Document, Span, Style};

/// Every complete template in `text`, as character spans.
pub fn template_spans(pattern: &Regex, text: &str) -> Vec<Span> {
    let offsets = CharOffsets::new(text);
    pattern
        .find_iter(text)
        .map(|m| offsets.span(m.range()))
        .collect()
}

#[derive(Debug, Clone)]
pub struct Highlighter {
    pattern: Regex,
    spans: Vec<Span>,
    /// Text seen by the last repaint.
    painted: Option<String>,
}

impl Highlighter {
    pub fn new(pattern: Regex) -> Self {
        Self {
            pattern,
            spans: Vec::new(),
            painted: None,
        }
    }

    /// Spans applied by the last repaint.
    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    /// Whether `text` differs from what was last painted.
    pub fn is_stale(&self, text: &str) -> bool {
        self.painted.as_deref() != Some(text)
    }

    /// Clear and re-apply the variable style. Formatting failures are logged
    /// and skipped individually.
    pub fn repaint<D: Document + ?Sized>(&mut self, doc: &mut D) -> &[Span] {
        let text = doc.text();
        let len = CharOffsets::new(&text).char_len();

        if let Err(e) = doc.format_range(0, len, Style::Variable, false) {
            warn!(error = %e, "failed to clear template highlighting");
        }

        let spans = template_spans(&self.pattern, &text);
        for span in &spans {
            if let Err(e) = doc.format_range(span.start, span.len(), Style::Variable, true) {
                warn!(error = %e, %span, "skipping template highlight");
            }
        }

        debug!(count = spans.len(), "repainted templates");
        self.spans = spans;
        self.painted = Some(text);
        &self.spans
    }
}
