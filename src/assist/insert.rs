//! Replacing a triggered span with the chosen suggestion.

use tracing::{debug, warn};

use super::trigger::SuggestionSession;
use crate::document::{Document, Span};
use crate::error::DocumentError;
use crate::types::SuggestionItem;

/// Result of a committed insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Insertion {
    /// The inserted `trigger value closing` text.
    pub span: Span,
    /// Caret position after the insertion.
    pub caret: usize,
}

/// Replace `[trigger_start, caret)` with `trigger + item.value + closing` and
/// close the session.
///
/// The selection is re-read right before mutating; without one the caret is
/// taken to be `trigger_start`. Delete and insert commit together: if the
/// insert fails the deleted text is put back. Returns `Ok(None)` when the
/// session has no trigger.
pub fn insert_suggestion<D: Document + ?Sized>(
    doc: &mut D,
    session: &mut SuggestionSession,
    item: &SuggestionItem,
    trigger: &str,
    closing: &str,
) -> Result<Option<Insertion>, DocumentError> {
    let Some(trigger_start) = session.trigger_start else {
        return Ok(None);
    };
    // Whatever happens below, this session is over.
    session.close();

    let len = doc.len();
    if trigger_start > len {
        return Err(DocumentError::StaleRange {
            start: trigger_start,
            end: trigger_start,
            len,
        });
    }

    let caret = doc
        .selection()
        .map(|s| s.index)
        .unwrap_or(trigger_start)
        .min(len);
    let delete_length = caret.saturating_sub(trigger_start);

    let removed = doc.text_range(trigger_start, delete_length)?;
    doc.delete_text(trigger_start, delete_length)?;

    let template = format!("{}{}{}", trigger, item.value, closing);
    if let Err(e) = doc.insert_text(trigger_start, &template) {
        if let Err(restore) = doc.insert_text(trigger_start, &removed) {
            warn!(error = %restore, "failed to restore text after aborted insertion");
        }
        return Err(e);
    }

    let inserted = template.chars().count();
    let caret = trigger_start + inserted;
    if let Err(e) = doc.set_selection(caret, 0) {
        warn!(error = %e, caret, "failed to move caret after insertion");
    }

    debug!(
        item = %item.id,
        trigger_start,
        replaced = delete_length,
        inserted,
        "inserted suggestion"
    );

    Ok(Some(Insertion {
        span: Span::new(trigger_start, caret),
        caret,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assist::trigger::TriggerDetector;
    use crate::document::{FocusTarget, Selection, TextBuffer};

    fn eq_item() -> SuggestionItem {
        SuggestionItem::new(1, "eq(a,b)", "eq(a, b)")
    }

    fn session_for(doc: &TextBuffer) -> SuggestionSession {
        let mut session = SuggestionSession::closed();
        TriggerDetector::new("{{", "}}").update(&mut session, doc, &[eq_item()]);
        session
    }

    #[test]
    fn replaces_trigger_and_query() {
        let mut doc = TextBuffer::with_text("{{e");
        let mut session = session_for(&doc);

        let inserted = insert_suggestion(&mut doc, &mut session, &eq_item(), "{{", "}}")
            .unwrap()
            .unwrap();
        assert_eq!(doc.text(), "{{eq(a, b)}}");
        assert_eq!(inserted.caret, 12);
        assert_eq!(inserted.span, Span::new(0, 12));
        assert_eq!(doc.selection(), Some(Selection::caret(12)));
        assert!(!session.is_open);
        assert_eq!(session.trigger_start, None);
    }

    #[test]
    fn keeps_surrounding_text() {
        let mut doc = TextBuffer::with_text("Hi {{e and more");
        doc.user_select(6, 0);
        let mut session = session_for(&doc);

        insert_suggestion(&mut doc, &mut session, &eq_item(), "{{", "}}").unwrap();
        assert_eq!(doc.text(), "Hi {{eq(a, b)}} and more");
        assert_eq!(doc.selection(), Some(Selection::caret(15)));
    }

    #[test]
    fn missing_selection_falls_back_to_trigger_start() {
        let mut doc = TextBuffer::with_text("x {{eq");
        let mut session = session_for(&doc);
        doc.blur(FocusTarget::Suggestions);

        insert_suggestion(&mut doc, &mut session, &eq_item(), "{{", "}}").unwrap();
        assert_eq!(doc.text(), "x {{eq(a, b)}}{{eq");
    }

    #[test]
    fn closed_session_is_noop() {
        let mut doc = TextBuffer::with_text("plain");
        let mut session = SuggestionSession::closed();
        let result = insert_suggestion(&mut doc, &mut session, &eq_item(), "{{", "}}").unwrap();
        assert!(result.is_none());
        assert_eq!(doc.text(), "plain");
    }

    #[test]
    fn stale_trigger_leaves_document_untouched() {
        let mut doc = TextBuffer::with_text("{{e");
        let mut session = session_for(&doc);
        session.trigger_start = Some(40);

        let err = insert_suggestion(&mut doc, &mut session, &eq_item(), "{{", "}}").unwrap_err();
        assert!(matches!(err, DocumentError::StaleRange { .. }));
        assert_eq!(doc.text(), "{{e");
        assert!(!session.is_open);
    }
}
