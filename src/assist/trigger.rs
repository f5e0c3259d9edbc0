//! Trigger detection and suggestion session state.
//!
//! On every relevant document event the detector looks at the text before the
//! caret and decides whether a session opens, stays open with a new query, or
//! closes. The decision is a pure function of text and selection, so running it
//! twice on the same document yields the same session.

use tracing::debug;

use super::filter::filter_suggestions;
use crate::document::{Bounds, CharOffsets, Document, Selection};
use crate::types::SuggestionItem;

/// Live state of a suggestion interaction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SuggestionSession {
    pub is_open: bool,
    /// Character offset of the trigger that opened the session.
    pub trigger_start: Option<usize>,
    /// Text typed between the trigger and the caret.
    pub query: String,
    pub filtered_items: Vec<SuggestionItem>,
    pub selected_index: usize,
    /// Caret bounds at `trigger_start`, for anchoring the list.
    pub anchor: Option<Bounds>,
    /// Trigger, query and index of the last session, kept across a close.
    memo: Option<(usize, String, usize)>,
}

impl SuggestionSession {
    pub fn closed() -> Self {
        Self::default()
    }

    pub fn selected_item(&self) -> Option<&SuggestionItem> {
        if !self.is_open {
            return None;
        }
        self.filtered_items.get(self.selected_index)
    }

    pub fn last_index(&self) -> usize {
        self.filtered_items.len().saturating_sub(1)
    }

    /// Close the session, remembering where it was.
    pub fn close(&mut self) {
        if let Some(start) = self.trigger_start.take() {
            self.memo = Some((start, self.query.clone(), self.selected_index));
            debug!(trigger_start = start, query = %self.query, "suggestion session closed");
        }
        self.is_open = false;
        self.anchor = None;
    }

    /// Selected index to use for a session at `trigger_start` with `query`:
    /// the remembered one if both match, otherwise 0.
    fn restored_index(&self, trigger_start: usize, query: &str, item_count: usize) -> usize {
        let remembered = if self.is_open {
            self.trigger_start
                .map(|start| (start, self.query.as_str(), self.selected_index))
        } else {
            self.memo
                .as_ref()
                .map(|(start, q, idx)| (*start, q.as_str(), *idx))
        };

        match remembered {
            Some((start, q, idx)) if start == trigger_start && q == query => {
                idx.min(item_count.saturating_sub(1))
            }
            _ => 0,
        }
    }
}

/// Outcome of scanning the text around the caret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detection {
    /// No selection; leave the session as it is.
    Unchanged,
    Closed,
    Open { trigger_start: usize, query: String },
}

/// Decide the session state for `text` and `selection`.
///
/// Uses the rightmost trigger before the caret that is not followed by a
/// closing sequence before the caret.
pub fn detect(text: &str, selection: Option<Selection>, trigger: &str, closing: &str) -> Detection {
    let Some(selection) = selection else {
        return Detection::Unchanged;
    };
    if !selection.is_collapsed() {
        return Detection::Closed;
    }

    let offsets = CharOffsets::new(text);
    let cursor = selection.index;
    if cursor > offsets.char_len() {
        return Detection::Closed;
    }
    let before = &text[..offsets.to_byte(cursor)];

    // Trigger typed right before the caret.
    if before.ends_with(trigger) {
        let start = before.len() - trigger.len();
        return Detection::Open {
            trigger_start: offsets.to_char(start),
            query: String::new(),
        };
    }

    // Caret inside an unclosed template. A closing that starts before the
    // caret ends it, even if it finishes after the caret.
    if let Some(start) = before.rfind(trigger) {
        let query_start = start + trigger.len();
        let closed = text[query_start..]
            .find(closing)
            .is_some_and(|at| query_start + at < before.len());
        if !closed {
            return Detection::Open {
                trigger_start: offsets.to_char(start),
                query: before[query_start..].to_string(),
            };
        }
    }

    Detection::Closed
}

/// Applies detections to a session.
#[derive(Debug, Clone)]
pub struct TriggerDetector {
    trigger: String,
    closing: String,
}

impl TriggerDetector {
    pub fn new(trigger: &str, closing: &str) -> Self {
        Self {
            trigger: trigger.to_string(),
            closing: closing.to_string(),
        }
    }

    /// Re-run detection against the document and update `session` in place.
    pub fn update<D: Document + ?Sized>(
        &self,
        session: &mut SuggestionSession,
        doc: &D,
        items: &[SuggestionItem],
    ) {
        let detection = detect(&doc.text(), doc.selection(), &self.trigger, &self.closing);

        match detection {
            Detection::Unchanged => {}
            Detection::Closed => session.close(),
            Detection::Open {
                trigger_start,
                query,
            } => {
                let filtered_items = filter_suggestions(items, &query);
                let selected_index =
                    session.restored_index(trigger_start, &query, filtered_items.len());

                if !session.is_open || session.trigger_start != Some(trigger_start) {
                    debug!(trigger_start, query = %query, "suggestion session opened");
                }

                session.is_open = true;
                session.trigger_start = Some(trigger_start);
                session.query = query;
                session.filtered_items = filtered_items;
                session.selected_index = selected_index;
                session.anchor = doc.bounds(trigger_start);
            }
        }
    }

    /// Re-check an open session after an edit the user did not make.
    ///
    /// Closes the session when its trigger is gone or moved, and refreshes the
    /// query when it is still anchored. Never opens a session.
    pub fn revalidate<D: Document + ?Sized>(
        &self,
        session: &mut SuggestionSession,
        doc: &D,
        items: &[SuggestionItem],
    ) {
        let Some(start) = session.trigger_start.filter(|_| session.is_open) else {
            return;
        };

        let text = doc.text();
        let offsets = CharOffsets::new(&text);
        let anchored =
            start <= offsets.char_len() && text[offsets.to_byte(start)..].starts_with(&self.trigger);
        if !anchored {
            debug!(trigger_start = start, "trigger removed under open session");
            session.close();
            return;
        }

        match detect(&text, doc.selection(), &self.trigger, &self.closing) {
            Detection::Unchanged => {}
            Detection::Open { trigger_start, .. } if trigger_start == start => {
                self.update(session, doc, items)
            }
            Detection::Open { .. } | Detection::Closed => session.close(),
        }
    }
}
