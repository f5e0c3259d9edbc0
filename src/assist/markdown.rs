//! `*text*` bold shortcut.
//!
//! Pressing `*` auto-pairs the delimiter (or wraps the selection), and every
//! rescan bolds exactly the interiors of single-asterisk pairs. Only regions
//! this processor created are ever un-bolded; bold applied by the host's own
//! toggle is left alone.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use super::keys::KeyOutcome;
use crate::document::{CharOffsets, Document, Span, Style};

/// Maximal runs of asterisks. A delimiter is a run of length one.
static ASTERISK_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*+").unwrap());

/// Interiors of every `*text*` pair in `text`.
///
/// Equivalent to scanning for `(?<!\*)\*([^*]+)\*(?!\*)` left to right: pairs
/// are formed by consecutive single-asterisk runs, and any longer run resets
/// the pairing.
pub fn shortcut_regions(text: &str) -> Vec<Span> {
    let offsets = CharOffsets::new(text);
    let mut regions = Vec::new();
    let mut open: Option<usize> = None;

    for run in ASTERISK_RUNS.find_iter(text) {
        if run.len() != 1 {
            open = None;
            continue;
        }
        let at = offsets.to_char(run.start());
        match open.take() {
            Some(start) => regions.push(Span::new(start + 1, at)),
            None => open = Some(at),
        }
    }

    regions
}

/// Maps positions in an old text to a new one, given a single contiguous edit.
#[derive(Debug, Clone, Copy)]
struct EditMap {
    /// Length of the common prefix.
    prefix: usize,
    /// Where the common suffix starts in the old text.
    old_tail: usize,
    /// Where the common suffix starts in the new text.
    new_tail: usize,
}

impl EditMap {
    fn between(old: &[char], new: &[char]) -> Self {
        let prefix = old.iter().zip(new).take_while(|(a, b)| a == b).count();
        let max_suffix = old.len().min(new.len()) - prefix;
        let suffix = old
            .iter()
            .rev()
            .zip(new.iter().rev())
            .take(max_suffix)
            .take_while(|(a, b)| a == b)
            .count();

        Self {
            prefix,
            old_tail: old.len() - suffix,
            new_tail: new.len() - suffix,
        }
    }

    /// New position of the character at `pos`, or `None` if it was deleted.
    fn char(&self, pos: usize) -> Option<usize> {
        if pos < self.prefix {
            Some(pos)
        } else if pos >= self.old_tail {
            Some(pos - self.old_tail + self.new_tail)
        } else {
            None
        }
    }

    /// New position of a range boundary. Boundaries inside the edit widen
    /// towards it: starts move to its beginning, ends to its end.
    fn boundary(&self, pos: usize, is_end: bool) -> usize {
        if pos <= self.prefix {
            pos
        } else if pos >= self.old_tail {
            pos - self.old_tail + self.new_tail
        } else if is_end {
            self.new_tail
        } else {
            self.prefix
        }
    }

    fn span(&self, span: Span) -> Span {
        let start = self.boundary(span.start, false);
        let end = self.boundary(span.end, true).max(start);
        Span::new(start, end)
    }
}

/// The closing asterisk of the last auto-inserted pair.
#[derive(Debug, Clone)]
struct PendingPair {
    closing: usize,
    /// Text right after the pair was inserted.
    text: Vec<char>,
}

#[derive(Debug, Clone, Default)]
pub struct MarkdownShortcuts {
    /// Regions currently bolded by this processor, in `processed` coordinates.
    regions: Vec<Span>,
    /// Text seen by the last rescan.
    processed: Vec<char>,
    pending_pair: Option<PendingPair>,
}

impl MarkdownShortcuts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn regions(&self) -> &[Span] {
        &self.regions
    }

    /// Whether `text` differs from what was last processed.
    pub fn is_stale(&self, text: &str) -> bool {
        !self.processed.iter().copied().eq(text.chars())
    }

    /// Handle a literal `*` keypress.
    ///
    /// Returns [`KeyOutcome::Ignored`] when there is no selection or the first
    /// mutation failed, so the host inserts the character itself.
    pub fn handle_asterisk<D: Document + ?Sized>(&mut self, doc: &mut D) -> KeyOutcome {
        let selection = match doc.require_selection() {
            Ok(selection) => selection,
            Err(e) => {
                debug!(error = %e, "asterisk left to the host");
                return KeyOutcome::Ignored;
            }
        };

        if !selection.is_collapsed() {
            return self.wrap_selection(doc, selection.index, selection.length);
        }

        let caret = selection.index;
        let chars: Vec<char> = doc.text().chars().collect();
        if caret > chars.len() {
            return KeyOutcome::Ignored;
        }

        if self.is_pending_closing(&chars, caret) {
            self.pending_pair = None;
            move_caret(doc, caret + 1);
            return KeyOutcome::Handled;
        }

        let before = caret.checked_sub(1).and_then(|i| chars.get(i));
        let after = chars.get(caret);
        if before == Some(&'*') || after == Some(&'*') {
            if let Err(e) = doc.insert_text(caret, "*") {
                warn!(error = %e, caret, "failed to insert asterisk");
                return KeyOutcome::Ignored;
            }
            move_caret(doc, caret + 1);
            return KeyOutcome::Handled;
        }

        if let Err(e) = doc.insert_text(caret, "**") {
            warn!(error = %e, caret, "failed to insert asterisk pair");
            return KeyOutcome::Ignored;
        }
        move_caret(doc, caret + 1);
        self.pending_pair = Some(PendingPair {
            closing: caret + 1,
            text: doc.text().chars().collect(),
        });
        KeyOutcome::Handled
    }

    fn is_pending_closing(&self, chars: &[char], caret: usize) -> bool {
        let Some(pair) = &self.pending_pair else {
            return false;
        };
        let mapped = EditMap::between(&pair.text, chars).char(pair.closing);
        mapped == Some(caret) && chars.get(caret) == Some(&'*')
    }

    fn wrap_selection<D: Document + ?Sized>(
        &mut self,
        doc: &mut D,
        index: usize,
        length: usize,
    ) -> KeyOutcome {
        let selected = match doc.text_range(index, length) {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "selection is stale, not wrapping");
                return KeyOutcome::Ignored;
            }
        };
        if let Err(e) = doc.delete_text(index, length) {
            warn!(error = %e, "failed to remove selection for wrapping");
            return KeyOutcome::Ignored;
        }
        if let Err(e) = doc.insert_text(index, &format!("*{}*", selected)) {
            warn!(error = %e, "failed to wrap selection");
            if let Err(restore) = doc.insert_text(index, &selected) {
                warn!(error = %restore, "failed to restore selection text");
            }
            return KeyOutcome::Ignored;
        }

        let count = selected.chars().count();
        if let Err(e) = doc.format_range(index + 1, count, Style::Bold, true) {
            warn!(error = %e, "failed to bold wrapped selection");
        }
        move_caret(doc, index + count + 2);
        debug!(index, length = count, "wrapped selection in asterisks");
        KeyOutcome::Handled
    }

    /// Rescan the document and sync bold formatting to the current pairs.
    ///
    /// Tracked regions whose delimiter was deleted, or that no longer form a
    /// pair, lose their formatting; every current pair is (re)applied.
    pub fn process<D: Document + ?Sized>(&mut self, doc: &mut D) {
        let text = doc.text();
        let chars: Vec<char> = text.chars().collect();
        let regions = shortcut_regions(&text);
        let edit = EditMap::between(&self.processed, &chars);

        for old in &self.regions {
            let open = edit.char(old.start - 1);
            let close = edit.char(old.end);
            let mapped = edit.span(*old);

            if open.is_some() && close.is_some() && regions.contains(&mapped) {
                continue;
            }
            if open.is_none() || close.is_none() {
                debug!(region = %mapped, "shortcut delimiter deleted");
            }

            if let Err(e) = doc.format_range(mapped.start, mapped.len(), Style::Bold, false) {
                warn!(error = %e, region = %mapped, "failed to clear shortcut bold");
            }
            for delimiter in [open, close].into_iter().flatten() {
                if let Err(e) = doc.format_range(delimiter, 1, Style::MarkdownSyntax, false) {
                    warn!(error = %e, delimiter, "failed to clear delimiter style");
                }
            }
        }

        for region in &regions {
            if let Err(e) = doc.format_range(region.start, region.len(), Style::Bold, true) {
                warn!(error = %e, %region, "skipping shortcut bold");
                continue;
            }
            for delimiter in [region.start - 1, region.end] {
                if let Err(e) = doc.format_range(delimiter, 1, Style::MarkdownSyntax, true) {
                    warn!(error = %e, delimiter, "skipping delimiter style");
                }
            }
        }

        self.regions = regions;
        self.processed = chars;
    }
}

fn move_caret<D: Document + ?Sized>(doc: &mut D, index: usize) {
    if let Err(e) = doc.set_selection(index, 0) {
        warn!(error = %e, index, "failed to move caret");
    }
}
