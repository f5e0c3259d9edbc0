//! In-memory reference implementation of [`Document`].
//!
//! `TextBuffer` behaves like a minimal rich-text host: plain characters with a
//! per-character style mask, a single selection, and an event queue that the
//! host loop drains and forwards to the editor. The `type_text`, `backspace`,
//! `user_select` and `blur` helpers simulate user input and emit user-sourced
//! events; the [`Document`] methods emit api-sourced ones.

use std::collections::{HashSet, VecDeque};

use super::adapter::{
    Bounds, ChangeSource, Document, EditorEvent, FocusTarget, Selection, Style,
};
use super::text::{LineIndex, Span};
use crate::error::DocumentError;

/// Monospace metrics used to compute caret bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharMetrics {
    pub char_width: f32,
    pub line_height: f32,
}

impl Default for CharMetrics {
    fn default() -> Self {
        Self {
            char_width: 8.0,
            line_height: 18.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct StyleMask(u8);

impl StyleMask {
    fn bit(style: Style) -> u8 {
        match style {
            Style::Bold => 1,
            Style::Variable => 1 << 1,
            Style::MarkdownSyntax => 1 << 2,
        }
    }

    fn has(self, style: Style) -> bool {
        self.0 & Self::bit(style) != 0
    }

    fn set(&mut self, style: Style, enabled: bool) {
        if enabled {
            self.0 |= Self::bit(style);
        } else {
            self.0 &= !Self::bit(style);
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TextBuffer {
    chars: Vec<char>,
    styles: Vec<StyleMask>,
    selection: Option<Selection>,
    /// Selection at the last blur, restored by `focus`.
    blurred: Option<Selection>,
    registered: HashSet<Style>,
    events: VecDeque<EditorEvent>,
    metrics: CharMetrics,
}

impl TextBuffer {
    /// An empty, focused buffer with the caret at 0.
    pub fn new() -> Self {
        Self {
            selection: Some(Selection::caret(0)),
            ..Default::default()
        }
    }

    /// A focused buffer holding `text`, caret at the end. No events are queued.
    pub fn with_text(text: &str) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let len = chars.len();
        Self {
            styles: vec![StyleMask::default(); len],
            chars,
            selection: Some(Selection::caret(len)),
            ..Default::default()
        }
    }

    pub fn with_metrics(mut self, metrics: CharMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    /// Take every queued event, oldest first.
    pub fn drain_events(&mut self) -> Vec<EditorEvent> {
        self.events.drain(..).collect()
    }

    pub fn has_style(&self, index: usize, style: Style) -> bool {
        self.styles.get(index).is_some_and(|m| m.has(style))
    }

    /// Maximal runs of characters carrying `style`.
    pub fn style_spans(&self, style: Style) -> Vec<Span> {
        let mut spans = Vec::new();
        let mut start = None;

        for (i, mask) in self.styles.iter().enumerate() {
            match (mask.has(style), start) {
                (true, None) => start = Some(i),
                (false, Some(s)) => {
                    spans.push(Span::new(s, i));
                    start = None;
                }
                _ => {}
            }
        }
        if let Some(s) = start {
            spans.push(Span::new(s, self.styles.len()));
        }
        spans
    }

    pub fn is_registered(&self, style: Style) -> bool {
        style == Style::Bold || self.registered.contains(&style)
    }

    // ---------------------------------------------------------------------
    // User input simulation
    // ---------------------------------------------------------------------

    /// Type `text` at the caret as the user would, replacing any selection.
    ///
    /// Emits one text change and one selection change per character.
    pub fn type_text(&mut self, text: &str) {
        for c in text.chars() {
            let selection = self.selection.unwrap_or(Selection::caret(self.chars.len()));
            if !selection.is_collapsed() {
                self.remove_chars(selection.index, selection.length);
            }
            let at = selection.index.min(self.chars.len());
            self.chars.insert(at, c);
            self.styles.insert(at, StyleMask::default());
            self.selection = Some(Selection::caret(at + 1));
            self.events.push_back(EditorEvent::TextChange {
                source: ChangeSource::User,
            });
            self.events.push_back(EditorEvent::SelectionChange {
                source: ChangeSource::User,
            });
        }
    }

    /// Delete the selection, or the character before the caret.
    pub fn backspace(&mut self) {
        let Some(selection) = self.selection else {
            return;
        };
        let (index, length) = if selection.is_collapsed() {
            if selection.index == 0 {
                return;
            }
            (selection.index - 1, 1)
        } else {
            (selection.index, selection.length)
        };
        self.remove_chars(index, length);
        self.selection = Some(Selection::caret(index));
        self.events.push_back(EditorEvent::TextChange {
            source: ChangeSource::User,
        });
        self.events.push_back(EditorEvent::SelectionChange {
            source: ChangeSource::User,
        });
    }

    /// Move the caret or select a range, as with a pointer or arrow keys.
    pub fn user_select(&mut self, index: usize, length: usize) {
        let len = self.chars.len();
        let index = index.min(len);
        self.selection = Some(Selection::new(index, length.min(len - index)));
        self.events.push_back(EditorEvent::SelectionChange {
            source: ChangeSource::User,
        });
    }

    /// Drop focus. The selection becomes unavailable until `focus`.
    pub fn blur(&mut self, target: FocusTarget) {
        if let Some(selection) = self.selection.take() {
            self.blurred = Some(selection);
        }
        self.events.push_back(EditorEvent::Blur { target });
    }

    fn check_range(&self, start: usize, length: usize) -> Result<(), DocumentError> {
        let len = self.chars.len();
        if start + length > len {
            return Err(DocumentError::StaleRange {
                start,
                end: start + length,
                len,
            });
        }
        Ok(())
    }

    fn remove_chars(&mut self, index: usize, length: usize) {
        self.chars.drain(index..index + length);
        self.styles.drain(index..index + length);
    }
}

impl Document for TextBuffer {
    fn text(&self) -> String {
        self.chars.iter().collect()
    }

    fn len(&self) -> usize {
        self.chars.len()
    }

    fn text_range(&self, index: usize, length: usize) -> Result<String, DocumentError> {
        self.check_range(index, length)?;
        Ok(self.chars[index..index + length].iter().collect())
    }

    fn selection(&self) -> Option<Selection> {
        self.selection
    }

    fn set_selection(&mut self, index: usize, length: usize) -> Result<(), DocumentError> {
        self.check_range(index, length)?;
        self.selection = Some(Selection::new(index, length));
        self.events.push_back(EditorEvent::SelectionChange {
            source: ChangeSource::Api,
        });
        Ok(())
    }

    fn insert_text(&mut self, index: usize, text: &str) -> Result<(), DocumentError> {
        self.check_range(index, 0)?;
        let inserted: Vec<char> = text.chars().collect();
        let count = inserted.len();
        if count == 0 {
            return Ok(());
        }

        self.chars.splice(index..index, inserted);
        self.styles
            .splice(index..index, std::iter::repeat(StyleMask::default()).take(count));

        // Programmatic inserts at the caret leave the caret in place.
        if let Some(sel) = self.selection.as_mut() {
            if index < sel.index {
                sel.index += count;
            } else if index < sel.index + sel.length {
                sel.length += count;
            }
        }

        self.events.push_back(EditorEvent::TextChange {
            source: ChangeSource::Api,
        });
        Ok(())
    }

    fn delete_text(&mut self, index: usize, length: usize) -> Result<(), DocumentError> {
        self.check_range(index, length)?;
        if length == 0 {
            return Ok(());
        }
        self.remove_chars(index, length);

        if let Some(sel) = self.selection.as_mut() {
            let shift = |p: usize| {
                if p <= index {
                    p
                } else if p >= index + length {
                    p - length
                } else {
                    index
                }
            };
            let start = shift(sel.index);
            let end = shift(sel.index + sel.length);
            *sel = Selection::new(start, end - start);
        }

        self.events.push_back(EditorEvent::TextChange {
            source: ChangeSource::Api,
        });
        Ok(())
    }

    fn bounds(&self, index: usize) -> Option<Bounds> {
        let text = self.text();
        let position = LineIndex::new(&text).offset_to_position(index)?;
        Some(Bounds {
            top: position.line as f32 * self.metrics.line_height,
            left: position.column as f32 * self.metrics.char_width,
            height: self.metrics.line_height,
        })
    }

    fn format_range(
        &mut self,
        start: usize,
        length: usize,
        style: Style,
        enabled: bool,
    ) -> Result<(), DocumentError> {
        if !self.is_registered(style) {
            return Err(DocumentError::UnregisteredStyle(style.name()));
        }
        self.check_range(start, length)?;
        for mask in &mut self.styles[start..start + length] {
            mask.set(style, enabled);
        }
        Ok(())
    }

    fn register_styles(&mut self, styles: &[Style]) {
        self.registered.extend(styles.iter().copied());
    }

    fn focus(&mut self) {
        if self.selection.is_none() {
            let len = self.chars.len();
            let caret = self.blurred.take().map_or(len, |s| s.index.min(len));
            self.selection = Some(Selection::caret(caret));
        }
    }
}
