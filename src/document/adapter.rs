//! The contract between the editor core and a host rich-text buffer.

use crate::error::DocumentError;

/// Caret position plus selection length, in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub index: usize,
    pub length: usize,
}

impl Selection {
    pub fn new(index: usize, length: usize) -> Self {
        Self { index, length }
    }

    /// A collapsed selection (a plain caret).
    pub fn caret(index: usize) -> Self {
        Self { index, length: 0 }
    }

    pub fn is_collapsed(&self) -> bool {
        self.length == 0
    }
}

/// Screen-space caret bounds used to anchor the suggestion list.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub top: f32,
    pub left: f32,
    pub height: f32,
}

/// Inline styles the core applies to the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Style {
    /// Bold, shared with the host's own bold toggle.
    Bold,
    /// A complete `trigger…closing` template span.
    Variable,
    /// The delimiter characters of a markdown shortcut.
    MarkdownSyntax,
}

impl Style {
    /// Styles the editor registers with every document it attaches to.
    /// `Bold` is a host built-in and needs no registration.
    pub const CUSTOM: [Style; 2] = [Style::Variable, Style::MarkdownSyntax];

    /// Format name understood by the host.
    pub fn name(self) -> &'static str {
        match self {
            Style::Bold => "bold",
            Style::Variable => "template-variable",
            Style::MarkdownSyntax => "markdown-syntax",
        }
    }
}

/// Who caused a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeSource {
    /// Keystrokes, pointer actions, paste.
    User,
    /// Programmatic changes, including the editor's own mutations.
    Api,
    /// Changes that must not be observed at all, such as pure formatting.
    Silent,
}

/// Where focus went when the document lost it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
    /// Into the suggestion list; the session stays open.
    Suggestions,
    /// Anywhere else.
    Elsewhere,
}

/// Events a host dispatches to the editor, strictly in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorEvent {
    TextChange { source: ChangeSource },
    SelectionChange { source: ChangeSource },
    Blur { target: FocusTarget },
}

/// A mutable rich-text buffer owned by the host.
///
/// All offsets are character offsets. Mutations through this trait are
/// programmatic; a host that reports them back as events must tag them
/// [`ChangeSource::Api`], and pure formatting as [`ChangeSource::Silent`].
pub trait Document {
    /// The full plain text.
    fn text(&self) -> String;

    /// Length of the text in characters.
    fn len(&self) -> usize {
        self.text().chars().count()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Text of `[index, index + length)`.
    fn text_range(&self, index: usize, length: usize) -> Result<String, DocumentError> {
        let text = self.text();
        let len = text.chars().count();
        if index + length > len {
            return Err(DocumentError::StaleRange {
                start: index,
                end: index + length,
                len,
            });
        }
        Ok(text.chars().skip(index).take(length).collect())
    }

    /// The current selection, or `None` when the document is unfocused.
    fn selection(&self) -> Option<Selection>;

    fn set_selection(&mut self, index: usize, length: usize) -> Result<(), DocumentError>;

    fn insert_text(&mut self, index: usize, text: &str) -> Result<(), DocumentError>;

    fn delete_text(&mut self, index: usize, length: usize) -> Result<(), DocumentError>;

    /// Caret bounds at `index`, if the host can compute them.
    fn bounds(&self, index: usize) -> Option<Bounds>;

    /// Enable or disable `style` over `[start, start + length)`.
    fn format_range(
        &mut self,
        start: usize,
        length: usize,
        style: Style,
        enabled: bool,
    ) -> Result<(), DocumentError>;

    /// One-time registration of custom styles, performed on attach.
    fn register_styles(&mut self, styles: &[Style]);

    /// Return keyboard focus to the document.
    fn focus(&mut self) {}

    /// The selection, or `MissingSelection`.
    fn require_selection(&self) -> Result<Selection, DocumentError> {
        self.selection().ok_or(DocumentError::MissingSelection)
    }
}
