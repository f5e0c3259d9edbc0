//! Document contract and text utilities.
//!
//! This module provides:
//! - `Document`, the adapter trait the editor core mutates, and its event types
//! - `TextBuffer`, an in-memory reference document
//! - `CharOffsets`, `LineIndex` and `Span` for offset conversion

mod adapter;
mod buffer;
mod text;

pub use adapter::{
    Bounds, ChangeSource, Document, EditorEvent, FocusTarget, Selection, Style,
};
pub use buffer::{CharMetrics, TextBuffer};
pub use text::{CharOffsets, LineIndex, Position, Span};
