//! Editing assistance built on top of a [`Document`](crate::document::Document).
//!
//! This module provides:
//! - Trigger detection and the suggestion session
//! - Suggestion filtering and insertion
//! - Keyboard navigation of the suggestion list
//! - Template highlighting and `*bold*` shortcuts
//! - The debounce pipeline that schedules derived work

mod filter;
mod highlight;
mod insert;
mod keys;
mod markdown;
mod schedule;
mod trigger;

pub use filter::filter_suggestions;
pub use highlight::{template_spans, Highlighter};
pub use insert::{insert_suggestion, Insertion};
pub use keys::{Key, KeyOutcome, NavAction, NavigationController};
pub use markdown::{shortcut_regions, MarkdownShortcuts};
pub use schedule::{Pipeline, Step};
pub use trigger::{detect, Detection, SuggestionSession, TriggerDetector};
