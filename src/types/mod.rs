//! Suggestion item types and the built-in catalog.
//!
//! This module provides:
//! - `SuggestionItem` and `ItemId`, the candidate type supplied by hosts
//! - `group_by_category` for renderers that show category headers
//! - The built-in template function/variable catalog

mod builtins;
mod item;

pub use builtins::{get_builtin, BUILTIN_SUGGESTIONS};
pub use item::{group_by_category, ItemId, SuggestionItem};
