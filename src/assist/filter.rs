//! Suggestion filtering.

use crate::types::SuggestionItem;

/// Items whose label, value or description contains `query`, ignoring case.
///
/// Source order is kept; there is no ranking. An empty query keeps everything.
pub fn filter_suggestions(items: &[SuggestionItem], query: &str) -> Vec<SuggestionItem> {
    let query = query.to_lowercase();
    items
        .iter()
        .filter(|item| item.matches(&query))
        .cloned()
        .collect()
}
