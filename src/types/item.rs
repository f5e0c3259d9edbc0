//! Suggestion items supplied by the host application.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Item identifier. Hosts use either numbers or strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    Number(i64),
    Text(String),
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemId::Number(n) => write!(f, "{}", n),
            ItemId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ItemId {
    fn from(n: i64) -> Self {
        ItemId::Number(n)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        ItemId::Text(s.to_string())
    }
}

/// One completion candidate. `value` is what gets inserted between the
/// trigger and closing sequences; `label` is what the list shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionItem {
    pub id: ItemId,
    pub label: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl SuggestionItem {
    pub fn new(id: impl Into<ItemId>, label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            value: value.into(),
            description: None,
            category: None,
            kind: None,
            link: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    /// Case-insensitive substring match against label, value or description.
    /// `query_lower` must already be lowercase.
    pub fn matches(&self, query_lower: &str) -> bool {
        if query_lower.is_empty() {
            return true;
        }
        self.label.to_lowercase().contains(query_lower)
            || self.value.to_lowercase().contains(query_lower)
            || self
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(query_lower))
    }
}

/// Group items by category for presentation.
///
/// Categories appear in first-seen order and items keep their source order
/// within a group. Items without a category are grouped under `None`.
pub fn group_by_category(items: &[SuggestionItem]) -> Vec<(Option<&str>, Vec<&SuggestionItem>)> {
    let mut groups: Vec<(Option<&str>, Vec<&SuggestionItem>)> = Vec::new();

    for item in items {
        let category = item.category.as_deref();
        match groups.iter_mut().find(|(c, _)| *c == category) {
            Some((_, members)) => members.push(item),
            None => groups.push((category, vec![item])),
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_label_value_and_description() {
        let item = SuggestionItem::new(1, "Equals", "eq(a, b)")
            .with_description("Returns true if a equals b");
        assert!(item.matches("equ"));
        assert!(item.matches("eq(a"));
        assert!(item.matches("returns true"));
        assert!(item.matches(""));
        assert!(!item.matches("gt"));
    }

    #[test]
    fn deserializes_numeric_and_string_ids() {
        let item: SuggestionItem =
            serde_json::from_str(r#"{"id": 7, "label": "a", "value": "b", "type": "function"}"#)
                .unwrap();
        assert_eq!(item.id, ItemId::Number(7));
        assert_eq!(item.kind.as_deref(), Some("function"));

        let item: SuggestionItem =
            serde_json::from_str(r#"{"id": "x-1", "label": "a", "value": "b"}"#).unwrap();
        assert_eq!(item.id, ItemId::Text("x-1".to_string()));
        assert_eq!(item.id.to_string(), "x-1");
    }

    #[test]
    fn groups_keep_first_seen_order() {
        let items = vec![
            SuggestionItem::new(1, "a", "a").with_category("Logic"),
            SuggestionItem::new(2, "b", "b").with_category("Strings"),
            SuggestionItem::new(3, "c", "c").with_category("Logic"),
            SuggestionItem::new(4, "d", "d"),
        ];
        let groups = group_by_category(&items);
        let summary: Vec<(Option<&str>, Vec<&str>)> = groups
            .iter()
            .map(|(c, members)| (*c, members.iter().map(|i| i.label.as_str()).collect()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (Some("Logic"), vec!["a", "c"]),
                (Some("Strings"), vec!["b"]),
                (None, vec!["d"]),
            ]
        );
    }
}
