//! Built-in template functions and variables, offered when the host opts in.

use std::sync::LazyLock;

use super::item::SuggestionItem;

/// A catalog entry. The label is also the inserted value.
struct BuiltinDef {
    label: &'static str,
    description: &'static str,
    category: &'static str,
    kind: &'static str,
}

const fn def(
    label: &'static str,
    description: &'static str,
    category: &'static str,
    kind: &'static str,
) -> BuiltinDef {
    BuiltinDef {
        label,
        description,
        category,
        kind,
    }
}

const DEFS: &[BuiltinDef] = &[
    // ==================== Equality and Comparison ====================
    def("eq(a, b)", "Returns true if a equals b", "Equality and Comparison", "function"),
    def("gt(a, b)", "Returns true if a is greater than b", "Equality and Comparison", "function"),
    def("lt(a, b)", "Returns true if a is less than b", "Equality and Comparison", "function"),
    // ==================== Logical Operations ====================
    def("and(...args)", "Returns true if all arguments are truthy", "Logical Operations", "function"),
    def("or(...args)", "Returns true if at least one argument is truthy", "Logical Operations", "function"),
    def("not(value)", "Returns the negation of the provided value", "Logical Operations", "function"),
    // ==================== String Manipulation ====================
    def("uppercase(str)", "Converts a string to uppercase", "String Manipulation", "function"),
    def("lowercase(str)", "Converts a string to lowercase", "String Manipulation", "function"),
    def("trim(str)", "Removes whitespace from both ends of a string", "String Manipulation", "function"),
    def("concat(...args)", "Joins multiple strings into one", "String Manipulation", "function"),
    // ==================== Conditional Checks ====================
    def("isset(value)", "Returns true if the value is not undefined or null", "Conditional Checks", "function"),
    def(
        "includes(data, searchValue)",
        "Checks if data contains searchValue (works with strings, arrays, and objects)",
        "Conditional Checks",
        "function",
    ),
    // ==================== Date and Time ====================
    def(
        "date(date, format, timezone)",
        "Formats a date according to the given format and timezone",
        "Date and Time",
        "function",
    ),
    def("day(date, timezone)", "Returns the day of the week for a given date", "Date and Time", "function"),
    // ==================== JSON Utilities ====================
    def("json stringify(context)", "Converts a context object into a JSON string", "JSON Utilities", "function"),
    // ==================== Variables ====================
    def("FLOW.last_response", "Use the last response (if set from the flow)", "Flow", "variable"),
    def("FLOW.last_utterance", "The last message from the visitor", "Flow", "variable"),
    def("FLOW.{variable_of_your_choice}", "Use any variable from the flow by its name", "Flow", "variable"),
    def("SESSION.status", "The status of the session", "Session", "variable"),
    def("VISITOR.name", "The name of the visitor", "Visitor", "variable"),
    def("VISITOR.region", "The region of the visitor", "Visitor", "variable"),
    def("VISITOR.language", "The language of the visitor", "Visitor", "variable"),
    def("CONTACT.name", "The name of the contact", "Contact", "variable"),
    def("CONTACT.email", "The email of the contact", "Contact", "variable"),
    def("CONTACT.phone", "The phone of the contact", "Contact", "variable"),
    def("CONTACT.company", "The company of the contact", "Contact", "variable"),
    def("CONTACT.country", "The country of the contact", "Contact", "variable"),
    def("CONTACT.city", "The city of the contact", "Contact", "variable"),
    def("CONTACT.region", "The region of the contact", "Contact", "variable"),
    def("CONTACT.tags", "The tags of the contact", "Contact", "variable"),
];

/// The built-in catalog, lazily initialized. Ids are 1-based positions.
pub static BUILTIN_SUGGESTIONS: LazyLock<Vec<SuggestionItem>> = LazyLock::new(|| {
    DEFS.iter()
        .zip(1i64..)
        .map(|(d, id)| {
            SuggestionItem::new(id, d.label, d.label)
                .with_description(d.description)
                .with_category(d.category)
                .with_kind(d.kind)
        })
        .collect()
});

/// Look up a built-in by label.
pub fn get_builtin(label: &str) -> Option<&'static SuggestionItem> {
    BUILTIN_SUGGESTIONS.iter().find(|item| item.label == label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_is_complete() {
        assert_eq!(BUILTIN_SUGGESTIONS.len(), 30);
        for item in BUILTIN_SUGGESTIONS.iter() {
            assert!(!item.label.is_empty());
            assert_eq!(item.label, item.value);
            assert!(item.description.is_some());
            assert!(item.category.is_some());
        }
    }

    #[test]
    fn get_builtin_returns_docs() {
        let eq = get_builtin("eq(a, b)").unwrap();
        assert_eq!(eq.category.as_deref(), Some("Equality and Comparison"));
        assert_eq!(eq.kind.as_deref(), Some("function"));
        assert!(get_builtin("unknown").is_none());
    }

    #[test]
    fn variables_are_tagged() {
        let name = get_builtin("CONTACT.name").unwrap();
        assert_eq!(name.kind.as_deref(), Some("variable"));
    }
}
