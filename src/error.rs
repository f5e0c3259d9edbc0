//! Error types for document operations and configuration.

use std::path::PathBuf;

use thiserror::Error;

/// Failures reported by a [`Document`](crate::Document) implementation.
///
/// None of these are fatal: the editor logs them and skips the single
/// operation that failed, then heals on the next full rescan.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    /// The range no longer exists, usually because of a concurrent edit.
    #[error("range {start}..{end} is out of bounds for a document of length {len}")]
    StaleRange { start: usize, end: usize, len: usize },

    /// The style was never registered with this document.
    #[error("style '{0}' is not registered with the document")]
    UnregisteredStyle(&'static str),

    /// An operation needed a caret but the document has no selection.
    #[error("document has no selection")]
    MissingSelection,
}

/// Configuration errors. Raised while building an `EditorConfig`, never
/// per event.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("trigger sequence must not be empty")]
    EmptyTrigger,

    #[error("closing sequence must not be empty")]
    EmptyClosing,

    #[error("trigger and closing sequences are both '{0}'")]
    TriggerEqualsClosing(String),

    #[error("failed to read settings file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to build template pattern: {0}")]
    Pattern(#[from] regex::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_range_message() {
        let err = DocumentError::StaleRange {
            start: 4,
            end: 9,
            len: 6,
        };
        assert_eq!(
            err.to_string(),
            "range 4..9 is out of bounds for a document of length 6"
        );
    }

    #[test]
    fn trigger_equals_closing_message() {
        let err = ConfigError::TriggerEqualsClosing("%%".to_string());
        assert_eq!(
            err.to_string(),
            "trigger and closing sequences are both '%%'"
        );
    }
}
