//! Settings infrastructure for bracewise.
//!
//! This module provides support for loading and parsing `bracewise.toml` files
//! and turning them into a validated [`EditorConfig`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use regex::Regex;
use serde::Deserialize;

use crate::error::ConfigError;
use crate::types::{SuggestionItem, BUILTIN_SUGGESTIONS};

/// Settings file name searched for by [`discover_settings`].
pub const SETTINGS_FILE: &str = "bracewise.toml";

pub const DEFAULT_TRIGGER: &str = "{{";
pub const DEFAULT_CLOSING: &str = "}}";

/// Root settings structure loaded from `bracewise.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Sequence that opens a suggestion session.
    pub trigger: Option<String>,

    /// Sequence that ends a template.
    pub closing: Option<String>,

    /// Log level for the binary: "trace", "debug", "info", "warn", "error".
    pub log_level: Option<String>,

    pub timing: TimingSettings,

    pub markdown: MarkdownSettings,

    pub suggestions: SuggestionSettings,
}

/// Debounce windows, in milliseconds.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TimingSettings {
    pub highlight_debounce_ms: Option<u64>,
    pub markdown_debounce_ms: Option<u64>,
    pub retrigger_delay_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MarkdownSettings {
    /// Whether the `*text*` shortcut is active (default: true).
    pub enabled: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SuggestionSettings {
    /// Prepend the built-in template catalog to `items`.
    pub include_builtins: bool,

    /// Host-defined suggestions.
    pub items: Vec<SuggestionItem>,
}

impl Settings {
    /// Parse settings from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// The configured log level, defaulting to `info`.
    pub fn log_level(&self) -> tracing::Level {
        match self
            .log_level
            .as_deref()
            .unwrap_or("info")
            .to_lowercase()
            .as_str()
        {
            "trace" => tracing::Level::TRACE,
            "debug" => tracing::Level::DEBUG,
            "warn" => tracing::Level::WARN,
            "error" => tracing::Level::ERROR,
            _ => tracing::Level::INFO,
        }
    }

    /// Build and validate an editor configuration.
    pub fn into_config(self) -> Result<EditorConfig, ConfigError> {
        let mut suggestions = Vec::new();
        if self.suggestions.include_builtins {
            suggestions.extend(BUILTIN_SUGGESTIONS.iter().cloned());
        }
        suggestions.extend(self.suggestions.items);

        let defaults = Timing::default();
        let ms = |value: Option<u64>, default: Duration| {
            value.map(Duration::from_millis).unwrap_or(default)
        };
        let timing = Timing {
            highlight_debounce: ms(self.timing.highlight_debounce_ms, defaults.highlight_debounce),
            markdown_debounce: ms(self.timing.markdown_debounce_ms, defaults.markdown_debounce),
            retrigger_delay: ms(self.timing.retrigger_delay_ms, defaults.retrigger_delay),
        };

        let config = EditorConfig::new(
            self.trigger.as_deref().unwrap_or(DEFAULT_TRIGGER),
            self.closing.as_deref().unwrap_or(DEFAULT_CLOSING),
            suggestions,
        )?
        .with_timing(timing)
        .with_markdown(self.markdown.enabled.unwrap_or(true));

        Ok(config)
    }
}

/// Deferred-step delays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub highlight_debounce: Duration,
    pub markdown_debounce: Duration,
    pub retrigger_delay: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            highlight_debounce: Duration::from_millis(10),
            markdown_debounce: Duration::from_millis(10),
            retrigger_delay: Duration::from_millis(100),
        }
    }
}

/// Validated editor configuration.
#[derive(Debug, Clone)]
pub struct EditorConfig {
    trigger: String,
    closing: String,
    suggestions: Vec<SuggestionItem>,
    timing: Timing,
    markdown: bool,
    /// `trigger (.*?) closing` with both delimiters escaped.
    template_pattern: Regex,
}

impl EditorConfig {
    /// Create a configuration, rejecting delimiters that make matching ill-defined.
    pub fn new(
        trigger: &str,
        closing: &str,
        suggestions: Vec<SuggestionItem>,
    ) -> Result<Self, ConfigError> {
        if trigger.is_empty() {
            return Err(ConfigError::EmptyTrigger);
        }
        if closing.is_empty() {
            return Err(ConfigError::EmptyClosing);
        }
        if trigger == closing {
            return Err(ConfigError::TriggerEqualsClosing(trigger.to_string()));
        }

        let template_pattern = Regex::new(&format!(
            "{}(.*?){}",
            regex::escape(trigger),
            regex::escape(closing)
        ))?;

        Ok(Self {
            trigger: trigger.to_string(),
            closing: closing.to_string(),
            suggestions,
            timing: Timing::default(),
            markdown: true,
            template_pattern,
        })
    }

    /// `{{` / `}}` delimiters with the given suggestions.
    pub fn with_suggestions(suggestions: Vec<SuggestionItem>) -> Result<Self, ConfigError> {
        Self::new(DEFAULT_TRIGGER, DEFAULT_CLOSING, suggestions)
    }

    pub fn with_timing(mut self, timing: Timing) -> Self {
        self.timing = timing;
        self
    }

    pub fn with_markdown(mut self, enabled: bool) -> Self {
        self.markdown = enabled;
        self
    }

    pub fn trigger(&self) -> &str {
        &self.trigger
    }

    pub fn closing(&self) -> &str {
        &self.closing
    }

    pub fn suggestions(&self) -> &[SuggestionItem] {
        &self.suggestions
    }

    pub fn timing(&self) -> Timing {
        self.timing
    }

    pub fn markdown_enabled(&self) -> bool {
        self.markdown
    }

    pub fn template_pattern(&self) -> &Regex {
        &self.template_pattern
    }
}

/// Load settings from a settings file.
///
/// A missing file yields default settings; an unreadable or malformed file is an error.
pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Settings::from_toml(&content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Settings::default()),
        Err(source) => Err(ConfigError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Discover `bracewise.toml` by searching up the directory tree, then direct children.
///
/// Search order:
/// 1. Walk up from `start_dir` to filesystem root
/// 2. If not found, check immediate child directories of `start_dir`
///
/// Returns `(settings, settings_dir)`. If nothing is found, returns
/// `(Settings::default(), start_dir)`.
pub fn discover_settings(start_dir: &Path) -> Result<(Settings, PathBuf), ConfigError> {
    let mut current = Some(start_dir);
    while let Some(dir) = current {
        let candidate = dir.join(SETTINGS_FILE);
        if candidate.is_file() {
            return Ok((load_settings(&candidate)?, dir.to_path_buf()));
        }
        current = dir.parent();
    }

    if let Ok(entries) = std::fs::read_dir(start_dir) {
        let mut dirs: Vec<PathBuf> = entries
            .flatten()
            .filter(|entry| entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false))
            .map(|entry| entry.path())
            .collect();
        // read_dir order is platform dependent
        dirs.sort();

        for dir in dirs {
            let candidate = dir.join(SETTINGS_FILE);
            if candidate.is_file() {
                return Ok((load_settings(&candidate)?, dir));
            }
        }
    }

    Ok((Settings::default(), start_dir.to_path_buf()))
}
