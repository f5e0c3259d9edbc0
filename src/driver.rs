//! Headless host and async event loop.
//!
//! [`Host`] plays the part of a UI: it owns a [`TextBuffer`], turns
//! [`HostMessage`]s into user input, forwards buffer events to the [`Editor`]
//! and reports a [`StateSummary`]. [`run`] drives a host from a channel and
//! fires debounced steps when their deadlines pass.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};
use tracing::debug;

use crate::assist::{Key, KeyOutcome};
use crate::document::{Document, FocusTarget, Span, Style, TextBuffer};
use crate::types::ItemId;
use crate::Editor;

/// One line of the host protocol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum HostMessage {
    /// Type text at the caret.
    Text { value: String },
    Backspace,
    /// Move the caret or select a range.
    Select {
        index: usize,
        #[serde(default)]
        length: usize,
    },
    Key { key: Key },
    /// Focus left the document, into the suggestion list or elsewhere.
    Blur {
        #[serde(default)]
        suggestions: bool,
    },
    /// Pointer choice of a suggestion.
    Pick { id: ItemId },
    /// Pointer hover over a suggestion.
    Hover { index: usize },
    /// Run every pending step now.
    Flush,
    Shutdown,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub open: bool,
    pub query: String,
    pub items: Vec<String>,
    pub selected: usize,
}

/// What a renderer would show after a message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateSummary {
    pub text: String,
    pub caret: Option<usize>,
    pub session: SessionSummary,
    pub highlights: Vec<Span>,
    pub bold: Vec<Span>,
}

#[derive(Debug, Clone)]
pub struct Host {
    pub editor: Editor,
    pub buffer: TextBuffer,
}

impl Host {
    pub fn new(mut editor: Editor, mut buffer: TextBuffer) -> Self {
        editor.attach(&mut buffer);
        Self { editor, buffer }
    }

    /// Apply one message. Returns `false` on shutdown.
    pub fn apply(&mut self, message: HostMessage, now: Instant) -> bool {
        match message {
            HostMessage::Text { value } => {
                // Each character goes through the key handler first, like a
                // keydown before the input event.
                for c in value.chars() {
                    if self.key(Key::Char(c), now) == KeyOutcome::Ignored {
                        self.buffer.type_text(&c.to_string());
                    }
                    self.pump(now);
                }
            }
            HostMessage::Backspace => self.buffer.backspace(),
            HostMessage::Select { index, length } => self.buffer.user_select(index, length),
            HostMessage::Key { key } => {
                if self.key(key, now) == KeyOutcome::Ignored {
                    self.default_key(key);
                }
            }
            HostMessage::Blur { suggestions } => self.buffer.blur(if suggestions {
                FocusTarget::Suggestions
            } else {
                FocusTarget::Elsewhere
            }),
            HostMessage::Pick { id } => {
                self.editor.select(&mut self.buffer, &id, now);
            }
            HostMessage::Hover { index } => self.editor.hover(index),
            HostMessage::Flush => {
                self.pump(now);
                self.editor.flush_all(&mut self.buffer);
            }
            HostMessage::Shutdown => return false,
        }
        self.pump(now);
        true
    }

    /// Forward queued buffer events to the editor.
    pub fn pump(&mut self, now: Instant) {
        for event in self.buffer.drain_events() {
            self.editor.handle_event(&mut self.buffer, event, now);
        }
    }

    pub fn flush_due(&mut self, now: Instant) {
        self.editor.flush_due(&mut self.buffer, now);
        self.pump(now);
    }

    pub fn summary(&self) -> StateSummary {
        let session = self.editor.session();
        StateSummary {
            text: self.buffer.text(),
            caret: self.buffer.selection().map(|s| s.index),
            session: SessionSummary {
                open: session.is_open,
                query: session.query.clone(),
                items: session
                    .filtered_items
                    .iter()
                    .map(|item| item.label.clone())
                    .collect(),
                selected: session.selected_index,
            },
            highlights: self.buffer.style_spans(Style::Variable),
            bold: self.buffer.style_spans(Style::Bold),
        }
    }

    fn key(&mut self, key: Key, now: Instant) -> KeyOutcome {
        self.editor.handle_key(&mut self.buffer, key, now)
    }

    /// What the host does with keys the editor lets through.
    fn default_key(&mut self, key: Key) {
        let Some(selection) = self.buffer.selection() else {
            return;
        };
        match key {
            Key::Char(c) => self.buffer.type_text(&c.to_string()),
            Key::Backspace => self.buffer.backspace(),
            Key::ArrowLeft => self
                .buffer
                .user_select(selection.index.saturating_sub(1), 0),
            Key::ArrowRight => self.buffer.user_select(selection.index + 1, 0),
            Key::Enter => self.buffer.type_text("\n"),
            _ => {}
        }
    }
}

/// Drive `host` until `messages` closes or a shutdown arrives, sending a
/// summary after every message and every fired deadline.
pub async fn run(
    mut host: Host,
    mut messages: mpsc::Receiver<HostMessage>,
    summaries: mpsc::Sender<StateSummary>,
) -> Host {
    loop {
        let deadline = host.editor.next_deadline();
        tokio::select! {
            message = messages.recv() => {
                let Some(message) = message else {
                    debug!("host channel closed");
                    break;
                };
                if !host.apply(message, Instant::now()) {
                    debug!("shutdown requested");
                    break;
                }
            }
            _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                host.flush_due(Instant::now());
            }
        }

        if summaries.send(host.summary()).await.is_err() {
            debug!("summary receiver dropped");
            break;
        }
    }
    host
}
