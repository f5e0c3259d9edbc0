//! Template suggestions, highlighting and markdown shortcuts for rich-text editors.
//!
//! The [`Editor`] sits between a host's text buffer (anything implementing
//! [`Document`]) and its UI. Hosts forward document events and key presses;
//! the editor keeps the suggestion session current, inserts chosen items, and
//! schedules highlight and shortcut repaints on a debounce [`Pipeline`] that
//! the host flushes.

use tokio::time::Instant;
use tracing::{debug, warn};

pub mod assist;
pub mod document;
pub mod driver;
pub mod error;
pub mod settings;
pub mod types;

pub use assist::{
    Highlighter, Insertion, Key, KeyOutcome, MarkdownShortcuts, NavAction, Pipeline, Step,
    SuggestionSession,
};
pub use document::{
    Bounds, ChangeSource, Document, EditorEvent, FocusTarget, Selection, Span, Style, TextBuffer,
};
pub use error::{ConfigError, DocumentError};
pub use settings::{discover_settings, load_settings, EditorConfig, Settings, Timing};
pub use types::{ItemId, SuggestionItem};

use assist::{insert_suggestion, NavigationController, TriggerDetector};

/// Coordinates trigger detection, insertion, navigation and derived formatting
/// for one attached document.
#[derive(Debug, Clone)]
pub struct Editor {
    config: EditorConfig,
    detector: TriggerDetector,
    session: SuggestionSession,
    navigation: NavigationController,
    highlighter: Highlighter,
    markdown: MarkdownShortcuts,
    pipeline: Pipeline,
}

impl Editor {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            detector: TriggerDetector::new(config.trigger(), config.closing()),
            highlighter: Highlighter::new(config.template_pattern().clone()),
            session: SuggestionSession::closed(),
            navigation: NavigationController::new(),
            markdown: MarkdownShortcuts::new(),
            pipeline: Pipeline::new(),
            config,
        }
    }

    /// Register the editor's styles with `doc` and paint its current content.
    pub fn attach<D: Document + ?Sized>(&mut self, doc: &mut D) {
        doc.register_styles(&Style::CUSTOM);
        self.highlighter.repaint(doc);
        if self.config.markdown_enabled() {
            self.markdown.process(doc);
        }
        debug!(
            trigger = self.config.trigger(),
            closing = self.config.closing(),
            suggestions = self.config.suggestions().len(),
            "editor attached"
        );
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Snapshot for the suggestion renderer.
    pub fn session(&self) -> &SuggestionSession {
        &self.session
    }

    /// Template spans painted by the last highlight repaint.
    pub fn highlights(&self) -> &[Span] {
        self.highlighter.spans()
    }

    /// Regions currently bolded by the `*text*` shortcut.
    pub fn markdown_regions(&self) -> &[Span] {
        self.markdown.regions()
    }

    /// When the next deferred step is due, if any.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pipeline.next_deadline()
    }

    pub fn is_pending(&self, step: Step) -> bool {
        self.pipeline.is_pending(step)
    }

    /// React to a document event. Events must arrive in dispatch order.
    pub fn handle_event<D: Document + ?Sized>(
        &mut self,
        doc: &mut D,
        event: EditorEvent,
        now: Instant,
    ) {
        match event {
            EditorEvent::TextChange {
                source: ChangeSource::User,
            } => {
                self.detect(doc);
                self.schedule_repaints(now);
            }
            EditorEvent::TextChange {
                source: ChangeSource::Api,
            } => {
                // Programmatic edits may pull the text out from under an open
                // session. They can close or requery it, never open one.
                if self.session.is_open {
                    self.detector
                        .revalidate(&mut self.session, doc, self.config.suggestions());
                    self.navigation.sync(self.session.is_open);
                }

                // Our own mutations come back as API changes; only react to
                // text the derived steps have not seen yet.
                let text = doc.text();
                if self.highlighter.is_stale(&text) {
                    self.schedule(Step::Highlight, now);
                }
                if self.config.markdown_enabled() && self.markdown.is_stale(&text) {
                    self.schedule(Step::Markdown, now);
                }
            }
            EditorEvent::SelectionChange {
                source: ChangeSource::User,
            } => self.detect(doc),
            EditorEvent::TextChange {
                source: ChangeSource::Silent,
            }
            | EditorEvent::SelectionChange { .. } => {}
            EditorEvent::Blur {
                target: FocusTarget::Suggestions,
            } => {}
            EditorEvent::Blur {
                target: FocusTarget::Elsewhere,
            } => self.close_session(),
        }
    }

    /// Offer a key press to the editor before the host handles it.
    ///
    /// Returns [`KeyOutcome::Handled`] when the host must suppress its own
    /// handling of the key.
    pub fn handle_key<D: Document + ?Sized>(
        &mut self,
        doc: &mut D,
        key: Key,
        now: Instant,
    ) -> KeyOutcome {
        if let Some(action) = self.navigation.handle(&mut self.session, key) {
            match action {
                NavAction::Accept(index) => {
                    self.accept(doc, index, now);
                }
                NavAction::Dismiss => {
                    self.close_session();
                    doc.focus();
                }
                NavAction::Moved | NavAction::Nothing => {}
            }
            return KeyOutcome::Handled;
        }

        if key == Key::Char('*') && self.config.markdown_enabled() {
            let outcome = self.markdown.handle_asterisk(doc);
            if outcome == KeyOutcome::Handled {
                self.detect(doc);
                self.schedule_repaints(now);
            }
            return outcome;
        }

        KeyOutcome::Ignored
    }

    /// Insert the filtered item with `id`, as chosen with the pointer.
    ///
    /// Returns where the template landed, or `None` when nothing was inserted.
    pub fn select<D: Document + ?Sized>(
        &mut self,
        doc: &mut D,
        id: &ItemId,
        now: Instant,
    ) -> Option<Insertion> {
        if !self.session.is_open {
            return None;
        }
        let Some(index) = self
            .session
            .filtered_items
            .iter()
            .position(|item| &item.id == id)
        else {
            debug!(item = %id, "selected item is not in the filtered list");
            return None;
        };
        // Clicking the list took focus; the caret must be back before editing.
        doc.focus();
        self.accept(doc, index, now)
    }

    /// Move the highlighted item, as with the pointer. Clamped to the list.
    pub fn hover(&mut self, index: usize) {
        if self.session.is_open {
            self.session.selected_index = index.min(self.session.last_index());
        }
    }

    pub fn close_session(&mut self) {
        self.session.close();
        self.navigation.sync(false);
    }

    /// Run every step due at `now`.
    pub fn flush_due<D: Document + ?Sized>(&mut self, doc: &mut D, now: Instant) {
        for step in self.pipeline.take_due(now) {
            self.run_step(doc, step);
        }
    }

    /// Run every pending step immediately.
    pub fn flush_all<D: Document + ?Sized>(&mut self, doc: &mut D) {
        for step in self.pipeline.take_all() {
            self.run_step(doc, step);
        }
    }

    fn accept<D: Document + ?Sized>(
        &mut self,
        doc: &mut D,
        index: usize,
        now: Instant,
    ) -> Option<Insertion> {
        let item = self.session.filtered_items.get(index).cloned()?;

        let inserted = match insert_suggestion(
            doc,
            &mut self.session,
            &item,
            self.config.trigger(),
            self.config.closing(),
        ) {
            Ok(inserted) => inserted,
            Err(e) => {
                warn!(error = %e, item = %item.id, "suggestion insertion aborted");
                None
            }
        };
        self.navigation.sync(self.session.is_open);

        if inserted.is_some() {
            self.schedule_repaints(now);
            self.schedule(Step::Retrigger, now);
        }
        inserted
    }

    fn detect<D: Document + ?Sized>(&mut self, doc: &D) {
        self.detector
            .update(&mut self.session, doc, self.config.suggestions());
        self.navigation.sync(self.session.is_open);
    }

    fn schedule_repaints(&mut self, now: Instant) {
        self.schedule(Step::Highlight, now);
        if self.config.markdown_enabled() {
            self.schedule(Step::Markdown, now);
        }
    }

    fn schedule(&mut self, step: Step, now: Instant) {
        let timing = self.config.timing();
        let delay = match step {
            Step::Markdown => timing.markdown_debounce,
            Step::Highlight => timing.highlight_debounce,
            Step::Retrigger => timing.retrigger_delay,
        };
        self.pipeline.schedule(step, now, delay);
    }

    fn run_step<D: Document + ?Sized>(&mut self, doc: &mut D, step: Step) {
        match step {
            Step::Markdown => {
                if self.config.markdown_enabled() {
                    self.markdown.process(doc);
                }
            }
            Step::Highlight => {
                self.highlighter.repaint(doc);
            }
            Step::Retrigger => self.detect(doc),
        }
    }
}
