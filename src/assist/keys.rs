//! Keyboard navigation of the open suggestion list.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::trigger::SuggestionSession;

/// A key press, named the way DOM `KeyboardEvent.key` names them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Key {
    ArrowDown,
    ArrowUp,
    ArrowLeft,
    ArrowRight,
    Enter,
    Tab,
    Escape,
    Backspace,
    Char(char),
    Other,
}

impl Key {
    pub fn from_name(name: &str) -> Self {
        match name {
            "ArrowDown" => Key::ArrowDown,
            "ArrowUp" => Key::ArrowUp,
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            "Enter" => Key::Enter,
            "Tab" => Key::Tab,
            "Escape" => Key::Escape,
            "Backspace" => Key::Backspace,
            _ => {
                let mut chars = name.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Char(c),
                    _ => Key::Other,
                }
            }
        }
    }

    pub fn name(&self) -> String {
        match self {
            Key::ArrowDown => "ArrowDown".into(),
            Key::ArrowUp => "ArrowUp".into(),
            Key::ArrowLeft => "ArrowLeft".into(),
            Key::ArrowRight => "ArrowRight".into(),
            Key::Enter => "Enter".into(),
            Key::Tab => "Tab".into(),
            Key::Escape => "Escape".into(),
            Key::Backspace => "Backspace".into(),
            Key::Char(c) => c.to_string(),
            Key::Other => "Unidentified".into(),
        }
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Key::from_name(&name)
    }
}

impl From<Key> for String {
    fn from(key: Key) -> Self {
        key.name()
    }
}

/// Whether the editor consumed a key. `Ignored` means the host should apply
/// its default behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Handled,
    Ignored,
}

/// What a consumed navigation key asks the editor to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
    /// The highlighted item changed (or was already at the edge).
    Moved,
    /// Insert the item at this index.
    Accept(usize),
    /// Close the list and return focus to the document.
    Dismiss,
    /// Consumed with nothing to do.
    Nothing,
}

/// Intercepts navigation keys while a session is open.
#[derive(Debug, Clone, Default)]
pub struct NavigationController {
    attached: bool,
}

impl NavigationController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Attach while the session is open, detach when it closes.
    pub fn sync(&mut self, is_open: bool) {
        if is_open != self.attached {
            debug!(attached = is_open, "navigation interception changed");
            self.attached = is_open;
        }
    }

    /// Handle `key` against `session`. Returns `None` when the key is not
    /// intercepted, in which case it must not be swallowed.
    pub fn handle(&mut self, session: &mut SuggestionSession, key: Key) -> Option<NavAction> {
        self.sync(session.is_open);
        if !self.attached {
            return None;
        }

        let action = match key {
            Key::ArrowDown => {
                session.selected_index = (session.selected_index + 1).min(session.last_index());
                NavAction::Moved
            }
            Key::ArrowUp => {
                session.selected_index = session.selected_index.saturating_sub(1);
                NavAction::Moved
            }
            Key::Enter | Key::Tab => {
                if session.selected_item().is_some() {
                    NavAction::Accept(session.selected_index)
                } else {
                    NavAction::Nothing
                }
            }
            Key::Escape => NavAction::Dismiss,
            _ => return None,
        };

        Some(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SuggestionItem;

    fn open_session(count: usize) -> SuggestionSession {
        let mut session = SuggestionSession::closed();
        session.is_open = true;
        session.trigger_start = Some(0);
        session.filtered_items = (0..count as i64)
            .map(|i| SuggestionItem::new(i, format!("item{i}"), format!("item{i}")))
            .collect();
        session
    }

    #[test]
    fn key_names_round_trip() {
        assert_eq!(Key::from_name("ArrowDown"), Key::ArrowDown);
        assert_eq!(Key::from_name("*"), Key::Char('*'));
        assert_eq!(Key::from_name("Shift"), Key::Other);
        assert_eq!(Key::Char('x').name(), "x");
    }

    #[test]
    fn closed_session_intercepts_nothing() {
        let mut nav = NavigationController::new();
        let mut session = SuggestionSession::closed();
        assert_eq!(nav.handle(&mut session, Key::ArrowDown), None);
        assert_eq!(nav.handle(&mut session, Key::Enter), None);
        assert!(!nav.is_attached());
    }

    #[test]
    fn arrows_are_clamped() {
        let mut nav = NavigationController::new();
        let mut session = open_session(2);

        assert_eq!(nav.handle(&mut session, Key::ArrowUp), Some(NavAction::Moved));
        assert_eq!(session.selected_index, 0);
        nav.handle(&mut session, Key::ArrowDown);
        nav.handle(&mut session, Key::ArrowDown);
        nav.handle(&mut session, Key::ArrowDown);
        assert_eq!(session.selected_index, 1);
    }

    #[test]
    fn enter_and_tab_accept_selected() {
        let mut nav = NavigationController::new();
        let mut session = open_session(3);
        session.selected_index = 2;
        assert_eq!(nav.handle(&mut session, Key::Enter), Some(NavAction::Accept(2)));
        assert_eq!(nav.handle(&mut session, Key::Tab), Some(NavAction::Accept(2)));
    }

    #[test]
    fn empty_list_swallows_enter() {
        let mut nav = NavigationController::new();
        let mut session = open_session(0);
        assert_eq!(nav.handle(&mut session, Key::Enter), Some(NavAction::Nothing));
        assert_eq!(nav.handle(&mut session, Key::ArrowDown), Some(NavAction::Moved));
        assert_eq!(session.selected_index, 0);
    }

    #[test]
    fn escape_dismisses_and_other_keys_pass() {
        let mut nav = NavigationController::new();
        let mut session = open_session(1);
        assert_eq!(nav.handle(&mut session, Key::Escape), Some(NavAction::Dismiss));
        assert_eq!(nav.handle(&mut session, Key::Char('a')), None);
        assert_eq!(nav.handle(&mut session, Key::ArrowLeft), None);
    }
}
