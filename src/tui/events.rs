//! Event Handling - Keyboard input processing

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use std::time::Duration;

use super::state::AppState;

/// Actions that can be triggered by user input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    ToggleView,
    NextField,
    PrevField,
    AddVariable,
    DeleteVariable,
    Submit,
    Edit,
    None,
}

/// Handle keyboard events
///
/// Field focus, list mutation, and text editing are applied to state here;
/// `Submit` and `Quit` are returned for the run loop to act on.
pub fn handle_key_event(key: KeyEvent, state: &mut AppState) -> Action {
    // Global keybindings (work with any focus)
    match (key.modifiers, key.code) {
        // Quit: Esc or Ctrl+C
        (KeyModifiers::NONE, KeyCode::Esc) => return Action::Quit,
        (KeyModifiers::CONTROL, KeyCode::Char('c')) => return Action::Quit,

        // Toggle evaluator/validator: Ctrl+T
        (KeyModifiers::CONTROL, KeyCode::Char('t')) => {
            state.active = state.active.toggle();
            return Action::ToggleView;
        }

        // Variable rows: Ctrl+N adds, Ctrl+D deletes the focused row
        (KeyModifiers::CONTROL, KeyCode::Char('n')) => {
            state.add_variable();
            return Action::AddVariable;
        }
        (KeyModifiers::CONTROL, KeyCode::Char('d')) => {
            if state.delete_focused_variable() {
                return Action::DeleteVariable;
            }
            return Action::None;
        }

        // Field navigation: Tab / Shift+Tab
        (KeyModifiers::NONE, KeyCode::Tab) => {
            state.focus_next();
            return Action::NextField;
        }
        (KeyModifiers::SHIFT, KeyCode::BackTab) => {
            state.focus_prev();
            return Action::PrevField;
        }

        // Submit the active form
        (KeyModifiers::NONE, KeyCode::Enter) => return Action::Submit,

        _ => {}
    }

    // Everything else edits the focused field
    match key.code {
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            state.insert_char(c);
            Action::Edit
        }
        KeyCode::Backspace => {
            state.backspace();
            Action::Edit
        }
        _ => Action::None,
    }
}

/// Poll for keyboard events with timeout
pub fn poll_event(timeout: Duration) -> std::io::Result<Option<KeyEvent>> {
    if event::poll(timeout)? {
        if let Event::Key(key) = event::read()? {
            return Ok(Some(key));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::state::{CheckFocus, EvalFocus, ViewKind};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn test_quit_keys() {
        let mut state = AppState::default();
        assert_eq!(handle_key_event(key(KeyCode::Esc), &mut state), Action::Quit);
        assert_eq!(handle_key_event(ctrl('c'), &mut state), Action::Quit);
    }

    #[test]
    fn test_toggle_view() {
        let mut state = AppState::default();
        assert_eq!(state.active, ViewKind::Evaluator);

        let action = handle_key_event(ctrl('t'), &mut state);
        assert_eq!(action, Action::ToggleView);
        assert_eq!(state.active, ViewKind::Validator);

        handle_key_event(ctrl('t'), &mut state);
        assert_eq!(state.active, ViewKind::Evaluator);
    }

    #[test]
    fn test_typing_edits_expression() {
        let mut state = AppState::default();
        for c in "x+1".chars() {
            assert_eq!(
                handle_key_event(key(KeyCode::Char(c)), &mut state),
                Action::Edit
            );
        }
        assert_eq!(state.evaluator.expression, "x+1");

        handle_key_event(key(KeyCode::Backspace), &mut state);
        assert_eq!(state.evaluator.expression, "x+");
    }

    #[test]
    fn test_shifted_chars_still_edit() {
        let mut state = AppState::default();
        let shifted = KeyEvent::new(KeyCode::Char('X'), KeyModifiers::SHIFT);
        assert_eq!(handle_key_event(shifted, &mut state), Action::Edit);
        assert_eq!(state.evaluator.expression, "X");
    }

    #[test]
    fn test_add_and_delete_variable_row() {
        let mut state = AppState::default();

        assert_eq!(handle_key_event(ctrl('n'), &mut state), Action::AddVariable);
        assert_eq!(state.evaluator.bindings.len(), 1);
        assert_eq!(state.evaluator.focus, EvalFocus::Name(0));

        assert_eq!(
            handle_key_event(ctrl('d'), &mut state),
            Action::DeleteVariable
        );
        assert!(state.evaluator.bindings.is_empty());
        assert_eq!(state.evaluator.focus, EvalFocus::Expression);
    }

    #[test]
    fn test_delete_with_expression_focused_is_noop() {
        let mut state = AppState::default();
        handle_key_event(ctrl('n'), &mut state);
        state.evaluator.focus = EvalFocus::Expression;

        assert_eq!(handle_key_event(ctrl('d'), &mut state), Action::None);
        assert_eq!(state.evaluator.bindings.len(), 1);
    }

    #[test]
    fn test_tab_cycles_fields() {
        let mut state = AppState::default();
        handle_key_event(ctrl('n'), &mut state);
        state.evaluator.focus = EvalFocus::Expression;

        handle_key_event(key(KeyCode::Tab), &mut state);
        assert_eq!(state.evaluator.focus, EvalFocus::Name(0));

        handle_key_event(key(KeyCode::Tab), &mut state);
        assert_eq!(state.evaluator.focus, EvalFocus::Value(0));

        handle_key_event(key(KeyCode::Tab), &mut state);
        assert_eq!(state.evaluator.focus, EvalFocus::Expression);

        let back_tab = KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT);
        handle_key_event(back_tab, &mut state);
        assert_eq!(state.evaluator.focus, EvalFocus::Value(0));
    }

    #[test]
    fn test_validator_row_editing() {
        let mut state = AppState::default();
        handle_key_event(ctrl('t'), &mut state);
        handle_key_event(ctrl('n'), &mut state);
        assert_eq!(state.validator.focus, CheckFocus::Name(0));

        handle_key_event(key(KeyCode::Char('x')), &mut state);
        assert_eq!(state.validator.names, vec!["x"]);
    }

    #[test]
    fn test_enter_submits() {
        let mut state = AppState::default();
        assert_eq!(
            handle_key_event(key(KeyCode::Enter), &mut state),
            Action::Submit
        );
    }
}
