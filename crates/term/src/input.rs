//! Keyboard handling for the viewer. The view is passive, so only quitting
//! is bound.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// `q`, `Esc` or `Ctrl-C` on key press.
pub fn should_quit(key: KeyEvent) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc)
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
