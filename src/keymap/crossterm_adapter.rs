//! Adapter to convert terminal key events to our Keystroke type

use crossterm::event::{KeyCode as TermKeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::types::{KeyCode, Keystroke, Modifiers};

/// Convert a crossterm key event to a Keystroke
///
/// Returns None for releases and for keys the keymap cannot bind.
pub fn keystroke_from_crossterm(event: &KeyEvent) -> Option<Keystroke> {
    if event.kind == KeyEventKind::Release {
        return None;
    }

    let m = event.modifiers;
    let mods = Modifiers::new(
        m.contains(KeyModifiers::CONTROL),
        m.contains(KeyModifiers::SHIFT),
        m.contains(KeyModifiers::ALT),
        m.contains(KeyModifiers::SUPER) || m.contains(KeyModifiers::META),
    );

    let key = match event.code {
        TermKeyCode::Char(' ') => KeyCode::Space,
        // Character keys - normalize to lowercase
        TermKeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        TermKeyCode::Enter => KeyCode::Enter,
        TermKeyCode::Esc => KeyCode::Escape,
        TermKeyCode::Tab => KeyCode::Tab,
        TermKeyCode::Backspace => KeyCode::Backspace,
        TermKeyCode::Up => KeyCode::Up,
        TermKeyCode::Down => KeyCode::Down,
        TermKeyCode::PageUp => KeyCode::PageUp,
        TermKeyCode::PageDown => KeyCode::PageDown,
        TermKeyCode::F(n) => KeyCode::F(n),
        _ => return None,
    };

    Some(Keystroke::new(key, mods))
}
