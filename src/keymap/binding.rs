//! Keybinding struct representing a mapping from keystroke(s) to command

use super::command::Command;
use super::types::Keystroke;

/// A single keybinding mapping one or more keystrokes to a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keybinding {
    /// The keystroke sequence (usually 1, sometimes 2 for chords)
    pub keystrokes: Vec<Keystroke>,
    pub command: Command,
}

impl Keybinding {
    /// Create a single-keystroke binding
    pub fn new(keystroke: Keystroke, command: Command) -> Self {
        Self {
            keystrokes: vec![keystroke],
            command,
        }
    }

    /// Create a chord binding (multi-keystroke sequence)
    pub fn chord(keystrokes: Vec<Keystroke>, command: Command) -> Self {
        Self {
            keystrokes,
            command,
        }
    }

    pub fn matches_single(&self, keystroke: &Keystroke) -> bool {
        self.keystrokes.len() == 1 && self.keystrokes[0] == *keystroke
    }

    pub fn starts_with(&self, keystroke: &Keystroke) -> bool {
        self.keystrokes.first() == Some(keystroke)
    }

    pub fn is_chord(&self) -> bool {
        self.keystrokes.len() > 1
    }

    /// Get display string for this keybinding
    pub fn display_string(&self) -> String {
        self.keystrokes
            .iter()
            .map(|k| k.display_string())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::types::{KeyCode, Modifiers};

    #[test]
    fn test_single_binding() {
        let stroke = Keystroke::new(KeyCode::Char('o'), Modifiers::CTRL);
        let binding = Keybinding::new(stroke, Command::OpenFile);

        assert!(!binding.is_chord());
        assert!(binding.matches_single(&stroke));
    }

    #[test]
    fn test_chord_binding() {
        let stroke1 = Keystroke::new(KeyCode::Char('k'), Modifiers::CTRL);
        let stroke2 = Keystroke::new(KeyCode::Char('r'), Modifiers::CTRL);
        let binding = Keybinding::chord(vec![stroke1, stroke2], Command::ReloadFile);

        assert!(binding.is_chord());
        assert!(!binding.matches_single(&stroke1));
        assert!(binding.starts_with(&stroke1));
        assert!(binding.display_string().contains(' '));
    }
}
