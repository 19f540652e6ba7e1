//! Keymap struct for storing and looking up keybindings

use std::collections::HashMap;

use super::binding::Keybinding;
use super::command::Command;
use super::types::Keystroke;

/// Result of handling a keystroke
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Execute(Command),
    /// Keystroke is part of a chord, await more input
    AwaitMore,
    NoMatch,
}

/// The keymap stores all keybindings and handles lookup
#[derive(Debug, Clone, Default)]
pub struct Keymap {
    bindings: Vec<Keybinding>,
    /// Single-keystroke bindings; the first registered wins
    single_lookup: HashMap<Keystroke, usize>,
    /// Keystrokes that start a chord sequence (indices into bindings)
    chord_prefixes: HashMap<Keystroke, Vec<usize>>,
    pending_chord: Vec<Keystroke>,
}

impl Keymap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bindings(bindings: Vec<Keybinding>) -> Self {
        let mut keymap = Self::new();
        for binding in bindings {
            keymap.add_binding(binding);
        }
        keymap
    }

    pub fn add_binding(&mut self, binding: Keybinding) {
        let Some(&first_stroke) = binding.keystrokes.first() else {
            return;
        };
        let idx = self.bindings.len();

        if binding.is_chord() {
            self.chord_prefixes
                .entry(first_stroke)
                .or_default()
                .push(idx);
        } else {
            self.single_lookup.entry(first_stroke).or_insert(idx);
        }

        self.bindings.push(binding);
    }

    /// Clear pending chord state
    pub fn reset(&mut self) {
        self.pending_chord.clear();
    }

    /// Handle a keystroke and return the action to take
    pub fn handle_keystroke(&mut self, keystroke: Keystroke) -> KeyAction {
        if !self.pending_chord.is_empty() {
            self.pending_chord.push(keystroke);
            return self.try_complete_chord();
        }

        if let Some(command) = self.lookup(&keystroke) {
            return KeyAction::Execute(command);
        }

        if self.chord_prefixes.contains_key(&keystroke) {
            self.pending_chord.push(keystroke);
            return KeyAction::AwaitMore;
        }

        KeyAction::NoMatch
    }

    fn try_complete_chord(&mut self) -> KeyAction {
        let first = self.pending_chord[0];

        let Some(indices) = self.chord_prefixes.get(&first) else {
            self.reset();
            return KeyAction::NoMatch;
        };

        let exact = indices
            .iter()
            .map(|&idx| &self.bindings[idx])
            .find(|binding| binding.keystrokes == self.pending_chord)
            .map(|binding| binding.command);
        if let Some(command) = exact {
            self.reset();
            return KeyAction::Execute(command);
        }

        let could_match = indices.iter().any(|&idx| {
            let binding = &self.bindings[idx];
            binding.keystrokes.len() > self.pending_chord.len()
                && binding.keystrokes[..self.pending_chord.len()] == self.pending_chord
        });

        if could_match {
            KeyAction::AwaitMore
        } else {
            self.reset();
            KeyAction::NoMatch
        }
    }

    /// Look up a single keystroke without chord handling
    pub fn lookup(&self, keystroke: &Keystroke) -> Option<Command> {
        self.single_lookup
            .get(keystroke)
            .map(|&idx| self.bindings[idx].command)
    }

    pub fn bindings(&self) -> &[Keybinding] {
        &self.bindings
    }

    /// Get the keybinding for a command (first match)
    pub fn binding_for(&self, command: Command) -> Option<&Keybinding> {
        self.bindings.iter().find(|b| b.command == command)
    }

    pub fn display_for(&self, command: Command) -> Option<String> {
        self.binding_for(command).map(|b| b.display_string())
    }

    /// Every bound command with all of its key displays, for the shortcuts panel
    pub fn shortcut_rows(&self) -> Vec<(String, &'static str)> {
        Command::ALL
            .iter()
            .filter_map(|&command| {
                let keys: Vec<String> = self
                    .bindings
                    .iter()
                    .filter(|b| b.command == command)
                    .map(|b| b.display_string())
                    .collect();
                (!keys.is_empty()).then(|| (keys.join(" / "), command.display_name()))
            })
            .collect()
    }

    pub fn has_pending_chord(&self) -> bool {
        !self.pending_chord.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::types::{KeyCode, Modifiers};

    fn ctrl_o() -> Keystroke {
        Keystroke::new(KeyCode::Char('o'), Modifiers::CTRL)
    }

    fn ctrl_k() -> Keystroke {
        Keystroke::new(KeyCode::Char('k'), Modifiers::CTRL)
    }

    fn ctrl_r() -> Keystroke {
        Keystroke::new(KeyCode::Char('r'), Modifiers::CTRL)
    }

    #[test]
    fn test_single_binding_lookup() {
        let keymap = Keymap::with_bindings(vec![Keybinding::new(ctrl_o(), Command::OpenFile)]);

        assert_eq!(keymap.lookup(&ctrl_o()), Some(Command::OpenFile));
        assert_eq!(keymap.lookup(&ctrl_k()), None);
    }

    #[test]
    fn test_first_binding_wins() {
        let keymap = Keymap::with_bindings(vec![
            Keybinding::new(ctrl_o(), Command::OpenFile),
            Keybinding::new(ctrl_o(), Command::Quit),
        ]);
        assert_eq!(keymap.lookup(&ctrl_o()), Some(Command::OpenFile));
    }

    #[test]
    fn test_chord_await_more() {
        let mut keymap = Keymap::with_bindings(vec![Keybinding::chord(
            vec![ctrl_k(), ctrl_r()],
            Command::ReloadFile,
        )]);

        assert_eq!(keymap.handle_keystroke(ctrl_k()), KeyAction::AwaitMore);
        assert!(keymap.has_pending_chord());

        assert_eq!(
            keymap.handle_keystroke(ctrl_r()),
            KeyAction::Execute(Command::ReloadFile)
        );
        assert!(!keymap.has_pending_chord());
    }

    #[test]
    fn test_chord_mismatch_resets() {
        let mut keymap = Keymap::with_bindings(vec![Keybinding::chord(
            vec![ctrl_k(), ctrl_r()],
            Command::ReloadFile,
        )]);

        assert_eq!(keymap.handle_keystroke(ctrl_k()), KeyAction::AwaitMore);
        assert_eq!(keymap.handle_keystroke(ctrl_o()), KeyAction::NoMatch);
        assert!(!keymap.has_pending_chord());
    }

    #[test]
    fn test_shortcut_rows_group_keys() {
        let keymap = Keymap::with_bindings(vec![
            Keybinding::new(Keystroke::key(KeyCode::F(5)), Command::ReloadFile),
            Keybinding::new(ctrl_r(), Command::ReloadFile),
            Keybinding::new(ctrl_o(), Command::OpenFile),
        ]);

        let rows = keymap.shortcut_rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].1, "Open file");
        assert!(rows[1].0.contains("F5"));
        assert!(rows[1].0.contains(" / "));
    }
}
