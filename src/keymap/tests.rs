//! Integration tests for the keymap system

use super::*;

#[test]
fn test_embedded_yaml_parses() {
    let bindings = parse_keymap_yaml(get_default_keymap_yaml())
        .expect("Embedded keymap.yaml should parse successfully");

    for command in [
        Command::OpenFile,
        Command::ReloadFile,
        Command::ToggleShortcuts,
        Command::Quit,
    ] {
        assert!(
            bindings.iter().any(|b| b.command == command),
            "missing binding for {:?}",
            command
        );
    }
}

#[test]
fn test_embedded_matches_hardcoded_defaults() {
    let embedded = parse_keymap_yaml(get_default_keymap_yaml()).unwrap();
    assert_eq!(embedded, default_bindings());
}

#[test]
fn test_default_shortcuts() {
    let keymap = Keymap::with_bindings(default_bindings());

    let ctrl = |c| Keystroke::new(KeyCode::Char(c), Modifiers::CTRL);
    assert_eq!(keymap.lookup(&ctrl('o')), Some(Command::OpenFile));
    assert_eq!(keymap.lookup(&ctrl('r')), Some(Command::ReloadFile));
    assert_eq!(
        keymap.lookup(&Keystroke::key(KeyCode::F(5))),
        Some(Command::ReloadFile)
    );
    assert_eq!(
        keymap.lookup(&Keystroke::new(KeyCode::Char('?'), Modifiers::SHIFT)),
        Some(Command::ToggleShortcuts)
    );
}

#[test]
fn test_terminal_event_to_msgs() {
    use crate::messages::Msg;
    use crossterm::event::{KeyCode as TermKeyCode, KeyEvent, KeyModifiers};

    let mut keymap = Keymap::with_bindings(default_bindings());
    let event = KeyEvent::new(TermKeyCode::F(5), KeyModifiers::NONE);
    let stroke = keystroke_from_crossterm(&event).unwrap();

    match keymap.handle_keystroke(stroke) {
        KeyAction::Execute(command) => assert_eq!(command.to_msgs(), vec![Msg::Reload]),
        other => panic!("expected a command, got {:?}", other),
    }
}

#[test]
fn test_display_for_open() {
    let keymap = Keymap::with_bindings(default_bindings());
    let display = keymap.display_for(Command::OpenFile).unwrap();
    assert!(display.contains('O'));
}
