//! Default keybindings for the viewer
//!
//! Loaded from the embedded keymap.yaml, then merged with the user's keymap
//! from the config directory.

use std::path::Path;

use super::binding::Keybinding;
use super::command::Command;
use super::config::{load_keymap_file, parse_keymap_yaml};
use super::types::{KeyCode, Keystroke, Modifiers};

/// Default keymap YAML embedded at compile time
const DEFAULT_KEYMAP_YAML: &str = include_str!("../../keymap.yaml");

pub fn get_default_keymap_yaml() -> &'static str {
    DEFAULT_KEYMAP_YAML
}

/// Load and merge keymaps: embedded defaults, then `~/.config/mdview/keymap.yaml`
///
/// User bindings with `command: Unbound` remove matching default bindings.
pub fn load_default_keymap() -> Vec<Keybinding> {
    let bindings = embedded_bindings();

    match crate::config_paths::keymap_file() {
        Some(user_path) if user_path.exists() => merge_user_file(bindings, &user_path),
        _ => bindings,
    }
}

fn embedded_bindings() -> Vec<Keybinding> {
    match parse_keymap_yaml(DEFAULT_KEYMAP_YAML) {
        Ok(b) => {
            tracing::info!("Loaded embedded default keymap ({} bindings)", b.len());
            b
        }
        Err(e) => {
            tracing::warn!(
                "Failed to parse embedded keymap: {}, using hardcoded defaults",
                e
            );
            default_bindings()
        }
    }
}

/// Merge a user keymap file over `base`; a broken file leaves `base` alone
pub fn merge_user_file(base: Vec<Keybinding>, user_path: &Path) -> Vec<Keybinding> {
    match load_keymap_file(user_path) {
        Ok(user_bindings) => {
            tracing::info!(
                "Merging user keymap from {} ({} bindings)",
                user_path.display(),
                user_bindings.len()
            );
            merge_bindings(base, user_bindings)
        }
        Err(e) => {
            tracing::warn!(
                "Failed to load user keymap from {}: {}",
                user_path.display(),
                e
            );
            base
        }
    }
}

/// Merge user bindings into base bindings
///
/// - Same keystrokes as a base binding: replaces it
/// - Command `Unbound`: removes base bindings with those keystrokes
/// - Otherwise: added
pub fn merge_bindings(base: Vec<Keybinding>, user: Vec<Keybinding>) -> Vec<Keybinding> {
    let mut result = base;

    for user_binding in user {
        if user_binding.command == Command::Unbound {
            result.retain(|b| b.keystrokes != user_binding.keystrokes);
            continue;
        }

        match result
            .iter()
            .position(|b| b.keystrokes == user_binding.keystrokes)
        {
            Some(idx) => result[idx] = user_binding,
            None => result.push(user_binding),
        }
    }

    result
}

/// Hardcoded bindings, used only if the embedded YAML fails to parse
pub fn default_bindings() -> Vec<Keybinding> {
    let ctrl = Modifiers::CTRL;
    let none = Modifiers::NONE;

    vec![
        bind(KeyCode::Char('o'), ctrl, Command::OpenFile),
        bind(KeyCode::F(5), none, Command::ReloadFile),
        bind(KeyCode::Char('r'), ctrl, Command::ReloadFile),
        bind(KeyCode::Char('?'), none, Command::ToggleShortcuts),
        bind(KeyCode::F(1), none, Command::ShowAbout),
        bind(KeyCode::Char('m'), none, Command::ShowMenu),
        bind(KeyCode::Char('q'), ctrl, Command::Quit),
        bind(KeyCode::Char('c'), ctrl, Command::Quit),
    ]
}

fn bind(key: KeyCode, mods: Modifiers, command: Command) -> Keybinding {
    Keybinding::new(Keystroke::new(key, mods), command)
}
