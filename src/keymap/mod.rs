//! Configurable keyboard mapping
//!
//! ```text
//! crossterm::KeyEvent → Keystroke → Keymap::handle_keystroke() → Command → Vec<Msg>
//! ```
//!
//! Defaults come from the embedded `keymap.yaml`; a user keymap in the config
//! directory is merged on top.

mod binding;
mod command;
mod config;
mod crossterm_adapter;
mod defaults;
#[allow(clippy::module_inception)]
mod keymap;
mod types;

pub use binding::Keybinding;
pub use command::Command;
pub use config::{load_keymap_file, parse_key_string, parse_keymap_yaml, KeymapError};
pub use crossterm_adapter::keystroke_from_crossterm;
pub use defaults::{
    default_bindings, get_default_keymap_yaml, load_default_keymap, merge_bindings,
    merge_user_file,
};
pub use keymap::{KeyAction, Keymap};
pub use types::{KeyCode, Keystroke, Modifiers};

#[cfg(test)]
mod tests;
