//! Command enum representing all key-bindable viewer actions
//!
//! Commands are the bridge between keybindings and the message system.

use std::str::FromStr;

use crate::messages::Msg;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    OpenFile,
    ReloadFile,
    ToggleShortcuts,
    ShowAbout,
    ShowMenu,
    Quit,
    /// Removes a default binding when used in a user keymap
    Unbound,
}

impl Command {
    pub const ALL: [Command; 6] = [
        Command::OpenFile,
        Command::ReloadFile,
        Command::ToggleShortcuts,
        Command::ShowAbout,
        Command::ShowMenu,
        Command::Quit,
    ];

    /// Convert this command to message(s) for the update loop
    pub fn to_msgs(self) -> Vec<Msg> {
        match self {
            Command::OpenFile => vec![Msg::OpenFile],
            Command::ReloadFile => vec![Msg::Reload],
            Command::ToggleShortcuts => vec![Msg::ToggleShortcuts],
            Command::ShowAbout => vec![Msg::ShowAbout],
            Command::ShowMenu => vec![Msg::ShowMenu],
            Command::Quit => vec![Msg::Quit],
            Command::Unbound => vec![],
        }
    }

    /// Name shown in the shortcuts panel
    pub fn display_name(self) -> &'static str {
        match self {
            Command::OpenFile => "Open file",
            Command::ReloadFile => "Reload file",
            Command::ToggleShortcuts => "Toggle shortcuts help",
            Command::ShowAbout => "About",
            Command::ShowMenu => "Menu",
            Command::Quit => "Quit",
            Command::Unbound => "Unbound",
        }
    }
}

impl FromStr for Command {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OpenFile" => Ok(Command::OpenFile),
            "ReloadFile" | "Reload" => Ok(Command::ReloadFile),
            "ToggleShortcuts" => Ok(Command::ToggleShortcuts),
            "ShowAbout" | "About" => Ok(Command::ShowAbout),
            "ShowMenu" => Ok(Command::ShowMenu),
            "Quit" => Ok(Command::Quit),
            "Unbound" => Ok(Command::Unbound),
            _ => Err(()),
        }
    }
}
