//! Message types for the viewer's update loop
//!
//! Keys, host events and menu picks all become a [`Msg`]; the controller is
//! the only thing that acts on them.

use crate::host::HostEvent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Ask the user for a path (native dialog, then manual entry) and load it
    OpenFile,
    /// Reload the current document, if any
    Reload,
    ToggleShortcuts,
    ShowAbout,
    /// Show the terminal menu (stands in for the native application menu)
    ShowMenu,
    /// Another instance wants the window showing `path` brought forward
    Activate(String),
    Quit,
}

impl From<HostEvent> for Msg {
    fn from(event: HostEvent) -> Self {
        match event {
            HostEvent::MenuOpenFile => Msg::OpenFile,
            HostEvent::MenuAbout => Msg::ShowAbout,
            HostEvent::ActivationRequested(path) => Msg::Activate(path),
        }
    }
}
