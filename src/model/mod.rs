//! Application model - the state of the viewer session
//!
//! `AppState` has a single owner (the acquisition controller). Everything else
//! reads clones of it.

pub mod document;

pub use document::{get_file_name, Document, FileInfo, UNKNOWN_FILE_NAME};

use serde::{Deserialize, Serialize};

/// Light or dark preview palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl std::str::FromStr for ThemeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            other => Err(format!("Unknown theme '{}', expected 'light' or 'dark'", other)),
        }
    }
}

/// User-facing display settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub theme: ThemeMode,
    #[serde(default = "default_font_size")]
    pub font_size: u16,
    #[serde(default = "default_font_family")]
    pub font_family: String,
    /// Carried for hosts with real windows; a browser page ignores it
    #[serde(default)]
    pub always_on_top: bool,
}

fn default_font_size() -> u16 {
    16
}

fn default_font_family() -> String {
    "system".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: ThemeMode::default(),
            font_size: default_font_size(),
            font_family: default_font_family(),
            always_on_top: false,
        }
    }
}

/// The viewer session state
///
/// `current_content` is always the last successfully rendered source for
/// `current_path`, or empty when nothing is loaded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub current_path: Option<String>,
    pub current_content: String,
    /// The demo document is showing; `current_path` is then not a file
    pub showing_demo: bool,
    pub settings: Settings,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        Self {
            current_path: None,
            current_content: String::new(),
            showing_demo: false,
            settings,
        }
    }

    /// Replace the active document; nothing from the previous one survives
    pub fn set_document(&mut self, path: String, content: String) {
        self.current_path = Some(path);
        self.current_content = content;
        self.showing_demo = false;
    }

    /// Show the built-in demo document
    pub fn set_demo(&mut self, content: String) {
        self.current_path = Some(crate::host::DEMO_SENTINEL.to_string());
        self.current_content = content;
        self.showing_demo = true;
    }

    pub fn has_document(&self) -> bool {
        self.current_path.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_empty() {
        let state = AppState::new(Settings::default());
        assert!(state.current_path.is_none());
        assert!(state.current_content.is_empty());
        assert!(!state.has_document());
    }

    #[test]
    fn test_set_document_replaces_everything() {
        let mut state = AppState::default();
        state.set_document("/a.md".into(), "# A".into());
        state.set_document("/b.md".into(), "# B".into());
        assert_eq!(state.current_path.as_deref(), Some("/b.md"));
        assert_eq!(state.current_content, "# B");
    }

    #[test]
    fn test_demo_flag_follows_last_document() {
        let mut state = AppState::default();
        state.set_demo("# Demo".into());
        assert!(state.showing_demo);
        assert_eq!(state.current_path.as_deref(), Some("demo"));

        state.set_document("demo".into(), "# A real file".into());
        assert!(!state.showing_demo);
    }

    #[test]
    fn test_theme_mode_from_str() {
        assert_eq!("Dark".parse::<ThemeMode>(), Ok(ThemeMode::Dark));
        assert_eq!("light".parse::<ThemeMode>(), Ok(ThemeMode::Light));
        assert!("solarized".parse::<ThemeMode>().is_err());
    }

    #[test]
    fn test_settings_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.theme, ThemeMode::Light);
        assert_eq!(settings.font_size, 16);
        assert_eq!(settings.font_family, "system");
        assert!(!settings.always_on_top);
    }
}
