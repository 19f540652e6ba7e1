//! Embedded prompts used when the host cannot show native UI
//!
//! Manual path entry backs up the native file dialog, and a small menu stands
//! in for the application menu a windowed host would provide.

use std::sync::Arc;

use async_trait::async_trait;
use crossterm::terminal;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};

use crate::host::{is_demo, HostEvent};
use crate::runtime::input::{InputGate, POLL_INTERVAL};

/// Result of asking the user for a path by hand
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManualEntry {
    Path(String),
    /// The demo sentinel, or nothing typed at all
    Demo,
    Cancelled,
}

impl ManualEntry {
    /// Interpret raw user input; blank input means the demo document
    pub fn from_input(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() || is_demo(trimmed) {
            ManualEntry::Demo
        } else {
            ManualEntry::Path(trimmed.to_string())
        }
    }
}

#[async_trait]
pub trait PathPrompt: Send + Sync {
    async fn prompt_path(&self) -> ManualEntry;
}

const MENU_ITEMS: [&str; 3] = ["Open File...", "About Markdown Viewer", "Cancel"];

/// Prompts on the controlling terminal
pub struct TerminalPrompt {
    gate: Arc<InputGate>,
}

impl TerminalPrompt {
    pub fn new(gate: Arc<InputGate>) -> Self {
        Self { gate }
    }

    /// Show the application menu; `None` when dismissed
    pub async fn menu(&self) -> Option<HostEvent> {
        let picked = self
            .interact(|| {
                Select::with_theme(&ColorfulTheme::default())
                    .with_prompt("Markdown Viewer")
                    .items(&MENU_ITEMS)
                    .default(0)
                    .interact_opt()
            })
            .await
            .flatten();

        match picked {
            Some(0) => Some(HostEvent::MenuOpenFile),
            Some(1) => Some(HostEvent::MenuAbout),
            _ => None,
        }
    }

    /// Run a blocking dialoguer interaction with the key reader paused and
    /// the terminal out of raw mode
    async fn interact<T, F>(&self, f: F) -> Option<T>
    where
        T: Send + 'static,
        F: FnOnce() -> dialoguer::Result<T> + Send + 'static,
    {
        self.gate.pause();
        // Let the reader leave its current poll before we take stdin
        tokio::time::sleep(POLL_INTERVAL * 2).await;

        let result = tokio::task::spawn_blocking(move || {
            let was_raw = terminal::is_raw_mode_enabled().unwrap_or(false);
            if was_raw {
                let _ = terminal::disable_raw_mode();
            }
            println!();
            let result = f();
            if was_raw {
                let _ = terminal::enable_raw_mode();
            }
            result
        })
        .await;

        self.gate.resume();

        match result {
            Ok(Ok(value)) => Some(value),
            Ok(Err(e)) => {
                tracing::warn!("Prompt failed: {}", e);
                None
            }
            Err(e) => {
                tracing::error!("Prompt task failed: {}", e);
                None
            }
        }
    }
}

#[async_trait]
impl PathPrompt for TerminalPrompt {
    async fn prompt_path(&self) -> ManualEntry {
        let input = self
            .interact(|| {
                Input::<String>::with_theme(&ColorfulTheme::default())
                    .with_prompt("Enter the path to a markdown file (or 'demo')")
                    .allow_empty(true)
                    .interact_text()
            })
            .await;

        match input {
            Some(input) => ManualEntry::from_input(&input),
            None => ManualEntry::Cancelled,
        }
    }
}
