//! Display backed by an HTML page opened in the default browser
//!
//! Each view is written atomically to one page per process; the page reloads
//! itself, so writing the file is all it takes to update what the user sees.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crossterm::{cursor, execute, style, terminal};
use parking_lot::Mutex;

use super::{Display, View, EMPTY_DOCUMENT_MESSAGE, LOADING_MESSAGE, WELCOME_MESSAGE};
use crate::markdown::{page_html, render_inline, PageContent};
use crate::model::Settings;

const APP_TITLE: &str = "Markdown Viewer";
const SHORTCUTS_VISIBLE_MS: u128 = 3000;

struct PageState {
    view: View,
    /// Epoch millis when the shortcuts panel was last shown
    shortcuts_shown_at: Option<u128>,
    about: bool,
    opened: bool,
}

pub struct HtmlPageDisplay {
    path: PathBuf,
    settings: Settings,
    shortcuts: Vec<(String, &'static str)>,
    open_in_browser: bool,
    terminal_status: bool,
    state: Mutex<PageState>,
}

fn now_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}

impl HtmlPageDisplay {
    /// A page at `path`; nothing is opened or printed until enabled
    pub fn new(path: PathBuf, settings: Settings, shortcuts: Vec<(String, &'static str)>) -> Self {
        Self {
            path,
            settings,
            shortcuts,
            open_in_browser: false,
            terminal_status: false,
            state: Mutex::new(PageState {
                view: View::Welcome,
                shortcuts_shown_at: None,
                about: false,
                opened: false,
            }),
        }
    }

    /// `~/.config/mdview/preview/mdview-<pid>.html`, opened in the browser
    pub fn for_process(
        settings: Settings,
        shortcuts: Vec<(String, &'static str)>,
    ) -> Result<Self, String> {
        let dir = crate::config_paths::ensure_preview_dir()?;
        let path = dir.join(format!("mdview-{}.html", std::process::id()));
        let mut display = Self::new(path, settings, shortcuts);
        display.open_in_browser = true;
        display.terminal_status = true;
        Ok(display)
    }

    pub fn page_path(&self) -> &Path {
        &self.path
    }

    /// The page as it would be written for the current state
    pub fn current_page(&self) -> String {
        let state = self.state.lock();
        self.page_for(&state)
    }

    fn page_for(&self, state: &PageState) -> String {
        let view = &state.view;
        let (title, header_html, tooltip) = match view.file() {
            Some(file) => (
                file.window_title(),
                render_inline(&html_escape::encode_text(&file.name)),
                file.path.as_str(),
            ),
            None => (APP_TITLE.to_string(), String::new(), ""),
        };

        let mut overlay = self.shortcuts_panel(state.shortcuts_shown_at);
        if state.about {
            overlay.push_str(&about_panel());
        }

        page_html(
            &PageContent {
                title: &title,
                header_html: &header_html,
                header_tooltip: tooltip,
                body_html: &view_body(view),
                overlay_html: &overlay,
            },
            &self.settings,
        )
    }

    fn shortcuts_panel(&self, shown_at: Option<u128>) -> String {
        let rows: String = self
            .shortcuts
            .iter()
            .map(|(keys, name)| {
                format!(
                    "<div><strong>{}</strong> {}</div>",
                    html_escape::encode_text(keys),
                    name
                )
            })
            .collect();
        match shown_at {
            Some(at) => format!(
                r#"<div class="shortcuts-info show" data-shown-at="{}">{}</div>"#,
                at, rows
            ),
            None => format!(r#"<div class="shortcuts-info">{}</div>"#, rows),
        }
    }

    fn write_page(&self, state: &mut PageState) {
        let page = self.page_for(state);
        if let Err(e) = write_atomic(&self.path, &page) {
            tracing::error!("Failed to write preview page {}: {}", self.path.display(), e);
            return;
        }

        if self.terminal_status {
            print_status(&status_line(&state.view));
        }

        if self.open_in_browser && !state.opened {
            state.opened = true;
            self.open_page();
        }
    }

    fn open_page(&self) {
        if let Err(e) = open::that(&self.path) {
            tracing::warn!("Failed to open {} in a browser: {}", self.path.display(), e);
        }
    }
}

impl Display for HtmlPageDisplay {
    fn show(&self, view: View) {
        let mut state = self.state.lock();
        state.view = view;
        state.about = false;
        self.write_page(&mut state);
    }

    fn toggle_shortcuts(&self) {
        let mut state = self.state.lock();
        let now = now_millis();
        let visible = state
            .shortcuts_shown_at
            .is_some_and(|at| now.saturating_sub(at) < SHORTCUTS_VISIBLE_MS);
        state.shortcuts_shown_at = (!visible).then_some(now);
        self.write_page(&mut state);
    }

    fn show_about(&self) {
        let mut state = self.state.lock();
        state.about = !state.about;
        self.write_page(&mut state);
    }

    fn raise(&self) {
        if self.open_in_browser {
            self.open_page();
        }
    }
}

impl Drop for HtmlPageDisplay {
    fn drop(&mut self) {
        if self.open_in_browser {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}

/// Body markup for a view
pub fn view_body(view: &View) -> String {
    match view {
        View::Welcome => format!(
            r#"<div class="welcome-message"><h2>{}</h2><p>{}</p></div>"#,
            APP_TITLE, WELCOME_MESSAGE
        ),
        View::Loading { .. } => format!(r#"<div class="loading">{}</div>"#, LOADING_MESSAGE),
        View::Document { html, .. } => html.clone(),
        View::Empty { .. } => format!(
            r#"<div class="welcome-message"><p>{}</p></div>"#,
            EMPTY_DOCUMENT_MESSAGE
        ),
        View::Error { message } => format!(
            r#"<div class="error-message"><h2>Error</h2><p>{}</p></div>"#,
            html_escape::encode_text(message)
        ),
    }
}

fn about_panel() -> String {
    format!(
        r#"<div class="about-overlay"><div class="about-dialog"><h2>About {}</h2><p>A lightweight markdown viewer with syntax highlighting.</p><p>Version {}</p></div></div>"#,
        APP_TITLE,
        env!("CARGO_PKG_VERSION")
    )
}

fn status_line(view: &View) -> String {
    match view {
        View::Welcome => "No document open. Ctrl+O to open, ? for shortcuts".to_string(),
        View::Loading { path } => format!("Loading {}...", path),
        View::Document {
            file, highlighted, ..
        } => {
            if *highlighted {
                format!("{} ({})", file.name, file.path)
            } else {
                format!("{} ({}) highlighting...", file.name, file.path)
            }
        }
        View::Empty { file } => format!("{}: {}", file.name, EMPTY_DOCUMENT_MESSAGE),
        View::Error { message } => format!("Error: {}", message),
    }
}

fn print_status(line: &str) {
    let result = execute!(
        io::stdout(),
        cursor::MoveToColumn(0),
        terminal::Clear(terminal::ClearType::CurrentLine),
        style::Print(line)
    );
    if let Err(e) = result {
        tracing::debug!("Failed to print status line: {}", e);
    }
}

fn write_atomic(path: &Path, contents: &str) -> io::Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut file = tempfile::NamedTempFile::new_in(dir)?;
    file.write_all(contents.as_bytes())?;
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}
