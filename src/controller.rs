//! Document acquisition: get a path, load it, render it, highlight it
//!
//! The controller owns [`AppState`]. A load cycle always runs in this order:
//! loading view, dedupe check, read, render, plain content, highlighted
//! content, state commit, registration. Cycles may overlap; each takes a
//! ticket when it starts and commits state only if no newer cycle has
//! committed yet, while the display shows whichever cycle finished last.
//! Cycles that end in an activation or a read error never commit, so they
//! cannot supersede an older cycle that did show its document.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use thiserror::Error;

use crate::dedupe::DedupeCoordinator;
use crate::display::{Display, View};
use crate::host::{demo_document, Bridge, HostError, DEMO_SENTINEL};
use crate::markdown::RenderedContainer;
use crate::messages::Msg;
use crate::model::{AppState, Document, Settings};
use crate::prompt::{ManualEntry, PathPrompt};
use crate::syntax::HighlightScheduler;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("Failed to load file: {0}")]
    Read(#[source] HostError),
}

/// How a load cycle ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Content shown and state committed
    Displayed,
    /// Another instance already shows the file; it was asked to come forward
    ActivatedExisting,
    /// Content shown, but a newer cycle had started so state was left alone
    Superseded,
}

/// What a load cycle shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadTarget {
    File(String),
    /// The built-in demo document, picked at the manual-entry prompt
    Demo,
}

impl LoadTarget {
    /// Path as shown in the header and kept in [`AppState`]
    pub fn path(&self) -> &str {
        match self {
            LoadTarget::File(path) => path,
            LoadTarget::Demo => DEMO_SENTINEL,
        }
    }
}

/// Whether the update loop keeps going
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct AcquisitionController {
    bridge: Arc<Bridge>,
    dedupe: DedupeCoordinator,
    scheduler: HighlightScheduler,
    display: Arc<dyn Display>,
    prompt: Arc<dyn PathPrompt>,
    state: RwLock<AppState>,
    ticket: AtomicU64,
    /// Ticket of the newest cycle that committed state
    committed: AtomicU64,
    cli_consumed: AtomicBool,
    /// Last non-loading view, restored when a load turns into an activation
    last_view: Mutex<View>,
}

impl AcquisitionController {
    pub fn new(
        bridge: Arc<Bridge>,
        scheduler: HighlightScheduler,
        display: Arc<dyn Display>,
        prompt: Arc<dyn PathPrompt>,
        settings: Settings,
    ) -> Self {
        Self {
            dedupe: DedupeCoordinator::new(Arc::clone(&bridge)),
            bridge,
            scheduler,
            display,
            prompt,
            state: RwLock::new(AppState::new(settings)),
            ticket: AtomicU64::new(0),
            committed: AtomicU64::new(0),
            cli_consumed: AtomicBool::new(false),
            last_view: Mutex::new(View::Welcome),
        }
    }

    /// Snapshot of the session state
    pub fn state(&self) -> AppState {
        self.state.read().clone()
    }

    fn show(&self, view: View) {
        if !view.is_loading() {
            *self.last_view.lock() = view.clone();
        }
        self.display.show(view);
    }

    /// The startup file from the host's CLI arguments; yields it only once
    async fn take_startup_path(&self) -> Option<String> {
        if self.cli_consumed.swap(true, Ordering::SeqCst) {
            return None;
        }

        match self.bridge.get_cli_args().await {
            Ok(args) => args.into_iter().next().filter(|arg| !arg.trim().is_empty()),
            Err(e) => {
                tracing::debug!("No CLI arguments: {}", e);
                None
            }
        }
    }

    /// Find out what to load next; `None` means the user cancelled
    ///
    /// An unconsumed CLI path wins. Otherwise the native dialog is asked,
    /// falling back to manual entry when the host cannot show one. Only
    /// manual entry can pick the demo document.
    pub async fn acquire_path(&self) -> Option<LoadTarget> {
        if let Some(path) = self.take_startup_path().await {
            return Some(LoadTarget::File(path));
        }

        match self.bridge.open_file_dialog().await {
            Ok(picked) => picked.map(LoadTarget::File),
            Err(e) => {
                tracing::info!("Native dialog unavailable ({}), asking for a path", e);
                match self.prompt.prompt_path().await {
                    ManualEntry::Path(path) => Some(LoadTarget::File(path)),
                    ManualEntry::Demo => Some(LoadTarget::Demo),
                    ManualEntry::Cancelled => None,
                }
            }
        }
    }

    /// Load the CLI file if there is one, otherwise show the welcome view
    pub async fn startup(&self) -> Option<Result<LoadOutcome, LoadError>> {
        match self.take_startup_path().await {
            Some(path) => Some(self.load_document(&path).await),
            None => {
                self.show(View::Welcome);
                None
            }
        }
    }

    /// Ask for a path and load it; `None` when the user cancelled
    pub async fn open_file(&self) -> Option<Result<LoadOutcome, LoadError>> {
        match self.acquire_path().await {
            Some(target) => Some(self.load(target).await),
            None => {
                tracing::debug!("Open cancelled");
                None
            }
        }
    }

    /// Run one load cycle for the file at `path`
    pub async fn load_document(&self, path: &str) -> Result<LoadOutcome, LoadError> {
        self.load(LoadTarget::File(path.to_string())).await
    }

    /// Run one load cycle
    pub async fn load(&self, target: LoadTarget) -> Result<LoadOutcome, LoadError> {
        let ticket = self.ticket.fetch_add(1, Ordering::SeqCst) + 1;
        let demo = target == LoadTarget::Demo;
        let path = target.path();
        tracing::info!("Loading {} (cycle {})", path, ticket);

        self.display.show(View::Loading {
            path: path.to_string(),
        });

        let content = if demo {
            demo_document(None)
        } else {
            if self.dedupe.check_open(path).await {
                tracing::info!("{} is already open in another window", path);
                self.dedupe.activate(path).await;
                let previous = self.last_view.lock().clone();
                self.display.show(previous);
                return Ok(LoadOutcome::ActivatedExisting);
            }

            match self.bridge.read_file_content(path).await {
                Ok(content) => content,
                Err(e) => {
                    let error = LoadError::Read(e);
                    tracing::error!("{}", error);
                    self.show(View::Error {
                        message: error.to_string(),
                    });
                    return Err(error);
                }
            }
        };

        let document = Document::render(path, content);
        self.present(&document).await;

        let previous = {
            let mut state = self.state.write();
            if ticket < self.committed.load(Ordering::SeqCst) {
                tracing::debug!("Cycle {} for {} was superseded", ticket, path);
                return Ok(LoadOutcome::Superseded);
            }
            self.committed.store(ticket, Ordering::SeqCst);

            let previous = registered_path(&state);
            if demo {
                state.set_demo(document.raw_content);
            } else {
                state.set_document(document.path.clone(), document.raw_content);
            }
            previous
        };

        if let Some(previous) = previous.filter(|p| demo || p != path) {
            self.dedupe.release(&previous).await;
        }
        if !demo {
            self.dedupe.register(path).await;
        }

        Ok(LoadOutcome::Displayed)
    }

    /// Show rendered content, then again once code blocks are highlighted
    async fn present(&self, document: &Document) {
        let file = document.file_info();
        if document.is_blank() {
            self.show(View::Empty { file });
            return;
        }

        let mut container = RenderedContainer::parse(&document.rendered_html);
        if container.code_elements().next().is_none() {
            self.show(View::Document {
                file,
                html: document.rendered_html.clone(),
                highlighted: true,
            });
            return;
        }

        self.show(View::Document {
            file: file.clone(),
            html: document.rendered_html.clone(),
            highlighted: false,
        });

        let report = self.scheduler.apply_to_container(&mut container).await;
        tracing::debug!(
            "{}: {} blocks highlighted, {} plain",
            file.name,
            report.highlighted,
            report.plain
        );

        self.show(View::Document {
            file,
            html: container.to_html(),
            highlighted: true,
        });
    }

    /// Reload the current document; does nothing when none is loaded
    pub async fn reload(&self) -> Option<Result<LoadOutcome, LoadError>> {
        let target = {
            let state = self.state.read();
            match state.current_path.clone() {
                Some(_) if state.showing_demo => Some(LoadTarget::Demo),
                Some(path) => Some(LoadTarget::File(path)),
                None => None,
            }
        };
        match target {
            Some(target) => Some(self.load(target).await),
            None => {
                tracing::debug!("Nothing to reload");
                None
            }
        }
    }

    /// React to one message
    pub async fn handle(&self, msg: Msg) -> Flow {
        match msg {
            Msg::OpenFile => log_result(self.open_file().await),
            Msg::Reload => log_result(self.reload().await),
            Msg::ToggleShortcuts => self.display.toggle_shortcuts(),
            Msg::ShowAbout => self.display.show_about(),
            Msg::Activate(path) => {
                tracing::info!("Activation requested for {}", path);
                self.display.raise();
            }
            Msg::ShowMenu => tracing::debug!("Menu is handled by the runtime"),
            Msg::Quit => return Flow::Quit,
        }
        Flow::Continue
    }

    /// Release the current file so other instances may open it
    pub async fn shutdown(&self) {
        let path = registered_path(&self.state.read());
        if let Some(path) = path {
            self.dedupe.release(&path).await;
        }
    }
}

/// The path this instance has registered with the host, if any
fn registered_path(state: &AppState) -> Option<String> {
    state.current_path.clone().filter(|_| !state.showing_demo)
}

fn log_result(result: Option<Result<LoadOutcome, LoadError>>) {
    match result {
        Some(Ok(outcome)) => tracing::debug!("Load finished: {:?}", outcome),
        // Already on screen as an error view
        Some(Err(e)) => tracing::debug!("Load failed: {}", e),
        None => {}
    }
}
