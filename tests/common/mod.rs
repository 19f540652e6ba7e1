//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::mpsc::UnboundedReceiver;

use mdview::controller::AcquisitionController;
use mdview::display::{Display, View};
use mdview::host::{Bridge, HostBridge, HostError, HostEvent};
use mdview::model::Settings;
use mdview::prompt::{ManualEntry, PathPrompt};
use mdview::syntax::{
    Grammar, GrammarCache, GrammarError, GrammarSource, HighlightScheduler, LanguageId,
};

// ============================================================================
// Mock host
// ============================================================================

/// One recorded host round trip
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    Dialog,
    Read(String),
    Check(String),
    Activate(String),
    Register(String),
    Unregister(String),
    CliArgs,
}

/// Scriptable in-memory host
pub struct MockHost {
    files: HashMap<String, String>,
    read_delays: HashMap<String, Duration>,
    open_elsewhere: HashSet<String>,
    check_fails: bool,
    register_fails: bool,
    dialog: Result<Option<String>, HostError>,
    cli_args: Vec<String>,
    calls: Mutex<Vec<HostCall>>,
}

impl Default for MockHost {
    fn default() -> Self {
        Self {
            files: HashMap::new(),
            read_delays: HashMap::new(),
            open_elsewhere: HashSet::new(),
            check_fails: false,
            register_fails: false,
            dialog: Err(HostError::Dialog("no graphical session".to_string())),
            cli_args: Vec::new(),
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl MockHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: &str, content: &str) -> Self {
        self.files.insert(path.to_string(), content.to_string());
        self
    }

    pub fn with_read_delay(mut self, path: &str, delay: Duration) -> Self {
        self.read_delays.insert(path.to_string(), delay);
        self
    }

    pub fn open_elsewhere(mut self, path: &str) -> Self {
        self.open_elsewhere.insert(path.to_string());
        self
    }

    pub fn failing_check(mut self) -> Self {
        self.check_fails = true;
        self
    }

    pub fn failing_register(mut self) -> Self {
        self.register_fails = true;
        self
    }

    pub fn with_dialog(mut self, result: Result<Option<String>, HostError>) -> Self {
        self.dialog = result;
        self
    }

    pub fn with_cli_args(mut self, args: &[&str]) -> Self {
        self.cli_args = args.iter().map(|a| a.to_string()).collect();
        self
    }

    /// Wrap in an available bridge, keeping a handle for assertions
    pub fn into_bridge(self) -> (Arc<MockHost>, Arc<Bridge>) {
        let host = Arc::new(self);
        let bridge = Arc::new(Bridge::Available(host.clone()));
        (host, bridge)
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.lock().clone()
    }

    pub fn count(&self, pred: impl Fn(&HostCall) -> bool) -> usize {
        self.calls.lock().iter().filter(|c| pred(c)).count()
    }

    fn record(&self, call: HostCall) {
        self.calls.lock().push(call);
    }
}

#[async_trait]
impl HostBridge for MockHost {
    async fn open_file_dialog(&self) -> Result<Option<String>, HostError> {
        self.record(HostCall::Dialog);
        self.dialog.clone()
    }

    async fn read_file_content(&self, path: &str) -> Result<String, HostError> {
        self.record(HostCall::Read(path.to_string()));
        if let Some(delay) = self.read_delays.get(path) {
            tokio::time::sleep(*delay).await;
        }
        self.files.get(path).cloned().ok_or_else(|| HostError::Read {
            path: path.to_string(),
            message: "No such file or directory".to_string(),
        })
    }

    async fn check_file_already_open(&self, path: &str) -> Result<bool, HostError> {
        self.record(HostCall::Check(path.to_string()));
        if self.check_fails {
            return Err(HostError::Registry("registry locked".to_string()));
        }
        Ok(self.open_elsewhere.contains(path))
    }

    async fn activate_existing_window(&self, path: &str) -> Result<(), HostError> {
        self.record(HostCall::Activate(path.to_string()));
        Ok(())
    }

    async fn register_file_open(&self, path: &str) -> Result<(), HostError> {
        self.record(HostCall::Register(path.to_string()));
        if self.register_fails {
            return Err(HostError::Registry("read-only registry".to_string()));
        }
        Ok(())
    }

    async fn unregister_file_open(&self, path: &str) -> Result<(), HostError> {
        self.record(HostCall::Unregister(path.to_string()));
        Ok(())
    }

    async fn get_cli_args(&self) -> Result<Vec<String>, HostError> {
        self.record(HostCall::CliArgs);
        Ok(self.cli_args.clone())
    }

    fn take_events(&self) -> Option<UnboundedReceiver<HostEvent>> {
        None
    }
}

// ============================================================================
// Recording display
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Shown {
    View(View),
    ToggleShortcuts,
    About,
    Raise,
}

#[derive(Default)]
pub struct RecordingDisplay {
    shown: Mutex<Vec<Shown>>,
}

impl RecordingDisplay {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn all(&self) -> Vec<Shown> {
        self.shown.lock().clone()
    }

    pub fn views(&self) -> Vec<View> {
        self.shown
            .lock()
            .iter()
            .filter_map(|s| match s {
                Shown::View(view) => Some(view.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn last_view(&self) -> Option<View> {
        self.views().pop()
    }
}

impl Display for RecordingDisplay {
    fn show(&self, view: View) {
        self.shown.lock().push(Shown::View(view));
    }

    fn toggle_shortcuts(&self) {
        self.shown.lock().push(Shown::ToggleShortcuts);
    }

    fn show_about(&self) {
        self.shown.lock().push(Shown::About);
    }

    fn raise(&self) {
        self.shown.lock().push(Shown::Raise);
    }
}

// ============================================================================
// Scripted prompt
// ============================================================================

#[derive(Default)]
pub struct ScriptedPrompt {
    answers: Mutex<VecDeque<ManualEntry>>,
    asked: AtomicUsize,
}

impl ScriptedPrompt {
    pub fn new(answers: Vec<ManualEntry>) -> Arc<Self> {
        Arc::new(Self {
            answers: Mutex::new(answers.into()),
            asked: AtomicUsize::new(0),
        })
    }

    pub fn asked(&self) -> usize {
        self.asked.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PathPrompt for ScriptedPrompt {
    async fn prompt_path(&self) -> ManualEntry {
        self.asked.fetch_add(1, Ordering::SeqCst);
        self.answers
            .lock()
            .pop_front()
            .unwrap_or(ManualEntry::Cancelled)
    }
}

// ============================================================================
// Counting grammar source
// ============================================================================

/// Serves bundled grammars after an optional delay, counting every fetch
#[derive(Default)]
pub struct CountingSource {
    fetches: Mutex<Vec<LanguageId>>,
    delay: Option<Duration>,
    failing: HashSet<LanguageId>,
}

impl CountingSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn failing(mut self, language: LanguageId) -> Self {
        self.failing.insert(language);
        self
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.lock().len()
    }

    pub fn fetches_of(&self, language: LanguageId) -> usize {
        self.fetches.lock().iter().filter(|l| **l == language).count()
    }
}

#[async_trait]
impl GrammarSource for CountingSource {
    async fn fetch(&self, language: LanguageId) -> Result<Grammar, GrammarError> {
        self.fetches.lock().push(language);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.contains(&language) {
            return Err(GrammarError::Fetch {
                language,
                message: "resource missing".to_string(),
            });
        }
        Grammar::builtin(language)
    }
}

pub fn cache_over(source: Arc<CountingSource>) -> Arc<GrammarCache> {
    Arc::new(GrammarCache::new(source, Duration::from_secs(5)))
}

// ============================================================================
// Controller fixture
// ============================================================================

pub struct Fixture {
    pub controller: Arc<AcquisitionController>,
    pub display: Arc<RecordingDisplay>,
    pub prompt: Arc<ScriptedPrompt>,
    pub source: Arc<CountingSource>,
}

pub fn fixture(bridge: Arc<Bridge>) -> Fixture {
    fixture_with_prompt(bridge, Vec::new())
}

pub fn fixture_with_prompt(bridge: Arc<Bridge>, answers: Vec<ManualEntry>) -> Fixture {
    let display = RecordingDisplay::new();
    let prompt = ScriptedPrompt::new(answers);
    let source = Arc::new(CountingSource::new());
    let scheduler = HighlightScheduler::new(cache_over(source.clone()));
    let controller = Arc::new(AcquisitionController::new(
        bridge,
        scheduler,
        display.clone(),
        prompt.clone(),
        Settings::default(),
    ));
    Fixture {
        controller,
        display,
        prompt,
        source,
    }
}

pub const RUST_DOC: &str = "# Notes\n\n```rust\nfn main() {}\n```\n";
