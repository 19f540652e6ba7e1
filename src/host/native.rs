//! Native host: local disk, rfd dialogs and the shared open registry

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use notify_debouncer_mini::{new_debouncer, DebounceEventResult, Debouncer};
use parking_lot::Mutex;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::oneshot;

use super::registry::OpenRegistry;
use super::{HostBridge, HostConnector, HostError, HostEvent};

const DIALOG_EXTENSIONS: &[&str] = &["md", "markdown", "txt"];

/// Whether a native dialog can be shown at all
fn has_graphical_session() -> bool {
    #[cfg(any(target_os = "windows", target_os = "macos"))]
    {
        true
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        std::env::var_os("DISPLAY").is_some() || std::env::var_os("WAYLAND_DISPLAY").is_some()
    }
}

pub struct NativeHost {
    cli_args: Vec<String>,
    registry: Arc<OpenRegistry>,
    events_rx: Mutex<Option<UnboundedReceiver<HostEvent>>>,
    /// Kept alive for the activation watcher
    _watcher: Mutex<Option<Debouncer<notify::RecommendedWatcher>>>,
}

impl NativeHost {
    /// Start a host over the registry in `registry_dir`
    pub fn start(cli_args: Vec<String>, registry_dir: PathBuf) -> Result<Self, HostError> {
        let registry = Arc::new(OpenRegistry::new(registry_dir)?);
        Ok(Self::with_registry(cli_args, registry))
    }

    pub fn with_registry(cli_args: Vec<String>, registry: Arc<OpenRegistry>) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let watcher = match watch_activation_requests(Arc::clone(&registry), events_tx) {
            Ok(watcher) => Some(watcher),
            Err(e) => {
                tracing::warn!("Activation requests will not be received: {}", e);
                None
            }
        };

        Self {
            cli_args,
            registry,
            events_rx: Mutex::new(Some(events_rx)),
            _watcher: Mutex::new(watcher),
        }
    }

    pub fn registry(&self) -> &Arc<OpenRegistry> {
        &self.registry
    }
}

/// Watch the registry directory and turn our activation requests into events
fn watch_activation_requests(
    registry: Arc<OpenRegistry>,
    tx: UnboundedSender<HostEvent>,
) -> Result<Debouncer<notify::RecommendedWatcher>, notify::Error> {
    let dir = registry.dir().to_path_buf();

    let mut debouncer = new_debouncer(
        Duration::from_millis(200),
        move |result: DebounceEventResult| match result {
            Ok(_) => {
                for path in registry.take_activation_requests() {
                    if tx.send(HostEvent::ActivationRequested(path)).is_err() {
                        return;
                    }
                }
            }
            Err(e) => tracing::warn!("Registry watcher error: {:?}", e),
        },
    )?;

    debouncer
        .watcher()
        .watch(&dir, notify::RecursiveMode::NonRecursive)?;

    tracing::info!("Watching {} for activation requests", dir.display());
    Ok(debouncer)
}

#[async_trait]
impl HostBridge for NativeHost {
    async fn open_file_dialog(&self) -> Result<Option<String>, HostError> {
        if !has_graphical_session() {
            return Err(HostError::Dialog("no graphical session".to_string()));
        }

        let (tx, rx) = oneshot::channel();
        std::thread::spawn(move || {
            let picked = rfd::FileDialog::new()
                .set_title("Open Markdown File")
                .add_filter("Markdown", DIALOG_EXTENSIONS)
                .pick_file();
            let _ = tx.send(picked);
        });

        let picked = rx
            .await
            .map_err(|_| HostError::Dialog("dialog thread exited".to_string()))?;
        Ok(picked.map(|path| path.to_string_lossy().into_owned()))
    }

    async fn read_file_content(&self, path: &str) -> Result<String, HostError> {
        tracing::debug!("Reading {}", path);
        tokio::fs::read_to_string(path)
            .await
            .map_err(|e| HostError::Read {
                path: path.to_string(),
                message: e.to_string(),
            })
    }

    async fn check_file_already_open(&self, path: &str) -> Result<bool, HostError> {
        Ok(self.registry.is_open_elsewhere(path))
    }

    async fn activate_existing_window(&self, path: &str) -> Result<(), HostError> {
        self.registry.request_activation(path)
    }

    async fn register_file_open(&self, path: &str) -> Result<(), HostError> {
        self.registry.register(path)
    }

    async fn unregister_file_open(&self, path: &str) -> Result<(), HostError> {
        self.registry.unregister(path)
    }

    async fn get_cli_args(&self) -> Result<Vec<String>, HostError> {
        Ok(self.cli_args.clone())
    }

    fn take_events(&self) -> Option<UnboundedReceiver<HostEvent>> {
        self.events_rx.lock().take()
    }
}

impl Drop for NativeHost {
    fn drop(&mut self) {
        if let Err(e) = self.registry.release_all() {
            tracing::warn!("Failed to release registry entries: {}", e);
        }
    }
}

/// Connects the native host; ready as soon as the registry directory is usable
pub struct NativeConnector {
    cli_args: Vec<String>,
    registry_dir: Option<PathBuf>,
}

impl NativeConnector {
    pub fn new(cli_args: Vec<String>, registry_dir: Option<PathBuf>) -> Self {
        Self {
            cli_args,
            registry_dir,
        }
    }

    /// Registry under the user config directory
    pub fn from_config_dir(cli_args: Vec<String>) -> Self {
        Self::new(cli_args, crate::config_paths::registry_dir())
    }
}

#[async_trait]
impl HostConnector for NativeConnector {
    async fn connect(&self) -> Result<Option<Arc<dyn HostBridge>>, HostError> {
        let Some(dir) = self.registry_dir.clone() else {
            return Err(HostError::Registry("No config directory available".to_string()));
        };
        let host = NativeHost::start(self.cli_args.clone(), dir)?;
        Ok(Some(Arc::new(host)))
    }
}
