//! Host bridge - the fixed command surface the viewer core calls into
//!
//! File dialogs, disk reads, the cross-instance open registry and window
//! activation all live behind [`HostBridge`]. The core resolves the bridge
//! once at startup into a [`Bridge`] and never probes again.

mod bridge;
pub mod demo;
mod native;
mod registry;
pub mod retry;

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc::UnboundedReceiver;

pub use bridge::Bridge;
pub use demo::{demo_document, is_demo, DEMO_SENTINEL};
pub use native::{NativeConnector, NativeHost};
pub use registry::OpenRegistry;
pub use retry::{retry_until_ready, Readiness, RetryPolicy};

/// Failures reported by the host
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    #[error("host bridge is unavailable")]
    Unavailable,
    #[error("failed to read {path}: {message}")]
    Read { path: String, message: String },
    #[error("file dialog failed: {0}")]
    Dialog(String),
    #[error("open-file registry error: {0}")]
    Registry(String),
}

/// Events the host pushes to the viewer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// Menu "Open File..." chosen
    MenuOpenFile,
    /// Menu "About" chosen
    MenuAbout,
    /// Another instance asked this one to come forward for `path`
    ActivationRequested(String),
}

#[async_trait]
pub trait HostBridge: Send + Sync {
    /// Native picker; `Ok(None)` when the user cancels
    async fn open_file_dialog(&self) -> Result<Option<String>, HostError>;

    async fn read_file_content(&self, path: &str) -> Result<String, HostError>;

    /// Whether another live instance already shows `path`
    async fn check_file_already_open(&self, path: &str) -> Result<bool, HostError>;

    async fn activate_existing_window(&self, path: &str) -> Result<(), HostError>;

    async fn register_file_open(&self, path: &str) -> Result<(), HostError>;

    async fn unregister_file_open(&self, path: &str) -> Result<(), HostError>;

    /// Startup arguments; the first one is the file to open
    async fn get_cli_args(&self) -> Result<Vec<String>, HostError>;

    /// Event stream; hands out the receiver once
    fn take_events(&self) -> Option<UnboundedReceiver<HostEvent>>;
}

/// One readiness probe against a host
#[async_trait]
pub trait HostConnector: Send + Sync {
    /// `Ok(None)` means the host is not ready yet
    async fn connect(&self) -> Result<Option<Arc<dyn HostBridge>>, HostError>;
}
