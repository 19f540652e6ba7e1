//! Host capability negotiation
//!
//! The host is probed once at startup. Whatever the probe decides holds for
//! the whole session: `Available` forwards every call, `Unavailable` answers
//! with [`HostError::Unavailable`] except for reads, which serve the demo
//! document so the viewer still shows something.

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedReceiver;

use super::demo::demo_document;
use super::retry::{retry_until_ready, Readiness, RetryPolicy};
use super::{HostBridge, HostConnector, HostError, HostEvent};

#[derive(Clone)]
pub enum Bridge {
    Available(Arc<dyn HostBridge>),
    Unavailable,
}

impl std::fmt::Debug for Bridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Bridge::Available(_) => f.write_str("Bridge::Available"),
            Bridge::Unavailable => f.write_str("Bridge::Unavailable"),
        }
    }
}

impl Bridge {
    /// Probe `connector` under `policy`; an elapsed budget means degraded mode
    pub async fn negotiate(connector: &dyn HostConnector, policy: &RetryPolicy) -> Self {
        let readiness = retry_until_ready(policy, |attempt| async move {
            match connector.connect().await {
                Ok(Some(host)) => Some(host),
                Ok(None) => {
                    tracing::debug!("Waiting for host... attempt {}", attempt + 1);
                    None
                }
                Err(e) => {
                    tracing::debug!("Host probe {} failed: {}", attempt + 1, e);
                    None
                }
            }
        })
        .await;

        match readiness {
            Readiness::Ready(host) => {
                tracing::info!("Host bridge available");
                Bridge::Available(host)
            }
            Readiness::NotReady { attempts } => {
                tracing::error!(
                    "Host bridge not ready after {} attempts, continuing without it",
                    attempts
                );
                Bridge::Unavailable
            }
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Bridge::Available(_))
    }

    pub async fn open_file_dialog(&self) -> Result<Option<String>, HostError> {
        match self {
            Bridge::Available(host) => host.open_file_dialog().await,
            Bridge::Unavailable => Err(HostError::Unavailable),
        }
    }

    pub async fn read_file_content(&self, path: &str) -> Result<String, HostError> {
        match self {
            Bridge::Available(host) => host.read_file_content(path).await,
            Bridge::Unavailable => {
                tracing::info!("No host, serving demo content for {}", path);
                Ok(demo_document(Some(path)))
            }
        }
    }

    pub async fn check_file_already_open(&self, path: &str) -> Result<bool, HostError> {
        match self {
            Bridge::Available(host) => host.check_file_already_open(path).await,
            Bridge::Unavailable => Err(HostError::Unavailable),
        }
    }

    pub async fn activate_existing_window(&self, path: &str) -> Result<(), HostError> {
        match self {
            Bridge::Available(host) => host.activate_existing_window(path).await,
            Bridge::Unavailable => Err(HostError::Unavailable),
        }
    }

    pub async fn register_file_open(&self, path: &str) -> Result<(), HostError> {
        match self {
            Bridge::Available(host) => host.register_file_open(path).await,
            Bridge::Unavailable => Err(HostError::Unavailable),
        }
    }

    pub async fn unregister_file_open(&self, path: &str) -> Result<(), HostError> {
        match self {
            Bridge::Available(host) => host.unregister_file_open(path).await,
            Bridge::Unavailable => Err(HostError::Unavailable),
        }
    }

    pub async fn get_cli_args(&self) -> Result<Vec<String>, HostError> {
        match self {
            Bridge::Available(host) => host.get_cli_args().await,
            Bridge::Unavailable => Err(HostError::Unavailable),
        }
    }

    pub fn take_events(&self) -> Option<UnboundedReceiver<HostEvent>> {
        match self {
            Bridge::Available(host) => host.take_events(),
            Bridge::Unavailable => None,
        }
    }
}
