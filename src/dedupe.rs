//! One window per file across running instances
//!
//! Every call here is advisory. A host that cannot answer is treated as "not
//! open elsewhere" and registration failures never undo a displayed document,
//! so the viewer is never less available than it would be without dedupe.

use std::sync::Arc;

use crate::host::Bridge;

#[derive(Debug, Clone)]
pub struct DedupeCoordinator {
    bridge: Arc<Bridge>,
}

impl DedupeCoordinator {
    pub fn new(bridge: Arc<Bridge>) -> Self {
        Self { bridge }
    }

    /// Whether another instance already shows `path`; errors count as `false`
    pub async fn check_open(&self, path: &str) -> bool {
        match self.bridge.check_file_already_open(path).await {
            Ok(open) => open,
            Err(e) => {
                tracing::warn!("Could not check whether {} is open elsewhere: {}", path, e);
                false
            }
        }
    }

    /// Ask the instance showing `path` to come forward
    pub async fn activate(&self, path: &str) {
        if let Err(e) = self.bridge.activate_existing_window(path).await {
            tracing::warn!("Failed to activate the window showing {}: {}", path, e);
        }
    }

    pub async fn register(&self, path: &str) {
        match self.bridge.register_file_open(path).await {
            Ok(()) => tracing::debug!("Registered {} as open", path),
            Err(e) => tracing::warn!("Failed to register {} as open: {}", path, e),
        }
    }

    pub async fn release(&self, path: &str) {
        match self.bridge.unregister_file_open(path).await {
            Ok(()) => tracing::debug!("Released {}", path),
            Err(e) => tracing::warn!("Failed to release {}: {}", path, e),
        }
    }
}
