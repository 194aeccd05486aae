//! Process-wide device directory shared between conversation turns.
//!
//! A registry listing in one turn is what a later turn resolves device names
//! against, so the directory outlives requests. Refreshes build the complete
//! directory first and swap it in under the write lock; readers always see
//! one whole listing, and the last refresh to finish wins.

use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::{DeviceDirectory, DeviceRegistryEntry};

/// Shared handle to the most recent device directory.
#[derive(Debug, Clone, Default)]
pub struct SharedDeviceDirectory {
    current: Arc<RwLock<Arc<DeviceDirectory>>>,
}

impl SharedDeviceDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole directory.
    pub async fn replace(&self, directory: DeviceDirectory) {
        *self.current.write().await = Arc::new(directory);
    }

    /// The directory as of now; later refreshes do not affect it.
    pub async fn snapshot(&self) -> Arc<DeviceDirectory> {
        Arc::clone(&*self.current.read().await)
    }

    pub async fn lookup(&self, label: &str) -> Option<DeviceRegistryEntry> {
        self.current.read().await.get(label).cloned()
    }
}
