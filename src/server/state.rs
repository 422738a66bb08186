//! Server state and configuration.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::printer::Settings;
use crate::transport::Transport;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "0.0.0.0:8090")
    pub listen_addr: String,
    /// Where settings changes made through the API are saved, if anywhere
    pub settings_path: Option<PathBuf>,
}

/// Application state shared across handlers.
pub struct AppState {
    pub config: ServerConfig,
    /// Current print width, destination, and transport kind
    pub settings: RwLock<Settings>,
    /// Delivery backend for print jobs, rebuilt when the transport kind changes
    pub transport: RwLock<Arc<dyn Transport>>,
}

impl AppState {
    pub fn new(config: ServerConfig, settings: Settings, transport: Arc<dyn Transport>) -> Self {
        Self {
            config,
            settings: RwLock::new(settings),
            transport: RwLock::new(transport),
        }
    }

    /// Snapshot of the current transport.
    pub async fn transport(&self) -> Arc<dyn Transport> {
        self.transport.read().await.clone()
    }

    /// Settings and transport taken together under the settings lock.
    ///
    /// Updates swap the transport while holding the settings write lock, so
    /// the pair returned here always belongs to the same settings.
    pub async fn snapshot(&self) -> (Settings, Arc<dyn Transport>) {
        let settings = self.settings.read().await;
        let transport = self.transport.read().await.clone();
        (settings.clone(), transport)
    }
}
