//! # System Lifecycle
//!
//! Starts the configured store backend, hands out clients, and shuts it down again.
//!
//! ```rust,ignore
//! let system = InventorySystem::start(&config);
//! let mut dashboard = InventoryDashboard::new(system.client(), config.dashboard_settings());
//! dashboard.load().await?;
//! drop(dashboard);
//! system.shutdown().await?;
//! ```
//!
//! The backend actor exits once every [`StoreClient`] is gone, so callers must drop the
//! clients they took before awaiting [`InventorySystem::shutdown`].

pub mod tracing;

use crate::config::{ConsoleConfig, StoreBackend};
use crate::framework::{HttpStore, MemoryStore, StoreClient};
use crate::model::Record;
use ::tracing::{error, info};
use tokio::task::JoinHandle;

/// Channel capacity between clients and the backend actor.
pub const STORE_BUFFER: usize = 32;

pub struct InventorySystem {
    client: StoreClient,
    handle: JoinHandle<()>,
}

impl InventorySystem {
    /// Spawns the backend named by `config`.
    pub fn start(config: &ConsoleConfig) -> Self {
        match &config.backend {
            StoreBackend::Memory => Self::in_memory(Vec::new()),
            StoreBackend::Http { base_url } => {
                let (store, client) = HttpStore::new(base_url.clone(), STORE_BUFFER);
                Self {
                    client,
                    handle: tokio::spawn(store.run()),
                }
            }
        }
    }

    /// Spawns an in-process store seeded with `records`.
    pub fn in_memory(records: Vec<Record>) -> Self {
        let (store, client) = MemoryStore::new(STORE_BUFFER);
        Self {
            client,
            handle: tokio::spawn(store.with_records(records).run()),
        }
    }

    pub fn client(&self) -> StoreClient {
        self.client.clone()
    }

    /// Closes the system's own client and waits for the backend to drain.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down store...");
        drop(self.client);

        if let Err(e) = self.handle.await {
            error!("Store task failed: {:?}", e);
            return Err(format!("Store task failed: {:?}", e));
        }

        info!("Store shutdown complete.");
        Ok(())
    }
}
