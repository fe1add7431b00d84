use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;

use crate::config::AppConfig;
use crate::error::{PtzError, Result};
use crate::ptz::{new_controller, ControllerConfig, PtzController};

type Snapshot = Arc<HashMap<String, ControllerConfig>>;

/// Read-mostly camera configuration shared by all requests.
///
/// The snapshot itself is immutable; `reload` and `replace` swap it as a
/// whole, so readers never see a half-updated set.
pub struct CameraRegistry {
    snapshot: Arc<RwLock<Snapshot>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CameraSummary {
    pub name: String,
    pub protocol: String,
    pub host: String,
    pub port: u16,
}

impl CameraRegistry {
    pub fn new() -> Self {
        Self {
            snapshot: Arc::new(RwLock::new(Arc::new(HashMap::new()))),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            snapshot: Arc::new(RwLock::new(Arc::new(config.controller_configs()))),
        }
    }

    pub async fn replace(&self, cameras: HashMap<String, ControllerConfig>) {
        let count = cameras.len();
        *self.snapshot.write().await = Arc::new(cameras);
        tracing::info!("Loaded {} PTZ camera(s)", count);
    }

    /// Re-reads the configuration file. On error the current snapshot stays.
    pub async fn reload<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let config = AppConfig::load_from_file(path)?;
        self.replace(config.controller_configs()).await;
        Ok(())
    }

    pub async fn snapshot(&self) -> Snapshot {
        Arc::clone(&*self.snapshot.read().await)
    }

    pub async fn get(&self, name: &str) -> Option<ControllerConfig> {
        self.snapshot().await.get(name).cloned()
    }

    pub async fn list(&self) -> Vec<CameraSummary> {
        let snapshot = self.snapshot().await;
        let mut cameras: Vec<CameraSummary> = snapshot
            .iter()
            .map(|(name, config)| CameraSummary {
                name: name.clone(),
                protocol: config.protocol.to_string(),
                host: config.host.clone(),
                port: config.port,
            })
            .collect();
        cameras.sort_by(|a, b| a.name.cmp(&b.name));
        cameras
    }

    /// Builds and connects a fresh controller for `name`. Nothing is cached:
    /// each logical operation gets its own connection.
    pub async fn controller(&self, name: &str) -> Result<Box<dyn PtzController>> {
        let config = self
            .get(name)
            .await
            .ok_or_else(|| PtzError::Config(format!("PTZ not configured for camera: {}", name)))?;

        let mut controller = new_controller(&config)?;
        controller.connect().await?;
        Ok(controller)
    }
}

impl Clone for CameraRegistry {
    fn clone(&self) -> Self {
        Self {
            snapshot: Arc::clone(&self.snapshot),
        }
    }
}

impl Default for CameraRegistry {
    fn default() -> Self {
        Self::new()
    }
}
