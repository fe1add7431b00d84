use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::endpoint::parse_endpoint;
use crate::error::{PtzError, Result};
use crate::ptz::{ControllerConfig, Protocol, DEFAULT_PORT};

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub cameras: Vec<CameraEntry>,
}

/// One camera, described either by a `ptz_source` endpoint descriptor or by
/// structured fields. The descriptor wins when both are present.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct CameraEntry {
    pub name: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub ptz_source: Option<String>,
    #[serde(default)]
    pub protocol: Option<String>,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

fn default_enabled() -> bool {
    true
}

impl AppConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            PtzError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;

        Self::from_yaml(&contents)
    }

    pub fn from_yaml(contents: &str) -> Result<Self> {
        serde_yaml::from_str(contents)
            .map_err(|e| PtzError::Config(format!("failed to parse YAML configuration: {}", e)))
    }

    /// Controller configs for every enabled camera. Entries that cannot be
    /// turned into a config are skipped with a warning.
    pub fn controller_configs(&self) -> HashMap<String, ControllerConfig> {
        let mut configs = HashMap::new();

        for camera in self.cameras.iter().filter(|c| c.enabled) {
            match camera.controller_config() {
                Ok(config) => {
                    if configs.insert(camera.name.clone(), config).is_some() {
                        tracing::warn!("Duplicate PTZ camera {}, keeping the last entry", camera.name);
                    }
                }
                Err(e) => tracing::warn!("Skipping PTZ camera {}: {}", camera.name, e),
            }
        }

        configs
    }
}

impl CameraEntry {
    pub fn controller_config(&self) -> Result<ControllerConfig> {
        if let Some(source) = self.ptz_source.as_deref() {
            return Ok(parse_endpoint(source)?);
        }

        let host = self
            .host
            .as_deref()
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .ok_or_else(|| PtzError::Config("either ptz_source or host is required".to_string()))?;

        Ok(ControllerConfig {
            protocol: Protocol::from_token(self.protocol.as_deref().unwrap_or("onvif")),
            host: host.to_string(),
            port: self.port.unwrap_or(DEFAULT_PORT),
            username: self.username.clone().unwrap_or_default(),
            password: self.password.clone().unwrap_or_default(),
        })
    }
}
