pub mod units;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{PtzError, Result};
use crate::isapi::IsapiController;
use crate::onvif::OnvifController;

pub const DEFAULT_PORT: u16 = 80;

/// Motion and speed arguments use the caller scale [-100, 100]; values
/// outside it are clamped.
#[async_trait]
pub trait PtzController: Send + Sync {
    async fn connect(&mut self) -> Result<()>;

    async fn move_ptz(&mut self, pan: i32, tilt: i32, zoom: i32) -> Result<()>;

    async fn relative_move(&mut self, pan: i32, tilt: i32, zoom: i32) -> Result<()>;

    async fn stop(&mut self) -> Result<()>;

    async fn get_status(&mut self) -> Result<Status>;

    async fn get_presets(&mut self) -> Result<Vec<Preset>>;

    async fn goto_preset(&mut self, preset_id: i32) -> Result<()>;

    async fn set_preset(&mut self, preset_id: i32, name: &str) -> Result<()>;

    async fn delete_preset(&mut self, preset_id: i32) -> Result<()>;

    async fn focus(&mut self, speed: i32) -> Result<()>;

    async fn iris(&mut self, speed: i32) -> Result<()>;

    async fn get_image_settings(&mut self) -> Result<ImageSettings>;
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Status {
    pub pan: f64,
    pub tilt: f64,
    pub zoom: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preset {
    pub id: i32,
    pub name: String,
}

/// Range convention 0..=100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSettings {
    pub brightness: i32,
    pub contrast: i32,
    pub saturation: i32,
    pub sharpness: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    Onvif,
    Isapi,
}

impl Protocol {
    pub fn from_scheme(scheme: &str) -> Option<Self> {
        match scheme.trim().to_ascii_lowercase().as_str() {
            "onvif" | "ptz" | "device-soap" => Some(Protocol::Onvif),
            "isapi" | "hikvision" | "device-restxml" => Some(Protocol::Isapi),
            _ => None,
        }
    }

    // Unknown names select ONVIF so older configurations keep working.
    pub fn from_token(token: &str) -> Self {
        Self::from_scheme(token).unwrap_or_else(|| {
            tracing::warn!("Unknown PTZ protocol {:?}, falling back to onvif", token);
            Protocol::Onvif
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Onvif => "onvif",
            Protocol::Isapi => "isapi",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ControllerConfig {
    pub protocol: Protocol,
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

impl ControllerConfig {
    pub fn host_port(&self) -> String {
        let port = if self.port == 0 { DEFAULT_PORT } else { self.port };
        if self.host.contains(':') && !self.host.starts_with('[') {
            // IPv6 literal
            format!("[{}]:{}", self.host, port)
        } else {
            format!("{}:{}", self.host, port)
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.host_port())
    }
}

/// The returned controller is not connected yet.
pub fn new_controller(config: &ControllerConfig) -> Result<Box<dyn PtzController>> {
    if config.host.trim().is_empty() {
        return Err(PtzError::Config("camera host is empty".to_string()));
    }

    tracing::debug!("Creating {} controller for {}", config.protocol, config.host_port());

    Ok(match config.protocol {
        Protocol::Onvif => Box::new(OnvifController::new(config)?),
        Protocol::Isapi => Box::new(IsapiController::new(config)?),
    })
}
