//! Pan-tilt-zoom camera control over ONVIF (SOAP) and Hikvision ISAPI
//! (XML over HTTP with Digest authentication) behind one capability trait.

pub mod camera;
pub mod config;
pub mod digest;
pub mod endpoint;
pub mod error;
pub mod isapi;
pub mod onvif;
pub mod ptz;
pub mod xml;

pub use endpoint::parse_endpoint;
pub use error::{PtzError, Result};
pub use ptz::{
    new_controller, ControllerConfig, ImageSettings, Preset, Protocol, PtzController, Status,
};
