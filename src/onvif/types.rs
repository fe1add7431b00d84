use serde::{Deserialize, Serialize};

pub const DEVICE_SERVICE_PATH: &str = "/onvif/device_service";
pub const MEDIA_SERVICE_PATH: &str = "/onvif/media_service";
pub const PTZ_SERVICE_PATH: &str = "/onvif/ptz_service";

/// Pan/tilt and zoom generic translation spaces. Many firmwares ignore a
/// RelativeMove whose vectors carry no space attribute.
pub const PAN_TILT_TRANSLATION_SPACE: &str =
    "http://www.onvif.org/ver10/tptz/PanTiltSpaces/TranslationGenericSpace";
pub const ZOOM_TRANSLATION_SPACE: &str =
    "http://www.onvif.org/ver10/tptz/ZoomSpaces/TranslationGenericSpace";

/// Device-side bound for ContinuousMove (xs:duration).
pub const CONTINUOUS_MOVE_TIMEOUT: &str = "PT60S";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceInformation {
    pub manufacturer: String,
    pub model: String,
    pub firmware_version: String,
    pub serial_number: String,
    pub hardware_id: String,
}

/// Service paths on the device, relative to its base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceEndpoints {
    pub media: String,
    pub ptz: String,
}

impl Default for ServiceEndpoints {
    fn default() -> Self {
        Self {
            media: MEDIA_SERVICE_PATH.to_string(),
            ptz: PTZ_SERVICE_PATH.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub token: String,
    pub name: String,
    pub video_source_token: String,
}

/// Pan, tilt and zoom components in ONVIF units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PtzVector {
    pub pan: f64,
    pub tilt: f64,
    pub zoom: f64,
}
