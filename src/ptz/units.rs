//! Translation between the caller-facing [-100, 100] scale and each
//! protocol's native representation.

use crate::ptz::Status;

pub const CALLER_MIN: i32 = -100;
pub const CALLER_MAX: i32 = 100;

/// Approximate angle/percentage scaling applied to ONVIF generic-space
/// positions. These are heuristics and vary between vendors.
pub const ONVIF_PAN_SCALE: f64 = 1800.0;
pub const ONVIF_TILT_SCALE: f64 = 900.0;
pub const ONVIF_ZOOM_SCALE: f64 = 100.0;

pub fn clamp(value: i32) -> i32 {
    if !(CALLER_MIN..=CALLER_MAX).contains(&value) {
        tracing::warn!("PTZ value {} out of range, clamping to [{}, {}]", value, CALLER_MIN, CALLER_MAX);
    }
    value.clamp(CALLER_MIN, CALLER_MAX)
}

/// Caller units to the ONVIF [-1.0, 1.0] velocity/translation range.
pub fn to_onvif(value: i32) -> f64 {
    f64::from(clamp(value)) / 100.0
}

/// ONVIF [-1.0, 1.0] back to caller units.
pub fn from_onvif(value: f64) -> i32 {
    ((value * 100.0).round() as i32).clamp(CALLER_MIN, CALLER_MAX)
}

/// ISAPI takes caller units natively; only the range is enforced.
pub fn to_isapi(value: i32) -> i32 {
    clamp(value)
}

pub fn onvif_position_to_status(pan: f64, tilt: f64, zoom: f64) -> Status {
    Status {
        pan: pan * ONVIF_PAN_SCALE,
        tilt: tilt * ONVIF_TILT_SCALE,
        zoom: zoom * ONVIF_ZOOM_SCALE,
    }
}
