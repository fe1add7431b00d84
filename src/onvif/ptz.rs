//! PTZ service request bodies and response parsing.

use crate::error::{PtzError, Result};
use crate::onvif::types::{
    PtzVector, CONTINUOUS_MOVE_TIMEOUT, PAN_TILT_TRANSLATION_SPACE, ZOOM_TRANSLATION_SPACE,
};
use crate::ptz::Preset;
use crate::xml::{escape, Element};

pub fn continuous_move(profile_token: &str, velocity: PtzVector) -> String {
    format!(
        r#"<tptz:ContinuousMove>
  <tptz:ProfileToken>{}</tptz:ProfileToken>
  <tptz:Velocity>
    <tt:PanTilt x="{}" y="{}"/>
    <tt:Zoom x="{}"/>
  </tptz:Velocity>
  <tptz:Timeout>{}</tptz:Timeout>
</tptz:ContinuousMove>"#,
        escape(profile_token),
        velocity.pan,
        velocity.tilt,
        velocity.zoom,
        CONTINUOUS_MOVE_TIMEOUT
    )
}

pub fn relative_move(profile_token: &str, translation: PtzVector) -> String {
    format!(
        r#"<tptz:RelativeMove>
  <tptz:ProfileToken>{}</tptz:ProfileToken>
  <tptz:Translation>
    <tt:PanTilt x="{}" y="{}" space="{}"/>
    <tt:Zoom x="{}" space="{}"/>
  </tptz:Translation>
</tptz:RelativeMove>"#,
        escape(profile_token),
        translation.pan,
        translation.tilt,
        PAN_TILT_TRANSLATION_SPACE,
        translation.zoom,
        ZOOM_TRANSLATION_SPACE
    )
}

pub fn stop(profile_token: &str) -> String {
    format!(
        r#"<tptz:Stop>
  <tptz:ProfileToken>{}</tptz:ProfileToken>
  <tptz:PanTilt>true</tptz:PanTilt>
  <tptz:Zoom>true</tptz:Zoom>
</tptz:Stop>"#,
        escape(profile_token)
    )
}

pub fn get_status(profile_token: &str) -> String {
    format!(
        "<tptz:GetStatus><tptz:ProfileToken>{}</tptz:ProfileToken></tptz:GetStatus>",
        escape(profile_token)
    )
}

pub fn get_presets(profile_token: &str) -> String {
    format!(
        "<tptz:GetPresets><tptz:ProfileToken>{}</tptz:ProfileToken></tptz:GetPresets>",
        escape(profile_token)
    )
}

pub fn goto_preset(profile_token: &str, preset_token: &str) -> String {
    format!(
        "<tptz:GotoPreset><tptz:ProfileToken>{}</tptz:ProfileToken><tptz:PresetToken>{}</tptz:PresetToken></tptz:GotoPreset>",
        escape(profile_token),
        escape(preset_token)
    )
}

pub fn set_preset(profile_token: &str, preset_token: &str, preset_name: &str) -> String {
    format!(
        "<tptz:SetPreset><tptz:ProfileToken>{}</tptz:ProfileToken><tptz:PresetName>{}</tptz:PresetName><tptz:PresetToken>{}</tptz:PresetToken></tptz:SetPreset>",
        escape(profile_token),
        escape(preset_name),
        escape(preset_token)
    )
}

pub fn remove_preset(profile_token: &str, preset_token: &str) -> String {
    format!(
        "<tptz:RemovePreset><tptz:ProfileToken>{}</tptz:ProfileToken><tptz:PresetToken>{}</tptz:PresetToken></tptz:RemovePreset>",
        escape(profile_token),
        escape(preset_token)
    )
}

/// Reads PTZStatus/Position. Absent axes read as 0.
pub fn parse_position(payload: &Element) -> Result<PtzVector> {
    let status = payload
        .find("PTZStatus")
        .ok_or_else(|| PtzError::Protocol(format!("<{}> has no PTZStatus", payload.name)))?;

    let mut position = PtzVector::default();
    let Some(pos) = status.child("Position") else {
        return Ok(position);
    };

    if let Some(pan_tilt) = pos.child("PanTilt") {
        position.pan = float_attr(pan_tilt, "x")?;
        position.tilt = float_attr(pan_tilt, "y")?;
    }
    if let Some(zoom) = pos.child("Zoom") {
        position.zoom = float_attr(zoom, "x")?;
    }

    Ok(position)
}

fn float_attr(element: &Element, name: &str) -> Result<f64> {
    match element.attr(name) {
        None => Ok(0.0),
        Some(value) => value.trim().parse().map_err(|_| {
            PtzError::Protocol(format!("invalid {}@{} value {:?}", element.name, name, value))
        }),
    }
}

/// Preset tokens are opaque; numeric tokens become the preset id, anything
/// else gets a sequential id that is not guaranteed to be stable.
pub fn parse_presets(payload: &Element) -> Vec<Preset> {
    let mut presets: Vec<Preset> = Vec::new();

    for preset in payload.children_named("Preset") {
        let token = preset.attr("token").unwrap_or_default().trim();
        if token.is_empty() {
            continue;
        }

        let id = match token.parse::<i32>() {
            Ok(id) if id != 0 => id,
            _ => {
                let id = presets.len() as i32 + 1;
                tracing::warn!("Preset token {:?} is not numeric, assigning id {}", token, id);
                id
            }
        };

        presets.push(Preset {
            id,
            name: preset.child_text("Name").unwrap_or_default().to_string(),
        });
    }

    presets
}
