//! ISAPI request bodies and response parsing.

use crate::error::{PtzError, Result};
use crate::ptz::{ImageSettings, Preset, Status};
use crate::xml::{escape, Element};

pub const CHANNEL_PATH: &str = "/ISAPI/PTZCtrl/channels/1";
pub const IMAGE_CHANNEL_PATH: &str = "/ISAPI/Image/channels/1";

pub fn momentary_path() -> String {
    format!("{}/momentary", CHANNEL_PATH)
}

pub fn continuous_path() -> String {
    format!("{}/continuous", CHANNEL_PATH)
}

pub fn status_path() -> String {
    format!("{}/status", CHANNEL_PATH)
}

pub fn presets_path() -> String {
    format!("{}/presets", CHANNEL_PATH)
}

pub fn preset_path(preset_id: i32) -> String {
    format!("{}/presets/{}", CHANNEL_PATH, preset_id)
}

pub fn goto_preset_path(preset_id: i32) -> String {
    format!("{}/presets/{}/goto", CHANNEL_PATH, preset_id)
}

/// Lens channels driven through the continuous endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LensControl {
    Focus,
    Iris,
}

impl LensControl {
    fn element(&self) -> &'static str {
        match self {
            LensControl::Focus => "focus",
            LensControl::Iris => "iris",
        }
    }
}

pub fn momentary_body(pan: i32, tilt: i32, zoom: i32) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<PTZData>
    <pan>{}</pan>
    <tilt>{}</tilt>
    <zoom>{}</zoom>
</PTZData>"#,
        pan, tilt, zoom
    )
}

/// Speed 0 is written out explicitly; it is the stop command.
pub fn lens_body(control: LensControl, speed: i32) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<PTZData>
    <pan>0</pan>
    <tilt>0</tilt>
    <zoom>0</zoom>
    <Momentary>
        <{element}>{speed}</{element}>
    </Momentary>
</PTZData>"#,
        element = control.element(),
        speed = speed
    )
}

pub fn goto_preset_body(preset_id: i32) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<PTZData>
    <AbsoluteHigh>
        <presetID>{}</presetID>
    </AbsoluteHigh>
</PTZData>"#,
        preset_id
    )
}

pub fn preset_body(preset_id: i32, name: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<PTZPreset>
    <id>{}</id>
    <presetName>{}</presetName>
</PTZPreset>"#,
        preset_id,
        escape(name)
    )
}

/// Name sent to the device for a preset; never empty.
pub fn preset_name(preset_id: i32, name: &str) -> String {
    if name.trim().is_empty() {
        format!("Preset{}", preset_id)
    } else {
        name.to_string()
    }
}

fn int_field(element: &Element, name: &str) -> Result<i32> {
    match element.child_text(name) {
        None => Ok(0),
        Some(text) => text.trim().parse().map_err(|_| {
            PtzError::Protocol(format!("invalid <{}> value {:?}", name, text))
        }),
    }
}

fn expect_root<'a>(root: &'a Element, name: &str) -> Result<&'a Element> {
    if root.name == name {
        Ok(root)
    } else {
        Err(PtzError::Protocol(format!("expected <{}>, got <{}>", name, root.name)))
    }
}

pub fn parse_status(xml: &str) -> Result<Status> {
    let root = Element::parse(xml)?;
    let status = expect_root(&root, "PTZStatus")?;
    let position = status
        .child("AbsoluteHigh")
        .ok_or_else(|| PtzError::Protocol("PTZStatus has no AbsoluteHigh".to_string()))?;

    Ok(Status {
        pan: f64::from(int_field(position, "azimuth")?),
        tilt: f64::from(int_field(position, "elevation")?),
        zoom: f64::from(int_field(position, "absoluteZoom")?),
    })
}

/// Returns only the presets the device marks as enabled.
pub fn parse_presets(xml: &str) -> Result<Vec<Preset>> {
    let root = Element::parse(xml)?;
    let list = expect_root(&root, "PTZPresetList")?;

    let mut presets = Vec::new();
    for preset in list.children_named("PTZPreset") {
        if !preset.child_text("enabled").is_some_and(is_true) {
            continue;
        }

        presets.push(Preset {
            id: int_field(preset, "id")?,
            name: preset.child_text("presetName").unwrap_or_default().to_string(),
        });
    }

    Ok(presets)
}

// Firmwares write the flag as `true`, `True`, `t` or `1`.
fn is_true(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "t" | "true")
}

/// Levels are looked up anywhere under ImageChannel: firmwares differ on
/// whether they sit directly below it or inside Color/Sharpness groups.
pub fn parse_image_settings(xml: &str) -> Result<ImageSettings> {
    let root = Element::parse(xml)?;
    let channel = expect_root(&root, "ImageChannel")?;

    let level = |names: &[&str]| -> Result<i32> {
        let Some(element) = names.iter().find_map(|name| channel.find(name)) else {
            return Ok(0);
        };
        element.text.trim().parse().map_err(|_| {
            PtzError::Protocol(format!("invalid <{}> value {:?}", element.name, element.text))
        })
    };

    Ok(ImageSettings {
        brightness: level(&["brightnessLevel"])?,
        contrast: level(&["contrastLevel"])?,
        saturation: level(&["saturationLevel"])?,
        sharpness: level(&["sharpnessLevel", "SharpnessLevel"])?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_momentary_body() {
        let element = Element::parse(&momentary_body(30, -20, 0)).unwrap();
        assert_eq!(element.name, "PTZData");
        assert_eq!(element.child_text("pan"), Some("30"));
        assert_eq!(element.child_text("tilt"), Some("-20"));
        assert_eq!(element.child_text("zoom"), Some("0"));
    }

    #[test]
    fn test_lens_body_nests_speed() {
        let focus = Element::parse(&lens_body(LensControl::Focus, -40)).unwrap();
        assert_eq!(focus.child("Momentary").unwrap().child_text("focus"), Some("-40"));

        let stop = Element::parse(&lens_body(LensControl::Iris, 0)).unwrap();
        let momentary = stop.child("Momentary").unwrap();
        assert_eq!(momentary.child_text("iris"), Some("0"));
        assert!(momentary.child("focus").is_none());
    }

    #[test]
    fn test_preset_name_defaults() {
        assert_eq!(preset_name(5, ""), "Preset5");
        assert_eq!(preset_name(5, "  "), "Preset5");
        assert_eq!(preset_name(5, "Gate"), "Gate");
    }

    #[test]
    fn test_preset_body() {
        let element = Element::parse(&preset_body(5, &preset_name(5, ""))).unwrap();
        assert_eq!(element.child_text("id"), Some("5"));
        assert_eq!(element.child_text("presetName"), Some("Preset5"));

        let escaped = Element::parse(&preset_body(6, "A&B")).unwrap();
        assert_eq!(escaped.child_text("presetName"), Some("A&B"));
    }

    #[test]
    fn test_goto_preset_body() {
        let element = Element::parse(&goto_preset_body(3)).unwrap();
        assert_eq!(element.child("AbsoluteHigh").unwrap().child_text("presetID"), Some("3"));
    }

    #[test]
    fn test_parse_status() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<PTZStatus version="2.0" xmlns="http://www.hikvision.com/ver20/XMLSchema">
<AbsoluteHigh>
<elevation>-45</elevation>
<azimuth>1800</azimuth>
<absoluteZoom>10</absoluteZoom>
</AbsoluteHigh>
</PTZStatus>"#;

        let status = parse_status(xml).unwrap();
        assert_eq!(status, Status { pan: 1800.0, tilt: -45.0, zoom: 10.0 });
    }

    #[test]
    fn test_parse_status_rejects_other_documents() {
        assert!(matches!(
            parse_status("<ResponseStatus><statusCode>4</statusCode></ResponseStatus>"),
            Err(PtzError::Protocol(_))
        ));
        assert!(parse_status("<PTZStatus/>").is_err());
    }

    #[test]
    fn test_parse_presets_filters_disabled() {
        let xml = r#"<PTZPresetList version="2.0" xmlns="http://www.hikvision.com/ver20/XMLSchema">
<PTZPreset><enabled>true</enabled><id>1</id><presetName>Gate</presetName></PTZPreset>
<PTZPreset><enabled>false</enabled><id>2</id><presetName>Preset 2</presetName></PTZPreset>
<PTZPreset><id>3</id><presetName>Unknown</presetName></PTZPreset>
<PTZPreset><enabled>true</enabled><id>4</id><presetName>Yard</presetName></PTZPreset>
</PTZPresetList>"#;

        let presets = parse_presets(xml).unwrap();
        assert_eq!(
            presets,
            vec![
                Preset { id: 1, name: "Gate".to_string() },
                Preset { id: 4, name: "Yard".to_string() },
            ]
        );
    }

    #[test]
    fn test_parse_presets_accepts_numeric_and_short_flags() {
        let xml = r#"<PTZPresetList>
<PTZPreset><enabled>1</enabled><id>1</id><presetName>Gate</presetName></PTZPreset>
<PTZPreset><enabled>0</enabled><id>2</id><presetName>Off</presetName></PTZPreset>
<PTZPreset><enabled>True</enabled><id>3</id><presetName>Dock</presetName></PTZPreset>
<PTZPreset><enabled>t</enabled><id>5</id><presetName>Roof</presetName></PTZPreset>
</PTZPresetList>"#;

        let ids: Vec<i32> = parse_presets(xml).unwrap().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 3, 5]);
    }

    #[test]
    fn test_parse_image_settings_nested() {
        let xml = r#"<ImageChannel version="2.0" xmlns="http://www.hikvision.com/ver20/XMLSchema">
<id>1</id>
<Color><brightnessLevel>55</brightnessLevel><contrastLevel>48</contrastLevel><saturationLevel>60</saturationLevel></Color>
<Sharpness><SharpnessLevel>70</SharpnessLevel></Sharpness>
</ImageChannel>"#;

        let settings = parse_image_settings(xml).unwrap();
        assert_eq!(
            settings,
            ImageSettings { brightness: 55, contrast: 48, saturation: 60, sharpness: 70 }
        );
    }

    #[test]
    fn test_parse_image_settings_flat() {
        let xml = "<ImageChannel><brightnessLevel>1</brightnessLevel><contrastLevel>2</contrastLevel><saturationLevel>3</saturationLevel><sharpnessLevel>4</sharpnessLevel></ImageChannel>";
        let settings = parse_image_settings(xml).unwrap();
        assert_eq!(settings.sharpness, 4);
        assert_eq!(settings.brightness, 1);
    }
}
