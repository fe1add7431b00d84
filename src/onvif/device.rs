use reqwest::Url;

use crate::error::{PtzError, Result};
use crate::onvif::types::{DeviceInformation, ServiceEndpoints};
use crate::xml::Element;

pub const GET_DEVICE_INFORMATION: &str = "<tds:GetDeviceInformation/>";
pub const GET_CAPABILITIES: &str =
    "<tds:GetCapabilities><tds:Category>All</tds:Category></tds:GetCapabilities>";

pub fn parse_device_information(payload: &Element) -> Result<DeviceInformation> {
    if payload.name != "GetDeviceInformationResponse" {
        return Err(PtzError::Protocol(format!(
            "unexpected device information response <{}>",
            payload.name
        )));
    }

    let field = |name: &str| payload.child_text(name).unwrap_or_default().to_string();

    Ok(DeviceInformation {
        manufacturer: field("Manufacturer"),
        model: field("Model"),
        firmware_version: field("FirmwareVersion"),
        serial_number: field("SerialNumber"),
        hardware_id: field("HardwareId"),
    })
}

/// Extracts the Media and PTZ service paths from a GetCapabilities response.
///
/// Only the path of each XAddr is kept: devices behind NAT often advertise
/// an address the caller cannot reach, so host and port stay as configured.
pub fn parse_service_endpoints(payload: &Element) -> ServiceEndpoints {
    let mut endpoints = ServiceEndpoints::default();
    let Some(capabilities) = payload.find("Capabilities") else {
        tracing::warn!("GetCapabilities response has no Capabilities, using default service paths");
        return endpoints;
    };

    if let Some(path) = xaddr_path(capabilities, "Media") {
        endpoints.media = path;
    }

    match xaddr_path(capabilities, "PTZ") {
        Some(path) => endpoints.ptz = path,
        None => tracing::warn!("Device does not advertise a PTZ service, trying {}", endpoints.ptz),
    }

    endpoints
}

fn xaddr_path(capabilities: &Element, service: &str) -> Option<String> {
    let xaddr = capabilities.child(service)?.child_text("XAddr")?;
    let url = Url::parse(xaddr.trim()).ok()?;
    match url.path() {
        "" | "/" => None,
        path => Some(path.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::onvif::soap::response_payload;

    #[test]
    fn test_parse_device_information() {
        let xml = r#"<env:Envelope xmlns:env="http://www.w3.org/2003/05/soap-envelope" xmlns:tds="http://www.onvif.org/ver10/device/wsdl">
  <env:Body>
    <tds:GetDeviceInformationResponse>
      <tds:Manufacturer>HIKVISION</tds:Manufacturer>
      <tds:Model>DS-2DE4425IW-DE</tds:Model>
      <tds:FirmwareVersion>V5.6.15</tds:FirmwareVersion>
      <tds:SerialNumber>DS-2DE4425IW-DE20200101</tds:SerialNumber>
      <tds:HardwareId>88</tds:HardwareId>
    </tds:GetDeviceInformationResponse>
  </env:Body>
</env:Envelope>"#;

        let info = parse_device_information(&response_payload(xml).unwrap()).unwrap();
        assert_eq!(info.manufacturer, "HIKVISION");
        assert_eq!(info.model, "DS-2DE4425IW-DE");
        assert_eq!(info.hardware_id, "88");
    }

    #[test]
    fn test_parse_service_endpoints() {
        let xml = r#"<env:Envelope xmlns:env="http://www.w3.org/2003/05/soap-envelope" xmlns:tds="http://www.onvif.org/ver10/device/wsdl" xmlns:tt="http://www.onvif.org/ver10/schema">
  <env:Body>
    <tds:GetCapabilitiesResponse>
      <tds:Capabilities>
        <tt:Device><tt:XAddr>http://192.168.1.64/onvif/device_service</tt:XAddr></tt:Device>
        <tt:Media><tt:XAddr>http://192.168.1.64/onvif/Media</tt:XAddr></tt:Media>
        <tt:PTZ><tt:XAddr>http://192.168.1.64/onvif/PTZ</tt:XAddr></tt:PTZ>
      </tds:Capabilities>
    </tds:GetCapabilitiesResponse>
  </env:Body>
</env:Envelope>"#;

        let endpoints = parse_service_endpoints(&response_payload(xml).unwrap());
        assert_eq!(endpoints.media, "/onvif/Media");
        assert_eq!(endpoints.ptz, "/onvif/PTZ");
    }

    #[test]
    fn test_missing_capabilities_use_defaults() {
        let payload = Element {
            name: "GetCapabilitiesResponse".to_string(),
            ..Default::default()
        };
        assert_eq!(parse_service_endpoints(&payload), ServiceEndpoints::default());
    }
}
