use crate::error::{PtzError, Result};
use crate::xml::Element;

pub const NS_SOAP_ENV: &str = "http://www.w3.org/2003/05/soap-envelope";
pub const NS_DEVICE: &str = "http://www.onvif.org/ver10/device/wsdl";
pub const NS_MEDIA: &str = "http://www.onvif.org/ver10/media/wsdl";
pub const NS_PTZ: &str = "http://www.onvif.org/ver20/ptz/wsdl";
pub const NS_SCHEMA: &str = "http://www.onvif.org/ver10/schema";
pub const NS_WSSE: &str =
    "http://docs.oasis-open.org/wss/2004/01/oasis-200401-wss-wssecurity-secext-1.0.xsd";
pub const NS_WSU: &str =
    "http://docs.oasis-open.org/wss/2004/01/oasis-200401-wss-wssecurity-utility-1.0.xsd";

/// Wraps an operation body in a SOAP 1.2 envelope with a security header.
pub fn envelope(security_header: &str, body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<SOAP-ENV:Envelope xmlns:SOAP-ENV="{soap}" xmlns:tds="{device}" xmlns:trt="{media}" xmlns:tptz="{ptz}" xmlns:tt="{schema}" xmlns:wsse="{wsse}" xmlns:wsu="{wsu}">
<SOAP-ENV:Header>
{header}
</SOAP-ENV:Header>
<SOAP-ENV:Body>
{body}
</SOAP-ENV:Body>
</SOAP-ENV:Envelope>"#,
        soap = NS_SOAP_ENV,
        device = NS_DEVICE,
        media = NS_MEDIA,
        ptz = NS_PTZ,
        schema = NS_SCHEMA,
        wsse = NS_WSSE,
        wsu = NS_WSU,
        header = security_header,
        body = body,
    )
}

/// Returns the first element inside the response `Body`.
///
/// A SOAP fault is turned into a protocol error carrying its reason text.
pub fn response_payload(xml: &str) -> Result<Element> {
    let envelope = Element::parse(xml)?;
    if envelope.name != "Envelope" {
        return Err(PtzError::Protocol(format!(
            "expected SOAP Envelope, got <{}>",
            envelope.name
        )));
    }

    let payload = envelope
        .child("Body")
        .and_then(|body| body.children.first())
        .cloned()
        .ok_or_else(|| PtzError::Protocol("SOAP Body is empty".to_string()))?;

    if payload.name == "Fault" {
        return Err(PtzError::Protocol(format!("SOAP fault: {}", fault_reason(&payload))));
    }

    Ok(payload)
}

fn fault_reason(fault: &Element) -> String {
    let reason = fault
        .find("Reason")
        .and_then(|r| r.find("Text"))
        .map(|t| t.text.clone())
        .or_else(|| fault.find("faultstring").map(|t| t.text.clone()));

    let code = fault
        .find("Subcode")
        .and_then(|s| s.child_text("Value"))
        .or_else(|| fault.find("Code").and_then(|c| c.child_text("Value")));

    match (code, reason) {
        (Some(code), Some(reason)) => format!("{} ({})", reason, code),
        (None, Some(reason)) => reason,
        (Some(code), None) => code.to_string(),
        (None, None) => "unknown fault".to_string(),
    }
}
