use reqwest::{Client, StatusCode};

use crate::error::{PtzError, Result};
use crate::onvif::auth::WsSecurityAuth;
use crate::onvif::soap;
use crate::ptz::ControllerConfig;
use crate::xml::Element;

/// SOAP transport bound to one device. Relies on the HTTP client's default
/// timeout; continuous motion is bounded device-side instead.
#[derive(Clone)]
pub struct SoapClient {
    base_url: String,
    http_client: Client,
    auth: WsSecurityAuth,
}

impl SoapClient {
    pub fn new(config: &ControllerConfig) -> Result<Self> {
        let auth = WsSecurityAuth::new(config.username.clone(), config.password.clone());
        let http_client = Client::builder()
            .build()
            .map_err(|e| PtzError::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: config.base_url(),
            http_client,
            auth,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Posts `soap_body` to `service_path` and returns the response payload.
    pub async fn call(&self, service_path: &str, action: &str, soap_body: &str) -> Result<Element> {
        let url = format!("{}{}", self.base_url, service_path);
        let soap_request = soap::envelope(&self.auth.generate_header(), soap_body);

        tracing::trace!("Sending SOAP {} to {}: {}", action, url, soap_request);

        let response = self
            .http_client
            .post(&url)
            .header("Content-Type", "application/soap+xml; charset=utf-8")
            .body(soap_request)
            .send()
            .await
            .map_err(|e| PtzError::Connection(format!("{} request to {} failed: {}", action, url, e)))?;

        let status = response.status();
        let response_text = response.text().await?;

        tracing::trace!("Received SOAP response for {}: {}", action, response_text);

        if status != StatusCode::OK {
            tracing::warn!("Camera returned error status {} for {}", status, action);
            return Err(PtzError::status(action, status, &response_text));
        }

        soap::response_payload(&response_text)
    }
}
