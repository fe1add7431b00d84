use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, WWW_AUTHENTICATE};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};

use crate::digest::DigestChallenge;
use crate::error::{PtzError, Result};
use crate::ptz::ControllerConfig;

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Basic credentials first, then one Digest retry; a second `401` is final.
#[derive(Clone)]
pub struct IsapiClient {
    base_url: String,
    username: String,
    password: String,
    http_client: Client,
}

impl IsapiClient {
    pub fn new(config: &ControllerConfig) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| PtzError::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: config.base_url(),
            username: config.username.clone(),
            password: config.password.clone(),
            http_client,
        })
    }

    pub async fn get(&self, path: &str) -> Result<String> {
        self.send(Method::GET, path, None).await
    }

    pub async fn put(&self, path: &str, body: String) -> Result<String> {
        self.send(Method::PUT, path, Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<String> {
        self.send(Method::DELETE, path, None).await
    }

    async fn send(&self, method: Method, path: &str, body: Option<String>) -> Result<String> {
        let url = Url::parse(&format!("{}{}", self.base_url, path))
            .map_err(|e| PtzError::Config(format!("invalid request URL {}{}: {}", self.base_url, path, e)))?;
        let context = format!("{} {}", method, url.path());

        tracing::debug!("ISAPI request {}", context);
        if let Some(body) = &body {
            tracing::trace!("ISAPI request body: {}", body);
        }

        let response = self
            .request(&method, &url, body.clone())
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .await
            .map_err(|e| PtzError::Connection(format!("{} failed: {}", context, e)))?;

        if response.status() != StatusCode::UNAUTHORIZED {
            return Self::finish(&context, response).await;
        }

        let challenge = Self::digest_challenge(&response)?;
        let uri = match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        };
        let authorization =
            challenge.authorization(&self.username, &self.password, method.as_str(), &uri);

        tracing::debug!("Retrying {} with digest authentication (realm {:?})", context, challenge.realm);

        let response = self
            .request(&method, &url, body)
            .header(AUTHORIZATION, authorization)
            .send()
            .await
            .map_err(|e| PtzError::Connection(format!("{} failed: {}", context, e)))?;

        if response.status() == StatusCode::UNAUTHORIZED {
            let text = response.text().await.unwrap_or_default();
            return Err(PtzError::Auth(format!(
                "{} rejected digest credentials for {}: {}",
                context, self.username, text
            )));
        }

        Self::finish(&context, response).await
    }

    fn request(&self, method: &Method, url: &Url, body: Option<String>) -> RequestBuilder {
        let builder = self.http_client.request(method.clone(), url.clone());
        match body {
            Some(body) => builder.header(CONTENT_TYPE, "application/xml").body(body),
            None => builder,
        }
    }

    fn digest_challenge(response: &Response) -> Result<DigestChallenge> {
        let header = response
            .headers()
            .get_all(WWW_AUTHENTICATE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find(|value| {
                value
                    .trim_start()
                    .get(..6)
                    .is_some_and(|scheme| scheme.eq_ignore_ascii_case("digest"))
            })
            .ok_or_else(|| PtzError::Auth("no Digest WWW-Authenticate challenge".to_string()))?;

        DigestChallenge::parse(header)
    }

    async fn finish(context: &str, response: Response) -> Result<String> {
        let status = response.status();
        let text = response.text().await?;

        tracing::trace!("ISAPI response {} for {}: {}", status, context, text);

        if status != StatusCode::OK {
            return Err(PtzError::status(context, status, &text));
        }
        Ok(text)
    }
}
