use thiserror::Error;

/// Failures surfaced by every controller operation.
///
/// Messages carry the device's diagnostic text verbatim so the calling layer
/// can translate them into its own transport-facing representation.
#[derive(Error, Debug)]
pub enum PtzError {
    /// Malformed endpoint descriptor or missing configuration fields.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Device unreachable, discovery probe failed, or no usable profile.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The device rejected the Digest credentials a second time.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Unexpected status code or an unparsable response body.
    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Unsupported operation: {0}")]
    Unsupported(String),
}

impl PtzError {
    /// Non-200 reply, with the response body attached as diagnostic text.
    pub fn status(context: &str, status: reqwest::StatusCode, body: &str) -> Self {
        PtzError::Protocol(format!(
            "{} failed with status {}: {}",
            context,
            status.as_u16(),
            body
        ))
    }
}

impl From<reqwest::Error> for PtzError {
    fn from(err: reqwest::Error) -> Self {
        PtzError::Connection(err.to_string())
    }
}

impl From<quick_xml::Error> for PtzError {
    fn from(err: quick_xml::Error) -> Self {
        PtzError::Protocol(format!("XML parsing error: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, PtzError>;
