use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::Utc;
use sha1::{Digest, Sha1};
use uuid::Uuid;

use crate::xml::escape;

/// WS-Security UsernameToken credentials attached to every SOAP request.
#[derive(Clone)]
pub struct WsSecurityAuth {
    username: String,
    password: String,
}

impl WsSecurityAuth {
    pub fn new(username: String, password: String) -> Self {
        Self { username, password }
    }

    pub fn generate_header(&self) -> String {
        let nonce = Uuid::new_v4();
        let created = Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string();
        self.header_with(nonce.as_bytes(), &created)
    }

    /// PasswordDigest = Base64(SHA1(nonce + created + password))
    fn header_with(&self, nonce: &[u8], created: &str) -> String {
        let mut hasher = Sha1::new();
        hasher.update(nonce);
        hasher.update(created.as_bytes());
        hasher.update(self.password.as_bytes());
        let password_digest = BASE64.encode(hasher.finalize());

        format!(
            r#"<wsse:Security SOAP-ENV:mustUnderstand="true">
  <wsse:UsernameToken>
    <wsse:Username>{}</wsse:Username>
    <wsse:Password Type="http://docs.oasis-open.org/wss/2004/01/oasis-200401-wss-username-token-profile-1.0#PasswordDigest">{}</wsse:Password>
    <wsse:Nonce EncodingType="http://docs.oasis-open.org/wss/2004/01/oasis-200401-wss-soap-message-security-1.0#Base64Binary">{}</wsse:Nonce>
    <wsu:Created>{}</wsu:Created>
  </wsse:UsernameToken>
</wsse:Security>"#,
            escape(&self.username),
            password_digest,
            BASE64.encode(nonce),
            created
        )
    }
}
