//! HTTP Digest authentication (RFC 2617, MD5).
//!
//! A challenge is parsed from a single `401` response and consumed by exactly
//! one retried request, so the nonce count is always `00000001`.

use uuid::Uuid;

use crate::error::{PtzError, Result};

const NONCE_COUNT: &str = "00000001";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DigestChallenge {
    pub realm: String,
    pub nonce: String,
    pub qop: Option<String>,
    pub opaque: Option<String>,
    pub algorithm: Option<String>,
}

impl DigestChallenge {
    /// Parses the value of a `WWW-Authenticate: Digest ...` header.
    pub fn parse(header: &str) -> Result<Self> {
        let header = header.trim();
        let params = match header.split_once(char::is_whitespace) {
            Some((scheme, rest)) if scheme.eq_ignore_ascii_case("Digest") => rest,
            _ => {
                return Err(PtzError::Auth(format!(
                    "unsupported authentication challenge: {}",
                    header
                )))
            }
        };

        let mut challenge = DigestChallenge::default();
        let mut has_nonce = false;

        for (key, value) in split_params(params) {
            match key.to_ascii_lowercase().as_str() {
                "realm" => challenge.realm = value,
                "nonce" => {
                    challenge.nonce = value;
                    has_nonce = true;
                }
                "qop" => challenge.qop = Some(value),
                "opaque" => challenge.opaque = Some(value),
                "algorithm" => challenge.algorithm = Some(value),
                _ => {}
            }
        }

        if !has_nonce {
            return Err(PtzError::Auth("digest challenge without nonce".to_string()));
        }

        Ok(challenge)
    }

    /// `auth` when the server offers it (possibly among other qop values).
    fn qop_auth(&self) -> Option<&'static str> {
        self.qop
            .as_deref()
            .filter(|qop| qop.split(',').any(|q| q.trim() == "auth"))
            .map(|_| "auth")
    }

    /// Computes the `response` field of the credentials.
    ///
    /// `nc` and `cnonce` only contribute when the challenge offers `qop=auth`.
    pub fn response(
        &self,
        username: &str,
        password: &str,
        method: &str,
        uri: &str,
        nc: &str,
        cnonce: &str,
    ) -> String {
        let ha1 = md5_hex(&format!("{}:{}:{}", username, self.realm, password));
        let ha2 = md5_hex(&format!("{}:{}", method, uri));

        match self.qop_auth() {
            Some(qop) => md5_hex(&format!(
                "{}:{}:{}:{}:{}:{}",
                ha1, self.nonce, nc, cnonce, qop, ha2
            )),
            None => md5_hex(&format!("{}:{}:{}", ha1, self.nonce, ha2)),
        }
    }

    /// Builds an `Authorization` header value with a fresh client nonce.
    pub fn authorization(&self, username: &str, password: &str, method: &str, uri: &str) -> String {
        let cnonce = Uuid::new_v4().simple().to_string();
        self.authorization_with_cnonce(username, password, method, uri, &cnonce)
    }

    pub fn authorization_with_cnonce(
        &self,
        username: &str,
        password: &str,
        method: &str,
        uri: &str,
        cnonce: &str,
    ) -> String {
        let response = self.response(username, password, method, uri, NONCE_COUNT, cnonce);

        let mut header = format!(
            r#"Digest username="{}", realm="{}", nonce="{}", uri="{}""#,
            username, self.realm, self.nonce, uri
        );

        if let Some(algorithm) = &self.algorithm {
            header.push_str(&format!(", algorithm={}", algorithm));
        }

        if let Some(qop) = self.qop_auth() {
            header.push_str(&format!(
                r#", qop={}, nc={}, cnonce="{}""#,
                qop, NONCE_COUNT, cnonce
            ));
        }

        header.push_str(&format!(r#", response="{}""#, response));

        if let Some(opaque) = &self.opaque {
            header.push_str(&format!(r#", opaque="{}""#, opaque));
        }

        header
    }
}

pub fn md5_hex(text: &str) -> String {
    format!("{:x}", md5::compute(text.as_bytes()))
}

/// Splits `key=value, key="quoted, value"` pairs, honoring quotes.
fn split_params(params: &str) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    let mut rest = params.trim();

    while !rest.is_empty() {
        let Some(eq) = rest.find('=') else {
            break;
        };
        let key = rest[..eq].trim().trim_start_matches(',').trim().to_string();
        rest = rest[eq + 1..].trim_start();

        let value;
        if let Some(quoted) = rest.strip_prefix('"') {
            match quoted.find('"') {
                Some(end) => {
                    value = quoted[..end].to_string();
                    rest = &quoted[end + 1..];
                }
                None => {
                    value = quoted.to_string();
                    rest = "";
                }
            }
        } else {
            let end = rest.find(',').unwrap_or(rest.len());
            value = rest[..end].trim().to_string();
            rest = &rest[end..];
        }

        pairs.push((key, value));
        rest = rest.trim_start().trim_start_matches(',').trim_start();
    }

    pairs
}
