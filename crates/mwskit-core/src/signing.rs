//! HMAC-SHA256 request signing (signature version 2).
//!
//! The string to sign is four lines:
//!
//! ```text
//! METHOD
//! HOST
//! PATH
//! SORTED_ENCODED_QUERY
//! ```
//!
//! Keys and values are percent-encoded per RFC 3986 (space becomes `%20`,
//! only `A-Z a-z 0-9 - _ . ~` are left untouched). The digest is base64 encoded
//! with the standard padded alphabet.

use std::fmt::{Debug, Formatter};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::http_client::HttpMethod;
use crate::request::RequestParameters;

type HmacSha256 = Hmac<Sha256>;

pub const SIGNATURE_METHOD: &str = "HmacSHA256";
pub const SIGNATURE_VERSION: &str = "2";
pub const SIGNATURE_KEY: &str = "Signature";

/// Access key pair used to authenticate every request.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    access_key_id: String,
    secret: String,
}

impl Credentials {
    pub fn new(access_key_id: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret: secret.into(),
        }
    }

    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// Percent-encodes one key or value.
pub fn encode_component(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Joins pairs as `k=v&k=v` in the given order using [`encode_component`].
pub fn encode_query(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| format!("{}={}", encode_component(key), encode_component(value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Sorted, encoded query string. `Signature` is never part of its own input.
pub fn canonical_query(parameters: &RequestParameters) -> String {
    parameters
        .iter()
        .filter(|(key, _)| *key != SIGNATURE_KEY)
        .map(|(key, value)| format!("{}={}", encode_component(key), encode_component(value)))
        .collect::<Vec<_>>()
        .join("&")
}

pub fn string_to_sign(
    method: HttpMethod,
    host: &str,
    path: &str,
    parameters: &RequestParameters,
) -> String {
    format!(
        "{}\n{}\n{}\n{}",
        method.as_str(),
        host,
        path,
        canonical_query(parameters)
    )
}

/// Computes the base64 signature for a request.
///
/// Ordering of `parameters` is irrelevant: the canonical form is always sorted.
pub fn sign(
    method: HttpMethod,
    host: &str,
    path: &str,
    parameters: &RequestParameters,
    secret: &str,
) -> String {
    let payload = string_to_sign(method, host, path, parameters);
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(payload.as_bytes());
    BASE64.encode(mac.finalize().into_bytes())
}

/// Signs `parameters` and stores the result under `Signature`, replacing any
/// stale value.
pub fn sign_parameters(
    method: HttpMethod,
    host: &str,
    path: &str,
    parameters: &mut RequestParameters,
    secret: &str,
) -> String {
    let signature = sign(method, host, path, parameters, secret);
    parameters.set(SIGNATURE_KEY, signature.clone());
    signature
}
