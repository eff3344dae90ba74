use std::collections::BTreeMap;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use md5::{Digest, Md5};

use crate::config::ClientConfig;
use crate::endpoint::EndpointDescriptor;
use crate::error::ValidationError;
use crate::http_client::{HttpMethod, HttpRequest};
use crate::signing::{self, SIGNATURE_KEY, SIGNATURE_METHOD, SIGNATURE_VERSION};
use crate::timestamp::Timestamp;

const SUBMIT_FEED_ACTION: &str = "SubmitFeed";
const MARKETPLACE_SINGULAR: &str = "MarketplaceId";
const MARKETPLACE_LIST_PREFIXES: [&str; 2] = ["MarketplaceId.Id.", "MarketplaceIdList.Id."];
const DEFAULT_MARKETPLACE_KEY: &str = "MarketplaceId.Id.1";

/// Keys the builder owns. Callers may not supply them.
const RESERVED_KEYS: [&str; 8] = [
    "AWSAccessKeyId",
    "Action",
    "SellerId",
    "SignatureMethod",
    "SignatureVersion",
    "Timestamp",
    "Version",
    SIGNATURE_KEY,
];

/// Query parameters of one call, always kept in byte-wise key order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestParameters(BTreeMap<String, String>);

impl RequestParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut parameters = Self::new();
        for (key, value) in pairs {
            parameters.insert(key, value)?;
        }
        Ok(parameters)
    }

    /// Adds a parameter. An existing key is an error, never overwritten.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), ValidationError> {
        let key = key.into();
        if self.0.contains_key(&key) {
            return Err(ValidationError::DuplicateParameter { key });
        }
        self.0.insert(key, value.into());
        Ok(())
    }

    pub fn insert_optional(
        &mut self,
        key: impl Into<String>,
        value: Option<impl Into<String>>,
    ) -> Result<(), ValidationError> {
        match value {
            Some(value) => self.insert(key, value),
            None => Ok(()),
        }
    }

    /// Flattens a list as `<prefix>.1`, `<prefix>.2`, ...
    pub fn extend_list<I, V>(&mut self, prefix: &str, values: I) -> Result<usize, ValidationError>
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let mut count = 0;
        for (index, value) in values.into_iter().enumerate() {
            self.insert(format!("{prefix}.{}", index + 1), value)?;
            count += 1;
        }
        Ok(count)
    }

    /// Unconditional write, used only by the builder for keys it owns.
    pub(crate) fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_pairs(&self) -> Vec<(String, String)> {
        self.0
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    fn has_marketplace_list(&self) -> bool {
        self.0.keys().any(|key| {
            MARKETPLACE_LIST_PREFIXES
                .iter()
                .any(|prefix| key.starts_with(prefix))
        })
    }
}

/// Merges identity and protocol parameters into the caller's set.
pub fn build_parameters(
    endpoint: &EndpointDescriptor,
    caller: RequestParameters,
    config: &ClientConfig,
    timestamp: Timestamp,
) -> Result<RequestParameters, ValidationError> {
    if let Some(key) = RESERVED_KEYS.iter().find(|key| caller.contains_key(**key)) {
        return Err(ValidationError::DuplicateParameter {
            key: (*key).to_owned(),
        });
    }

    let singular = caller.contains_key(MARKETPLACE_SINGULAR);
    let list = caller.has_marketplace_list();
    if singular && list {
        return Err(ValidationError::ConflictingMarketplace);
    }

    let mut parameters = caller;
    parameters.set("Timestamp", timestamp.to_wire());
    parameters.set("AWSAccessKeyId", config.credentials().access_key_id());
    parameters.set("Action", endpoint.action);
    parameters.set("SellerId", config.seller_id());
    parameters.set("SignatureMethod", SIGNATURE_METHOD);
    parameters.set("SignatureVersion", SIGNATURE_VERSION);
    parameters.set("Version", endpoint.version);

    if let Some(token) = config.auth_token() {
        parameters.insert("MWSAuthToken", token)?;
    }

    if endpoint.action == SUBMIT_FEED_ACTION {
        // The feed names its own merchant and marketplace list.
        parameters.remove("SellerId");
    } else if !singular && !list {
        parameters.set(DEFAULT_MARKETPLACE_KEY, config.marketplace().as_str());
    }

    Ok(parameters)
}

/// Transport headers for a call. Feed uploads also carry the body digest and charset.
pub fn build_headers(
    endpoint: &EndpointDescriptor,
    config: &ClientConfig,
    body: Option<&[u8]>,
) -> BTreeMap<String, String> {
    let mut headers = BTreeMap::new();
    headers.insert(String::from("Accept"), String::from("application/xml"));
    headers.insert(String::from("x-amazon-user-agent"), config.user_agent());

    if endpoint.action == SUBMIT_FEED_ACTION {
        headers.insert(String::from("Content-MD5"), content_md5(body.unwrap_or_default()));
        headers.insert(
            String::from("Content-Type"),
            config.marketplace().feed_content_type().to_owned(),
        );
        headers.insert(String::from("Host"), config.marketplace().host().to_owned());
    }

    headers
}

/// Base64 of the MD5 digest of `body`.
pub fn content_md5(body: &[u8]) -> String {
    BASE64.encode(Md5::digest(body))
}

/// A request ready to hand to the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    pub operation: &'static str,
    pub method: HttpMethod,
    pub host: &'static str,
    pub path: &'static str,
    pub parameters: RequestParameters,
    pub headers: BTreeMap<String, String>,
    pub body: Option<Vec<u8>>,
}

impl SignedRequest {
    pub fn url(&self) -> String {
        format!("https://{}{}", self.host, self.path)
    }

    pub fn signature(&self) -> Option<&str> {
        self.parameters.get(SIGNATURE_KEY)
    }

    pub fn into_http_request(self, timeout_ms: u64) -> HttpRequest {
        let mut request = HttpRequest::new(self.method, self.url())
            .with_query(self.parameters.to_pairs())
            .with_timeout_ms(timeout_ms);
        for (name, value) in self.headers {
            request = request.with_header(name, value);
        }
        if let Some(body) = self.body {
            request = request.with_body(body);
        }
        request
    }
}

/// Builds, signs and attaches headers. Performs no I/O.
pub fn prepare(
    endpoint: &'static EndpointDescriptor,
    caller: RequestParameters,
    body: Option<Vec<u8>>,
    config: &ClientConfig,
    timestamp: Timestamp,
) -> Result<SignedRequest, ValidationError> {
    let host = config.marketplace().host();
    let mut parameters = build_parameters(endpoint, caller, config, timestamp)?;
    signing::sign_parameters(
        endpoint.method,
        host,
        endpoint.path,
        &mut parameters,
        config.credentials().secret(),
    );
    let headers = build_headers(endpoint, config, body.as_deref());

    Ok(SignedRequest {
        operation: endpoint.operation,
        method: endpoint.method,
        host,
        path: endpoint.path,
        parameters,
        headers,
        body,
    })
}
