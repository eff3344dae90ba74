use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use tracing::debug;

use crate::config::ClientConfig;
use crate::endpoint;
use crate::error::MwsError;
use crate::http_client::{HttpClient, ReqwestHttpClient};
use crate::pagination::{Listing, PaginatedResult, NEXT_TOKEN_KEY};
use crate::request::{self, RequestParameters, SignedRequest};
use crate::response::{self, Decoded};
use crate::timestamp::Timestamp;
use crate::value::StructuredValue;

pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Signed-request client. Holds no mutable state and is cheap to clone.
#[derive(Clone)]
pub struct MwsClient {
    config: ClientConfig,
    http_client: Arc<dyn HttpClient>,
    timeout_ms: u64,
}

impl MwsClient {
    /// Client using the reqwest transport.
    pub fn new(config: ClientConfig) -> Self {
        Self::with_http_client(config, Arc::new(ReqwestHttpClient::default()))
    }

    pub fn with_http_client(config: ClientConfig, http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            config,
            http_client,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Builds and signs a request without sending it.
    pub fn prepare(
        &self,
        operation: &str,
        parameters: RequestParameters,
        body: Option<Vec<u8>>,
        timestamp: Timestamp,
    ) -> Result<SignedRequest, MwsError> {
        let endpoint = endpoint::lookup(operation)?;
        Ok(request::prepare(
            endpoint,
            parameters,
            body,
            &self.config,
            timestamp,
        )?)
    }

    /// Single entry point of every operation: sign, send, decode.
    ///
    /// Non-success statuses become [`MwsError::Service`]. Transport failures
    /// are returned unchanged.
    pub async fn execute(
        &self,
        operation: &str,
        parameters: RequestParameters,
        body: Option<Vec<u8>>,
        raw_response: bool,
    ) -> Result<Decoded, MwsError> {
        let signed = self.prepare(operation, parameters, body, Timestamp::now())?;
        debug!(
            operation = signed.operation,
            host = signed.host,
            path = signed.path,
            parameters = signed.parameters.len(),
            "dispatching signed request"
        );

        let response = self
            .http_client
            .execute(signed.into_http_request(self.timeout_ms))
            .await?;
        debug!(
            operation,
            status = response.status,
            content_type = response.content_type().unwrap_or_default(),
            bytes = response.body.len(),
            "received response"
        );

        if !response.is_success() {
            return Err(response::service_error(response.status, &response.body).into());
        }

        let content_type = response.content_type().map(str::to_owned);
        Ok(response::decode(
            content_type.as_deref(),
            response.body,
            raw_response,
        )?)
    }

    /// Runs an operation whose response must be markup.
    pub(crate) async fn execute_structured(
        &self,
        operation: &str,
        parameters: RequestParameters,
    ) -> Result<StructuredValue, MwsError> {
        Ok(self
            .execute(operation, parameters, None, false)
            .await?
            .into_structured(operation)?)
    }

    /// Fetches one page of a listing.
    pub(crate) async fn fetch_page(
        &self,
        listing: Listing,
        parameters: RequestParameters,
        continuation: bool,
    ) -> Result<PaginatedResult, MwsError> {
        let document = self
            .execute_structured(listing.operation_for(continuation), parameters)
            .await?;
        Ok(listing.normalize_page(&document, continuation)?)
    }

    /// Fetches the page following `token`.
    pub async fn next_page(&self, listing: Listing, token: &str) -> Result<PaginatedResult, MwsError> {
        let mut parameters = RequestParameters::new();
        parameters.insert(NEXT_TOKEN_KEY, token)?;
        self.fetch_page(listing, parameters, true).await
    }
}

impl Debug for MwsClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MwsClient")
            .field("config", &self.config)
            .field("timeout_ms", &self.timeout_ms)
            .finish_non_exhaustive()
    }
}
