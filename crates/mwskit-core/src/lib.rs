//! # mwskit Core
//!
//! Signed-request client core for the marketplace web service.
//!
//! ## Overview
//!
//! This crate provides the building blocks of a seller-side client:
//!
//! - **Endpoint registry** mapping operation names to path, version and batch limits
//! - **Canonical request builder** that merges identity and protocol parameters
//! - **HMAC-SHA256 signer** (signature version 2)
//! - **Markup transcoder** between response documents and [`StructuredValue`]
//! - **Tabular codecs** for flat-file feeds and tab-delimited reports
//! - **Pagination adapter** that folds first and by-next-token calls into one shape
//! - **Feed orchestrator** and a report-polling state machine
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | `MwsClient`: sign, send, decode |
//! | [`config`] | Client configuration and environment loading |
//! | [`endpoint`] | Static endpoint registry |
//! | [`error`] | Error taxonomy |
//! | [`feed`] | Feed envelope, builders and submission states |
//! | [`http_client`] | Transport abstraction (reqwest and replay) |
//! | [`marketplace`] | Marketplace id to regional host routing |
//! | [`markup`] | XML decode, encode and namespace rewrite |
//! | [`operations`] | Typed remote operations |
//! | [`pagination`] | Continuation-token listings |
//! | [`report`] | Report request status and outcomes |
//! | [`request`] | Parameter sets and signed requests |
//! | [`response`] | Response classification and service errors |
//! | [`signing`] | Canonical string and signature |
//! | [`tabular`] | Flat-file feed and report codecs |
//! | [`timestamp`] | Wire timestamps |
//! | [`value`] | `StructuredValue` tree |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use mwskit_core::{ClientConfig, MwsClient, OrderQuery, Timestamp};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::from_env()?;
//!     let client = MwsClient::new(config);
//!
//!     let query = OrderQuery::new(Timestamp::parse("2024-05-01T00:00:00Z")?);
//!     for order in client.list_all_orders(&query).await? {
//!         println!("{:?}", order.path_str("AmazonOrderId"));
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  CLI / Caller   │
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │   Operations    │────▶│ Pagination /     │
//! │ (impl MwsClient)│     │ Feed / Report    │
//! └────────┬────────┘     └──────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ Request builder │────▶│ Signer           │
//! │ + Endpoint reg. │     │ (HMAC-SHA256)    │
//! └────────┬────────┘     └──────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ HTTP Client     │────▶│ Response decode  │
//! │ (reqwest/replay)│     │ (markup/tabular) │
//! └─────────────────┘     └──────────────────┘
//! ```
//!
//! ## Error Handling
//!
//! Every operation returns [`MwsError`]; match on its kind:
//!
//! ```rust
//! use mwskit_core::{MwsError, MwsErrorKind};
//!
//! fn handle_error(error: MwsError) {
//!     match error.kind() {
//!         MwsErrorKind::Service => {
//!             // Remote rejection; message and request id are in `as_service()`
//!         }
//!         MwsErrorKind::Validation => {
//!             // Nothing was sent
//!         }
//!         _ => {}
//!     }
//! }
//! ```
//!
//! ## Security
//!
//! - The secret key is redacted from `Debug` output and never logged
//! - Signatures and secrets are excluded from tracing events

pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod feed;
pub mod http_client;
pub mod marketplace;
pub mod markup;
pub mod operations;
pub mod pagination;
pub mod report;
pub mod request;
pub mod response;
pub mod signing;
pub mod tabular;
pub mod timestamp;
pub mod value;

// Client and configuration
pub use client::MwsClient;
pub use config::ClientConfig;
pub use marketplace::MarketplaceId;

// Endpoints
pub use endpoint::EndpointDescriptor;

// Error types
pub use error::{ConfigError, DecodeError, MwsError, MwsErrorKind, ServiceError, ValidationError};

// Feeds
pub use feed::{
    FeedContent, FeedEnvelope, FeedMessage, FeedOutcome, FeedState, FeedSubmissionInfo,
    OperationType, SubmitFeedRequest,
};

// HTTP client types
pub use http_client::{
    HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse, ReplayHttpClient,
    ReqwestHttpClient,
};

// Operations
pub use operations::{
    CompetitivePrice, FinancialEventsQuery, MarketplaceParticipations, MatchingProducts, MyPrice,
    OrderQuery,
};

// Pagination
pub use pagination::{Listing, PaginatedResult};

// Reports
pub use report::{
    ReportContent, ReportOutcome, ReportProcessingStatus, ReportRequest, ReportRequestInfo,
};

// Requests and signing
pub use request::{RequestParameters, SignedRequest};
pub use response::Decoded;
pub use signing::Credentials;

// Codecs and values
pub use tabular::{FlatFileFeed, TabularRecord, TemplateHeader};
pub use timestamp::Timestamp;
pub use value::StructuredValue;
