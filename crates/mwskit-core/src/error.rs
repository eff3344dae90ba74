use std::fmt::{Display, Formatter};

use thiserror::Error;

use crate::http_client::HttpError;

/// Construction-time configuration failures. No request is attempted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("required field '{field}' is not set")]
    MissingField { field: &'static str },
    #[error("invalid marketplace id '{value}'")]
    UnknownMarketplace { value: String },
}

/// Caller mistakes detected before any network call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("operation '{operation}' accepts at most {limit} identifiers, got {actual}")]
    BatchTooLarge {
        operation: &'static str,
        limit: usize,
        actual: usize,
    },
    #[error("marketplace supplied both as 'MarketplaceId' and as a list parameter")]
    ConflictingMarketplace,
    #[error("parameter '{key}' is already present")]
    DuplicateParameter { key: String },
    #[error("parameter '{field}' must not be empty")]
    EmptyParameter { field: &'static str },
    #[error("feed message id {message_id} is used more than once")]
    DuplicateMessageId { message_id: u64 },
    #[error("'{name}' is not a valid element name")]
    InvalidElementName { name: String },
    #[error("record {index} does not match the declared field set")]
    NonUniformRecords { index: usize },
    #[error("field '{field}' contains a tab or line break")]
    InvalidTabularValue { field: String },
    #[error("fulfillment for order '{order_id}' needs a carrier code or carrier name")]
    MissingCarrier { order_id: String },
    #[error("flat-file feed declares no fields")]
    EmptyFieldList,
}

/// Response content that does not have the expected shape.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("malformed markup: {message}")]
    Markup { message: String },
    #[error("expected a markup response for '{operation}' but got a non-markup body")]
    ExpectedMarkup { operation: String },
    #[error("expected {expected} at '{path}'")]
    UnexpectedShape { path: String, expected: &'static str },
    #[error("response is missing '{path}'")]
    MissingField { path: String },
    #[error("tabular line {line} has {found} fields, header declares {expected}")]
    TabularArity {
        line: u64,
        expected: usize,
        found: usize,
    },
    #[error("malformed tabular body: {message}")]
    Tabular { message: String },
    #[error("continuation token '{token}' was returned twice")]
    RepeatedContinuationToken { token: String },
}

/// Error envelope returned by the remote service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceError {
    pub status: u16,
    pub code: Option<String>,
    pub error_type: Option<String>,
    pub message: String,
    pub request_id: Option<String>,
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.code {
            Some(code) => write!(f, "{} ({code}, status {})", self.message, self.status),
            None => write!(f, "{} (status {})", self.message, self.status),
        }
    }
}

impl std::error::Error for ServiceError {}

/// Coarse classification of [`MwsError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MwsErrorKind {
    Configuration,
    Validation,
    UnknownOperation,
    Transport,
    Service,
    Decode,
}

/// Top-level error type for every client operation.
#[derive(Debug, Error)]
pub enum MwsError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("unknown operation '{0}'")]
    UnknownOperation(String),

    #[error("transport error: {0}")]
    Transport(#[from] HttpError),

    #[error("service error: {0}")]
    Service(ServiceError),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl MwsError {
    pub const fn kind(&self) -> MwsErrorKind {
        match self {
            Self::Config(_) => MwsErrorKind::Configuration,
            Self::Validation(_) => MwsErrorKind::Validation,
            Self::UnknownOperation(_) => MwsErrorKind::UnknownOperation,
            Self::Transport(_) => MwsErrorKind::Transport,
            Self::Service(_) => MwsErrorKind::Service,
            Self::Decode(_) => MwsErrorKind::Decode,
        }
    }

    pub const fn code(&self) -> &'static str {
        match self.kind() {
            MwsErrorKind::Configuration => "mws.config",
            MwsErrorKind::Validation => "mws.validation",
            MwsErrorKind::UnknownOperation => "mws.unknown_operation",
            MwsErrorKind::Transport => "mws.transport",
            MwsErrorKind::Service => "mws.service",
            MwsErrorKind::Decode => "mws.decode",
        }
    }

    /// Returns the service error payload when this error came from the remote side.
    pub fn as_service(&self) -> Option<&ServiceError> {
        match self {
            Self::Service(error) => Some(error),
            _ => None,
        }
    }
}

impl From<ServiceError> for MwsError {
    fn from(value: ServiceError) -> Self {
        Self::Service(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_error_message_surfaces_in_display() {
        let error = MwsError::from(ServiceError {
            status: 400,
            code: Some(String::from("InvalidParameterValue")),
            error_type: Some(String::from("Sender")),
            message: String::from("Invalid AmazonOrderId: validate"),
            request_id: None,
        });

        assert_eq!(error.kind(), MwsErrorKind::Service);
        assert_eq!(error.code(), "mws.service");
        assert!(error.to_string().contains("Invalid AmazonOrderId: validate"));
    }

    #[test]
    fn batch_limit_error_names_operation_and_limit() {
        let error = MwsError::from(ValidationError::BatchTooLarge {
            operation: "GetCompetitivePricingForASIN",
            limit: 20,
            actual: 21,
        });

        assert_eq!(error.kind(), MwsErrorKind::Validation);
        assert_eq!(
            error.to_string(),
            "operation 'GetCompetitivePricingForASIN' accepts at most 20 identifiers, got 21"
        );
    }
}
