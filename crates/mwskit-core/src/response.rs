use crate::error::{DecodeError, ServiceError};
use crate::markup;
use crate::value::StructuredValue;

const FALLBACK_ERROR_MESSAGE: &str = "An error occurred";
const ERROR_ENVELOPE_MARKER: &str = "<ErrorResponse";

/// Outcome of decoding a response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    Structured(StructuredValue),
    Raw(Vec<u8>),
}

impl Decoded {
    /// Fails with [`DecodeError::ExpectedMarkup`] for a raw body.
    pub fn into_structured(self, operation: &str) -> Result<StructuredValue, DecodeError> {
        match self {
            Self::Structured(value) => Ok(value),
            Self::Raw(_) => Err(DecodeError::ExpectedMarkup {
                operation: operation.to_owned(),
            }),
        }
    }

    pub fn as_structured(&self) -> Option<&StructuredValue> {
        match self {
            Self::Structured(value) => Some(value),
            Self::Raw(_) => None,
        }
    }

    pub fn into_raw(self) -> Option<Vec<u8>> {
        match self {
            Self::Raw(bytes) => Some(bytes),
            Self::Structured(_) => None,
        }
    }
}

/// True when the declared content type names an XML variant.
pub fn is_markup(content_type: Option<&str>) -> bool {
    content_type.is_some_and(|value| value.to_ascii_lowercase().contains("xml"))
}

/// Classifies a body by content type and parses markup.
///
/// `raw_requested` bypasses classification entirely.
pub fn decode(
    content_type: Option<&str>,
    body: Vec<u8>,
    raw_requested: bool,
) -> Result<Decoded, DecodeError> {
    if raw_requested || !is_markup(content_type) {
        return Ok(Decoded::Raw(body));
    }
    let document = markup::parse(&body_text(&body))?;
    Ok(Decoded::Structured(document.value))
}

/// Body as text: UTF-8 when valid, otherwise one char per byte (ISO-8859-1).
pub fn body_text(body: &[u8]) -> String {
    match std::str::from_utf8(body) {
        Ok(text) => text.to_owned(),
        Err(_) => body.iter().map(|&byte| char::from(byte)).collect(),
    }
}

/// Builds the service error for a non-success response.
pub fn service_error(status: u16, body: &[u8]) -> ServiceError {
    let text = body_text(body);
    let envelope = text
        .contains(ERROR_ENVELOPE_MARKER)
        .then(|| markup::parse(&text).ok())
        .flatten();

    if let Some(document) = envelope {
        let error = document
            .value
            .get("Error")
            .and_then(|node| node.items().first());
        let field = |name: &str| {
            error
                .and_then(|node| node.path_str(name))
                .filter(|value| !value.is_empty())
                .map(str::to_owned)
        };
        let request_id = document
            .value
            .path_str("RequestID")
            .or_else(|| document.value.path_str("RequestId"))
            .map(str::to_owned);

        return ServiceError {
            status,
            code: field("Code"),
            error_type: field("Type"),
            message: field("Message").unwrap_or_else(|| FALLBACK_ERROR_MESSAGE.to_owned()),
            request_id,
        };
    }

    let message = text.trim();
    ServiceError {
        status,
        code: None,
        error_type: None,
        message: if message.is_empty() {
            FALLBACK_ERROR_MESSAGE.to_owned()
        } else {
            message.to_owned()
        },
        request_id: None,
    }
}
