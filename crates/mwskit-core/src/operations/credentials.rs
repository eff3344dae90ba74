use crate::client::MwsClient;
use crate::error::MwsError;

/// Order id that can never exist; the service rejects it only after authenticating.
const PROBE_ORDER_ID: &str = "validate";

const REJECTED_PROBE_MESSAGES: [&str; 2] = [
    "Invalid AmazonOrderId: validate",
    "The order id you have requested is not valid.",
];

impl MwsClient {
    /// Checks the configured credentials with a harmless probe call.
    ///
    /// `Ok(false)` means the service answered with any other error; transport
    /// and decode failures are returned as errors.
    pub async fn validate_credentials(&self) -> Result<bool, MwsError> {
        match self.list_order_items(PROBE_ORDER_ID).await {
            Ok(_) => Ok(true),
            Err(MwsError::Service(error)) => {
                Ok(REJECTED_PROBE_MESSAGES.contains(&error.message.as_str()))
            }
            Err(other) => Err(other),
        }
    }
}
