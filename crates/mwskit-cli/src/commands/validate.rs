use mwskit_core::MwsClient;
use serde_json::json;

use crate::error::CliError;

use super::CommandResult;

pub async fn run(client: &MwsClient) -> Result<CommandResult, CliError> {
    let valid = client.validate_credentials().await?;
    let result = CommandResult::ok(json!({
        "valid": valid,
        "seller_id": client.config().seller_id(),
        "marketplace_id": client.config().marketplace().as_str(),
    }));

    Ok(if valid {
        result
    } else {
        result.with_warning("credentials were rejected by the service")
    })
}
