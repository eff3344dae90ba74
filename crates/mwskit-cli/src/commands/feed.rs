use mwskit_core::{FeedContent, MwsClient, SubmitFeedRequest};
use serde_json::json;
use tracing::debug;

use crate::cli::{FeedArgs, FeedCommand, FeedSubmitArgs};
use crate::error::CliError;

use super::CommandResult;

pub async fn run(args: &FeedArgs, client: &MwsClient) -> Result<CommandResult, CliError> {
    match &args.command {
        FeedCommand::Submit(submit) => run_submit(submit, client).await,
        FeedCommand::Result { id } => {
            let report = client.get_feed_submission_result(id).await?;
            Ok(CommandResult::ok(json!({
                "feed_submission_id": id,
                "processing_report": report,
            })))
        }
    }
}

async fn run_submit(args: &FeedSubmitArgs, client: &MwsClient) -> Result<CommandResult, CliError> {
    let body = std::fs::read(&args.file)?;
    debug!(file = %args.file.display(), bytes = body.len(), "loaded feed file");

    let request = SubmitFeedRequest::new(args.feed_type.as_str(), FeedContent::Raw(body))
        .with_purge_and_replace(args.purge_and_replace)
        .with_debug(args.debug);
    let outcome = client.submit_feed(request).await?;

    Ok(CommandResult::ok(serde_json::to_value(outcome)?))
}
