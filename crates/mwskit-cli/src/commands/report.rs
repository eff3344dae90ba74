use mwskit_core::{MwsClient, ReportOutcome, ReportRequest};
use serde_json::json;

use crate::cli::{ReportArgs, ReportCommand};
use crate::error::CliError;

use super::{parse_optional_timestamp, CommandResult};

pub async fn run(args: &ReportArgs, client: &MwsClient) -> Result<CommandResult, CliError> {
    match &args.command {
        ReportCommand::Request {
            report_type,
            start,
            end,
        } => {
            let request = ReportRequest::new(report_type.as_str()).with_range(
                parse_optional_timestamp("--start", start.as_deref())?,
                parse_optional_timestamp("--end", end.as_deref())?,
            );
            let report_request_id = client.request_report(&request).await?;
            Ok(CommandResult::ok(json!({
                "report_request_id": report_request_id,
                "report_type": report_type,
            })))
        }
        ReportCommand::Status { id } => {
            let info = client.get_report_request_status(id).await?;
            let result = CommandResult::ok(serde_json::to_value(&info)?);
            Ok(match info {
                Some(_) => result,
                None => result.with_warning(format!("report request '{id}' was not found")),
            })
        }
        ReportCommand::Fetch { id } => {
            let outcome = client.get_report(id).await?;
            let warning = match &outcome {
                ReportOutcome::NotReady(status) if !status.is_terminal() => {
                    Some(format!("report is still {}; poll again later", status.as_str()))
                }
                ReportOutcome::NotReady(status) => {
                    Some(format!("report ended as {}", status.as_str()))
                }
                ReportOutcome::NotFound => Some(format!("report request '{id}' was not found")),
                ReportOutcome::Ready(_) | ReportOutcome::NoData => None,
            };
            let result = CommandResult::ok(serde_json::to_value(&outcome)?);
            Ok(match warning {
                Some(warning) => result.with_warning(warning),
                None => result,
            })
        }
    }
}
