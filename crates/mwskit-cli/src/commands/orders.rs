use mwskit_core::{MwsClient, OrderQuery, StructuredValue};
use serde::Serialize;

use crate::cli::OrdersArgs;
use crate::error::CliError;

use super::{parse_optional_timestamp, parse_timestamp, CommandResult};

#[derive(Debug, Serialize)]
struct OrdersResponseData {
    orders: Vec<StructuredValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    next_token: Option<String>,
}

pub async fn run(args: &OrdersArgs, client: &MwsClient) -> Result<CommandResult, CliError> {
    let query = build_query(args)?;

    if args.all_pages {
        let orders = client.list_all_orders(&query).await?;
        let data = serde_json::to_value(OrdersResponseData {
            orders,
            next_token: None,
        })?;
        return Ok(CommandResult::ok(data));
    }

    let page = client.list_orders(&query).await?;
    let has_more = page.has_more();
    let data = serde_json::to_value(OrdersResponseData {
        orders: page.items,
        next_token: page.continuation_token,
    })?;
    let result = CommandResult::ok(data);

    Ok(if has_more {
        result.with_warning("more orders are available; rerun with --all-pages")
    } else {
        result
    })
}

fn build_query(args: &OrdersArgs) -> Result<OrderQuery, CliError> {
    let mut query = OrderQuery::new(parse_timestamp("--created-after", &args.created_after)?);
    let created_before =
        parse_optional_timestamp("--created-before", args.created_before.as_deref())?;
    if let Some(before) = created_before {
        query = query.created_before(before);
    }
    if !args.statuses.is_empty() {
        query = query.with_statuses(args.statuses.iter().cloned());
    }
    Ok(query)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(statuses: &[&str]) -> OrdersArgs {
        OrdersArgs {
            created_after: String::from("2024-05-01T00:00:00Z"),
            created_before: Some(String::from("2024-05-02T00:00:00Z")),
            statuses: statuses.iter().map(|status| String::from(*status)).collect(),
            all_pages: false,
        }
    }

    #[test]
    fn default_statuses_are_kept_without_flag() {
        let query = build_query(&args(&[])).expect("valid");
        assert_eq!(query.statuses, vec!["Unshipped", "PartiallyShipped"]);
        assert!(query.created_before.is_some());
    }

    #[test]
    fn explicit_statuses_replace_defaults() {
        let query = build_query(&args(&["Shipped"])).expect("valid");
        assert_eq!(query.statuses, vec!["Shipped"]);
    }
}
