use crate::client::MwsClient;
use crate::error::{MwsError, ValidationError};
use crate::pagination::{Listing, PaginatedResult};
use crate::request::RequestParameters;
use crate::timestamp::Timestamp;
use crate::value::StructuredValue;

/// Selector of a `ListFinancialEvents` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinancialEventsQuery {
    ByOrderId(String),
    ByEventGroupId(String),
    ByDateRange {
        posted_after: Timestamp,
        posted_before: Option<Timestamp>,
    },
}

impl FinancialEventsQuery {
    pub fn to_parameters(&self) -> Result<RequestParameters, ValidationError> {
        let mut parameters = RequestParameters::new();
        match self {
            Self::ByOrderId(order_id) => parameters.insert("AmazonOrderId", order_id.as_str())?,
            Self::ByEventGroupId(group_id) => {
                parameters.insert("FinancialEventGroupId", group_id.as_str())?
            }
            Self::ByDateRange {
                posted_after,
                posted_before,
            } => {
                parameters.insert("PostedAfter", posted_after.to_wire())?;
                parameters.insert_optional("PostedBefore", posted_before.map(Timestamp::to_wire))?;
            }
        }
        Ok(parameters)
    }
}

/// Each page carries one `FinancialEvents` object with empty event lists removed.
fn prune_event_lists(mut page: PaginatedResult) -> PaginatedResult {
    page.items = page
        .items
        .into_iter()
        .map(StructuredValue::prune_empty)
        .filter(|events| !events.is_empty())
        .collect();
    page
}

impl MwsClient {
    pub async fn list_financial_events(
        &self,
        query: &FinancialEventsQuery,
    ) -> Result<PaginatedResult, MwsError> {
        let page = self
            .fetch_page(Listing::FinancialEvents, query.to_parameters()?, false)
            .await?;
        Ok(prune_event_lists(page))
    }

    pub async fn list_financial_events_by_next_token(
        &self,
        token: &str,
    ) -> Result<PaginatedResult, MwsError> {
        let page = self.next_page(Listing::FinancialEvents, token).await?;
        Ok(prune_event_lists(page))
    }

    /// Settlement groups started after `started_after`.
    pub async fn list_financial_event_groups(
        &self,
        started_after: Timestamp,
        started_before: Option<Timestamp>,
    ) -> Result<PaginatedResult, MwsError> {
        let mut parameters = RequestParameters::new();
        parameters.insert("FinancialEventGroupStartedAfter", started_after.to_wire())?;
        parameters.insert_optional(
            "FinancialEventGroupStartedBefore",
            started_before.map(Timestamp::to_wire),
        )?;
        self.fetch_page(Listing::FinancialEventGroups, parameters, false)
            .await
    }

    pub async fn list_financial_event_groups_by_next_token(
        &self,
        token: &str,
    ) -> Result<PaginatedResult, MwsError> {
        self.next_page(Listing::FinancialEventGroups, token).await
    }
}
