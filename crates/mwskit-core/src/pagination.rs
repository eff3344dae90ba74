use std::collections::BTreeSet;
use std::future::Future;

use serde::Serialize;

use crate::error::{DecodeError, MwsError};
use crate::value::StructuredValue;

pub const NEXT_TOKEN_KEY: &str = "NextToken";

/// One page of a listing. `continuation_token` is set iff more pages exist.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PaginatedResult {
    pub items: Vec<StructuredValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub continuation_token: Option<String>,
}

impl PaginatedResult {
    pub fn has_more(&self) -> bool {
        self.continuation_token.is_some()
    }
}

/// Extracts items and continuation token from a result node.
///
/// A missing or empty items node yields no items, a list yields its
/// elements, and any other node is a single item.
pub fn normalize(
    result: &StructuredValue,
    items_path: &str,
    token_path: &str,
) -> Result<PaginatedResult, DecodeError> {
    let items = result
        .path(items_path)
        .map(|node| node.items().to_vec())
        .unwrap_or_default();

    let continuation_token = match result.path(token_path) {
        None => None,
        Some(StructuredValue::Scalar(token)) => {
            let token = token.trim();
            (!token.is_empty()).then(|| token.to_owned())
        }
        Some(_) => {
            return Err(DecodeError::UnexpectedShape {
                path: token_path.to_owned(),
                expected: "a scalar continuation token",
            })
        }
    };

    Ok(PaginatedResult {
        items,
        continuation_token,
    })
}

/// Listings that come as a first call plus a by-next-token continuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Listing {
    Orders,
    FinancialEvents,
    FinancialEventGroups,
    Reports,
    ReportRequests,
    InventorySupply,
}

impl Listing {
    pub const fn operation(self) -> &'static str {
        match self {
            Self::Orders => "ListOrders",
            Self::FinancialEvents => "ListFinancialEvents",
            Self::FinancialEventGroups => "ListFinancialEventGroups",
            Self::Reports => "GetReportList",
            Self::ReportRequests => "GetReportRequestList",
            Self::InventorySupply => "ListInventorySupply",
        }
    }

    pub const fn next_operation(self) -> &'static str {
        match self {
            Self::Orders => "ListOrdersByNextToken",
            Self::FinancialEvents => "ListFinancialEventsByNextToken",
            Self::FinancialEventGroups => "ListFinancialEventGroupsByNextToken",
            Self::Reports => "GetReportListByNextToken",
            Self::ReportRequests => "GetReportRequestListByNextToken",
            Self::InventorySupply => "ListInventorySupplyByNextToken",
        }
    }

    /// Path of the items below the result element.
    pub const fn items_path(self) -> &'static str {
        match self {
            Self::Orders => "Orders/Order",
            Self::FinancialEvents => "FinancialEvents",
            Self::FinancialEventGroups => "FinancialEventGroupList/FinancialEventGroup",
            Self::Reports => "ReportInfo",
            Self::ReportRequests => "ReportRequestInfo",
            Self::InventorySupply => "InventorySupplyList/member",
        }
    }

    pub fn operation_for(self, continuation: bool) -> &'static str {
        if continuation {
            self.next_operation()
        } else {
            self.operation()
        }
    }

    /// Element wrapping the page, e.g. `ListOrdersByNextTokenResult`.
    pub fn result_element(self, continuation: bool) -> String {
        format!("{}Result", self.operation_for(continuation))
    }

    /// Normalizes a decoded response of either call to the same shape.
    pub fn normalize_page(
        self,
        document: &StructuredValue,
        continuation: bool,
    ) -> Result<PaginatedResult, DecodeError> {
        match document.get(&self.result_element(continuation)) {
            Some(result) => normalize(result, self.items_path(), NEXT_TOKEN_KEY),
            None => Ok(PaginatedResult::default()),
        }
    }
}

/// Drains a listing: first page, then continuations until no token remains.
///
/// A token returned twice aborts with
/// [`DecodeError::RepeatedContinuationToken`] so no page is fetched twice.
pub async fn collect_pages<First, Next, NextFut>(
    first: First,
    mut next: Next,
) -> Result<Vec<StructuredValue>, MwsError>
where
    First: Future<Output = Result<PaginatedResult, MwsError>>,
    Next: FnMut(String) -> NextFut,
    NextFut: Future<Output = Result<PaginatedResult, MwsError>>,
{
    let mut seen = BTreeSet::new();
    let mut items = Vec::new();
    let mut page = first.await?;

    loop {
        items.extend(page.items);
        let Some(token) = page.continuation_token else {
            return Ok(items);
        };
        if !seen.insert(token.clone()) {
            return Err(DecodeError::RepeatedContinuationToken { token }.into());
        }
        page = next(token).await?;
    }
}
