use crate::error::MwsError;
use crate::http_client::HttpMethod;

/// Static routing data for one remote operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndpointDescriptor {
    pub operation: &'static str,
    pub method: HttpMethod,
    pub path: &'static str,
    pub version: &'static str,
    pub action: &'static str,
    /// Maximum number of identifiers a single call may carry.
    pub batch_limit: Option<usize>,
}

const ORDERS: (&str, &str) = ("/Orders/2013-09-01", "2013-09-01");
const PRODUCTS: (&str, &str) = ("/Products/2011-10-01", "2011-10-01");
const REPORTS_AND_FEEDS: (&str, &str) = ("/", "2009-01-01");
const RECOMMENDATIONS: (&str, &str) = ("/Recommendations/2013-04-01", "2013-04-01");
const SELLERS: (&str, &str) = ("/Sellers/2011-07-01", "2011-07-01");
const INVENTORY: (&str, &str) = ("/FulfillmentInventory/2010-10-01", "2010-10-01");
const FINANCES: (&str, &str) = ("/Finances/2015-05-01", "2015-05-01");

const fn post(
    operation: &'static str,
    section: (&'static str, &'static str),
    batch_limit: Option<usize>,
) -> EndpointDescriptor {
    EndpointDescriptor {
        operation,
        method: HttpMethod::Post,
        path: section.0,
        version: section.1,
        action: operation,
        batch_limit,
    }
}

static ENDPOINTS: [EndpointDescriptor; 32] = [
    post("ListOrders", ORDERS, None),
    post("ListOrdersByNextToken", ORDERS, None),
    post("GetOrder", ORDERS, None),
    post("ListOrderItems", ORDERS, None),
    post("GetCompetitivePricingForASIN", PRODUCTS, Some(20)),
    post("GetCompetitivePricingForSKU", PRODUCTS, Some(20)),
    post("GetLowestPricedOffersForASIN", PRODUCTS, None),
    post("GetMyPriceForSKU", PRODUCTS, Some(20)),
    post("GetMyPriceForASIN", PRODUCTS, Some(20)),
    post("GetLowestOfferListingsForASIN", PRODUCTS, Some(20)),
    post("GetProductCategoriesForSKU", PRODUCTS, None),
    post("GetProductCategoriesForASIN", PRODUCTS, None),
    post("GetMatchingProductForId", PRODUCTS, Some(5)),
    post("ListMatchingProducts", PRODUCTS, None),
    post("GetReportList", REPORTS_AND_FEEDS, None),
    post("GetReportListByNextToken", REPORTS_AND_FEEDS, None),
    post("GetReportRequestList", REPORTS_AND_FEEDS, None),
    post("GetReportRequestListByNextToken", REPORTS_AND_FEEDS, None),
    post("RequestReport", REPORTS_AND_FEEDS, None),
    post("GetReport", REPORTS_AND_FEEDS, None),
    post("SubmitFeed", REPORTS_AND_FEEDS, None),
    post("GetFeedSubmissionResult", REPORTS_AND_FEEDS, None),
    post("GetFeedSubmissionList", REPORTS_AND_FEEDS, None),
    post("ListRecommendations", RECOMMENDATIONS, None),
    post("ListMarketplaceParticipations", SELLERS, None),
    post("ListInventorySupply", INVENTORY, Some(50)),
    post("ListInventorySupplyByNextToken", INVENTORY, None),
    post("ListFinancialEvents", FINANCES, None),
    post("ListFinancialEventsByNextToken", FINANCES, None),
    post("ListFinancialEventGroups", FINANCES, None),
    post("ListFinancialEventGroupsByNextToken", FINANCES, None),
    post("GetServiceStatus", ORDERS, None),
];

/// Looks up an operation by name.
pub fn lookup(operation: &str) -> Result<&'static EndpointDescriptor, MwsError> {
    ENDPOINTS
        .iter()
        .find(|endpoint| endpoint.operation == operation)
        .ok_or_else(|| MwsError::UnknownOperation(operation.to_owned()))
}

/// Every registered endpoint, in table order.
pub fn all() -> &'static [EndpointDescriptor] {
    &ENDPOINTS
}

impl EndpointDescriptor {
    /// Fails when `count` identifiers exceed this endpoint's batch limit.
    pub fn check_batch(&self, count: usize) -> Result<(), crate::error::ValidationError> {
        match self.batch_limit {
            Some(limit) if count > limit => Err(crate::error::ValidationError::BatchTooLarge {
                operation: self.operation,
                limit,
                actual: count,
            }),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{MwsErrorKind, ValidationError};

    #[test]
    fn resolves_known_operation() {
        let endpoint = lookup("GetOrder").expect("registered");
        assert_eq!(endpoint.method, HttpMethod::Post);
        assert_eq!(endpoint.path, "/Orders/2013-09-01");
        assert_eq!(endpoint.version, "2013-09-01");
        assert_eq!(endpoint.action, "GetOrder");
    }

    #[test]
    fn unknown_operation_has_distinct_kind() {
        let err = lookup("DoesNotExist").expect_err("must fail");
        assert_eq!(err.kind(), MwsErrorKind::UnknownOperation);
    }

    #[test]
    fn operation_names_are_unique() {
        let mut names = all().iter().map(|e| e.operation).collect::<Vec<_>>();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), all().len());
    }

    #[test]
    fn batch_limit_is_inclusive() {
        let endpoint = lookup("GetCompetitivePricingForASIN").expect("registered");
        assert!(endpoint.check_batch(20).is_ok());
        assert_eq!(
            endpoint.check_batch(21),
            Err(ValidationError::BatchTooLarge {
                operation: "GetCompetitivePricingForASIN",
                limit: 20,
                actual: 21,
            })
        );
    }
}
