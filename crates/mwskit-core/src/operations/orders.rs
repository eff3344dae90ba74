use crate::client::MwsClient;
use crate::error::{MwsError, ValidationError};
use crate::marketplace::MarketplaceId;
use crate::pagination::{collect_pages, Listing, PaginatedResult};
use crate::request::RequestParameters;
use crate::timestamp::Timestamp;
use crate::value::StructuredValue;

/// Filter of a `ListOrders` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderQuery {
    pub created_after: Timestamp,
    pub created_before: Option<Timestamp>,
    pub statuses: Vec<String>,
    pub fulfillment_channels: Vec<String>,
    /// Query every marketplace in the routing table instead of the configured one.
    pub all_marketplaces: bool,
}

impl OrderQuery {
    /// Unshipped and partially shipped merchant-fulfilled orders.
    pub fn new(created_after: Timestamp) -> Self {
        Self {
            created_after,
            created_before: None,
            statuses: vec![String::from("Unshipped"), String::from("PartiallyShipped")],
            fulfillment_channels: vec![String::from("MFN")],
            all_marketplaces: false,
        }
    }

    pub fn created_before(mut self, created_before: Timestamp) -> Self {
        self.created_before = Some(created_before);
        self
    }

    pub fn with_statuses<I, S>(mut self, statuses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.statuses = statuses.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_fulfillment_channels<I, S>(mut self, channels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fulfillment_channels = channels.into_iter().map(Into::into).collect();
        self
    }

    pub fn across_all_marketplaces(mut self) -> Self {
        self.all_marketplaces = true;
        self
    }

    pub fn to_parameters(&self) -> Result<RequestParameters, ValidationError> {
        let mut parameters = RequestParameters::new();
        parameters.insert("CreatedAfter", self.created_after.to_wire())?;
        parameters.insert_optional("CreatedBefore", self.created_before.map(Timestamp::to_wire))?;
        parameters.extend_list("OrderStatus.Status", self.statuses.iter().map(String::as_str))?;
        parameters.extend_list(
            "FulfillmentChannel.Channel",
            self.fulfillment_channels.iter().map(String::as_str),
        )?;
        if self.all_marketplaces {
            parameters.extend_list("MarketplaceId.Id", MarketplaceId::all().map(MarketplaceId::as_str))?;
        }
        Ok(parameters)
    }
}

impl MwsClient {
    pub async fn list_orders(&self, query: &OrderQuery) -> Result<PaginatedResult, MwsError> {
        self.fetch_page(Listing::Orders, query.to_parameters()?, false)
            .await
    }

    pub async fn list_orders_by_next_token(&self, token: &str) -> Result<PaginatedResult, MwsError> {
        self.next_page(Listing::Orders, token).await
    }

    /// Follows continuation tokens until the listing is exhausted.
    pub async fn list_all_orders(&self, query: &OrderQuery) -> Result<Vec<StructuredValue>, MwsError> {
        collect_pages(self.list_orders(query), |token| async move {
            self.list_orders_by_next_token(&token).await
        })
        .await
    }

    /// The order, or `None` when the service does not return it.
    pub async fn get_order(&self, amazon_order_id: &str) -> Result<Option<StructuredValue>, MwsError> {
        let mut parameters = RequestParameters::new();
        parameters.insert("AmazonOrderId.Id.1", amazon_order_id)?;
        let document = self.execute_structured("GetOrder", parameters).await?;
        Ok(document.path("GetOrderResult/Orders/Order").cloned())
    }

    pub async fn list_order_items(&self, amazon_order_id: &str) -> Result<Vec<StructuredValue>, MwsError> {
        let mut parameters = RequestParameters::new();
        parameters.insert("AmazonOrderId", amazon_order_id)?;
        let document = self.execute_structured("ListOrderItems", parameters).await?;
        Ok(document
            .path("ListOrderItemsResult/OrderItems/OrderItem")
            .map(|items| items.items().to_vec())
            .unwrap_or_default())
    }
}
