use crate::client::MwsClient;
use crate::endpoint;
use crate::error::MwsError;
use crate::pagination::{Listing, PaginatedResult};
use crate::request::RequestParameters;

/// `ResponseGroup` sent with every supply query.
pub const DEFAULT_RESPONSE_GROUP: &str = "Basic";

impl MwsClient {
    /// Fulfillment-network supply of at most 50 SKUs.
    pub async fn list_inventory_supply<S: AsRef<str>>(
        &self,
        seller_skus: &[S],
    ) -> Result<PaginatedResult, MwsError> {
        endpoint::lookup(Listing::InventorySupply.operation())?.check_batch(seller_skus.len())?;

        let mut parameters = RequestParameters::new();
        parameters.insert("MarketplaceId", self.config().marketplace().as_str())?;
        parameters.insert("ResponseGroup", DEFAULT_RESPONSE_GROUP)?;
        parameters.extend_list(
            "SellerSkus.member",
            seller_skus.iter().map(|sku| sku.as_ref()),
        )?;
        self.fetch_page(Listing::InventorySupply, parameters, false)
            .await
    }

    pub async fn list_inventory_supply_by_next_token(
        &self,
        token: &str,
    ) -> Result<PaginatedResult, MwsError> {
        self.next_page(Listing::InventorySupply, token).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::ClientConfig;
    use crate::error::{MwsErrorKind, ValidationError};
    use crate::http_client::{HttpResponse, ReplayHttpClient};

    fn client(replay: &ReplayHttpClient) -> MwsClient {
        let config =
            ClientConfig::new("SELLER1", "ATVPDKIKX0DER", "AKID", "secret").expect("valid config");
        MwsClient::with_http_client(config, Arc::new(replay.clone()))
    }

    #[tokio::test]
    async fn fifty_one_skus_are_rejected_before_transport() {
        let replay = ReplayHttpClient::new();
        let skus: Vec<String> = (0..51).map(|n| format!("SKU-{n}")).collect();

        let err = client(&replay)
            .list_inventory_supply(&skus)
            .await
            .expect_err("over the limit");

        assert_eq!(err.kind(), MwsErrorKind::Validation);
        assert!(matches!(
            err,
            MwsError::Validation(ValidationError::BatchTooLarge { limit: 50, actual: 51, .. })
        ));
        assert!(replay.recorded_requests().is_empty());
    }

    #[tokio::test]
    async fn supply_members_are_flattened() {
        let replay = ReplayHttpClient::new().with_response(HttpResponse::ok_xml(
            "<ListInventorySupplyResponse><ListInventorySupplyResult><InventorySupplyList><member><SellerSKU>A</SellerSKU><InStockSupplyQuantity>4</InStockSupplyQuantity></member></InventorySupplyList></ListInventorySupplyResult></ListInventorySupplyResponse>",
        ));

        let page = client(&replay)
            .list_inventory_supply(&["A"])
            .await
            .expect("page");

        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].path_str("InStockSupplyQuantity"), Some("4"));
        let requests = replay.recorded_requests();
        assert_eq!(requests[0].query_param("SellerSkus.member.1"), Some("A"));
        assert_eq!(requests[0].query_param("MarketplaceId"), Some("ATVPDKIKX0DER"));
    }
}
