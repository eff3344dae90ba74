use serde::Serialize;

use crate::client::MwsClient;
use crate::error::{DecodeError, MwsError};
use crate::request::RequestParameters;
use crate::value::StructuredValue;

/// Marketplaces the seller participates in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MarketplaceParticipations {
    pub participations: Vec<StructuredValue>,
    pub marketplaces: Vec<StructuredValue>,
}

impl MarketplaceParticipations {
    fn from_result(result: &StructuredValue) -> Self {
        let list = |path: &str| {
            result
                .path(path)
                .map(|items| items.items().to_vec())
                .unwrap_or_default()
        };
        Self {
            participations: list("ListParticipations/Participation"),
            marketplaces: list("ListMarketplaces/Marketplace"),
        }
    }

    /// Ids of every listed marketplace, in response order.
    pub fn marketplace_ids(&self) -> Vec<&str> {
        self.marketplaces
            .iter()
            .filter_map(|marketplace| marketplace.path_str("MarketplaceId"))
            .collect()
    }
}

impl MwsClient {
    pub async fn list_marketplace_participations(
        &self,
    ) -> Result<MarketplaceParticipations, MwsError> {
        let document = self
            .execute_structured("ListMarketplaceParticipations", RequestParameters::new())
            .await?;
        Ok(document
            .get("ListMarketplaceParticipationsResult")
            .map(MarketplaceParticipations::from_result)
            .unwrap_or_default())
    }

    /// Selling recommendations, optionally restricted to one category.
    pub async fn list_recommendations(
        &self,
        category: Option<&str>,
    ) -> Result<Vec<StructuredValue>, MwsError> {
        let mut parameters = RequestParameters::new();
        parameters.insert_optional("RecommendationCategory", category)?;
        let document = self
            .execute_structured("ListRecommendations", parameters)
            .await?;
        let Some(result) = document.get("ListRecommendationsResult") else {
            return Ok(Vec::new());
        };
        Ok(result
            .as_object()
            .map(|fields| {
                fields
                    .iter()
                    .filter(|(key, _)| key.ends_with("Recommendations"))
                    .flat_map(|(_, list)| {
                        list.get("member")
                            .map(StructuredValue::items)
                            .unwrap_or_default()
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    /// Health of the orders section: `GREEN`, `GREEN_I`, `YELLOW` or `RED`.
    pub async fn get_service_status(&self) -> Result<String, MwsError> {
        let document = self
            .execute_structured("GetServiceStatus", RequestParameters::new())
            .await?;
        document
            .path_str("GetServiceStatusResult/Status")
            .map(str::to_owned)
            .ok_or_else(|| {
                DecodeError::MissingField {
                    path: String::from("GetServiceStatusResult/Status"),
                }
                .into()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup;

    #[test]
    fn participations_and_marketplaces_are_listed() {
        let document = markup::parse(
            "<ListMarketplaceParticipationsResult>
  <ListParticipations><Participation><MarketplaceId>ATVPDKIKX0DER</MarketplaceId><SellerId>S1</SellerId></Participation></ListParticipations>
  <ListMarketplaces>
    <Marketplace><MarketplaceId>ATVPDKIKX0DER</MarketplaceId><Name>Amazon.com</Name></Marketplace>
    <Marketplace><MarketplaceId>A2EUQ1WTGCTBG2</MarketplaceId><Name>Amazon.ca</Name></Marketplace>
  </ListMarketplaces>
</ListMarketplaceParticipationsResult>",
        )
        .expect("well formed")
        .value;

        let participations = MarketplaceParticipations::from_result(&document);
        assert_eq!(participations.participations.len(), 1);
        assert_eq!(
            participations.marketplace_ids(),
            vec!["ATVPDKIKX0DER", "A2EUQ1WTGCTBG2"]
        );
    }
}
