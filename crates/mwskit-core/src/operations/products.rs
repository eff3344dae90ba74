use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::Serialize;

use crate::client::MwsClient;
use crate::endpoint;
use crate::error::{MwsError, ValidationError};
use crate::markup;
use crate::request::RequestParameters;
use crate::response::body_text;
use crate::value::StructuredValue;

/// Competitive price of one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompetitivePrice {
    /// ASIN or seller SKU, depending on the call.
    pub identifier: String,
    pub price: StructuredValue,
    pub attributes: BTreeMap<String, String>,
    pub marketplace_asin: Option<StructuredValue>,
    /// `Rank` of the first sales ranking, when the product has one.
    pub rank: Option<String>,
}

/// Own offers for one identifier. `found` is false when the service rejected it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MyPrice {
    pub identifier: String,
    pub found: bool,
    pub offers: Vec<StructuredValue>,
}

/// Products matched per requested id, plus the ids that matched nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatchingProducts {
    pub found: IndexMap<String, Vec<StructuredValue>>,
    pub not_found: Vec<String>,
}

#[derive(Debug, Clone, Copy)]
enum IdentifierKind {
    Asin,
    Sku,
}

impl IdentifierKind {
    const fn list_prefix(self) -> &'static str {
        match self {
            Self::Asin => "ASINList.ASIN",
            Self::Sku => "SellerSKUList.SellerSKU",
        }
    }

    const fn identifier_path(self) -> &'static str {
        match self {
            Self::Asin => "Identifiers/MarketplaceASIN/ASIN",
            Self::Sku => "Identifiers/SKUIdentifier/SellerSKU",
        }
    }

    const fn attribute(self) -> &'static str {
        match self {
            Self::Asin => "ASIN",
            Self::Sku => "SellerSKU",
        }
    }
}

impl MwsClient {
    /// Batch parameters: singular marketplace plus the flattened id list.
    fn batch_parameters<S: AsRef<str>>(
        &self,
        operation: &str,
        prefix: &str,
        ids: &[S],
    ) -> Result<RequestParameters, MwsError> {
        endpoint::lookup(operation)?.check_batch(ids.len())?;
        let mut parameters = RequestParameters::new();
        parameters.insert("MarketplaceId", self.config().marketplace().as_str())?;
        parameters.extend_list(prefix, ids.iter().map(|id| id.as_ref()))?;
        Ok(parameters)
    }

    async fn competitive_pricing<S: AsRef<str>>(
        &self,
        operation: &str,
        kind: IdentifierKind,
        ids: &[S],
    ) -> Result<Vec<CompetitivePrice>, MwsError> {
        let parameters = self.batch_parameters(operation, kind.list_prefix(), ids)?;
        let document = self.execute_structured(operation, parameters).await?;
        let results = document
            .get(&format!("{operation}Result"))
            .map(StructuredValue::items)
            .unwrap_or_default();

        Ok(results
            .iter()
            .filter_map(|result| competitive_price(result, kind))
            .collect())
    }

    /// At most 20 ASINs per call.
    pub async fn get_competitive_pricing_for_asin<S: AsRef<str>>(
        &self,
        asins: &[S],
    ) -> Result<Vec<CompetitivePrice>, MwsError> {
        self.competitive_pricing("GetCompetitivePricingForASIN", IdentifierKind::Asin, asins)
            .await
    }

    /// At most 20 SKUs per call.
    pub async fn get_competitive_pricing_for_sku<S: AsRef<str>>(
        &self,
        skus: &[S],
    ) -> Result<Vec<CompetitivePrice>, MwsError> {
        self.competitive_pricing("GetCompetitivePricingForSKU", IdentifierKind::Sku, skus)
            .await
    }

    async fn my_price<S: AsRef<str>>(
        &self,
        operation: &str,
        kind: IdentifierKind,
        ids: &[S],
        item_condition: Option<&str>,
    ) -> Result<Vec<MyPrice>, MwsError> {
        let mut parameters = self.batch_parameters(operation, kind.list_prefix(), ids)?;
        parameters.insert_optional("ItemCondition", item_condition)?;
        let document = self.execute_structured(operation, parameters).await?;
        let results = document
            .get(&format!("{operation}Result"))
            .map(StructuredValue::items)
            .unwrap_or_default();

        Ok(results
            .iter()
            .map(|result| {
                let found = result.attribute("status") == Some("Success");
                MyPrice {
                    identifier: result.attribute(kind.attribute()).unwrap_or_default().to_owned(),
                    found,
                    offers: result
                        .path("Product/Offers/Offer")
                        .filter(|_| found)
                        .map(|offers| offers.items().to_vec())
                        .unwrap_or_default(),
                }
            })
            .collect())
    }

    /// At most 20 SKUs per call.
    pub async fn get_my_price_for_sku<S: AsRef<str>>(
        &self,
        skus: &[S],
        item_condition: Option<&str>,
    ) -> Result<Vec<MyPrice>, MwsError> {
        self.my_price("GetMyPriceForSKU", IdentifierKind::Sku, skus, item_condition)
            .await
    }

    /// At most 20 ASINs per call.
    pub async fn get_my_price_for_asin<S: AsRef<str>>(
        &self,
        asins: &[S],
        item_condition: Option<&str>,
    ) -> Result<Vec<MyPrice>, MwsError> {
        self.my_price("GetMyPriceForASIN", IdentifierKind::Asin, asins, item_condition)
            .await
    }

    /// Lowest offer listings per ASIN, keyed by the requested ASIN.
    pub async fn get_lowest_offer_listings_for_asin<S: AsRef<str>>(
        &self,
        asins: &[S],
        item_condition: Option<&str>,
    ) -> Result<IndexMap<String, Vec<StructuredValue>>, MwsError> {
        let operation = "GetLowestOfferListingsForASIN";
        let mut parameters = self.batch_parameters(operation, "ASINList.ASIN", asins)?;
        parameters.insert_optional("ItemCondition", item_condition)?;
        let document = self.execute_structured(operation, parameters).await?;
        let results = document
            .get(&format!("{operation}Result"))
            .map(StructuredValue::items)
            .unwrap_or_default();

        Ok(results
            .iter()
            .filter(|result| result.attribute("status") == Some("Success"))
            .map(|result| {
                let listings = result
                    .path("Product/LowestOfferListings/LowestOfferListing")
                    .map(|listings| listings.items().to_vec())
                    .unwrap_or_default();
                (result.attribute("ASIN").unwrap_or_default().to_owned(), listings)
            })
            .collect())
    }

    /// Summary and offers of the lowest priced offers for one ASIN.
    pub async fn get_lowest_priced_offers_for_asin(
        &self,
        asin: &str,
        item_condition: &str,
    ) -> Result<Option<StructuredValue>, MwsError> {
        let mut parameters = RequestParameters::new();
        parameters.insert("MarketplaceId", self.config().marketplace().as_str())?;
        parameters.insert("ASIN", asin)?;
        parameters.insert("ItemCondition", item_condition)?;
        let document = self
            .execute_structured("GetLowestPricedOffersForASIN", parameters)
            .await?;
        Ok(document.get("GetLowestPricedOffersForASINResult").cloned())
    }

    /// Looks up products by id. Duplicate ids are sent once; at most 5 distinct ids.
    ///
    /// The body is fetched raw and namespaced item attributes are rewritten
    /// before parsing.
    pub async fn get_matching_product_for_id<S: AsRef<str>>(
        &self,
        ids: &[S],
        id_type: &str,
    ) -> Result<MatchingProducts, MwsError> {
        let mut unique: Vec<&str> = Vec::with_capacity(ids.len());
        for id in ids {
            if !unique.contains(&id.as_ref()) {
                unique.push(id.as_ref());
            }
        }
        let mut parameters =
            self.batch_parameters("GetMatchingProductForId", "IdList.Id", &unique)?;
        parameters.insert("IdType", id_type)?;

        let document = self
            .execute_raw_markup("GetMatchingProductForId", parameters)
            .await?;
        let mut matches = MatchingProducts::default();
        let results = document
            .get("GetMatchingProductForIdResult")
            .map(StructuredValue::items)
            .unwrap_or_default();

        for result in results {
            let id = result.attribute("Id").unwrap_or_default().to_owned();
            if result.attribute("status") != Some("Success") {
                matches.not_found.push(id);
                continue;
            }
            let products = result
                .path("Products/Product")
                .map(|products| products.items().to_vec())
                .unwrap_or_default();
            matches.found.entry(id).or_default().extend(products);
        }
        Ok(matches)
    }

    /// Free-text product search; returns the raw result node.
    pub async fn list_matching_products(
        &self,
        query: &str,
        query_context_id: Option<&str>,
    ) -> Result<StructuredValue, MwsError> {
        if query.trim().is_empty() {
            return Err(ValidationError::EmptyParameter { field: "Query" }.into());
        }
        let mut parameters = RequestParameters::new();
        parameters.insert("MarketplaceId", self.config().marketplace().as_str())?;
        parameters.insert("Query", query)?;
        parameters.insert_optional("QueryContextId", query_context_id)?;

        let document = self
            .execute_raw_markup("ListMatchingProducts", parameters)
            .await?;
        Ok(document
            .get("ListMatchingProductsResult")
            .cloned()
            .unwrap_or_default())
    }

    pub async fn get_product_categories_for_sku(
        &self,
        seller_sku: &str,
    ) -> Result<Option<StructuredValue>, MwsError> {
        self.product_categories("GetProductCategoriesForSKU", "SellerSKU", seller_sku)
            .await
    }

    pub async fn get_product_categories_for_asin(
        &self,
        asin: &str,
    ) -> Result<Option<StructuredValue>, MwsError> {
        self.product_categories("GetProductCategoriesForASIN", "ASIN", asin)
            .await
    }

    async fn product_categories(
        &self,
        operation: &str,
        key: &str,
        value: &str,
    ) -> Result<Option<StructuredValue>, MwsError> {
        let mut parameters = RequestParameters::new();
        parameters.insert("MarketplaceId", self.config().marketplace().as_str())?;
        parameters.insert(key, value)?;
        let document = self.execute_structured(operation, parameters).await?;
        Ok(document.path(&format!("{operation}Result/Self")).cloned())
    }

    async fn execute_raw_markup(
        &self,
        operation: &str,
        parameters: RequestParameters,
    ) -> Result<StructuredValue, MwsError> {
        let body = self
            .execute(operation, parameters, None, true)
            .await?
            .into_raw()
            .unwrap_or_default();
        let text = markup::normalize_item_attributes(&body_text(&body));
        Ok(markup::parse(&text)?.value)
    }
}

fn competitive_price(result: &StructuredValue, kind: IdentifierKind) -> Option<CompetitivePrice> {
    let product = result.get("Product")?;
    let competitive = product
        .path("CompetitivePricing/CompetitivePrices/CompetitivePrice")?
        .items()
        .first()?;
    let price = competitive.get("Price")?.clone();
    let identifier = product
        .path_str(kind.identifier_path())
        .or_else(|| result.attribute(kind.attribute()))?
        .to_owned();
    let rank = product
        .path("SalesRankings/SalesRank")
        .and_then(|ranks| ranks.items().first())
        .and_then(|rank| rank.path_str("Rank"))
        .map(str::to_owned);

    Some(CompetitivePrice {
        identifier,
        price,
        attributes: competitive.attributes().cloned().unwrap_or_default(),
        marketplace_asin: product.path("Identifiers/MarketplaceASIN").cloned(),
        rank,
    })
}
