use std::collections::BTreeSet;

use serde::Serialize;

use crate::error::{DecodeError, ValidationError};
use crate::markup;
use crate::tabular::FlatFileFeed;
use crate::timestamp::Timestamp;
use crate::value::StructuredValue;

pub const DOCUMENT_VERSION: &str = "1.01";
pub const ENVELOPE_ROOT: &str = "AmazonEnvelope";

pub const POST_PRODUCT_DATA: &str = "_POST_PRODUCT_DATA_";
pub const POST_INVENTORY_AVAILABILITY_DATA: &str = "_POST_INVENTORY_AVAILABILITY_DATA_";
pub const POST_PRODUCT_PRICING_DATA: &str = "_POST_PRODUCT_PRICING_DATA_";
pub const POST_PRODUCT_IMAGE_DATA: &str = "_POST_PRODUCT_IMAGE_DATA_";
pub const POST_PRODUCT_RELATIONSHIP_DATA: &str = "_POST_PRODUCT_RELATIONSHIP_DATA_";
pub const POST_ORDER_FULFILLMENT_DATA: &str = "_POST_ORDER_FULFILLMENT_DATA_";
pub const POST_FLAT_FILE_LISTINGS_DATA: &str = "_POST_FLAT_FILE_LISTINGS_DATA_";

/// Per-message operation of an envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationType {
    Update,
    Delete,
    PartialUpdate,
}

impl OperationType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Update => "Update",
            Self::Delete => "Delete",
            Self::PartialUpdate => "PartialUpdate",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedMessage {
    pub message_id: u64,
    pub operation_type: Option<OperationType>,
    /// Element name of the payload, e.g. `Inventory`.
    pub payload_name: String,
    pub payload: StructuredValue,
}

impl FeedMessage {
    fn to_structured(&self) -> StructuredValue {
        let mut message = StructuredValue::object().with("MessageID", self.message_id.to_string());
        if let Some(operation) = self.operation_type {
            message.insert("OperationType", operation.as_str());
        }
        message.insert(self.payload_name.clone(), self.payload.clone());
        message
    }
}

/// Markup feed document: header block, message type and messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEnvelope {
    merchant_id: String,
    message_type: String,
    messages: Vec<FeedMessage>,
    ids: BTreeSet<u64>,
}

impl FeedEnvelope {
    pub fn new(merchant_id: impl Into<String>, message_type: impl Into<String>) -> Self {
        Self {
            merchant_id: merchant_id.into(),
            message_type: message_type.into(),
            messages: Vec::new(),
            ids: BTreeSet::new(),
        }
    }

    /// Appends a message with the next free id and returns that id.
    pub fn push(
        &mut self,
        operation_type: Option<OperationType>,
        payload_name: impl Into<String>,
        payload: StructuredValue,
    ) -> u64 {
        let message_id = self.ids.last().map_or(1, |last| last + 1);
        self.ids.insert(message_id);
        self.messages.push(FeedMessage {
            message_id,
            operation_type,
            payload_name: payload_name.into(),
            payload,
        });
        message_id
    }

    /// Appends a message with a caller-chosen id, which must be unused.
    pub fn push_message(&mut self, message: FeedMessage) -> Result<(), ValidationError> {
        if !self.ids.insert(message.message_id) {
            return Err(ValidationError::DuplicateMessageId {
                message_id: message.message_id,
            });
        }
        self.messages.push(message);
        Ok(())
    }

    pub fn merchant_id(&self) -> &str {
        &self.merchant_id
    }

    pub fn message_type(&self) -> &str {
        &self.message_type
    }

    pub fn messages(&self) -> &[FeedMessage] {
        &self.messages
    }

    /// Content of the `AmazonEnvelope` element.
    ///
    /// A single message is an object, several are a list, matching what the
    /// parser produces for the encoded document.
    pub fn to_structured(&self) -> StructuredValue {
        let header = StructuredValue::object()
            .with("DocumentVersion", DOCUMENT_VERSION)
            .with("MerchantIdentifier", self.merchant_id.as_str());
        let mut envelope = StructuredValue::object()
            .with("Header", header)
            .with("MessageType", self.message_type.as_str());

        match self.messages.as_slice() {
            [] => {}
            [single] => envelope.insert("Message", single.to_structured()),
            many => envelope.insert(
                "Message",
                StructuredValue::List(many.iter().map(FeedMessage::to_structured).collect()),
            ),
        }
        envelope
    }

    pub fn encode(&self) -> Result<String, ValidationError> {
        markup::encode_document(ENVELOPE_ROOT, &self.to_structured())
    }
}

/// Body of a feed submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedContent {
    Markup(FeedEnvelope),
    FlatFile(FlatFileFeed),
    /// Pre-encoded bytes, sent unmodified.
    Raw(Vec<u8>),
}

impl FeedContent {
    pub fn encode(&self) -> Result<Vec<u8>, ValidationError> {
        match self {
            Self::Markup(envelope) => envelope.encode().map(String::into_bytes),
            Self::FlatFile(feed) => feed.encode().map(String::into_bytes),
            Self::Raw(bytes) => Ok(bytes.clone()),
        }
    }
}

/// One feed submission. `debug` returns the encoded body instead of sending it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitFeedRequest {
    pub feed_type: String,
    pub content: FeedContent,
    pub purge_and_replace: bool,
    pub debug: bool,
}

impl SubmitFeedRequest {
    pub fn new(feed_type: impl Into<String>, content: FeedContent) -> Self {
        Self {
            feed_type: feed_type.into(),
            content,
            purge_and_replace: false,
            debug: false,
        }
    }

    pub fn flat_file(feed: FlatFileFeed) -> Self {
        Self::new(POST_FLAT_FILE_LISTINGS_DATA, FeedContent::FlatFile(feed))
    }

    pub fn with_purge_and_replace(mut self, purge_and_replace: bool) -> Self {
        self.purge_and_replace = purge_and_replace;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub const fn state(&self) -> FeedState {
        FeedState::Built
    }

    /// Where [`MwsClient::submit_feed`](crate::MwsClient::submit_feed) takes this request.
    pub const fn next_state(&self) -> FeedState {
        if self.debug {
            FeedState::Debug
        } else {
            FeedState::Submitted
        }
    }
}

/// Lifecycle of a submission: `Built -> (Debug | Submitted) -> Accepted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FeedState {
    /// Request assembled, nothing sent.
    Built,
    Debug,
    /// Body handed to the transport, no acknowledgement yet.
    Submitted,
    Accepted,
}

impl FeedState {
    /// States reachable in one step.
    pub const fn successors(self) -> &'static [FeedState] {
        match self {
            Self::Built => &[Self::Debug, Self::Submitted],
            Self::Submitted => &[Self::Accepted],
            Self::Debug | Self::Accepted => &[],
        }
    }

    pub const fn is_terminal(self) -> bool {
        self.successors().is_empty()
    }
}

/// Acknowledgement of an accepted feed upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedSubmissionInfo {
    pub feed_submission_id: String,
    pub feed_type: Option<String>,
    pub feed_processing_status: Option<String>,
    pub submitted_date: Option<String>,
}

impl FeedSubmissionInfo {
    pub fn from_structured(node: &StructuredValue) -> Result<Self, DecodeError> {
        let text = |key: &str| node.path_str(key).map(str::to_owned);
        Ok(Self {
            feed_submission_id: text("FeedSubmissionId").ok_or_else(|| {
                DecodeError::MissingField {
                    path: String::from("SubmitFeedResult/FeedSubmissionInfo/FeedSubmissionId"),
                }
            })?,
            feed_type: text("FeedType"),
            feed_processing_status: text("FeedProcessingStatus"),
            submitted_date: text("SubmittedDate"),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "content", rename_all = "snake_case")]
pub enum FeedOutcome {
    /// Encoded body, never transmitted.
    Debug(String),
    Submitted(FeedSubmissionInfo),
}

impl FeedOutcome {
    pub const fn state(&self) -> FeedState {
        match self {
            Self::Debug(_) => FeedState::Debug,
            Self::Submitted(_) => FeedState::Accepted,
        }
    }
}

// ============================================================================
// Feed builders
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryUpdate {
    pub sku: String,
    pub quantity: u64,
    pub fulfillment_latency: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalePrice {
    pub start: Timestamp,
    pub end: Timestamp,
    pub price: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceUpdate {
    pub sku: String,
    pub price: String,
    pub currency: String,
    pub sale: Option<SalePrice>,
}

impl PriceUpdate {
    /// Price in the marketplace's default currency.
    pub fn new(sku: impl Into<String>, price: impl Into<String>) -> Self {
        Self {
            sku: sku.into(),
            price: price.into(),
            currency: String::from("DEFAULT"),
            sale: None,
        }
    }

    pub fn with_sale(mut self, sale: SalePrice) -> Self {
        self.sale = Some(sale);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpdate {
    pub sku: String,
    pub image_type: String,
    pub image_location: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipUpdate {
    pub parent_sku: String,
    /// `(child sku, relation type)`; the type defaults to `Variation`.
    pub relations: Vec<(String, Option<String>)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderFulfillment {
    pub order_id: String,
    pub fulfillment_date: Timestamp,
    pub carrier_code: Option<String>,
    pub carrier_name: Option<String>,
    pub shipping_method: Option<String>,
    pub tracking_number: Option<String>,
}

pub fn inventory_update(merchant_id: &str, items: &[InventoryUpdate]) -> SubmitFeedRequest {
    let mut envelope = FeedEnvelope::new(merchant_id, "Inventory");
    for item in items {
        let mut payload = StructuredValue::object()
            .with("SKU", item.sku.as_str())
            .with("Quantity", item.quantity.to_string());
        if let Some(latency) = item.fulfillment_latency {
            payload.insert("FulfillmentLatency", latency.to_string());
        }
        envelope.push(Some(OperationType::Update), "Inventory", payload);
    }
    SubmitFeedRequest::new(POST_INVENTORY_AVAILABILITY_DATA, FeedContent::Markup(envelope))
}

pub fn price_update(merchant_id: &str, items: &[PriceUpdate]) -> SubmitFeedRequest {
    let mut envelope = FeedEnvelope::new(merchant_id, "Price");
    for item in items {
        let mut payload = StructuredValue::object()
            .with("SKU", item.sku.as_str())
            .with(
                "StandardPrice",
                StructuredValue::scalar(item.price.as_str()).with_attribute("currency", item.currency.as_str()),
            );
        if let Some(sale) = &item.sale {
            payload.insert(
                "Sale",
                StructuredValue::object()
                    .with("StartDate", sale.start.to_wire())
                    .with("EndDate", sale.end.to_wire())
                    .with(
                        "SalePrice",
                        StructuredValue::scalar(sale.price.as_str())
                            .with_attribute("currency", item.currency.as_str()),
                    ),
            );
        }
        envelope.push(None, "Price", payload);
    }
    SubmitFeedRequest::new(POST_PRODUCT_PRICING_DATA, FeedContent::Markup(envelope))
}

pub fn product_delete<S: AsRef<str>>(merchant_id: &str, skus: &[S]) -> SubmitFeedRequest {
    let mut envelope = FeedEnvelope::new(merchant_id, "Product");
    for sku in skus {
        envelope.push(
            Some(OperationType::Delete),
            "Product",
            StructuredValue::object().with("SKU", sku.as_ref()),
        );
    }
    SubmitFeedRequest::new(POST_PRODUCT_DATA, FeedContent::Markup(envelope))
}

pub fn image_update(merchant_id: &str, items: &[ImageUpdate]) -> SubmitFeedRequest {
    let mut envelope = FeedEnvelope::new(merchant_id, "ProductImage");
    for item in items {
        envelope.push(
            Some(OperationType::Update),
            "ProductImage",
            StructuredValue::object()
                .with("SKU", item.sku.as_str())
                .with("ImageType", item.image_type.as_str())
                .with("ImageLocation", item.image_location.as_str()),
        );
    }
    SubmitFeedRequest::new(POST_PRODUCT_IMAGE_DATA, FeedContent::Markup(envelope))
}

pub fn relationship_update(merchant_id: &str, items: &[RelationshipUpdate]) -> SubmitFeedRequest {
    let mut envelope = FeedEnvelope::new(merchant_id, "Relationship");
    for item in items {
        let relations = item
            .relations
            .iter()
            .map(|(sku, relation_type)| {
                StructuredValue::object()
                    .with("SKU", sku.as_str())
                    .with("Type", relation_type.as_deref().unwrap_or("Variation"))
            })
            .collect::<Vec<_>>();
        let relations = match <[StructuredValue; 1]>::try_from(relations) {
            Ok([single]) => single,
            Err(many) => StructuredValue::List(many),
        };
        envelope.push(
            Some(OperationType::Update),
            "Relationship",
            StructuredValue::object()
                .with("ParentSKU", item.parent_sku.as_str())
                .with("Relation", relations),
        );
    }
    SubmitFeedRequest::new(POST_PRODUCT_RELATIONSHIP_DATA, FeedContent::Markup(envelope))
}

/// Marks orders as shipped. Each entry needs a carrier code or a carrier name.
pub fn order_fulfillment(
    merchant_id: &str,
    items: &[OrderFulfillment],
) -> Result<SubmitFeedRequest, ValidationError> {
    let mut envelope = FeedEnvelope::new(merchant_id, "OrderFulfillment");
    for item in items {
        let mut data = StructuredValue::object();
        match (&item.carrier_code, &item.carrier_name) {
            (Some(code), _) => data.insert("CarrierCode", code.as_str()),
            (None, Some(name)) => data.insert("CarrierName", name.as_str()),
            (None, None) => {
                return Err(ValidationError::MissingCarrier {
                    order_id: item.order_id.clone(),
                })
            }
        }
        if let Some(method) = &item.shipping_method {
            data.insert("ShippingMethod", method.as_str());
        }
        if let Some(tracking) = &item.tracking_number {
            data.insert("ShipperTrackingNumber", tracking.as_str());
        }

        envelope.push(
            None,
            "OrderFulfillment",
            StructuredValue::object()
                .with("AmazonOrderID", item.order_id.as_str())
                .with("FulfillmentDate", item.fulfillment_date.to_wire())
                .with("FulfillmentData", data),
        );
    }
    Ok(SubmitFeedRequest::new(
        POST_ORDER_FULFILLMENT_DATA,
        FeedContent::Markup(envelope),
    ))
}
