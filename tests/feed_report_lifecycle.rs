//! Behavior-driven tests for the feed and report lifecycles
//!
//! These tests verify HOW feeds move from built to accepted (or stop in
//! debug mode), HOW report polling decides whether to download, and that
//! batch limits are enforced before anything is sent.

use mwskit_core::{
    feed::{self, InventoryUpdate, OrderFulfillment},
    request, ClientConfig, FeedOutcome, FeedState, HttpResponse, MwsClient, MwsError,
    MwsErrorKind, ReplayHttpClient, ReportContent, ReportOutcome, ReportProcessingStatus,
    ReportRequest, Timestamp, ValidationError,
};
use std::sync::Arc;

fn client(replay: &ReplayHttpClient) -> MwsClient {
    let config =
        ClientConfig::new("SELLER1", "ATVPDKIKX0DER", "AKID", "secret").expect("valid config");
    MwsClient::with_http_client(config, Arc::new(replay.clone()))
}

fn status_response(request_id: &str, status: &str, generated: Option<&str>) -> HttpResponse {
    let generated = generated
        .map(|id| format!("<GeneratedReportId>{id}</GeneratedReportId>"))
        .unwrap_or_default();
    HttpResponse::ok_xml(format!(
        "<GetReportRequestListResponse><GetReportRequestListResult><ReportRequestInfo><ReportRequestId>{request_id}</ReportRequestId><ReportType>_GET_MERCHANT_LISTINGS_DATA_</ReportType><ReportProcessingStatus>{status}</ReportProcessingStatus>{generated}</ReportRequestInfo></GetReportRequestListResult></GetReportRequestListResponse>"
    ))
}

fn stock_feed() -> mwskit_core::SubmitFeedRequest {
    feed::inventory_update(
        "SELLER1",
        &[
            InventoryUpdate {
                sku: String::from("SKU-1"),
                quantity: 7,
                fulfillment_latency: Some(2),
            },
            InventoryUpdate {
                sku: String::from("SKU-2"),
                quantity: 0,
                fulfillment_latency: None,
            },
        ],
    )
}

// =============================================================================
// Feeds: Debug and Submission
// =============================================================================

#[tokio::test]
async fn when_feed_is_submitted_in_debug_mode_system_never_calls_transport() {
    // Given: A feed flagged for debug
    let replay = ReplayHttpClient::new();
    let request = stock_feed().with_debug(true);

    // When: It is submitted
    let outcome = client(&replay).submit_feed(request).await.expect("debug body");

    // Then: The encoded envelope comes back and nothing was sent
    assert_eq!(outcome.state(), FeedState::Debug);
    let FeedOutcome::Debug(body) = outcome else {
        panic!("expected debug outcome");
    };
    assert!(body.starts_with("<?xml"));
    assert!(body.contains("<MerchantIdentifier>SELLER1</MerchantIdentifier>"));
    assert!(body.contains("<MessageID>2</MessageID>"));
    assert!(replay.recorded_requests().is_empty());
}

#[tokio::test]
async fn when_debug_flag_is_cleared_next_submission_is_sent() {
    // Given: A debug submission followed by a normal one on the same client
    let replay = ReplayHttpClient::new().with_response(HttpResponse::ok_xml(
        "<SubmitFeedResponse><SubmitFeedResult><FeedSubmissionInfo><FeedSubmissionId>9001</FeedSubmissionId></FeedSubmissionInfo></SubmitFeedResult></SubmitFeedResponse>",
    ));
    let client = client(&replay);

    // When: Both are submitted
    let first = client
        .submit_feed(stock_feed().with_debug(true))
        .await
        .expect("debug");
    let second = client.submit_feed(stock_feed()).await.expect("accepted");

    // Then: Debug mode applied to the flagged call only
    assert_eq!(first.state(), FeedState::Debug);
    assert_eq!(second.state(), FeedState::Accepted);
    assert_eq!(replay.recorded_requests().len(), 1);
}

#[tokio::test]
async fn when_feed_is_submitted_system_sends_digest_and_feed_query() {
    // Given: A service that accepts the upload
    let replay = ReplayHttpClient::new().with_response(HttpResponse::ok_xml(
        "<SubmitFeedResponse><SubmitFeedResult><FeedSubmissionInfo><FeedSubmissionId>9001</FeedSubmissionId><FeedType>_POST_INVENTORY_AVAILABILITY_DATA_</FeedType><SubmittedDate>2024-01-01T00:00:00+00:00</SubmittedDate><FeedProcessingStatus>_SUBMITTED_</FeedProcessingStatus></FeedSubmissionInfo></SubmitFeedResult></SubmitFeedResponse>",
    ));
    let request = stock_feed().with_purge_and_replace(true);
    let expected_body = request.content.encode().expect("encodable");

    // When: The feed is submitted
    let outcome = client(&replay).submit_feed(request).await.expect("accepted");

    // Then: The acknowledgement is decoded
    let FeedOutcome::Submitted(info) = outcome else {
        panic!("expected submission");
    };
    assert_eq!(info.feed_submission_id, "9001");
    assert_eq!(info.feed_type.as_deref(), Some("_POST_INVENTORY_AVAILABILITY_DATA_"));

    // And: The upload carried the body, its digest and the feed query
    let requests = replay.recorded_requests();
    let sent = &requests[0];
    assert_eq!(sent.body.as_deref(), Some(expected_body.as_slice()));
    assert_eq!(
        sent.headers.get("content-md5").map(String::as_str),
        Some(request::content_md5(&expected_body).as_str())
    );
    assert_eq!(
        sent.headers.get("content-type").map(String::as_str),
        Some("text/xml; charset=iso-8859-16")
    );
    assert_eq!(
        sent.headers.get("host").map(String::as_str),
        Some("mws.amazonservices.com")
    );
    assert_eq!(sent.query_param("Action"), Some("SubmitFeed"));
    assert_eq!(sent.query_param("FeedType"), Some("_POST_INVENTORY_AVAILABILITY_DATA_"));
    assert_eq!(sent.query_param("PurgeAndReplace"), Some("true"));
    assert_eq!(sent.query_param("Merchant"), Some("SELLER1"));
    assert_eq!(sent.query_param("MarketplaceIdList.Id.1"), Some("ATVPDKIKX0DER"));
    assert!(sent.query_param("SellerId").is_none());
    assert!(sent.query_param("MarketplaceId.Id.1").is_none());
}

#[test]
fn when_content_digest_is_computed_system_matches_reference_value() {
    assert_eq!(request::content_md5(b"<feed/>"), "/N76iCjEBrO16e+jppl6KA==");
}

#[test]
fn when_fulfillment_has_no_carrier_system_rejects_the_feed() {
    let err = feed::order_fulfillment(
        "SELLER1",
        &[OrderFulfillment {
            order_id: String::from("111-1"),
            fulfillment_date: Timestamp::parse("2024-01-02T10:00:00Z").expect("valid"),
            carrier_code: None,
            carrier_name: None,
            shipping_method: None,
            tracking_number: Some(String::from("1Z999")),
        }],
    )
    .expect_err("no carrier");

    assert!(matches!(err, ValidationError::MissingCarrier { ref order_id } if order_id == "111-1"));
}

// =============================================================================
// Reports: Polling
// =============================================================================

#[tokio::test]
async fn when_report_finished_without_data_system_does_not_fetch_content() {
    // Given: Report request R123 finished with no data
    let replay = ReplayHttpClient::new().with_response(status_response(
        "R123",
        "_DONE_NO_DATA_",
        None,
    ));

    // When: The report is requested
    let outcome = client(&replay).get_report("R123").await.expect("polled");

    // Then: The outcome is empty and exactly one status call was made
    assert_eq!(outcome, ReportOutcome::NoData);
    assert_eq!(outcome.rows(), Some(&[][..]));
    let requests = replay.recorded_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].query_param("Action"), Some("GetReportRequestList"));
    assert_eq!(requests[0].query_param("ReportRequestIdList.Id.1"), Some("R123"));
}

#[tokio::test]
async fn when_report_is_done_system_downloads_and_decodes_rows() {
    let replay = ReplayHttpClient::new()
        .with_response(status_response("R124", "_DONE_", Some("G124")))
        .with_response(HttpResponse::ok_text(
            "item-name\tseller-sku\tprice\nMug\tSKU-1\t9.99\nCup\tSKU-2\t4.50\n",
        ));

    let outcome = client(&replay).get_report("R124").await.expect("ready");

    let rows = outcome.rows().expect("tabular rows");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].get("seller-sku").map(String::as_str), Some("SKU-1"));
    assert_eq!(
        rows[1].keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["item-name", "seller-sku", "price"]
    );
    let requests = replay.recorded_requests();
    assert_eq!(requests[1].query_param("Action"), Some("GetReport"));
    assert_eq!(requests[1].query_param("ReportId"), Some("G124"));
}

#[tokio::test]
async fn when_report_body_is_markup_system_returns_a_document() {
    let replay = ReplayHttpClient::new()
        .with_response(status_response("R125", "_DONE_", Some("G125")))
        .with_response(HttpResponse::ok_xml(
            "<Report><Row><Sku>SKU-1</Sku></Row></Report>",
        ));

    let outcome = client(&replay).get_report("R125").await.expect("ready");

    let ReportOutcome::Ready(ReportContent::Document(document)) = outcome else {
        panic!("expected a markup report");
    };
    assert_eq!(document.path_str("Row/Sku"), Some("SKU-1"));
}

#[tokio::test]
async fn when_report_is_still_processing_system_reports_not_ready() {
    for (status, expected) in [
        ("_SUBMITTED_", ReportProcessingStatus::Submitted),
        ("_IN_PROGRESS_", ReportProcessingStatus::InProgress),
        ("_CANCELLED_", ReportProcessingStatus::Cancelled),
    ] {
        let replay =
            ReplayHttpClient::new().with_response(status_response("R126", status, None));

        let outcome = client(&replay).get_report("R126").await.expect("polled");

        assert_eq!(outcome, ReportOutcome::NotReady(expected));
        assert_eq!(replay.recorded_requests().len(), 1);
    }
}

#[tokio::test]
async fn when_report_is_requested_system_returns_request_id() {
    let replay = ReplayHttpClient::new().with_response(HttpResponse::ok_xml(
        "<RequestReportResponse><RequestReportResult><ReportRequestInfo><ReportRequestId>2291326454</ReportRequestId><ReportProcessingStatus>_SUBMITTED_</ReportProcessingStatus></ReportRequestInfo></RequestReportResult></RequestReportResponse>",
    ));

    let id = client(&replay)
        .request_report(&ReportRequest::new("_GET_MERCHANT_LISTINGS_DATA_"))
        .await
        .expect("queued");

    assert_eq!(id, "2291326454");
    let requests = replay.recorded_requests();
    assert_eq!(requests[0].query_param("ReportType"), Some("_GET_MERCHANT_LISTINGS_DATA_"));
    assert_eq!(requests[0].query_param("MarketplaceIdList.Id.1"), Some("ATVPDKIKX0DER"));
}

// =============================================================================
// Batch Limits
// =============================================================================

fn asins(count: usize) -> Vec<String> {
    (0..count).map(|n| format!("B{n:09}")).collect()
}

#[tokio::test]
async fn when_twenty_one_asins_are_priced_system_rejects_before_sending() {
    let replay = ReplayHttpClient::new();

    let err = client(&replay)
        .get_competitive_pricing_for_asin(&asins(21))
        .await
        .expect_err("over the limit");

    assert_eq!(err.kind(), MwsErrorKind::Validation);
    assert!(matches!(
        err,
        MwsError::Validation(ValidationError::BatchTooLarge { limit: 20, actual: 21, .. })
    ));
    assert!(replay.recorded_requests().is_empty());
}

#[tokio::test]
async fn when_twenty_asins_are_priced_system_sends_one_request() {
    let replay = ReplayHttpClient::new().with_response(HttpResponse::ok_xml(
        "<GetCompetitivePricingForASINResponse/>",
    ));

    let prices = client(&replay)
        .get_competitive_pricing_for_asin(&asins(20))
        .await
        .expect("at the limit");

    assert!(prices.is_empty());
    let requests = replay.recorded_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].query_param("ASINList.ASIN.20"), Some("B000000019"));
    assert_eq!(requests[0].query_param("MarketplaceId"), Some("ATVPDKIKX0DER"));
    assert!(requests[0].query_param("MarketplaceId.Id.1").is_none());
}

#[tokio::test]
async fn when_matching_ids_repeat_system_counts_unique_ids_only() {
    // Given: Six ids of which five are distinct
    let replay = ReplayHttpClient::new().with_response(HttpResponse::ok_xml(
        "<GetMatchingProductForIdResponse/>",
    ));
    let ids = ["A1", "A2", "A3", "A4", "A5", "A1"];

    // When: They are looked up
    let matches = client(&replay)
        .get_matching_product_for_id(&ids, "ASIN")
        .await
        .expect("five unique ids fit");

    // Then: Each id is sent once
    assert!(matches.found.is_empty());
    let requests = replay.recorded_requests();
    assert_eq!(requests[0].query_param("IdList.Id.5"), Some("A5"));
    assert!(requests[0].query_param("IdList.Id.6").is_none());

    // And: Six distinct ids are refused
    let err = client(&replay)
        .get_matching_product_for_id(&["A1", "A2", "A3", "A4", "A5", "A6"], "ASIN")
        .await
        .expect_err("over the limit");
    assert_eq!(err.kind(), MwsErrorKind::Validation);
}
