//! Behavior-driven tests for request signing
//!
//! These tests verify HOW a request is canonicalized and signed: the golden
//! signature, insensitivity to parameter order, and sensitivity to every
//! signed input.

use mwskit_core::{
    signing, ClientConfig, HttpMethod, MwsClient, MwsErrorKind, ReplayHttpClient,
    RequestParameters, Timestamp, ValidationError,
};
use std::sync::Arc;

const GOLDEN_SIGNATURE: &str = "NbivyJ4xoUn3IL7BWO5X7KJRXCxyL+TJML7enFSkDxg=";
const GOLDEN_PATH: &str = "/Orders/2013-09-01";

fn golden_parameters() -> RequestParameters {
    RequestParameters::from_pairs([
        ("Action", "GetOrder"),
        ("Timestamp", "2024-01-01T00:00:00.000Z"),
    ])
    .expect("distinct keys")
}

fn client() -> MwsClient {
    let config =
        ClientConfig::new("SELLER1", "ATVPDKIKX0DER", "AKID", "secret").expect("valid config");
    MwsClient::with_http_client(config, Arc::new(ReplayHttpClient::new()))
}

fn fixed_time() -> Timestamp {
    Timestamp::parse("2024-01-01T00:00:00Z").expect("valid timestamp")
}

// =============================================================================
// Signing: Golden Value
// =============================================================================

#[test]
fn when_golden_request_is_signed_system_reproduces_known_signature() {
    // Given: The fixed golden request
    let parameters = golden_parameters();

    // When: The system builds the canonical string and signs it
    let canonical = signing::string_to_sign(
        HttpMethod::Post,
        "example-host",
        GOLDEN_PATH,
        &parameters,
    );
    let signature = signing::sign(
        HttpMethod::Post,
        "example-host",
        GOLDEN_PATH,
        &parameters,
        "test-secret",
    );

    // Then: Both match the published values byte for byte
    assert_eq!(
        canonical,
        "POST\nexample-host\n/Orders/2013-09-01\nAction=GetOrder&Timestamp=2024-01-01T00%3A00%3A00.000Z"
    );
    assert_eq!(signature, GOLDEN_SIGNATURE);
}

#[test]
fn when_parameters_arrive_in_any_order_system_produces_same_signature() {
    // Given: The same parameters inserted in reverse order
    let reversed = RequestParameters::from_pairs([
        ("Timestamp", "2024-01-01T00:00:00.000Z"),
        ("Action", "GetOrder"),
    ])
    .expect("distinct keys");

    // When: Both sets are signed
    let signature = signing::sign(
        HttpMethod::Post,
        "example-host",
        GOLDEN_PATH,
        &reversed,
        "test-secret",
    );

    // Then: Ordering has no influence
    assert_eq!(signature, GOLDEN_SIGNATURE);
}

#[test]
fn when_any_signed_input_changes_system_produces_different_signature() {
    let sign = |host: &str, path: &str, parameters: &RequestParameters, secret: &str| {
        signing::sign(HttpMethod::Post, host, path, parameters, secret)
    };
    let mut changed_value = golden_parameters();
    changed_value.remove("Action");
    changed_value.insert("Action", "GetOrders").expect("free key");

    let mut extra_key = golden_parameters();
    extra_key.insert("SellerId", "S1").expect("free key");

    for signature in [
        sign("other-host", GOLDEN_PATH, &golden_parameters(), "test-secret"),
        sign("example-host", "/Products/2011-10-01", &golden_parameters(), "test-secret"),
        sign("example-host", GOLDEN_PATH, &changed_value, "test-secret"),
        sign("example-host", GOLDEN_PATH, &extra_key, "test-secret"),
        sign("example-host", GOLDEN_PATH, &golden_parameters(), "other-secret"),
    ] {
        assert_ne!(signature, GOLDEN_SIGNATURE);
    }
    assert_ne!(
        signing::sign(HttpMethod::Get, "example-host", GOLDEN_PATH, &golden_parameters(), "test-secret"),
        GOLDEN_SIGNATURE
    );
}

// =============================================================================
// Signing: Prepared Requests
// =============================================================================

#[test]
fn when_request_is_prepared_signature_verifies_against_its_own_parameters() {
    // Given: A client and a fixed timestamp
    let client = client();

    // When: A request is prepared without being sent
    let mut parameters = RequestParameters::new();
    parameters.insert("AmazonOrderId.Id.1", "111-2222222-3333333").expect("free key");
    let signed = client
        .prepare("GetOrder", parameters, None, fixed_time())
        .expect("signed request");

    // Then: Identity and protocol parameters are present
    assert_eq!(signed.parameters.get("Action"), Some("GetOrder"));
    assert_eq!(signed.parameters.get("SellerId"), Some("SELLER1"));
    assert_eq!(signed.parameters.get("AWSAccessKeyId"), Some("AKID"));
    assert_eq!(signed.parameters.get("SignatureMethod"), Some("HmacSHA256"));
    assert_eq!(signed.parameters.get("SignatureVersion"), Some("2"));
    assert_eq!(signed.parameters.get("Version"), Some("2013-09-01"));
    assert_eq!(signed.parameters.get("Timestamp"), Some("2024-01-01T00:00:00.000Z"));
    assert_eq!(signed.parameters.get("MarketplaceId.Id.1"), Some("ATVPDKIKX0DER"));

    // And: Re-signing the sent parameters reproduces the attached signature
    let recomputed = signing::sign(
        signed.method,
        signed.host,
        signed.path,
        &signed.parameters,
        "secret",
    );
    assert_eq!(signed.signature(), Some(recomputed.as_str()));
}

#[test]
fn when_request_is_prepared_twice_system_is_deterministic() {
    let client = client();
    let first = client
        .prepare("ListOrderItems", RequestParameters::new(), None, fixed_time())
        .expect("signed");
    let second = client
        .prepare("ListOrderItems", RequestParameters::new(), None, fixed_time())
        .expect("signed");

    assert_eq!(first, second);
}

#[test]
fn when_caller_supplies_reserved_key_system_rejects_before_signing() {
    // Given: A caller that tries to override the timestamp
    let mut parameters = RequestParameters::new();
    parameters.insert("Timestamp", "1999-01-01T00:00:00.000Z").expect("free key");

    // When: The request is prepared
    let err = client()
        .prepare("GetOrder", parameters, None, fixed_time())
        .expect_err("reserved key");

    // Then: The conflict is a validation error, not a silent overwrite
    assert_eq!(err.kind(), MwsErrorKind::Validation);
    assert!(matches!(
        err,
        mwskit_core::MwsError::Validation(ValidationError::DuplicateParameter { ref key }) if key == "Timestamp"
    ));
}

#[test]
fn when_both_marketplace_forms_are_given_system_rejects_the_request() {
    let mut parameters = RequestParameters::new();
    parameters.insert("MarketplaceId", "ATVPDKIKX0DER").expect("free key");
    parameters.insert("MarketplaceIdList.Id.1", "ATVPDKIKX0DER").expect("free key");

    let err = client()
        .prepare("GetReportList", parameters, None, fixed_time())
        .expect_err("conflict");

    assert!(matches!(
        err,
        mwskit_core::MwsError::Validation(ValidationError::ConflictingMarketplace)
    ));
}

#[test]
fn when_auth_token_is_configured_system_signs_it_along() {
    let config = ClientConfig::new("SELLER1", "ATVPDKIKX0DER", "AKID", "secret")
        .expect("valid config")
        .with_auth_token("amzn.mws.token");
    let client = MwsClient::with_http_client(config, Arc::new(ReplayHttpClient::new()));

    let signed = client
        .prepare("ListOrders", RequestParameters::new(), None, fixed_time())
        .expect("signed");

    assert_eq!(signed.parameters.get("MWSAuthToken"), Some("amzn.mws.token"));
}

#[test]
fn when_operation_is_unknown_system_refuses_to_sign() {
    let err = client()
        .prepare("DeleteEverything", RequestParameters::new(), None, fixed_time())
        .expect_err("unknown");

    assert_eq!(err.kind(), MwsErrorKind::UnknownOperation);
}
