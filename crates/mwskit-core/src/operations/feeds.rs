use tracing::{debug, info};

use crate::client::MwsClient;
use crate::error::{DecodeError, MwsError};
use crate::feed::{FeedOutcome, FeedState, FeedSubmissionInfo, SubmitFeedRequest};
use crate::request::RequestParameters;
use crate::response::body_text;
use crate::tabular::FlatFileFeed;
use crate::value::StructuredValue;

const SUBMISSION_INFO_PATH: &str = "SubmitFeedResult/FeedSubmissionInfo";

impl MwsClient {
    /// Uploads a feed, or returns its encoded body when `request.debug` is set.
    ///
    /// Debug submissions never reach the transport.
    pub async fn submit_feed(&self, request: SubmitFeedRequest) -> Result<FeedOutcome, MwsError> {
        let body = request.content.encode()?;
        if request.next_state() == FeedState::Debug {
            info!(
                feed_type = request.feed_type.as_str(),
                bytes = body.len(),
                "feed built in debug mode; not submitted"
            );
            return Ok(FeedOutcome::Debug(body_text(&body)));
        }

        let marketplace = self.config().marketplace().as_str();
        let mut parameters = RequestParameters::new();
        parameters.insert("FeedType", request.feed_type.as_str())?;
        parameters.insert(
            "PurgeAndReplace",
            if request.purge_and_replace { "true" } else { "false" },
        )?;
        parameters.insert("Merchant", self.config().seller_id())?;
        parameters.insert("MarketplaceIdList.Id.1", marketplace)?;

        debug!(
            feed_type = request.feed_type.as_str(),
            state = ?FeedState::Submitted,
            bytes = body.len(),
            "submitting feed"
        );
        let document = self
            .execute("SubmitFeed", parameters, Some(body), false)
            .await?
            .into_structured("SubmitFeed")?;
        let info = document
            .path(SUBMISSION_INFO_PATH)
            .ok_or_else(|| DecodeError::MissingField {
                path: String::from(SUBMISSION_INFO_PATH),
            })?;
        Ok(FeedOutcome::Submitted(FeedSubmissionInfo::from_structured(
            info,
        )?))
    }

    /// Submits a flat-file listings feed.
    pub async fn post_flat_file(
        &self,
        feed: FlatFileFeed,
        purge_and_replace: bool,
        debug: bool,
    ) -> Result<FeedOutcome, MwsError> {
        self.submit_feed(
            SubmitFeedRequest::flat_file(feed)
                .with_purge_and_replace(purge_and_replace)
                .with_debug(debug),
        )
        .await
    }

    /// Processing report of a submission, or the whole document when it has none.
    pub async fn get_feed_submission_result(
        &self,
        feed_submission_id: &str,
    ) -> Result<StructuredValue, MwsError> {
        let mut parameters = RequestParameters::new();
        parameters.insert("FeedSubmissionId", feed_submission_id)?;
        let document = self
            .execute_structured("GetFeedSubmissionResult", parameters)
            .await?;
        Ok(match document.path("Message/ProcessingReport") {
            Some(report) => report.clone(),
            None => document,
        })
    }

    /// Status of earlier submissions.
    pub async fn get_feed_submission_list<S: AsRef<str>>(
        &self,
        feed_submission_ids: &[S],
    ) -> Result<Vec<FeedSubmissionInfo>, MwsError> {
        let mut parameters = RequestParameters::new();
        parameters.extend_list(
            "FeedSubmissionIdList.Id",
            feed_submission_ids.iter().map(|id| id.as_ref()),
        )?;
        let document = self
            .execute_structured("GetFeedSubmissionList", parameters)
            .await?;
        document
            .path("GetFeedSubmissionListResult/FeedSubmissionInfo")
            .map(StructuredValue::items)
            .unwrap_or_default()
            .iter()
            .map(|info| FeedSubmissionInfo::from_structured(info).map_err(MwsError::from))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::ClientConfig;
    use crate::feed::{self, InventoryUpdate};
    use crate::http_client::{HttpResponse, ReplayHttpClient};

    fn client(replay: &ReplayHttpClient) -> MwsClient {
        let config =
            ClientConfig::new("SELLER1", "ATVPDKIKX0DER", "AKID", "secret").expect("valid config");
        MwsClient::with_http_client(config, Arc::new(replay.clone()))
    }

    fn inventory() -> SubmitFeedRequest {
        feed::inventory_update(
            "SELLER1",
            &[InventoryUpdate {
                sku: String::from("SKU-1"),
                quantity: 3,
                fulfillment_latency: None,
            }],
        )
    }

    #[tokio::test]
    async fn accepted_submission_is_decoded() {
        let replay = ReplayHttpClient::new().with_response(HttpResponse::ok_xml(
            "<SubmitFeedResponse><SubmitFeedResult><FeedSubmissionInfo><FeedSubmissionId>50001</FeedSubmissionId><FeedType>_POST_INVENTORY_AVAILABILITY_DATA_</FeedType><FeedProcessingStatus>_SUBMITTED_</FeedProcessingStatus></FeedSubmissionInfo></SubmitFeedResult></SubmitFeedResponse>",
        ));

        let outcome = client(&replay).submit_feed(inventory()).await.expect("accepted");

        assert_eq!(outcome.state(), FeedState::Accepted);
        let FeedOutcome::Submitted(info) = outcome else {
            panic!("expected a submission");
        };
        assert_eq!(info.feed_submission_id, "50001");
        assert_eq!(info.feed_processing_status.as_deref(), Some("_SUBMITTED_"));

        let requests = replay.recorded_requests();
        let request = &requests[0];
        assert_eq!(request.query_param("Merchant"), Some("SELLER1"));
        assert_eq!(request.query_param("PurgeAndReplace"), Some("false"));
        assert!(request.query_param("SellerId").is_none());
    }

    #[tokio::test]
    async fn submission_result_prefers_processing_report() {
        let replay = ReplayHttpClient::new().with_response(HttpResponse::ok_xml(
            "<AmazonEnvelope><Message><MessageID>1</MessageID><ProcessingReport><StatusCode>Complete</StatusCode></ProcessingReport></Message></AmazonEnvelope>",
        ));

        let report = client(&replay)
            .get_feed_submission_result("50001")
            .await
            .expect("report");

        assert_eq!(report.path_str("StatusCode"), Some("Complete"));
    }
}
