use crate::client::MwsClient;
use crate::error::{DecodeError, MwsError};
use crate::pagination::{Listing, PaginatedResult};
use crate::report::{
    ReportContent, ReportOutcome, ReportProcessingStatus, ReportRequest, ReportRequestInfo,
};
use crate::request::RequestParameters;
use crate::response::{body_text, Decoded};
use crate::tabular;

const REQUEST_ID_PATH: &str = "RequestReportResult/ReportRequestInfo/ReportRequestId";

fn report_type_parameters<S: AsRef<str>>(
    report_types: &[S],
    max_count: Option<u32>,
) -> Result<RequestParameters, MwsError> {
    let mut parameters = RequestParameters::new();
    parameters.extend_list(
        "ReportTypeList.Type",
        report_types.iter().map(|report_type| report_type.as_ref()),
    )?;
    parameters.insert_optional("MaxCount", max_count.map(|count| count.to_string()))?;
    Ok(parameters)
}

impl MwsClient {
    /// Queues a report and returns its request id.
    pub async fn request_report(&self, request: &ReportRequest) -> Result<String, MwsError> {
        let parameters = request.to_parameters(self.config().marketplace().as_str())?;
        let document = self.execute_structured("RequestReport", parameters).await?;
        document
            .path_str(REQUEST_ID_PATH)
            .filter(|id| !id.is_empty())
            .map(str::to_owned)
            .ok_or_else(|| {
                DecodeError::MissingField {
                    path: String::from(REQUEST_ID_PATH),
                }
                .into()
            })
    }

    /// Current state of a report request, `None` when the id is unknown.
    pub async fn get_report_request_status(
        &self,
        report_request_id: &str,
    ) -> Result<Option<ReportRequestInfo>, MwsError> {
        let mut parameters = RequestParameters::new();
        parameters.insert("ReportRequestIdList.Id.1", report_request_id)?;
        let document = self
            .execute_structured("GetReportRequestList", parameters)
            .await?;

        document
            .path("GetReportRequestListResult/ReportRequestInfo")
            .and_then(|infos| infos.items().first())
            .map(ReportRequestInfo::from_structured)
            .transpose()
            .map_err(MwsError::from)
    }

    /// Polls a report request once and downloads the report when it is done.
    pub async fn get_report(&self, report_request_id: &str) -> Result<ReportOutcome, MwsError> {
        let Some(info) = self.get_report_request_status(report_request_id).await? else {
            return Ok(ReportOutcome::NotFound);
        };

        match info.status {
            ReportProcessingStatus::DoneNoData => Ok(ReportOutcome::NoData),
            ReportProcessingStatus::Done => {
                let report_id = info.generated_report_id.ok_or_else(|| DecodeError::MissingField {
                    path: String::from("ReportRequestInfo/GeneratedReportId"),
                })?;
                Ok(ReportOutcome::Ready(
                    self.download_report(&report_id).await?,
                ))
            }
            status => Ok(ReportOutcome::NotReady(status)),
        }
    }

    /// Downloads a generated report. Tab-delimited bodies become rows.
    pub async fn download_report(&self, report_id: &str) -> Result<ReportContent, MwsError> {
        let mut parameters = RequestParameters::new();
        parameters.insert("ReportId", report_id)?;
        match self.execute("GetReport", parameters, None, false).await? {
            Decoded::Structured(document) => Ok(ReportContent::Document(document)),
            Decoded::Raw(body) => Ok(ReportContent::Rows(tabular::decode_report(&body_text(
                &body,
            ))?)),
        }
    }

    /// Generated reports, optionally filtered by type.
    pub async fn get_report_list<S: AsRef<str>>(
        &self,
        report_types: &[S],
        max_count: Option<u32>,
    ) -> Result<PaginatedResult, MwsError> {
        self.fetch_page(
            Listing::Reports,
            report_type_parameters(report_types, max_count)?,
            false,
        )
        .await
    }

    pub async fn get_report_list_by_next_token(
        &self,
        token: &str,
    ) -> Result<PaginatedResult, MwsError> {
        self.next_page(Listing::Reports, token).await
    }

    /// Report requests, optionally filtered by type.
    pub async fn get_report_request_list<S: AsRef<str>>(
        &self,
        report_types: &[S],
        max_count: Option<u32>,
    ) -> Result<PaginatedResult, MwsError> {
        self.fetch_page(
            Listing::ReportRequests,
            report_type_parameters(report_types, max_count)?,
            false,
        )
        .await
    }

    pub async fn get_report_request_list_by_next_token(
        &self,
        token: &str,
    ) -> Result<PaginatedResult, MwsError> {
        self.next_page(Listing::ReportRequests, token).await
    }
}
