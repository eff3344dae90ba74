use std::fmt::{Display, Formatter};

use serde::{Serialize, Serializer};

use crate::error::{DecodeError, ValidationError};
use crate::request::RequestParameters;
use crate::tabular::TabularRecord;
use crate::timestamp::Timestamp;
use crate::value::StructuredValue;

/// Processing status of a report request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportProcessingStatus {
    Submitted,
    InProgress,
    Cancelled,
    Done,
    DoneNoData,
    Other(String),
}

impl ReportProcessingStatus {
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "_SUBMITTED_" => Self::Submitted,
            "_IN_PROGRESS_" => Self::InProgress,
            "_CANCELLED_" => Self::Cancelled,
            "_DONE_" => Self::Done,
            "_DONE_NO_DATA_" => Self::DoneNoData,
            other => Self::Other(other.to_owned()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Submitted => "_SUBMITTED_",
            Self::InProgress => "_IN_PROGRESS_",
            Self::Cancelled => "_CANCELLED_",
            Self::Done => "_DONE_",
            Self::DoneNoData => "_DONE_NO_DATA_",
            Self::Other(value) => value,
        }
    }

    /// No further transition will be observed.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Cancelled | Self::Done | Self::DoneNoData)
    }
}

impl Display for ReportProcessingStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ReportProcessingStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// Parameters of a `RequestReport` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRequest {
    pub report_type: String,
    pub start: Option<Timestamp>,
    pub end: Option<Timestamp>,
}

impl ReportRequest {
    pub fn new(report_type: impl Into<String>) -> Self {
        Self {
            report_type: report_type.into(),
            start: None,
            end: None,
        }
    }

    pub fn with_range(mut self, start: Option<Timestamp>, end: Option<Timestamp>) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    pub fn to_parameters(&self, marketplace_id: &str) -> Result<RequestParameters, ValidationError> {
        if self.report_type.trim().is_empty() {
            return Err(ValidationError::EmptyParameter {
                field: "ReportType",
            });
        }
        let mut parameters = RequestParameters::new();
        parameters.insert("ReportType", self.report_type.as_str())?;
        parameters.insert("MarketplaceIdList.Id.1", marketplace_id)?;
        parameters.insert_optional("StartDate", self.start.map(Timestamp::to_wire))?;
        parameters.insert_optional("EndDate", self.end.map(Timestamp::to_wire))?;
        Ok(parameters)
    }
}

/// A `ReportRequestInfo` element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRequestInfo {
    pub report_request_id: String,
    pub report_type: Option<String>,
    pub status: ReportProcessingStatus,
    pub generated_report_id: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub submitted_date: Option<String>,
}

impl ReportRequestInfo {
    pub fn from_structured(node: &StructuredValue) -> Result<Self, DecodeError> {
        let text = |key: &str| {
            node.path_str(key)
                .filter(|value| !value.is_empty())
                .map(str::to_owned)
        };
        let missing = |key: &str| DecodeError::MissingField {
            path: format!("ReportRequestInfo/{key}"),
        };

        Ok(Self {
            report_request_id: text("ReportRequestId").ok_or_else(|| missing("ReportRequestId"))?,
            report_type: text("ReportType"),
            status: text("ReportProcessingStatus")
                .map(|status| ReportProcessingStatus::parse(&status))
                .ok_or_else(|| missing("ReportProcessingStatus"))?,
            generated_report_id: text("GeneratedReportId"),
            start_date: text("StartDate"),
            end_date: text("EndDate"),
            submitted_date: text("SubmittedDate"),
        })
    }
}

/// Downloaded report content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ReportContent {
    Rows(Vec<TabularRecord>),
    Document(StructuredValue),
}

/// Result of one `get_report` poll. Nothing here waits or retries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "content", rename_all = "snake_case")]
pub enum ReportOutcome {
    Ready(ReportContent),
    /// Finished without data; no content was fetched.
    NoData,
    /// Still processing or cancelled; poll again later if not terminal.
    NotReady(ReportProcessingStatus),
    /// The service does not know the request id.
    NotFound,
}

impl ReportOutcome {
    /// Rows of a finished report; empty for `NoData`.
    pub fn rows(&self) -> Option<&[TabularRecord]> {
        match self {
            Self::Ready(ReportContent::Rows(rows)) => Some(rows),
            Self::NoData => Some(&[]),
            _ => None,
        }
    }
}
