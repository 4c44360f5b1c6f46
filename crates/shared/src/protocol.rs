//! JSON bodies exchanged with the collaborator endpoint.
//!
//! Both operations share one URL and are routed by the `action` field.

use serde::{Deserialize, Serialize};

use crate::{
    domain::{ChatMessage, Site, UserRole},
    error::ApiError,
};

pub const EMPTY_TRANSCRIPT_SUMMARY: &str = "No feedback was provided during the session.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum CollaboratorRequest {
    Summarize { transcript: Vec<ChatMessage> },
    Submit { payload: SubmissionPayload },
}

impl CollaboratorRequest {
    pub fn action(&self) -> &'static str {
        match self {
            CollaboratorRequest::Summarize { .. } => "summarize",
            CollaboratorRequest::Submit { .. } => "submit",
        }
    }
}

/// Row appended by the submission collaborator. Missing fields are accepted
/// and stored as `N/A` on the receiving side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub site_area: String,
    #[serde(default)]
    pub site_type: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub transcript: String,
}

impl SubmissionPayload {
    pub fn new(
        role: UserRole,
        site: Site,
        summary: impl Into<String>,
        transcript: impl Into<String>,
    ) -> Self {
        Self {
            role: role.label().to_string(),
            site_area: site.area.label().to_string(),
            site_type: site.kind.label().to_string(),
            summary: summary.into(),
            transcript: transcript.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultStatus {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CollaboratorResponse {
    Summary {
        summary: String,
    },
    Status {
        result: ResultStatus,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
}

impl CollaboratorResponse {
    pub fn success() -> Self {
        CollaboratorResponse::Status {
            result: ResultStatus::Success,
            message: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        CollaboratorResponse::Status {
            result: ResultStatus::Error,
            message: Some(message.into()),
        }
    }
}

impl From<ApiError> for CollaboratorResponse {
    fn from(value: ApiError) -> Self {
        CollaboratorResponse::error(value.message)
    }
}
