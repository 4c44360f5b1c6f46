use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use shared::{
    domain::ChatMessage,
    protocol::{CollaboratorRequest, CollaboratorResponse, ResultStatus, SubmissionPayload},
};
use tracing::{debug, warn};
use url::Url;

pub mod controller;
pub mod error;
pub mod transcript;

pub use controller::{
    PendingSubmission, PendingSummary, Screen, SessionController, SessionState, SiteDraft,
    SubmissionStatus, SummaryStart, TopicDraft, Transition, View, SUMMARY_ERROR_PREFIX,
    SUMMARY_ERROR_SUFFIX,
};
pub use error::CollaboratorError;

/// Value shipped in deployment templates before an operator pastes the real URL.
pub const PLACEHOLDER_ENDPOINT: &str = "PASTE_YOUR_DEPLOYED_GOOGLE_APPS_SCRIPT_WEB_APP_URL_HERE";

const UNKNOWN_SERVER_ERROR: &str = "An unknown error occurred on the server.";
const UNKNOWN_SUBMISSION_ERROR: &str = "The server indicated a submission error.";

/// Remote service that condenses feedback and persists submissions.
#[async_trait]
pub trait Collaborator: Send + Sync {
    fn is_configured(&self) -> bool {
        true
    }

    async fn summarize(&self, transcript: &[ChatMessage]) -> Result<String, CollaboratorError>;

    async fn submit(&self, payload: &SubmissionPayload) -> Result<(), CollaboratorError>;
}

pub struct UnconfiguredCollaborator;

#[async_trait]
impl Collaborator for UnconfiguredCollaborator {
    fn is_configured(&self) -> bool {
        false
    }

    async fn summarize(&self, _transcript: &[ChatMessage]) -> Result<String, CollaboratorError> {
        Err(CollaboratorError::NotConfigured)
    }

    async fn submit(&self, _payload: &SubmissionPayload) -> Result<(), CollaboratorError> {
        Err(CollaboratorError::NotConfigured)
    }
}

/// Talks to a deployed collaborator script over HTTPS. One attempt per call.
pub struct HttpCollaborator {
    http: Client,
    endpoint: Url,
}

impl HttpCollaborator {
    pub fn new(endpoint: Url) -> Self {
        Self::with_client(Client::new(), endpoint)
    }

    pub fn with_client(http: Client, endpoint: Url) -> Self {
        Self { http, endpoint }
    }

    async fn post(
        &self,
        request: &CollaboratorRequest,
    ) -> Result<CollaboratorResponse, CollaboratorError> {
        debug!(action = request.action(), endpoint = %self.endpoint, "posting to collaborator");
        let res = self
            .http
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            warn!(
                action = request.action(),
                status = status.as_u16(),
                %body,
                "collaborator returned non-success status"
            );
            return Err(CollaboratorError::Status(status.as_u16()));
        }

        let body = res.text().await?;
        serde_json::from_str(&body).map_err(|err| CollaboratorError::Malformed(err.to_string()))
    }
}

#[async_trait]
impl Collaborator for HttpCollaborator {
    async fn summarize(&self, transcript: &[ChatMessage]) -> Result<String, CollaboratorError> {
        let request = CollaboratorRequest::Summarize {
            transcript: transcript.to_vec(),
        };
        match self.post(&request).await? {
            CollaboratorResponse::Summary { summary } => Ok(summary),
            CollaboratorResponse::Status {
                result: ResultStatus::Error,
                message,
            } => Err(CollaboratorError::Application(
                message.unwrap_or_else(|| UNKNOWN_SERVER_ERROR.to_string()),
            )),
            CollaboratorResponse::Status { .. } => Err(CollaboratorError::Malformed(
                "response did not include a summary".to_string(),
            )),
        }
    }

    async fn submit(&self, payload: &SubmissionPayload) -> Result<(), CollaboratorError> {
        let request = CollaboratorRequest::Submit {
            payload: payload.clone(),
        };
        match self.post(&request).await? {
            CollaboratorResponse::Status {
                result: ResultStatus::Success,
                ..
            } => Ok(()),
            CollaboratorResponse::Status { message, .. } => Err(CollaboratorError::Application(
                message.unwrap_or_else(|| UNKNOWN_SUBMISSION_ERROR.to_string()),
            )),
            CollaboratorResponse::Summary { .. } => Err(CollaboratorError::Application(
                UNKNOWN_SUBMISSION_ERROR.to_string(),
            )),
        }
    }
}

/// Builds the collaborator for a configured endpoint. A missing, blank, or
/// placeholder endpoint yields [`UnconfiguredCollaborator`].
pub fn connect_collaborator(
    endpoint: Option<&str>,
) -> Result<Arc<dyn Collaborator>, CollaboratorError> {
    let Some(raw) = endpoint.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return Ok(Arc::new(UnconfiguredCollaborator));
    };
    if raw.contains(PLACEHOLDER_ENDPOINT) {
        warn!("collaborator endpoint is still the placeholder; submissions disabled");
        return Ok(Arc::new(UnconfiguredCollaborator));
    }

    let endpoint = Url::parse(raw).map_err(|err| CollaboratorError::InvalidEndpoint {
        endpoint: raw.to_string(),
        reason: err.to_string(),
    })?;
    if !matches!(endpoint.scheme(), "http" | "https") {
        return Err(CollaboratorError::InvalidEndpoint {
            endpoint: raw.to_string(),
            reason: format!("unsupported scheme '{}'", endpoint.scheme()),
        });
    }
    Ok(Arc::new(HttpCollaborator::new(endpoint)))
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
