use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use shared::{
    domain::ChatMessage,
    error::{ApiError, ErrorCode},
    protocol::{CollaboratorRequest, CollaboratorResponse, SubmissionPayload, EMPTY_TRANSCRIPT_SUMMARY},
};
use storage::{ResponseId, Storage};
use tracing::{info, warn};

const NOT_AVAILABLE: &str = "N/A";

const PROMPT_HEADER: &str = "Your task is to analyze a list of user-submitted feedback points about workflow issues and extract ONLY the problems and pain points.

- Do NOT suggest solutions, improvements, or next steps.
- Do NOT add any introductory or concluding sentences.
- The output must be a simple, concise bulleted list.
- Each bullet point should directly state a pain point identified by the user in their feedback.

User Feedback:
---
";

const PROMPT_FOOTER: &str = "
---

Pain Points Identified:";

/// Text-generation backend used to condense feedback into pain points.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn complete(&self, prompt: &str) -> anyhow::Result<String>;
}

#[derive(Clone)]
pub struct ApiContext {
    pub storage: Storage,
    pub summarizer: Option<Arc<dyn Summarizer>>,
}

pub fn build_prompt(transcript: &[ChatMessage]) -> String {
    let feedback = transcript
        .iter()
        .map(|message| format!("- {}", message.content))
        .collect::<Vec<_>>()
        .join("\n");
    format!("{PROMPT_HEADER}{feedback}{PROMPT_FOOTER}")
}

pub async fn summarize(ctx: &ApiContext, transcript: &[ChatMessage]) -> Result<String, ApiError> {
    let Some(summarizer) = ctx.summarizer.as_ref() else {
        return Err(ApiError::new(
            ErrorCode::NotConfigured,
            "API_KEY is not set. Configure the summarizer API key on the collaborator service.",
        ));
    };

    if transcript.is_empty() {
        return Ok(EMPTY_TRANSCRIPT_SUMMARY.to_string());
    }

    let prompt = build_prompt(transcript);
    let summary = summarizer.complete(&prompt).await.map_err(|err| {
        warn!(error = %err, "summarizer call failed");
        ApiError::new(ErrorCode::Upstream, err.to_string())
    })?;
    info!(entries = transcript.len(), "summary generated");
    Ok(summary)
}

pub async fn submit(ctx: &ApiContext, payload: &SubmissionPayload) -> Result<ResponseId, ApiError> {
    let row = SubmissionPayload {
        role: or_not_available(&payload.role),
        site_area: or_not_available(&payload.site_area),
        site_type: or_not_available(&payload.site_type),
        summary: or_not_available(&payload.summary),
        transcript: or_not_available(&payload.transcript),
    };
    let response_id = ctx
        .storage
        .append_response(&row, Utc::now())
        .await
        .map_err(internal)?;
    info!(response_id = response_id.0, role = %row.role, "form response stored");
    Ok(response_id)
}

/// Routes one raw request body by its `action` field. Every failure is
/// reported in the body, never as a transport error.
pub async fn dispatch(ctx: &ApiContext, body: &[u8]) -> CollaboratorResponse {
    let value: serde_json::Value = match serde_json::from_slice(body) {
        Ok(value) => value,
        Err(err) => return ApiError::new(ErrorCode::Validation, err.to_string()).into(),
    };

    let action = value.get("action").and_then(|action| action.as_str());
    if !matches!(action, Some("summarize" | "submit")) {
        return ApiError::new(ErrorCode::InvalidAction, "Invalid action specified.").into();
    }

    let request: CollaboratorRequest = match serde_json::from_value(value) {
        Ok(request) => request,
        Err(err) => return ApiError::new(ErrorCode::Validation, err.to_string()).into(),
    };

    match request {
        CollaboratorRequest::Summarize { transcript } => match summarize(ctx, &transcript).await {
            Ok(summary) => CollaboratorResponse::Summary { summary },
            Err(err) => err.into(),
        },
        CollaboratorRequest::Submit { payload } => match submit(ctx, &payload).await {
            Ok(_) => CollaboratorResponse::success(),
            Err(err) => err.into(),
        },
    }
}

fn or_not_available(value: &str) -> String {
    if value.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        value.to_string()
    }
}

fn internal(err: anyhow::Error) -> ApiError {
    ApiError::new(ErrorCode::Internal, err.to_string())
}
