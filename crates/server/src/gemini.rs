use anyhow::{anyhow, Context};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use server_api::Summarizer;
use tracing::debug;

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Calls the Gemini `generateContent` endpoint with a single user turn.
pub struct GeminiSummarizer {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiSummarizer {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        )
    }
}

#[async_trait]
impl Summarizer for GeminiSummarizer {
    async fn complete(&self, prompt: &str) -> anyhow::Result<String> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        debug!(model = %self.model, "requesting gemini completion");
        let response = self
            .client
            .post(self.endpoint())
            .json(&body)
            .send()
            .await
            .context("gemini request failed")?;

        let status = response.status();
        let text = response
            .text()
            .await
            .context("failed to read gemini response")?;
        if !status.is_success() {
            return Err(map_http_error(status, &text));
        }

        let parsed: GenerateContentResponse =
            serde_json::from_str(&text).context("failed to decode gemini response")?;
        extract_text_response(parsed)
    }
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

fn extract_text_response(response: GenerateContentResponse) -> anyhow::Result<String> {
    response
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().find_map(|part| part.text))
        .ok_or_else(|| anyhow!("Gemini API returned no text in the response candidates"))
}

fn map_http_error(status: StatusCode, body: &str) -> anyhow::Error {
    let message = serde_json::from_str::<ErrorWrapper>(body)
        .map(|wrapper| {
            let msg = wrapper.error.message.unwrap_or_else(|| body.to_string());
            match wrapper.error.status {
                Some(status_text) if !status_text.is_empty() => format!("{status_text}: {msg}"),
                _ => msg,
            }
        })
        .unwrap_or_else(|_| body.to_string());
    anyhow!("Gemini API error ({}): {message}", status.as_u16())
}

#[cfg(test)]
#[path = "tests/gemini_tests.rs"]
mod tests;
