//! Gemini `generateContent` insight provider.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, instrument};

use crate::config::InsightConfig;
use crate::error::{InsightError, InsightResult};
use crate::insight::{GeneratedInsight, Insight, InsightRequest};
use crate::prompt::{render_prompt, response_schema};
use crate::provider::InsightProvider;

/// Insight provider that talks to the Gemini HTTP API.
#[derive(Clone)]
pub struct GeminiInsightProvider {
    client: Client,
    config: InsightConfig,
}

impl GeminiInsightProvider {
    /// Create a provider, validating the configuration.
    pub fn new(config: InsightConfig) -> InsightResult<Self> {
        config.validate().map_err(InsightError::InvalidConfig)?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| InsightError::InvalidConfig(format!("HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    fn build_request(request: &InsightRequest) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: render_prompt(request),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: response_schema(),
            },
        }
    }
}

#[async_trait]
impl InsightProvider for GeminiInsightProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    #[instrument(skip(self, request), fields(pair = %request.primary_pair(), model = %self.config.model))]
    async fn get_insight(&self, request: &InsightRequest) -> InsightResult<Insight> {
        let api_key = self
            .config
            .resolve_api_key()
            .ok_or_else(|| InsightError::MissingApiKey {
                var: self.config.primary_key_var().to_string(),
            })?;

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&Self::build_request(request))
            .send()
            .await
            .map_err(|e| InsightError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| InsightError::Transport(e.to_string()))?;

        let insight = interpret_response(status, &body)?;
        info!("Generated insight");
        Ok(insight)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: Value,
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

pub(crate) fn interpret_response(status: StatusCode, body: &str) -> InsightResult<Insight> {
    if !status.is_success() {
        return Err(map_http_error(status, body));
    }

    let parsed: GenerateContentResponse = serde_json::from_str(body)
        .map_err(|e| InsightError::InvalidOutput(format!("response envelope: {e}")))?;

    let text = parsed
        .candidates
        .unwrap_or_default()
        .into_iter()
        .filter_map(|candidate| candidate.content)
        .flat_map(|content| content.parts)
        .find_map(|part| part.text)
        .ok_or(InsightError::EmptyResponse)?;

    Ok(GeneratedInsight::parse(&text)?.into_insight())
}

fn map_http_error(status: StatusCode, body: &str) -> InsightError {
    let message = serde_json::from_str::<ErrorWrapper>(body)
        .map(|wrapper| {
            let status_text = wrapper.error.status.unwrap_or_default();
            let msg = wrapper.error.message.unwrap_or_else(|| body.to_string());
            if status_text.is_empty() {
                msg
            } else {
                format!("{status_text}: {msg}")
            }
        })
        .unwrap_or_else(|_| body.to_string());

    InsightError::HttpStatus {
        status: status.as_u16(),
        message,
    }
}
