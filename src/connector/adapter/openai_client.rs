use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use crate::application::CompletionClient;
use crate::domain::{DomainError, GenerationParams, PromptMessage};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
const COMPLETIONS_PATH: &str = "/v1/chat/completions";

/// Chat Completions API request payload.
#[derive(Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    messages: Vec<ApiMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
    presence_penalty: f32,
    frequency_penalty: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct ApiMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

/// Minimal subset of the completion object we read.
#[derive(Deserialize)]
struct ApiResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// HTTP client for the OpenAI Chat Completions API (and compatible servers).
///
/// The underlying `reqwest::Client` is built on the first call and reused
/// afterwards. Building it requires an API key: without one every call fails
/// with [`DomainError::Configuration`] before anything is sent. Concurrent
/// first calls share a single initialization.
///
/// Configuration via environment (see [`OpenAiClient::from_env`]):
///
/// ```text
/// OPENAI_API_KEY=sk-...
/// OPENAI_MODEL=gpt-4o-mini
/// OPENAI_BASE_URL=https://api.openai.com
/// ```
pub struct OpenAiClient {
    http: OnceCell<reqwest::Client>,
    api_key: String,
    model: String,
    /// Full endpoint URL (base + COMPLETIONS_PATH).
    url: String,
}

impl OpenAiClient {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let base: String = base_url.into();
        let url = format!("{}{}", base.trim_end_matches('/'), COMPLETIONS_PATH);
        Self {
            http: OnceCell::new(),
            api_key: api_key.into(),
            model: model.into(),
            url,
        }
    }

    /// Construct from environment variables:
    ///
    /// | Variable          | Default                  |
    /// |-------------------|--------------------------|
    /// | `OPENAI_API_KEY`  | `""` (calls will fail)   |
    /// | `OPENAI_MODEL`    | `gpt-4o-mini`            |
    /// | `OPENAI_BASE_URL` | `https://api.openai.com` |
    pub fn from_env() -> Self {
        let key = std::env::var("OPENAI_API_KEY").unwrap_or_default();
        let model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let base =
            std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(key, model, base)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn http_client(&self) -> Result<&reqwest::Client, DomainError> {
        self.http
            .get_or_try_init(|| async {
                if self.api_key.trim().is_empty() {
                    return Err(DomainError::configuration(
                        "OpenAI API key is not configured",
                    ));
                }

                let mut headers = HeaderMap::new();
                let bearer = HeaderValue::from_str(&format!("Bearer {}", self.api_key))
                    .map_err(|e| {
                        DomainError::configuration(format!("invalid API key header value: {e}"))
                    })?;
                headers.insert(AUTHORIZATION, bearer);

                debug!("Initializing OpenAI HTTP client for {}", self.url);
                reqwest::Client::builder()
                    .default_headers(headers)
                    .build()
                    .map_err(|e| {
                        DomainError::configuration(format!("failed to build HTTP client: {e}"))
                    })
            })
            .await
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(
        &self,
        messages: &[PromptMessage],
        params: &GenerationParams,
    ) -> Result<String, DomainError> {
        let client = self.http_client().await?;

        let request = ApiRequest {
            model: &self.model,
            messages: messages
                .iter()
                .map(|m| ApiMessage {
                    role: m.role.as_str(),
                    content: &m.content,
                })
                .collect(),
            temperature: params.temperature,
            max_tokens: params.max_tokens,
            top_p: params.top_p,
            presence_penalty: params.presence_penalty,
            frequency_penalty: params.frequency_penalty,
            response_format: params.json_response.then_some(ResponseFormat {
                kind: "json_object",
            }),
        };

        let response = client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                DomainError::transport(
                    e.status().map(|s| s.as_u16()),
                    format!("OpenAiClient: request failed: {e}"),
                )
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("OpenAiClient: API returned {status}: {body}");
            return Err(DomainError::transport(
                Some(status.as_u16()),
                format!("OpenAiClient: API returned {status}"),
            ));
        }

        let api_response: ApiResponse = response.json().await.map_err(|e| {
            DomainError::transport(None, format!("OpenAiClient: failed to decode response: {e}"))
        })?;

        Ok(api_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .unwrap_or_else(|| "{}".to_string()))
    }
}
