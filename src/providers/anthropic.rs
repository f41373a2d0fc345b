//! Anthropic adapter (messages endpoint).
//!
//! Anthropic has no native structured-output mode: JSON operations append a
//! prompt suffix requesting bare JSON and strip residual markdown code
//! fences before parsing.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::traits::GenerateProvider;
use super::{IMAGE_MIME_TYPE, JSON_PROMPT_SUFFIX, image_payload, parse_json_response};
use crate::types::{Backend, GenerateOptions};
use crate::{MimirError, Result};

/// Default base URL for the Anthropic API.
const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";

/// Default model when neither the instance nor the options override it.
const DEFAULT_MODEL: &str = "claude-3-5-sonnet-20241022";

/// The messages endpoint requires max_tokens; cap when the caller is silent.
const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Sampling temperature when the caller leaves it unset.
const DEFAULT_TEMPERATURE: f32 = 0.7;

const API_VERSION: &str = "2023-06-01";

/// Adapter for the Anthropic messages API.
#[derive(Clone)]
pub struct AnthropicProvider {
    api_key: String,
    http: Client,
    base_url: String,
    default_model: String,
}

impl AnthropicProvider {
    /// Create a new Anthropic adapter with an optional default-model override.
    pub fn new(api_key: impl Into<String>, model: Option<&str>) -> Self {
        Self::with_base_url(api_key, model, DEFAULT_BASE_URL)
    }

    /// Create an adapter with a custom base URL (for testing with wiremock).
    pub fn with_base_url(
        api_key: impl Into<String>,
        model: Option<&str>,
        base_url: impl Into<String>,
    ) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .expect("failed to build HTTP client");

        Self {
            api_key: api_key.into(),
            http,
            base_url: base_url.into(),
            default_model: model.unwrap_or(DEFAULT_MODEL).to_string(),
        }
    }

    async fn call_api(
        &self,
        prompt: &str,
        image_base64: Option<&str>,
        options: &GenerateOptions,
    ) -> Result<String> {
        let model = options.model.as_deref().unwrap_or(&self.default_model);
        let url = format!("{}/messages", self.base_url);

        let mut content = vec![ContentBlock::Text { text: prompt }];
        if let Some(image) = image_base64 {
            content.push(ContentBlock::Image {
                source: ImageSource {
                    kind: "base64",
                    media_type: IMAGE_MIME_TYPE,
                    data: image_payload(image),
                },
            });
        }

        let request = MessagesRequest {
            model,
            messages: [Message {
                role: "user",
                content,
            }],
            max_tokens: options.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            temperature: options.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            system: options.system_instruction.as_deref(),
        };

        let response = self
            .http
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| MimirError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MimirError::Api {
                backend: Backend::Anthropic.as_str(),
                status: status.as_u16(),
                message: body,
            });
        }

        let data: MessagesResponse = response
            .json()
            .await
            .map_err(|e| MimirError::Http(e.to_string()))?;

        data.content
            .into_iter()
            .next()
            .and_then(|block| block.text)
            .ok_or(MimirError::EmptyResponse {
                backend: Backend::Anthropic.as_str(),
            })
    }

    fn json_prompt(prompt: &str) -> String {
        format!("{prompt}\n\n{JSON_PROMPT_SUFFIX}")
    }
}

#[async_trait]
impl GenerateProvider for AnthropicProvider {
    fn backend(&self) -> Backend {
        Backend::Anthropic
    }

    async fn generate_text(&self, prompt: &str, options: &GenerateOptions) -> Result<String> {
        self.call_api(prompt, None, options).await
    }

    async fn generate_json(
        &self,
        prompt: &str,
        options: &GenerateOptions,
    ) -> Result<serde_json::Value> {
        let response = self
            .call_api(&Self::json_prompt(prompt), None, options)
            .await?;
        parse_json_response(Backend::Anthropic, &response)
    }

    async fn generate_with_image(
        &self,
        prompt: &str,
        image_base64: &str,
        options: &GenerateOptions,
    ) -> Result<String> {
        self.call_api(prompt, Some(image_base64), options).await
    }

    async fn generate_json_with_image(
        &self,
        prompt: &str,
        image_base64: &str,
        options: &GenerateOptions,
    ) -> Result<serde_json::Value> {
        let response = self
            .call_api(&Self::json_prompt(prompt), Some(image_base64), options)
            .await?;
        parse_json_response(Backend::Anthropic, &response)
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    messages: [Message<'a>; 1],
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: Vec<ContentBlock<'a>>,
}

#[derive(Serialize)]
#[serde(tag = "type")]
enum ContentBlock<'a> {
    #[serde(rename = "text")]
    Text { text: &'a str },
    #[serde(rename = "image")]
    Image { source: ImageSource<'a> },
}

#[derive(Serialize)]
struct ImageSource<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    media_type: &'static str,
    data: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ResponseBlock>,
}

#[derive(Deserialize)]
struct ResponseBlock {
    text: Option<String>,
}
