//! OpenAI adapter (chat completions endpoint).
//!
//! OpenAI has a native structured-output mode: every call requests
//! `response_format: json_object`, so JSON operations parse the message
//! content directly.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::traits::GenerateProvider;
use super::{image_payload, parse_json_response};
use crate::types::{Backend, GenerateOptions};
use crate::{MimirError, Result};

/// Default base URL for the OpenAI API.
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default model when neither the instance nor the options override it.
const DEFAULT_MODEL: &str = "gpt-4o";

/// Sampling temperature when the caller leaves it unset.
const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Adapter for the OpenAI chat completions API.
#[derive(Clone)]
pub struct OpenAiProvider {
    api_key: String,
    http: Client,
    base_url: String,
    default_model: String,
}

impl OpenAiProvider {
    /// Create a new OpenAI adapter with an optional default-model override.
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
        let url = format!("{}/chat/completions", self.base_url);

        let mut messages = Vec::with_capacity(2);
        if let Some(instruction) = options.system_instruction.as_deref() {
            messages.push(ChatMessage {
                role: "system",
                content: MessageContent::Text(instruction),
            });
        }

        let mut content = vec![ContentPart::Text { text: prompt }];
        if let Some(image) = image_base64 {
            content.push(ContentPart::ImageUrl {
                image_url: ImageUrl {
                    url: format!("data:image/png;base64,{}", image_payload(image)),
                },
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: MessageContent::Parts(content),
        });

        let request = ChatRequest {
            model,
            messages,
            temperature: options.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            max_tokens: options.max_tokens,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        let response = self
            .http
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| MimirError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MimirError::Api {
                backend: Backend::OpenAi.as_str(),
                status: status.as_u16(),
                message: body,
            });
        }

        let data: ChatResponse = response
            .json()
            .await
            .map_err(|e| MimirError::Http(e.to_string()))?;

        data.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|text| !text.is_empty())
            .ok_or(MimirError::EmptyResponse {
                backend: Backend::OpenAi.as_str(),
            })
    }
}

#[async_trait]
impl GenerateProvider for OpenAiProvider {
    fn backend(&self) -> Backend {
        Backend::OpenAi
    }

    async fn generate_text(&self, prompt: &str, options: &GenerateOptions) -> Result<String> {
        self.call_api(prompt, None, options).await
    }

    async fn generate_json(
        &self,
        prompt: &str,
        options: &GenerateOptions,
    ) -> Result<serde_json::Value> {
        let response = self.call_api(prompt, None, options).await?;
        parse_json_response(Backend::OpenAi, &response)
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
        let response = self.call_api(prompt, Some(image_base64), options).await?;
        parse_json_response(Backend::OpenAi, &response)
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: MessageContent<'a>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum MessageContent<'a> {
    Text(&'a str),
    Parts(Vec<ContentPart<'a>>),
}

#[derive(Serialize)]
#[serde(tag = "type")]
enum ContentPart<'a> {
    #[serde(rename = "text")]
    Text { text: &'a str },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}
