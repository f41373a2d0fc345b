//! Google Gemini adapter (generateContent endpoint).
//!
//! Gemini has a native structured-output mode: every call requests
//! `application/json` via `generationConfig.responseMimeType`, so JSON
//! operations parse the response text directly.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::traits::GenerateProvider;
use super::{IMAGE_MIME_TYPE, image_payload, parse_json_response};
use crate::types::{Backend, GenerateOptions};
use crate::{MimirError, Result};

/// Default base URL for the Gemini API.
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Default model when neither the instance nor the options override it.
const DEFAULT_MODEL: &str = "gemini-2.5-flash-preview-09-2025";

/// Adapter for the Gemini generateContent API.
#[derive(Clone)]
pub struct GeminiProvider {
    api_key: String,
    http: Client,
    base_url: String,
    default_model: String,
}

impl GeminiProvider {
    /// Create a new Gemini adapter with an optional default-model override.
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
        let mut parts = vec![Part {
            text: Some(prompt),
            inline_data: None,
        }];
        if let Some(image) = image_base64 {
            parts.push(Part {
                text: None,
                inline_data: Some(InlineData {
                    mime_type: IMAGE_MIME_TYPE,
                    data: image_payload(image),
                }),
            });
        }

        let model = options.model.as_deref().unwrap_or(&self.default_model);
        // Gemini authenticates via a query parameter, not a header.
        let url = format!("{}/{}:generateContent?key={}", self.base_url, model, self.api_key);

        let request = GenerateContentRequest {
            contents: [Content { parts }],
            system_instruction: options
                .system_instruction
                .as_deref()
                .map(|text| SystemInstruction {
                    parts: [Part {
                        text: Some(text),
                        inline_data: None,
                    }],
                }),
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                temperature: options.temperature,
                max_output_tokens: options.max_tokens,
            },
        };

        let response = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| MimirError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MimirError::Api {
                backend: Backend::Gemini.as_str(),
                status: status.as_u16(),
                message: body,
            });
        }

        let data: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| MimirError::Http(e.to_string()))?;

        data.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.text)
            .ok_or(MimirError::EmptyResponse {
                backend: Backend::Gemini.as_str(),
            })
    }
}

#[async_trait]
impl GenerateProvider for GeminiProvider {
    fn backend(&self) -> Backend {
        Backend::Gemini
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
        parse_json_response(Backend::Gemini, &response)
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
        parse_json_response(Backend::Gemini, &response)
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    system_instruction: Option<SystemInstruction<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct SystemInstruction<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(rename = "maxOutputTokens", skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Serialize)]
struct Part<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
    #[serde(rename = "inlineData", skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData<'a>>,
}

#[derive(Serialize)]
struct InlineData<'a> {
    #[serde(rename = "mimeType")]
    mime_type: &'static str,
    data: &'a str,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}
