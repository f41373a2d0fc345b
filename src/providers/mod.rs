//! Provider adapters normalizing three wire protocols into the uniform
//! [`GenerateProvider`](traits::GenerateProvider) capability surface.
//!
//! Adapters are pure transport shims: no retries, no fallback. Tier retry is
//! the fallback engine's responsibility.

pub mod anthropic;
pub mod factory;
pub mod gemini;
pub mod openai;
pub mod traits;

pub use anthropic::AnthropicProvider;
pub use factory::{HttpProviderFactory, ProviderFactory, ProviderService, create};
pub use gemini::GeminiProvider;
pub use openai::OpenAiProvider;
pub use traits::GenerateProvider;

use crate::types::Backend;
use crate::{MimirError, Result};

/// Literal instruction appended to prompts for backends without a native
/// structured-output mode.
pub(crate) const JSON_PROMPT_SUFFIX: &str =
    "Please respond with valid JSON only, no markdown formatting.";

/// Strip leading/trailing triple-backtick fences (optionally tagged `json`)
/// from a model response. The trailing fence is only removed when a leading
/// fence was present, matching the wire contract exactly.
pub fn strip_code_fences(text: &str) -> &str {
    let mut stripped = text.trim();
    if let Some(rest) = stripped.strip_prefix("```json") {
        stripped = rest;
    } else if let Some(rest) = stripped.strip_prefix("```") {
        stripped = rest;
    } else {
        return stripped;
    }
    stripped = stripped.trim_start();
    if let Some(rest) = stripped.strip_suffix("```") {
        stripped = rest.trim_end();
    }
    stripped
}

/// Parse a model response as JSON, stripping residual code fences first.
pub(crate) fn parse_json_response(backend: Backend, text: &str) -> Result<serde_json::Value> {
    serde_json::from_str(strip_code_fences(text)).map_err(|e| MimirError::ResponseParse {
        backend: backend.as_str(),
        message: e.to_string(),
    })
}

/// Extract the transmittable payload from a data-URI or raw base64 string.
/// Only the substring after a `base64,` marker is sent when one is present.
pub(crate) fn image_payload(image_base64: &str) -> &str {
    match image_base64.split_once("base64,") {
        Some((_, data)) => data,
        None => image_base64,
    }
}

/// Image MIME type, fixed per call.
pub(crate) const IMAGE_MIME_TYPE: &str = "image/png";
