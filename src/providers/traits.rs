//! The uniform capability surface every backend adapter exposes.

use async_trait::async_trait;

use crate::Result;
use crate::types::{Backend, GenerateOptions};

/// A backend adapter: four generation operations over one wire protocol.
///
/// JSON-returning operations guarantee a parsed structured value or fail
/// with `ResponseParse`. Adapters never retry — the fallback engine owns
/// retry and tier advancement, keeping this layer a side-effect-isolated
/// transport shim.
#[async_trait]
pub trait GenerateProvider: Send + Sync {
    /// Which backend this adapter speaks to.
    fn backend(&self) -> Backend;

    /// Generate free text from a prompt.
    async fn generate_text(&self, prompt: &str, options: &GenerateOptions) -> Result<String>;

    /// Generate a parsed JSON value from a prompt.
    async fn generate_json(
        &self,
        prompt: &str,
        options: &GenerateOptions,
    ) -> Result<serde_json::Value>;

    /// Generate free text from a prompt plus an inline base64 PNG image.
    async fn generate_with_image(
        &self,
        prompt: &str,
        image_base64: &str,
        options: &GenerateOptions,
    ) -> Result<String>;

    /// Generate a parsed JSON value from a prompt plus an image.
    async fn generate_json_with_image(
        &self,
        prompt: &str,
        image_base64: &str,
        options: &GenerateOptions,
    ) -> Result<serde_json::Value>;
}
