//! Generation request and option types.

/// Options for a single adapter call (backend-agnostic).
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Injected as a system-role message or parameter, per backend.
    pub system_instruction: Option<String>,
    /// Sampling randomness 0-1. Backends that require a value default to 0.7.
    pub temperature: Option<f32>,
    /// Generation cap in tokens.
    pub max_tokens: Option<u32>,
    /// Override of the adapter instance's default model.
    pub model: Option<String>,
}

impl GenerateOptions {
    pub fn system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    pub fn temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }

    pub fn max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

/// A natural-language generation request, passed by reference through the
/// fallback pipeline and never mutated.
#[derive(Debug, Clone, Default)]
pub struct GenerationRequest {
    pub prompt: String,
    /// Data-URI or raw base64 image payload (PNG).
    pub image_base64: Option<String>,
    pub system_instruction: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Self::default()
        }
    }

    pub fn image(mut self, image_base64: impl Into<String>) -> Self {
        self.image_base64 = Some(image_base64.into());
        self
    }

    pub fn system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    pub fn temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }

    pub fn max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    /// Adapter options for one tier attempt. The model is left to the tier.
    pub(crate) fn options(&self) -> GenerateOptions {
        GenerateOptions {
            system_instruction: self.system_instruction.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            model: None,
        }
    }
}
