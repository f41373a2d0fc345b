//! Credential and default-provider configuration.
//!
//! Credentials come from the environment: `GEMINI_API_KEY`, `OPENAI_API_KEY`
//! and `ANTHROPIC_API_KEY`. A backend with no key is silently excluded from
//! the fallback engine's candidate tiers; only the explicitly configured
//! default provider (`AI_PROVIDER` / `AI_MODEL`) errors on a missing key.

use std::str::FromStr;

use crate::types::Backend;
use crate::{MimirError, Result};

/// Environment variable naming the default backend.
pub const PROVIDER_ENV_KEY: &str = "AI_PROVIDER";
/// Environment variable overriding the default backend's model.
pub const MODEL_ENV_KEY: &str = "AI_MODEL";

/// Per-backend API keys available to the fallback engine.
#[derive(Debug, Clone, Default)]
pub struct CredentialMap {
    pub gemini: Option<String>,
    pub openai: Option<String>,
    pub anthropic: Option<String>,
}

impl CredentialMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read all backend keys from the environment. Absent or empty variables
    /// exclude the backend rather than erroring.
    pub fn from_env() -> Self {
        Self {
            gemini: env_non_empty(Backend::Gemini.env_key()),
            openai: env_non_empty(Backend::OpenAi.env_key()),
            anthropic: env_non_empty(Backend::Anthropic.env_key()),
        }
    }

    pub fn gemini(mut self, key: impl Into<String>) -> Self {
        self.gemini = Some(key.into());
        self
    }

    pub fn openai(mut self, key: impl Into<String>) -> Self {
        self.openai = Some(key.into());
        self
    }

    pub fn anthropic(mut self, key: impl Into<String>) -> Self {
        self.anthropic = Some(key.into());
        self
    }

    /// API key for a backend, if configured.
    pub fn key_for(&self, backend: Backend) -> Option<&str> {
        match backend {
            Backend::Gemini => self.gemini.as_deref(),
            Backend::OpenAi => self.openai.as_deref(),
            Backend::Anthropic => self.anthropic.as_deref(),
        }
    }

    pub fn is_empty(&self) -> bool {
        Backend::ALL.iter().all(|b| self.key_for(*b).is_none())
    }
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Configuration for the process-wide default provider.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub backend: Backend,
    pub api_key: String,
    pub model: Option<String>,
}

impl ProviderConfig {
    pub fn new(backend: Backend, api_key: impl Into<String>) -> Self {
        Self {
            backend,
            api_key: api_key.into(),
            model: None,
        }
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Resolve the default backend, key and model from the environment.
    ///
    /// The backend defaults to gemini when `AI_PROVIDER` is unset. Unlike
    /// [`CredentialMap::from_env`], a missing key for the configured backend
    /// is an error naming the absent variable.
    pub fn from_env() -> Result<Self> {
        let backend = match env_non_empty(PROVIDER_ENV_KEY) {
            Some(name) => Backend::from_str(&name)?,
            None => Backend::Gemini,
        };
        let api_key = env_non_empty(backend.env_key()).ok_or(MimirError::MissingCredential {
            key: backend.env_key(),
        })?;
        Ok(Self {
            backend,
            api_key,
            model: env_non_empty(MODEL_ENV_KEY),
        })
    }
}
