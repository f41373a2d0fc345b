//! Adapter construction and the default-provider service.
//!
//! `create` builds an adapter for a backend. String identifiers are handled
//! by `Backend::from_str`, which rejects unknown backends with
//! `UnsupportedBackend` before construction is attempted.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::anthropic::AnthropicProvider;
use super::gemini::GeminiProvider;
use super::openai::OpenAiProvider;
use super::traits::GenerateProvider;
use crate::Result;
use crate::config::ProviderConfig;
use crate::types::Backend;

/// Construct an adapter for a backend with its default wire endpoints.
pub fn create(backend: Backend, api_key: &str, model: Option<&str>) -> Arc<dyn GenerateProvider> {
    match backend {
        Backend::Gemini => Arc::new(GeminiProvider::new(api_key, model)),
        Backend::OpenAi => Arc::new(OpenAiProvider::new(api_key, model)),
        Backend::Anthropic => Arc::new(AnthropicProvider::new(api_key, model)),
    }
}

/// Seam between the fallback engine and adapter construction.
///
/// The engine instantiates a fresh adapter per tier attempt; substituting
/// this trait lets tests observe tier order without any network.
pub trait ProviderFactory: Send + Sync {
    fn create(
        &self,
        backend: Backend,
        api_key: &str,
        model: Option<&str>,
    ) -> Arc<dyn GenerateProvider>;
}

/// Real factory building reqwest-backed adapters.
///
/// Base URLs can be overridden per backend for testing with wiremock.
#[derive(Default)]
pub struct HttpProviderFactory {
    base_urls: HashMap<Backend, String>,
}

impl HttpProviderFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route one backend's traffic to a custom base URL.
    pub fn base_url(mut self, backend: Backend, url: impl Into<String>) -> Self {
        self.base_urls.insert(backend, url.into());
        self
    }
}

impl ProviderFactory for HttpProviderFactory {
    fn create(
        &self,
        backend: Backend,
        api_key: &str,
        model: Option<&str>,
    ) -> Arc<dyn GenerateProvider> {
        match self.base_urls.get(&backend) {
            None => create(backend, api_key, model),
            Some(url) => match backend {
                Backend::Gemini => Arc::new(GeminiProvider::with_base_url(api_key, model, url)),
                Backend::OpenAi => Arc::new(OpenAiProvider::with_base_url(api_key, model, url)),
                Backend::Anthropic => {
                    Arc::new(AnthropicProvider::with_base_url(api_key, model, url))
                }
            },
        }
    }
}

/// Process-lifetime service owning the default provider.
///
/// Constructed once at application startup (typically via [`from_env`]) and
/// passed by dependency injection into request handlers, rather than living
/// as a lazily-populated module-level global. The adapter itself is built
/// lazily on first use and cached for the remainder of the service's life;
/// configuration is immutable post-startup, so the cache never invalidates
/// outside of [`reset`].
///
/// [`from_env`]: ProviderService::from_env
/// [`reset`]: ProviderService::reset
pub struct ProviderService {
    config: ProviderConfig,
    // Lazy init must survive multi-threaded hosts; a lost write race would
    // construct the adapter twice, so initialization holds the write lock.
    cached: RwLock<Option<Arc<dyn GenerateProvider>>>,
}

impl ProviderService {
    pub fn new(config: ProviderConfig) -> Self {
        Self {
            config,
            cached: RwLock::new(None),
        }
    }

    /// Resolve configuration from the environment. Fails with
    /// `MissingCredential` naming the absent variable.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(ProviderConfig::from_env()?))
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// The configured default provider, built on first call.
    pub fn default_provider(&self) -> Arc<dyn GenerateProvider> {
        if let Some(provider) = self
            .cached
            .read()
            .expect("provider cache lock poisoned")
            .as_ref()
        {
            return Arc::clone(provider);
        }

        let mut cached = self.cached.write().expect("provider cache lock poisoned");
        // Another thread may have initialized between the read and write lock.
        if let Some(provider) = cached.as_ref() {
            return Arc::clone(provider);
        }
        let provider = create(
            self.config.backend,
            &self.config.api_key,
            self.config.model.as_deref(),
        );
        *cached = Some(Arc::clone(&provider));
        provider
    }

    /// Clear the cached adapter. Intended for test isolation only.
    pub fn reset(&self) {
        *self.cached.write().expect("provider cache lock poisoned") = None;
    }
}
