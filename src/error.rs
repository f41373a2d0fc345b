//! Mimir error types

/// Mimir error types
#[derive(Debug, thiserror::Error)]
pub enum MimirError {
    // Provider/network errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("{backend} API error ({status}): {message}")]
    Api {
        backend: &'static str,
        status: u16,
        message: String,
    },

    #[error("empty response from {backend}")]
    EmptyResponse { backend: &'static str },

    #[error("failed to parse {backend} response as JSON: {message}")]
    ResponseParse {
        backend: &'static str,
        message: String,
    },

    // Configuration errors
    #[error("unsupported backend: {0}")]
    UnsupportedBackend(String),

    #[error("missing credential: {key} is required")]
    MissingCredential { key: &'static str },

    #[error("no provider credentials available")]
    NoProviderAvailable,

    /// Guard for the orchestrator loop exiting without a result or a
    /// recorded error. Unreachable given the loop's own return paths.
    #[error("all generation attempts failed")]
    AllAttemptsFailed,

    // Review/store errors
    #[error("question not found: {0}")]
    QuestionNotFound(String),

    /// Error channel for [`QuestionStore`](crate::review::QuestionStore)
    /// implementations backed by a real database.
    #[error("store error: {0}")]
    Store(String),

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MimirError {
    /// Whether the fallback engine may absorb this error and advance to the
    /// next tier. Configuration errors are terminal before any network call;
    /// everything a single adapter attempt can produce is worth retrying
    /// against a costlier tier.
    pub fn is_tier_retryable(&self) -> bool {
        matches!(
            self,
            MimirError::Http(_)
                | MimirError::Api { .. }
                | MimirError::EmptyResponse { .. }
                | MimirError::ResponseParse { .. }
        )
    }
}

/// Result type alias for Mimir operations
pub type Result<T> = std::result::Result<T, MimirError>;
