//! Terminal value returned by the fallback engine.

use super::Backend;

/// Result of a fallback generation run, with provenance.
///
/// `attempts_made` is bounded by the configured maximum and by the number of
/// tiers with available credentials. A populated `quality_score` below the
/// engine's minimum marks a best-effort result returned after exhausting all
/// permitted attempts; callers needing a hard quality floor must inspect it.
#[derive(Debug, Clone)]
pub struct FallbackOutcome<T = serde_json::Value> {
    pub result: T,
    pub model_used: String,
    pub backend_used: Backend,
    pub attempts_made: usize,
    pub quality_score: Option<u8>,
}
