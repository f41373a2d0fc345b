//! The fallback orchestrator: tiered generation, cheapest first.

use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use tracing::{debug, error, instrument, warn};

use super::quality::{DefaultQualityGate, QualityGate};
use super::tiers::available_tiers;
use crate::config::CredentialMap;
use crate::providers::{HttpProviderFactory, ProviderFactory};
use crate::telemetry;
use crate::types::{FallbackOutcome, GenerationRequest};
use crate::{MimirError, Result};

/// Minimum quality score a verdict must reach to stop the tier walk.
const DEFAULT_MIN_QUALITY_SCORE: u8 = 6;

/// Maximum number of tiers tried per invocation.
const DEFAULT_MAX_ATTEMPTS: usize = 5;

/// Tiered generation engine.
///
/// One invocation walks the credentialed tiers in ascending-cost order,
/// gating each result, and holds no state between calls. Attempts are
/// strictly sequential: each outcome decides whether the next (costlier)
/// tier is needed at all, so parallelizing would defeat the point.
///
/// Quality shortfalls never fail a call. When attempts are exhausted the
/// engine returns the last result best-effort; only an adapter error on the
/// final permitted attempt propagates.
pub struct FallbackEngine {
    factory: Arc<dyn ProviderFactory>,
    gate: Arc<dyn QualityGate>,
    min_quality_score: u8,
    max_attempts: usize,
}

impl Default for FallbackEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl FallbackEngine {
    /// Engine with real HTTP adapters and the default heuristic gate.
    pub fn new() -> Self {
        Self::with_factory(Arc::new(HttpProviderFactory::new()))
    }

    /// Engine over a custom adapter factory (testing, base-URL overrides).
    pub fn with_factory(factory: Arc<dyn ProviderFactory>) -> Self {
        Self {
            factory,
            gate: Arc::new(DefaultQualityGate),
            min_quality_score: DEFAULT_MIN_QUALITY_SCORE,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Substitute the quality gate.
    pub fn quality_gate(mut self, gate: Arc<dyn QualityGate>) -> Self {
        self.gate = gate;
        self
    }

    /// Set the minimum acceptable quality score (1-10, default 6).
    pub fn min_quality_score(mut self, score: u8) -> Self {
        self.min_quality_score = score;
        self
    }

    /// Set the maximum number of tiers tried (default 5). With zero
    /// attempts permitted, `generate` fails with `AllAttemptsFailed`
    /// before any tier is tried.
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Generate JSON content with automatic fallback through model tiers.
    ///
    /// Tries tiers cheapest-first and returns at the first result the gate
    /// scores at or above the minimum. Adapter failures advance to the next
    /// tier; only the final permitted attempt's failure propagates.
    #[instrument(skip(self, request, keys), fields(operation = "generate"))]
    pub async fn generate(
        &self,
        request: &GenerationRequest,
        keys: &CredentialMap,
    ) -> Result<FallbackOutcome> {
        let start = Instant::now();

        let tiers = available_tiers(keys);
        if tiers.is_empty() {
            record_request(start, false);
            return Err(MimirError::NoProviderAvailable);
        }

        let limit = self.max_attempts.min(tiers.len());
        if limit == 0 {
            // max_attempts(0): no attempt is permitted, so no tier was tried.
            record_request(start, false);
            return Err(MimirError::AllAttemptsFailed);
        }
        let options = request.options();
        let mut last_err: Option<MimirError> = None;
        let mut last_result: Option<Value> = None;

        for (index, tier) in tiers.iter().take(limit).enumerate() {
            let attempt = index + 1;
            let api_key = keys
                .key_for(tier.backend)
                .ok_or(MimirError::NoProviderAvailable)?;
            let provider = self.factory.create(tier.backend, api_key, Some(tier.model));

            let generated = match &request.image_base64 {
                Some(image) => {
                    provider
                        .generate_json_with_image(&request.prompt, image, &options)
                        .await
                }
                None => provider.generate_json(&request.prompt, &options).await,
            };

            let result = match generated {
                Ok(result) => {
                    record_attempt(tier.backend.as_str(), true);
                    result
                }
                Err(e) => {
                    record_attempt(tier.backend.as_str(), false);
                    warn!(
                        backend = tier.backend.as_str(),
                        model = tier.model,
                        attempt,
                        error = %e,
                        "generation attempt failed"
                    );
                    if attempt == limit || !e.is_tier_retryable() {
                        record_request(start, false);
                        return Err(e);
                    }
                    last_err = Some(e);
                    continue;
                }
            };

            let verdict = self.gate.check(&result, &request.prompt).await;
            let meets_minimum =
                verdict.is_valid && verdict.score.unwrap_or(0) >= self.min_quality_score;

            if meets_minimum || attempt == limit {
                if !meets_minimum {
                    // Out of cheaper options: degrade to best-effort rather
                    // than blocking the caller on mediocre quality.
                    warn!(
                        backend = tier.backend.as_str(),
                        model = tier.model,
                        attempt,
                        score = verdict.score,
                        reason = verdict.reason.as_deref(),
                        "returning sub-threshold result after exhausting attempts"
                    );
                }
                record_request(start, true);
                return Ok(FallbackOutcome {
                    result,
                    model_used: tier.model.to_string(),
                    backend_used: tier.backend,
                    attempts_made: attempt,
                    quality_score: verdict.score,
                });
            }

            debug!(
                backend = tier.backend.as_str(),
                model = tier.model,
                attempt,
                score = verdict.score,
                "quality below threshold, advancing to next tier"
            );
            last_result = Some(result);
        }

        // Unreachable: the loop returns on its final attempt in both the
        // success and error arms. Kept as an invariant-violation guard so a
        // future regression surfaces loudly instead of dropping a result.
        error!("fallback loop exited without returning");
        debug_assert!(false, "fallback loop exited without returning");
        if let Some(result) = last_result {
            let cheapest = tiers[0];
            record_request(start, true);
            return Ok(FallbackOutcome {
                result,
                model_used: cheapest.model.to_string(),
                backend_used: cheapest.backend,
                attempts_made: tiers.len(),
                quality_score: None,
            });
        }
        record_request(start, false);
        Err(last_err.unwrap_or(MimirError::AllAttemptsFailed))
    }
}

fn record_attempt(backend: &'static str, ok: bool) {
    let status = if ok { "ok" } else { "error" };
    metrics::counter!(telemetry::FALLBACK_ATTEMPTS_TOTAL,
        "backend" => backend,
        "status" => status,
    )
    .increment(1);
}

fn record_request(start: Instant, ok: bool) {
    let status = if ok { "ok" } else { "error" };
    metrics::counter!(telemetry::REQUESTS_TOTAL,
        "operation" => "generate",
        "status" => status,
    )
    .increment(1);
    metrics::histogram!(telemetry::REQUEST_DURATION_SECONDS,
        "operation" => "generate",
    )
    .record(start.elapsed().as_secs_f64());
}
