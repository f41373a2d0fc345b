//! Telemetry metric name constants.
//!
//! Centralised metric names for mimir operations. Consumers install their
//! own `metrics` recorder (e.g. prometheus, statsd); without a recorder
//! installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `mimir_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `backend` — backend name (e.g. "gemini", "openai", "anthropic")
//! - `operation` — operation invoked (e.g. "generate", "submit_review")
//! - `status` — outcome: "ok" or "error"
//! - `entity` — cascade target: "question", "variation" or "template"

/// Total generation requests dispatched through the fallback engine.
///
/// Labels: `operation`, `status` ("ok" | "error").
pub const REQUESTS_TOTAL: &str = "mimir_requests_total";

/// Generation request duration in seconds, covering all tier attempts.
///
/// Labels: `operation`.
pub const REQUEST_DURATION_SECONDS: &str = "mimir_request_duration_seconds";

/// Total per-tier attempts made by the fallback engine.
///
/// Labels: `backend`, `status` ("ok" | "error").
pub const FALLBACK_ATTEMPTS_TOTAL: &str = "mimir_fallback_attempts_total";

/// Total hard deletes performed by the review cascade.
///
/// Labels: `entity` ("question" | "variation" | "template").
pub const CASCADE_DELETES_TOTAL: &str = "mimir_cascade_deletes_total";
