//! Pluggable quality gate scoring generation results.

use async_trait::async_trait;
use serde_json::Value;

/// Verdict produced fresh per generation attempt; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualityVerdict {
    pub is_valid: bool,
    /// 1-10.
    pub score: Option<u8>,
    pub reason: Option<String>,
}

impl QualityVerdict {
    fn invalid(score: u8, reason: &str) -> Self {
        Self {
            is_valid: false,
            score: Some(score),
            reason: Some(reason.to_string()),
        }
    }
}

/// Scores a generation result 1-10 and declares it valid or invalid.
///
/// The gate may itself call out (e.g. a model-backed validator), hence the
/// async contract; the default implementation is a synchronous heuristic.
/// Substituting a domain-specific gate changes quality policy without
/// touching the orchestrator.
#[async_trait]
pub trait QualityGate: Send + Sync {
    async fn check(&self, result: &Value, prompt: &str) -> QualityVerdict;
}

/// Default heuristic gate validating JSON structure and basic quality.
///
/// Scoring: base 5, +2 when the object carries both `templateText` and
/// `variables`, +1 more for both `title` and `concepts`; capped at 10.
/// A serialized length of 50 characters or fewer overrides any score as
/// too short. Valid iff the score reaches 6.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultQualityGate;

#[async_trait]
impl QualityGate for DefaultQualityGate {
    async fn check(&self, result: &Value, _prompt: &str) -> QualityVerdict {
        let Some(object) = result.as_object() else {
            return QualityVerdict::invalid(1, "Invalid response format");
        };

        if object.is_empty() {
            return QualityVerdict::invalid(2, "Empty response");
        }

        let mut score: u8 = 5;

        // Expected question-template structure
        if has_field(object, "templateText") && has_field(object, "variables") {
            score += 2;
        }

        // Metadata
        if has_field(object, "title") && has_field(object, "concepts") {
            score += 1;
        }

        // Content should be meaningful, not just placeholders
        if result.to_string().len() <= 50 {
            return QualityVerdict::invalid(3, "Response too short or incomplete");
        }

        let score = score.min(10);
        QualityVerdict {
            is_valid: score >= 6,
            score: Some(score),
            reason: Some(
                if score >= 6 {
                    "Quality acceptable"
                } else {
                    "Quality below threshold"
                }
                .to_string(),
            ),
        }
    }
}

// Loose-truthiness field presence: null, false, 0 and "" all count as
// absent, so a degenerate `"templateText": ""` earns no structure bonus.
fn has_field(object: &serde_json::Map<String, Value>, key: &str) -> bool {
    match object.get(key) {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Number(n)) => n.as_f64() != Some(0.0),
        Some(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn null_result_is_invalid_format() {
        let verdict = DefaultQualityGate.check(&Value::Null, "p").await;
        assert!(!verdict.is_valid);
        assert_eq!(verdict.score, Some(1));
        assert_eq!(verdict.reason.as_deref(), Some("Invalid response format"));
    }

    #[tokio::test]
    async fn empty_object_scores_two() {
        let verdict = DefaultQualityGate.check(&json!({}), "p").await;
        assert!(!verdict.is_valid);
        assert_eq!(verdict.score, Some(2));
        assert_eq!(verdict.reason.as_deref(), Some("Empty response"));
    }

    #[tokio::test]
    async fn short_response_overrides_score() {
        // Has the template structure (score would be 7) but serializes
        // to 50 chars or fewer.
        let verdict = DefaultQualityGate
            .check(&json!({"templateText": "x", "variables": []}), "p")
            .await;
        assert!(!verdict.is_valid);
        assert_eq!(verdict.score, Some(3));
        assert_eq!(
            verdict.reason.as_deref(),
            Some("Response too short or incomplete")
        );
    }

    #[tokio::test]
    async fn template_structure_scores_seven() {
        let verdict = DefaultQualityGate
            .check(
                &json!({
                    "templateText": "What is {a} plus {b}?",
                    "variables": [{"name": "a"}, {"name": "b"}]
                }),
                "p",
            )
            .await;
        assert!(verdict.is_valid);
        assert_eq!(verdict.score, Some(7));
        assert_eq!(verdict.reason.as_deref(), Some("Quality acceptable"));
    }

    #[tokio::test]
    async fn metadata_adds_one_point() {
        let verdict = DefaultQualityGate
            .check(
                &json!({
                    "templateText": "What is {a} plus {b}?",
                    "variables": [{"name": "a"}],
                    "title": "Addition drill",
                    "concepts": ["addition"]
                }),
                "p",
            )
            .await;
        assert!(verdict.is_valid);
        assert_eq!(verdict.score, Some(8));
    }

    #[tokio::test]
    async fn empty_template_text_earns_no_structure_bonus() {
        let verdict = DefaultQualityGate
            .check(
                &json!({
                    "templateText": "",
                    "variables": [{"name": "a"}, {"name": "b"}, {"name": "c"}]
                }),
                "p",
            )
            .await;
        assert!(!verdict.is_valid);
        assert_eq!(verdict.score, Some(5));
        assert_eq!(verdict.reason.as_deref(), Some("Quality below threshold"));
    }

    #[tokio::test]
    async fn plain_object_below_threshold() {
        let verdict = DefaultQualityGate
            .check(
                &json!({"something": "a value long enough to pass the length heuristic easily"}),
                "p",
            )
            .await;
        assert!(!verdict.is_valid);
        assert_eq!(verdict.score, Some(5));
        assert_eq!(verdict.reason.as_deref(), Some("Quality below threshold"));
    }
}
