//! Review intake and the cascading-deletion saga.

use std::sync::Arc;
use std::time::SystemTime;

use serde::Deserialize;
use tracing::{debug, instrument};

use super::store::QuestionStore;
use crate::config::CredentialMap;
use crate::fallback::FallbackEngine;
use crate::telemetry;
use crate::types::{GenerationRequest, QuestionReview, QuestionStatus, ReviewerType};
use crate::{MimirError, Result};

/// A reviewer's verdict on one generated question.
#[derive(Debug, Clone)]
pub struct ReviewDecision {
    pub question_id: String,
    pub reviewer_id: String,
    pub reviewer_type: ReviewerType,
    pub is_valid: bool,
    /// 1-10.
    pub score: Option<u8>,
    pub feedback: String,
}

impl ReviewDecision {
    pub fn approve(question_id: impl Into<String>, reviewer_id: impl Into<String>) -> Self {
        Self {
            question_id: question_id.into(),
            reviewer_id: reviewer_id.into(),
            reviewer_type: ReviewerType::Human,
            is_valid: true,
            score: None,
            feedback: String::new(),
        }
    }

    pub fn reject(
        question_id: impl Into<String>,
        reviewer_id: impl Into<String>,
        feedback: impl Into<String>,
    ) -> Self {
        Self {
            question_id: question_id.into(),
            reviewer_id: reviewer_id.into(),
            reviewer_type: ReviewerType::Human,
            is_valid: false,
            score: None,
            feedback: feedback.into(),
        }
    }

    pub fn reviewer_type(mut self, reviewer_type: ReviewerType) -> Self {
        self.reviewer_type = reviewer_type;
        self
    }

    pub fn score(mut self, score: u8) -> Self {
        self.score = Some(score);
        self
    }
}

/// What the cascade deleted while reacting to a rejection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CascadeReport {
    pub question_deleted: bool,
    pub variation_deleted: bool,
    pub template_deleted: bool,
}

/// Outcome of a submitted review.
#[derive(Debug, Clone)]
pub struct ReviewOutcome {
    pub review_id: String,
    pub status: QuestionStatus,
    /// Populated only for rejections.
    pub cascade: Option<CascadeReport>,
}

/// Structured verdict an AI reviewer returns for one question.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionEvaluation {
    /// 1-10.
    pub score: Option<f64>,
    #[serde(default)]
    pub is_solvable: bool,
    pub feedback: Option<String>,
    pub is_valid: bool,
}

/// Consumes review decisions and maintains the template → variation →
/// question ownership chain.
pub struct ReviewWorkflow {
    store: Arc<dyn QuestionStore>,
}

impl ReviewWorkflow {
    pub fn new(store: Arc<dyn QuestionStore>) -> Self {
        Self { store }
    }

    /// Record a review verdict against a question.
    ///
    /// Appends the immutable audit record, sets the question's own status
    /// (one-shot: pending → approved | rejected) and, on rejection, runs the
    /// deletion cascade. Approval never touches the ownership chain.
    #[instrument(skip(self, decision), fields(operation = "submit_review", question = %decision.question_id))]
    pub async fn submit(&self, decision: ReviewDecision) -> Result<ReviewOutcome> {
        if self
            .store
            .find_question(&decision.question_id)
            .await?
            .is_none()
        {
            return Err(MimirError::QuestionNotFound(decision.question_id));
        }

        let review_id = self
            .store
            .insert_review(QuestionReview {
                id: String::new(),
                question_id: decision.question_id.clone(),
                reviewer_id: decision.reviewer_id.clone(),
                reviewer_type: decision.reviewer_type,
                is_valid: decision.is_valid,
                score: decision.score,
                feedback: decision.feedback.clone(),
                created_at: SystemTime::now(),
            })
            .await?;

        let status = if decision.is_valid {
            QuestionStatus::Approved
        } else {
            QuestionStatus::Rejected
        };
        let rejection_reason = (!decision.is_valid).then_some(decision.feedback.as_str());
        self.store
            .update_question_status(
                &decision.question_id,
                status,
                Some(&decision.reviewer_id),
                rejection_reason,
            )
            .await?;

        let cascade = if decision.is_valid {
            None
        } else {
            Some(self.cascade_rejection(&decision.question_id).await?)
        };

        Ok(ReviewOutcome {
            review_id,
            status,
            cascade,
        })
    }

    /// Cascading deletion after a rejection, as a three-step saga.
    ///
    /// 1. Hard-delete the rejected question (rejected generated content has
    ///    no retention value, unlike authored templates).
    /// 2. If it belonged to a variation, recount the variation's approved
    ///    questions; at zero, delete the variation and re-evaluate the
    ///    owning template across all its remaining descendants.
    /// 3. Without a variation, re-evaluate the template directly.
    ///
    /// Each step is idempotent and individually re-runnable: "already gone"
    /// is success, so a crash between steps (or a racing rejection) is
    /// recovered by simply running the cascade again.
    #[instrument(skip(self), fields(operation = "cascade", question = %question_id))]
    pub async fn cascade_rejection(&self, question_id: &str) -> Result<CascadeReport> {
        let mut report = CascadeReport::default();

        let Some(question) = self.store.find_question(question_id).await? else {
            // A concurrent rejection already cascaded this leaf.
            return Ok(report);
        };

        self.store.hard_delete_question(question_id).await?;
        report.question_deleted = true;
        record_cascade("question");

        match question.variation_id.as_deref() {
            Some(variation_id) => {
                if self.store.count_approved_for_variation(variation_id).await? == 0 {
                    self.store.hard_delete_variation(variation_id).await?;
                    report.variation_deleted = true;
                    record_cascade("variation");
                    report.template_deleted =
                        self.evaluate_template(&question.template_id).await?;
                } else {
                    debug!(variation = variation_id, "variation retains approved questions");
                }
            }
            None => {
                report.template_deleted = self.evaluate_template(&question.template_id).await?;
            }
        }

        Ok(report)
    }

    /// AI-reviewer path: ask the fallback engine to evaluate a question and
    /// submit the parsed verdict.
    ///
    /// Callers typically configure the engine with `max_attempts(2)` —
    /// evaluation favors latency over exhausting the tier table.
    #[instrument(skip(self, engine, keys), fields(operation = "evaluate_question", question = %question_id))]
    pub async fn evaluate_question(
        &self,
        question_id: &str,
        engine: &FallbackEngine,
        keys: &CredentialMap,
    ) -> Result<ReviewOutcome> {
        let question = self
            .store
            .find_question(question_id)
            .await?
            .ok_or_else(|| MimirError::QuestionNotFound(question_id.to_string()))?;

        let prompt = format!(
            "Evaluate this question: \"{}\". \n\
             Consider: clarity, solvability, educational value, age-appropriateness.\n\
             Return JSON {{ \"score\": number (1-10), \"isSolvable\": boolean, \
             \"feedback\": \"string\", \"isValid\": boolean }}",
            question.question_text
        );

        let outcome = engine
            .generate(&GenerationRequest::new(prompt), keys)
            .await?;
        let evaluation: QuestionEvaluation = serde_json::from_value(outcome.result)?;

        let decision = ReviewDecision {
            question_id: question_id.to_string(),
            reviewer_id: format!("{}/{}", outcome.backend_used, outcome.model_used),
            reviewer_type: ReviewerType::Ai,
            is_valid: evaluation.is_valid,
            score: evaluation
                .score
                .map(|s| s.round().clamp(1.0, 10.0) as u8),
            feedback: evaluation.feedback.unwrap_or_default(),
        };
        self.submit(decision).await
    }

    async fn evaluate_template(&self, template_id: &str) -> Result<bool> {
        if self.store.find_template(template_id).await?.is_none() {
            // Already cascaded away; not an error.
            return Ok(false);
        }
        if self.store.count_approved_for_template(template_id).await? == 0 {
            self.store.hard_delete_template(template_id).await?;
            record_cascade("template");
            return Ok(true);
        }
        Ok(false)
    }
}

fn record_cascade(entity: &'static str) {
    metrics::counter!(telemetry::CASCADE_DELETES_TOTAL, "entity" => entity).increment(1);
}
