//! Persistence collaborator for the review workflow.

use async_trait::async_trait;

use crate::Result;
use crate::types::{
    GeneratedQuestion, QuestionReview, QuestionStatus, QuestionTemplate, QuestionVariation,
};

/// Document-store operations the review workflow depends on.
///
/// All hard deletes are idempotent: deleting an id that is already gone is
/// success, not an error, since concurrent rejections can race to delete the
/// same ancestor. Counting operations see the store's current state and
/// exclude hard-deleted rows by construction.
#[async_trait]
pub trait QuestionStore: Send + Sync {
    // Templates
    async fn find_template(&self, id: &str) -> Result<Option<QuestionTemplate>>;
    /// Approved questions under the template, across all variations and
    /// direct questions.
    async fn count_approved_for_template(&self, template_id: &str) -> Result<usize>;
    /// Tombstone a template (explicit admin action; restorable).
    async fn soft_delete_template(&self, id: &str) -> Result<()>;
    async fn hard_delete_template(&self, id: &str) -> Result<()>;
    async fn restore_template(&self, id: &str) -> Result<()>;

    // Variations
    async fn variations_for_template(&self, template_id: &str) -> Result<Vec<QuestionVariation>>;
    async fn count_approved_for_variation(&self, variation_id: &str) -> Result<usize>;
    async fn hard_delete_variation(&self, id: &str) -> Result<()>;

    // Questions
    async fn find_question(&self, id: &str) -> Result<Option<GeneratedQuestion>>;
    async fn update_question_status(
        &self,
        id: &str,
        status: QuestionStatus,
        reviewer_id: Option<&str>,
        rejection_reason: Option<&str>,
    ) -> Result<()>;
    async fn hard_delete_question(&self, id: &str) -> Result<()>;

    // Reviews (append-only audit trail)
    /// Insert a review record, returning its store-assigned id.
    async fn insert_review(&self, review: QuestionReview) -> Result<String>;
}
