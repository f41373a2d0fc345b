//! In-process question store.
//!
//! Reference implementation of [`QuestionStore`] backed by hash maps. Used
//! as the test double throughout; production deployments plug a document
//! store in behind the same trait.

use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::SystemTime;

use async_trait::async_trait;

use super::store::QuestionStore;
use crate::Result;
use crate::types::{
    GeneratedQuestion, QuestionReview, QuestionStatus, QuestionTemplate, QuestionVariation,
};

#[derive(Default)]
struct Collections {
    templates: HashMap<String, QuestionTemplate>,
    variations: HashMap<String, QuestionVariation>,
    questions: HashMap<String, GeneratedQuestion>,
    reviews: HashMap<String, QuestionReview>,
}

/// In-memory [`QuestionStore`].
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
    next_review_id: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a template.
    pub fn insert_template(&self, template: QuestionTemplate) {
        let mut inner = self.inner.write().expect("store lock poisoned");
        inner.templates.insert(template.id.clone(), template);
    }

    /// Seed a variation.
    pub fn insert_variation(&self, variation: QuestionVariation) {
        let mut inner = self.inner.write().expect("store lock poisoned");
        inner.variations.insert(variation.id.clone(), variation);
    }

    /// Seed a generated question.
    pub fn insert_question(&self, question: GeneratedQuestion) {
        let mut inner = self.inner.write().expect("store lock poisoned");
        inner.questions.insert(question.id.clone(), question);
    }

    /// All review records for a question, in no particular order.
    pub fn reviews_for_question(&self, question_id: &str) -> Vec<QuestionReview> {
        let inner = self.inner.read().expect("store lock poisoned");
        inner
            .reviews
            .values()
            .filter(|r| r.question_id == question_id)
            .cloned()
            .collect()
    }

    pub fn template_count(&self) -> usize {
        self.inner
            .read()
            .expect("store lock poisoned")
            .templates
            .len()
    }

    pub fn variation_count(&self) -> usize {
        self.inner
            .read()
            .expect("store lock poisoned")
            .variations
            .len()
    }

    pub fn question_count(&self) -> usize {
        self.inner
            .read()
            .expect("store lock poisoned")
            .questions
            .len()
    }
}

#[async_trait]
impl QuestionStore for MemoryStore {
    async fn find_template(&self, id: &str) -> Result<Option<QuestionTemplate>> {
        let inner = self.inner.read().expect("store lock poisoned");
        Ok(inner.templates.get(id).cloned())
    }

    async fn count_approved_for_template(&self, template_id: &str) -> Result<usize> {
        let inner = self.inner.read().expect("store lock poisoned");
        Ok(inner
            .questions
            .values()
            .filter(|q| q.template_id == template_id && q.status == QuestionStatus::Approved)
            .count())
    }

    async fn soft_delete_template(&self, id: &str) -> Result<()> {
        let mut inner = self.inner.write().expect("store lock poisoned");
        if let Some(template) = inner.templates.get_mut(id) {
            template.deleted = true;
            template.updated_at = SystemTime::now();
        }
        Ok(())
    }

    async fn hard_delete_template(&self, id: &str) -> Result<()> {
        let mut inner = self.inner.write().expect("store lock poisoned");
        inner.templates.remove(id);
        Ok(())
    }

    async fn restore_template(&self, id: &str) -> Result<()> {
        let mut inner = self.inner.write().expect("store lock poisoned");
        if let Some(template) = inner.templates.get_mut(id) {
            template.deleted = false;
            template.updated_at = SystemTime::now();
        }
        Ok(())
    }

    async fn variations_for_template(&self, template_id: &str) -> Result<Vec<QuestionVariation>> {
        let inner = self.inner.read().expect("store lock poisoned");
        Ok(inner
            .variations
            .values()
            .filter(|v| v.template_id == template_id)
            .cloned()
            .collect())
    }

    async fn count_approved_for_variation(&self, variation_id: &str) -> Result<usize> {
        let inner = self.inner.read().expect("store lock poisoned");
        Ok(inner
            .questions
            .values()
            .filter(|q| {
                q.variation_id.as_deref() == Some(variation_id)
                    && q.status == QuestionStatus::Approved
            })
            .count())
    }

    async fn hard_delete_variation(&self, id: &str) -> Result<()> {
        let mut inner = self.inner.write().expect("store lock poisoned");
        inner.variations.remove(id);
        Ok(())
    }

    async fn find_question(&self, id: &str) -> Result<Option<GeneratedQuestion>> {
        let inner = self.inner.read().expect("store lock poisoned");
        Ok(inner.questions.get(id).cloned())
    }

    async fn update_question_status(
        &self,
        id: &str,
        status: QuestionStatus,
        reviewer_id: Option<&str>,
        rejection_reason: Option<&str>,
    ) -> Result<()> {
        let mut inner = self.inner.write().expect("store lock poisoned");
        if let Some(question) = inner.questions.get_mut(id) {
            question.status = status;
            question.reviewed_at = Some(SystemTime::now());
            question.reviewer_id = reviewer_id.map(str::to_string);
            question.rejection_reason = rejection_reason.map(str::to_string);
        }
        Ok(())
    }

    async fn hard_delete_question(&self, id: &str) -> Result<()> {
        let mut inner = self.inner.write().expect("store lock poisoned");
        inner.questions.remove(id);
        Ok(())
    }

    async fn insert_review(&self, mut review: QuestionReview) -> Result<String> {
        let id = format!(
            "review-{}",
            self.next_review_id.fetch_add(1, Ordering::Relaxed) + 1
        );
        review.id = id.clone();
        let mut inner = self.inner.write().expect("store lock poisoned");
        inner.reviews.insert(id.clone(), review);
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn soft_delete_and_restore_roundtrip() {
        let store = MemoryStore::new();
        store.insert_template(QuestionTemplate::new("t1", "Addition", "{a}+{b}", "admin"));

        store.soft_delete_template("t1").await.unwrap();
        let tombstoned = store.find_template("t1").await.unwrap().unwrap();
        assert!(tombstoned.deleted);

        store.restore_template("t1").await.unwrap();
        let restored = store.find_template("t1").await.unwrap().unwrap();
        assert!(!restored.deleted);
    }

    #[tokio::test]
    async fn approved_counts_scope_to_owner() {
        let store = MemoryStore::new();
        store.insert_question(
            GeneratedQuestion::new("q1", "t1", "2+2?")
                .variation("v1")
                .status(QuestionStatus::Approved),
        );
        store.insert_question(
            GeneratedQuestion::new("q2", "t1", "3+3?").status(QuestionStatus::Approved),
        );
        store.insert_question(
            GeneratedQuestion::new("q3", "t2", "4+4?").status(QuestionStatus::Approved),
        );
        store.insert_question(GeneratedQuestion::new("q4", "t1", "5+5?").variation("v1"));

        assert_eq!(store.count_approved_for_template("t1").await.unwrap(), 2);
        assert_eq!(store.count_approved_for_variation("v1").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn variations_list_scopes_to_template() {
        let store = MemoryStore::new();
        store.insert_variation(QuestionVariation::new("v1", "t1", "What is {a} plus {b}?"));
        store.insert_variation(QuestionVariation::new("v2", "t1", "Add {a} and {b}."));
        store.insert_variation(QuestionVariation::new("v3", "t2", "What is {a} times {b}?"));

        let mut ids: Vec<String> = store
            .variations_for_template("t1")
            .await
            .unwrap()
            .into_iter()
            .map(|v| v.id)
            .collect();
        ids.sort();
        assert_eq!(ids, ["v1", "v2"]);
    }

    #[tokio::test]
    async fn hard_deletes_are_idempotent() {
        let store = MemoryStore::new();
        store.hard_delete_template("missing").await.unwrap();
        store.hard_delete_variation("missing").await.unwrap();
        store.hard_delete_question("missing").await.unwrap();
    }
}
