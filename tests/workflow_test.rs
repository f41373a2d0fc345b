//! Tests for the AI-reviewer path: engine-backed question evaluation
//! feeding the review workflow.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use mimir::providers::{GenerateProvider, ProviderFactory};
use mimir::review::{MemoryStore, ReviewWorkflow};
use mimir::types::{
    Backend, GenerateOptions, GeneratedQuestion, QuestionStatus, QuestionTemplate, ReviewerType,
};
use mimir::{CredentialMap, FallbackEngine, MimirError, Result};
use serde_json::{Value, json};

/// Factory whose providers always return one fixed value and log prompts.
struct FixedFactory {
    value: Value,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl FixedFactory {
    fn new(value: Value) -> Self {
        Self {
            value,
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl ProviderFactory for FixedFactory {
    fn create(
        &self,
        backend: Backend,
        _api_key: &str,
        _model: Option<&str>,
    ) -> Arc<dyn GenerateProvider> {
        Arc::new(FixedProvider {
            backend,
            value: self.value.clone(),
            prompts: Arc::clone(&self.prompts),
        })
    }
}

struct FixedProvider {
    backend: Backend,
    value: Value,
    prompts: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl GenerateProvider for FixedProvider {
    fn backend(&self) -> Backend {
        self.backend
    }

    async fn generate_text(&self, prompt: &str, _options: &GenerateOptions) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.value.to_string())
    }

    async fn generate_json(&self, prompt: &str, _options: &GenerateOptions) -> Result<Value> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.value.clone())
    }

    async fn generate_with_image(
        &self,
        prompt: &str,
        _image_base64: &str,
        _options: &GenerateOptions,
    ) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.value.to_string())
    }

    async fn generate_json_with_image(
        &self,
        prompt: &str,
        _image_base64: &str,
        _options: &GenerateOptions,
    ) -> Result<Value> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.value.clone())
    }
}

fn store_with_question() -> Arc<MemoryStore> {
    let store = MemoryStore::new();
    store.insert_template(QuestionTemplate::new("t1", "Addition", "{a}+{b}", "admin"));
    store.insert_question(GeneratedQuestion::new("q1", "t1", "What is 2 plus 2?"));
    Arc::new(store)
}

fn engine_returning(factory: Arc<FixedFactory>) -> FallbackEngine {
    // Evaluation verdicts never carry template structure, so they sit below
    // the quality minimum; a single attempt returns them best-effort.
    FallbackEngine::with_factory(factory).max_attempts(1)
}

fn gemini_keys() -> CredentialMap {
    CredentialMap::new().gemini("g")
}

#[tokio::test]
async fn positive_evaluation_approves_the_question() {
    let store = store_with_question();
    let workflow = ReviewWorkflow::new(store.clone());
    let factory = Arc::new(FixedFactory::new(json!({
        "score": 8.4,
        "isSolvable": true,
        "feedback": "Clear and age-appropriate",
        "isValid": true
    })));
    let engine = engine_returning(factory.clone());

    let outcome = workflow
        .evaluate_question("q1", &engine, &gemini_keys())
        .await
        .unwrap();

    assert_eq!(outcome.status, QuestionStatus::Approved);
    assert!(outcome.cascade.is_none());

    let reviews = store.reviews_for_question("q1");
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0].reviewer_type, ReviewerType::Ai);
    assert_eq!(reviews[0].reviewer_id, "gemini/gemini-1.5-flash");
    assert_eq!(reviews[0].score, Some(8));
    assert_eq!(reviews[0].feedback, "Clear and age-appropriate");
}

#[tokio::test]
async fn negative_evaluation_rejects_and_cascades() {
    let store = store_with_question();
    let workflow = ReviewWorkflow::new(store.clone());
    let factory = Arc::new(FixedFactory::new(json!({
        "score": 2,
        "isSolvable": false,
        "feedback": "Unsolvable as written",
        "isValid": false
    })));
    let engine = engine_returning(factory);

    let outcome = workflow
        .evaluate_question("q1", &engine, &gemini_keys())
        .await
        .unwrap();

    assert_eq!(outcome.status, QuestionStatus::Rejected);
    let cascade = outcome.cascade.unwrap();
    assert!(cascade.question_deleted);
    assert!(cascade.template_deleted);
    assert_eq!(store.question_count(), 0);
}

#[tokio::test]
async fn evaluation_prompt_carries_question_and_criteria() {
    let workflow = ReviewWorkflow::new(store_with_question());
    let factory = Arc::new(FixedFactory::new(json!({
        "score": 7,
        "isSolvable": true,
        "feedback": "ok",
        "isValid": true
    })));
    let engine = engine_returning(factory.clone());

    workflow
        .evaluate_question("q1", &engine, &gemini_keys())
        .await
        .unwrap();

    let prompts = factory.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("Evaluate this question: \"What is 2 plus 2?\""));
    assert!(prompts[0].contains("clarity, solvability, educational value"));
    assert!(prompts[0].contains("\"isSolvable\": boolean"));
}

#[tokio::test]
async fn evaluation_score_is_clamped_to_range() {
    let store = store_with_question();
    let workflow = ReviewWorkflow::new(store.clone());
    let factory = Arc::new(FixedFactory::new(json!({
        "score": 15.0,
        "isSolvable": true,
        "feedback": "overshoots",
        "isValid": true
    })));
    let engine = engine_returning(factory);

    workflow
        .evaluate_question("q1", &engine, &gemini_keys())
        .await
        .unwrap();

    assert_eq!(store.reviews_for_question("q1")[0].score, Some(10));
}

#[tokio::test]
async fn evaluation_without_score_records_none() {
    let store = store_with_question();
    let workflow = ReviewWorkflow::new(store.clone());
    let factory = Arc::new(FixedFactory::new(json!({
        "isSolvable": true,
        "feedback": "no numeric verdict",
        "isValid": true
    })));
    let engine = engine_returning(factory);

    workflow
        .evaluate_question("q1", &engine, &gemini_keys())
        .await
        .unwrap();

    assert_eq!(store.reviews_for_question("q1")[0].score, None);
}

#[tokio::test]
async fn evaluating_unknown_question_fails() {
    let workflow = ReviewWorkflow::new(store_with_question());
    let factory = Arc::new(FixedFactory::new(json!({"isValid": true})));
    let engine = engine_returning(factory);

    let err = workflow
        .evaluate_question("nope", &engine, &gemini_keys())
        .await
        .unwrap_err();

    assert!(matches!(err, MimirError::QuestionNotFound(id) if id == "nope"));
}

#[tokio::test]
async fn malformed_evaluation_payload_is_an_error() {
    let workflow = ReviewWorkflow::new(store_with_question());
    // Missing the required isValid field.
    let factory = Arc::new(FixedFactory::new(json!({
        "score": 7,
        "feedback": "shape mismatch"
    })));
    let engine = engine_returning(factory);

    let err = workflow
        .evaluate_question("q1", &engine, &gemini_keys())
        .await
        .unwrap_err();

    assert!(matches!(err, MimirError::Json(_)));
}
