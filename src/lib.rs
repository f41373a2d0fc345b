//! Mimir - Tiered AI question generation with quality gating
//!
//! This crate generates structured JSON content through a table of model
//! tiers spanning multiple AI backends, walking the tiers cheapest-first
//! and gating each result on a quality heuristic. A review workflow sits
//! on top: reviewer verdicts are recorded against generated questions, and
//! a rejection cascades hard deletes up the variation/template ownership
//! chain when nothing approved remains.
//!
//! # Generation Example
//!
//! ```rust,no_run
//! use mimir::{CredentialMap, FallbackEngine, GenerationRequest};
//!
//! #[tokio::main]
//! async fn main() -> mimir::Result<()> {
//!     let keys = CredentialMap::from_env();
//!     let engine = FallbackEngine::new();
//!
//!     let outcome = engine.generate(
//!         &GenerationRequest::new("Generate an addition question for 3rd graders as JSON.")
//!             .temperature(0.7),
//!         &keys,
//!     ).await?;
//!
//!     println!("{} via {} ({} attempts)", outcome.result, outcome.model_used, outcome.attempts_made);
//!     Ok(())
//! }
//! ```
//!
//! # Review Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use mimir::review::{MemoryStore, ReviewDecision, ReviewWorkflow};
//!
//! #[tokio::main]
//! async fn main() -> mimir::Result<()> {
//!     let store = Arc::new(MemoryStore::new());
//!     let workflow = ReviewWorkflow::new(store);
//!
//!     let outcome = workflow.submit(
//!         ReviewDecision::reject("question-1", "reviewer-7", "Ambiguous wording")
//!     ).await?;
//!
//!     println!("review {} recorded, cascade: {:?}", outcome.review_id, outcome.cascade);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod fallback;
pub mod providers;
pub mod review;
pub mod telemetry;
pub mod types;

// Re-export main types at crate root
pub use config::{CredentialMap, ProviderConfig};
pub use error::{MimirError, Result};
pub use fallback::{FallbackEngine, MODEL_TIERS, ModelTier};
pub use providers::{GenerateProvider, ProviderService};

// Re-export all types
pub use types::{
    Backend, FallbackOutcome, GenerateOptions, GeneratedQuestion, GenerationRequest,
    QuestionReview, QuestionStatus, QuestionTemplate, QuestionVariation, ReviewerType,
    VariableDefinition, VariableKind,
};
