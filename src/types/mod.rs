//! Public types for the Mimir API.

mod backend;
mod outcome;
mod question;
mod request;

pub use backend::Backend;
pub use outcome::FallbackOutcome;
pub use question::{
    GeneratedQuestion, QuestionReview, QuestionStatus, QuestionTemplate, QuestionVariation,
    ReviewerType, VariableDefinition, VariableKind,
};
pub use request::{GenerateOptions, GenerationRequest};
