//! Review workflow: verdict intake, audit records, and the cascading
//! deletion of ancestors left without approved descendants.

mod memory;
mod store;
mod workflow;

pub use memory::MemoryStore;
pub use store::QuestionStore;
pub use workflow::{CascadeReport, QuestionEvaluation, ReviewDecision, ReviewOutcome, ReviewWorkflow};
