//! Authored-content hierarchy: template → variation → question, plus the
//! append-only review audit record.

use std::time::SystemTime;

use serde::{Deserialize, Serialize};

/// Review lifecycle of a variation or generated question.
///
/// One-shot per question: `pending → {approved | rejected}`, both terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionStatus {
    Pending,
    Approved,
    Rejected,
}

/// Who produced a review record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewerType {
    Human,
    Ai,
    Api,
}

/// Kind of a template variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableKind {
    Number,
    Text,
    Choice,
}

/// Declaration of one parameter slot in a question template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariableDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: VariableKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    /// Decimal places for number variables.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precision: Option<u8>,
}

/// Authored question template owning variations and generated questions.
///
/// Soft-deleted (tombstoned, restorable) on explicit admin action;
/// hard-deleted only by the review cascade once no approved descendants
/// remain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionTemplate {
    pub id: String,
    pub title: String,
    /// Primary phrasing.
    pub template_text: String,
    /// Alternative phrasings.
    pub variants: Vec<String>,
    pub variables: Vec<VariableDefinition>,
    pub concepts: Vec<String>,
    pub created_by: String,
    pub created_at: SystemTime,
    pub updated_at: SystemTime,
    /// Soft-delete tombstone.
    pub deleted: bool,
}

impl QuestionTemplate {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        template_text: impl Into<String>,
        created_by: impl Into<String>,
    ) -> Self {
        let now = SystemTime::now();
        Self {
            id: id.into(),
            title: title.into(),
            template_text: template_text.into(),
            variants: Vec::new(),
            variables: Vec::new(),
            concepts: Vec::new(),
            created_by: created_by.into(),
            created_at: now,
            updated_at: now,
            deleted: false,
        }
    }
}

/// One concrete phrasing of a template.
///
/// Hard-deleted by the cascade when its last approved question is rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionVariation {
    pub id: String,
    pub template_id: String,
    pub variation_text: String,
    pub status: QuestionStatus,
    pub created_at: SystemTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
}

impl QuestionVariation {
    pub fn new(
        id: impl Into<String>,
        template_id: impl Into<String>,
        variation_text: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            template_id: template_id.into(),
            variation_text: variation_text.into(),
            status: QuestionStatus::Pending,
            created_at: SystemTime::now(),
            rejection_reason: None,
        }
    }
}

/// One fully-instantiated, answerable question instance — the leaf that
/// triggers cascade evaluation upward when rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedQuestion {
    pub id: String,
    pub template_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variation_id: Option<String>,
    pub question_text: String,
    /// Concrete variable bindings used to render the text.
    pub values: serde_json::Map<String, serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calculated_answer: Option<String>,
    pub status: QuestionStatus,
    pub created_at: SystemTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<SystemTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
}

impl GeneratedQuestion {
    pub fn new(
        id: impl Into<String>,
        template_id: impl Into<String>,
        question_text: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            template_id: template_id.into(),
            variation_id: None,
            question_text: question_text.into(),
            values: serde_json::Map::new(),
            calculated_answer: None,
            status: QuestionStatus::Pending,
            created_at: SystemTime::now(),
            reviewed_at: None,
            reviewer_id: None,
            rejection_reason: None,
        }
    }

    pub fn variation(mut self, variation_id: impl Into<String>) -> Self {
        self.variation_id = Some(variation_id.into());
        self
    }

    pub fn status(mut self, status: QuestionStatus) -> Self {
        self.status = status;
        self
    }
}

/// Immutable audit record of one review verdict. Append-only: never mutated
/// or deleted, even when the cascade removes the question it refers to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionReview {
    /// Assigned by the store on insert.
    pub id: String,
    pub question_id: String,
    pub reviewer_id: String,
    pub reviewer_type: ReviewerType,
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<u8>,
    pub feedback: String,
    pub created_at: SystemTime,
}
