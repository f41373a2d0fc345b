//! Tiered generation with quality gating.
//!
//! The engine tries model tiers cheapest-first, scoring each result with a
//! pluggable quality gate, and only pays for an expensive model when the
//! cheaper ones produce sub-threshold output.

mod orchestrator;
mod quality;
mod tiers;

pub use orchestrator::FallbackEngine;
pub use quality::{DefaultQualityGate, QualityGate, QualityVerdict};
pub use tiers::{MODEL_TIERS, ModelTier, available_tiers};
