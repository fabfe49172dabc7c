//! careplan core library - rule-based patient risk scoring and model evaluation metrics

#![deny(warnings)]

// Global invariants enforced in this crate:
// - Scoring is strictly per-patient; no state survives a call
// - No global mutable state
// - Randomness only through an injected `JitterSource`
// - Rule evaluation order is explicit and fixed
// - Identical input and jitter yield identical output

pub mod config;
pub mod dashboard;
pub mod engine;
pub mod export;
pub mod input;
pub mod report;
pub mod rules;
pub mod tier;

pub use config::ResolvedConfig;
pub use engine::{score, score_with_entropy, score_with_seed, FixedJitter, FnJitter, JitterSource, ScoringResult};
pub use input::{InputError, PatientForm, PatientInput};
pub use report::{render_json, render_text};
pub use tier::RecommendationTier;

/// Options for a single assessment
#[derive(Debug, Clone, Default)]
pub struct AssessOptions {
    /// Pin the jitter stream; `None` draws fresh entropy
    pub seed: Option<u64>,
}

/// Validate a raw form and score it
///
/// This is the boundary the engine relies on: invalid forms are rejected
/// here and never reach `score`.
pub fn assess(form: &PatientForm, options: &AssessOptions) -> Result<ScoringResult, InputError> {
    let input = form.validate().map_err(|e| {
        tracing::warn!(error = %e, "rejected patient form");
        e
    })?;
    Ok(assess_input(&input, options))
}

/// Score an already validated input
pub fn assess_input(input: &PatientInput, options: &AssessOptions) -> ScoringResult {
    match options.seed {
        Some(seed) => score_with_seed(input, seed),
        None => score_with_entropy(input),
    }
}
