//! Risk scoring engine
//!
//! Turns a validated `PatientInput` into a `ScoringResult`: rule score,
//! recommendation tier, confidence, risk factors, and action items.
//!
//! Global invariants enforced:
//! - Score, tier, risk factors, and action items are pure functions of the input
//! - Confidence is the only jittered field and always lies in the tier's range
//! - Jitter never influences tier selection
//! - No I/O, no shared state; each call is independent

use crate::input::PatientInput;
use crate::rules;
use crate::tier::RecommendationTier;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Source of confidence jitter
///
/// `offset(width)` should return a value in `[0, width)`. Anything larger is
/// clamped by the engine.
pub trait JitterSource {
    fn offset(&mut self, width: u32) -> u32;
}

impl<R: Rng + ?Sized> JitterSource for R {
    fn offset(&mut self, width: u32) -> u32 {
        if width == 0 {
            return 0;
        }
        self.gen_range(0..width)
    }
}

/// Always returns the same offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedJitter(pub u32);

impl JitterSource for FixedJitter {
    fn offset(&mut self, _width: u32) -> u32 {
        self.0
    }
}

/// Adapts a plain function or closure into a jitter source
pub struct FnJitter<F>(pub F);

impl<F: FnMut(u32) -> u32> JitterSource for FnJitter<F> {
    fn offset(&mut self, width: u32) -> u32 {
        (self.0)(width)
    }
}

/// Complete recommendation for one patient
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ScoringResult {
    pub score: u32,
    pub tier: RecommendationTier,
    /// Percent
    pub confidence: u32,
    pub explanation: String,
    /// Never empty
    pub risk_factors: Vec<String>,
    pub action_items: Vec<String>,
}

/// Score a patient, drawing confidence jitter from `jitter`
pub fn score<J: JitterSource + ?Sized>(input: &PatientInput, jitter: &mut J) -> ScoringResult {
    let evaluation = rules::evaluate(input);
    let tier = RecommendationTier::from_score(evaluation.score);

    let range = tier.confidence_range();
    let offset = jitter
        .offset(range.width)
        .min(range.width.saturating_sub(1));
    let confidence = range.base + offset;

    tracing::debug!(
        score = evaluation.score,
        tier = tier.as_str(),
        confidence,
        triggered = evaluation.triggered.len(),
        "scored patient"
    );

    ScoringResult {
        score: evaluation.score,
        tier,
        confidence,
        explanation: tier.explanation().to_string(),
        risk_factors: evaluation.risk_factors(),
        action_items: tier.action_items().iter().map(|s| s.to_string()).collect(),
    }
}

/// Score with a jitter stream pinned by `seed`
pub fn score_with_seed(input: &PatientInput, seed: u64) -> ScoringResult {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    score(input, &mut rng)
}

/// Score with jitter from the thread-local entropy source
pub fn score_with_entropy(input: &PatientInput) -> ScoringResult {
    score(input, &mut rand::thread_rng())
}
