//! Rendering of scoring results
//!
//! Global invariants enforced:
//! - Output is a pure function of the `ScoringResult`
//! - Risk factors and action items keep their original order

use crate::engine::ScoringResult;
use crate::tier::RecommendationTier;
use serde::{Deserialize, Serialize};

/// Shown under every recommendation
pub const CLINICAL_REVIEW_NOTICE: &str = "Note: This recommendation is generated by an AI model and should be reviewed by a qualified healthcare professional before any clinical decisions are made.";

/// Scoring result plus the presentation attributes of its tier
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RecommendationReport {
    pub score: u32,
    pub tier: RecommendationTier,
    pub label: String,
    pub headline: String,
    pub icon: String,
    pub css_class: String,
    pub confidence: u32,
    pub explanation: String,
    pub risk_factors: Vec<String>,
    pub action_items: Vec<String>,
}

impl From<&ScoringResult> for RecommendationReport {
    fn from(result: &ScoringResult) -> Self {
        RecommendationReport {
            score: result.score,
            tier: result.tier,
            label: result.tier.label().to_string(),
            headline: result.tier.headline().to_string(),
            icon: result.tier.icon().to_string(),
            css_class: result.tier.css_class().to_string(),
            confidence: result.confidence,
            explanation: result.explanation.clone(),
            risk_factors: result.risk_factors.clone(),
            action_items: result.action_items.clone(),
        }
    }
}

/// Render a result as human-readable text
pub fn render_text(result: &ScoringResult) -> String {
    let mut output = String::new();

    output.push_str(&format!("{}\n", result.tier.headline()));
    output.push_str(&format!("Confidence: {}%\n", result.confidence));
    output.push_str(&format!("Risk score: {}\n\n", result.score));
    output.push_str(&format!("{}\n\n", result.explanation));

    output.push_str("Risk Factors Identified:\n");
    for factor in &result.risk_factors {
        output.push_str(&format!("  - {}\n", factor));
    }

    output.push_str("\nRecommended Action Items:\n");
    for (i, item) in result.action_items.iter().enumerate() {
        output.push_str(&format!("  {}. {}\n", i + 1, item));
    }

    output.push('\n');
    output.push_str(CLINICAL_REVIEW_NOTICE);
    output.push('\n');

    output
}

/// Render a result as pretty-printed JSON
pub fn render_json(result: &ScoringResult) -> String {
    serde_json::to_string_pretty(&RecommendationReport::from(result))
        .unwrap_or_else(|_| "{}".to_string())
}
