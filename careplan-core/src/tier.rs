//! Recommendation tiers
//!
//! Global invariants enforced:
//! - Tiers are totally ordered by severity
//! - Score bands are contiguous and exhaustive: every score maps to exactly one tier
//! - Confidence ranges are fixed per tier

use serde::{Deserialize, Serialize};

/// Lowest score that selects `Preventive`
pub const PREVENTIVE_MIN_SCORE: u32 = 2;
/// Lowest score that selects `Lifestyle`
pub const LIFESTYLE_MIN_SCORE: u32 = 5;
/// Lowest score that selects `Medication`
pub const MEDICATION_MIN_SCORE: u32 = 8;

/// Recommendation category, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecommendationTier {
    NoAction,
    Preventive,
    Lifestyle,
    Medication,
}

/// Half-open confidence interval `[base, base + width)`, in percent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfidenceRange {
    pub base: u32,
    pub width: u32,
}

impl ConfidenceRange {
    pub fn max_exclusive(&self) -> u32 {
        self.base + self.width
    }

    pub fn contains(&self, confidence: u32) -> bool {
        confidence >= self.base && confidence < self.max_exclusive()
    }
}

impl RecommendationTier {
    /// All tiers in ascending severity
    pub const ALL: [RecommendationTier; 4] = [
        RecommendationTier::NoAction,
        RecommendationTier::Preventive,
        RecommendationTier::Lifestyle,
        RecommendationTier::Medication,
    ];

    /// Map a total score to its tier
    ///
    /// Bands are checked from the highest threshold down; first match wins.
    pub fn from_score(score: u32) -> Self {
        if score >= MEDICATION_MIN_SCORE {
            RecommendationTier::Medication
        } else if score >= LIFESTYLE_MIN_SCORE {
            RecommendationTier::Lifestyle
        } else if score >= PREVENTIVE_MIN_SCORE {
            RecommendationTier::Preventive
        } else {
            RecommendationTier::NoAction
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RecommendationTier::NoAction => "no-action",
            RecommendationTier::Preventive => "preventive",
            RecommendationTier::Lifestyle => "lifestyle",
            RecommendationTier::Medication => "medication",
        }
    }

    pub fn confidence_range(&self) -> ConfidenceRange {
        match self {
            RecommendationTier::NoAction => ConfidenceRange { base: 91, width: 6 },
            RecommendationTier::Preventive => ConfidenceRange { base: 89, width: 6 },
            RecommendationTier::Lifestyle => ConfidenceRange { base: 85, width: 8 },
            RecommendationTier::Medication => ConfidenceRange { base: 88, width: 7 },
        }
    }

    /// Short class label, as used in the evaluation dataset
    pub fn label(&self) -> &'static str {
        match self {
            RecommendationTier::NoAction => "No Action Needed",
            RecommendationTier::Preventive => "Preventive Check-up",
            RecommendationTier::Lifestyle => "Lifestyle Changes",
            RecommendationTier::Medication => "Medication",
        }
    }

    /// Badge text shown above an individual recommendation
    pub fn headline(&self) -> &'static str {
        match self {
            RecommendationTier::NoAction => "✓ No Action Needed",
            RecommendationTier::Preventive => "📋 Preventive Check-up Recommended",
            RecommendationTier::Lifestyle => "🏃 Lifestyle Changes Recommended",
            RecommendationTier::Medication => "💊 Medication Required",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            RecommendationTier::NoAction => "✓",
            RecommendationTier::Preventive => "📋",
            RecommendationTier::Lifestyle => "🏃",
            RecommendationTier::Medication => "💊",
        }
    }

    /// Styling hook for HTML front ends
    pub fn css_class(&self) -> &'static str {
        self.as_str()
    }

    pub fn explanation(&self) -> &'static str {
        match self {
            RecommendationTier::NoAction => {
                "Health parameters within normal ranges. Continue current healthy habits."
            }
            RecommendationTier::Preventive => {
                "Minor risk factors detected. Preventive care recommended to maintain health."
            }
            RecommendationTier::Lifestyle => {
                "Several risk factors identified that can be improved through lifestyle modifications."
            }
            RecommendationTier::Medication => {
                "Multiple high-risk factors detected requiring immediate medical intervention."
            }
        }
    }

    pub fn action_items(&self) -> &'static [&'static str] {
        match self {
            RecommendationTier::NoAction => &[
                "Maintain current healthy lifestyle",
                "Continue regular physical activity",
                "Keep balanced nutrition",
                "Annual routine health check",
                "Stay vigilant about any new symptoms",
            ],
            RecommendationTier::Preventive => &[
                "Schedule routine health screening",
                "Continue regular exercise routine",
                "Maintain balanced diet",
                "Monitor key health metrics monthly",
                "Annual comprehensive health assessment",
            ],
            RecommendationTier::Lifestyle => &[
                "Implement structured exercise program (30 min daily)",
                "Adopt heart-healthy diet (Mediterranean or DASH)",
                "Reduce sodium and saturated fat intake",
                "Establish regular sleep schedule (7-8 hours)",
                "Consider stress management techniques (meditation, yoga)",
                "Schedule follow-up in 3 months",
            ],
            RecommendationTier::Medication => &[
                "Schedule immediate appointment with healthcare provider",
                "Begin prescribed medication regimen",
                "Monitor blood pressure and glucose daily",
                "Consider specialist referral for comprehensive evaluation",
                "Implement intensive lifestyle modification program",
            ],
        }
    }
}

impl std::fmt::Display for RecommendationTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
