//! Precomputed model evaluation metrics
//!
//! The dashboard dataset is fixed: six trained classifiers, the class
//! distribution of the training set, feature importances, and the confusion
//! matrix of the best model. Nothing here is recomputed at runtime.
//!
//! Global invariants enforced:
//! - Filtering state is always passed in, never stored
//! - Deterministic ordering of every rendered table

use crate::tier::RecommendationTier;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Qualitative rating attached to each model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ModelStatus {
    Fair,
    Good,
    Best,
}

impl ModelStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelStatus::Fair => "Fair",
            ModelStatus::Good => "Good",
            ModelStatus::Best => "Best",
        }
    }
}

/// Held-out and cross-validated scores for one classifier
#[derive(Debug, Clone, Serialize)]
pub struct ModelMetrics {
    pub name: &'static str,
    pub test_accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub cv_mean: f64,
    pub cv_std: f64,
    pub status: ModelStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<&'static str>,
}

/// Share of the training set falling into one recommendation class
#[derive(Debug, Clone, Serialize)]
pub struct ClassShare {
    pub class: &'static str,
    pub tier: RecommendationTier,
    pub count: u32,
    pub percentage: f64,
    pub color: &'static str,
}

/// Grouping used to filter the feature importance chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FeatureCategory {
    #[serde(rename = "Vital Signs")]
    VitalSigns,
    #[serde(rename = "Blood Parameters")]
    BloodParameters,
    Anthropometric,
    Demographics,
    Lifestyle,
    #[serde(rename = "Medical History")]
    MedicalHistory,
}

impl FeatureCategory {
    pub const ALL: [FeatureCategory; 6] = [
        FeatureCategory::VitalSigns,
        FeatureCategory::BloodParameters,
        FeatureCategory::Anthropometric,
        FeatureCategory::Demographics,
        FeatureCategory::Lifestyle,
        FeatureCategory::MedicalHistory,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureCategory::VitalSigns => "Vital Signs",
            FeatureCategory::BloodParameters => "Blood Parameters",
            FeatureCategory::Anthropometric => "Anthropometric",
            FeatureCategory::Demographics => "Demographics",
            FeatureCategory::Lifestyle => "Lifestyle",
            FeatureCategory::MedicalHistory => "Medical History",
        }
    }
}

impl fmt::Display for FeatureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeatureCategory {
    type Err = anyhow::Error;

    /// Accepts display names ("Vital Signs") and kebab-case ("vital-signs")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace(['-', '_'], " ");
        FeatureCategory::ALL
            .into_iter()
            .find(|c| c.as_str().to_ascii_lowercase() == wanted)
            .ok_or_else(|| {
                let names: Vec<&str> = FeatureCategory::ALL.iter().map(|c| c.as_str()).collect();
                anyhow::anyhow!(
                    "unknown feature category {:?} (expected one of: {})",
                    s,
                    names.join(", ")
                )
            })
    }
}

/// Importance of one input feature in the best model
#[derive(Debug, Clone, Serialize)]
pub struct FeatureImportance {
    pub feature: &'static str,
    /// Human-readable name for reports
    pub label: &'static str,
    pub importance: f64,
    pub category: FeatureCategory,
}

/// Which features to show; owned by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeatureFilter {
    #[default]
    All,
    Category(FeatureCategory),
}

impl FeatureFilter {
    pub fn matches(&self, feature: &FeatureImportance) -> bool {
        match self {
            FeatureFilter::All => true,
            FeatureFilter::Category(c) => feature.category == *c,
        }
    }
}

/// Rows are actual classes, columns are predicted classes, both in tier order
#[derive(Debug, Clone, Serialize)]
pub struct ConfusionMatrix {
    pub labels: [&'static str; 4],
    pub cells: [[u32; 4]; 4],
}

impl ConfusionMatrix {
    pub fn total(&self) -> u32 {
        self.cells.iter().flatten().sum()
    }

    pub fn correct(&self) -> u32 {
        (0..4).map(|i| self.cells[i][i]).sum()
    }

    /// Fraction of samples on the diagonal
    pub fn accuracy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        self.correct() as f64 / total as f64
    }

    pub fn row_totals(&self) -> [u32; 4] {
        let mut totals = [0; 4];
        for (i, row) in self.cells.iter().enumerate() {
            totals[i] = row.iter().sum();
        }
        totals
    }

    pub fn per_class_recall(&self) -> [f64; 4] {
        let totals = self.row_totals();
        let mut recall = [0.0; 4];
        for i in 0..4 {
            if totals[i] > 0 {
                recall[i] = self.cells[i][i] as f64 / totals[i] as f64;
            }
        }
        recall
    }
}

/// Headline figures from the training run that are not derivable from the tables
#[derive(Debug, Clone, Serialize)]
pub struct ProjectFacts {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub report_date: &'static str,
    pub status: &'static str,
    pub clinical_features: u32,
    pub roc_auc: f64,
}

/// The complete evaluation dataset
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub project: ProjectFacts,
    pub models: &'static [ModelMetrics],
    pub recommendations: &'static [ClassShare],
    pub features: &'static [FeatureImportance],
    pub confusion_matrix: ConfusionMatrix,
}

static DASHBOARD: Dashboard = Dashboard {
    project: ProjectFacts {
        title: "Personalized Healthcare Recommendations",
        subtitle: "ML-Based Clinical Decision Support System",
        report_date: "November 27, 2025",
        status: "Production Ready",
        clinical_features: 17,
        roc_auc: 0.969,
    },
    models: &[
        ModelMetrics {
            name: "Logistic Regression",
            test_accuracy: 0.82,
            precision: 0.81,
            recall: 0.82,
            f1_score: 0.81,
            cv_mean: 0.80,
            cv_std: 0.03,
            status: ModelStatus::Fair,
            badge: None,
        },
        ModelMetrics {
            name: "Decision Tree",
            test_accuracy: 0.85,
            precision: 0.84,
            recall: 0.85,
            f1_score: 0.84,
            cv_mean: 0.83,
            cv_std: 0.04,
            status: ModelStatus::Good,
            badge: None,
        },
        ModelMetrics {
            name: "Random Forest",
            test_accuracy: 0.92,
            precision: 0.91,
            recall: 0.92,
            f1_score: 0.91,
            cv_mean: 0.90,
            cv_std: 0.02,
            status: ModelStatus::Best,
            badge: Some("🏆"),
        },
        ModelMetrics {
            name: "Gradient Boosting",
            test_accuracy: 0.89,
            precision: 0.88,
            recall: 0.89,
            f1_score: 0.88,
            cv_mean: 0.87,
            cv_std: 0.03,
            status: ModelStatus::Good,
            badge: None,
        },
        ModelMetrics {
            name: "Support Vector Machine",
            test_accuracy: 0.84,
            precision: 0.83,
            recall: 0.84,
            f1_score: 0.83,
            cv_mean: 0.82,
            cv_std: 0.04,
            status: ModelStatus::Good,
            badge: None,
        },
        ModelMetrics {
            name: "Neural Network",
            test_accuracy: 0.87,
            precision: 0.86,
            recall: 0.87,
            f1_score: 0.86,
            cv_mean: 0.85,
            cv_std: 0.03,
            status: ModelStatus::Good,
            badge: None,
        },
    ],
    recommendations: &[
        ClassShare {
            class: "No Action Needed",
            tier: RecommendationTier::NoAction,
            count: 280,
            percentage: 28.0,
            color: "#2ecc71",
        },
        ClassShare {
            class: "Preventive Check-up",
            tier: RecommendationTier::Preventive,
            count: 310,
            percentage: 31.0,
            color: "#3498db",
        },
        ClassShare {
            class: "Lifestyle Changes",
            tier: RecommendationTier::Lifestyle,
            count: 280,
            percentage: 28.0,
            color: "#f39c12",
        },
        ClassShare {
            class: "Medication",
            tier: RecommendationTier::Medication,
            count: 130,
            percentage: 13.0,
            color: "#e74c3c",
        },
    ],
    features: &[
        FeatureImportance {
            feature: "BloodPressure_Systolic",
            label: "Blood Pressure (Systolic)",
            importance: 0.145,
            category: FeatureCategory::VitalSigns,
        },
        FeatureImportance {
            feature: "Cholesterol",
            label: "Cholesterol",
            importance: 0.132,
            category: FeatureCategory::BloodParameters,
        },
        FeatureImportance {
            feature: "Glucose",
            label: "Glucose",
            importance: 0.128,
            category: FeatureCategory::BloodParameters,
        },
        FeatureImportance {
            feature: "BMI",
            label: "BMI",
            importance: 0.098,
            category: FeatureCategory::Anthropometric,
        },
        FeatureImportance {
            feature: "Age",
            label: "Age",
            importance: 0.087,
            category: FeatureCategory::Demographics,
        },
        FeatureImportance {
            feature: "HeartRate",
            label: "Heart Rate",
            importance: 0.082,
            category: FeatureCategory::VitalSigns,
        },
        FeatureImportance {
            feature: "Hemoglobin",
            label: "Hemoglobin",
            importance: 0.073,
            category: FeatureCategory::BloodParameters,
        },
        FeatureImportance {
            feature: "BloodPressure_Diastolic",
            label: "Blood Pressure (Diastolic)",
            importance: 0.068,
            category: FeatureCategory::VitalSigns,
        },
        FeatureImportance {
            feature: "ExerciseLevel",
            label: "Exercise Level",
            importance: 0.062,
            category: FeatureCategory::Lifestyle,
        },
        FeatureImportance {
            feature: "SmokingStatus",
            label: "Smoking Status",
            importance: 0.055,
            category: FeatureCategory::Lifestyle,
        },
        FeatureImportance {
            feature: "StressLevel",
            label: "Stress Level",
            importance: 0.048,
            category: FeatureCategory::Lifestyle,
        },
        FeatureImportance {
            feature: "SleepHours",
            label: "Sleep Hours",
            importance: 0.041,
            category: FeatureCategory::Lifestyle,
        },
        FeatureImportance {
            feature: "DiabetesHistory",
            label: "Diabetes History",
            importance: 0.038,
            category: FeatureCategory::MedicalHistory,
        },
        FeatureImportance {
            feature: "HeartDiseaseHistory",
            label: "Heart Disease History",
            importance: 0.032,
            category: FeatureCategory::MedicalHistory,
        },
        FeatureImportance {
            feature: "Medication",
            label: "Medication",
            importance: 0.028,
            category: FeatureCategory::MedicalHistory,
        },
    ],
    confusion_matrix: ConfusionMatrix {
        labels: ["No Action", "Preventive", "Lifestyle", "Medication"],
        cells: [[85, 8, 5, 2], [6, 90, 8, 1], [4, 7, 82, 7], [1, 2, 8, 30]],
    },
};

/// The fixed evaluation dataset
pub fn dashboard() -> &'static Dashboard {
    &DASHBOARD
}

impl Dashboard {
    /// Model with the highest test accuracy (first wins on ties)
    pub fn best_model(&self) -> Option<&ModelMetrics> {
        self.models.iter().fold(None, |best: Option<&ModelMetrics>, m| match best {
            Some(b) if b.test_accuracy >= m.test_accuracy => Some(b),
            _ => Some(m),
        })
    }

    /// Models ordered by test accuracy descending, then name
    pub fn models_by_accuracy(&self) -> Vec<&ModelMetrics> {
        let mut models: Vec<&ModelMetrics> = self.models.iter().collect();
        models.sort_by(|a, b| {
            b.test_accuracy
                .partial_cmp(&a.test_accuracy)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.name.cmp(b.name))
        });
        models
    }

    /// Features passing `filter`, by importance descending then name
    pub fn features_in(&self, filter: FeatureFilter) -> Vec<&FeatureImportance> {
        let mut features: Vec<&FeatureImportance> =
            self.features.iter().filter(|f| filter.matches(f)).collect();
        features.sort_by(|a, b| {
            b.importance
                .partial_cmp(&a.importance)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.feature.cmp(b.feature))
        });
        features
    }

    /// Number of patient records behind the class distribution
    pub fn patient_records(&self) -> u32 {
        self.recommendations.iter().map(|r| r.count).sum()
    }

    pub fn share_for(&self, tier: RecommendationTier) -> Option<&ClassShare> {
        self.recommendations.iter().find(|r| r.tier == tier)
    }
}

/// Render the model comparison table
pub fn render_models_text(dashboard: &Dashboard) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "{:<24} {:>8} {:>9} {:>7} {:>7} {:>8} {:>7}  {}\n",
        "MODEL", "ACCURACY", "PRECISION", "RECALL", "F1", "CV MEAN", "CV STD", "STATUS"
    ));
    for m in dashboard.models {
        let status = match m.badge {
            Some(badge) => format!("{} {}", m.status.as_str(), badge),
            None => m.status.as_str().to_string(),
        };
        output.push_str(&format!(
            "{:<24} {:>8} {:>9} {:>7} {:>7} {:>8} {:>7.2}  {}\n",
            m.name,
            percent(m.test_accuracy),
            percent(m.precision),
            percent(m.recall),
            percent(m.f1_score),
            percent(m.cv_mean),
            m.cv_std,
            status
        ));
    }
    output
}

/// Render feature importances matching `filter`
pub fn render_features_text(dashboard: &Dashboard, filter: FeatureFilter) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "{:<24} {:>10}  {}\n",
        "FEATURE", "IMPORTANCE", "CATEGORY"
    ));
    for f in dashboard.features_in(filter) {
        output.push_str(&format!(
            "{:<24} {:>10.3}  {}\n",
            f.feature, f.importance, f.category
        ));
    }
    output
}

/// Render the recommendation class distribution
pub fn render_distribution_text(dashboard: &Dashboard) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "{:<4} {:<22} {:>6} {:>7}\n",
        "", "CLASS", "COUNT", "SHARE"
    ));
    for r in dashboard.recommendations {
        output.push_str(&format!(
            "{:<4} {:<22} {:>6} {:>6.1}%\n",
            r.tier.icon(),
            r.class,
            r.count,
            r.percentage
        ));
    }
    output.push_str(&format!(
        "{:<4} {:<22} {:>6}\n",
        "",
        "Total",
        dashboard.patient_records()
    ));
    output
}

/// Render the confusion matrix with row recall
pub fn render_confusion_text(matrix: &ConfusionMatrix) -> String {
    let mut output = String::new();
    output.push_str(&format!("{:<12}", "ACTUAL\\PRED"));
    for label in &matrix.labels {
        output.push_str(&format!(" {:>11}", label));
    }
    output.push_str(&format!(" {:>8}\n", "RECALL"));

    let recall = matrix.per_class_recall();
    for (i, row) in matrix.cells.iter().enumerate() {
        output.push_str(&format!("{:<12}", matrix.labels[i]));
        for value in row {
            output.push_str(&format!(" {:>11}", value));
        }
        output.push_str(&format!(" {:>7.1}%\n", recall[i] * 100.0));
    }

    output.push_str(&format!(
        "\nOverall accuracy: {:.1}% ({} of {})\n",
        matrix.accuracy() * 100.0,
        matrix.correct(),
        matrix.total()
    ));
    output
}

/// Format a 0..1 fraction as a whole percentage
pub fn percent(fraction: f64) -> String {
    format!("{:.0}%", fraction * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_shape() {
        let d = dashboard();
        assert_eq!(d.models.len(), 6);
        assert_eq!(d.recommendations.len(), 4);
        assert_eq!(d.features.len(), 15);
    }

    #[test]
    fn test_best_model_is_random_forest() {
        let best = dashboard().best_model().unwrap();
        assert_eq!(best.name, "Random Forest");
        assert_eq!(best.status, ModelStatus::Best);
    }

    #[test]
    fn test_models_by_accuracy_order() {
        let names: Vec<&str> = dashboard()
            .models_by_accuracy()
            .iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(
            names,
            vec![
                "Random Forest",
                "Gradient Boosting",
                "Neural Network",
                "Decision Tree",
                "Support Vector Machine",
                "Logistic Regression",
            ]
        );
    }

    #[test]
    fn test_distribution_follows_tier_order() {
        let tiers: Vec<RecommendationTier> =
            dashboard().recommendations.iter().map(|r| r.tier).collect();
        assert_eq!(tiers, RecommendationTier::ALL.to_vec());
        assert_eq!(dashboard().patient_records(), 1000);
    }

    #[test]
    fn test_percentages_match_counts() {
        let d = dashboard();
        let total = d.patient_records() as f64;
        for r in d.recommendations {
            let expected = r.count as f64 / total * 100.0;
            assert!((r.percentage - expected).abs() < 1e-9, "{}", r.class);
        }
    }

    #[test]
    fn test_feature_filter_all() {
        let features = dashboard().features_in(FeatureFilter::All);
        assert_eq!(features.len(), 15);
        assert_eq!(features[0].feature, "BloodPressure_Systolic");
        assert_eq!(features[14].feature, "Medication");
    }

    #[test]
    fn test_feature_filter_category() {
        let features =
            dashboard().features_in(FeatureFilter::Category(FeatureCategory::Lifestyle));
        let names: Vec<&str> = features.iter().map(|f| f.feature).collect();
        assert_eq!(
            names,
            vec!["ExerciseLevel", "SmokingStatus", "StressLevel", "SleepHours"]
        );
    }

    #[test]
    fn test_every_category_has_features() {
        for category in FeatureCategory::ALL {
            assert!(
                !dashboard()
                    .features_in(FeatureFilter::Category(category))
                    .is_empty(),
                "{}",
                category
            );
        }
    }

    #[test]
    fn test_category_parsing() {
        assert_eq!(
            "vital-signs".parse::<FeatureCategory>().unwrap(),
            FeatureCategory::VitalSigns
        );
        assert_eq!(
            "Medical History".parse::<FeatureCategory>().unwrap(),
            FeatureCategory::MedicalHistory
        );
        assert_eq!(
            "blood_parameters".parse::<FeatureCategory>().unwrap(),
            FeatureCategory::BloodParameters
        );
        assert!("genetics".parse::<FeatureCategory>().is_err());
    }

    #[test]
    fn test_confusion_matrix_stats() {
        let m = &dashboard().confusion_matrix;
        assert_eq!(m.total(), 346);
        assert_eq!(m.correct(), 287);
        assert_eq!(m.row_totals(), [100, 105, 100, 41]);
        assert!((m.accuracy() - 287.0 / 346.0).abs() < 1e-12);
        let recall = m.per_class_recall();
        assert!((recall[0] - 0.85).abs() < 1e-12);
        assert!((recall[3] - 30.0 / 41.0).abs() < 1e-12);
    }

    #[test]
    fn test_render_models_marks_best() {
        let text = render_models_text(dashboard());
        let line = text
            .lines()
            .find(|l| l.starts_with("Random Forest"))
            .unwrap();
        assert!(line.contains("92%"));
        assert!(line.ends_with("Best 🏆"));
        assert_eq!(text.lines().count(), 7);
    }

    #[test]
    fn test_render_features_respects_filter() {
        let text = render_features_text(
            dashboard(),
            FeatureFilter::Category(FeatureCategory::Demographics),
        );
        assert_eq!(text.lines().count(), 2);
        assert!(text.contains("Age"));
        assert!(text.contains("0.087"));
    }

    #[test]
    fn test_render_distribution_total() {
        let text = render_distribution_text(dashboard());
        assert!(text.contains("Preventive Check-up"));
        assert!(text.contains("31.0%"));
        assert!(text.lines().last().unwrap().trim_end().ends_with("1000"));
    }

    #[test]
    fn test_render_confusion() {
        let text = render_confusion_text(&dashboard().confusion_matrix);
        assert!(text.contains("Overall accuracy: 82.9% (287 of 346)"));
        assert!(text.contains("85.0%"));
    }

    #[test]
    fn test_percent_rounding() {
        assert_eq!(percent(0.92), "92%");
        assert_eq!(percent(0.9), "90%");
    }
}
