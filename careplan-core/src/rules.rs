//! Declarative risk rule table
//!
//! Each rule is a (predicate, delta, factor) triple. Rules are evaluated
//! independently and in table order; deltas are additive.
//!
//! Global invariants enforced:
//! - Rule order is fixed and determines risk factor order
//! - Score is a pure function of the input

use crate::input::{ExerciseLevel, PatientInput, SmokingStatus, StressLevel};

/// Systolic pressure above this is hypertensive (mmHg)
pub const SYSTOLIC_LIMIT: u32 = 140;
/// Diastolic pressure above this is hypertensive (mmHg)
pub const DIASTOLIC_LIMIT: u32 = 90;
/// Total cholesterol above this is high (mg/dL)
pub const CHOLESTEROL_LIMIT: u32 = 240;
/// Fasting glucose above this suggests diabetes risk (mg/dL)
pub const GLUCOSE_LIMIT: u32 = 125;
/// BMI above this is obese
pub const BMI_LIMIT: f64 = 30.0;
/// Age above this adds an age-related point
pub const AGE_LIMIT: u32 = 55;

/// Risk factor reported when no rule fires
pub const NO_RISK_FACTORS: &str = "No significant risk factors detected";

/// A single scoring rule
pub struct Rule {
    /// Stable identifier, kebab-case
    pub id: &'static str,
    /// Score contribution when the rule fires
    pub delta: u32,
    /// Human-readable risk factor text
    pub factor: &'static str,
    predicate: fn(&PatientInput) -> bool,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("id", &self.id)
            .field("delta", &self.delta)
            .field("factor", &self.factor)
            .finish_non_exhaustive()
    }
}

impl Rule {
    /// Whether this rule fires for the given input
    pub fn applies(&self, input: &PatientInput) -> bool {
        (self.predicate)(input)
    }
}

/// All rules, in evaluation order
pub static RULES: [Rule; 8] = [
    Rule {
        id: "hypertension",
        delta: 3,
        factor: "Elevated blood pressure indicating hypertension",
        predicate: elevated_blood_pressure,
    },
    Rule {
        id: "high-cholesterol",
        delta: 3,
        factor: "High cholesterol levels",
        predicate: high_cholesterol,
    },
    Rule {
        id: "elevated-glucose",
        delta: 3,
        factor: "Elevated glucose levels suggesting diabetes risk",
        predicate: elevated_glucose,
    },
    Rule {
        id: "obesity",
        delta: 2,
        factor: "BMI indicates obesity",
        predicate: obese,
    },
    Rule {
        id: "current-smoker",
        delta: 2,
        factor: "Current smoking status",
        predicate: current_smoker,
    },
    Rule {
        id: "sedentary",
        delta: 1,
        factor: "Sedentary lifestyle",
        predicate: sedentary,
    },
    Rule {
        id: "high-stress",
        delta: 1,
        factor: "High stress levels",
        predicate: high_stress,
    },
    Rule {
        id: "age",
        delta: 1,
        factor: "Age-related health considerations",
        predicate: older_age,
    },
];

/// Highest reachable score (every rule fires)
pub const MAX_SCORE: u32 = 16;

fn elevated_blood_pressure(p: &PatientInput) -> bool {
    p.systolic_bp > SYSTOLIC_LIMIT || p.diastolic_bp > DIASTOLIC_LIMIT
}

fn high_cholesterol(p: &PatientInput) -> bool {
    p.cholesterol > CHOLESTEROL_LIMIT
}

fn elevated_glucose(p: &PatientInput) -> bool {
    p.glucose > GLUCOSE_LIMIT
}

fn obese(p: &PatientInput) -> bool {
    p.bmi > BMI_LIMIT
}

fn current_smoker(p: &PatientInput) -> bool {
    p.smoking_status == SmokingStatus::Current
}

fn sedentary(p: &PatientInput) -> bool {
    p.exercise_level == ExerciseLevel::Sedentary
}

fn high_stress(p: &PatientInput) -> bool {
    p.stress_level == StressLevel::High
}

fn older_age(p: &PatientInput) -> bool {
    p.age > AGE_LIMIT
}

/// Outcome of running the rule table against one input
#[derive(Debug, Clone)]
pub struct RuleEvaluation {
    pub score: u32,
    /// Rules that fired, in table order
    pub triggered: Vec<&'static Rule>,
}

impl RuleEvaluation {
    /// Risk factor texts in table order, or the single sentinel if nothing fired
    pub fn risk_factors(&self) -> Vec<String> {
        if self.triggered.is_empty() {
            return vec![NO_RISK_FACTORS.to_string()];
        }
        self.triggered.iter().map(|r| r.factor.to_string()).collect()
    }
}

/// Run every rule against the input
pub fn evaluate(input: &PatientInput) -> RuleEvaluation {
    let triggered: Vec<&'static Rule> = RULES.iter().filter(|r| r.applies(input)).collect();
    let score = triggered.iter().map(|r| r.delta).sum();
    RuleEvaluation { score, triggered }
}
