//! Patient input model and boundary validation
//!
//! The scoring engine trusts its input. Anything collected from a user goes
//! through `PatientForm::validate` (raw text) or `PatientInput::validate`
//! (already typed) before it is scored.
//!
//! Global invariants enforced:
//! - Validation fails fast on the first invalid field, in form order
//! - Missing or malformed values are rejected, never defaulted

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Rejection raised by the input-collection boundary
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("missing required field: {field}")]
    Missing { field: &'static str },

    #[error("{field} must be a number (got {value:?})")]
    NotANumber { field: &'static str, value: String },

    #[error("{field} must be between {min} and {max} (got {value})")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{field} has unknown value {value:?} (expected one of: {expected})")]
    UnknownCategory {
        field: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Inclusive accepted range for a numeric field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub field: &'static str,
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    /// Check a value against the range; non-finite values never pass
    pub fn check(&self, value: f64) -> Result<(), InputError> {
        if !value.is_finite() || value < self.min || value > self.max {
            return Err(InputError::OutOfRange {
                field: self.field,
                value,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

pub const AGE: Bounds = Bounds { field: "age", min: 0.0, max: 120.0 };
pub const SYSTOLIC_BP: Bounds = Bounds { field: "systolic_bp", min: 60.0, max: 250.0 };
pub const DIASTOLIC_BP: Bounds = Bounds { field: "diastolic_bp", min: 30.0, max: 150.0 };
pub const CHOLESTEROL: Bounds = Bounds { field: "cholesterol", min: 80.0, max: 500.0 };
pub const GLUCOSE: Bounds = Bounds { field: "glucose", min: 40.0, max: 500.0 };
pub const HEART_RATE: Bounds = Bounds { field: "heart_rate", min: 30.0, max: 220.0 };
pub const BMI: Bounds = Bounds { field: "bmi", min: 10.0, max: 70.0 };

/// Smoking status as collected by the intake form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmokingStatus {
    #[serde(alias = "Never", alias = "Never-smoked")]
    Never,
    #[serde(alias = "Former", alias = "Former-smoker")]
    Former,
    #[serde(alias = "Current", alias = "Current-smoker")]
    Current,
}

impl SmokingStatus {
    const EXPECTED: &'static str = "never, former, current";

    pub fn as_str(&self) -> &'static str {
        match self {
            SmokingStatus::Never => "never",
            SmokingStatus::Former => "former",
            SmokingStatus::Current => "current",
        }
    }
}

impl FromStr for SmokingStatus {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "never" | "never-smoked" => Ok(SmokingStatus::Never),
            "former" | "former-smoker" => Ok(SmokingStatus::Former),
            "current" | "current-smoker" => Ok(SmokingStatus::Current),
            _ => Err(InputError::UnknownCategory {
                field: "smoking_status",
                value: s.to_string(),
                expected: Self::EXPECTED,
            }),
        }
    }
}

/// Habitual exercise level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseLevel {
    #[serde(alias = "Sedentary")]
    Sedentary,
    #[serde(alias = "Moderate")]
    Moderate,
    #[serde(alias = "Active")]
    Active,
}

impl ExerciseLevel {
    const EXPECTED: &'static str = "sedentary, moderate, active";

    pub fn as_str(&self) -> &'static str {
        match self {
            ExerciseLevel::Sedentary => "sedentary",
            ExerciseLevel::Moderate => "moderate",
            ExerciseLevel::Active => "active",
        }
    }
}

impl FromStr for ExerciseLevel {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sedentary" => Ok(ExerciseLevel::Sedentary),
            "moderate" => Ok(ExerciseLevel::Moderate),
            "active" => Ok(ExerciseLevel::Active),
            _ => Err(InputError::UnknownCategory {
                field: "exercise_level",
                value: s.to_string(),
                expected: Self::EXPECTED,
            }),
        }
    }
}

/// Self-reported stress level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StressLevel {
    #[serde(alias = "Low")]
    Low,
    #[serde(alias = "Moderate")]
    Moderate,
    #[serde(alias = "High")]
    High,
}

impl StressLevel {
    const EXPECTED: &'static str = "low, moderate, high";

    pub fn as_str(&self) -> &'static str {
        match self {
            StressLevel::Low => "low",
            StressLevel::Moderate => "moderate",
            StressLevel::High => "high",
        }
    }
}

impl FromStr for StressLevel {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(StressLevel::Low),
            "moderate" => Ok(StressLevel::Moderate),
            "high" => Ok(StressLevel::High),
            _ => Err(InputError::UnknownCategory {
                field: "stress_level",
                value: s.to_string(),
                expected: Self::EXPECTED,
            }),
        }
    }
}

/// Validated patient feature vector consumed by the scoring engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct PatientInput {
    pub age: u32,
    /// mmHg
    pub systolic_bp: u32,
    /// mmHg
    pub diastolic_bp: u32,
    /// mg/dL
    pub cholesterol: u32,
    /// mg/dL
    pub glucose: u32,
    /// bpm
    pub heart_rate: u32,
    pub bmi: f64,
    pub smoking_status: SmokingStatus,
    pub exercise_level: ExerciseLevel,
    pub stress_level: StressLevel,
}

impl PatientInput {
    /// Re-check an already typed input against the accepted ranges
    pub fn validate(&self) -> Result<(), InputError> {
        AGE.check(self.age as f64)?;
        SYSTOLIC_BP.check(self.systolic_bp as f64)?;
        DIASTOLIC_BP.check(self.diastolic_bp as f64)?;
        CHOLESTEROL.check(self.cholesterol as f64)?;
        GLUCOSE.check(self.glucose as f64)?;
        HEART_RATE.check(self.heart_rate as f64)?;
        BMI.check(self.bmi)?;
        Ok(())
    }
}

/// A single raw form value: JSON numbers and free text are both accepted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormValue {
    Number(f64),
    Text(String),
}

impl FormValue {
    fn as_text(&self) -> String {
        match self {
            FormValue::Number(n) => n.to_string(),
            FormValue::Text(s) => s.trim().to_string(),
        }
    }
}

impl From<&str> for FormValue {
    fn from(value: &str) -> Self {
        FormValue::Text(value.to_string())
    }
}

impl From<String> for FormValue {
    fn from(value: String) -> Self {
        FormValue::Text(value)
    }
}

impl fmt::Display for FormValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_text())
    }
}

/// Unvalidated intake form, exactly as a user filled it in
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct PatientForm {
    #[serde(default)]
    pub age: Option<FormValue>,
    #[serde(default)]
    pub systolic_bp: Option<FormValue>,
    #[serde(default)]
    pub diastolic_bp: Option<FormValue>,
    #[serde(default)]
    pub cholesterol: Option<FormValue>,
    #[serde(default)]
    pub glucose: Option<FormValue>,
    #[serde(default)]
    pub heart_rate: Option<FormValue>,
    #[serde(default)]
    pub bmi: Option<FormValue>,
    #[serde(default)]
    pub smoking_status: Option<FormValue>,
    #[serde(default)]
    pub exercise_level: Option<FormValue>,
    #[serde(default)]
    pub stress_level: Option<FormValue>,
}

impl PatientForm {
    /// Parse and range-check every field, in form order
    pub fn validate(&self) -> Result<PatientInput, InputError> {
        Ok(PatientInput {
            age: parse_integer(&self.age, AGE)?,
            systolic_bp: parse_integer(&self.systolic_bp, SYSTOLIC_BP)?,
            diastolic_bp: parse_integer(&self.diastolic_bp, DIASTOLIC_BP)?,
            cholesterol: parse_integer(&self.cholesterol, CHOLESTEROL)?,
            glucose: parse_integer(&self.glucose, GLUCOSE)?,
            heart_rate: parse_integer(&self.heart_rate, HEART_RATE)?,
            bmi: parse_decimal(&self.bmi, BMI)?,
            smoking_status: required_text(&self.smoking_status, "smoking_status")?.parse()?,
            exercise_level: required_text(&self.exercise_level, "exercise_level")?.parse()?,
            stress_level: required_text(&self.stress_level, "stress_level")?.parse()?,
        })
    }
}

fn required_text(value: &Option<FormValue>, field: &'static str) -> Result<String, InputError> {
    match value {
        Some(v) => {
            let text = v.as_text();
            if text.is_empty() {
                Err(InputError::Missing { field })
            } else {
                Ok(text)
            }
        }
        None => Err(InputError::Missing { field }),
    }
}

fn parse_integer(value: &Option<FormValue>, bounds: Bounds) -> Result<u32, InputError> {
    let text = required_text(value, bounds.field)?;
    let parsed: i64 = text.parse().map_err(|_| InputError::NotANumber {
        field: bounds.field,
        value: text.clone(),
    })?;
    bounds.check(parsed as f64)?;
    // In range, so it fits
    Ok(parsed as u32)
}

fn parse_decimal(value: &Option<FormValue>, bounds: Bounds) -> Result<f64, InputError> {
    let text = required_text(value, bounds.field)?;
    let parsed: f64 = text.parse().map_err(|_| InputError::NotANumber {
        field: bounds.field,
        value: text.clone(),
    })?;
    // "NaN" and "inf" parse as f64 but are not measurements
    if !parsed.is_finite() {
        return Err(InputError::NotANumber {
            field: bounds.field,
            value: text,
        });
    }
    bounds.check(parsed)?;
    Ok(parsed)
}
