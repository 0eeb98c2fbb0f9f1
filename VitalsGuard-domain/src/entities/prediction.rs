use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

/// Ordinal risk category attached to a risk score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    Critical,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Moderate => "MODERATE",
            RiskLevel::High => "HIGH",
            RiskLevel::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "LOW" => Ok(RiskLevel::Low),
            "MODERATE" => Ok(RiskLevel::Moderate),
            "HIGH" => Ok(RiskLevel::High),
            "CRITICAL" => Ok(RiskLevel::Critical),
            other => Err(format!("Invalid risk level: {}", other)),
        }
    }
}

/// The four rule-based sub-models combined by the ensemble
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    Cardiovascular,
    Respiratory,
    Metabolic,
    General,
}

impl ModelKind {
    /// Every sub-model, in evaluation order
    pub const ALL: [ModelKind; 4] = [
        ModelKind::Cardiovascular,
        ModelKind::Respiratory,
        ModelKind::Metabolic,
        ModelKind::General,
    ];

    /// Ensemble weight. The four weights sum to 1.0.
    pub fn weight(&self) -> f64 {
        match self {
            ModelKind::Cardiovascular => 0.3,
            ModelKind::Respiratory => 0.25,
            ModelKind::Metabolic => 0.25,
            ModelKind::General => 0.2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::Cardiovascular => "cardiovascular",
            ModelKind::Respiratory => "respiratory",
            ModelKind::Metabolic => "metabolic",
            ModelKind::General => "general",
        }
    }

    /// Capitalized name for narrative text
    pub fn display_name(&self) -> &'static str {
        match self {
            ModelKind::Cardiovascular => "Cardiovascular",
            ModelKind::Respiratory => "Respiratory",
            ModelKind::Metabolic => "Metabolic",
            ModelKind::General => "General",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of a single sub-scorer. Ephemeral, never persisted on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct SubScorePrediction {
    /// Which sub-model produced this prediction
    pub model: ModelKind,

    /// Risk score clamped to 0-100
    pub risk_score: f64,

    /// Risk level from the sub-model's own cut points
    pub risk_level: RiskLevel,

    /// Conditions flagged by triggered rules, in rule order
    pub predicted_conditions: Vec<String>,

    /// Recommendations from triggered rules, in rule order
    pub recommendations: Vec<String>,

    /// Cosmetic confidence, 0-100
    pub confidence: f64,
}

/// Prediction strategy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum PredictionMode {
    /// Single-pass scorer on one 0-100 scale
    Simple,
    /// Four sub-models combined by weight
    #[default]
    Ensemble,
}

impl PredictionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PredictionMode::Simple => "simple",
            PredictionMode::Ensemble => "ensemble",
        }
    }
}

impl fmt::Display for PredictionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PredictionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "simple" => Ok(PredictionMode::Simple),
            "ensemble" => Ok(PredictionMode::Ensemble),
            other => Err(format!("Unknown prediction mode: {}", other)),
        }
    }
}

/// Vital-sign dimension used for feature importance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    HeartRate,
    BloodPressure,
    Spo2,
    Temperature,
}

impl Feature {
    pub const ALL: [Feature; 4] = [
        Feature::HeartRate,
        Feature::BloodPressure,
        Feature::Spo2,
        Feature::Temperature,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Feature::HeartRate => "Heart Rate",
            Feature::BloodPressure => "Blood Pressure",
            Feature::Spo2 => "Oxygen Saturation",
            Feature::Temperature => "Temperature",
        }
    }
}

/// How much one vital contributed to the assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct FeatureImportance {
    pub feature: Feature,

    /// Measured value with unit, e.g. "150/95 mmHg"
    pub actual_value: String,

    /// Reference value with unit
    pub normal_reference: String,

    /// Weighted deviation from normal, 0-1
    pub importance_score: f64,

    /// `importance_score` as a rounded percentage
    pub contribution_percentage: u8,

    pub impact_description: String,
}

/// Human-readable explanation of an ensemble verdict
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct Explainability {
    pub feature_importance: Vec<FeatureImportance>,
    pub why_this_risk_level: String,
    pub key_contributing_factors: Vec<String>,
    pub model_reasoning: Vec<String>,
    pub confidence_factors: String,
    pub decision_path: Vec<String>,
}

/// Spread of the sub-model confidences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct ConfidenceIntervals {
    pub mean_confidence: u8,

    /// Approximate 95% interval `[lower, upper]`, clamped to 0-100
    #[cfg_attr(feature = "with-api", schema(value_type = Vec<u8>))]
    pub confidence_range: [u8; 2],

    pub reliability_score: u8,
}

/// One sub-model's share of the weighted risk score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct ModelContribution {
    pub score: f64,
    pub weight: f64,
    /// `score * weight`
    pub contribution: f64,
    pub risk_level: RiskLevel,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct ModelContributions {
    pub cardiovascular: ModelContribution,
    pub respiratory: ModelContribution,
    pub metabolic: ModelContribution,
    pub general: ModelContribution,
}

impl ModelContributions {
    pub fn get(&self, model: ModelKind) -> &ModelContribution {
        match model {
            ModelKind::Cardiovascular => &self.cardiovascular,
            ModelKind::Respiratory => &self.respiratory,
            ModelKind::Metabolic => &self.metabolic,
            ModelKind::General => &self.general,
        }
    }
}

/// The unit persisted and displayed for every assessment.
///
/// The ensemble strategy fills in `explainability`, `confidenceIntervals` and
/// `modelContributions`; the simple strategy leaves them out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct HealthPrediction {
    pub id: Uuid,

    /// Strategy that produced this prediction
    pub mode: PredictionMode,

    /// Overall risk score, 0-100
    pub risk_score: u8,

    pub risk_level: RiskLevel,

    /// Deduplicated conditions in first-seen order
    pub predicted_conditions: Vec<String>,

    /// Overall confidence, 0-100
    pub confidence: u8,

    /// At most five recommendations, most urgent first
    pub recommendations: Vec<String>,

    /// Narrative summary shown to the user
    pub feedback: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explainability: Option<Explainability>,

    #[serde(rename = "confidenceIntervals", default, skip_serializing_if = "Option::is_none")]
    pub confidence_intervals: Option<ConfidenceIntervals>,

    #[serde(rename = "modelContributions", default, skip_serializing_if = "Option::is_none")]
    pub model_contributions: Option<ModelContributions>,

    pub model_version: String,

    pub timestamp: DateTime<Utc>,
}
