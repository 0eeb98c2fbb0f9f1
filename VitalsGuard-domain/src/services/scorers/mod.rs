//! Rule-based sub-scorers.
//!
//! Every scorer starts from zero, adds fixed points for each triggered
//! threshold rule, clamps to `[0, 100]` and maps the result to a risk level with
//! its own cut points. Rules run in a fixed order, which is also the order
//! conditions are reported in.

pub mod cardiovascular;
pub mod general;
pub mod metabolic;
pub mod respiratory;

pub use cardiovascular::CardiovascularScorer;
pub use general::GeneralScorer;
pub use metabolic::MetabolicScorer;
pub use respiratory::RespiratoryScorer;

use thiserror::Error;

use crate::entities::prediction::{ModelKind, RiskLevel, SubScorePrediction};
use crate::entities::vitals::{UserProfile, VitalsReading};
use crate::services::jitter::ConfidenceJitter;

/// Errors raised while scoring
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ScoringError {
    /// An input read by a scorer is NaN or infinite
    #[error("{model} scorer received a non-finite {field}")]
    NonFinite { model: ModelKind, field: &'static str },
}

/// A domain-specific risk scorer
pub trait RiskScorer {
    /// The sub-model this scorer implements
    fn model(&self) -> ModelKind;

    /// Score one reading
    fn score(
        &self,
        reading: &VitalsReading,
        profile: Option<&UserProfile>,
        jitter: &dyn ConfidenceJitter,
    ) -> Result<SubScorePrediction, ScoringError>;
}

impl ModelKind {
    /// Run the scorer for this sub-model
    pub fn score(
        &self,
        reading: &VitalsReading,
        profile: Option<&UserProfile>,
        jitter: &dyn ConfidenceJitter,
    ) -> Result<SubScorePrediction, ScoringError> {
        match self {
            ModelKind::Cardiovascular => CardiovascularScorer.score(reading, profile, jitter),
            ModelKind::Respiratory => RespiratoryScorer.score(reading, profile, jitter),
            ModelKind::Metabolic => MetabolicScorer.score(reading, profile, jitter),
            ModelKind::General => GeneralScorer.score(reading, profile, jitter),
        }
    }
}

/// Clamp a score into `[0, 100]`
pub fn clamp_score(score: f64) -> f64 {
    score.clamp(0.0, 100.0)
}

pub(crate) fn ensure_finite(model: ModelKind, field: &'static str, value: f64) -> Result<(), ScoringError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ScoringError::NonFinite { model, field })
    }
}

/// Base confidence plus the jitter drawn for this model and reading, capped at 100
pub(crate) fn draw_confidence(
    model: ModelKind,
    base: f64,
    span: f64,
    reading: &VitalsReading,
    jitter: &dyn ConfidenceJitter,
) -> f64 {
    (base + jitter.jitter(model, reading, span)).min(100.0)
}

/// Accumulates triggered rules for one scorer
#[derive(Debug, Default)]
pub(crate) struct RuleTally {
    score: f64,
    conditions: Vec<String>,
    recommendations: Vec<String>,
}

impl RuleTally {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn trigger(&mut self, points: f64, condition: &str, recommendation: &str) {
        self.score += points;
        self.conditions.push(condition.to_string());
        self.recommendations.push(recommendation.to_string());
    }

    pub(crate) fn multiply(&mut self, factor: f64) {
        self.score *= factor;
    }

    /// Clamp, classify and attach confidence. `fallback` is the advice given
    /// when no rule fired.
    pub(crate) fn finish(
        self,
        model: ModelKind,
        classify: fn(f64) -> RiskLevel,
        confidence: f64,
        fallback: &str,
    ) -> SubScorePrediction {
        let risk_score = clamp_score(self.score);
        let mut recommendations = self.recommendations;
        if recommendations.is_empty() {
            recommendations.push(fallback.to_string());
        }

        SubScorePrediction {
            model,
            risk_score,
            risk_level: classify(risk_score),
            predicted_conditions: self.conditions,
            recommendations,
            confidence,
        }
    }
}
