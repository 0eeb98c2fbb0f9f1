//! Weighted ensemble over the four sub-scorers.
//!
//! Aggregation is all-or-nothing: if any sub-scorer fails the whole prediction
//! fails and no partial verdict is produced.

use std::collections::HashSet;

use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use crate::entities::prediction::{HealthPrediction, ModelKind, PredictionMode, RiskLevel, SubScorePrediction};
use crate::entities::vitals::{UserProfile, VitalsReading};
use crate::services::confidence::calculate_confidence_intervals;
use crate::services::explainability::{generate_explainability, model_contributions};
use crate::services::jitter::ConfidenceJitter;
use crate::services::scorers::ScoringError;

pub const ENSEMBLE_MODEL_VERSION: &str = "ensemble-1.0.0";

/// Maximum number of recommendations returned to the user
pub const MAX_RECOMMENDATIONS: usize = 5;

const HIGH_URGENCY_KEYWORDS: [&str; 4] = ["immediate", "emergency", "critical", "urgent"];
const MEDIUM_URGENCY_KEYWORDS: [&str; 3] = ["soon", "consult", "monitor"];

/// Combines the sub-scorers into one verdict
#[derive(Debug, Clone, Copy)]
pub struct EnsembleAggregator<'a> {
    jitter: &'a dyn ConfidenceJitter,
}

impl<'a> EnsembleAggregator<'a> {
    pub fn new(jitter: &'a dyn ConfidenceJitter) -> Self {
        Self { jitter }
    }

    /// Run every sub-scorer, in `ModelKind::ALL` order
    pub fn score_all(
        &self,
        reading: &VitalsReading,
        profile: Option<&UserProfile>,
    ) -> Result<[SubScorePrediction; 4], ScoringError> {
        let [cardiovascular, respiratory, metabolic, general] = ModelKind::ALL;
        Ok([
            cardiovascular.score(reading, profile, self.jitter)?,
            respiratory.score(reading, profile, self.jitter)?,
            metabolic.score(reading, profile, self.jitter)?,
            general.score(reading, profile, self.jitter)?,
        ])
    }

    /// Produce the full ensemble prediction for one reading
    pub fn predict(
        &self,
        reading: &VitalsReading,
        profile: Option<&UserProfile>,
    ) -> Result<HealthPrediction, ScoringError> {
        let sub_predictions = self.score_all(reading, profile)?;

        let risk_score = weighted_risk_score(&sub_predictions);
        let risk_level = overall_risk_level(risk_score, &sub_predictions);
        let predicted_conditions = merge_conditions(&sub_predictions);
        let confidences: Vec<f64> = sub_predictions.iter().map(|s| s.confidence).collect();

        debug!(
            "Ensemble verdict {} (score {}) from sub-scores {:?}",
            risk_level,
            risk_score,
            sub_predictions.iter().map(|s| s.risk_score).collect::<Vec<_>>()
        );

        Ok(HealthPrediction {
            id: Uuid::new_v4(),
            mode: PredictionMode::Ensemble,
            risk_score,
            risk_level,
            confidence: ensemble_confidence(&sub_predictions),
            recommendations: rank_recommendations(&sub_predictions),
            feedback: generate_feedback(risk_level, risk_score, &predicted_conditions),
            predicted_conditions,
            explainability: Some(generate_explainability(reading, risk_level, &sub_predictions)),
            confidence_intervals: Some(calculate_confidence_intervals(&confidences)),
            model_contributions: Some(model_contributions(&sub_predictions)),
            model_version: ENSEMBLE_MODEL_VERSION.to_string(),
            timestamp: Utc::now(),
        })
    }
}

/// Unrounded sum of score times weight
pub fn weighted_sum(sub_predictions: &[SubScorePrediction]) -> f64 {
    sub_predictions
        .iter()
        .map(|s| s.risk_score * s.model.weight())
        .sum()
}

/// Weighted sum rounded onto the 0-100 scale
pub fn weighted_risk_score(sub_predictions: &[SubScorePrediction]) -> u8 {
    weighted_sum(sub_predictions).round().clamp(0.0, 100.0) as u8
}

/// Level for the weighted score. A CRITICAL sub-verdict always wins.
pub fn overall_risk_level(risk_score: u8, sub_predictions: &[SubScorePrediction]) -> RiskLevel {
    if sub_predictions.iter().any(|s| s.risk_level == RiskLevel::Critical) {
        return RiskLevel::Critical;
    }
    match risk_score {
        80..=u8::MAX => RiskLevel::Critical,
        60..=79 => RiskLevel::High,
        35..=59 => RiskLevel::Moderate,
        _ => RiskLevel::Low,
    }
}

/// Union of all conditions, first occurrence wins
pub fn merge_conditions(sub_predictions: &[SubScorePrediction]) -> Vec<String> {
    let mut seen = HashSet::new();
    sub_predictions
        .iter()
        .flat_map(|s| s.predicted_conditions.iter())
        .filter(|condition| seen.insert(condition.as_str()))
        .cloned()
        .collect()
}

/// Urgency tier of a recommendation, 3 being most urgent
pub fn urgency_score(recommendation: &str) -> u8 {
    let lower = recommendation.to_lowercase();
    if HIGH_URGENCY_KEYWORDS.iter().any(|k| lower.contains(k)) {
        3
    } else if MEDIUM_URGENCY_KEYWORDS.iter().any(|k| lower.contains(k)) {
        2
    } else {
        1
    }
}

/// Deduplicate, order by urgency (stable within a tier) and keep the top five
pub fn rank_recommendations(sub_predictions: &[SubScorePrediction]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut recommendations: Vec<String> = sub_predictions
        .iter()
        .flat_map(|s| s.recommendations.iter())
        .filter(|r| seen.insert(r.as_str()))
        .cloned()
        .collect();

    recommendations.sort_by_key(|r| std::cmp::Reverse(urgency_score(r)));
    recommendations.truncate(MAX_RECOMMENDATIONS);
    recommendations
}

/// Confidence multiplier from the number of distinct sub-verdicts
pub fn agreement_factor(sub_predictions: &[SubScorePrediction]) -> f64 {
    let distinct: HashSet<RiskLevel> = sub_predictions.iter().map(|s| s.risk_level).collect();
    match distinct.len() {
        0 | 1 => 1.0,
        2 => 0.9,
        3 => 0.8,
        _ => 0.7,
    }
}

/// Weighted sub-model confidence scaled by agreement
pub fn ensemble_confidence(sub_predictions: &[SubScorePrediction]) -> u8 {
    let weighted: f64 = sub_predictions
        .iter()
        .map(|s| s.confidence * s.model.weight())
        .sum();
    (weighted * agreement_factor(sub_predictions))
        .round()
        .clamp(0.0, 100.0) as u8
}

/// Narrative summary of an ensemble verdict
pub fn generate_feedback(risk_level: RiskLevel, risk_score: u8, conditions: &[String]) -> String {
    let mut feedback = format!(
        "Your multi-model health assessment indicates {} risk (score {}/100).\n\n",
        risk_level, risk_score
    );

    if conditions.is_empty() {
        feedback.push_str(
            "Great news! None of the models detected a health concern in this reading. \
             Keep up your healthy habits.",
        );
    } else {
        feedback.push_str("Conditions identified:\n");
        for (index, condition) in conditions.iter().enumerate() {
            feedback.push_str(&format!("{}. {}\n", index + 1, condition));
        }
        feedback.push_str("Please review the recommendations below.");
    }

    let domains: Vec<&str> = ModelKind::ALL.iter().map(|m| m.as_str()).collect();
    feedback.push_str(&format!(
        "\n\nThis assessment combines {} and {} models. It is not a diagnosis; \
         consult a healthcare professional about any concerns.",
        domains[..domains.len() - 1].join(", "),
        domains[domains.len() - 1]
    ));
    feedback
}
