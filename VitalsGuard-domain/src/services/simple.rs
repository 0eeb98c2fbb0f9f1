//! Single-pass scorer on one 0-100 scale.
//!
//! Used when the ensemble is not requested. It has its own point values and
//! cut points and produces no explainability, confidence intervals or model
//! contributions.

use chrono::Utc;
use uuid::Uuid;

use crate::entities::prediction::{HealthPrediction, ModelKind, PredictionMode, RiskLevel};
use crate::entities::vitals::{UserProfile, VitalsReading};
use crate::services::jitter::ConfidenceJitter;
use crate::services::scorers::{draw_confidence, ensure_finite, RuleTally, ScoringError};

pub const SIMPLE_MODEL_VERSION: &str = "rules-1.0.0";

const SENIOR_MULTIPLIER: f64 = 1.2;
const CONFIDENCE_BASE: f64 = 80.0;
const CONFIDENCE_SPAN: f64 = 15.0;

// The simple scorer draws its jitter under the general model's key
const JITTER_KEY: ModelKind = ModelKind::General;

/// Map a simple score onto a risk level
pub fn simple_risk_level(score: f64) -> RiskLevel {
    if score > 75.0 {
        RiskLevel::Critical
    } else if score > 50.0 {
        RiskLevel::High
    } else if score > 25.0 {
        RiskLevel::Moderate
    } else {
        RiskLevel::Low
    }
}

/// Score a reading with the single-pass rule table
pub fn calculate_risk_score(
    reading: &VitalsReading,
    profile: Option<&UserProfile>,
    jitter: &dyn ConfidenceJitter,
) -> Result<HealthPrediction, ScoringError> {
    ensure_finite(JITTER_KEY, "temperature", reading.temperature)?;
    let mut tally = RuleTally::new();

    if reading.heart_rate > 100 {
        tally.trigger(20.0, "Tachycardia", "Monitor your heart rate and avoid stimulants");
    } else if reading.heart_rate < 60 {
        tally.trigger(15.0, "Bradycardia", "Consult your doctor about a slow heart rate");
    }

    if reading.blood_pressure_systolic > 140 || reading.blood_pressure_diastolic > 90 {
        tally.trigger(25.0, "Hypertension", "Reduce salt intake and consult your physician soon");
    }

    if reading.spo2 < 90 {
        tally.trigger(35.0, "Severe Hypoxemia", "Seek immediate medical attention for low blood oxygen");
    } else if reading.spo2 < 95 {
        tally.trigger(20.0, "Low Oxygen Saturation", "Monitor your oxygen saturation and rest");
    }

    if reading.temperature > 38.5 {
        tally.trigger(15.0, "Fever", "Rest, stay hydrated and monitor your temperature");
    } else if reading.temperature < 35.0 {
        tally.trigger(15.0, "Hypothermia", "Warm up gradually and seek urgent care if you feel unwell");
    }

    if profile.map_or(false, UserProfile::is_senior) {
        tally.multiply(SENIOR_MULTIPLIER);
    }

    let scored = tally.finish(
        JITTER_KEY,
        simple_risk_level,
        draw_confidence(JITTER_KEY, CONFIDENCE_BASE, CONFIDENCE_SPAN, reading, jitter),
        "Keep up your healthy lifestyle and regular check-ups",
    );

    let risk_score = scored.risk_score.round() as u8;
    let feedback = simple_feedback(scored.risk_level, risk_score, &scored.predicted_conditions);

    Ok(HealthPrediction {
        id: Uuid::new_v4(),
        mode: PredictionMode::Simple,
        risk_score,
        risk_level: scored.risk_level,
        predicted_conditions: scored.predicted_conditions,
        confidence: scored.confidence.round() as u8,
        recommendations: scored.recommendations,
        feedback,
        explainability: None,
        confidence_intervals: None,
        model_contributions: None,
        model_version: SIMPLE_MODEL_VERSION.to_string(),
        timestamp: Utc::now(),
    })
}

fn simple_feedback(risk_level: RiskLevel, risk_score: u8, conditions: &[String]) -> String {
    let summary = format!(
        "Your health assessment indicates {} risk (score {}/100).",
        risk_level, risk_score
    );
    if conditions.is_empty() {
        format!("{} All vital signs are within normal ranges.", summary)
    } else {
        format!("{} Detected: {}.", summary, conditions.join(", "))
    }
}
