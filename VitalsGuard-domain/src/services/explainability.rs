//! Explanations attached to ensemble predictions.
//!
//! Importance is a weighted relative deviation of each vital from a fixed
//! reference point. It describes the reading, not the scorers: a vital can be
//! important here without having triggered any rule.

use crate::entities::prediction::{
    Explainability, Feature, FeatureImportance, ModelContribution, ModelContributions, ModelKind,
    RiskLevel, SubScorePrediction,
};
use crate::entities::vitals::VitalsReading;

pub const HEART_RATE_REFERENCE: f64 = 75.0;
pub const SYSTOLIC_REFERENCE: f64 = 120.0;
pub const DIASTOLIC_REFERENCE: f64 = 80.0;
pub const SPO2_REFERENCE: f64 = 98.0;
pub const TEMPERATURE_REFERENCE: f64 = 36.8;

/// Features above this importance are listed as key factors
pub const KEY_FACTOR_THRESHOLD: f64 = 0.2;

const DECISION_PATH: [&str; 5] = [
    "Validated vital signs against physiological ranges",
    "Scored cardiovascular, respiratory, metabolic and general risk independently",
    "Combined the sub-model scores using fixed model weights",
    "Applied the critical override and agreement-adjusted confidence",
    "Ranked recommendations by urgency and kept the top five",
];

impl Feature {
    /// Weight applied to the relative deviation
    pub fn coefficient(&self) -> f64 {
        match self {
            Feature::HeartRate => 0.3,
            Feature::BloodPressure => 0.35,
            Feature::Spo2 => 0.25,
            Feature::Temperature => 0.1,
        }
    }
}

fn relative_deviation(actual: f64, reference: f64) -> f64 {
    (actual - reference).abs() / reference
}

fn importance_of(feature: Feature, reading: &VitalsReading) -> f64 {
    let deviation = match feature {
        Feature::HeartRate => relative_deviation(reading.heart_rate as f64, HEART_RATE_REFERENCE),
        Feature::BloodPressure => {
            let systolic = relative_deviation(reading.blood_pressure_systolic as f64, SYSTOLIC_REFERENCE);
            let diastolic = relative_deviation(reading.blood_pressure_diastolic as f64, DIASTOLIC_REFERENCE);
            systolic.max(diastolic)
        }
        Feature::Spo2 => relative_deviation(reading.spo2 as f64, SPO2_REFERENCE),
        Feature::Temperature => relative_deviation(reading.temperature, TEMPERATURE_REFERENCE),
    };
    (deviation * feature.coefficient()).clamp(0.0, 1.0)
}

fn actual_value(feature: Feature, reading: &VitalsReading) -> String {
    match feature {
        Feature::HeartRate => format!("{} bpm", reading.heart_rate),
        Feature::BloodPressure => format!(
            "{}/{} mmHg",
            reading.blood_pressure_systolic, reading.blood_pressure_diastolic
        ),
        Feature::Spo2 => format!("{}%", reading.spo2),
        Feature::Temperature => format!("{:.1}°C", reading.temperature),
    }
}

fn normal_reference(feature: Feature) -> String {
    match feature {
        Feature::HeartRate => format!("{} bpm", HEART_RATE_REFERENCE),
        Feature::BloodPressure => format!("{}/{} mmHg", SYSTOLIC_REFERENCE, DIASTOLIC_REFERENCE),
        Feature::Spo2 => format!("{}%", SPO2_REFERENCE),
        Feature::Temperature => format!("{}°C", TEMPERATURE_REFERENCE),
    }
}

// Buckets follow the sub-scorer thresholds
fn impact_description(feature: Feature, reading: &VitalsReading) -> &'static str {
    match feature {
        Feature::HeartRate => match reading.heart_rate {
            hr if hr > 100 => "Elevated heart rate increases cardiovascular strain",
            hr if hr < 60 => "Low heart rate may reduce cardiac output",
            _ => "Heart rate is within the normal range",
        },
        Feature::BloodPressure => {
            if reading.blood_pressure_systolic > 140 || reading.blood_pressure_diastolic > 90 {
                "Elevated blood pressure is a major cardiovascular risk driver"
            } else if reading.blood_pressure_systolic < 90 {
                "Low blood pressure may cause dizziness or fainting"
            } else {
                "Blood pressure is within the normal range"
            }
        }
        Feature::Spo2 => match reading.spo2 {
            s if s < 90 => "Severely reduced oxygen saturation needs prompt attention",
            s if s < 95 => "Reduced oxygen saturation suggests respiratory strain",
            s if s < 98 => "Oxygen saturation is slightly below optimal",
            _ => "Oxygen saturation is normal",
        },
        Feature::Temperature => {
            let t = reading.temperature;
            if t > 39.0 {
                "High fever indicates significant systemic stress"
            } else if t > 38.0 {
                "Elevated temperature suggests a fever"
            } else if t < 35.0 {
                "Low body temperature indicates hypothermia risk"
            } else if t < 36.0 {
                "Body temperature is below normal"
            } else {
                "Body temperature is within the normal range"
            }
        }
    }
}

/// Importance of every vital, in `Feature::ALL` order
pub fn feature_importance(reading: &VitalsReading) -> Vec<FeatureImportance> {
    Feature::ALL
        .iter()
        .map(|&feature| {
            let importance_score = importance_of(feature, reading);
            FeatureImportance {
                feature,
                actual_value: actual_value(feature, reading),
                normal_reference: normal_reference(feature),
                importance_score,
                contribution_percentage: (importance_score * 100.0).round() as u8,
                impact_description: impact_description(feature, reading).to_string(),
            }
        })
        .collect()
}

/// Sentence naming the two most important features
pub fn why_this_risk_level(risk_level: RiskLevel, importances: &[FeatureImportance]) -> String {
    let mut ranked: Vec<&FeatureImportance> = importances.iter().collect();
    ranked.sort_by(|a, b| b.importance_score.total_cmp(&a.importance_score));

    let named: Vec<String> = ranked
        .iter()
        .take(2)
        .map(|f| format!("{} ({})", f.feature.display_name(), f.actual_value))
        .collect();

    match named.as_slice() {
        [] => format!("The {} risk level was assigned without feature data.", risk_level),
        [only] => format!("The {} risk level is driven mainly by {}.", risk_level, only),
        [first, second, ..] => format!(
            "The {} risk level is driven mainly by {} and {}.",
            risk_level, first, second
        ),
    }
}

/// Every feature whose importance exceeds the key factor threshold
pub fn key_contributing_factors(importances: &[FeatureImportance]) -> Vec<String> {
    importances
        .iter()
        .filter(|f| f.importance_score > KEY_FACTOR_THRESHOLD)
        .map(|f| {
            format!(
                "{}: {} (normal {}), {}",
                f.feature.display_name(),
                f.actual_value,
                f.normal_reference,
                f.impact_description.to_lowercase()
            )
        })
        .collect()
}

fn domain_inputs(model: ModelKind) -> &'static str {
    match model {
        ModelKind::Cardiovascular => "heart rate and blood pressure",
        ModelKind::Respiratory => "oxygen saturation and temperature",
        ModelKind::Metabolic => "body temperature and heart rate",
        ModelKind::General => "how many vitals are outside their normal range",
    }
}

/// One line per sub-model
pub fn model_reasoning(sub_predictions: &[SubScorePrediction]) -> Vec<String> {
    sub_predictions
        .iter()
        .map(|sub| {
            format!(
                "{} model: {} risk (score {:.0}) based on {}",
                sub.model.display_name(),
                sub.risk_level,
                sub.risk_score,
                domain_inputs(sub.model)
            )
        })
        .collect()
}

/// Tiered description of the mean sub-model confidence
pub fn confidence_factors(mean_confidence: f64) -> String {
    let description = if mean_confidence >= 90.0 {
        "Very high confidence: the models are highly certain about this reading"
    } else if mean_confidence >= 80.0 {
        "High confidence: the models are fairly certain about this reading"
    } else if mean_confidence >= 70.0 {
        "Moderate confidence: treat this assessment as indicative"
    } else {
        "Lower confidence: consider retaking measurements"
    };
    description.to_string()
}

/// The fixed decision narrative
pub fn decision_path() -> Vec<String> {
    DECISION_PATH.iter().map(|step| step.to_string()).collect()
}

fn contribution(sub: &SubScorePrediction) -> ModelContribution {
    let weight = sub.model.weight();
    ModelContribution {
        score: sub.risk_score,
        weight,
        contribution: sub.risk_score * weight,
        risk_level: sub.risk_level,
        confidence: sub.confidence,
    }
}

/// Per-model share of the weighted score
pub fn model_contributions(sub_predictions: &[SubScorePrediction; 4]) -> ModelContributions {
    let [cardiovascular, respiratory, metabolic, general] = sub_predictions;
    ModelContributions {
        cardiovascular: contribution(cardiovascular),
        respiratory: contribution(respiratory),
        metabolic: contribution(metabolic),
        general: contribution(general),
    }
}

/// Build the full explanation for an ensemble verdict
pub fn generate_explainability(
    reading: &VitalsReading,
    risk_level: RiskLevel,
    sub_predictions: &[SubScorePrediction],
) -> Explainability {
    let importances = feature_importance(reading);
    let mean_confidence = if sub_predictions.is_empty() {
        0.0
    } else {
        sub_predictions.iter().map(|s| s.confidence).sum::<f64>() / sub_predictions.len() as f64
    };

    Explainability {
        why_this_risk_level: why_this_risk_level(risk_level, &importances),
        key_contributing_factors: key_contributing_factors(&importances),
        model_reasoning: model_reasoning(sub_predictions),
        confidence_factors: confidence_factors(mean_confidence),
        decision_path: decision_path(),
        feature_importance: importances,
    }
}
