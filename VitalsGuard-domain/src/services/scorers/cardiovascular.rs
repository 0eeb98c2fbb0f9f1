use crate::entities::prediction::{ModelKind, RiskLevel, SubScorePrediction};
use crate::entities::vitals::{UserProfile, VitalsReading};
use crate::services::jitter::ConfidenceJitter;

use super::{draw_confidence, RiskScorer, RuleTally, ScoringError};

pub const TACHYCARDIA: &str = "Tachycardia Risk";
pub const BRADYCARDIA: &str = "Bradycardia Risk";
pub const HYPERTENSION: &str = "Hypertension";

/// Heart rate and blood pressure rules
#[derive(Debug, Clone, Copy, Default)]
pub struct CardiovascularScorer;

impl CardiovascularScorer {
    const SENIOR_MULTIPLIER: f64 = 1.2;
    const CONFIDENCE_BASE: f64 = 85.0;
    const CONFIDENCE_SPAN: f64 = 10.0;

    fn classify(score: f64) -> RiskLevel {
        if score > 60.0 {
            RiskLevel::High
        } else if score > 30.0 {
            RiskLevel::Moderate
        } else {
            RiskLevel::Low
        }
    }
}

impl RiskScorer for CardiovascularScorer {
    fn model(&self) -> ModelKind {
        ModelKind::Cardiovascular
    }

    fn score(
        &self,
        reading: &VitalsReading,
        profile: Option<&UserProfile>,
        jitter: &dyn ConfidenceJitter,
    ) -> Result<SubScorePrediction, ScoringError> {
        let mut tally = RuleTally::new();

        if reading.heart_rate > 100 {
            tally.trigger(
                30.0,
                TACHYCARDIA,
                "Monitor your heart rate and consult a doctor if it stays above 100 bpm",
            );
        }
        if reading.heart_rate < 60 {
            tally.trigger(20.0, BRADYCARDIA, "Consult your doctor about a persistently low heart rate");
        }
        if reading.blood_pressure_systolic > 140 || reading.blood_pressure_diastolic > 90 {
            tally.trigger(
                40.0,
                HYPERTENSION,
                "Monitor your blood pressure daily and consult your physician about hypertension",
            );
        }

        // Applied to the running total, before clamping
        if profile.map_or(false, UserProfile::is_senior) {
            tally.multiply(Self::SENIOR_MULTIPLIER);
        }

        Ok(tally.finish(
            self.model(),
            Self::classify,
            draw_confidence(self.model(), Self::CONFIDENCE_BASE, Self::CONFIDENCE_SPAN, reading, jitter),
            "Maintain regular exercise to support heart health",
        ))
    }
}
