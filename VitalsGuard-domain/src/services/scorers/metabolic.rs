use crate::entities::prediction::{ModelKind, RiskLevel, SubScorePrediction};
use crate::entities::vitals::{UserProfile, VitalsReading};
use crate::services::jitter::ConfidenceJitter;

use super::{draw_confidence, ensure_finite, RiskScorer, RuleTally, ScoringError};

pub const HIGH_FEVER: &str = "High Fever";
pub const HYPOTHERMIA: &str = "Hypothermia Risk";
pub const METABOLIC_STRESS: &str = "Metabolic Stress";

/// Temperature rules, plus the fever with rapid pulse combination
#[derive(Debug, Clone, Copy, Default)]
pub struct MetabolicScorer;

impl MetabolicScorer {
    const CONFIDENCE_BASE: f64 = 82.0;
    const CONFIDENCE_SPAN: f64 = 12.0;

    fn classify(score: f64) -> RiskLevel {
        if score > 40.0 {
            RiskLevel::High
        } else if score > 20.0 {
            RiskLevel::Moderate
        } else {
            RiskLevel::Low
        }
    }
}

impl RiskScorer for MetabolicScorer {
    fn model(&self) -> ModelKind {
        ModelKind::Metabolic
    }

    fn score(
        &self,
        reading: &VitalsReading,
        _profile: Option<&UserProfile>,
        jitter: &dyn ConfidenceJitter,
    ) -> Result<SubScorePrediction, ScoringError> {
        ensure_finite(self.model(), "temperature", reading.temperature)?;
        let mut tally = RuleTally::new();

        if reading.temperature > 39.0 {
            tally.trigger(25.0, HIGH_FEVER, "Get urgent care for a fever above 39 °C");
        } else if reading.temperature < 35.0 {
            tally.trigger(
                30.0,
                HYPOTHERMIA,
                "Warm up gradually and call emergency services if your temperature keeps dropping",
            );
        }

        if reading.heart_rate > 110 && reading.temperature > 38.0 {
            tally.trigger(
                20.0,
                METABOLIC_STRESS,
                "Rest, hydrate and consult a doctor about fever with a rapid pulse",
            );
        }

        Ok(tally.finish(
            self.model(),
            Self::classify,
            draw_confidence(self.model(), Self::CONFIDENCE_BASE, Self::CONFIDENCE_SPAN, reading, jitter),
            "Maintain balanced nutrition and hydration",
        ))
    }
}
