use crate::entities::prediction::{ModelKind, RiskLevel, SubScorePrediction};
use crate::entities::vitals::{UserProfile, VitalsReading};
use crate::services::jitter::ConfidenceJitter;

use super::{draw_confidence, ensure_finite, RiskScorer, RuleTally, ScoringError};

pub const MULTIPLE_SYSTEM_DYSFUNCTION: &str = "Multiple System Dysfunction";
pub const MULTI_SYSTEM_STRESS: &str = "Multi-System Stress";

/// Counts how many vitals are outside their normal band
#[derive(Debug, Clone, Copy, Default)]
pub struct GeneralScorer;

impl GeneralScorer {
    const CONFIDENCE_BASE: f64 = 80.0;
    const CONFIDENCE_SPAN: f64 = 15.0;

    fn classify(score: f64) -> RiskLevel {
        if score > 35.0 {
            RiskLevel::High
        } else if score > 20.0 {
            RiskLevel::Moderate
        } else {
            RiskLevel::Low
        }
    }

    /// Number of vitals outside their normal band
    pub fn abnormal_count(reading: &VitalsReading) -> usize {
        [
            !(60..=100).contains(&reading.heart_rate),
            !(90..=140).contains(&reading.blood_pressure_systolic),
            reading.spo2 < 95,
            !(36.0..=38.0).contains(&reading.temperature),
        ]
        .iter()
        .filter(|abnormal| **abnormal)
        .count()
    }
}

impl RiskScorer for GeneralScorer {
    fn model(&self) -> ModelKind {
        ModelKind::General
    }

    fn score(
        &self,
        reading: &VitalsReading,
        _profile: Option<&UserProfile>,
        jitter: &dyn ConfidenceJitter,
    ) -> Result<SubScorePrediction, ScoringError> {
        ensure_finite(self.model(), "temperature", reading.temperature)?;
        let mut tally = RuleTally::new();

        let abnormal = Self::abnormal_count(reading);
        if abnormal >= 3 {
            tally.trigger(
                40.0,
                MULTIPLE_SYSTEM_DYSFUNCTION,
                "Immediate comprehensive medical evaluation is recommended",
            );
        } else if abnormal >= 2 {
            tally.trigger(
                25.0,
                MULTI_SYSTEM_STRESS,
                "Schedule a check-up soon to review several abnormal readings",
            );
        }

        Ok(tally.finish(
            self.model(),
            Self::classify,
            draw_confidence(self.model(), Self::CONFIDENCE_BASE, Self::CONFIDENCE_SPAN, reading, jitter),
            "Continue routine health check-ups",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::jitter::NoJitter;
    use crate::services::scorers::test_support::normal_reading;

    #[test]
    fn test_abnormal_count() {
        assert_eq!(GeneralScorer::abnormal_count(&normal_reading()), 0);

        let reading = VitalsReading {
            heart_rate: 59,
            blood_pressure_systolic: 141,
            spo2: 94,
            temperature: 38.1,
            ..normal_reading()
        };
        assert_eq!(GeneralScorer::abnormal_count(&reading), 4);
    }

    #[test]
    fn test_band_edges_are_normal() {
        let reading = VitalsReading {
            heart_rate: 100,
            blood_pressure_systolic: 90,
            spo2: 95,
            temperature: 38.0,
            ..normal_reading()
        };
        assert_eq!(GeneralScorer::abnormal_count(&reading), 0);
    }

    #[test]
    fn test_two_abnormal_is_moderate() {
        let reading = VitalsReading {
            heart_rate: 105,
            blood_pressure_systolic: 150,
            ..normal_reading()
        };
        let prediction = GeneralScorer.score(&reading, None, &NoJitter).unwrap();
        assert_eq!(prediction.risk_score, 25.0);
        assert_eq!(prediction.risk_level, RiskLevel::Moderate);
        assert_eq!(prediction.predicted_conditions, vec![MULTI_SYSTEM_STRESS]);
    }

    #[test]
    fn test_three_abnormal_is_high() {
        let reading = VitalsReading {
            heart_rate: 125,
            spo2: 88,
            temperature: 39.2,
            ..normal_reading()
        };
        let prediction = GeneralScorer.score(&reading, None, &NoJitter).unwrap();
        assert_eq!(prediction.risk_score, 40.0);
        assert_eq!(prediction.risk_level, RiskLevel::High);
        assert_eq!(prediction.predicted_conditions, vec![MULTIPLE_SYSTEM_DYSFUNCTION]);
    }

    #[test]
    fn test_single_abnormal_scores_zero() {
        let reading = VitalsReading {
            spo2: 91,
            ..normal_reading()
        };
        let prediction = GeneralScorer.score(&reading, None, &NoJitter).unwrap();
        assert_eq!(prediction.risk_score, 0.0);
    }
}
