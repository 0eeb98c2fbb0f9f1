use crate::entities::prediction::{ModelKind, RiskLevel, SubScorePrediction};
use crate::entities::vitals::{UserProfile, VitalsReading};
use crate::services::jitter::ConfidenceJitter;

use super::{draw_confidence, ensure_finite, RiskScorer, RuleTally, ScoringError};

pub const SEVERE_HYPOXEMIA: &str = "Severe Hypoxemia";
pub const MODERATE_HYPOXEMIA: &str = "Moderate Hypoxemia";
pub const MILD_DESATURATION: &str = "Mild Oxygen Desaturation";
pub const FEVER_RESPIRATORY_STRESS: &str = "Fever-Related Respiratory Stress";

/// Oxygen saturation and fever rules
#[derive(Debug, Clone, Copy, Default)]
pub struct RespiratoryScorer;

impl RespiratoryScorer {
    const CONFIDENCE_BASE: f64 = 88.0;
    const CONFIDENCE_SPAN: f64 = 8.0;

    /// Severe hypoxemia alone (50 points) reaches the critical band
    fn classify(score: f64) -> RiskLevel {
        if score >= 50.0 {
            RiskLevel::Critical
        } else if score > 25.0 {
            RiskLevel::High
        } else if score > 10.0 {
            RiskLevel::Moderate
        } else {
            RiskLevel::Low
        }
    }
}

impl RiskScorer for RespiratoryScorer {
    fn model(&self) -> ModelKind {
        ModelKind::Respiratory
    }

    fn score(
        &self,
        reading: &VitalsReading,
        _profile: Option<&UserProfile>,
        jitter: &dyn ConfidenceJitter,
    ) -> Result<SubScorePrediction, ScoringError> {
        ensure_finite(self.model(), "temperature", reading.temperature)?;
        let mut tally = RuleTally::new();

        // Saturation bands are mutually exclusive
        if reading.spo2 < 90 {
            tally.trigger(50.0, SEVERE_HYPOXEMIA, "Seek immediate medical attention for low blood oxygen");
        } else if reading.spo2 < 95 {
            tally.trigger(
                30.0,
                MODERATE_HYPOXEMIA,
                "Consult a healthcare provider soon about reduced oxygen levels",
            );
        } else if reading.spo2 < 98 {
            tally.trigger(
                10.0,
                MILD_DESATURATION,
                "Practice deep breathing exercises and recheck oxygen levels later",
            );
        }

        if reading.temperature > 38.5 {
            tally.trigger(
                15.0,
                FEVER_RESPIRATORY_STRESS,
                "Rest, stay hydrated and monitor your breathing while feverish",
            );
        }

        Ok(tally.finish(
            self.model(),
            Self::classify,
            draw_confidence(self.model(), Self::CONFIDENCE_BASE, Self::CONFIDENCE_SPAN, reading, jitter),
            "Keep up good respiratory habits such as regular aerobic activity",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::jitter::NoJitter;
    use crate::services::scorers::test_support::normal_reading;

    fn score_spo2(spo2: u8) -> SubScorePrediction {
        let reading = VitalsReading { spo2, ..normal_reading() };
        RespiratoryScorer.score(&reading, None, &NoJitter).unwrap()
    }

    #[test]
    fn test_saturation_bands() {
        let severe = score_spo2(85);
        assert_eq!(severe.risk_score, 50.0);
        assert_eq!(severe.risk_level, RiskLevel::Critical);
        assert_eq!(severe.predicted_conditions, vec![SEVERE_HYPOXEMIA]);

        let moderate = score_spo2(92);
        assert_eq!(moderate.risk_score, 30.0);
        assert_eq!(moderate.risk_level, RiskLevel::High);

        let mild = score_spo2(96);
        assert_eq!(mild.risk_score, 10.0);
        assert_eq!(mild.risk_level, RiskLevel::Low);

        assert_eq!(score_spo2(98).risk_score, 0.0);
    }

    #[test]
    fn test_band_boundaries() {
        assert_eq!(score_spo2(90).predicted_conditions, vec![MODERATE_HYPOXEMIA]);
        assert_eq!(score_spo2(95).predicted_conditions, vec![MILD_DESATURATION]);
        assert_eq!(score_spo2(89).predicted_conditions, vec![SEVERE_HYPOXEMIA]);
    }

    #[test]
    fn test_fever_adds_to_saturation_band() {
        let reading = VitalsReading {
            spo2: 96,
            temperature: 39.0,
            ..normal_reading()
        };
        let prediction = RespiratoryScorer.score(&reading, None, &NoJitter).unwrap();
        assert_eq!(prediction.risk_score, 25.0);
        assert_eq!(prediction.risk_level, RiskLevel::Moderate);
        assert_eq!(
            prediction.predicted_conditions,
            vec![MILD_DESATURATION, FEVER_RESPIRATORY_STRESS]
        );
    }

    #[test]
    fn test_severe_with_fever_stays_critical() {
        let reading = VitalsReading {
            spo2: 80,
            temperature: 39.5,
            ..normal_reading()
        };
        let prediction = RespiratoryScorer.score(&reading, None, &NoJitter).unwrap();
        assert_eq!(prediction.risk_score, 65.0);
        assert_eq!(prediction.risk_level, RiskLevel::Critical);
    }

    #[test]
    fn test_infinite_temperature_rejected() {
        let reading = VitalsReading {
            temperature: f64::INFINITY,
            ..normal_reading()
        };
        assert!(RespiratoryScorer.score(&reading, None, &NoJitter).is_err());
    }
}
