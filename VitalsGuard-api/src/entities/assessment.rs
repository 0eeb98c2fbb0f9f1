use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use vitals_guard_domain::entities::conversions::fahrenheit_to_celsius;
use vitals_guard_domain::entities::prediction::PredictionMode;
use vitals_guard_domain::entities::vitals::{Gender, VitalsInput};

/// Request payload for a new risk assessment. Temperature is in Fahrenheit.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateAssessmentRequest {
    /// Heart rate in beats per minute
    pub heart_rate: u16,

    /// Systolic blood pressure in mmHg
    pub blood_pressure_systolic: u16,

    /// Diastolic blood pressure in mmHg
    pub blood_pressure_diastolic: u16,

    /// Oxygen saturation percentage
    pub spo2: u8,

    /// Body temperature in degrees Fahrenheit
    #[validate(range(min = 86.0, max = 113.0, message = "Temperature must be between 86 and 113 °F"))]
    pub temperature_f: f64,

    /// Optional age in years
    pub age: Option<u8>,

    /// Optional gender
    pub gender: Option<Gender>,

    /// When the reading was taken. Defaults to current time if not provided.
    pub timestamp: Option<DateTime<Utc>>,
}

impl CreateAssessmentRequest {
    /// Convert to the domain input, translating the temperature to Celsius
    pub fn into_domain_input(self) -> VitalsInput {
        VitalsInput {
            heart_rate: self.heart_rate,
            blood_pressure_systolic: self.blood_pressure_systolic,
            blood_pressure_diastolic: self.blood_pressure_diastolic,
            spo2: self.spo2,
            temperature: fahrenheit_to_celsius(self.temperature_f),
            age: self.age,
            gender: self.gender,
            timestamp: self.timestamp,
        }
    }
}

/// Query parameters for creating an assessment
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct AssessmentQueryParams {
    /// Prediction strategy (simple or ensemble, default from configuration)
    #[param(value_type = Option<String>)]
    pub mode: Option<PredictionMode>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(temperature_f: f64) -> CreateAssessmentRequest {
        CreateAssessmentRequest {
            heart_rate: 72,
            blood_pressure_systolic: 118,
            blood_pressure_diastolic: 76,
            spo2: 98,
            temperature_f,
            age: Some(40),
            gender: Some(Gender::Female),
            timestamp: None,
        }
    }

    #[test]
    fn test_temperature_converted_to_celsius() {
        let input = request(98.6).into_domain_input();
        assert!((input.temperature - 37.0).abs() < 1e-9);
        assert_eq!(input.heart_rate, 72);
        assert_eq!(input.age, Some(40));
        assert_eq!(input.gender, Some(Gender::Female));

        let fever = request(102.2).into_domain_input();
        assert!((fever.temperature - 39.0).abs() < 1e-9);
    }

    #[test]
    fn test_fahrenheit_bounds() {
        assert!(request(86.0).validate().is_ok());
        assert!(request(113.0).validate().is_ok());

        let errors = request(120.0).validate().unwrap_err();
        assert!(errors.field_errors().contains_key("temperature_f"));
        assert!(request(80.0).validate().is_err());
    }

    #[test]
    fn test_mode_query_parses_lowercase() {
        let params: AssessmentQueryParams = serde_json::from_str(r#"{"mode":"simple"}"#).unwrap();
        assert_eq!(params.mode, Some(PredictionMode::Simple));

        let params: AssessmentQueryParams = serde_json::from_str("{}").unwrap();
        assert!(params.mode.is_none());
    }
}
