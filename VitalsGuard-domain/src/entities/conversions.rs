use chrono::{DateTime, Utc};
use uuid::Uuid;
use vitals_guard_data::models::prediction::StoredPrediction;
use vitals_guard_data::models::vitals::{CreateVitalsRecord, StoredVitalsReading};

use crate::entities::prediction::HealthPrediction;
use crate::entities::vitals::{Gender, RecordedVitals, UserProfile, VitalsReading};

// Conversion functions between domain entities and data models
// These functions follow the pattern convert_to_[target_layer]_[model_name]

/// Convert a temperature in degrees Fahrenheit to degrees Celsius
pub fn fahrenheit_to_celsius(fahrenheit: f64) -> f64 {
    (fahrenheit - 32.0) * 5.0 / 9.0
}

/// Helper function to safely parse a string ID to UUID
pub fn parse_string_to_uuid(id: &str) -> Result<Uuid, String> {
    Uuid::parse_str(id).map_err(|_| format!("Invalid UUID format: {}", id))
}

/// Convert a domain reading and optional profile into a data create record
pub fn convert_to_data_record(reading: &VitalsReading, profile: Option<&UserProfile>) -> CreateVitalsRecord {
    CreateVitalsRecord {
        heart_rate: reading.heart_rate,
        blood_pressure_systolic: reading.blood_pressure_systolic,
        blood_pressure_diastolic: reading.blood_pressure_diastolic,
        spo2: reading.spo2,
        temperature: reading.temperature,
        age: profile.and_then(|p| p.age),
        gender: profile.map(|p| p.gender.to_string()),
        timestamp: reading.timestamp.to_rfc3339(),
    }
}

/// Convert a stored reading back into a domain entity
pub fn convert_to_domain_reading(stored: StoredVitalsReading) -> Result<RecordedVitals, String> {
    let timestamp = DateTime::parse_from_rfc3339(&stored.timestamp)
        .map_err(|e| format!("Invalid timestamp on reading {}: {}", stored.id, e))?
        .with_timezone(&Utc);

    let gender = match stored.gender.as_deref() {
        Some(value) => Some(value.parse::<Gender>()?),
        None => None,
    };
    let profile = if stored.age.is_some() || gender.is_some() {
        Some(UserProfile {
            age: stored.age,
            gender: gender.unwrap_or_default(),
        })
    } else {
        None
    };

    Ok(RecordedVitals {
        id: stored.id,
        reading: VitalsReading {
            heart_rate: stored.heart_rate,
            blood_pressure_systolic: stored.blood_pressure_systolic,
            blood_pressure_diastolic: stored.blood_pressure_diastolic,
            spo2: stored.spo2,
            temperature: stored.temperature,
            timestamp,
        },
        profile,
    })
}

/// Convert a prediction into its storage model.
///
/// The reading link is filled in by the repository when the pair is stored.
pub fn convert_to_data_prediction(prediction: &HealthPrediction) -> Result<StoredPrediction, serde_json::Error> {
    Ok(StoredPrediction {
        id: prediction.id.to_string(),
        reading_id: None,
        mode: prediction.mode.to_string(),
        risk_score: prediction.risk_score,
        risk_level: prediction.risk_level.to_string(),
        confidence: prediction.confidence,
        model_version: prediction.model_version.clone(),
        payload: serde_json::to_value(prediction)?,
        timestamp: prediction.timestamp.to_rfc3339(),
    })
}

/// Convert a stored prediction back into a domain entity
pub fn convert_to_domain_prediction(stored: StoredPrediction) -> Result<HealthPrediction, serde_json::Error> {
    serde_json::from_value(stored.payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fahrenheit_to_celsius() {
        assert!((fahrenheit_to_celsius(98.6) - 37.0).abs() < 1e-9);
        assert!((fahrenheit_to_celsius(32.0)).abs() < 1e-9);
        assert!((fahrenheit_to_celsius(212.0) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_reading_round_trip_keeps_profile() {
        let reading = VitalsReading {
            heart_rate: 88,
            blood_pressure_systolic: 132,
            blood_pressure_diastolic: 84,
            spo2: 96,
            temperature: 37.2,
            timestamp: Utc::now(),
        };
        let profile = UserProfile { age: Some(71), gender: Gender::Male };

        let record = convert_to_data_record(&reading, Some(&profile));
        assert_eq!(record.gender.as_deref(), Some("male"));

        let stored = StoredVitalsReading {
            id: "r-1".to_string(),
            heart_rate: record.heart_rate,
            blood_pressure_systolic: record.blood_pressure_systolic,
            blood_pressure_diastolic: record.blood_pressure_diastolic,
            spo2: record.spo2,
            temperature: record.temperature,
            age: record.age,
            gender: record.gender,
            timestamp: record.timestamp,
        };
        let recorded = convert_to_domain_reading(stored).unwrap();
        assert_eq!(recorded.id, "r-1");
        assert_eq!(recorded.profile, Some(profile));
        assert_eq!(recorded.reading.heart_rate, 88);
    }

    #[test]
    fn test_bad_timestamp_is_reported() {
        let stored = StoredVitalsReading {
            id: "r-2".to_string(),
            heart_rate: 70,
            blood_pressure_systolic: 120,
            blood_pressure_diastolic: 80,
            spo2: 98,
            temperature: 36.8,
            age: None,
            gender: None,
            timestamp: "yesterday".to_string(),
        };
        let err = convert_to_domain_reading(stored).unwrap_err();
        assert!(err.contains("Invalid timestamp"));
    }

    #[test]
    fn test_parse_string_to_uuid() {
        assert!(parse_string_to_uuid("not-a-uuid").is_err());
        let id = Uuid::new_v4();
        assert_eq!(parse_string_to_uuid(&id.to_string()).unwrap(), id);
    }
}
