use chrono::Utc;

use crate::entities::prediction::HealthPrediction;
use crate::entities::trends::VitalsTrends;
use crate::entities::vitals::VitalsReading;
use crate::services::prediction::PredictionServiceError;

/// Summarize a window of readings.
///
/// `predictions` is expected newest first; the first entry supplies the latest
/// risk level.
pub fn calculate_trends(
    readings: &[VitalsReading],
    predictions: &[HealthPrediction],
) -> Result<VitalsTrends, PredictionServiceError> {
    if readings.is_empty() {
        return Err(PredictionServiceError::InsufficientData(
            "No readings available to calculate trends".to_string(),
        ));
    }

    let mut heart_rate_sum = 0.0;
    let mut systolic_sum = 0.0;
    let mut diastolic_sum = 0.0;
    let mut spo2_sum = 0.0;
    let mut temperature_sum = 0.0;

    let mut min_heart_rate = u16::MAX;
    let mut max_heart_rate = 0;
    let mut min_spo2 = u8::MAX;

    for reading in readings {
        heart_rate_sum += reading.heart_rate as f64;
        systolic_sum += reading.blood_pressure_systolic as f64;
        diastolic_sum += reading.blood_pressure_diastolic as f64;
        spo2_sum += reading.spo2 as f64;
        temperature_sum += reading.temperature;

        min_heart_rate = min_heart_rate.min(reading.heart_rate);
        max_heart_rate = max_heart_rate.max(reading.heart_rate);
        min_spo2 = min_spo2.min(reading.spo2);
    }

    let count = readings.len() as f64;

    Ok(VitalsTrends {
        reading_count: readings.len(),
        avg_heart_rate: heart_rate_sum / count,
        min_heart_rate,
        max_heart_rate,
        avg_systolic: systolic_sum / count,
        avg_diastolic: diastolic_sum / count,
        avg_spo2: spo2_sum / count,
        min_spo2,
        avg_temperature: temperature_sum / count,
        latest_risk_level: predictions.first().map(|p| p.risk_level),
        generated_at: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::prediction::RiskLevel;
    use crate::services::jitter::NoJitter;
    use crate::services::scorers::test_support::normal_reading;
    use crate::services::simple::calculate_risk_score;

    #[test]
    fn test_trends_over_readings() {
        let readings = vec![
            VitalsReading { heart_rate: 60, spo2: 97, temperature: 36.5, ..normal_reading() },
            VitalsReading { heart_rate: 90, spo2: 93, temperature: 37.5, ..normal_reading() },
        ];
        let latest = calculate_risk_score(&readings[1], None, &NoJitter).unwrap();

        let trends = calculate_trends(&readings, &[latest]).unwrap();
        assert_eq!(trends.reading_count, 2);
        assert_eq!(trends.avg_heart_rate, 75.0);
        assert_eq!(trends.min_heart_rate, 60);
        assert_eq!(trends.max_heart_rate, 90);
        assert_eq!(trends.avg_spo2, 95.0);
        assert_eq!(trends.min_spo2, 93);
        assert!((trends.avg_temperature - 37.0).abs() < 1e-9);
        assert_eq!(trends.latest_risk_level, Some(RiskLevel::Low));
    }

    #[test]
    fn test_no_predictions_leaves_level_empty() {
        let trends = calculate_trends(&[normal_reading()], &[]).unwrap();
        assert!(trends.latest_risk_level.is_none());
    }

    #[test]
    fn test_empty_readings_is_insufficient_data() {
        let err = calculate_trends(&[], &[]).unwrap_err();
        assert!(matches!(err, PredictionServiceError::InsufficientData(_)));
    }
}
