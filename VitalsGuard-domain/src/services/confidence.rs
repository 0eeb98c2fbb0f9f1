use crate::entities::prediction::ConfidenceIntervals;

/// z-score for an approximate 95% interval
const Z_95: f64 = 1.96;

fn to_percent(value: f64) -> u8 {
    value.round().clamp(0.0, 100.0) as u8
}

/// Summarize the spread of sub-model confidences.
///
/// Uses the population variance. Identical confidences give a zero-width
/// range, which is a valid result. An empty slice yields all zeros.
pub fn calculate_confidence_intervals(confidences: &[f64]) -> ConfidenceIntervals {
    if confidences.is_empty() {
        return ConfidenceIntervals {
            mean_confidence: 0,
            confidence_range: [0, 0],
            reliability_score: 0,
        };
    }

    let n = confidences.len() as f64;
    let mean = confidences.iter().sum::<f64>() / n;
    let variance = confidences.iter().map(|c| (c - mean).powi(2)).sum::<f64>() / n;
    let std_dev = variance.sqrt();

    let lower = to_percent(mean - Z_95 * std_dev);
    let upper = to_percent(mean + Z_95 * std_dev);

    let agreement = (1.0 - std_dev / 50.0).max(0.0);
    let reliability = 100.0 * (0.6 * agreement + 0.4 * mean / 100.0);

    ConfidenceIntervals {
        mean_confidence: to_percent(mean),
        confidence_range: [lower, upper],
        reliability_score: to_percent(reliability),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_zero_variance_collapses_range() {
        let intervals = calculate_confidence_intervals(&[90.0, 90.0, 90.0, 90.0]);
        assert_eq!(intervals.mean_confidence, 90);
        assert_eq!(intervals.confidence_range, [90, 90]);
        // 100 * (0.6 * 1.0 + 0.4 * 0.9) = 96
        assert_eq!(intervals.reliability_score, 96);
    }

    #[test]
    fn test_known_spread() {
        // mean 85, population std-dev 5
        let intervals = calculate_confidence_intervals(&[80.0, 90.0, 80.0, 90.0]);
        assert_eq!(intervals.mean_confidence, 85);
        // 85 -/+ 9.8
        assert_eq!(intervals.confidence_range, [75, 95]);
        // 100 * (0.6 * 0.9 + 0.4 * 0.85) = 88
        assert_eq!(intervals.reliability_score, 88);
    }

    #[test]
    fn test_range_is_clamped() {
        let intervals = calculate_confidence_intervals(&[100.0, 100.0, 100.0, 40.0]);
        assert_eq!(intervals.confidence_range[1], 100);
        assert!(intervals.confidence_range[0] < intervals.mean_confidence);
    }

    #[test]
    fn test_empty_input() {
        let intervals = calculate_confidence_intervals(&[]);
        assert_eq!(intervals.confidence_range, [0, 0]);
        assert_eq!(intervals.reliability_score, 0);
    }

    proptest! {
        /// The mean always lies inside the reported range
        #[test]
        fn mean_within_range(confidences in proptest::collection::vec(0.0..=100.0f64, 4)) {
            let intervals = calculate_confidence_intervals(&confidences);
            let [lower, upper] = intervals.confidence_range;
            prop_assert!(lower <= intervals.mean_confidence);
            prop_assert!(intervals.mean_confidence <= upper);
            prop_assert!(upper <= 100);
            prop_assert!(intervals.reliability_score <= 100);
        }
    }
}
