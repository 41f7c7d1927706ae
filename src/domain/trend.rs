// Short-term trend classification per metric
use crate::domain::sample::{Metric, Sample};
use serde::Serialize;
use std::collections::BTreeMap;

/// Number of values in each of the recent and older windows.
pub const TREND_WINDOW: usize = 5;
/// Relative change that must be exceeded (strictly) to leave `Stable`.
pub const TREND_THRESHOLD: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

/// Compare the mean of the last `TREND_WINDOW` values against the mean of
/// the up to `TREND_WINDOW` values immediately before them.
///
/// Too little history, an empty older window, and a zero older mean all
/// classify as `Stable`.
pub fn classify(values: &[f64]) -> Trend {
    let n = values.len();
    if n < 2 {
        return Trend::Stable;
    }

    let recent_start = n - n.min(TREND_WINDOW);
    let older_start = recent_start.saturating_sub(TREND_WINDOW);
    let recent = &values[recent_start..];
    let older = &values[older_start..recent_start];
    if older.is_empty() {
        return Trend::Stable;
    }

    let older_avg = mean(older);
    if older_avg == 0.0 {
        return Trend::Stable;
    }

    let change = (mean(recent) - older_avg) / older_avg;
    if !change.is_finite() {
        Trend::Stable
    } else if change > TREND_THRESHOLD {
        Trend::Up
    } else if change < -TREND_THRESHOLD {
        Trend::Down
    } else {
        Trend::Stable
    }
}

/// Trend of every metric over an oldest-first sample history.
pub fn analyze(samples: &[Sample]) -> BTreeMap<Metric, Trend> {
    Metric::ALL
        .iter()
        .map(|&metric| {
            let values: Vec<f64> = samples.iter().map(|s| s.value(metric)).collect();
            (metric, classify(&values))
        })
        .collect()
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn test_short_history_is_stable() {
        assert_eq!(classify(&[]), Trend::Stable);
        assert_eq!(classify(&[42.0]), Trend::Stable);
        // older window empty up to five values
        assert_eq!(classify(&[1.0, 100.0]), Trend::Stable);
        assert_eq!(classify(&[1.0, 2.0, 3.0, 4.0, 500.0]), Trend::Stable);
    }

    #[test]
    fn test_battery_rise_is_up() {
        let battery = [80.0, 80.0, 80.0, 80.0, 80.0, 90.0, 90.0, 90.0, 90.0, 90.0];
        assert_eq!(classify(&battery), Trend::Up);
    }

    #[test]
    fn test_drop_is_down() {
        let values = [50.0, 50.0, 50.0, 50.0, 50.0, 40.0, 40.0, 40.0, 40.0, 40.0];
        assert_eq!(classify(&values), Trend::Down);
    }

    #[test]
    fn test_threshold_is_strict() {
        // (105 - 100) / 100 == 0.05 exactly
        let values = [100.0, 100.0, 100.0, 100.0, 100.0, 105.0, 105.0, 105.0, 105.0, 105.0];
        assert_eq!(classify(&values), Trend::Stable);

        let values = [100.0, 100.0, 100.0, 100.0, 100.0, 95.0, 95.0, 95.0, 95.0, 95.0];
        assert_eq!(classify(&values), Trend::Stable);

        let values = [100.0, 100.0, 100.0, 100.0, 100.0, 105.5, 105.5, 105.5, 105.5, 105.5];
        assert_eq!(classify(&values), Trend::Up);
    }

    #[test]
    fn test_single_older_value() {
        assert_eq!(classify(&[10.0, 20.0, 20.0, 20.0, 20.0, 20.0]), Trend::Up);
        assert_eq!(classify(&[0.0, 20.0, 20.0, 20.0, 20.0, 20.0]), Trend::Stable);
    }

    #[test]
    fn test_windows_only_look_at_last_ten() {
        // anything before the older window is ignored
        let mut values = vec![1000.0; 20];
        values.extend([80.0; 5]);
        values.extend([90.0; 5]);
        assert_eq!(classify(&values), Trend::Up);
    }

    #[test]
    fn test_analyze_is_pure() {
        let start = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        let samples: Vec<Sample> = (0..10)
            .map(|i| {
                let battery = if i < 5 { 80.0 } else { 90.0 };
                let moisture = if i < 5 { 40.0 } else { 30.0 };
                Sample::zeroed(start + Duration::seconds(i * 5))
                    .with_value(Metric::Battery, battery)
                    .with_value(Metric::Moisture, moisture)
                    .with_value(Metric::Ph, 6.5)
            })
            .collect();

        let first = analyze(&samples);
        let second = analyze(&samples);
        assert_eq!(first, second);
        assert_eq!(first.len(), Metric::ALL.len());
        assert_eq!(first[&Metric::Battery], Trend::Up);
        assert_eq!(first[&Metric::Moisture], Trend::Down);
        assert_eq!(first[&Metric::Ph], Trend::Stable);
        // all-zero metric
        assert_eq!(first[&Metric::Altitude], Trend::Stable);
    }
}
