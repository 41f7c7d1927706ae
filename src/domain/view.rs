// Read-only view model handed to the presentation layer
use crate::domain::sample::{Metric, Sample};
use crate::domain::trend::{analyze, Trend};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    Live,
    Synthetic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConnectionState {
    Connecting,
    Connected,
    DisconnectedRetrying,
    /// The feed was torn down; nothing is pending.
    Stopped,
}

/// Everything a dashboard needs, derived from one history snapshot.
///
/// Built once per buffer mutation, so two reads without an intervening
/// append see identical values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TelemetryView {
    pub source: DataSource,
    pub timestamps: Vec<DateTime<Utc>>,
    pub current_values: BTreeMap<Metric, f64>,
    pub trends: BTreeMap<Metric, Trend>,
    pub series: BTreeMap<Metric, Vec<f64>>,
}

impl TelemetryView {
    pub fn from_samples(source: DataSource, samples: &[Sample]) -> Self {
        let timestamps: Vec<DateTime<Utc>> = samples.iter().map(|s| s.timestamp).collect();

        let current_values: BTreeMap<Metric, f64> = samples
            .last()
            .map(|latest| {
                Metric::ALL
                    .iter()
                    .map(|&m| (m, latest.value(m)))
                    .collect()
            })
            .unwrap_or_default();

        let series: BTreeMap<Metric, Vec<f64>> = Metric::ALL
            .iter()
            .map(|&m| (m, samples.iter().map(|s| s.value(m)).collect()))
            .collect();

        Self {
            source,
            timestamps,
            current_values,
            trends: analyze(samples),
            series,
        }
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }
}
