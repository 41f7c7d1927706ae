// Wire decoding for history rows and stream frames
use crate::domain::error::MalformedFrame;
use crate::domain::sample::Sample;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

pub const TELEMETRY_UPDATE: &str = "telemetry_update";

/// One telemetry row as the provider sends it. Numeric fields may be
/// missing or null; they become 0.
#[derive(Debug, Default, Deserialize)]
pub struct SampleRow {
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub altitude: Option<f64>,
    #[serde(default)]
    pub speed: Option<f64>,
    #[serde(default)]
    pub battery: Option<f64>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub nitrogen: Option<f64>,
    #[serde(default)]
    pub phosphorus: Option<f64>,
    #[serde(default)]
    pub potassium: Option<f64>,
    #[serde(default)]
    pub organic_matter: Option<f64>,
    #[serde(default, alias = "pH")]
    pub ph: Option<f64>,
    #[serde(default, alias = "soil_moisture")]
    pub moisture: Option<f64>,
    #[serde(default, alias = "ec")]
    pub conductivity: Option<f64>,
}

impl SampleRow {
    pub fn into_sample(self) -> Result<Sample, MalformedFrame> {
        let timestamp = self
            .timestamp
            .as_deref()
            .and_then(parse_timestamp)
            .ok_or(MalformedFrame::Timestamp)?;

        Ok(Sample {
            timestamp,
            altitude: self.altitude.unwrap_or_default(),
            speed: self.speed.unwrap_or_default(),
            battery: self.battery.unwrap_or_default(),
            temperature: self.temperature.unwrap_or_default(),
            nitrogen: self.nitrogen.unwrap_or_default(),
            phosphorus: self.phosphorus.unwrap_or_default(),
            potassium: self.potassium.unwrap_or_default(),
            organic_matter: self.organic_matter.unwrap_or_default(),
            ph: self.ph.unwrap_or_default(),
            moisture: self.moisture.unwrap_or_default(),
            conductivity: self.conductivity.unwrap_or_default(),
        })
    }
}

/// Decode a JSON row (history entry or frame body) into a sample.
pub fn decode_row(row: Value) -> Result<Sample, MalformedFrame> {
    let row = SampleRow::deserialize(row).map_err(|e| MalformedFrame::Fields(e.to_string()))?;
    row.into_sample()
}

/// Decode one event-stream payload.
///
/// Returns `Ok(None)` for well-formed frames of another type, which the
/// feed ignores. The sample fields may be at the top level or under `data`.
pub fn decode_frame(payload: &str) -> Result<Option<Sample>, MalformedFrame> {
    let mut frame: Value =
        serde_json::from_str(payload).map_err(|e| MalformedFrame::Json(e.to_string()))?;

    let kind = frame
        .get("type")
        .and_then(Value::as_str)
        .ok_or(MalformedFrame::MissingType)?;
    if kind != TELEMETRY_UPDATE {
        return Ok(None);
    }

    let nested = frame.get("data").is_some_and(Value::is_object);
    let body = if nested {
        frame.get_mut("data").map(Value::take).unwrap_or_default()
    } else {
        frame
    };
    decode_row(body).map(Some)
}

/// RFC 3339, or a naive ISO-8601 timestamp taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_decode_telemetry_update() {
        let payload = r#"{"type":"telemetry_update","timestamp":"2025-06-01T10:00:00Z","altitude":120.5,"battery":88,"pH":6.4}"#;
        let sample = decode_frame(payload).unwrap().unwrap();

        assert_eq!(sample.timestamp, Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap());
        assert_eq!(sample.altitude, 120.5);
        assert_eq!(sample.battery, 88.0);
        assert_eq!(sample.ph, 6.4);
        // missing fields default to zero
        assert_eq!(sample.speed, 0.0);
        assert_eq!(sample.conductivity, 0.0);
    }

    #[test]
    fn test_decode_nested_data_and_nulls() {
        let payload = r#"{"type":"telemetry_update","data":{"timestamp":"2025-06-01T10:00:05","speed":null,"soil_moisture":31.5}}"#;
        let sample = decode_frame(payload).unwrap().unwrap();

        assert_eq!(sample.timestamp, Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 5).unwrap());
        assert_eq!(sample.speed, 0.0);
        assert_eq!(sample.moisture, 31.5);
    }

    #[test]
    fn test_other_frame_types_are_ignored() {
        let payload = r#"{"type":"heartbeat","timestamp":"2025-06-01T10:00:00Z"}"#;
        assert_eq!(decode_frame(payload), Ok(None));
    }

    #[test]
    fn test_malformed_frames() {
        assert!(matches!(decode_frame("not json"), Err(MalformedFrame::Json(_))));
        assert_eq!(
            decode_frame(r#"{"timestamp":"2025-06-01T10:00:00Z"}"#),
            Err(MalformedFrame::MissingType)
        );
        assert!(matches!(
            decode_frame(r#"{"type":"telemetry_update","timestamp":"2025-06-01T10:00:00Z","battery":"full"}"#),
            Err(MalformedFrame::Fields(_))
        ));
        assert_eq!(
            decode_frame(r#"{"type":"telemetry_update","battery":50}"#),
            Err(MalformedFrame::Timestamp)
        );
        assert_eq!(
            decode_frame(r#"{"type":"telemetry_update","timestamp":"yesterday"}"#),
            Err(MalformedFrame::Timestamp)
        );
    }

    #[test]
    fn test_parse_timestamp_offsets() {
        let ts = parse_timestamp("2025-06-01T12:00:00+02:00").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap());
        assert!(parse_timestamp("2025-06-01 10:00:00.250").is_some());
    }
}
