// HTTP telemetry provider implementation
use crate::application::sample_source::{FrameStream, HistoryBatch, HistoryOrder, SampleSource};
use crate::domain::error::TransportError;
use crate::domain::frame::decode_row;
use crate::infrastructure::config::UpstreamSettings;
use crate::infrastructure::event_stream::event_payloads;
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use std::time::Duration;

pub const HISTORY_PATH: &str = "/api/telemetry/history";
pub const STREAM_PATH: &str = "/api/telemetry/stream";

#[derive(Debug, Clone)]
pub struct HttpSampleSource {
    client: reqwest::Client,
    base_url: String,
    history_timeout: Duration,
    history_order: HistoryOrder,
}

#[derive(Debug, Deserialize)]
struct HistoryResponse {
    #[serde(default)]
    data: Vec<serde_json::Value>,
}

impl HttpSampleSource {
    pub fn new(settings: &UpstreamSettings) -> Result<Self, TransportError> {
        // No overall timeout on the client: the event stream is long-lived
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(settings.connect_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            history_timeout: Duration::from_secs(settings.history_timeout_secs),
            history_order: settings.history_order,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl SampleSource for HttpSampleSource {
    async fn fetch_history(&self, limit: usize) -> Result<HistoryBatch, TransportError> {
        let response = self
            .client
            .get(self.endpoint(HISTORY_PATH))
            .query(&[("limit", limit)])
            .header(ACCEPT, "application/json")
            .timeout(self.history_timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(TransportError::Status(response.status().as_u16()));
        }

        let body = response
            .json::<HistoryResponse>()
            .await
            .map_err(|e| TransportError::Decode(e.to_string()))?;

        let mut samples = Vec::with_capacity(body.data.len());
        for row in body.data {
            match decode_row(row) {
                Ok(sample) => samples.push(sample),
                Err(e) => tracing::debug!(error = %e, "skipping malformed history row"),
            }
        }
        // keep the most recent rows
        match self.history_order {
            HistoryOrder::NewestFirst => samples.truncate(limit),
            HistoryOrder::OldestFirst => {
                let excess = samples.len().saturating_sub(limit);
                samples.drain(..excess);
            }
        }

        tracing::debug!("Fetched {} history samples", samples.len());
        Ok(HistoryBatch::new(samples, self.history_order))
    }

    async fn subscribe(&self) -> Result<FrameStream, TransportError> {
        let response = self
            .client
            .get(self.endpoint(STREAM_PATH))
            .header(ACCEPT, "text/event-stream")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(TransportError::Status(response.status().as_u16()));
        }

        tracing::info!(url = %response.url(), "subscribed to telemetry stream");
        Ok(event_payloads(response.bytes_stream()).boxed())
    }
}
