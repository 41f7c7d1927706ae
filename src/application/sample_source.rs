// Source trait for upstream telemetry access
use crate::domain::error::TransportError;
use crate::domain::sample::Sample;
use async_trait::async_trait;
use futures::stream::BoxStream;
use serde::Deserialize;

/// Live subscription: raw frame payloads in arrival order. Effectively
/// infinite; dropping it closes the underlying connection.
pub type FrameStream = BoxStream<'static, Result<String, TransportError>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryOrder {
    OldestFirst,
    NewestFirst,
}

/// Initial history as delivered by a source, with its declared order.
#[derive(Debug, Clone)]
pub struct HistoryBatch {
    pub samples: Vec<Sample>,
    pub order: HistoryOrder,
}

impl HistoryBatch {
    pub fn new(samples: Vec<Sample>, order: HistoryOrder) -> Self {
        Self { samples, order }
    }

    pub fn into_oldest_first(self) -> Vec<Sample> {
        let mut samples = self.samples;
        if self.order == HistoryOrder::NewestFirst {
            samples.reverse();
        }
        samples
    }
}

#[async_trait]
pub trait SampleSource: Send + Sync {
    /// Fetch up to `limit` recent samples
    async fn fetch_history(&self, limit: usize) -> Result<HistoryBatch, TransportError>;

    /// Open a new live subscription
    async fn subscribe(&self) -> Result<FrameStream, TransportError>;
}
