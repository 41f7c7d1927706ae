// Reconnecting live stream - Owns the history buffer and publishes views
use crate::application::sample_source::{FrameStream, SampleSource};
use crate::domain::frame::decode_frame;
use crate::domain::history::{HistoryBuffer, HISTORY_CAPACITY};
use crate::domain::view::{ConnectionState, DataSource, TelemetryView};
use futures::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

pub const RECONNECT_DELAY: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone)]
pub struct StreamOptions {
    pub reconnect_delay: Duration,
    pub history_limit: usize,
}

impl Default for StreamOptions {
    fn default() -> Self {
        Self {
            reconnect_delay: RECONNECT_DELAY,
            history_limit: HISTORY_CAPACITY,
        }
    }
}

/// Seeds history from the source, then keeps one live subscription open,
/// resubscribing after a fixed delay whenever it fails. Retries forever.
///
/// Runs as a single task: it is the only writer of its buffer, and every
/// append is followed by publishing a fresh view.
pub struct ReconnectingStream {
    source: Arc<dyn SampleSource>,
    options: StreamOptions,
    buffer: HistoryBuffer,
    views: Arc<watch::Sender<Arc<TelemetryView>>>,
    state: Arc<watch::Sender<ConnectionState>>,
}

impl ReconnectingStream {
    pub fn new(
        source: Arc<dyn SampleSource>,
        options: StreamOptions,
        views: Arc<watch::Sender<Arc<TelemetryView>>>,
        state: Arc<watch::Sender<ConnectionState>>,
    ) -> Self {
        Self {
            source,
            options,
            buffer: HistoryBuffer::new(),
            views,
            state,
        }
    }

    pub async fn run(mut self) {
        self.seed().await;

        loop {
            match self.source.subscribe().await {
                Ok(frames) => self.consume(frames).await,
                Err(e) => tracing::warn!(error = %e, "could not open telemetry stream"),
            }

            self.set_state(ConnectionState::DisconnectedRetrying);
            tracing::warn!(
                delay_ms = self.options.reconnect_delay.as_millis() as u64,
                "telemetry stream disconnected, scheduling reconnect"
            );
            tokio::time::sleep(self.options.reconnect_delay).await;
            self.set_state(ConnectionState::Connecting);
        }
    }

    async fn seed(&mut self) {
        let history = match self.source.fetch_history(self.options.history_limit).await {
            Ok(batch) => batch.into_oldest_first(),
            Err(e) => {
                tracing::warn!(error = %e, "history fetch failed, starting empty");
                Vec::new()
            }
        };

        tracing::debug!("Seeding history with {} samples", history.len());
        for sample in history {
            self.buffer.append(sample);
        }
        if !self.buffer.is_empty() {
            self.publish();
        }
    }

    /// Drain one subscription until it errors or ends. The stream is
    /// dropped (closed) on return.
    async fn consume(&mut self, mut frames: FrameStream) {
        while let Some(item) = frames.next().await {
            match item {
                Ok(payload) => {
                    self.set_state(ConnectionState::Connected);
                    self.handle_payload(&payload);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "telemetry stream failed");
                    return;
                }
            }
        }
        tracing::warn!("telemetry stream ended");
    }

    fn handle_payload(&mut self, payload: &str) {
        match decode_frame(payload) {
            Ok(Some(sample)) => {
                self.buffer.append(sample);
                self.publish();
            }
            Ok(None) => tracing::trace!("ignoring non-telemetry frame"),
            Err(e) => tracing::debug!(error = %e, "dropping malformed frame"),
        }
    }

    fn publish(&self) {
        let view = TelemetryView::from_samples(DataSource::Live, &self.buffer.snapshot());
        tracing::trace!(samples = self.buffer.len(), "publishing live view");
        self.views.send_replace(Arc::new(view));
    }

    fn set_state(&self, next: ConnectionState) {
        let changed = self.state.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
        if changed {
            tracing::info!(state = ?next, "connection state changed");
        }
    }
}
