// Telemetry feed - Entry point composing source, stream and fallback data
use crate::application::reconnecting_stream::{ReconnectingStream, StreamOptions};
use crate::application::sample_source::SampleSource;
use crate::application::synthetic::SyntheticGenerator;
use crate::domain::view::{ConnectionState, DataSource, TelemetryView};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Owns one live feed: a private stream task and its history buffer.
///
/// Until live data arrives, readers see a synthetic view generated once per
/// start. Feeds never share state with each other.
pub struct TelemetryFeed {
    source: Arc<dyn SampleSource>,
    options: StreamOptions,
    synthetic: SyntheticGenerator,
    views: Arc<watch::Sender<Arc<TelemetryView>>>,
    state: Arc<watch::Sender<ConnectionState>>,
    task: Option<JoinHandle<()>>,
}

/// Read-only access to a feed's latest view and connection state.
#[derive(Clone)]
pub struct FeedHandle {
    views: watch::Receiver<Arc<TelemetryView>>,
    state: watch::Receiver<ConnectionState>,
}

impl FeedHandle {
    pub fn view(&self) -> Arc<TelemetryView> {
        self.views.borrow().clone()
    }

    pub fn connection_state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    /// Receiver notified on every published view
    pub fn watch_views(&self) -> watch::Receiver<Arc<TelemetryView>> {
        self.views.clone()
    }

    /// Receiver notified on every connection state change
    pub fn watch_state(&self) -> watch::Receiver<ConnectionState> {
        self.state.clone()
    }
}

impl TelemetryFeed {
    pub fn new(source: Arc<dyn SampleSource>, options: StreamOptions) -> Self {
        let synthetic = SyntheticGenerator::new();
        let (views, _) = watch::channel(Arc::new(Self::synthetic_view(&synthetic)));
        let (state, _) = watch::channel(ConnectionState::Connecting);
        Self {
            source,
            options,
            synthetic,
            views: Arc::new(views),
            state: Arc::new(state),
            task: None,
        }
    }

    /// Start streaming. A running feed is stopped first, so at most one
    /// subscription exists per feed.
    pub async fn start(&mut self) {
        self.stop().await;

        self.views
            .send_replace(Arc::new(Self::synthetic_view(&self.synthetic)));
        self.state.send_replace(ConnectionState::Connecting);

        let stream = ReconnectingStream::new(
            self.source.clone(),
            self.options.clone(),
            self.views.clone(),
            self.state.clone(),
        );
        self.task = Some(tokio::spawn(stream.run()));
        tracing::info!("telemetry feed started");
    }

    /// Cancel any pending reconnect and close the live subscription. Once
    /// this returns the view no longer changes and the state reads `stopped`.
    pub async fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            // resolves once the task has been dropped
            let _ = task.await;
            self.state.send_replace(ConnectionState::Stopped);
            tracing::info!("telemetry feed stopped");
        }
    }

    pub fn handle(&self) -> FeedHandle {
        FeedHandle {
            views: self.views.subscribe(),
            state: self.state.subscribe(),
        }
    }

    fn synthetic_view(generator: &SyntheticGenerator) -> TelemetryView {
        let samples = generator.generate(Utc::now(), &mut rand::thread_rng());
        let view = TelemetryView::from_samples(DataSource::Synthetic, &samples);
        tracing::debug!(samples = view.len(), "generated synthetic view");
        view
    }
}

impl Drop for TelemetryFeed {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
