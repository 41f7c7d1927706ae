// Application state for HTTP handlers
use crate::application::telemetry_feed::FeedHandle;
use tokio::sync::watch;

#[derive(Clone)]
pub struct AppState {
    pub feed: FeedHandle,
    /// Flips to `true` when the server begins shutting down
    pub shutdown: watch::Receiver<bool>,
}
