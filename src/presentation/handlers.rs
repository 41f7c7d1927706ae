// HTTP request handlers
use crate::domain::sample::{Metric, MetricDescriptor};
use crate::domain::view::{ConnectionState, TelemetryView};
use crate::presentation::app_state::AppState;
use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::Json;
use futures::stream::{self, Stream};
use futures::StreamExt;
use serde::Serialize;
use std::sync::Arc;
use tokio_stream::wrappers::WatchStream;

#[derive(Debug, Serialize)]
pub struct FeedResponse {
    pub connection: ConnectionState,
    #[serde(flatten)]
    pub view: Arc<TelemetryView>,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Latest view model plus connection state
pub async fn current_view(State(state): State<Arc<AppState>>) -> Json<FeedResponse> {
    Json(FeedResponse {
        connection: state.feed.connection_state(),
        view: state.feed.view(),
    })
}

/// Static metric metadata
pub async fn list_metrics() -> Json<Vec<MetricDescriptor>> {
    Json(Metric::ALL.iter().map(|m| m.descriptor()).collect())
}

/// Push a server-sent `view` event on every published view or connection
/// state change until shutdown
pub async fn stream_views(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let feed = state.feed.clone();
    let mut shutdown = state.shutdown.clone();

    let views = WatchStream::new(feed.watch_views()).map(|_| ());
    let states = WatchStream::from_changes(feed.watch_state()).map(|_| ());
    let updates = stream::select(views, states).map(move |()| {
        Event::default().event("view").json_data(FeedResponse {
            connection: feed.connection_state(),
            view: feed.view(),
        })
    });
    let stopping = async move {
        let _ = shutdown.wait_for(|stopping| *stopping).await;
    };

    Sse::new(updates.take_until(stopping)).keep_alive(KeepAlive::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::reconnecting_stream::StreamOptions;
    use crate::application::telemetry_feed::TelemetryFeed;
    use crate::application::testing::ScriptedSource;
    use crate::domain::view::DataSource;
    use tokio::sync::watch;

    fn state() -> (TelemetryFeed, Arc<AppState>, watch::Sender<bool>) {
        let feed = TelemetryFeed::new(Arc::new(ScriptedSource::new()), StreamOptions::default());
        let (shutdown_tx, shutdown) = watch::channel(false);
        let state = Arc::new(AppState {
            feed: feed.handle(),
            shutdown,
        });
        (feed, state, shutdown_tx)
    }

    #[tokio::test]
    async fn test_current_view_before_start() {
        let (_feed, state, _shutdown) = state();
        let Json(response) = current_view(State(state)).await;

        assert_eq!(response.connection, ConnectionState::Connecting);
        assert_eq!(response.view.source, DataSource::Synthetic);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["connection"], "connecting");
        assert_eq!(json["source"], "synthetic");
        assert_eq!(json["series"]["battery"].as_array().map(Vec::len), Some(60));
    }

    #[tokio::test]
    async fn test_list_metrics() {
        let Json(metrics) = list_metrics().await;
        assert_eq!(metrics.len(), Metric::ALL.len());
        assert_eq!(metrics[0].key, "altitude");
        assert_eq!(metrics[0].unit, "m");
    }
}
