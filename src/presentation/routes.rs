// Router wiring
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{current_view, health_check, list_metrics, stream_views};
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/telemetry", get(current_view))
        .route("/telemetry/metrics", get(list_metrics))
        .route("/telemetry/stream", get(stream_views))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
