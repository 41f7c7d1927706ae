// Presentation layer - HTTP surface over the telemetry feed
pub mod app_state;
pub mod handlers;
pub mod routes;
