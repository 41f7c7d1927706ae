use crate::application::reconnecting_stream::{StreamOptions, RECONNECT_DELAY};
use crate::application::sample_source::HistoryOrder;
use crate::domain::history::HISTORY_CAPACITY;
use serde::Deserialize;
use std::time::Duration;

pub const CONFIG_FILE: &str = "config/feed";
pub const ENV_PREFIX: &str = "FARM_TELEMETRY";

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub upstream: UpstreamSettings,
    pub feed: FeedSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UpstreamSettings {
    pub base_url: String,
    pub connect_timeout_secs: u64,
    pub history_timeout_secs: u64,
    /// Row order of the history endpoint
    pub history_order: HistoryOrder,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FeedSettings {
    pub reconnect_delay_ms: u64,
}

impl FeedSettings {
    pub fn stream_options(&self) -> StreamOptions {
        StreamOptions {
            reconnect_delay: Duration::from_millis(self.reconnect_delay_ms),
            history_limit: HISTORY_CAPACITY,
        }
    }
}

/// Defaults, overridden by `config/feed.toml` (optional), overridden by
/// `FARM_TELEMETRY__SECTION__KEY` environment variables.
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let builder = config::Config::builder()
        .add_source(config::File::with_name(CONFIG_FILE).required(false))
        .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"));

    build_config(builder)
}

fn build_config(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
) -> anyhow::Result<AppConfig> {
    let settings = builder
        .set_default("server.bind", "0.0.0.0:8080")?
        .set_default("upstream.base_url", "http://localhost:8000")?
        .set_default("upstream.connect_timeout_secs", 5)?
        .set_default("upstream.history_timeout_secs", 10)?
        .set_default("upstream.history_order", "newest_first")?
        .set_default("feed.reconnect_delay_ms", RECONNECT_DELAY.as_millis() as u64)?
        .build()?;

    Ok(settings.try_deserialize()?)
}
