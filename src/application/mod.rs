// Application layer - Feed lifecycle, streaming and fallback data
pub mod reconnecting_stream;
pub mod sample_source;
pub mod synthetic;
pub mod telemetry_feed;

#[cfg(test)]
pub(crate) mod testing;
