// Error taxonomy for the telemetry feed
use thiserror::Error;

/// Failure talking to the upstream telemetry provider.
///
/// Never surfaced to readers: history failures degrade to an empty batch,
/// stream failures schedule a reconnect.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("upstream responded with status {0}")]
    Status(u16),

    #[error("could not decode upstream body: {0}")]
    Decode(String),

    #[error("event stream closed by upstream")]
    Closed,

    #[error("event exceeds {0} bytes without a terminating blank line")]
    EventTooLarge(usize),
}

/// A stream frame that is not a well-formed telemetry sample. Dropped.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MalformedFrame {
    #[error("invalid json: {0}")]
    Json(String),

    #[error("frame has no type discriminator")]
    MissingType,

    #[error("invalid sample fields: {0}")]
    Fields(String),

    #[error("missing or unparseable timestamp")]
    Timestamp,
}
