// In-memory scripted source shared by application tests
use crate::application::sample_source::{FrameStream, HistoryBatch, HistoryOrder, SampleSource};
use crate::domain::error::TransportError;
use crate::domain::sample::Sample;
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use futures::stream::{self, StreamExt};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

pub type Session = mpsc::UnboundedSender<Result<String, TransportError>>;

pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap()
}

pub fn sample_at(secs: i64) -> Sample {
    Sample::zeroed(epoch() + Duration::seconds(secs))
}

/// A `telemetry_update` payload at `secs` past the epoch.
pub fn frame(secs: i64, battery: f64) -> String {
    serde_json::json!({
        "type": "telemetry_update",
        "timestamp": (epoch() + Duration::seconds(secs)).to_rfc3339(),
        "battery": battery,
    })
    .to_string()
}

/// Let spawned tasks run until they block on I/O or timers.
pub async fn settle() {
    for _ in 0..32 {
        tokio::task::yield_now().await;
    }
}

/// Each `subscribe` hands out the next queued session; tests push frames
/// and errors through the returned sender. With no session queued the
/// subscription stays silent forever.
#[derive(Default)]
pub struct ScriptedSource {
    history: Vec<Sample>,
    fail_history: bool,
    history_limits: Mutex<Vec<usize>>,
    sessions: Mutex<VecDeque<mpsc::UnboundedReceiver<Result<String, TransportError>>>>,
    failing_subscribes: AtomicUsize,
    subscribes: AtomicUsize,
    open: Arc<AtomicUsize>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// History returned newest first, as the HTTP provider does.
    pub fn with_history(newest_first: Vec<Sample>) -> Self {
        Self {
            history: newest_first,
            ..Self::default()
        }
    }

    pub fn failing_history(mut self) -> Self {
        self.fail_history = true;
        self
    }

    pub fn session(&self) -> Session {
        let (tx, rx) = mpsc::unbounded_channel();
        self.sessions.lock().unwrap().push_back(rx);
        tx
    }

    pub fn fail_next_subscribes(&self, count: usize) {
        self.failing_subscribes.store(count, Ordering::SeqCst);
    }

    pub fn subscribe_count(&self) -> usize {
        self.subscribes.load(Ordering::SeqCst)
    }

    /// Subscriptions handed out and not yet dropped.
    pub fn open_subscriptions(&self) -> usize {
        self.open.load(Ordering::SeqCst)
    }

    pub fn history_limits(&self) -> Vec<usize> {
        self.history_limits.lock().unwrap().clone()
    }
}

struct OpenGuard(Arc<AtomicUsize>);

impl OpenGuard {
    fn new(open: Arc<AtomicUsize>) -> Self {
        open.fetch_add(1, Ordering::SeqCst);
        Self(open)
    }
}

impl Drop for OpenGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl SampleSource for ScriptedSource {
    async fn fetch_history(&self, limit: usize) -> Result<HistoryBatch, TransportError> {
        self.history_limits.lock().unwrap().push(limit);
        if self.fail_history {
            return Err(TransportError::Status(503));
        }
        let samples = self.history.iter().take(limit).cloned().collect();
        Ok(HistoryBatch::new(samples, HistoryOrder::NewestFirst))
    }

    async fn subscribe(&self) -> Result<FrameStream, TransportError> {
        self.subscribes.fetch_add(1, Ordering::SeqCst);
        let failing = self
            .failing_subscribes
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(TransportError::Status(502));
        }

        let session = self.sessions.lock().unwrap().pop_front();
        let frames: FrameStream = match session {
            Some(rx) => UnboundedReceiverStream::new(rx).boxed(),
            None => stream::pending().boxed(),
        };
        let guard = OpenGuard::new(self.open.clone());
        Ok(frames
            .map(move |item| {
                let _open = &guard;
                item
            })
            .boxed())
    }
}
