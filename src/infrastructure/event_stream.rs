// Incremental text/event-stream decoding
use crate::domain::error::TransportError;
use bytes::{Buf, Bytes, BytesMut};
use futures::stream::Stream;
use futures::StreamExt;

/// Largest event accepted before the subscription is abandoned.
pub const MAX_EVENT_BYTES: usize = 1024 * 1024;

/// Splits a byte stream into server-sent events and yields each event's
/// `data` payload. Comment lines and other fields are skipped.
///
/// Lines end in `\r\n`, `\n` or a bare `\r`. Bytes are scanned once, and
/// an event growing past the size limit is reported as an error.
#[derive(Debug)]
pub struct EventStreamDecoder {
    buffer: BytesMut,
    // bytes of `buffer` already searched for a line ending
    scanned: usize,
    // last line ended in `\r`, so a leading `\n` belongs to it
    skip_lf: bool,
    data: Option<String>,
    event_bytes: usize,
    max_event_bytes: usize,
}

impl Default for EventStreamDecoder {
    fn default() -> Self {
        Self::with_limit(MAX_EVENT_BYTES)
    }
}

impl EventStreamDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(max_event_bytes: usize) -> Self {
        Self {
            buffer: BytesMut::new(),
            scanned: 0,
            skip_lf: false,
            data: None,
            event_bytes: 0,
            max_event_bytes,
        }
    }

    pub fn push(&mut self, chunk: &[u8]) {
        self.buffer.extend_from_slice(chunk);
    }

    /// Next complete event payload, if one is buffered.
    pub fn next_payload(&mut self) -> Result<Option<String>, TransportError> {
        while let Some(line) = self.next_line() {
            if line.is_empty() {
                self.event_bytes = 0;
                if let Some(payload) = self.data.take() {
                    return Ok(Some(payload));
                }
                continue;
            }

            self.event_bytes += line.len();
            self.check_size(0)?;
            self.field(&line);
        }

        // what is left is one unterminated line
        self.check_size(self.buffer.len())?;
        Ok(None)
    }

    fn next_line(&mut self) -> Option<Bytes> {
        if self.skip_lf && !self.buffer.is_empty() {
            if self.buffer[0] == b'\n' {
                self.buffer.advance(1);
            }
            self.skip_lf = false;
        }

        let offset = self.buffer[self.scanned..]
            .iter()
            .position(|b| *b == b'\n' || *b == b'\r');
        let Some(offset) = offset else {
            self.scanned = self.buffer.len();
            return None;
        };

        let line = self.buffer.split_to(self.scanned + offset).freeze();
        self.skip_lf = self.buffer[0] == b'\r';
        self.buffer.advance(1);
        self.scanned = 0;
        Some(line)
    }

    fn check_size(&self, pending: usize) -> Result<(), TransportError> {
        if self.event_bytes + pending > self.max_event_bytes {
            return Err(TransportError::EventTooLarge(self.max_event_bytes));
        }
        Ok(())
    }

    fn field(&mut self, line: &[u8]) {
        let text = String::from_utf8_lossy(line);
        let (field, value) = match text.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (text.as_ref(), ""),
        };
        if field != "data" {
            return;
        }
        match self.data.as_mut() {
            Some(existing) => {
                existing.push('\n');
                existing.push_str(value);
            }
            None => self.data = Some(value.to_string()),
        }
    }
}

/// Adapt a response body into a stream of event payloads. The stream ends
/// with a single error once the body fails or finishes, or an event grows
/// too large.
pub fn event_payloads<S, E>(body: S) -> impl Stream<Item = Result<String, TransportError>> + Send
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: Into<TransportError> + Send + 'static,
{
    async_stream::stream! {
        let mut decoder = EventStreamDecoder::new();
        let mut body = Box::pin(body);

        'body: loop {
            match body.next().await {
                Some(Ok(chunk)) => {
                    decoder.push(&chunk);
                    loop {
                        match decoder.next_payload() {
                            Ok(Some(payload)) => yield Ok(payload),
                            Ok(None) => break,
                            Err(e) => {
                                yield Err(e);
                                break 'body;
                            }
                        }
                    }
                }
                Some(Err(e)) => {
                    yield Err(e.into());
                    break;
                }
                None => {
                    yield Err(TransportError::Closed);
                    break;
                }
            }
        }
    }
}
