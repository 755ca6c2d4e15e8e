//! Server-sent event decoding for deployment progress streams.
//!
//! cPanel pushes deployment progress over a `text/event-stream` response.
//! The wire format is line-oriented: `event:` and `data:` fields accumulate
//! until a blank line dispatches the pending event. [`SseParser`] decodes
//! that grammar one line at a time; [`EventStream`] drives it from a raw
//! byte stream whose chunk boundaries may fall anywhere.

use std::collections::VecDeque;
use std::pin::Pin;

use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use tracing::debug;

use crate::{ClientError, CpanelClient, Result};

/// One dispatched server-sent event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    /// Event name; `message` when the stream did not name one.
    pub event: String,
    /// Data lines joined with `\n`.
    pub data: String,
}

/// Incremental decoder for the `text/event-stream` line grammar.
#[derive(Debug, Default)]
struct SseParser {
    event: Option<String>,
    data: Vec<String>,
}

impl SseParser {
    /// Consumes one line, without its terminator, and returns an event when
    /// the line completes one.
    fn feed_line(&mut self, line: &str) -> Option<SseEvent> {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.is_empty() {
            return self.dispatch();
        }
        // Lines starting with a colon are comments, commonly keep-alives.
        if line.starts_with(':') {
            return None;
        }
        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        match field {
            "event" => self.event = Some(value.to_string()),
            "data" => self.data.push(value.to_string()),
            // id and retry are not used by the deployment stream.
            _ => {}
        }
        None
    }

    fn dispatch(&mut self) -> Option<SseEvent> {
        if self.event.is_none() && self.data.is_empty() {
            return None;
        }
        let event = self.event.take().unwrap_or_else(|| "message".to_string());
        let data = std::mem::take(&mut self.data).join("\n");
        Some(SseEvent { event, data })
    }
}

/// Decoded event stream over a raw chunk stream.
///
/// The inner stream type is erased so tests can substitute scripted chunks
/// for a live response body.
pub struct EventStream {
    inner: Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>,
    parser: SseParser,
    buffer: Vec<u8>,
    ready: VecDeque<SseEvent>,
}

impl EventStream {
    /// Wraps a raw chunk stream.
    pub fn new<S>(stream: S) -> Self
    where
        S: Stream<Item = Result<Bytes>> + Send + 'static,
    {
        Self {
            inner: Box::pin(stream),
            parser: SseParser::default(),
            buffer: Vec::new(),
            ready: VecDeque::new(),
        }
    }

    /// Yields the next decoded event.
    ///
    /// Returns `Ok(None)` when the server closes the stream and a transport
    /// error when the connection drops mid-stream.
    pub async fn next_event(&mut self) -> Result<Option<SseEvent>> {
        loop {
            if let Some(event) = self.ready.pop_front() {
                return Ok(Some(event));
            }
            match self.inner.next().await {
                Some(chunk) => self.feed_chunk(&chunk?),
                None => return Ok(None),
            }
        }
    }

    fn feed_chunk(&mut self, chunk: &[u8]) {
        self.buffer.extend_from_slice(chunk);
        // Multi-byte UTF-8 sequences never contain 0x0A, so cutting at
        // newlines keeps partial sequences intact in the buffer.
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&line[..line.len() - 1]);
            if let Some(event) = self.parser.feed_line(&line) {
                self.ready.push_back(event);
            }
        }
    }
}

impl CpanelClient {
    /// Opens the server-sent event stream for a deployment.
    ///
    /// The URL comes from the create response and is usually relative to
    /// the account's base URL; absolute URLs are passed through untouched.
    pub async fn open_events(&self, sse_url: &str) -> Result<EventStream> {
        let url = if sse_url.starts_with("http://") || sse_url.starts_with("https://") {
            sse_url.to_string()
        } else {
            format!("{}/{}", self.base_url, sse_url.trim_start_matches('/'))
        };
        debug!("Opening deployment event stream at: {}", url);

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::AUTHORIZATION, self.credentials.header_value())
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::http(status, body));
        }
        let chunks = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(ClientError::from));
        Ok(EventStream::new(chunks))
    }
}
