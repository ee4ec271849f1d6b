//! @ai:module:intent Turn an upstream chat-completion SSE body into filtered caller events
//! @ai:module:layer application
//! @ai:module:public_api relay_stream
//! @ai:module:stateless false

use crate::analysis::event::{RelayEvent, DONE_SENTINEL};
use crate::analysis::think_filter::ThinkFilter;
use crate::error::ReportError;
use futures::{Stream, StreamExt};
use serde::Deserialize;
use std::fmt::Display;
use std::time::Duration;

/// @ai:intent Incremental chat-completion chunk, only the fields the relay reads
#[derive(Debug, Default, Deserialize)]
struct ChatCompletionChunk {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
}

#[derive(Debug, Default, Deserialize)]
struct ChunkChoice {
    #[serde(default)]
    delta: ChunkDelta,
}

#[derive(Debug, Default, Deserialize)]
struct ChunkDelta {
    #[serde(default)]
    content: Option<String>,
}

/// @ai:intent What one upstream SSE line means to the relay
#[derive(Debug, PartialEq)]
enum Frame {
    Delta(String),
    Done,
    Skip,
}

/// @ai:intent Split arbitrary byte chunks into complete lines
/// @ai:invariant bytes are decoded only once a full line is present
#[derive(Debug, Default)]
struct LineBuffer {
    pending: Vec<u8>,
}

impl LineBuffer {
    /// @ai:intent Append bytes and return every line completed by them
    /// @ai:effects state:write
    fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(bytes);

        let mut lines = Vec::new();
        while let Some(pos) = self.pending.iter().position(|b| *b == b'\n') {
            let raw: Vec<u8> = self.pending.drain(..=pos).collect();
            lines.push(decode_line(&raw[..raw.len() - 1]));
        }
        lines
    }

    /// @ai:intent Trailing line without a terminator, if any
    /// @ai:effects state:write
    fn finish(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        let raw = std::mem::take(&mut self.pending);
        Some(decode_line(&raw))
    }
}

fn decode_line(raw: &[u8]) -> String {
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw).into_owned()
}

/// @ai:intent Interpret one SSE line from the upstream body
/// @ai:post malformed payloads are logged at debug and skipped
/// @ai:effects pure
fn parse_line(line: &str) -> Frame {
    let Some(data) = line.strip_prefix("data:") else {
        return Frame::Skip;
    };
    let data = data.trim();

    if data == DONE_SENTINEL {
        return Frame::Done;
    }

    match serde_json::from_str::<ChatCompletionChunk>(data) {
        Ok(chunk) => chunk
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.delta.content)
            .filter(|text| !text.is_empty())
            .map(Frame::Delta)
            .unwrap_or(Frame::Skip),
        Err(e) => {
            let err = ReportError::UpstreamProtocol(e.to_string());
            tracing::debug!("Skipping upstream fragment: {}", err);
            Frame::Skip
        }
    }
}

/// @ai:intent Relay an upstream body as caller events through the think filter
/// @ai:pre body yields the raw bytes of a chat-completion SSE response
/// @ai:post ends with exactly one terminal event (Done, or Error on failure)
/// @ai:effects network
pub fn relay_stream<S, B, E>(body: S, read_timeout: Duration) -> impl Stream<Item = RelayEvent> + Send + 'static
where
    S: Stream<Item = std::result::Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Display + Send + 'static,
{
    async_stream::stream! {
        let mut body = Box::pin(body);
        let mut lines = LineBuffer::default();
        let mut filter = ThinkFilter::new();
        let mut forwarded = 0usize;
        let mut saw_done = false;

        'read: loop {
            let next = match tokio::time::timeout(read_timeout, body.next()).await {
                Ok(next) => next,
                Err(_) => {
                    let err = ReportError::RelayFailure(format!(
                        "analysis server sent no data within {:?}",
                        read_timeout
                    ));
                    tracing::warn!("{}", err);
                    yield RelayEvent::Error(err.to_string());
                    return;
                }
            };

            let chunk = match next {
                Some(Ok(chunk)) => chunk,
                Some(Err(e)) => {
                    let err = ReportError::RelayFailure(format!("analysis stream failed: {}", e));
                    tracing::warn!("{}", err);
                    yield RelayEvent::Error(err.to_string());
                    return;
                }
                None => break 'read,
            };

            for line in lines.push(chunk.as_ref()) {
                match parse_line(&line) {
                    Frame::Delta(text) => {
                        if let Some(out) = filter.push(&text) {
                            forwarded += 1;
                            yield RelayEvent::Content(out);
                        }
                    }
                    Frame::Done => {
                        saw_done = true;
                        break 'read;
                    }
                    Frame::Skip => {}
                }
            }
        }

        if !saw_done {
            if let Some(line) = lines.finish() {
                if let Frame::Delta(text) = parse_line(&line) {
                    if let Some(out) = filter.push(&text) {
                        forwarded += 1;
                        yield RelayEvent::Content(out);
                    }
                }
            }
        }

        if let Some(rest) = filter.finish() {
            tracing::info!("No report heading found, forwarding buffered text as-is");
            forwarded += 1;
            yield RelayEvent::Content(rest);
        }

        tracing::info!("Analysis stream complete ({} events forwarded)", forwarded);
        yield RelayEvent::Done;
    }
}
