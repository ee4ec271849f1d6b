//! @ai:module:intent Streaming chat-completion client for the analysis backend
//! @ai:module:layer infrastructure
//! @ai:module:public_api AnalysisClient, AnalysisClientTrait, AnalysisRequest, MockAnalysisClient
//! @ai:module:stateless false

use crate::analysis::event::RelayEvent;
use crate::analysis::relay::relay_stream;
use crate::config::AnalysisConfig;
use crate::error::{ReportError, Result};
use futures::stream::{self, BoxStream};
use futures::StreamExt;
use serde::Serialize;
use std::time::Duration;

/// @ai:intent One analysis request resolved by the caller
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub server_url: String,
    pub model: String,
    pub prompt: String,
}

/// @ai:intent Trait for clients that stream an analysis back as events
pub trait AnalysisClientTrait: Send + Sync {
    /// @ai:intent Start an analysis and return its event stream
    /// @ai:post the stream ends with exactly one terminal event
    fn stream_analysis(&self, request: AnalysisRequest) -> BoxStream<'static, RelayEvent>;
}

/// @ai:intent Chat-completion request body
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

/// @ai:intent HTTP client for an OpenAI-compatible completion endpoint
pub struct AnalysisClient {
    client: reqwest::Client,
    config: AnalysisConfig,
}

impl AnalysisClient {
    /// @ai:intent Create a new analysis client
    /// @ai:effects pure
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout())
            .build()?;

        Ok(Self { client, config })
    }

    fn chat_request(&self, request: &AnalysisRequest) -> ChatRequest {
        ChatRequest {
            model: request.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: self.config.system_prompt.clone(),
                },
                ChatMessage {
                    role: "user",
                    content: request.prompt.clone(),
                },
            ],
            stream: true,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        }
    }
}

fn completions_url(server_url: &str) -> String {
    format!("{}/v1/chat/completions", server_url.trim_end_matches('/'))
}

fn failure(err: ReportError) -> RelayEvent {
    tracing::warn!("Analysis relay failed: {}", err);
    RelayEvent::Error(err.to_string())
}

impl AnalysisClientTrait for AnalysisClient {
    /// @ai:intent POST the prompt with stream=true and relay the response
    /// @ai:effects network
    fn stream_analysis(&self, request: AnalysisRequest) -> BoxStream<'static, RelayEvent> {
        let client = self.client.clone();
        let url = completions_url(&request.server_url);
        let body = self.chat_request(&request);
        let read_timeout = self.config.read_timeout();
        let server_url = request.server_url;

        tracing::info!("Requesting analysis from {} (model {})", url, body.model);

        let events = async_stream::stream! {
            let sent = tokio::time::timeout(read_timeout, client.post(&url).json(&body).send()).await;

            let response = match sent {
                Ok(Ok(response)) => response,
                Ok(Err(e)) if e.is_connect() => {
                    yield failure(ReportError::UpstreamConnect { url: server_url, source: e });
                    return;
                }
                Ok(Err(e)) => {
                    yield failure(ReportError::RelayFailure(format!("analysis request failed: {}", e)));
                    return;
                }
                Err(_) => {
                    yield failure(ReportError::RelayFailure(format!(
                        "analysis server did not respond within {:?}",
                        read_timeout
                    )));
                    return;
                }
            };

            let status = response.status();
            if !status.is_success() {
                let message = match tokio::time::timeout(read_timeout, response.text()).await {
                    Ok(text) => format!("analysis server error ({}): {}", status, text.unwrap_or_default()),
                    Err(_) => format!(
                        "analysis server error ({}): no response body within {:?}",
                        status, read_timeout
                    ),
                };
                yield failure(ReportError::RelayFailure(message));
                return;
            }

            let mut relayed = Box::pin(relay_stream(response.bytes_stream(), read_timeout));
            while let Some(event) = relayed.next().await {
                yield event;
            }
        };

        events.boxed()
    }
}

/// @ai:intent Mock client that replays canned upstream SSE lines through the relay
pub struct MockAnalysisClient {
    lines: Vec<String>,
}

impl MockAnalysisClient {
    /// @ai:intent Create a mock from raw upstream SSE lines
    /// @ai:effects pure
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }

    /// @ai:intent Mock whose upstream sends each text as one delta, then the sentinel
    /// @ai:effects pure
    pub fn with_deltas(deltas: &[&str]) -> Self {
        let mut lines: Vec<String> = deltas
            .iter()
            .map(|text| {
                format!(
                    "data: {}\n\n",
                    serde_json::json!({ "choices": [{ "delta": { "content": text } }] })
                )
            })
            .collect();
        lines.push("data: [DONE]\n\n".to_string());
        Self::new(lines)
    }
}

impl AnalysisClientTrait for MockAnalysisClient {
    /// @ai:intent Replay the canned lines
    /// @ai:effects pure
    fn stream_analysis(&self, _request: AnalysisRequest) -> BoxStream<'static, RelayEvent> {
        let body = stream::iter(
            self.lines
                .clone()
                .into_iter()
                .map(|line| Ok::<_, std::convert::Infallible>(line.into_bytes())),
        );
        relay_stream(body, Duration::from_secs(5)).boxed()
    }
}
