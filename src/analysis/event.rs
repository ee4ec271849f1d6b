//! @ai:module:intent Caller-facing events of an analysis stream and their SSE framing
//! @ai:module:layer domain
//! @ai:module:public_api RelayEvent, DONE_SENTINEL
//! @ai:module:stateless true

use serde_json::json;

/// Completion marker shared by the upstream protocol and the caller-facing stream.
pub const DONE_SENTINEL: &str = "[DONE]";

/// @ai:intent One event forwarded to the caller
/// @ai:invariant Error and Done are terminal; nothing follows either
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayEvent {
    Content(String),
    Error(String),
    Done,
}

impl RelayEvent {
    /// @ai:intent Whether the stream ends after this event
    /// @ai:effects pure
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RelayEvent::Content(_))
    }

    /// @ai:intent Encode as a server-sent event frame
    /// @ai:effects pure
    pub fn to_sse_frame(&self) -> String {
        let payload = match self {
            RelayEvent::Content(text) => json!({ "content": text }).to_string(),
            RelayEvent::Error(message) => json!({ "error": message }).to_string(),
            RelayEvent::Done => DONE_SENTINEL.to_string(),
        };
        format!("data: {}\n\n", payload)
    }
}
