//! @ai:module:intent Prompt building and streamed natural-language analysis of results
//! @ai:module:layer application
//! @ai:module:public_api PromptBuilder, ThinkFilter, RelayEvent, AnalysisClient, relay_stream

pub mod client;
pub mod event;
pub mod prompt;
pub mod relay;
pub mod think_filter;

pub use client::{AnalysisClient, AnalysisClientTrait, AnalysisRequest, MockAnalysisClient};
pub use event::{RelayEvent, DONE_SENTINEL};
pub use prompt::{PromptBuilder, ANALYSIS_INSTRUCTIONS};
pub use relay::relay_stream;
pub use think_filter::{FilterState, ThinkFilter};
