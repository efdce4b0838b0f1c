//! Agent execution adapters

mod executor;
mod transcript;

pub use executor::LlmAgentExecutor;
pub use transcript::{Transcript, parse_transcript};
