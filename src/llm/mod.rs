// LLM module.
// Chat-completions client and prompt assembly for generating the
// architecture analysis and development guidelines.

pub mod client;
pub mod prompts;

pub use client::{ChatMessage, LlmClient};
