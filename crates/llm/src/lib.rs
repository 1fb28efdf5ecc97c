//! Interview Coach LLM
//!
//! Provides the completion-service interface used by the interview services,
//! plus one implementation that speaks the OpenAI chat-completions protocol
//! (OpenAI, DeepSeek, Ollama and compatible gateways).
//!
//! Also includes the HTTP client factory with proxy support.

pub mod http_client;
pub mod openai;
pub mod provider;
pub mod types;

// Re-export main types
pub use http_client::{build_http_client, parse_proxy_url};
pub use openai::OpenAIProvider;
pub use provider::LlmProvider;
pub use types::*;
