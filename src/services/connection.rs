//! Connection Test
//!
//! Verifies that the configured completion service accepts our credentials
//! with a tiny completion, and maps failures to short user-facing messages.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use interview_coach_llm::{
    LlmError, LlmProvider, LlmRequestOptions, Message, OpenAIProvider, ProviderConfig,
};

/// Connection test result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionTestResult {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u32>,
}

impl ConnectionTestResult {
    fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            model: None,
            latency_ms: None,
        }
    }
}

/// Friendly message for a failed probe.
pub fn describe_failure(error: &LlmError) -> String {
    match error {
        LlmError::AuthenticationFailed { .. } => "Invalid API Key".to_string(),
        LlmError::ModelNotFound { .. } => "Invalid Base URL".to_string(),
        LlmError::NetworkError { .. } => "Network timeout or connection error".to_string(),
        LlmError::QuotaExceeded { .. } => "API quota exceeded or billing issue".to_string(),
        LlmError::Configuration { message } => message.clone(),
        other => other.to_string(),
    }
}

/// Probe an already-built provider.
pub async fn probe(provider: &dyn LlmProvider) -> ConnectionTestResult {
    let options = LlmRequestOptions {
        max_tokens_override: Some(10),
        ..Default::default()
    };

    let start = Instant::now();
    match provider
        .send_message(vec![Message::user("Hello")], None, options)
        .await
    {
        Ok(_) => {
            let latency_ms = start.elapsed().as_millis() as u32;
            info!(provider = provider.name(), latency_ms, "connection test succeeded");
            ConnectionTestResult {
                success: true,
                message: "Connection test successful".to_string(),
                model: Some(provider.model().to_string()),
                latency_ms: Some(latency_ms),
            }
        }
        Err(e) => {
            warn!(provider = provider.name(), error = %e, "connection test failed");
            ConnectionTestResult {
                latency_ms: Some(start.elapsed().as_millis() as u32),
                ..ConnectionTestResult::failed(describe_failure(&e))
            }
        }
    }
}

/// Build a provider from `config` and probe it.
pub async fn test_connection(config: &ProviderConfig) -> ConnectionTestResult {
    let missing_key = config
        .api_key
        .as_deref()
        .map_or(true, |k| k.trim().is_empty());
    if config.provider.requires_api_key() && missing_key {
        return ConnectionTestResult::failed("API Key is required");
    }

    match OpenAIProvider::new(config.clone()) {
        Ok(provider) => probe(&provider).await,
        Err(e) => ConnectionTestResult::failed(describe_failure(&e)),
    }
}
