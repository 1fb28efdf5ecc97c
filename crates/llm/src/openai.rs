//! OpenAI-Compatible Provider
//!
//! Implementation of the LlmProvider trait for any endpoint that speaks the
//! OpenAI chat-completions protocol (OpenAI, DeepSeek, Ollama, gateways).

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use super::provider::{missing_api_key_error, parse_http_error, LlmProvider};
use super::types::{
    LlmError, LlmRequestOptions, LlmResponse, LlmResult, Message, ProviderConfig, ProviderType,
    ResponseFormat, StopReason, UsageStats,
};
use crate::http_client::build_http_client;

/// OpenAI-compatible provider
pub struct OpenAIProvider {
    config: ProviderConfig,
    client: reqwest::Client,
}

impl OpenAIProvider {
    /// Create a new provider with the given configuration.
    ///
    /// Fails when the proxy settings cannot produce an HTTP client.
    pub fn new(config: ProviderConfig) -> LlmResult<Self> {
        let client = build_http_client(config.proxy.as_ref())?;
        Ok(Self { config, client })
    }

    /// Resolve an API path against the configured base URL.
    ///
    /// A base URL that already names the full `chat/completions` endpoint is
    /// accepted and used as-is for completions.
    fn endpoint(&self, path: &str) -> LlmResult<Url> {
        let raw = self.config.effective_base_url().trim();
        let base = raw
            .trim_end_matches('/')
            .trim_end_matches("/chat/completions");
        let joined = format!("{}/{}", base, path);
        Url::parse(&joined).map_err(|e| LlmError::Configuration {
            message: format!("invalid base URL '{}': {}", raw, e),
        })
    }

    /// Authorization header value, when the provider needs one.
    fn bearer(&self) -> LlmResult<Option<String>> {
        match self.config.api_key.as_deref().filter(|k| !k.trim().is_empty()) {
            Some(key) => Ok(Some(format!("Bearer {}", key))),
            None if self.config.provider.requires_api_key() => {
                Err(missing_api_key_error(self.name()))
            }
            None => Ok(None),
        }
    }

    /// Build the request body for the API
    fn build_request_body(
        &self,
        messages: &[Message],
        system: Option<&str>,
        request_options: &LlmRequestOptions,
    ) -> serde_json::Value {
        let mut body = serde_json::json!({
            "model": self.config.model,
            "max_tokens": request_options
                .max_tokens_override
                .unwrap_or(self.config.max_tokens),
            "temperature": request_options
                .temperature_override
                .unwrap_or(self.config.temperature),
            "stream": false,
        });

        let mut openai_messages: Vec<serde_json::Value> = Vec::with_capacity(messages.len() + 1);
        if let Some(sys) = system {
            openai_messages.push(serde_json::json!({
                "role": "system",
                "content": sys
            }));
        }
        for msg in messages {
            openai_messages.push(serde_json::json!({
                "role": msg.role.as_str(),
                "content": msg.content
            }));
        }
        body["messages"] = serde_json::json!(openai_messages);

        if request_options.response_format == ResponseFormat::JsonObject {
            body["response_format"] = serde_json::json!({ "type": "json_object" });
        }

        body
    }

    /// Parse a response from the API
    fn parse_response(&self, response: OpenAIResponse) -> LlmResponse {
        let choice = response.choices.into_iter().next();

        let stop_reason = choice
            .as_ref()
            .and_then(|c| c.finish_reason.as_deref())
            .map(StopReason::from)
            .unwrap_or(StopReason::EndTurn);

        let (content, thinking) = choice
            .and_then(|c| c.message)
            .map(|m| (m.content, m.reasoning_content))
            .unwrap_or((None, None));

        let usage = response
            .usage
            .map(|u| UsageStats {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
            })
            .unwrap_or_default();

        LlmResponse {
            content,
            thinking,
            stop_reason,
            usage,
            model: response.model.unwrap_or_else(|| self.config.model.clone()),
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAIProvider {
    fn name(&self) -> &'static str {
        match self.config.provider {
            ProviderType::OpenAI => "openai",
            ProviderType::DeepSeek => "deepseek",
            ProviderType::Ollama => "ollama",
        }
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn send_message(
        &self,
        messages: Vec<Message>,
        system: Option<String>,
        request_options: LlmRequestOptions,
    ) -> LlmResult<LlmResponse> {
        let auth = self.bearer()?;
        let url = self.endpoint("chat/completions")?;
        let body = self.build_request_body(&messages, system.as_deref(), &request_options);

        debug!(
            provider = self.name(),
            model = %self.config.model,
            messages = messages.len(),
            json_mode = request_options.response_format == ResponseFormat::JsonObject,
            "sending completion request"
        );

        let mut request = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .json(&body);
        if let Some(auth) = auth {
            request = request.header("Authorization", auth);
        }

        let response = request.send().await.map_err(|e| LlmError::NetworkError {
            message: e.to_string(),
        })?;

        let status = response.status().as_u16();
        let body_text = response.text().await.map_err(|e| LlmError::NetworkError {
            message: e.to_string(),
        })?;

        if status != 200 {
            return Err(parse_http_error(status, &body_text, self.name()));
        }

        let openai_response: OpenAIResponse =
            serde_json::from_str(&body_text).map_err(|e| LlmError::ParseError {
                message: format!("Failed to parse response: {}", e),
            })?;

        let parsed = self.parse_response(openai_response);
        debug!(
            input_tokens = parsed.usage.input_tokens,
            output_tokens = parsed.usage.output_tokens,
            total_tokens = parsed.usage.total_tokens(),
            truncated = parsed.is_truncated(),
            "completion received"
        );
        Ok(parsed)
    }
}

/// Chat-completions response format
#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<ResponseUsage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
    #[serde(default)]
    reasoning_content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}
