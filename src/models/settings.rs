//! Settings Models
//!
//! Application configuration and settings data structures.

use interview_coach_core::ProxyConfig;
use interview_coach_llm::{ProviderConfig, ProviderType};
use serde::{Deserialize, Serialize};

use super::language::Language;

/// Application configuration stored in config.json
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Language for prompts and responses
    #[serde(default)]
    pub language: Language,
    /// Completion service settings
    #[serde(default)]
    pub provider: ProviderSettings,
    /// Interview defaults
    #[serde(default)]
    pub interview: InterviewSettings,
}

/// Completion service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSettings {
    /// Backend type: "openai", "deepseek" or "ollama"
    pub provider: ProviderType,
    /// Base URL override (OpenAI-compatible gateways)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// API key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Model name
    pub model: String,
    /// Maximum tokens per completion
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Sampling temperature for conversational replies
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Outbound proxy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy: Option<ProxyConfig>,
}

fn default_max_tokens() -> u32 {
    2048
}

fn default_temperature() -> f32 {
    0.7
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            provider: ProviderType::OpenAI,
            base_url: None,
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            proxy: None,
        }
    }
}

impl ProviderSettings {
    /// Build the explicit client configuration handed to the provider.
    pub fn to_provider_config(&self) -> ProviderConfig {
        ProviderConfig {
            provider: self.provider,
            api_key: self.api_key.clone(),
            base_url: self.base_url.clone(),
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            proxy: self.proxy.clone(),
        }
    }
}

/// Interview defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewSettings {
    /// Question type passed to generation prompts ("general", "technical", "behavioral")
    #[serde(default = "default_question_type")]
    pub question_type: String,
    /// Difficulty passed to generation prompts
    #[serde(default = "default_difficulty")]
    pub difficulty: String,
    /// Scoring rubric; empty means the built-in rubric
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub criteria: Vec<String>,
}

fn default_question_type() -> String {
    "general".to_string()
}

fn default_difficulty() -> String {
    "medium".to_string()
}

impl Default for InterviewSettings {
    fn default() -> Self {
        Self {
            question_type: default_question_type(),
            difficulty: default_difficulty(),
            criteria: Vec::new(),
        }
    }
}

/// Settings update request (partial update)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SettingsUpdate {
    pub language: Option<Language>,
    pub provider: Option<ProviderType>,
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub question_type: Option<String>,
    pub difficulty: Option<String>,
    pub criteria: Option<Vec<String>>,
}

impl AppConfig {
    /// Apply a partial update to the configuration
    pub fn apply_update(&mut self, update: SettingsUpdate) {
        if let Some(language) = update.language {
            self.language = language;
        }
        if let Some(provider) = update.provider {
            self.provider.provider = provider;
        }
        if let Some(base_url) = update.base_url {
            self.provider.base_url = Some(base_url).filter(|u| !u.trim().is_empty());
        }
        if let Some(api_key) = update.api_key {
            self.provider.api_key = Some(api_key).filter(|k| !k.trim().is_empty());
        }
        if let Some(model) = update.model {
            self.provider.model = model;
        }
        if let Some(max_tokens) = update.max_tokens {
            self.provider.max_tokens = max_tokens;
        }
        if let Some(temperature) = update.temperature {
            self.provider.temperature = temperature;
        }
        if let Some(question_type) = update.question_type {
            self.interview.question_type = question_type;
        }
        if let Some(difficulty) = update.difficulty {
            self.interview.difficulty = difficulty;
        }
        if let Some(criteria) = update.criteria {
            self.interview.criteria = criteria;
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        let provider = &self.provider;

        if provider.model.trim().is_empty() {
            return Err("model must not be empty".to_string());
        }

        if !(0.0..=2.0).contains(&provider.temperature) {
            return Err(format!(
                "Invalid temperature: {}. Must be between 0.0 and 2.0",
                provider.temperature
            ));
        }

        if provider.max_tokens == 0 {
            return Err("max_tokens must be greater than 0".to_string());
        }

        if let Some(base_url) = &provider.base_url {
            if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
                return Err(format!(
                    "Invalid base_url: {}. Must start with http:// or https://",
                    base_url
                ));
            }
        }

        if let Some(proxy) = &provider.proxy {
            proxy.validate().map_err(|e| e.to_string())?;
        }

        if self.interview.criteria.iter().any(|c| c.trim().is_empty()) {
            return Err("scoring criteria must not contain empty entries".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.language, Language::Zh);
        assert_eq!(config.provider.provider, ProviderType::OpenAI);
        assert_eq!(config.provider.model, "gpt-4o-mini");
        assert_eq!(config.interview.question_type, "general");
        assert!(config.interview.criteria.is_empty());
    }

    #[test]
    fn test_apply_update() {
        let mut config = AppConfig::default();
        let update = SettingsUpdate {
            language: Some(Language::En),
            model: Some("gpt-4o".to_string()),
            base_url: Some("".to_string()),
            ..Default::default()
        };
        config.apply_update(update);
        assert_eq!(config.language, Language::En);
        assert_eq!(config.provider.model, "gpt-4o");
        // Blank strings clear optional fields
        assert_eq!(config.provider.base_url, None);
        // Other fields should remain unchanged
        assert_eq!(config.interview.difficulty, "medium");
    }

    #[test]
    fn test_validate_valid_config() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_invalid_temperature() {
        let mut config = AppConfig::default();
        config.provider.temperature = 3.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_invalid_base_url() {
        let mut config = AppConfig::default();
        config.provider.base_url = Some("api.openai.com/v1".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: AppConfig = serde_json::from_str(r#"{"language":"en"}"#).unwrap();
        assert_eq!(config.language, Language::En);
        assert_eq!(config.provider.max_tokens, 2048);
    }

    #[test]
    fn test_to_provider_config() {
        let mut config = AppConfig::default();
        config.provider.api_key = Some("sk-test".to_string());
        let provider = config.provider.to_provider_config();
        assert_eq!(provider.api_key.as_deref(), Some("sk-test"));
        assert_eq!(provider.model, "gpt-4o-mini");
        assert!(provider.proxy.is_none());
    }
}
