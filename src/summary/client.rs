//! Chat-completions client for the supported LLM providers.
//!
//! Every provider is reached through its OpenAI-compatible endpoint, so one
//! request/response shape covers all of them. Uses ureq (blocking HTTP).

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::debug;

use super::{LlmError, LlmResult, TextGenerator};

/// Supported LLM providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[value(name = "openai")]
    OpenAi,
    #[default]
    Cohere,
    Anthropic,
}

impl Provider {
    pub fn env_key(&self) -> &'static str {
        match self {
            Provider::OpenAi => "OPENAI_API_KEY",
            Provider::Cohere => "COHERE_API_KEY",
            Provider::Anthropic => "ANTHROPIC_API_KEY",
        }
    }

    pub fn base_url(&self) -> &'static str {
        match self {
            Provider::OpenAi => "https://api.openai.com/v1",
            Provider::Cohere => "https://api.cohere.ai/compatibility/v1",
            Provider::Anthropic => "https://api.anthropic.com/v1",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::OpenAi => "gpt-5",
            Provider::Cohere => "command-a-03-2025",
            Provider::Anthropic => "claude-opus-4-1-20250805",
        }
    }

    pub fn chat_url(&self) -> String {
        format!("{}/chat/completions", self.base_url())
    }

    pub fn name(&self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::Cohere => "cohere",
            Provider::Anthropic => "anthropic",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(Provider::OpenAi),
            "cohere" => Ok(Provider::Cohere),
            "anthropic" => Ok(Provider::Anthropic),
            other => Err(format!(
                "unknown provider '{}' (expected openai, cohere or anthropic)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub provider: Provider,
    pub model: Option<String>,
    pub timeout: Duration,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: Provider::default(),
            model: None,
            timeout: Duration::from_secs(120),
        }
    }
}

impl LlmConfig {
    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.provider.default_model())
    }
}

/// Blocking chat-completions client
pub struct LlmClient {
    config: LlmConfig,
    api_key: String,
    agent: ureq::Agent,
}

impl LlmClient {
    pub fn new(config: LlmConfig, api_key: impl Into<String>) -> Self {
        let agent = ureq::config::Config::builder()
            .http_status_as_error(false)
            .timeout_global(Some(config.timeout))
            .build()
            .new_agent();

        Self {
            config,
            api_key: api_key.into(),
            agent,
        }
    }

    /// Build a client, taking the API key from `api_key` or the provider's
    /// environment variable.
    pub fn from_config(config: LlmConfig, api_key: Option<String>) -> LlmResult<Self> {
        let env_key = config.provider.env_key();
        let api_key = api_key
            .or_else(|| std::env::var(env_key).ok())
            .filter(|key| !key.is_empty())
            .ok_or_else(|| LlmError::MissingApiKey {
                env_var: env_key.to_string(),
            })?;

        Ok(Self::new(config, api_key))
    }

    pub fn provider(&self) -> Provider {
        self.config.provider
    }

    pub fn model(&self) -> &str {
        self.config.model()
    }
}

impl TextGenerator for LlmClient {
    fn generate(&self, prompt: &str) -> LlmResult<String> {
        let body = ChatRequest {
            model: self.config.model().to_string(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
        };

        debug!(
            "Calling {} ({}) with a {} character prompt",
            self.config.provider,
            self.config.model(),
            prompt.len()
        );

        let response = self
            .agent
            .post(self.config.provider.chat_url())
            .header("Content-Type", "application/json")
            .header("Authorization", &format!("Bearer {}", self.api_key))
            .send_json(&body)
            .map_err(|e| LlmError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        if status >= 400 {
            let message = response.into_body().read_to_string().unwrap_or_default();
            return Err(LlmError::Api { status, message });
        }

        let resp: ChatResponse = response
            .into_body()
            .read_json()
            .map_err(|e| LlmError::Parse(e.to_string()))?;

        resp.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.unwrap_or_default().trim().to_string())
            .ok_or_else(|| LlmError::Parse("No response choices".to_string()))
    }
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_provider_defaults() {
        assert_eq!(Provider::default(), Provider::Cohere);
        assert_eq!(Provider::OpenAi.default_model(), "gpt-5");
        assert_eq!(
            Provider::Cohere.chat_url(),
            "https://api.cohere.ai/compatibility/v1/chat/completions"
        );
        assert_eq!(Provider::Anthropic.env_key(), "ANTHROPIC_API_KEY");
    }

    #[test]
    fn test_provider_from_str() {
        assert_eq!("OpenAI".parse::<Provider>().unwrap(), Provider::OpenAi);
        assert_eq!(" anthropic ".parse::<Provider>().unwrap(), Provider::Anthropic);
        assert!("mistral".parse::<Provider>().is_err());
    }

    #[test]
    fn test_config_model() {
        let config = LlmConfig::default();
        assert_eq!(config.model(), "command-a-03-2025");

        let config = LlmConfig {
            model: Some("custom-model".to_string()),
            ..Default::default()
        };
        assert_eq!(config.model(), "custom-model");
    }

    #[test]
    fn test_explicit_key_wins() {
        let client = LlmClient::from_config(LlmConfig::default(), Some("secret".to_string())).unwrap();
        assert_eq!(client.provider(), Provider::Cohere);
        assert_eq!(client.model(), "command-a-03-2025");
    }

    #[test]
    fn test_response_parsing() {
        let resp: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"  Done.  "}}]}"#,
        )
        .unwrap();
        assert_eq!(resp.choices[0].message.content.as_deref(), Some("  Done.  "));

        let resp: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap();
        assert!(resp.choices[0].message.content.is_none());
    }
}
