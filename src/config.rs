//! User configuration for git-digest
//!
//! Supports loading config from:
//! - Environment variables
//! - ~/.config/git-digest/config.toml

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

use crate::summary::{LlmConfig, Provider};

const PROVIDER_ENV: &str = "GIT_DIGEST_PROVIDER";
const MODEL_ENV: &str = "GIT_DIGEST_MODEL";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct DigestConfig {
    #[serde(default)]
    pub llm: LlmSection,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct LlmSection {
    /// Provider: "openai", "cohere" (default) or "anthropic"
    pub provider: Option<Provider>,

    /// Model override (defaults to the provider's default model)
    pub model: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: Option<u64>,

    /// API keys by provider name, used when the environment has none
    #[serde(default)]
    pub api_keys: HashMap<String, String>,
}

impl DigestConfig {
    /// Load config with priority:
    /// 1. Environment variables (highest)
    /// 2. User config (~/.config/git-digest/config.toml)
    pub fn load() -> Self {
        let mut config = Self::config_path()
            .map(|path| Self::from_file(&path))
            .unwrap_or_default();
        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    /// Get the user config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("git-digest").join("config.toml"))
    }

    /// Read a config file. A missing or unparsable file yields the defaults.
    pub fn from_file(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(_) => return Self::default(),
        };

        match toml::from_str::<DigestConfig>(&content) {
            Ok(config) => {
                debug!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                warn!("Ignoring invalid config file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    fn apply_env<F: Fn(&str) -> Option<String>>(&mut self, lookup: F) {
        if let Some(provider) = lookup(PROVIDER_ENV) {
            match provider.parse::<Provider>() {
                Ok(provider) => self.llm.provider = Some(provider),
                Err(e) => warn!("Ignoring {}: {}", PROVIDER_ENV, e),
            }
        }
        if let Some(model) = lookup(MODEL_ENV).filter(|m| !m.is_empty()) {
            self.llm.model = Some(model);
        }
    }

    /// Settings for the summarization client, with CLI overrides applied.
    pub fn llm_config(&self, provider: Option<Provider>, model: Option<String>) -> LlmConfig {
        LlmConfig {
            provider: provider.or(self.llm.provider).unwrap_or_default(),
            model: model.or_else(|| self.llm.model.clone()),
            timeout: Duration::from_secs(self.llm.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
        }
    }

    /// API key stored in the config file for `provider`.
    ///
    /// The provider's environment variable still takes priority when the
    /// client is built.
    pub fn api_key(&self, provider: Provider) -> Option<String> {
        std::env::var(provider.env_key())
            .ok()
            .filter(|key| !key.is_empty())
            .or_else(|| self.llm.api_keys.get(provider.name()).cloned())
    }
}
