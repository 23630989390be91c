//! Configuration management

use crate::error::{KaizenError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Path to the pre-built case index (overrides the default)
    #[serde(default)]
    pub index_path: Option<PathBuf>,

    /// LLM service configuration
    #[serde(default)]
    pub llm_service: LlmServiceConfig,
}

/// LLM service configuration for the embedding and chat providers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmServiceConfig {
    /// Base URL of the OpenAI-compatible service
    pub url: String,

    /// Model name for chat completions
    #[serde(default = "default_chat_model")]
    pub model: String,

    /// Base URL for embeddings (falls back to `url` if unset)
    #[serde(default)]
    pub embedding_url: Option<String>,

    /// Model name for embeddings
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// Embedding dimensions
    #[serde(default = "default_embedding_dimensions")]
    pub embedding_dimensions: usize,

    /// API credential. Required; resolved once at startup from an
    /// explicit value or the environment.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl LlmServiceConfig {
    /// Get the embeddings URL (falls back to main URL if not specified)
    pub fn embeddings_url(&self) -> &str {
        self.embedding_url.as_deref().unwrap_or(&self.url)
    }

    /// Resolve the API credential, explicit parameter first then
    /// process-wide environment. Absence is a startup error raised
    /// before any network call.
    pub fn resolve_api_key(&self) -> Result<String> {
        if let Some(ref key) = self.api_key {
            if !key.is_empty() {
                return Ok(key.clone());
            }
        }
        std::env::var("KAIZEN_API_KEY")
            .or_else(|_| std::env::var("OPENAI_API_KEY"))
            .map_err(|_| {
                KaizenError::Config(
                    "API key not found. Pass it explicitly or set KAIZEN_API_KEY / OPENAI_API_KEY"
                        .to_string(),
                )
            })
    }
}

impl Default for LlmServiceConfig {
    fn default() -> Self {
        Self {
            url: std::env::var("KAIZEN_LLM_URL")
                .unwrap_or_else(|_| "https://api.openai.com".to_string()),
            model: default_chat_model(),
            embedding_url: std::env::var("KAIZEN_EMBEDDING_URL").ok(),
            embedding_model: default_embedding_model(),
            embedding_dimensions: std::env::var("KAIZEN_EMBEDDING_DIMS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_embedding_dimensions),
            api_key: None,
            timeout_secs: default_timeout(),
        }
    }
}

fn default_chat_model() -> String {
    std::env::var("KAIZEN_LLM_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string())
}

fn default_embedding_model() -> String {
    std::env::var("KAIZEN_EMBEDDING_MODEL")
        .unwrap_or_else(|_| "text-embedding-3-small".to_string())
}

fn default_embedding_dimensions() -> usize {
    1536
}

fn default_timeout() -> u64 {
    60
}

impl Config {
    /// Load config from default path
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let config: Config = serde_yaml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to default path
    pub fn save(&self) -> Result<()> {
        let path = Self::default_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get default config path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(crate::CONFIG_DIR_NAME)
            .join("config.yml")
    }

    /// Resolve the index path: explicit config first, then the
    /// conventional file in the current directory.
    pub fn resolved_index_path(&self) -> PathBuf {
        self.index_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(crate::DEFAULT_INDEX_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embeddings_url_falls_back_to_main() {
        let config = LlmServiceConfig {
            url: "http://main".to_string(),
            embedding_url: None,
            ..Default::default()
        };
        assert_eq!(config.embeddings_url(), "http://main");

        let config = LlmServiceConfig {
            url: "http://main".to_string(),
            embedding_url: Some("http://embed".to_string()),
            ..Default::default()
        };
        assert_eq!(config.embeddings_url(), "http://embed");
    }

    #[test]
    fn explicit_api_key_wins() {
        let config = LlmServiceConfig {
            api_key: Some("sk-explicit".to_string()),
            ..Default::default()
        };
        assert_eq!(config.resolve_api_key().unwrap(), "sk-explicit");
    }

    #[test]
    fn resolved_index_path_default() {
        let config = Config::default();
        assert_eq!(
            config.resolved_index_path(),
            PathBuf::from(crate::DEFAULT_INDEX_FILE)
        );
    }
}
