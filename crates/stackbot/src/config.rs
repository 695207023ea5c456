use std::io::ErrorKind;
use std::path::Path;

use tokio::fs;

use serde::Deserialize;
use thiserror::Error;

use crate::llm::{AnthropicProvider, OpenAIProvider};

pub const ANTHROPIC_API_KEY_VAR: &str = "ANTHROPIC_API_KEY";
pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";

// ============================================================================
// Config (root)
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub chatbot: ChatbotConfig,
}

impl Config {
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = match fs::read_to_string(path).await {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(ConfigError::Io(e)),
        };
        let config: Self = serde_saphyr::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// The provider call must time out first, so a slow provider still gets
    /// the fallback reply instead of a bare 408.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let provider = self.chatbot.provider_timeout_seconds;
        let request = self.server.request_timeout_seconds;
        if provider >= request {
            return Err(ConfigError::Timeouts { provider, request });
        }
        Ok(())
    }
}

// ============================================================================
// ServerConfig
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_request_timeout() -> u64 {
    60
}

// ============================================================================
// ChatbotConfig
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ChatbotConfig {
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
    /// Upper bound on reply length sent to either provider.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Timeout for a single outbound provider call.
    #[serde(default = "default_provider_timeout")]
    pub provider_timeout_seconds: u64,
    #[serde(default)]
    pub openai: OpenAIConfig,
    #[serde(default)]
    pub anthropic: AnthropicConfig,
}

impl Default for ChatbotConfig {
    fn default() -> Self {
        Self {
            system_prompt: default_system_prompt(),
            max_tokens: default_max_tokens(),
            provider_timeout_seconds: default_provider_timeout(),
            openai: OpenAIConfig::default(),
            anthropic: AnthropicConfig::default(),
        }
    }
}

fn default_system_prompt() -> String {
    "You are a helpful assistant for this web application. Be concise and friendly.".to_string()
}

fn default_max_tokens() -> u32 {
    500
}

fn default_provider_timeout() -> u64 {
    30
}

#[derive(Debug, Deserialize)]
pub struct OpenAIConfig {
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,
    #[serde(default = "default_openai_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for OpenAIConfig {
    fn default() -> Self {
        Self {
            base_url: default_openai_base_url(),
            model: default_openai_model(),
            temperature: default_temperature(),
        }
    }
}

fn default_openai_base_url() -> String {
    OpenAIProvider::DEFAULT_BASE_URL.to_string()
}

fn default_openai_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

#[derive(Debug, Deserialize)]
pub struct AnthropicConfig {
    #[serde(default = "default_anthropic_base_url")]
    pub base_url: String,
    #[serde(default = "default_anthropic_model")]
    pub model: String,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            base_url: default_anthropic_base_url(),
            model: default_anthropic_model(),
        }
    }
}

fn default_anthropic_base_url() -> String {
    AnthropicProvider::DEFAULT_BASE_URL.to_string()
}

fn default_anthropic_model() -> String {
    "claude-3-5-haiku-20241022".to_string()
}

// ============================================================================
// Credentials
// ============================================================================

/// Provider API keys, read once at startup.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub anthropic_api_key: Option<String>,
    pub openai_api_key: Option<String>,
}

impl Credentials {
    pub fn from_env() -> Self {
        Self {
            anthropic_api_key: non_empty_var(ANTHROPIC_API_KEY_VAR),
            openai_api_key: non_empty_var(OPENAI_API_KEY_VAR),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.anthropic_api_key.is_none() && self.openai_api_key.is_none()
    }
}

// Keys never end up in logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("anthropic_api_key", &self.anthropic_api_key.as_ref().map(|_| "***"))
            .field("openai_api_key", &self.openai_api_key.as_ref().map(|_| "***"))
            .finish()
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

// ============================================================================
// ConfigError
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Yaml(#[from] serde_saphyr::Error),

    #[error(
        "chatbot.provider_timeout_seconds ({provider}) must be less than \
        server.request_timeout_seconds ({request})"
    )]
    Timeouts { provider: u64, request: u64 },
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.server.request_timeout_seconds, 60);
        assert_eq!(config.chatbot.max_tokens, 500);
        assert_eq!(config.chatbot.provider_timeout_seconds, 30);
        assert_eq!(config.chatbot.openai.model, "gpt-4o-mini");
        assert_eq!(config.chatbot.openai.base_url, "https://api.openai.com/v1");
        assert!((config.chatbot.openai.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(config.chatbot.anthropic.model, "claude-3-5-haiku-20241022");
        assert_eq!(config.chatbot.anthropic.base_url, "https://api.anthropic.com");
        assert!(config.chatbot.system_prompt.contains("Be concise and friendly"));
    }

    #[tokio::test]
    async fn test_load_missing_file_returns_defaults() {
        let tmp_dir = TempDir::new().unwrap();
        let missing_path = tmp_dir.path().join("missing-config.yaml");
        let config = Config::load(&missing_path).await.unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8000);
    }

    #[tokio::test]
    async fn test_load_valid_yaml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
server:
  host: "127.0.0.1"
  port: 3000
  request_timeout_seconds: 90
chatbot:
  system_prompt: "You are a pirate."
  max_tokens: 256
  provider_timeout_seconds: 10
  openai:
    base_url: "http://localhost:9999/v1"
    model: "gpt-4o"
    temperature: 0.2
  anthropic:
    model: "claude-sonnet-4-5"
"#
        )
        .unwrap();

        let config = Config::load(file.path()).await.unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.request_timeout_seconds, 90);
        assert_eq!(config.chatbot.system_prompt, "You are a pirate.");
        assert_eq!(config.chatbot.max_tokens, 256);
        assert_eq!(config.chatbot.provider_timeout_seconds, 10);
        assert_eq!(config.chatbot.openai.base_url, "http://localhost:9999/v1");
        assert_eq!(config.chatbot.openai.model, "gpt-4o");
        assert_eq!(config.chatbot.anthropic.model, "claude-sonnet-4-5");
        assert_eq!(config.chatbot.anthropic.base_url, "https://api.anthropic.com"); // default
    }

    #[tokio::test]
    async fn test_load_partial_yaml_uses_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
server:
  port: 9000
"#
        )
        .unwrap();

        let config = Config::load(file.path()).await.unwrap();
        assert_eq!(config.server.host, "0.0.0.0"); // default
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.chatbot.max_tokens, 500); // default
    }

    #[tokio::test]
    async fn test_load_invalid_yaml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "invalid: yaml: content: [").unwrap();

        let result = Config::load(file.path()).await;
        assert!(result.is_err());
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[tokio::test]
    async fn test_load_rejects_provider_timeout_not_below_request_timeout() {
        for provider in [60, 120] {
            let mut file = NamedTempFile::new().unwrap();
            writeln!(
                file,
                r#"
server:
  request_timeout_seconds: 60
chatbot:
  provider_timeout_seconds: {provider}
"#
            )
            .unwrap();

            let err = Config::load(file.path()).await.unwrap_err();
            assert!(
                matches!(err, ConfigError::Timeouts { provider: p, request: 60 } if p == provider),
                "unexpected error: {err}"
            );
            assert!(err.to_string().contains("must be less than"));
        }
    }

    #[tokio::test]
    async fn test_load_rejects_short_request_timeout_with_default_provider_timeout() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
server:
  request_timeout_seconds: 1
"#
        )
        .unwrap();

        let result = Config::load(file.path()).await;
        assert!(matches!(
            result,
            Err(ConfigError::Timeouts {
                provider: 30,
                request: 1
            })
        ));
    }

    #[test]
    fn test_config_error_display() {
        let io_error = ConfigError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "test",
        ));
        assert!(io_error.to_string().contains("failed to read config file"));
    }

    #[test]
    fn test_credentials_debug_hides_keys() {
        let creds = Credentials {
            anthropic_api_key: Some("sk-ant-secret".to_string()),
            openai_api_key: None,
        };
        let debug = format!("{creds:?}");
        assert!(!debug.contains("sk-ant-secret"));
        assert!(debug.contains("***"));
        assert!(!creds.is_empty());
        assert!(Credentials::default().is_empty());
    }
}
