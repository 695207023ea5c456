//! Provider registry for managing LLM provider instances.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tracing::{info, warn};

use super::anthropic::AnthropicProvider;
use super::openai::OpenAIProvider;
use super::provider::{LLMProvider, Provider};
use crate::config::{ANTHROPIC_API_KEY_VAR, ChatbotConfig, Credentials, OPENAI_API_KEY_VAR};

/// Registry of configured LLM providers, keyed by provider type.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: HashMap<Provider, Arc<dyn LLMProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider for every credential that is present.
    ///
    /// All providers share one HTTP client bounded by the configured timeout.
    pub fn from_credentials(
        credentials: &Credentials,
        config: &ChatbotConfig,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.provider_timeout_seconds))
            .build()?;

        let mut registry = Self::new();

        if let Some(ref api_key) = credentials.anthropic_api_key {
            let provider = AnthropicProvider::new(
                client.clone(),
                config.anthropic.base_url.clone(),
                api_key.clone(),
                config.anthropic.model.clone(),
            );
            registry.register(Provider::Anthropic, Arc::new(provider));
            info!(model = %config.anthropic.model, "Registered Anthropic provider");
        }

        if let Some(ref api_key) = credentials.openai_api_key {
            let provider = OpenAIProvider::new(
                client,
                config.openai.base_url.clone(),
                api_key.clone(),
                config.openai.model.clone(),
                config.openai.temperature,
            );
            registry.register(Provider::OpenAI, Arc::new(provider));
            info!(model = %config.openai.model, "Registered OpenAI provider");
        }

        if registry.is_empty() {
            warn!(
                "No LLM providers configured, answering in basic mode. \
                Set {ANTHROPIC_API_KEY_VAR} or {OPENAI_API_KEY_VAR}."
            );
        }

        Ok(registry)
    }

    /// Register a provider implementation.
    pub fn register(&mut self, provider: Provider, implementation: Arc<dyn LLMProvider>) {
        self.providers.insert(provider, implementation);
    }

    /// Get a provider by type.
    pub fn get(&self, provider: &Provider) -> Option<Arc<dyn LLMProvider>> {
        self.providers.get(provider).cloned()
    }

    /// The highest-priority registered provider, if any.
    pub fn preferred(&self) -> Option<(Provider, Arc<dyn LLMProvider>)> {
        Provider::PRIORITY
            .iter()
            .find_map(|p| self.get(p).map(|imp| (*p, imp)))
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}
