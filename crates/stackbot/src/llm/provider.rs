//! LLM provider trait and provider identifiers.

use std::fmt;

use async_trait::async_trait;

use super::error::LLMError;
use super::types::ChatRequest;

/// Trait for LLM providers with different API formats.
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Make a single chat completion request and return the reply text.
    async fn chat(&self, request: ChatRequest) -> Result<String, LLMError>;
}

/// The supported providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    Anthropic,
    OpenAI,
}

impl Provider {
    /// Selection order when several providers are configured.
    pub const PRIORITY: [Provider; 2] = [Provider::Anthropic, Provider::OpenAI];
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::Anthropic => write!(f, "anthropic"),
            Provider::OpenAI => write!(f, "openai"),
        }
    }
}
