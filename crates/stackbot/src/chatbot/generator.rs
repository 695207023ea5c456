//! Chat response generation: pick a provider, or fall back to canned replies.

use std::fmt;

use tracing::{debug, warn};

use super::fallback;
use crate::config::ChatbotConfig;
use crate::llm::{ChatRequest, ChatTurn, Provider, ProviderRegistry};

/// Where a reply came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplySource {
    Provider(Provider),
    Fallback,
}

impl fmt::Display for ReplySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplySource::Provider(p) => write!(f, "{p}"),
            ReplySource::Fallback => write!(f, "fallback"),
        }
    }
}

/// A generated chat reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub source: ReplySource,
}

impl Reply {
    fn fallback(message: &str) -> Self {
        Self {
            text: fallback::basic_response(message).to_string(),
            source: ReplySource::Fallback,
        }
    }
}

/// Generates replies for the chat endpoint.
///
/// Holds no per-conversation state. Only the highest-priority configured
/// provider is ever called, at most once per reply; any provider error is
/// logged and answered from the rule-based fallback.
pub struct ResponseGenerator {
    providers: ProviderRegistry,
    system_prompt: String,
    max_tokens: u32,
}

impl ResponseGenerator {
    pub fn new(providers: ProviderRegistry, config: &ChatbotConfig) -> Self {
        Self {
            providers,
            system_prompt: config.system_prompt.clone(),
            max_tokens: config.max_tokens,
        }
    }

    pub async fn generate(&self, message: &str, history: &[ChatTurn]) -> Reply {
        let Some((provider, client)) = self.providers.preferred() else {
            return Reply::fallback(message);
        };

        let request = ChatRequest {
            system: self.system_prompt.clone(),
            history: history.to_vec(),
            message: message.to_string(),
            max_tokens: self.max_tokens,
        };

        match client.chat(request).await {
            Ok(text) => {
                debug!(%provider, history_len = history.len(), "provider reply");
                Reply {
                    text,
                    source: ReplySource::Provider(provider),
                }
            }
            Err(e) => {
                warn!(%provider, error = %e, "provider call failed, using basic response");
                Reply::fallback(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::llm::{LLMError, LLMProvider};

    /// Records every request and answers with a fixed outcome.
    struct MockProvider {
        reply: Option<String>,
        calls: Mutex<Vec<ChatRequest>>,
    }

    impl MockProvider {
        fn ok(text: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Some(text.to_string()),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                reply: None,
                calls: Mutex::new(Vec::new()),
            })
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl LLMProvider for MockProvider {
        async fn chat(&self, request: ChatRequest) -> Result<String, LLMError> {
            self.calls.lock().unwrap().push(request);
            self.reply.clone().ok_or(LLMError::Api {
                status: 500,
                message: "boom".to_string(),
            })
        }
    }

    fn generator(registry: ProviderRegistry) -> ResponseGenerator {
        ResponseGenerator::new(registry, &ChatbotConfig::default())
    }

    #[tokio::test]
    async fn test_no_providers_uses_fallback() {
        let reply = generator(ProviderRegistry::new())
            .generate("hello there", &[])
            .await;
        assert_eq!(reply.source, ReplySource::Fallback);
        assert!(reply.text.starts_with("Hello! I'm here to help."));
    }

    #[tokio::test]
    async fn test_anthropic_success_returns_text_verbatim() {
        let anthropic = MockProvider::ok("  Ahoy!  ");
        let openai = MockProvider::ok("from openai");
        let mut registry = ProviderRegistry::new();
        registry.register(Provider::Anthropic, anthropic.clone());
        registry.register(Provider::OpenAI, openai.clone());

        let reply = generator(registry).generate("hello", &[]).await;
        assert_eq!(reply.text, "  Ahoy!  ");
        assert_eq!(reply.source, ReplySource::Provider(Provider::Anthropic));
        assert_eq!(anthropic.call_count(), 1);
        assert_eq!(openai.call_count(), 0);
    }

    #[tokio::test]
    async fn test_anthropic_failure_falls_back_without_trying_openai() {
        let anthropic = MockProvider::failing();
        let openai = MockProvider::ok("from openai");
        let mut registry = ProviderRegistry::new();
        registry.register(Provider::Anthropic, anthropic.clone());
        registry.register(Provider::OpenAI, openai.clone());

        let reply = generator(registry).generate("thanks!", &[]).await;
        assert_eq!(reply.source, ReplySource::Fallback);
        assert_eq!(reply.text, fallback::CLOSING);
        assert_eq!(anthropic.call_count(), 1);
        assert_eq!(openai.call_count(), 0);
    }

    #[tokio::test]
    async fn test_openai_used_when_alone() {
        let openai = MockProvider::ok("from openai");
        let mut registry = ProviderRegistry::new();
        registry.register(Provider::OpenAI, openai.clone());

        let reply = generator(registry).generate("hi", &[]).await;
        assert_eq!(reply.text, "from openai");
        assert_eq!(reply.source, ReplySource::Provider(Provider::OpenAI));
    }

    #[tokio::test]
    async fn test_request_carries_history_and_limits() {
        let anthropic = MockProvider::ok("ok");
        let mut registry = ProviderRegistry::new();
        registry.register(Provider::Anthropic, anthropic.clone());

        let history = vec![
            ChatTurn::new("user", "Hi"),
            ChatTurn::new("assistant", "Hello!"),
        ];
        generator(registry).generate("Next question", &history).await;

        let calls = anthropic.calls.lock().unwrap();
        let request = &calls[0];
        assert_eq!(request.history, history);
        assert_eq!(request.message, "Next question");
        assert_eq!(request.max_tokens, 500);
        assert!(request.system.contains("helpful assistant"));
    }

    #[test]
    fn test_reply_source_display() {
        assert_eq!(ReplySource::Fallback.to_string(), "fallback");
        assert_eq!(
            ReplySource::Provider(Provider::Anthropic).to_string(),
            "anthropic"
        );
    }
}
