//! Anthropic LLM provider with native API format.

use async_trait::async_trait;
use reqwest::Client;

use super::error::{LLMError, check_status};
use super::provider::LLMProvider;
use super::types::{ChatRequest, ChatTurn};

/// Anthropic provider using the `/v1/messages` API.
pub struct AnthropicProvider {
    client: Client,
    base_url: String,
    api_key: String,
    api_version: String,
    model: String,
}

impl AnthropicProvider {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.anthropic.com";
    pub const DEFAULT_API_VERSION: &'static str = "2023-06-01";

    #[must_use]
    pub fn new(client: Client, base_url: String, api_key: String, model: String) -> Self {
        Self {
            client,
            base_url,
            api_key,
            api_version: Self::DEFAULT_API_VERSION.to_string(),
            model,
        }
    }
}

#[async_trait]
impl LLMProvider for AnthropicProvider {
    async fn chat(&self, request: ChatRequest) -> Result<String, LLMError> {
        let url = format!("{}/v1/messages", self.base_url);
        let anthropic_request = to_request(&request, &self.model);

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", &self.api_version)
            .json(&anthropic_request)
            .send()
            .await?;

        let response = check_status(response).await?;
        let anthropic_response: Response = response.json().await?;
        from_response(anthropic_response)
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(serde::Serialize)]
struct Request {
    model: String,
    max_tokens: u32,
    system: String,
    messages: Vec<ChatTurn>,
}

#[derive(serde::Deserialize)]
struct Response {
    #[serde(default)]
    content: Vec<Content>,
}

#[derive(serde::Deserialize)]
struct Content {
    #[serde(rename = "type")]
    content_type: String,
    #[serde(default)]
    text: String,
}

// ============================================================================
// Conversions
// ============================================================================

/// Anthropic wants the system prompt as a separate top-level field.
fn to_request(request: &ChatRequest, model: &str) -> Request {
    Request {
        model: model.to_string(),
        max_tokens: request.max_tokens,
        system: request.system.clone(),
        messages: request.conversation().collect(),
    }
}

fn from_response(response: Response) -> Result<String, LLMError> {
    let content = response
        .content
        .into_iter()
        .filter(|c| c.content_type == "text")
        .map(|c| c.text)
        .collect::<Vec<_>>()
        .join("");

    if content.is_empty() {
        return Err(LLMError::InvalidResponse(
            "no text content blocks".to_string(),
        ));
    }
    Ok(content)
}
