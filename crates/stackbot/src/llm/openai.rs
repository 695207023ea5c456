//! OpenAI chat-completions provider.

use async_trait::async_trait;
use reqwest::Client;

use super::error::{LLMError, check_status};
use super::provider::LLMProvider;
use super::types::{ChatRequest, ChatTurn};

/// OpenAI provider using the `/chat/completions` API.
pub struct OpenAIProvider {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
}

impl OpenAIProvider {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.openai.com/v1";

    #[must_use]
    pub fn new(
        client: Client,
        base_url: String,
        api_key: String,
        model: String,
        temperature: f32,
    ) -> Self {
        Self {
            client,
            base_url,
            api_key,
            model,
            temperature,
        }
    }
}

#[async_trait]
impl LLMProvider for OpenAIProvider {
    async fn chat(&self, request: ChatRequest) -> Result<String, LLMError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = to_request(&request, &self.model, self.temperature);

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await?;

        let response = check_status(response).await?;
        let parsed: Response = response.json().await?;
        from_response(parsed)
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(serde::Serialize)]
struct Request {
    model: String,
    messages: Vec<ChatTurn>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(serde::Deserialize)]
struct Response {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(serde::Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(serde::Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

// ============================================================================
// Conversions
// ============================================================================

/// The system prompt goes first, inline with the conversation.
fn to_request(request: &ChatRequest, model: &str, temperature: f32) -> Request {
    let mut messages = Vec::with_capacity(request.history.len() + 2);
    messages.push(ChatTurn::new("system", request.system.clone()));
    messages.extend(request.conversation());

    Request {
        model: model.to_string(),
        messages,
        max_tokens: request.max_tokens,
        temperature,
    }
}

fn from_response(response: Response) -> Result<String, LLMError> {
    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .unwrap_or_default();

    if content.is_empty() {
        return Err(LLMError::InvalidResponse(
            "no content in first choice".to_string(),
        ));
    }
    Ok(content)
}
