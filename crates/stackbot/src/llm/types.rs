//! Common types for LLM chat completions.

use serde::{Deserialize, Serialize};

/// One turn of caller-supplied conversation history.
///
/// The role is expected to be `user`, `assistant` or `system`, but it is not
/// checked here; providers receive it verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: String,
    pub content: String,
}

impl ChatTurn {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }
}

/// A provider-agnostic completion request.
///
/// Each provider decides how the system prompt is placed on the wire.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub system: String,
    pub history: Vec<ChatTurn>,
    pub message: String,
    pub max_tokens: u32,
}

impl ChatRequest {
    /// History followed by the new user turn.
    pub fn conversation(&self) -> impl Iterator<Item = ChatTurn> + '_ {
        self.history
            .iter()
            .cloned()
            .chain(std::iter::once(ChatTurn::user(self.message.clone())))
    }
}
