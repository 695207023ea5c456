//! Chatbot HTTP handler.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::llm::ChatTurn;
use crate::response;
use crate::server::AppState;

pub const MESSAGE_REQUIRED: &str = "Message is required";
pub const INVALID_BODY: &str = "Invalid request body";
pub const APOLOGY: &str = "Sorry, I encountered an error. Please try again.";

// ============================================================================
// Request/Response Types
// ============================================================================

/// Incoming chat request.
///
/// `message` stays untyped so a missing, null or non-string value gets the
/// same 400 as an empty one.
#[derive(Deserialize)]
pub struct ChatPayload {
    #[serde(default)]
    message: Option<serde_json::Value>,
    #[serde(default)]
    history: Option<Vec<ChatTurn>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatReply {
    pub message: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/chatbot
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatPayload>, JsonRejection>,
) -> Response {
    let Json(payload) = match payload {
        Ok(p) => p,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "rejected chat request body");
            return response::bad_request(INVALID_BODY);
        }
    };

    let message = match payload.message {
        Some(serde_json::Value::String(m)) if !m.is_empty() => m,
        _ => return response::bad_request(MESSAGE_REQUIRED),
    };
    let history = payload.history.unwrap_or_default();

    // Generation runs in its own task so a panic becomes a 500 instead of a
    // dropped connection.
    let generator = state.generator.clone();
    let task = tokio::spawn(async move { generator.generate(&message, &history).await });

    match task.await {
        Ok(reply) => {
            debug!(source = %reply.source, "chat reply generated");
            (
                StatusCode::OK,
                Json(ChatReply {
                    message: reply.text,
                }),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "chat generation failed");
            response::internal_error(APOLOGY)
        }
    }
}
