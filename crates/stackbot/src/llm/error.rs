//! LLM error types.

use thiserror::Error;

/// Errors that can occur when making LLM API calls.
///
/// None of these ever reach the HTTP caller: the response generator logs them
/// and answers with the rule-based fallback instead.
#[derive(Debug, Error)]
pub enum LLMError {
    /// HTTP request failed (connect, timeout, body decode)
    #[error("http request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// API returned an error response
    #[error("api error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Response parsed but carried no usable reply text
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Turn a non-2xx response into `LLMError::Api`, keeping the body for the log.
pub async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, LLMError> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status().as_u16();
    let message = response.text().await.unwrap_or_default();
    Err(LLMError::Api { status, message })
}
