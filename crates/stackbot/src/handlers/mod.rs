//! HTTP request handlers.

mod chat;
mod health;

pub use chat::{APOLOGY, ChatPayload, ChatReply, INVALID_BODY, MESSAGE_REQUIRED, chat};
pub use health::{livez, readyz, version};
