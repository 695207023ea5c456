//! Stackbot - a small chatbot backend with Anthropic/OpenAI providers and a
//! rule-based fallback.

pub mod chatbot;
pub mod config;
pub mod handlers;
pub mod llm;
pub mod response;
pub mod server;
