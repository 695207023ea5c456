//! Chatbot reply generation.

pub mod fallback;
mod generator;

pub use generator::{Reply, ReplySource, ResponseGenerator};
