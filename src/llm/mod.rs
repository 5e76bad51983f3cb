//! LLM collaborator boundary.
//!
//! The engine only sees the [`LlmClient`] trait; the OpenAI
//! implementation and the scripted test double are interchangeable
//! behind it.

use async_trait::async_trait;

pub mod error;
pub mod openai;
pub mod scripted;
pub mod types;

pub use error::LlmError;
pub use openai::{OpenAiClient, OpenAiConfig};
pub use scripted::ScriptedLlmClient;
pub use types::*;

/// A chat-completion client.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, LlmError>;
}
