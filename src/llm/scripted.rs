//! Scripted client for tests: replays canned completions and records
//! the requests it receives.

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::error::LlmError;
use super::types::{ChatRequest, ChatResponse, ChatUsage};
use super::LlmClient;

/// An [`LlmClient`] that pops one canned response per call.
#[derive(Debug, Default)]
pub struct ScriptedLlmClient {
    responses: Mutex<VecDeque<String>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedLlmClient {
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: Mutex::new(responses.into_iter().map(Into::into).collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue one more response.
    pub fn push(&self, response: impl Into<String>) {
        self.responses.lock().push_back(response.into());
    }

    /// Every request seen so far.
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl LlmClient for ScriptedLlmClient {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, LlmError> {
        self.requests.lock().push(request);
        let content = self
            .responses
            .lock()
            .pop_front()
            .ok_or_else(|| LlmError::InvalidRequest("scripted client exhausted".into()))?;
        Ok(ChatResponse {
            content,
            model: "scripted".into(),
            finish_reason: Some("stop".into()),
            usage: ChatUsage::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::types::ChatMessage;

    fn request(text: &str) -> ChatRequest {
        ChatRequest {
            model: String::new(),
            messages: vec![ChatMessage::user(text)],
            temperature: None,
            max_tokens: None,
        }
    }

    #[tokio::test]
    async fn test_replays_in_order() {
        let client = ScriptedLlmClient::new(["one", "two"]);
        assert_eq!(client.chat(request("a")).await.unwrap().content, "one");
        assert_eq!(client.chat(request("b")).await.unwrap().content, "two");
        assert!(client.chat(request("c")).await.is_err());
    }

    #[tokio::test]
    async fn test_records_requests() {
        let client = ScriptedLlmClient::new(["ok"]);
        client.chat(request("hello")).await.unwrap();
        let seen = client.requests();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].messages[0].content, "hello");
    }
}
