//! The LLM editing session: a loop alternating prompt, proposal, and
//! apply, with bounded retries.
//!
//! Every iteration starts from the previous iteration's returned
//! process, so cancellation and failure never leave partial edits
//! behind. Engine rejections are fed back into the conversation and
//! retried; transport failures abort immediately.

use std::sync::Arc;

use serde_json::Value;

use crate::error::{EditPhase, EngineResult, SchemaError, SessionError, SessionResult};
use crate::llm::{ChatMessage, ChatRequest, LlmClient};
use crate::model::{to_json_pretty, Process};

use super::prompts;
use super::proposal::{apply, validate_proposal, EditProposal};

/// Budgets and model selection for an editing session.
#[derive(Debug, Clone)]
pub struct EditSessionConfig {
    /// Model name; empty selects the client's default.
    pub model: String,
    pub temperature: Option<f64>,
    /// Attempts per proposal before the session fails.
    pub max_retries: u32,
    /// Follow-up iterations after the initial edit.
    pub max_iterations: u32,
}

impl Default for EditSessionConfig {
    fn default() -> Self {
        Self {
            model: String::new(),
            temperature: Some(0.0),
            max_retries: 4,
            max_iterations: 15,
        }
    }
}

/// An editing session over an injected LLM client.
pub struct EditSession {
    client: Arc<dyn LlmClient>,
    config: EditSessionConfig,
}

enum StepOutcome {
    Applied(Process),
    Stopped,
}

impl EditSession {
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self::with_config(client, EditSessionConfig::default())
    }

    pub fn with_config(client: Arc<dyn LlmClient>, config: EditSessionConfig) -> Self {
        Self { client, config }
    }

    /// Apply a natural-language change request to a process.
    ///
    /// The input process is never mutated; the edited copy is returned.
    pub async fn edit(
        &self,
        process: &Process,
        change_request: &str,
    ) -> SessionResult<Process> {
        let mut current = match self.run_step(process, change_request, true).await? {
            StepOutcome::Applied(edited) => edited,
            // The initial step rejects stop proposals, so it can only
            // resolve by applying an edit.
            StepOutcome::Stopped => process.clone(),
        };

        for iteration in 0..self.config.max_iterations {
            tracing::debug!(iteration, "editing session iteration");
            match self.run_step(&current, change_request, false).await? {
                StepOutcome::Applied(edited) => current = edited,
                StepOutcome::Stopped => return Ok(current),
            }
        }

        Err(SessionError::Exhausted {
            phase: EditPhase::Iterative,
            attempts: self.config.max_iterations,
            last_error: "iteration budget exceeded without a stop signal".to_string(),
        })
    }

    async fn run_step(
        &self,
        process: &Process,
        change_request: &str,
        first: bool,
    ) -> SessionResult<StepOutcome> {
        let process_json = to_json_pretty(process);
        let prompt = if first {
            prompts::initial_prompt(&process_json, change_request)
        } else {
            prompts::iteration_prompt(&process_json, change_request)
        };

        let mut messages = vec![
            ChatMessage::system(prompts::SYSTEM_PROMPT),
            ChatMessage::user(prompt),
        ];
        let mut last_error = String::new();

        for attempt in 0..self.config.max_retries {
            let request = ChatRequest {
                model: self.config.model.clone(),
                messages: messages.clone(),
                temperature: self.config.temperature,
                max_tokens: None,
            };
            let response = self.client.chat(request).await?;

            match self.try_apply(process, &response.content, first) {
                Ok(outcome) => return Ok(outcome),
                Err(error) => {
                    tracing::warn!(attempt, %error, "edit proposal rejected; retrying");
                    last_error = error.to_string();
                    messages.push(ChatMessage::assistant(&response.content));
                    messages.push(ChatMessage::user(prompts::retry_feedback(&last_error)));
                }
            }
        }

        Err(SessionError::Exhausted {
            phase: if first {
                EditPhase::Initial
            } else {
                EditPhase::Iterative
            },
            attempts: self.config.max_retries,
            last_error,
        })
    }

    fn try_apply(
        &self,
        process: &Process,
        content: &str,
        first: bool,
    ) -> EngineResult<StepOutcome> {
        let raw = extract_json(content)?;
        match validate_proposal(&raw, first)? {
            EditProposal::Stop => Ok(StepOutcome::Stopped),
            EditProposal::Call(call) => Ok(StepOutcome::Applied(apply(process, &call)?)),
        }
    }
}

/// Parse the completion as JSON, tolerating a Markdown code fence.
fn extract_json(content: &str) -> EngineResult<Value> {
    let trimmed = content.trim();
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .unwrap_or(trimmed);
    serde_json::from_str(body.trim())
        .map_err(|e| SchemaError::Malformed(format!("response is not valid JSON: {}", e)).into())
}
