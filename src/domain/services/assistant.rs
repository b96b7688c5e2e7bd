#[cfg(test)]
#[path = "assistant_test.rs"]
mod tests;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::time;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::AssistantError;
use crate::domain::models::Backend;
use crate::domain::models::BackendPrompt;
use crate::domain::models::Transcript;

pub const WELCOME_MESSAGE: &str = "Hello! I'm your Health Assistant. I can help interpret your lab results and answer health-related questions. How can I assist you today?";

pub const FALLBACK_REPLY: &str =
    "I'm sorry, I encountered an error processing your request. Please try again later.";

/// Adapter between the chat and a completion backend. Every question is sent
/// together with the conversation so far.
#[derive(Clone)]
pub struct AssistantSession {
    backend: Arc<dyn Backend + Send + Sync>,
    timeout: Duration,
    history_limit: usize,
}

impl AssistantSession {
    pub fn new(
        backend: Arc<dyn Backend + Send + Sync>,
        timeout: Duration,
        history_limit: usize,
    ) -> AssistantSession {
        return AssistantSession {
            backend,
            timeout,
            history_limit,
        };
    }

    pub fn from_config(backend: Arc<dyn Backend + Send + Sync>) -> Result<AssistantSession> {
        let timeout = Config::get(ConfigKey::CompletionTimeout).parse::<u64>()?;
        let history_limit = Config::get(ConfigKey::HistoryLimit).parse::<usize>()?;

        return Ok(AssistantSession::new(
            backend,
            Duration::from_millis(timeout),
            history_limit,
        ));
    }

    pub async fn send_message(
        &self,
        text: &str,
        history: &Transcript,
    ) -> Result<String, AssistantError> {
        if text.trim().is_empty() {
            tracing::warn!("Refusing to send an empty message to the assistant");
            return Err(AssistantError::Unavailable);
        }

        let prompt = BackendPrompt::new(text.to_string(), history.window(self.history_limit));
        tracing::debug!(
            backend = %self.backend.name(),
            history_turns = prompt.history.len(),
            "sending message to assistant"
        );

        match time::timeout(self.timeout, self.backend.get_completion(prompt)).await {
            Ok(Ok(reply)) => return Ok(reply),
            Ok(Err(err)) => {
                tracing::error!(
                    backend = %self.backend.name(),
                    error = ?err,
                    "assistant request failed"
                );
            }
            Err(_) => {
                tracing::error!(
                    backend = %self.backend.name(),
                    timeout_ms = self.timeout.as_millis() as u64,
                    "assistant request timed out"
                );
            }
        }

        return Err(AssistantError::Unavailable);
    }
}
