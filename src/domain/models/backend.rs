#[cfg(test)]
#[path = "backend_test.rs"]
mod tests;

use anyhow::Result;
use async_trait::async_trait;
use strum::EnumIter;
use strum::EnumVariantNames;
use strum::IntoEnumIterator;

use super::Transcript;

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, EnumVariantNames, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum BackendName {
    Gemini,
}

impl BackendName {
    pub fn parse(text: String) -> Option<BackendName> {
        return BackendName::iter().find(|e| return e.to_string() == text);
    }
}

/// A new user turn plus the history that precedes it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BackendPrompt {
    pub text: String,
    pub history: Transcript,
}

impl BackendPrompt {
    pub fn new(text: String, history: Transcript) -> BackendPrompt {
        return BackendPrompt { text, history };
    }
}

/// The only failure the chat ever sees. Whatever went wrong underneath is
/// logged, never shown.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AssistantError {
    #[error("the health assistant is unavailable")]
    Unavailable,
}

#[async_trait]
pub trait Backend {
    fn name(&self) -> BackendName;

    /// Used when a chat starts to verify the backend is reachable with the
    /// configured model and credentials.
    async fn health_check(&self) -> Result<()>;

    /// Requests a single, complete answer for the prompt. The prompt's
    /// history is sent as-is ahead of the new user turn.
    async fn get_completion(&self, prompt: BackendPrompt) -> Result<String>;
}

pub type BackendBox = Box<dyn Backend + Send + Sync>;
