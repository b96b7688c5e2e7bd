use super::BackendPrompt;

/// Requests from the chat UI to the assistant worker.
pub enum Action {
    AskAssistant(BackendPrompt),
    /// Drops the question in flight. The chat gets the fallback reply.
    CancelQuestion(),
}
