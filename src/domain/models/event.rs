use tui_textarea::Input;

use super::AssistantError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollMove {
    LineUp,
    LineDown,
    PageUp,
    PageDown,
    Latest,
}

/// Everything the chat loop reacts to: answers from the worker, terminal
/// input, and a periodic redraw.
pub enum Event {
    AssistantAnswer(Result<String, AssistantError>),
    Cancel(),
    Paste(String),
    Redraw(),
    Scroll(ScrollMove),
    Submit(),
    TextInput(Input),
}
