#[cfg(test)]
#[path = "app_state_test.rs"]
mod tests;

use std::path;

use anyhow::Result;
use ratatui::prelude::Rect;

use super::actions::help_text;
use super::BubbleList;
use super::Scroll;
use super::FALLBACK_REPLY;
use super::WELCOME_MESSAGE;
use crate::domain::models::AssistantError;
use crate::domain::models::Attachment;
use crate::domain::models::Backend;
use crate::domain::models::BackendPrompt;
use crate::domain::models::ChatMessage;
use crate::domain::models::MessageType;
use crate::domain::models::Sender;
use crate::domain::models::SlashCommand;
use crate::domain::models::Transcript;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChatStatus {
    Idle,
    AwaitingResponse,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandOutcome {
    Continue,
    Logout,
    Quit,
}

pub struct AppState<'a> {
    pub attachments: Vec<Attachment>,
    pub bubble_list: BubbleList<'a>,
    pub last_known_height: u16,
    pub last_known_width: u16,
    pub messages: Vec<ChatMessage>,
    pub scroll: Scroll,
    pub status: ChatStatus,
    pub transcript: Transcript,
    pending_text: Option<String>,
}

impl<'a> Default for AppState<'a> {
    fn default() -> AppState<'a> {
        return AppState::new();
    }
}

impl<'a> AppState<'a> {
    pub fn new() -> AppState<'a> {
        let mut app_state = AppState {
            attachments: vec![],
            bubble_list: BubbleList::default(),
            last_known_height: 0,
            last_known_width: 0,
            messages: vec![],
            scroll: Scroll::default(),
            status: ChatStatus::Idle,
            transcript: Transcript::seeded(WELCOME_MESSAGE),
            pending_text: None,
        };

        app_state.add_message(ChatMessage::new(Sender::Assistant, WELCOME_MESSAGE));
        return app_state;
    }

    pub fn is_waiting(&self) -> bool {
        return self.status == ChatStatus::AwaitingResponse;
    }

    /// Warns in the chat when the backend can't be reached. Chatting stays
    /// possible, failed questions fall back to the apology message.
    pub async fn check_backend(&mut self, backend: &(dyn Backend + Send + Sync)) {
        if let Err(err) = backend.health_check().await {
            tracing::warn!(error = ?err, backend = %backend.name(), "backend health check failed");
            self.add_message(ChatMessage::new_with_type(
                Sender::System,
                MessageType::Error,
                &format!("Hey, it looks like I can't reach the {} assistant right now. Your questions may not get an answer until the connection is back.\n\nError: {err}", backend.name()),
            ));
        }
    }

    /// Records a user submission. Returns the request to send to the
    /// assistant, if any. Empty submissions and submissions made while an
    /// answer is pending leave the chat untouched.
    pub fn submit(&mut self, text: &str) -> Option<BackendPrompt> {
        if self.is_waiting() {
            tracing::debug!("submit ignored while waiting for the assistant");
            return None;
        }

        if text.trim().is_empty() && self.attachments.is_empty() {
            return None;
        }

        let message =
            ChatMessage::new(Sender::User, text).with_attachments(self.attachments.clone());
        self.add_message(message);
        self.scroll.to_latest();

        if text.trim().is_empty() {
            // Attachments are not forwarded to the model, there is nothing
            // to ask.
            self.attachments.clear();
            return None;
        }

        self.status = ChatStatus::AwaitingResponse;
        self.pending_text = Some(text.to_string());

        return Some(BackendPrompt::new(
            text.to_string(),
            self.transcript.clone(),
        ));
    }

    pub fn handle_backend_response(&mut self, res: Result<String, AssistantError>) {
        if !self.is_waiting() {
            tracing::warn!("dropping assistant response, no question is pending");
            return;
        }

        let question = self.pending_text.take().unwrap_or_default();
        match res {
            Ok(reply) => {
                self.transcript.push_exchange(&question, &reply);
                self.add_message(ChatMessage::new(Sender::Assistant, &reply));
            }
            Err(err) => {
                tracing::debug!(error = %err, "showing fallback reply");
                self.add_message(ChatMessage::new_with_type(
                    Sender::Assistant,
                    MessageType::Error,
                    FALLBACK_REPLY,
                ));
            }
        }

        self.attachments.clear();
        self.status = ChatStatus::Idle;
    }

    pub fn stage_attachment(&mut self, attachment: Attachment) {
        self.attachments.push(attachment);
    }

    /// Unstages the attachment at `index`. Other attachments keep their order.
    pub fn remove_attachment(&mut self, index: usize) -> Option<Attachment> {
        if index >= self.attachments.len() {
            return None;
        }

        return Some(self.attachments.remove(index));
    }

    pub async fn handle_slash_command(&mut self, command: &SlashCommand) -> Result<CommandOutcome> {
        if command.is_quit() {
            return Ok(CommandOutcome::Quit);
        }

        if command.is_logout() {
            return Ok(CommandOutcome::Logout);
        }

        if command.is_help() {
            self.add_notice(&help_text());
            return Ok(CommandOutcome::Continue);
        }

        if command.is_attach() {
            if command.args.is_empty() {
                self.add_error("You must pass at least one file path with `/attach`. Run `/help` for more details.");
                return Ok(CommandOutcome::Continue);
            }

            for arg in command.args.iter() {
                match Attachment::from_path(&path::PathBuf::from(arg)).await {
                    Ok(attachment) => {
                        self.add_notice(&format!(
                            "Staged {} ({}).",
                            attachment.name, attachment.kind
                        ));
                        self.stage_attachment(attachment);
                    }
                    Err(err) => {
                        self.add_error(&err.to_string());
                    }
                }
            }

            return Ok(CommandOutcome::Continue);
        }

        if command.is_remove_attachment() {
            let number = command
                .args
                .first()
                .and_then(|arg| return arg.parse::<usize>().ok())
                .unwrap_or(0);
            if number < 1 {
                self.add_error("You must pass the number of a staged file with `/remove`. Run `/attachments` to list them.");
                return Ok(CommandOutcome::Continue);
            }

            match self.remove_attachment(number - 1) {
                Some(attachment) => {
                    self.add_notice(&format!("Removed {}.", attachment.name));
                }
                None => {
                    self.add_error(&format!("{number} is not a staged file. Run `/attachments` to list them."));
                }
            }

            return Ok(CommandOutcome::Continue);
        }

        if command.is_list_attachments() {
            if self.attachments.is_empty() {
                self.add_notice("No files are staged. Use `/attach PATH` to add one.");
            } else {
                let list = self
                    .attachments
                    .iter()
                    .enumerate()
                    .map(|(idx, attachment)| {
                        return format!("- ({}) [{}] {}", idx + 1, attachment.kind.label(), attachment.name);
                    })
                    .collect::<Vec<String>>()
                    .join("\n");
                self.add_notice(&list);
            }

            return Ok(CommandOutcome::Continue);
        }

        return Ok(CommandOutcome::Continue);
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.last_known_width = rect.width;
        self.last_known_height = rect.height;
        self.sync_dependants();
    }

    pub fn add_message(&mut self, message: ChatMessage) {
        self.messages.push(message);
        self.ensure_unique_id();
        self.sync_dependants();
    }

    fn add_notice(&mut self, text: &str) {
        self.add_message(ChatMessage::new(Sender::System, text));
    }

    fn add_error(&mut self, text: &str) {
        self.add_message(ChatMessage::new_with_type(
            Sender::System,
            MessageType::Error,
            text,
        ));
    }

    /// Ids come from the creation time in milliseconds. Two messages created
    /// in the same millisecond get consecutive ids.
    fn ensure_unique_id(&mut self) {
        let len = self.messages.len();
        if len < 2 {
            return;
        }

        let previous = self.messages[len - 2].id.parse::<i64>().unwrap_or(0);
        let current = self.messages[len - 1].id.parse::<i64>().unwrap_or(0);
        if current <= previous {
            self.messages[len - 1].id = (previous + 1).to_string();
        }
    }

    fn sync_dependants(&mut self) {
        self.bubble_list
            .set_messages(&self.messages, self.last_known_width as usize);

        let content_height = u16::try_from(self.bubble_list.len()).unwrap_or(u16::MAX);
        self.scroll.resize(content_height, self.last_known_height);
    }
}
