#[cfg(test)]
#[path = "actions_test.rs"]
mod tests;

use anyhow::Result;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::AssistantSession;
use crate::domain::models::Action;
use crate::domain::models::AssistantError;
use crate::domain::models::Event;

pub fn help_text() -> String {
    let text = r#"
COMMANDS:
- /attach (/at) [PATH...] - Stages one or more files to send with your next message. Images, PDFs, audio recordings and text files are accepted.
- /remove (/rm) [NUMBER] - Removes a staged file, using its number from /attachments.
- /attachments (/ls) - Lists the files staged for your next message.
- /logout - Signs you out of MediConnect and closes the chat.
- /quit /exit (/q) - Closes the chat.
- /help (/h) - Provides this help menu.

HOTKEYS:
- Up and Down arrows, mouse wheel - Scroll the chat
- PAGE UP / CTRL+U - Page up
- PAGE DOWN / CTRL+D - Page down
- CTRL+END - Jump to the newest message
- CTRL+C - Cancel waiting for an answer if in progress, otherwise exit.

ATTACHMENTS:
Staged files are shown above the input box and are included in your next message. They are kept on your computer and are not shared with the assistant.
        "#;

    return text.trim().to_string();
}

pub struct ActionsService {}

impl ActionsService {
    pub async fn start(
        assistant: AssistantSession,
        tx: mpsc::UnboundedSender<Event>,
        rx: &mut mpsc::UnboundedReceiver<Action>,
    ) -> Result<()> {
        let mut worker: Option<JoinHandle<Result<()>>> = None;

        loop {
            let action = match rx.recv().await {
                Some(action) => action,
                None => return Ok(()),
            };

            match action {
                Action::CancelQuestion() => {
                    let in_flight = match worker.take() {
                        Some(handle) if !handle.is_finished() => handle,
                        _ => continue,
                    };

                    in_flight.abort();
                    tracing::info!("assistant request cancelled");
                    tx.send(Event::AssistantAnswer(Err(AssistantError::Unavailable)))?;
                }
                Action::AskAssistant(prompt) => {
                    if let Some(handle) = &worker {
                        if !handle.is_finished() {
                            tracing::warn!(
                                "assistant request already in flight, dropping new request"
                            );
                            continue;
                        }
                    }

                    let worker_tx = tx.clone();
                    let worker_assistant = assistant.clone();
                    worker = Some(tokio::spawn(async move {
                        let res = worker_assistant
                            .send_message(&prompt.text, &prompt.history)
                            .await;
                        worker_tx.send(Event::AssistantAnswer(res))?;

                        return Ok(());
                    }));
                }
            }
        }
    }
}
