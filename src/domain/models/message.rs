#[cfg(test)]
#[path = "message_test.rs"]
mod tests;

use chrono::DateTime;
use chrono::Local;

use super::Attachment;
use super::Sender;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MessageType {
    Normal,
    Error,
}

#[derive(Clone, Debug)]
pub struct ChatMessage {
    pub id: String,
    pub content: String,
    pub sender: Sender,
    pub timestamp: DateTime<Local>,
    pub attachments: Option<Vec<Attachment>>,
    mtype: MessageType,
}

impl ChatMessage {
    pub fn new(sender: Sender, content: &str) -> ChatMessage {
        let timestamp = Local::now();
        return ChatMessage {
            id: timestamp.timestamp_millis().to_string(),
            content: content.to_string().replace('\t', "  "),
            sender,
            timestamp,
            attachments: None,
            mtype: MessageType::Normal,
        };
    }

    pub fn new_with_type(sender: Sender, mtype: MessageType, content: &str) -> ChatMessage {
        let mut message = ChatMessage::new(sender, content);
        message.mtype = mtype;
        return message;
    }

    /// Empty attachment lists are stored as `None`.
    pub fn with_attachments(mut self, attachments: Vec<Attachment>) -> ChatMessage {
        if attachments.is_empty() {
            self.attachments = None;
        } else {
            self.attachments = Some(attachments);
        }

        return self;
    }

    pub fn message_type(&self) -> MessageType {
        return self.mtype;
    }

    pub fn attachments(&self) -> &[Attachment] {
        return self.attachments.as_deref().unwrap_or_default();
    }

    /// Hour and minute the message was written, as shown under each bubble.
    pub fn time(&self) -> String {
        return self.timestamp.format("%H:%M").to_string();
    }

    pub fn as_string_lines(&self, line_max_width: usize) -> Vec<String> {
        let mut lines: Vec<String> = Vec::new();

        for full_line in self.content.split('\n') {
            if full_line.trim().is_empty() {
                lines.push(" ".to_string());
                continue;
            }

            let mut char_count = 0;
            let mut current_lines: Vec<&str> = vec![];

            for word in full_line.split(' ') {
                let word_len = word.chars().count();
                if word_len + char_count > line_max_width && !current_lines.is_empty() {
                    lines.push(current_lines.join(" ").trim_end().to_string());
                    current_lines = vec![word];
                    char_count = word_len + 1;
                } else {
                    current_lines.push(word);
                    char_count += word_len + 1;
                }
            }
            if !current_lines.is_empty() {
                lines.push(current_lines.join(" ").trim_end().to_string());
            }
        }

        return lines;
    }
}
