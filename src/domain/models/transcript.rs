#[cfg(test)]
#[path = "transcript_test.rs"]
mod tests;

use serde::Deserialize;
use serde::Serialize;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptTurn {
    pub role: Role,
    pub parts: Vec<Part>,
}

impl TranscriptTurn {
    pub fn new(role: Role, text: &str) -> TranscriptTurn {
        return TranscriptTurn {
            role,
            parts: vec![Part {
                text: text.to_string(),
            }],
        };
    }

    pub fn user(text: &str) -> TranscriptTurn {
        return TranscriptTurn::new(Role::User, text);
    }

    pub fn model(text: &str) -> TranscriptTurn {
        return TranscriptTurn::new(Role::Model, text);
    }

    pub fn text(&self) -> String {
        return self
            .parts
            .iter()
            .map(|part| return part.text.as_str())
            .collect::<Vec<&str>>()
            .join("");
    }
}

/// Role-tagged context sent with every completion request. Turns are only
/// ever appended as `user`/`model` pairs, so the list always alternates.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    turns: Vec<TranscriptTurn>,
}

impl Transcript {
    /// Opening exchange the assistant is primed with before the first
    /// question.
    pub fn seeded(greeting: &str) -> Transcript {
        let mut transcript = Transcript::default();
        transcript.push_exchange("Hello", greeting);
        return transcript;
    }

    pub fn push_exchange(&mut self, user_text: &str, model_text: &str) {
        self.turns.push(TranscriptTurn::user(user_text));
        self.turns.push(TranscriptTurn::model(model_text));
    }

    pub fn turns(&self) -> &[TranscriptTurn] {
        return &self.turns;
    }

    pub fn len(&self) -> usize {
        return self.turns.len();
    }

    /// Trailing turns to send with a request. A limit of zero keeps the full
    /// history. The window always opens on a `user` turn.
    pub fn window(&self, limit: usize) -> Transcript {
        if limit == 0 || limit >= self.turns.len() {
            return self.clone();
        }

        let mut start = self.turns.len() - limit;
        while start < self.turns.len() && self.turns[start].role != Role::User {
            start += 1;
        }

        return Transcript {
            turns: self.turns[start..].to_vec(),
        };
    }
}
