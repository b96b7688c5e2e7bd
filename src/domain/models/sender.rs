use serde::Deserialize;
use serde::Serialize;

/// Who wrote a chat message. `System` is reserved for notices produced by the
/// application itself (command feedback, connectivity warnings) and never
/// reaches the model transcript.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    #[strum(serialize = "You")]
    User,
    #[strum(serialize = "Health Assistant")]
    Assistant,
    #[strum(serialize = "MediConnect")]
    System,
}
