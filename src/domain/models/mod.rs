mod action;
mod attachment;
mod backend;
mod event;
mod message;
mod sender;
mod session_store;
mod slash_commands;
mod transcript;
mod user;

pub use action::*;
pub use attachment::*;
pub use backend::*;
pub use event::*;
pub use message::*;
pub use sender::*;
pub use session_store::*;
pub use slash_commands::*;
pub use transcript::*;
pub use user::*;
