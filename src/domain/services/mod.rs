pub mod actions;
mod app_state;
mod assistant;
mod auth;
mod bubble;
mod bubble_list;
pub mod events;
#[cfg(test)]
pub mod mock_backend;
mod scroll;

pub use app_state::*;
pub use assistant::*;
pub use auth::*;
pub use bubble::*;
pub use bubble_list::*;
pub use scroll::*;
