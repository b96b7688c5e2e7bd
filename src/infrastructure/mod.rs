pub mod backends;
pub mod session_stores;
