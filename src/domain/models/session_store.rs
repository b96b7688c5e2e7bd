use anyhow::Result;
use async_trait::async_trait;

use super::User;

/// Persistence for the signed-in user between runs.
#[async_trait]
pub trait SessionStore {
    /// Returns `None` when nobody is signed in.
    async fn load(&self) -> Result<Option<User>>;

    async fn save(&self, user: &User) -> Result<()>;

    async fn clear(&self) -> Result<()>;
}
