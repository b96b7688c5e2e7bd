use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::models::SessionStore;
use crate::domain::models::User;

/// Session store that forgets everything when dropped.
#[derive(Default)]
pub struct MemorySessionStore {
    user: Mutex<Option<User>>,
}

impl MemorySessionStore {
    pub fn with_user(user: User) -> MemorySessionStore {
        return MemorySessionStore {
            user: Mutex::new(Some(user)),
        };
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    #[allow(clippy::implicit_return)]
    async fn load(&self) -> Result<Option<User>> {
        return Ok(self.user.lock().unwrap().clone());
    }

    #[allow(clippy::implicit_return)]
    async fn save(&self, user: &User) -> Result<()> {
        *self.user.lock().unwrap() = Some(user.clone());
        return Ok(());
    }

    #[allow(clippy::implicit_return)]
    async fn clear(&self) -> Result<()> {
        *self.user.lock().unwrap() = None;
        return Ok(());
    }
}
