#[cfg(test)]
#[path = "file_test.rs"]
mod tests;

use std::path;

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::SessionStore;
use crate::domain::models::User;

#[derive(Serialize, Deserialize)]
struct SessionFile {
    version: String,
    user: User,
}

/// Keeps the signed-in user in a YAML file, by default in the user's cache
/// directory.
pub struct FileSessionStore {
    pub file_path: path::PathBuf,
}

impl Default for FileSessionStore {
    fn default() -> FileSessionStore {
        return FileSessionStore::new(path::PathBuf::from(Config::get(ConfigKey::SessionFile)));
    }
}

impl FileSessionStore {
    pub fn new(file_path: path::PathBuf) -> FileSessionStore {
        return FileSessionStore { file_path };
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    #[allow(clippy::implicit_return)]
    async fn load(&self) -> Result<Option<User>> {
        if !self.file_path.exists() {
            return Ok(None);
        }

        let payload = fs::read_to_string(&self.file_path).await?;
        match serde_yaml::from_str::<SessionFile>(&payload) {
            Ok(session) => return Ok(Some(session.user)),
            Err(err) => {
                tracing::warn!(
                    error = ?err,
                    path = ?self.file_path,
                    "Ignoring unreadable session file"
                );
                return Ok(None);
            }
        }
    }

    #[allow(clippy::implicit_return)]
    async fn save(&self, user: &User) -> Result<()> {
        let payload = serde_yaml::to_string(&SessionFile {
            version: env!("CARGO_PKG_VERSION").to_string(),
            user: user.clone(),
        })?;

        if let Some(parent) = self.file_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).await?;
            }
        }

        let mut file = fs::File::create(&self.file_path).await?;
        file.write_all(payload.as_bytes()).await?;

        return Ok(());
    }

    #[allow(clippy::implicit_return)]
    async fn clear(&self) -> Result<()> {
        if !self.file_path.exists() {
            return Ok(());
        }

        fs::remove_file(&self.file_path).await?;
        return Ok(());
    }
}
