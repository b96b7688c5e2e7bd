use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;

use crate::domain::models::Backend;
use crate::domain::models::BackendName;
use crate::domain::models::BackendPrompt;

#[derive(Clone)]
pub enum MockReply {
    Text(String),
    NetworkError,
    Hang,
}

/// Backend double recording every prompt it receives.
#[derive(Clone)]
pub struct MockBackend {
    reply: MockReply,
    delay: Duration,
    pub prompts: Arc<Mutex<Vec<BackendPrompt>>>,
}

impl MockBackend {
    pub fn new(reply: MockReply) -> MockBackend {
        return MockBackend {
            reply,
            delay: Duration::from_millis(0),
            prompts: Arc::new(Mutex::new(vec![])),
        };
    }

    pub fn with_delay(mut self, delay: Duration) -> MockBackend {
        self.delay = delay;
        return self;
    }

    pub fn calls(&self) -> usize {
        return self.prompts.lock().unwrap().len();
    }
}

#[async_trait]
impl Backend for MockBackend {
    fn name(&self) -> BackendName {
        return BackendName::Gemini;
    }

    #[allow(clippy::implicit_return)]
    async fn health_check(&self) -> Result<()> {
        if let MockReply::NetworkError = self.reply {
            bail!("connection refused");
        }
        return Ok(());
    }

    #[allow(clippy::implicit_return)]
    async fn get_completion(&self, prompt: BackendPrompt) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt);
        tokio::time::sleep(self.delay).await;

        match &self.reply {
            MockReply::Text(text) => return Ok(text.to_string()),
            MockReply::NetworkError => bail!("error sending request: connection refused"),
            MockReply::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                bail!("unreachable");
            }
        }
    }
}
