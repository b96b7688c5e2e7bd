#[cfg(test)]
#[path = "gemini_test.rs"]
mod tests;

use std::time::Duration;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Backend;
use crate::domain::models::BackendName;
use crate::domain::models::BackendPrompt;
use crate::domain::models::Part;
use crate::domain::models::TranscriptTurn;

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CompletionRequest {
    contents: Vec<TranscriptTurn>,
    generation_config: GenerationConfig,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: CandidateContent,
    #[serde(default)]
    finish_reason: Option<String>,
}

impl Candidate {
    /// Answers cut by safety, recitation or other filters carry no usable
    /// text. Only a natural stop or the token ceiling count as an answer.
    fn is_answer(&self) -> bool {
        return match self.finish_reason.as_deref() {
            None | Some("STOP") | Some("MAX_TOKENS") => true,
            Some(_) => false,
        };
    }
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

pub struct Gemini {
    url: String,
    token: String,
    model: String,
    max_output_tokens: String,
    timeout: String,
}

impl Default for Gemini {
    fn default() -> Gemini {
        return Gemini {
            url: Config::get(ConfigKey::GeminiURL),
            token: Config::get(ConfigKey::GeminiApiKey),
            model: Config::get(ConfigKey::Model),
            max_output_tokens: Config::get(ConfigKey::MaxOutputTokens),
            timeout: Config::get(ConfigKey::BackendHealthCheckTimeout),
        };
    }
}

impl Gemini {
    fn model_url(&self) -> String {
        return format!(
            "{url}/v1beta/models/{model}",
            url = self.url.trim_end_matches('/'),
            model = self.model
        );
    }
}

#[async_trait]
impl Backend for Gemini {
    fn name(&self) -> BackendName {
        return BackendName::Gemini;
    }

    #[allow(clippy::implicit_return)]
    async fn health_check(&self) -> Result<()> {
        if self.url.is_empty() {
            bail!("Gemini URL is not defined");
        }
        if self.token.is_empty() {
            bail!("Gemini API key is not defined");
        }
        if self.model.is_empty() {
            bail!("Gemini model is not defined");
        }

        let res = reqwest::Client::new()
            .get(self.model_url())
            .query(&[("key", &self.token)])
            .timeout(Duration::from_millis(self.timeout.parse::<u64>()?))
            .send()
            .await;

        let status = match res {
            Ok(res) => res.status().as_u16(),
            Err(err) => {
                tracing::error!(error = ?err, "Gemini is not reachable");
                bail!("Gemini is not reachable");
            }
        };
        if status >= 400 {
            tracing::error!(status = status, "Gemini health check failed");
            bail!("Gemini health check failed");
        }

        return Ok(());
    }

    #[allow(clippy::implicit_return)]
    async fn get_completion(&self, prompt: BackendPrompt) -> Result<String> {
        let mut contents = prompt.history.turns().to_vec();
        contents.push(TranscriptTurn::user(&prompt.text));

        let req = CompletionRequest {
            contents,
            generation_config: GenerationConfig {
                max_output_tokens: self.max_output_tokens.parse::<u32>()?,
            },
        };

        let res = reqwest::Client::new()
            .post(format!("{}:generateContent", self.model_url()))
            .query(&[("key", &self.token)])
            .json(&req)
            .send()
            .await?;

        if !res.status().is_success() {
            tracing::error!(
                status = res.status().as_u16(),
                "Failed to make completion request to Gemini"
            );
            bail!(format!(
                "Failed to make completion request to Gemini, {}",
                res.status().as_u16()
            ));
        }

        let body = res.json::<CompletionResponse>().await?;
        let candidate = match body.candidates.first() {
            Some(candidate) => candidate,
            None => bail!("Gemini returned no candidates"),
        };

        if !candidate.is_answer() {
            tracing::error!(
                finish_reason = ?candidate.finish_reason,
                "Gemini did not finish the answer"
            );
            bail!(format!(
                "Gemini stopped without an answer, {}",
                candidate.finish_reason.as_deref().unwrap_or_default()
            ));
        }

        let text = candidate
            .content
            .parts
            .iter()
            .map(|part| return part.text.as_str())
            .collect::<Vec<&str>>()
            .join("");

        if text.trim().is_empty() {
            bail!("Gemini returned an empty answer");
        }

        tracing::debug!(
            history_turns = req.contents.len(),
            response_len = text.len(),
            "Gemini completion received"
        );

        return Ok(text);
    }
}
