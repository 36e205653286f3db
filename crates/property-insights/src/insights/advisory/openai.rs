use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{AdvisoryError, TextGenerator};
use crate::config::AdvisoryConfig;

const TEMPERATURE: f64 = 0.3;

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Chat-completions client for OpenAI-compatible endpoints.
#[derive(Clone)]
pub struct OpenAiTextGenerator {
    api_key: String,
    base_url: String,
    model: String,
    timeout: Duration,
}

impl OpenAiTextGenerator {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            timeout,
        }
    }

    /// `None` when no API key is configured.
    pub fn from_config(config: &AdvisoryConfig) -> Option<Self> {
        config.api_key.as_ref().map(|api_key| {
            Self::new(
                api_key.clone(),
                config.base_url.clone(),
                config.model.clone(),
                config.timeout,
            )
        })
    }

    fn failure(reason: impl ToString) -> AdvisoryError {
        AdvisoryError::AdvisoryServiceFailure(reason.to_string())
    }
}

#[async_trait]
impl TextGenerator for OpenAiTextGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, AdvisoryError> {
        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(Self::failure)?;

        let body = ChatCompletionRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: TEMPERATURE,
        };

        let response = client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(Self::failure)?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::failure(format!("completion endpoint responded with {status}")));
        }

        let completion: ChatCompletionResponse = response.json().await.map_err(Self::failure)?;
        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| Self::failure("completion contained no text"))
    }
}

impl std::fmt::Debug for OpenAiTextGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiTextGenerator")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}
