//! Chat-completion client for AI move proposals.

use std::time::Duration;

use async_trait::async_trait;
use chess_core::Position;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ProposerConfig;
use crate::prompt::{system_prompt, user_prompt};
use crate::MoveProposer;

#[derive(Debug, thiserror::Error)]
pub enum ProposalError {
    #[error("API key variable {var} is not set")]
    MissingApiKey { var: String },
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("service answered {status}: {body}")]
    Status { status: u16, body: String },
    #[error("reply has no usable first choice")]
    Shape,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

/// Request body of a chat-completion call.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
    pub stop: &'a [String],
    pub stream: bool,
}

pub fn build_request<'a>(
    config: &'a ProposerConfig,
    position: &Position,
    excluded: &[String],
) -> ChatRequest<'a> {
    ChatRequest {
        model: &config.model,
        messages: vec![
            ChatMessage {
                role: "system",
                content: system_prompt(position, excluded),
            },
            ChatMessage {
                role: "user",
                content: user_prompt(position, excluded),
            },
        ],
        temperature: config.temperature,
        max_tokens: config.max_tokens,
        top_p: config.top_p,
        stop: &config.stop,
        stream: false,
    }
}

/// Pull the trimmed content of the first choice out of an untyped reply.
///
/// Any deviation from `{"choices": [{"message": {"content": "<text>"}}]}`, or
/// blank content, yields `None`.
pub fn extract_candidate(payload: &Value) -> Option<String> {
    let content = payload
        .get("choices")?
        .as_array()?
        .first()?
        .get("message")?
        .get("content")?
        .as_str()?;
    let trimmed = content.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Asks a chat-completion service for one coordinate move.
pub struct ChatCompletionProposer {
    client: reqwest::Client,
    config: ProposerConfig,
    api_key: String,
}

impl ChatCompletionProposer {
    /// Build from config, reading the API key from `config.api_key_env`.
    pub fn from_config(config: ProposerConfig) -> Result<Self, ProposalError> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ProposalError::MissingApiKey {
                var: config.api_key_env.clone(),
            })?;
        Self::with_api_key(config, api_key)
    }

    pub fn with_api_key(config: ProposerConfig, api_key: String) -> Result<Self, ProposalError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .build()?;
        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    async fn request(&self, position: &Position, excluded: &[String]) -> Result<String, ProposalError> {
        let body = build_request(&self.config, position, excluded);
        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProposalError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let payload: Value = response.json().await?;
        extract_candidate(&payload).ok_or(ProposalError::Shape)
    }
}

#[async_trait]
impl MoveProposer for ChatCompletionProposer {
    async fn propose(&self, position: &Position, excluded: &[String]) -> Option<String> {
        if !excluded.is_empty() {
            debug!(excluded = %excluded.join(", "), "asking again with exclusions");
        }
        match self.request(position, excluded).await {
            Ok(candidate) => {
                debug!(%candidate, model = %self.config.model, "proposal received");
                Some(candidate)
            }
            Err(e) => {
                warn!(error = %e, model = %self.config.model, "proposal request failed");
                None
            }
        }
    }

    fn name(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
#[path = "chat_tests.rs"]
mod chat_tests;
