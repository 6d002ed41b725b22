//! HTTP client for OpenAI-compatible generation endpoints
//!
//! The engine hands assembled payloads to this collaborator; everything
//! here is boundary I/O. One endpoint entry per provider (base URL plus
//! bearer key), all speaking the chat-completions wire format.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;

use crate::errors::{EngineError, Result};
use crate::generate::AnswerGenerator;
use crate::prompt::PromptPayload;

/// One generation provider: where to POST and how to authenticate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationEndpoint {
    /// Short provider name used in logs and answer records
    pub name: String,
    /// Base URL up to but excluding `/chat/completions`
    pub base_url: String,
    /// Bearer token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

/// Answer text extracted from a generation response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedAnswer {
    pub endpoint: String,
    pub model: String,
    pub content: String,
}

/// Minimal view of a chat-completions response
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// HTTP client for one OpenAI-compatible endpoint
pub struct OpenAiCompatClient {
    client: Client,
    endpoint: GenerationEndpoint,
}

impl OpenAiCompatClient {
    /// Create a client for one endpoint
    pub fn new(endpoint: GenerationEndpoint) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(EngineError::Http)?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &GenerationEndpoint {
        &self.endpoint
    }
}

#[async_trait]
impl AnswerGenerator for OpenAiCompatClient {
    /// POST the payload and extract `choices[0].message.content`
    async fn generate(&self, payload: &PromptPayload) -> Result<GeneratedAnswer> {
        let url = format!("{}/chat/completions", self.endpoint.base_url);

        let mut request = self.client.post(&url).json(payload);
        if let Some(key) = &self.endpoint.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?.error_for_status()?;
        let completion: ChatCompletionResponse = response.json().await?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| EngineError::MissingAnswer {
                model: payload.model.clone(),
            })?;

        info!(endpoint = %self.endpoint.name, model = %payload.model, "generation answer received");

        Ok(GeneratedAnswer {
            endpoint: self.endpoint.name.clone(),
            model: payload.model.clone(),
            content,
        })
    }
}
