// Generation collaborator boundary
//
// Assembled prompt payloads leave the engine through the AnswerGenerator
// seam; the OpenAI-compatible HTTP client is the production implementation,
// tests substitute stubs.

pub mod client;

use async_trait::async_trait;

use crate::errors::Result;
use crate::prompt::PromptPayload;

pub use client::{GeneratedAnswer, GenerationEndpoint, OpenAiCompatClient};

/// Sends one assembled payload to a generative model and returns its answer
#[async_trait]
pub trait AnswerGenerator: Send + Sync {
    async fn generate(&self, payload: &PromptPayload) -> Result<GeneratedAnswer>;
}
