use async_trait::async_trait;

use crate::error::AiClientError;

/// A provider-agnostic text completion backend. Each provider (OpenAI,
/// OpenRouter, Claude-compatible) implements this the same way so callers
/// — the translation gateway, the consolidator's AI amplification step —
/// can hold a `Box<dyn TextProvider>` and not care which vendor answers.
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Human-readable provider name, used in logs and circuit breaker keys.
    fn name(&self) -> &'static str;

    /// Plain chat completion: system + user prompt in, text out.
    async fn complete(&self, system: &str, user: &str) -> Result<String, AiClientError>;

    /// Structured extraction: ask the model to answer strictly as JSON
    /// matching `schema` (a JSON Schema document), return the raw JSON text.
    async fn extract_json(
        &self,
        system: &str,
        user: &str,
        schema: serde_json::Value,
    ) -> Result<String, AiClientError>;
}

/// A provider-agnostic embedding backend.
#[async_trait]
pub trait EmbedProvider: Send + Sync {
    fn name(&self) -> &'static str;
    async fn embed(&self, text: &str) -> Result<Vec<f32>, AiClientError>;
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, AiClientError>;
}
