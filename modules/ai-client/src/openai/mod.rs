mod client;
mod types;

use async_trait::async_trait;

use crate::error::AiClientError;
use crate::traits::{EmbedProvider, TextProvider};

use client::OpenAiClient;

/// An OpenAI-compatible chat + embeddings backend. Also used to talk to any
/// self-hosted server that mirrors the OpenAI `/chat/completions` wire shape
/// (set `base_url` to the local endpoint) — this is how the translation
/// gateway's "self-hosted" provider is modeled.
#[derive(Clone)]
pub struct OpenAi {
    api_key: String,
    model: String,
    embedding_model: String,
    base_url: Option<String>,
    label: &'static str,
}

impl OpenAi {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            embedding_model: "text-embedding-3-small".to_string(),
            base_url: None,
            label: "openai",
        }
    }

    pub fn with_embedding_model(mut self, model: impl Into<String>) -> Self {
        self.embedding_model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Relabel this provider for logging/circuit-breaker purposes — useful
    /// when the same OpenAI-shaped client stands in for a self-hosted model.
    pub fn with_label(mut self, label: &'static str) -> Self {
        self.label = label;
        self
    }

    fn client(&self) -> OpenAiClient {
        let client = OpenAiClient::new(&self.api_key);
        match &self.base_url {
            Some(url) => client.with_base_url(url),
            None => client,
        }
    }

    pub async fn complete(&self, system: &str, user: &str) -> Result<String, AiClientError> {
        self.client().chat(&self.model, system, user).await
    }

    pub async fn extract_json(
        &self,
        system: &str,
        user: &str,
        schema: serde_json::Value,
    ) -> Result<String, AiClientError> {
        self.client().structured(&self.model, system, user, schema).await
    }
}

#[async_trait]
impl TextProvider for OpenAi {
    fn name(&self) -> &'static str {
        self.label
    }

    async fn complete(&self, system: &str, user: &str) -> Result<String, AiClientError> {
        OpenAi::complete(self, system, user).await
    }

    async fn extract_json(
        &self,
        system: &str,
        user: &str,
        schema: serde_json::Value,
    ) -> Result<String, AiClientError> {
        OpenAi::extract_json(self, system, user, schema).await
    }
}

#[async_trait]
impl EmbedProvider for OpenAi {
    fn name(&self) -> &'static str {
        self.label
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, AiClientError> {
        self.client().embed(&self.embedding_model, text).await
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, AiClientError> {
        self.client().embed_batch(&self.embedding_model, texts).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_openai_label() {
        let ai = OpenAi::new("sk-test", "gpt-4o");
        assert_eq!(TextProvider::name(&ai), "openai");
    }

    #[test]
    fn relabeled_for_self_hosted_use() {
        let ai = OpenAi::new("unused", "local-translate-v1")
            .with_base_url("http://localhost:8080/v1")
            .with_label("self-hosted");
        assert_eq!(TextProvider::name(&ai), "self-hosted");
    }
}
